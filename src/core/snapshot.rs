//! The configuration snapshot: one complete, validated payload plus provenance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Which tier produced a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Fetched from the remote endpoint during this process.
    Remote,
    /// Loaded from the on-disk cache at startup.
    Cached,
    /// Built from the embedded defaults.
    Hardcoded,
}

impl Provenance {
    /// Lowercase label, as written to the cache file's `_source` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Cached => "cached",
            Self::Hardcoded => "hardcoded",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable provider/model configuration.
///
/// Field names on the wire follow the remote payload (`version`,
/// `providers_list`, `model_provider_map`, ...). `provenance` and `fetched_at`
/// are stamped locally and never read from a payload.
///
/// Snapshots are replaced wholesale; share them behind an `Arc` and never
/// mutate one that has been installed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Schema version of the payload.
    #[serde(rename = "version")]
    pub schema_version: u32,

    /// Opaque timestamp from the source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    /// Provider identifiers in display order.
    #[serde(rename = "providers_list")]
    pub providers: Vec<String>,

    /// Models offered by each provider.
    #[serde(rename = "model_provider_map")]
    pub models_by_provider: BTreeMap<String, Vec<String>>,

    /// Credential-format regex per provider.
    #[serde(rename = "api_key_patterns")]
    pub credential_patterns: BTreeMap<String, String>,

    /// Image-capable model patterns per provider; `*` is a wildcard.
    pub vision_models: BTreeMap<String, Vec<String>>,

    /// Suggested default models per provider.
    #[serde(rename = "default_models_by_provider")]
    pub default_models_by_provider: BTreeMap<String, Vec<String>>,

    /// Chat-completions URL per provider.
    #[serde(rename = "provider_api_urls")]
    pub provider_endpoints: BTreeMap<String, String>,

    #[serde(skip, default = "default_provenance")]
    pub(crate) provenance: Provenance,

    #[serde(skip)]
    pub(crate) fetched_at: Option<DateTime<Utc>>,
}

fn default_provenance() -> Provenance {
    Provenance::Hardcoded
}

impl Snapshot {
    /// Which tier produced this snapshot.
    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    /// When this snapshot was accepted from the network, if it ever was.
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    /// Return a copy stamped with the given provenance and fetch time.
    pub(crate) fn stamped(mut self, provenance: Provenance, fetched_at: Option<DateTime<Utc>>) -> Self {
        self.provenance = provenance;
        self.fetched_at = fetched_at;
        self
    }

    /// Whether a non-forced refresh should be skipped.
    ///
    /// Snapshots without a fetch time are always stale, as are snapshots whose
    /// fetch time lies in the future.
    pub fn is_fresh(&self, window: Duration, now: DateTime<Utc>) -> bool {
        let Some(fetched_at) = self.fetched_at else {
            return false;
        };
        match (now - fetched_at).to_std() {
            Ok(age) => age < window,
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::defaults::hardcoded_snapshot;
    use chrono::TimeDelta;

    const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    #[test]
    fn test_hardcoded_is_never_fresh() {
        let snapshot = hardcoded_snapshot();
        assert_eq!(snapshot.provenance(), Provenance::Hardcoded);
        assert!(!snapshot.is_fresh(DAY, Utc::now()));
    }

    #[test]
    fn test_freshness_window() {
        let now = Utc::now();
        let recent = hardcoded_snapshot().stamped(Provenance::Remote, Some(now - TimeDelta::hours(1)));
        assert!(recent.is_fresh(DAY, now));

        let old = hardcoded_snapshot().stamped(Provenance::Cached, Some(now - TimeDelta::hours(25)));
        assert!(!old.is_fresh(DAY, now));
    }

    #[test]
    fn test_future_fetch_time_is_stale() {
        let now = Utc::now();
        let skewed = hardcoded_snapshot().stamped(Provenance::Cached, Some(now + TimeDelta::hours(2)));
        assert!(!skewed.is_fresh(DAY, now));
    }

    #[test]
    fn test_local_metadata_not_serialized() {
        let snapshot = hardcoded_snapshot().stamped(Provenance::Remote, Some(Utc::now()));
        let value = serde_json::to_value(&snapshot).unwrap();
        let object = value.as_object().unwrap();
        assert!(object.contains_key("providers_list"));
        assert!(object.contains_key("version"));
        assert!(!object.contains_key("provenance"));
        assert!(!object.contains_key("fetched_at"));
    }

    #[test]
    fn test_provenance_labels() {
        assert_eq!(Provenance::Remote.to_string(), "remote");
        assert_eq!(Provenance::Cached.as_str(), "cached");
        assert_eq!(Provenance::Hardcoded.as_str(), "hardcoded");
    }
}
