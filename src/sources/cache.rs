//! On-disk cache of the last accepted remote snapshot.

use super::decode_snapshot;
use crate::core::{Provenance, Snapshot};
use crate::error::{ConfigError, Result};
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory under the per-user data directory that holds the cache.
pub const CACHE_DIR_NAME: &str = "crosstrans";

/// File name of the cache document.
pub const CACHE_FILE_NAME: &str = "models_config.json";

const CACHED_AT_KEY: &str = "_cached_at";
const SOURCE_KEY: &str = "_source";

/// Default cache location: `<data dir>/crosstrans/models_config.json`.
///
/// Falls back to the home directory, then the working directory, when the
/// platform reports no data directory.
pub fn default_cache_path() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CACHE_DIR_NAME)
        .join(CACHE_FILE_NAME)
}

/// Reads and writes the cached snapshot.
///
/// The file holds the full snapshot payload plus `_cached_at` (fractional
/// epoch seconds) and `_source` metadata. Readers tolerate either field being
/// absent.
///
/// # Examples
///
/// ```rust,no_run
/// use tiered_config::sources::CachePersister;
///
/// let cache = CachePersister::new("/tmp/models_config.json");
/// if let Ok(Some(snapshot)) = cache.load() {
///     println!("cached providers: {:?}", snapshot.providers);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CachePersister {
    path: PathBuf,
}

impl CachePersister {
    /// Create a persister for the given cache file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a persister at [`default_cache_path`].
    pub fn at_default_location() -> Self {
        Self::new(default_cache_path())
    }

    /// Path of the cache file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cached snapshot.
    ///
    /// Returns `Ok(None)` if no cache file exists. The snapshot is stamped
    /// [`Provenance::Cached`] with `_cached_at` as its fetch time.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not JSON, or fails
    /// schema validation.
    pub fn load(&self) -> Result<Option<Snapshot>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(ConfigError::PersistenceError(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    err
                )));
            }
        };

        let payload: JsonValue = serde_json::from_str(&raw)?;
        let cached_at = payload
            .get(CACHED_AT_KEY)
            .and_then(JsonValue::as_f64)
            .and_then(epoch_seconds_to_datetime);

        let snapshot = decode_snapshot(payload)?;
        Ok(Some(snapshot.stamped(Provenance::Cached, cached_at)))
    }

    /// Persist a remote snapshot, creating parent directories as needed.
    ///
    /// The document is written to a sibling temporary file and renamed into
    /// place, so readers never see a partially written cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.write_error(e))?;
        }

        let mut payload = serde_json::to_value(snapshot)?;
        let cached_at = snapshot.fetched_at().unwrap_or_else(Utc::now);
        if let Some(object) = payload.as_object_mut() {
            object.insert(
                CACHED_AT_KEY.to_string(),
                JsonValue::from(datetime_to_epoch_seconds(cached_at)),
            );
            object.insert(
                SOURCE_KEY.to_string(),
                JsonValue::from(Provenance::Remote.as_str()),
            );
        }

        let body = serde_json::to_vec_pretty(&payload)?;
        let staging = self.staging_path();
        fs::write(&staging, body).map_err(|e| self.write_error(e))?;
        fs::rename(&staging, &self.path).map_err(|e| {
            let _ = fs::remove_file(&staging);
            self.write_error(e)
        })?;

        tracing::debug!(path = %self.path.display(), "saved configuration cache");
        Ok(())
    }

    /// Delete the cache file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!(path = %self.path.display(), "configuration cache cleared");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(ConfigError::PersistenceError(format!(
                "Failed to remove {}: {}",
                self.path.display(),
                err
            ))),
        }
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| CACHE_FILE_NAME.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_error(&self, err: std::io::Error) -> ConfigError {
        ConfigError::PersistenceError(format!("Failed to write {}: {}", self.path.display(), err))
    }
}

fn datetime_to_epoch_seconds(at: DateTime<Utc>) -> f64 {
    at.timestamp_micros() as f64 / 1_000_000.0
}

fn epoch_seconds_to_datetime(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() || secs <= 0.0 {
        return None;
    }
    let whole = secs.trunc();
    let nanos = ((secs - whole) * 1_000_000_000.0) as u32;
    DateTime::from_timestamp(whole as i64, nanos)
}
