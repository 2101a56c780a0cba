//! Tunables for the remote tier.

use serde::Deserialize;
use std::time::Duration;

/// Placeholder remote endpoint under the reserved `.invalid` TLD.
///
/// It never resolves, so a handle built without
/// [`with_remote_url`](crate::core::ProviderConfigBuilder::with_remote_url)
/// stays on the cache and embedded tiers until a real endpoint is configured.
pub const DEFAULT_REMOTE_URL: &str = "https://config.invalid/v1/config";

/// Default request deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Default freshness window: non-forced refreshes inside it are skipped.
pub const DEFAULT_FRESHNESS_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);

/// Default client identifier sent as `User-Agent`.
pub const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Settings for remote refresh.
///
/// Durations deserialize from whole seconds, so the settings can be embedded
/// in a host application's own configuration file.
///
/// # Examples
///
/// ```rust
/// use tiered_config::core::RefreshSettings;
/// use std::time::Duration;
///
/// let settings = RefreshSettings::default();
/// assert_eq!(settings.request_timeout, Duration::from_secs(15));
/// assert_eq!(settings.freshness_window, Duration::from_secs(86_400));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RefreshSettings {
    /// Remote configuration endpoint.
    pub remote_url: String,

    /// Deadline for the whole HTTP exchange.
    #[serde(rename = "request_timeout_secs", deserialize_with = "duration_from_secs")]
    pub request_timeout: Duration,

    /// Age below which non-forced refreshes are skipped.
    #[serde(rename = "freshness_window_secs", deserialize_with = "duration_from_secs")]
    pub freshness_window: Duration,

    /// `User-Agent` header value.
    pub user_agent: String,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            remote_url: DEFAULT_REMOTE_URL.to_string(),
            request_timeout: DEFAULT_TIMEOUT,
            freshness_window: DEFAULT_FRESHNESS_WINDOW,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

fn duration_from_secs<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: serde::Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = RefreshSettings::default();
        assert_eq!(settings.remote_url, DEFAULT_REMOTE_URL);
        // reserved TLD, never reaches a real host
        assert!(settings.remote_url.starts_with("https://config.invalid/"));
        assert!(settings.user_agent.starts_with("tiered-config/"));
    }

    #[test]
    fn test_partial_deserialize() {
        let settings: RefreshSettings = serde_json::from_str(
            r#"{"remote_url": "https://config.example.com/v1/config", "freshness_window_secs": 3600}"#,
        )
        .unwrap();

        assert_eq!(settings.remote_url, "https://config.example.com/v1/config");
        assert_eq!(settings.freshness_window, Duration::from_secs(3600));
        assert_eq!(settings.request_timeout, DEFAULT_TIMEOUT);
    }
}
