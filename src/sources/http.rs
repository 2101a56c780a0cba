//! Remote HTTP/HTTPS snapshot source.

use super::{SnapshotSource, decode_snapshot};
use crate::core::{DEFAULT_REMOTE_URL, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, Snapshot};
use crate::error::{ConfigError, Result};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderValue, USER_AGENT};
use serde_json::Value as JsonValue;
use std::time::Duration;

/// HTTP-based snapshot source.
///
/// Issues a single `GET` with a bounded timeout, a descriptive `User-Agent`
/// and `Accept: application/json`, then validates and decodes the body.
///
/// # Examples
///
/// ```rust,no_run
/// use tiered_config::sources::HttpSource;
/// use std::time::Duration;
///
/// # fn example() -> tiered_config::error::Result<()> {
/// let source = HttpSource::builder()
///     .with_url("https://config.example.com/v1/config")
///     .with_timeout(Duration::from_secs(10))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct HttpSource {
    url: String,
    client: Client,
}

impl HttpSource {
    /// Create a new builder for constructing an HTTP source.
    pub fn builder() -> HttpSourceBuilder {
        HttpSourceBuilder::new()
    }

    /// URL this source fetches from.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl SnapshotSource for HttpSource {
    async fn fetch(&self) -> Result<Snapshot> {
        let response = self
            .client
            .get(&self.url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await
            .map_err(|e| ConfigError::TransportError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConfigError::StatusError {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ConfigError::TransportError(format!("Failed to read body: {}", e)))?;

        let payload: JsonValue = serde_json::from_slice(&body)?;
        decode_snapshot(payload)
    }

    fn name(&self) -> String {
        format!("http:{}", self.url)
    }
}

/// Builder for constructing an `HttpSource`.
pub struct HttpSourceBuilder {
    url: String,
    timeout: Duration,
    user_agent: String,
}

impl HttpSourceBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: DEFAULT_REMOTE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Set the URL to fetch configuration from.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set the request timeout.
    ///
    /// Default is 15 seconds.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the `User-Agent` header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the HTTP source.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The URL is empty
    /// - The user agent is not a valid header value
    /// - The HTTP client cannot be constructed
    pub fn build(self) -> Result<HttpSource> {
        if self.url.trim().is_empty() {
            return Err(ConfigError::Other("URL is required for HttpSource".to_string()));
        }

        let user_agent = HeaderValue::from_str(&self.user_agent)
            .map_err(|e| ConfigError::Other(format!("Invalid user agent: {}", e)))?;

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(USER_AGENT, user_agent);

        let client = Client::builder()
            .timeout(self.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ConfigError::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(HttpSource {
            url: self.url,
            client,
        })
    }
}

impl Default for HttpSourceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
