//! Builder for constructing ProviderConfig instances.

use crate::core::capabilities::VisionHeuristics;
use crate::core::config_handle::{ProviderConfig, Shared};
use crate::core::refresh::FetchSlot;
use crate::core::{RefreshSettings, TierResolver};
use crate::error::Result;
use crate::notify::SubscriberRegistry;
use crate::sources::{CachePersister, SnapshotSource, default_cache_path};
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[cfg(feature = "remote")]
use crate::sources::HttpSource;

/// Where remote snapshots come from.
enum RemoteChoice {
    /// [`HttpSource`] built from the refresh settings
    Default,
    Custom(Arc<dyn SnapshotSource>),
    Disabled,
}

/// Builder for constructing a [`ProviderConfig`].
///
/// Building runs the tier resolver synchronously (cache file, then embedded
/// defaults) and never touches the network.
///
/// # Examples
///
/// ```rust,no_run
/// use tiered_config::prelude::*;
/// use std::time::Duration;
///
/// # fn example() -> Result<()> {
/// let config = ProviderConfig::builder()
///     .with_remote_url("https://config.example.com/v1/config")
///     .with_freshness_window(Duration::from_secs(6 * 60 * 60))
///     .with_cache_path("/var/lib/myapp/models_config.json")
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ProviderConfigBuilder {
    settings: RefreshSettings,
    cache_path: Option<PathBuf>,
    remote: RemoteChoice,
    heuristics: VisionHeuristics,
    runtime: Option<tokio::runtime::Handle>,
}

impl ProviderConfigBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            settings: RefreshSettings::default(),
            cache_path: None,
            remote: RemoteChoice::Default,
            heuristics: VisionHeuristics::default(),
            runtime: None,
        }
    }

    /// Replace all refresh settings at once.
    pub fn with_settings(mut self, settings: RefreshSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Set the remote configuration endpoint.
    pub fn with_remote_url(mut self, url: impl Into<String>) -> Self {
        self.settings.remote_url = url.into();
        self
    }

    /// Set the request timeout (default 15 seconds).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.settings.request_timeout = timeout;
        self
    }

    /// Set the freshness window (default 24 hours).
    pub fn with_freshness_window(mut self, window: Duration) -> Self {
        self.settings.freshness_window = window;
        self
    }

    /// Set the `User-Agent` sent to the remote endpoint.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.settings.user_agent = user_agent.into();
        self
    }

    /// Override the cache file location.
    ///
    /// Defaults to [`default_cache_path`].
    pub fn with_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = Some(path.into());
        self
    }

    /// Refresh from a custom source instead of the HTTP endpoint.
    pub fn with_source<S: SnapshotSource + 'static>(mut self, source: S) -> Self {
        self.remote = RemoteChoice::Custom(Arc::new(source));
        self
    }

    /// Never refresh; only the cache and embedded tiers are used.
    pub fn without_remote(mut self) -> Self {
        self.remote = RemoteChoice::Disabled;
        self
    }

    /// Set the heuristic used for vision models missing from the explicit list.
    pub fn with_vision_heuristics(mut self, heuristics: VisionHeuristics) -> Self {
        self.heuristics = heuristics;
        self
    }

    /// Run background fetches on this runtime.
    ///
    /// Without it, `fetch_async` uses the caller's ambient runtime or a
    /// dedicated thread.
    pub fn with_runtime(mut self, handle: tokio::runtime::Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    /// Build the configuration handle.
    ///
    /// Resolution itself cannot fail; the active snapshot is the cached one
    /// when usable and the embedded defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the default HTTP source cannot be constructed
    /// (empty URL, invalid user agent, TLS backend failure).
    pub fn build(self) -> Result<ProviderConfig> {
        let source = match self.remote {
            RemoteChoice::Custom(source) => Some(source),
            RemoteChoice::Disabled => None,
            RemoteChoice::Default => default_source(&self.settings)?,
        };

        let cache = CachePersister::new(self.cache_path.unwrap_or_else(default_cache_path));
        let initial = TierResolver::new(&cache).resolve();

        Ok(ProviderConfig::from_shared(Shared {
            current: ArcSwap::from_pointee(initial),
            fetch_slot: Mutex::new(FetchSlot::Idle),
            cache,
            source,
            subscribers: SubscriberRegistry::new(),
            settings: self.settings,
            heuristics: self.heuristics,
            runtime: self.runtime,
        }))
    }
}

#[cfg(feature = "remote")]
fn default_source(settings: &RefreshSettings) -> Result<Option<Arc<dyn SnapshotSource>>> {
    let source = HttpSource::builder()
        .with_url(settings.remote_url.clone())
        .with_timeout(settings.request_timeout)
        .with_user_agent(settings.user_agent.clone())
        .build()?;
    let source: Arc<dyn SnapshotSource> = Arc::new(source);
    Ok(Some(source))
}

#[cfg(not(feature = "remote"))]
fn default_source(_settings: &RefreshSettings) -> Result<Option<Arc<dyn SnapshotSource>>> {
    tracing::debug!("built without the 'remote' feature; remote refresh disabled");
    Ok(None)
}

impl Default for ProviderConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderConfig {
    /// Create a new builder for constructing a configuration handle.
    pub fn builder() -> ProviderConfigBuilder {
        ProviderConfigBuilder::new()
    }
}
