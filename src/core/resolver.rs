//! Startup tier resolution: cache file first, embedded defaults second.

use crate::core::defaults::hardcoded_snapshot;
use crate::core::{Provenance, Snapshot};
use crate::sources::CachePersister;

/// Picks the best snapshot available without touching the network.
///
/// The resolver never fails: an absent, unreadable or invalid cache is
/// treated the same way and resolves to the embedded defaults.
pub struct TierResolver<'a> {
    cache: &'a CachePersister,
}

impl<'a> TierResolver<'a> {
    /// Create a resolver reading from the given cache.
    pub fn new(cache: &'a CachePersister) -> Self {
        Self { cache }
    }

    /// Resolve the startup snapshot.
    pub fn resolve(&self) -> Snapshot {
        match self.cache.load() {
            Ok(Some(snapshot)) => {
                tracing::info!(
                    path = %self.cache.path().display(),
                    providers = snapshot.providers.len(),
                    "loaded configuration from local cache"
                );
                return snapshot;
            }
            Ok(None) => {
                tracing::debug!(path = %self.cache.path().display(), "no configuration cache found");
            }
            Err(err) => {
                tracing::warn!(
                    path = %self.cache.path().display(),
                    kind = err.kind(),
                    error = %err,
                    "ignoring unusable configuration cache"
                );
            }
        }

        tracing::info!(provenance = %Provenance::Hardcoded, "using embedded configuration defaults");
        hardcoded_snapshot()
    }
}
