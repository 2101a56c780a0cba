//! The provider configuration handle: active snapshot plus typed accessors.

use crate::core::capabilities::{self, CredentialCheck, VisionHeuristics};
use crate::core::defaults::{hardcoded_default_models, hardcoded_endpoints};
use crate::core::refresh::FetchSlot;
use crate::core::{Provenance, RefreshSettings, Snapshot, Validate};
use crate::error::Result;
use crate::notify::{SubscriberRegistry, SubscriptionHandle, SubscriptionId};
use crate::sources::{CachePersister, SnapshotSource};
use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// State shared by every clone of a [`ProviderConfig`].
pub(crate) struct Shared {
    /// The active snapshot, swapped wholesale
    pub(crate) current: ArcSwap<Snapshot>,
    /// Single-slot fetch supervisor; also serialises snapshot stores
    pub(crate) fetch_slot: Mutex<FetchSlot>,
    pub(crate) cache: CachePersister,
    pub(crate) source: Option<Arc<dyn SnapshotSource>>,
    pub(crate) subscribers: SubscriberRegistry,
    pub(crate) settings: RefreshSettings,
    pub(crate) heuristics: VisionHeuristics,
    pub(crate) runtime: Option<tokio::runtime::Handle>,
}

/// Process-wide provider/model configuration service.
///
/// Construct one at startup with [`ProviderConfig::builder`] and pass clones to
/// every collaborator that needs it; clones share the same state. Reads are a
/// single atomic load and never observe a half-installed snapshot.
///
/// # Examples
///
/// ```rust,no_run
/// use tiered_config::prelude::*;
///
/// # fn example() -> Result<()> {
/// let config = ProviderConfig::builder().build()?;
///
/// // Cache or embedded defaults, available immediately
/// let endpoints = config.provider_endpoints();
/// println!("OpenAI endpoint: {:?}", endpoints.get("OpenAI"));
///
/// // Opportunistic background refresh
/// config.fetch_async(false);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ProviderConfig {
    pub(crate) shared: Arc<Shared>,
}

impl ProviderConfig {
    pub(crate) fn from_shared(shared: Shared) -> Self {
        Self {
            shared: Arc::new(shared),
        }
    }

    /// Get a reference-counted handle to the active snapshot.
    ///
    /// The returned snapshot is immutable; later updates install a new one
    /// without affecting it.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.shared.current.load_full()
    }

    /// Atomically replace the active snapshot.
    ///
    /// Subscribers are not notified; they only hear about remote updates.
    ///
    /// # Errors
    ///
    /// Returns an error (and keeps the current snapshot) if validation fails.
    pub fn set_snapshot(&self, snapshot: Snapshot) -> Result<()> {
        snapshot.validate()?;
        let _slot = self.shared.fetch_slot.lock();
        self.shared.current.store(Arc::new(snapshot));
        Ok(())
    }

    /// Provider identifiers in display order.
    pub fn providers(&self) -> Vec<String> {
        self.shared.current.load().providers.clone()
    }

    /// Models offered by each provider.
    pub fn models_by_provider(&self) -> BTreeMap<String, Vec<String>> {
        self.shared.current.load().models_by_provider.clone()
    }

    /// Models offered by one provider; empty if the provider is unknown.
    pub fn models_for(&self, provider: &str) -> Vec<String> {
        self.shared
            .current
            .load()
            .models_by_provider
            .get(provider)
            .cloned()
            .unwrap_or_default()
    }

    /// Credential-format pattern per provider.
    pub fn credential_patterns(&self) -> BTreeMap<String, String> {
        self.shared.current.load().credential_patterns.clone()
    }

    /// Image-capable model patterns per provider.
    pub fn vision_models(&self) -> BTreeMap<String, Vec<String>> {
        self.shared.current.load().vision_models.clone()
    }

    /// Suggested default models per provider.
    ///
    /// Falls back to the embedded defaults if the active snapshot has none.
    pub fn default_models_by_provider(&self) -> BTreeMap<String, Vec<String>> {
        let snapshot = self.shared.current.load();
        if snapshot.default_models_by_provider.is_empty() {
            hardcoded_default_models()
        } else {
            snapshot.default_models_by_provider.clone()
        }
    }

    /// Request URL per provider.
    ///
    /// Falls back to the embedded endpoints if the active snapshot has none.
    pub fn provider_endpoints(&self) -> BTreeMap<String, String> {
        let snapshot = self.shared.current.load();
        if snapshot.provider_endpoints.is_empty() {
            hardcoded_endpoints()
        } else {
            snapshot.provider_endpoints.clone()
        }
    }

    /// Request URL for one provider.
    pub fn endpoint(&self, provider: &str) -> Option<String> {
        self.provider_endpoints().remove(provider)
    }

    /// Which tier produced the active snapshot.
    pub fn provenance(&self) -> Provenance {
        self.shared.current.load().provenance()
    }

    /// The source's `updated_at` stamp, or an empty string.
    pub fn updated_at(&self) -> String {
        self.shared
            .current
            .load()
            .updated_at
            .clone()
            .unwrap_or_default()
    }

    /// When the active snapshot was accepted from the network.
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.shared.current.load().fetched_at()
    }

    /// Whether `model` under `provider` accepts image input.
    ///
    /// Explicit entries (with `*` wildcards) are consulted first, then the
    /// configured substring heuristic.
    pub fn is_vision_capable(&self, model: &str, provider: &str) -> bool {
        capabilities::is_vision_capable(
            &self.shared.current.load(),
            &self.shared.heuristics,
            model,
            provider,
        )
    }

    /// Check a credential against the provider's format pattern.
    pub fn check_credential(&self, provider: &str, credential: &str) -> CredentialCheck {
        capabilities::check_credential(&self.shared.current.load(), provider, credential)
    }

    /// Register a callback fired after each successful remote update.
    pub fn register<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Snapshot) + Send + Sync + 'static,
    {
        self.shared.subscribers.register(callback)
    }

    /// Remove a callback. Unknown ids are ignored.
    pub fn unregister(&self, id: SubscriptionId) {
        self.shared.subscribers.unregister(id)
    }

    /// Register a callback that is removed when the returned handle drops.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionHandle
    where
        F: Fn(&Snapshot) + Send + Sync + 'static,
    {
        self.shared.subscribers.subscribe(callback)
    }

    /// Location of the cache file.
    pub fn cache_path(&self) -> &Path {
        self.shared.cache.path()
    }

    /// Delete the on-disk cache, e.g. after an application upgrade that
    /// changes the expected schema. The active snapshot is unaffected.
    pub fn clear_cache(&self) {
        if let Err(err) = self.shared.cache.clear() {
            tracing::warn!(kind = err.kind(), error = %err, "failed to clear configuration cache");
        }
    }
}
