//! Remote refresh: a single-slot fetch supervisor over the snapshot store.

use crate::core::config_handle::Shared;
use crate::core::{ProviderConfig, Provenance, Snapshot};
use crate::sources::SnapshotSource;
use chrono::Utc;
use std::future::Future;
use std::sync::Arc;

/// State of the single fetch slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FetchSlot {
    Idle,
    InFlight,
}

/// What [`ProviderConfig::fetch_async`] did with the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchDispatch {
    /// A background fetch was started.
    Started,
    /// Another fetch is still running; nothing was started.
    AlreadyInFlight,
    /// The active snapshot is inside the freshness window.
    Fresh,
    /// No remote source is configured.
    Disabled,
}

/// Result of a completed fetch attempt.
///
/// Failures are deliberately not carried here: they are logged and the active
/// snapshot is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A remote snapshot was installed, persisted and announced.
    Updated,
    /// The fetch failed; the previous snapshot is still active.
    Unchanged,
    /// No fetch was attempted.
    Skipped(FetchDispatch),
}

/// Releases the fetch slot when dropped, including on panic.
struct SlotGuard {
    shared: Arc<Shared>,
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        *self.shared.fetch_slot.lock() = FetchSlot::Idle;
    }
}

impl ProviderConfig {
    /// Start a background refresh from the remote tier.
    ///
    /// Returns immediately. Nothing is started if a fetch is already in
    /// flight, or if `force` is false and the active snapshot is still fresh.
    /// The fetch runs on the configured tokio runtime, on the caller's ambient
    /// runtime, or on a dedicated thread when neither exists.
    ///
    /// Failures never surface to the caller; they are logged and the current
    /// snapshot stays active.
    pub fn fetch_async(&self, force: bool) -> FetchDispatch {
        let (source, guard) = match self.claim(force) {
            Ok(claimed) => claimed,
            Err(dispatch) => return dispatch,
        };

        let this = self.clone();
        let task = async move {
            let _guard = guard;
            this.run_fetch(source.as_ref()).await;
        };
        self.dispatch(task);
        FetchDispatch::Started
    }

    /// Run a guarded refresh inline and wait for it to finish.
    ///
    /// Applies the same in-flight and freshness rules as
    /// [`fetch_async`](Self::fetch_async).
    pub async fn fetch_now(&self, force: bool) -> FetchOutcome {
        let (source, _guard) = match self.claim(force) {
            Ok(claimed) => claimed,
            Err(dispatch) => return FetchOutcome::Skipped(dispatch),
        };
        self.run_fetch(source.as_ref()).await
    }

    /// Whether a fetch is currently running.
    pub fn is_fetching(&self) -> bool {
        *self.shared.fetch_slot.lock() == FetchSlot::InFlight
    }

    fn claim(
        &self,
        force: bool,
    ) -> std::result::Result<(Arc<dyn SnapshotSource>, SlotGuard), FetchDispatch> {
        let Some(source) = self.shared.source.clone() else {
            tracing::debug!("remote refresh disabled; no source configured");
            return Err(FetchDispatch::Disabled);
        };

        let mut slot = self.shared.fetch_slot.lock();
        if *slot == FetchSlot::InFlight {
            tracing::debug!("remote fetch already in flight");
            return Err(FetchDispatch::AlreadyInFlight);
        }
        if !force
            && self
                .shared
                .current
                .load()
                .is_fresh(self.shared.settings.freshness_window, Utc::now())
        {
            tracing::debug!("configuration is fresh; skipping remote fetch");
            return Err(FetchDispatch::Fresh);
        }
        *slot = FetchSlot::InFlight;

        Ok((
            source,
            SlotGuard {
                shared: Arc::clone(&self.shared),
            },
        ))
    }

    fn dispatch<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = self
            .shared
            .runtime
            .clone()
            .or_else(|| tokio::runtime::Handle::try_current().ok());
        if let Some(handle) = handle {
            handle.spawn(task);
            return;
        }

        let spawned = std::thread::Builder::new()
            .name("remote-config".to_string())
            .spawn(move || {
                match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(runtime) => runtime.block_on(task),
                    Err(err) => {
                        tracing::warn!(error = %err, "failed to start remote config runtime");
                    }
                }
            });
        if let Err(err) = spawned {
            // the task (and its slot guard) was dropped with the closure
            tracing::warn!(error = %err, "failed to spawn remote config thread");
        }
    }

    async fn run_fetch(&self, source: &dyn SnapshotSource) -> FetchOutcome {
        tracing::debug!(source = %source.name(), "fetching remote configuration");
        match source.fetch().await {
            Ok(snapshot) => {
                self.install_remote(snapshot);
                FetchOutcome::Updated
            }
            Err(err) => {
                tracing::warn!(
                    source = %source.name(),
                    kind = err.kind(),
                    error = %err,
                    provenance = %self.provenance(),
                    "remote configuration fetch failed; keeping current snapshot"
                );
                FetchOutcome::Unchanged
            }
        }
    }

    fn install_remote(&self, snapshot: Snapshot) {
        let snapshot = Arc::new(snapshot.stamped(Provenance::Remote, Some(Utc::now())));
        {
            let _slot = self.shared.fetch_slot.lock();
            self.shared.current.store(Arc::clone(&snapshot));
        }
        tracing::info!(
            providers = snapshot.providers.len(),
            updated_at = snapshot.updated_at.as_deref().unwrap_or(""),
            "installed remote configuration"
        );

        if let Err(err) = self.shared.cache.save(&snapshot) {
            tracing::warn!(
                path = %self.shared.cache.path().display(),
                kind = err.kind(),
                error = %err,
                "failed to persist configuration cache"
            );
        }

        self.shared.subscribers.notify_all(&snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::defaults::hardcoded_snapshot;
    use crate::error::{ConfigError, Result};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    struct StaticSource {
        calls: Arc<AtomicUsize>,
        ok: bool,
    }

    #[async_trait]
    impl SnapshotSource for StaticSource {
        async fn fetch(&self) -> Result<Snapshot> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.ok {
                let mut snapshot = hardcoded_snapshot();
                snapshot.updated_at = Some("remote".to_string());
                Ok(snapshot)
            } else {
                Err(ConfigError::TransportError("connection refused".to_string()))
            }
        }

        fn name(&self) -> String {
            "static".to_string()
        }
    }

    fn config_with(dir: &TempDir, ok: bool) -> (ProviderConfig, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let config = ProviderConfig::builder()
            .with_cache_path(dir.path().join("models_config.json"))
            .with_source(StaticSource {
                calls: Arc::clone(&calls),
                ok,
            })
            .build()
            .unwrap();
        (config, calls)
    }

    #[tokio::test]
    async fn test_fetch_now_installs_and_persists() {
        let temp_dir = TempDir::new().unwrap();
        let (config, calls) = config_with(&temp_dir, true);

        assert_eq!(config.fetch_now(false).await, FetchOutcome::Updated);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(config.provenance(), Provenance::Remote);
        assert_eq!(config.updated_at(), "remote");
        assert!(config.fetched_at().is_some());
        assert!(config.cache_path().exists());
        assert!(!config.is_fetching());
    }

    #[tokio::test]
    async fn test_fresh_snapshot_skips_fetch() {
        let temp_dir = TempDir::new().unwrap();
        let (config, calls) = config_with(&temp_dir, true);

        assert_eq!(config.fetch_now(false).await, FetchOutcome::Updated);
        assert_eq!(
            config.fetch_now(false).await,
            FetchOutcome::Skipped(FetchDispatch::Fresh)
        );
        assert_eq!(config.fetch_async(false), FetchDispatch::Fresh);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert_eq!(config.fetch_now(true).await, FetchOutcome::Updated);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failure_keeps_snapshot_and_releases_slot() {
        let temp_dir = TempDir::new().unwrap();
        let (config, calls) = config_with(&temp_dir, false);
        let before = config.snapshot();

        assert_eq!(config.fetch_now(false).await, FetchOutcome::Unchanged);
        assert_eq!(config.provenance(), Provenance::Hardcoded);
        assert_eq!(*config.snapshot(), *before);
        assert!(!config.cache_path().exists());
        assert!(!config.is_fetching());

        // a failed attempt does not start a freshness window
        assert_eq!(config.fetch_now(false).await, FetchOutcome::Unchanged);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_disabled_without_source() {
        let temp_dir = TempDir::new().unwrap();
        let config = ProviderConfig::builder()
            .with_cache_path(temp_dir.path().join("models_config.json"))
            .without_remote()
            .build()
            .unwrap();

        assert_eq!(config.fetch_async(true), FetchDispatch::Disabled);
        assert_eq!(
            config.fetch_now(true).await,
            FetchOutcome::Skipped(FetchDispatch::Disabled)
        );
    }

    #[test]
    fn test_fetch_async_without_runtime_uses_thread() {
        let temp_dir = TempDir::new().unwrap();
        let (config, calls) = config_with(&temp_dir, true);

        let (tx, rx) = std::sync::mpsc::channel();
        config.register(move |_| {
            let _ = tx.send(());
        });

        assert_eq!(config.fetch_async(false), FetchDispatch::Started);
        rx.recv_timeout(std::time::Duration::from_secs(5)).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(config.provenance(), Provenance::Remote);
    }
}
