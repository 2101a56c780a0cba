//! Subscriber-based notifications for remote configuration updates.

use crate::core::Snapshot;
use parking_lot::Mutex;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Weak};

type Callback = Arc<dyn Fn(&Snapshot) + Send + Sync>;

/// Identifier returned by [`SubscriberRegistry::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Handle for a subscription that can be dropped to unsubscribe.
///
/// When the handle is dropped, the subscription is removed immediately.
pub struct SubscriptionHandle {
    id: SubscriptionId,
    registry: Weak<Mutex<SubscriberRegistryInner>>,
}

impl SubscriptionHandle {
    /// Identifier of the underlying subscription.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            remove(&registry, self.id);
        }
    }
}

/// Internal subscriber registry state.
struct SubscriberRegistryInner {
    subscribers: Vec<(SubscriptionId, Callback)>,
    next_id: u64,
}

/// Registry for managing configuration update subscribers.
///
/// Callbacks run in registration order after a remote snapshot has been
/// installed and persisted. The lock is released before any callback runs, so
/// callbacks may register or unregister (themselves included) without
/// deadlocking. A panicking callback is logged and skipped.
///
/// # Examples
///
/// ```rust
/// use tiered_config::notify::SubscriberRegistry;
///
/// let registry = SubscriberRegistry::new();
///
/// let id = registry.register(|snapshot| {
///     println!("{} providers available", snapshot.providers.len());
/// });
///
/// registry.unregister(id);
/// assert_eq!(registry.subscriber_count(), 0);
/// ```
pub struct SubscriberRegistry {
    inner: Arc<Mutex<SubscriberRegistryInner>>,
}

impl SubscriberRegistry {
    /// Create a new subscriber registry.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SubscriberRegistryInner {
                subscribers: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// Register a callback; it stays registered until [`unregister`](Self::unregister).
    pub fn register<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Snapshot) + Send + Sync + 'static,
    {
        let mut inner = self.inner.lock();
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.subscribers.push((id, Arc::new(callback)));
        id
    }

    /// Remove a callback. Unknown ids are ignored.
    pub fn unregister(&self, id: SubscriptionId) {
        remove(&self.inner, id);
    }

    /// Register a callback that is removed when the returned handle drops.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionHandle
    where
        F: Fn(&Snapshot) + Send + Sync + 'static,
    {
        let id = self.register(callback);
        SubscriptionHandle {
            id,
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Invoke every registered callback in registration order.
    ///
    /// Returns the number of callbacks that completed without panicking.
    pub fn notify_all(&self, snapshot: &Snapshot) -> usize {
        // Copy out so callbacks run without the lock held
        let subscribers: Vec<(SubscriptionId, Callback)> = self.inner.lock().subscribers.clone();

        let mut delivered = 0;
        for (id, callback) in subscribers {
            match catch_unwind(AssertUnwindSafe(|| callback(snapshot))) {
                Ok(()) => delivered += 1,
                Err(_) => tracing::warn!(subscriber = id.0, "configuration update callback panicked"),
            }
        }
        delivered
    }

    /// Get the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().subscribers.len()
    }
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SubscriberRegistry {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

fn remove(registry: &Mutex<SubscriberRegistryInner>, id: SubscriptionId) {
    registry.lock().subscribers.retain(|(sub_id, _)| *sub_id != id);
}
