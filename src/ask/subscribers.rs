//! Change notification for stores.
//!
//! Subscribers are identified by the id handed out at registration, never by
//! the callback itself, so registering the same callback twice yields two
//! independently removable subscriptions.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

type Callback = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<(SubscriptionId, Callback)>,
}

/// Ordered list of change callbacks.
#[derive(Clone, Default)]
pub(crate) struct SubscriberList {
    registry: Arc<Mutex<Registry>>,
}

impl SubscriberList {
    fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
        // A panicking subscriber never runs under this lock, so the data is intact.
        registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn subscribe(&self, callback: Callback) -> Subscription {
        let mut registry = Self::lock(&self.registry);
        let id = SubscriptionId(registry.next_id);
        registry.next_id += 1;
        registry.entries.push((id, callback));
        tracing::trace!(?id, total = registry.entries.len(), "subscribed");
        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Call every subscriber in registration order.
    ///
    /// The list is copied before calling out, so callbacks may subscribe,
    /// unsubscribe or drive the store without deadlocking.
    pub(crate) fn notify(&self) {
        let callbacks: Vec<Callback> = Self::lock(&self.registry)
            .entries
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();
        for callback in callbacks {
            callback();
        }
    }

    pub(crate) fn len(&self) -> usize {
        Self::lock(&self.registry).entries.len()
    }
}

impl fmt::Debug for SubscriberList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriberList")
            .field("len", &self.len())
            .finish()
    }
}

/// Registration handle returned by `subscribe`. Unsubscribes on drop.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: SubscriptionId,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Remove this registration. Safe to call more than once.
    pub fn unsubscribe(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let mut registry = SubscriberList::lock(&registry);
        registry.entries.retain(|(id, _)| *id != self.id);
        self.registry = Weak::new();
        tracing::trace!(id = ?self.id, total = registry.entries.len(), "unsubscribed");
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &(self.registry.strong_count() > 0))
            .finish()
    }
}
