//! Binding a store to a render loop.
//!
//! A [`Binding`] subscribes a change callback (usually "schedule a redraw") to
//! an [`AskStore`] and hands each render pass one consistent snapshot of it.

use super::answer::AskError;
use super::question::Question;
use super::store::AskStore;
use super::subscribers::Subscription;
use std::fmt;
use std::sync::Arc;

/// Create a store together with the [`Binder`] views use to attach to it.
pub fn create_ask<P: Default, D, R>() -> (AskStore<P, D, R>, Binder<P, D, R>) {
    let store = AskStore::new();
    let binder = Binder {
        store: store.clone(),
    };
    (store, binder)
}

/// Hands out [`Binding`]s for one store.
pub struct Binder<P, D = (), R = ()> {
    store: AskStore<P, D, R>,
}

impl<P, D, R> Clone for Binder<P, D, R> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<P, D, R> Binder<P, D, R> {
    pub fn bind<F>(&self, on_change: F) -> Binding<P, D, R>
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.store.bind(on_change)
    }
}

impl<P, D, R> AskStore<P, D, R> {
    /// Attach a view. `on_change` runs after every transition until the
    /// returned binding is detached or dropped.
    pub fn bind<F>(&self, on_change: F) -> Binding<P, D, R>
    where
        F: Fn() + Send + Sync + 'static,
    {
        let subscription = self.subscribe(on_change);
        Binding {
            store: self.clone(),
            subscription: Some(subscription),
            committed: None,
        }
    }
}

/// A view's live attachment to a store.
pub struct Binding<P, D = (), R = ()> {
    store: AskStore<P, D, R>,
    subscription: Option<Subscription>,
    committed: Option<Arc<Question<P>>>,
}

impl<P, D, R> Binding<P, D, R> {
    /// Start a render pass over the store's current snapshot.
    ///
    /// The snapshot is read once here and stays fixed for the whole pass, even
    /// if the store changes underneath it. Fails with [`AskError::Detached`]
    /// once the binding has been torn down.
    pub fn render_pass(&mut self) -> Result<RenderPass<'_, P, D, R>, AskError<R>> {
        if self.subscription.is_none() {
            return Err(AskError::Detached);
        }
        let prompt = Prompt {
            store: self.store.clone(),
            snapshot: self.store.snapshot(),
        };
        Ok(RenderPass {
            binding: self,
            prompt,
        })
    }

    /// Prompt for the snapshot of the last finished render pass, i.e. the one
    /// the user is looking at. Falls back to the current snapshot before the
    /// first pass.
    pub fn prompt(&self) -> Result<Prompt<P, D, R>, AskError<R>> {
        if self.subscription.is_none() {
            return Err(AskError::Detached);
        }
        let snapshot = self
            .committed
            .clone()
            .unwrap_or_else(|| self.store.snapshot());
        Ok(Prompt {
            store: self.store.clone(),
            snapshot,
        })
    }

    /// True when the store has moved past the last rendered snapshot.
    pub fn is_stale(&self) -> bool {
        match &self.committed {
            Some(committed) => !Arc::ptr_eq(committed, &self.store.snapshot()),
            None => true,
        }
    }

    /// Unsubscribe. Later render passes fail with [`AskError::Detached`].
    pub fn detach(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        self.committed = None;
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }
}

impl<P: fmt::Debug, D, R> fmt::Debug for Binding<P, D, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("attached", &self.is_attached())
            .field("committed", &self.committed.as_ref().map(|q| q.key))
            .finish()
    }
}

/// One render of a bound view.
pub struct RenderPass<'a, P, D, R> {
    binding: &'a mut Binding<P, D, R>,
    prompt: Prompt<P, D, R>,
}

impl<P, D, R> RenderPass<'_, P, D, R> {
    pub fn prompt(&self) -> &Prompt<P, D, R> {
        &self.prompt
    }

    /// Commit the pass. Returns `true` when the store changed while rendering
    /// and the view should render again.
    pub fn finish(self) -> bool {
        let snapshot = self.prompt.snapshot;
        let torn = !Arc::ptr_eq(&snapshot, &self.binding.store.snapshot());
        if torn {
            tracing::trace!(key = snapshot.key, "store changed during render");
        }
        self.binding.committed = Some(snapshot);
        torn
    }
}

/// What a prompt renderer needs: the question and a way to answer it.
///
/// Answers are bound to the question this prompt was rendered for; once the
/// store has moved on to a newer question they are ignored.
pub struct Prompt<P, D = (), R = ()> {
    store: AskStore<P, D, R>,
    snapshot: Arc<Question<P>>,
}

impl<P, D, R> Clone for Prompt<P, D, R> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            snapshot: Arc::clone(&self.snapshot),
        }
    }
}

impl<P, D, R> Prompt<P, D, R> {
    pub fn key(&self) -> u64 {
        self.snapshot.key
    }

    pub fn payload(&self) -> &P {
        &self.snapshot.payload
    }

    pub fn asking(&self) -> bool {
        self.snapshot.asking
    }

    pub fn question(&self) -> &Arc<Question<P>> {
        &self.snapshot
    }

    pub fn ok(&self, data: D) -> bool {
        self.store.ok_for(self.snapshot.key, data)
    }

    pub fn cancel(&self) -> bool {
        self.store.cancel_for(self.snapshot.key, None)
    }

    pub fn cancel_with(&self, reason: R) -> bool {
        self.store.cancel_for(self.snapshot.key, Some(reason))
    }
}

impl<P: fmt::Debug, D, R> fmt::Debug for Prompt<P, D, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prompt")
            .field("question", &self.snapshot)
            .finish()
    }
}
