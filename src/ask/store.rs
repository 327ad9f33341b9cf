//! The shared single-slot question store.

use super::answer::{Answer, AskMode, Asked, Resolver, SafeAsked};
use super::question::Question;
use super::subscribers::{SubscriberList, Subscription};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::oneshot;

/// What happens to an outstanding question when a new one is asked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// The earlier question is abandoned; its future never resolves.
    #[default]
    Supersede,
    /// The earlier question is cancelled without a reason first.
    CancelPrevious,
}

struct State<P, D, R> {
    current: Arc<Question<P>>,
    resolver: Option<Resolver<D, R>>,
    policy: OverlapPolicy,
}

struct Shared<P, D, R> {
    state: Mutex<State<P, D, R>>,
    subscribers: SubscriberList,
}

/// Pending-question register with future-based answer delivery.
///
/// At most one question is outstanding. `ask`/`safe_ask` publish a new
/// [`Question`] and hand the caller a future; the view layer reads
/// [`snapshot`](Self::snapshot), renders the prompt and answers with
/// [`ok`](Self::ok) or [`cancel`](Self::cancel).
///
/// Every operation runs to completion without suspending. Subscribers are
/// notified after the state change and with no lock held, so they may call
/// back into the store.
///
/// Cloning yields another handle to the same store.
pub struct AskStore<P, D = (), R = ()> {
    shared: Arc<Shared<P, D, R>>,
}

impl<P, D, R> Clone for AskStore<P, D, R> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<P: Default, D, R> AskStore<P, D, R> {
    pub fn new() -> Self {
        Self::with_payload(P::default())
    }
}

impl<P: Default, D, R> Default for AskStore<P, D, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, D, R> AskStore<P, D, R> {
    /// Create a store whose idle snapshot carries `initial` as its payload.
    pub fn with_payload(initial: P) -> Self {
        Self::with_policy(initial, OverlapPolicy::default())
    }

    pub fn with_policy(initial: P, policy: OverlapPolicy) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State {
                    current: Arc::new(Question::idle(Arc::new(initial))),
                    resolver: None,
                    policy,
                }),
                subscribers: SubscriberList::default(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State<P, D, R>> {
        // User code never runs under this lock, so a poisoned state is still consistent.
        self.shared
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Ask in throwing mode: the future fails with
    /// [`AskError::Cancelled`](super::AskError::Cancelled) when declined.
    pub fn ask(&self, payload: P) -> Asked<D, R> {
        Asked::new(self.start(AskMode::Throwing, payload))
    }

    /// Ask in safe mode: the future always resolves with an [`Answer`].
    pub fn safe_ask(&self, payload: P) -> SafeAsked<D, R> {
        SafeAsked::new(self.start(AskMode::Safe, payload))
    }

    fn start(&self, mode: AskMode, payload: P) -> oneshot::Receiver<Answer<D, R>> {
        let (resolver, rx) = Resolver::channel(mode);
        let (previous, policy) = {
            let mut state = self.lock();
            let previous = state.resolver.replace(resolver);
            state.current = Arc::new(state.current.started(Arc::new(payload), mode));
            tracing::debug!(key = state.current.key, ?mode, "question started");
            (previous, state.policy)
        };

        if let Some(previous) = previous {
            match policy {
                OverlapPolicy::Supersede => {
                    tracing::debug!(mode = ?previous.mode(), "outstanding question superseded");
                    drop(previous);
                }
                OverlapPolicy::CancelPrevious => {
                    tracing::debug!(mode = ?previous.mode(), "outstanding question cancelled by a newer one");
                    previous.settle(Answer::Cancelled(None));
                }
            }
        }

        self.shared.subscribers.notify();
        rx
    }

    /// Answer the outstanding question positively. Returns `false` (and does
    /// nothing) when no question is outstanding.
    pub fn ok(&self, data: D) -> bool {
        self.finish(None, Answer::Ok(data))
    }

    /// Decline the outstanding question without a reason.
    pub fn cancel(&self) -> bool {
        self.finish(None, Answer::Cancelled(None))
    }

    /// Decline the outstanding question with `reason`.
    pub fn cancel_with(&self, reason: R) -> bool {
        self.finish(None, Answer::Cancelled(Some(reason)))
    }

    /// Like [`ok`](Self::ok), but only if question `key` is still the
    /// outstanding one.
    pub fn ok_for(&self, key: u64, data: D) -> bool {
        self.finish(Some(key), Answer::Ok(data))
    }

    /// Like [`cancel`](Self::cancel) / [`cancel_with`](Self::cancel_with),
    /// but only if question `key` is still the outstanding one.
    pub fn cancel_for(&self, key: u64, reason: Option<R>) -> bool {
        self.finish(Some(key), Answer::Cancelled(reason))
    }

    fn finish(&self, key: Option<u64>, answer: Answer<D, R>) -> bool {
        let resolver = {
            let mut state = self.lock();
            if let Some(key) = key {
                if state.current.key != key {
                    tracing::debug!(key, current = state.current.key, "answer for a stale question ignored");
                    return false;
                }
            }
            let Some(resolver) = state.resolver.take() else {
                tracing::trace!(key = state.current.key, "no outstanding question");
                return false;
            };
            state.current = Arc::new(state.current.ended());
            tracing::debug!(
                key = state.current.key,
                mode = ?resolver.mode(),
                answered = answer.is_ok(),
                "question ended"
            );
            resolver
        };

        resolver.settle(answer);
        self.shared.subscribers.notify();
        true
    }

    /// Register `callback` to run after every transition.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.shared.subscribers.subscribe(Arc::new(callback))
    }

    /// The current record. The same `Arc` is returned until the next
    /// transition.
    pub fn snapshot(&self) -> Arc<Question<P>> {
        Arc::clone(&self.lock().current)
    }

    pub fn is_asking(&self) -> bool {
        self.lock().resolver.is_some()
    }

    pub fn policy(&self) -> OverlapPolicy {
        self.lock().policy
    }

    pub fn subscriber_count(&self) -> usize {
        self.shared.subscribers.len()
    }
}

impl<P: fmt::Debug, D, R> fmt::Debug for AskStore<P, D, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("AskStore")
            .field("current", &state.current)
            .field("policy", &state.policy)
            .field("subscribers", &self.shared.subscribers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ask::AskError;
    use futures::FutureExt;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Dialog {
        title: String,
    }

    fn dialog(title: &str) -> Dialog {
        Dialog {
            title: title.to_string(),
        }
    }

    #[tokio::test]
    async fn test_ask_ok_resolves_with_data() {
        let store: AskStore<Dialog, u32, String> = AskStore::new();
        let answer = store.ask(dialog("x"));
        assert!(store.snapshot().asking);

        assert!(store.ok(42));
        assert_eq!(answer.await, Ok(42));
        assert!(!store.snapshot().asking);
    }

    #[tokio::test]
    async fn test_ask_cancel_without_reason() {
        let store: AskStore<Dialog, u32, String> = AskStore::new();
        let answer = store.ask(dialog("x"));
        store.cancel();
        assert_eq!(answer.await, Err(AskError::Cancelled(None)));
        assert!(!store.is_asking());
    }

    #[tokio::test]
    async fn test_ask_cancel_with_exact_reason() {
        let store: AskStore<Dialog, (), Arc<String>> = AskStore::new();
        let reason = Arc::new("r".to_string());
        let answer = store.ask(Dialog::default());
        store.cancel_with(Arc::clone(&reason));

        let err = answer.await.unwrap_err();
        let got = err.into_reason().unwrap();
        assert!(Arc::ptr_eq(&got, &reason));
    }

    #[tokio::test]
    async fn test_safe_ask_ok() {
        let store: AskStore<Dialog, &str, ()> = AskStore::new();
        let answer = store.safe_ask(dialog("x"));
        store.ok("success");
        assert_eq!(answer.await, Answer::Ok("success"));
    }

    #[tokio::test]
    async fn test_safe_ask_cancel_never_fails() {
        let store: AskStore<Dialog, (), String> = AskStore::new();
        let answer = store.safe_ask(dialog("x"));
        store.cancel();
        assert_eq!(answer.await, Answer::Cancelled(None));

        let answer = store.safe_ask(dialog("y"));
        store.cancel_with("reason".to_string());
        assert_eq!(answer.await, Answer::Cancelled(Some("reason".to_string())));
    }

    #[test]
    fn test_asking_flag_is_synchronous() {
        let store: AskStore<Dialog> = AskStore::new();
        assert!(!store.snapshot().asking);
        let _answer = store.ask(dialog("x"));
        assert!(store.snapshot().asking);
        assert_eq!(store.snapshot().mode, Some(AskMode::Throwing));
        store.ok(());
        assert!(!store.snapshot().asking);
        assert_eq!(store.snapshot().mode, None);
    }

    #[test]
    fn test_key_increments_in_both_modes() {
        let store: AskStore<Dialog> = AskStore::new();
        assert_eq!(store.snapshot().key, 0);
        let _a = store.ask(Dialog::default());
        assert_eq!(store.snapshot().key, 1);
        store.cancel();
        assert_eq!(store.snapshot().key, 1);
        let _b = store.safe_ask(Dialog::default());
        assert_eq!(store.snapshot().key, 2);
        store.ok(());
        let _c = store.ask(Dialog::default());
        assert_eq!(store.snapshot().key, 3);
    }

    #[test]
    fn test_answer_while_idle_is_noop() {
        let store: AskStore<Dialog, u8, u8> = AskStore::new();
        let before = store.snapshot();
        let hits = Arc::new(AtomicUsize::new(0));
        let cb_hits = Arc::clone(&hits);
        let _sub = store.subscribe(move || {
            cb_hits.fetch_add(1, Ordering::SeqCst);
        });

        assert!(!store.ok(1));
        assert!(!store.cancel());
        assert!(!store.cancel_with(2));
        assert!(Arc::ptr_eq(&before, &store.snapshot()));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_double_cancel_is_noop() {
        let store: AskStore<Dialog> = AskStore::new();
        let mut answer = store.ask(Dialog::default());
        assert!(store.cancel());
        let ended = store.snapshot();
        assert!(!store.cancel());
        assert!(Arc::ptr_eq(&ended, &store.snapshot()));
        assert_eq!((&mut answer).now_or_never(), Some(Err(AskError::Cancelled(None))));
    }

    #[test]
    fn test_snapshot_identity() {
        let store: AskStore<Dialog> = AskStore::with_payload(dialog("initial"));
        let first = store.snapshot();
        assert!(Arc::ptr_eq(&first, &store.snapshot()));
        assert_eq!(first.payload.title, "initial");

        let _answer = store.ask(dialog("x"));
        let second = store.snapshot();
        assert!(!Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&second, &store.snapshot()));

        store.ok(());
        let third = store.snapshot();
        assert!(!Arc::ptr_eq(&second, &third));
        assert_eq!(third.payload.title, "x");
        assert_eq!(third.key, second.key);
    }

    #[test]
    fn test_overlapping_ask_abandons_first() {
        let store: AskStore<Dialog, u8> = AskStore::new();
        let mut first = store.ask(dialog("first"));
        let first_key = store.snapshot().key;
        let mut second = store.ask(dialog("second"));
        assert_eq!(store.snapshot().key, first_key + 1);

        store.ok(9);
        assert_eq!((&mut second).now_or_never(), Some(Ok(9)));
        // The first question is never settled under the default policy.
        assert!((&mut first).now_or_never().is_none());
        assert!(first.now_or_never().is_none());
    }

    #[test]
    fn test_cancel_previous_policy() {
        let store: AskStore<Dialog, u8, u8> =
            AskStore::with_policy(Dialog::default(), OverlapPolicy::CancelPrevious);
        let mut first = store.safe_ask(dialog("first"));
        let mut second = store.ask(dialog("second"));

        assert_eq!((&mut first).now_or_never(), Some(Answer::Cancelled(None)));
        assert!(store.is_asking());
        store.ok(3);
        assert_eq!((&mut second).now_or_never(), Some(Ok(3)));
    }

    #[test]
    fn test_subscribers_see_post_mutation_state() {
        let store: AskStore<Dialog> = AskStore::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let cb_store = store.clone();
        let cb_seen = Arc::clone(&seen);
        let _sub = store.subscribe(move || {
            let snap = cb_store.snapshot();
            cb_seen.lock().unwrap().push((snap.key, snap.asking));
        });

        let _answer = store.ask(Dialog::default());
        store.ok(());
        assert_eq!(*seen.lock().unwrap(), vec![(1, true), (1, false)]);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let store: AskStore<Dialog> = AskStore::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let cb_hits = Arc::clone(&hits);
        let mut sub = store.subscribe(move || {
            cb_hits.fetch_add(1, Ordering::SeqCst);
        });

        let _answer = store.ask(Dialog::default());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        sub.unsubscribe();
        sub.unsubscribe();
        store.ok(());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn test_reentrant_ask_from_subscriber() {
        let store: AskStore<Dialog, u8> = AskStore::new();
        let follow_up = Arc::new(Mutex::new(None));
        let cb_store = store.clone();
        let cb_follow_up = Arc::clone(&follow_up);
        let _sub = store.subscribe(move || {
            let snap = cb_store.snapshot();
            if !snap.asking && snap.key == 1 {
                // Ending must be fully written before we get here.
                assert!(!cb_store.is_asking());
                *cb_follow_up.lock().unwrap() = Some(cb_store.ask(dialog("again")));
            }
        });

        let mut first = store.ask(dialog("first"));
        store.ok(1);
        assert_eq!((&mut first).now_or_never(), Some(Ok(1)));
        assert_eq!(store.snapshot().key, 2);
        assert!(store.is_asking());

        store.ok(2);
        let mut second = follow_up.lock().unwrap().take().unwrap();
        assert_eq!((&mut second).now_or_never(), Some(Ok(2)));
    }

    #[test]
    fn test_stale_key_answers_are_ignored() {
        let store: AskStore<Dialog, u8> = AskStore::new();
        let _first = store.ask(dialog("first"));
        let stale = store.snapshot().key;
        let mut second = store.ask(dialog("second"));

        assert!(!store.ok_for(stale, 1));
        assert!(store.is_asking());
        assert!(store.ok_for(store.snapshot().key, 2));
        assert_eq!((&mut second).now_or_never(), Some(Ok(2)));
    }

    #[tokio::test]
    async fn test_answer_from_another_task() {
        let store: AskStore<Dialog, String> = AskStore::new();
        let answer = store.ask(dialog("name?"));
        let responder = store.clone();
        tokio::spawn(async move {
            responder.ok("crab".to_string());
        });
        assert_eq!(answer.await, Ok("crab".to_string()));
    }
}
