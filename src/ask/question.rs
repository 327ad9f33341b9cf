use super::answer::AskMode;
use std::sync::Arc;

/// Immutable snapshot of a store's current question.
///
/// A store never mutates a published record; every transition publishes a new
/// `Arc<Question<P>>`, so `Arc::ptr_eq` tells a view whether anything changed.
#[derive(Debug)]
pub struct Question<P> {
    /// Identity of the question, bumped on every `ask`/`safe_ask`.
    pub key: u64,
    pub payload: Arc<P>,
    /// True exactly while the question is outstanding.
    pub asking: bool,
    /// Answer mode of the outstanding question, `None` when idle.
    pub mode: Option<AskMode>,
}

impl<P> Question<P> {
    pub(crate) fn idle(payload: Arc<P>) -> Self {
        Self {
            key: 0,
            payload,
            asking: false,
            mode: None,
        }
    }

    /// The record that follows `self` when a new question starts.
    pub(crate) fn started(&self, payload: Arc<P>, mode: AskMode) -> Self {
        Self {
            key: self.key + 1,
            payload,
            asking: true,
            mode: Some(mode),
        }
    }

    /// The record that follows `self` once it has been answered. Keeps `key`
    /// and `payload` so a closing dialog still has its content.
    pub(crate) fn ended(&self) -> Self {
        Self {
            key: self.key,
            payload: Arc::clone(&self.payload),
            asking: false,
            mode: None,
        }
    }
}
