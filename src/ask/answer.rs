//! Answer types and the futures handed back by `ask` / `safe_ask`.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// How a question reports a decline to the caller that asked it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AskMode {
    /// `cancel` fails the caller's future with [`AskError::Cancelled`].
    Throwing,
    /// `cancel` resolves the caller's future with [`Answer::Cancelled`].
    Safe,
}

/// Outcome of a question asked in safe mode. Declining is data, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer<D, R> {
    Ok(D),
    Cancelled(Option<R>),
}

impl<D, R> Answer<D, R> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Answer::Ok(_))
    }

    pub fn data(self) -> Option<D> {
        match self {
            Answer::Ok(data) => Some(data),
            Answer::Cancelled(_) => None,
        }
    }

    /// Convert into the throwing-mode representation.
    pub fn into_result(self) -> Result<D, AskError<R>> {
        match self {
            Answer::Ok(data) => Ok(data),
            Answer::Cancelled(reason) => Err(AskError::Cancelled(reason)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AskError<R> {
    /// The question was declined, optionally with a caller-supplied reason.
    #[error("question was cancelled")]
    Cancelled(Option<R>),
    /// A binding was used after it had been detached from its store.
    #[error("binding is detached from its store")]
    Detached,
}

impl<R> AskError<R> {
    pub fn reason(&self) -> Option<&R> {
        match self {
            AskError::Cancelled(reason) => reason.as_ref(),
            AskError::Detached => None,
        }
    }

    pub fn into_reason(self) -> Option<R> {
        match self {
            AskError::Cancelled(reason) => reason,
            AskError::Detached => None,
        }
    }
}

/// Receiving half shared by both answer futures.
///
/// A question whose sender is dropped without an answer (superseded by a newer
/// question, or its store dropped) never resolves.
#[derive(Debug)]
struct Pending<D, R> {
    rx: oneshot::Receiver<Answer<D, R>>,
    abandoned: bool,
}

impl<D, R> Pending<D, R> {
    fn poll_answer(&mut self, cx: &mut Context<'_>) -> Poll<Answer<D, R>> {
        if self.abandoned {
            return Poll::Pending;
        }
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(answer)) => Poll::Ready(answer),
            Poll::Ready(Err(_)) => {
                self.abandoned = true;
                tracing::trace!("question abandoned before it was answered");
                Poll::Pending
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Future returned by `ask`. Fails with [`AskError::Cancelled`] on decline.
#[derive(Debug)]
#[must_use = "futures do nothing unless awaited"]
pub struct Asked<D, R> {
    pending: Pending<D, R>,
}

impl<D, R> Asked<D, R> {
    pub(crate) fn new(rx: oneshot::Receiver<Answer<D, R>>) -> Self {
        Self {
            pending: Pending {
                rx,
                abandoned: false,
            },
        }
    }
}

impl<D, R> Future for Asked<D, R> {
    type Output = Result<D, AskError<R>>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.get_mut()
            .pending
            .poll_answer(cx)
            .map(Answer::into_result)
    }
}

/// Future returned by `safe_ask`. Always resolves with an [`Answer`].
#[derive(Debug)]
#[must_use = "futures do nothing unless awaited"]
pub struct SafeAsked<D, R> {
    pending: Pending<D, R>,
}

impl<D, R> SafeAsked<D, R> {
    pub(crate) fn new(rx: oneshot::Receiver<Answer<D, R>>) -> Self {
        Self {
            pending: Pending {
                rx,
                abandoned: false,
            },
        }
    }
}

impl<D, R> Future for SafeAsked<D, R> {
    type Output = Answer<D, R>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.get_mut().pending.poll_answer(cx)
    }
}

/// Sending half held by a store (or a [`LocalAsk`](super::LocalAsk)) until
/// the question is answered.
#[derive(Debug)]
pub(crate) struct Resolver<D, R> {
    tx: oneshot::Sender<Answer<D, R>>,
    mode: AskMode,
}

impl<D, R> Resolver<D, R> {
    /// Create the sender/receiver pair for one question.
    pub(crate) fn channel(mode: AskMode) -> (Self, oneshot::Receiver<Answer<D, R>>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx, mode }, rx)
    }

    pub(crate) fn mode(&self) -> AskMode {
        self.mode
    }

    /// Deliver the answer. A caller that dropped its future is not an error.
    pub(crate) fn settle(self, answer: Answer<D, R>) {
        if self.tx.send(answer).is_err() {
            tracing::trace!(mode = ?self.mode, "answer dropped, caller stopped waiting");
        }
    }
}
