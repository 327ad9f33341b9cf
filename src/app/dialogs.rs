//! The application's question stores and their payloads.
//!
//! Two shared stores back the modal dialogs: a yes/no confirmer and a
//! "type the repository name" delete form. Each is bound to the event loop so
//! every transition schedules a redraw.

use crate::app::event::AppEvent;
use crate::config::model::{AskConfig, ConfirmDefaults};
use askbox::ask::{Answer, AskError, AskStore, Binding, OverlapPolicy};
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;

/// Why a dialog was dismissed without an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dismissal {
    Escape,
    Timeout,
}

impl std::fmt::Display for Dismissal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dismissal::Escape => write!(f, "dismissed"),
            Dismissal::Timeout => write!(f, "timed out"),
        }
    }
}

/// Payload of the confirm dialog. Unset fields fall back to the configured
/// defaults when rendered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfirmOptions {
    pub title: Option<String>,
    pub description: Option<String>,
    pub action_text: Option<String>,
    pub cancel_text: Option<String>,
    pub destructive: bool,
}

/// [`ConfirmOptions`] with every text filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfirm {
    pub title: String,
    pub description: String,
    pub action_text: String,
    pub cancel_text: String,
    pub destructive: bool,
}

impl ConfirmOptions {
    pub fn resolve(&self, defaults: &ConfirmDefaults) -> ResolvedConfirm {
        ResolvedConfirm {
            title: self.title.clone().unwrap_or_else(|| defaults.title.clone()),
            description: self.description.clone().unwrap_or_default(),
            action_text: self
                .action_text
                .clone()
                .unwrap_or_else(|| defaults.action_text.clone()),
            cancel_text: self
                .cancel_text
                .clone()
                .unwrap_or_else(|| defaults.cancel_text.clone()),
            destructive: self.destructive,
        }
    }
}

/// Payload of the delete form: the name the user has to type back.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteForm {
    pub repository: String,
}

impl DeleteForm {
    pub fn accepts(&self, typed: &str) -> bool {
        !typed.is_empty() && typed == self.repository
    }
}

pub type ConfirmStore = AskStore<ConfirmOptions, bool, Dismissal>;
pub type DeleteFormStore = AskStore<DeleteForm, String, Dismissal>;

/// Stores plus the bindings the renderer reads them through.
pub struct Dialogs {
    pub confirm: ConfirmStore,
    pub confirm_view: Binding<ConfirmOptions, bool, Dismissal>,
    pub delete_form: DeleteFormStore,
    pub delete_form_view: Binding<DeleteForm, String, Dismissal>,
    pub timeout: Option<Duration>,
}

impl Dialogs {
    pub fn new(config: &AskConfig, event_tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        let confirm = ConfirmStore::with_policy(ConfirmOptions::default(), config.overlap);
        let delete_form = DeleteFormStore::with_policy(DeleteForm::default(), config.overlap);

        let tx = event_tx.clone();
        let confirm_view = confirm.bind(move || {
            let _ = tx.send(AppEvent::StoreChanged);
        });
        let delete_form_view = delete_form.bind(move || {
            let _ = event_tx.send(AppEvent::StoreChanged);
        });

        Self {
            confirm,
            confirm_view,
            delete_form,
            delete_form_view,
            timeout: config.timeout_secs.filter(|s| *s > 0).map(Duration::from_secs),
        }
    }

    pub fn overlap(&self) -> OverlapPolicy {
        self.confirm.policy()
    }
}

/// Await `answer`, cancelling the question with [`Dismissal::Timeout`] if
/// nobody answers within `limit`.
///
/// `cancel` must settle the question `answer` belongs to; after it runs the
/// future is awaited again to pick up that cancellation.
pub async fn answer_within<F, C>(mut answer: F, limit: Option<Duration>, cancel: C) -> F::Output
where
    F: Future + Unpin,
    C: FnOnce(),
{
    let Some(limit) = limit else {
        return answer.await;
    };
    match tokio::time::timeout(limit, &mut answer).await {
        Ok(output) => output,
        Err(_) => {
            tracing::info!(?limit, "question timed out");
            cancel();
            answer.await
        }
    }
}

/// Throwing-mode answers collapsed into the safe-mode shape for reporting.
pub fn flatten<D>(result: Result<D, AskError<Dismissal>>) -> Answer<D, Dismissal> {
    match result {
        Ok(data) => Answer::Ok(data),
        Err(err) => Answer::Cancelled(err.into_reason()),
    }
}
