use crate::app::dialogs::Dismissal;
use askbox::Answer;
use crossterm::event::Event as CrosstermEvent;

/// Which dialog produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Confirm,
    DeleteForm,
    Rename,
}

impl DialogKind {
    pub fn label(self) -> &'static str {
        match self {
            DialogKind::Confirm => "confirm",
            DialogKind::DeleteForm => "delete-form",
            DialogKind::Rename => "rename",
        }
    }
}

/// What the user answered, as reported back to the event loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Confirmed,
    Renamed(String),
    Declined(Option<Dismissal>),
}

/// The result of one awaited question.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub dialog: DialogKind,
    pub repository: String,
    pub verdict: Verdict,
}

impl Decision {
    pub fn from_confirm(dialog: DialogKind, repository: String, answer: Answer<bool, Dismissal>) -> Self {
        let verdict = match answer {
            Answer::Ok(true) => Verdict::Confirmed,
            Answer::Ok(false) => Verdict::Declined(None),
            Answer::Cancelled(reason) => Verdict::Declined(reason),
        };
        Self {
            dialog,
            repository,
            verdict,
        }
    }
}

#[derive(Debug)]
pub enum AppEvent {
    /// Terminal input event
    Terminal(CrosstermEvent),

    /// A bound question store changed state
    StoreChanged,

    /// An awaited question was answered (or declined)
    Answered(Decision),

    /// The rename question numbered `key` ran out of time
    RenameTimedOut { key: u64 },

    /// Tick for UI refresh
    Tick,
}
