use crate::app::dialogs::Dismissal;
use crate::app::event::{Decision, Verdict};
use crate::config::AppConfig;
use askbox::ask::{LocalAsk, SafeAsked};
use std::collections::HashSet;
use std::time::{Duration, Instant};

const MAX_HISTORY: usize = 200;
const STATUS_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Default)]
pub struct InputState {
    pub text: String,
    pub cursor: usize,
}

impl InputState {
    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn delete_back(&mut self) {
        if self.cursor > 0 {
            let prev = self.text[..self.cursor]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.text.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.text[..self.cursor]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.text.len() {
            self.cursor = self.text[self.cursor..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor + i)
                .unwrap_or(self.text.len());
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.len();
    }

    pub fn set(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = self.text.len();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }
}

/// Input state of a store-backed dialog, tied to the question it was opened for.
#[derive(Debug, Default)]
pub struct KeyedInput {
    pub key: u64,
    pub input: InputState,
}

impl KeyedInput {
    /// Start over when the store has moved on to another question.
    pub fn sync(&mut self, key: u64) {
        if self.key != key {
            self.key = key;
            self.input.clear();
        }
    }
}

/// Which confirm button has focus, reset to the action button per question.
#[derive(Debug, Default)]
pub struct ConfirmFocus {
    pub key: u64,
    pub on_cancel: bool,
}

impl ConfirmFocus {
    pub fn sync(&mut self, key: u64) {
        if self.key != key {
            self.key = key;
            self.on_cancel = false;
        }
    }

    pub fn toggle(&mut self) {
        self.on_cancel = !self.on_cancel;
    }
}

/// Rename widget. Owns its question instead of sharing a store.
///
/// `key` counts the questions opened so far, so a late timeout can tell
/// whether the question it belongs to is still the one on screen.
#[derive(Debug, Default)]
pub struct RenameWidget {
    pub ask: LocalAsk<String, Dismissal>,
    pub key: u64,
    pub repository: String,
    pub input: InputState,
}

impl RenameWidget {
    pub fn open(&mut self, repository: &str) -> SafeAsked<String, Dismissal> {
        self.key += 1;
        self.repository = repository.to_string();
        self.input.set(repository);
        self.ask.safe_ask()
    }

    /// Dismiss the question numbered `key` if it is still open.
    pub fn expire(&mut self, key: u64) -> bool {
        key == self.key && self.ask.cancel_with(Dismissal::Timeout)
    }

    pub fn visible(&self) -> bool {
        self.ask.asking()
    }
}

pub struct AppState {
    pub config: AppConfig,
    pub repositories: Vec<String>,
    pub selected: usize,
    pub confirm_focus: ConfirmFocus,
    pub delete_input: KeyedInput,
    pub rename: RenameWidget,
    /// Repositories with a question whose outcome has not been applied yet.
    pub in_flight: HashSet<String>,
    pub history: Vec<Decision>,
    pub new_decisions: Vec<Decision>,
    pub status_message: Option<(String, Instant)>,
    pub should_quit: bool,
    pub dirty: bool,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let repositories = config.repositories.clone();
        Self {
            config,
            repositories,
            selected: 0,
            confirm_focus: ConfirmFocus::default(),
            delete_input: KeyedInput::default(),
            rename: RenameWidget::default(),
            in_flight: HashSet::new(),
            history: Vec::new(),
            new_decisions: Vec::new(),
            status_message: None,
            should_quit: false,
            dirty: true,
        }
    }

    pub fn selected_repository(&self) -> Option<&str> {
        self.repositories.get(self.selected).map(String::as_str)
    }

    pub fn select_next(&mut self) {
        if !self.repositories.is_empty() {
            self.selected = (self.selected + 1) % self.repositories.len();
            self.dirty = true;
        }
    }

    pub fn select_prev(&mut self) {
        if !self.repositories.is_empty() {
            self.selected = if self.selected == 0 {
                self.repositories.len() - 1
            } else {
                self.selected - 1
            };
            self.dirty = true;
        }
    }

    pub fn set_status(&mut self, text: String) {
        self.status_message = Some((text, Instant::now()));
        self.dirty = true;
    }

    /// Drop the status message once it has been shown long enough.
    pub fn expire_status(&mut self, now: Instant) {
        if let Some((_, since)) = &self.status_message {
            if now.duration_since(*since) >= STATUS_TTL {
                self.status_message = None;
                self.dirty = true;
            }
        }
    }

    pub fn status_line(&self) -> String {
        if let Some((msg, _)) = &self.status_message {
            return msg.clone();
        }
        let confirmed = self
            .history
            .iter()
            .filter(|d| !matches!(d.verdict, Verdict::Declined(_)))
            .count();
        format!(
            "Repositories: {} | Answered: {}/{}",
            self.repositories.len(),
            confirmed,
            self.history.len()
        )
    }

    /// Claim `repository` for a new question. Fails while an earlier question
    /// about it is still waiting for its outcome to be applied.
    pub fn begin_question(&mut self, repository: &str) -> bool {
        if self.in_flight.insert(repository.to_string()) {
            true
        } else {
            self.set_status(format!("{} is awaiting an answer", repository));
            false
        }
    }

    /// Apply an answered question to the repository list.
    pub fn apply_decision(&mut self, decision: Decision) {
        self.in_flight.remove(&decision.repository);
        let status = match &decision.verdict {
            Verdict::Confirmed => {
                if self.remove_repository(&decision.repository) {
                    format!("Deleted {}", decision.repository)
                } else {
                    format!("{} not found", decision.repository)
                }
            }
            Verdict::Renamed(new_name) => {
                match self
                    .repositories
                    .iter_mut()
                    .find(|r| **r == decision.repository)
                {
                    Some(repo) => {
                        *repo = new_name.clone();
                        format!("Renamed {} to {}", decision.repository, new_name)
                    }
                    None => format!("{} not found", decision.repository),
                }
            }
            Verdict::Declined(Some(reason)) => {
                format!("Kept {} ({} {})", decision.repository, decision.dialog.label(), reason)
            }
            Verdict::Declined(None) => format!("Kept {}", decision.repository),
        };
        self.set_status(status);
        self.new_decisions.push(decision.clone());
        self.history.push(decision);
        if self.history.len() > MAX_HISTORY {
            self.history.remove(0);
        }
    }

    fn remove_repository(&mut self, name: &str) -> bool {
        let before = self.repositories.len();
        self.repositories.retain(|r| r != name);
        if self.selected >= self.repositories.len() {
            self.selected = self.repositories.len().saturating_sub(1);
        }
        self.repositories.len() != before
    }
}
