use crate::app::action::Action;
use crate::app::dialogs::{Dialogs, Dismissal};
use crate::app::event::AppEvent;
use crate::app::state::*;
use anyhow::Result;
use crossterm::event::{Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Instant;

pub fn handle_event(state: &mut AppState, dialogs: &Dialogs, event: AppEvent) -> Result<Vec<Action>> {
    match event {
        AppEvent::Terminal(cevent) => {
            state.dirty = true;
            handle_terminal(state, dialogs, cevent)
        }
        AppEvent::StoreChanged => {
            state.confirm_focus.sync(dialogs.confirm.snapshot().key);
            state.delete_input.sync(dialogs.delete_form.snapshot().key);
            state.dirty = true;
            Ok(vec![])
        }
        AppEvent::Answered(decision) => {
            tracing::info!(
                dialog = decision.dialog.label(),
                repository = %decision.repository,
                verdict = ?decision.verdict,
                "question answered"
            );
            state.apply_decision(decision);
            Ok(vec![])
        }
        AppEvent::RenameTimedOut { key } => {
            if state.rename.expire(key) {
                tracing::info!(key, "rename question timed out");
                state.dirty = true;
            }
            Ok(vec![])
        }
        AppEvent::Tick => {
            state.expire_status(Instant::now());
            Ok(vec![])
        }
    }
}

fn handle_terminal(state: &mut AppState, dialogs: &Dialogs, event: CEvent) -> Result<Vec<Action>> {
    match event {
        CEvent::Key(key) if key.kind != KeyEventKind::Release => handle_key(state, dialogs, key),
        _ => Ok(vec![]),
    }
}

fn handle_key(state: &mut AppState, dialogs: &Dialogs, key: KeyEvent) -> Result<Vec<Action>> {
    // Global keybindings
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Ok(vec![Action::Quit]);
    }

    // Open dialogs capture all input, confirmer first
    let confirm = dialogs.confirm_view.prompt()?;
    if confirm.asking() {
        match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab => {
                state.confirm_focus.toggle();
            }
            KeyCode::Char('y') => {
                confirm.ok(true);
            }
            KeyCode::Char('n') => {
                confirm.cancel();
            }
            KeyCode::Enter => {
                if state.confirm_focus.on_cancel {
                    confirm.cancel();
                } else {
                    confirm.ok(true);
                }
            }
            KeyCode::Esc => {
                confirm.cancel_with(Dismissal::Escape);
            }
            _ => {}
        }
        return Ok(vec![]);
    }

    let form = dialogs.delete_form_view.prompt()?;
    if form.asking() {
        let input = &mut state.delete_input.input;
        match key.code {
            KeyCode::Esc => {
                form.cancel_with(Dismissal::Escape);
            }
            KeyCode::Enter => {
                if form.payload().accepts(&input.text) {
                    form.ok(input.text.clone());
                } else {
                    let hint = format!("Type \"{}\" to confirm", form.payload().repository);
                    state.set_status(hint);
                }
            }
            _ => edit_input(input, key),
        }
        return Ok(vec![]);
    }

    if state.rename.visible() {
        match key.code {
            KeyCode::Esc => {
                state.rename.ask.cancel_with(Dismissal::Escape);
            }
            KeyCode::Enter => {
                let name = state.rename.input.text.trim().to_string();
                if name.is_empty() {
                    state.set_status("Name cannot be empty".to_string());
                } else if name != state.rename.repository && state.repositories.contains(&name) {
                    state.set_status(format!("{} already exists", name));
                } else {
                    state.rename.ask.ok(name);
                }
            }
            _ => edit_input(&mut state.rename.input, key),
        }
        return Ok(vec![]);
    }

    Ok(handle_list_key(state, key))
}

fn handle_list_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    match key.code {
        KeyCode::Char('q') => vec![Action::Quit],
        KeyCode::Up | KeyCode::Char('k') => {
            state.select_prev();
            vec![]
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.select_next();
            vec![]
        }
        KeyCode::Char('d') | KeyCode::Delete => match claim_selected(state) {
            Some(repository) => vec![Action::ConfirmDelete { repository }],
            None => vec![],
        },
        KeyCode::Char('D') => match claim_selected(state) {
            Some(repository) => vec![Action::TypeToDelete { repository }],
            None => vec![],
        },
        KeyCode::Char('r') => {
            let Some(repository) = claim_selected(state) else {
                return vec![];
            };
            let answer = state.rename.open(&repository);
            vec![Action::AwaitRename {
                repository,
                key: state.rename.key,
                answer,
            }]
        }
        _ => vec![],
    }
}

/// The selected repository, unless a question about it is still in flight.
fn claim_selected(state: &mut AppState) -> Option<String> {
    let repo = state.selected_repository()?.to_string();
    state.begin_question(&repo).then_some(repo)
}

fn edit_input(input: &mut InputState, key: KeyEvent) {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => input.insert_char(c),
        KeyCode::Backspace => input.delete_back(),
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.move_home(),
        KeyCode::End => input.move_end(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::dialogs::{ConfirmOptions, DeleteForm};
    use crate::app::event::{Decision, DialogKind, Verdict};
    use crate::config::model::AskConfig;
    use crate::config::AppConfig;
    use askbox::Answer;
    use futures::FutureExt;
    use tokio::sync::mpsc;

    fn setup() -> (AppState, Dialogs, mpsc::UnboundedReceiver<AppEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut config = AppConfig::default();
        config.repositories = vec!["junwen-k/use-ask".into(), "crab/chat".into()];
        let dialogs = Dialogs::new(&AskConfig::default(), tx);
        (AppState::new(config), dialogs, rx)
    }

    fn press(code: KeyCode) -> AppEvent {
        AppEvent::Terminal(CEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    #[test]
    fn test_d_requests_confirmation() {
        let (mut state, dialogs, _rx) = setup();
        let actions = handle_event(&mut state, &dialogs, press(KeyCode::Char('d'))).unwrap();
        assert!(matches!(
            actions.as_slice(),
            [Action::ConfirmDelete { repository }] if repository == "junwen-k/use-ask"
        ));
    }

    #[test]
    fn test_enter_confirms_open_question() {
        let (mut state, dialogs, mut rx) = setup();
        let mut answer = dialogs.confirm.safe_ask(ConfirmOptions::default());
        assert!(matches!(rx.try_recv(), Ok(AppEvent::StoreChanged)));
        handle_event(&mut state, &dialogs, AppEvent::StoreChanged).unwrap();

        handle_event(&mut state, &dialogs, press(KeyCode::Enter)).unwrap();
        assert_eq!((&mut answer).now_or_never(), Some(Answer::Ok(true)));
        assert!(!dialogs.confirm.is_asking());
    }

    #[test]
    fn test_focus_on_cancel_button() {
        let (mut state, dialogs, _rx) = setup();
        let mut answer = dialogs.confirm.safe_ask(ConfirmOptions::default());
        handle_event(&mut state, &dialogs, AppEvent::StoreChanged).unwrap();

        handle_event(&mut state, &dialogs, press(KeyCode::Tab)).unwrap();
        handle_event(&mut state, &dialogs, press(KeyCode::Enter)).unwrap();
        assert_eq!((&mut answer).now_or_never(), Some(Answer::Cancelled(None)));
    }

    #[test]
    fn test_escape_dismisses_with_reason() {
        let (mut state, dialogs, _rx) = setup();
        let mut answer = dialogs.confirm.ask(ConfirmOptions::default());
        handle_event(&mut state, &dialogs, press(KeyCode::Esc)).unwrap();
        let err = (&mut answer).now_or_never().unwrap().unwrap_err();
        assert_eq!(err.reason(), Some(&Dismissal::Escape));
    }

    #[test]
    fn test_delete_form_validates_typed_name() {
        let (mut state, dialogs, _rx) = setup();
        let mut answer = dialogs.delete_form.ask(DeleteForm {
            repository: "crab/chat".into(),
        });
        handle_event(&mut state, &dialogs, AppEvent::StoreChanged).unwrap();

        for c in "crab".chars() {
            handle_event(&mut state, &dialogs, press(KeyCode::Char(c))).unwrap();
        }
        handle_event(&mut state, &dialogs, press(KeyCode::Enter)).unwrap();
        assert!(dialogs.delete_form.is_asking());

        for c in "/chat".chars() {
            handle_event(&mut state, &dialogs, press(KeyCode::Char(c))).unwrap();
        }
        handle_event(&mut state, &dialogs, press(KeyCode::Enter)).unwrap();
        assert_eq!((&mut answer).now_or_never(), Some(Ok("crab/chat".to_string())));
    }

    #[test]
    fn test_new_question_resets_form_input() {
        let (mut state, dialogs, _rx) = setup();
        let _first = dialogs.delete_form.ask(DeleteForm::default());
        handle_event(&mut state, &dialogs, AppEvent::StoreChanged).unwrap();
        handle_event(&mut state, &dialogs, press(KeyCode::Char('x'))).unwrap();
        assert_eq!(state.delete_input.input.text, "x");

        dialogs.delete_form.cancel();
        let _second = dialogs.delete_form.ask(DeleteForm::default());
        handle_event(&mut state, &dialogs, AppEvent::StoreChanged).unwrap();
        assert!(state.delete_input.input.text.is_empty());
    }

    #[test]
    fn test_rename_through_local_question() {
        let (mut state, dialogs, _rx) = setup();
        let actions = handle_event(&mut state, &dialogs, press(KeyCode::Char('r'))).unwrap();
        let Some(Action::AwaitRename { mut answer, .. }) = actions.into_iter().next() else {
            panic!("expected a rename question");
        };
        assert!(state.rename.visible());

        handle_event(&mut state, &dialogs, press(KeyCode::Backspace)).unwrap();
        handle_event(&mut state, &dialogs, press(KeyCode::Char('x'))).unwrap();
        handle_event(&mut state, &dialogs, press(KeyCode::Enter)).unwrap();
        assert_eq!((&mut answer).now_or_never(), Some(Answer::Ok("junwen-k/use-asx".to_string())));
        assert!(!state.rename.visible());
    }

    #[test]
    fn test_second_rename_waits_for_first_outcome() {
        let (mut state, dialogs, _rx) = setup();
        state.repositories = vec!["a".into(), "z".into()];

        let actions = handle_event(&mut state, &dialogs, press(KeyCode::Char('r'))).unwrap();
        let Some(Action::AwaitRename { mut answer, .. }) = actions.into_iter().next() else {
            panic!("expected a rename question");
        };
        handle_event(&mut state, &dialogs, press(KeyCode::Backspace)).unwrap();
        handle_event(&mut state, &dialogs, press(KeyCode::Char('b'))).unwrap();
        handle_event(&mut state, &dialogs, press(KeyCode::Enter)).unwrap();
        assert_eq!((&mut answer).now_or_never(), Some(Answer::Ok("b".to_string())));

        // Outcome not applied yet: the list still says "a"
        let actions = handle_event(&mut state, &dialogs, press(KeyCode::Char('r'))).unwrap();
        assert!(actions.is_empty());
        assert!(!state.rename.visible());
        assert_eq!(state.status_line(), "a is awaiting an answer");
        let actions = handle_event(&mut state, &dialogs, press(KeyCode::Char('d'))).unwrap();
        assert!(actions.is_empty());

        let decision = Decision {
            dialog: DialogKind::Rename,
            repository: "a".into(),
            verdict: Verdict::Renamed("b".into()),
        };
        handle_event(&mut state, &dialogs, AppEvent::Answered(decision)).unwrap();
        assert_eq!(state.repositories, vec!["b", "z"]);

        let actions = handle_event(&mut state, &dialogs, press(KeyCode::Char('r'))).unwrap();
        assert!(matches!(
            actions.as_slice(),
            [Action::AwaitRename { repository, .. }] if repository == "b"
        ));
        assert_eq!(state.rename.input.text, "b");
    }

    #[test]
    fn test_rename_timeout_dismisses_matching_question() {
        let (mut state, dialogs, _rx) = setup();
        let actions = handle_event(&mut state, &dialogs, press(KeyCode::Char('r'))).unwrap();
        let Some(Action::AwaitRename { key, mut answer, .. }) = actions.into_iter().next() else {
            panic!("expected a rename question");
        };

        handle_event(&mut state, &dialogs, AppEvent::RenameTimedOut { key: key + 1 }).unwrap();
        assert!(state.rename.visible());

        handle_event(&mut state, &dialogs, AppEvent::RenameTimedOut { key }).unwrap();
        assert!(!state.rename.visible());
        assert_eq!(
            (&mut answer).now_or_never(),
            Some(Answer::Cancelled(Some(Dismissal::Timeout)))
        );
    }

    #[test]
    fn test_detached_view_fails_fast() {
        let (mut state, mut dialogs, _rx) = setup();
        dialogs.confirm_view.detach();
        assert!(handle_event(&mut state, &dialogs, press(KeyCode::Char('d'))).is_err());
    }
}
