mod app;
mod config;
mod logging;
mod ui;

use crate::app::action::Action;
use crate::app::dialogs::{answer_within, flatten, ConfirmOptions, DeleteForm, Dialogs, Dismissal};
use crate::app::event::{AppEvent, Decision, DialogKind, Verdict};
use crate::app::handler;
use crate::app::state::*;
use crate::logging::DecisionLog;
use anyhow::Result;
use askbox::Answer;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::prelude::*;
use std::io;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<()> {
    // Install panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original_hook(info);
    }));

    // Load config, seeding the file on first run
    let cfg = config::load_config()?;
    if !config::config_exists() {
        if let Err(e) = config::save_config(&cfg) {
            eprintln!("Warning: could not write default config: {:#}", e);
        }
    }
    logging::init_tracing(&cfg.logging)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, cfg).await;

    // Restore terminal
    restore_terminal()?;

    if let Err(e) = result {
        tracing::error!(error = %e, "app exited with an error");
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    cfg: config::AppConfig,
) -> Result<()> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<AppEvent>();

    let mut state = AppState::new(cfg.clone());
    let mut dialogs = Dialogs::new(&cfg.ask, event_tx.clone());
    let mut decision_log = DecisionLog::new(&cfg.logging, &cfg.ui.timestamp_format);
    tracing::info!(
        repositories = state.repositories.len(),
        overlap = ?dialogs.overlap(),
        timeout = ?dialogs.timeout,
        "askbox started"
    );

    // Spawn terminal input task
    let term_tx = event_tx.clone();
    tokio::spawn(async move {
        let mut reader = EventStream::new();
        loop {
            match reader.next().await {
                Some(Ok(event)) => {
                    if term_tx.send(AppEvent::Terminal(event)).is_err() {
                        break;
                    }
                }
                Some(Err(_)) => break,
                None => break,
            }
        }
    });

    // Spawn tick task
    let tick_tx = event_tx.clone();
    let tick_rate = std::time::Duration::from_millis(cfg.ui.tick_rate_ms.max(16));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick_rate);
        loop {
            interval.tick().await;
            if tick_tx.send(AppEvent::Tick).is_err() {
                break;
            }
        }
    });

    // Initial render
    draw(terminal, &mut state, &mut dialogs)?;

    // Main event loop
    loop {
        let event = event_rx.recv().await;
        let Some(event) = event else { break };

        let actions = handler::handle_event(&mut state, &dialogs, event)?;

        // Drain new decisions for logging
        for decision in state.new_decisions.drain(..) {
            decision_log.log_decision(&decision);
        }

        // Process actions
        for action in actions {
            match action {
                Action::ConfirmDelete { repository } => {
                    let answer = dialogs.confirm.safe_ask(ConfirmOptions {
                        title: Some(format!("Delete {}?", repository)),
                        description: Some(
                            "This action cannot be undone. The repository and its history will be removed."
                                .to_string(),
                        ),
                        action_text: Some("Delete".to_string()),
                        cancel_text: None,
                        destructive: true,
                    });
                    let key = dialogs.confirm.snapshot().key;
                    let store = dialogs.confirm.clone();
                    let limit = dialogs.timeout;
                    let tx = event_tx.clone();
                    tokio::spawn(async move {
                        let answer = answer_within(answer, limit, move || {
                            store.cancel_for(key, Some(Dismissal::Timeout));
                        })
                        .await;
                        let decision = Decision::from_confirm(DialogKind::Confirm, repository, answer);
                        let _ = tx.send(AppEvent::Answered(decision));
                    });
                }
                Action::TypeToDelete { repository } => {
                    let answer = dialogs.delete_form.ask(DeleteForm {
                        repository: repository.clone(),
                    });
                    let key = dialogs.delete_form.snapshot().key;
                    let store = dialogs.delete_form.clone();
                    let limit = dialogs.timeout;
                    let tx = event_tx.clone();
                    tokio::spawn(async move {
                        let result = answer_within(answer, limit, move || {
                            store.cancel_for(key, Some(Dismissal::Timeout));
                        })
                        .await;
                        let verdict = match flatten(result) {
                            Answer::Ok(_) => Verdict::Confirmed,
                            Answer::Cancelled(reason) => Verdict::Declined(reason),
                        };
                        let _ = tx.send(AppEvent::Answered(Decision {
                            dialog: DialogKind::DeleteForm,
                            repository,
                            verdict,
                        }));
                    });
                }
                Action::AwaitRename {
                    repository,
                    key,
                    answer,
                } => {
                    let limit = dialogs.timeout;
                    let tx = event_tx.clone();
                    tokio::spawn(async move {
                        // The widget lives in the loop's state, so the loop does the cancelling
                        let expire_tx = tx.clone();
                        let answer = answer_within(answer, limit, move || {
                            let _ = expire_tx.send(AppEvent::RenameTimedOut { key });
                        })
                        .await;
                        let verdict = match answer {
                            Answer::Ok(name) if name == repository => Verdict::Declined(None),
                            Answer::Ok(name) => Verdict::Renamed(name),
                            Answer::Cancelled(reason) => Verdict::Declined(reason),
                        };
                        let _ = tx.send(AppEvent::Answered(Decision {
                            dialog: DialogKind::Rename,
                            repository,
                            verdict,
                        }));
                    });
                }
                Action::Quit => {
                    state.should_quit = true;
                }
            }
        }

        if state.should_quit {
            // Outstanding questions resolve as declined so their tasks finish cleanly
            dialogs.confirm.cancel();
            dialogs.delete_form.cancel();
            state.rename.ask.cancel();
            tracing::info!("askbox exiting");
            break;
        }

        // Conditional render (only if dirty)
        if state.dirty {
            draw(terminal, &mut state, &mut dialogs)?;
        }
    }

    Ok(())
}

/// Render a frame through the dialog bindings, re-rendering if a store changed
/// while the frame was being drawn.
fn draw(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
    dialogs: &mut Dialogs,
) -> Result<()> {
    loop {
        let confirm_pass = dialogs.confirm_view.render_pass()?;
        let form_pass = dialogs.delete_form_view.render_pass()?;
        state.confirm_focus.sync(confirm_pass.prompt().key());
        state.delete_input.sync(form_pass.prompt().key());

        terminal.draw(|f| ui::render(f, state, confirm_pass.prompt(), form_pass.prompt()))?;

        let confirm_torn = confirm_pass.finish();
        let form_torn = form_pass.finish();
        if !confirm_torn && !form_torn {
            break;
        }
    }
    state.dirty = false;
    Ok(())
}
