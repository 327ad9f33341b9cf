mod confirmer;
mod delete_form;
mod history;
mod layout;
mod rename_form;
mod repo_list;
mod status_bar;
mod theme;

use crate::app::dialogs::{ConfirmOptions, DeleteForm, Dismissal};
use crate::app::state::AppState;
use askbox::Prompt;
use ratatui::prelude::*;

/// Draw one frame. The prompts come from the render passes of the dialog
/// bindings, so the whole frame shows a single snapshot of each store.
pub fn render(
    frame: &mut Frame,
    state: &AppState,
    confirm: &Prompt<ConfirmOptions, bool, Dismissal>,
    delete_form: &Prompt<DeleteForm, String, Dismissal>,
) {
    let area = frame.area();
    let app_layout = layout::compute_layout(area);
    let asking = confirm.asking() || delete_form.asking() || state.rename.visible();

    repo_list::render(frame, app_layout.repo_list, state);
    history::render(frame, app_layout.history, state);
    status_bar::render(frame, app_layout.status_bar, state, asking);

    // Popups last so they draw over the panels
    rename_form::render(frame, state);
    delete_form::render(frame, state, delete_form);
    confirmer::render(frame, state, confirm);
}
