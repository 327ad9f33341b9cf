use crate::app::dialogs::{DeleteForm, Dismissal};
use crate::app::state::AppState;
use crate::ui::layout::centered;
use crate::ui::theme::Theme;
use askbox::Prompt;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

pub fn render(frame: &mut Frame, state: &AppState, prompt: &Prompt<DeleteForm, String, Dismissal>) {
    if !prompt.asking() {
        return;
    }

    let form = prompt.payload();
    // Input belongs to an older question until the StoreChanged event syncs it.
    let typed = if state.delete_input.key == prompt.key() {
        &state.delete_input.input
    } else {
        return;
    };

    let popup_area = centered(frame.area(), 60, 44, 8);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Delete repository ")
        .title_style(Theme::title())
        .title_bottom(Line::from(" Enter delete · Esc cancel ").style(Theme::hint()))
        .borders(Borders::ALL)
        .border_type(Theme::border_type())
        .border_style(Style::default().fg(Theme::DANGER))
        .style(Style::default().bg(Theme::BG_SURFACE));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);
    if inner.height < 4 || inner.width < 4 {
        return;
    }

    let label = Line::from(vec![
        Span::raw(" To confirm, type \""),
        Span::styled(form.repository.as_str(), Theme::title()),
        Span::raw("\" below"),
    ]);
    frame.render_widget(Paragraph::new(label), Rect::new(inner.x, inner.y + 1, inner.width, 1));

    let valid = form.accepts(&typed.text);
    let input_style = if valid || typed.text.is_empty() {
        Theme::input_text()
    } else {
        Theme::input_invalid()
    };
    let input_line = Line::from(vec![
        Span::styled(" ❯ ", Style::default().fg(Theme::ACCENT_TEAL)),
        Span::styled(typed.text.as_str(), input_style),
    ]);
    let input_area = Rect::new(inner.x, inner.y + 3, inner.width, 1);
    frame.render_widget(Paragraph::new(input_line), input_area);

    // Cursor offset: " ❯ " (3 columns)
    let cursor_col = typed.text[..typed.cursor].width() as u16;
    let cursor_x = (input_area.x + 3 + cursor_col).min(input_area.right().saturating_sub(1));
    frame.set_cursor_position((cursor_x, input_area.y));
}
