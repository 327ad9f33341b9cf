use crate::app::state::AppState;
use crate::ui::layout::centered;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

pub fn render(frame: &mut Frame, state: &AppState) {
    let widget = &state.rename;
    if !widget.visible() {
        return;
    }

    let popup_area = centered(frame.area(), 50, 40, 5);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(format!(" Rename {} ", widget.repository))
        .title_style(Theme::title())
        .title_bottom(Line::from(" Enter save · Esc cancel ").style(Theme::hint()))
        .borders(Borders::ALL)
        .border_type(Theme::border_type())
        .border_style(Style::default().fg(Theme::ACCENT_TEAL))
        .style(Style::default().bg(Theme::BG_SURFACE));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);
    if inner.height < 1 || inner.width < 4 {
        return;
    }

    let line = Line::from(vec![
        Span::styled(" ❯ ", Style::default().fg(Theme::ACCENT_TEAL)),
        Span::styled(widget.input.text.as_str(), Theme::input_text()),
    ]);
    let input_area = Rect::new(inner.x, inner.y + inner.height / 2, inner.width, 1);
    frame.render_widget(Paragraph::new(line), input_area);

    let cursor_col = widget.input.text[..widget.input.cursor].width() as u16;
    let cursor_x = (input_area.x + 3 + cursor_col).min(input_area.right().saturating_sub(1));
    frame.set_cursor_position((cursor_x, input_area.y));
}
