use crate::app::dialogs::{ConfirmOptions, Dismissal};
use crate::app::state::AppState;
use crate::ui::layout::centered;
use crate::ui::theme::Theme;
use askbox::Prompt;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

pub fn render(frame: &mut Frame, state: &AppState, prompt: &Prompt<ConfirmOptions, bool, Dismissal>) {
    if !prompt.asking() {
        return;
    }

    let options = prompt.payload().resolve(&state.config.ui.confirm);
    let popup_area = centered(frame.area(), 50, 40, 9);
    frame.render_widget(Clear, popup_area);

    let border_color = if options.destructive {
        Theme::DANGER
    } else {
        Theme::ACCENT_TEAL
    };
    let block = Block::default()
        .title(format!(" ⚠ {} ", options.title))
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_type(Theme::border_type())
        .border_style(Style::default().fg(border_color))
        .style(Style::default().bg(Theme::BG_SURFACE));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);
    if inner.height < 3 {
        return;
    }

    let body = Rect::new(inner.x + 1, inner.y + 1, inner.width.saturating_sub(2), inner.height - 2);
    frame.render_widget(
        Paragraph::new(options.description.as_str())
            .style(Theme::input_text())
            .wrap(Wrap { trim: true }),
        body,
    );

    let on_cancel = state.confirm_focus.on_cancel;
    let buttons = Line::from(vec![
        Span::styled(format!(" {} ", options.action_text), Theme::button(!on_cancel, options.destructive)),
        Span::raw("  "),
        Span::styled(format!(" {} ", options.cancel_text), Theme::button(on_cancel, false)),
        Span::raw(" "),
    ])
    .alignment(Alignment::Right);
    let buttons_area = Rect::new(inner.x, inner.bottom() - 1, inner.width, 1);
    frame.render_widget(Paragraph::new(buttons), buttons_area);
}
