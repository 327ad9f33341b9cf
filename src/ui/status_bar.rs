use crate::app::state::AppState;
use crate::ui::theme::Theme;
use askbox::OverlapPolicy;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

pub fn render(frame: &mut Frame, area: Rect, state: &AppState, asking: bool) {
    let mut parts: Vec<Span> = Vec::new();

    parts.push(Span::styled(
        format!(" {} ", state.status_line()),
        Theme::status_bar(),
    ));

    let policy = match state.config.ask.overlap {
        OverlapPolicy::Supersede => "supersede",
        OverlapPolicy::CancelPrevious => "cancel-previous",
    };
    let mode = if asking { "ASKING" } else { "IDLE" };
    let right = format!(" [{}] [{}] ", policy, mode);

    // Pad to fill remaining space
    let used: usize = parts.iter().map(|s| s.width()).sum();
    let remaining = (area.width as usize).saturating_sub(used + right.len());
    parts.push(Span::styled(" ".repeat(remaining), Theme::status_bar()));
    parts.push(Span::styled(
        right,
        Style::default().fg(Color::Cyan).bg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}
