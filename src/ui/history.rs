use crate::app::event::Verdict;
use crate::app::state::AppState;
use crate::logging::format_decision;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem};

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title(" Answers ")
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_type(Theme::border_type())
        .border_style(Theme::border());

    let visible = area.height.saturating_sub(2) as usize;
    let items: Vec<ListItem> = if state.history.is_empty() {
        vec![ListItem::new(Span::styled(" No questions answered yet", Theme::hint()))]
    } else {
        state
            .history
            .iter()
            .rev()
            .take(visible)
            .map(|decision| {
                let style = match decision.verdict {
                    Verdict::Declined(_) => Theme::declined(),
                    _ => Theme::confirmed(),
                };
                ListItem::new(Span::styled(format!(" {}", format_decision(decision)), style))
            })
            .collect()
    };

    frame.render_widget(List::new(items).block(block), area);
}
