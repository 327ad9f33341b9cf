use crate::app::state::AppState;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title(" Repositories ")
        .title_style(Theme::title())
        .title_bottom(Line::from(" d delete · D type to delete · r rename · q quit ").style(Theme::hint()))
        .borders(Borders::ALL)
        .border_type(Theme::border_type())
        .border_style(Theme::border());

    if state.repositories.is_empty() {
        let empty = List::new([ListItem::new(Span::styled(
            " Nothing left to delete",
            Theme::hint(),
        ))])
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = state
        .repositories
        .iter()
        .enumerate()
        .map(|(i, repo)| {
            let style = if i == state.selected {
                Theme::item_selected()
            } else {
                Theme::item_normal()
            };
            ListItem::new(Span::styled(format!(" {}", repo), style))
        })
        .collect();

    let list = List::new(items).block(block).highlight_symbol("❯");
    let mut list_state = ListState::default().with_selected(Some(state.selected));
    frame.render_stateful_widget(list, area, &mut list_state);
}
