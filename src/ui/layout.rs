use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct AppLayout {
    pub repo_list: Rect,
    pub history: Rect,
    pub status_bar: Rect,
}

pub fn compute_layout(area: Rect) -> AppLayout {
    // Main vertical split: content | status bar
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    // Horizontal: repositories | gap | decision history
    let h_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .spacing(1)
        .constraints([Constraint::Percentage(45), Constraint::Min(30)])
        .split(main_chunks[0]);

    AppLayout {
        repo_list: h_chunks[0],
        history: h_chunks[1],
        status_bar: main_chunks[1],
    }
}

/// Centered popup area: `percent_w` of the width, `height` rows, clamped to `area`.
pub fn centered(area: Rect, percent_w: u16, min_w: u16, height: u16) -> Rect {
    let scaled = u32::from(area.width) * u32::from(percent_w) / 100;
    let w = u16::try_from(scaled)
        .unwrap_or(u16::MAX)
        .max(min_w)
        .min(area.width.saturating_sub(4));
    let h = height.min(area.height.saturating_sub(2));
    let x = area.x + area.width.saturating_sub(w) / 2;
    let y = area.y + area.height.saturating_sub(h) / 2;
    Rect::new(x, y, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_popup_fits() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered(area, 50, 40, 9);
        assert_eq!(popup, Rect::new(25, 15, 50, 9));

        let tiny = Rect::new(0, 0, 30, 6);
        let popup = centered(tiny, 50, 40, 9);
        assert_eq!(popup.width, 26);
        assert_eq!(popup.height, 4);
    }

    #[test]
    fn test_centered_popup_on_wide_terminal() {
        let area = Rect::new(0, 0, 1200, 50);
        let popup = centered(area, 60, 44, 8);
        assert_eq!(popup, Rect::new(240, 21, 720, 8));

        let widest = Rect::new(0, 0, u16::MAX, 50);
        let popup = centered(widest, 100, 44, 8);
        assert_eq!(popup.width, u16::MAX - 4);
    }
}
