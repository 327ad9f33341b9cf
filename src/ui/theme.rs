use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;

pub struct Theme;

impl Theme {
    pub const ACCENT_TEAL: Color = Color::Rgb(80, 200, 190);
    pub const DANGER: Color = Color::Rgb(230, 90, 90);
    pub const BG_SURFACE: Color = Color::Rgb(28, 30, 36);
    pub const BORDER_DIM: Color = Color::DarkGray;

    pub fn border() -> Style {
        Style::default().fg(Self::BORDER_DIM)
    }

    pub fn border_type() -> BorderType {
        BorderType::Rounded
    }

    pub fn title() -> Style {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    }

    pub fn hint() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn item_normal() -> Style {
        Style::default().fg(Color::White)
    }

    pub fn item_selected() -> Style {
        Style::default()
            .fg(Self::ACCENT_TEAL)
            .add_modifier(Modifier::BOLD)
    }

    pub fn confirmed() -> Style {
        Style::default().fg(Color::Green)
    }

    pub fn declined() -> Style {
        Style::default().fg(Color::Yellow)
    }

    pub fn input_text() -> Style {
        Style::default().fg(Color::White)
    }

    pub fn input_invalid() -> Style {
        Style::default().fg(Self::DANGER)
    }

    /// Style of a dialog button, highlighted when focused.
    pub fn button(focused: bool, danger: bool) -> Style {
        let color = if danger { Self::DANGER } else { Self::ACCENT_TEAL };
        if focused {
            Style::default()
                .fg(Color::Black)
                .bg(color)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color)
        }
    }

    pub fn status_bar() -> Style {
        Style::default().fg(Color::White).bg(Color::DarkGray)
    }
}
