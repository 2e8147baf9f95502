//! Brand colors shared by all screens

use ratatui::style::{Color, Modifier, Style};

/// Brand pink (#cf2d83)
pub const PRIMARY: Color = Color::Rgb(0xcf, 0x2d, 0x83);
/// Lighter pink for secondary accents (#e85ba3)
pub const PRIMARY_LIGHT: Color = Color::Rgb(0xe8, 0x5b, 0xa3);
/// Prices and positive badges (#10b981)
pub const SUCCESS: Color = Color::Rgb(0x10, 0xb9, 0x81);
/// Load errors (#ef4444)
pub const ERROR: Color = Color::Rgb(0xef, 0x44, 0x44);
/// Warnings shown on countries (#f59e0b)
pub const WARNING: Color = Color::Rgb(0xf5, 0x9e, 0x0b);
/// Secondary text
pub const MUTED: Color = Color::DarkGray;
/// Key names in hints and help
pub const KEY: Color = Color::Yellow;

/// Style of the highlighted row in a list
pub fn selected() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

/// Style of block titles and headings
pub fn heading() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

/// Border style, highlighted when the block has focus
pub fn border(focused: bool) -> Style {
    if focused {
        Style::default().fg(PRIMARY)
    } else {
        Style::default().fg(MUTED)
    }
}
