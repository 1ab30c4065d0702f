//! Color constants for the terminal user interface.

use ratatui::style::Color;

/// High priority
pub const DARK_RED: Color = Color::Rgb(114, 0, 0);
/// Medium priority
pub const GOLD: Color = Color::Rgb(255, 215, 0);
/// Low priority
pub const DARK_GREEN: Color = Color::Rgb(0, 80, 0);
/// Drop slot while dragging
pub const DROP_MARKER: Color = Color::Rgb(0, 160, 80);

/// Accent colour for a priority label. Unknown labels get gray.
pub fn priority_color(priority: &str) -> Color {
    match priority.to_ascii_lowercase().as_str() {
        "high" => DARK_RED,
        "medium" => GOLD,
        "low" => DARK_GREEN,
        _ => Color::Gray,
    }
}

/// Foreground that stays readable on `priority_color`.
pub fn priority_text_color(priority: &str) -> Color {
    match priority_color(priority) {
        GOLD | Color::Gray => Color::Rgb(20, 20, 20),
        _ => Color::White,
    }
}
