//! Color constants for the terminal user interface.

use ratatui::style::Color;

/// Background of the highlighted menu row.
pub const SELECTION_BG: Color = Color::Gray;
/// Foreground of the highlighted menu row.
pub const SELECTION_FG: Color = Color::Black;
/// Border of the focused text field.
pub const INPUT_BORDER: Color = Color::Yellow;
/// Inline validation messages.
pub const ERROR: Color = Color::Rgb(220, 50, 47);
/// Folder suggestions under the path field.
pub const SUGGESTION: Color = Color::Rgb(0, 153, 255);
/// Help line at the bottom of every screen.
pub const STATUS_BG: Color = Color::Blue;
