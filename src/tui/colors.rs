//! Color constants for the terminal user interface.

use ratatui::style::Color;

/// Used for the header, list accent, and status bar.
pub const SKY_BLUE: Color = Color::Rgb(135, 206, 235);
/// Used for the add action and the modal save hint.
pub const GREEN: Color = Color::Rgb(40, 167, 69);
/// Used for the input accent and the edit modal border.
pub const BLUE: Color = Color::Rgb(0, 123, 255);
/// Used for the delete action and the modal cancel hint.
pub const RED: Color = Color::Rgb(220, 53, 69);
/// Used for the checkbox of completed tasks.
pub const GOLD: Color = Color::Rgb(245, 221, 75);
