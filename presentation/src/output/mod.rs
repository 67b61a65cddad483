//! Report output formatting

pub mod console;
pub mod formatter;

/// Globally enable or disable ANSI colors in formatted output
pub fn set_color_enabled(enabled: bool) {
    colored::control::set_override(enabled);
}
