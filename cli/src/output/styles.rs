//! Output styles using owo-colors stylesheet pattern

use owo_colors::Style;

/// Centralized stylesheet for step output colors.
#[derive(Default, Clone)]
pub struct Styles {
    /// Step arrows (bold cyan)
    pub step: Style,
    /// Success messages (green)
    pub success: Style,
    /// Warning label (yellow)
    pub warning: Style,
    /// Error label (red)
    pub error: Style,
}

impl Styles {
    /// Apply colors to the stylesheet.
    pub fn colorize(&mut self) {
        self.step = Style::new().bold().cyan();
        self.success = Style::new().green();
        self.warning = Style::new().bold().yellow();
        self.error = Style::new().bold().red();
    }
}
