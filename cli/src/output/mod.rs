//! Output formatting module
//!
//! Lines follow the buildpack log convention: `-----> ` opens a step and
//! everything else is indented by seven spaces so it lines up under it.

pub mod reporter;
pub mod styles;

use console::Term;
use owo_colors::OwoColorize as _;
pub use reporter::TerminalReporter;
pub use styles::Styles;

/// Prefix of a step header.
pub const STEP_PREFIX: &str = "-----> ";
/// Indentation of every other line.
pub const INDENT: &str = "       ";

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Whether to suppress non-error output.
    pub quiet: bool,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && is_tty && std::env::var("NO_COLOR").is_err();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Check if progress indicators should be shown.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    /// `-----> {msg}`
    #[must_use]
    pub fn format_step(&self, msg: &str) -> String {
        format!("{}{msg}", STEP_PREFIX.style(self.styles.step))
    }

    /// `       {msg}`
    #[must_use]
    pub fn format_info(&self, msg: &str) -> String {
        format!("{INDENT}{msg}")
    }

    #[must_use]
    pub fn format_success(&self, msg: &str) -> String {
        format!("{INDENT}{}", msg.style(self.styles.success))
    }

    /// `       **WARNING** {msg}`
    #[must_use]
    pub fn format_warn(&self, msg: &str) -> String {
        format!("{INDENT}{} {msg}", "**WARNING**".style(self.styles.warning))
    }

    /// `       **ERROR** {msg}`
    #[must_use]
    pub fn format_error(&self, msg: &str) -> String {
        format!("{INDENT}{} {msg}", "**ERROR**".style(self.styles.error))
    }

    /// Print a step header. Suppressed when `quiet`.
    pub fn step(&self, msg: &str) {
        if !self.quiet {
            println!("{}", self.format_step(msg));
        }
    }

    /// Print an indented line. Suppressed when `quiet`.
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("{}", self.format_info(msg));
        }
    }

    /// Print a success line. Suppressed when `quiet`.
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("{}", self.format_success(msg));
        }
    }

    /// Print a warning line. Suppressed when `quiet`.
    pub fn warn(&self, msg: &str) {
        if !self.quiet {
            println!("{}", self.format_warn(msg));
        }
    }

    /// Print an error line to stderr. Never suppressed.
    pub fn error(&self, msg: &str) {
        eprintln!("{}", self.format_error(msg));
    }
}
