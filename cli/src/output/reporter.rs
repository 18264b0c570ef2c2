//! `TerminalReporter`: Presentation-layer implementation of `ProgressReporter`.
//!
//! Wraps `&OutputContext` and implements the `application::ports::ProgressReporter`
//! trait so application services can emit progress events without depending on
//! any presentation type directly.

use crate::application::ports::ProgressReporter;
use crate::output::OutputContext;

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// Every event is also emitted as a `tracing` debug event, so `BP_DEBUG`
/// logs carry the staging output in order with the diagnostics.
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        tracing::debug!(kind = "step", "{message}");
        self.ctx.step(message);
    }

    fn info(&self, message: &str) {
        tracing::debug!(kind = "info", "{message}");
        self.ctx.info(message);
    }

    fn success(&self, message: &str) {
        tracing::debug!(kind = "success", "{message}");
        self.ctx.success(message);
    }

    fn warn(&self, message: &str) {
        tracing::debug!(kind = "warn", "{message}");
        self.ctx.warn(message);
    }

    fn error(&self, message: &str) {
        tracing::debug!(kind = "error", "{message}");
        self.ctx.error(message);
    }
}
