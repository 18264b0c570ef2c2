//! Application context: unified state passed to every command handler.
//!
//! `AppContext` builds the production port implementations once, so command
//! handlers only wire them into application services.

use std::time::Duration;

use crate::infra::archive::UnzipExtractor;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::download::UreqDownloader;
use crate::infra::fs::LocalFs;
use crate::infra::npm::NpmInstaller;
use crate::output::OutputContext;

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Subprocess timeout; unlimited when `None`.
    pub command_timeout: Option<Duration>,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    pub fs: LocalFs,
    pub downloader: UreqDownloader,
    pub extractor: UnzipExtractor<TokioCommandRunner>,
    pub installer: NpmInstaller<TokioCommandRunner>,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    #[must_use]
    pub fn new(flags: &AppFlags) -> Self {
        let output = OutputContext::new(flags.output.no_color, flags.output.quiet);
        let timeout = flags.command_timeout;
        let downloader = UreqDownloader::new(output.show_progress());
        Self {
            output,
            fs: LocalFs,
            downloader,
            extractor: UnzipExtractor::new(TokioCommandRunner::new(timeout)),
            installer: NpmInstaller::new(TokioCommandRunner::new(timeout)),
        }
    }
}
