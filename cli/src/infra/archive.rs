//! `ArchiveExtractor` backed by the `unzip` utility available on the stack.

use anyhow::{Context, Result};

use crate::application::ports::{ArchiveExtractor, CommandRunner, ExtractRequest};
use crate::infra::command_runner::ensure_success;

pub const UNZIP_PROGRAM: &str = "unzip";

/// Runs `unzip -o -q [-j] <archive> [patterns…] -d <dest>`.
pub struct UnzipExtractor<R> {
    runner: R,
}

impl<R: CommandRunner> UnzipExtractor<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

/// Argument vector for one extraction. Overwrites without prompting.
#[must_use]
pub fn unzip_args(request: &ExtractRequest<'_>) -> Vec<String> {
    let mut args = vec!["-o".to_string(), "-q".to_string()];
    if request.flatten {
        args.push("-j".to_string());
    }
    args.push(request.archive.display().to_string());
    args.extend(request.patterns.iter().map(|p| (*p).to_string()));
    args.push("-d".to_string());
    args.push(request.dest_dir.display().to_string());
    args
}

impl<R: CommandRunner> ArchiveExtractor for UnzipExtractor<R> {
    async fn extract(&self, request: &ExtractRequest<'_>) -> Result<()> {
        let args = unzip_args(request);
        let argv: Vec<&str> = args.iter().map(String::as_str).collect();
        let output = self
            .runner
            .run(UNZIP_PROGRAM, &argv)
            .await
            .with_context(|| format!("extracting {}", request.archive.display()))?;
        ensure_success(UNZIP_PROGRAM, &output)?;
        Ok(())
    }
}
