//! `PackageInstaller` backed by `npm`.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, PackageInstaller};
use crate::infra::command_runner::ensure_success;

pub const NPM_PROGRAM: &str = "npm";

/// Runs `npm install --save <package>` inside the project directory.
pub struct NpmInstaller<R> {
    runner: R,
}

impl<R: CommandRunner> NpmInstaller<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> PackageInstaller for NpmInstaller<R> {
    async fn install(&self, project_dir: &Path, package: &Path) -> Result<()> {
        let package = package.display().to_string();
        let output = self
            .runner
            .run_in(project_dir, NPM_PROGRAM, &["install", "--save", &package])
            .await
            .with_context(|| format!("running npm install in {}", project_dir.display()))?;
        ensure_success(NPM_PROGRAM, &output)?;
        if !output.stdout.is_empty() {
            tracing::debug!(stdout = %String::from_utf8_lossy(&output.stdout).trim(), "npm output");
        }
        Ok(())
    }
}
