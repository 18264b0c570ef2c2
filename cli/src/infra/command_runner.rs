//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` is the production implementation that uses tokio
//! for async process execution, with an optional deadline after which the
//! child is killed.

use std::path::Path;
use std::process::{Output, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::application::ports::CommandRunner;
use crate::domain::error::ProcessError;

/// Production `CommandRunner`.
///
/// Without a timeout a command may run as long as it needs; a staging
/// `npm install` on a cold cache can take minutes.
pub struct TokioCommandRunner {
    timeout: Option<Duration>,
}

impl TokioCommandRunner {
    #[must_use]
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    async fn execute(&self, dir: Option<&Path>, program: &str, args: &[&str]) -> Result<Output> {
        let mut command = tokio::process::Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = dir {
            command.current_dir(dir);
        }
        tracing::debug!(program, ?args, ?dir, "spawning command");

        let mut child = command
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        let stdout_handle = child.stdout.take();
        let stderr_handle = child.stderr.take();
        let deadline = async {
            match self.timeout {
                Some(timeout) => tokio::time::sleep(timeout).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            result = async {
                let (status, stdout, stderr) = tokio::join!(
                    child.wait(),
                    read_all(stdout_handle),
                    read_all(stderr_handle),
                );
                Ok(Output {
                    status: status.with_context(|| format!("waiting for {program}"))?,
                    stdout,
                    stderr,
                })
            } => result,
            () = deadline => {
                let _ = child.kill().await;
                anyhow::bail!(
                    "{program} timed out after {}s",
                    self.timeout.map_or(0, |t| t.as_secs())
                )
            }
        }
    }
}

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.execute(None, program, args).await
    }

    async fn run_in(&self, dir: &Path, program: &str, args: &[&str]) -> Result<Output> {
        self.execute(Some(dir), program, args).await
    }
}

async fn read_all<R: AsyncRead + Unpin>(handle: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut h) = handle {
        let _ = h.read_to_end(&mut buf).await;
    }
    buf
}

/// Turn a non-zero exit into [`ProcessError::Failed`].
///
/// # Errors
///
/// Returns [`ProcessError::Failed`] carrying the trimmed stderr when the
/// command did not exit successfully.
pub fn ensure_success(program: &str, output: &Output) -> Result<(), ProcessError> {
    if output.status.success() {
        return Ok(());
    }
    Err(ProcessError::Failed {
        program: program.to_string(),
        code: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}
