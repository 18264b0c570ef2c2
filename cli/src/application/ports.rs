//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::Path;
use std::process::Output;

use anyhow::Result;

use crate::domain::TlsPolicy;

// ── Value Types ───────────────────────────────────────────────────────────────

/// One invocation of the archive extraction utility.
#[derive(Debug, Clone, Copy)]
pub struct ExtractRequest<'a> {
    /// Archive to read.
    pub archive: &'a Path,
    /// Directory the entries are written into.
    pub dest_dir: &'a Path,
    /// Drop the stored directory structure (`unzip -j`).
    pub flatten: bool,
    /// Only extract entries matching these patterns; all entries when empty.
    pub patterns: &'a [&'a str],
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program in the current directory and capture its output.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with `dir` as its working directory.
    async fn run_in(&self, dir: &Path, program: &str, args: &[&str]) -> Result<Output>;
}

// ── Artifact Ports ────────────────────────────────────────────────────────────

/// Fetches a remote resource to a local file.
#[allow(async_fn_in_trait)]
pub trait ArtifactDownloader {
    /// Download `url` to `dest`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::AcquisitionError::DownloadFailed`] on a non-2xx
    /// status or transport failure, or an I/O error if `dest` cannot be written.
    async fn download(&self, url: &str, dest: &Path, tls: TlsPolicy) -> Result<()>;
}

/// Unpacks archives with an external utility.
#[allow(async_fn_in_trait)]
pub trait ArchiveExtractor {
    /// Extract the entries described by `request`.
    async fn extract(&self, request: &ExtractRequest<'_>) -> Result<()>;
}

/// Adds a local package to the application's dependencies.
#[allow(async_fn_in_trait)]
pub trait PackageInstaller {
    /// Install `package` into the project at `project_dir`, saving it to the
    /// dependency manifest.
    async fn install(&self, project_dir: &Path, package: &Path) -> Result<()>;
}

// ── Staging Output Ports ──────────────────────────────────────────────────────

/// Persists start-up scripts sourced before the application process starts.
pub trait ProfileScriptWriter {
    /// Write `content` as the profile script `name`.
    fn write_profile_script(&self, name: &str, content: &str) -> Result<()>;
}

/// Edits application source files.
pub trait SourcePatcher {
    /// Insert `content` as the first line of the existing file `target`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::PatchError::TargetNotFound`] if `target` does not exist.
    fn prepend_line(&self, target: &Path, content: &str) -> Result<()>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait.
pub trait ProgressReporter {
    /// Emit a step header.
    fn step(&self, message: &str);
    /// Emit an informational message.
    fn info(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
    /// Emit an error message. Never suppressed.
    fn error(&self, message: &str);
}

// ── Filesystem Ports ──────────────────────────────────────────────────────────

/// Abstracts file hashing operations.
pub trait FileHasher {
    /// Compute the SHA-256 hash of a file.
    fn sha256_file(&self, path: &Path) -> Result<String>;
}

/// Abstracts raw filesystem operations.
pub trait LocalFs {
    /// Check whether `path` exists.
    fn exists(&self, path: &Path) -> bool;
    /// Create `path` and any missing parents.
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    /// Remove a directory tree.
    fn remove_dir_all(&self, path: &Path) -> Result<()>;
    /// Remove a single file.
    fn remove_file(&self, path: &Path) -> Result<()>;
}
