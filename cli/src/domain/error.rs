//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::path::PathBuf;

use thiserror::Error;

// ── Catalog errors ────────────────────────────────────────────────────────────

/// Errors raised while decoding the service-binding catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to unmarshal VCAP_SERVICES ({shape}): {reason}")]
    Malformed { shape: &'static str, reason: String },
}

// ── Credential errors ─────────────────────────────────────────────────────────

/// Errors raised when a resolved credential cannot be used.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("mandatory `{0}` is missing in Seeker service configuration")]
    MissingField(&'static str),
}

// ── Acquisition errors ────────────────────────────────────────────────────────

/// Errors raised by the agent acquisition pipeline.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("invalid enterprise server URL '{url}': {reason}")]
    InvalidServerUrl { url: String, reason: String },

    #[error("could not download {url}: {reason}")]
    DownloadFailed {
        url: String,
        /// HTTP status when the server answered, `None` on transport failure.
        status: Option<u16>,
        reason: String,
    },

    #[error("Could not find {}", .0.display())]
    ArtifactNotFound(PathBuf),
}

// ── Process errors ────────────────────────────────────────────────────────────

/// Errors raised by external commands (archive extraction, package install).
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("{program} failed ({}): {stderr}", exit_label(.code))]
    Failed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
}

#[allow(clippy::ref_option)]
fn exit_label(code: &Option<i32>) -> String {
    code.map_or_else(|| "terminated by signal".to_string(), |c| format!("exit code {c}"))
}

// ── Patch errors ──────────────────────────────────────────────────────────────

/// Errors raised while patching the application entry point.
#[derive(Debug, Error)]
pub enum PatchError {
    #[error("entry point file not found: {}", .0.display())]
    TargetNotFound(PathBuf),
}
