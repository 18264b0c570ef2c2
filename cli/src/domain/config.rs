//! Domain types and validators for provisioning settings.
//!
//! Pure functions only, with no I/O or async.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::domain::agent::{AcquisitionMode, AgentWorkspace};
use crate::domain::catalog::ServiceMatcher;

// ── Environment ──────────────────────────────────────────────────────────────

pub const VCAP_SERVICES_ENV: &str = "VCAP_SERVICES";
pub const DIRECT_DOWNLOAD_ENV: &str = "SEEKER_AGENT_DIRECT_DOWNLOAD";
pub const ENTRY_POINT_ENV: &str = "SEEKER_APP_ENTRY_POINT";
pub const SERVICE_TYPES_ENV: &str = "SEEKER_SERVICE_TYPES";
pub const SERVICE_KEYWORD_ENV: &str = "SEEKER_SERVICE_KEYWORD";
pub const WORK_DIR_ENV: &str = "SEEKER_WORK_DIR";
pub const VERIFY_TLS_ENV: &str = "SEEKER_VERIFY_TLS";
pub const COMMAND_TIMEOUT_ENV: &str = "SEEKER_COMMAND_TIMEOUT";

/// Values that switch a toggle off even though they are non-empty.
pub const FALSE_TOGGLE_VALUES: &[&str] = &["false", "0", "no", "off"];

// ── Settings ─────────────────────────────────────────────────────────────────

/// Everything one provisioning run needs besides the catalog and build dir.
#[derive(Debug, Clone)]
pub struct ProvisionSettings {
    /// Application entry point, relative to the build directory.
    pub entry_point: Option<PathBuf>,
    /// How the agent is fetched.
    pub mode: AcquisitionMode,
    /// Which bindings count as the Seeker service.
    pub matcher: ServiceMatcher,
    /// Scratch and artifact layout.
    pub workspace: AgentWorkspace,
    /// Keep certificate verification on for `https` servers.
    pub verify_tls: bool,
    /// Kill external commands that run longer than this.
    pub command_timeout: Option<Duration>,
}

/// Interpret a toggle environment value.
///
/// Any non-empty value turns the toggle on, except the
/// [`FALSE_TOGGLE_VALUES`] (case-insensitive).
#[must_use]
pub fn parse_toggle(value: Option<&str>) -> bool {
    match value.map(str::trim) {
        None | Some("") => false,
        Some(v) => !FALSE_TOGGLE_VALUES
            .iter()
            .any(|f| f.eq_ignore_ascii_case(v)),
    }
}

/// Build the matcher from the configured allow-list and keyword.
///
/// # Errors
///
/// Returns an error if the keyword cannot be compiled into a pattern.
pub fn service_matcher(service_types: &[String], keyword: &str) -> Result<ServiceMatcher> {
    ServiceMatcher::new(service_types, Some(keyword))
        .with_context(|| format!("invalid service keyword '{keyword}'"))
}

// ── Unit tests ───────────────────────────────────────────────────────────────
