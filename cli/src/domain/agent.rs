//! Seeker agent artifact: download modes, local layout, and download URLs.
//!
//! Pure functions only, with no I/O or async.

use std::path::{Path, PathBuf};

use url::Url;

use crate::domain::error::AcquisitionError;

// ── Constants ────────────────────────────────────────────────────────────────

/// Statement prepended to the application entry point to load the agent.
pub const AGENT_REQUIRE_STATEMENT: &str = "require('@synopsys-sig/seeker-inline');";

/// Final agent package handed to the package manager.
pub const AGENT_ARTIFACT_NAME: &str = "seeker-agent.tgz";

/// Scratch directory for downloads and intermediate extraction.
pub const SCRATCH_DIR_NAME: &str = "seeker_tmp";

/// Installer package path on the enterprise server.
pub const SENSOR_INSTALLER_PATH: &str = "rest/ui/installers/binaries/LINUX";
/// Local file name of the downloaded installer package.
pub const SENSOR_INSTALLER_FILE: &str = "SensorInstaller.zip";
/// Nested archive inside the installer package carrying every agent.
pub const SENSOR_INSTALLER_JAR: &str = "SeekerInstaller.jar";
/// Node.js agent files inside [`SENSOR_INSTALLER_JAR`].
pub const NODEJS_AGENT_PATTERN: &str = "inline/agents/nodejs/*";

/// Direct agent download path on the enterprise server.
pub const DIRECT_AGENT_PATH: &str = "rest/ui/installers/agents/binaries/NODEJS";
/// Local file name of the directly downloaded agent archive.
pub const DIRECT_AGENT_FILE: &str = "seeker-node-agent.zip";

// ── Types ────────────────────────────────────────────────────────────────────

/// How the agent artifact is obtained from the enterprise server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AcquisitionMode {
    /// Download the agent archive for the Node.js runtime directly.
    Direct,
    /// Download the full sensor installer and dig the agent out of it.
    #[default]
    ViaSensorInstaller,
}

impl AcquisitionMode {
    #[must_use]
    pub fn from_direct_download(enabled: bool) -> Self {
        if enabled {
            AcquisitionMode::Direct
        } else {
            AcquisitionMode::ViaSensorInstaller
        }
    }

    /// Path of the resource on the enterprise server, relative to its base.
    #[must_use]
    pub fn remote_path(self) -> &'static str {
        match self {
            AcquisitionMode::Direct => DIRECT_AGENT_PATH,
            AcquisitionMode::ViaSensorInstaller => SENSOR_INSTALLER_PATH,
        }
    }

    /// Local file name of the downloaded resource.
    #[must_use]
    pub fn download_file_name(self) -> &'static str {
        match self {
            AcquisitionMode::Direct => DIRECT_AGENT_FILE,
            AcquisitionMode::ViaSensorInstaller => SENSOR_INSTALLER_FILE,
        }
    }

    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            AcquisitionMode::Direct => "agent",
            AcquisitionMode::ViaSensorInstaller => "sensor installer",
        }
    }
}

/// Certificate handling for one download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsPolicy {
    /// Verify the server certificate against the platform roots.
    Verify,
    /// Accept any server certificate (self-signed on-premises servers).
    AcceptInvalidCerts,
}

impl TlsPolicy {
    /// Policy for `url`: secure URLs skip verification unless `verify_tls`.
    #[must_use]
    pub fn for_url(url: &Url, verify_tls: bool) -> Self {
        if url.scheme() == "https" && !verify_tls {
            TlsPolicy::AcceptInvalidCerts
        } else {
            TlsPolicy::Verify
        }
    }
}

/// Local layout used while acquiring the agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentWorkspace {
    /// Cleared and recreated on every run.
    pub scratch_dir: PathBuf,
    /// Where extraction must leave the agent package.
    pub artifact_path: PathBuf,
}

impl AgentWorkspace {
    /// Layout rooted at `base`.
    #[must_use]
    pub fn under(base: &Path) -> Self {
        Self {
            scratch_dir: base.join(SCRATCH_DIR_NAME),
            artifact_path: base.join(AGENT_ARTIFACT_NAME),
        }
    }

    /// Directory the final extraction writes into.
    #[must_use]
    pub fn artifact_dir(&self) -> &Path {
        self.artifact_path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Where the downloaded resource for `mode` is stored.
    #[must_use]
    pub fn download_path(&self, mode: AcquisitionMode) -> PathBuf {
        self.scratch_dir.join(mode.download_file_name())
    }

    /// Nested installer archive, present after unpacking the installer.
    #[must_use]
    pub fn installer_jar(&self) -> PathBuf {
        self.scratch_dir.join(SENSOR_INSTALLER_JAR)
    }
}

// ── URL construction ─────────────────────────────────────────────────────────

/// Join `mode`'s remote path onto the enterprise server base URL.
///
/// The base path is kept, so `https://host/seeker/` resolves below `/seeker`.
///
/// # Errors
///
/// Returns [`AcquisitionError::InvalidServerUrl`] if `server_url` cannot be parsed
/// or cannot carry a path.
pub fn download_url(server_url: &str, mode: AcquisitionMode) -> Result<Url, AcquisitionError> {
    let invalid = |reason: String| AcquisitionError::InvalidServerUrl {
        url: server_url.to_string(),
        reason,
    };
    let mut url = Url::parse(server_url.trim()).map_err(|e| invalid(e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot carry a path".to_string()));
    }
    let joined = format!(
        "{}/{}",
        url.path().trim_end_matches('/'),
        mode.remote_path().trim_start_matches('/')
    );
    url.set_path(&joined);
    Ok(url)
}
