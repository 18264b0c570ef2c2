//! Application service: Seeker agent acquisition.
//!
//! Downloads the agent (directly or inside the sensor installer), extracts it
//! with the external archive utility, and checks that the package landed where
//! the package manager expects it. All I/O is routed through injected ports.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::{
    ArchiveExtractor, ArtifactDownloader, ExtractRequest, LocalFs, ProgressReporter,
};
use crate::domain::agent::{
    AcquisitionMode, AgentWorkspace, NODEJS_AGENT_PATTERN, TlsPolicy, download_url,
};
use crate::domain::error::AcquisitionError;

/// Inputs of one acquisition run.
#[derive(Debug, Clone, Copy)]
pub struct AcquisitionRequest<'a> {
    /// Enterprise server base URL from the resolved credential.
    pub server_url: &'a str,
    pub mode: AcquisitionMode,
    pub workspace: &'a AgentWorkspace,
    /// Keep certificate verification on for `https` servers.
    pub verify_tls: bool,
}

/// Acquire the agent package and return its local path.
///
/// # Errors
///
/// Returns an error if the server URL is invalid, the scratch directory cannot
/// be created, the download or an extraction fails, or the package is missing
/// afterwards ([`AcquisitionError::ArtifactNotFound`]).
pub async fn acquire_agent(
    request: &AcquisitionRequest<'_>,
    fs: &impl LocalFs,
    downloader: &impl ArtifactDownloader,
    extractor: &impl ArchiveExtractor,
    reporter: &impl ProgressReporter,
) -> Result<PathBuf> {
    let AcquisitionRequest {
        server_url,
        mode,
        workspace,
        verify_tls,
    } = *request;

    let url = download_url(server_url, mode)?;
    reporter.info(&format!("Seeker {} download url {url}", mode.describe()));

    prepare_workspace(workspace, fs)?;

    let archive = workspace.download_path(mode);
    reporter.info(&format!("Downloading '{url}' to '{}'", archive.display()));
    downloader
        .download(url.as_str(), &archive, TlsPolicy::for_url(&url, verify_tls))
        .await?;
    reporter.info("Download completed without errors");

    match mode {
        AcquisitionMode::ViaSensorInstaller => {
            extractor
                .extract(&ExtractRequest {
                    archive: &archive,
                    dest_dir: &workspace.scratch_dir,
                    flatten: false,
                    patterns: &[],
                })
                .await
                .context("unpacking sensor installer")?;
            extractor
                .extract(&ExtractRequest {
                    archive: &workspace.installer_jar(),
                    dest_dir: workspace.artifact_dir(),
                    flatten: true,
                    patterns: &[NODEJS_AGENT_PATTERN],
                })
                .await
                .context("extracting Node.js agent from installer")?;
        }
        AcquisitionMode::Direct => {
            extractor
                .extract(&ExtractRequest {
                    archive: &archive,
                    dest_dir: workspace.artifact_dir(),
                    flatten: false,
                    patterns: &[],
                })
                .await
                .context("unpacking agent archive")?;
        }
    }

    if !fs.exists(&workspace.artifact_path) {
        return Err(AcquisitionError::ArtifactNotFound(workspace.artifact_path.clone()).into());
    }

    if let Err(e) = fs.remove_dir_all(&workspace.scratch_dir) {
        tracing::debug!(error = %e, "scratch cleanup failed");
    }

    Ok(workspace.artifact_path.clone())
}

/// Clear leftovers of an earlier run and recreate the scratch directory.
fn prepare_workspace(workspace: &AgentWorkspace, fs: &impl LocalFs) -> Result<()> {
    if fs.exists(&workspace.scratch_dir) {
        fs.remove_dir_all(&workspace.scratch_dir)?;
    }
    if fs.exists(&workspace.artifact_path) {
        fs.remove_file(&workspace.artifact_path)?;
    }
    fs.create_dir_all(&workspace.scratch_dir)
        .context("creating agent scratch directory")
}
