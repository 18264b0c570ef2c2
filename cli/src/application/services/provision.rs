//! Application service: the after-compile Seeker provisioning use-case.
//!
//! Sequences entry point checks, credential resolution, agent acquisition,
//! dependency install, and the start-up environment script. Decides which
//! failures skip the step and which fail it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::{
    ArchiveExtractor, ArtifactDownloader, FileHasher, LocalFs, PackageInstaller,
    ProfileScriptWriter, ProgressReporter, SourcePatcher,
};
use crate::application::services::acquisition::{AcquisitionRequest, acquire_agent};
use crate::application::services::credentials::resolve_credentials;
use crate::domain::agent::AGENT_REQUIRE_STATEMENT;
use crate::domain::config::ProvisionSettings;
use crate::domain::credentials::{ENV_SCRIPT_NAME, ServiceCredential};
use crate::domain::error::PatchError;

/// Collaborators of one provisioning run.
pub struct ProvisionPorts<'a, F, D, X, I, W, R> {
    pub fs: &'a F,
    pub downloader: &'a D,
    pub extractor: &'a X,
    pub installer: &'a I,
    pub profile: &'a W,
    pub reporter: &'a R,
}

/// Why the step ended without installing the agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The configured entry point file does not exist.
    EntryPointMissing(PathBuf),
    /// The service catalog could not be decoded.
    MalformedCatalog,
    /// The entry point exists but could not be rewritten.
    PatchFailed(PathBuf),
}

/// Outcome of a provisioning run that did not fail the build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// Agent installed and environment script written.
    Installed {
        artifact: PathBuf,
        credential: ServiceCredential,
    },
    /// Step skipped; the application stages without the agent.
    Skipped(SkipReason),
}

/// Run the provisioning step against `build_dir`.
///
/// A missing or unpatchable entry point and an undecodable catalog are
/// reported and skip the step. An incomplete credential, any acquisition
/// failure, or a failed environment script write is returned as an error.
/// A failed dependency install is only reported.
///
/// # Errors
///
/// See above.
pub async fn provision_agent<F, D, X, I, W, R>(
    settings: &ProvisionSettings,
    raw_catalog: &str,
    build_dir: &Path,
    ports: &ProvisionPorts<'_, F, D, X, I, W, R>,
) -> Result<ProvisionOutcome>
where
    F: LocalFs + FileHasher + SourcePatcher,
    D: ArtifactDownloader,
    X: ArchiveExtractor,
    I: PackageInstaller,
    W: ProfileScriptWriter,
    R: ProgressReporter,
{
    let reporter = ports.reporter;
    reporter.step("Seeker - AfterCompileHook Start");
    tracing::debug!(
        mode = ?settings.mode,
        entry_point = ?settings.entry_point,
        catalog_bytes = raw_catalog.len(),
        "provisioning settings"
    );

    // 1. The entry point must exist before anything is downloaded.
    let entry_point = settings.entry_point.as_ref().map(|p| build_dir.join(p));
    if let Some(path) = &entry_point
        && !ports.fs.exists(path)
    {
        reporter.error(&PatchError::TargetNotFound(path.clone()).to_string());
        return Ok(ProvisionOutcome::Skipped(SkipReason::EntryPointMissing(
            path.clone(),
        )));
    }

    // 2. Credentials: undecodable catalog skips, incomplete credential fails.
    let credential = match resolve_credentials(raw_catalog, &settings.matcher, reporter) {
        Ok(credential) => credential,
        Err(e) => {
            reporter.error(&e.to_string());
            return Ok(ProvisionOutcome::Skipped(SkipReason::MalformedCatalog));
        }
    };
    credential.validate()?;
    let credential_json = serde_json::to_string(&credential).context("serializing credential")?;
    reporter.info(&format!("Credentials extraction ok: {credential_json}"));

    // 3. Agent package.
    let artifact = acquire_agent(
        &AcquisitionRequest {
            server_url: &credential.enterprise_server_url,
            mode: settings.mode,
            workspace: &settings.workspace,
            verify_tls: settings.verify_tls,
        },
        ports.fs,
        ports.downloader,
        ports.extractor,
        reporter,
    )
    .await?;
    match ports.fs.sha256_file(&artifact) {
        Ok(digest) => reporter.info(&format!("Agent package sha256: {digest}")),
        Err(e) => tracing::debug!(error = %e, "could not hash agent package"),
    }

    // 4. Load the agent from the entry point, once the package is in hand.
    if let Some(path) = &entry_point {
        tracing::debug!(path = %path.display(), "prepending agent require statement");
        if let Err(e) = ports.fs.prepend_line(path, AGENT_REQUIRE_STATEMENT) {
            reporter.error(&format!("Patching entry point {} failed: {e:#}", path.display()));
            return Ok(ProvisionOutcome::Skipped(SkipReason::PatchFailed(path.clone())));
        }
    }

    // 5. Dependency install is best-effort; the environment script is not.
    reporter.info("Installing Seeker agent dependency");
    match ports.installer.install(build_dir, &artifact).await {
        Ok(()) => reporter.success("Installed Seeker agent dependency"),
        Err(e) => reporter.error(&format!("Installing {} failed: {e:#}", artifact.display())),
    }

    let script = credential.env_script();
    reporter.info(&format!("{ENV_SCRIPT_NAME} content: {script}"));
    ports
        .profile
        .write_profile_script(ENV_SCRIPT_NAME, &script)
        .with_context(|| format!("Error creating {ENV_SCRIPT_NAME} script"))?;
    reporter.success(&format!("Done creating {ENV_SCRIPT_NAME} script"));

    Ok(ProvisionOutcome::Installed {
        artifact,
        credential,
    })
}
