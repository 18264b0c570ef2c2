//! `after-compile` command: the staging hook entry point.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::provision::{
    ProvisionOutcome, ProvisionPorts, SkipReason, provision_agent,
};
use crate::cli::AfterCompileArgs;
use crate::domain::agent::{AcquisitionMode, AgentWorkspace};
use crate::domain::config::{ProvisionSettings, parse_toggle, service_matcher};
use crate::infra::profile::ProfileDir;
use crate::output::TerminalReporter;

/// Translate the hook arguments into validated settings.
///
/// # Errors
///
/// Returns an error if the service keyword cannot be compiled.
pub fn settings(args: &AfterCompileArgs) -> Result<ProvisionSettings> {
    let base = args
        .work_dir
        .clone()
        .unwrap_or_else(std::env::temp_dir);
    Ok(ProvisionSettings {
        entry_point: args
            .entry_point
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from),
        mode: AcquisitionMode::from_direct_download(parse_toggle(
            args.direct_download.as_deref(),
        )),
        matcher: service_matcher(&args.matching.service_types, &args.matching.service_keyword)?,
        workspace: AgentWorkspace::under(&base),
        verify_tls: parse_toggle(args.verify_tls.as_deref()),
        command_timeout: args.command_timeout.map(Duration::from_secs),
    })
}

/// Run the provisioning step.
///
/// # Errors
///
/// Returns an error when provisioning fails the build.
pub async fn run(
    app: &AppContext,
    args: &AfterCompileArgs,
    settings: &ProvisionSettings,
) -> Result<()> {
    tracing::debug!(
        build_dir = %args.build_dir.display(),
        cache_dir = %args.cache_dir.display(),
        deps_dir = %args.deps_dir.display(),
        deps_idx = %args.deps_idx,
        "after-compile"
    );

    let reporter = TerminalReporter::new(&app.output);
    let profile = ProfileDir::new(args.deps_dir.clone(), args.deps_idx.clone());
    let ports = ProvisionPorts {
        fs: &app.fs,
        downloader: &app.downloader,
        extractor: &app.extractor,
        installer: &app.installer,
        profile: &profile,
        reporter: &reporter,
    };

    match provision_agent(settings, &args.matching.vcap_services, &args.build_dir, &ports).await? {
        ProvisionOutcome::Installed { artifact, .. } => {
            tracing::debug!(artifact = %artifact.display(), "agent installed");
            app.output.step("Seeker - AfterCompileHook Done");
        }
        ProvisionOutcome::Skipped(SkipReason::EntryPointMissing(path)) => {
            app.output.warn(&format!(
                "Seeker agent not installed: entry point {} does not exist",
                path.display()
            ));
        }
        ProvisionOutcome::Skipped(SkipReason::PatchFailed(path)) => {
            app.output.warn(&format!(
                "Seeker agent not installed: entry point {} could not be patched",
                path.display()
            ));
        }
        ProvisionOutcome::Skipped(SkipReason::MalformedCatalog) => {
            app.output
                .warn("Seeker agent not installed: service catalog could not be read");
        }
    }
    Ok(())
}
