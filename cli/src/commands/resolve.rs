//! `resolve` command: print the credential the staging hook would use.

use anyhow::{Context, Result};

use crate::application::services::credentials::resolve_credentials;
use crate::cli::MatchArgs;
use crate::domain::config::service_matcher;
use crate::output::{OutputContext, TerminalReporter};

/// Resolve and validate the credential, then print it as JSON on stdout.
///
/// Progress lines would interleave with the JSON document, so they only
/// reach the `tracing` log.
///
/// # Errors
///
/// Returns an error if the catalog is malformed or the credential incomplete.
pub fn run(args: &MatchArgs) -> Result<()> {
    let matcher = service_matcher(&args.service_types, &args.service_keyword)?;
    let silent = OutputContext::new(true, true);
    let reporter = TerminalReporter::new(&silent);

    let credential = resolve_credentials(&args.vcap_services, &matcher, &reporter)?;
    credential.validate()?;

    let json = serde_json::to_string_pretty(&credential).context("JSON serialization failed")?;
    println!("{json}");
    Ok(())
}
