//! Diagnostic logging with `tracing`.
//!
//! Staging output goes through the reporter; this is the stderr channel for
//! debugging a failed staging.

use tracing_subscriber::EnvFilter;

/// Filter directives, e.g. `SEEKER_LOG=seeker_provision=trace`.
pub const LOG_FILTER_ENV: &str = "SEEKER_LOG";
/// Set by the platform when buildpack debugging is requested.
pub const BUILDPACK_DEBUG_ENV: &str = "BP_DEBUG";

/// Directive used when [`LOG_FILTER_ENV`] is unset or invalid.
#[must_use]
pub fn default_directive(buildpack_debug: bool) -> &'static str {
    if buildpack_debug { "debug" } else { "warn" }
}

/// Install the global subscriber. A second call is a no-op.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| {
        EnvFilter::new(default_directive(
            std::env::var_os(BUILDPACK_DEBUG_ENV).is_some(),
        ))
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .try_init();
}
