//! Application service: Seeker credential resolution from the binding catalog.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use crate::application::ports::ProgressReporter;
use crate::domain::catalog::{CatalogShape, MatchOutcome, ServiceCatalog, ServiceMatcher};
use crate::domain::credentials::ServiceCredential;
use crate::domain::error::CatalogError;

/// Resolve the Seeker credential from the raw catalog JSON.
///
/// User-provided bindings are consulted first; brokered bindings only when
/// that yields nothing. Within a shape, exactly one matching binding wins;
/// zero or several leave the shape empty. The returned credential is the
/// default (empty) value when nothing matched and is not validated here.
///
/// # Errors
///
/// Returns [`CatalogError::Malformed`] if the payload is not JSON or a consulted
/// shape does not fit the document.
pub fn resolve_credentials(
    raw: &str,
    matcher: &ServiceMatcher,
    reporter: &impl ProgressReporter,
) -> Result<ServiceCredential, CatalogError> {
    let catalog = ServiceCatalog::parse(raw)?;

    for shape in CatalogShape::PRECEDENCE {
        let Some(section) = catalog.section(shape)? else {
            tracing::debug!(%shape, "catalog has no section");
            continue;
        };
        let set = matcher.match_set(&section);
        match set.outcome() {
            MatchOutcome::One(binding) => {
                reporter.info(&format!(
                    "Found one matching {} service: {}",
                    set.shape, binding.name
                ));
                return Ok(binding.credential());
            }
            MatchOutcome::Ambiguous(count) => {
                reporter.warn(&format!(
                    "More than one matching {} service found ({count}); ignoring them",
                    set.shape
                ));
            }
            MatchOutcome::None => {
                tracing::debug!(%shape, bindings = section.len(), "no matching service");
            }
        }
    }

    Ok(ServiceCredential::default())
}
