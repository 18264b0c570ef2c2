//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod agent;
pub mod catalog;
pub mod config;
pub mod credentials;
pub mod error;

pub use agent::{AcquisitionMode, AgentWorkspace, TlsPolicy};
pub use catalog::{CatalogSection, CatalogShape, MatchOutcome, ServiceBinding, ServiceCatalog, ServiceMatcher};
pub use config::ProvisionSettings;
pub use credentials::ServiceCredential;
pub use error::{AcquisitionError, CatalogError, CredentialError, PatchError, ProcessError};
