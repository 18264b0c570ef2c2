//! Seeker service credentials and the start-up environment they produce.
//!
//! Pure functions only, with no I/O or async.

use serde::Serialize;

use crate::domain::error::CredentialError;

/// Name of the `profile.d` script that exports the sensor address.
pub const ENV_SCRIPT_NAME: &str = "seeker-env.sh";

/// Credential fields read from a binding's `credentials` object.
pub const SENSOR_HOST_FIELD: &str = "sensor_host";
pub const SENSOR_PORT_FIELD: &str = "sensor_port";
pub const ENTERPRISE_SERVER_URL_FIELD: &str = "enterprise_server_url";

/// Connection details for the Seeker sensor and enterprise server.
///
/// The default value is the "not found" credential. A credential is only
/// usable once [`ServiceCredential::validate`] accepts it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ServiceCredential {
    #[serde(rename = "sensorHost")]
    pub sensor_host: String,
    #[serde(rename = "sensorPort")]
    pub sensor_port: String,
    #[serde(rename = "enterpriseServerURL")]
    pub enterprise_server_url: String,
}

impl ServiceCredential {
    /// `true` when no field carries a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sensor_host.is_empty()
            && self.sensor_port.is_empty()
            && self.enterprise_server_url.is_empty()
    }

    /// `true` when every field carries a value.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.validate().is_ok()
    }

    /// Reject a credential with any empty field.
    ///
    /// Fields are checked in the order sensor port, sensor host, enterprise
    /// server URL; the first empty one is named in the error.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::MissingField`] for the first empty field.
    pub fn validate(&self) -> Result<(), CredentialError> {
        if self.sensor_port.is_empty() {
            return Err(CredentialError::MissingField(SENSOR_PORT_FIELD));
        }
        if self.sensor_host.is_empty() {
            return Err(CredentialError::MissingField(SENSOR_HOST_FIELD));
        }
        if self.enterprise_server_url.is_empty() {
            return Err(CredentialError::MissingField(ENTERPRISE_SERVER_URL_FIELD));
        }
        Ok(())
    }

    /// Body of the `profile.d` script exporting the sensor address.
    #[must_use]
    pub fn env_script(&self) -> String {
        format!(
            "\nexport SEEKER_SENSOR_HOST={}\nexport SEEKER_SENSOR_HTTP_PORT={}",
            self.sensor_host, self.sensor_port
        )
    }
}
