//! Shared test helpers: output constructors and catalog fixtures.

#![allow(dead_code)]

use std::path::Path;
use std::process::{ExitStatus, Output};

use seeker_provision::domain::agent::{AcquisitionMode, AgentWorkspace};
use seeker_provision::domain::catalog::ServiceMatcher;
use seeker_provision::domain::config::ProvisionSettings;
use seeker_provision::domain::credentials::ServiceCredential;

// ── Cross-platform ExitStatus construction ───────────────────────────────────

/// Build an `ExitStatus` from a logical exit code (0 = success, non-zero = failure).
///
/// On Unix the raw wait-status encodes the exit code in bits 8–15, so we shift.
/// On Windows `ExitStatusExt::from_raw` takes the exit code directly.
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    ExitStatus::from_raw(code as u32)
}

// ── Output constructors ──────────────────────────────────────────────────────

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn err_output(code: i32, stderr: &[u8]) -> Output {
    Output {
        status: exit_status(code),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

// ── Catalog fixtures ─────────────────────────────────────────────────────────

/// Single user-provided binding as created by `cf cups`.
pub const USER_PROVIDED_CATALOG: &str = r#"{
  "user-provided": [
    {
      "binding_name": null,
      "credentials": {
        "enterprise_server_url": "http://h:8082",
        "sensor_host": "localhost",
        "sensor_port": "9911"
      },
      "instance_name": "seeker_service_v2",
      "label": "user-provided",
      "name": "seeker_service_v2",
      "syslog_drain_url": "",
      "tags": [],
      "volume_mounts": []
    }
  ]
}"#;

/// Broker-provisioned Seeker binding next to an unrelated database.
pub const BROKERED_CATALOG: &str = r#"{
  "2": [
    {
      "name": "mysql",
      "label": "mysql",
      "credentials": { "uri": "mysql://db" }
    }
  ],
  "seeker-security-service": [
    {
      "binding_name": null,
      "credentials": {
        "enterprise_server_url": "http://10.120.8.113:8082",
        "sensor_host": "10.120.8.113",
        "sensor_port": "9911"
      },
      "instance_name": "seeker_instace",
      "label": "seeker-security-service",
      "name": "seeker_instace",
      "plan": "default-seeker-plan-new",
      "provider": null,
      "tags": ["security", "agent", "monitoring"],
      "volume_mounts": []
    }
  ]
}"#;

/// Catalog whose Seeker binding lacks the sensor port.
pub const INCOMPLETE_CATALOG: &str = r#"{
  "user-provided": [
    {
      "name": "seeker",
      "label": "user-provided",
      "credentials": {
        "enterprise_server_url": "http://h:8082",
        "sensor_host": "localhost"
      }
    }
  ]
}"#;

pub fn complete_credential() -> ServiceCredential {
    ServiceCredential {
        sensor_host: "localhost".to_string(),
        sensor_port: "9911".to_string(),
        enterprise_server_url: "http://h:8082".to_string(),
    }
}

pub fn default_matcher() -> ServiceMatcher {
    ServiceMatcher::with_defaults().expect("default matcher")
}

/// Settings rooted at `work_dir`, no entry point, installer mode.
pub fn settings(work_dir: &Path) -> ProvisionSettings {
    ProvisionSettings {
        entry_point: None,
        mode: AcquisitionMode::ViaSensorInstaller,
        matcher: default_matcher(),
        workspace: AgentWorkspace::under(work_dir),
        verify_tls: false,
        command_timeout: None,
    }
}
