//! Unit tests for the after-compile provisioning service.
//!
//! Verifies which failures skip the step, which fail it, and that the entry
//! point is patched exactly once after the agent package is in place.

#![allow(clippy::expect_used)]

use std::path::{Path, PathBuf};

use seeker_provision::application::services::provision::{
    ProvisionOutcome, ProvisionPorts, SkipReason, provision_agent,
};
use seeker_provision::domain::agent::{AGENT_REQUIRE_STATEMENT, AcquisitionMode};
use seeker_provision::domain::error::{AcquisitionError, CredentialError};

use crate::helpers::{
    BROKERED_CATALOG, INCOMPLETE_CATALOG, USER_PROVIDED_CATALOG, complete_credential, settings,
};
use crate::mocks::{
    FakeDownloader, FakeExtractor, FakeInstaller, Level, MemFs, MemoryProfile, RecordingReporter,
};

const BUILD_DIR: &str = "/build";
const EXPECTED_SCRIPT: &str =
    "\nexport SEEKER_SENSOR_HOST=localhost\nexport SEEKER_SENSOR_HTTP_PORT=9911";

fn artifact() -> PathBuf {
    PathBuf::from("/work/seeker-agent.tgz")
}

/// Ports around one shared in-memory filesystem.
struct Harness<'a> {
    downloader: FakeDownloader<'a>,
    extractor: FakeExtractor<'a>,
    installer: FakeInstaller,
    profile: MemoryProfile,
    reporter: RecordingReporter,
}

impl<'a> Harness<'a> {
    fn new(fs: &'a MemFs) -> Self {
        Self {
            downloader: FakeDownloader::ok(fs),
            extractor: FakeExtractor::producing(fs, 1, &artifact()),
            installer: FakeInstaller::default(),
            profile: MemoryProfile::default(),
            reporter: RecordingReporter::default(),
        }
    }

    fn ports(
        &'a self,
        fs: &'a MemFs,
    ) -> ProvisionPorts<
        'a,
        MemFs,
        FakeDownloader<'a>,
        FakeExtractor<'a>,
        FakeInstaller,
        MemoryProfile,
        RecordingReporter,
    > {
        ProvisionPorts {
            fs,
            downloader: &self.downloader,
            extractor: &self.extractor,
            installer: &self.installer,
            profile: &self.profile,
            reporter: &self.reporter,
        }
    }
}

// ── Happy path ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_user_provided_catalog_installs_agent_and_writes_env_script() {
    let fs = MemFs::default();
    let h = Harness::new(&fs);

    let outcome = provision_agent(
        &settings(Path::new("/work")),
        USER_PROVIDED_CATALOG,
        Path::new(BUILD_DIR),
        &h.ports(&fs),
    )
    .await
    .expect("provision");

    assert_eq!(
        outcome,
        ProvisionOutcome::Installed {
            artifact: artifact(),
            credential: complete_credential(),
        }
    );
    assert_eq!(
        h.installer.calls(),
        [(PathBuf::from(BUILD_DIR), artifact())]
    );
    assert_eq!(
        h.profile.scripts(),
        [("seeker-env.sh".to_string(), EXPECTED_SCRIPT.to_string())]
    );
    assert!(
        h.reporter
            .messages(Level::Info)
            .iter()
            .any(|m| m.starts_with("Credentials extraction ok: {\"sensorHost\":\"localhost\""))
    );
}

#[tokio::test]
async fn test_brokered_catalog_downloads_from_binding_server() {
    let fs = MemFs::default();
    let h = Harness::new(&fs);

    provision_agent(
        &settings(Path::new("/work")),
        BROKERED_CATALOG,
        Path::new(BUILD_DIR),
        &h.ports(&fs),
    )
    .await
    .expect("provision");

    let calls = h.downloader.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].0,
        "http://10.120.8.113:8082/rest/ui/installers/binaries/LINUX"
    );
    assert_eq!(
        h.profile.scripts()[0].1,
        "\nexport SEEKER_SENSOR_HOST=10.120.8.113\nexport SEEKER_SENSOR_HTTP_PORT=9911"
    );
}

#[tokio::test]
async fn test_entry_point_is_patched_exactly_once() {
    let entry = Path::new("/build/server.js");
    let fs = MemFs::with(&[entry]);
    let h = Harness::new(&fs);
    let mut s = settings(Path::new("/work"));
    s.entry_point = Some(PathBuf::from("server.js"));

    provision_agent(&s, USER_PROVIDED_CATALOG, Path::new(BUILD_DIR), &h.ports(&fs))
        .await
        .expect("provision");

    assert_eq!(
        fs.patches(),
        [(entry.to_path_buf(), AGENT_REQUIRE_STATEMENT.to_string())]
    );
}

#[tokio::test]
async fn test_direct_mode_is_passed_to_acquisition() {
    let fs = MemFs::default();
    let mut h = Harness::new(&fs);
    h.extractor = FakeExtractor::producing(&fs, 0, &artifact());
    let mut s = settings(Path::new("/work"));
    s.mode = AcquisitionMode::Direct;

    provision_agent(&s, USER_PROVIDED_CATALOG, Path::new(BUILD_DIR), &h.ports(&fs))
        .await
        .expect("provision");

    assert!(h.downloader.calls()[0].0.ends_with("/rest/ui/installers/agents/binaries/NODEJS"));
    assert_eq!(h.extractor.calls().len(), 1);
}

// ── Fail-soft skips ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_missing_entry_point_skips_before_download() {
    let fs = MemFs::default();
    let h = Harness::new(&fs);
    let mut s = settings(Path::new("/work"));
    s.entry_point = Some(PathBuf::from("missing.js"));

    let outcome = provision_agent(&s, USER_PROVIDED_CATALOG, Path::new(BUILD_DIR), &h.ports(&fs))
        .await
        .expect("skipped, not failed");

    assert_eq!(
        outcome,
        ProvisionOutcome::Skipped(SkipReason::EntryPointMissing(PathBuf::from(
            "/build/missing.js"
        )))
    );
    assert!(h.downloader.calls().is_empty());
    assert!(h.profile.scripts().is_empty());
    assert!(
        h.reporter.messages(Level::Error)[0].contains("entry point file not found")
    );
}

#[tokio::test]
async fn test_unwritable_entry_point_skips_after_download() {
    let entry = Path::new("/build/server.js");
    let fs = MemFs::default();
    fs.lock_file(entry);
    let h = Harness::new(&fs);
    let mut s = settings(Path::new("/work"));
    s.entry_point = Some(PathBuf::from("server.js"));

    let outcome = provision_agent(&s, USER_PROVIDED_CATALOG, Path::new(BUILD_DIR), &h.ports(&fs))
        .await
        .expect("skipped, not failed");

    assert_eq!(
        outcome,
        ProvisionOutcome::Skipped(SkipReason::PatchFailed(entry.to_path_buf()))
    );
    assert_eq!(h.downloader.calls().len(), 1);
    assert!(fs.patches().is_empty());
    assert!(h.installer.calls().is_empty());
    assert!(h.profile.scripts().is_empty());
    assert!(
        h.reporter.messages(Level::Error)[0].contains("Permission denied")
    );
}

#[tokio::test]
async fn test_malformed_catalog_skips_without_download() {
    let fs = MemFs::default();
    let h = Harness::new(&fs);

    let outcome = provision_agent(
        &settings(Path::new("/work")),
        "not json",
        Path::new(BUILD_DIR),
        &h.ports(&fs),
    )
    .await
    .expect("skipped, not failed");

    assert_eq!(outcome, ProvisionOutcome::Skipped(SkipReason::MalformedCatalog));
    assert!(h.downloader.calls().is_empty());
    assert!(
        h.reporter.messages(Level::Error)[0].starts_with("Failed to unmarshal VCAP_SERVICES")
    );
}

// ── Fatal errors ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_incomplete_credential_fails_naming_field() {
    let fs = MemFs::default();
    let h = Harness::new(&fs);

    let err = provision_agent(
        &settings(Path::new("/work")),
        INCOMPLETE_CATALOG,
        Path::new(BUILD_DIR),
        &h.ports(&fs),
    )
    .await
    .expect_err("incomplete credential");

    assert_eq!(
        err.downcast_ref::<CredentialError>(),
        Some(&CredentialError::MissingField("sensor_port"))
    );
    assert!(h.downloader.calls().is_empty());
}

#[tokio::test]
async fn test_no_matching_service_fails_validation() {
    let fs = MemFs::default();
    let h = Harness::new(&fs);

    let err = provision_agent(
        &settings(Path::new("/work")),
        r#"{"2":[{"name":"mysql"}]}"#,
        Path::new(BUILD_DIR),
        &h.ports(&fs),
    )
    .await
    .expect_err("empty credential");

    assert!(err.to_string().contains("sensor_port"));
}

#[tokio::test]
async fn test_acquisition_failure_propagates_and_leaves_entry_point_alone() {
    let entry = Path::new("/build/server.js");
    let fs = MemFs::with(&[entry]);
    let mut h = Harness::new(&fs);
    h.downloader = FakeDownloader::failing(&fs, 404);
    let mut s = settings(Path::new("/work"));
    s.entry_point = Some(PathBuf::from("server.js"));

    let err = provision_agent(&s, USER_PROVIDED_CATALOG, Path::new(BUILD_DIR), &h.ports(&fs))
        .await
        .expect_err("download fails");

    assert!(err.downcast_ref::<AcquisitionError>().is_some());
    assert!(fs.patches().is_empty());
    assert!(h.installer.calls().is_empty());
}

#[tokio::test]
async fn test_env_script_failure_is_wrapped() {
    let fs = MemFs::default();
    let mut h = Harness::new(&fs);
    h.profile = MemoryProfile::failing();

    let err = provision_agent(
        &settings(Path::new("/work")),
        USER_PROVIDED_CATALOG,
        Path::new(BUILD_DIR),
        &h.ports(&fs),
    )
    .await
    .expect_err("script write fails");

    assert_eq!(err.to_string(), "Error creating seeker-env.sh script");
}

// ── Non-fatal install failure ────────────────────────────────────────────────

#[tokio::test]
async fn test_install_failure_is_reported_and_env_script_still_written() {
    let fs = MemFs::default();
    let mut h = Harness::new(&fs);
    h.installer = FakeInstaller::failing();

    let outcome = provision_agent(
        &settings(Path::new("/work")),
        USER_PROVIDED_CATALOG,
        Path::new(BUILD_DIR),
        &h.ports(&fs),
    )
    .await
    .expect("install failure is not fatal");

    assert!(matches!(outcome, ProvisionOutcome::Installed { .. }));
    assert_eq!(h.profile.scripts().len(), 1);
    assert!(
        h.reporter
            .messages(Level::Error)
            .iter()
            .any(|m| m.contains("Installing /work/seeker-agent.tgz failed"))
    );
}
