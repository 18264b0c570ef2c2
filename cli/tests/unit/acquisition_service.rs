//! Unit tests for the agent acquisition service.
//!
//! All I/O goes through `MemFs`, `FakeDownloader`, and `FakeExtractor`, so the
//! tests assert the exact pipeline each mode runs.

#![allow(clippy::expect_used)]

use std::path::Path;

use seeker_provision::application::services::acquisition::{AcquisitionRequest, acquire_agent};
use seeker_provision::domain::TlsPolicy;
use seeker_provision::domain::agent::{AcquisitionMode, AgentWorkspace};
use seeker_provision::domain::error::AcquisitionError;

use crate::mocks::{ExtractCall, FakeDownloader, FakeExtractor, MemFs, NoopReporter};

fn workspace() -> AgentWorkspace {
    AgentWorkspace::under(Path::new("/work"))
}

fn request<'a>(ws: &'a AgentWorkspace, mode: AcquisitionMode, url: &'a str) -> AcquisitionRequest<'a> {
    AcquisitionRequest {
        server_url: url,
        mode,
        workspace: ws,
        verify_tls: false,
    }
}

// ── Sensor installer mode ────────────────────────────────────────────────────

#[tokio::test]
async fn test_installer_mode_downloads_and_extracts_twice() {
    let ws = workspace();
    let fs = MemFs::default();
    let downloader = FakeDownloader::ok(&fs);
    let extractor = FakeExtractor::producing(&fs, 1, &ws.artifact_path);

    let artifact = acquire_agent(
        &request(&ws, AcquisitionMode::ViaSensorInstaller, "http://10.120.8.113:8082"),
        &fs,
        &downloader,
        &extractor,
        &NoopReporter,
    )
    .await
    .expect("acquire");

    assert_eq!(artifact, Path::new("/work/seeker-agent.tgz"));
    assert_eq!(
        downloader.calls(),
        [(
            "http://10.120.8.113:8082/rest/ui/installers/binaries/LINUX".to_string(),
            Path::new("/work/seeker_tmp/SensorInstaller.zip").to_path_buf(),
            TlsPolicy::Verify,
        )]
    );
    assert_eq!(
        extractor.calls(),
        [
            ExtractCall {
                archive: "/work/seeker_tmp/SensorInstaller.zip".into(),
                dest_dir: "/work/seeker_tmp".into(),
                flatten: false,
                patterns: vec![],
            },
            ExtractCall {
                archive: "/work/seeker_tmp/SeekerInstaller.jar".into(),
                dest_dir: "/work".into(),
                flatten: true,
                patterns: vec!["inline/agents/nodejs/*".to_string()],
            },
        ]
    );
}

#[tokio::test]
async fn test_installer_mode_missing_artifact_after_second_extraction() {
    let ws = workspace();
    let fs = MemFs::default();
    let downloader = FakeDownloader::ok(&fs);
    let extractor = FakeExtractor::producing_nothing(&fs);

    let err = acquire_agent(
        &request(&ws, AcquisitionMode::ViaSensorInstaller, "http://h:8082"),
        &fs,
        &downloader,
        &extractor,
        &NoopReporter,
    )
    .await
    .expect_err("artifact missing");

    assert_eq!(extractor.calls().len(), 2);
    match err.downcast_ref::<AcquisitionError>() {
        Some(AcquisitionError::ArtifactNotFound(path)) => {
            assert_eq!(path, Path::new("/work/seeker-agent.tgz"));
        }
        other => panic!("expected ArtifactNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_installer_mode_first_extraction_failure_stops_pipeline() {
    let ws = workspace();
    let fs = MemFs::default();
    let downloader = FakeDownloader::ok(&fs);
    let extractor = FakeExtractor::failing_on(&fs, 0);

    let err = acquire_agent(
        &request(&ws, AcquisitionMode::ViaSensorInstaller, "http://h:8082"),
        &fs,
        &downloader,
        &extractor,
        &NoopReporter,
    )
    .await
    .expect_err("extraction fails");

    assert_eq!(extractor.calls().len(), 1);
    assert!(format!("{err:#}").contains("unpacking sensor installer"));
}

// ── Direct mode ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_direct_mode_single_extraction_into_artifact_dir() {
    let ws = workspace();
    let fs = MemFs::default();
    let downloader = FakeDownloader::ok(&fs);
    let extractor = FakeExtractor::producing(&fs, 0, &ws.artifact_path);

    acquire_agent(
        &request(&ws, AcquisitionMode::Direct, "https://seeker.example.com/"),
        &fs,
        &downloader,
        &extractor,
        &NoopReporter,
    )
    .await
    .expect("acquire");

    let calls = downloader.calls();
    assert_eq!(
        calls[0].0,
        "https://seeker.example.com/rest/ui/installers/agents/binaries/NODEJS"
    );
    assert_eq!(calls[0].1, Path::new("/work/seeker_tmp/seeker-node-agent.zip"));
    assert_eq!(calls[0].2, TlsPolicy::AcceptInvalidCerts);
    assert_eq!(
        extractor.calls(),
        [ExtractCall {
            archive: "/work/seeker_tmp/seeker-node-agent.zip".into(),
            dest_dir: "/work".into(),
            flatten: false,
            patterns: vec![],
        }]
    );
}

#[tokio::test]
async fn test_direct_mode_404_yields_download_failed_without_artifact() {
    let ws = workspace();
    let fs = MemFs::default();
    let downloader = FakeDownloader::failing(&fs, 404);
    let extractor = FakeExtractor::producing(&fs, 0, &ws.artifact_path);

    let err = acquire_agent(
        &request(&ws, AcquisitionMode::Direct, "http://h:8082"),
        &fs,
        &downloader,
        &extractor,
        &NoopReporter,
    )
    .await
    .expect_err("download fails");

    assert!(matches!(
        err.downcast_ref::<AcquisitionError>(),
        Some(AcquisitionError::DownloadFailed {
            status: Some(404),
            ..
        })
    ));
    assert!(extractor.calls().is_empty());
    assert!(!seeker_provision::application::ports::LocalFs::exists(
        &fs,
        &ws.artifact_path
    ));
}

// ── Workspace handling ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_stale_artifact_and_scratch_are_removed_before_download() {
    let ws = workspace();
    let fs = MemFs::with(&[ws.artifact_path.as_path(), ws.scratch_dir.as_path()]);
    let downloader = FakeDownloader::failing(&fs, 500);
    let extractor = FakeExtractor::producing_nothing(&fs);

    let _ = acquire_agent(
        &request(&ws, AcquisitionMode::Direct, "http://h:8082"),
        &fs,
        &downloader,
        &extractor,
        &NoopReporter,
    )
    .await;

    let removed = fs.removed();
    assert!(removed.contains(&ws.scratch_dir));
    assert!(removed.contains(&ws.artifact_path));
    assert_eq!(downloader.calls().len(), 1);
}

#[tokio::test]
async fn test_scratch_dir_is_cleaned_after_success() {
    let ws = workspace();
    let fs = MemFs::default();
    let downloader = FakeDownloader::ok(&fs);
    let extractor = FakeExtractor::producing(&fs, 0, &ws.artifact_path);

    acquire_agent(
        &request(&ws, AcquisitionMode::Direct, "http://h:8082"),
        &fs,
        &downloader,
        &extractor,
        &NoopReporter,
    )
    .await
    .expect("acquire");

    assert_eq!(fs.removed().last(), Some(&ws.scratch_dir));
}

#[tokio::test]
async fn test_invalid_server_url_is_rejected_before_any_io() {
    let ws = workspace();
    let fs = MemFs::default();
    let downloader = FakeDownloader::ok(&fs);
    let extractor = FakeExtractor::producing_nothing(&fs);

    let err = acquire_agent(
        &request(&ws, AcquisitionMode::Direct, "::not a url::"),
        &fs,
        &downloader,
        &extractor,
        &NoopReporter,
    )
    .await
    .expect_err("invalid url");

    assert!(matches!(
        err.downcast_ref::<AcquisitionError>(),
        Some(AcquisitionError::InvalidServerUrl { .. })
    ));
    assert!(downloader.calls().is_empty());
}
