//! HTTP download infrastructure: implements `ArtifactDownloader` with `ureq`.
//!
//! TLS verification is decided per request. Enterprise servers commonly run
//! with self-signed certificates, so [`TlsPolicy::AcceptInvalidCerts`] builds
//! an agent whose verifier accepts any certificate. No process-wide state is
//! touched.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::{CryptoProvider, verify_tls12_signature, verify_tls13_signature};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{DigitallySignedStruct, SignatureScheme};

use crate::application::ports::ArtifactDownloader;
use crate::domain::TlsPolicy;
use crate::domain::error::AcquisitionError;

const USER_AGENT: &str = concat!("seeker-provision/", env!("CARGO_PKG_VERSION"));
const CHUNK_SIZE: usize = 64 * 1024;

/// Production downloader.
pub struct UreqDownloader {
    show_progress: bool,
}

impl UreqDownloader {
    #[must_use]
    pub fn new(show_progress: bool) -> Self {
        Self { show_progress }
    }
}

impl ArtifactDownloader for UreqDownloader {
    async fn download(&self, url: &str, dest: &Path, tls: TlsPolicy) -> Result<()> {
        let url = url.to_string();
        let dest = dest.to_path_buf();
        let show_progress = self.show_progress;
        tokio::task::spawn_blocking(move || download_blocking(&url, &dest, tls, show_progress))
            .await
            .context("spawn_blocking for download")?
    }
}

fn download_blocking(url: &str, dest: &Path, tls: TlsPolicy, show_progress: bool) -> Result<()> {
    let agent = build_agent(tls)?;
    tracing::debug!(url, ?tls, "requesting");

    let failed = |status: Option<u16>, reason: String| AcquisitionError::DownloadFailed {
        url: url.to_string(),
        status,
        reason,
    };

    let response = match agent.get(url).set("User-Agent", USER_AGENT).call() {
        Ok(r) => r,
        Err(ureq::Error::Status(code, r)) => {
            return Err(failed(Some(code), format!("HTTP {code} {}", r.status_text())).into());
        }
        Err(e) => return Err(failed(None, e.to_string()).into()),
    };

    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }

    let partial = partial_path(dest);
    let mut file =
        File::create(&partial).with_context(|| format!("creating {}", partial.display()))?;

    let total = response
        .header("Content-Length")
        .and_then(|v| v.parse::<u64>().ok());
    let pb = make_progress_bar(show_progress, total);

    let mut reader = response.into_reader();
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut written: u64 = 0;
    loop {
        let n = reader
            .read(&mut buf)
            .map_err(|e| failed(None, format!("download interrupted: {e}")))?;
        if n == 0 {
            break;
        }
        file.write_all(&buf[..n])
            .with_context(|| format!("writing {}", partial.display()))?;
        written += n as u64;
        pb.inc(n as u64);
    }
    pb.finish_and_clear();
    file.flush().context("flushing download")?;
    drop(file);

    std::fs::rename(&partial, dest)
        .with_context(|| format!("moving download to {}", dest.display()))?;
    tracing::debug!(bytes = written, dest = %dest.display(), "download finished");
    Ok(())
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut s = dest.as_os_str().to_owned();
    s.push(".partial");
    PathBuf::from(s)
}

fn make_progress_bar(show: bool, total: Option<u64>) -> indicatif::ProgressBar {
    if !show {
        return indicatif::ProgressBar::hidden();
    }
    if let Some(t) = total {
        let pb = indicatif::ProgressBar::new(t);
        pb.set_style(
            indicatif::ProgressStyle::default_bar()
                .template("       [{bar:40}] {percent}%")
                .unwrap_or_else(|_| indicatif::ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );
        pb
    } else {
        indicatif::ProgressBar::new_spinner()
    }
}

// ── TLS ──────────────────────────────────────────────────────────────────────

fn build_agent(tls: TlsPolicy) -> Result<ureq::Agent> {
    let builder = ureq::AgentBuilder::new();
    let builder = match tls {
        TlsPolicy::Verify => builder,
        TlsPolicy::AcceptInvalidCerts => builder.tls_config(Arc::new(accept_any_config()?)),
    };
    Ok(builder.build())
}

fn accept_any_config() -> Result<rustls::ClientConfig> {
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let verifier = Arc::new(AcceptAnyCertificate {
        provider: Arc::clone(&provider),
    });
    let config = rustls::ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .context("configuring TLS protocol versions")?
        .dangerous()
        .with_custom_certificate_verifier(verifier)
        .with_no_client_auth();
    Ok(config)
}

/// Skips chain and hostname checks but still verifies handshake signatures.
#[derive(Debug)]
struct AcceptAnyCertificate {
    provider: Arc<CryptoProvider>,
}

impl ServerCertVerifier for AcceptAnyCertificate {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls12_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls13_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.provider
            .signature_verification_algorithms
            .supported_schemes()
    }
}
