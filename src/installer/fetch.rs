//! Installer download.
//!
//! Fetches the installer script over HTTPS, optionally checks it against a
//! pinned SHA-256, and writes it next to where the virtual environment will
//! be created.

use crate::error::{BootstrapError, Result};
use anyhow::Context;
use reqwest::blocking::Client;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Fetches installer scripts over HTTP/HTTPS.
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// Create a new HTTP fetcher with the default timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a new HTTP fetcher with custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("firedrake-bootstrap/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, timeout })
    }

    /// Get the configured timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch the body at `url`.
    pub fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let fetch_error = |message: String| BootstrapError::InstallerFetch {
            url: url.to_string(),
            message,
        };

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| fetch_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(format!("HTTP {}", status)));
        }

        let body = response.bytes().map_err(|e| fetch_error(e.to_string()))?;
        tracing::debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body.to_vec())
    }
}

/// Hex-encoded SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Compare `bytes` against an optional pinned digest.
///
/// Returns the computed digest. Comparison ignores case and surrounding
/// whitespace in the pinned value.
pub fn verify_checksum(bytes: &[u8], expected: Option<&str>) -> Result<String> {
    let actual = sha256_hex(bytes);
    tracing::debug!("Installer sha256: {}", actual);

    if let Some(expected) = expected {
        let expected = expected.trim().to_ascii_lowercase();
        if expected != actual {
            return Err(BootstrapError::ChecksumMismatch { expected, actual });
        }
    }
    Ok(actual)
}

/// Write the installer script to `dest` and mark it executable.
pub fn write_installer(dest: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(dest, bytes)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(dest, fs::Permissions::from_mode(0o755))?;
    }
    Ok(())
}

/// Download the installer to `dest`, verifying it first.
///
/// Nothing is written when the checksum does not match.
pub fn download_installer(
    fetcher: &HttpFetcher,
    url: &str,
    dest: &Path,
    sha256: Option<&str>,
) -> Result<PathBuf> {
    let bytes = fetcher.fetch(url)?;
    verify_checksum(&bytes, sha256)?;
    write_installer(dest, &bytes)?;
    tracing::info!("Saved installer to {}", dest.display());
    Ok(dest.to_path_buf())
}

/// Use an installer that is already on disk, verifying it if pinned.
pub fn use_local_installer(path: &Path, sha256: Option<&str>) -> Result<PathBuf> {
    if !path.is_file() {
        return Err(BootstrapError::MissingPath {
            name: "installer".to_string(),
            path: path.to_path_buf(),
        });
    }
    let bytes = fs::read(path)?;
    verify_checksum(&bytes, sha256)?;
    Ok(path.to_path_buf())
}
