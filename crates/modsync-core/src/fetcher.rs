//! Artifact download and atomic installation

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use modsync_fs::{ContentHash, HashingWriter, StagedFile};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use tracing::{debug, info};

use crate::manifest::ArtifactDescriptor;
use crate::{Error, Result};

/// A successfully installed artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    pub filename: String,
    pub path: PathBuf,
    pub bytes: u64,
    pub content_hash: ContentHash,
}

/// Downloads artifacts into a staging file and promotes them atomically.
///
/// No partial artifact is ever visible under its final name: every failure
/// path drops the staging file, leaving the previous file (if any) in place.
#[derive(Debug, Clone)]
pub struct ArtifactFetcher {
    http: Client,
    verify_integrity: bool,
}

impl ArtifactFetcher {
    /// Create a fetcher whose requests time out after `timeout`.
    ///
    /// With `verify_integrity`, content whose hash differs from the
    /// descriptor is rejected instead of installed.
    pub fn new(timeout: Duration, verify_integrity: bool) -> Result<Self> {
        let http = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            verify_integrity,
        })
    }

    /// Download `descriptor` and install it as `target_dir/<filename>`.
    ///
    /// # Errors
    ///
    /// - [`Error::Download`] on request failure, non-200 status, a body
    ///   shorter than advertised, or a staging/rename failure
    /// - [`Error::Integrity`] if verification is enabled and the content
    ///   hash differs from the descriptor
    pub fn install(
        &self,
        descriptor: &ArtifactDescriptor,
        target_dir: &Path,
    ) -> Result<InstallOutcome> {
        let filename = descriptor.filename();
        let url = descriptor.download_url();
        debug!(file = filename, url = %url, "Downloading artifact");

        let mut response = self
            .http
            .get(url.clone())
            .send()
            .map_err(|e| Error::download(filename, format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::download(
                filename,
                format!("server returned {}", status),
            ));
        }
        let expected_len = descriptor.size().or(response.content_length());

        let mut staged = StagedFile::create(target_dir, filename)
            .map_err(|e| Error::download(filename, e.to_string()))?;

        let mut writer = HashingWriter::new(&mut staged);
        let received = io::copy(&mut response, &mut writer)
            .map_err(|e| Error::download(filename, format!("transfer interrupted: {}", e)))?;
        let (_, actual_hash) = writer.finish();

        if let Some(expected) = expected_len
            && received != expected
        {
            return Err(Error::download(
                filename,
                format!("truncated body: received {} of {} bytes", received, expected),
            ));
        }

        if self.verify_integrity && &actual_hash != descriptor.content_hash() {
            return Err(Error::Integrity {
                filename: filename.to_string(),
                expected: descriptor.content_hash().clone(),
                actual: actual_hash,
            });
        }

        let path = staged
            .commit()
            .map_err(|e| Error::download(filename, e.to_string()))?;

        info!(file = filename, bytes = received, "Installed artifact");
        Ok(InstallOutcome {
            filename: filename.to_string(),
            path,
            bytes: received,
            content_hash: actual_hash,
        })
    }
}
