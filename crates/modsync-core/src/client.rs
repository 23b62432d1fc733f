//! Manifest retrieval

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use tracing::{debug, info};

use crate::manifest::Manifest;
use crate::{Error, Result};

/// Path of the manifest endpoint relative to the server root
pub const MANIFEST_PATH: &str = "/api/mods-manifest";

/// Fetches the mods manifest from one server.
///
/// Each [`ManifestClient::fetch`] issues exactly one request; retry policy,
/// if any, belongs to the caller.
#[derive(Debug, Clone)]
pub struct ManifestClient {
    http: Client,
    manifest_url: String,
}

impl ManifestClient {
    /// Create a client for the server at `base_url`.
    ///
    /// `timeout` bounds both connecting and reading the response.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let manifest_url = manifest_url(base_url);
        let http = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, manifest_url })
    }

    pub fn manifest_url(&self) -> &str {
        &self.manifest_url
    }

    /// Retrieve and validate the current manifest.
    ///
    /// # Errors
    ///
    /// - [`Error::Network`] on connection failure or timeout
    /// - [`Error::Protocol`] on a non-200 status (with the server's `error`
    ///   text when the body carries one) or a non-JSON body
    /// - [`Error::Manifest`] if the server reports failure or the content
    ///   is invalid
    pub fn fetch(&self) -> Result<Manifest> {
        debug!(url = %self.manifest_url, "Fetching manifest");

        let response = self
            .http
            .get(&self.manifest_url)
            .send()
            .map_err(|source| self.network_error(source))?;

        let status = response.status();
        if status != StatusCode::OK {
            let mut message = format!("GET {} returned {}", self.manifest_url, status);
            if let Ok(body) = response.bytes()
                && let Some(reason) = server_error(&body)
            {
                message.push_str(&format!(": {}", reason));
            }
            return Err(Error::protocol(message));
        }

        let body = response
            .bytes()
            .map_err(|source| self.network_error(source))?;
        let manifest = Manifest::from_slice(&body)?;

        info!(artifacts = manifest.len(), "Fetched manifest");
        Ok(manifest)
    }

    fn network_error(&self, source: reqwest::Error) -> Error {
        Error::Network {
            url: self.manifest_url.clone(),
            source,
        }
    }
}

/// The `error` text of a JSON failure body, if there is one.
fn server_error(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value.get("error")?.as_str().map(str::to_string)
}

fn manifest_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), MANIFEST_PATH)
}
