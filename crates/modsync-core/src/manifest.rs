//! Mods manifest parsing and validation
//!
//! The server publishes the desired artifact set as
//! `{ "success": bool, "mods": [ { "filename", "sha1", "download_url", .. } ] }`.
//! A [`Manifest`] only exists for a body that reported success and passed
//! validation; it is rebuilt from the response on every sync.

use std::collections::HashSet;

use modsync_fs::{ContentHash, validate_file_name};
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;

use crate::{Error, Result};

#[derive(Debug, Deserialize)]
struct WireManifest {
    mods: Vec<WireArtifact>,
}

#[derive(Debug, Deserialize)]
struct WireArtifact {
    filename: String,
    sha1: String,
    download_url: String,
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    project_name: Option<String>,
}

/// One artifact the server wants installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDescriptor {
    filename: String,
    content_hash: ContentHash,
    download_url: Url,
    size: Option<u64>,
    project_name: Option<String>,
}

impl ArtifactDescriptor {
    /// Build a validated descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Manifest`] if the file name is not a plain file name,
    /// the hash is not 40 hex characters, or the URL is not absolute http(s).
    pub fn new(filename: &str, sha1: &str, download_url: &str) -> Result<Self> {
        validate_file_name(filename).map_err(|e| Error::manifest(e.to_string()))?;

        let content_hash = ContentHash::parse(sha1).ok_or_else(|| {
            Error::manifest(format!("{}: sha1 {:?} is not a 40-char hex digest", filename, sha1))
        })?;

        let download_url = Url::parse(download_url).map_err(|e| {
            Error::manifest(format!("{}: invalid download_url {:?}: {}", filename, download_url, e))
        })?;
        if !matches!(download_url.scheme(), "http" | "https") {
            return Err(Error::manifest(format!(
                "{}: unsupported download_url scheme {:?}",
                filename,
                download_url.scheme()
            )));
        }

        Ok(Self {
            filename: filename.to_string(),
            content_hash,
            download_url,
            size: None,
            project_name: None,
        })
    }

    /// Expected byte length, when the server advertises one.
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_project_name(mut self, project_name: impl Into<String>) -> Self {
        self.project_name = Some(project_name.into());
        self
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn content_hash(&self) -> &ContentHash {
        &self.content_hash
    }

    pub fn download_url(&self) -> &Url {
        &self.download_url
    }

    pub fn size(&self) -> Option<u64> {
        self.size
    }

    pub fn project_name(&self) -> Option<&str> {
        self.project_name.as_deref()
    }

    fn from_wire(wire: WireArtifact) -> Result<Self> {
        let mut descriptor = Self::new(&wire.filename, &wire.sha1, &wire.download_url)?;
        descriptor.size = wire.size;
        descriptor.project_name = wire.project_name;
        Ok(descriptor)
    }
}

/// The validated set of artifacts the server currently publishes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    artifacts: Vec<ArtifactDescriptor>,
}

impl Manifest {
    /// Build a manifest, rejecting duplicate file names.
    pub fn from_artifacts(artifacts: Vec<ArtifactDescriptor>) -> Result<Self> {
        let mut seen = HashSet::new();
        for artifact in &artifacts {
            if !seen.insert(artifact.filename()) {
                return Err(Error::manifest(format!(
                    "duplicate filename {:?}",
                    artifact.filename()
                )));
            }
        }
        Ok(Self { artifacts })
    }

    /// Parse a manifest response body.
    ///
    /// # Errors
    ///
    /// - [`Error::Protocol`] if the body is not JSON
    /// - [`Error::Manifest`] if `success` is missing or false, or if the
    ///   artifact list is missing, malformed or contains duplicates
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| Error::protocol(format!("malformed manifest body: {}", e)))?;

        match value.get("success").and_then(Value::as_bool) {
            Some(true) => {}
            Some(false) => {
                let reason = value
                    .get("error")
                    .and_then(Value::as_str)
                    .unwrap_or("no reason given");
                return Err(Error::manifest(format!("server reported failure: {}", reason)));
            }
            None => return Err(Error::manifest("missing boolean `success` flag")),
        }

        let wire: WireManifest =
            serde_json::from_value(value).map_err(|e| Error::manifest(e.to_string()))?;

        let artifacts = wire
            .mods
            .into_iter()
            .map(ArtifactDescriptor::from_wire)
            .collect::<Result<Vec<_>>>()?;

        Self::from_artifacts(artifacts)
    }

    pub fn artifacts(&self) -> &[ArtifactDescriptor] {
        &self.artifacts
    }

    pub fn get(&self, filename: &str) -> Option<&ArtifactDescriptor> {
        self.artifacts.iter().find(|a| a.filename() == filename)
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use rstest::rstest;

    const HASH: &str = "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed";

    fn body(value: serde_json::Value) -> Vec<u8> {
        value.to_string().into_bytes()
    }

    #[test]
    fn parses_full_manifest() {
        let manifest = Manifest::from_slice(&body(serde_json::json!({
            "success": true,
            "server_ip": "10.0.0.2",
            "mods_count": 1,
            "mods": [{
                "filename": "blockcraft-castle.jar",
                "project_name": "castle",
                "download_url": "http://10.0.0.2:8888/blockcraft-castle.jar",
                "size": 11,
                "modified": 1718000000.5,
                "sha1": HASH,
            }],
        })))
        .unwrap();

        assert_eq!(manifest.len(), 1);
        let artifact = &manifest.artifacts()[0];
        assert_eq!(artifact.filename(), "blockcraft-castle.jar");
        assert_eq!(artifact.content_hash().as_str(), HASH);
        assert_eq!(
            artifact.download_url().as_str(),
            "http://10.0.0.2:8888/blockcraft-castle.jar"
        );
        assert_eq!(artifact.size(), Some(11));
        assert_eq!(artifact.project_name(), Some("castle"));
    }

    #[test]
    fn empty_mod_list_is_valid() {
        let manifest =
            Manifest::from_slice(&body(serde_json::json!({ "success": true, "mods": [] })))
                .unwrap();
        assert!(manifest.is_empty());
    }

    #[test]
    fn success_false_is_manifest_error_with_reason() {
        let err = Manifest::from_slice(&body(serde_json::json!({
            "success": false,
            "error": "mods folder missing",
        })))
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Manifest);
        assert!(err.to_string().contains("mods folder missing"));
    }

    #[test]
    fn non_json_body_is_protocol_error() {
        let err = Manifest::from_slice(b"<html>502 Bad Gateway</html>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Protocol);
    }

    #[rstest]
    #[case::no_success(serde_json::json!({ "mods": [] }))]
    #[case::no_mods(serde_json::json!({ "success": true }))]
    #[case::missing_sha1(serde_json::json!({
        "success": true,
        "mods": [{ "filename": "blockcraft-a.jar", "download_url": "http://x/a.jar" }],
    }))]
    #[case::bad_sha1(serde_json::json!({
        "success": true,
        "mods": [{ "filename": "blockcraft-a.jar", "sha1": "abc", "download_url": "http://x/a.jar" }],
    }))]
    #[case::relative_url(serde_json::json!({
        "success": true,
        "mods": [{ "filename": "blockcraft-a.jar", "sha1": HASH, "download_url": "/a.jar" }],
    }))]
    #[case::ftp_url(serde_json::json!({
        "success": true,
        "mods": [{ "filename": "blockcraft-a.jar", "sha1": HASH, "download_url": "ftp://x/a.jar" }],
    }))]
    #[case::traversal(serde_json::json!({
        "success": true,
        "mods": [{ "filename": "../blockcraft-a.jar", "sha1": HASH, "download_url": "http://x/a.jar" }],
    }))]
    #[case::duplicate(serde_json::json!({
        "success": true,
        "mods": [
            { "filename": "blockcraft-a.jar", "sha1": HASH, "download_url": "http://x/a.jar" },
            { "filename": "blockcraft-a.jar", "sha1": HASH, "download_url": "http://y/a.jar" },
        ],
    }))]
    fn invalid_manifests_are_manifest_errors(#[case] value: serde_json::Value) {
        let err = Manifest::from_slice(&body(value)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Manifest, "unexpected error: {}", err);
    }

    #[test]
    fn uppercase_hash_is_normalized() {
        let descriptor = ArtifactDescriptor::new(
            "blockcraft-a.jar",
            &HASH.to_ascii_uppercase(),
            "http://x/a.jar",
        )
        .unwrap();
        assert_eq!(descriptor.content_hash().as_str(), HASH);
    }

    #[test]
    fn get_finds_by_filename() {
        let manifest = Manifest::from_artifacts(vec![
            ArtifactDescriptor::new("blockcraft-a.jar", HASH, "http://x/a.jar").unwrap(),
        ])
        .unwrap();

        assert!(manifest.get("blockcraft-a.jar").is_some());
        assert!(manifest.get("blockcraft-b.jar").is_none());
    }
}
