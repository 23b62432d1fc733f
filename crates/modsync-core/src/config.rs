//! Sync configuration
//!
//! Everything the engine needs is passed in explicitly through a
//! [`SyncConfig`]; there is no process-wide state. Configuration files are
//! TOML:
//!
//! ```toml
//! base_url = "http://10.0.0.2:5000"
//! target_dir = "/home/steve/.minecraft/mods"
//! manifest_timeout_secs = 5
//! download_timeout_secs = 30
//! verify_integrity = true
//!
//! [filter]
//! prefix = "blockcraft-"
//! suffix = ".jar"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use modsync_fs::ArtifactFilter;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

fn default_target_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join(".minecraft")
        .join("mods")
}

fn default_manifest_timeout() -> u64 {
    5
}

fn default_download_timeout() -> u64 {
    30
}

fn default_verify_integrity() -> bool {
    true
}

/// Settings for one [`SyncEngine`](crate::SyncEngine).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Server root; the manifest is read from `{base_url}/api/mods-manifest`
    #[serde(default)]
    pub base_url: String,

    /// Directory the artifacts are installed into
    #[serde(default = "default_target_dir")]
    pub target_dir: PathBuf,

    /// Which files in `target_dir` are managed
    #[serde(default)]
    pub filter: ArtifactFilter,

    /// Connect and read timeout for the manifest request
    #[serde(default = "default_manifest_timeout")]
    pub manifest_timeout_secs: u64,

    /// Connect and read timeout for each artifact download
    #[serde(default = "default_download_timeout")]
    pub download_timeout_secs: u64,

    /// Re-hash downloaded content against the manifest before installing
    #[serde(default = "default_verify_integrity")]
    pub verify_integrity: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            target_dir: default_target_dir(),
            filter: ArtifactFilter::default(),
            manifest_timeout_secs: default_manifest_timeout(),
            download_timeout_secs: default_download_timeout(),
            verify_integrity: default_verify_integrity(),
        }
    }
}

impl SyncConfig {
    pub fn new(base_url: impl Into<String>, target_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_url: base_url.into(),
            target_dir: target_dir.into(),
            ..Self::default()
        }
    }

    /// Parse configuration from TOML content.
    pub fn parse(content: &str) -> Result<Self> {
        let config: SyncConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| modsync_fs::Error::io(path, e))?;
        Self::parse(&content)
    }

    /// `<config dir>/modsync/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("modsync").join("config.toml"))
    }

    pub fn manifest_timeout(&self) -> Duration {
        Duration::from_secs(self.manifest_timeout_secs)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }

    /// Check that the configuration can drive a sync.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `base_url` is unset or not an absolute
    /// http(s) URL, or a timeout is zero.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::config("base_url is not set"));
        }
        let url = Url::parse(&self.base_url)
            .map_err(|e| Error::config(format!("base_url {:?} is invalid: {}", self.base_url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "base_url must use http or https, got {:?}",
                url.scheme()
            )));
        }
        if self.manifest_timeout_secs == 0 || self.download_timeout_secs == 0 {
            return Err(Error::config("timeouts must be at least one second"));
        }
        Ok(())
    }
}
