//! Artifact file name rules
//!
//! Only files matching the configured prefix and suffix are managed. Anything
//! else in the target directory is invisible to the sync engine.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

fn default_prefix() -> String {
    "blockcraft-".to_string()
}

fn default_suffix() -> String {
    ".jar".to_string()
}

/// Name predicate selecting the managed files of a directory.
///
/// Hidden names (leading `.`) never match, which keeps in-flight staging
/// files out of the inventory regardless of the configured pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactFilter {
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default = "default_suffix")]
    pub suffix: String,
}

impl Default for ArtifactFilter {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            suffix: default_suffix(),
        }
    }
}

impl ArtifactFilter {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    /// A filter accepting every visible file name.
    pub fn any() -> Self {
        Self::new("", "")
    }

    pub fn matches(&self, name: &str) -> bool {
        !name.starts_with('.')
            && name.len() >= self.prefix.len() + self.suffix.len()
            && name.starts_with(&self.prefix)
            && name.ends_with(&self.suffix)
    }
}

impl fmt::Display for ArtifactFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}*{}", self.prefix, self.suffix)
    }
}

/// Check that `name` is a single, visible path component.
///
/// Manifest file names are joined onto the target directory, so anything
/// that could escape it or collide with staging files is rejected.
pub fn validate_file_name(name: &str) -> Result<()> {
    let reason = if name.is_empty() {
        "name is empty"
    } else if name == "." || name == ".." {
        "name is a relative directory reference"
    } else if name.contains(['/', '\\']) {
        "name contains a path separator"
    } else if name.contains('\0') {
        "name contains a NUL byte"
    } else if name.starts_with('.') {
        "name is hidden"
    } else {
        return Ok(());
    };

    Err(Error::InvalidFileName {
        name: name.to_string(),
        reason,
    })
}
