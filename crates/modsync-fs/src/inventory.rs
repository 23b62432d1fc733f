//! Local artifact inventory
//!
//! The inventory maps each managed file in the target directory to the hash
//! of its current content. It is rebuilt from disk on every scan and never
//! cached, so it cannot go stale.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::checksum::{ContentHash, compute_file_hash};
use crate::filter::ArtifactFilter;
use crate::{Error, Result};

/// File name to content hash, for the managed files present locally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalInventory {
    entries: BTreeMap<String, ContentHash>,
}

impl LocalInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, filename: impl Into<String>, hash: ContentHash) {
        self.entries.insert(filename.into(), hash);
    }

    pub fn get(&self, filename: &str) -> Option<&ContentHash> {
        self.entries.get(filename)
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.entries.contains_key(filename)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContentHash)> {
        self.entries.iter().map(|(name, hash)| (name.as_str(), hash))
    }
}

impl FromIterator<(String, ContentHash)> for LocalInventory {
    fn from_iter<I: IntoIterator<Item = (String, ContentHash)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Builds a [`LocalInventory`] by hashing the managed files of a directory.
#[derive(Debug, Clone, Default)]
pub struct HashInventory {
    filter: ArtifactFilter,
}

impl HashInventory {
    pub fn new(filter: ArtifactFilter) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> &ArtifactFilter {
        &self.filter
    }

    /// Hash every managed file directly inside `directory`.
    ///
    /// A missing directory yields an empty inventory. Files that cannot be
    /// hashed are logged and left out, so the engine treats them as absent
    /// and fetches them again.
    ///
    /// # Errors
    ///
    /// Returns an error if `directory` exists but cannot be listed.
    pub fn scan(&self, directory: &Path) -> Result<LocalInventory> {
        let mut inventory = LocalInventory::new();

        if !directory.exists() {
            debug!(dir = %directory.display(), "Target directory does not exist yet");
            return Ok(inventory);
        }

        let entries = fs::read_dir(directory).map_err(|e| Error::io(directory, e))?;

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(dir = %directory.display(), error = %e, "Skipping unreadable directory entry");
                    continue;
                }
            };

            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            if !self.filter.matches(&name) {
                continue;
            }

            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            match compute_file_hash(&path) {
                Ok(hash) => {
                    debug!(file = %name, hash = %hash, "Hashed local artifact");
                    inventory.insert(name, hash);
                }
                Err(e) => {
                    warn!(file = %name, error = %e, "Could not hash local artifact, treating as absent");
                }
            }
        }

        Ok(inventory)
    }
}
