//! [`TestModsDir`]: a temporary target directory for sync scenarios.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use modsync_fs::compute_bytes_hash;
use tempfile::TempDir;

/// A temporary root holding a `mods/` target directory.
///
/// The `mods/` directory is not created up front, so a fresh instance models
/// a first run on a clean installation.
///
/// # Example
///
/// ```rust,no_run
/// use modsync_test_utils::TestModsDir;
///
/// let mods = TestModsDir::new();
/// mods.write("blockcraft-castle.jar", b"castle");
/// mods.assert_artifact("blockcraft-castle.jar", b"castle");
/// ```
pub struct TestModsDir {
    temp_dir: TempDir,
}

impl Default for TestModsDir {
    fn default() -> Self {
        Self::new()
    }
}

impl TestModsDir {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Root of the temporary tree.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The target directory, which may not exist yet.
    pub fn path(&self) -> PathBuf {
        self.root().join("mods")
    }

    /// Write `content` to `mods/<name>`, creating the directory if needed.
    pub fn write(&self, name: &str, content: &[u8]) {
        fs::create_dir_all(self.path()).unwrap();
        fs::write(self.path().join(name), content).unwrap();
    }

    /// Read `mods/<name>`.
    ///
    /// # Panics
    /// Panics if the file cannot be read.
    pub fn read(&self, name: &str) -> Vec<u8> {
        let path = self.path().join(name);
        fs::read(&path).unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
    }

    /// Sorted names of every entry in `mods/`, hidden ones included.
    pub fn file_names(&self) -> Vec<String> {
        self.snapshot().into_keys().collect()
    }

    /// Name → bytes of every regular file in `mods/`.
    pub fn snapshot(&self) -> BTreeMap<String, Vec<u8>> {
        let Ok(entries) = fs::read_dir(self.path()) else {
            return BTreeMap::new();
        };
        entries
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file())
            .map(|e| {
                let name = e.file_name().to_string_lossy().into_owned();
                let content = fs::read(e.path()).unwrap();
                (name, content)
            })
            .collect()
    }

    /// Assert that `mods/<name>` exists and hashes like `expected`.
    ///
    /// # Panics
    /// Panics with a descriptive message on mismatch.
    pub fn assert_artifact(&self, name: &str, expected: &[u8]) {
        let actual = self.read(name);
        assert_eq!(
            compute_bytes_hash(&actual),
            compute_bytes_hash(expected),
            "Content hash mismatch for {}",
            name
        );
    }

    /// Assert that `mods/<name>` does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the file exists.
    pub fn assert_absent(&self, name: &str) {
        let path = self.path().join(name);
        assert!(
            !path.exists(),
            "Expected file NOT to exist: {}",
            path.display()
        );
    }
}
