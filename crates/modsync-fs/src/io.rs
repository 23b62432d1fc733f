//! Staged, atomic installation of artifact files

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tempfile::NamedTempFile;

use crate::filter::validate_file_name;
use crate::{Error, Result};

/// Characters of the target name kept in the staging file name. The random
/// part and `.part` suffix must still fit the 255-byte name limit.
const STAGING_NAME_CHARS: usize = 64;

/// A hidden temp file that becomes `dir/file_name` on [`StagedFile::commit`].
///
/// The temp file is created inside the destination directory so the final
/// rename never crosses a filesystem boundary. An exclusive advisory lock is
/// held while content is written. Dropping a `StagedFile` without committing
/// removes the temp file and leaves any existing `dir/file_name` untouched.
#[derive(Debug)]
pub struct StagedFile {
    target: PathBuf,
    temp: NamedTempFile,
}

impl StagedFile {
    /// Create the staging file for `file_name` inside `dir`.
    ///
    /// Creates `dir` if it does not exist.
    pub fn create(dir: &Path, file_name: &str) -> Result<Self> {
        validate_file_name(file_name)?;

        fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;

        // Generate temp file in same directory (ensures same filesystem)
        let stem: String = file_name.chars().take(STAGING_NAME_CHARS).collect();
        let temp = tempfile::Builder::new()
            .prefix(&format!(".{}.", stem))
            .suffix(".part")
            .tempfile_in(dir)
            .map_err(|e| Error::io(dir, e))?;

        FileExt::lock_exclusive(temp.as_file()).map_err(|_| Error::LockFailed {
            path: temp.path().to_path_buf(),
        })?;

        Ok(Self {
            target: dir.join(file_name),
            temp,
        })
    }

    /// Path of the in-flight temp file.
    pub fn temp_path(&self) -> &Path {
        self.temp.path()
    }

    /// Path the content is promoted to on commit.
    pub fn target_path(&self) -> &Path {
        &self.target
    }

    /// Flush to disk and atomically rename over the target path.
    pub fn commit(self) -> Result<PathBuf> {
        let Self { target, mut temp } = self;

        temp.flush().map_err(|e| Error::io(temp.path(), e))?;
        temp.as_file()
            .sync_all()
            .map_err(|e| Error::io(temp.path(), e))?;

        FileExt::unlock(temp.as_file()).map_err(|_| Error::LockFailed {
            path: temp.path().to_path_buf(),
        })?;

        // On failure the returned NamedTempFile is dropped, deleting the temp file
        temp.persist(&target)
            .map_err(|e| Error::io(&target, e.error))?;

        Ok(target)
    }

    /// Remove the temp file without touching the target path.
    pub fn discard(self) -> Result<()> {
        let path = self.temp.path().to_path_buf();
        self.temp.close().map_err(|e| Error::io(path, e))
    }
}

impl Write for StagedFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.temp.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.temp.flush()
    }
}
