//! SHA-1 content hashing
//!
//! Artifacts are addressed by the lowercase hex SHA-1 of their raw bytes,
//! the format published in the mods manifest's `sha1` field. Changing the
//! algorithm requires a new manifest format.

use sha1::{Digest, Sha1};
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use crate::{Error, Result};

/// Length of a rendered hash in hex characters
pub const HEX_LEN: usize = 40;

/// Files are streamed through the digest in chunks of this size
const CHUNK_SIZE: usize = 8 * 1024;

/// A lowercase hex SHA-1 digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash(String);

impl ContentHash {
    /// Parse a hex digest, normalizing it to lowercase.
    ///
    /// Returns `None` unless the input is exactly 40 hex characters.
    pub fn parse(hex: &str) -> Option<Self> {
        if hex.len() == HEX_LEN && hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            Some(Self(hex.to_ascii_lowercase()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_hasher(hasher: Sha1) -> Self {
        Self(format!("{:x}", hasher.finalize()))
    }
}

impl AsRef<str> for ContentHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the hash of in-memory content.
pub fn compute_bytes_hash(content: &[u8]) -> ContentHash {
    let mut hasher = Sha1::new();
    hasher.update(content);
    ContentHash::from_hasher(hasher)
}

/// Compute the hash of everything readable from `reader`.
pub fn compute_reader_hash<R: Read>(mut reader: R) -> io::Result<ContentHash> {
    let mut hasher = Sha1::new();
    let mut buffer = [0u8; CHUNK_SIZE];
    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..read]);
    }
    Ok(ContentHash::from_hasher(hasher))
}

/// Compute the hash of a file's contents without loading it into memory.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn compute_file_hash(path: &Path) -> Result<ContentHash> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    compute_reader_hash(file).map_err(|e| Error::io(path, e))
}

/// A writer that hashes every byte it forwards to `inner`.
pub struct HashingWriter<W> {
    inner: W,
    hasher: Sha1,
    written: u64,
}

impl<W: Write> HashingWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            hasher: Sha1::new(),
            written: 0,
        }
    }

    /// Number of bytes accepted by the inner writer so far.
    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    /// Consume the writer, returning the inner writer and the digest of
    /// everything written through it.
    pub fn finish(self) -> (W, ContentHash) {
        (self.inner, ContentHash::from_hasher(self.hasher))
    }
}

impl<W: Write> Write for HashingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_hash_known_value() {
        let hash = compute_bytes_hash(b"hello world");
        assert_eq!(hash.as_str(), "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed");
    }

    #[test]
    fn empty_content_hash() {
        let hash = compute_bytes_hash(b"");
        assert_eq!(hash.as_str(), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
    }

    #[test]
    fn different_content_different_hash() {
        assert_ne!(compute_bytes_hash(b"aaa"), compute_bytes_hash(b"bbb"));
    }

    #[test]
    fn file_hash_matches_bytes_hash_across_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.bin");
        let content: Vec<u8> = (0..(CHUNK_SIZE * 3 + 17)).map(|i| (i % 251) as u8).collect();
        std::fs::write(&path, &content).unwrap();

        let file_hash = compute_file_hash(&path).unwrap();
        assert_eq!(file_hash, compute_bytes_hash(&content));
    }

    #[test]
    fn file_hash_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = compute_file_hash(&dir.path().join("gone.jar"));
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn parse_normalizes_case() {
        let hash = ContentHash::parse("2AAE6C35C94FCFB415DBE95F408B9CE91EE846ED").unwrap();
        assert_eq!(hash, compute_bytes_hash(b"hello world"));
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(ContentHash::parse("abc").is_none());
        assert!(ContentHash::parse(&"z".repeat(HEX_LEN)).is_none());
    }

    #[test]
    fn hashing_writer_tracks_bytes_and_digest() {
        let mut writer = HashingWriter::new(Vec::new());
        writer.write_all(b"hello ").unwrap();
        writer.write_all(b"world").unwrap();
        assert_eq!(writer.bytes_written(), 11);

        let (inner, hash) = writer.finish();
        assert_eq!(inner, b"hello world");
        assert_eq!(hash, compute_bytes_hash(b"hello world"));
    }
}
