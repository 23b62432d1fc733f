//! Filesystem layer for modsync
//!
//! Provides content hashing, the local artifact inventory and the staged
//! write used to install downloaded artifacts atomically.

pub mod checksum;
pub mod error;
pub mod filter;
pub mod inventory;
pub mod io;

pub use checksum::{ContentHash, HashingWriter, compute_bytes_hash, compute_file_hash};
pub use error::{Error, Result};
pub use filter::{ArtifactFilter, validate_file_name};
pub use inventory::{HashInventory, LocalInventory};
pub use io::StagedFile;
