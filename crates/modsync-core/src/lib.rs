//! Core reconciliation engine for modsync
//!
//! Given a server publishing a mods manifest (file name, SHA-1, download
//! URL per artifact), this crate brings a local directory in line with it:
//!
//! - **ManifestClient**: fetch and validate the manifest
//! - **HashInventory** (from `modsync-fs`): hash the managed local files
//! - **SyncPlan**: diff the two into install / update / up-to-date sets
//! - **ArtifactFetcher**: download into a staging file and rename into place
//! - **SyncEngine**: run the whole pipeline and report the outcome
//!
//! # Architecture
//!
//! ```text
//!                 host (CLI, game loader)
//!                          |
//!                     SyncEngine
//!                          |
//!      +-----------+-------+--------+---------------+
//!      |           |                |               |
//! ManifestClient SyncPlan   ArtifactFetcher   HashInventory
//!                                   |               |
//!                                   +-- modsync-fs -+
//! ```
//!
//! # Example
//!
//! ```no_run
//! use modsync_core::{SyncConfig, SyncEngine};
//!
//! let config = SyncConfig::new("http://10.0.0.2:5000", "/home/steve/.minecraft/mods");
//! let engine = SyncEngine::new(config)?;
//! let report = engine.run();
//! if report.applied_count() > 0 {
//!     println!("installed {} mod(s), restart to load them", report.applied_count());
//! }
//! # Ok::<(), modsync_core::Error>(())
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod manifest;
pub mod sync;

pub use client::{MANIFEST_PATH, ManifestClient};
pub use config::SyncConfig;
pub use error::{Error, ErrorKind, Result};
pub use fetcher::{ArtifactFetcher, InstallOutcome};
pub use manifest::{ArtifactDescriptor, Manifest};
pub use modsync_fs::{ArtifactFilter, ContentHash, HashInventory, LocalInventory};
pub use sync::{SyncEngine, SyncPlan, SyncReport};
