//! Shared test utilities for the modsync workspace.
//!
//! This crate is a dev-dependency only and is never published.
//!
//! # Modules
//!
//! - [`server`]: [`FixtureServer`], a loopback HTTP server publishing a mods
//!   manifest and artifact downloads, with switchable failure modes
//! - [`mods_dir`]: [`TestModsDir`], a temporary target directory with
//!   assertion helpers

pub mod mods_dir;
pub mod server;

pub use mods_dir::TestModsDir;
pub use server::{FixtureServer, MANIFEST_PATH, Route, artifact_entry, manifest_json};
