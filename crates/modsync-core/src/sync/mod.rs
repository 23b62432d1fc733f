//! SyncEngine for reconciling a target directory with the remote manifest
//!
//! This module provides:
//! - **plan**: Diff the manifest against the local inventory
//! - **engine**: Fetch, diff and install, collecting per-artifact failures

mod engine;
mod plan;

pub use engine::{SyncEngine, SyncReport};
pub use plan::SyncPlan;
