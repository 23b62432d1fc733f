//! Command implementations for modsync-cli

pub mod sync;

pub use sync::{run_check, run_sync};
