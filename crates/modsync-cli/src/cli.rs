//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// modsync - Keep a local mods folder in step with a mods server
#[derive(Parser, Debug)]
#[command(name = "modsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to <config dir>/modsync/config.toml)
    #[arg(short, long, global = true, env = "MODSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Server root URL, overriding the configuration file
    #[arg(long, global = true, env = "MODSYNC_BASE_URL")]
    pub base_url: Option<String>,

    /// Mods directory, overriding the configuration file
    #[arg(long, global = true)]
    pub target_dir: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Download mods that are missing or out of date
    Sync {
        /// Preview changes without downloading anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Show what a sync would change
    Check {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}
