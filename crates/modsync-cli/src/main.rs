//! modsync CLI
//!
//! Brings a local mods folder in line with the manifest published by a mods
//! server.

mod cli;
mod commands;
mod context;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .map_err(|e| CliError::user(format!("Failed to set tracing subscriber: {}", e)))?;
        tracing::debug!("Verbose mode enabled");
    }

    let Some(command) = cli.command.clone() else {
        println!("{} Mods folder synchronizer", "modsync".green().bold());
        println!();
        println!("Run {} for available commands.", "modsync --help".cyan());
        return Ok(());
    };

    let config = context::resolve_config(&cli)?;
    match command {
        Commands::Sync { dry_run } => commands::run_sync(config, dry_run),
        Commands::Check { json } => commands::run_check(config, json),
    }
}
