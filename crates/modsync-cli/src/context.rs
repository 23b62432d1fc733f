//! Configuration resolution
//!
//! Builds the [`SyncConfig`] for a command from, in increasing precedence:
//! built-in defaults, the configuration file, and command-line flags.

use std::path::Path;

use modsync_core::SyncConfig;

use crate::cli::Cli;
use crate::error::{CliError, Result};

/// Resolve the effective configuration for `cli`.
///
/// An explicit `--config` must exist; the default location is only read
/// when present.
pub fn resolve_config(cli: &Cli) -> Result<SyncConfig> {
    let mut config = match &cli.config {
        Some(path) => load(path)?,
        None => match SyncConfig::default_path() {
            Some(path) if path.is_file() => load(&path)?,
            _ => SyncConfig::default(),
        },
    };

    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(target_dir) = &cli.target_dir {
        config.target_dir = target_dir.clone();
    }

    if config.base_url.trim().is_empty() {
        return Err(CliError::user(
            "No server configured. Pass --base-url or set base_url in the config file.",
        ));
    }

    Ok(config)
}

fn load(path: &Path) -> Result<SyncConfig> {
    tracing::debug!(path = %path.display(), "Loading configuration");
    Ok(SyncConfig::load(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn flags_override_config_file() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.toml");
        fs::write(
            &config_path,
            "base_url = \"http://file:5000\"\ntarget_dir = \"/from/file\"\nverify_integrity = false\n",
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "modsync",
            "--config",
            config_path.to_str().unwrap(),
            "--base-url",
            "http://flag:5000",
            "check",
        ])
        .unwrap();
        let config = resolve_config(&cli).unwrap();

        assert_eq!(config.base_url, "http://flag:5000");
        assert_eq!(config.target_dir, PathBuf::from("/from/file"));
        assert!(!config.verify_integrity);
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let temp = TempDir::new().unwrap();
        let cli = Cli::try_parse_from([
            "modsync",
            "--config",
            temp.path().join("absent.toml").to_str().unwrap(),
            "check",
        ])
        .unwrap();

        assert!(matches!(resolve_config(&cli), Err(CliError::Core(_))));
    }

    #[test]
    fn missing_base_url_is_a_user_error() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.toml");
        fs::write(&config_path, "target_dir = \"/mods\"\n").unwrap();

        let cli = Cli::try_parse_from([
            "modsync",
            "--config",
            config_path.to_str().unwrap(),
            "sync",
        ])
        .unwrap();

        assert!(matches!(resolve_config(&cli), Err(CliError::User { .. })));
    }
}
