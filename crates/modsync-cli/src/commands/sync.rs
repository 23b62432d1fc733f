//! Sync and check command implementations

use colored::Colorize;

use modsync_core::{SyncConfig, SyncEngine, SyncPlan};

use crate::error::{CliError, Result};

/// Run the sync command
///
/// Downloads every missing or stale mod. With `dry_run` only the plan is
/// printed.
pub fn run_sync(config: SyncConfig, dry_run: bool) -> Result<()> {
    if dry_run {
        println!(
            "{} Dry run: checking {} against {}",
            "=>".blue().bold(),
            config.target_dir.display(),
            config.base_url
        );
        let engine = SyncEngine::new(config)?;
        print_plan(&engine.plan()?);
        return Ok(());
    }

    println!(
        "{} Syncing mods from {} into {}",
        "=>".blue().bold(),
        config.base_url,
        config.target_dir.display()
    );

    let engine = SyncEngine::new(config)?;
    let report = engine.run();

    for outcome in &report.installed {
        println!(
            "   {} {} ({} bytes)",
            "+".green(),
            outcome.filename.cyan(),
            outcome.bytes
        );
    }
    for name in &report.skipped {
        println!("   {} {} (outside filter)", "~".yellow(), name.dimmed());
    }

    if !report.errors.is_empty() {
        println!("{} Sync finished with errors:", "ERROR".red().bold());
        for error in &report.errors {
            println!("   {} {}", "!".red(), error);
        }
        if report.applied_count() > 0 {
            print_restart_hint(report.applied_count());
        }
        return Err(CliError::user(format!(
            "Sync finished with {} error(s)",
            report.errors.len()
        )));
    }

    if report.applied_count() == 0 {
        println!(
            "{} All {} mod(s) up to date.",
            "OK".green().bold(),
            report.up_to_date
        );
    } else {
        println!(
            "{} Downloaded {} mod(s).",
            "OK".green().bold(),
            report.applied_count()
        );
        print_restart_hint(report.applied_count());
    }

    Ok(())
}

/// Run the check command
///
/// Prints what a sync would change without downloading anything.
pub fn run_check(config: SyncConfig, json: bool) -> Result<()> {
    let engine = SyncEngine::new(config)?;
    let plan = engine.plan()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    println!(
        "{} Checking {}",
        "=>".blue().bold(),
        engine.config().target_dir.display()
    );
    print_plan(&plan);
    Ok(())
}

fn print_plan(plan: &SyncPlan) {
    if plan.is_converged() {
        println!(
            "{} All {} mod(s) up to date.",
            "OK".green().bold(),
            plan.up_to_date.len()
        );
    } else {
        println!(
            "{} {} mod(s) to download:",
            "PENDING".yellow().bold(),
            plan.actionable_count()
        );
        for name in &plan.to_install {
            println!("   {} {} (new)", "+".green(), name.cyan());
        }
        for name in &plan.to_update {
            println!("   {} {} (update)", "*".yellow(), name.cyan());
        }
    }

    for name in &plan.skipped {
        println!("   {} {} (outside filter)", "~".yellow(), name.dimmed());
    }
}

fn print_restart_hint(count: usize) {
    println!();
    println!(
        "{} {} mod(s) changed. Restart the game to load them.",
        "NOTE".cyan().bold(),
        count
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use modsync_test_utils::{FixtureServer, Route, TestModsDir, MANIFEST_PATH, manifest_json};

    fn config_for(server: &FixtureServer, mods: &TestModsDir) -> SyncConfig {
        let mut config = SyncConfig::new(server.base_url(), mods.path());
        config.manifest_timeout_secs = 2;
        config.download_timeout_secs = 2;
        config
    }

    #[test]
    fn sync_installs_and_succeeds() {
        let server = FixtureServer::start();
        let mods = TestModsDir::new();
        let entry = server.host_artifact("blockcraft-a.jar", b"a");
        server.serve_manifest(&manifest_json(vec![entry]));

        run_sync(config_for(&server, &mods), false).unwrap();

        mods.assert_artifact("blockcraft-a.jar", b"a");
    }

    #[test]
    fn dry_run_writes_nothing() {
        let server = FixtureServer::start();
        let mods = TestModsDir::new();
        let entry = server.host_artifact("blockcraft-a.jar", b"a");
        server.serve_manifest(&manifest_json(vec![entry]));

        run_sync(config_for(&server, &mods), true).unwrap();

        mods.assert_absent("blockcraft-a.jar");
        assert_eq!(server.hits(&FixtureServer::artifact_path("blockcraft-a.jar")), 0);
    }

    #[test]
    fn sync_fails_when_manifest_unavailable() {
        let server = FixtureServer::start();
        let mods = TestModsDir::new();
        server.route(MANIFEST_PATH, Route::Status(503));

        let result = run_sync(config_for(&server, &mods), false);

        assert!(matches!(result, Err(CliError::User { .. })));
    }

    #[test]
    fn check_propagates_manifest_errors() {
        let server = FixtureServer::start();
        let mods = TestModsDir::new();
        server.route(MANIFEST_PATH, Route::Status(500));

        let result = run_check(config_for(&server, &mods), false);

        assert!(matches!(result, Err(CliError::Core(_))));
    }
}
