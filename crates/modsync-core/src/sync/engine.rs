//! SyncEngine implementation
//!
//! The SyncEngine reconciles the target directory against the server's
//! manifest: fetch, scan, diff, then install whatever is missing or stale.

use tracing::{debug, error, info, warn};

use modsync_fs::HashInventory;

use crate::Result;
use crate::client::ManifestClient;
use crate::config::SyncConfig;
use crate::error::Error;
use crate::fetcher::{ArtifactFetcher, InstallOutcome};
use crate::manifest::Manifest;

use super::plan::SyncPlan;

/// Result of one [`SyncEngine::run`].
///
/// Partial success is a valid outcome: `installed` and `errors` can both be
/// non-empty.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Artifacts installed or replaced during this run
    pub installed: Vec<InstallOutcome>,
    /// Number of artifacts that already matched the manifest
    pub up_to_date: usize,
    /// Manifest entries ignored because they fall outside the filter; each
    /// also has a [`Error::Manifest`] in `errors`
    pub skipped: Vec<String>,
    /// Failures encountered during the run
    pub errors: Vec<Error>,
}

impl SyncReport {
    /// A report for a run that failed before anything could be installed
    pub fn failure(error: Error) -> Self {
        Self {
            errors: vec![error],
            ..Self::default()
        }
    }

    /// Number of artifacts changed on disk
    pub fn applied_count(&self) -> usize {
        self.installed.len()
    }

    /// Whether the run finished without errors
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Engine reconciling a target directory against a remote manifest
///
/// The engine holds configuration and HTTP clients only; every call fetches
/// the manifest and scans the directory afresh.
#[derive(Debug)]
pub struct SyncEngine {
    config: SyncConfig,
    inventory: HashInventory,
    client: ManifestClient,
    fetcher: ArtifactFetcher,
}

impl SyncEngine {
    /// Create a new SyncEngine
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid or the HTTP
    /// clients cannot be built.
    pub fn new(config: SyncConfig) -> Result<Self> {
        config.validate()?;

        let client = ManifestClient::new(&config.base_url, config.manifest_timeout())?;
        let fetcher = ArtifactFetcher::new(config.download_timeout(), config.verify_integrity)?;
        let inventory = HashInventory::new(config.filter.clone());

        Ok(Self {
            config,
            inventory,
            client,
            fetcher,
        })
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Compute what a sync would do, without writing anything.
    ///
    /// # Errors
    ///
    /// Returns the manifest error, or an I/O error if the target directory
    /// exists but cannot be listed.
    pub fn plan(&self) -> Result<SyncPlan> {
        let manifest = self.client.fetch()?;
        self.plan_against(&manifest)
    }

    fn plan_against(&self, manifest: &Manifest) -> Result<SyncPlan> {
        let local = self.inventory.scan(&self.config.target_dir)?;
        debug!(local = local.len(), remote = manifest.len(), "Scanned target directory");
        Ok(SyncPlan::compute(manifest, &local, &self.config.filter))
    }

    /// Synchronize the target directory with the manifest.
    ///
    /// This operation:
    /// 1. Fetches the manifest; on failure returns it as the only error
    /// 2. Scans the target directory
    /// 3. Installs every missing or stale artifact, each independently
    ///
    /// Never panics or returns early on a per-artifact failure; every error
    /// is reported in the returned [`SyncReport`].
    pub fn run(&self) -> SyncReport {
        let manifest = match self.client.fetch() {
            Ok(manifest) => manifest,
            Err(e) => {
                warn!(error = %e, "Manifest unavailable, nothing synced");
                return SyncReport::failure(e);
            }
        };

        let plan = match self.plan_against(&manifest) {
            Ok(plan) => plan,
            Err(e) => {
                warn!(error = %e, "Target directory unreadable, nothing synced");
                return SyncReport::failure(e);
            }
        };

        for name in &plan.up_to_date {
            debug!(file = %name, "Artifact up to date");
        }

        let mut report = SyncReport {
            up_to_date: plan.up_to_date.len(),
            skipped: plan.skipped.iter().cloned().collect(),
            ..SyncReport::default()
        };

        // Entries outside the filter can never converge
        for name in &plan.skipped {
            warn!(file = %name, filter = %self.config.filter, "Manifest entry outside artifact filter, skipping");
            report.errors.push(Error::manifest(format!(
                "{} does not match the artifact filter {}",
                name, self.config.filter
            )));
        }

        for name in plan.actionable() {
            let Some(descriptor) = manifest.get(name) else {
                continue;
            };
            if plan.to_update.contains(name) {
                info!(file = name, "Artifact needs update");
            } else {
                info!(file = name, "New artifact found");
            }

            match self.fetcher.install(descriptor, &self.config.target_dir) {
                Ok(outcome) => report.installed.push(outcome),
                Err(e) => {
                    error!(file = name, error = %e, "Failed to install artifact");
                    report.errors.push(e);
                }
            }
        }

        info!(
            installed = report.applied_count(),
            up_to_date = report.up_to_date,
            failed = report.errors.len(),
            "Sync finished"
        );
        report
    }
}
