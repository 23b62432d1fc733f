//! Diff between the manifest and the local inventory

use std::collections::BTreeSet;

use modsync_fs::{ArtifactFilter, LocalInventory};
use serde::Serialize;

use crate::manifest::Manifest;

/// What a sync would do, by file name.
///
/// `to_install`, `to_update` and `up_to_date` are disjoint and together with
/// `skipped` cover every manifest entry exactly once. Local files that the
/// manifest does not name appear nowhere: the engine never removes files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncPlan {
    /// In the manifest, absent locally
    pub to_install: BTreeSet<String>,
    /// Present locally with a different hash
    pub to_update: BTreeSet<String>,
    /// Present locally with the manifest hash
    pub up_to_date: BTreeSet<String>,
    /// Outside the artifact filter; never installed
    pub skipped: BTreeSet<String>,
}

impl SyncPlan {
    /// Compare `manifest` against `local`.
    ///
    /// Manifest entries that `filter` rejects are placed in `skipped`: a
    /// later scan could never see them, so installing them would make every
    /// sync re-download them.
    pub fn compute(manifest: &Manifest, local: &LocalInventory, filter: &ArtifactFilter) -> Self {
        let mut plan = Self::default();

        for artifact in manifest.artifacts() {
            let name = artifact.filename().to_string();

            if !filter.matches(&name) {
                plan.skipped.insert(name);
                continue;
            }

            match local.get(&name) {
                None => {
                    plan.to_install.insert(name);
                }
                Some(hash) if hash == artifact.content_hash() => {
                    plan.up_to_date.insert(name);
                }
                Some(_) => {
                    plan.to_update.insert(name);
                }
            }
        }

        plan
    }

    /// File names to fetch: `to_install ∪ to_update`.
    pub fn actionable(&self) -> impl Iterator<Item = &str> {
        self.to_install
            .iter()
            .chain(self.to_update.iter())
            .map(String::as_str)
    }

    pub fn actionable_count(&self) -> usize {
        self.to_install.len() + self.to_update.len()
    }

    /// True when nothing needs fetching.
    pub fn is_converged(&self) -> bool {
        self.actionable_count() == 0
    }
}
