//! engine
//!
//! Release synchronizer: reconciles the desired release against the forge,
//! then synchronizes its assets.
//!
//! # Lifecycle
//!
//! ```text
//! PublishPlan -> reconcile_release -> sync_assets -> SyncReport
//! ```
//!
//! Every forge call is awaited before the next one is issued. Any error ends
//! the run; steps that already completed are not undone.
//!
//! # Example
//!
//! ```ignore
//! use gitea_release::engine::Synchronizer;
//! use gitea_release::ui::output::Verbosity;
//!
//! let sync = Synchronizer::new(&forge, Verbosity::Normal);
//! let report = sync.publish(&plan).await?;
//! println!("uploaded {} file(s)", report.assets.uploaded.len());
//! ```

pub mod assets;
pub mod release;

pub use assets::{partition, AssetReport, PlannedUpload, UploadPlan};
pub use release::ReleaseAction;

use crate::core::types::PublishPlan;
use crate::error::SyncError;
use crate::forge::{Forge, Release};
use crate::ui::output::Verbosity;

/// Drives one publish run against a forge.
pub struct Synchronizer<'a> {
    forge: &'a dyn Forge,
    verbosity: Verbosity,
}

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// The release assets were attached to
    pub release: Release,
    /// How the release was obtained
    pub action: ReleaseAction,
    /// Asset synchronization outcome
    pub assets: AssetReport,
}

impl<'a> Synchronizer<'a> {
    /// Create a synchronizer over `forge`.
    pub fn new(forge: &'a dyn Forge, verbosity: Verbosity) -> Self {
        Self { forge, verbosity }
    }

    /// Run both phases for a validated plan.
    ///
    /// # Errors
    ///
    /// - `SyncError::Release` wrapping an error from
    ///   [`reconcile_release`](Self::reconcile_release)
    /// - `SyncError::Assets` wrapping an error from
    ///   [`sync_assets`](Self::sync_assets)
    pub async fn publish(&self, plan: &PublishPlan) -> Result<SyncReport, SyncError> {
        let (release, action) = self
            .reconcile_release(&plan.target, &plan.release, plan.lookup)
            .await
            .map_err(SyncError::Release)?;
        let assets = self
            .sync_assets(&release, &plan.files, plan.file_exists)
            .await
            .map_err(SyncError::Assets)?;

        Ok(SyncReport {
            release,
            action,
            assets,
        })
    }
}
