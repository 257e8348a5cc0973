//! engine::assets
//!
//! Asset synchronization for a resolved release.
//!
//! # Algorithm
//!
//! 1. Fetch the release's current attachments (failure aborts the run).
//! 2. Partition the local files by base name against those attachments,
//!    applying the [`FileExistsPolicy`]. Under `fail`, any collision aborts
//!    before a single delete or upload is issued.
//! 3. For each file to upload, in order: open it, delete the attachments it
//!    replaces, stream it to the forge.
//!
//! There is no rollback. A failure halfway through leaves earlier deletes and
//! uploads in place.

use std::collections::HashSet;

use super::Synchronizer;
use crate::core::types::{AssetFile, FileExistsPolicy};
use crate::error::PublishError;
use crate::forge::{Attachment, AttachmentUpload, Release};
use crate::ui::output;

/// A file that will be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedUpload {
    /// Local file
    pub file: AssetFile,
    /// Attachment name (base name)
    pub name: String,
    /// Existing attachments with the same name, deleted before upload
    pub replaces: Vec<Attachment>,
}

/// Outcome of the partition step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadPlan {
    /// Files to upload, in input order
    pub uploads: Vec<PlannedUpload>,
    /// Names left alone because an attachment already has them
    pub skipped: Vec<String>,
}

/// Result of a completed asset synchronization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetReport {
    /// Attachments created, in upload order
    pub uploaded: Vec<Attachment>,
    /// Names skipped under the `skip` policy
    pub skipped: Vec<String>,
    /// Number of attachments deleted
    pub deleted: usize,
}

/// Decide which files to upload.
///
/// # Errors
///
/// `PublishError::Conflict` naming the first colliding file when the policy
/// is `fail`.
pub fn partition(
    files: &[AssetFile],
    attachments: &[Attachment],
    policy: FileExistsPolicy,
) -> Result<UploadPlan, PublishError> {
    let mut plan = UploadPlan::default();

    for file in files {
        let name = file.name();
        let collisions: Vec<Attachment> = attachments
            .iter()
            .filter(|a| a.name == name)
            .cloned()
            .collect();

        if !collisions.is_empty() {
            match policy {
                FileExistsPolicy::Overwrite => {}
                FileExistsPolicy::Fail => return Err(PublishError::Conflict { name }),
                FileExistsPolicy::Skip => {
                    plan.skipped.push(name);
                    continue;
                }
            }
        }

        plan.uploads.push(PlannedUpload {
            file: file.clone(),
            name,
            replaces: collisions,
        });
    }

    Ok(plan)
}

impl<'a> Synchronizer<'a> {
    /// Upload `files` to `release`, resolving name collisions with `policy`.
    ///
    /// # Errors
    ///
    /// - `PublishError::Remote` if listing, deleting or uploading fails
    /// - `PublishError::Conflict` on a collision under `fail`
    /// - `PublishError::Io` if a local file cannot be read
    pub async fn sync_assets(
        &self,
        release: &Release,
        files: &[AssetFile],
        policy: FileExistsPolicy,
    ) -> Result<AssetReport, PublishError> {
        let attachments = self
            .forge
            .list_attachments(release.id)
            .await
            .map_err(|e| PublishError::remote("failed to fetch existing assets", e))?;

        output::debug(
            format!(
                "{} existing attachment(s) on release {}",
                attachments.len(),
                release.id
            ),
            self.verbosity,
        );

        let plan = partition(files, &attachments, policy)?;
        for name in &plan.skipped {
            output::print(
                format!("Skipping pre-existing {} artifact", name),
                self.verbosity,
            );
        }

        let mut report = AssetReport {
            skipped: plan.skipped,
            ..Default::default()
        };
        let mut deleted_ids = HashSet::new();

        for upload in plan.uploads {
            let handle = AttachmentUpload::open(upload.name, upload.file.path())
                .await
                .map_err(|e| PublishError::read(upload.file.path(), e))?;

            for old in &upload.replaces {
                // Two local files can share a base name; delete each attachment once.
                if !deleted_ids.insert(old.id) {
                    continue;
                }
                self.forge
                    .delete_attachment(release.id, old.id)
                    .await
                    .map_err(|e| {
                        PublishError::remote(format!("failed to delete {} artifact", old.name), e)
                    })?;
                report.deleted += 1;
                output::print(
                    format!("Successfully deleted old {} artifact", old.name),
                    self.verbosity,
                );
            }

            let size = handle.size;
            let attachment = self
                .forge
                .create_attachment(release.id, handle)
                .await
                .map_err(|e| {
                    PublishError::remote(format!("failed to upload {} artifact", upload.file), e)
                })?;

            output::print(
                format!(
                    "Successfully uploaded {} artifact ({})",
                    upload.file,
                    output::format_bytes(size)
                ),
                self.verbosity,
            );
            report.uploaded.push(attachment);
        }

        Ok(report)
    }
}
