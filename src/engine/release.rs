//! engine::release
//!
//! Find-or-create-or-edit for the target release.
//!
//! ```text
//! Searching --found, !allow_edit--> Done (unchanged)
//! Searching --found,  allow_edit--> Editing  --ok--> Done
//! Searching --not found---------->  Creating --ok--> Done
//! Searching --list failed-------->  Creating        (fail-open)
//!                                   abort            (strict lookup)
//! ```
//!
//! Edit and create failures are fatal. Nothing is retried.

use super::Synchronizer;
use crate::core::types::{LookupPolicy, ReleaseDescriptor, ReleaseTarget};
use crate::error::PublishError;
use crate::forge::{CreateReleaseRequest, EditReleaseRequest, Release};
use crate::ui::output;

/// What the synchronizer did to obtain the release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseAction {
    /// An existing release was used unchanged
    Retrieved,
    /// An existing release was edited
    Edited,
    /// A new release was created
    Created,
}

impl<'a> Synchronizer<'a> {
    /// Make sure a release exists for the target tag and return it.
    ///
    /// # Errors
    ///
    /// `PublishError::Remote` if editing or creating fails, or if listing
    /// fails under `LookupPolicy::Strict`.
    pub async fn reconcile_release(
        &self,
        target: &ReleaseTarget,
        descriptor: &ReleaseDescriptor,
        lookup: LookupPolicy,
    ) -> Result<(Release, ReleaseAction), PublishError> {
        match self.find_release(target, lookup).await? {
            Some(existing) if descriptor.allow_edit => {
                let edited = self.edit_release(existing.id, target, descriptor).await?;
                Ok((edited, ReleaseAction::Edited))
            }
            Some(existing) => Ok((existing, ReleaseAction::Retrieved)),
            None => {
                let created = self.create_release(target, descriptor).await?;
                Ok((created, ReleaseAction::Created))
            }
        }
    }

    /// Look for the first release whose tag matches exactly.
    async fn find_release(
        &self,
        target: &ReleaseTarget,
        lookup: LookupPolicy,
    ) -> Result<Option<Release>, PublishError> {
        let releases = match self.forge.list_releases().await {
            Ok(releases) => releases,
            Err(e) if lookup == LookupPolicy::FailOpen => {
                output::warn(
                    format!(
                        "failed to list releases, assuming {} does not exist: {}",
                        target.tag, e
                    ),
                    self.verbosity,
                );
                return Ok(None);
            }
            Err(e) => return Err(PublishError::remote("failed to list releases", e)),
        };

        output::debug(
            format!(
                "{} release(s) on {} repository {}/{}",
                releases.len(),
                self.forge.name(),
                target.owner,
                target.repo
            ),
            self.verbosity,
        );

        match releases.into_iter().find(|r| r.tag_name == target.tag) {
            Some(release) => {
                output::print(
                    format!("Successfully retrieved {} release", target.tag),
                    self.verbosity,
                );
                Ok(Some(release))
            }
            None => {
                output::debug(format!("release {} not found", target.tag), self.verbosity);
                Ok(None)
            }
        }
    }

    async fn edit_release(
        &self,
        id: i64,
        target: &ReleaseTarget,
        descriptor: &ReleaseDescriptor,
    ) -> Result<Release, PublishError> {
        let request = EditReleaseRequest {
            id,
            tag_name: target.tag.clone(),
            title: descriptor.title.clone(),
            note: descriptor.note.clone(),
            draft: descriptor.draft,
            prerelease: descriptor.prerelease,
        };

        let release = self
            .forge
            .edit_release(request)
            .await
            .map_err(|e| PublishError::remote("failed to edit release", e))?;

        output::print(
            format!("Successfully edited {} release", target.tag),
            self.verbosity,
        );
        Ok(release)
    }

    async fn create_release(
        &self,
        target: &ReleaseTarget,
        descriptor: &ReleaseDescriptor,
    ) -> Result<Release, PublishError> {
        let request = CreateReleaseRequest {
            tag_name: target.tag.clone(),
            title: descriptor.title.clone(),
            note: descriptor.note.clone(),
            draft: descriptor.draft,
            prerelease: descriptor.prerelease,
        };

        let release = self
            .forge
            .create_release(request)
            .await
            .map_err(|e| PublishError::remote("failed to create release", e))?;

        output::print(
            format!("Successfully created {} release", target.tag),
            self.verbosity,
        );
        Ok(release)
    }
}
