//! forge::mock
//!
//! Mock forge implementation for deterministic testing.
//!
//! # Design
//!
//! The mock forge provides a deterministic implementation of the `Forge` trait
//! for use in tests. It stores releases and attachments in memory, records
//! every call, and allows configuring failure scenarios.
//!
//! # Example
//!
//! ```
//! use gitea_release::forge::mock::MockForge;
//! use gitea_release::forge::{CreateReleaseRequest, Forge};
//!
//! # tokio_test::block_on(async {
//! let forge = MockForge::new();
//!
//! let release = forge.create_release(CreateReleaseRequest {
//!     tag_name: "v1.0.0".to_string(),
//!     title: "v1.0.0".to_string(),
//!     note: String::new(),
//!     draft: false,
//!     prerelease: false,
//! }).await.unwrap();
//!
//! assert_eq!(release.id, 1);
//! assert_eq!(forge.list_releases().await.unwrap().len(), 1);
//! # });
//! ```

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use super::traits::{
    Attachment, AttachmentUpload, CreateReleaseRequest, EditReleaseRequest, Forge, ForgeError,
    Release,
};

/// Mock forge for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping.
#[derive(Debug, Clone)]
pub struct MockForge {
    /// Internal state shared across clones.
    inner: Arc<Mutex<MockForgeInner>>,
}

/// Internal mutable state.
#[derive(Debug)]
struct MockForgeInner {
    /// Releases in listing order.
    releases: Vec<Release>,
    /// Attachments by release ID.
    attachments: BTreeMap<i64, Vec<Attachment>>,
    /// Next ID to assign (shared by releases and attachments).
    next_id: i64,
    /// Method to fail on (for testing error paths).
    fail_on: Option<FailOn>,
    /// Recorded operations for verification.
    operations: Vec<MockOperation>,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Fail list_releases with the given error.
    ListReleases(ForgeError),
    /// Fail create_release with the given error.
    CreateRelease(ForgeError),
    /// Fail edit_release with the given error.
    EditRelease(ForgeError),
    /// Fail list_attachments with the given error.
    ListAttachments(ForgeError),
    /// Fail create_attachment with the given error.
    CreateAttachment(ForgeError),
    /// Fail delete_attachment with the given error.
    DeleteAttachment(ForgeError),
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    ListReleases,
    CreateRelease(CreateReleaseRequest),
    EditRelease(EditReleaseRequest),
    ListAttachments {
        release_id: i64,
    },
    CreateAttachment {
        release_id: i64,
        name: String,
        size: u64,
    },
    DeleteAttachment {
        release_id: i64,
        attachment_id: i64,
    },
}

impl MockForge {
    /// Create a new empty mock forge.
    pub fn new() -> Self {
        Self::with_releases(Vec::new())
    }

    /// Create a mock forge with pre-existing releases.
    ///
    /// IDs assigned later start after the largest existing ID.
    ///
    /// # Example
    ///
    /// ```
    /// use gitea_release::forge::mock::MockForge;
    /// use gitea_release::forge::Release;
    ///
    /// let forge = MockForge::with_releases(vec![Release {
    ///     id: 7,
    ///     tag_name: "v1.0.0".to_string(),
    ///     title: "v1.0.0".to_string(),
    ///     note: String::new(),
    ///     draft: false,
    ///     prerelease: false,
    ///     url: None,
    /// }]);
    /// assert_eq!(forge.release_count(), 1);
    /// ```
    pub fn with_releases(releases: Vec<Release>) -> Self {
        let max_id = releases.iter().map(|r| r.id).max().unwrap_or(0);

        Self {
            inner: Arc::new(Mutex::new(MockForgeInner {
                releases,
                attachments: BTreeMap::new(),
                next_id: max_id + 1,
                fail_on: None,
                operations: Vec::new(),
            })),
        }
    }

    /// Seed attachments for a release.
    pub fn with_attachments(self, release_id: i64, attachments: Vec<Attachment>) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            let max_id = attachments.iter().map(|a| a.id).max().unwrap_or(0);
            inner.next_id = inner.next_id.max(max_id + 1);
            inner
                .attachments
                .entry(release_id)
                .or_default()
                .extend(attachments);
        }
        self
    }

    /// Configure the mock to fail on a specific operation.
    ///
    /// # Example
    ///
    /// ```
    /// use gitea_release::forge::mock::{MockForge, FailOn};
    /// use gitea_release::forge::ForgeError;
    ///
    /// let forge = MockForge::new()
    ///     .fail_on(FailOn::CreateRelease(ForgeError::RateLimited));
    /// ```
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.fail_on = Some(fail_on);
        }
        self
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<MockOperation> {
        let inner = self.inner.lock().unwrap();
        inner.operations.clone()
    }

    /// Get the count of releases.
    pub fn release_count(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.releases.len()
    }

    /// Get the attachments currently stored for a release (for test verification).
    pub fn attachments_sync(&self, release_id: i64) -> Vec<Attachment> {
        let inner = self.inner.lock().unwrap();
        inner
            .attachments
            .get(&release_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Record an operation.
    fn record(&self, op: MockOperation) {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(op);
    }

    /// Check if we should fail and return the error if so.
    fn check_fail(&self, expected: &str) -> Option<ForgeError> {
        let inner = self.inner.lock().unwrap();
        match &inner.fail_on {
            Some(FailOn::ListReleases(e)) if expected == "list_releases" => Some(e.clone()),
            Some(FailOn::CreateRelease(e)) if expected == "create_release" => Some(e.clone()),
            Some(FailOn::EditRelease(e)) if expected == "edit_release" => Some(e.clone()),
            Some(FailOn::ListAttachments(e)) if expected == "list_attachments" => Some(e.clone()),
            Some(FailOn::CreateAttachment(e)) if expected == "create_attachment" => {
                Some(e.clone())
            }
            Some(FailOn::DeleteAttachment(e)) if expected == "delete_attachment" => {
                Some(e.clone())
            }
            _ => None,
        }
    }
}

impl Default for MockForge {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Forge for MockForge {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn list_releases(&self) -> Result<Vec<Release>, ForgeError> {
        self.record(MockOperation::ListReleases);

        if let Some(err) = self.check_fail("list_releases") {
            return Err(err);
        }

        let inner = self.inner.lock().unwrap();
        Ok(inner.releases.clone())
    }

    async fn create_release(&self, request: CreateReleaseRequest) -> Result<Release, ForgeError> {
        self.record(MockOperation::CreateRelease(request.clone()));

        if let Some(err) = self.check_fail("create_release") {
            return Err(err);
        }

        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id;
        inner.next_id += 1;

        let release = Release {
            id,
            url: Some(format!(
                "https://gitea.example.com/mock/repo/releases/tag/{}",
                request.tag_name
            )),
            tag_name: request.tag_name,
            title: request.title,
            note: request.note,
            draft: request.draft,
            prerelease: request.prerelease,
        };

        inner.releases.push(release.clone());
        Ok(release)
    }

    async fn edit_release(&self, request: EditReleaseRequest) -> Result<Release, ForgeError> {
        self.record(MockOperation::EditRelease(request.clone()));

        if let Some(err) = self.check_fail("edit_release") {
            return Err(err);
        }

        let mut inner = self.inner.lock().unwrap();
        let release = inner
            .releases
            .iter_mut()
            .find(|r| r.id == request.id)
            .ok_or_else(|| ForgeError::NotFound(format!("release {}", request.id)))?;

        release.tag_name = request.tag_name;
        release.title = request.title;
        release.note = request.note;
        release.draft = request.draft;
        release.prerelease = request.prerelease;

        Ok(release.clone())
    }

    async fn list_attachments(&self, release_id: i64) -> Result<Vec<Attachment>, ForgeError> {
        self.record(MockOperation::ListAttachments { release_id });

        if let Some(err) = self.check_fail("list_attachments") {
            return Err(err);
        }

        let inner = self.inner.lock().unwrap();
        Ok(inner
            .attachments
            .get(&release_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_attachment(
        &self,
        release_id: i64,
        upload: AttachmentUpload,
    ) -> Result<Attachment, ForgeError> {
        let size = upload.size;
        self.record(MockOperation::CreateAttachment {
            release_id,
            name: upload.name.clone(),
            size,
        });

        if let Some(err) = self.check_fail("create_attachment") {
            return Err(err);
        }

        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id;
        inner.next_id += 1;

        let attachment = Attachment {
            id,
            name: upload.name,
            size,
            download_url: Some(format!("https://gitea.example.com/attachments/{}", id)),
        };

        inner
            .attachments
            .entry(release_id)
            .or_default()
            .push(attachment.clone());
        Ok(attachment)
    }

    async fn delete_attachment(
        &self,
        release_id: i64,
        attachment_id: i64,
    ) -> Result<(), ForgeError> {
        self.record(MockOperation::DeleteAttachment {
            release_id,
            attachment_id,
        });

        if let Some(err) = self.check_fail("delete_attachment") {
            return Err(err);
        }

        let mut inner = self.inner.lock().unwrap();
        let attachments = inner.attachments.entry(release_id).or_default();
        let before = attachments.len();
        attachments.retain(|a| a.id != attachment_id);

        if attachments.len() == before {
            return Err(ForgeError::NotFound(format!("attachment {}", attachment_id)));
        }
        Ok(())
    }
}
