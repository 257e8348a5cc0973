//! forge::traits
//!
//! Forge trait definition for release and attachment operations.
//!
//! # Design
//!
//! The `Forge` trait is async because forge operations involve network I/O.
//! All methods return `Result` so callers decide which failures are fatal.
//! The release synchronizer issues every call sequentially and never retries.
//!
//! # Example
//!
//! ```ignore
//! use gitea_release::forge::{Forge, CreateReleaseRequest, ForgeError};
//!
//! async fn publish(forge: &dyn Forge) -> Result<(), ForgeError> {
//!     let release = forge
//!         .create_release(CreateReleaseRequest {
//!             tag_name: "v1.0.0".to_string(),
//!             title: "v1.0.0".to_string(),
//!             note: String::new(),
//!             draft: false,
//!             prerelease: false,
//!         })
//!         .await?;
//!     println!("Created release {} ({})", release.tag_name, release.id);
//!     Ok(())
//! }
//! ```

use std::io;
use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;
use tokio::fs::File;

/// Errors from forge operations.
///
/// These error types map to common failure modes when talking to the
/// forge's REST API.
#[derive(Debug, Clone, Error)]
pub enum ForgeError {
    /// Authentication is required but not available.
    #[error("authentication required")]
    AuthRequired,

    /// Authentication failed (invalid token, insufficient permissions).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded.
    #[error("rate limited")]
    RateLimited,

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The server answered, but not in a way the client can act on.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Request to create a release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateReleaseRequest {
    /// Tag the release is attached to
    pub tag_name: String,
    /// Release title
    pub title: String,
    /// Release notes (markdown body)
    pub note: String,
    /// Create as draft
    pub draft: bool,
    /// Mark as prerelease
    pub prerelease: bool,
}

/// Request to edit an existing release.
///
/// Every field is sent; the forge replaces the stored values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditReleaseRequest {
    /// Release ID
    pub id: i64,
    /// Tag the release is attached to
    pub tag_name: String,
    /// Release title
    pub title: String,
    /// Release notes (markdown body)
    pub note: String,
    /// Draft flag
    pub draft: bool,
    /// Prerelease flag
    pub prerelease: bool,
}

/// Release information returned from the forge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    /// Opaque numeric ID
    pub id: i64,
    /// Tag name
    pub tag_name: String,
    /// Release title
    pub title: String,
    /// Release notes
    pub note: String,
    /// Whether the release is a draft
    pub draft: bool,
    /// Whether the release is a prerelease
    pub prerelease: bool,
    /// Web URL for viewing the release, when the forge reports one
    pub url: Option<String>,
}

/// Attachment (release asset) information returned from the forge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Opaque numeric ID
    pub id: i64,
    /// Display name (the uploaded file's base name)
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Download URL, when the forge reports one
    pub download_url: Option<String>,
}

/// A file to attach to a release.
///
/// Holds an open handle rather than the contents; the forge streams it and
/// the handle is closed when the upload call returns.
#[derive(Debug)]
pub struct AttachmentUpload {
    /// Attachment name (base name of the local file)
    pub name: String,
    /// Open handle positioned at the start of the file
    pub file: File,
    /// Length of the file in bytes
    pub size: u64,
}

impl AttachmentUpload {
    /// Open `path` for upload under `name`.
    pub async fn open(name: impl Into<String>, path: &Path) -> io::Result<Self> {
        let file = File::open(path).await?;
        let size = file.metadata().await?.len();
        Ok(Self {
            name: name.into(),
            file,
            size,
        })
    }
}

/// The Forge trait for release operations on a single repository.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow use across async tasks.
///
/// # Error Handling
///
/// All methods return `Result<T, ForgeError>`. The synchronizer treats every
/// error as fatal except a failed release listing, which it may treat as
/// "no release exists".
#[async_trait]
pub trait Forge: Send + Sync {
    /// Get the forge name (e.g., "gitea").
    fn name(&self) -> &'static str;

    /// List every release of the repository, in the order the forge returns them.
    async fn list_releases(&self) -> Result<Vec<Release>, ForgeError>;

    /// Create a new release.
    ///
    /// # Errors
    ///
    /// - `AuthFailed` if the token is invalid or lacks permissions
    /// - `ApiError` with status 409 or 422 if the forge rejects the request
    async fn create_release(&self, request: CreateReleaseRequest) -> Result<Release, ForgeError>;

    /// Edit an existing release.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the release doesn't exist
    /// - `AuthFailed` if lacking permissions to edit
    async fn edit_release(&self, request: EditReleaseRequest) -> Result<Release, ForgeError>;

    /// List the attachments of a release.
    async fn list_attachments(&self, release_id: i64) -> Result<Vec<Attachment>, ForgeError>;

    /// Upload a new attachment to a release.
    async fn create_attachment(
        &self,
        release_id: i64,
        upload: AttachmentUpload,
    ) -> Result<Attachment, ForgeError>;

    /// Delete an attachment from a release.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the attachment doesn't exist
    async fn delete_attachment(&self, release_id: i64, attachment_id: i64)
        -> Result<(), ForgeError>;
}
