//! core::types
//!
//! Domain types shared by the validator and the synchronizer.
//!
//! # Types
//!
//! - [`ReleaseTarget`] - Which release to act on (owner, repo, tag)
//! - [`ReleaseDescriptor`] - Desired release state (title, note, flags)
//! - [`FileExistsPolicy`] - How asset name collisions are resolved
//! - [`LookupPolicy`] - What a failed release listing means
//! - [`AssetFile`] - A local file destined for upload
//! - [`PublishPlan`] - Everything the synchronizer needs, fully resolved
//!
//! # Examples
//!
//! ```
//! use gitea_release::core::types::{AssetFile, FileExistsPolicy};
//!
//! let policy: FileExistsPolicy = "skip".parse().unwrap();
//! assert_eq!(policy, FileExistsPolicy::Skip);
//! assert!("replace".parse::<FileExistsPolicy>().is_err());
//!
//! let file = AssetFile::new("dist/out.bin");
//! assert_eq!(file.name(), "out.bin");
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::core::config::ConfigError;
use crate::forge::TransportConfig;

/// Identifies the release to act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTarget {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Resolved, non-empty tag
    pub tag: String,
}

/// Desired state of the release.
///
/// This is intent, not server state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReleaseDescriptor {
    /// Release title (the tag when nothing else was given)
    pub title: String,
    /// Release notes
    pub note: String,
    /// Publish as draft
    pub draft: bool,
    /// Mark as prerelease
    pub prerelease: bool,
    /// Edit an existing release instead of using it as-is
    pub allow_edit: bool,
}

/// Collision handling when a local file's name matches an existing attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileExistsPolicy {
    /// Replace the existing attachment
    #[default]
    Overwrite,
    /// Abort the run before anything is uploaded or deleted
    Fail,
    /// Leave the existing attachment and do not upload the file
    Skip,
}

impl FileExistsPolicy {
    /// All accepted spellings, in display order.
    pub const VALUES: [&'static str; 3] = ["overwrite", "fail", "skip"];

    /// The configuration spelling of this policy.
    pub fn as_str(self) -> &'static str {
        match self {
            FileExistsPolicy::Overwrite => "overwrite",
            FileExistsPolicy::Fail => "fail",
            FileExistsPolicy::Skip => "skip",
        }
    }
}

impl fmt::Display for FileExistsPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileExistsPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "overwrite" => Ok(FileExistsPolicy::Overwrite),
            "fail" => Ok(FileExistsPolicy::Fail),
            "skip" => Ok(FileExistsPolicy::Skip),
            other => Err(ConfigError::InvalidFileExists(other.to_string())),
        }
    }
}

/// How the synchronizer treats a failure to list existing releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookupPolicy {
    /// Log the failure and create the release as if none existed
    #[default]
    FailOpen,
    /// Abort the run
    Strict,
}

impl LookupPolicy {
    /// Policy for the `strict_lookup` flag.
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            LookupPolicy::Strict
        } else {
            LookupPolicy::FailOpen
        }
    }
}

/// A local file destined for upload.
///
/// Its attachment name is the path's base name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetFile {
    path: PathBuf,
}

impl AssetFile {
    /// Wrap a local path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The local path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The attachment name: the base name of the path.
    pub fn name(&self) -> String {
        match self.path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => self.path.to_string_lossy().into_owned(),
        }
    }
}

impl fmt::Display for AssetFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Fully resolved invocation, produced by the validator.
#[derive(Clone)]
pub struct PublishPlan {
    /// Release to act on
    pub target: ReleaseTarget,
    /// Desired release state
    pub release: ReleaseDescriptor,
    /// Files to upload, in upload order
    pub files: Vec<AssetFile>,
    /// Collision handling
    pub file_exists: FileExistsPolicy,
    /// Release listing failure handling
    pub lookup: LookupPolicy,
    /// Forge server root, ending with `/`
    pub base_url: String,
    /// API token
    pub api_key: String,
    /// Outbound HTTP settings
    pub transport: TransportConfig,
}

// Custom Debug to avoid exposing api_key
impl fmt::Debug for PublishPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublishPlan")
            .field("target", &self.target)
            .field("release", &self.release)
            .field("files", &self.files)
            .field("file_exists", &self.file_exists)
            .field("lookup", &self.lookup)
            .field("base_url", &self.base_url)
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}
