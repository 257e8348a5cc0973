//! error
//!
//! Run-level error type.
//!
//! Every failure ends the run. The variant says which kind of failure it was:
//! bad invocation parameters, a local file problem, a forge API failure, or an
//! asset name collision under the `fail` policy.
//!
//! [`SyncError`] wraps a `PublishError` with the synchronizer phase it came
//! from, so callers see which half of a run failed.
//!
//! Display strings carry only the context; the underlying cause is exposed
//! through `source()` so the CLI prints each link of the chain once.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::core::config::ConfigError;
use crate::forge::ForgeError;

/// Errors that abort a publish run.
#[derive(Debug, Error)]
pub enum PublishError {
    /// Invalid or missing invocation parameters.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A local file could not be read or written.
    #[error("{action} {}", .path.display())]
    Io {
        /// What was being attempted ("failed to read", ...)
        action: &'static str,
        /// The file involved
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A forge API call failed.
    #[error("{context}")]
    Remote {
        /// The operation that failed
        context: String,
        #[source]
        source: ForgeError,
    },

    /// An asset with the same name already exists and the policy is `fail`.
    #[error("asset file {name} already exists")]
    Conflict {
        /// Attachment name
        name: String,
    },
}

impl PublishError {
    /// Build an `Io` error for a file that could not be read.
    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        PublishError::Io {
            action: "failed to read",
            path: path.into(),
            source,
        }
    }

    /// Build an `Io` error for a file that could not be written.
    pub fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        PublishError::Io {
            action: "failed to write",
            path: path.into(),
            source,
        }
    }

    /// Build a `Remote` error with the failing operation as context.
    pub fn remote(context: impl Into<String>, source: ForgeError) -> Self {
        PublishError::Remote {
            context: context.into(),
            source,
        }
    }
}

/// A publish run failure, tagged with the phase that failed.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Finding, creating, or editing the release failed.
    #[error("failed to create the release")]
    Release(#[source] PublishError),

    /// Deleting or uploading attachments failed.
    #[error("failed to upload the files")]
    Assets(#[source] PublishError),
}

impl SyncError {
    /// The underlying failure, without the phase.
    pub fn inner(&self) -> &PublishError {
        match self {
            SyncError::Release(e) | SyncError::Assets(e) => e,
        }
    }
}
