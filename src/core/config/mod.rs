//! core::config
//!
//! Configuration loading and validation.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Config file (`--config` or `$GITEA_RELEASE_CONFIG`), if given
//! 2. CLI flags and CI environment variables (`PLUGIN_*`, `DRONE_*`)
//!
//! The merged [`RawConfig`] is then turned into a
//! [`PublishPlan`](crate::core::types::PublishPlan) by [`validate`], which
//! performs every check before any network call is made.
//!
//! # Example
//!
//! ```no_run
//! use gitea_release::core::config::{load_file, validate, RawConfig};
//! use std::path::Path;
//!
//! let file = load_file(Path::new("release.toml")).unwrap();
//! let flags = RawConfig {
//!     api_key: Some("token".to_string()),
//!     ..Default::default()
//! };
//! let plan = validate(file.merge(flags)).unwrap();
//! println!("Publishing {}", plan.target.tag);
//! ```

pub mod schema;
mod validate;

pub use schema::RawConfig;
pub use validate::{validate, TAG_EVENT, TAG_REF_PREFIX};

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{}'", .path.display())]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{}': {message}", .path.display())]
    ParseError { path: PathBuf, message: String },

    #[error("the Gitea release step is only available for tags")]
    TagEventRequired,

    #[error("the resolved tag is empty")]
    EmptyTag,

    #[error("you must provide an API key")]
    MissingApiKey,

    #[error("invalid value for file_exists: '{0}' (expected one of: overwrite, fail, skip)")]
    InvalidFileExists(String),

    #[error("you must provide a base url")]
    MissingBaseUrl,

    #[error("you must provide the repository {0}")]
    MissingRepository(&'static str),

    #[error("failed to glob {pattern}: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error(
        "unsupported checksum algorithm '{0}' (expected one of: md5, sha1, sha224, sha256, \
         sha384, sha512, adler32, crc32, blake2b, blake2s)"
    )]
    UnknownChecksum(String),
}

/// Read and parse a TOML config file.
///
/// # Errors
///
/// Returns `ReadError` if the file cannot be read and `ParseError` if it is
/// not valid TOML or contains unknown keys.
pub fn load_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
