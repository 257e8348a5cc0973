//! core::config::schema
//!
//! Raw invocation configuration.
//!
//! Every field is optional at this stage; the validator decides what is
//! required. The same shape is read from the optional TOML file and built
//! from command-line flags and CI environment variables.
//!
//! # Example
//!
//! ```toml
//! base_url = "https://gitea.example.com"
//! files = ["dist/*.tar.gz", "dist/*.zip"]
//! file_exists = "skip"
//! checksum = ["sha256"]
//! note = "CHANGELOG.md"
//! allow_edit = true
//! ```

use serde::{Deserialize, Serialize};

/// Unvalidated configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RawConfig {
    /// API token
    pub api_key: Option<String>,
    /// Forge server root
    pub base_url: Option<String>,
    /// Glob patterns of files to upload, in order
    pub files: Vec<String>,
    /// Collision policy: overwrite, fail or skip
    pub file_exists: Option<String>,
    /// Checksum algorithm names
    pub checksum: Vec<String>,
    /// Publish as draft
    pub draft: Option<bool>,
    /// Mark as prerelease
    pub prerelease: Option<bool>,
    /// Skip TLS verification and keep cookies
    pub insecure: Option<bool>,
    /// Release title (literal or file)
    pub title: Option<String>,
    /// Release notes (literal or file)
    pub note: Option<String>,
    /// Tag override (literal or file)
    pub tag: Option<String>,
    /// Edit an existing release
    pub allow_edit: Option<bool>,
    /// Abort when existing releases cannot be listed
    pub strict_lookup: Option<bool>,
    /// Repository owner
    pub owner: Option<String>,
    /// Repository name
    pub repo: Option<String>,
    /// Triggering CI event (e.g. "tag", "push")
    pub event: Option<String>,
    /// Triggering ref (e.g. "refs/tags/v1.0.0")
    pub commit_ref: Option<String>,
}

impl RawConfig {
    /// Overlay `overrides` on top of `self`.
    ///
    /// Set scalar fields and non-empty lists in `overrides` win.
    pub fn merge(self, overrides: RawConfig) -> RawConfig {
        fn list(base: Vec<String>, over: Vec<String>) -> Vec<String> {
            if over.is_empty() {
                base
            } else {
                over
            }
        }

        RawConfig {
            api_key: overrides.api_key.or(self.api_key),
            base_url: overrides.base_url.or(self.base_url),
            files: list(self.files, overrides.files),
            file_exists: overrides.file_exists.or(self.file_exists),
            checksum: list(self.checksum, overrides.checksum),
            draft: overrides.draft.or(self.draft),
            prerelease: overrides.prerelease.or(self.prerelease),
            insecure: overrides.insecure.or(self.insecure),
            title: overrides.title.or(self.title),
            note: overrides.note.or(self.note),
            tag: overrides.tag.or(self.tag),
            allow_edit: overrides.allow_edit.or(self.allow_edit),
            strict_lookup: overrides.strict_lookup.or(self.strict_lookup),
            owner: overrides.owner.or(self.owner),
            repo: overrides.repo.or(self.repo),
            event: overrides.event.or(self.event),
            commit_ref: overrides.commit_ref.or(self.commit_ref),
        }
    }
}
