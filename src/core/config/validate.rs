//! core::config::validate
//!
//! Turns a [`RawConfig`] into a [`PublishPlan`].
//!
//! Rules are applied in a fixed order and the first violation wins:
//!
//! 1. Resolve the tag (override, else the triggering tag ref)
//! 2. Require an API key
//! 3. Parse the file-exists policy
//! 4. Require and normalize the base URL, then the repository
//! 5. Resolve note and title
//! 6. Expand file patterns
//! 7. Generate checksum files
//! 8. Default the title to the tag
//!
//! Nothing here touches the network.

use std::collections::HashSet;
use std::path::PathBuf;

use super::{ConfigError, RawConfig};
use crate::core::checksum::{parse_algorithms, write_checksums};
use crate::core::files::expand_patterns;
use crate::core::resolve::literal_or_file;
use crate::core::types::{
    FileExistsPolicy, LookupPolicy, PublishPlan, ReleaseDescriptor, ReleaseTarget,
};
use crate::error::PublishError;
use crate::forge::TransportConfig;

/// CI event name that allows deriving the tag from the commit ref.
pub const TAG_EVENT: &str = "tag";

/// Prefix stripped from the commit ref to obtain the tag.
pub const TAG_REF_PREFIX: &str = "refs/tags/";

/// Validate and resolve a raw configuration.
///
/// # Errors
///
/// - `PublishError::Config` for missing or invalid parameters
/// - `PublishError::Io` when a literal-or-file value, a matched file, or a
///   checksum file cannot be read or written
pub fn validate(raw: RawConfig) -> Result<PublishPlan, PublishError> {
    let tag = resolve_tag(&raw)?;

    let api_key = raw.api_key.unwrap_or_default();
    if api_key.is_empty() {
        return Err(ConfigError::MissingApiKey.into());
    }

    let file_exists: FileExistsPolicy = raw.file_exists.as_deref().unwrap_or_default().parse()?;

    let mut base_url = raw.base_url.unwrap_or_default();
    if base_url.is_empty() {
        return Err(ConfigError::MissingBaseUrl.into());
    }
    if !base_url.ends_with('/') {
        base_url.push('/');
    }

    let owner = raw.owner.unwrap_or_default();
    if owner.is_empty() {
        return Err(ConfigError::MissingRepository("owner").into());
    }
    let repo = raw.repo.unwrap_or_default();
    if repo.is_empty() {
        return Err(ConfigError::MissingRepository("name").into());
    }

    let note = resolve_field(raw.note.as_deref())?;
    let mut title = resolve_field(raw.title.as_deref())?;

    let mut files = expand_patterns(&raw.files)?;

    if !raw.checksum.is_empty() {
        let algorithms = parse_algorithms(&raw.checksum)?;
        let checksums = write_checksums(&files, &algorithms)?;
        // A pattern may already have matched a checksum file from an earlier run.
        let mut seen: HashSet<PathBuf> = files.iter().map(|f| f.path().to_path_buf()).collect();
        files.extend(
            checksums
                .into_iter()
                .filter(|c| seen.insert(c.path().to_path_buf())),
        );
    }

    if title.is_empty() {
        title = tag.clone();
    }

    Ok(PublishPlan {
        target: ReleaseTarget { owner, repo, tag },
        release: ReleaseDescriptor {
            title,
            note,
            draft: raw.draft.unwrap_or(false),
            prerelease: raw.prerelease.unwrap_or(false),
            allow_edit: raw.allow_edit.unwrap_or(false),
        },
        files,
        file_exists,
        lookup: LookupPolicy::from_strict(raw.strict_lookup.unwrap_or(false)),
        base_url,
        api_key,
        transport: TransportConfig::with_insecure(raw.insecure.unwrap_or(false)),
    })
}

/// Resolve the tag from the override or the triggering ref.
fn resolve_tag(raw: &RawConfig) -> Result<String, PublishError> {
    let explicit = raw.tag.as_deref().unwrap_or_default();

    let tag = if !explicit.is_empty() {
        resolve_field(Some(explicit))?
    } else if raw.event.as_deref() == Some(TAG_EVENT) {
        let commit_ref = raw.commit_ref.as_deref().unwrap_or_default();
        commit_ref
            .strip_prefix(TAG_REF_PREFIX)
            .unwrap_or(commit_ref)
            .to_string()
    } else {
        return Err(ConfigError::TagEventRequired.into());
    };

    if tag.is_empty() {
        return Err(ConfigError::EmptyTag.into());
    }
    Ok(tag)
}

/// Resolve an optional literal-or-file value.
fn resolve_field(value: Option<&str>) -> Result<String, PublishError> {
    let value = value.unwrap_or_default();
    literal_or_file(value).map_err(|e| PublishError::read(value, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn base() -> RawConfig {
        RawConfig {
            api_key: Some("token".into()),
            base_url: Some("https://gitea.example.com".into()),
            file_exists: Some("overwrite".into()),
            owner: Some("octo".into()),
            repo: Some("app".into()),
            event: Some("tag".into()),
            commit_ref: Some("refs/tags/v1.0.0".into()),
            ..Default::default()
        }
    }

    fn config_err(raw: RawConfig) -> ConfigError {
        match validate(raw) {
            Err(PublishError::Config(e)) => e,
            other => panic!("expected config error, got {:?}", other),
        }
    }

    mod tag {
        use super::*;

        #[test]
        fn derived_from_ref() {
            let plan = validate(base()).unwrap();
            assert_eq!(plan.target.tag, "v1.0.0");
        }

        #[test]
        fn ref_without_prefix_kept() {
            let raw = RawConfig {
                commit_ref: Some("v3".into()),
                ..base()
            };
            assert_eq!(validate(raw).unwrap().target.tag, "v3");
        }

        #[test]
        fn override_wins_over_ref() {
            let raw = RawConfig {
                tag: Some("nightly".into()),
                ..base()
            };
            assert_eq!(validate(raw).unwrap().target.tag, "nightly");
        }

        #[test]
        fn override_from_file_is_trimmed() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("VERSION");
            fs::write(&path, "v2.0.0\n").unwrap();

            let raw = RawConfig {
                tag: Some(path.to_string_lossy().into_owned()),
                event: Some("push".into()),
                ..base()
            };
            assert_eq!(validate(raw).unwrap().target.tag, "v2.0.0");
        }

        #[test]
        fn non_tag_event_without_override_fails() {
            let raw = RawConfig {
                event: Some("push".into()),
                ..base()
            };
            assert!(matches!(config_err(raw), ConfigError::TagEventRequired));
        }

        #[test]
        fn tag_check_runs_before_api_key_check() {
            let raw = RawConfig {
                event: None,
                api_key: None,
                ..base()
            };
            assert!(matches!(config_err(raw), ConfigError::TagEventRequired));
        }

        #[test]
        fn empty_ref_on_tag_event_fails() {
            let raw = RawConfig {
                commit_ref: Some("refs/tags/".into()),
                ..base()
            };
            assert!(matches!(config_err(raw), ConfigError::EmptyTag));
        }
    }

    mod required_fields {
        use super::*;

        #[test]
        fn missing_api_key() {
            let raw = RawConfig {
                api_key: Some(String::new()),
                ..base()
            };
            assert!(matches!(config_err(raw), ConfigError::MissingApiKey));
        }

        #[test]
        fn invalid_file_exists() {
            let raw = RawConfig {
                file_exists: Some("replace".into()),
                ..base()
            };
            assert!(matches!(
                config_err(raw),
                ConfigError::InvalidFileExists(ref v) if v == "replace"
            ));
        }

        #[test]
        fn missing_file_exists_is_invalid() {
            let raw = RawConfig {
                file_exists: None,
                ..base()
            };
            assert!(matches!(config_err(raw), ConfigError::InvalidFileExists(_)));
        }

        #[test]
        fn policy_checked_before_base_url() {
            let raw = RawConfig {
                file_exists: Some("nope".into()),
                base_url: None,
                ..base()
            };
            assert!(matches!(config_err(raw), ConfigError::InvalidFileExists(_)));
        }

        #[test]
        fn missing_base_url() {
            let raw = RawConfig {
                base_url: None,
                ..base()
            };
            assert!(matches!(config_err(raw), ConfigError::MissingBaseUrl));
        }

        #[test]
        fn base_url_gets_trailing_slash() {
            assert_eq!(
                validate(base()).unwrap().base_url,
                "https://gitea.example.com/"
            );
        }

        #[test]
        fn missing_owner() {
            let raw = RawConfig {
                owner: None,
                ..base()
            };
            assert!(matches!(
                config_err(raw),
                ConfigError::MissingRepository("owner")
            ));
        }

        #[test]
        fn missing_repo() {
            let raw = RawConfig {
                repo: Some(String::new()),
                ..base()
            };
            assert!(matches!(
                config_err(raw),
                ConfigError::MissingRepository("name")
            ));
        }
    }

    mod descriptor {
        use super::*;

        #[test]
        fn title_defaults_to_tag() {
            let plan = validate(base()).unwrap();
            assert_eq!(plan.release.title, "v1.0.0");
            assert_eq!(plan.release.note, "");
        }

        #[test]
        fn title_from_empty_file_defaults_to_tag() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("TITLE");
            fs::write(&path, "  \n").unwrap();

            let raw = RawConfig {
                title: Some(path.to_string_lossy().into_owned()),
                ..base()
            };
            assert_eq!(validate(raw).unwrap().release.title, "v1.0.0");
        }

        #[test]
        fn note_from_file() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("NOTES.md");
            fs::write(&path, "## Fixed\n- crash on start\n").unwrap();

            let raw = RawConfig {
                note: Some(path.to_string_lossy().into_owned()),
                title: Some("Spring release".into()),
                ..base()
            };
            let plan = validate(raw).unwrap();
            assert_eq!(plan.release.note, "## Fixed\n- crash on start");
            assert_eq!(plan.release.title, "Spring release");
        }

        #[test]
        fn unreadable_note_is_io_error() {
            let dir = TempDir::new().unwrap();
            let raw = RawConfig {
                note: Some(dir.path().to_string_lossy().into_owned()),
                ..base()
            };
            assert!(matches!(validate(raw), Err(PublishError::Io { .. })));
        }

        #[test]
        fn flags_carried_through() {
            let raw = RawConfig {
                draft: Some(true),
                prerelease: Some(true),
                allow_edit: Some(true),
                insecure: Some(true),
                strict_lookup: Some(true),
                file_exists: Some("skip".into()),
                ..base()
            };
            let plan = validate(raw).unwrap();
            assert!(plan.release.draft);
            assert!(plan.release.prerelease);
            assert!(plan.release.allow_edit);
            assert!(plan.transport.insecure);
            assert_eq!(plan.lookup, LookupPolicy::Strict);
            assert_eq!(plan.file_exists, FileExistsPolicy::Skip);
        }
    }

    mod files {
        use super::*;

        #[test]
        fn files_and_checksums() {
            let dir = TempDir::new().unwrap();
            fs::write(dir.path().join("out.bin"), "binary").unwrap();

            let raw = RawConfig {
                files: vec![format!("{}/*.bin", dir.path().display())],
                checksum: vec!["sha256".into()],
                ..base()
            };
            let plan = validate(raw).unwrap();
            let names: Vec<_> = plan.files.iter().map(|f| f.name()).collect();
            assert_eq!(names, vec!["out.bin", "out.bin.sha256"]);
            assert!(dir.path().join("out.bin.sha256").is_file());
        }

        #[test]
        fn md5_sha1_crc32_accepted() {
            let dir = TempDir::new().unwrap();
            fs::write(dir.path().join("out.bin"), "binary").unwrap();

            let raw = RawConfig {
                files: vec![format!("{}/*.bin", dir.path().display())],
                checksum: vec!["md5".into(), "sha1".into(), "crc32".into()],
                ..base()
            };
            let plan = validate(raw).unwrap();
            let names: Vec<_> = plan.files.iter().map(|f| f.name()).collect();
            assert_eq!(
                names,
                vec!["out.bin", "out.bin.md5", "out.bin.sha1", "out.bin.crc32"]
            );
        }

        #[test]
        fn rerun_in_same_workspace_uploads_each_file_once() {
            let dir = TempDir::new().unwrap();
            fs::write(dir.path().join("out.bin"), "binary").unwrap();

            let raw = RawConfig {
                files: vec![format!("{}/*", dir.path().display())],
                checksum: vec!["sha256".into()],
                ..base()
            };
            validate(raw.clone()).unwrap();
            let plan = validate(raw).unwrap();

            let names: Vec<_> = plan.files.iter().map(|f| f.name()).collect();
            assert_eq!(names, vec!["out.bin", "out.bin.sha256"]);
            assert!(!dir.path().join("out.bin.sha256.sha256").exists());
        }

        #[test]
        fn unknown_checksum_is_config_error() {
            let raw = RawConfig {
                checksum: vec!["whirlpool".into()],
                ..base()
            };
            assert!(matches!(
                config_err(raw),
                ConfigError::UnknownChecksum(_)
            ));
        }

        #[test]
        fn malformed_pattern_is_config_error() {
            let raw = RawConfig {
                files: vec!["[".into()],
                ..base()
            };
            assert!(matches!(
                config_err(raw),
                ConfigError::InvalidPattern { .. }
            ));
        }
    }
}
