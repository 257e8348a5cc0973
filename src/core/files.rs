//! core::files
//!
//! Expansion of file glob patterns into the upload set.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::core::config::ConfigError;
use crate::core::types::AssetFile;
use crate::error::PublishError;

/// Expand glob patterns into asset files, preserving pattern order.
///
/// A pattern that matches nothing contributes no files. Directories are
/// dropped. A file matched by more than one pattern appears once, at its
/// first position.
///
/// # Errors
///
/// - `ConfigError::InvalidPattern` for a malformed pattern
/// - `PublishError::Io` if a matched path cannot be read while walking
pub fn expand_patterns(patterns: &[String]) -> Result<Vec<AssetFile>, PublishError> {
    let mut files: Vec<AssetFile> = Vec::new();
    let mut seen: HashSet<PathBuf> = HashSet::new();

    for pattern in patterns {
        let entries = glob::glob(pattern).map_err(|e| ConfigError::InvalidPattern {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;

        for entry in entries {
            let path = entry.map_err(|e| {
                let path = e.path().to_path_buf();
                PublishError::read(path, e.into_error())
            })?;

            if !path.is_file() {
                continue;
            }

            if seen.insert(path.clone()) {
                files.push(AssetFile::new(path));
            }
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn pattern(dir: &TempDir, rest: &str) -> String {
        format!("{}/{}", dir.path().display(), rest)
    }

    #[test]
    fn matches_in_pattern_order() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.zip"), "b").unwrap();
        fs::write(dir.path().join("a.tar.gz"), "a").unwrap();

        let files =
            expand_patterns(&[pattern(&dir, "*.zip"), pattern(&dir, "*.tar.gz")]).unwrap();
        let names: Vec<_> = files.iter().map(AssetFile::name).collect();
        assert_eq!(names, vec!["b.zip", "a.tar.gz"]);
    }

    #[test]
    fn no_match_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let files = expand_patterns(&[pattern(&dir, "*.exe")]).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn malformed_pattern_is_config_error() {
        let result = expand_patterns(&["dist/[".to_string()]);
        assert!(matches!(
            result,
            Err(PublishError::Config(ConfigError::InvalidPattern { .. }))
        ));
    }

    #[test]
    fn directories_are_dropped() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("out.bin"), "x").unwrap();

        let files = expand_patterns(&[pattern(&dir, "*")]).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name(), "out.bin");
    }

    #[test]
    fn overlapping_patterns_deduplicate() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("out.bin"), "x").unwrap();

        let files = expand_patterns(&[pattern(&dir, "*"), pattern(&dir, "out.*")]).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn duplicate_keeps_first_position() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.zip"), "a").unwrap();
        fs::write(dir.path().join("b.bin"), "b").unwrap();
        fs::write(dir.path().join("c.zip"), "c").unwrap();

        let files = expand_patterns(&[
            pattern(&dir, "c.zip"),
            pattern(&dir, "*"),
            pattern(&dir, "*.zip"),
        ])
        .unwrap();
        let names: Vec<_> = files.iter().map(AssetFile::name).collect();
        assert_eq!(names, vec!["c.zip", "a.zip", "b.bin"]);
    }

    #[test]
    fn many_files_across_patterns() {
        let dir = TempDir::new().unwrap();
        for i in 0..500 {
            fs::write(dir.path().join(format!("f{:03}.bin", i)), "x").unwrap();
        }

        let files = expand_patterns(&[
            pattern(&dir, "*.bin"),
            pattern(&dir, "f*"),
            pattern(&dir, "*"),
        ])
        .unwrap();
        assert_eq!(files.len(), 500);
        assert_eq!(files[0].name(), "f000.bin");
        assert_eq!(files[499].name(), "f499.bin");
    }
}
