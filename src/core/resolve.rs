//! core::resolve
//!
//! Literal-or-file-content resolution for tag, title and note values.
//!
//! A value is used verbatim unless it names an existing path, in which case
//! the file's contents (trimmed) replace it. The same function backs all
//! three fields so they cannot drift apart.

use std::fs;
use std::io;
use std::path::Path;

/// Resolve a literal-or-file-content value.
///
/// - An empty value stays empty.
/// - A value that is not an existing path is returned unchanged.
/// - An existing path is replaced by its contents with surrounding
///   whitespace removed.
///
/// # Errors
///
/// Returns the I/O error if the path exists but cannot be read (including
/// when it names a directory), or if access to it is denied.
///
/// # Example
///
/// ```
/// use gitea_release::core::resolve::literal_or_file;
///
/// assert_eq!(literal_or_file("v1.0.0").unwrap(), "v1.0.0");
/// assert_eq!(literal_or_file("").unwrap(), "");
/// ```
pub fn literal_or_file(value: &str) -> io::Result<String> {
    if value.is_empty() {
        return Ok(String::new());
    }

    match fs::metadata(Path::new(value)) {
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => Err(e),
        // Any other failure means nothing exists at that path.
        Err(_) => Ok(value.to_string()),
        Ok(_) => {
            let contents = fs::read_to_string(value)?;
            Ok(contents.trim().to_string())
        }
    }
}
