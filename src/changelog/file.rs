use crate::error::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Prepend `markdown` to the changelog at `path`.
///
/// Existing content follows the new section after two blank lines. The
/// result has trailing whitespace trimmed. A missing file is created.
pub fn prepend_changelog(path: &Path, markdown: &str) -> Result<()> {
    let existing = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };

    let mut content = markdown.to_string();
    if !existing.trim().is_empty() {
        content.push_str("\n\n\n");
        content.push_str(&existing);
    }

    debug!(path = %path.display(), previous_len = existing.len(), "writing changelog");
    fs::write(path, content.trim_end())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_creates_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("CHANGELOG.md");

        prepend_changelog(&path, "# [a@1.0.0](x) (2026-10-19)\n").unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "# [a@1.0.0](x) (2026-10-19)"
        );
    }

    #[test]
    fn test_prepends_with_two_blank_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("CHANGELOG.md");
        fs::write(&path, "# old\n\n* entry\n\n").unwrap();

        prepend_changelog(&path, "# new\n\n### Features\n* thing").unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "# new\n\n### Features\n* thing\n\n\n# old\n\n* entry"
        );
    }

    #[test]
    fn test_blank_existing_file_is_replaced() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("CHANGELOG.md");
        fs::write(&path, "  \n").unwrap();

        prepend_changelog(&path, "# new\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "# new");
    }

    #[test]
    fn test_missing_directory_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope").join("CHANGELOG.md");

        assert!(matches!(
            prepend_changelog(&path, "# new"),
            Err(crate::error::ReleaseError::Io(_))
        ));
    }
}
