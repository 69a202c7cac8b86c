//! The normalized output of indexing one project file.

use std::path::{Path, PathBuf};

/// One indexed file. Created by exactly one plugin and never mutated after
/// the plugin hands it back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRecord {
    /// Absolute, resolved path of the source file.
    pub path: PathBuf,
    /// Parent directory of `path`, kept explicitly for grouping.
    pub directory: PathBuf,
    /// Extracted notes, newline-normalized and trimmed. Empty when none.
    pub notes: String,
    /// Extracted preview image written next to the source file.
    pub thumbnail_path: Option<PathBuf>,
    /// Empty on success, otherwise a short diagnostic.
    pub error: String,
}

impl IndexRecord {
    pub fn new(path: &Path) -> Self {
        let directory = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| path.to_path_buf());

        Self {
            path: path.to_path_buf(),
            directory,
            notes: String::new(),
            thumbnail_path: None,
            error: String::new(),
        }
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = normalize_newlines(notes);
        self
    }

    pub fn with_thumbnail(mut self, thumbnail: PathBuf) -> Self {
        self.thumbnail_path = Some(thumbnail);
        self
    }

    /// Appends a diagnostic. A record carries a single error slot, so a
    /// second failure is joined onto the first.
    pub fn with_error(mut self, error: impl std::fmt::Display) -> Self {
        let message = error.to_string();
        if self.error.is_empty() {
            self.error = message;
        } else {
            self.error = format!("{}; {}", self.error, message);
        }
        self
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_empty()
    }

    /// File name used for display and per-directory ordering.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Converts `\r\n` and bare `\r` to `\n`, then trims.
pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_derives_directory() {
        let record = IndexRecord::new(Path::new("/projects/sign/front.lbrn2"));
        assert_eq!(record.directory, PathBuf::from("/projects/sign"));
        assert!(record.notes.is_empty());
        assert!(record.thumbnail_path.is_none());
        assert!(record.is_ok());
    }

    #[test]
    fn test_normalize_newlines() {
        assert_eq!(normalize_newlines("  a\r\nb\rc\n  "), "a\nb\nc");
        assert_eq!(normalize_newlines(""), "");
    }

    #[test]
    fn test_errors_are_joined() {
        let record = IndexRecord::new(Path::new("/a/b.stl"))
            .with_error("first")
            .with_error("second");
        assert_eq!(record.error, "first; second");
        assert!(!record.is_ok());
    }
}
