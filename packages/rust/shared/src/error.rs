//! Error types for bookmarkdocs.
//!
//! Library crates use [`BookmarkDocsError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all bookmarkdocs operations.
#[derive(Debug, thiserror::Error)]
pub enum BookmarkDocsError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Bookmark export could not be read or decoded.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The bookmark export to import does not exist.
    #[error("input file not found: {}", path.display())]
    MissingInput { path: PathBuf },

    /// The directory receiving the MDX documents does not exist.
    #[error("target directory not found: {}", path.display())]
    MissingTargetDir { path: PathBuf },

    /// Data validation error (unusable folder name, bad component name, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BookmarkDocsError>;

impl BookmarkDocsError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Missing input file or target directory.
    pub fn is_missing_path(&self) -> bool {
        matches!(self, Self::MissingInput { .. } | Self::MissingTargetDir { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = BookmarkDocsError::config("unknown key");
        assert_eq!(err.to_string(), "config error: unknown key");

        let err = BookmarkDocsError::MissingInput {
            path: PathBuf::from("bookmarks.html"),
        };
        assert_eq!(err.to_string(), "input file not found: bookmarks.html");
    }

    #[test]
    fn missing_path_classification() {
        let missing = BookmarkDocsError::MissingTargetDir {
            path: PathBuf::from("docs"),
        };
        assert!(missing.is_missing_path());
        assert!(!BookmarkDocsError::parse("bad utf-8").is_missing_path());
    }
}
