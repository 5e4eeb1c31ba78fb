//! Core domain types for bookmark imports.

use chrono::{DateTime, Utc};

// ---------------------------------------------------------------------------
// BookmarkRecord
// ---------------------------------------------------------------------------

/// A single bookmark read from a browser export.
///
/// Created by the parser and never mutated afterwards; the writer only
/// reads it to derive a target document and an entry line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookmarkRecord {
    /// Target URL (never empty).
    pub url: String,
    /// Anchor text, or the URL when the anchor text was empty.
    pub title: String,
    /// Folder names from the export root down to the bookmark's folder.
    pub folder: Vec<String>,
    /// Text of the `<DD>` line following the link, if any.
    pub description: Option<String>,
    /// Decoded `ADD_DATE` attribute.
    pub added_at: Option<DateTime<Utc>>,
    /// Whether `folder[0]` is the browser's personal toolbar folder.
    pub in_toolbar: bool,
}

impl BookmarkRecord {
    /// Build a record with just the required fields.
    pub fn new(url: impl Into<String>, title: impl Into<String>, folder: Vec<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            folder,
            description: None,
            added_at: None,
            in_toolbar: false,
        }
    }

    /// Bookmarks outside every folder have nowhere to go.
    pub fn is_unfiled(&self) -> bool {
        self.folder.is_empty()
    }

    /// Folder path rendered as `A > B > C` for log output.
    pub fn folder_display(&self) -> String {
        self.folder.join(" > ")
    }
}
