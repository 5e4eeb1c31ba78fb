//! Mapping a bookmark's folder path onto a document and section.
//!
//! `folder[0]` names the document (`Dev Tools` → `dev-tools.mdx`),
//! `folder[1]` names the `## ` section; deeper folders collapse into their
//! second-level ancestor.

use bookmarkdocs_shared::BookmarkRecord;
use tracing::warn;

/// File extension of generated documents.
const DOCUMENT_EXTENSION: &str = "mdx";

/// Where a bookmark belongs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentTarget {
    /// File stem derived from the top-level folder.
    pub slug: String,
    /// `<slug>.mdx`
    pub file_name: String,
    /// Top-level folder name as written in the export, used as page title.
    pub title: String,
    /// Section header text (without the `## ` prefix).
    pub section: String,
}

impl DocumentTarget {
    /// Derive the target for `record`.
    ///
    /// Returns `None` for bookmarks with no folder (after dropping the
    /// toolbar folder when `strip_toolbar` is set) and for top-level folder
    /// names that yield an empty file name.
    pub fn for_record(
        record: &BookmarkRecord,
        default_section: &str,
        strip_toolbar: bool,
    ) -> Option<Self> {
        if record.is_unfiled() {
            return None;
        }
        let folders: &[String] = if strip_toolbar && record.in_toolbar {
            record.folder.get(1..).unwrap_or_default()
        } else {
            &record.folder
        };

        let top = folders.first()?;
        let slug = slugify(top);
        if slug.is_empty() {
            warn!(
                folder = %record.folder_display(),
                url = %record.url,
                "folder name yields no file name, skipping"
            );
            return None;
        }

        let section = folders
            .get(1)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .unwrap_or(default_section)
            .to_string();

        Some(Self {
            file_name: format!("{slug}.{DOCUMENT_EXTENSION}"),
            slug,
            title: top.trim().to_string(),
            section,
        })
    }
}

/// Lowercase, spaces to hyphens; path separators also become hyphens so a
/// folder name can never point outside the target directory.
pub fn slugify(folder: &str) -> String {
    folder
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '-',
            other => other,
        })
        .collect()
}
