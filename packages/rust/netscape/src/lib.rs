//! Netscape bookmark export parsing.
//!
//! Every major browser exports bookmarks as the legacy Netscape HTML format:
//! folders are `<H3>` headings followed by a nested `<DL>` list, links are
//! `<A HREF>` anchors and an optional `<DD>` line carries a description. This
//! crate turns such a file into a flat, ordered list of [`BookmarkRecord`]s,
//! each carrying its folder path.

mod entities;
mod parser;

use std::path::Path;

use bookmarkdocs_shared::{BookmarkDocsError, BookmarkRecord, Result};
use tracing::{error, info, instrument};

pub use entities::decode_entities;
pub use parser::parse_export;

/// Read and parse a bookmark export from disk.
///
/// The file must be UTF-8. Read failures are logged and returned; they end
/// the import. Individual malformed lines never fail the parse.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn parse_file(path: &Path) -> Result<Vec<BookmarkRecord>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        error!(error = %e, "failed to read bookmark file");
        if e.kind() == std::io::ErrorKind::InvalidData {
            BookmarkDocsError::parse(format!("{} is not valid UTF-8", path.display()))
        } else {
            BookmarkDocsError::io(path, e)
        }
    })?;

    let bookmarks = parse_export(&content);
    info!(count = bookmarks.len(), "found bookmarks");

    Ok(bookmarks)
}
