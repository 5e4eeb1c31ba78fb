//! Netscape bookmark file parser.
//!
//! Exports look like this (one marker per line):
//!
//! ```text
//! <DL><p>
//!     <DT><H3 ADD_DATE="1700000000" PERSONAL_TOOLBAR_FOLDER="true">Bookmarks bar</H3>
//!     <DL><p>
//!         <DT><A HREF="https://example.com" ADD_DATE="1700000001">Example</A>
//!         <DD>Optional description
//!     </DL><p>
//! </DL><p>
//! ```
//!
//! The scanner is deliberately line-based and forgiving: anything it does not
//! recognise is skipped.

use std::sync::LazyLock;

use bookmarkdocs_shared::BookmarkRecord;
use chrono::{DateTime, Utc};
use regex::Regex;
use tracing::{debug, trace};

use crate::entities::decode_entities;

// ---------------------------------------------------------------------------
// Regex patterns (compiled once)
// ---------------------------------------------------------------------------

/// Matches `<H3 attrs>Folder name</H3>`.
static FOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<H3([^>]*)>(.*?)</H3>").expect("folder regex"));

/// Matches the attribute browsers put on the bookmarks-bar folder.
static TOOLBAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bPERSONAL_TOOLBAR_FOLDER\s*=\s*"true""#).expect("toolbar regex")
});

/// Matches `<A attrs>Title</A>`.
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<A\s([^>]*)>(.*?)</A>").expect("link regex"));

/// Matches `HREF="..."` anywhere among the anchor attributes.
static HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\bHREF\s*=\s*"([^"]*)""#).expect("href regex"));

/// Matches `ADD_DATE="<digits>"`.
static ADD_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\bADD_DATE\s*=\s*"(\d+)""#).expect("add_date regex"));

/// Timestamps above this are microseconds rather than seconds.
const MICROSECOND_THRESHOLD: i64 = 100_000_000_000;

// ---------------------------------------------------------------------------
// Folder stack
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct OpenFolder {
    name: String,
    toolbar: bool,
}

/// Folders currently open; depth equals the `<DL>` nesting in the source.
#[derive(Debug, Default)]
struct FolderStack {
    folders: Vec<OpenFolder>,
}

impl FolderStack {
    fn push(&mut self, name: String, toolbar: bool) {
        self.folders.push(OpenFolder { name, toolbar });
    }

    /// Closing the root list leaves nothing to pop; that is not an error.
    fn pop(&mut self) {
        self.folders.pop();
    }

    fn path(&self) -> Vec<String> {
        self.folders.iter().map(|f| f.name.clone()).collect()
    }

    fn in_toolbar(&self) -> bool {
        self.folders.first().is_some_and(|f| f.toolbar)
    }
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Parse the text of a Netscape bookmark export into records, in file order.
///
/// Malformed lines never fail the parse; they are skipped.
pub fn parse_export(content: &str) -> Vec<BookmarkRecord> {
    let mut stack = FolderStack::default();
    let mut bookmarks: Vec<BookmarkRecord> = Vec::new();
    // Set only while the previous non-empty line was a kept link; `<DD>` after
    // a folder header describes the folder.
    let mut after_link = false;

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        // Folder open
        if let Some(caps) = FOLDER_RE.captures(line) {
            let name = decode_entities(caps[2].trim());
            let toolbar = TOOLBAR_RE.is_match(&caps[1]);
            trace!(line = idx + 1, folder = %name, toolbar, "folder open");
            stack.push(name, toolbar);
            after_link = false;
            continue;
        }

        // Folder close
        if line.to_ascii_uppercase().contains("</DL>") {
            stack.pop();
            after_link = false;
            continue;
        }

        // Link
        if let Some(caps) = LINK_RE.captures(line) {
            if let Some(record) = link_record(&caps[1], &caps[2], &stack) {
                bookmarks.push(record);
                after_link = true;
            } else {
                trace!(line = idx + 1, "anchor without usable HREF skipped");
                after_link = false;
            }
            continue;
        }

        // Description for the link on the previous line
        if let Some(desc) = description_text(line) {
            match bookmarks.last_mut().filter(|_| after_link) {
                Some(last) => {
                    let desc = decode_entities(desc);
                    last.description = (!desc.is_empty()).then_some(desc);
                }
                None => trace!(line = idx + 1, "description not following a link ignored"),
            }
        }
        after_link = false;
    }

    debug!(
        count = bookmarks.len(),
        unclosed_folders = stack.folders.len(),
        "parsed bookmark export"
    );

    bookmarks
}

/// Build a record from an anchor's attribute string and inner text.
fn link_record(attrs: &str, inner: &str, stack: &FolderStack) -> Option<BookmarkRecord> {
    let href = HREF_RE.captures(attrs)?;
    let url = decode_entities(href[1].trim());
    if url.is_empty() {
        return None;
    }

    let title = decode_entities(inner.trim());
    let title = if title.is_empty() { url.clone() } else { title };

    let added_at = ADD_DATE_RE
        .captures(attrs)
        .and_then(|caps| caps[1].parse::<i64>().ok())
        .and_then(timestamp_to_utc);

    Some(BookmarkRecord {
        url,
        title,
        folder: stack.path(),
        description: None,
        added_at,
        in_toolbar: stack.in_toolbar(),
    })
}

/// Text following a leading `<DD>` marker, trimmed.
fn description_text(line: &str) -> Option<&str> {
    let marker = line.get(..4)?;
    if marker.eq_ignore_ascii_case("<DD>") {
        Some(line[4..].trim())
    } else {
        None
    }
}

fn timestamp_to_utc(value: i64) -> Option<DateTime<Utc>> {
    if value >= MICROSECOND_THRESHOLD {
        DateTime::from_timestamp_micros(value)
    } else {
        DateTime::from_timestamp(value, 0)
    }
}
