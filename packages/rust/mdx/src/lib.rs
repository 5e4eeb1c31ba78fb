//! MDX bookmark documents: reading, merging, and rendering.
//!
//! Each target document is a markdown-with-components page: YAML frontmatter,
//! an import statement for the bookmark component, and `## ` sections holding
//! one `<Bookmark ... />` line per entry. This crate knows how to find the
//! URLs a document already lists and how to splice a new entry into the right
//! section without disturbing anything else in the file.

mod document;
mod format;

pub use document::{MdxDocument, Placement};
pub use format::MdxFormat;
