//! Import orchestration for bookmarkdocs.
//!
//! This crate ties the Netscape parser and the MDX document model together:
//! it maps each bookmark's folder path to a document and section, skips URLs
//! a document already lists, and writes the merged result.

pub mod import;
pub mod target;

pub use import::{
    ImportAction, ImportConfig, ImportSummary, Importer, ProgressReporter, SilentProgress,
    import_records, run_import,
};
pub use target::DocumentTarget;
