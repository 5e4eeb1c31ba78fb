//! Shared types, error model, and configuration for bookmarkdocs.
//!
//! This crate is the foundation depended on by all other bookmarkdocs crates.
//! It provides:
//! - [`BookmarkDocsError`]: the unified error type
//! - Domain types ([`BookmarkRecord`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DEFAULT_COMPONENT, DEFAULT_IMPORT_LINE, DEFAULT_SECTION, DefaultsConfig,
    ImportPolicyConfig, MdxConfig, config_dir, config_file_path, init_config, load_config,
    load_config_from, render_config, validate_config,
};
pub use error::{BookmarkDocsError, Result};
pub use types::BookmarkRecord;
