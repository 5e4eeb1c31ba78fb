//! Application configuration for bookmarkdocs.
//!
//! User config lives at `~/.bookmarkdocs/bookmarkdocs.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BookmarkDocsError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "bookmarkdocs.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".bookmarkdocs";

/// Component rendered for every bookmark entry.
pub const DEFAULT_COMPONENT: &str = "Bookmark";

/// Import statement every generated document must carry.
pub const DEFAULT_IMPORT_LINE: &str = "import { Bookmark } from '@/components/bookmark';";

/// Section used for bookmarks that sit directly in a top-level folder.
pub const DEFAULT_SECTION: &str = "Resources";

// ---------------------------------------------------------------------------
// Config structs (matching bookmarkdocs.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Input and output locations.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Folder-to-document mapping options.
    #[serde(default)]
    pub import: ImportPolicyConfig,

    /// Shape of the generated MDX.
    #[serde(default)]
    pub mdx: MdxConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Bookmark export read when no file argument is given.
    #[serde(default = "default_input")]
    pub input: String,

    /// Directory holding one MDX document per top-level folder.
    #[serde(default = "default_target_dir")]
    pub target_dir: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            target_dir: default_target_dir(),
        }
    }
}

fn default_input() -> String {
    "bookmarks.html".into()
}
fn default_target_dir() -> String {
    "fumadocs/content/docs/bookmarks".into()
}

/// `[import]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportPolicyConfig {
    /// Header used when a bookmark has no second-level folder.
    #[serde(default = "default_section")]
    pub default_section: String,

    /// Drop the browser's toolbar folder before mapping folders to documents.
    #[serde(default)]
    pub strip_toolbar: bool,
}

impl Default for ImportPolicyConfig {
    fn default() -> Self {
        Self {
            default_section: default_section(),
            strip_toolbar: false,
        }
    }
}

fn default_section() -> String {
    DEFAULT_SECTION.into()
}

/// `[mdx]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MdxConfig {
    /// JSX component name used for entries (`<Bookmark ... />`).
    #[serde(default = "default_component")]
    pub component: String,

    /// Import statement inserted below the frontmatter.
    #[serde(default = "default_import_line")]
    pub import_line: String,
}

impl Default for MdxConfig {
    fn default() -> Self {
        Self {
            component: default_component(),
            import_line: default_import_line(),
        }
    }
}

fn default_component() -> String {
    DEFAULT_COMPONENT.into()
}
fn default_import_line() -> String {
    DEFAULT_IMPORT_LINE.into()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.bookmarkdocs/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| BookmarkDocsError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.bookmarkdocs/bookmarkdocs.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| BookmarkDocsError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        BookmarkDocsError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    validate_config(&config)?;

    tracing::debug!(?path, "loaded config file");
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| BookmarkDocsError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let content = render_config(&AppConfig::default())?;

    std::fs::write(&path, content).map_err(|e| BookmarkDocsError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Serialize a config as pretty TOML.
pub fn render_config(config: &AppConfig) -> Result<String> {
    toml::to_string_pretty(config).map_err(|e| BookmarkDocsError::config(e.to_string()))
}

/// Reject values that would produce unreadable documents.
pub fn validate_config(config: &AppConfig) -> Result<()> {
    let component = &config.mdx.component;
    let valid_component = component
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_uppercase())
        && component.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid_component {
        return Err(BookmarkDocsError::config(format!(
            "mdx.component must be a capitalized JSX identifier, got '{component}'"
        )));
    }

    if config.mdx.import_line.trim().is_empty() {
        return Err(BookmarkDocsError::config("mdx.import_line must not be empty"));
    }

    if config.import.default_section.trim().is_empty() {
        return Err(BookmarkDocsError::config(
            "import.default_section must not be empty",
        ));
    }

    Ok(())
}
