//! Rendering and recognising bookmark component lines.

use std::collections::HashSet;

use bookmarkdocs_shared::{BookmarkDocsError, DEFAULT_COMPONENT, DEFAULT_IMPORT_LINE, Result};
use regex::Regex;

/// The component dialect used for bookmark entries.
///
/// Entries are rendered as single-line self-closing JSX elements:
/// `<Bookmark url="..." title="..." description="..." />`. Hand-written
/// entries may wrap their attributes over several lines.
#[derive(Debug, Clone)]
pub struct MdxFormat {
    component: String,
    import_line: String,
    url_re: Regex,
    entry_re: Regex,
}

impl MdxFormat {
    /// Build a format for the given component name and import statement.
    pub fn new(component: &str, import_line: &str) -> Result<Self> {
        let name = regex::escape(component);

        let url_re = Regex::new(&format!(r#"<{name}\s+[^>]*url="([^"]+)""#))
            .map_err(|e| BookmarkDocsError::validation(format!("component regex: {e}")))?;
        let entry_re = Regex::new(&format!(r"^<{name}(?:\s|/|>|$)"))
            .map_err(|e| BookmarkDocsError::validation(format!("component regex: {e}")))?;

        Ok(Self {
            component: component.to_string(),
            import_line: import_line.trim().to_string(),
            url_re,
            entry_re,
        })
    }

    /// Component name, e.g. `Bookmark`.
    pub fn component(&self) -> &str {
        &self.component
    }

    /// Import statement documents must contain.
    pub fn import_line(&self) -> &str {
        &self.import_line
    }

    /// Collect the `url` attribute of every bookmark component in `content`.
    pub fn existing_urls(&self, content: &str) -> HashSet<String> {
        self.url_re
            .captures_iter(content)
            .map(|caps| unescape_attr(&caps[1]))
            .collect()
    }

    /// Whether a line is a bookmark entry.
    pub fn is_entry_line(&self, line: &str) -> bool {
        self.entry_re.is_match(line.trim_start())
    }

    /// Whether a line ends an entry element: `/>` or `</Bookmark>`.
    pub fn closes_entry(&self, line: &str) -> bool {
        line.trim_end().ends_with("/>") || line.contains(&format!("</{}>", self.component()))
    }

    /// Render one entry line (without trailing newline).
    pub fn render_entry(&self, url: &str, title: &str, description: Option<&str>) -> String {
        let mut line = format!(
            r#"<{} url="{}" title="{}""#,
            self.component,
            escape_attr(url),
            escape_attr(title)
        );
        if let Some(desc) = description.filter(|d| !d.is_empty()) {
            line.push_str(&format!(r#" description="{}""#, escape_attr(desc)));
        }
        line.push_str(" />");
        line
    }
}

impl Default for MdxFormat {
    fn default() -> Self {
        Self::new(DEFAULT_COMPONENT, DEFAULT_IMPORT_LINE).expect("default component regex")
    }
}

/// Attribute values are double-quoted; quotes inside become `&quot;`.
fn escape_attr(value: &str) -> String {
    value.replace('"', "&quot;")
}

fn unescape_attr(value: &str) -> String {
    value.replace("&quot;", "\"")
}
