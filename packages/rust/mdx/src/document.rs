//! Line-level model of a bookmark MDX document.
//!
//! A document is kept as its original lines so content the importer does not
//! understand (prose, other components, extra frontmatter keys) survives a
//! rewrite untouched. All edits are insertions.

use std::sync::LazyLock;

use regex::Regex;

use crate::format::MdxFormat;

/// `# ` or `## ` heading; either one ends the current `## ` section.
static SECTION_BOUNDARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{1,2}\s").expect("section boundary regex"));

const FRONTMATTER_DELIMITER: &str = "---";

/// Fenced code block markers; headings and entries inside fences are text.
const FENCES: [&str; 2] = ["```", "~~~"];

/// Where [`MdxDocument::insert_entry`] put the entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Appended to a section that already had a header.
    ExistingSection,
    /// A new `## ` header was appended at the end of the document.
    NewSection,
}

/// An MDX document held as lines (no line terminators).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MdxDocument {
    lines: Vec<String>,
}

impl MdxDocument {
    /// Fresh document: frontmatter with a title, then the import statement.
    pub fn new(title: &str, format: &MdxFormat) -> Self {
        let lines = vec![
            FRONTMATTER_DELIMITER.to_string(),
            format!("title: {}", yaml_scalar(title)),
            FRONTMATTER_DELIMITER.to_string(),
            String::new(),
            format.import_line().to_string(),
        ];
        Self { lines }
    }

    /// Split existing file content into lines.
    pub fn parse(content: &str) -> Self {
        Self {
            lines: content.lines().map(str::to_string).collect(),
        }
    }

    /// File content: lines joined by `\n` with a single trailing newline.
    pub fn render(&self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Index of the closing `---` when the document opens with frontmatter.
    fn frontmatter_end(&self) -> Option<usize> {
        if self.lines.first().map(|l| l.trim()) != Some(FRONTMATTER_DELIMITER) {
            return None;
        }
        self.lines
            .iter()
            .skip(1)
            .position(|l| l.trim() == FRONTMATTER_DELIMITER)
            .map(|pos| pos + 1)
    }

    fn opens_frontmatter(&self) -> bool {
        self.lines.first().map(|l| l.trim()) == Some(FRONTMATTER_DELIMITER)
    }

    /// Whether any line already carries the import statement.
    pub fn has_import(&self, import_line: &str) -> bool {
        let needle = import_line.trim();
        self.lines.iter().any(|l| l.contains(needle))
    }

    /// Insert the import statement below the frontmatter if it is missing.
    ///
    /// Returns `true` when the document changed.
    pub fn ensure_import(&mut self, import_line: &str) -> bool {
        if self.has_import(import_line) {
            return false;
        }
        let import_line = import_line.trim().to_string();

        match self.frontmatter_end() {
            Some(end) => {
                let at = end + 1;
                self.lines.insert(at, String::new());
                self.lines.insert(at + 1, import_line);
                self.separate_following(at + 1);
            }
            // Unterminated frontmatter: everything is frontmatter, append.
            None if self.opens_frontmatter() => {
                self.lines.push(String::new());
                self.lines.push(import_line);
            }
            None => {
                self.lines.insert(0, import_line);
                self.separate_following(0);
            }
        }
        true
    }

    /// Marks lines inside fenced code blocks, fence lines included.
    fn fenced_mask(&self) -> Vec<bool> {
        let mut mask = Vec::with_capacity(self.lines.len());
        let mut open: Option<&str> = None;

        for line in &self.lines {
            let trimmed = line.trim_start();
            let fence = FENCES.iter().copied().find(|f| trimmed.starts_with(f));
            match (open, fence) {
                (None, Some(f)) => {
                    open = Some(f);
                    mask.push(true);
                }
                (Some(o), Some(f)) if o == f => {
                    open = None;
                    mask.push(true);
                }
                (Some(_), _) => mask.push(true),
                (None, None) => mask.push(false),
            }
        }

        mask
    }

    /// Index of the `## <section>` header line, ignoring fenced code.
    pub fn find_section(&self, section: &str) -> Option<usize> {
        let header = section_header(section);
        let mask = self.fenced_mask();
        self.lines
            .iter()
            .enumerate()
            .position(|(i, l)| !mask[i] && l.trim() == header)
    }

    /// Exclusive end of the section whose header sits at `header_idx`.
    fn section_end(&self, header_idx: usize, mask: &[bool]) -> usize {
        (header_idx + 1..self.lines.len())
            .find(|&i| !mask[i] && SECTION_BOUNDARY_RE.is_match(self.lines[i].trim_start()))
            .unwrap_or(self.lines.len())
    }

    /// `(opening, closing)` line indices of every entry in `start..end`.
    ///
    /// An entry wrapped over several lines runs until the first line that
    /// closes the element; an unterminated one covers its opening line only.
    fn entry_spans(
        &self,
        start: usize,
        end: usize,
        mask: &[bool],
        format: &MdxFormat,
    ) -> Vec<(usize, usize)> {
        let mut spans = Vec::new();
        let mut i = start;
        while i < end {
            if !mask[i] && format.is_entry_line(&self.lines[i]) {
                let close = (i..end)
                    .find(|&j| format.closes_entry(&self.lines[j]))
                    .unwrap_or(i);
                spans.push((i, close));
                i = close + 1;
            } else {
                i += 1;
            }
        }
        spans
    }

    /// Opening line of each entry under `## <section>`, in document order.
    pub fn section_entries(&self, section: &str, format: &MdxFormat) -> Vec<&str> {
        let Some(header_idx) = self.find_section(section) else {
            return Vec::new();
        };
        let mask = self.fenced_mask();
        let end = self.section_end(header_idx, &mask);
        self.entry_spans(header_idx + 1, end, &mask, format)
            .into_iter()
            .map(|(open, _)| self.lines[open].as_str())
            .collect()
    }

    /// Insert `entry` into `## <section>`, creating the section at the end of
    /// the document when it does not exist.
    ///
    /// The entry lands right after the section's last existing entry, or
    /// right after the header when the section has none.
    pub fn insert_entry(&mut self, section: &str, entry: &str, format: &MdxFormat) -> Placement {
        let Some(header_idx) = self.find_section(section) else {
            if self.lines.last().is_some_and(|l| !l.trim().is_empty()) {
                self.lines.push(String::new());
            }
            self.lines.push(section_header(section));
            self.lines.push(String::new());
            self.lines.push(entry.to_string());
            return Placement::NewSection;
        };

        let mask = self.fenced_mask();
        let end = self.section_end(header_idx, &mask);
        let last_entry = self
            .entry_spans(header_idx + 1, end, &mask, format)
            .last()
            .map(|&(_, close)| close);

        let at = match last_entry {
            Some(close) => close + 1,
            None => {
                let after_header = header_idx + 1;
                let blank_follows = self
                    .lines
                    .get(after_header)
                    .is_some_and(|l| l.trim().is_empty());
                if !blank_follows {
                    self.lines.insert(after_header, String::new());
                }
                after_header + 1
            }
        };

        self.lines.insert(at, entry.to_string());
        self.separate_following_unless_entry(at, format);
        Placement::ExistingSection
    }

    /// Keep a blank line between the line at `idx` and non-blank content below.
    fn separate_following(&mut self, idx: usize) {
        if self.lines.get(idx + 1).is_some_and(|l| !l.trim().is_empty()) {
            self.lines.insert(idx + 1, String::new());
        }
    }

    fn separate_following_unless_entry(&mut self, idx: usize, format: &MdxFormat) {
        let next_is_content = self
            .lines
            .get(idx + 1)
            .is_some_and(|l| !l.trim().is_empty() && !format.is_entry_line(l));
        if next_is_content {
            self.lines.insert(idx + 1, String::new());
        }
    }
}

fn section_header(section: &str) -> String {
    format!("## {}", section.trim())
}

/// Render a YAML scalar, double-quoting values YAML would misread.
fn yaml_scalar(value: &str) -> String {
    const INDICATORS: &[char] = &[
        '-', '?', ':', ',', '[', ']', '{', '}', '#', '&', '*', '!', '|', '>', '\'', '"', '%',
        '@', '`',
    ];

    let needs_quotes = value.is_empty()
        || value.starts_with(INDICATORS)
        || value.starts_with(char::is_whitespace)
        || value.ends_with(char::is_whitespace)
        || value.contains(": ")
        || value.contains(" #");

    if needs_quotes {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> String {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures/mdx")
            .join(name);
        std::fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {name}: {e}"))
    }

    fn entry(format: &MdxFormat, url: &str, title: &str) -> String {
        format.render_entry(url, title, None)
    }

    // --- New documents ---

    #[test]
    fn new_document_layout() {
        let format = MdxFormat::default();
        let doc = MdxDocument::new("Tools", &format);
        assert_eq!(
            doc.render(),
            "---\ntitle: Tools\n---\n\nimport { Bookmark } from '@/components/bookmark';\n"
        );
        assert!(doc.has_import(format.import_line()));
    }

    #[test]
    fn new_document_quotes_awkward_titles() {
        let format = MdxFormat::default();
        let doc = MdxDocument::new("Reading: later", &format);
        assert_eq!(doc.lines()[1], "title: \"Reading: later\"");

        let doc = MdxDocument::new("#hashtags", &format);
        assert_eq!(doc.lines()[1], "title: \"#hashtags\"");
    }

    #[test]
    fn new_section_appended_at_end() {
        let format = MdxFormat::default();
        let mut doc = MdxDocument::new("Tools", &format);
        let line = entry(&format, "https://github.com/sharkdp/fd", "fd");

        let placement = doc.insert_entry("CLI", &line, &format);

        assert_eq!(placement, Placement::NewSection);
        assert_eq!(
            doc.render(),
            format!(
                "---\ntitle: Tools\n---\n\nimport {{ Bookmark }} from '@/components/bookmark';\n\n## CLI\n\n{line}\n"
            )
        );
        assert_eq!(doc.section_entries("CLI", &format), vec![line.as_str()]);
    }

    // --- Existing documents ---

    #[test]
    fn insert_after_last_entry_of_section() {
        let format = MdxFormat::default();
        let mut doc = MdxDocument::parse(&fixture("existing.mdx"));
        let line = entry(&format, "https://github.com/sharkdp/fd", "fd");

        let placement = doc.insert_entry("CLI", &line, &format);
        assert_eq!(placement, Placement::ExistingSection);

        let entries = doc.section_entries("CLI", &format);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[2], line);

        // Prose after the entries stays where it was, below the new entry.
        let rendered = doc.render();
        let fd_pos = rendered.find("sharkdp/fd").unwrap();
        let fzf_pos = rendered.find("junegunn/fzf").unwrap();
        let notes_pos = rendered.find("Some closing notes").unwrap();
        assert!(fzf_pos < fd_pos && fd_pos < notes_pos);

        // Other sections untouched.
        assert_eq!(doc.section_entries("Editors", &format).len(), 1);
    }

    #[test]
    fn insert_into_last_section_at_eof() {
        let format = MdxFormat::default();
        let mut doc = MdxDocument::parse(&fixture("existing.mdx"));
        let line = entry(&format, "https://neovim.io", "Neovim");

        doc.insert_entry("Editors", &line, &format);

        assert!(doc.render().ends_with(&format!(
            "<Bookmark url=\"https://helix-editor.com\" title=\"Helix\" />\n{line}\n"
        )));
    }

    #[test]
    fn insert_into_empty_section_goes_after_header() {
        let format = MdxFormat::default();
        let mut doc = MdxDocument::parse("## Empty\n\n## Next\n\n<Bookmark url=\"https://n.example.com\" />\n");
        let line = entry(&format, "https://e.example.com", "E");

        doc.insert_entry("Empty", &line, &format);

        assert_eq!(
            doc.render(),
            format!("## Empty\n\n{line}\n\n## Next\n\n<Bookmark url=\"https://n.example.com\" />\n")
        );
    }

    #[test]
    fn insert_into_empty_section_without_blank_line() {
        let format = MdxFormat::default();
        let mut doc = MdxDocument::parse("## Empty\nSome intro text.\n");
        let line = entry(&format, "https://e.example.com", "E");

        doc.insert_entry("Empty", &line, &format);

        assert_eq!(
            doc.render(),
            format!("## Empty\n\n{line}\n\nSome intro text.\n")
        );
    }

    #[test]
    fn subheadings_stay_inside_section() {
        let format = MdxFormat::default();
        let mut doc = MdxDocument::parse(
            "## CLI\n\n### Search\n\n<Bookmark url=\"https://a.example.com\" />\n\n## Other\n",
        );
        let line = entry(&format, "https://b.example.com", "B");

        doc.insert_entry("CLI", &line, &format);

        assert_eq!(doc.section_entries("CLI", &format).len(), 2);
        assert_eq!(doc.section_entries("Other", &format).len(), 0);
    }

    #[test]
    fn header_match_ignores_surrounding_whitespace() {
        let format = MdxFormat::default();
        let doc = MdxDocument::parse("intro\n  ## CLI  \n");
        assert_eq!(doc.find_section("CLI"), Some(1));
        assert!(doc.section_entries("Missing", &format).is_empty());
    }

    #[test]
    fn multi_line_entry_kept_whole() {
        let format = MdxFormat::default();
        let mut doc = MdxDocument::parse(
            "## CLI\n\n<Bookmark\n  url=\"https://a.example.com\"\n  title=\"A\"\n/>\n",
        );
        let line = entry(&format, "https://b.example.com", "B");

        doc.insert_entry("CLI", &line, &format);

        assert_eq!(
            doc.render(),
            format!(
                "## CLI\n\n<Bookmark\n  url=\"https://a.example.com\"\n  title=\"A\"\n/>\n{line}\n"
            )
        );
        assert_eq!(doc.section_entries("CLI", &format).len(), 2);
    }

    #[test]
    fn multi_line_entry_followed_by_prose() {
        let format = MdxFormat::default();
        let mut doc = MdxDocument::parse(
            "## CLI\n\n<Bookmark url=\"https://a.example.com\"\n  title=\"A\" />\nNotes.\n",
        );
        let line = entry(&format, "https://b.example.com", "B");

        doc.insert_entry("CLI", &line, &format);

        assert_eq!(
            doc.render(),
            format!(
                "## CLI\n\n<Bookmark url=\"https://a.example.com\"\n  title=\"A\" />\n{line}\n\nNotes.\n"
            )
        );
    }

    #[test]
    fn fenced_headings_do_not_split_sections() {
        let format = MdxFormat::default();
        let a = entry(&format, "https://a.example.com", "A");
        let c = entry(&format, "https://c.example.com", "C");
        let mut doc = MdxDocument::parse(&format!(
            "## CLI\n\n{a}\n\n```md\n## Example\n<Bookmark url=\"https://fenced.example.com\" />\n```\n\n{c}\n"
        ));
        let b = entry(&format, "https://b.example.com", "B");

        doc.insert_entry("CLI", &b, &format);

        assert!(doc.render().ends_with(&format!("{c}\n{b}\n")));
        assert_eq!(doc.section_entries("CLI", &format), vec![a.as_str(), c.as_str(), b.as_str()]);
    }

    #[test]
    fn fenced_header_is_not_a_section() {
        let format = MdxFormat::default();
        let mut doc = MdxDocument::parse("~~~\n## CLI\n~~~\n");
        assert_eq!(doc.find_section("CLI"), None);

        let placement = doc.insert_entry("CLI", &entry(&format, "https://a.example.com", "A"), &format);
        assert_eq!(placement, Placement::NewSection);
        assert_eq!(doc.find_section("CLI"), Some(4));
    }

    // --- Import handling ---

    #[test]
    fn ensure_import_noop_when_present() {
        let format = MdxFormat::default();
        let mut doc = MdxDocument::parse(&fixture("existing.mdx"));
        let before = doc.clone();
        assert!(!doc.ensure_import(format.import_line()));
        assert_eq!(doc, before);
    }

    #[test]
    fn ensure_import_after_frontmatter() {
        let format = MdxFormat::default();
        let mut doc = MdxDocument::parse("---\ntitle: Tools\n---\n## CLI\n");

        assert!(doc.ensure_import(format.import_line()));
        assert_eq!(
            doc.render(),
            "---\ntitle: Tools\n---\n\nimport { Bookmark } from '@/components/bookmark';\n\n## CLI\n"
        );
    }

    #[test]
    fn ensure_import_without_frontmatter() {
        let format = MdxFormat::default();
        let mut doc = MdxDocument::parse("## CLI\n");

        assert!(doc.ensure_import(format.import_line()));
        assert_eq!(
            doc.render(),
            "import { Bookmark } from '@/components/bookmark';\n\n## CLI\n"
        );
    }

    #[test]
    fn ensure_import_with_unterminated_frontmatter() {
        let format = MdxFormat::default();
        let mut doc = MdxDocument::parse("---\ntitle: Broken\n");

        assert!(doc.ensure_import(format.import_line()));
        assert_eq!(
            doc.render(),
            "---\ntitle: Broken\n\nimport { Bookmark } from '@/components/bookmark';\n"
        );
    }

    #[test]
    fn parse_render_preserves_content() {
        let content = fixture("existing.mdx");
        assert_eq!(MdxDocument::parse(&content).render(), content);
    }
}
