//! End-to-end import: export file → parsed bookmarks → merged MDX documents.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use bookmarkdocs_mdx::{MdxDocument, MdxFormat, Placement};
use bookmarkdocs_shared::{AppConfig, BookmarkDocsError, BookmarkRecord, Result};

use crate::target::DocumentTarget;

// ---------------------------------------------------------------------------
// Configuration and results
// ---------------------------------------------------------------------------

/// Runtime import configuration, merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Bookmark export to read.
    pub input: PathBuf,
    /// Directory holding the MDX documents; must already exist.
    pub target_dir: PathBuf,
    /// Log intended changes without touching the filesystem.
    pub dry_run: bool,
    /// Section for bookmarks without a second-level folder.
    pub default_section: String,
    /// Drop the browser toolbar folder before mapping.
    pub strip_toolbar: bool,
    /// Entry component name.
    pub component: String,
    /// Import statement required in every document.
    pub import_line: String,
}

impl From<&AppConfig> for ImportConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            input: PathBuf::from(&config.defaults.input),
            target_dir: PathBuf::from(&config.defaults.target_dir),
            dry_run: false,
            default_section: config.import.default_section.clone(),
            strip_toolbar: config.import.strip_toolbar,
            component: config.mdx.component.clone(),
            import_line: config.mdx.import_line.clone(),
        }
    }
}

/// Outcome of importing a single bookmark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportAction {
    /// Entry written (or, in preview mode, would be written).
    Added {
        path: PathBuf,
        section: String,
        /// The document did not exist before this bookmark.
        created: bool,
    },
    /// The document already lists this URL.
    Duplicate { path: PathBuf },
    /// No folder to map the bookmark to.
    Unfiled,
}

/// Totals for one import run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Bookmarks found in the export.
    pub parsed: usize,
    pub added: usize,
    pub duplicates: usize,
    pub unfiled: usize,
    pub documents_created: usize,
    pub dry_run: bool,
}

impl ImportSummary {
    fn record(&mut self, action: &ImportAction) {
        match action {
            ImportAction::Added { created, .. } => {
                self.added += 1;
                if *created {
                    self.documents_created += 1;
                }
            }
            ImportAction::Duplicate { .. } => self.duplicates += 1,
            ImportAction::Unfiled => self.unfiled += 1,
        }
    }
}

/// Progress callback for reporting import status.
pub trait ProgressReporter {
    /// Called once parsing is done, before the first bookmark is imported.
    fn start(&self, total: usize);
    /// Called after each bookmark is handled.
    fn bookmark_done(&self, title: &str, current: usize, total: usize);
    /// Called when the import completes.
    fn done(&self, summary: &ImportSummary);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn start(&self, _total: usize) {}
    fn bookmark_done(&self, _title: &str, _current: usize, _total: usize) {}
    fn done(&self, _summary: &ImportSummary) {}
}

// ---------------------------------------------------------------------------
// Importer
// ---------------------------------------------------------------------------

/// Merges bookmarks into MDX documents one at a time.
///
/// Outside preview mode every added bookmark is written to disk before the
/// next one is considered, so the on-disk documents are the only state.
/// Preview mode writes nothing and instead remembers the URLs it would have
/// added, so duplicates inside one export are reported the same way a real
/// run would report them.
pub struct Importer<'a> {
    config: &'a ImportConfig,
    format: MdxFormat,
    planned: HashMap<PathBuf, HashSet<String>>,
}

impl<'a> Importer<'a> {
    pub fn new(config: &'a ImportConfig) -> Result<Self> {
        Ok(Self {
            config,
            format: MdxFormat::new(&config.component, &config.import_line)?,
            planned: HashMap::new(),
        })
    }

    /// Merge one bookmark into its document.
    pub fn import_bookmark(&mut self, record: &BookmarkRecord) -> Result<ImportAction> {
        let Some(target) = DocumentTarget::for_record(
            record,
            &self.config.default_section,
            self.config.strip_toolbar,
        ) else {
            debug!(
                url = %record.url,
                folder = %record.folder_display(),
                "skipping bookmark outside any folder"
            );
            return Ok(ImportAction::Unfiled);
        };

        let path = self.config.target_dir.join(&target.file_name);
        let existing = read_existing(&path)?;

        let already_listed = existing
            .as_deref()
            .is_some_and(|content| self.format.existing_urls(content).contains(&record.url));
        let already_planned = self
            .planned
            .get(&path)
            .is_some_and(|urls| urls.contains(&record.url));

        if already_listed || already_planned {
            debug!(url = %record.url, path = %path.display(), "Skipping duplicate");
            return Ok(ImportAction::Duplicate { path });
        }

        let entry = self.format.render_entry(
            &record.url,
            &record.title,
            record.description.as_deref(),
        );

        if self.config.dry_run {
            let created = existing.is_none() && !self.planned.contains_key(&path);
            if created {
                info!("[DRY RUN] Would create new MDX file: {}", path.display());
            }
            info!(
                "[DRY RUN] Would add '{}' to '{}' under '{}'",
                record.title,
                path.display(),
                target.section
            );
            self.planned
                .entry(path.clone())
                .or_default()
                .insert(record.url.clone());
            return Ok(ImportAction::Added {
                path,
                section: target.section,
                created,
            });
        }

        let created = existing.is_none();
        let mut doc = match existing {
            Some(content) => MdxDocument::parse(&content),
            None => MdxDocument::new(&target.title, &self.format),
        };

        if doc.ensure_import(self.format.import_line()) {
            debug!(
                path = %path.display(),
                component = self.format.component(),
                "inserted missing component import"
            );
        }
        let placement = doc.insert_entry(&target.section, &entry, &self.format);
        if placement == Placement::NewSection {
            debug!(path = %path.display(), section = %target.section, "appended new section");
        }

        std::fs::write(&path, doc.render()).map_err(|e| BookmarkDocsError::io(&path, e))?;

        if created {
            info!("Created new MDX file: {}", path.display());
        }
        info!(
            folder = %record.folder_display(),
            added_at = ?record.added_at,
            "Added '{}' to '{}'",
            record.title,
            path.display()
        );

        Ok(ImportAction::Added {
            path,
            section: target.section,
            created,
        })
    }
}

fn read_existing(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    std::fs::read_to_string(path)
        .map(Some)
        .map_err(|e| BookmarkDocsError::io(path, e))
}

// ---------------------------------------------------------------------------
// Pipeline entry points
// ---------------------------------------------------------------------------

/// Run a full import.
///
/// 1. Check the input file and target directory exist
/// 2. Parse the export
/// 3. Merge every bookmark into its document, in export order
#[instrument(skip_all, fields(input = %config.input.display(), dry_run = config.dry_run))]
pub fn run_import(config: &ImportConfig, progress: &dyn ProgressReporter) -> Result<ImportSummary> {
    if !config.input.is_file() {
        return Err(BookmarkDocsError::MissingInput {
            path: config.input.clone(),
        });
    }
    if !config.target_dir.is_dir() {
        return Err(BookmarkDocsError::MissingTargetDir {
            path: config.target_dir.clone(),
        });
    }

    info!("Parsing bookmarks from {}...", config.input.display());
    let bookmarks = bookmarkdocs_netscape::parse_file(&config.input)?;

    import_records(config, &bookmarks, progress)
}

/// Merge already-parsed bookmarks into the target directory.
pub fn import_records(
    config: &ImportConfig,
    bookmarks: &[BookmarkRecord],
    progress: &dyn ProgressReporter,
) -> Result<ImportSummary> {
    let mut importer = Importer::new(config)?;
    let mut summary = ImportSummary {
        parsed: bookmarks.len(),
        dry_run: config.dry_run,
        ..Default::default()
    };

    progress.start(bookmarks.len());
    for (idx, bookmark) in bookmarks.iter().enumerate() {
        let action = importer.import_bookmark(bookmark)?;
        summary.record(&action);
        progress.bookmark_done(&bookmark.title, idx + 1, bookmarks.len());
    }
    progress.done(&summary);

    info!(
        parsed = summary.parsed,
        added = summary.added,
        duplicates = summary.duplicates,
        unfiled = summary.unfiled,
        documents_created = summary.documents_created,
        dry_run = summary.dry_run,
        "Import completed."
    );

    Ok(summary)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
