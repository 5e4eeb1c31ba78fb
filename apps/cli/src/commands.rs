//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use bookmarkdocs_core::{ImportConfig, ImportSummary, ProgressReporter, run_import};
use bookmarkdocs_shared::{
    AppConfig, BookmarkDocsError, init_config, load_config, load_config_from, render_config,
};
use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::{error, info};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// bookmarkdocs: turn a browser bookmark export into MDX documentation pages.
#[derive(Parser)]
#[command(
    name = "bookmarkdocs",
    version,
    about = "Import bookmarks from a browser HTML export into MDX documentation pages.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.bookmarkdocs/bookmarkdocs.toml.
    #[arg(long = "config", global = true)]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub import: ImportArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Arguments for the default import action.
#[derive(Args)]
pub(crate) struct ImportArgs {
    /// Path to the bookmarks HTML file. Defaults to 'bookmarks.html'.
    pub file: Option<PathBuf>,

    /// Target directory for MDX files.
    #[arg(short, long, env = "BOOKMARKDOCS_TARGET_DIR")]
    pub target_dir: Option<PathBuf>,

    /// Preview changes without writing to files.
    #[arg(long)]
    pub dry_run: bool,

    /// Section header for bookmarks without a sub-folder.
    #[arg(long)]
    pub section: Option<String>,

    /// Treat the browser's bookmarks-bar folder as the root.
    #[arg(long)]
    pub strip_toolbar: bool,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Subcommands besides the default import.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "bookmarkdocs=info",
        1 => "bookmarkdocs=debug",
        _ => "bookmarkdocs=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<ExitCode> {
    match &cli.command {
        Some(Command::Config { action }) => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(cli.config_file.as_deref()),
        },
        None => cmd_import(&cli),
    }
}

/// Explicit `--config` path, or the default location (defaults if absent).
fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    Ok(config)
}

/// Merge config file values with CLI flags; flags win.
fn build_import_config(app: &AppConfig, args: &ImportArgs) -> Result<ImportConfig> {
    let mut config = ImportConfig::from(app);

    if let Some(file) = &args.file {
        config.input = file.clone();
    }
    if let Some(dir) = &args.target_dir {
        config.target_dir = dir.clone();
    }
    if let Some(section) = &args.section {
        if section.trim().is_empty() {
            return Err(eyre!("--section must not be empty"));
        }
        config.default_section = section.trim().to_string();
    }
    config.dry_run = args.dry_run;
    config.strip_toolbar |= args.strip_toolbar;

    Ok(config)
}

/// How an import run ended; missing paths are reported, not raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImportOutcome {
    Completed,
    MissingPath,
}

impl From<ImportOutcome> for ExitCode {
    fn from(outcome: ImportOutcome) -> Self {
        match outcome {
            ImportOutcome::Completed => ExitCode::SUCCESS,
            ImportOutcome::MissingPath => ExitCode::FAILURE,
        }
    }
}

fn cmd_import(cli: &Cli) -> Result<ExitCode> {
    let app = resolve_config(cli.config_file.as_deref())?;
    Ok(import_with(&app, cli)?.into())
}

fn import_with(app: &AppConfig, cli: &Cli) -> Result<ImportOutcome> {
    let config = build_import_config(app, &cli.import)?;

    info!(
        input = %config.input.display(),
        target_dir = %config.target_dir.display(),
        dry_run = config.dry_run,
        "importing bookmarks"
    );

    let progress = CliProgress::new(matches!(cli.log_format, LogFormat::Json));

    match run_import(&config, &progress) {
        Ok(summary) => {
            print_summary(&summary);
            Ok(ImportOutcome::Completed)
        }
        Err(e) if e.is_missing_path() => {
            progress.bar.finish_and_clear();
            error!("{e}");
            if matches!(e, BookmarkDocsError::MissingInput { .. }) {
                info!("{}", missing_input_hint(&config));
            }
            Ok(ImportOutcome::MissingPath)
        }
        Err(e) => {
            progress.bar.finish_and_clear();
            Err(e.into())
        }
    }
}

/// Names the input path actually tried, whether it came from FILE or config.
fn missing_input_hint(config: &ImportConfig) -> String {
    format!(
        "Please provide a file path or ensure '{}' exists in the current directory.",
        config.input.display()
    )
}

fn print_summary(summary: &ImportSummary) {
    let mode = if summary.dry_run { " (dry run)" } else { "" };

    println!();
    println!("  Bookmarks imported{mode}");
    println!("  Parsed:     {}", summary.parsed);
    println!("  Added:      {}", summary.added);
    println!("  Duplicates: {}", summary.duplicates);
    println!("  Unfiled:    {}", summary.unfiled);
    println!("  New files:  {}", summary.documents_created);
    println!();
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif bar.
struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    fn new(hidden: bool) -> Self {
        let bar = if hidden {
            ProgressBar::hidden()
        } else {
            ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr())
        };
        bar.set_style(
            ProgressStyle::with_template("{bar:30.cyan/blue} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Self { bar }
    }
}

impl ProgressReporter for CliProgress {
    fn start(&self, total: usize) {
        self.bar.set_length(total as u64);
    }

    fn bookmark_done(&self, title: &str, current: usize, _total: usize) {
        self.bar.set_position(current as u64);
        self.bar.set_message(title.to_string());
    }

    fn done(&self, _summary: &ImportSummary) {
        self.bar.finish_and_clear();
    }
}

// ---------------------------------------------------------------------------
// Config commands
// ---------------------------------------------------------------------------

fn cmd_config_init() -> Result<ExitCode> {
    let path = init_config()?;
    println!("Created config file at {}", path.display());
    Ok(ExitCode::SUCCESS)
}

fn cmd_config_show(path: Option<&Path>) -> Result<ExitCode> {
    let config = resolve_config(path)?;
    print!("{}", render_config(&config)?);
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_come_from_config() {
        let cli = Cli::try_parse_from(["bookmarkdocs"]).unwrap();
        let config = build_import_config(&AppConfig::default(), &cli.import).unwrap();

        assert_eq!(config.input, PathBuf::from("bookmarks.html"));
        assert_eq!(config.default_section, "Resources");
        assert!(!config.dry_run);
        assert!(cli.command.is_none());
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from([
            "bookmarkdocs",
            "export.html",
            "--target-dir",
            "/tmp/docs",
            "--dry-run",
            "--section",
            "Misc",
            "--strip-toolbar",
        ])
        .unwrap();
        let config = build_import_config(&AppConfig::default(), &cli.import).unwrap();

        assert_eq!(config.input, PathBuf::from("export.html"));
        assert_eq!(config.target_dir, PathBuf::from("/tmp/docs"));
        assert_eq!(config.default_section, "Misc");
        assert!(config.dry_run);
        assert!(config.strip_toolbar);
    }

    #[test]
    fn blank_section_rejected() {
        let cli = Cli::try_parse_from(["bookmarkdocs", "--section", " "]).unwrap();
        assert!(build_import_config(&AppConfig::default(), &cli.import).is_err());
    }

    #[test]
    fn missing_input_is_a_failure_exit_not_an_error() {
        let input = std::env::temp_dir().join("bookmarkdocs-absent-export.html");
        let target = std::env::temp_dir();
        let args: [&OsStr; 6] = [
            "bookmarkdocs".as_ref(),
            input.as_os_str(),
            "--target-dir".as_ref(),
            target.as_os_str(),
            "--log-format".as_ref(),
            "json".as_ref(),
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        let outcome = import_with(&AppConfig::default(), &cli).unwrap();
        assert_eq!(outcome, ImportOutcome::MissingPath);
    }

    #[test]
    fn missing_target_dir_is_a_failure_exit() {
        let fixture = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../fixtures/bookmarks/chrome-export.html");
        let target = std::env::temp_dir().join("bookmarkdocs-absent-target-dir");
        let args: [&OsStr; 6] = [
            "bookmarkdocs".as_ref(),
            fixture.as_os_str(),
            "--target-dir".as_ref(),
            target.as_os_str(),
            "--log-format".as_ref(),
            "json".as_ref(),
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        let outcome = import_with(&AppConfig::default(), &cli).unwrap();
        assert_eq!(outcome, ImportOutcome::MissingPath);
    }

    #[test]
    fn missing_input_hint_names_the_given_file() {
        let cli = Cli::try_parse_from(["bookmarkdocs", "export.html"]).unwrap();
        let config = build_import_config(&AppConfig::default(), &cli.import).unwrap();

        let hint = missing_input_hint(&config);
        assert!(hint.contains("'export.html'"));
        assert!(!hint.contains("bookmarks.html"));
    }

    #[test]
    fn config_subcommand_parses() {
        let cli = Cli::try_parse_from(["bookmarkdocs", "config", "show"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Config {
                action: ConfigAction::Show
            })
        ));
    }
}
