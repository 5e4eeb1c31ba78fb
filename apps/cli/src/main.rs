//! bookmarkdocs CLI: import browser bookmark exports into MDX pages.
//!
//! Each top-level bookmark folder becomes one document, each second-level
//! folder a `## ` section. Bookmarks already present are left alone, so the
//! import can be rerun after every new export.

mod commands;

use std::process::ExitCode;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
