//! Add command: interactive authoring of addon entries.

use crate::cli::common::{io_error, print_json, require_file, store, CliError, CliResult, GlobalOptions};
use crate::services::selection::select;
use crate::services::sync::missing;
use crate::services::{parse_range, EntryBuilder, TagMacros};
use clap::Args;
use std::io;

/// Author addon entries for missing themes
#[derive(Debug, Clone, Args)]
pub struct AddArgs {
    /// Missing themes to work on, 1-based (e.g. "1-25", "1,5,10-15", "all")
    #[arg(short, long, value_name = "RANGE")]
    pub range: Option<String>,

    /// Write entries to a personal contributor file instead of the catalog
    #[arg(short, long, value_name = "NAME")]
    pub author: Option<String>,

    /// Open each repository page in the browser
    #[arg(long)]
    pub open: bool,

    /// Start without asking for confirmation
    #[arg(short, long)]
    pub yes: bool,

    /// Print the session report as JSON
    #[arg(long)]
    pub json: bool,
}

impl AddArgs {
    /// Execute the add command
    pub fn execute(&self, globals: &GlobalOptions) -> CliResult<()> {
        let config = globals.load_config()?;
        let store = store(&config);
        require_file(store.official_path(), "Official catalog")?;

        let official = store.load_official().map_err(io_error("Failed to load catalogs"))?;
        let addon = store.load_addon().map_err(io_error("Failed to load catalogs"))?;
        let macros = TagMacros::load(&config.paths.macros).map_err(io_error("Failed to load tag macros"))?;

        let pending = missing(&official, &addon);
        if pending.is_empty() {
            println!("✓ Every official theme has an addon entry");
            return Ok(());
        }

        let indices = parse_range(self.range.as_deref().unwrap_or("all"), pending.len())
            .map_err(|e| CliError::validation(e.to_string()))?;
        let selected: Vec<_> = select(&pending, &indices).into_iter().copied().collect();
        if selected.is_empty() {
            return Err(CliError::validation(format!(
                "Range selects no themes (1-{} available)",
                pending.len()
            )));
        }

        let author = self
            .author
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty());

        let stdin = io::stdin();
        let stdout = io::stdout();
        let mut builder =
            EntryBuilder::new(stdin.lock(), stdout.lock(), &macros).with_browser(self.open);

        builder
            .say(&format!(
                "{} of {} missing themes selected",
                selected.len(),
                pending.len()
            ))
            .map_err(io_error("Failed to write output"))?;
        if !self.yes
            && !builder
                .confirm("Start the session?")
                .map_err(io_error("Failed to read input"))?
        {
            return Ok(());
        }

        let report = builder
            .run_session(&selected, &store, author)
            .map_err(io_error("Session failed"))?;
        drop(builder);

        if self.json {
            return print_json(&report);
        }

        println!();
        println!(
            "Session complete: {} created, {} skipped, {} errors",
            report.processed, report.skipped, report.errors
        );
        if let Some(file) = &report.file {
            println!("  Saved to {}", file.display());
        }
        for detail in &report.error_details {
            println!("  ✗ {detail}");
        }

        Ok(())
    }
}
