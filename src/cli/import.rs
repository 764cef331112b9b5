//! Import command: adopt a new upstream official catalog.

use crate::cli::common::{io_error, print_json, require_file, store, CliResult, GlobalOptions};
use clap::Args;
use std::path::PathBuf;

/// Replace the official catalog with a new upstream copy
#[derive(Debug, Clone, Args)]
pub struct ImportArgs {
    /// New official catalog JSON file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Output the import report as JSON
    #[arg(long)]
    pub json: bool,
}

impl ImportArgs {
    /// Execute the import command
    pub fn execute(&self, globals: &GlobalOptions) -> CliResult<()> {
        let config = globals.load_config()?;
        require_file(&self.file, "New official catalog")?;

        let report = store(&config)
            .import_official(&self.file)
            .map_err(io_error("Import failed"))?;

        if self.json {
            return print_json(&report);
        }

        println!(
            "✓ Official catalog updated: {} → {} themes",
            report.previous_count, report.new_count
        );
        println!("  Added:   {}", report.added.len());
        println!("  Removed: {}", report.removed.len());
        for path in &report.backups {
            println!("  Backup:  {}", path.display());
        }
        if !report.orphaned.is_empty() {
            println!();
            println!(
                "⚠ {} of {} addon entries are not in the new catalog:",
                report.orphaned.len(),
                report.addon_count
            );
            for repo in &report.orphaned {
                println!("  - {repo}");
            }
        }
        Ok(())
    }
}
