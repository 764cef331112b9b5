//! Merge command: fold contributor files into the addon catalog.

use crate::cli::common::{confirm, io_error, print_json, store, CliResult, GlobalOptions};
use crate::services::contributors::MergeReport;
use crate::services::{ContributorFiles, Disposition};
use chrono::Local;
use clap::Args;

/// Merge contributor files into the addon catalog
#[derive(Debug, Clone, Args)]
pub struct MergeArgs {
    /// Delete contributor files after merging instead of archiving them
    #[arg(long)]
    pub delete: bool,

    /// Merge without asking for confirmation
    #[arg(short, long)]
    pub yes: bool,

    /// Output the merge report as JSON
    #[arg(long)]
    pub json: bool,
}

impl MergeArgs {
    /// Execute the merge command
    pub fn execute(&self, globals: &GlobalOptions) -> CliResult<()> {
        let config = globals.load_config()?;
        let store = store(&config);
        let contributors = ContributorFiles::new(store.addon_path());

        let progress = contributors
            .progress()
            .map_err(io_error("Failed to list contributor files"))?;
        if progress.is_empty() {
            if self.json {
                return print_json(&MergeReport::default());
            }
            println!("No contributor files found");
            return Ok(());
        }

        if !self.json {
            println!("Contributor files:");
            for p in &progress {
                let entries = p
                    .entries
                    .map_or_else(|| "unreadable".to_string(), |n| format!("{n} entries"));
                println!("  {} ({entries})", p.file.display());
            }
        }

        if !self.yes && !confirm("Merge these files into the addon catalog?")? {
            println!("Merge cancelled");
            return Ok(());
        }

        let disposition = if self.delete {
            Disposition::Delete
        } else {
            Disposition::Archive(config.paths.contributor_archive_dir())
        };

        let report = contributors
            .merge(&store, &disposition, Local::now())
            .map_err(io_error("Merge failed"))?;

        if self.json {
            return print_json(&report);
        }

        println!();
        if report.merged == 0 {
            println!(
                "No new entries to merge ({} duplicates skipped, {} errors); contributor files left in place",
                report.duplicates, report.errors
            );
            for detail in &report.error_details {
                println!("  ✗ {detail}");
            }
            return Ok(());
        }
        println!(
            "✓ Merged {} entries ({} duplicates skipped, {} errors)",
            report.merged, report.duplicates, report.errors
        );
        println!("  Addon catalog now has {} entries", report.total_entries);
        for detail in &report.error_details {
            println!("  ✗ {detail}");
        }
        match &disposition {
            Disposition::Archive(dir) if !report.disposed.is_empty() => {
                println!("  Archived {} files to {}", report.disposed.len(), dir.display());
            }
            Disposition::Delete if !report.disposed.is_empty() => {
                println!("  Deleted {} files", report.disposed.len());
            }
            _ => {}
        }

        Ok(())
    }
}
