//! Status command: how far the addon catalog covers the official one.

use crate::cli::common::{io_error, print_json, require_file, store, CliResult, GlobalOptions};
use crate::services::contributors::{ContributorFiles, ContributorProgress};
use crate::services::sync::{compare, suggest, Suggestions, SyncReport};
use clap::Args;
use serde::Serialize;

/// Number of missing themes listed in text output.
const MISSING_PREVIEW: usize = 5;

/// Show catalog sync status
#[derive(Debug, Clone, Args)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct StatusOutput {
    #[serde(flatten)]
    report: SyncReport,
    contributors: Vec<ContributorProgress>,
    suggestions: Suggestions,
}

impl StatusArgs {
    /// Execute the status command
    pub fn execute(&self, globals: &GlobalOptions) -> CliResult<()> {
        let config = globals.load_config()?;
        let store = store(&config);
        require_file(store.official_path(), "Official catalog")?;

        let official = store.load_official().map_err(io_error("Failed to load catalogs"))?;
        let addon = store.load_addon().map_err(io_error("Failed to load catalogs"))?;

        let output = StatusOutput {
            report: compare(&official, &addon),
            contributors: ContributorFiles::new(store.addon_path())
                .progress()
                .map_err(io_error("Failed to list contributor files"))?,
            suggestions: suggest(&official, &addon),
        };

        if self.json {
            return print_json(&output);
        }

        let report = &output.report;
        println!("Catalog Status");
        println!("  Official themes:   {}", report.official_count);
        println!("  Addon entries:     {}", report.addon_count);
        println!("  Missing entries:   {}", report.missing_count);
        println!("  Orphaned entries:  {}", report.orphaned_count);
        println!("  Sync:              {:.1}%", report.sync_percentage);

        if !report.missing.is_empty() {
            println!();
            println!("Missing (first {MISSING_PREVIEW}):");
            for repo in report.missing.iter().take(MISSING_PREVIEW) {
                println!("  - {repo}");
            }
            if report.missing.len() > MISSING_PREVIEW {
                println!("  ... and {} more", report.missing.len() - MISSING_PREVIEW);
            }
        }

        if !report.orphaned.is_empty() {
            println!();
            println!("Orphaned (not in the official catalog):");
            for repo in &report.orphaned {
                println!("  - {repo}");
            }
        }

        if !output.contributors.is_empty() {
            println!();
            println!("Contributors:");
            for progress in &output.contributors {
                match progress.entries {
                    Some(count) => println!("  {}: {count} entries", progress.author),
                    None => println!("  {}: unreadable ({})", progress.author, progress.file.display()),
                }
            }
        }

        if !output.suggestions.review_required.is_empty() {
            println!();
            for note in &output.suggestions.review_required {
                println!("⚠ {note}");
            }
        }

        Ok(())
    }
}
