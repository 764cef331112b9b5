//! Stats command: file statistics and tag usage.

use crate::cli::common::{io_error, print_json, store, CliResult, GlobalOptions};
use crate::services::catalog_store::{file_stats, FileStats};
use crate::services::contributors::ContributorFiles;
use crate::services::tags::{statistics, TagStatistics};
use clap::Args;
use serde::Serialize;
use std::path::Path;

/// Tags listed in text output.
const TOP_TAGS: usize = 15;

/// Show catalog file statistics and tag usage
#[derive(Debug, Clone, Args)]
pub struct StatsArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct StatsOutput {
    files: Vec<FileStats>,
    tags: TagStatistics,
}

impl StatsArgs {
    /// Execute the stats command
    pub fn execute(&self, globals: &GlobalOptions) -> CliResult<()> {
        let config = globals.load_config()?;
        let store = store(&config);

        let contributor_files = ContributorFiles::new(store.addon_path())
            .find()
            .map_err(io_error("Failed to list contributor files"))?;

        let mut paths: Vec<&Path> = vec![store.official_path(), store.addon_path()];
        paths.extend(contributor_files.iter().map(std::path::PathBuf::as_path));

        let addon = store.load_addon().map_err(io_error("Failed to load addon catalog"))?;
        let output = StatsOutput {
            files: file_stats(&paths),
            tags: statistics(&addon),
        };

        if self.json {
            return print_json(&output);
        }

        println!("Files");
        for stats in &output.files {
            if !stats.exists {
                println!("  {}: missing", stats.path.display());
                continue;
            }
            let modified = stats
                .modified
                .map_or_else(|| "unknown".to_string(), |m| m.format("%Y-%m-%d %H:%M").to_string());
            let validity = if stats.valid_json { "" } else { " (invalid JSON)" };
            println!(
                "  {}: {} entries, {} bytes, modified {modified}{validity}",
                stats.path.display(),
                stats.entry_count,
                stats.size_bytes
            );
        }

        println!();
        println!(
            "Tags: {} unique, {} usages",
            output.tags.unique_tags, output.tags.total_usages
        );
        for count in output.tags.counts.iter().take(TOP_TAGS) {
            println!("  {:<20} {}", count.tag, count.count);
        }

        Ok(())
    }
}
