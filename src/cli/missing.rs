//! Missing command: official themes without an addon entry.

use crate::cli::common::{io_error, print_json, require_file, store, CliResult, GlobalOptions};
use crate::services::atomic_write;
use crate::services::sync::{missing, missing_report};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// List official themes that have no addon entry
#[derive(Debug, Clone, Args)]
pub struct MissingArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Also write a text report to this file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct MissingEntry<'a> {
    /// 1-based position, usable with `add --range`
    number: usize,
    name: &'a str,
    author: &'a str,
    repo: &'a str,
    modes: &'a [String],
}

impl MissingArgs {
    /// Execute the missing command
    pub fn execute(&self, globals: &GlobalOptions) -> CliResult<()> {
        let config = globals.load_config()?;
        let store = store(&config);
        require_file(store.official_path(), "Official catalog")?;

        let official = store.load_official().map_err(io_error("Failed to load catalogs"))?;
        let addon = store.load_addon().map_err(io_error("Failed to load catalogs"))?;
        let themes = missing(&official, &addon);

        if let Some(path) = &self.output {
            atomic_write(path, &missing_report(&themes))
                .map_err(io_error("Failed to write report"))?;
            if !self.json {
                println!("✓ Report exported to {}", path.display());
            }
        }

        if self.json {
            let entries: Vec<MissingEntry<'_>> = themes
                .iter()
                .enumerate()
                .map(|(idx, t)| MissingEntry {
                    number: idx + 1,
                    name: t.display_name(),
                    author: &t.author,
                    repo: &t.repo,
                    modes: &t.modes,
                })
                .collect();
            return print_json(&entries);
        }

        if themes.is_empty() {
            println!("✓ Every official theme has an addon entry");
            return Ok(());
        }

        println!("{} themes need addon entries:", themes.len());
        for (idx, theme) in themes.iter().enumerate() {
            println!(
                "{:>4}. {} by {} ({})",
                idx + 1,
                theme.display_name(),
                theme.author,
                theme.repo
            );
        }

        Ok(())
    }
}
