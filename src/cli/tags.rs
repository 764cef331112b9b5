//! Tag maintenance commands.

use crate::cli::common::{io_error, print_json, store, CliResult, GlobalOptions};
use crate::services::tags::{alphabetize, statistics};
use crate::services::TagMacros;
use clap::{Args, Subcommand};
use serde::Serialize;

/// Tag maintenance
#[derive(Debug, Clone, Args)]
pub struct TagsArgs {
    #[command(subcommand)]
    command: TagsCommand,
}

#[derive(Debug, Clone, Subcommand)]
enum TagsCommand {
    /// Sort every entry's tags alphabetically
    Sort(TagsSortArgs),
    /// List tag shortcuts used by `add`
    Macros(TagsMacrosArgs),
    /// Show tag usage
    Stats(TagsStatsArgs),
}

/// Sort every entry's tags alphabetically
#[derive(Debug, Clone, Args)]
pub struct TagsSortArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// List tag shortcuts
#[derive(Debug, Clone, Args)]
pub struct TagsMacrosArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Show tag usage
#[derive(Debug, Clone, Args)]
pub struct TagsStatsArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Number of tags to list
    #[arg(long, default_value_t = 20)]
    top: usize,
}

#[derive(Debug, Serialize)]
struct SortOutput {
    entries: usize,
    changed: usize,
}

#[derive(Debug, Serialize)]
struct MacroOutput<'a> {
    shortcut: &'a str,
    tag: &'a str,
}

impl TagsArgs {
    /// Execute tags subcommand
    pub fn execute(&self, globals: &GlobalOptions) -> CliResult<()> {
        match &self.command {
            TagsCommand::Sort(args) => args.execute(globals),
            TagsCommand::Macros(args) => args.execute(globals),
            TagsCommand::Stats(args) => args.execute(globals),
        }
    }
}

impl TagsSortArgs {
    fn execute(&self, globals: &GlobalOptions) -> CliResult<()> {
        let config = globals.load_config()?;
        let store = store(&config);

        let mut entries = store.load_addon().map_err(io_error("Failed to load addon catalog"))?;
        let changed = alphabetize(&mut entries);
        if changed > 0 {
            store
                .save_addon(&entries)
                .map_err(io_error("Failed to save addon catalog"))?;
        }

        if self.json {
            return print_json(&SortOutput {
                entries: entries.len(),
                changed,
            });
        }

        if changed == 0 {
            println!("✓ Tags already sorted ({} entries)", entries.len());
        } else {
            println!("✓ Sorted tags in {changed} of {} entries", entries.len());
        }
        Ok(())
    }
}

impl TagsMacrosArgs {
    fn execute(&self, globals: &GlobalOptions) -> CliResult<()> {
        let config = globals.load_config()?;
        let macros =
            TagMacros::load(&config.paths.macros).map_err(io_error("Failed to load tag macros"))?;

        if self.json {
            let list: Vec<MacroOutput<'_>> = macros
                .iter()
                .map(|(shortcut, tag)| MacroOutput { shortcut, tag })
                .collect();
            return print_json(&list);
        }

        println!("Tag shortcuts ({}):", macros.len());
        for (shortcut, tag) in macros.iter() {
            println!("  {shortcut:<6} → {tag}");
        }
        println!();
        println!("Type 'notm' to keep 'minimalistic' out of the tags.");
        Ok(())
    }
}

impl TagsStatsArgs {
    fn execute(&self, globals: &GlobalOptions) -> CliResult<()> {
        let config = globals.load_config()?;
        let entries = store(&config)
            .load_addon()
            .map_err(io_error("Failed to load addon catalog"))?;
        let stats = statistics(&entries);

        if self.json {
            return print_json(&stats);
        }

        println!(
            "{} unique tags, {} usages across {} entries",
            stats.unique_tags,
            stats.total_usages,
            entries.len()
        );
        for count in stats.counts.iter().take(self.top) {
            println!("  {:<24} {}", count.tag, count.count);
        }
        Ok(())
    }
}
