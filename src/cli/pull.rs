//! Pull command: safe update of the catalog working tree.

use crate::cli::common::{print_json, CliError, CliResult, GlobalOptions};
use crate::git::GitUpdater;
use clap::Args;
use std::path::PathBuf;

/// Pull upstream changes when the working tree is clean
#[derive(Debug, Clone, Args)]
pub struct PullArgs {
    /// Repository directory
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl PullArgs {
    /// Execute the pull command
    pub fn execute(&self, _globals: &GlobalOptions) -> CliResult<()> {
        let report = GitUpdater::new(&self.dir).safe_pull();

        if self.json {
            print_json(&report)?;
        } else {
            for step in &report.steps {
                let symbol = if step.success { "✓" } else { "✗" };
                println!("{symbol} {}: {}", step.name, step.message);
            }
        }

        if report.is_success() {
            Ok(())
        } else {
            Err(CliError::io("Pull aborted"))
        }
    }
}
