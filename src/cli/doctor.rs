//! Doctor command for environment checks.

use crate::cli::common::{CliError, CliResult, GlobalOptions};
use crate::doctor::{CheckStatus, DoctorFormatter, EnvironmentChecker, OutputFormat};
use clap::Args;

/// Check the catalog maintenance environment
#[derive(Debug, Clone, Args)]
pub struct DoctorArgs {
    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

impl DoctorArgs {
    /// Execute the doctor command
    pub fn execute(&self, globals: &GlobalOptions) -> CliResult<()> {
        let config = globals.load_config()?;
        let results = EnvironmentChecker::new(&config).check_all();

        let format = if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Terminal
        };
        println!("{}", DoctorFormatter::with_format(format).format_results(&results));

        // A missing token only limits GitHub lookups
        let has_missing = results
            .iter()
            .any(|r| r.status == CheckStatus::Missing && r.name != "GitHub token");

        if has_missing {
            Err(CliError::io("Some checks failed"))
        } else {
            Ok(())
        }
    }
}
