//! Lint command: content-integrity checks over the docs tree.

use crate::cli::common::{io_error, print_json, CliError, CliResult, GlobalOptions};
use crate::lint::lint_docs;
use clap::Args;

/// Check frontmatter, repository links and relative links in the docs
#[derive(Debug, Clone, Args)]
pub struct LintArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl LintArgs {
    /// Execute the lint command
    pub fn execute(&self, globals: &GlobalOptions) -> CliResult<()> {
        let config = globals.load_config()?;
        let paths = &config.paths;

        let generated = [paths.index_file.as_path(), paths.categories_file.as_path()];
        let report = lint_docs(&paths.docs, &generated).map_err(io_error("Lint failed"))?;

        if self.json {
            print_json(&report)?;
        } else {
            print!("{}", report.format_message());
        }

        if report.is_clean() {
            Ok(())
        } else {
            Err(CliError::validation(format!(
                "{} content errors found",
                report.error_count()
            )))
        }
    }
}
