//! Validation command for the catalog files.

use crate::cli::common::{
    io_error, print_json, require_file, runtime, CliError, CliResult, GlobalOptions,
};
use crate::config::Config;
use crate::github::GithubClient;
use crate::services::catalog_store::load_json_array;
use crate::validator::{screenshot_urls, validate_catalog, CatalogKind, CatalogValidation};
use clap::Args;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Validate both catalog files
#[derive(Debug, Clone, Args)]
pub struct ValidateArgs {
    /// Output results as JSON
    #[arg(long)]
    pub json: bool,

    /// Treat warnings as errors (exit non-zero)
    #[arg(long)]
    pub strict: bool,

    /// Send a HEAD request to every screenshot URL
    #[arg(long)]
    pub check_links: bool,
}

#[derive(Debug, Serialize)]
struct ValidateResponse {
    valid: bool,
    warnings: usize,
    official: CatalogValidation,
    addon: CatalogValidation,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self, globals: &GlobalOptions) -> CliResult<()> {
        let config = globals.load_config()?;
        require_file(&config.paths.official, "Official catalog")?;

        let official_raw = load_json_array(&config.paths.official)
            .map_err(io_error("Failed to load official catalog"))?;
        let addon_raw = load_json_array(&config.paths.addon)
            .map_err(io_error("Failed to load addon catalog"))?;

        let mut official = validate_catalog(&official_raw, CatalogKind::Official);
        let mut addon = validate_catalog(&addon_raw, CatalogKind::Addon);

        if self.check_links {
            official.link_warnings = unreachable_screenshots(&config, &official_raw, CatalogKind::Official)?;
            addon.link_warnings = unreachable_screenshots(&config, &addon_raw, CatalogKind::Addon)?;
        }

        let warnings = official.warning_count() + addon.warning_count();
        let valid = official.is_valid() && addon.is_valid() && !(self.strict && warnings > 0);

        if self.json {
            print_json(&ValidateResponse {
                valid,
                warnings,
                official,
                addon,
            })?;
        } else {
            print!("{}", official.format_message());
            print!("{}", addon.format_message());
            if valid {
                println!("✓ Validation passed");
            } else if self.strict && warnings > 0 {
                println!("✗ Validation failed ({warnings} warnings in strict mode)");
            } else {
                println!("✗ Validation failed");
            }
        }

        if valid {
            Ok(())
        } else {
            Err(CliError::validation("Catalog validation failed"))
        }
    }
}

/// Checks screenshot URLs and describes those that cannot be reached.
fn unreachable_screenshots(config: &Config, entries: &[Value], kind: CatalogKind) -> CliResult<Vec<String>> {
    let urls = screenshot_urls(entries, kind);
    if urls.is_empty() {
        return Ok(Vec::new());
    }

    let client = GithubClient::new(
        config.github_token(),
        Duration::from_secs(config.github.timeout_secs),
    )
    .map_err(|e| CliError::io(format!("Failed to create HTTP client: {e}")))?;

    tracing::info!("Checking {} {kind} screenshot URLs", urls.len());
    let checks = runtime()?.block_on(client.check_urls(&urls, config.github.concurrency));

    Ok(checks
        .into_iter()
        .filter(|c| !c.accessible)
        .map(|c| match (c.status, c.error) {
            (Some(status), _) => format!("Screenshot not accessible (HTTP {status}): {}", c.url),
            (None, Some(error)) => format!("Screenshot not accessible ({error}): {}", c.url),
            (None, None) => format!("Screenshot not accessible: {}", c.url),
        })
        .collect())
}
