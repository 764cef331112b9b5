//! Render command: theme pages, categories page and index.

use crate::cli::common::{io_error, print_json, require_file, runtime, store, CliError, CliResult, GlobalOptions};
use crate::github::GithubClient;
use crate::models::RepoSlug;
use crate::render::{collect_entries, Renderer};
use chrono::Local;
use clap::Args;
use std::collections::HashMap;
use std::time::Duration;

/// Render theme pages, the categories page and the index
#[derive(Debug, Clone, Args)]
pub struct RenderArgs {
    /// Skip GitHub lookups; pages fall back to release dates
    #[arg(long)]
    pub offline: bool,

    /// Render only this repository (owner/name)
    #[arg(long, value_name = "SLUG")]
    pub repo: Option<String>,

    /// Output the batch report as JSON
    #[arg(long)]
    pub json: bool,
}

impl RenderArgs {
    /// Execute the render command
    pub fn execute(&self, globals: &GlobalOptions) -> CliResult<()> {
        let config = globals.load_config()?;
        let store = store(&config);
        require_file(store.official_path(), "Official catalog")?;

        let only = self
            .repo
            .as_deref()
            .map(RepoSlug::parse)
            .transpose()
            .map_err(|e| CliError::validation(format!("{e:#}")))?;

        let official = store.load_official().map_err(io_error("Failed to load catalogs"))?;
        let addon = store.load_addon().map_err(io_error("Failed to load catalogs"))?;

        let entries = collect_entries(&official, &addon, only.as_ref());
        if let (Some(slug), true) = (&only, entries.is_empty()) {
            return Err(CliError::validation(format!(
                "{slug} has no entry in both catalogs"
            )));
        }

        let dates = if self.offline {
            HashMap::new()
        } else {
            let slugs: Vec<RepoSlug> = entries
                .iter()
                .filter_map(|e| e.as_ref().ok().map(|e| e.repo.clone()))
                .collect();
            let client = GithubClient::new(
                config.github_token(),
                Duration::from_secs(config.github.timeout_secs),
            )
            .map_err(|e| CliError::io(format!("Failed to create HTTP client: {e}")))?;
            if !client.has_token() {
                tracing::warn!("No GitHub token set; lookups may hit the rate limit");
            }
            tracing::info!("Fetching creation dates for {} repositories", slugs.len());
            runtime()?.block_on(client.creation_dates(&slugs, config.github.concurrency))
        };

        let report = Renderer::from_config(&config)
            .render_batch(entries, &dates, Some(official.len()), Local::now())
            .map_err(io_error("Render failed"))?;

        if self.json {
            print_json(&report)?;
        } else {
            for detail in &report.details {
                match (&detail.path, &detail.error) {
                    (Some(path), _) => println!("✓ {} → {}", detail.title, path.display()),
                    (None, Some(error)) => {
                        let name = if detail.repo.is_empty() { "entry" } else { &detail.repo };
                        println!("✗ {name}: {error}");
                    }
                    (None, None) => {}
                }
            }
            println!();
            println!(
                "Rendered {}/{} pages ({} failed), {} added to categories",
                report.successful, report.total, report.failed, report.categories_updated
            );
            if let Some(index) = &report.index {
                println!(
                    "Index: {} pages of {} in {} groups → {}",
                    index.pages,
                    index.total,
                    index.groups,
                    index.path.display()
                );
            }
        }

        if report.failed > 0 {
            Err(CliError::validation(format!("{} pages failed to render", report.failed)))
        } else {
            Ok(())
        }
    }
}
