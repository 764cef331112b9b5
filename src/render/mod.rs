//! Page rendering.
//!
//! Turns joined catalog entries into theme pages, keeps the curated
//! categories page current and rebuilds the alphabetical index. Rendering is
//! pure: creation dates are fetched beforehand and handed in.

pub mod categories;
pub mod index;
pub mod page;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::{Config, PathConfig, RenderConfig};
use crate::github::RepoCreated;
use crate::models::{AddonEntry, OfficialTheme, RepoSlug, ThemeEntry};
use crate::services::atomic_write;

pub use categories::update_categories;
pub use index::{write_index, IndexSummary};
pub use page::render_page;

/// Outcome of rendering one theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderDetail {
    pub title: String,
    pub repo: String,
    pub success: bool,
    pub path: Option<PathBuf>,
    pub categories: Vec<String>,
    pub error: Option<String>,
}

/// Totals of a batch render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub categories_updated: usize,
    pub details: Vec<RenderDetail>,
    pub index: Option<IndexSummary>,
}

/// Joins addon entries with their official themes.
///
/// Entries without an official counterpart are skipped. With `only`, the
/// result is limited to that repository.
pub fn collect_entries(
    official: &[OfficialTheme],
    addon: &[AddonEntry],
    only: Option<&RepoSlug>,
) -> Vec<Result<ThemeEntry>> {
    let by_repo: HashMap<&str, &OfficialTheme> =
        official.iter().map(|t| (t.repo.as_str(), t)).collect();

    addon
        .iter()
        .filter(|a| only.is_none_or(|slug| a.repo == slug.to_string()))
        .filter_map(|a| match by_repo.get(a.repo.as_str()) {
            Some(theme) => Some(ThemeEntry::from_catalog(theme, a)),
            None => {
                debug!("Skipping {}: not in the official catalog", a.repo);
                None
            }
        })
        .collect()
}

/// Writes pages, categories and the index under the configured docs tree.
#[derive(Debug, Clone)]
pub struct Renderer {
    paths: PathConfig,
    render: RenderConfig,
}

impl Renderer {
    #[must_use]
    pub fn new(paths: PathConfig, render: RenderConfig) -> Self {
        Self { paths, render }
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.paths.clone(), config.render.clone())
    }

    /// Root directory of the theme pages.
    #[must_use]
    pub fn themes_dir(&self) -> &Path {
        &self.paths.themes_dir
    }

    /// Where the page of a theme lives: `<themes>/<letter dir>/<slug>.md`.
    #[must_use]
    pub fn page_path(&self, entry: &ThemeEntry) -> PathBuf {
        self.paths
            .themes_dir
            .join(entry.bucket().dir)
            .join(entry.file_name())
    }

    /// Renders and writes one page.
    pub fn write_page(
        &self,
        entry: &ThemeEntry,
        created: Option<&RepoCreated>,
        now: DateTime<Local>,
    ) -> Result<PathBuf> {
        let path = self.page_path(entry);
        let content = render_page(entry, created, &self.render, now)?;
        atomic_write(&path, &content)
            .with_context(|| format!("Failed to write page for {}", entry.repo))?;
        debug!("Wrote {}", path.display());
        Ok(path)
    }

    /// Renders one theme and files it under its curated categories.
    pub fn render_theme(
        &self,
        entry: &ThemeEntry,
        created: Option<&RepoCreated>,
        now: DateTime<Local>,
    ) -> Result<(PathBuf, Vec<String>)> {
        let path = self.write_page(entry, created, now)?;
        let placed = update_categories(&self.paths.categories_file, entry, &self.render.categories)?;
        Ok((path, placed))
    }

    /// Renders every entry, then rebuilds the index.
    ///
    /// Failures of single themes are recorded and the batch continues.
    /// `official_total` sizes the index progress counter.
    pub fn render_batch(
        &self,
        entries: Vec<Result<ThemeEntry>>,
        dates: &HashMap<RepoSlug, RepoCreated>,
        official_total: Option<usize>,
        now: DateTime<Local>,
    ) -> Result<BatchReport> {
        let mut report = BatchReport {
            total: entries.len(),
            ..BatchReport::default()
        };

        for entry in entries {
            let detail = match entry {
                Ok(entry) => match self.render_theme(&entry, dates.get(&entry.repo), now) {
                    Ok((path, placed)) => {
                        if !placed.is_empty() {
                            report.categories_updated += 1;
                        }
                        RenderDetail {
                            title: entry.title.clone(),
                            repo: entry.repo.to_string(),
                            success: true,
                            path: Some(path),
                            categories: placed,
                            error: None,
                        }
                    }
                    Err(e) => {
                        warn!("Failed to render {}: {e:#}", entry.repo);
                        RenderDetail {
                            title: entry.title.clone(),
                            repo: entry.repo.to_string(),
                            success: false,
                            path: None,
                            categories: Vec::new(),
                            error: Some(format!("{e:#}")),
                        }
                    }
                },
                Err(e) => {
                    warn!("Skipping theme: {e:#}");
                    RenderDetail {
                        title: String::new(),
                        repo: String::new(),
                        success: false,
                        path: None,
                        categories: Vec::new(),
                        error: Some(format!("{e:#}")),
                    }
                }
            };

            if detail.success {
                report.successful += 1;
            } else {
                report.failed += 1;
            }
            report.details.push(detail);
        }

        report.index = Some(write_index(
            &self.paths.themes_dir,
            &self.paths.index_file,
            &self.paths.categories_file,
            official_total,
        )?);

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::fs;
    use tempfile::TempDir;

    fn official(name: &str, repo: &str) -> OfficialTheme {
        OfficialTheme {
            name: name.to_string(),
            author: "author".to_string(),
            repo: repo.to_string(),
            screenshot: "shot.png".to_string(),
            modes: vec!["dark".to_string()],
        }
    }

    fn renderer(root: &Path) -> Renderer {
        let themes = root.join("docs").join("themes");
        let paths = PathConfig {
            index_file: themes.join("index.md"),
            categories_file: themes.join("categories.md"),
            themes_dir: themes,
            ..PathConfig::default()
        };
        Renderer::new(paths, RenderConfig::default())
    }

    #[test]
    fn test_collect_entries_joins_and_filters() {
        let official = vec![official("Atom", "o/atom"), official("Blue", "o/blue")];
        let addon = vec![AddonEntry::new("o/atom"), AddonEntry::new("o/gone"), AddonEntry::new("o/blue")];

        let all = collect_entries(&official, &addon, None);
        assert_eq!(all.len(), 2);

        let slug = RepoSlug::parse("o/blue").unwrap();
        let one = collect_entries(&official, &addon, Some(&slug));
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].as_ref().unwrap().title, "Blue");
    }

    #[test]
    fn test_page_path_uses_bucket() {
        let temp = TempDir::new().unwrap();
        let renderer = renderer(temp.path());
        let entry = ThemeEntry::from_catalog(&official("80s Neon", "o/neon"), &AddonEntry::new("o/neon")).unwrap();
        assert_eq!(
            renderer.page_path(&entry),
            temp.path().join("docs/themes/_a/80s-neon.md")
        );
    }

    #[test]
    fn test_render_batch_writes_pages_categories_and_index() {
        let temp = TempDir::new().unwrap();
        let renderer = renderer(temp.path());

        let official = vec![official("Atom", "o/atom"), official("Minimal", "o/minimal")];
        let mut gem = AddonEntry::new("o/minimal");
        gem.tags = vec!["underrated_gems".to_string()];
        let addon = vec![AddonEntry::new("o/atom"), gem];

        let mut dates = HashMap::new();
        dates.insert(
            RepoSlug::parse("o/atom").unwrap(),
            RepoCreated(Utc.with_ymd_and_hms(2022, 1, 2, 0, 0, 0).unwrap()),
        );

        let now = Local.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
        let report = renderer
            .render_batch(collect_entries(&official, &addon, None), &dates, Some(10), now)
            .unwrap();

        assert_eq!(report.total, 2);
        assert_eq!(report.successful, 2);
        assert_eq!(report.failed, 0);
        assert_eq!(report.categories_updated, 1);

        let themes = temp.path().join("docs/themes");
        let atom = fs::read_to_string(themes.join("a/atom.md")).unwrap();
        assert!(atom.contains("Created%20on-January%202022-blue"));
        assert!(fs::read_to_string(themes.join("categories.md"))
            .unwrap()
            .contains("|$m$|[Minimal](./m/minimal.md)|"));

        let index = report.index.unwrap();
        assert_eq!(index.pages, 2);
        assert_eq!(index.total, 10);
        assert!(fs::read_to_string(themes.join("index.md"))
            .unwrap()
            .contains("Themes added: 2 / 10"));
    }

    #[test]
    fn test_render_batch_records_failures() {
        let temp = TempDir::new().unwrap();
        let renderer = renderer(temp.path());
        let entries = vec![Err(anyhow::anyhow!("bad repository"))];

        let report = renderer
            .render_batch(entries, &HashMap::new(), None, Local::now())
            .unwrap();
        assert_eq!(report.failed, 1);
        assert_eq!(report.details[0].error.as_deref(), Some("bad repository"));
    }
}
