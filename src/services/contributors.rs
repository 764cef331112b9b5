//! Per-contributor addon files.
//!
//! When several people split the missing themes by range, each writes to
//! `<addon stem>-<author>.json` next to the addon catalog. Merging folds
//! those files back into the catalog.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::AddonEntry;
use crate::services::catalog_store::{load_json_list, CatalogStore};

/// Lowercases an author name and replaces characters outside
/// `[A-Za-z0-9_-]` with `_`.
#[must_use]
pub fn sanitize_author(author: &str) -> String {
    author
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// What happens to contributor files after a merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Move them into the given directory
    Archive(PathBuf),
    /// Delete them
    Delete,
}

/// Progress of one contributor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContributorProgress {
    pub author: String,
    pub file: PathBuf,
    /// Entries in the file, `None` when it cannot be read
    pub entries: Option<usize>,
}

/// Outcome of merging contributor files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    pub files: Vec<PathBuf>,
    pub merged: usize,
    pub duplicates: usize,
    pub errors: usize,
    pub error_details: Vec<String>,
    pub total_entries: usize,
    /// Files moved or deleted after the merge
    pub disposed: Vec<PathBuf>,
}

/// Locator for contributor files next to an addon catalog.
#[derive(Debug, Clone)]
pub struct ContributorFiles {
    addon: PathBuf,
}

impl ContributorFiles {
    #[must_use]
    pub fn new(addon: impl Into<PathBuf>) -> Self {
        Self {
            addon: addon.into(),
        }
    }

    fn stem(&self) -> String {
        self.addon
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    fn dir(&self) -> PathBuf {
        match self.addon.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Path of the contributor file for an author.
    #[must_use]
    pub fn file_for(&self, author: &str) -> PathBuf {
        let name = format!("{}-{}.json", self.stem(), sanitize_author(author));
        match self.addon.parent() {
            Some(parent) => parent.join(name),
            None => PathBuf::from(name),
        }
    }

    /// Author part of a contributor file name.
    #[must_use]
    pub fn author_of(&self, file: &Path) -> Option<String> {
        let name = file.file_name()?.to_str()?;
        let author = name
            .strip_prefix(&format!("{}-", self.stem()))?
            .strip_suffix(".json")?;
        (!author.is_empty()).then(|| author.to_string())
    }

    /// Contributor files next to the addon catalog, sorted by name.
    pub fn find(&self) -> Result<Vec<PathBuf>> {
        let dir = self.dir();
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(&dir)
            .with_context(|| format!("Failed to read directory: {}", dir.display()))?
        {
            let path = entry?.path();
            if path.is_file() && self.author_of(&path).is_some() {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }

    /// Entry counts per contributor.
    pub fn progress(&self) -> Result<Vec<ContributorProgress>> {
        Ok(self
            .find()?
            .into_iter()
            .map(|file| ContributorProgress {
                author: self.author_of(&file).unwrap_or_default(),
                entries: load_json_list::<AddonEntry>(&file).ok().map(|e| e.len()),
                file,
            })
            .collect())
    }

    /// Merges every contributor file into the addon catalog.
    ///
    /// Entries whose repository is already catalogued count as duplicates.
    /// When nothing new was merged the catalog and every contributor file
    /// are left untouched. Otherwise the catalog is saved and the files that
    /// were read successfully are archived or deleted; unreadable files stay
    /// in place.
    pub fn merge(
        &self,
        store: &CatalogStore,
        disposition: &Disposition,
        now: DateTime<Local>,
    ) -> Result<MergeReport> {
        let files = self.find()?;
        let mut catalog = store.load_addon()?;
        let mut known: HashSet<String> = catalog
            .iter()
            .filter(|e| !e.repo.is_empty())
            .map(|e| e.repo.clone())
            .collect();

        let mut report = MergeReport {
            files: files.clone(),
            ..MergeReport::default()
        };
        let mut readable = Vec::new();

        for file in &files {
            let entries: Vec<AddonEntry> = match load_json_list(file) {
                Ok(entries) => entries,
                Err(err) => {
                    tracing::warn!("Error processing {}: {err:#}", file.display());
                    report.errors += 1;
                    report
                        .error_details
                        .push(format!("{}: {err:#}", file.display()));
                    continue;
                }
            };
            let author = self.author_of(file).unwrap_or_default();

            for mut entry in entries {
                if entry.repo.is_empty() {
                    continue;
                }
                if known.contains(&entry.repo) {
                    report.duplicates += 1;
                    continue;
                }

                let credited = entry.contributor.clone().unwrap_or_else(|| author.clone());
                entry.stamp_merged(&credited, now);
                tracing::debug!("Merging {} from {}", entry.repo, file.display());
                known.insert(entry.repo.clone());
                catalog.push(entry);
                report.merged += 1;
            }

            readable.push(file.clone());
        }

        report.total_entries = catalog.len();
        if report.merged == 0 {
            tracing::info!("No new entries to merge");
            return Ok(report);
        }
        store.save_addon(&catalog)?;

        if let Disposition::Archive(dir) = disposition {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }

        for file in readable {
            match disposition {
                Disposition::Archive(dir) => {
                    let Some(name) = file.file_name() else {
                        continue;
                    };
                    let target = dir.join(name);
                    fs::rename(&file, &target).with_context(|| {
                        format!(
                            "Failed to move {} to {}",
                            file.display(),
                            target.display()
                        )
                    })?;
                }
                Disposition::Delete => {
                    fs::remove_file(&file)
                        .with_context(|| format!("Failed to delete {}", file.display()))?;
                }
            }
            report.disposed.push(file);
        }

        Ok(report)
    }
}
