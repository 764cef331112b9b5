//! Catalog JSON file I/O.
//!
//! This module centralizes reading and writing of the official and addon
//! catalogs, providing consistent error messages, atomic writes and
//! backups before every overwrite.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::PathConfig;
use crate::models::{AddonEntry, OfficialTheme};
use crate::services::backups::BackupService;

/// Performs an atomic file write using temp file + rename pattern.
///
/// Parent directories are created as needed.
pub fn atomic_write(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    fs::write(&temp_path, content)
        .with_context(|| format!("Failed to write to temporary file: {}", temp_path.display()))?;

    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename temporary file to: {}", path.display()))?;

    Ok(())
}

/// Reads a JSON file whose root must be an array.
///
/// A missing file yields an empty list.
pub fn load_json_array(path: &Path) -> Result<Vec<Value>> {
    if !path.exists() {
        tracing::info!("{} not found, starting with an empty list", path.display());
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;

    match value {
        Value::Array(items) => Ok(items),
        _ => anyhow::bail!("Expected a JSON array at the root of {}", path.display()),
    }
}

/// Reads a JSON array file into typed entries.
pub fn load_json_list<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    load_json_array(path)?
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            serde_json::from_value(item)
                .with_context(|| format!("Invalid entry #{} in {}", idx + 1, path.display()))
        })
        .collect()
}

/// Reads a JSON array file into typed entries, skipping entries that do not
/// deserialize with a warning.
pub fn load_json_list_lenient<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    Ok(load_json_array(path)?
        .into_iter()
        .enumerate()
        .filter_map(|(idx, item)| match serde_json::from_value(item) {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!("Skipping entry #{} in {}: {err}", idx + 1, path.display());
                None
            }
        })
        .collect())
}

/// Serializes entries as 2-space indented JSON, non-ASCII kept as is.
pub fn to_pretty_json<T: Serialize + ?Sized>(data: &T) -> Result<String> {
    serde_json::to_string_pretty(data).context("Failed to serialize JSON")
}

/// Statistics about one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileStats {
    pub path: PathBuf,
    pub exists: bool,
    pub size_bytes: u64,
    pub modified: Option<DateTime<Local>>,
    /// Number of array entries, 0 when the root is not an array
    pub entry_count: usize,
    pub valid_json: bool,
}

/// Collects statistics for each path.
#[must_use]
pub fn file_stats(paths: &[&Path]) -> Vec<FileStats> {
    paths
        .iter()
        .map(|path| {
            let Ok(metadata) = fs::metadata(path) else {
                return FileStats {
                    path: path.to_path_buf(),
                    exists: false,
                    size_bytes: 0,
                    modified: None,
                    entry_count: 0,
                    valid_json: false,
                };
            };

            let parsed = fs::read_to_string(path)
                .ok()
                .and_then(|content| serde_json::from_str::<Value>(&content).ok());

            FileStats {
                path: path.to_path_buf(),
                exists: true,
                size_bytes: metadata.len(),
                modified: metadata.modified().ok().map(DateTime::<Local>::from),
                entry_count: parsed
                    .as_ref()
                    .and_then(Value::as_array)
                    .map_or(0, Vec::len),
                valid_json: parsed.is_some(),
            }
        })
        .collect()
}

/// Result of adopting a new upstream official catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub new_count: usize,
    pub previous_count: usize,
    pub addon_count: usize,
    pub added: Vec<String>,
    pub removed: Vec<String>,
    /// Addon entries whose repository is absent from the new catalog
    pub orphaned: Vec<String>,
    pub backups: Vec<PathBuf>,
}

/// Store for both catalog files.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    official: PathBuf,
    addon: PathBuf,
    backups: BackupService,
}

impl CatalogStore {
    /// Creates a store over explicit paths.
    #[must_use]
    pub fn new(
        official: impl Into<PathBuf>,
        addon: impl Into<PathBuf>,
        backup_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            official: official.into(),
            addon: addon.into(),
            backups: BackupService::new(backup_dir),
        }
    }

    /// Creates a store from configured paths.
    #[must_use]
    pub fn from_paths(paths: &PathConfig) -> Self {
        Self::new(&paths.official, &paths.addon, &paths.backup_dir)
    }

    #[must_use]
    pub fn official_path(&self) -> &Path {
        &self.official
    }

    #[must_use]
    pub fn addon_path(&self) -> &Path {
        &self.addon
    }

    #[must_use]
    pub fn backups(&self) -> &BackupService {
        &self.backups
    }

    /// Loads the official catalog.
    pub fn load_official(&self) -> Result<Vec<OfficialTheme>> {
        load_json_list_lenient(&self.official).context("Failed to load official catalog")
    }

    /// Loads the addon catalog.
    pub fn load_addon(&self) -> Result<Vec<AddonEntry>> {
        load_json_list(&self.addon).context("Failed to load addon catalog")
    }

    /// Saves the addon catalog, backing up the previous file first.
    pub fn save_addon(&self, entries: &[AddonEntry]) -> Result<()> {
        save_json_with_backup(&self.addon, entries, &self.backups)
            .context("Failed to save addon catalog")?;
        tracing::info!("Saved {} entries to {}", entries.len(), self.addon.display());
        Ok(())
    }

    /// Replaces the official catalog with a new upstream copy.
    ///
    /// Both catalogs are backed up before the official file is overwritten.
    pub fn import_official(&self, new_official: &Path) -> Result<ImportReport> {
        if !new_official.is_file() {
            anyhow::bail!("New official catalog not found: {}", new_official.display());
        }
        let incoming: Vec<OfficialTheme> = load_json_list(new_official)?;

        let current = self.load_official()?;
        let addon = self.load_addon()?;

        let current_repos: HashSet<&str> = current.iter().map(|t| t.repo.as_str()).collect();
        let new_repos: HashSet<&str> = incoming.iter().map(|t| t.repo.as_str()).collect();

        let mut report = ImportReport {
            new_count: incoming.len(),
            previous_count: current.len(),
            addon_count: addon.len(),
            added: incoming
                .iter()
                .filter(|t| !current_repos.contains(t.repo.as_str()))
                .map(|t| t.repo.clone())
                .collect(),
            removed: current
                .iter()
                .filter(|t| !new_repos.contains(t.repo.as_str()))
                .map(|t| t.repo.clone())
                .collect(),
            orphaned: addon
                .iter()
                .filter(|a| !new_repos.contains(a.repo.as_str()))
                .map(|a| a.repo.clone())
                .collect(),
            backups: Vec::new(),
        };

        report.backups = self
            .backups
            .create(&[&self.official, &self.addon], Some("pre_merge"))?;

        let content = fs::read_to_string(new_official)
            .with_context(|| format!("Failed to read {}", new_official.display()))?;
        atomic_write(&self.official, &content)?;

        if !report.orphaned.is_empty() {
            tracing::warn!(
                "{} addon entries may be orphaned by the update",
                report.orphaned.len()
            );
        }

        Ok(report)
    }
}

/// Writes a JSON list atomically after backing up the existing file.
pub fn save_json_with_backup<T: Serialize>(
    path: &Path,
    entries: &[T],
    backups: &BackupService,
) -> Result<()> {
    if path.exists() {
        backups.create(&[path], Some("pre_save"))?;
    }
    atomic_write(path, &to_pretty_json(entries)?)
}
