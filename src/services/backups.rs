//! Timestamped backups of catalog files.
//!
//! Backups live flat in one directory and are named
//! `<stem>_<YYYYmmdd_HHMMSS>[_<label>]<ext>`, so the timestamp in the name
//! orders them independently of file system metadata.

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

static NAME_TIMESTAMP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_(\d{8}_\d{6})(?:_|\.|$)").expect("valid timestamp regex"));

/// A backup file on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupInfo {
    pub file_name: String,
    pub path: PathBuf,
    pub size: u64,
    /// Timestamp from the file name, else the modification time
    pub created: DateTime<Local>,
}

/// Outcome of a cleanup pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    pub removed: usize,
    pub kept: usize,
    pub errors: usize,
}

/// Builds the backup file name for a source file.
///
/// # Errors
///
/// Returns an error if the path has no file stem.
pub fn backup_name(source: &Path, at: NaiveDateTime, label: Option<&str>) -> Result<String> {
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .with_context(|| format!("Cannot back up path without a file name: {}", source.display()))?;
    let ext = source
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();

    let mut name = format!("{stem}_{}", at.format(TIMESTAMP_FORMAT));
    if let Some(label) = label.filter(|l| !l.is_empty()) {
        name.push('_');
        name.push_str(label);
    }
    name.push_str(&ext);
    Ok(name)
}

/// Extracts the timestamp embedded in a backup file name.
#[must_use]
pub fn timestamp_from_name(file_name: &str) -> Option<DateTime<Local>> {
    let raw = NAME_TIMESTAMP
        .captures_iter(file_name)
        .last()
        .and_then(|c| c.get(1))?
        .as_str();
    let naive = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).ok()?;
    Local.from_local_datetime(&naive).earliest()
}

/// Service managing the backup directory.
#[derive(Debug, Clone)]
pub struct BackupService {
    dir: PathBuf,
}

impl BackupService {
    /// Creates a service for the given backup directory.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The backup directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Backs up each existing file; missing files are skipped.
    ///
    /// Returns the paths of the backups written.
    pub fn create(&self, sources: &[&Path], label: Option<&str>) -> Result<Vec<PathBuf>> {
        self.create_at(sources, label, Local::now().naive_local())
    }

    /// Backs up files using an explicit timestamp.
    pub fn create_at(
        &self,
        sources: &[&Path],
        label: Option<&str>,
        at: NaiveDateTime,
    ) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.dir).with_context(|| {
            format!("Failed to create backup directory: {}", self.dir.display())
        })?;

        let mut created = Vec::new();
        for source in sources {
            if !source.exists() {
                tracing::warn!("{} does not exist, skipping backup", source.display());
                continue;
            }

            let target = self.dir.join(backup_name(source, at, label)?);
            fs::copy(source, &target).with_context(|| {
                format!(
                    "Failed to back up {} to {}",
                    source.display(),
                    target.display()
                )
            })?;
            tracing::info!("Backed up {} to {}", source.display(), target.display());
            created.push(target);
        }

        Ok(created)
    }

    /// Lists backups whose name starts with `filter`, newest first.
    pub fn list(&self, filter: Option<&str>) -> Result<Vec<BackupInfo>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.dir).with_context(|| {
            format!("Failed to read backup directory: {}", self.dir.display())
        })?;

        let mut backups = Vec::new();
        for entry in entries {
            let entry = entry.context("Failed to read backup directory entry")?;
            let path = entry.path();
            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy().into_owned();
            if filter.is_some_and(|f| !file_name.starts_with(f)) {
                continue;
            }

            let created = match timestamp_from_name(&file_name) {
                Some(ts) => ts,
                None => DateTime::<Local>::from(metadata.modified()?),
            };

            backups.push(BackupInfo {
                file_name,
                path,
                size: metadata.len(),
                created,
            });
        }

        backups.sort_by(|a, b| {
            b.created
                .cmp(&a.created)
                .then_with(|| b.file_name.cmp(&a.file_name))
        });
        Ok(backups)
    }

    /// Backups belonging to one source file, newest first.
    pub fn backups_for(&self, original: &Path) -> Result<Vec<BackupInfo>> {
        let stem = original
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        let ext = original
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{e}"))
            .unwrap_or_default();

        let pattern = Regex::new(&format!(
            r"^{}_\d{{8}}_\d{{6}}(?:_.*)?{}$",
            regex::escape(stem),
            regex::escape(&ext)
        ))?;

        Ok(self
            .list(None)?
            .into_iter()
            .filter(|b| pattern.is_match(&b.file_name))
            .collect())
    }

    /// Restores `original` from a named backup, or from its latest backup.
    ///
    /// Returns the backup path that was used.
    pub fn restore(&self, original: &Path, name: Option<&str>) -> Result<PathBuf> {
        let backup = match name {
            Some(name) => {
                let path = self.dir.join(name);
                if !path.is_file() {
                    anyhow::bail!("Backup file {name} not found in {}", self.dir.display());
                }
                path
            }
            None => {
                self.backups_for(original)?
                    .into_iter()
                    .next()
                    .with_context(|| format!("No backup files found for {}", original.display()))?
                    .path
            }
        };

        if let Some(parent) = original.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&backup, original).with_context(|| {
            format!(
                "Failed to restore {} from {}",
                original.display(),
                backup.display()
            )
        })?;
        tracing::info!("Restored {} from {}", original.display(), backup.display());

        Ok(backup)
    }

    /// Removes backups older than `days_to_keep` days.
    pub fn cleanup(&self, days_to_keep: u32) -> Result<CleanupReport> {
        let cutoff = Local::now() - chrono::Duration::days(i64::from(days_to_keep));
        let mut report = CleanupReport::default();

        for backup in self.list(None)? {
            if backup.created >= cutoff {
                report.kept += 1;
                continue;
            }

            match fs::remove_file(&backup.path) {
                Ok(()) => {
                    tracing::info!("Removed old backup: {}", backup.file_name);
                    report.removed += 1;
                }
                Err(err) => {
                    tracing::warn!("Error removing {}: {err}", backup.file_name);
                    report.errors += 1;
                }
            }
        }

        Ok(report)
    }
}
