//! Environment checks for catalog maintenance.
//!
//! Detects the external `git` tool, the catalog JSON files, the docs tree,
//! the tag macros file and the GitHub token.
//!
//! # Example
//!
//! ```rust
//! use stylistguild::config::Config;
//! use stylistguild::doctor::{EnvironmentChecker, CheckStatus};
//!
//! let checker = EnvironmentChecker::new(&Config::default());
//! for check in checker.check_all() {
//!     if check.status != CheckStatus::Available {
//!         println!("{}: {}", check.name, check.message);
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! Checks never panic:
//! - Missing tools and files return `CheckStatus::Missing` with a hint
//! - Unreadable or malformed files return `CheckStatus::Unknown` with details

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::Config;
use crate::services::catalog_store::load_json_array;
use crate::services::TagMacros;

/// Status of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    /// Present and working
    Available,
    /// Not found
    Missing,
    /// Present but could not be confirmed (error, bad content)
    Unknown,
}

/// Result of a single check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Name of the check (e.g., "Git", "Official catalog")
    pub name: String,
    pub status: CheckStatus,
    /// Version or entry count, when detected
    pub detail: Option<String>,
    /// Human-readable message about the status
    pub message: String,
}

impl CheckResult {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        status: CheckStatus,
        detail: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            status,
            detail,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn available(name: impl Into<String>, detail: Option<String>, message: impl Into<String>) -> Self {
        Self::new(name, CheckStatus::Available, detail, message)
    }

    #[must_use]
    pub fn missing(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, CheckStatus::Missing, None, message)
    }

    #[must_use]
    pub fn unknown(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, CheckStatus::Unknown, None, message)
    }
}

/// Checker for the catalog maintenance environment.
pub struct EnvironmentChecker {
    official: PathBuf,
    addon: PathBuf,
    docs: PathBuf,
    macros: PathBuf,
    has_token: bool,
}

impl EnvironmentChecker {
    /// Creates a checker for the configured paths.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            official: config.paths.official.clone(),
            addon: config.paths.addon.clone(),
            docs: config.paths.docs.clone(),
            macros: config.paths.macros.clone(),
            has_token: config.github_token().is_some(),
        }
    }

    /// Runs every check, in display order.
    #[must_use]
    pub fn check_all(&self) -> Vec<CheckResult> {
        vec![
            self.check_git(),
            Self::check_catalog("Official catalog", &self.official),
            Self::check_catalog("Addon catalog", &self.addon),
            self.check_docs(),
            self.check_macros(),
            self.check_token(),
        ]
    }

    /// Checks that `git` is installed.
    ///
    /// Runs `git --version` and parses the output.
    #[must_use]
    pub fn check_git(&self) -> CheckResult {
        match run_version_command("git", &["--version"]) {
            Ok(output) => match parse_version(&output) {
                Some(version) => {
                    CheckResult::available("Git", Some(version.clone()), format!("Found version {version}"))
                }
                None => CheckResult::unknown(
                    "Git",
                    format!("Found but could not parse version: {}", output.trim()),
                ),
            },
            Err(e) if is_command_not_found(&e) => {
                CheckResult::missing("Git", "Not found in PATH. Required by the pull command")
            }
            Err(e) => CheckResult::unknown("Git", format!("Error checking: {e}")),
        }
    }

    /// Checks that a catalog file exists and holds a JSON array.
    #[must_use]
    pub fn check_catalog(name: &str, path: &Path) -> CheckResult {
        if !path.is_file() {
            return CheckResult::missing(name, format!("File does not exist: {}", path.display()));
        }

        match load_json_array(path) {
            Ok(entries) => CheckResult::available(
                name,
                Some(format!("{} entries", entries.len())),
                format!("{} entries in {}", entries.len(), path.display()),
            ),
            Err(e) => CheckResult::unknown(name, format!("{e:#}")),
        }
    }

    /// Checks that the docs directory exists.
    #[must_use]
    pub fn check_docs(&self) -> CheckResult {
        if self.docs.is_dir() {
            CheckResult::available("Docs directory", None, format!("Found {}", self.docs.display()))
        } else if self.docs.exists() {
            CheckResult::missing(
                "Docs directory",
                format!("Path is not a directory: {}", self.docs.display()),
            )
        } else {
            CheckResult::missing(
                "Docs directory",
                format!("Directory does not exist: {}", self.docs.display()),
            )
        }
    }

    /// Checks the optional tag macros file.
    ///
    /// A missing file is fine: the built-in macros apply.
    #[must_use]
    pub fn check_macros(&self) -> CheckResult {
        if !self.macros.exists() {
            return CheckResult::available(
                "Tag macros",
                Some(format!("{} macros", TagMacros::default().len())),
                "Using built-in macros",
            );
        }

        match TagMacros::load(&self.macros) {
            Ok(macros) => CheckResult::available(
                "Tag macros",
                Some(format!("{} macros", macros.len())),
                format!("Loaded {}", self.macros.display()),
            ),
            Err(e) => CheckResult::unknown("Tag macros", format!("{e:#}")),
        }
    }

    /// Checks whether a GitHub token is configured.
    #[must_use]
    pub fn check_token(&self) -> CheckResult {
        if self.has_token {
            CheckResult::available("GitHub token", None, "Token configured")
        } else {
            CheckResult::missing(
                "GitHub token",
                "No token set. Unauthenticated requests are limited to 60 per hour",
            )
        }
    }
}

/// Runs a command and returns its output (stdout, else stderr).
fn run_version_command(command: &str, args: &[&str]) -> Result<String> {
    let output = Command::new(command)
        .args(args)
        .output()
        .with_context(|| format!("Failed to execute '{command}'"))?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    Ok(if stdout.trim().is_empty() {
        stderr.to_string()
    } else {
        stdout.to_string()
    })
}

/// Finds the first `X.Y[.Z]` word, e.g. `git version 2.43.0` gives `2.43.0`.
fn parse_version(output: &str) -> Option<String> {
    output
        .split_whitespace()
        .find(|word| {
            let parts: Vec<&str> = word.split('.').collect();
            parts.len() >= 2
                && parts
                    .iter()
                    .take(3)
                    .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
        })
        .map(String::from)
}

fn is_command_not_found(error: &anyhow::Error) -> bool {
    let error_msg = format!("{error:#}").to_lowercase();
    error_msg.contains("not found")
        || error_msg.contains("no such file")
        || error_msg.contains("cannot find")
        || error_msg.contains("os error 2")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_version() {
        assert_eq!(parse_version("git version 2.43.0"), Some("2.43.0".to_string()));
        assert_eq!(
            parse_version("git version 2.39.3 (Apple Git-146)"),
            Some("2.39.3".to_string())
        );
        assert_eq!(parse_version("no version here"), None);
    }

    #[test]
    fn test_check_catalog() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("themes.json");

        let result = EnvironmentChecker::check_catalog("Official catalog", &path);
        assert_eq!(result.status, CheckStatus::Missing);

        fs::write(&path, r#"[{"repo": "o/r"}, {"repo": "o/s"}]"#).unwrap();
        let result = EnvironmentChecker::check_catalog("Official catalog", &path);
        assert_eq!(result.status, CheckStatus::Available);
        assert_eq!(result.detail.as_deref(), Some("2 entries"));

        fs::write(&path, "{not json").unwrap();
        let result = EnvironmentChecker::check_catalog("Official catalog", &path);
        assert_eq!(result.status, CheckStatus::Unknown);
    }

    #[test]
    fn test_check_all_order_and_token() {
        let temp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.paths.docs = temp.path().to_path_buf();
        config.paths.macros = temp.path().join("missing-macros.json");
        config.github.token = Some("abc".to_string());

        let checker = EnvironmentChecker::new(&config);
        let results = checker.check_all();
        let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Git", "Official catalog", "Addon catalog", "Docs directory", "Tag macros", "GitHub token"]
        );
        assert_eq!(results[3].status, CheckStatus::Available);
        assert_eq!(results[4].status, CheckStatus::Available);
        assert_eq!(results[5].status, CheckStatus::Available);
    }

    #[test]
    fn test_missing_token() {
        let checker = EnvironmentChecker::new(&Config::default());
        // GITHUB_TOKEN only applies through Config::load, not Config::default
        assert_eq!(checker.check_token().status, CheckStatus::Missing);
    }
}
