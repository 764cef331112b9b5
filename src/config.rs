//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format. A project-local `stylistguild.toml` takes precedence over the
//! platform-specific config directory.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{
    APP_NAME, CONTRIBUTOR_ARCHIVE_DIR, DEFAULT_ADDON_JSON, DEFAULT_BACKUP_DIR,
    DEFAULT_BADGE_COLOR, DEFAULT_CATEGORIES_FILE, DEFAULT_DOCS_DIR, DEFAULT_INDEX_FILE,
    DEFAULT_MACROS_JSON, DEFAULT_OFFICIAL_JSON, DEFAULT_THEMES_DIR, LOCAL_CONFIG_FILE,
};

/// Environment variable overriding the GitHub token.
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// File system locations of the catalog working tree.
///
/// Relative paths resolve against the current directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// Upstream community themes list
    pub official: PathBuf,
    /// Catalog enrichment file (tags, screenshots)
    pub addon: PathBuf,
    /// Optional tag macro definitions
    pub macros: PathBuf,
    /// Root of the published documentation
    pub docs: PathBuf,
    /// Directory holding the per-letter theme pages
    pub themes_dir: PathBuf,
    /// Alphabetical index page
    pub index_file: PathBuf,
    /// Curated categories page
    pub categories_file: PathBuf,
    /// Directory for timestamped backups
    pub backup_dir: PathBuf,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            official: PathBuf::from(DEFAULT_OFFICIAL_JSON),
            addon: PathBuf::from(DEFAULT_ADDON_JSON),
            macros: PathBuf::from(DEFAULT_MACROS_JSON),
            docs: PathBuf::from(DEFAULT_DOCS_DIR),
            themes_dir: PathBuf::from(DEFAULT_THEMES_DIR),
            index_file: PathBuf::from(DEFAULT_INDEX_FILE),
            categories_file: PathBuf::from(DEFAULT_CATEGORIES_FILE),
            backup_dir: PathBuf::from(DEFAULT_BACKUP_DIR),
        }
    }
}

impl PathConfig {
    /// Directory contributor files are archived into after a merge.
    #[must_use]
    pub fn contributor_archive_dir(&self) -> PathBuf {
        self.addon
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(CONTRIBUTOR_ARCHIVE_DIR)
    }
}

/// A curated category listed on the categories page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    /// Addon tag that places a theme in this category
    pub tag: String,
    /// Section heading on the categories page
    pub heading: String,
}

impl CategoryConfig {
    fn new(tag: &str, heading: &str) -> Self {
        Self {
            tag: tag.to_string(),
            heading: heading.to_string(),
        }
    }
}

/// Page rendering settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Material icon placed in theme page frontmatter
    pub icon: Option<String>,
    /// Stylesheets added to theme page frontmatter
    pub extra_css: Vec<String>,
    /// Hex colour (without `#`) of the shield badges
    pub badge_color: String,
    /// Curated categories, in page order
    pub categories: Vec<CategoryConfig>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            icon: None,
            extra_css: Vec::new(),
            badge_color: DEFAULT_BADGE_COLOR.to_string(),
            categories: vec![
                CategoryConfig::new("underrated_gems", "Underrated Gems"),
                CategoryConfig::new("old_but_gold", "Old but Gold"),
                CategoryConfig::new("new_and_upcoming", "New and Upcoming"),
            ],
        }
    }
}

/// GitHub API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    /// Personal access token; `GITHUB_TOKEN` takes precedence
    pub token: Option<String>,
    /// Maximum concurrent API requests
    pub concurrency: usize,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            token: None,
            concurrency: 8,
            timeout_secs: 20,
        }
    }
}

/// Application configuration.
///
/// Validation rules:
/// - `github.concurrency` must be at least 1
/// - `render.badge_color` must be 3 or 6 hex digits
/// - category tags must be unique and non-empty
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// File system paths
    pub paths: PathConfig,
    /// Page rendering settings
    pub render: RenderConfig,
    /// GitHub API settings
    pub github: GithubConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the platform-specific config directory path.
    ///
    /// - Linux: `~/.config/StylistGuild/`
    /// - macOS: `~/Library/Application Support/StylistGuild/`
    /// - Windows: `%APPDATA%\StylistGuild\`
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(APP_NAME);

        Ok(config_dir)
    }

    /// Gets the full path to the user config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Finds the config file to use.
    ///
    /// Order: the explicit path, `./stylistguild.toml`, the platform config
    /// file. Returns `None` when no candidate exists.
    #[must_use]
    pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Some(local);
        }

        Self::config_file_path().ok().filter(|path| path.exists())
    }

    /// Loads the resolved configuration.
    ///
    /// Falls back to defaults when no config file exists. The
    /// `GITHUB_TOKEN` environment variable overrides the configured token.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file is missing, or the file cannot be
    /// read, parsed or validated.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match Self::locate(explicit) {
            Some(path) => Self::load_from(&path)?,
            None => Self::new(),
        };

        if let Ok(token) = std::env::var(GITHUB_TOKEN_ENV) {
            if !token.trim().is_empty() {
                config.github.token = Some(token.trim().to_string());
            }
        }

        Ok(config)
    }

    /// Loads configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    /// Saves configuration to the given path using atomic write.
    ///
    /// Uses temp file + rename pattern for atomic writes.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(dir).with_context(|| {
                format!("Failed to create config directory: {}", dir.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        let temp_path = path.with_extension("toml.tmp");

        fs::write(&temp_path, content).with_context(|| {
            format!("Failed to write temp config file: {}", temp_path.display())
        })?;

        fs::rename(&temp_path, path).with_context(|| {
            format!("Failed to rename temp config file to: {}", path.display())
        })?;

        Ok(())
    }

    /// Validates configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.github.concurrency == 0 {
            anyhow::bail!("github.concurrency must be at least 1");
        }

        let colour = &self.render.badge_color;
        if !matches!(colour.len(), 3 | 6) || !colour.chars().all(|c| c.is_ascii_hexdigit()) {
            anyhow::bail!(
                "render.badge_color must be 3 or 6 hex digits without '#' (got '{colour}')"
            );
        }

        let mut seen = std::collections::HashSet::new();
        for category in &self.render.categories {
            if category.tag.trim().is_empty() {
                anyhow::bail!("Category '{}' has an empty tag", category.heading);
            }
            if !seen.insert(category.tag.as_str()) {
                anyhow::bail!("Duplicate category tag '{}'", category.tag);
            }
        }

        Ok(())
    }

    /// The GitHub token, if one is configured.
    #[must_use]
    pub fn github_token(&self) -> Option<&str> {
        self.github.token.as_deref().filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_new() {
        let config = Config::new();
        assert_eq!(config.paths.addon, PathBuf::from(DEFAULT_ADDON_JSON));
        assert_eq!(config.github.concurrency, 8);
        assert_eq!(config.render.categories.len(), 3);
        assert_eq!(config.render.categories[0].tag, "underrated_gems");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validate() {
        let mut config = Config::new();
        config.github.concurrency = 0;
        assert!(config.validate().is_err());

        let mut config = Config::new();
        config.render.badge_color = "#573E7A".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::new();
        config
            .render
            .categories
            .push(CategoryConfig::new("old_but_gold", "Again"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [paths]
            docs = "site"

            [github]
            concurrency = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.paths.docs, PathBuf::from("site"));
        assert_eq!(config.paths.official, PathBuf::from(DEFAULT_OFFICIAL_JSON));
        assert_eq!(config.github.concurrency, 2);
        assert_eq!(config.github.timeout_secs, 20);
        assert_eq!(config.render.badge_color, DEFAULT_BADGE_COLOR);
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::new();
        config.render.icon = Some("material/palette".to_string());
        config.render.categories = vec![CategoryConfig::new("cozy", "Cozy Picks")];
        config.save_to(&config_file).unwrap();

        let loaded = Config::load_from(&config_file).unwrap();
        assert_eq!(loaded, config);
        assert!(!config_file.with_extension("toml.tmp").exists());
    }

    #[test]
    fn test_load_explicit_missing_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope.toml");
        assert!(Config::load(Some(&missing)).is_err());
    }

    #[test]
    fn test_contributor_archive_dir() {
        let mut paths = PathConfig::default();
        paths.addon = PathBuf::from("data/addon.json");
        assert_eq!(
            paths.contributor_archive_dir(),
            PathBuf::from("data").join(CONTRIBUTOR_ARCHIVE_DIR)
        );
    }
}
