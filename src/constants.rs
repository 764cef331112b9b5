//! Application-wide constants.
//!
//! This module defines constants used throughout the application,
//! including the application name and the default catalog file locations.

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "StylistGuild";

/// The binary name of the application (used in command examples).
pub const APP_BINARY_NAME: &str = "stylistguild";

/// Project-local configuration file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "stylistguild.toml";

/// Upstream list of community themes.
pub const DEFAULT_OFFICIAL_JSON: &str = "community-css-themes.json";

/// The catalog's own tags and screenshots per repository.
pub const DEFAULT_ADDON_JSON: &str = "community-css-themes-tag-browser.json";

/// Optional tag macro overrides.
pub const DEFAULT_MACROS_JSON: &str = "tag_macros.json";

/// Root of the published docs tree.
pub const DEFAULT_DOCS_DIR: &str = "docs";

/// Directory holding one page per theme, bucketed by first letter.
pub const DEFAULT_THEMES_DIR: &str = "docs/themes";

/// Alphabetical themes index.
pub const DEFAULT_INDEX_FILE: &str = "docs/themes/index.md";

/// Curated categories page.
pub const DEFAULT_CATEGORIES_FILE: &str = "docs/themes/categories.md";

/// Where JSON backups are written.
pub const DEFAULT_BACKUP_DIR: &str = "backups";

/// Where merged contributor files are archived.
pub const CONTRIBUTOR_ARCHIVE_DIR: &str = "user_files_backup";

/// Marker div identifying pages produced by the renderer.
pub const THEME_PAGE_MARKER: &str = "theme_page_template_version_1";

/// Shields badge colour used on theme pages.
pub const DEFAULT_BADGE_COLOR: &str = "573E7A";

/// GitHub web root.
pub const GITHUB_WEB: &str = "https://github.com";

/// GitHub REST API root.
pub const GITHUB_API: &str = "https://api.github.com";

/// Raw content root used to resolve screenshot file names.
pub const GITHUB_RAW: &str = "https://raw.githubusercontent.com";
