//! Data models for the theme catalogs and the pages rendered from them.
//!
//! Models are plain serde types independent of file I/O and the CLI.

pub mod addon;
pub mod frontmatter;
pub mod official;
pub mod repo;
pub mod theme_entry;

pub use addon::AddonEntry;
pub use frontmatter::PageFrontmatter;
pub use official::OfficialTheme;
pub use repo::{parse_github_url, GithubUrlParts, RepoSlug};
pub use theme_entry::{is_absolute_url, page_slug, resolve_screenshot, LetterBucket, ThemeEntry};
