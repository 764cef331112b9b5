//! Render input for one theme page, joined from both catalogs.

use crate::constants::GITHUB_RAW;
use crate::models::{AddonEntry, OfficialTheme, RepoSlug};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

static NON_SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug regex"));

/// Everything the page template needs for one theme.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeEntry {
    pub title: String,
    pub repo: RepoSlug,
    /// Author as listed upstream; empty falls back to the repository owner
    pub author: String,
    pub tags: Vec<String>,
    pub main_screenshot: String,
    pub additional_images: Vec<String>,
    pub modes: Vec<String>,
    pub excerpt: Option<String>,
    pub palettes: Option<u32>,
    pub style_settings: Option<bool>,
    pub accessibility: Option<String>,
    pub released: Option<NaiveDate>,
}

impl ThemeEntry {
    /// Joins an official theme with its addon entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the official repository identifier is invalid.
    pub fn from_catalog(official: &OfficialTheme, addon: &AddonEntry) -> Result<Self> {
        let repo = RepoSlug::parse(&official.repo)
            .with_context(|| format!("Theme '{}' has an invalid repository", official.name))?;

        let screenshot = if addon.screenshot_main.trim().is_empty() {
            official.screenshot.trim()
        } else {
            addon.screenshot_main.trim()
        };

        Ok(Self {
            title: official.display_name().to_string(),
            main_screenshot: resolve_screenshot(&repo, screenshot),
            additional_images: addon
                .screenshots_side
                .iter()
                .map(|s| resolve_screenshot(&repo, s.trim()))
                .collect(),
            repo,
            author: official.author.trim().to_string(),
            tags: addon.tags.clone(),
            modes: official.modes.clone(),
            excerpt: addon.excerpt.clone().filter(|s| !s.trim().is_empty()),
            palettes: addon.palettes,
            style_settings: addon.style_settings,
            accessibility: addon.accessibility.clone().filter(|s| !s.trim().is_empty()),
            released: addon.released,
        })
    }

    /// Author name for display.
    #[must_use]
    pub fn author_display(&self) -> &str {
        if self.author.is_empty() {
            &self.repo.owner
        } else {
            &self.author
        }
    }

    /// Letter bucket this theme is filed under.
    #[must_use]
    pub fn bucket(&self) -> LetterBucket {
        LetterBucket::for_title(&self.title)
    }

    /// File name of the rendered page (`<slug>.md`).
    #[must_use]
    pub fn file_name(&self) -> String {
        let slug = page_slug(&self.title);
        if slug.is_empty() {
            format!("{}.md", page_slug(&self.repo.name))
        } else {
            format!("{slug}.md")
        }
    }

    /// Returns true if the theme carries the given tag.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Resolves a screenshot reference to an absolute URL.
///
/// Upstream lists screenshots as file names inside the repository; those are
/// served from the raw content host at `HEAD`. Absolute URLs pass through.
#[must_use]
pub fn resolve_screenshot(repo: &RepoSlug, screenshot: &str) -> String {
    if screenshot.is_empty() || is_absolute_url(screenshot) {
        return screenshot.to_string();
    }
    let file = screenshot.trim_start_matches("./").trim_start_matches('/');
    format!("{GITHUB_RAW}/{repo}/HEAD/{file}")
}

/// Returns true for URLs carrying both a scheme and a host.
#[must_use]
pub fn is_absolute_url(value: &str) -> bool {
    url::Url::parse(value).is_ok_and(|u| u.has_host())
}

/// Kebab-case slug used for page file names.
///
/// Lowercases, collapses every run of characters outside `[a-z0-9]` into a
/// single hyphen and trims hyphens at both ends.
#[must_use]
pub fn page_slug(title: &str) -> String {
    NON_SLUG
        .replace_all(&title.to_lowercase(), "-")
        .trim_matches('-')
        .to_string()
}

/// First-letter bucket of a theme title.
///
/// Alphabetic titles file under their lowercased first letter. Titles that
/// start with anything else (digits, symbols) or are empty share the `_a`
/// bucket, which sorts ahead of every letter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterBucket {
    /// Directory under the themes root (`a`, `b`, ..., `_a`)
    pub dir: String,
    /// Cell shown in the categories table (`$a$`, ..., `$<a$`)
    pub link: String,
}

impl LetterBucket {
    /// Link cell of the shared non-alphabetic bucket.
    pub const OTHER_LINK: &'static str = "$<a$";
    /// Directory of the shared non-alphabetic bucket.
    pub const OTHER_DIR: &'static str = "_a";

    /// Computes the bucket for a title.
    #[must_use]
    pub fn for_title(title: &str) -> Self {
        let first = title.trim().chars().next().and_then(|c| c.to_lowercase().next());

        match first {
            Some(c) if c.is_alphabetic() => Self {
                dir: c.to_string(),
                link: format!("${c}$"),
            },
            _ => Self {
                dir: Self::OTHER_DIR.to_string(),
                link: Self::OTHER_LINK.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn official() -> OfficialTheme {
        OfficialTheme {
            name: "80s Neon".to_string(),
            author: "catppuccin".to_string(),
            repo: "deathau/80s-Neon-for-Obsidian.md".to_string(),
            screenshot: "screenshot.png".to_string(),
            modes: vec!["dark".to_string()],
        }
    }

    #[test]
    fn test_page_slug() {
        assert_eq!(page_slug("80s Neon Retro-Wave!"), "80s-neon-retro-wave");
        assert_eq!(page_slug("  Things  "), "things");
        assert_eq!(page_slug("Café Noir"), "caf-noir");
        assert_eq!(page_slug("!!!"), "");
    }

    #[test]
    fn test_letter_bucket() {
        assert_eq!(
            LetterBucket::for_title("Minimal"),
            LetterBucket {
                dir: "m".to_string(),
                link: "$m$".to_string()
            }
        );
        assert_eq!(LetterBucket::for_title("80s Neon").dir, "_a");
        assert_eq!(LetterBucket::for_title("!bang").link, "$<a$");
        assert_eq!(LetterBucket::for_title("").dir, "_a");
        assert_eq!(LetterBucket::for_title("  atom").dir, "a");
    }

    #[test]
    fn test_from_catalog_uses_official_screenshot_when_addon_blank() {
        let addon = AddonEntry {
            repo: "deathau/80s-Neon-for-Obsidian.md".to_string(),
            screenshots_side: vec!["https://i.imgur.com/x.png".to_string()],
            tags: vec!["retro".to_string()],
            ..AddonEntry::default()
        };

        let entry = ThemeEntry::from_catalog(&official(), &addon).unwrap();
        assert_eq!(
            entry.main_screenshot,
            "https://raw.githubusercontent.com/deathau/80s-Neon-for-Obsidian.md/HEAD/screenshot.png"
        );
        assert_eq!(entry.additional_images, vec!["https://i.imgur.com/x.png"]);
        assert_eq!(entry.file_name(), "80s-neon.md");
        assert_eq!(entry.bucket().dir, "_a");
        assert!(entry.has_tag("retro"));
    }

    #[test]
    fn test_from_catalog_prefers_addon_screenshot() {
        let addon = AddonEntry {
            repo: "deathau/80s-Neon-for-Obsidian.md".to_string(),
            screenshot_main: "https://example.com/main.png".to_string(),
            ..AddonEntry::default()
        };
        let entry = ThemeEntry::from_catalog(&official(), &addon).unwrap();
        assert_eq!(entry.main_screenshot, "https://example.com/main.png");
    }

    #[test]
    fn test_from_catalog_rejects_bad_repo() {
        let mut theme = official();
        theme.repo = "broken".to_string();
        assert!(ThemeEntry::from_catalog(&theme, &AddonEntry::default()).is_err());
    }

    #[test]
    fn test_file_name_falls_back_to_repo() {
        let mut theme = official();
        theme.name = "★★★".to_string();
        let entry = ThemeEntry::from_catalog(&theme, &AddonEntry::default()).unwrap();
        assert_eq!(entry.file_name(), "80s-neon-for-obsidian-md.md");
    }

    #[test]
    fn test_author_display_falls_back_to_owner() {
        let mut theme = official();
        theme.author = String::new();
        let entry = ThemeEntry::from_catalog(&theme, &AddonEntry::default()).unwrap();
        assert_eq!(entry.author_display(), "deathau");
    }
}
