//! Catalog enrichment entries (tags, screenshots, descriptive attributes).

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entry of the addon catalog, keyed by repository.
///
/// Keys this type does not know about are kept in `extra` and written back
/// unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AddonEntry {
    /// `owner/name` of the theme repository
    #[serde(default)]
    pub repo: String,
    /// Main screenshot override; empty means "use the official screenshot"
    #[serde(rename = "screenshot-main", default)]
    pub screenshot_main: String,
    /// Additional screenshot URLs
    #[serde(rename = "screenshots-side", default)]
    pub screenshots_side: Vec<String>,
    /// Genre, feature and philosophy keywords
    #[serde(default)]
    pub tags: Vec<String>,
    /// Short description shown under the screenshots
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    /// Number of colour palettes shipped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palettes: Option<u32>,
    /// Whether the theme exposes Style Settings options
    #[serde(
        rename = "style-settings",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub style_settings: Option<bool>,
    /// Free-form accessibility notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessibility: Option<String>,
    /// Release date when the repository date is unavailable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub released: Option<NaiveDate>,
    /// Contributor who authored the entry
    #[serde(rename = "_author", default, skip_serializing_if = "Option::is_none")]
    pub contributor: Option<String>,
    /// When the contributor created the entry
    #[serde(rename = "_created_at", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// When the entry was merged from a contributor file
    #[serde(rename = "_merged_at", default, skip_serializing_if = "Option::is_none")]
    pub merged_at: Option<String>,
    /// Unknown keys, preserved on save
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AddonEntry {
    /// Creates a blank entry for a repository.
    #[must_use]
    pub fn new(repo: impl Into<String>) -> Self {
        Self {
            repo: repo.into(),
            ..Self::default()
        }
    }

    /// Stamps contributor attribution with a creation time.
    pub fn stamp_created(&mut self, author: &str, now: DateTime<Local>) {
        self.contributor = Some(author.to_string());
        self.created_at = Some(now.to_rfc3339());
    }

    /// Stamps contributor attribution with a merge time.
    pub fn stamp_merged(&mut self, author: &str, now: DateTime<Local>) {
        self.contributor = Some(author.to_string());
        self.merged_at = Some(now.to_rfc3339());
    }
}
