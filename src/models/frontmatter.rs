//! Page frontmatter consumed by the static-site generator.

use serde::{Deserialize, Serialize};

/// YAML metadata at the top of every published page.
///
/// Only `title` is mandatory for the site generator. Unknown keys are
/// ignored on read.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageFrontmatter {
    /// Page title shown in navigation
    #[serde(default)]
    pub title: String,
    /// Material icon name (e.g., "material/palette")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Stylesheets loaded on this page only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_css: Vec<String>,
    /// Genre, feature and philosophy keywords
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}
