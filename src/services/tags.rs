//! Tag macros, default tags and tag maintenance.

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use crate::models::AddonEntry;

/// Marker a contributor types to keep `minimalistic` out of the tags.
pub const NOT_MINIMALISTIC: &str = "notm";

/// Tag added unless [`NOT_MINIMALISTIC`] was typed.
pub const MINIMALISTIC: &str = "minimalistic";

/// Built-in shortcuts for common tags.
const DEFAULT_MACROS: &[(&str, &str)] = &[
    ("m", "minimalistic"),
    ("d", "dark"),
    ("l", "light"),
    ("p", "productivity"),
    ("g", "gaming"),
    ("c", "colorful"),
    ("s", "simple"),
    ("md", "modern"),
    ("ret", "retro"),
];

/// Shortcut expansion for tag input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagMacros {
    macros: BTreeMap<String, String>,
}

impl Default for TagMacros {
    fn default() -> Self {
        Self {
            macros: DEFAULT_MACROS
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        }
    }
}

impl TagMacros {
    /// Loads macros from a JSON object file.
    ///
    /// A missing file yields the built-in macros; a present file replaces
    /// them entirely.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not an object of
    /// strings.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No {} found, using default tag macros", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read tag macros: {}", path.display()))?;
        let macros: BTreeMap<String, String> = serde_json::from_str(&content).with_context(|| {
            format!(
                "Tag macros must be a JSON object of strings: {}",
                path.display()
            )
        })?;

        tracing::debug!("Loaded {} tag macros", macros.len());
        Ok(Self { macros })
    }

    /// Iterates shortcuts and their expansions in shortcut order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.macros.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.macros.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }

    /// Splits comma-separated input, drops blanks and expands shortcuts.
    #[must_use]
    pub fn expand(&self, input: &str) -> Vec<String> {
        input
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                self.macros
                    .get(part)
                    .cloned()
                    .unwrap_or_else(|| part.to_string())
            })
            .collect()
    }
}

/// Tags implied by a theme's colour modes.
#[must_use]
pub fn defaults_for_modes(modes: &[String]) -> Vec<String> {
    let dark = modes.iter().any(|m| m == "dark");
    let light = modes.iter().any(|m| m == "light");

    let mut tags = Vec::new();
    if dark {
        tags.push("dark".to_string());
    }
    if light {
        tags.push("light".to_string());
    }
    if dark && light {
        tags.push("dark_and_light".to_string());
    }
    tags
}

/// Combines user tags with defaults into the final sorted tag list.
///
/// `minimalistic` joins the defaults unless the user typed `notm`, which is
/// itself dropped.
#[must_use]
pub fn finalize(user: &[String], defaults: &[String]) -> Vec<String> {
    let opt_out = user.iter().any(|t| t == NOT_MINIMALISTIC);

    let mut tags: BTreeSet<String> = user
        .iter()
        .filter(|t| *t != NOT_MINIMALISTIC)
        .cloned()
        .collect();
    tags.extend(defaults.iter().cloned());
    if !opt_out {
        tags.insert(MINIMALISTIC.to_string());
    }

    tags.into_iter().collect()
}

/// Sorts each entry's tags case-insensitively.
///
/// Returns the number of entries whose tag order changed.
pub fn alphabetize(entries: &mut [AddonEntry]) -> usize {
    let mut changed = 0;
    for entry in entries {
        let before = entry.tags.clone();
        entry.tags.sort_by_key(|t| t.to_lowercase());
        if entry.tags != before {
            changed += 1;
        }
    }
    changed
}

/// Usage count of one tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// Tag usage across the addon catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TagStatistics {
    pub unique_tags: usize,
    pub total_usages: usize,
    /// Most used first, ties alphabetical
    pub counts: Vec<TagCount>,
}

/// Counts tag usage.
#[must_use]
pub fn statistics(entries: &[AddonEntry]) -> TagStatistics {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for tag in entries.iter().flat_map(|e| e.tags.iter()) {
        *counts.entry(tag.as_str()).or_default() += 1;
    }

    let mut counts: Vec<TagCount> = counts
        .into_iter()
        .map(|(tag, count)| TagCount {
            tag: tag.to_string(),
            count,
        })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));

    TagStatistics {
        unique_tags: counts.len(),
        total_usages: counts.iter().map(|c| c.count).sum(),
        counts,
    }
}
