//! Curated categories page updates.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::config::CategoryConfig;
use crate::models::ThemeEntry;
use crate::parser::{generate_categories, parse_categories, CategoryRow};
use crate::services::atomic_write;

/// Headings of the configured categories the theme is tagged with.
#[must_use]
pub fn curated_headings<'a>(entry: &ThemeEntry, categories: &'a [CategoryConfig]) -> Vec<&'a str> {
    categories
        .iter()
        .filter(|c| entry.has_tag(&c.tag))
        .map(|c| c.heading.as_str())
        .collect()
}

/// Adds a theme to every category section whose tag it carries.
///
/// Rows with the same title are replaced. Returns the headings the theme was
/// placed under; the file is not touched when that list is empty.
pub fn update_categories(
    path: &Path,
    entry: &ThemeEntry,
    categories: &[CategoryConfig],
) -> Result<Vec<String>> {
    let targets = curated_headings(entry, categories);
    if targets.is_empty() {
        return Ok(Vec::new());
    }

    let existing = if path.exists() {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read categories file: {}", path.display()))?
    } else {
        String::new()
    };

    let headings: Vec<&str> = categories.iter().map(|c| c.heading.as_str()).collect();
    let mut sections = parse_categories(&existing, &headings);

    let row = CategoryRow::for_theme(&entry.title, &entry.bucket(), &entry.file_name());
    for heading in &targets {
        let rows = sections.entry((*heading).to_string()).or_default();
        rows.retain(|r| r.title != row.title);
        rows.push(row.clone());
    }

    let ordered: Vec<(&str, Vec<CategoryRow>)> = headings
        .iter()
        .map(|h| (*h, sections.remove(*h).unwrap_or_default()))
        .collect();

    atomic_write(path, &generate_categories(&ordered))?;
    tracing::debug!("Added {} to categories {:?}", entry.title, targets);

    Ok(targets.into_iter().map(str::to_string).collect())
}
