//! Comparison of the official and addon catalogs.

// Allow format! appended to String - more readable for building reports
#![allow(clippy::format_push_string)]

use serde::Serialize;
use std::collections::HashSet;

use crate::models::{AddonEntry, OfficialTheme};

/// Sync percentage below which a review is suggested.
const LOW_SYNC_PERCENTAGE: f64 = 80.0;

/// Orphan count above which a cleanup is suggested.
const MANY_ORPHANS: usize = 5;

/// Repositories listed in the official catalog, in catalog order.
#[must_use]
pub fn official_repos(official: &[OfficialTheme]) -> HashSet<&str> {
    official.iter().map(|t| t.repo.as_str()).collect()
}

/// Repositories listed in the addon catalog.
#[must_use]
pub fn addon_repos(addon: &[AddonEntry]) -> HashSet<&str> {
    addon.iter().map(|a| a.repo.as_str()).collect()
}

/// Official themes without an addon entry, in official order.
#[must_use]
pub fn missing<'a>(official: &'a [OfficialTheme], addon: &[AddonEntry]) -> Vec<&'a OfficialTheme> {
    let known = addon_repos(addon);
    official
        .iter()
        .filter(|t| !known.contains(t.repo.as_str()))
        .collect()
}

/// Addon entries whose repository is absent upstream, in addon order.
#[must_use]
pub fn orphaned<'a>(official: &[OfficialTheme], addon: &'a [AddonEntry]) -> Vec<&'a AddonEntry> {
    let known = official_repos(official);
    addon
        .iter()
        .filter(|a| !known.contains(a.repo.as_str()))
        .collect()
}

/// Summary of how far the addon catalog covers the official one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncReport {
    pub official_count: usize,
    pub addon_count: usize,
    pub missing_count: usize,
    pub orphaned_count: usize,
    pub missing: Vec<String>,
    pub orphaned: Vec<String>,
    /// Share of official repositories with an addon entry, 0-100
    pub sync_percentage: f64,
}

/// Compares both catalogs.
#[must_use]
pub fn compare(official: &[OfficialTheme], addon: &[AddonEntry]) -> SyncReport {
    let official_set = official_repos(official);
    let addon_set = addon_repos(addon);

    let missing: Vec<String> = missing(official, addon)
        .into_iter()
        .map(|t| t.repo.clone())
        .collect();
    let orphaned: Vec<String> = orphaned(official, addon)
        .into_iter()
        .map(|a| a.repo.clone())
        .collect();

    #[allow(clippy::cast_precision_loss)]
    let sync_percentage = if official_set.is_empty() {
        0.0
    } else {
        official_set.intersection(&addon_set).count() as f64 / official_set.len() as f64 * 100.0
    };

    SyncReport {
        official_count: official.len(),
        addon_count: addon.len(),
        missing_count: missing.len(),
        orphaned_count: orphaned.len(),
        missing,
        orphaned,
        sync_percentage,
    }
}

/// Proposed addition of a missing theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddSuggestion {
    pub repo: String,
    pub name: String,
    pub author: String,
}

/// Cleanup actions derived from a comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Suggestions {
    pub add_to_addon: Vec<AddSuggestion>,
    pub remove_from_addon: Vec<String>,
    pub review_required: Vec<String>,
}

/// Suggests actions that bring the catalogs back in sync.
#[must_use]
pub fn suggest(official: &[OfficialTheme], addon: &[AddonEntry]) -> Suggestions {
    let report = compare(official, addon);

    let mut review_required = Vec::new();
    if report.sync_percentage < LOW_SYNC_PERCENTAGE {
        review_required.push("Low sync percentage - consider batch update".to_string());
    }
    if report.orphaned_count > MANY_ORPHANS {
        review_required.push("Many orphaned entries - cleanup recommended".to_string());
    }

    Suggestions {
        add_to_addon: missing(official, addon)
            .into_iter()
            .map(|t| AddSuggestion {
                repo: t.repo.clone(),
                name: t.name.clone(),
                author: t.author.clone(),
            })
            .collect(),
        remove_from_addon: report.orphaned,
        review_required,
    }
}

/// Blank addon entry for an official theme, seeded with its screenshot.
#[must_use]
pub fn addon_template(official: &OfficialTheme) -> AddonEntry {
    AddonEntry {
        screenshot_main: official.screenshot.clone(),
        ..AddonEntry::new(official.repo.clone())
    }
}

/// Finds an official theme by repository.
#[must_use]
pub fn find_official<'a>(official: &'a [OfficialTheme], repo: &str) -> Option<&'a OfficialTheme> {
    official.iter().find(|t| t.repo == repo)
}

/// Plain-text report of themes that still need an addon entry.
#[must_use]
pub fn missing_report(missing: &[&OfficialTheme]) -> String {
    let mut out = String::from("MISSING ADDON ENTRIES REPORT\n");
    out.push_str(&"=".repeat(50));
    out.push_str("\n\n");
    out.push_str(&format!("Entries that need addon data: {}\n\n", missing.len()));

    let or_unknown = |s: &str| {
        if s.trim().is_empty() {
            "Unknown".to_string()
        } else {
            s.to_string()
        }
    };

    for (idx, theme) in missing.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", idx + 1, or_unknown(&theme.name)));
        out.push_str(&format!("   Author: {}\n", or_unknown(&theme.author)));
        out.push_str(&format!("   Repo: {}\n", or_unknown(&theme.repo)));
        let screenshot = if theme.screenshot.is_empty() { "None" } else { &theme.screenshot };
        out.push_str(&format!("   Screenshot: {screenshot}\n"));
        out.push_str(&format!("   Modes: {}\n\n", theme.modes.join(", ")));
    }

    out
}
