//! Schema validation of the catalog JSON files.
//!
//! Validation works on raw JSON values so that type errors can be reported
//! per field instead of failing deserialization of the whole file.

// Allow format! appended to String - more readable for building messages
#![allow(clippy::format_push_string)]

use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

use crate::models::{is_absolute_url, RepoSlug};

/// Image extensions accepted for screenshot file names.
const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".gif"];

/// Colour modes allowed in the official catalog.
const VALID_MODES: &[&str] = &["dark", "light"];

/// Which catalog a file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    Official,
    Addon,
}

impl CatalogKind {
    fn required_fields(self) -> &'static [(&'static str, FieldType)] {
        match self {
            Self::Official => &[
                ("name", FieldType::String),
                ("author", FieldType::String),
                ("repo", FieldType::String),
                ("screenshot", FieldType::String),
                ("modes", FieldType::List),
            ],
            Self::Addon => &[
                ("repo", FieldType::String),
                ("screenshot-main", FieldType::String),
                ("screenshots-side", FieldType::List),
                ("tags", FieldType::List),
            ],
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Official => write!(f, "official"),
            Self::Addon => write!(f, "addon"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldType {
    String,
    List,
}

impl FieldType {
    fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::List => value.is_array(),
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::List => "list",
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

/// Validation result for one catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntryValidation {
    pub index: usize,
    /// Repository of the entry, or `entry_<index>` when absent
    pub repo: String,
    pub missing_fields: Vec<String>,
    pub type_errors: Vec<String>,
    pub constraint_violations: Vec<String>,
    /// Screenshot values that do not look like images or URLs
    pub url_warnings: Vec<String>,
}

impl EntryValidation {
    /// Returns true if the entry has no errors (URL warnings are allowed).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.missing_fields.is_empty()
            && self.type_errors.is_empty()
            && self.constraint_violations.is_empty()
    }

    /// All errors in report order.
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.missing_fields
            .iter()
            .map(|f| format!("Missing required field '{f}'"))
            .chain(self.type_errors.iter().cloned())
            .chain(self.constraint_violations.iter().cloned())
            .collect()
    }
}

/// Validation result for a whole catalog file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogValidation {
    pub kind: CatalogKind,
    pub total_entries: usize,
    pub valid_entries: usize,
    pub invalid_entries: usize,
    pub entries: Vec<EntryValidation>,
    /// Repositories listed more than once
    pub duplicates: Vec<String>,
    /// Screenshot URLs that could not be reached
    pub link_warnings: Vec<String>,
}

impl CatalogValidation {
    /// Returns true if every entry is valid and no repository repeats.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.invalid_entries == 0 && self.duplicates.is_empty()
    }

    /// Number of warnings of any kind.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.entries.iter().map(|e| e.url_warnings.len()).sum::<usize>() + self.link_warnings.len()
    }

    /// One-line verdict, e.g. `VALID: 12/12 entries passed validation`.
    #[must_use]
    pub fn summary(&self) -> String {
        let status = if self.is_valid() { "VALID" } else { "INVALID" };
        format!(
            "{status}: {}/{} entries passed validation",
            self.valid_entries, self.total_entries
        )
    }

    /// Formats the report as a user-friendly message.
    #[must_use]
    pub fn format_message(&self) -> String {
        let mut message = String::new();
        message.push_str(&format!("{} catalog: {}\n", self.kind, self.summary()));

        for entry in self.entries.iter().filter(|e| !e.is_valid()) {
            message.push_str(&format!("  {} (#{}):\n", entry.repo, entry.index + 1));
            for error in entry.errors() {
                message.push_str(&format!("    ✗ {error}\n"));
            }
        }

        for repo in &self.duplicates {
            message.push_str(&format!("  ✗ Duplicate repository '{repo}'\n"));
        }

        for entry in &self.entries {
            for warning in &entry.url_warnings {
                message.push_str(&format!("  ⚠ {}: {warning}\n", entry.repo));
            }
        }

        for warning in &self.link_warnings {
            message.push_str(&format!("  ⚠ {warning}\n"));
        }

        message
    }
}

/// Returns true for screenshot values that are URLs or image file names.
#[must_use]
pub fn is_acceptable_screenshot(value: &str) -> bool {
    let lower = value.to_lowercase();
    is_absolute_url(value) || IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Validates one raw catalog entry.
#[must_use]
pub fn validate_entry(entry: &Value, kind: CatalogKind, index: usize) -> EntryValidation {
    let mut result = EntryValidation {
        index,
        repo: entry
            .get("repo")
            .and_then(Value::as_str)
            .map_or_else(|| format!("entry_{index}"), str::to_string),
        ..EntryValidation::default()
    };

    let Some(object) = entry.as_object() else {
        result.type_errors.push(format!(
            "Entry should be object, got {}",
            json_type_name(entry)
        ));
        return result;
    };

    for (field, field_type) in kind.required_fields() {
        match object.get(*field) {
            None | Some(Value::Null) => result.missing_fields.push((*field).to_string()),
            Some(value) if !field_type.matches(value) => result.type_errors.push(format!(
                "Field '{field}' should be {}, got {}",
                field_type.name(),
                json_type_name(value)
            )),
            Some(value) => check_constraints(field, value, kind, &mut result),
        }
    }

    result
}

fn check_constraints(field: &str, value: &Value, kind: CatalogKind, result: &mut EntryValidation) {
    match (kind, field) {
        (_, "repo") => {
            let repo = value.as_str().unwrap_or_default();
            if !RepoSlug::is_valid(repo) {
                result
                    .constraint_violations
                    .push(format!("Field 'repo' must be 'owner/name', got '{repo}'"));
            }
        }
        (CatalogKind::Official, "name" | "author" | "screenshot") => {
            let text = value.as_str().unwrap_or_default();
            if text.trim().is_empty() {
                result
                    .constraint_violations
                    .push(format!("Field '{field}' must not be blank"));
            } else if field == "screenshot" && !is_acceptable_screenshot(text) {
                result
                    .url_warnings
                    .push(format!("'{field}' is neither a URL nor an image: '{text}'"));
            }
        }
        (CatalogKind::Official, "modes") => {
            let modes = value.as_array().map(Vec::as_slice).unwrap_or_default();
            if modes.is_empty() {
                result
                    .constraint_violations
                    .push("Field 'modes' must not be empty".to_string());
            }
            for mode in modes {
                if !mode.as_str().is_some_and(|m| VALID_MODES.contains(&m)) {
                    result
                        .constraint_violations
                        .push(format!("Field 'modes' contains invalid mode {mode}"));
                }
            }
        }
        (CatalogKind::Addon, "screenshot-main") => {
            let text = value.as_str().unwrap_or_default();
            if !text.is_empty() && !is_acceptable_screenshot(text) {
                result
                    .url_warnings
                    .push(format!("'{field}' is neither a URL nor an image: '{text}'"));
            }
        }
        (CatalogKind::Addon, "screenshots-side") => {
            for (idx, url) in value.as_array().into_iter().flatten().enumerate() {
                match url.as_str() {
                    None => result.constraint_violations.push(format!(
                        "Field 'screenshots-side[{idx}]' should be string, got {}",
                        json_type_name(url)
                    )),
                    Some(text) if !is_absolute_url(text) => result
                        .url_warnings
                        .push(format!("'screenshots-side[{idx}]' is not a URL: '{text}'")),
                    Some(_) => {}
                }
            }
        }
        (CatalogKind::Addon, "tags") => {
            for tag in value.as_array().into_iter().flatten() {
                if !tag.as_str().is_some_and(|t| !t.trim().is_empty()) {
                    result
                        .constraint_violations
                        .push(format!("Field 'tags' contains invalid tag {tag}"));
                }
            }
        }
        _ => {}
    }
}

/// Validates every entry of a catalog and checks for duplicate repositories.
#[must_use]
pub fn validate_catalog(entries: &[Value], kind: CatalogKind) -> CatalogValidation {
    let results: Vec<EntryValidation> = entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| validate_entry(entry, kind, idx))
        .collect();

    let valid_entries = results.iter().filter(|r| r.is_valid()).count();

    let mut seen: HashMap<&str, usize> = HashMap::new();
    let mut duplicates = Vec::new();
    for repo in entries.iter().filter_map(|e| e.get("repo").and_then(Value::as_str)) {
        let count = seen.entry(repo).or_default();
        *count += 1;
        if *count == 2 {
            duplicates.push(repo.to_string());
        }
    }

    CatalogValidation {
        kind,
        total_entries: results.len(),
        valid_entries,
        invalid_entries: results.len() - valid_entries,
        entries: results,
        duplicates,
        link_warnings: Vec::new(),
    }
}

/// Absolute screenshot URLs of a catalog, for reachability checks.
///
/// Official screenshot file names resolve against the repository's raw
/// content.
#[must_use]
pub fn screenshot_urls(entries: &[Value], kind: CatalogKind) -> Vec<String> {
    let mut urls = Vec::new();

    for entry in entries {
        let repo = entry
            .get("repo")
            .and_then(Value::as_str)
            .and_then(|r| RepoSlug::parse(r).ok());

        match kind {
            CatalogKind::Official => {
                if let (Some(repo), Some(shot)) =
                    (repo, entry.get("screenshot").and_then(Value::as_str))
                {
                    if !shot.trim().is_empty() {
                        urls.push(crate::models::resolve_screenshot(&repo, shot.trim()));
                    }
                }
            }
            CatalogKind::Addon => {
                if let Some(main) = entry.get("screenshot-main").and_then(Value::as_str) {
                    if is_absolute_url(main) {
                        urls.push(main.to_string());
                    }
                }
                urls.extend(
                    entry
                        .get("screenshots-side")
                        .and_then(Value::as_array)
                        .into_iter()
                        .flatten()
                        .filter_map(Value::as_str)
                        .filter(|u| is_absolute_url(u))
                        .map(str::to_string),
                );
            }
        }
    }

    urls.sort();
    urls.dedup();
    urls
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_official_entry() {
        let entry = json!({
            "name": "Atom",
            "author": "kognise",
            "repo": "kognise/obsidian-atom",
            "screenshot": "screenshot-hybrid.png",
            "modes": ["dark", "light"]
        });
        let result = validate_entry(&entry, CatalogKind::Official, 0);
        assert!(result.is_valid(), "{:?}", result.errors());
        assert!(result.url_warnings.is_empty());
    }

    #[test]
    fn test_official_constraints() {
        let entry = json!({
            "name": "  ",
            "author": "x",
            "repo": "not-a-slug",
            "screenshot": "preview",
            "modes": ["dark", "sepia"]
        });
        let result = validate_entry(&entry, CatalogKind::Official, 3);
        assert!(!result.is_valid());
        assert_eq!(result.constraint_violations.len(), 3);
        assert_eq!(result.url_warnings.len(), 1);

        let empty_modes = json!({"name": "a", "author": "b", "repo": "o/r", "screenshot": "s.png", "modes": []});
        assert!(!validate_entry(&empty_modes, CatalogKind::Official, 0).is_valid());
    }

    #[test]
    fn test_missing_and_type_errors() {
        let entry = json!({"repo": 42, "tags": "dark"});
        let result = validate_entry(&entry, CatalogKind::Addon, 7);
        assert_eq!(result.repo, "entry_7");
        assert_eq!(result.missing_fields, vec!["screenshot-main", "screenshots-side"]);
        assert_eq!(result.type_errors.len(), 2);
        assert!(result.errors()[0].contains("screenshot-main"));

        let not_object = validate_entry(&json!("text"), CatalogKind::Addon, 0);
        assert!(!not_object.is_valid());
    }

    #[test]
    fn test_addon_side_screenshots_and_tags() {
        let entry = json!({
            "repo": "o/r",
            "screenshot-main": "",
            "screenshots-side": ["https://i.imgur.com/a.png", "local.png", 5],
            "tags": ["dark", " "]
        });
        let result = validate_entry(&entry, CatalogKind::Addon, 0);
        assert_eq!(result.constraint_violations.len(), 2);
        assert_eq!(result.url_warnings.len(), 1);
    }

    #[test]
    fn test_validate_catalog_duplicates_and_summary() {
        let entries = vec![
            json!({"repo": "o/a", "screenshot-main": "", "screenshots-side": [], "tags": []}),
            json!({"repo": "o/a", "screenshot-main": "", "screenshots-side": [], "tags": []}),
            json!({"repo": "o/b"}),
        ];
        let report = validate_catalog(&entries, CatalogKind::Addon);
        assert_eq!(report.valid_entries, 2);
        assert_eq!(report.invalid_entries, 1);
        assert_eq!(report.duplicates, vec!["o/a"]);
        assert!(!report.is_valid());
        assert_eq!(report.summary(), "INVALID: 2/3 entries passed validation");
        assert!(report.format_message().contains("Duplicate repository 'o/a'"));
    }

    #[test]
    fn test_valid_catalog_summary() {
        let report = validate_catalog(&[], CatalogKind::Official);
        assert!(report.is_valid());
        assert_eq!(report.summary(), "VALID: 0/0 entries passed validation");
    }

    #[test]
    fn test_screenshot_urls() {
        let official = vec![json!({"repo": "o/a", "screenshot": "shot.png"})];
        assert_eq!(
            screenshot_urls(&official, CatalogKind::Official),
            vec!["https://raw.githubusercontent.com/o/a/HEAD/shot.png"]
        );

        let addon = vec![json!({
            "repo": "o/a",
            "screenshot-main": "local.png",
            "screenshots-side": ["https://x/1.png", "https://x/1.png"]
        })];
        assert_eq!(screenshot_urls(&addon, CatalogKind::Addon), vec!["https://x/1.png"]);
    }
}
