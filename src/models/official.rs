//! Entries of the upstream community themes list.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One theme in the official catalog.
///
/// Loading is lenient: absent or `null` fields default to empty values,
/// scalars are read as text and a single mode string becomes a one-item
/// list, so that a partially broken upstream file can still be inspected.
/// Strict checks live in the validator.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OfficialTheme {
    /// Display name (e.g., "Atom")
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    /// Author as listed upstream
    #[serde(default, deserialize_with = "lenient_string")]
    pub author: String,
    /// `owner/name` of the theme repository
    #[serde(default, deserialize_with = "lenient_string")]
    pub repo: String,
    /// Screenshot file name inside the repository, or a URL
    #[serde(default, deserialize_with = "lenient_string")]
    pub screenshot: String,
    /// Supported colour modes ("dark", "light")
    #[serde(default, deserialize_with = "lenient_modes")]
    pub modes: Vec<String>,
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn lenient_modes<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(mode) => vec![mode],
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(mode) => Some(mode),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

impl OfficialTheme {
    /// Returns true if the theme declares the given mode.
    #[must_use]
    pub fn has_mode(&self, mode: &str) -> bool {
        self.modes.iter().any(|m| m == mode)
    }

    /// Name for display, falling back to the repository.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.repo
        } else {
            &self.name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_upstream_entry() {
        let json = r#"{
            "name": "Atom",
            "author": "kognise",
            "repo": "kognise/obsidian-atom",
            "screenshot": "screenshot-hybrid.png",
            "modes": ["dark", "light"],
            "legacy": true
        }"#;
        let theme: OfficialTheme = serde_json::from_str(json).unwrap();
        assert_eq!(theme.name, "Atom");
        assert!(theme.has_mode("dark"));
        assert!(theme.has_mode("light"));
        assert!(!theme.has_mode("sepia"));
    }

    #[test]
    fn test_missing_fields_default() {
        let theme: OfficialTheme = serde_json::from_str(r#"{"repo": "a/b"}"#).unwrap();
        assert!(theme.name.is_empty());
        assert!(theme.modes.is_empty());
        assert_eq!(theme.display_name(), "a/b");
    }

    #[test]
    fn test_malformed_fields_are_tolerated() {
        let theme: OfficialTheme =
            serde_json::from_str(r#"{"name": null, "author": 7, "repo": "a/b", "modes": "dark"}"#)
                .unwrap();
        assert!(theme.name.is_empty());
        assert_eq!(theme.author, "7");
        assert_eq!(theme.modes, vec!["dark"]);

        let theme: OfficialTheme =
            serde_json::from_str(r#"{"repo": "a/b", "modes": ["light", null, 3]}"#).unwrap();
        assert_eq!(theme.modes, vec!["light"]);
    }
}
