//! Shared test fixtures for E2E CLI tests.
#![allow(dead_code)] // Not every test file uses every fixture

use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use stylistguild::config::Config;
use tempfile::TempDir;

/// Path to the stylistguild binary
pub fn stylistguild_bin() -> &'static str {
    env!("CARGO_BIN_EXE_stylistguild")
}

/// Three official themes: one per bucket kind (letter, letter, digit).
pub fn official_catalog() -> Value {
    json!([
        {
            "name": "Velvet Night",
            "author": "alice",
            "repo": "alice/velvet-night",
            "screenshot": "screenshot.png",
            "modes": ["dark"]
        },
        {
            "name": "Aurora",
            "author": "bob",
            "repo": "bob/aurora",
            "screenshot": "shot.png",
            "modes": ["dark", "light"]
        },
        {
            "name": "80s Neon",
            "author": "carol",
            "repo": "carol/80s-neon",
            "screenshot": "neon.jpg",
            "modes": ["dark"]
        }
    ])
}

/// Addon entries for the first two official themes, tags unsorted.
pub fn addon_catalog() -> Value {
    json!([
        {
            "repo": "alice/velvet-night",
            "screenshot-main": "https://example.com/velvet.png",
            "screenshots-side": [],
            "tags": ["minimalistic", "dark", "underrated_gems"]
        },
        {
            "repo": "bob/aurora",
            "screenshot-main": "",
            "screenshots-side": [],
            "tags": ["light", "dark"]
        }
    ])
}

/// A catalog working tree in a temp directory with a config pointing at it.
pub struct TestCatalog {
    pub temp: TempDir,
    pub config: Config,
    pub config_path: PathBuf,
}

impl TestCatalog {
    /// Creates the tree with the given catalogs; `None` leaves a file absent.
    pub fn new(official: Option<&Value>, addon: Option<&Value>) -> Self {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let root = temp.path();

        let mut config = Config::default();
        config.paths.official = root.join("community-css-themes.json");
        config.paths.addon = root.join("community-css-themes-tag-browser.json");
        config.paths.macros = root.join("tag_macros.json");
        config.paths.docs = root.join("docs");
        config.paths.themes_dir = root.join("docs/themes");
        config.paths.index_file = root.join("docs/themes/index.md");
        config.paths.categories_file = root.join("docs/themes/categories.md");
        config.paths.backup_dir = root.join("backups");

        let config_path = root.join("stylistguild.toml");
        config
            .save_to(&config_path)
            .expect("Failed to write config");

        if let Some(official) = official {
            write_json(&config.paths.official, official);
        }
        if let Some(addon) = addon {
            write_json(&config.paths.addon, addon);
        }

        Self {
            temp,
            config,
            config_path,
        }
    }

    /// The default tree: three official themes, two addon entries.
    pub fn standard() -> Self {
        Self::new(Some(&official_catalog()), Some(&addon_catalog()))
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    /// Runs the binary against this tree's config.
    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(stylistguild_bin())
            .arg("--config")
            .arg(&self.config_path)
            .args(args)
            .current_dir(self.root())
            .env_remove("GITHUB_TOKEN")
            .output()
            .expect("Failed to execute command")
    }

    /// Reads a JSON file relative to the tree root or absolute.
    pub fn read_json(&self, path: &Path) -> Value {
        let content = fs::read_to_string(self.root().join(path)).expect("Failed to read JSON");
        serde_json::from_str(&content).expect("Invalid JSON")
    }
}

pub fn write_json(path: &Path, value: &Value) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create directory");
    }
    let content = serde_json::to_string_pretty(value).expect("Failed to serialize JSON");
    fs::write(path, content).expect("Failed to write JSON");
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Parses stdout as JSON, failing with stderr in the message.
pub fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "Should parse JSON output: {e}\nstdout: {}\nstderr: {}",
            stdout(output),
            stderr(output)
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_catalog_layout() {
        let catalog = TestCatalog::standard();
        assert!(catalog.config.paths.official.exists());
        assert!(catalog.config.paths.addon.exists());
        assert!(catalog.config_path.exists());

        let loaded = Config::load_from(&catalog.config_path).unwrap();
        assert_eq!(loaded.paths.addon, catalog.config.paths.addon);
    }
}
