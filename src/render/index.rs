//! Alphabetical themes index with the progress counter.

use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use walkdir::WalkDir;

use crate::parser::parse_page_frontmatter;
use crate::services::atomic_write;

static PROGRESS_MAX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<progress\s+value="\d+"\s+max="(\d+)""#).expect("valid progress regex")
});

static ADDED_TOTAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Themes added:\s*\d+\s*/\s*(\d+)").expect("valid counter regex")
});

/// One page listed in the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexEntry {
    pub title: String,
    /// Path relative to the themes directory, `/`-separated
    pub rel_path: String,
}

/// Result of rebuilding the index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexSummary {
    pub path: PathBuf,
    pub pages: usize,
    pub total: usize,
    pub groups: usize,
}

/// Title-cases a file stem: `80s-neon` becomes `80s Neon`.
#[must_use]
pub fn title_from_stem(stem: &str) -> String {
    stem.split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Group heading for a title: its uppercase first letter, or `#`.
#[must_use]
pub fn group_key(title: &str) -> String {
    match title.chars().next() {
        Some(c) if c.is_alphabetic() => c.to_uppercase().collect(),
        _ => "#".to_string(),
    }
}

/// Collects the pages under `base`, skipping the given files.
///
/// Titles come from page frontmatter, else from the file stem.
pub fn collect_pages(base: &Path, exclude: &[&Path]) -> Result<Vec<IndexEntry>> {
    if !base.exists() {
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();
    for item in WalkDir::new(base).follow_links(false) {
        let item = item.with_context(|| format!("Failed to walk {}", base.display()))?;
        let path = item.path();
        if !item.file_type().is_file() || path.extension().is_none_or(|e| e != "md") {
            continue;
        }
        if exclude.iter().any(|x| *x == path) {
            continue;
        }

        let rel = path.strip_prefix(base).unwrap_or(path);
        let rel_path = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        let title = fs::read_to_string(path)
            .ok()
            .and_then(|content| parse_page_frontmatter(&content).ok().flatten())
            .map(|fm| fm.title)
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| {
                title_from_stem(&path.file_stem().unwrap_or_default().to_string_lossy())
            });

        entries.push(IndexEntry { title, rel_path });
    }

    entries.sort_by(|a, b| {
        a.title
            .to_lowercase()
            .cmp(&b.title.to_lowercase())
            .then_with(|| a.rel_path.cmp(&b.rel_path))
    });
    Ok(entries)
}

/// Reads the `max` of the progress counter in an existing index.
#[must_use]
pub fn previous_total(content: &str) -> Option<usize> {
    PROGRESS_MAX
        .captures(content)
        .or_else(|| ADDED_TOTAL.captures(content))
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Generates the index page.
#[must_use]
pub fn generate_index(entries: &[IndexEntry], total: usize) -> String {
    let added = entries.len();
    let mut lines = vec![
        "<p>".to_string(),
        format!("    Themes added: {added} / {total}"),
        format!("    <progress value=\"{added}\" max=\"{total}\"/>"),
        "</p>".to_string(),
        String::new(),
        "# Themes Index".to_string(),
        String::new(),
    ];

    let mut grouped: BTreeMap<String, Vec<&IndexEntry>> = BTreeMap::new();
    for entry in entries {
        grouped.entry(group_key(&entry.title)).or_default().push(entry);
    }

    for (letter, group) in &grouped {
        lines.push(format!("## {letter}"));
        for entry in group {
            lines.push(format!("- [{}](./{})", entry.title, entry.rel_path));
        }
        lines.push(String::new());
    }

    let mut content = lines.join("\n");
    if !content.ends_with('\n') {
        content.push('\n');
    }
    content
}

/// Rebuilds the index file from the pages under `base`.
///
/// `total` is the official catalog size; when unknown the previous index's
/// total is kept, falling back to the page count.
pub fn write_index(
    base: &Path,
    index_file: &Path,
    categories_file: &Path,
    total: Option<usize>,
) -> Result<IndexSummary> {
    let entries = collect_pages(base, &[index_file, categories_file])?;

    let total = total
        .or_else(|| {
            fs::read_to_string(index_file)
                .ok()
                .and_then(|c| previous_total(&c))
        })
        .unwrap_or(entries.len());

    let content = generate_index(&entries, total);
    atomic_write(index_file, &content)?;
    tracing::info!("Alphabetical index written to {}", index_file.display());

    let groups = entries
        .iter()
        .map(|e| group_key(&e.title))
        .collect::<std::collections::BTreeSet<_>>()
        .len();

    Ok(IndexSummary {
        path: index_file.to_path_buf(),
        pages: entries.len(),
        total,
        groups,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_title_from_stem() {
        assert_eq!(title_from_stem("80s-neon"), "80s Neon");
        assert_eq!(title_from_stem("things-AND_stuff"), "Things And Stuff");
    }

    #[test]
    fn test_group_key() {
        assert_eq!(group_key("atom"), "A");
        assert_eq!(group_key("80s Neon"), "#");
        assert_eq!(group_key(""), "#");
    }

    #[test]
    fn test_previous_total() {
        let content = "<p>\n    Themes added: 3 / 344\n    <progress value=\"3\" max=\"344\"/>\n</p>";
        assert_eq!(previous_total(content), Some(344));
        assert_eq!(previous_total("Themes added: 1 / 20"), Some(20));
        assert_eq!(previous_total("# Themes Index"), None);
    }

    #[test]
    fn test_generate_index() {
        let entries = vec![
            IndexEntry {
                title: "80s Neon".to_string(),
                rel_path: "_a/80s-neon.md".to_string(),
            },
            IndexEntry {
                title: "Atom".to_string(),
                rel_path: "a/atom.md".to_string(),
            },
        ];
        let content = generate_index(&entries, 10);
        assert_eq!(
            content,
            "<p>\n    Themes added: 2 / 10\n    <progress value=\"2\" max=\"10\"/>\n</p>\n\n\
             # Themes Index\n\n## #\n- [80s Neon](./_a/80s-neon.md)\n\n## A\n- [Atom](./a/atom.md)\n"
        );
    }

    #[test]
    fn test_write_index_walks_pages() {
        let temp = TempDir::new().unwrap();
        let base = temp.path().join("themes");
        fs::create_dir_all(base.join("a")).unwrap();
        fs::create_dir_all(base.join("m")).unwrap();
        fs::write(base.join("a").join("atom.md"), "---\ntitle: Atom One\n---\n").unwrap();
        fs::write(base.join("m").join("minimal-things.md"), "no frontmatter").unwrap();
        fs::write(base.join("m").join("notes.txt"), "ignored").unwrap();
        let index = base.join("index.md");
        let categories = base.join("categories.md");
        fs::write(&index, "Themes added: 0 / 99\n").unwrap();
        fs::write(&categories, "## Underrated Gems\n").unwrap();

        let summary = write_index(&base, &index, &categories, None).unwrap();
        assert_eq!(summary.pages, 2);
        assert_eq!(summary.total, 99);
        assert_eq!(summary.groups, 2);

        let content = fs::read_to_string(&index).unwrap();
        assert!(content.contains("- [Atom One](./a/atom.md)"));
        assert!(content.contains("- [Minimal Things](./m/minimal-things.md)"));
        assert!(!content.contains("categories.md"));

        let summary = write_index(&base, &index, &categories, Some(5)).unwrap();
        assert_eq!(summary.total, 5);
    }
}
