//! Parsing and generation of the curated categories page.
//!
//! The page is a sequence of sections, one per curated category:
//!
//! ```markdown
//! ## Underrated Gems
//!
//! |Letter|Theme|
//! |---|---|
//! |$<a$|[80s Neon](./_a/80s-neon.md)|
//! |$a$|[Atom](./a/atom.md)|
//! ```

use crate::models::LetterBucket;
use regex::Regex;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::LazyLock;

const TABLE_HEADER: &str = "|Letter|Theme|";
const TABLE_SEPARATOR: &str = "|---|---|";

static LINK_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]").expect("valid link title regex"));

/// One table row on the categories page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRow {
    /// Letter cell (`$a$`, `$<a$`)
    pub letter: String,
    /// Theme title, taken from the link text
    pub title: String,
    /// The row as written on the page
    pub markdown: String,
}

impl CategoryRow {
    /// Builds the row linking a theme page.
    #[must_use]
    pub fn for_theme(title: &str, bucket: &LetterBucket, file_name: &str) -> Self {
        Self {
            letter: bucket.link.clone(),
            title: title.to_string(),
            markdown: format!("|{}|[{title}](./{}/{file_name})|", bucket.link, bucket.dir),
        }
    }

    /// Parses a table row; returns `None` for rows with fewer than two cells.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        let cells: Vec<&str> = trimmed
            .trim_start_matches('|')
            .trim_end_matches('|')
            .split('|')
            .map(str::trim)
            .collect();

        if cells.len() < 2 {
            return None;
        }

        let title = LINK_TITLE
            .captures(cells[1])
            .and_then(|c| c.get(1))
            .map_or(cells[1], |m| m.as_str());

        Some(Self {
            letter: cells[0].to_string(),
            title: title.to_string(),
            markdown: line.trim_end().to_string(),
        })
    }

    /// Sort key: the non-alphabetic bucket first, then letters, then title.
    fn sort_key(&self) -> (String, String) {
        let letter = if self.letter == LetterBucket::OTHER_LINK {
            "00".to_string()
        } else {
            let bare = self.letter.replace('$', "").to_lowercase();
            if bare.chars().all(char::is_alphabetic) {
                format!("01{bare}")
            } else {
                bare
            }
        };
        (letter, self.title.to_lowercase())
    }
}

/// Orders rows as they appear in a section table.
#[must_use]
pub fn compare_rows(a: &CategoryRow, b: &CategoryRow) -> Ordering {
    a.sort_key().cmp(&b.sort_key())
}

/// Parses the rows of every known section.
///
/// `headings` are the section titles without the `## ` prefix. Sections
/// that are not listed are ignored, and listed sections missing from the
/// page yield empty row lists.
#[must_use]
pub fn parse_categories(content: &str, headings: &[&str]) -> BTreeMap<String, Vec<CategoryRow>> {
    let mut sections: BTreeMap<String, Vec<CategoryRow>> = headings
        .iter()
        .map(|h| ((*h).to_string(), Vec::new()))
        .collect();

    let mut current: Option<String> = None;

    for line in content.lines() {
        let trimmed = line.trim();

        if let Some(heading) = trimmed.strip_prefix("## ") {
            let heading = heading.trim();
            current = headings
                .iter()
                .any(|h| *h == heading)
                .then(|| heading.to_string());
            continue;
        }

        if trimmed.starts_with("# ") {
            current = None;
            continue;
        }

        let Some(section) = &current else {
            continue;
        };

        if !trimmed.starts_with('|') || trimmed == TABLE_HEADER || trimmed == TABLE_SEPARATOR {
            continue;
        }

        if let (Some(rows), Some(row)) = (sections.get_mut(section), CategoryRow::parse(line)) {
            rows.push(row);
        }
    }

    sections
}

/// Generates the categories page.
///
/// Sections appear in the given order with rows sorted by [`compare_rows`].
/// The page ends with exactly one newline.
#[must_use]
pub fn generate_categories(sections: &[(&str, Vec<CategoryRow>)]) -> String {
    let mut lines: Vec<String> = Vec::new();

    for (heading, rows) in sections {
        lines.push(format!("## {heading}"));
        lines.push(String::new());
        lines.push(TABLE_HEADER.to_string());
        lines.push(TABLE_SEPARATOR.to_string());

        let mut sorted: Vec<&CategoryRow> = rows.iter().collect();
        sorted.sort_by(|a, b| compare_rows(a, b));
        lines.extend(sorted.into_iter().map(|row| row.markdown.clone()));

        lines.push(String::new());
    }

    let mut content = lines.join("\n").trim().to_string();
    content.push('\n');
    content
}
