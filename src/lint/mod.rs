//! Content-integrity checks over the published docs tree.
//!
//! Every Markdown page must carry frontmatter with a title, theme pages must
//! link their GitHub repository, and relative links must resolve.

// Allow format! appended to String - more readable for building messages
#![allow(clippy::format_push_string)]

use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use walkdir::WalkDir;

use crate::constants::{GITHUB_WEB, THEME_PAGE_MARKER};
use crate::models::RepoSlug;
use crate::parser::parse_page_frontmatter;

static HTML_HREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"href\s*=\s*"([^"]*)""#).expect("valid href regex"));

static MARKDOWN_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\]\(\s*<?([^)\s>]+)>?(?:\s+"[^"]*")?\s*\)"#).expect("valid link regex")
});

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// What a lint finding is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    MissingFrontmatter,
    InvalidFrontmatter,
    MissingTitle,
    MissingRepositoryLink,
    BrokenLink,
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::MissingFrontmatter => "Missing frontmatter",
            Self::InvalidFrontmatter => "Invalid frontmatter",
            Self::MissingTitle => "Missing title",
            Self::MissingRepositoryLink => "Missing repository link",
            Self::BrokenLink => "Broken link",
        };
        write!(f, "{text}")
    }
}

/// One finding, located by file and 1-based line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintIssue {
    pub file: PathBuf,
    pub line: usize,
    pub severity: Severity,
    pub kind: IssueKind,
    pub message: String,
}

impl std::fmt::Display for LintIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}: {}: {}",
            self.file.display(),
            self.line,
            self.kind,
            self.message
        )
    }
}

/// Findings over a docs tree.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LintReport {
    pub files_checked: usize,
    pub issues: Vec<LintIssue>,
}

impl LintReport {
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.issues.len() - self.error_count()
    }

    /// Returns true if no errors were found (warnings are allowed).
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.error_count() == 0
    }

    /// Formats the report for the terminal.
    #[must_use]
    pub fn format_message(&self) -> String {
        let mut message = format!("Checked {} pages\n", self.files_checked);

        if self.issues.is_empty() {
            message.push_str("✓ No issues found\n");
            return message;
        }

        let errors: Vec<&LintIssue> = self
            .issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .collect();
        let warnings: Vec<&LintIssue> = self
            .issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .collect();

        if !errors.is_empty() {
            message.push_str(&format!("❌ {} errors:\n", errors.len()));
            for issue in errors {
                message.push_str(&format!("  {issue}\n"));
            }
        }
        if !warnings.is_empty() {
            message.push_str(&format!("⚠️  {} warnings:\n", warnings.len()));
            for issue in warnings {
                message.push_str(&format!("  {issue}\n"));
            }
        }

        message
    }
}

/// Link targets that are not checked against the file system.
fn is_external(target: &str) -> bool {
    let lower = target.to_lowercase();
    lower.starts_with("http://")
        || lower.starts_with("https://")
        || lower.starts_with("mailto:")
        || lower.starts_with('#')
        || lower.contains("://")
}

/// Returns true if an HTML or Markdown link on the page points at a full
/// `owner/repo` GitHub URL. Owner profile links do not count.
fn links_repository(content: &str) -> bool {
    let prefix = format!("{GITHUB_WEB}/");
    HTML_HREF
        .captures_iter(content)
        .chain(MARKDOWN_LINK.captures_iter(content))
        .map(|cap| cap[1].trim().to_string())
        .filter(|target| target.starts_with(&prefix))
        .any(|target| RepoSlug::from_url(&target).is_some())
}

/// Resolves a relative link target against the page that contains it.
///
/// Anchors and query strings are dropped; `/`-rooted targets resolve
/// against the docs root.
#[must_use]
pub fn resolve_link(page: &Path, docs_root: &Path, target: &str) -> Option<PathBuf> {
    if is_external(target) {
        return None;
    }

    let bare = target
        .split(['#', '?'])
        .next()
        .unwrap_or_default();
    if bare.is_empty() {
        return None;
    }

    let decoded = urlencoding::decode(bare).map_or_else(|_| bare.to_string(), |s| s.into_owned());

    let resolved = if let Some(rooted) = decoded.strip_prefix('/') {
        docs_root.join(rooted)
    } else {
        page.parent().unwrap_or_else(|| Path::new("")).join(decoded)
    };
    Some(resolved)
}

/// Checks one page.
///
/// `needs_frontmatter` is false for generated pages (index, categories)
/// that carry none.
#[must_use]
pub fn lint_page(path: &Path, content: &str, docs_root: &Path, needs_frontmatter: bool) -> Vec<LintIssue> {
    let mut issues = Vec::new();
    let issue = |line: usize, severity: Severity, kind: IssueKind, message: String| LintIssue {
        file: path.to_path_buf(),
        line,
        severity,
        kind,
        message,
    };

    if needs_frontmatter {
        match parse_page_frontmatter(content) {
            Ok(Some(fm)) if fm.title.trim().is_empty() => issues.push(issue(
                1,
                Severity::Error,
                IssueKind::MissingTitle,
                "frontmatter has no title".to_string(),
            )),
            Ok(Some(_)) => {}
            Ok(None) => issues.push(issue(
                1,
                Severity::Error,
                IssueKind::MissingFrontmatter,
                "page does not start with a --- block".to_string(),
            )),
            Err(e) => issues.push(issue(
                1,
                Severity::Error,
                IssueKind::InvalidFrontmatter,
                format!("{e:#}"),
            )),
        }
    }

    if let Some(marker_line) = content.lines().position(|l| l.contains(THEME_PAGE_MARKER)) {
        if !links_repository(content) {
            issues.push(issue(
                marker_line + 1,
                Severity::Error,
                IssueKind::MissingRepositoryLink,
                "theme page does not link a GitHub repository".to_string(),
            ));
        }
    }

    let mut in_fence = false;
    for (idx, line) in content.lines().enumerate() {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }

        for cap in MARKDOWN_LINK.captures_iter(line) {
            let target = &cap[1];
            let Some(resolved) = resolve_link(path, docs_root, target) else {
                continue;
            };
            if !resolved.exists() {
                issues.push(issue(
                    idx + 1,
                    Severity::Error,
                    IssueKind::BrokenLink,
                    format!("'{target}' does not resolve"),
                ));
            }
        }
    }

    issues
}

/// Walks the docs tree and checks every Markdown page.
///
/// Files listed in `generated` are exempt from the frontmatter check.
pub fn lint_docs(docs_root: &Path, generated: &[&Path]) -> Result<LintReport> {
    if !docs_root.is_dir() {
        anyhow::bail!("Docs directory not found: {}", docs_root.display());
    }

    let mut report = LintReport::default();

    let mut pages: Vec<PathBuf> = WalkDir::new(docs_root)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|p| p.extension().is_some_and(|e| e == "md"))
        .collect();
    pages.sort();

    for page in pages {
        let content = fs::read_to_string(&page)
            .with_context(|| format!("Failed to read page: {}", page.display()))?;
        let needs_frontmatter = !generated.iter().any(|g| *g == page.as_path());
        report
            .issues
            .extend(lint_page(&page, &content, docs_root, needs_frontmatter));
        report.files_checked += 1;
    }

    tracing::debug!(
        "Linted {} pages, {} issues",
        report.files_checked,
        report.issues.len()
    );
    Ok(report)
}
