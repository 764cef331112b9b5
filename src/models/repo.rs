//! GitHub repository identifiers.

use crate::constants::GITHUB_WEB;
use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static SLUG_PART: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._-]+$").expect("valid slug regex"));

static GITHUB_REMOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"github\.com[/:]([^/\s]+)/([^/\s]+)").expect("valid remote regex")
});

/// A validated `owner/name` repository identifier.
///
/// # Validation
///
/// - exactly two `/`-separated parts
/// - both parts non-empty
/// - characters limited to ASCII alphanumerics, `.`, `_` and `-`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepoSlug {
    /// Account or organisation owning the repository
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl RepoSlug {
    /// Parses a strict `owner/name` identifier.
    ///
    /// # Errors
    ///
    /// Returns an error when the string is not exactly two valid parts.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let mut parts = trimmed.split('/');
        let (Some(owner), Some(name), None) = (parts.next(), parts.next(), parts.next()) else {
            anyhow::bail!("Invalid repository format '{trimmed}'. Expected owner/repo-name");
        };

        if !SLUG_PART.is_match(owner) || !SLUG_PART.is_match(name) {
            anyhow::bail!("Invalid repository format '{trimmed}'. Expected owner/repo-name");
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    /// Returns true if `input` is a valid `owner/name` identifier.
    #[must_use]
    pub fn is_valid(input: &str) -> bool {
        Self::parse(input).is_ok()
    }

    /// Extracts a repository from the URL shapes people paste.
    ///
    /// Accepts HTTPS and SSH remotes (`https://github.com/o/r/...`,
    /// `git@github.com:o/r.git`) and bare `o/r` identifiers with an
    /// optional `.git` suffix or trailing path.
    #[must_use]
    pub fn from_url(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        let (owner, name) = if let Some(caps) = GITHUB_REMOTE.captures(input) {
            (caps[1].to_string(), caps[2].to_string())
        } else {
            let mut parts = input.split('/');
            let owner = parts.next()?;
            let name = parts.next()?;
            if owner.contains(':') {
                return None;
            }
            (owner.to_string(), name.to_string())
        };

        let name = name.strip_suffix(".git").unwrap_or(&name);
        Self::parse(&format!("{owner}/{name}")).ok()
    }

    /// Web URL of the repository, optionally pointing at a file or directory.
    ///
    /// A path whose last segment contains a dot is treated as a file (`blob`),
    /// anything else as a directory (`tree`). The branch defaults to `main`.
    #[must_use]
    pub fn url_for(&self, path: Option<&str>, branch: Option<&str>) -> String {
        let base = format!("{GITHUB_WEB}/{self}");
        match path {
            Some(path) if !path.is_empty() => {
                let kind = if path.rsplit('/').next().unwrap_or("").contains('.') {
                    "blob"
                } else {
                    "tree"
                };
                format!("{base}/{kind}/{}/{path}", branch.unwrap_or("main"))
            }
            _ => base,
        }
    }

    /// Web URL of the repository root.
    #[must_use]
    pub fn web_url(&self) -> String {
        self.url_for(None, None)
    }

    /// Web URL of the owner's profile.
    #[must_use]
    pub fn owner_url(&self) -> String {
        format!("{GITHUB_WEB}/{}", self.owner)
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoSlug {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RepoSlug {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<RepoSlug> for String {
    fn from(slug: RepoSlug) -> Self {
        slug.to_string()
    }
}

/// Components of a GitHub web URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GithubUrlParts {
    pub owner: Option<String>,
    pub repo: Option<String>,
    /// `blob`, `tree`, ...
    pub kind: Option<String>,
    pub branch: Option<String>,
    pub path: Option<String>,
}

impl GithubUrlParts {
    /// `owner/repo` when both parts were present.
    #[must_use]
    pub fn full_repo(&self) -> Option<String> {
        match (&self.owner, &self.repo) {
            (Some(owner), Some(repo)) => Some(format!("{owner}/{repo}")),
            _ => None,
        }
    }
}

/// Splits a GitHub web URL into owner, repository, kind, branch and path.
///
/// Non-GitHub or unparsable URLs yield an empty result.
#[must_use]
pub fn parse_github_url(input: &str) -> GithubUrlParts {
    let mut parts = GithubUrlParts::default();

    let Ok(parsed) = url::Url::parse(input) else {
        return parts;
    };
    if !parsed.host_str().is_some_and(|h| h.contains("github.com")) {
        return parts;
    }

    let segments: Vec<&str> = parsed
        .path()
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();

    if segments.len() >= 2 {
        parts.owner = Some(segments[0].to_string());
        parts.repo = Some(segments[1].to_string());

        if segments.len() >= 4 {
            parts.kind = Some(segments[2].to_string());
            parts.branch = Some(segments[3].to_string());
            if segments.len() > 4 {
                parts.path = Some(segments[4..].join("/"));
            }
        }
    }

    parts
}
