//! GitHub REST API access.
//!
//! Only two things are needed from GitHub: repository creation dates for
//! theme pages, and reachability of screenshot URLs. Lookups run
//! concurrently with a bounded number of requests in flight.

use chrono::{DateTime, Utc};
use futures_util::stream::{self, StreamExt};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::constants::{APP_BINARY_NAME, GITHUB_API};
use crate::models::RepoSlug;

/// Errors from GitHub requests.
#[derive(Debug, Error)]
pub enum GithubError {
    #[error("repository {0} not found")]
    NotFound(String),
    #[error("rate limit exceeded, consider setting a GitHub token")]
    RateLimited,
    #[error("GitHub API error: HTTP {0}")]
    Status(u16),
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected API response format: {0}")]
    Decode(String),
}

impl GithubError {
    /// Maps a non-success status to an error.
    #[must_use]
    pub fn from_status(status: StatusCode, slug: &RepoSlug) -> Self {
        match status {
            StatusCode::NOT_FOUND => Self::NotFound(slug.to_string()),
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => Self::RateLimited,
            other => Self::Status(other.as_u16()),
        }
    }
}

/// Repository metadata returned by `GET /repos/{owner}/{repo}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RepoInfo {
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Date layouts available for a repository creation date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStyle {
    /// `2021-03-14`
    IsoDate,
    /// `March 2021`
    Readable,
    /// `Mar 2021`
    Short,
    /// `2021`
    YearOnly,
    /// `March 14, 2021`
    FullReadable,
    /// `03/21`
    Compact,
}

impl DateStyle {
    /// Every style, in display order.
    pub const ALL: [Self; 6] = [
        Self::IsoDate,
        Self::Readable,
        Self::Short,
        Self::YearOnly,
        Self::FullReadable,
        Self::Compact,
    ];

    const fn pattern(self) -> &'static str {
        match self {
            Self::IsoDate => "%Y-%m-%d",
            Self::Readable => "%B %Y",
            Self::Short => "%b %Y",
            Self::YearOnly => "%Y",
            Self::FullReadable => "%B %d, %Y",
            Self::Compact => "%m/%y",
        }
    }

    /// Snake-case key used in JSON output.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::IsoDate => "iso_date",
            Self::Readable => "readable",
            Self::Short => "short",
            Self::YearOnly => "year_only",
            Self::FullReadable => "full_readable",
            Self::Compact => "compact",
        }
    }
}

/// A repository creation date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RepoCreated(pub DateTime<Utc>);

impl RepoCreated {
    /// Formats the date in the given style.
    #[must_use]
    pub fn format(&self, style: DateStyle) -> String {
        self.0.format(style.pattern()).to_string()
    }

    /// URL-encoded form, suitable for shields.io badge paths.
    #[must_use]
    pub fn encoded(&self, style: DateStyle) -> String {
        urlencoding::encode(&self.format(style)).into_owned()
    }

    /// All formats keyed by style, with `<key>_encoded` variants.
    #[must_use]
    pub fn all_formats(&self) -> HashMap<String, String> {
        let mut out = HashMap::new();
        for style in DateStyle::ALL {
            out.insert(style.key().to_string(), self.format(style));
            out.insert(format!("{}_encoded", style.key()), self.encoded(style));
        }
        out
    }
}

/// Reachability of one URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlCheck {
    pub url: String,
    pub accessible: bool,
    pub status: Option<u16>,
    pub error: Option<String>,
}

/// GitHub API client sharing one HTTP connection pool.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    token: Option<String>,
    api_root: String,
}

impl GithubClient {
    /// Creates a client with an optional token and a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`GithubError::Network`] if the HTTP client cannot be built.
    pub fn new(token: Option<&str>, timeout: Duration) -> Result<Self, GithubError> {
        let http = reqwest::Client::builder()
            .user_agent(format!("{APP_BINARY_NAME}/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| GithubError::Network(e.to_string()))?;

        Ok(Self {
            http,
            token: token.filter(|t| !t.is_empty()).map(str::to_string),
            api_root: GITHUB_API.to_string(),
        })
    }

    /// Points the client at another API root (GitHub Enterprise, tests).
    #[must_use]
    pub fn with_api_root(mut self, root: impl Into<String>) -> Self {
        self.api_root = root.into().trim_end_matches('/').to_string();
        self
    }

    /// Returns true if requests are authenticated.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Fetches repository metadata.
    ///
    /// # Errors
    ///
    /// Returns [`GithubError::NotFound`] for 404, [`GithubError::RateLimited`]
    /// for 403/429, [`GithubError::Status`] for other failures.
    pub async fn repo_info(&self, slug: &RepoSlug) -> Result<RepoInfo, GithubError> {
        let url = format!("{}/repos/{slug}", self.api_root);
        debug!(url = %url, "fetching repository info");

        let mut request = self
            .http
            .get(&url)
            .header("Accept", "application/vnd.github.v3+json");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("token {token}"));
        }

        let response = request
            .send()
            .await
            .map_err(|e| GithubError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GithubError::from_status(status, slug));
        }

        response
            .json::<RepoInfo>()
            .await
            .map_err(|e| GithubError::Decode(e.to_string()))
    }

    /// Fetches the creation date of a repository.
    pub async fn creation_date(&self, slug: &RepoSlug) -> Result<RepoCreated, GithubError> {
        Ok(RepoCreated(self.repo_info(slug).await?.created_at))
    }

    /// Fetches creation dates with at most `concurrency` requests in flight.
    ///
    /// Failed lookups are logged and left out of the result.
    pub async fn creation_dates(
        &self,
        slugs: &[RepoSlug],
        concurrency: usize,
    ) -> HashMap<RepoSlug, RepoCreated> {
        stream::iter(slugs.iter().cloned())
            .map(|slug| async move {
                let result = self.creation_date(&slug).await;
                (slug, result)
            })
            .buffer_unordered(concurrency.max(1))
            .filter_map(|(slug, result)| async move {
                match result {
                    Ok(created) => Some((slug, created)),
                    Err(err) => {
                        warn!("Could not fetch creation date for {slug}: {err}");
                        None
                    }
                }
            })
            .collect()
            .await
    }

    /// Sends a HEAD request to each URL.
    ///
    /// Results come back in input order.
    pub async fn check_urls(&self, urls: &[String], concurrency: usize) -> Vec<UrlCheck> {
        let mut checks: Vec<(usize, UrlCheck)> = stream::iter(urls.iter().enumerate())
            .map(|(idx, url)| async move {
                let check = match self.http.head(url).send().await {
                    Ok(response) => UrlCheck {
                        url: url.clone(),
                        accessible: response.status().is_success(),
                        status: Some(response.status().as_u16()),
                        error: None,
                    },
                    Err(err) => UrlCheck {
                        url: url.clone(),
                        accessible: false,
                        status: None,
                        error: Some(err.to_string()),
                    },
                };
                (idx, check)
            })
            .buffer_unordered(concurrency.max(1))
            .collect()
            .await;

        checks.sort_by_key(|(idx, _)| *idx);
        checks.into_iter().map(|(_, check)| check).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn created() -> RepoCreated {
        RepoCreated(Utc.with_ymd_and_hms(2021, 3, 4, 12, 0, 0).unwrap())
    }

    #[test]
    fn test_date_formats() {
        let date = created();
        assert_eq!(date.format(DateStyle::IsoDate), "2021-03-04");
        assert_eq!(date.format(DateStyle::Readable), "March 2021");
        assert_eq!(date.format(DateStyle::Short), "Mar 2021");
        assert_eq!(date.format(DateStyle::YearOnly), "2021");
        assert_eq!(date.format(DateStyle::FullReadable), "March 04, 2021");
        assert_eq!(date.format(DateStyle::Compact), "03/21");
    }

    #[test]
    fn test_encoded_formats() {
        let date = created();
        assert_eq!(date.encoded(DateStyle::Readable), "March%202021");
        assert_eq!(date.encoded(DateStyle::FullReadable), "March%2004%2C%202021");

        let all = date.all_formats();
        assert_eq!(all.len(), 12);
        assert_eq!(all["compact_encoded"], "03%2F21");
    }

    #[test]
    fn test_status_mapping() {
        let slug = RepoSlug::parse("o/r").unwrap();
        assert!(matches!(
            GithubError::from_status(StatusCode::NOT_FOUND, &slug),
            GithubError::NotFound(s) if s == "o/r"
        ));
        assert!(matches!(
            GithubError::from_status(StatusCode::FORBIDDEN, &slug),
            GithubError::RateLimited
        ));
        assert!(matches!(
            GithubError::from_status(StatusCode::BAD_GATEWAY, &slug),
            GithubError::Status(502)
        ));
    }

    #[test]
    fn test_repo_info_deserialize() {
        let info: RepoInfo = serde_json::from_str(
            r#"{"name": "r", "full_name": "o/r", "description": null, "created_at": "2020-05-01T10:00:00Z", "stargazers_count": 3}"#,
        )
        .unwrap();
        assert_eq!(info.full_name, "o/r");
        assert_eq!(RepoCreated(info.created_at).format(DateStyle::IsoDate), "2020-05-01");
    }

    #[test]
    fn test_client_token() {
        let client = GithubClient::new(Some(""), Duration::from_secs(5)).unwrap();
        assert!(!client.has_token());
        let client = GithubClient::new(Some("abc"), Duration::from_secs(5)).unwrap();
        assert!(client.has_token());
    }

    #[tokio::test]
    async fn test_failed_lookups_are_dropped() {
        let client = GithubClient::new(None, Duration::from_secs(2))
            .unwrap()
            .with_api_root("http://127.0.0.1:1");

        assert!(client.creation_dates(&[], 4).await.is_empty());

        let slugs = vec![RepoSlug::parse("o/a").unwrap(), RepoSlug::parse("o/b").unwrap()];
        assert!(client.creation_dates(&slugs, 4).await.is_empty());
    }

    #[tokio::test]
    async fn test_check_urls_keeps_input_order() {
        let client = GithubClient::new(None, Duration::from_secs(2)).unwrap();
        let urls = vec![
            "http://127.0.0.1:1/a.png".to_string(),
            "http://127.0.0.1:1/b.png".to_string(),
        ];

        let checks = client.check_urls(&urls, 2).await;
        assert_eq!(checks.len(), 2);
        assert_eq!(checks[0].url, urls[0]);
        assert_eq!(checks[1].url, urls[1]);
        assert!(checks.iter().all(|c| !c.accessible && c.error.is_some()));
    }
}
