//! GitHub adapter implementing ForgePort trait
//!
//! Uses the GitHub REST API v3. Every call is awaited in sequence; list
//! pagination follows `Link: rel="next"` one page at a time.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{header, Client, Response, StatusCode};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::{ForgeError, ForgePort, ForgeResult};
use crate::auth::AuthProvider;
use crate::types::{OwnerType, RepositorySummary, Visibility};

/// GitHub API base URL
pub const GITHUB_API_URL: &str = "https://api.github.com";

const MEDIA_JSON: &str = "application/vnd.github+json";
const MEDIA_RAW: &str = "application/vnd.github.raw+json";
const USER_AGENT: &str = concat!("portfolio-sync/", env!("CARGO_PKG_VERSION"));

/// GitHub repository response from API
#[derive(Debug, Deserialize)]
struct GitHubRepo {
    name: String,
    description: Option<String>,
    #[serde(default)]
    private: bool,
    #[serde(default)]
    archived: bool,
    #[serde(default)]
    fork: bool,
    #[serde(default)]
    is_template: bool,
    #[serde(default)]
    default_branch: Option<String>,
    html_url: String,
    #[serde(default)]
    homepage: Option<String>,
    #[serde(default)]
    stargazers_count: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    topics: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct GitHubUser {
    login: String,
}

#[derive(Debug, Deserialize)]
struct GitHubTopics {
    names: Vec<String>,
}

/// GitHub adapter for ForgePort trait
pub struct GitHubAdapter {
    client: Client,
    auth: Arc<dyn AuthProvider>,
    api_url: String,
    token_key: String,
}

impl GitHubAdapter {
    /// Create a new GitHubAdapter reading its token under `token_key`
    pub fn new(auth: Arc<dyn AuthProvider>, token_key: impl Into<String>) -> ForgeResult<Self> {
        Self::with_api_url(auth, token_key, GITHUB_API_URL, Duration::from_secs(30))
    }

    /// Create a new GitHubAdapter with a custom API URL and request timeout
    pub fn with_api_url(
        auth: Arc<dyn AuthProvider>,
        token_key: impl Into<String>,
        api_url: &str,
        timeout: Duration,
    ) -> ForgeResult<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        Ok(Self {
            client,
            auth,
            api_url: api_url.trim_end_matches('/').to_string(),
            token_key: token_key.into(),
        })
    }

    /// Get authorization headers with token from auth provider
    async fn auth_headers(&self, accept: &'static str) -> ForgeResult<header::HeaderMap> {
        let token = self
            .auth
            .get_secret(&self.token_key)
            .await
            .map_err(|e| ForgeError::AuthenticationFailed { message: e.to_string() })?
            .ok_or_else(|| ForgeError::AuthenticationFailed {
                message: format!("No GitHub token found in {}", self.token_key),
            })?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ForgeError::AuthenticationFailed { message: e.to_string() })?,
        );
        headers.insert(header::ACCEPT, header::HeaderValue::from_static(accept));
        headers.insert(
            "X-GitHub-Api-Version",
            header::HeaderValue::from_static("2022-11-28"),
        );

        Ok(headers)
    }

    async fn send(&self, url: &str, accept: &'static str) -> ForgeResult<Response> {
        debug!("GET {}", url);
        let headers = self.auth_headers(accept).await?;
        self.client
            .get(url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))
    }

    /// Map non-success statuses to ForgeError
    async fn check_status(response: Response) -> ForgeResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            return Err(ForgeError::AuthenticationFailed {
                message: "Invalid or expired token".to_string(),
            });
        }

        if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
            let remaining = response
                .headers()
                .get("x-ratelimit-remaining")
                .and_then(|v| v.to_str().ok());
            if remaining == Some("0") || status == StatusCode::TOO_MANY_REQUESTS {
                let retry_secs = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(60);
                return Err(ForgeError::RateLimited {
                    retry_after: Duration::from_secs(retry_secs),
                });
            }
        }

        let body = response.text().await.unwrap_or_default();
        Err(ForgeError::ApiError {
            status: status.as_u16(),
            message: body,
        })
    }

    async fn parse_json<T: for<'de> Deserialize<'de>>(response: Response) -> ForgeResult<T> {
        response
            .json()
            .await
            .map_err(|e| ForgeError::SerdeError(format!("Failed to parse response: {}", e)))
    }

    /// Convert GitHub API response to our snapshot type
    fn to_summary(gh_repo: GitHubRepo) -> RepositorySummary {
        let summary = RepositorySummary {
            name: gh_repo.name,
            description: gh_repo.description.filter(|d| !d.trim().is_empty()),
            topics: Vec::new(),
            languages: Vec::new(),
            created_at: gh_repo.created_at,
            updated_at: gh_repo.updated_at,
            visibility: if gh_repo.private {
                Visibility::Private
            } else {
                Visibility::Public
            },
            archived: gh_repo.archived,
            fork: gh_repo.fork,
            is_template: gh_repo.is_template,
            default_branch: gh_repo.default_branch.unwrap_or_else(|| "main".to_string()),
            html_url: gh_repo.html_url,
            homepage: gh_repo.homepage.filter(|h| !h.trim().is_empty()),
            stars: gh_repo.stargazers_count,
        };
        summary.with_topics(gh_repo.topics)
    }

    /// Extract the `rel="next"` URL from a GitHub `Link` header.
    /// GitHub uses: `<url?page=N>; rel="next", <url?page=M>; rel="last"`.
    fn parse_next_link(link_header: &str) -> Option<String> {
        link_header
            .split(',')
            .find(|part| part.contains("rel=\"next\""))
            .and_then(|part| part.split(';').next())
            .map(|url| url.trim().trim_start_matches('<').trim_end_matches('>').to_string())
            .filter(|url| !url.is_empty())
    }

    /// Fetch pages sequentially, following `next` links up to `max_pages`
    async fn fetch_paginated(
        &self,
        first_url: String,
        max_pages: u32,
    ) -> ForgeResult<Vec<RepositorySummary>> {
        let mut repos = Vec::new();
        let mut next = Some(first_url);
        let mut pages = 0;

        while let Some(url) = next.take() {
            if pages >= max_pages {
                warn!(
                    "Stopped listing after {} pages; more repositories exist at {}",
                    max_pages, url
                );
                break;
            }
            pages += 1;

            let response = Self::check_status(self.send(&url, MEDIA_JSON).await?).await?;
            next = response
                .headers()
                .get(header::LINK)
                .and_then(|v| v.to_str().ok())
                .and_then(Self::parse_next_link);

            let page: Vec<GitHubRepo> = Self::parse_json(response).await?;
            repos.extend(page.into_iter().map(Self::to_summary));
        }

        Ok(repos)
    }

    fn repo_url(&self, owner: &str, name: &str) -> String {
        format!(
            "{}/repos/{}/{}",
            self.api_url,
            urlencoding::encode(owner),
            urlencoding::encode(name)
        )
    }

    fn contents_url(&self, owner: &str, name: &str, path: &str) -> String {
        let encoded: Vec<String> = path
            .trim_start_matches("./")
            .trim_start_matches('/')
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        format!("{}/contents/{}", self.repo_url(owner, name), encoded.join("/"))
    }
}

#[async_trait]
impl ForgePort for GitHubAdapter {
    async fn authenticate(&self) -> ForgeResult<String> {
        let url = format!("{}/user", self.api_url);
        let response = Self::check_status(self.send(&url, MEDIA_JSON).await?).await?;
        let user: GitHubUser = Self::parse_json(response).await?;
        Ok(user.login)
    }

    async fn list_repos(
        &self,
        owner: &str,
        owner_type: OwnerType,
        max_pages: u32,
    ) -> ForgeResult<Vec<RepositorySummary>> {
        let owner_enc = urlencoding::encode(owner);
        let user_url = format!(
            "{}/users/{}/repos?type=owner&sort=updated&per_page=100",
            self.api_url, owner_enc
        );

        match owner_type {
            OwnerType::User => self.fetch_paginated(user_url, max_pages).await,
            OwnerType::Org => {
                let org_url = format!(
                    "{}/orgs/{}/repos?type=public&sort=updated&per_page=100",
                    self.api_url, owner_enc
                );
                match self.fetch_paginated(org_url, max_pages).await {
                    // Try user repos if org not found
                    Err(ForgeError::ApiError { status: 404, .. }) => {
                        self.fetch_paginated(user_url, max_pages).await
                    }
                    other => other,
                }
            }
        }
    }

    async fn get_repo(&self, owner: &str, name: &str) -> ForgeResult<RepositorySummary> {
        let response = self.send(&self.repo_url(owner, name), MEDIA_JSON).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ForgeError::RepoNotFound { name: name.to_string() });
        }

        let gh_repo: GitHubRepo = Self::parse_json(Self::check_status(response).await?).await?;
        Ok(Self::to_summary(gh_repo))
    }

    async fn get_topics(&self, owner: &str, name: &str) -> ForgeResult<Vec<String>> {
        let url = format!("{}/topics", self.repo_url(owner, name));
        let response = self.send(&url, MEDIA_JSON).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ForgeError::RepoNotFound { name: name.to_string() });
        }

        let topics: GitHubTopics = Self::parse_json(Self::check_status(response).await?).await?;
        Ok(topics.names)
    }

    async fn get_languages(&self, owner: &str, name: &str) -> ForgeResult<Vec<String>> {
        let url = format!("{}/languages", self.repo_url(owner, name));
        let response = Self::check_status(self.send(&url, MEDIA_JSON).await?).await?;
        let bytes_by_language: HashMap<String, u64> = Self::parse_json(response).await?;

        let mut languages: Vec<(String, u64)> = bytes_by_language.into_iter().collect();
        languages.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Ok(languages.into_iter().map(|(language, _)| language).collect())
    }

    async fn get_file(&self, owner: &str, name: &str, path: &str) -> ForgeResult<Option<String>> {
        let response = self.send(&self.contents_url(owner, name, path), MEDIA_RAW).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = Self::check_status(response).await?;
        let text = response
            .text()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;
        Ok(Some(text))
    }

    async fn get_readme(&self, owner: &str, name: &str) -> ForgeResult<Option<String>> {
        let url = format!("{}/readme", self.repo_url(owner, name));
        let response = self.send(&url, MEDIA_RAW).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = Self::check_status(response).await?;
        let text = response
            .text()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;
        Ok(Some(text))
    }

    async fn path_exists(&self, owner: &str, name: &str, path: &str) -> ForgeResult<bool> {
        let response = self.send(&self.contents_url(owner, name, path), MEDIA_JSON).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }

        Self::check_status(response).await?;
        Ok(true)
    }

    async fn download(&self, url: &str) -> ForgeResult<Vec<u8>> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        let response = Self::check_status(response).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gh_repo(name: &str) -> GitHubRepo {
        GitHubRepo {
            name: name.to_string(),
            description: Some("A test repo".to_string()),
            private: false,
            archived: false,
            fork: false,
            is_template: false,
            default_branch: None,
            html_url: format!("https://github.com/owner/{}", name),
            homepage: Some(String::new()),
            stargazers_count: 3,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            topics: vec!["gis".to_string(), "GIS".to_string()],
        }
    }

    #[test]
    fn test_to_summary_public() {
        let summary = GitHubAdapter::to_summary(gh_repo("test-repo"));
        assert_eq!(summary.name, "test-repo");
        assert_eq!(summary.description, Some("A test repo".to_string()));
        assert_eq!(summary.visibility, Visibility::Public);
        assert_eq!(summary.default_branch, "main");
        assert_eq!(summary.stars, 3);
        assert!(summary.homepage.is_none());
        assert_eq!(summary.topics, vec!["gis".to_string()]);
    }

    #[test]
    fn test_to_summary_private_archived() {
        let mut repo = gh_repo("private-repo");
        repo.private = true;
        repo.archived = true;
        repo.description = Some("   ".to_string());
        repo.default_branch = Some("master".to_string());

        let summary = GitHubAdapter::to_summary(repo);
        assert_eq!(summary.visibility, Visibility::Private);
        assert!(summary.archived);
        assert!(summary.description.is_none());
        assert_eq!(summary.default_branch, "master");
    }

    #[test]
    fn test_parse_next_link() {
        let header = "<https://api.github.com/user/1/repos?page=2>; rel=\"next\", \
                      <https://api.github.com/user/1/repos?page=5>; rel=\"last\"";
        assert_eq!(
            GitHubAdapter::parse_next_link(header),
            Some("https://api.github.com/user/1/repos?page=2".to_string())
        );
    }

    #[test]
    fn test_parse_next_link_last_page() {
        let header = "<https://api.github.com/user/1/repos?page=1>; rel=\"first\", \
                      <https://api.github.com/user/1/repos?page=4>; rel=\"prev\"";
        assert_eq!(GitHubAdapter::parse_next_link(header), None);
    }
}
