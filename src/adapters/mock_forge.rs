//! Mock ForgePort implementation for testing
//!
//! This module provides a configurable in-memory forge, allowing tests to
//! drive the whole pipeline without making network calls. Every call is
//! recorded so tests can assert on what was (or was not) fetched.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use super::{ForgeError, ForgePort, ForgeResult};
use crate::types::{OwnerType, RepositorySummary};

/// Errors that can be configured for the mock
#[derive(Debug, Clone)]
pub enum MockError {
    AuthenticationFailed(String),
    NetworkError(String),
    ApiError { status: u16, message: String },
}

impl From<MockError> for ForgeError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::AuthenticationFailed(message) => ForgeError::AuthenticationFailed { message },
            MockError::NetworkError(msg) => ForgeError::NetworkError(msg),
            MockError::ApiError { status, message } => ForgeError::ApiError { status, message },
        }
    }
}

/// Fixture data served by the mock
#[derive(Debug, Clone, Default)]
struct MockState {
    login: Option<String>,
    repos: Vec<RepositorySummary>,
    languages: HashMap<String, Vec<String>>,
    files: HashMap<(String, String), String>,
    readmes: HashMap<String, String>,
    paths: HashSet<(String, String)>,
    downloads: HashMap<String, Vec<u8>>,
    failing_repos: HashMap<String, MockError>,
    list_error: Option<MockError>,
}

/// Record of a call made to the mock forge
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Authenticate,
    ListRepos { owner: String },
    GetRepo { name: String },
    GetTopics { name: String },
    GetLanguages { name: String },
    GetFile { name: String, path: String },
    GetReadme { name: String },
    PathExists { name: String, path: String },
    Download { url: String },
}

/// An in-memory ForgePort
///
/// # Example
///
/// ```rust,ignore
/// let forge = MockForge::new()
///     .with_repo(RepositorySummary::new("geo-tool").with_topics(["gis"]))
///     .with_file("geo-tool", "project-info.md", "---\ntitle: Geo\n---\n");
///
/// let repos = forge.list_repos("owner", OwnerType::User, 1).await.unwrap();
/// assert_eq!(repos.len(), 1);
/// ```
#[derive(Clone)]
pub struct MockForge {
    state: Arc<Mutex<MockState>>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

impl Default for MockForge {
    fn default() -> Self {
        Self::new()
    }
}

impl MockForge {
    /// Create a mock that authenticates as `mock-user` and has no repositories
    pub fn new() -> Self {
        let state = MockState {
            login: Some("mock-user".to_string()),
            ..MockState::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Reject every token
    pub fn without_auth(self) -> Self {
        self.state.lock().unwrap().login = None;
        self
    }

    pub fn with_repo(self, repo: RepositorySummary) -> Self {
        self.state.lock().unwrap().repos.push(repo);
        self
    }

    pub fn with_languages<S: Into<String>>(self, repo: &str, languages: Vec<S>) -> Self {
        self.state
            .lock()
            .unwrap()
            .languages
            .insert(repo.to_string(), languages.into_iter().map(Into::into).collect());
        self
    }

    /// Serve a text file from a repository
    pub fn with_file(self, repo: &str, path: &str, content: impl Into<String>) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state
                .files
                .insert((repo.to_string(), path.to_string()), content.into());
            state.paths.insert((repo.to_string(), path.to_string()));
        }
        self
    }

    pub fn with_readme(self, repo: &str, content: impl Into<String>) -> Self {
        self.state
            .lock()
            .unwrap()
            .readmes
            .insert(repo.to_string(), content.into());
        self
    }

    /// Mark a (binary) path as present in a repository
    pub fn with_path(self, repo: &str, path: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .paths
            .insert((repo.to_string(), path.to_string()));
        self
    }

    /// Serve bytes for an absolute URL
    pub fn with_download(self, url: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.state
            .lock()
            .unwrap()
            .downloads
            .insert(url.to_string(), bytes.into());
        self
    }

    /// Make every per-repository file lookup for `repo` fail with a network error
    pub fn with_failing_repo(self, repo: &str) -> Self {
        let error = MockError::NetworkError(format!("connection reset while reading {}", repo));
        self.with_repo_error(repo, error)
    }

    /// Make every per-repository file lookup for `repo` fail with `error`
    pub fn with_repo_error(self, repo: &str, error: MockError) -> Self {
        self.state
            .lock()
            .unwrap()
            .failing_repos
            .insert(repo.to_string(), error);
        self
    }

    /// Configure an error to return from list_repos
    pub fn with_list_error(self, error: MockError) -> Self {
        self.state.lock().unwrap().list_error = Some(error);
        self
    }

    /// Get the call log for verification
    pub fn calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    /// Clear the call log
    pub fn clear_calls(&self) {
        self.call_log.lock().unwrap().clear();
    }

    /// Number of download calls made so far
    pub fn download_count(&self) -> usize {
        self.call_log
            .lock()
            .unwrap()
            .iter()
            .filter(|call| matches!(call, MockCall::Download { .. }))
            .count()
    }

    /// Log a call
    fn log_call(&self, call: MockCall) {
        self.call_log.lock().unwrap().push(call);
    }

    fn check_auth(&self) -> ForgeResult<String> {
        self.state
            .lock()
            .unwrap()
            .login
            .clone()
            .ok_or_else(|| ForgeError::AuthenticationFailed {
                message: "Invalid or expired token".to_string(),
            })
    }

    fn check_repo(&self, name: &str) -> ForgeResult<()> {
        let state = self.state.lock().unwrap();
        if let Some(err) = state.failing_repos.get(name) {
            return Err(err.clone().into());
        }
        if !state.repos.iter().any(|r| r.name == name) {
            return Err(ForgeError::RepoNotFound { name: name.to_string() });
        }
        Ok(())
    }
}

#[async_trait]
impl ForgePort for MockForge {
    async fn authenticate(&self) -> ForgeResult<String> {
        self.log_call(MockCall::Authenticate);
        self.check_auth()
    }

    async fn list_repos(
        &self,
        owner: &str,
        _owner_type: OwnerType,
        _max_pages: u32,
    ) -> ForgeResult<Vec<RepositorySummary>> {
        self.log_call(MockCall::ListRepos { owner: owner.to_string() });
        self.check_auth()?;

        let state = self.state.lock().unwrap();
        if let Some(err) = &state.list_error {
            return Err(err.clone().into());
        }
        Ok(state.repos.clone())
    }

    async fn get_repo(&self, _owner: &str, name: &str) -> ForgeResult<RepositorySummary> {
        self.log_call(MockCall::GetRepo { name: name.to_string() });
        self.check_auth()?;

        self.state
            .lock()
            .unwrap()
            .repos
            .iter()
            .find(|r| r.name == name)
            .cloned()
            .ok_or_else(|| ForgeError::RepoNotFound { name: name.to_string() })
    }

    async fn get_topics(&self, _owner: &str, name: &str) -> ForgeResult<Vec<String>> {
        self.log_call(MockCall::GetTopics { name: name.to_string() });
        self.check_repo(name)?;

        let state = self.state.lock().unwrap();
        Ok(state
            .repos
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.topics.clone())
            .unwrap_or_default())
    }

    async fn get_languages(&self, _owner: &str, name: &str) -> ForgeResult<Vec<String>> {
        self.log_call(MockCall::GetLanguages { name: name.to_string() });
        self.check_repo(name)?;

        Ok(self
            .state
            .lock()
            .unwrap()
            .languages
            .get(name)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_file(&self, _owner: &str, name: &str, path: &str) -> ForgeResult<Option<String>> {
        self.log_call(MockCall::GetFile {
            name: name.to_string(),
            path: path.to_string(),
        });
        self.check_repo(name)?;

        Ok(self
            .state
            .lock()
            .unwrap()
            .files
            .get(&(name.to_string(), path.to_string()))
            .cloned())
    }

    async fn get_readme(&self, _owner: &str, name: &str) -> ForgeResult<Option<String>> {
        self.log_call(MockCall::GetReadme { name: name.to_string() });
        self.check_repo(name)?;

        Ok(self.state.lock().unwrap().readmes.get(name).cloned())
    }

    async fn path_exists(&self, _owner: &str, name: &str, path: &str) -> ForgeResult<bool> {
        self.log_call(MockCall::PathExists {
            name: name.to_string(),
            path: path.to_string(),
        });
        self.check_repo(name)?;

        Ok(self
            .state
            .lock()
            .unwrap()
            .paths
            .contains(&(name.to_string(), path.to_string())))
    }

    async fn download(&self, url: &str) -> ForgeResult<Vec<u8>> {
        self.log_call(MockCall::Download { url: url.to_string() });

        self.state
            .lock()
            .unwrap()
            .downloads
            .get(url)
            .cloned()
            .ok_or_else(|| ForgeError::ApiError {
                status: 404,
                message: format!("Not Found: {}", url),
            })
    }
}
