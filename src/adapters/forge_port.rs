//! ForgePort trait - read-only interface to the hosting API
//!
//! The pipeline only ever talks to the forge through this trait, so every
//! stage can be driven by `MockForge` in tests and by `GitHubAdapter` in
//! production.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::types::{OwnerType, RepositorySummary};

/// Errors that can occur when interacting with a forge
#[derive(Debug, Error)]
pub enum ForgeError {
    /// Repository not found
    #[error("Repository not found: {name}")]
    RepoNotFound { name: String },

    /// Authentication failed (missing or rejected token)
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// Rate limited - retry after duration
    #[error("Rate limited: retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    /// Network/connection error
    #[error("Network error: {0}")]
    NetworkError(String),

    /// API error with status code and message
    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerdeError(String),
}

impl ForgeError {
    /// Whether this error should abort the whole run
    pub fn is_fatal(&self) -> bool {
        matches!(self, ForgeError::AuthenticationFailed { .. })
    }
}

/// Result type for forge operations
pub type ForgeResult<T> = std::result::Result<T, ForgeError>;

/// Read-only forge operations used by the portfolio pipeline
///
/// This trait is implemented by:
/// - GitHubAdapter: GitHub REST API client
/// - MockForge: in-memory fixture with a call log
#[async_trait]
pub trait ForgePort: Send + Sync {
    /// Verify the configured token and return the authenticated login
    async fn authenticate(&self) -> ForgeResult<String>;

    /// List repositories owned by `owner`, requesting at most `max_pages` pages
    async fn list_repos(
        &self,
        owner: &str,
        owner_type: OwnerType,
        max_pages: u32,
    ) -> ForgeResult<Vec<RepositorySummary>>;

    /// Get a specific repository
    async fn get_repo(&self, owner: &str, name: &str) -> ForgeResult<RepositorySummary>;

    /// Topics declared on the repository
    async fn get_topics(&self, owner: &str, name: &str) -> ForgeResult<Vec<String>>;

    /// Languages detected in the repository, largest first
    async fn get_languages(&self, owner: &str, name: &str) -> ForgeResult<Vec<String>>;

    /// Text content of a file on the default branch, `None` when absent
    async fn get_file(&self, owner: &str, name: &str, path: &str) -> ForgeResult<Option<String>>;

    /// README text, `None` when the repository has none
    async fn get_readme(&self, owner: &str, name: &str) -> ForgeResult<Option<String>>;

    /// Whether `path` exists on the default branch
    async fn path_exists(&self, owner: &str, name: &str, path: &str) -> ForgeResult<bool>;

    /// Raw bytes behind an absolute URL
    async fn download(&self, url: &str) -> ForgeResult<Vec<u8>>;

    /// Check if a repository exists
    async fn repo_exists(&self, owner: &str, name: &str) -> ForgeResult<bool> {
        match self.get_repo(owner, name).await {
            Ok(_) => Ok(true),
            Err(ForgeError::RepoNotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
