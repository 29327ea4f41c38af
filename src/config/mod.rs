//! Configuration for portfolio-sync (`portfolio-sync.yaml`)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::adapters::github::GITHUB_API_URL;
use crate::types::{Category, Ordering, OwnerType};

/// Default config file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "portfolio-sync.yaml";

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// A repository named explicitly in curated mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRepo {
    pub name: String,
    /// Overrides the classifier
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub priority: Option<u32>,
    /// Unioned into the entry's tags
    #[serde(default)]
    pub tags: Vec<String>,
}

impl SourceRepo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: None,
            priority: None,
            tags: Vec::new(),
        }
    }
}

/// Run configuration, passed explicitly to every stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioConfig {
    /// Account (user or organization) whose repositories are showcased
    #[serde(default)]
    pub account: String,

    #[serde(default)]
    pub owner_type: OwnerType,

    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Base URL for raw file content, relative media paths resolve against it
    #[serde(default = "default_raw_base_url")]
    pub raw_base_url: String,

    /// Static-pages domain; `<account>.<pages_domain>` is the profile site
    #[serde(default = "default_pages_domain")]
    pub pages_domain: String,

    #[serde(default = "default_media_root")]
    pub media_root: PathBuf,

    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Where to write intermediate records, if anywhere
    #[serde(default)]
    pub test_output_path: Option<PathBuf>,

    /// Defaults to `priority` in curated mode and `recency` otherwise
    #[serde(default)]
    pub ordering: Option<Ordering>,

    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    #[serde(default)]
    pub fetch_readme: bool,

    #[serde(default = "default_true")]
    pub probe_screenshots: bool,

    #[serde(default = "default_true")]
    pub include_archived: bool,

    /// Repository names never showcased
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Curated mode: showcase exactly these repositories
    #[serde(default)]
    pub sources: Vec<SourceRepo>,

    /// Environment variable holding the API token
    #[serde(default = "default_token_env")]
    pub token_env: String,

    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Repository probed by the check command
    #[serde(default)]
    pub probe_repo: Option<String>,
}

fn default_api_url() -> String {
    GITHUB_API_URL.to_string()
}

fn default_raw_base_url() -> String {
    "https://raw.githubusercontent.com".to_string()
}

fn default_pages_domain() -> String {
    "github.io".to_string()
}

fn default_media_root() -> PathBuf {
    PathBuf::from("public/portfolio-media")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("public/data/portfolio-data.json")
}

fn default_max_pages() -> u32 {
    10
}

fn default_true() -> bool {
    true
}

fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

fn default_http_timeout_secs() -> u64 {
    30
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            account: String::new(),
            owner_type: OwnerType::default(),
            api_url: default_api_url(),
            raw_base_url: default_raw_base_url(),
            pages_domain: default_pages_domain(),
            media_root: default_media_root(),
            output_path: default_output_path(),
            test_output_path: None,
            ordering: None,
            max_pages: default_max_pages(),
            fetch_readme: false,
            probe_screenshots: true,
            include_archived: true,
            exclude: Vec::new(),
            sources: Vec::new(),
            token_env: default_token_env(),
            http_timeout_secs: default_http_timeout_secs(),
            probe_repo: None,
        }
    }
}

impl PortfolioConfig {
    /// Defaults for `account`
    pub fn for_account(account: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            ..Self::default()
        }
    }

    /// Load config from a YAML file. A missing file yields defaults.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = match tokio::fs::read_to_string(path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config at {}, using defaults", path.display());
                return Ok(Self::default().expand_paths());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        };

        Self::from_yaml(&contents)
    }

    /// Parse config from YAML text
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        if contents.trim().is_empty() {
            return Ok(Self::default().expand_paths());
        }
        let config: PortfolioConfig = serde_yaml::from_str(contents)?;
        Ok(config.expand_paths())
    }

    /// Expand tildes in filesystem paths
    fn expand_paths(mut self) -> Self {
        self.media_root = expand_tilde(&self.media_root);
        self.output_path = expand_tilde(&self.output_path);
        self.test_output_path = self.test_output_path.as_deref().map(expand_tilde);
        self
    }

    /// Reject configurations no run can succeed with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.account.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "`account` is required (set it in the config file or pass --account)".to_string(),
            ));
        }
        if self.max_pages == 0 {
            return Err(ConfigError::Invalid("`max_pages` must be at least 1".to_string()));
        }
        if self.token_env.trim().is_empty() {
            return Err(ConfigError::Invalid("`token_env` must not be empty".to_string()));
        }
        let mut seen: Vec<&str> = Vec::new();
        for source in &self.sources {
            if seen.iter().any(|s| s.eq_ignore_ascii_case(&source.name)) {
                return Err(ConfigError::Invalid(format!(
                    "repository `{}` listed twice in `sources`",
                    source.name
                )));
            }
            seen.push(&source.name);
        }
        Ok(())
    }

    /// Whether an explicit repository list drives the run
    pub fn is_curated(&self) -> bool {
        !self.sources.is_empty()
    }

    pub fn effective_ordering(&self) -> Ordering {
        self.ordering.unwrap_or(if self.is_curated() {
            Ordering::Priority
        } else {
            Ordering::Recency
        })
    }

    /// Name of the account's profile-page repository
    pub fn profile_repo_name(&self) -> String {
        format!("{}.{}", self.account, self.pages_domain)
    }

    /// Static-pages URL of a repository
    pub fn pages_url(&self, repo_name: &str) -> String {
        format!(
            "https://{}.{}/{}/",
            self.account.to_lowercase(),
            self.pages_domain,
            repo_name
        )
    }

    /// Base URL for raw content of a repository on `branch`
    pub fn raw_content_base(&self, repo_name: &str, branch: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.raw_base_url.trim_end_matches('/'),
            self.account,
            repo_name,
            branch
        )
    }

    pub fn is_excluded(&self, repo_name: &str) -> bool {
        self.exclude.iter().any(|e| e.eq_ignore_ascii_case(repo_name))
    }

    pub fn source(&self, repo_name: &str) -> Option<&SourceRepo> {
        self.sources.iter().find(|s| s.name.eq_ignore_ascii_case(repo_name))
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

/// Expand tilde (~) to home directory in a path
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(rest) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}
