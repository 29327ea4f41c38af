//! MetadataService - repository listing and per-repository fetching
//!
//! Listing is the only forge call allowed to fail the run; everything fetched
//! per repository either degrades to an empty value or skips that repository.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::adapters::{ForgeError, ForgePort, ForgeResult};
use crate::config::PortfolioConfig;
use crate::error::{PortfolioError, Result};
use crate::templates::PROJECT_INFO_FILE;
use crate::types::{RepositorySummary, Visibility};

/// Screenshot locations probed in order; the first hit wins
pub const SCREENSHOT_CANDIDATES: &[&str] = &[
    "screenshot.png",
    "screenshot.jpg",
    "docs/screenshot.png",
    "docs/images/screenshot.png",
    "images/screenshot.png",
    "assets/screenshot.png",
    "public/screenshot.png",
    ".github/screenshot.png",
];

/// Everything fetched for one repository
#[derive(Debug, Clone)]
pub struct FetchedRepository {
    /// Listing snapshot with topics and languages filled in
    pub repository: RepositorySummary,

    /// Raw `project-info.md`, `None` when the repository has none
    pub project_info: Option<String>,

    pub readme: Option<String>,

    /// Repository-relative path of the first screenshot found
    pub screenshot: Option<String>,
}

/// Reads repository metadata through a `ForgePort`
pub struct MetadataService {
    forge: Arc<dyn ForgePort>,
    config: PortfolioConfig,
}

impl MetadataService {
    pub fn new(forge: Arc<dyn ForgePort>, config: PortfolioConfig) -> Self {
        Self { forge, config }
    }

    /// Verify the token, returning the authenticated login
    pub async fn authenticate(&self) -> Result<String> {
        self.forge.authenticate().await.map_err(|e| match e {
            ForgeError::AuthenticationFailed { message } => PortfolioError::Authentication(message),
            other => PortfolioError::Authentication(other.to_string()),
        })
    }

    /// List the repositories to showcase.
    ///
    /// Authenticates first. In curated mode each configured source is fetched
    /// individually; otherwise the account is listed page by page. The
    /// profile-page repository, excluded names and private repositories are
    /// dropped, as are archived ones unless `include_archived` is set.
    pub async fn list_repositories(&self) -> Result<Vec<RepositorySummary>> {
        let login = self.authenticate().await?;
        info!("Authenticated as {}", login);

        self.list_showcased().await
    }

    /// [`list_repositories`](Self::list_repositories) for a caller that
    /// has already authenticated
    pub async fn list_showcased(&self) -> Result<Vec<RepositorySummary>> {
        let account = &self.config.account;
        let repos = if self.config.is_curated() {
            self.curated_repositories().await?
        } else {
            self.forge
                .list_repos(account, self.config.owner_type, self.config.max_pages)
                .await
                .map_err(|e| PortfolioError::listing(account, e))?
        };

        let listed = repos.len();
        let kept: Vec<RepositorySummary> = repos.into_iter().filter(|r| self.is_showcased(r)).collect();
        info!("Found {} repositories for {} ({} showcased)", listed, account, kept.len());

        Ok(kept)
    }

    async fn curated_repositories(&self) -> Result<Vec<RepositorySummary>> {
        let mut repos = Vec::with_capacity(self.config.sources.len());

        for source in &self.config.sources {
            match self.forge.get_repo(&self.config.account, &source.name).await {
                Ok(repo) => repos.push(repo),
                Err(e) if e.is_fatal() => return Err(PortfolioError::listing(&self.config.account, e)),
                Err(e) => warn!("Skipping {}: {}", source.name, e),
            }
        }

        Ok(repos)
    }

    fn is_showcased(&self, repo: &RepositorySummary) -> bool {
        if repo.name.eq_ignore_ascii_case(&self.config.profile_repo_name()) {
            debug!("Skipping profile repository {}", repo.name);
            return false;
        }
        if self.config.is_excluded(&repo.name) {
            debug!("Skipping excluded repository {}", repo.name);
            return false;
        }
        if repo.visibility == Visibility::Private {
            debug!("Skipping private repository {}", repo.name);
            return false;
        }
        if repo.archived && !self.config.include_archived {
            debug!("Skipping archived repository {}", repo.name);
            return false;
        }
        true
    }

    /// Fetch topics, languages, `project-info.md` and the optional extras.
    ///
    /// Only a failure reading `project-info.md` (other than absence) is
    /// returned; the caller skips the repository in that case.
    pub async fn fetch(&self, repo: &RepositorySummary) -> ForgeResult<FetchedRepository> {
        let account = &self.config.account;
        let mut repository = repo.clone();

        repository.topics = match self.forge.get_topics(account, &repo.name).await {
            Ok(topics) => topics,
            Err(e) => {
                warn!("{}: could not fetch topics: {}", repo.name, e);
                Vec::new()
            }
        };

        repository.languages = match self.forge.get_languages(account, &repo.name).await {
            Ok(languages) => languages,
            Err(e) => {
                warn!("{}: could not fetch languages: {}", repo.name, e);
                Vec::new()
            }
        };

        let project_info = self
            .forge
            .get_file(account, &repo.name, PROJECT_INFO_FILE)
            .await?;
        if project_info.is_none() {
            debug!("{}: no {}", repo.name, PROJECT_INFO_FILE);
        }

        let readme = if self.config.fetch_readme {
            match self.forge.get_readme(account, &repo.name).await {
                Ok(readme) => readme,
                Err(e) => {
                    warn!("{}: could not fetch README: {}", repo.name, e);
                    None
                }
            }
        } else {
            None
        };

        let screenshot = if self.config.probe_screenshots {
            self.find_screenshot(&repo.name).await
        } else {
            None
        };

        Ok(FetchedRepository {
            repository,
            project_info,
            readme,
            screenshot,
        })
    }

    async fn find_screenshot(&self, repo_name: &str) -> Option<String> {
        for candidate in SCREENSHOT_CANDIDATES {
            match self.forge.path_exists(&self.config.account, repo_name, candidate).await {
                Ok(true) => {
                    debug!("{}: found screenshot at {}", repo_name, candidate);
                    return Some((*candidate).to_string());
                }
                Ok(false) => {}
                Err(e) => {
                    warn!("{}: screenshot probe failed: {}", repo_name, e);
                    return None;
                }
            }
        }
        None
    }
}
