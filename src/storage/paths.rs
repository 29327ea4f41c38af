use std::path::{Path, PathBuf};

use crate::config::PortfolioConfig;

/// Manages all filesystem paths written by a run
#[derive(Debug, Clone)]
pub struct PortfolioPaths {
    pub media_root: PathBuf,
    pub output_file: PathBuf,
    pub test_output_file: Option<PathBuf>,
}

impl PortfolioPaths {
    pub fn from_config(config: &PortfolioConfig) -> Self {
        Self {
            media_root: config.media_root.clone(),
            output_file: config.output_path.clone(),
            test_output_file: config.test_output_path.clone(),
        }
    }

    /// Create directories if they don't exist
    pub async fn ensure_dirs(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.media_root).await?;
        if let Some(parent) = parent_dir(&self.output_file) {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Per-repository media directory
    pub fn media_dir(&self, repo_name: &str) -> PathBuf {
        self.media_root.join(repo_name)
    }

    /// Local destination of one media file
    pub fn media_file(&self, repo_name: &str, file_name: &str) -> PathBuf {
        self.media_dir(repo_name).join(file_name)
    }

    /// Site-relative prefix for media, e.g. `/portfolio-media`
    pub fn site_prefix(&self) -> String {
        let name = self
            .media_root
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("portfolio-media");
        format!("/{}", name)
    }

    /// Site-relative URL of one media file
    pub fn site_url(&self, repo_name: &str, file_name: &str) -> String {
        format!("{}/{}/{}", self.site_prefix(), repo_name, file_name)
    }
}

/// Parent directory, `None` for bare file names
pub(crate) fn parent_dir(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}
