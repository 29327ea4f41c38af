//! MediaMirror - copies referenced images into the site's media directory
//!
//! Layout: `<media_root>/<repo>/<file>` on disk, served as
//! `/<media_root name>/<repo>/<file>`. A file already on disk is never
//! fetched again, so repeated runs only rewrite URLs.

use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::adapters::{ForgeError, ForgePort};
use crate::config::PortfolioConfig;
use crate::storage::PortfolioPaths;
use crate::types::{MediaEntry, ProjectRecord, RepositorySummary};

/// `imageUrl` of projects without any image
pub const PLACEHOLDER_IMAGE: &str = "/portfolio-media/placeholder.png";

/// Caption given to an auto-discovered screenshot
pub const SCREENSHOT_CAPTION: &str = "Screenshot";

/// Why one media file could not be mirrored
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("cannot mirror {0}: no file name")]
    NoFileName(String),

    #[error("cannot mirror inline data URL")]
    InlineData,

    #[error("download failed: {0}")]
    Download(#[from] ForgeError),

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub struct MediaMirror {
    forge: Arc<dyn ForgePort>,
    paths: PortfolioPaths,
    config: PortfolioConfig,
}

impl MediaMirror {
    pub fn new(forge: Arc<dyn ForgePort>, paths: PortfolioPaths, config: PortfolioConfig) -> Self {
        Self { forge, paths, config }
    }

    /// Mirror every image of `record`, rewriting URLs in place.
    ///
    /// Without declared images, the discovered `screenshot` (a
    /// repository-relative path) is added once mirrored; a screenshot that
    /// cannot be mirrored is left out. Returns the entry's `imageUrl`.
    /// Failures on declared images keep the original URL.
    pub async fn mirror_project(
        &self,
        repo: &RepositorySummary,
        record: &mut ProjectRecord,
        screenshot: Option<&str>,
    ) -> String {
        if !record.has_images() {
            if let Some(path) = screenshot {
                match self.mirror_url(repo, path).await {
                    Ok(local) => record
                        .media
                        .push(MediaEntry::image(local).with_caption(SCREENSHOT_CAPTION)),
                    Err(e) => warn!("{}: dropping screenshot {} ({})", repo.name, path, e),
                }
            }
        }

        for entry in record.media.iter_mut().filter(|m| m.is_image()) {
            match self.mirror_url(repo, &entry.url).await {
                Ok(local) => entry.url = local,
                Err(e) => warn!("{}: keeping {} ({})", repo.name, entry.url, e),
            }
        }

        image_url(record)
    }

    /// Mirror one image URL and return its site-relative URL
    pub async fn mirror_url(&self, repo: &RepositorySummary, url: &str) -> Result<String, MediaError> {
        let prefix = format!("{}/", self.paths.site_prefix());
        if url.starts_with(&prefix) {
            return Ok(url.to_string());
        }
        if url.starts_with("data:") {
            return Err(MediaError::InlineData);
        }

        let file_name = file_name_of(url).ok_or_else(|| MediaError::NoFileName(url.to_string()))?;
        let dest = self.paths.media_file(&repo.name, &file_name);
        let site_url = self.paths.site_url(&repo.name, &file_name);

        if tokio::fs::try_exists(&dest).await.unwrap_or(false) {
            debug!("{}: {} already mirrored", repo.name, file_name);
            return Ok(site_url);
        }

        let source = self.resolve(repo, url);
        let bytes = self.forge.download(&source).await?;
        write_media(&dest, &bytes).await?;

        info!("{}: mirrored {} -> {}", repo.name, source, site_url);
        Ok(site_url)
    }

    /// Absolute download URL; relative paths point into the repository
    fn resolve(&self, repo: &RepositorySummary, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            return url.to_string();
        }
        if let Some(rest) = url.strip_prefix("//") {
            return format!("https://{}", rest);
        }
        let relative = url.trim_start_matches("./").trim_start_matches('/');
        format!(
            "{}/{}",
            self.config.raw_content_base(&repo.name, &repo.default_branch),
            relative
        )
    }
}

/// First image URL of a record, or the placeholder
pub fn image_url(record: &ProjectRecord) -> String {
    record
        .first_image()
        .map_or_else(|| PLACEHOLDER_IMAGE.to_string(), |m| m.url.clone())
}

/// Last path segment without query string or fragment
fn file_name_of(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let name = path.trim_end_matches('/').rsplit('/').next().unwrap_or_default();
    let name = urlencoding::decode(name).map_or_else(|_| name.to_string(), |n| n.into_owned());

    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        None
    } else {
        Some(name)
    }
}

async fn write_media(dest: &Path, bytes: &[u8]) -> Result<(), MediaError> {
    let write_error = |source| MediaError::Write {
        path: dest.display().to_string(),
        source,
    };

    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(write_error)?;
    }
    if let Err(e) = tokio::fs::write(dest, bytes).await {
        let _ = tokio::fs::remove_file(dest).await;
        return Err(write_error(e));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MockForge;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    const SHOT_URL: &str = "https://raw.githubusercontent.com/me/geo-tool/main/docs/screenshot.png";

    fn mirror(forge: &MockForge, dir: &TempDir) -> MediaMirror {
        let mut config = PortfolioConfig::for_account("me");
        config.media_root = dir.path().join("portfolio-media");
        config.output_path = dir.path().join("data/portfolio-data.json");
        let paths = PortfolioPaths::from_config(&config);
        MediaMirror::new(Arc::new(forge.clone()), paths, config)
    }

    fn record(media: Vec<MediaEntry>) -> ProjectRecord {
        ProjectRecord {
            title: "Geo Tool".to_string(),
            description: "A GIS utility".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            status: Default::default(),
            long_description: String::new(),
            technologies: Vec::new(),
            tags: Vec::new(),
            features: Vec::new(),
            media,
            links: Vec::new(),
            tech_stack: None,
        }
    }

    #[test]
    fn test_file_name_of() {
        assert_eq!(file_name_of("https://x/a/shot.png?raw=true").as_deref(), Some("shot.png"));
        assert_eq!(file_name_of("docs/my%20shot.png").as_deref(), Some("my shot.png"));
        assert_eq!(file_name_of(""), None);
        assert_eq!(file_name_of("../.."), None);
    }

    #[tokio::test]
    async fn test_relative_screenshot_is_mirrored() {
        let dir = TempDir::new().unwrap();
        let forge = MockForge::new().with_download(SHOT_URL, b"png-bytes".to_vec());
        let mirror = mirror(&forge, &dir);
        let repo = RepositorySummary::new("geo-tool");

        let mut project = record(Vec::new());
        let image = mirror
            .mirror_project(&repo, &mut project, Some("docs/screenshot.png"))
            .await;

        assert_eq!(image, "/portfolio-media/geo-tool/screenshot.png");
        assert_eq!(project.media.len(), 1);
        assert_eq!(project.media[0].caption.as_deref(), Some(SCREENSHOT_CAPTION));
        let on_disk = std::fs::read(dir.path().join("portfolio-media/geo-tool/screenshot.png")).unwrap();
        assert_eq!(on_disk, b"png-bytes");
    }

    #[tokio::test]
    async fn test_second_run_fetches_nothing() {
        let dir = TempDir::new().unwrap();
        let forge = MockForge::new().with_download(SHOT_URL, b"png-bytes".to_vec());
        let mirror = mirror(&forge, &dir);
        let repo = RepositorySummary::new("geo-tool");

        let mut first = record(vec![MediaEntry::image(SHOT_URL)]);
        mirror.mirror_project(&repo, &mut first, None).await;
        assert_eq!(forge.download_count(), 1);

        forge.clear_calls();
        let mut second = record(vec![MediaEntry::image(SHOT_URL)]);
        mirror.mirror_project(&repo, &mut second, None).await;

        assert_eq!(forge.download_count(), 0);
        assert_eq!(first, second);
        let on_disk = std::fs::read(dir.path().join("portfolio-media/geo-tool/screenshot.png")).unwrap();
        assert_eq!(on_disk, b"png-bytes");
    }

    #[tokio::test]
    async fn test_failed_download_keeps_url() {
        let dir = TempDir::new().unwrap();
        let forge = MockForge::new();
        let mirror = mirror(&forge, &dir);
        let repo = RepositorySummary::new("geo-tool");

        let url = "https://example.com/missing.png";
        let mut project = record(vec![MediaEntry::image(url)]);
        let image = mirror.mirror_project(&repo, &mut project, None).await;

        assert_eq!(image, url);
        assert!(!dir.path().join("portfolio-media/geo-tool/missing.png").exists());
    }

    #[tokio::test]
    async fn test_unmirrored_screenshot_falls_back_to_placeholder() {
        let dir = TempDir::new().unwrap();
        let forge = MockForge::new();
        let mirror = mirror(&forge, &dir);
        let repo = RepositorySummary::new("geo-tool");

        let mut project = record(Vec::new());
        let image = mirror
            .mirror_project(&repo, &mut project, Some("docs/screenshot.png"))
            .await;

        assert_eq!(image, PLACEHOLDER_IMAGE);
        assert!(project.media.is_empty());
        assert_eq!(forge.download_count(), 1);
    }

    #[tokio::test]
    async fn test_declared_images_win_over_screenshot() {
        let dir = TempDir::new().unwrap();
        let forge = MockForge::new();
        let mirror = mirror(&forge, &dir);
        let repo = RepositorySummary::new("geo-tool");

        let mut project = record(vec![MediaEntry::image("/portfolio-media/geo-tool/hero.png")]);
        let image = mirror
            .mirror_project(&repo, &mut project, Some("docs/screenshot.png"))
            .await;

        assert_eq!(image, "/portfolio-media/geo-tool/hero.png");
        assert_eq!(project.media.len(), 1);
        assert_eq!(forge.download_count(), 0);
    }

    #[tokio::test]
    async fn test_no_images_gives_placeholder() {
        let dir = TempDir::new().unwrap();
        let forge = MockForge::new();
        let mirror = mirror(&forge, &dir);
        let mut project = record(vec![MediaEntry {
            kind: "video".to_string(),
            url: "https://example.com/demo.mp4".to_string(),
            caption: None,
        }]);

        let image = mirror
            .mirror_project(&RepositorySummary::new("r"), &mut project, None)
            .await;
        assert_eq!(image, PLACEHOLDER_IMAGE);
        assert_eq!(forge.download_count(), 0);
    }
}
