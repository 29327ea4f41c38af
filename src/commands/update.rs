//! Update command - Rebuild the portfolio data file
//!
//! `portfolio-sync update`
//!
//! This command:
//! 1. Authenticates and lists the account's repositories
//! 2. Fetches metadata and validates `project-info.md` per repository
//! 3. Classifies, organizes and mirrors media
//! 4. Orders the entries and replaces the output file
//!
//! A repository that fails is logged and left out; only authentication and
//! the initial listing abort the run.

use chrono::{Local, NaiveDate};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::adapters::ForgePort;
use crate::config::PortfolioConfig;
use crate::error::{PortfolioError, Result};
use crate::services::{
    build_entry, organize, readme_excerpt, sort_entries, write_intermediate, write_portfolio,
    EntryParts, MediaMirror, MetadataService, ProjectValidator,
};
use crate::storage::PortfolioPaths;
use crate::types::{IntermediateRecord, PortfolioEntry, ProjectSource};

/// Options for the update command
#[derive(Debug, Clone)]
pub struct UpdateOptions {
    /// Date used for defaulted start dates
    pub today: NaiveDate,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self {
            today: Local::now().date_naive(),
        }
    }
}

impl UpdateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }
}

/// A repository left out of the output
#[derive(Debug, Clone)]
pub struct SkippedRepo {
    pub name: String,
    pub reason: String,
}

/// Outcome of one update run
#[derive(Debug)]
pub struct UpdateReport {
    /// Entries written, in output order
    pub entries: Vec<PortfolioEntry>,

    pub skipped: Vec<SkippedRepo>,

    /// Repositories whose record needed at least one default
    pub defaulted: Vec<String>,

    pub output_path: PathBuf,
}

impl UpdateReport {
    /// Format as human-readable string
    pub fn format(&self) -> String {
        let mut lines = vec![format!(
            "Wrote {} projects to {}",
            self.entries.len(),
            self.output_path.display()
        )];

        for entry in &self.entries {
            lines.push(format!("  ✓ {} ({})", entry.repo_name, entry.category));
        }
        for skipped in &self.skipped {
            lines.push(format!("  ✗ {}: {}", skipped.name, skipped.reason));
        }
        if !self.defaulted.is_empty() {
            lines.push(String::new());
            lines.push(format!(
                "Defaults applied for: {}",
                self.defaulted.join(", ")
            ));
        }

        lines.join("\n")
    }
}

/// Run the full pipeline and replace the output file
pub async fn update(
    forge: Arc<dyn ForgePort>,
    config: &PortfolioConfig,
    options: UpdateOptions,
) -> Result<UpdateReport> {
    config.validate()?;

    let paths = PortfolioPaths::from_config(config);
    let metadata = MetadataService::new(forge.clone(), config.clone());
    let repos = metadata.list_repositories().await?;

    paths
        .ensure_dirs()
        .await
        .map_err(|source| PortfolioError::Output {
            path: paths.media_root.display().to_string(),
            source,
        })?;

    let validator = ProjectValidator::new(&config.account, options.today);
    let mirror = MediaMirror::new(forge, paths.clone(), config.clone());

    let mut entries = Vec::with_capacity(repos.len());
    let mut intermediates = Vec::with_capacity(repos.len());
    let mut skipped = Vec::new();
    let mut defaulted = Vec::new();

    for (index, repo) in repos.iter().enumerate() {
        info!("Processing {}", repo.name);
        let discovery_index = u32::try_from(index + 1).unwrap_or(u32::MAX);

        let fetched = match metadata.fetch(repo).await {
            Ok(fetched) => fetched,
            Err(e) if e.is_fatal() => return Err(PortfolioError::fatal(e)),
            Err(e) => {
                warn!("Skipping {}: {}", repo.name, e);
                skipped.push(SkippedRepo {
                    name: repo.name.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let repository = fetched.repository;
        let mut project = validator.resolve(&repository, fetched.project_info.as_deref());
        if !project.defaulted_fields.is_empty() && project.source != ProjectSource::Synthesized {
            defaulted.push(repository.name.clone());
        }

        let excerpt = fetched.readme.as_deref().and_then(readme_excerpt);
        if project.source == ProjectSource::Synthesized {
            if let Some(excerpt) = &excerpt {
                project.record.long_description = excerpt.clone();
            }
        }

        let organized = organize(&repository.languages, &repository.topics);
        let image_url = mirror
            .mirror_project(&repository, &mut project.record, fetched.screenshot.as_deref())
            .await;

        entries.push(build_entry(
            config,
            EntryParts {
                repository: &repository,
                project: &project,
                organized_stack: &organized,
                image_url,
                discovery_index,
            },
        ));
        intermediates.push(IntermediateRecord {
            repository,
            project,
            organized_stack: organized,
            readme_excerpt: excerpt,
            screenshot_path: fetched.screenshot,
        });
    }

    sort_entries(&mut entries, config.effective_ordering());
    write_portfolio(&paths, &entries).await?;
    write_intermediate(&paths, &intermediates).await?;

    info!(
        "Update complete: {} written, {} skipped",
        entries.len(),
        skipped.len()
    );

    Ok(UpdateReport {
        entries,
        skipped,
        defaulted,
        output_path: paths.output_file,
    })
}
