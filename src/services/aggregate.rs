//! Portfolio entry assembly, ordering and output

use tracing::info;

use super::classify::classify;
use super::validator::display_year;
use crate::config::PortfolioConfig;
use crate::error::{PortfolioError, Result};
use crate::storage::{write_json_atomic, PortfolioPaths};
use crate::types::repo::dedup_preserving;
use crate::types::{
    IntermediateRecord, Ordering, PortfolioEntry, ProjectRecord, RepositorySummary, TechStack,
    ValidatedProject,
};

/// Link kinds that point at a running instance of the project
const LIVE_LINK_KINDS: [&str; 5] = ["demo", "live", "website", "site", "app"];

/// Topic marking a repository as a starter template
const TEMPLATE_TOPIC: &str = "template";

/// One repository's resolved pieces, ready to flatten
#[derive(Debug, Clone)]
pub struct EntryParts<'a> {
    pub repository: &'a RepositorySummary,
    pub project: &'a ValidatedProject,
    /// Stack derived from languages and topics
    pub organized_stack: &'a TechStack,
    /// `imageUrl` after media mirroring
    pub image_url: String,
    /// 1-based position in the listing
    pub discovery_index: u32,
}

/// Flatten one repository into its portfolio entry
pub fn build_entry(config: &PortfolioConfig, parts: EntryParts<'_>) -> PortfolioEntry {
    let repo = parts.repository;
    let record = &parts.project.record;
    let source = config.source(&repo.name);

    let tech_stack = effective_stack(record.tech_stack.as_ref(), parts.organized_stack);

    let category = source.and_then(|s| s.category).unwrap_or_else(|| {
        classify(&tech_stack, &repo.topics, repo.description_or_empty())
    });

    let technologies = dedup_preserving(
        record
            .technologies
            .iter()
            .cloned()
            .chain(tech_stack.flatten()),
    );

    let extra_tags = source.map(|s| s.tags.as_slice()).unwrap_or_default();
    let tags = dedup_preserving(
        record
            .tags
            .iter()
            .chain(&repo.topics)
            .chain(extra_tags)
            .cloned(),
    );

    let pages_url = config.pages_url(&repo.name);
    let link = live_link(record, repo).unwrap_or_else(|| pages_url.clone());

    PortfolioEntry {
        id: repo.name.clone(),
        title: record.title.clone(),
        description: record.description.clone(),
        long_description: record.long_description.clone(),
        image_url: parts.image_url,
        category,
        tech_stack,
        technologies,
        tags,
        features: record.features.clone(),
        media: record.media.clone(),
        links: record.links.clone(),
        year: display_year(record),
        start_date: record.start_date,
        status: record.status,
        link,
        github_url: repo.html_url.clone(),
        pages_url,
        repo_name: repo.name.clone(),
        stars: repo.stars,
        last_update: repo.updated_at,
        priority: source.and_then(|s| s.priority).unwrap_or(parts.discovery_index),
        is_template: is_template(repo),
    }
}

/// Declared stack when it names anything, otherwise the organized one
pub fn effective_stack(declared: Option<&TechStack>, organized: &TechStack) -> TechStack {
    match declared.filter(|s| !s.is_empty()) {
        Some(stack) => stack.normalized(),
        None => organized.clone(),
    }
}

/// Template repositories are flagged on the forge or carry the `template` topic
pub fn is_template(repo: &RepositorySummary) -> bool {
    repo.is_template || repo.has_topic(TEMPLATE_TOPIC)
}

fn live_link(record: &ProjectRecord, repo: &RepositorySummary) -> Option<String> {
    record
        .links
        .iter()
        .find(|l| LIVE_LINK_KINDS.iter().any(|k| l.kind.eq_ignore_ascii_case(k)))
        .map(|l| l.url.clone())
        .or_else(|| {
            repo.homepage
                .as_deref()
                .map(str::trim)
                .filter(|h| !h.is_empty())
                .map(str::to_string)
        })
}

/// Order entries for display
pub fn sort_entries(entries: &mut [PortfolioEntry], ordering: Ordering) {
    match ordering {
        Ordering::Priority => entries.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| a.repo_name.cmp(&b.repo_name))
        }),
        Ordering::Recency => entries.sort_by(|a, b| {
            b.last_update
                .cmp(&a.last_update)
                .then_with(|| a.repo_name.cmp(&b.repo_name))
        }),
    }
}

/// Replace the portfolio file with `entries`
pub async fn write_portfolio(paths: &PortfolioPaths, entries: &[PortfolioEntry]) -> Result<()> {
    write_json_atomic(&paths.output_file, entries)
        .await
        .map_err(|source| PortfolioError::Output {
            path: paths.output_file.display().to_string(),
            source,
        })?;
    info!(
        "Wrote {} entries to {}",
        entries.len(),
        paths.output_file.display()
    );
    Ok(())
}

/// Write intermediate records when a test output path is configured
pub async fn write_intermediate(paths: &PortfolioPaths, records: &[IntermediateRecord]) -> Result<()> {
    let Some(path) = &paths.test_output_file else {
        return Ok(());
    };
    write_json_atomic(path, records)
        .await
        .map_err(|source| PortfolioError::Output {
            path: path.display().to_string(),
            source,
        })?;
    info!("Wrote {} intermediate records to {}", records.len(), path.display());
    Ok(())
}
