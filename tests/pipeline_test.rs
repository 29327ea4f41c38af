//! End-to-end update runs against an in-memory forge

use chrono::{NaiveDate, TimeZone, Utc};
use portfolio_sync::adapters::{MockCall, MockError, MockForge};
use portfolio_sync::commands::{update, UpdateOptions};
use portfolio_sync::config::{PortfolioConfig, SourceRepo};
use portfolio_sync::services::PLACEHOLDER_IMAGE;
use portfolio_sync::types::{Category, IntermediateRecord, PortfolioEntry, ProjectSource, TechCategory};
use portfolio_sync::PortfolioError;
use std::sync::Arc;
use tempfile::TempDir;

const SHOT_URL: &str = "https://raw.githubusercontent.com/me/charts/main/screenshot.png";

fn config(dir: &TempDir) -> PortfolioConfig {
    let mut config = PortfolioConfig::for_account("me");
    config.media_root = dir.path().join("public/portfolio-media");
    config.output_path = dir.path().join("public/data/portfolio-data.json");
    config
}

fn options() -> UpdateOptions {
    UpdateOptions::new().with_today(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
}

fn geo_tool() -> portfolio_sync::RepositorySummary {
    portfolio_sync::RepositorySummary::new("geo-tool")
        .with_description("A GIS utility")
        .with_topics(["gis", "template"])
        .with_updated_at(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
}

fn charts() -> portfolio_sync::RepositorySummary {
    portfolio_sync::RepositorySummary::new("charts")
        .with_description("Interactive charts")
        .with_topics(["gis"])
        .with_updated_at(Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap())
}

fn read_output(config: &PortfolioConfig) -> Vec<PortfolioEntry> {
    let text = std::fs::read_to_string(&config.output_path).unwrap();
    serde_json::from_str(&text).unwrap()
}

#[tokio::test]
async fn test_geo_tool_is_synthesized_map_template() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);
    let forge = MockForge::new()
        .with_repo(geo_tool())
        .with_languages("geo-tool", vec!["JavaScript", "HTML"]);

    let report = update(Arc::new(forge), &config, options()).await.unwrap();
    assert_eq!(report.entries.len(), 1);
    assert!(report.skipped.is_empty());

    let entries = read_output(&config);
    let entry = &entries[0];
    assert_eq!(entry.id, "geo-tool");
    assert_eq!(entry.title, "geo-tool");
    assert_eq!(entry.description, "A GIS utility");
    assert_eq!(entry.category, Category::Map);
    assert!(entry.is_template);
    assert_eq!(entry.image_url, PLACEHOLDER_IMAGE);
    assert!(entry
        .tech_stack
        .bucket(TechCategory::Deployment)
        .contains(&"GitHub Pages".to_string()));
    assert_eq!(entry.start_date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
    assert_eq!(entry.link, "https://me.github.io/geo-tool/");
}

#[tokio::test]
async fn test_declared_visualization_stack_beats_gis_topic() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);
    let forge = MockForge::new().with_repo(charts()).with_file(
        "charts",
        "project-info.md",
        "---\ntitle: Charts\ndescription: Interactive charts\nstartDate: 2022-06-01\n\
         techStack:\n  visualization: [D3]\n---\n# Charts\n",
    );

    update(Arc::new(forge), &config, options()).await.unwrap();

    let entries = read_output(&config);
    assert_eq!(entries[0].category, Category::Visualization);
    assert_eq!(entries[0].title, "Charts");
    assert_eq!(entries[0].year, 2022);
}

#[tokio::test]
async fn test_recency_ordering_and_profile_repo_excluded() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);
    let forge = MockForge::new()
        .with_repo(geo_tool())
        .with_repo(portfolio_sync::RepositorySummary::new("me.github.io"))
        .with_repo(charts());

    update(Arc::new(forge), &config, options()).await.unwrap();

    let ids: Vec<String> = read_output(&config).into_iter().map(|e| e.id).collect();
    assert_eq!(ids, vec!["charts", "geo-tool"]);
}

#[tokio::test]
async fn test_media_mirroring_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);
    let forge = MockForge::new()
        .with_repo(charts())
        .with_path("charts", "screenshot.png")
        .with_download(SHOT_URL, b"png-bytes".to_vec());

    update(Arc::new(forge.clone()), &config, options()).await.unwrap();
    let first = std::fs::read_to_string(&config.output_path).unwrap();
    assert_eq!(forge.download_count(), 1);

    forge.clear_calls();
    update(Arc::new(forge.clone()), &config, options()).await.unwrap();
    let second = std::fs::read_to_string(&config.output_path).unwrap();

    assert_eq!(forge.download_count(), 0);
    assert_eq!(first, second);

    let entries = read_output(&config);
    assert_eq!(entries[0].image_url, "/portfolio-media/charts/screenshot.png");
    let mirrored = config.media_root.join("charts/screenshot.png");
    assert_eq!(std::fs::read(mirrored).unwrap(), b"png-bytes");
}

#[tokio::test]
async fn test_screenshot_that_cannot_be_fetched_uses_placeholder() {
    let dir = TempDir::new().unwrap();
    let mut config = config(&dir);
    config.test_output_path = Some(dir.path().join("test-output.json"));
    let forge = MockForge::new()
        .with_repo(charts())
        .with_path("charts", "docs/screenshot.png");

    update(Arc::new(forge), &config, options()).await.unwrap();

    let entries = read_output(&config);
    assert_eq!(entries[0].image_url, PLACEHOLDER_IMAGE);

    let text = std::fs::read_to_string(dir.path().join("test-output.json")).unwrap();
    let records: Vec<IntermediateRecord> = serde_json::from_str(&text).unwrap();
    assert!(records[0].project.record.media.is_empty());
    assert_eq!(records[0].screenshot_path.as_deref(), Some("docs/screenshot.png"));
}

#[tokio::test]
async fn test_failing_repository_is_skipped() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);
    let forge = MockForge::new()
        .with_repo(geo_tool())
        .with_repo(charts())
        .with_failing_repo("charts");

    let report = update(Arc::new(forge), &config, options()).await.unwrap();

    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].name, "charts");
    let ids: Vec<String> = read_output(&config).into_iter().map(|e| e.id).collect();
    assert_eq!(ids, vec!["geo-tool"]);
}

#[tokio::test]
async fn test_auth_failure_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);
    let forge = MockForge::new().with_repo(geo_tool()).without_auth();

    let err = update(Arc::new(forge.clone()), &config, options())
        .await
        .unwrap_err();

    assert!(matches!(err, PortfolioError::Authentication(_)));
    assert!(!config.output_path.exists());
    assert_eq!(forge.calls(), vec![MockCall::Authenticate]);
}

#[tokio::test]
async fn test_token_revoked_mid_run_aborts_with_plain_message() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);
    let forge = MockForge::new()
        .with_repo(geo_tool())
        .with_repo_error("geo-tool", MockError::AuthenticationFailed("token revoked".to_string()));

    let err = update(Arc::new(forge), &config, options()).await.unwrap_err();

    assert!(matches!(&err, PortfolioError::Authentication(message) if message == "token revoked"));
    assert_eq!(err.to_string(), "Authentication failed: token revoked");
    assert!(!config.output_path.exists());
}

#[tokio::test]
async fn test_unusable_front_matter_is_defaulted() {
    let dir = TempDir::new().unwrap();
    let mut config = config(&dir);
    config.test_output_path = Some(dir.path().join("test-output.json"));
    let forge = MockForge::new()
        .with_repo(charts())
        .with_file("charts", "project-info.md", "# Charts\nNo front matter here.\n");

    let report = update(Arc::new(forge), &config, options()).await.unwrap();
    assert_eq!(report.defaulted, vec!["charts"]);

    let text = std::fs::read_to_string(dir.path().join("test-output.json")).unwrap();
    let records: Vec<IntermediateRecord> = serde_json::from_str(&text).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].source(), ProjectSource::Defaulted);
    assert_eq!(records[0].project.record.title, "charts");
    assert!(records[0].project.was_defaulted("status"));
}

#[tokio::test]
async fn test_readme_fills_synthesized_long_description() {
    let dir = TempDir::new().unwrap();
    let mut config = config(&dir);
    config.fetch_readme = true;
    let forge = MockForge::new()
        .with_repo(geo_tool())
        .with_readme("geo-tool", "# Geo Tool\n\nDraws **maps** in the browser.\n");

    update(Arc::new(forge), &config, options()).await.unwrap();

    let entries = read_output(&config);
    assert_eq!(entries[0].long_description, "Draws maps in the browser.");
}

#[tokio::test]
async fn test_curated_sources_ordered_by_priority() {
    let dir = TempDir::new().unwrap();
    let mut config = config(&dir);
    let mut first = SourceRepo::new("charts");
    first.priority = Some(1);
    first.category = Some(Category::Analysis);
    let mut second = SourceRepo::new("geo-tool");
    second.priority = Some(2);
    second.tags = vec!["Featured".to_string()];
    config.sources = vec![second, first];

    let forge = MockForge::new().with_repo(geo_tool()).with_repo(charts());
    update(Arc::new(forge), &config, options()).await.unwrap();

    let entries = read_output(&config);
    let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["charts", "geo-tool"]);
    assert_eq!(entries[0].category, Category::Analysis);
    assert!(entries[1].tags.contains(&"Featured".to_string()));
}

#[tokio::test]
async fn test_output_is_replaced_not_merged() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);

    let forge = MockForge::new().with_repo(geo_tool()).with_repo(charts());
    update(Arc::new(forge), &config, options()).await.unwrap();
    assert_eq!(read_output(&config).len(), 2);

    let forge = MockForge::new().with_repo(charts());
    update(Arc::new(forge), &config, options()).await.unwrap();
    assert_eq!(read_output(&config).len(), 1);
}
