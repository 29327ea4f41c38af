//! Check command - Verify credentials, API access and output directories
//!
//! `portfolio-sync check`
//!
//! Runs each step in order and reports it as passed or failed. Network
//! steps are skipped once authentication fails.

use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::adapters::ForgePort;
use crate::config::PortfolioConfig;
use crate::services::MetadataService;
use crate::storage::paths::parent_dir;
use crate::templates::PROJECT_INFO_FILE;
use crate::types::RepositorySummary;

const PROBE_FILE: &str = ".portfolio-sync-probe";

/// Result of one check step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckStep {
    pub name: String,
    pub passed: bool,
    pub detail: String,
}

impl CheckStep {
    fn pass(name: &str, detail: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            detail: detail.into(),
        }
    }

    fn fail(name: &str, detail: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            detail: detail.into(),
        }
    }
}

/// All steps of a check run
#[derive(Debug, Default)]
pub struct CheckReport {
    pub steps: Vec<CheckStep>,
}

impl CheckReport {
    pub fn all_passed(&self) -> bool {
        self.steps.iter().all(|s| s.passed)
    }

    pub fn step(&self, name: &str) -> Option<&CheckStep> {
        self.steps.iter().find(|s| s.name == name)
    }

    /// Format as human-readable string
    pub fn format(&self) -> String {
        let mut lines: Vec<String> = self
            .steps
            .iter()
            .map(|s| {
                let symbol = if s.passed { "✓" } else { "✗" };
                format!("  {} {}: {}", symbol, s.name, s.detail)
            })
            .collect();

        lines.push(String::new());
        lines.push(if self.all_passed() {
            "All checks passed.".to_string()
        } else {
            "Some checks failed.".to_string()
        });

        lines.join("\n")
    }
}

/// Run every diagnostic step
pub async fn check(forge: Arc<dyn ForgePort>, config: &PortfolioConfig) -> CheckReport {
    let mut report = CheckReport::default();

    if let Err(e) = config.validate() {
        report.steps.push(CheckStep::fail("config", e.to_string()));
        return report;
    }
    report
        .steps
        .push(CheckStep::pass("config", format!("account {}", config.account)));

    let metadata = MetadataService::new(forge.clone(), config.clone());
    match metadata.authenticate().await {
        Ok(login) => report
            .steps
            .push(CheckStep::pass("authentication", format!("authenticated as {}", login))),
        Err(e) => {
            report.steps.push(CheckStep::fail("authentication", e.to_string()));
            return report;
        }
    }

    report.steps.push(match metadata.list_showcased().await {
        Ok(repos) => CheckStep::pass(
            "listing",
            format!("{} repositories: {}", repos.len(), repo_names(&repos).join(", ")),
        ),
        Err(e) => CheckStep::fail("listing", e.to_string()),
    });

    report
        .steps
        .push(check_writable("media directory", &config.media_root).await);
    let output_dir = parent_dir(&config.output_path).unwrap_or_else(|| Path::new("."));
    report
        .steps
        .push(check_writable("output directory", output_dir).await);

    if let Some(probe) = &config.probe_repo {
        report.steps.push(check_probe_repo(forge.as_ref(), config, probe).await);
    }

    report
}

/// Create `dir` if needed, then write and remove a probe file
async fn check_writable(name: &str, dir: &Path) -> CheckStep {
    if let Err(e) = tokio::fs::create_dir_all(dir).await {
        return CheckStep::fail(name, format!("cannot create {}: {}", dir.display(), e));
    }

    let probe = dir.join(PROBE_FILE);
    if let Err(e) = tokio::fs::write(&probe, b"ok").await {
        return CheckStep::fail(name, format!("{} is not writable: {}", dir.display(), e));
    }
    if let Err(e) = tokio::fs::remove_file(&probe).await {
        debug!("Could not remove {}: {}", probe.display(), e);
    }

    CheckStep::pass(name, format!("{} is writable", dir.display()))
}

fn repo_names(repos: &[RepositorySummary]) -> Vec<&str> {
    repos.iter().map(|r| r.name.as_str()).collect()
}

async fn check_probe_repo(forge: &dyn ForgePort, config: &PortfolioConfig, repo: &str) -> CheckStep {
    let name = "probe repository";

    match forge.repo_exists(&config.account, repo).await {
        Ok(true) => {}
        Ok(false) => return CheckStep::fail(name, format!("{} not found", repo)),
        Err(e) => return CheckStep::fail(name, format!("{}: {}", repo, e)),
    }

    match forge.get_file(&config.account, repo, PROJECT_INFO_FILE).await {
        Ok(Some(_)) => CheckStep::pass(name, format!("{} has {}", repo, PROJECT_INFO_FILE)),
        Ok(None) => CheckStep::pass(
            name,
            format!("{} has no {} (a default will be synthesized)", repo, PROJECT_INFO_FILE),
        ),
        Err(e) => CheckStep::fail(name, format!("{}: {}", repo, e)),
    }
}
