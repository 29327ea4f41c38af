//! Output records written for the website

use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{
    Category, LinkEntry, MediaEntry, ProjectSource, ProjectStatus, RepositorySummary,
    TechStack, ValidatedProject,
};

/// One showcased project, as consumed by the portfolio page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioEntry {
    pub id: String,
    pub title: String,
    pub description: String,
    pub long_description: String,
    pub image_url: String,
    pub category: Category,
    pub tech_stack: TechStack,
    pub technologies: Vec<String>,
    pub tags: Vec<String>,
    pub features: Vec<String>,
    pub media: Vec<MediaEntry>,
    pub links: Vec<LinkEntry>,
    pub year: i32,
    pub start_date: NaiveDate,
    pub status: ProjectStatus,
    /// Live-site URL
    pub link: String,
    pub github_url: String,
    pub pages_url: String,
    pub repo_name: String,
    pub stars: u32,
    pub last_update: DateTime<Utc>,
    pub priority: u32,
    pub is_template: bool,
}

/// Pre-flattening view of one repository, written to the test output
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntermediateRecord {
    pub repository: RepositorySummary,
    pub project: ValidatedProject,
    pub organized_stack: TechStack,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readme_excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot_path: Option<String>,
}

impl IntermediateRecord {
    pub fn source(&self) -> ProjectSource {
        self.project.source
    }
}
