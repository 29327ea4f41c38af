//! Core types for portfolio-sync

pub mod entry;
pub mod project;
pub mod repo;
pub mod tech_stack;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use entry::{IntermediateRecord, PortfolioEntry};
pub use project::{LinkEntry, MediaEntry, ProjectRecord, ProjectSource, ValidatedProject};
pub use repo::RepositorySummary;
pub use tech_stack::{TechCategory, TechStack};

/// Repository visibility
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

/// Whether the account name refers to a user account or an organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnerType {
    User,
    /// Organization listing, falling back to the user listing on 404
    #[default]
    Org,
}

/// Portfolio category shown by the site's filter bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Map,
    Visualization,
    Analysis,
    Tool,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Map,
        Category::Visualization,
        Category::Analysis,
        Category::Tool,
        Category::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Map => "map",
            Category::Visualization => "visualization",
            Category::Analysis => "analysis",
            Category::Tool => "tool",
            Category::Other => "other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

/// Project lifecycle status declared in front matter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Active,
    Ongoing,
    Archived,
    Completed,
}

impl std::str::FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(ProjectStatus::Active),
            "ongoing" => Ok(ProjectStatus::Ongoing),
            "archived" => Ok(ProjectStatus::Archived),
            "completed" => Ok(ProjectStatus::Completed),
            _ => Err(format!("Unknown status: {}", s)),
        }
    }
}

/// Collection ordering used by the writer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ordering {
    /// Descending last-update timestamp
    #[default]
    Recency,
    /// Ascending explicit priority
    Priority,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_str_is_case_insensitive() {
        assert_eq!("MAP".parse::<Category>().unwrap(), Category::Map);
        assert_eq!(" tool ".parse::<Category>().unwrap(), Category::Tool);
        assert!("games".parse::<Category>().is_err());
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("Completed".parse::<ProjectStatus>().unwrap(), ProjectStatus::Completed);
        assert!("wip".parse::<ProjectStatus>().is_err());
    }

    #[test]
    fn test_category_serializes_lowercase() {
        let json = serde_json::to_string(&Category::Visualization).unwrap();
        assert_eq!(json, "\"visualization\"");
    }
}
