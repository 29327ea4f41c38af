//! Repository snapshot taken from the hosting API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Visibility;

/// Immutable per-run snapshot of one hosted repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySummary {
    /// Repository name (without owner prefix)
    pub name: String,

    /// Repository description
    pub description: Option<String>,

    /// Declared topics, duplicate-free
    #[serde(default)]
    pub topics: Vec<String>,

    /// Detected languages, largest first
    #[serde(default)]
    pub languages: Vec<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Repository visibility (public/private)
    pub visibility: Visibility,

    #[serde(default)]
    pub archived: bool,

    #[serde(default)]
    pub fork: bool,

    /// Marked as a template repository on the forge
    #[serde(default)]
    pub is_template: bool,

    pub default_branch: String,

    /// Web URL of the repository
    pub html_url: String,

    /// Homepage declared in the repository settings
    pub homepage: Option<String>,

    #[serde(default)]
    pub stars: u32,
}

impl RepositorySummary {
    /// Create a snapshot with the given name and timestamps set to now
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let now = Utc::now();
        Self {
            html_url: format!("https://github.com/{}", name),
            name,
            description: None,
            topics: Vec::new(),
            languages: Vec::new(),
            created_at: now,
            updated_at: now,
            visibility: Visibility::Public,
            archived: false,
            fork: false,
            is_template: false,
            default_branch: "main".to_string(),
            homepage: None,
            stars: 0,
        }
    }

    /// Set repository description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set topics, dropping duplicates while keeping first occurrence
    pub fn with_topics<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.topics = dedup_preserving(topics.into_iter().map(Into::into));
        self
    }

    /// Set languages, dropping duplicates while keeping first occurrence
    pub fn with_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.languages = dedup_preserving(languages.into_iter().map(Into::into));
        self
    }

    /// Set the last-update timestamp
    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = updated_at;
        self
    }

    /// Set repository visibility
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Mark as archived
    pub fn with_archived(mut self, archived: bool) -> Self {
        self.archived = archived;
        self
    }

    /// Mark as template repository
    pub fn with_template(mut self, is_template: bool) -> Self {
        self.is_template = is_template;
        self
    }

    /// Set the homepage
    pub fn with_homepage(mut self, homepage: impl Into<String>) -> Self {
        self.homepage = Some(homepage.into());
        self
    }

    /// Description or empty string
    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// Whether any topic equals `topic`, ignoring case
    pub fn has_topic(&self, topic: &str) -> bool {
        self.topics.iter().any(|t| t.eq_ignore_ascii_case(topic))
    }
}

/// Keep the first occurrence of each string, comparing case-insensitively
pub(crate) fn dedup_preserving(items: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items {
        let trimmed = item.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !out.iter().any(|existing| existing.eq_ignore_ascii_case(trimmed)) {
            out.push(trimmed.to_string());
        }
    }
    out
}
