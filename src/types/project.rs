//! Project description read from `project-info.md`

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{ProjectStatus, TechStack};

/// A media item attached to a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MediaEntry {
    /// Media kind ("image", "video", ...)
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl MediaEntry {
    pub fn image(url: impl Into<String>) -> Self {
        Self {
            kind: "image".to_string(),
            url: url.into(),
            caption: None,
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn is_image(&self) -> bool {
        self.kind.eq_ignore_ascii_case("image")
    }
}

/// An external link attached to a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LinkEntry {
    /// Link kind ("demo", "docs", ...)
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Fully validated project metadata: every field present and typed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub title: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub status: ProjectStatus,
    pub long_description: String,
    pub technologies: Vec<String>,
    pub tags: Vec<String>,
    pub features: Vec<String>,
    pub media: Vec<MediaEntry>,
    pub links: Vec<LinkEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tech_stack: Option<TechStack>,
}

impl ProjectRecord {
    /// First image in the media list
    pub fn first_image(&self) -> Option<&MediaEntry> {
        self.media.iter().find(|m| m.is_image())
    }

    pub fn has_images(&self) -> bool {
        self.first_image().is_some()
    }
}

/// Which branch of the front-matter fallback chain produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectSource {
    /// `project-info.md` was present and its front matter parsed
    Parsed,
    /// No `project-info.md`; the default template was rendered
    Synthesized,
    /// `project-info.md` was present but its front matter was unusable
    Defaulted,
}

/// Validator output: the record plus how it was obtained
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedProject {
    pub record: ProjectRecord,
    pub source: ProjectSource,
    /// Required fields that were filled with defaults
    pub defaulted_fields: Vec<String>,
}

impl ValidatedProject {
    pub fn was_defaulted(&self, field: &str) -> bool {
        self.defaulted_fields.iter().any(|f| f == field)
    }
}
