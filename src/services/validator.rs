//! Field validation and template synthesis
//!
//! Every path through this module ends in a complete `ProjectRecord`:
//! - `Parsed`: the document's front matter, gaps filled with defaults
//! - `Synthesized`: no document; the default template is rendered and validated
//! - `Defaulted`: a document exists but its front matter is unusable

use chrono::{Datelike, NaiveDate};
use serde_json::{Map, Value};
use tracing::warn;

use super::frontmatter::parse_front_matter;
use crate::templates::{default_description, render_project_info};
use crate::types::{
    LinkEntry, MediaEntry, ProjectRecord, ProjectSource, ProjectStatus, RepositorySummary,
    TechCategory, TechStack, ValidatedProject,
};

/// Required front-matter keys, in the order defaults are reported
pub const REQUIRED_FIELDS: [&str; 10] = [
    "title",
    "description",
    "startDate",
    "status",
    "longDescription",
    "technologies",
    "tags",
    "features",
    "links",
    "media",
];

pub const DEFAULT_TITLE: &str = "Untitled Project";
pub const DEFAULT_LONG_DESCRIPTION: &str = "Project documentation coming soon.";
pub const DEFAULT_TECHNOLOGY: &str = "Web";
pub const DEFAULT_TAG: &str = "Work in Progress";

/// Fills required fields; `today` is injected so output is reproducible
#[derive(Debug, Clone)]
pub struct ProjectValidator {
    account: String,
    today: NaiveDate,
}

impl ProjectValidator {
    pub fn new(account: impl Into<String>, today: NaiveDate) -> Self {
        Self {
            account: account.into(),
            today,
        }
    }

    /// Run the fallback chain for one repository.
    ///
    /// `document` is the raw `project-info.md`, or `None` when the repository
    /// has no such file.
    pub fn resolve(&self, repo: &RepositorySummary, document: Option<&str>) -> ValidatedProject {
        match document {
            Some(text) => match parse_front_matter(text) {
                Ok(front_matter) => {
                    let (record, defaulted) = self.validate(&front_matter.fields);
                    if !defaulted.is_empty() {
                        warn!(
                            "{}: missing fields will be filled with default values: {}",
                            repo.name,
                            defaulted.join(", ")
                        );
                    }
                    ValidatedProject {
                        record,
                        source: ProjectSource::Parsed,
                        defaulted_fields: defaulted,
                    }
                }
                Err(e) => {
                    warn!("{}: unusable project-info.md ({}), using defaults", repo.name, e);
                    self.defaulted(repo)
                }
            },
            None => self.synthesize(repo),
        }
    }

    /// Render the default template for `repo` and validate it
    pub fn synthesize(&self, repo: &RepositorySummary) -> ValidatedProject {
        let document = render_project_info(
            &repo.name,
            repo.description.as_deref(),
            &self.account,
            self.today,
        );

        match parse_front_matter(&document) {
            Ok(front_matter) => {
                let (record, defaulted) = self.validate(&front_matter.fields);
                ValidatedProject {
                    record,
                    source: ProjectSource::Synthesized,
                    defaulted_fields: defaulted,
                }
            }
            Err(e) => {
                warn!("{}: default template did not parse ({})", repo.name, e);
                ValidatedProject {
                    source: ProjectSource::Synthesized,
                    ..self.defaulted(repo)
                }
            }
        }
    }

    /// All-defaults record, seeded with the repository's name and description
    pub fn defaulted(&self, repo: &RepositorySummary) -> ValidatedProject {
        let mut seed = Map::new();
        seed.insert("title".to_string(), Value::String(repo.name.clone()));
        if let Some(description) = &repo.description {
            seed.insert("description".to_string(), Value::String(description.clone()));
        }
        let (record, _) = self.validate(&seed);

        ValidatedProject {
            record,
            source: ProjectSource::Defaulted,
            defaulted_fields: REQUIRED_FIELDS.iter().map(|f| (*f).to_string()).collect(),
        }
    }

    /// Coerce raw front-matter fields into a complete record.
    ///
    /// Returns the record and the names of required fields that were
    /// absent, falsy or malformed and therefore defaulted.
    pub fn validate(&self, fields: &Map<String, Value>) -> (ProjectRecord, Vec<String>) {
        let mut defaulted: Vec<String> = Vec::new();
        let mut note = |field: &str| defaulted.push(field.to_string());

        let title = text_field(fields, "title").unwrap_or_else(|| {
            note("title");
            DEFAULT_TITLE.to_string()
        });

        let description = text_field(fields, "description").unwrap_or_else(|| {
            note("description");
            default_description(&self.account)
        });

        let start_date = present(fields, "startDate")
            .and_then(parse_start_date)
            .unwrap_or_else(|| {
                note("startDate");
                self.today
            });

        let status = text_field(fields, "status")
            .and_then(|s| s.parse::<ProjectStatus>().ok())
            .unwrap_or_else(|| {
                note("status");
                ProjectStatus::default()
            });

        let long_description = text_field(fields, "longDescription").unwrap_or_else(|| {
            note("longDescription");
            DEFAULT_LONG_DESCRIPTION.to_string()
        });

        let tech_stack = present(fields, "techStack").and_then(coerce_tech_stack);

        let technologies = match present(fields, "technologies").and_then(string_list) {
            Some(list) => list,
            None => match tech_stack.as_ref().filter(|s| !s.is_empty()) {
                Some(stack) => stack.flatten(),
                None => {
                    note("technologies");
                    vec![DEFAULT_TECHNOLOGY.to_string()]
                }
            },
        };

        let tags = present(fields, "tags").and_then(string_list).unwrap_or_else(|| {
            note("tags");
            vec![DEFAULT_TAG.to_string()]
        });

        let features = present(fields, "features")
            .and_then(string_list)
            .unwrap_or_else(|| {
                note("features");
                Vec::new()
            });

        let links = present(fields, "links").and_then(coerce_links).unwrap_or_else(|| {
            note("links");
            Vec::new()
        });

        let media = present(fields, "media").and_then(coerce_media).unwrap_or_else(|| {
            note("media");
            Vec::new()
        });

        let record = ProjectRecord {
            title,
            description,
            start_date,
            status,
            long_description,
            technologies,
            tags,
            features,
            media,
            links,
            tech_stack,
        };

        (record, defaulted)
    }
}

/// Field value unless absent or falsy (null, false, 0, empty string)
fn present<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    fields.get(key).filter(|v| !is_falsy(v))
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.trim().is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    present(fields, key).and_then(scalar_text)
}

/// Text of a scalar value; arrays and mappings have none
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Coerce to a list of strings; a lone scalar becomes a one-element list
fn string_list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => Some(items.iter().filter_map(scalar_text).collect()),
        Value::Object(_) | Value::Null => None,
        scalar => scalar_text(scalar).map(|s| vec![s]),
    }
}

/// Accepts `YYYY-MM-DD`, a full timestamp, or a bare year
fn parse_start_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .or_else(|| s.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()))
                .or_else(|| s.parse::<i32>().ok().and_then(year_start))
        }
        Value::Number(n) => n.as_i64().and_then(|y| i32::try_from(y).ok()).and_then(year_start),
        _ => None,
    }
}

fn year_start(year: i32) -> Option<NaiveDate> {
    if (1970..=9999).contains(&year) {
        NaiveDate::from_ymd_opt(year, 1, 1)
    } else {
        None
    }
}

/// Mapping of bucket name to list; unknown buckets are dropped
fn coerce_tech_stack(value: &Value) -> Option<TechStack> {
    let Value::Object(map) = value else {
        warn!("techStack is not a mapping, ignoring it");
        return None;
    };

    let mut stack = TechStack::new();
    for (key, items) in map {
        let Some(category) = tech_category_for_key(key) else {
            warn!("Unknown techStack category `{}`, ignoring it", key);
            continue;
        };
        for item in string_list(items).unwrap_or_default() {
            stack.insert(category, item);
        }
    }
    Some(stack)
}

/// Bucket for a front-matter key, tolerating `data_processing` / `Data-Processing`
fn tech_category_for_key(key: &str) -> Option<TechCategory> {
    let squashed: String = key
        .chars()
        .filter(|c| *c != '_' && *c != '-')
        .collect::<String>()
        .to_lowercase();
    TechCategory::ALL
        .into_iter()
        .find(|c| c.key().to_lowercase() == squashed)
}

fn coerce_media(value: &Value) -> Option<Vec<MediaEntry>> {
    let items: Vec<&Value> = match value {
        Value::Array(items) => items.iter().collect(),
        Value::Object(_) | Value::String(_) => vec![value],
        _ => return None,
    };

    Some(items.into_iter().filter_map(media_entry).collect())
}

fn media_entry(value: &Value) -> Option<MediaEntry> {
    match value {
        Value::String(url) if !url.trim().is_empty() => Some(MediaEntry::image(url.trim())),
        Value::Object(map) => {
            let url = map.get("url").and_then(scalar_text)?;
            let kind = map
                .get("type")
                .and_then(scalar_text)
                .unwrap_or_else(|| "image".to_string());
            Some(MediaEntry {
                kind,
                url,
                caption: map.get("caption").and_then(scalar_text),
            })
        }
        _ => None,
    }
}

fn coerce_links(value: &Value) -> Option<Vec<LinkEntry>> {
    match value {
        Value::Array(items) => Some(items.iter().filter_map(link_entry).collect()),
        Value::String(_) => Some(link_entry(value).into_iter().collect()),
        // `{ demo: https://..., docs: https://... }`
        Value::Object(map) if !map.contains_key("url") => Some(
            map.iter()
                .filter_map(|(kind, url)| {
                    scalar_text(url).map(|url| LinkEntry {
                        kind: kind.clone(),
                        url,
                        label: None,
                    })
                })
                .collect(),
        ),
        Value::Object(_) => Some(link_entry(value).into_iter().collect()),
        _ => None,
    }
}

fn link_entry(value: &Value) -> Option<LinkEntry> {
    match value {
        Value::String(url) if !url.trim().is_empty() => Some(LinkEntry {
            kind: "website".to_string(),
            url: url.trim().to_string(),
            label: None,
        }),
        Value::Object(map) => {
            let url = map.get("url").and_then(scalar_text)?;
            Some(LinkEntry {
                kind: map
                    .get("type")
                    .and_then(scalar_text)
                    .unwrap_or_else(|| "website".to_string()),
                url,
                label: map.get("label").and_then(scalar_text),
            })
        }
        _ => None,
    }
}

/// Year shown on the portfolio card
pub fn display_year(record: &ProjectRecord) -> i32 {
    record.start_date.year()
}
