//! Fixed-shape technology grouping

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One of the seven technology buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum TechCategory {
    Core,
    Mapping,
    Visualization,
    Frameworks,
    Styling,
    DataProcessing,
    Deployment,
}

impl TechCategory {
    pub const ALL: [TechCategory; 7] = [
        TechCategory::Core,
        TechCategory::Mapping,
        TechCategory::Visualization,
        TechCategory::Frameworks,
        TechCategory::Styling,
        TechCategory::DataProcessing,
        TechCategory::Deployment,
    ];

    /// Key used in front matter and in the output document
    pub fn key(self) -> &'static str {
        match self {
            TechCategory::Core => "core",
            TechCategory::Mapping => "mapping",
            TechCategory::Visualization => "visualization",
            TechCategory::Frameworks => "frameworks",
            TechCategory::Styling => "styling",
            TechCategory::DataProcessing => "dataProcessing",
            TechCategory::Deployment => "deployment",
        }
    }
}

/// Technology names grouped by bucket.
///
/// Every bucket is always present (serialized as an empty list when unused)
/// and holds no duplicates, compared case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct TechStack {
    pub core: Vec<String>,
    pub mapping: Vec<String>,
    pub visualization: Vec<String>,
    pub frameworks: Vec<String>,
    pub styling: Vec<String>,
    pub data_processing: Vec<String>,
    pub deployment: Vec<String>,
}

impl TechStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bucket(&self, category: TechCategory) -> &[String] {
        match category {
            TechCategory::Core => &self.core,
            TechCategory::Mapping => &self.mapping,
            TechCategory::Visualization => &self.visualization,
            TechCategory::Frameworks => &self.frameworks,
            TechCategory::Styling => &self.styling,
            TechCategory::DataProcessing => &self.data_processing,
            TechCategory::Deployment => &self.deployment,
        }
    }

    fn bucket_mut(&mut self, category: TechCategory) -> &mut Vec<String> {
        match category {
            TechCategory::Core => &mut self.core,
            TechCategory::Mapping => &mut self.mapping,
            TechCategory::Visualization => &mut self.visualization,
            TechCategory::Frameworks => &mut self.frameworks,
            TechCategory::Styling => &mut self.styling,
            TechCategory::DataProcessing => &mut self.data_processing,
            TechCategory::Deployment => &mut self.deployment,
        }
    }

    /// Add `item` to a bucket. Returns false when it was already there.
    pub fn insert(&mut self, category: TechCategory, item: impl Into<String>) -> bool {
        let item = item.into();
        let item = item.trim();
        if item.is_empty() {
            return false;
        }
        let bucket = self.bucket_mut(category);
        if bucket.iter().any(|existing| existing.eq_ignore_ascii_case(item)) {
            return false;
        }
        bucket.push(item.to_string());
        true
    }

    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, items)| items.is_empty())
    }

    /// Buckets in fixed order
    pub fn iter(&self) -> impl Iterator<Item = (TechCategory, &[String])> {
        TechCategory::ALL.into_iter().map(move |c| (c, self.bucket(c)))
    }

    /// Union of all buckets in bucket order, duplicates across buckets dropped
    pub fn flatten(&self) -> Vec<String> {
        super::repo::dedup_preserving(
            self.iter().flat_map(|(_, items)| items.iter().cloned()),
        )
    }

    /// Rebuild every bucket through `insert`, removing duplicates and blanks
    pub fn normalized(&self) -> Self {
        let mut out = Self::new();
        for (category, items) in self.iter() {
            for item in items {
                out.insert(category, item.clone());
            }
        }
        out
    }
}
