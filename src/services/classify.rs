//! Portfolio category inference
//!
//! Pure function of (tech stack, topics, description). First match wins:
//! 1. non-empty `mapping` bucket -> map
//! 2. non-empty `visualization` bucket -> visualization
//! 3. non-empty `dataProcessing` bucket -> analysis
//! 4. a topic equal to a table keyword -> that category
//! 5. the description containing a table keyword -> that category
//! 6. other

use crate::types::{Category, TechCategory, TechStack};

/// Keyword table, checked in this order for both topics and descriptions
pub const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (Category::Map, &["map", "maplibre", "leaflet", "gis", "geospatial"]),
    (
        Category::Visualization,
        &["visualization", "chart", "graph", "plot", "dashboard"],
    ),
    (Category::Analysis, &["analysis", "data", "statistics", "analytics"]),
    (Category::Tool, &["tool", "utility", "helper", "plugin"]),
];

/// Tech-stack buckets that decide the category on their own
const STACK_PRECEDENCE: [(TechCategory, Category); 3] = [
    (TechCategory::Mapping, Category::Map),
    (TechCategory::Visualization, Category::Visualization),
    (TechCategory::DataProcessing, Category::Analysis),
];

pub fn classify(tech_stack: &TechStack, topics: &[String], description: &str) -> Category {
    if let Some((_, category)) = STACK_PRECEDENCE
        .iter()
        .find(|(bucket, _)| !tech_stack.bucket(*bucket).is_empty())
    {
        return *category;
    }

    if let Some(category) = category_for_topics(topics) {
        return category;
    }

    category_for_description(description).unwrap_or(Category::Other)
}

fn category_for_topics(topics: &[String]) -> Option<Category> {
    CATEGORY_KEYWORDS.iter().find_map(|(category, keywords)| {
        topics
            .iter()
            .any(|topic| keywords.contains(&topic.trim().to_lowercase().as_str()))
            .then_some(*category)
    })
}

fn category_for_description(description: &str) -> Option<Category> {
    let description = description.to_lowercase();
    CATEGORY_KEYWORDS.iter().find_map(|(category, keywords)| {
        keywords
            .iter()
            .any(|keyword| description.contains(keyword))
            .then_some(*category)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topics(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    fn stack_with(category: TechCategory, item: &str) -> TechStack {
        let mut stack = TechStack::new();
        stack.insert(category, item);
        stack
    }

    #[test]
    fn test_mapping_bucket_beats_everything() {
        let stack = stack_with(TechCategory::Mapping, "Leaflet");
        assert_eq!(
            classify(&stack, &topics(&["dashboard"]), "statistics analysis"),
            Category::Map
        );
    }

    #[test]
    fn test_visualization_bucket_beats_topics() {
        let stack = stack_with(TechCategory::Visualization, "D3");
        assert_eq!(classify(&stack, &topics(&["gis"]), ""), Category::Visualization);
    }

    #[test]
    fn test_data_processing_bucket() {
        let stack = stack_with(TechCategory::DataProcessing, "Pandas");
        assert_eq!(classify(&stack, &[], "a plugin"), Category::Analysis);
    }

    #[test]
    fn test_non_deciding_buckets_fall_through() {
        let mut stack = stack_with(TechCategory::Core, "JavaScript");
        stack.insert(TechCategory::Deployment, "GitHub Pages");
        assert_eq!(classify(&stack, &topics(&["plugin"]), ""), Category::Tool);
    }

    #[test]
    fn test_topic_match_is_exact_and_case_insensitive() {
        let empty = TechStack::new();
        assert_eq!(classify(&empty, &topics(&["GIS"]), ""), Category::Map);
        // "mapping" is not the keyword "map"
        assert_eq!(classify(&empty, &topics(&["mapping"]), ""), Category::Other);
    }

    #[test]
    fn test_topics_beat_description() {
        let empty = TechStack::new();
        assert_eq!(
            classify(&empty, &topics(&["chart"]), "A GIS utility"),
            Category::Visualization
        );
    }

    #[test]
    fn test_description_substring() {
        let empty = TechStack::new();
        assert_eq!(classify(&empty, &[], "A GIS utility"), Category::Map);
        assert_eq!(classify(&empty, &[], "Browser PLUGIN"), Category::Tool);
        assert_eq!(classify(&empty, &[], "My cooking blog"), Category::Other);
    }

    #[test]
    fn test_every_keyword_resolves_to_its_category() {
        let empty = TechStack::new();
        for (category, keywords) in CATEGORY_KEYWORDS {
            for keyword in *keywords {
                let by_topic = classify(&empty, &topics(&[*keyword]), "");
                assert_eq!(by_topic, *category, "topic {}", keyword);
            }
        }
    }

    #[test]
    fn test_total_and_deterministic() {
        let empty = TechStack::new();
        let inputs = [
            (topics(&[]), ""),
            (topics(&["x", "y"]), "zzz"),
            (topics(&["gis", "chart"]), "data"),
        ];
        for (t, d) in &inputs {
            let first = classify(&empty, t, d);
            assert_eq!(first, classify(&empty, t, d));
            assert!(Category::ALL.contains(&first));
        }
    }
}
