//! Schema command - Print the JSON Schema of the output file
//!
//! `portfolio-sync schema`

use schemars::schema_for;

use crate::types::PortfolioEntry;

/// JSON Schema of the portfolio data file (an array of entries)
pub fn output_schema() -> serde_json::Value {
    schema_for!(Vec<PortfolioEntry>).to_value()
}

/// Pretty-printed schema, ready for stdout
pub fn schema() -> serde_json::Result<String> {
    serde_json::to_string_pretty(&output_schema())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_describes_entry_fields() {
        let text = schema().unwrap();
        for field in ["imageUrl", "techStack", "isTemplate", "lastUpdate", "pagesUrl"] {
            assert!(text.contains(field), "missing {}", field);
        }
        assert_eq!(output_schema()["type"], "array");
    }
}
