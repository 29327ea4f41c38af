//! Front-matter extraction for `project-info.md`

use serde_json::{Map, Value};
use thiserror::Error;

/// Why a document has no usable front matter
#[derive(Debug, Error)]
pub enum FrontMatterError {
    #[error("document does not start with a `---` line")]
    Missing,

    #[error("front matter is not closed by a `---` line")]
    Unterminated,

    #[error("front matter is not valid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("front matter is not a key/value mapping")]
    NotAMapping,
}

/// Parsed metadata block plus the free-form body that follows it
#[derive(Debug, Clone, PartialEq)]
pub struct FrontMatter {
    pub fields: Map<String, Value>,
    pub body: String,
}

/// Split a document into its YAML front matter and body.
///
/// The first line must be `---` (an optional BOM is tolerated); the block
/// ends at the next `---` or `...` line. An empty block is an empty mapping.
pub fn parse_front_matter(input: &str) -> Result<FrontMatter, FrontMatterError> {
    let input = input.trim_start_matches('\u{feff}');
    let mut lines = input.lines();

    let first = lines.next().ok_or(FrontMatterError::Missing)?;
    if first.trim_end() != "---" {
        return Err(FrontMatterError::Missing);
    }

    let mut yaml_lines: Vec<&str> = Vec::new();
    let mut closed = false;
    for line in lines.by_ref() {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            closed = true;
            break;
        }
        yaml_lines.push(line);
    }

    if !closed {
        return Err(FrontMatterError::Unterminated);
    }

    let body = lines.collect::<Vec<_>>().join("\n");
    let fields = parse_yaml_mapping(&yaml_lines.join("\n"))?;

    Ok(FrontMatter { fields, body })
}

/// Parse YAML into a JSON-compatible mapping for uniform downstream handling
fn parse_yaml_mapping(yaml: &str) -> Result<Map<String, Value>, FrontMatterError> {
    if yaml.trim().is_empty() {
        return Ok(Map::new());
    }

    let yaml_value: serde_yaml::Value = serde_yaml::from_str(yaml)?;
    match yaml_value {
        serde_yaml::Value::Null => Ok(Map::new()),
        serde_yaml::Value::Mapping(_) => match serde_json::to_value(yaml_value) {
            Ok(Value::Object(map)) => Ok(map),
            _ => Err(FrontMatterError::NotAMapping),
        },
        _ => Err(FrontMatterError::NotAMapping),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_front_matter() {
        let input = "---\ntitle: Geo Tool\nstatus: active\n---\n# Geo Tool\nBody";
        let fm = parse_front_matter(input).unwrap();
        assert_eq!(fm.fields["title"], Value::String("Geo Tool".into()));
        assert_eq!(fm.fields["status"], Value::String("active".into()));
        assert_eq!(fm.body, "# Geo Tool\nBody");
    }

    #[test]
    fn front_matter_with_lists_and_block_scalar() {
        let input = "---\ntags:\n  - one\n  - two\nlongDescription: |\n  Line one.\n  Line two.\n---\n";
        let fm = parse_front_matter(input).unwrap();
        let tags = fm.fields["tags"].as_array().unwrap();
        assert_eq!(tags.len(), 2);
        let long = fm.fields["longDescription"].as_str().unwrap();
        assert!(long.starts_with("Line one.\nLine two."));
    }

    #[test]
    fn nested_tech_stack() {
        let input = "---\ntechStack:\n  visualization: [D3]\n  mapping: []\n---\n";
        let fm = parse_front_matter(input).unwrap();
        assert_eq!(fm.fields["techStack"]["visualization"][0], Value::String("D3".into()));
    }

    #[test]
    fn front_matter_with_bom() {
        let fm = parse_front_matter("\u{feff}---\ntitle: x\n---\n").unwrap();
        assert_eq!(fm.fields["title"], Value::String("x".into()));
    }

    #[test]
    fn empty_block_is_empty_mapping() {
        let fm = parse_front_matter("---\n---\n").unwrap();
        assert!(fm.fields.is_empty());
    }

    #[test]
    fn no_front_matter() {
        assert!(matches!(
            parse_front_matter("# Title\nBody"),
            Err(FrontMatterError::Missing)
        ));
        assert!(matches!(parse_front_matter(""), Err(FrontMatterError::Missing)));
    }

    #[test]
    fn unterminated_front_matter() {
        assert!(matches!(
            parse_front_matter("---\ntitle: x\n"),
            Err(FrontMatterError::Unterminated)
        ));
    }

    #[test]
    fn scalar_front_matter_is_rejected() {
        assert!(matches!(
            parse_front_matter("---\njust a string\n---\n"),
            Err(FrontMatterError::NotAMapping)
        ));
    }

    #[test]
    fn invalid_yaml() {
        assert!(matches!(
            parse_front_matter("---\ntitle: [unclosed\n---\n"),
            Err(FrontMatterError::Yaml(_))
        ));
    }
}
