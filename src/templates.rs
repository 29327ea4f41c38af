//! Default `project-info.md` rendered for repositories that lack one.

use chrono::NaiveDate;

/// Name of the front-matter document looked up at each repository root
pub const PROJECT_INFO_FILE: &str = "project-info.md";

/// Default `project-info.md` content. Placeholders are replaced by
/// [`render_project_info`]; scalar values arrive YAML-quoted.
pub const DEFAULT_PROJECT_INFO: &str = r"---
title: {title}
description: {description}
startDate: {start_date}
status: active
longDescription: |
  This project is part of the {account} portfolio.
  More information coming soon!
technologies:
  - Web
tags:
  - Work in Progress
features: []
links: []
media: []
---

# {heading}
Project documentation coming soon.
";

/// Description used when the repository has none
pub fn default_description(account: &str) -> String {
    format!("A cool project by {}", account)
}

/// Render the default document for a repository
pub fn render_project_info(
    repo_name: &str,
    description: Option<&str>,
    account: &str,
    today: NaiveDate,
) -> String {
    let description = description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map_or_else(|| default_description(account), str::to_string);

    let values = [
        ("title", yaml_quote(repo_name)),
        ("description", yaml_quote(&description)),
        ("start_date", today.format("%Y-%m-%d").to_string()),
        ("account", single_line(account)),
        ("heading", single_line(repo_name)),
    ];
    fill_placeholders(DEFAULT_PROJECT_INFO, &values)
}

/// Replace each `{key}` of `template` in a single pass. Substituted values
/// are never scanned again; unknown keys are left as written.
fn fill_placeholders(template: &str, values: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (v, close))
        });

        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Single-quoted YAML scalar; embedded quotes are doubled
fn yaml_quote(value: &str) -> String {
    format!("'{}'", single_line(value).replace('\'', "''"))
}

fn single_line(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[test]
    fn test_render_uses_repo_name_and_description() {
        let doc = render_project_info("geo-tool", Some("A GIS utility"), "LatidudeMaps", today());
        assert!(doc.starts_with("---\ntitle: 'geo-tool'\n"));
        assert!(doc.contains("description: 'A GIS utility'\n"));
        assert!(doc.contains("startDate: 2024-05-01\n"));
        assert!(doc.contains("part of the LatidudeMaps portfolio"));
        assert!(doc.contains("# geo-tool\n"));
    }

    #[test]
    fn test_render_falls_back_to_default_description() {
        let doc = render_project_info("x", Some("  "), "LatidudeMaps", today());
        assert!(doc.contains("description: 'A cool project by LatidudeMaps'"));
    }

    #[test]
    fn test_placeholders_in_values_are_kept_verbatim() {
        let doc = render_project_info(
            "site-kit",
            Some("Starter for {account} pages, see {heading}"),
            "me",
            today(),
        );
        assert!(doc.contains("description: 'Starter for {account} pages, see {heading}'\n"));
        assert!(doc.contains("part of the me portfolio"));
        assert!(doc.contains("# site-kit\n"));
    }

    #[test]
    fn test_unknown_braces_are_untouched() {
        let values = [("name", "x".to_string())];
        assert_eq!(fill_placeholders("{name} {other} {", &values), "x {other} {");
    }

    #[test]
    fn test_quotes_survive_yaml() {
        let doc = render_project_info("it's", Some("key: value\nnext line"), "me", today());
        assert!(doc.contains("title: 'it''s'"));
        assert!(doc.contains("description: 'key: value next line'"));
    }
}
