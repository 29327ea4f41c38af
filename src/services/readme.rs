//! README prose extraction

use regex::Regex;
use std::sync::LazyLock;

static IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[[^\]]*\]\([^)]*\)").expect("valid image pattern"));
static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]*\)").expect("valid link pattern"));
static EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\*\*|__|`)").expect("valid emphasis pattern"));

/// First prose paragraph of a Markdown README.
///
/// Headings, badge/image lines, HTML blocks, lists, quotes and fenced code are
/// skipped; inline links keep their text.
pub fn readme_excerpt(markdown: &str) -> Option<String> {
    let mut paragraph: Vec<String> = Vec::new();
    let mut in_fence = false;

    for line in markdown.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            if !paragraph.is_empty() {
                break;
            }
            continue;
        }
        if in_fence {
            continue;
        }

        if trimmed.is_empty() {
            if !paragraph.is_empty() {
                break;
            }
            continue;
        }

        if is_skipped_line(trimmed) {
            if !paragraph.is_empty() {
                break;
            }
            continue;
        }

        let without_images = IMAGE.replace_all(trimmed, "");
        let text = LINK.replace_all(&without_images, "$1");
        let text = EMPHASIS.replace_all(&text, "");
        let text = text.trim();
        if !text.is_empty() {
            paragraph.push(text.to_string());
        }
    }

    let excerpt = paragraph.join(" ");
    if excerpt.is_empty() {
        None
    } else {
        Some(excerpt)
    }
}

fn is_skipped_line(line: &str) -> bool {
    line.starts_with('#')
        || line.starts_with('<')
        || line.starts_with('>')
        || line.starts_with("- ")
        || line.starts_with("* ")
        || line.starts_with('|')
        || line.starts_with("---")
        || line.starts_with("===")
        || IMAGE.replace_all(line, "").trim().is_empty()
        || line.starts_with("[![")
}
