//! Marked-block extraction: pulls named (HTML, CSS) pairs out of free-form
//! LLM output.
//!
//! Multi-section generation asks the model to label each section as
//! `---name---` followed by an ```html fence and a ```css fence. Models do
//! not reliably follow the format, so extraction is best-effort per name:
//! a name with no usable pair is simply omitted. Callers requesting N
//! sections must treat zero extracted blocks as a failed generation round.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// One named section extracted from a generation response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionBlock {
    pub name: String,
    pub html: String,
    pub css: String,
}

fn any_fence_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)```([a-z]*)\n?(.*?)```").expect("generic fence regex is valid")
    })
}

/// Extracts one `SectionBlock` per requested name from a generation response.
///
/// Tagged mode looks for a case-insensitive `---name---` marker followed
/// (arbitrary text allowed in between) by an html fence and then a css fence;
/// the first pair after the marker wins. When exactly one name was requested
/// and no marker matched, falls back to the first untagged html/css fence
/// pair anywhere in the text.
///
/// At most one block per requested name; names with no match produce nothing.
pub fn extract_section_blocks(response: &str, requested: &[String]) -> Vec<SectionBlock> {
    let mut blocks = Vec::new();

    for name in requested {
        let pattern = format!(
            r"(?is)---{}---.*?```html(.*?)```.*?```css(.*?)```",
            regex::escape(name)
        );
        // Per-name pattern; compile failure is impossible with an escaped name
        // but degrades to "no match" rather than panicking.
        let Ok(marker_regex) = Regex::new(&pattern) else {
            continue;
        };

        if let Some(capture) = marker_regex.captures(response) {
            let html = capture.get(1).map(|m| m.as_str().trim()).unwrap_or("");
            let css = capture.get(2).map(|m| m.as_str().trim()).unwrap_or("");
            if !html.is_empty() && !css.is_empty() {
                blocks.push(SectionBlock {
                    name: name.clone(),
                    html: html.to_string(),
                    css: css.to_string(),
                });
                continue;
            }
        }

        // Single-section fallback: the model often skips markers when only
        // one section was asked for.
        if requested.len() == 1 {
            let html = first_fenced(response, "html");
            let css = first_fenced(response, "css");

            if let (Some(html), Some(css)) = (html, css) {
                blocks.push(SectionBlock {
                    name: name.clone(),
                    html,
                    css,
                });
                break;
            }
        }
    }

    blocks
}

/// Returns the payload of the first fence labeled `lang`, trimmed.
pub fn first_fenced(response: &str, lang: &str) -> Option<String> {
    let pattern = format!(r"(?s)```{}\s*(.*?)\s*```", regex::escape(lang));
    let fence_regex = Regex::new(&pattern).ok()?;
    fence_regex
        .captures(response)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Strips code fences from a response, keeping only the fenced payloads.
///
/// All fenced spans are captured with their fence markers and language tags
/// removed, trimmed, and joined with a newline. Text with no fence at all is
/// returned unchanged: plain responses are treated as already-clean code.
pub fn strip_code_fences(response: &str) -> String {
    let payloads: Vec<&str> = any_fence_regex()
        .captures_iter(response)
        .filter_map(|c| c.get(2))
        .map(|m| m.as_str().trim())
        .collect();

    if payloads.is_empty() {
        return response.to_string();
    }

    payloads.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_tagged_section_extracted_missing_name_omitted() {
        let response = "\
Here is the header section.

---header---
```html
<div>H</div>
```

```css
.h{}
```
";
        let blocks = extract_section_blocks(response, &names(&["header", "about"]));
        assert_eq!(blocks.len(), 1, "only header has a tagged pair");
        assert_eq!(blocks[0].name, "header");
        assert_eq!(blocks[0].html, "<div>H</div>");
        assert_eq!(blocks[0].css, ".h{}");
    }

    #[test]
    fn test_marker_matching_is_case_insensitive() {
        let response = "---HEADER---\n```html\n<nav/>\n```\n```css\nnav{}\n```";
        let blocks = extract_section_blocks(response, &names(&["header"]));
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].html, "<nav/>");
    }

    #[test]
    fn test_single_name_falls_back_to_untagged_fences() {
        let response = "Some prose.\n```html\n<p>hi</p>\n```\nMore prose.\n```css\np{}\n```";
        let blocks = extract_section_blocks(response, &names(&["about"]));
        assert_eq!(blocks.len(), 1, "fallback must fire for a single requested name");
        assert_eq!(blocks[0].name, "about");
        assert_eq!(blocks[0].html, "<p>hi</p>");
        assert_eq!(blocks[0].css, "p{}");
    }

    #[test]
    fn test_no_fallback_when_multiple_names_requested() {
        let response = "```html\n<p>hi</p>\n```\n```css\np{}\n```";
        let blocks = extract_section_blocks(response, &names(&["header", "about"]));
        assert!(
            blocks.is_empty(),
            "untagged fences must not satisfy a multi-name request"
        );
    }

    #[test]
    fn test_two_tagged_sections_both_extracted() {
        let response = "\
---header---
```html
<header/>
```
```css
header{}
```
---skills---
```html
<ul/>
```
```css
ul{}
```";
        let blocks = extract_section_blocks(response, &names(&["header", "skills"]));
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].name, "header");
        assert_eq!(blocks[1].name, "skills");
        assert_eq!(blocks[1].html, "<ul/>");
    }

    #[test]
    fn test_no_blocks_for_unmatched_text() {
        let blocks = extract_section_blocks("nothing useful here", &names(&["header"]));
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_first_fenced_picks_matching_language() {
        let response = "```css\n.a{}\n```\n```html\n<div/>\n```";
        assert_eq!(first_fenced(response, "html").as_deref(), Some("<div/>"));
        assert_eq!(first_fenced(response, "css").as_deref(), Some(".a{}"));
        assert_eq!(first_fenced(response, "js"), None);
    }

    #[test]
    fn test_strip_code_fences_single_block() {
        let response = "Sure! Here you go:\n```html\n<div></div>\n```\nHope that helps.";
        assert_eq!(strip_code_fences(response), "<div></div>");
    }

    #[test]
    fn test_strip_code_fences_joins_multiple_blocks() {
        let response = "```css\n.a{}\n```\ntext\n```css\n.b{}\n```";
        assert_eq!(strip_code_fences(response), ".a{}\n.b{}");
    }

    #[test]
    fn test_strip_code_fences_plain_text_unchanged() {
        let response = "<div>no fences at all</div>";
        assert_eq!(strip_code_fences(response), response);
    }
}
