//! Design-example scraping: fetches live portfolio pages and slices them
//! into named section samples for the budgeter.
//!
//! Extraction is heuristic by design. A section is located either by its
//! semantic tag (`<header>`, `<footer>`, `<nav>`) or by an id/class attribute
//! containing the section name, and the element slice is recovered with a
//! bounded depth scan rather than a full DOM parse. Pages that defeat the
//! heuristics contribute fewer sections, never an error.

use std::collections::BTreeMap;
use std::time::Duration;

use regex::Regex;
use std::sync::OnceLock;
use tracing::{info, warn};

use crate::pipeline::budget::{RawExample, SectionSample};
use crate::pipeline::truncate_chars;

/// How many of the caller's URLs are actually fetched.
pub const MAX_URLS_SCRAPED: usize = 3;
/// Upper bound on a single section slice, in characters.
const MAX_SECTION_SLICE: usize = 4000;
const FETCH_TIMEOUT: Duration = Duration::from_secs(15);
const VALIDATE_TIMEOUT: Duration = Duration::from_secs(5);

/// Section names probed on every scraped page.
const KNOWN_SECTIONS: &[&str] = &[
    "header",
    "about",
    "skills",
    "projects",
    "experience",
    "education",
    "contact",
    "footer",
];

fn title_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?si)<title[^>]*>(.*?)</title>").expect("title regex is valid"))
}

fn style_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?si)<style[^>]*>(.*?)</style>").expect("style regex is valid")
    })
}

fn any_tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"</?([a-zA-Z][a-zA-Z0-9]*)").expect("tag name regex is valid"))
}

fn class_attr_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)class\s*=\s*"([^"]*)""#).expect("class attr regex is valid")
    })
}

fn strip_tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<[^>]*>").expect("strip tag regex is valid"))
}

/// Fetches up to `MAX_URLS_SCRAPED` URLs and turns each reachable page into
/// a `RawExample`. Unreachable or unparseable pages are skipped with a
/// warning.
pub async fn scrape_sites(http: &reqwest::Client, urls: &[String]) -> Vec<RawExample> {
    let mut examples = Vec::new();

    for url in urls.iter().take(MAX_URLS_SCRAPED) {
        if !validate_url(http, url).await {
            warn!("Skipping unreachable URL: {url}");
            continue;
        }

        let html = match fetch_page(http, url).await {
            Ok(html) => html,
            Err(e) => {
                warn!("Failed to scrape {url}: {e}");
                continue;
            }
        };

        let example = parse_page(url, &html);
        info!(
            "Scraped {url}: {} sections, {} chars css",
            example.sections.len(),
            example.css.len()
        );
        examples.push(example);
    }

    examples
}

async fn validate_url(http: &reqwest::Client, url: &str) -> bool {
    match http.head(url).timeout(VALIDATE_TIMEOUT).send().await {
        Ok(response) => response.status().is_success(),
        Err(e) => {
            warn!("URL validation failed for {url}: {e}");
            false
        }
    }
}

async fn fetch_page(http: &reqwest::Client, url: &str) -> Result<String, reqwest::Error> {
    http.get(url)
        .timeout(FETCH_TIMEOUT)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await
}

/// Parses a fetched page into a `RawExample`: title, inline styles, and one
/// sample per recognizable section.
pub fn parse_page(url: &str, html: &str) -> RawExample {
    let title = title_regex()
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "Unknown".to_string());

    let css = style_regex()
        .captures_iter(html)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .collect::<Vec<_>>()
        .join("\n");

    let mut sections = BTreeMap::new();
    for name in KNOWN_SECTIONS {
        if let Some(sample) = find_section(html, name) {
            sections.insert(name.to_string(), sample);
        }
    }

    RawExample {
        url: url.to_string(),
        title,
        sections,
        css,
    }
}

/// Locates a named section and slices out a bounded sample of it.
fn find_section(html: &str, name: &str) -> Option<SectionSample> {
    // Semantic-tag sections are matched by the tag itself; everything else
    // by an id/class attribute containing the name.
    let pattern = match name {
        "header" | "footer" | "nav" => format!(r"(?i)<({name})\b[^>]*>"),
        _ => format!(
            r#"(?i)<(section|div|main|article)\b[^>]*(?:id|class)\s*=\s*"[^"]*{}[^"]*"[^>]*>"#,
            regex::escape(name)
        ),
    };
    let section_regex = Regex::new(&pattern).ok()?;
    let capture = section_regex.captures(html)?;
    let open = capture.get(0)?;
    let tag = capture.get(1)?.as_str().to_lowercase();

    let slice = balanced_slice(html, open.start(), &tag);
    let slice = truncate_chars(slice, MAX_SECTION_SLICE);

    let class_attr = class_attr_regex()
        .captures(open.as_str())
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    let text = collapse_whitespace(&strip_tag_regex().replace_all(&slice, " "));
    let structure_summary = summarize_structure(&slice);

    Some(SectionSample {
        html: slice,
        text,
        class_attr,
        structure_summary,
    })
}

/// Returns the substring from `start` through the matching close of `tag`,
/// found by depth-counting open/close occurrences. Falls back to the rest of
/// the document when the markup never balances.
fn balanced_slice<'a>(html: &'a str, start: usize, tag: &str) -> &'a str {
    let Ok(tag_regex) = Regex::new(&format!(r"(?i)</?{}\b", regex::escape(tag))) else {
        return &html[start..];
    };

    let mut depth = 0i32;
    for found in tag_regex.find_iter(&html[start..]) {
        if found.as_str().starts_with("</") {
            depth -= 1;
            if depth <= 0 {
                let close_end = html[start + found.start()..]
                    .find('>')
                    .map(|i| start + found.start() + i + 1)
                    .unwrap_or(html.len());
                return &html[start..close_end];
            }
        } else {
            depth += 1;
        }
    }

    &html[start..]
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Tallies the tags inside a slice, e.g. "a:3 div:4 h2:1".
fn summarize_structure(slice: &str) -> String {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for capture in any_tag_regex().captures_iter(slice) {
        if capture.get(0).map(|m| m.as_str().starts_with("</")) == Some(true) {
            continue;
        }
        *counts.entry(capture[1].to_lowercase()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(tag, count)| format!("{tag}:{count}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r##"<!doctype html>
<html><head><title> Jane Doe | Portfolio </title>
<style>.hero{display:flex;}</style>
<style>body{margin:0;}</style>
</head><body>
<header class="site-head"><h1>Jane Doe</h1><nav><a href="#about">About</a></nav></header>
<section id="about-me" class="about panel"><p>I build things.</p><p>Mostly in Rust.</p></section>
<div class="projects-grid"><div class="card"><h2>Crate A</h2></div></div>
<footer><p>no rights reserved</p></footer>
</body></html>"##;

    #[test]
    fn test_title_and_css_extracted() {
        let example = parse_page("https://jane.dev", PAGE);
        assert_eq!(example.title, "Jane Doe | Portfolio");
        assert!(example.css.contains(".hero{display:flex;}"));
        assert!(example.css.contains("body{margin:0;}"), "all style blocks joined");
    }

    #[test]
    fn test_semantic_tag_sections_found() {
        let example = parse_page("https://jane.dev", PAGE);
        let header = example.sections.get("header").expect("header found");
        assert!(header.html.starts_with("<header"));
        assert!(header.html.ends_with("</header>"), "slice must close: {}", header.html);
        assert_eq!(header.class_attr, "site-head");
        assert!(example.sections.contains_key("footer"));
    }

    #[test]
    fn test_attribute_matched_sections_found() {
        let example = parse_page("https://jane.dev", PAGE);
        let about = example.sections.get("about").expect("about found by class");
        assert!(about.text.contains("I build things. Mostly in Rust."));
        let projects = example.sections.get("projects").expect("projects by class");
        assert!(projects.html.contains("Crate A"));
    }

    #[test]
    fn test_missing_sections_omitted() {
        let example = parse_page("https://jane.dev", PAGE);
        assert!(!example.sections.contains_key("education"));
        assert!(!example.sections.contains_key("contact"));
    }

    #[test]
    fn test_structure_summary_counts_open_tags() {
        let example = parse_page("https://jane.dev", PAGE);
        let header = example.sections.get("header").unwrap();
        assert!(
            header.structure_summary.contains("h1:1"),
            "got: {}",
            header.structure_summary
        );
        assert!(header.structure_summary.contains("a:1"));
    }

    #[test]
    fn test_balanced_slice_handles_nesting() {
        let html = r#"<div class="projects"><div>inner</div></div><p>after</p>"#;
        let slice = balanced_slice(html, 0, "div");
        assert_eq!(slice, r#"<div class="projects"><div>inner</div></div>"#);
    }

    #[test]
    fn test_unbalanced_markup_falls_back_to_rest() {
        let html = r#"<div class="x"><p>never closed"#;
        let slice = balanced_slice(html, 0, "div");
        assert_eq!(slice, html);
    }

    #[test]
    fn test_untitled_page_defaults_to_unknown() {
        let example = parse_page("https://x.dev", "<html><body></body></html>");
        assert_eq!(example.title, "Unknown");
    }
}
