//! Content sanitization: reduces generated HTML/CSS to a structurally safe,
//! renderable document.
//!
//! HTML is restricted to an explicit tag and attribute allow-list; anything
//! outside it is removed outright rather than escaped, so the output stays
//! renderable. CSS keeps its comment-stripped form as `original_css` and a
//! scoped copy for preview; the two are produced in the same pass and never
//! drift apart.
//!
//! Sanitization never fails. The worst case for hopeless input is an empty
//! field, not an error.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::pipeline::scope::scope_css;

/// Tags the sanitizer keeps. Everything else is stripped, tag and content
/// markers both, leaving inner text in place.
const ALLOWED_TAGS: &[&str] = &[
    "div", "p", "h1", "h2", "h3", "h4", "h5", "span", "a", "img", "ul", "ol", "li", "section",
    "header", "footer", "main", "article", "nav", "button", "form", "input", "textarea", "br",
    "hr", "strong", "em", "i", "b",
];

/// Attributes the sanitizer keeps on allowed tags.
const ALLOWED_ATTRS: &[&str] = &[
    "class",
    "id",
    "href",
    "src",
    "alt",
    "style",
    "target",
    "rel",
    "placeholder",
    "type",
    "value",
    "name",
    "for",
    "title",
];

/// Sanitized HTML plus the scoped and unscoped CSS variants.
///
/// `scoped_css` is exactly `scope_css(original_css, scope)` as of the
/// sanitize call.
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedOutput {
    pub html: String,
    pub scoped_css: String,
    pub original_css: String,
}

fn html_comment_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<!--.*?-->").expect("html comment regex is valid"))
}

fn boilerplate_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Models occasionally append an attribution footer; drop the whole phrase.
    RE.get_or_init(|| Regex::new(r"(?s)Built using.*?</p>").expect("boilerplate regex is valid"))
}

fn css_comment_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)/\*.*?\*/").expect("css comment regex is valid"))
}

fn dropped_content_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // script/style payloads are code, not content; removing only the tags
    // would leave raw JS or CSS as visible text.
    RE.get_or_init(|| {
        Regex::new(r"(?si)<script\b[^>]*>.*?</script>|<style\b[^>]*>.*?</style>")
            .expect("dropped content regex is valid")
    })
}

fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?s)<(/?)([a-zA-Z][a-zA-Z0-9]*)((?:"[^"]*"|'[^']*'|[^>"'])*)>"#)
            .expect("tag regex is valid")
    })
}

fn attr_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"([a-zA-Z][a-zA-Z0-9-]*)\s*(?:=\s*("[^"]*"|'[^']*'|[^\s"'>]+))?"#)
            .expect("attr regex is valid")
    })
}

/// Sanitizes generated HTML and CSS and produces the scoped CSS variant.
///
/// Steps, in order: strip HTML comments and attribution boilerplate, enforce
/// the tag/attribute allow-list, strip CSS comments, scope the CSS.
pub fn sanitize_output(html: &str, css: &str, scope: &str) -> SanitizedOutput {
    let html = html_comment_regex().replace_all(html, "");
    let html = boilerplate_regex().replace_all(&html, "");
    let html = dropped_content_regex().replace_all(&html, "");
    let html = filter_tags(&html);

    let original_css = css_comment_regex().replace_all(css, "").to_string();
    let scoped_css = scope_css(&original_css, scope);

    SanitizedOutput {
        html,
        scoped_css,
        original_css,
    }
}

/// Removes disallowed tags and attributes. Inner text of removed elements is
/// kept; only the markup itself is dropped.
fn filter_tags(html: &str) -> String {
    tag_regex()
        .replace_all(html, |caps: &regex::Captures| {
            let closing = !caps[1].is_empty();
            let name = caps[2].to_lowercase();

            if !ALLOWED_TAGS.contains(&name.as_str()) {
                return String::new();
            }
            if closing {
                return format!("</{name}>");
            }

            let raw_attrs = caps.get(3).map(|m| m.as_str()).unwrap_or("");
            let self_closing = raw_attrs.trim_end().ends_with('/');
            let kept = filter_attrs(raw_attrs);

            match (kept.is_empty(), self_closing) {
                (true, true) => format!("<{name}/>"),
                (true, false) => format!("<{name}>"),
                (false, true) => format!("<{name} {kept}/>"),
                (false, false) => format!("<{name} {kept}>"),
            }
        })
        .to_string()
}

/// Rebuilds an attribute list keeping only allow-listed attribute names.
/// Values are re-quoted with double quotes.
fn filter_attrs(raw: &str) -> String {
    let mut kept = Vec::new();

    for caps in attr_regex().captures_iter(raw) {
        let name = caps[1].to_lowercase();
        if !ALLOWED_ATTRS.contains(&name.as_str()) {
            continue;
        }
        match caps.get(2) {
            Some(value) => {
                let value = value.as_str().trim_matches(['"', '\'']);
                kept.push(format!("{name}=\"{value}\""));
            }
            None => kept.push(name),
        }
    }

    kept.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCOPE: &str = ".portfolio-frame";

    #[test]
    fn test_disallowed_tags_removed_text_kept() {
        let out = sanitize_output("<script>alert(1)</script><p>fine</p>", "", SCOPE);
        assert!(!out.html.contains("<script"), "script tag must be removed");
        assert!(out.html.contains("<p>fine</p>"));
        assert!(
            !out.html.contains("alert(1)"),
            "script payload must go with the element"
        );
    }

    #[test]
    fn test_disallowed_attributes_removed() {
        let out = sanitize_output(
            r#"<a href="https://x.dev" onclick="steal()">me</a>"#,
            "",
            SCOPE,
        );
        assert!(out.html.contains(r#"href="https://x.dev""#));
        assert!(!out.html.contains("onclick"), "event handler attrs must go");
    }

    #[test]
    fn test_no_disallowed_tag_survives_mixed_input() {
        let input = "<div><iframe src=x></iframe><h1>T</h1><object></object><em>e</em></div>";
        let out = sanitize_output(input, "", SCOPE);
        for bad in ["<iframe", "<object", "</iframe>", "</object>"] {
            assert!(!out.html.contains(bad), "{bad} leaked into output: {}", out.html);
        }
        assert!(out.html.contains("<h1>T</h1>"));
        assert!(out.html.contains("<em>e</em>"));
    }

    #[test]
    fn test_html_comments_and_boilerplate_stripped() {
        let input = "<div><!-- fixme later --><p>Built using SuperTool</p><p>real</p></div>";
        let out = sanitize_output(input, "", SCOPE);
        assert!(!out.html.contains("fixme"));
        assert!(!out.html.contains("Built using"));
        assert!(out.html.contains("<p>real</p>"));
    }

    #[test]
    fn test_css_comments_stripped_from_both_variants() {
        let out = sanitize_output("", "/* note */ .a{color:red;}", SCOPE);
        assert!(!out.original_css.contains("note"));
        assert!(!out.scoped_css.contains("note"));
    }

    #[test]
    fn test_scoped_css_is_exactly_scope_of_original() {
        let out = sanitize_output("<div/>", ".a{color:red;} body{margin:0;}", SCOPE);
        assert_eq!(
            out.scoped_css,
            scope_css(&out.original_css, SCOPE),
            "scoped_css must never drift from scope_css(original_css)"
        );
    }

    #[test]
    fn test_unquoted_attr_values_requoted() {
        let out = sanitize_output("<img src=pic.png alt=hi>", "", SCOPE);
        assert!(out.html.contains(r#"src="pic.png""#), "got: {}", out.html);
        assert!(out.html.contains(r#"alt="hi""#));
    }

    #[test]
    fn test_malformed_html_never_panics() {
        // Reduced fidelity is fine; an error is not.
        let out = sanitize_output("<div <p ><<<>>> </spa", "{{{}}}", SCOPE);
        assert!(out.html.starts_with("<div>"), "got: {}", out.html);
        assert_eq!(out.scoped_css, "", "unparseable css yields no rules");
    }

    #[test]
    fn test_self_closing_allowed_tag_preserved() {
        let out = sanitize_output("<br/><hr />", "", SCOPE);
        assert!(out.html.contains("<br/>"));
        assert!(out.html.contains("<hr/>"));
    }
}
