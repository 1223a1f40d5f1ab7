//! CSS Scoping: rewrites arbitrary CSS so that every rule applies only under
//! a single namespace selector.
//!
//! Generated and scraped stylesheets arrive with page-global selectors
//! (`body`, `:root`, bare tags). Rendering them inside the preview container
//! would leak styles into the host page, so every selector is re-anchored
//! under the scope selector before the fragment is composed into the
//! portfolio document.
//!
//! Malformed input is dropped rule-by-rule, never surfaced as an error:
//! upstream text comes from an LLM or a scrape and this pipeline must not
//! fail the caller on bad CSS.

use std::sync::OnceLock;

use regex::Regex;

/// Rewrites a single selector so it only matches inside `scope`.
///
/// Rules, first match wins:
/// 1. empty selector stays empty (caller drops it)
/// 2. at-rule preludes pass through unchanged (the rule splitter normally
///    filters these out before they get here)
/// 3. `:root` becomes the scope itself
/// 4. selectors rooted at `html`/`body` collapse to the scope itself, since
///    the scoped container plays the role of the page root
/// 5. everything else is prefixed with `scope ` so the scope is a strict
///    ancestor
///
/// No selector is ever rejected; anything unusual degrades to rule 5.
pub fn rewrite_selector(selector: &str, scope: &str) -> String {
    let selector = selector.trim();
    if selector.is_empty() {
        return String::new();
    }
    if selector.starts_with('@') {
        return selector.to_string();
    }
    if selector == ":root" {
        return scope.to_string();
    }
    if is_page_root(selector) {
        return scope.to_string();
    }
    format!("{scope} {selector}")
}

/// True for selectors that begin with `html` or `body` as a whole token
/// (`body`, `body ul`, `html, body`). `body.dark` does not count: the class
/// makes it an ordinary compound selector and rule 5 applies.
fn is_page_root(selector: &str) -> bool {
    for root in ["html", "body"] {
        if let Some(rest) = selector.strip_prefix(root) {
            if rest.is_empty() || rest.starts_with(char::is_whitespace) || rest.starts_with(',') {
                return true;
            }
        }
    }
    false
}

/// Matches a whole `@media ... { ... }` block, capturing the inner rule text.
/// The lazy body match ends at the first `}` that is followed by the block's
/// own closing brace, which holds for one level of nesting.
fn media_block_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)@media[^{]+\{(.+?\})\s*\}").expect("media block regex is valid")
    })
}

/// Scopes a CSS text under `scope`, returning the input unchanged if either
/// argument is empty.
///
/// Top-level rules are split on `}`, each fragment split once on `{` into a
/// selector list and an opaque declaration body. Fragments that do not split
/// cleanly (stray braces, at-rule preludes) are discarded. Selector lists are
/// split on commas, rewritten individually, and rejoined with `, `.
///
/// `@media` blocks are handled in a second pass over the original text: the
/// inner rule text is scoped recursively and substituted back under the
/// untouched prelude. One level of at-rule nesting is supported; an at-rule
/// inside an at-rule is out of contract.
///
/// Re-scoping already-scoped CSS is safe but not a no-op: selectors gain a
/// redundant second prefix. Documented behavior, relied on by callers that
/// re-scope LLM-revised CSS without tracking whether it was scoped before.
pub fn scope_css(css: &str, scope: &str) -> String {
    if css.is_empty() || scope.is_empty() {
        return css.to_string();
    }

    let mut scoped = String::new();

    for fragment in css.split('}') {
        if fragment.trim().is_empty() {
            continue;
        }

        // Exactly one `{` separates selectors from declarations; anything
        // else is a malformed or nested fragment and is dropped.
        let Some((selector_part, declarations)) = fragment.split_once('{') else {
            continue;
        };
        if declarations.contains('{') {
            continue;
        }

        let selectors: Vec<String> = selector_part
            .split(',')
            .map(|s| rewrite_selector(s, scope))
            .filter(|s| !s.is_empty())
            .collect();

        if selectors.is_empty() {
            continue;
        }

        scoped.push_str(&selectors.join(", "));
        scoped.push_str(" {");
        scoped.push_str(declarations);
        scoped.push_str("}\n");
    }

    // Second pass: re-emit @media blocks with their inner rules scoped and
    // the prelude untouched.
    let mut at_rules = String::new();
    for capture in media_block_regex().captures_iter(css) {
        let whole = capture.get(0).map(|m| m.as_str()).unwrap_or_default();
        let inner = capture.get(1).map(|m| m.as_str()).unwrap_or_default();
        if whole.is_empty() || inner.is_empty() {
            continue;
        }
        let scoped_inner = scope_css(inner, scope);
        at_rules.push_str(&whole.replacen(inner, &scoped_inner, 1));
    }

    scoped + &at_rules
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCOPE: &str = ".portfolio-frame";

    #[test]
    fn test_root_pseudo_selector_becomes_scope_exactly() {
        let out = scope_css(":root{--x:1;}", SCOPE);
        assert_eq!(out.trim(), ".portfolio-frame {--x:1;}");
    }

    #[test]
    fn test_body_collapses_to_scope_not_descendant() {
        let out = scope_css("body{margin:0;}", SCOPE);
        assert_eq!(out.trim(), ".portfolio-frame {margin:0;}");
        assert!(
            !out.contains(".portfolio-frame body"),
            "body must collapse to the scope, not become a descendant: {out}"
        );
    }

    #[test]
    fn test_html_collapses_to_scope() {
        assert_eq!(rewrite_selector("html", SCOPE), SCOPE);
        assert_eq!(rewrite_selector("body ul", SCOPE), SCOPE);
    }

    #[test]
    fn test_body_with_class_is_not_collapsed() {
        // body.dark is a compound selector, not the page root
        assert_eq!(
            rewrite_selector("body.dark", SCOPE),
            ".portfolio-frame body.dark"
        );
    }

    #[test]
    fn test_multiple_selectors_each_prefixed() {
        let out = scope_css("h1,p{color:red;}", SCOPE);
        assert_eq!(out.trim(), ".portfolio-frame h1, .portfolio-frame p {color:red;}");
    }

    #[test]
    fn test_class_id_and_attribute_selectors_prefixed() {
        assert_eq!(rewrite_selector(".card", SCOPE), ".portfolio-frame .card");
        assert_eq!(rewrite_selector("#nav", SCOPE), ".portfolio-frame #nav");
        assert_eq!(
            rewrite_selector("a[target=_blank]", SCOPE),
            ".portfolio-frame a[target=_blank]"
        );
    }

    #[test]
    fn test_at_prelude_passes_through_unchanged() {
        assert_eq!(
            rewrite_selector("@media (min-width: 600px)", SCOPE),
            "@media (min-width: 600px)"
        );
    }

    #[test]
    fn test_media_query_inner_rules_scoped_prelude_untouched() {
        let out = scope_css("@media (max-width:768px){.a{color:red;}}", SCOPE);
        assert!(
            out.contains("@media (max-width:768px)"),
            "prelude must survive unchanged: {out}"
        );
        assert!(
            out.contains(".portfolio-frame .a {color:red;}"),
            "inner rule must be scoped: {out}"
        );
    }

    #[test]
    fn test_media_query_with_two_inner_rules() {
        let css = "@media screen{.a{color:red;} .b{color:blue;}}";
        let out = scope_css(css, SCOPE);
        assert!(out.contains(".portfolio-frame .a {color:red;}"));
        assert!(out.contains(".portfolio-frame .b {color:blue;}"));
    }

    #[test]
    fn test_every_top_level_selector_is_scope_or_scope_descendant() {
        let css = "h1{a:b;} .x,.y{c:d;} body{e:f;} :root{g:h;} div > span{i:j;}";
        let out = scope_css(css, SCOPE);
        for line in out.lines().filter(|l| !l.trim().is_empty()) {
            let (selectors, _) = line.split_once('{').expect("rule line has a brace");
            for selector in selectors.split(',') {
                let selector = selector.trim();
                assert!(
                    selector == SCOPE || selector.starts_with(&format!("{SCOPE} ")),
                    "unscoped selector leaked into output: {selector}"
                );
            }
        }
    }

    #[test]
    fn test_rescoping_is_structurally_safe() {
        // Scoping twice redundantly double-prefixes but never breaks rules.
        let once = scope_css(".card{color:red;}", SCOPE);
        let twice = scope_css(&once, SCOPE);
        assert!(
            twice.contains(".portfolio-frame .portfolio-frame .card {color:red;}"),
            "double scope must prefix again, not corrupt the rule: {twice}"
        );
    }

    #[test]
    fn test_malformed_fragment_dropped_not_propagated() {
        // "color:red;" has no brace split point and must be silently skipped
        let out = scope_css("color:red;} .ok{a:b;}", SCOPE);
        assert!(out.contains(".portfolio-frame .ok {a:b;}"));
        assert!(!out.contains("color:red;}\n.portfolio-frame"));
    }

    #[test]
    fn test_empty_inputs_returned_unchanged() {
        assert_eq!(scope_css("", SCOPE), "");
        assert_eq!(scope_css(".a{b:c;}", ""), ".a{b:c;}");
    }

    #[test]
    fn test_empty_selector_in_list_is_dropped() {
        let out = scope_css("h1, ,p{color:red;}", SCOPE);
        assert_eq!(out.trim(), ".portfolio-frame h1, .portfolio-frame p {color:red;}");
    }
}
