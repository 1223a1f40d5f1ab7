//! Context budgeting: fits a variable number of scraped design examples into
//! a fixed character budget for the design-summary prompt.
//!
//! Shrinks per-field truncation limits in a fixed priority order (CSS sample,
//! then per-section HTML, then per-section text) before dropping whole
//! examples, so large fields pay first and whole examples are discarded only
//! as a last resort. Limits are never raised once lowered, which bounds the
//! loop at `examples x shrink-steps` iterations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::pipeline::truncate_chars;

/// Default total budget for the serialized payload, in characters.
pub const MAX_TOTAL_CONTEXT_CHARS: usize = 24_000;
/// Hard cap on how many scraped sites are considered.
pub const MAX_SITES_ANALYZED: usize = 4;

const HTML_SECTION_LIMIT: usize = 1500;
const HTML_SECTION_FLOOR: usize = 900;
const HTML_SHRINK_STEP: usize = 200;

const TEXT_SECTION_LIMIT: usize = 500;
const TEXT_SECTION_FLOOR: usize = 300;
const TEXT_SHRINK_STEP: usize = 100;

const CSS_SAMPLE_LIMIT: usize = 2500;
const CSS_SAMPLE_FLOOR: usize = 1500;
const CSS_SHRINK_STEP: usize = 500;

/// One named section sliced out of a scraped page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionSample {
    pub html: String,
    pub text: String,
    #[serde(default)]
    pub class_attr: String,
    #[serde(default)]
    pub structure_summary: String,
}

/// A scraped site before budgeting. Sections are keyed by section name in a
/// BTreeMap so serialization order is deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawExample {
    pub url: String,
    pub title: String,
    pub sections: BTreeMap<String, SectionSample>,
    #[serde(default)]
    pub css: String,
}

/// A budgeted example ready for prompt embedding. Every string field has been
/// truncated to the limits in force when the payload was serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetedExample {
    pub url: String,
    pub title: String,
    pub sections: BTreeMap<String, SectionSample>,
    pub css_sample: String,
}

/// The bounded payload plus its pre-serialized JSON form.
#[derive(Debug, Clone)]
pub struct DesignPayload {
    pub examples: Vec<BudgetedExample>,
    pub json: String,
    /// Set when the backstop string truncation fired; the JSON may then be
    /// syntactically invalid and consumers must treat it as best-effort text.
    pub degraded: bool,
}

/// Per-field truncation limits for one budgeting pass. Only ever shrinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLimits {
    pub css: usize,
    pub html: usize,
    pub text: usize,
}

impl Default for FieldLimits {
    fn default() -> Self {
        Self {
            css: CSS_SAMPLE_LIMIT,
            html: HTML_SECTION_LIMIT,
            text: TEXT_SECTION_LIMIT,
        }
    }
}

impl FieldLimits {
    /// Lowers the highest-priority limit not yet at its floor. Returns false
    /// when all three are at their floors and only dropping an example can
    /// shrink the payload further.
    fn shrink_step(&mut self) -> bool {
        if self.css > CSS_SAMPLE_FLOOR {
            self.css = self.css.saturating_sub(CSS_SHRINK_STEP).max(CSS_SAMPLE_FLOOR);
            return true;
        }
        if self.html > HTML_SECTION_FLOOR {
            self.html = self.html.saturating_sub(HTML_SHRINK_STEP).max(HTML_SECTION_FLOOR);
            return true;
        }
        if self.text > TEXT_SECTION_FLOOR {
            self.text = self.text.saturating_sub(TEXT_SHRINK_STEP).max(TEXT_SECTION_FLOOR);
            return true;
        }
        false
    }

    fn at_floor(&self) -> bool {
        self.css == CSS_SAMPLE_FLOOR
            && self.html == HTML_SECTION_FLOOR
            && self.text == TEXT_SECTION_FLOOR
    }
}

/// Builds the largest design-example payload that fits `total_budget`.
///
/// Examples are first filtered down to the requested section names; an
/// example left with no matching section is dropped entirely. The shrink/drop
/// loop then runs until the serialized payload fits or no examples remain.
/// An empty result is valid and means "no examples available".
///
/// Backstop: if even the final candidate overflows the budget (one example,
/// all limits at floor, a single enormous field), the serialized string is
/// hard-truncated to `total_budget` characters and the payload is flagged
/// degraded.
pub fn build_design_payload(
    examples: &[RawExample],
    section_names: &[String],
    total_budget: usize,
) -> DesignPayload {
    let relevant: Vec<RawExample> = examples
        .iter()
        .map(|example| RawExample {
            url: example.url.clone(),
            title: example.title.clone(),
            sections: example
                .sections
                .iter()
                .filter(|(name, _)| section_names.contains(*name))
                .map(|(name, sample)| (name.clone(), sample.clone()))
                .collect(),
            css: example.css.clone(),
        })
        .filter(|example| !example.sections.is_empty())
        .collect();

    if relevant.is_empty() {
        return DesignPayload {
            examples: Vec::new(),
            json: "[]".to_string(),
            degraded: false,
        };
    }

    let mut site_count = relevant.len().min(MAX_SITES_ANALYZED);
    let mut limits = FieldLimits::default();
    let mut candidates = Vec::new();
    let mut json = String::new();

    while site_count > 0 {
        candidates = truncate_examples(&relevant[..site_count], limits);
        json = serde_json::to_string_pretty(&candidates).unwrap_or_else(|_| "[]".to_string());

        if json.chars().count() <= total_budget {
            return DesignPayload {
                examples: candidates,
                json,
                degraded: false,
            };
        }

        if limits.shrink_step() {
            continue;
        }

        debug_assert!(limits.at_floor());
        site_count -= 1;
    }

    // Even one example at floor limits overflows: keep it but hard-truncate
    // the serialized form. Downstream consumers treat the payload as
    // best-effort text, not guaranteed-valid JSON.
    warn!(
        budget = total_budget,
        size = json.chars().count(),
        "design payload still over budget at floor limits; hard-truncating"
    );
    json = truncate_chars(&json, total_budget);

    DesignPayload {
        examples: candidates,
        json,
        degraded: true,
    }
}

/// Applies the current field limits to a slice of examples.
fn truncate_examples(examples: &[RawExample], limits: FieldLimits) -> Vec<BudgetedExample> {
    examples
        .iter()
        .map(|example| BudgetedExample {
            url: example.url.clone(),
            title: example.title.clone(),
            sections: example
                .sections
                .iter()
                .map(|(name, sample)| {
                    (
                        name.clone(),
                        SectionSample {
                            html: truncate_chars(&sample.html, limits.html),
                            text: truncate_chars(&sample.text, limits.text),
                            class_attr: sample.class_attr.clone(),
                            structure_summary: sample.structure_summary.clone(),
                        },
                    )
                })
                .collect(),
            css_sample: truncate_chars(&example.css, limits.css),
        })
        .collect()
}
