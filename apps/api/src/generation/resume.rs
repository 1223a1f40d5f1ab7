//! Full resume-to-portfolio generation: three chained LLM stages.
//!
//! Flow: decode PDF -> sanitize input text -> injection screening ->
//!       resume content extraction -> HTML structure -> CSS styles.
//!
//! Each stage's output is run through `strip_code_fences` before feeding the
//! next stage, since the model wraps code in fences regardless of
//! instructions.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::generation::pdf_text::extract_pdf_text;
use crate::generation::prompts::{
    CSS_STYLES_PROMPT_TEMPLATE, HTML_STRUCTURE_PROMPT_TEMPLATE, RESUME_CONTENT_PROMPT_TEMPLATE,
};
use crate::llm_client::{TextGenerator, MODEL};
use crate::pipeline::extract::strip_code_fences;

/// Sentinel the extraction prompt returns for non-professional input.
const INVALID_CONTENT_SENTINEL: &str = "Invalid content detected";

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// User-selected presentation options, echoed into every generation prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Customizations {
    pub theme: String,
    pub layout: String,
    pub color_scheme: String,
    pub font_family: String,
    pub show_profile_picture: bool,
    pub show_social_links: bool,
    pub show_skills_chart: bool,
}

impl Default for Customizations {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            layout: "modern".to_string(),
            color_scheme: "blue".to_string(),
            font_family: "sans-serif".to_string(),
            show_profile_picture: false,
            show_social_links: true,
            show_skills_chart: false,
        }
    }
}

impl Customizations {
    /// Renders the options as the bullet list the prompts expect.
    pub fn as_prompt_block(&self) -> String {
        format!(
            "- Theme: {}\n- Layout: {}\n- Color Scheme: {}\n- Font Family: {}\n\
             - Show Profile Picture: {}\n- Show Social Links: {}\n- Show Skills Chart: {}",
            self.theme,
            self.layout,
            self.color_scheme,
            self.font_family,
            self.show_profile_picture,
            self.show_social_links,
            self.show_skills_chart
        )
    }
}

/// Request body for the full generation pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratePortfolioRequest {
    pub base64_file: String,
    #[serde(default)]
    pub customizations: Customizations,
}

/// Output of the three generation stages.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratePortfolioResponse {
    pub resume_content: String,
    pub html_structure: String,
    pub css_styles: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Input screening
// ────────────────────────────────────────────────────────────────────────────

fn injection_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)jailbreak|prompt injection|ignore previous instructions|system prompt|role play|pretend to be|as an AI language model",
        )
        .expect("injection regex is valid")
    })
}

fn contact_info_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}|github\.com/[a-zA-Z0-9-]+|linkedin\.com/in/[a-zA-Z0-9-]+|(\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}",
        )
        .expect("contact info regex is valid")
    })
}

/// Removes characters commonly used to smuggle markup or template syntax
/// into prompts.
pub fn sanitize_input(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '<' | '>' | '{' | '}' | '[' | ']'))
        .collect()
}

/// True when the text trips any known prompt-injection pattern.
pub fn is_suspicious(text: &str) -> bool {
    injection_regex().is_match(text)
}

/// True when the text carries at least one plausible contact channel
/// (email, GitHub, LinkedIn, or phone).
pub fn has_contact_info(text: &str) -> bool {
    contact_info_regex().is_match(text)
}

// ────────────────────────────────────────────────────────────────────────────
// Generation pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Runs the full three-stage pipeline from an uploaded PDF to HTML + CSS.
pub async fn generate_portfolio(
    llm: &dyn TextGenerator,
    scope_class: &str,
    request: GeneratePortfolioRequest,
) -> Result<GeneratePortfolioResponse, AppError> {
    let pdf_text = extract_pdf_text(&request.base64_file)?;
    let pdf_text = sanitize_input(&pdf_text);

    if is_suspicious(&pdf_text) {
        return Err(AppError::Validation(
            "Resume content failed safety screening".to_string(),
        ));
    }
    if !has_contact_info(&pdf_text) {
        warn!("No contact info detected in resume text; continuing anyway");
    }

    // Stage 1: structured resume content
    let prompt = RESUME_CONTENT_PROMPT_TEMPLATE.replace("{resume_text}", &pdf_text);
    let resume_content = call_stage(llm, &prompt, "resume content").await?;
    if resume_content.contains(INVALID_CONTENT_SENTINEL) {
        return Err(AppError::Validation(
            "Invalid content detected in resume".to_string(),
        ));
    }
    let resume_content = strip_code_fences(&resume_content);

    // Stage 2: HTML structure
    let customizations = request.customizations.as_prompt_block();
    let prompt = HTML_STRUCTURE_PROMPT_TEMPLATE
        .replace("{resume_content}", &resume_content)
        .replace("{customizations}", &customizations)
        .replace("{scope_class}", scope_class);
    let html_structure = strip_code_fences(&call_stage(llm, &prompt, "HTML structure").await?);

    // Stage 3: CSS styles
    let prompt = CSS_STYLES_PROMPT_TEMPLATE
        .replace("{html}", &html_structure)
        .replace("{customizations}", &customizations)
        .replace("{scope_class}", scope_class);
    let css_styles = strip_code_fences(&call_stage(llm, &prompt, "CSS styles").await?);

    info!(
        "Generated portfolio: {} chars html, {} chars css",
        html_structure.len(),
        css_styles.len()
    );

    Ok(GeneratePortfolioResponse {
        resume_content,
        html_structure,
        css_styles,
    })
}

async fn call_stage(
    llm: &dyn TextGenerator,
    prompt: &str,
    stage: &str,
) -> Result<String, AppError> {
    llm.generate(MODEL, prompt)
        .await
        .map_err(|e| AppError::Llm(format!("{stage} generation failed: {e}")))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_input_strips_markup_characters() {
        assert_eq!(
            sanitize_input("hello <b>world</b> {x} [y]"),
            "hello bworld/b x y"
        );
    }

    #[test]
    fn test_injection_patterns_detected_case_insensitively() {
        assert!(is_suspicious("please IGNORE PREVIOUS INSTRUCTIONS and"));
        assert!(is_suspicious("this is a jailbreak attempt"));
        assert!(!is_suspicious("ten years of systems engineering"));
    }

    #[test]
    fn test_contact_info_detection() {
        assert!(has_contact_info("reach me at jane@example.com"));
        assert!(has_contact_info("github.com/janedoe"));
        assert!(has_contact_info("call 555-123-4567"));
        assert!(!has_contact_info("no way to reach this person"));
    }

    #[test]
    fn test_customizations_default_and_prompt_block() {
        let c = Customizations::default();
        assert_eq!(c.theme, "dark");
        let block = c.as_prompt_block();
        assert!(block.contains("- Theme: dark"));
        assert!(block.contains("- Color Scheme: blue"));
    }

    #[test]
    fn test_customizations_partial_json_fills_defaults() {
        let c: Customizations = serde_json::from_str(r#"{"theme": "light"}"#).unwrap();
        assert_eq!(c.theme, "light");
        assert_eq!(c.layout, "modern", "missing fields take defaults");
    }
}
