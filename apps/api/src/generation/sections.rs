//! Multi-section generation: one LLM round producing several named
//! portfolio sections, parsed back out with the marked-block extractor.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::generation::prompts::{MULTI_SECTION_FORMAT_TEMPLATE, SINGLE_SECTION_FORMAT_TEMPLATE};
use crate::generation::resume::Customizations;
use crate::llm_client::{TextGenerator, MODEL};
use crate::pipeline::extract::{extract_section_blocks, SectionBlock};
use crate::pipeline::truncate_chars;

/// How much of the resume, existing portfolio, and design examples gets
/// embedded for context.
const RESUME_CONTEXT_CHARS: usize = 2000;
const PORTFOLIO_CONTEXT_CHARS: usize = 1000;
const DESIGN_SNIPPET_CHARS: usize = 300;

/// The portfolio assembled so far, passed back for visual continuity.
#[derive(Debug, Clone, Deserialize)]
pub struct PortfolioSnapshot {
    pub html: String,
    pub css: String,
}

/// A scraped design fragment offered as inspiration.
#[derive(Debug, Clone, Deserialize)]
pub struct DesignSnippet {
    pub html: String,
    pub css: String,
}

/// Request body for section generation.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateSectionsRequest {
    pub sections: Vec<String>,
    pub resume_text: String,
    #[serde(default)]
    pub current_portfolio: Option<PortfolioSnapshot>,
    #[serde(default)]
    pub customizations: Customizations,
    #[serde(default)]
    pub design_examples: Vec<DesignSnippet>,
    /// Design-pattern summary produced by the summarise endpoint, if any.
    #[serde(default)]
    pub design_summary: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateSectionsResponse {
    pub sections: Vec<SectionBlock>,
}

/// Generates the requested sections in a single LLM round.
///
/// Zero extracted blocks is a hard failure for the round; fewer blocks than
/// requested is a valid partial result the caller can retry per-name.
pub async fn generate_sections(
    llm: &dyn TextGenerator,
    request: GenerateSectionsRequest,
) -> Result<GenerateSectionsResponse, AppError> {
    if request.sections.is_empty() {
        return Err(AppError::Validation(
            "At least one section name is required".to_string(),
        ));
    }
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation("resume_text is required".to_string()));
    }

    info!("Generating sections: {}", request.sections.join(", "));

    let prompt = build_multi_section_prompt(&request);
    let response = llm
        .generate(MODEL, &prompt)
        .await
        .map_err(|e| AppError::Llm(format!("Section generation failed: {e}")))?;

    let blocks = extract_section_blocks(&response, &request.sections);

    if blocks.is_empty() {
        return Err(AppError::Llm(format!(
            "Failed to parse response for sections: {}",
            request.sections.join(", ")
        )));
    }

    info!(
        "Extracted {}/{} requested sections",
        blocks.len(),
        request.sections.len()
    );

    Ok(GenerateSectionsResponse { sections: blocks })
}

/// Builds the multi-section prompt: shared context, per-section instructions,
/// prior portfolio, design examples, and the output-format contract.
pub fn build_multi_section_prompt(request: &GenerateSectionsRequest) -> String {
    let c = &request.customizations;
    let sections = &request.sections;

    let mut prompt = format!(
        "You are an expert web developer specializing in portfolio websites. \
         I need you to generate {} of a portfolio website based on this resume:\n\n{}\n\n\
         The website should follow these specifications:\n\
         - Theme: {}\n- Layout: {}\n- Color scheme: {}\n- Font family: {}\n\n",
        if sections.len() > 1 {
            "multiple sections"
        } else {
            "a section"
        },
        truncate_chars(&request.resume_text, RESUME_CONTEXT_CHARS),
        c.theme,
        c.layout,
        c.color_scheme,
        c.font_family,
    );

    if sections.len() > 1 {
        prompt.push_str(&format!(
            "I need you to generate the following sections: {}\n",
            sections.join(", ")
        ));
    } else {
        prompt.push_str(&format!(
            "I need you to generate the {} section\n",
            sections[0]
        ));
    }

    for section in sections {
        prompt.push_str(&format!(
            "\n\n### SECTION: {} ###\n{}",
            section.to_uppercase(),
            section_instructions(section, &c.theme, &c.color_scheme)
        ));
    }

    if let Some(summary) = request.design_summary.as_deref().filter(|s| !s.is_empty()) {
        prompt.push_str(&format!(
            "\n\nDesign patterns observed in comparable portfolios (follow where sensible):\n{summary}\n"
        ));
    }

    if let Some(portfolio) = &request.current_portfolio {
        prompt.push_str(&format!(
            "\n\nHere's what we've generated so far for the portfolio. \
             Make sure your sections integrate well with this:\n\n\
             HTML Structure:\n```html\n{}...\n```\n\nCSS So Far:\n```css\n{}...\n```\n",
            truncate_chars(&portfolio.html, PORTFOLIO_CONTEXT_CHARS),
            truncate_chars(&portfolio.css, PORTFOLIO_CONTEXT_CHARS),
        ));
    }

    if let Some(example) = request.design_examples.first() {
        prompt.push_str(&format!(
            "\n\nFor inspiration, here's a snippet from another portfolio website:\n\n\
             ```html\n{}...\n```\n\n```css\n{}...\n```\n",
            truncate_chars(&example.html, DESIGN_SNIPPET_CHARS),
            truncate_chars(&example.css, DESIGN_SNIPPET_CHARS),
        ));
    }

    if sections.len() > 1 {
        prompt.push_str(
            &MULTI_SECTION_FORMAT_TEMPLATE
                .replace("{first}", &sections[0])
                .replace("{second}", &sections[1]),
        );
    } else {
        prompt.push_str(&SINGLE_SECTION_FORMAT_TEMPLATE.replace("{section}", &sections[0]));
    }

    prompt
}

/// Per-section design brief embedded in the prompt.
fn section_instructions(section: &str, theme: &str, color_scheme: &str) -> String {
    match section {
        "layout-structure" => "\
Create the overall HTML structure for a portfolio website. Do not include the actual content sections yet.
Just provide the base HTML with appropriate div containers, classes, and structure that will house all the future sections.
Focus on creating a clean, semantic layout with well-named classes.
"
        .to_string(),
        "header" => format!(
            "\
Create the header section including navigation. It should have:
- The person's name as the main title
- A professional title/role
- Navigation links to other sections of the portfolio
- Professional, clean design matching the {theme} theme and {color_scheme} color scheme
"
        ),
        "about" => format!(
            "\
Create an \"About Me\" section that:
- Introduces the person professionally
- Highlights their career focus and professional philosophy
- Presents their personality and working style
- Maintains the {theme} theme and {color_scheme} color scheme
"
        ),
        "skills" => format!(
            "\
Create a \"Skills\" section that:
- Lists technical skills from the resume
- Organizes them by category or proficiency
- Presents them in a visually appealing way (progress bars, tags, etc.)
- Maintains the {theme} theme and {color_scheme} color scheme
"
        ),
        "projects" => format!(
            "\
Create a \"Projects\" section that:
- Showcases 3-4 key projects from the resume
- Includes project titles, descriptions, and technologies used
- Uses a grid or card-based layout
- Maintains the {theme} theme and {color_scheme} color scheme
"
        ),
        "experience" => format!(
            "\
Create an \"Experience\" section that:
- Lists work experience from the resume
- Includes job titles, companies, dates, and key responsibilities
- Presents the information in a clean, chronological format
- Maintains the {theme} theme and {color_scheme} color scheme
"
        ),
        "education" => format!(
            "\
Create an \"Education\" section that:
- Lists educational background from the resume
- Includes degrees, institutions, dates, and any notable achievements
- Maintains the {theme} theme and {color_scheme} color scheme
"
        ),
        "contact" => format!(
            "\
Create a \"Contact\" section that:
- Includes contact information from the resume
- May have a simple contact form
- Includes social media links if appropriate
- Maintains the {theme} theme and {color_scheme} color scheme
"
        ),
        "footer" => format!(
            "\
Create a footer section that:
- Includes copyright information
- May have additional navigation links
- Has a clean, minimal design
- Maintains the {theme} theme and {color_scheme} color scheme
"
        ),
        other => format!(
            "Create a general section for {other} that fits with the overall portfolio design."
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(sections: &[&str]) -> GenerateSectionsRequest {
        GenerateSectionsRequest {
            sections: sections.iter().map(|s| s.to_string()).collect(),
            resume_text: "Jane Doe, jane@example.com, 10 years of Rust".to_string(),
            current_portfolio: None,
            customizations: Customizations::default(),
            design_examples: vec![],
            design_summary: None,
        }
    }

    #[test]
    fn test_multi_section_prompt_names_each_section() {
        let prompt = build_multi_section_prompt(&request(&["header", "skills"]));
        assert!(prompt.contains("### SECTION: HEADER ###"));
        assert!(prompt.contains("### SECTION: SKILLS ###"));
        assert!(prompt.contains("---header---"), "format contract must show markers");
    }

    #[test]
    fn test_single_section_prompt_omits_markers() {
        let prompt = build_multi_section_prompt(&request(&["about"]));
        assert!(!prompt.contains("---about---"), "single section needs no markers");
        assert!(prompt.contains("```html"));
    }

    #[test]
    fn test_unknown_section_gets_generic_brief() {
        let prompt = build_multi_section_prompt(&request(&["testimonials"]));
        assert!(prompt.contains("general section for testimonials"));
    }

    #[test]
    fn test_resume_text_clipped_in_prompt() {
        let mut req = request(&["header"]);
        req.resume_text = "x".repeat(5000);
        let prompt = build_multi_section_prompt(&req);
        assert!(prompt.contains(&"x".repeat(RESUME_CONTEXT_CHARS)));
        assert!(
            !prompt.contains(&"x".repeat(RESUME_CONTEXT_CHARS + 1)),
            "resume context must be clipped"
        );
    }

    #[test]
    fn test_current_portfolio_embedded_when_present() {
        let mut req = request(&["header"]);
        req.current_portfolio = Some(PortfolioSnapshot {
            html: "<main class=\"shell\"></main>".to_string(),
            css: ".shell{display:grid;}".to_string(),
        });
        let prompt = build_multi_section_prompt(&req);
        assert!(prompt.contains("generated so far"));
        assert!(prompt.contains(".shell{display:grid;}"));
    }
}
