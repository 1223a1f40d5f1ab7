#![allow(dead_code)]

// All LLM prompt constants for the Design module.

/// Design-summary prompt. Replace: {sections}, {count}, {data}
pub const SUMMARY_PROMPT_TEMPLATE: &str = r#"Analyze these portfolio website examples and create a concise summary with code patterns for sections: {sections}.

Data from {count} websites (content truncated as needed to fit model context):
{data}

For each section type found, provide:
1. Common structural patterns
2. Key CSS classes, responsive behaviors, and layout techniques (reference css_sample when available)
3. Layout strategies and accessibility considerations
4. Brief HTML and CSS code snippets (max 2-3 lines each) directly derived from the provided data
5. Notes on how to adapt the pattern when limited examples are available (infer best practices if necessary)

Keep total response under 800 words with focus on actionable code patterns.
Format as JSON with this structure:
{
  "sectionName": {
    "patterns": ["pattern1", "pattern2"],
    "codeSnippets": ["<div class='...'>", "display: flex;"],
    "layoutApproach": "description",
    "responsiveNotes": "key adjustments for mobile/tablet"
  }
}"#;

/// Portfolio URL discovery prompt. Replace: {keywords}
pub const SEARCH_PROMPT_TEMPLATE: &str = r#"Find 10 professional portfolio websites related to:
{keywords}

Requirements:
- Must be personal portfolio sites
- Must have substantial HTML/CSS content
- Must be publicly accessible
- Prefer modern, well-designed sites

Return only the URLs as a JSON array of strings, nothing else."#;
