//! Design summarization: budget the scraped examples, then ask the backend
//! for reusable patterns covering the sections about to be generated.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::design::prompts::SUMMARY_PROMPT_TEMPLATE;
use crate::errors::AppError;
use crate::llm_client::{TextGenerator, MODEL_LITE};
use crate::pipeline::budget::{build_design_payload, RawExample, MAX_TOTAL_CONTEXT_CHARS};

#[derive(Debug, Clone, Deserialize)]
pub struct SummariseRequest {
    pub scraped_data: Vec<RawExample>,
    pub sections: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummariseResponse {
    pub success: bool,
    pub summary: String,
    pub example_count: usize,
}

/// Summarizes the scraped design examples relevant to `sections`.
///
/// No relevant examples is a valid outcome, answered without an LLM call.
pub async fn summarise_design(
    llm: &dyn TextGenerator,
    request: SummariseRequest,
) -> Result<SummariseResponse, AppError> {
    if request.sections.is_empty() {
        return Err(AppError::Validation(
            "At least one section name is required".to_string(),
        ));
    }

    let payload = build_design_payload(
        &request.scraped_data,
        &request.sections,
        MAX_TOTAL_CONTEXT_CHARS,
    );

    if payload.examples.is_empty() {
        info!("No relevant design examples for sections: {}", request.sections.join(", "));
        return Ok(SummariseResponse {
            success: true,
            summary: "No relevant design examples found for the requested sections.".to_string(),
            example_count: 0,
        });
    }

    info!(
        "Summarising {} examples, {} chars payload (degraded: {})",
        payload.examples.len(),
        payload.json.len(),
        payload.degraded
    );

    let prompt = SUMMARY_PROMPT_TEMPLATE
        .replace("{sections}", &request.sections.join(", "))
        .replace("{count}", &payload.examples.len().to_string())
        .replace("{data}", &payload.json);

    let summary = llm
        .generate(MODEL_LITE, &prompt)
        .await
        .map_err(|e| AppError::Llm(format!("Design summarization failed: {e}")))?;

    Ok(SummariseResponse {
        success: true,
        summary,
        example_count: payload.examples.len(),
    })
}
