//! Axum handlers for the generation endpoints.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::generation::finalize::{finalize_portfolio, FinalizeRequest, FinalizeResponse};
use crate::generation::pdf_text::extract_pdf_text;
use crate::generation::resume::{
    generate_portfolio, GeneratePortfolioRequest, GeneratePortfolioResponse,
};
use crate::generation::sections::{
    generate_sections, GenerateSectionsRequest, GenerateSectionsResponse,
};
use crate::generation::suggest::{apply_suggestion, SuggestRequest, SuggestedRevision};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExtractTextRequest {
    pub base64_file: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractTextResponse {
    pub success: bool,
    pub text: String,
}

/// POST /api/v1/extract-text
pub async fn handle_extract_text(
    Json(request): Json<ExtractTextRequest>,
) -> Result<Json<ExtractTextResponse>, AppError> {
    let text = extract_pdf_text(&request.base64_file)?;
    Ok(Json(ExtractTextResponse {
        success: true,
        text,
    }))
}

/// POST /api/v1/generate
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GeneratePortfolioRequest>,
) -> Result<Json<GeneratePortfolioResponse>, AppError> {
    let scope_class = state.config.scope_selector.trim_start_matches('.');
    let response = generate_portfolio(state.llm.as_ref(), scope_class, request).await?;
    Ok(Json(response))
}

/// POST /api/v1/generate-sections
pub async fn handle_generate_sections(
    State(state): State<AppState>,
    Json(request): Json<GenerateSectionsRequest>,
) -> Result<Json<GenerateSectionsResponse>, AppError> {
    let response = generate_sections(state.llm.as_ref(), request).await?;
    Ok(Json(response))
}

/// POST /api/v1/finalize
pub async fn handle_finalize(
    State(state): State<AppState>,
    Json(request): Json<FinalizeRequest>,
) -> Result<Json<FinalizeResponse>, AppError> {
    let response =
        finalize_portfolio(state.llm.as_ref(), &state.config.scope_selector, request).await?;
    Ok(Json(response))
}

/// POST /api/v1/suggest
pub async fn handle_suggest(
    State(state): State<AppState>,
    Json(request): Json<SuggestRequest>,
) -> Result<Json<SuggestedRevision>, AppError> {
    let scope_class = state.config.scope_selector.trim_start_matches('.');
    let response = apply_suggestion(state.llm.as_ref(), scope_class, request).await?;
    Ok(Json(response))
}
