//! Axum handlers for the design-discovery endpoints.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::design::scraper::scrape_sites;
use crate::design::search::{search_portfolios, SearchRequest, SearchResponse};
use crate::design::summary::{summarise_design, SummariseRequest, SummariseResponse};
use crate::errors::AppError;
use crate::pipeline::budget::RawExample;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ScrapeRequest {
    pub urls: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ScrapeResponse {
    pub success: bool,
    pub data: Vec<RawExample>,
    pub count: usize,
}

/// POST /api/v1/scrape
pub async fn handle_scrape(
    State(state): State<AppState>,
    Json(request): Json<ScrapeRequest>,
) -> Result<Json<ScrapeResponse>, AppError> {
    if request.urls.is_empty() {
        return Err(AppError::Validation("URLs array is required".to_string()));
    }

    let data = scrape_sites(&state.http, &request.urls).await;
    let count = data.len();

    Ok(Json(ScrapeResponse {
        success: true,
        data,
        count,
    }))
}

/// POST /api/v1/summarise-design
pub async fn handle_summarise(
    State(state): State<AppState>,
    Json(request): Json<SummariseRequest>,
) -> Result<Json<SummariseResponse>, AppError> {
    let response = summarise_design(state.llm.as_ref(), request).await?;
    Ok(Json(response))
}

/// POST /api/v1/search
pub async fn handle_search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    let response = search_portfolios(state.llm.as_ref(), request).await?;
    Ok(Json(response))
}
