//! Portfolio discovery: asks the backend for candidate portfolio URLs and
//! filters them down to scrapeable targets.

use serde::{Deserialize, Serialize};

use crate::design::prompts::SEARCH_PROMPT_TEMPLATE;
use crate::errors::AppError;
use crate::llm_client::{generate_json, TextGenerator, MODEL};

/// At most this many URLs are returned to the scraper.
const MAX_SEARCH_RESULTS: usize = 5;

#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    pub keywords: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub urls: Vec<String>,
}

/// Finds portfolio sites matching `keywords`.
pub async fn search_portfolios(
    llm: &dyn TextGenerator,
    request: SearchRequest,
) -> Result<SearchResponse, AppError> {
    if request.keywords.trim().is_empty() {
        return Err(AppError::Validation("Keywords are required".to_string()));
    }

    let prompt = SEARCH_PROMPT_TEMPLATE.replace("{keywords}", &request.keywords);
    let candidates: Vec<String> = generate_json(llm, MODEL, &prompt)
        .await
        .map_err(|e| AppError::Llm(format!("Portfolio search failed: {e}")))?;

    let urls = filter_portfolio_urls(candidates);

    if urls.is_empty() {
        return Err(AppError::Llm("No valid portfolio URLs found".to_string()));
    }

    Ok(SearchResponse {
        success: true,
        urls,
    })
}

/// Keeps http(s) URLs, drops profile hosts the scraper cannot use, caps the
/// result count.
fn filter_portfolio_urls(candidates: Vec<String>) -> Vec<String> {
    candidates
        .into_iter()
        .filter(|url| {
            url.starts_with("http") && !url.contains("linkedin.com") && !url.contains("github.com")
        })
        .take(MAX_SEARCH_RESULTS)
        .collect()
}
