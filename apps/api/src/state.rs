use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::TextGenerator;
use crate::rate_limit::RateLimiter;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Generative backend behind a trait object so tests can swap in a mock.
    pub llm: Arc<dyn TextGenerator>,
    /// Plain HTTP client for scraping and the deploy API.
    pub http: reqwest::Client,
    pub config: Config,
    pub limiter: Arc<RateLimiter>,
}
