pub mod health;

use axum::{middleware, routing::get, routing::post, Router};

use crate::deploy;
use crate::design;
use crate::errors::AppError;
use crate::generation::handlers;
use crate::rate_limit::rate_limit_middleware;
use crate::state::AppState;

async fn not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

pub fn build_router(state: AppState) -> Router {
    // Everything under /api/v1 shares the per-client rate limit. The
    // health probe stays outside it so orchestrators are never throttled.
    let api = Router::new()
        .route("/api/v1/extract-text", post(handlers::handle_extract_text))
        .route("/api/v1/generate", post(handlers::handle_generate))
        .route(
            "/api/v1/generate-sections",
            post(handlers::handle_generate_sections),
        )
        .route("/api/v1/finalize", post(handlers::handle_finalize))
        .route("/api/v1/suggest", post(handlers::handle_suggest))
        .route("/api/v1/search", post(design::handlers::handle_search))
        .route("/api/v1/scrape", post(design::handlers::handle_scrape))
        .route(
            "/api/v1/summarise-design",
            post(design::handlers::handle_summarise),
        )
        .route("/api/v1/deploy", post(deploy::handle_deploy))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    Router::new()
        .route("/health", get(health::health_handler))
        .merge(api)
        .fallback(not_found)
        .with_state(state)
}
