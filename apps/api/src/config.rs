use anyhow::{Context, Result};

use crate::pipeline::DEFAULT_SCOPE_SELECTOR;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    /// CSS selector all generated styles are scoped under for preview.
    pub scope_selector: String,
    pub port: u16,
    pub rust_log: String,
    /// Fixed-window rate limit: max requests per window per client IP.
    pub rate_limit_max: u32,
    pub rate_limit_window_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            scope_selector: std::env::var("SCOPE_SELECTOR")
                .unwrap_or_else(|_| DEFAULT_SCOPE_SELECTOR.to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            rate_limit_max: std::env::var("RATE_LIMIT_MAX")
                .unwrap_or_else(|_| "15".to_string())
                .parse::<u32>()
                .context("RATE_LIMIT_MAX must be an integer")?,
            rate_limit_window_secs: std::env::var("RATE_LIMIT_WINDOW_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse::<u64>()
                .context("RATE_LIMIT_WINDOW_SECS must be an integer")?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
