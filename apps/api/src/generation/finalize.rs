//! Portfolio finalization: sanitize the assembled document, then run an
//! optional LLM quality-check pass over it.
//!
//! The quality check is best-effort: any failure (backend error, unparsable
//! response) falls back to the sanitized document, never to an error.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::generation::prompts::QUALITY_CHECK_PROMPT_TEMPLATE;
use crate::llm_client::{TextGenerator, MODEL_LITE};
use crate::pipeline::extract::first_fenced;
use crate::pipeline::sanitize::sanitize_output;
use crate::pipeline::scope::scope_css;

/// Request body for finalization.
#[derive(Debug, Clone, Deserialize)]
pub struct FinalizeRequest {
    pub html: String,
    pub css: String,
}

/// Finalized document: `css` is scoped for preview, `original_css` is the
/// unscoped variant kept for deployment.
#[derive(Debug, Clone, Serialize)]
pub struct FinalizeResponse {
    pub html: String,
    pub css: String,
    pub original_css: String,
}

/// Sanitizes and quality-checks the assembled portfolio.
pub async fn finalize_portfolio(
    llm: &dyn TextGenerator,
    scope: &str,
    request: FinalizeRequest,
) -> Result<FinalizeResponse, AppError> {
    if request.html.trim().is_empty() || request.css.trim().is_empty() {
        return Err(AppError::Validation(
            "Both html and css are required".to_string(),
        ));
    }

    let sanitized = sanitize_output(&request.html, &request.css, scope);

    match quality_check(llm, scope, &sanitized.html, &sanitized.original_css).await {
        Some(fixed) => Ok(fixed),
        None => Ok(FinalizeResponse {
            html: sanitized.html,
            css: sanitized.scoped_css,
            original_css: sanitized.original_css,
        }),
    }
}

/// Runs the LLM quality-check pass. Returns None on any failure so the caller
/// falls back to the sanitized document.
async fn quality_check(
    llm: &dyn TextGenerator,
    scope: &str,
    html: &str,
    css: &str,
) -> Option<FinalizeResponse> {
    let prompt = QUALITY_CHECK_PROMPT_TEMPLATE
        .replace("{html}", html)
        .replace("{css}", css);

    let response = match llm.generate(MODEL_LITE, &prompt).await {
        Ok(text) => text,
        Err(e) => {
            warn!("Quality check skipped: {e}");
            return None;
        }
    };

    let Some(fixed_html) = first_fenced(&response, "html") else {
        warn!("Quality check: could not extract HTML from response");
        return None;
    };
    let Some(fixed_css) = first_fenced(&response, "css") else {
        warn!("Quality check: could not extract CSS from response");
        return None;
    };

    info!("Quality check completed");

    // The model returns unscoped CSS; re-scope for preview.
    let scoped = scope_css(&fixed_css, scope);

    Some(FinalizeResponse {
        html: fixed_html,
        css: scoped,
        original_css: fixed_css,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use async_trait::async_trait;

    /// Backend returning a canned response, or failing.
    struct FixedBackend(Option<String>);

    #[async_trait]
    impl TextGenerator for FixedBackend {
        async fn generate(&self, _model: &str, _prompt: &str) -> Result<String, LlmError> {
            self.0.clone().ok_or(LlmError::EmptyContent)
        }
    }

    const SCOPE: &str = ".ai-resume-isolation";

    #[tokio::test]
    async fn test_finalize_rejects_missing_fields() {
        let backend = FixedBackend(None);
        let err = finalize_portfolio(
            &backend,
            SCOPE,
            FinalizeRequest {
                html: "".to_string(),
                css: ".a{}".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_backend_failure_falls_back_to_sanitized_output() {
        let backend = FixedBackend(None);
        let out = finalize_portfolio(
            &backend,
            SCOPE,
            FinalizeRequest {
                html: "<p>hi</p><script>x()</script>".to_string(),
                css: "body{margin:0;}".to_string(),
            },
        )
        .await
        .unwrap();
        assert!(out.html.contains("<p>hi</p>"));
        assert!(!out.html.contains("script"));
        assert_eq!(out.css.trim(), ".ai-resume-isolation {margin:0;}");
        assert_eq!(out.original_css, "body{margin:0;}");
    }

    #[tokio::test]
    async fn test_quality_checked_css_is_rescoped() {
        let backend = FixedBackend(Some(
            "```html\n<p>fixed</p>\n```\n```css\n.a{color:red;}\n```".to_string(),
        ));
        let out = finalize_portfolio(
            &backend,
            SCOPE,
            FinalizeRequest {
                html: "<p>hi</p>".to_string(),
                css: ".a{color:red;}".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(out.html, "<p>fixed</p>");
        assert!(out.css.contains(".ai-resume-isolation .a"));
        assert_eq!(out.original_css, ".a{color:red;}");
    }

    #[tokio::test]
    async fn test_unparsable_quality_response_falls_back() {
        let backend = FixedBackend(Some("I fixed it, trust me.".to_string()));
        let out = finalize_portfolio(
            &backend,
            SCOPE,
            FinalizeRequest {
                html: "<p>hi</p>".to_string(),
                css: ".a{}".to_string(),
            },
        )
        .await
        .unwrap();
        assert!(out.html.contains("<p>hi</p>"), "fallback keeps sanitized html");
    }
}
