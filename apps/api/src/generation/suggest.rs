//! Suggestion application: one JSON-only LLM call revising the current
//! document per a user request.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::generation::prompts::SUGGEST_PROMPT_TEMPLATE;
use crate::llm_client::{generate_json, TextGenerator, MODEL};

#[derive(Debug, Clone, Deserialize)]
pub struct SuggestRequest {
    pub current_html: String,
    pub current_css: String,
    pub suggestion: String,
}

/// The revised document as returned by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestedRevision {
    pub html: String,
    pub css: String,
}

/// Applies a freeform user suggestion to the current HTML/CSS.
pub async fn apply_suggestion(
    llm: &dyn TextGenerator,
    scope_class: &str,
    request: SuggestRequest,
) -> Result<SuggestedRevision, AppError> {
    if request.suggestion.trim().is_empty() {
        return Err(AppError::Validation("suggestion is required".to_string()));
    }

    let prompt = SUGGEST_PROMPT_TEMPLATE
        .replace("{current_html}", &request.current_html)
        .replace("{current_css}", &request.current_css)
        .replace("{suggestion}", &request.suggestion)
        .replace("{scope_class}", scope_class);

    generate_json::<SuggestedRevision>(llm, MODEL, &prompt)
        .await
        .map_err(|e| AppError::Llm(format!("Suggestion failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use async_trait::async_trait;

    struct FixedBackend(String);

    #[async_trait]
    impl TextGenerator for FixedBackend {
        async fn generate(&self, _model: &str, _prompt: &str) -> Result<String, LlmError> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_fenced_json_response_accepted() {
        let backend =
            FixedBackend("```json\n{\"html\": \"<p/>\", \"css\": \".p{}\"}\n```".to_string());
        let out = apply_suggestion(
            &backend,
            "ai-resume-isolation",
            SuggestRequest {
                current_html: "<p>old</p>".to_string(),
                current_css: ".p{}".to_string(),
                suggestion: "make it pop".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(out.html, "<p/>");
    }

    #[tokio::test]
    async fn test_empty_suggestion_rejected() {
        let backend = FixedBackend("{}".to_string());
        let err = apply_suggestion(
            &backend,
            "ai-resume-isolation",
            SuggestRequest {
                current_html: String::new(),
                current_css: String::new(),
                suggestion: "  ".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
