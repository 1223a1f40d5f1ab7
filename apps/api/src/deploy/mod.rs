//! One-click deployment of a generated portfolio to GitHub Pages.
//!
//! The flow mirrors what a user would do by hand: create (or reuse) a
//! repository, push a single `index.html` with the CSS inlined, then
//! enable Pages on the main branch.

use axum::{extract::State, Json};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::errors::AppError;
use crate::state::AppState;

const GITHUB_API: &str = "https://api.github.com";
const REPO_NAME: &str = "my-portfolio";
const USER_AGENT: &str = "portfolio-deployer";

#[derive(Debug, Deserialize)]
pub struct DeployRequest {
    pub github_token: String,
    pub html: String,
    pub css: String,
}

#[derive(Debug, Serialize)]
pub struct DeployResponse {
    pub success: bool,
    pub url: String,
    pub repo: String,
}

#[derive(Debug, Deserialize)]
struct GithubUser {
    login: String,
}

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    sha: Option<String>,
}

/// Wraps the generated fragment and stylesheet into a standalone page.
pub fn build_index_html(html: &str, css: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <title>Portfolio</title>\n\
         <style>\n{css}\n</style>\n\
         </head>\n\
         <body>\n{html}\n</body>\n\
         </html>\n"
    )
}

struct GithubClient<'a> {
    http: &'a reqwest::Client,
    token: &'a str,
}

impl<'a> GithubClient<'a> {
    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, format!("{GITHUB_API}{path}"))
            .header("Authorization", format!("Bearer {}", self.token))
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/vnd.github+json")
    }

    async fn authenticated_user(&self) -> Result<String, AppError> {
        let resp = self
            .request(reqwest::Method::GET, "/user")
            .send()
            .await
            .map_err(|e| AppError::Deploy(format!("GitHub request failed: {e}")))?;

        if resp.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AppError::Deploy("Invalid GitHub token".to_string()));
        }
        if !resp.status().is_success() {
            return Err(AppError::Deploy(format!(
                "GitHub user lookup failed with status {}",
                resp.status()
            )));
        }

        let user: GithubUser = resp
            .json()
            .await
            .map_err(|e| AppError::Deploy(format!("Unexpected GitHub response: {e}")))?;
        Ok(user.login)
    }

    /// Creates the portfolio repository. A 422 means it already exists,
    /// which is fine: redeploys update the same repo.
    async fn ensure_repo(&self) -> Result<(), AppError> {
        let resp = self
            .request(reqwest::Method::POST, "/user/repos")
            .json(&json!({
                "name": REPO_NAME,
                "description": "My portfolio website, generated from my resume",
                "auto_init": true,
            }))
            .send()
            .await
            .map_err(|e| AppError::Deploy(format!("GitHub request failed: {e}")))?;

        let status = resp.status();
        if status.is_success() || status == reqwest::StatusCode::UNPROCESSABLE_ENTITY {
            return Ok(());
        }
        Err(AppError::Deploy(format!(
            "Repository creation failed with status {status}"
        )))
    }

    async fn existing_file_sha(&self, owner: &str) -> Option<String> {
        let resp = self
            .request(
                reqwest::Method::GET,
                &format!("/repos/{owner}/{REPO_NAME}/contents/index.html"),
            )
            .send()
            .await
            .ok()?;
        if !resp.status().is_success() {
            return None;
        }
        resp.json::<ContentsResponse>().await.ok()?.sha
    }

    async fn put_index_html(&self, owner: &str, content: &str) -> Result<(), AppError> {
        let mut body = json!({
            "message": "Deploy portfolio",
            "content": BASE64.encode(content),
        });
        // Updating an existing file requires its current blob sha.
        if let Some(sha) = self.existing_file_sha(owner).await {
            body["sha"] = json!(sha);
        }

        let resp = self
            .request(
                reqwest::Method::PUT,
                &format!("/repos/{owner}/{REPO_NAME}/contents/index.html"),
            )
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Deploy(format!("GitHub request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::Deploy(format!(
                "Uploading index.html failed with status {}",
                resp.status()
            )));
        }
        Ok(())
    }

    /// Enables Pages on the main branch. 409 means Pages is already
    /// configured from a previous deploy.
    async fn enable_pages(&self, owner: &str) -> Result<(), AppError> {
        let resp = self
            .request(
                reqwest::Method::POST,
                &format!("/repos/{owner}/{REPO_NAME}/pages"),
            )
            .json(&json!({
                "source": { "branch": "main", "path": "/" },
            }))
            .send()
            .await
            .map_err(|e| AppError::Deploy(format!("GitHub request failed: {e}")))?;

        let status = resp.status();
        if status.is_success() || status == reqwest::StatusCode::CONFLICT {
            return Ok(());
        }
        Err(AppError::Deploy(format!(
            "Enabling GitHub Pages failed with status {status}"
        )))
    }
}

pub async fn deploy_portfolio(
    http: &reqwest::Client,
    request: DeployRequest,
) -> Result<DeployResponse, AppError> {
    if request.github_token.trim().is_empty() {
        return Err(AppError::Validation(
            "GitHub token is required".to_string(),
        ));
    }
    if request.html.trim().is_empty() {
        return Err(AppError::Validation("HTML content is required".to_string()));
    }

    let client = GithubClient {
        http,
        token: &request.github_token,
    };

    let owner = client.authenticated_user().await?;
    tracing::info!(owner = %owner, "deploying portfolio to GitHub Pages");

    client.ensure_repo().await?;
    let index = build_index_html(&request.html, &request.css);
    client.put_index_html(&owner, &index).await?;
    client.enable_pages(&owner).await?;

    Ok(DeployResponse {
        success: true,
        url: format!("https://{owner}.github.io/{REPO_NAME}"),
        repo: format!("{owner}/{REPO_NAME}"),
    })
}

/// POST /api/v1/deploy
pub async fn handle_deploy(
    State(state): State<AppState>,
    Json(request): Json<DeployRequest>,
) -> Result<Json<DeployResponse>, AppError> {
    let response = deploy_portfolio(&state.http, request).await?;
    Ok(Json(response))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_index_html_embeds_content() {
        let page = build_index_html("<h1>Jane Doe</h1>", "h1 { color: navy; }");
        assert!(page.starts_with("<!DOCTYPE html>"), "should be a full document");
        assert!(
            page.contains("<style>\nh1 { color: navy; }\n</style>"),
            "css should be inlined in a style block"
        );
        assert!(page.contains("<h1>Jane Doe</h1>"), "html fragment should be in the body");
        assert!(page.contains("viewport"), "should carry a viewport meta tag");
    }

    #[test]
    fn test_build_index_html_empty_css() {
        let page = build_index_html("<p>hi</p>", "");
        assert!(page.contains("<style>\n\n</style>"));
    }

    #[tokio::test]
    async fn test_deploy_rejects_missing_token() {
        let http = reqwest::Client::new();
        let err = deploy_portfolio(
            &http,
            DeployRequest {
                github_token: "  ".to_string(),
                html: "<p>hi</p>".to_string(),
                css: String::new(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_deploy_rejects_empty_html() {
        let http = reqwest::Client::new();
        let err = deploy_portfolio(
            &http,
            DeployRequest {
                github_token: "ghp_token".to_string(),
                html: String::new(),
                css: String::new(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
