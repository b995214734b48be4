//! Request handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;

use obs_context::EngineError;
use obs_pipeline::{PdfRequest, PipelineError};

use crate::state::AppState;

/// Query parameters for `GET /`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct GenerateParams {
    #[serde(default)]
    lang_code: Option<String>,
    #[serde(default)]
    repo: Option<String>,
}

/// Webhook payload posted by the forge on a push or release.
#[derive(Debug, Deserialize)]
pub(crate) struct WebhookPayload {
    repo_name: String,
    #[serde(alias = "user")]
    repo_owner: String,
    #[serde(default = "default_branch")]
    tag_or_branch: String,
}

fn default_branch() -> String {
    "master".to_owned()
}

/// `GET /?lang_code=…` or `GET /?repo=user/name`.
pub(crate) async fn generate(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GenerateParams>,
) -> Response {
    match request_from_params(&params) {
        Ok(request) => run_pipeline(&state, &request).await,
        Err(message) => (StatusCode::BAD_REQUEST, message).into_response(),
    }
}

/// `POST /webhook` with a JSON payload naming the repository.
pub(crate) async fn webhook(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<WebhookPayload>,
) -> Response {
    let request = PdfRequest::RepoRef {
        user: payload.repo_owner,
        repo: payload.repo_name,
        reference: payload.tag_or_branch,
    };
    run_pipeline(&state, &request).await
}

fn request_from_params(params: &GenerateParams) -> Result<PdfRequest, &'static str> {
    if let Some(lang_code) = params.lang_code.as_deref().filter(|code| !code.is_empty()) {
        return Ok(PdfRequest::LangCode(lang_code.to_owned()));
    }
    match params.repo.as_deref().filter(|repo| !repo.is_empty()) {
        Some(spec) => PdfRequest::from_repo_spec(spec)
            .map_err(|_| "Bad Request - invalid Door43 repo specification"),
        None => Err("Bad Request - no lang_code or repo"),
    }
}

async fn run_pipeline(state: &AppState, request: &PdfRequest) -> Response {
    tracing::info!(description = %request.description(), "pipeline triggered");
    match obs_pipeline::run(request, &state.pipeline).await {
        Ok(url) => {
            let link_text = url.strip_prefix("https://").unwrap_or(&url);
            Html(format!("Success @ <a href=\"{url}\">{link_text}</a>")).into_response()
        }
        // The scraped engine log goes back to the caller so a
        // translator can see what broke without server access.
        Err(PipelineError::Engine(EngineError::TexErrors { excerpt })) => (
            StatusCode::OK,
            format!("AN ERROR OCCURRED GENERATING THE PDF\r\n\r\n{excerpt}"),
        )
            .into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn lang_code_wins_over_repo() {
        let params = GenerateParams {
            lang_code: Some("en".to_owned()),
            repo: Some("user/repo".to_owned()),
        };
        assert_eq!(
            request_from_params(&params).unwrap(),
            PdfRequest::LangCode("en".to_owned())
        );
    }

    #[test]
    fn empty_lang_code_falls_back_to_repo() {
        let params = GenerateParams {
            lang_code: Some(String::new()),
            repo: Some("user/repo".to_owned()),
        };
        assert!(matches!(
            request_from_params(&params).unwrap(),
            PdfRequest::Repo { .. }
        ));
    }

    #[test]
    fn missing_parameters_are_a_bad_request() {
        let err = request_from_params(&GenerateParams::default()).unwrap_err();
        assert_eq!(err, "Bad Request - no lang_code or repo");
    }

    #[test]
    fn malformed_repo_is_a_bad_request() {
        let params = GenerateParams {
            lang_code: None,
            repo: Some("too/many/parts".to_owned()),
        };
        let err = request_from_params(&params).unwrap_err();
        assert_eq!(err, "Bad Request - invalid Door43 repo specification");
    }

    #[test]
    fn webhook_payload_accepts_user_alias_and_defaults_branch() {
        let payload: WebhookPayload =
            serde_json::from_str(r#"{"repo_name": "en_obs", "user": "unfoldingword"}"#).unwrap();
        assert_eq!(payload.repo_owner, "unfoldingword");
        assert_eq!(payload.repo_name, "en_obs");
        assert_eq!(payload.tag_or_branch, "master");

        let payload: WebhookPayload = serde_json::from_str(
            r#"{"repo_name": "en_obs", "repo_owner": "u", "tag_or_branch": "v4"}"#,
        )
        .unwrap();
        assert_eq!(payload.tag_or_branch, "v4");
    }
}
