use std::sync::Arc;

use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Form, Json,
};
use tracing::{info, instrument, warn};

use crate::inference::{
    clamp_max_tokens, clamp_temperature, GenerationRequest, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE,
};
use crate::AppState;

use super::models::{
    ApiGenerateRequest, ApiGenerateResponse, ErrorResponse, GenerateForm, ViewState,
};

pub const EMPTY_PROMPT_WARNING: &str = "Please enter a prompt first.";

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    prompt: String,
    max_tokens: u32,
    temperature: f64,
    state: ViewState,
}

#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutTemplate;

pub async fn index() -> IndexTemplate {
    IndexTemplate {
        prompt: String::new(),
        max_tokens: DEFAULT_MAX_TOKENS,
        temperature: DEFAULT_TEMPERATURE,
        state: ViewState::Idle,
    }
}

pub async fn about() -> AboutTemplate {
    AboutTemplate
}

/// Form submission: validate, call the model, re-render the page with the
/// submitted values still filled in.
#[instrument(skip_all)]
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Form(form): Form<GenerateForm>,
) -> IndexTemplate {
    let prompt = form.prompt.trim();
    if prompt.is_empty() {
        return IndexTemplate {
            max_tokens: clamp_max_tokens(form.max_tokens),
            temperature: clamp_temperature(form.temperature),
            prompt: form.prompt,
            state: ViewState::Warning(EMPTY_PROMPT_WARNING.to_string()),
        };
    }

    let request = GenerationRequest::new(prompt, form.max_tokens, form.temperature);
    let outcome = match state.client.generate(&request).await {
        Ok(text) => {
            info!(generated_chars = text.chars().count(), "generation succeeded");
            ViewState::Success(text)
        }
        Err(err) => {
            warn!(%err, "generation failed");
            ViewState::Failure(err.to_string())
        }
    };

    IndexTemplate {
        prompt: form.prompt,
        max_tokens: request.max_tokens,
        temperature: request.temperature,
        state: outcome,
    }
}

#[instrument(skip_all)]
pub async fn api_generate(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ApiGenerateRequest>,
) -> Result<Json<ApiGenerateResponse>, (StatusCode, Json<ErrorResponse>)> {
    let prompt = payload.prompt.trim();
    if prompt.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "prompt must not be empty".to_string(),
            }),
        ));
    }

    let request = GenerationRequest::new(prompt, payload.max_tokens, payload.temperature);
    match state.client.generate(&request).await {
        Ok(text) => Ok(Json(ApiGenerateResponse { text })),
        Err(err) => {
            warn!(%err, "generation failed");
            Err((
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: err.to_string(),
                }),
            ))
        }
    }
}

pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "route not found".to_string(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(state: ViewState) -> String {
        IndexTemplate {
            prompt: "x".to_string(),
            max_tokens: 200,
            temperature: 0.2,
            state,
        }
        .render()
        .unwrap()
    }

    #[test]
    fn idle_page_renders_form_only() {
        let html = page(ViewState::Idle);
        assert!(html.contains(r#"name="prompt""#));
        assert!(!html.contains(r#"<div class="banner"#));
    }

    #[test]
    fn success_renders_code_block_and_indicator() {
        let html = page(ViewState::Success("def foo(): pass".to_string()));
        assert!(html.contains("<pre><code>def foo(): pass</code></pre>"));
        assert!(html.contains("Code generated successfully."));
    }

    #[test]
    fn warning_renders_banner() {
        let html = page(ViewState::Warning(EMPTY_PROMPT_WARNING.to_string()));
        assert!(html.contains(EMPTY_PROMPT_WARNING));
    }

    #[test]
    fn generated_text_is_html_escaped() {
        let html = page(ViewState::Success("<script>alert(1)</script>".to_string()));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>alert"));
    }
}
