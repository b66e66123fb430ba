mod handlers;
mod models;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

pub use handlers::EMPTY_PROMPT_WARNING;
pub use models::{ApiGenerateRequest, ApiGenerateResponse, ErrorResponse, GenerateForm, ViewState};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/about", get(handlers::about))
        .route("/generate", post(handlers::generate))
        .route("/api/generate", post(handlers::api_generate))
        .fallback(handlers::not_found)
        .with_state(state)
}
