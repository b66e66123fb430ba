use serde::{Deserialize, Serialize};

use crate::inference::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};

/// Values posted by the prompt form. The numeric fields accept any parseable
/// value and are clamped into the slider bounds server-side.
#[derive(Debug, Deserialize)]
pub struct GenerateForm {
    pub prompt: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: i64,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

/// JSON body accepted by `POST /api/generate`.
#[derive(Debug, Deserialize)]
pub struct ApiGenerateRequest {
    pub prompt: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: i64,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

fn default_max_tokens() -> i64 {
    DEFAULT_MAX_TOKENS as i64
}

fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

#[derive(Debug, Serialize)]
pub struct ApiGenerateResponse {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// What the page shows below the form after a submission.
#[derive(Debug)]
pub enum ViewState {
    Idle,
    Warning(String),
    Success(String),
    Failure(String),
}
