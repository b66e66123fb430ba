use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::timeout;
use tracing::{debug, warn};

pub const MAX_TOKENS_MIN: u32 = 50;
pub const MAX_TOKENS_MAX: u32 = 500;
pub const DEFAULT_MAX_TOKENS: u32 = 200;

pub const TEMPERATURE_MIN: f64 = 0.0;
pub const TEMPERATURE_MAX: f64 = 1.0;
pub const DEFAULT_TEMPERATURE: f64 = 0.2;

pub fn clamp_max_tokens(max_tokens: i64) -> u32 {
    max_tokens.clamp(MAX_TOKENS_MIN as i64, MAX_TOKENS_MAX as i64) as u32
}

pub fn clamp_temperature(temperature: f64) -> f64 {
    if temperature.is_nan() {
        return DEFAULT_TEMPERATURE;
    }
    temperature.clamp(TEMPERATURE_MIN, TEMPERATURE_MAX)
}

/// One generation request, built fresh per submission. Out-of-range
/// parameters are clamped into the slider bounds at construction.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, max_tokens: i64, temperature: f64) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens: clamp_max_tokens(max_tokens),
            temperature: clamp_temperature(temperature),
        }
    }

    fn payload(&self) -> Payload<'_> {
        Payload {
            inputs: &self.prompt,
            parameters: Parameters {
                max_new_tokens: self.max_tokens,
                temperature: self.temperature,
            },
        }
    }
}

#[derive(Serialize)]
struct Payload<'a> {
    inputs: &'a str,
    parameters: Parameters,
}

#[derive(Serialize)]
struct Parameters {
    max_new_tokens: u32,
    temperature: f64,
}

#[derive(Deserialize)]
struct Generated {
    generated_text: String,
}

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("inference token is missing: set HF_API_TOKEN to a Hugging Face API token")]
    MissingToken,
    #[error("inference request timed out")]
    Timeout,
    #[error("failed to reach inference endpoint: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("inference request failed ({status}): {detail}")]
    Upstream { status: StatusCode, detail: String },
    #[error("inference endpoint returned an unrecognized response body")]
    MalformedResponse,
}

/// Client for a hosted text-generation endpoint speaking the Hugging Face
/// Inference API shape. Endpoint and token are fixed at construction.
#[derive(Clone)]
pub struct InferenceClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
    timeout: Duration,
}

impl InferenceClient {
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>, timeout_ms: u64) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            token: token.into(),
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    /// Send one generation request and classify the outcome. Every failure
    /// mode comes back as an `InferenceError` variant; this never panics and
    /// never retries.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<String, InferenceError> {
        if self.token.is_empty() {
            return Err(InferenceError::MissingToken);
        }

        debug!(
            prompt_chars = request.prompt.chars().count(),
            max_tokens = request.max_tokens,
            temperature = request.temperature,
            "forwarding prompt to inference endpoint"
        );

        let fut = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&request.payload())
            .send();

        let response = timeout(self.timeout, fut)
            .await
            .map_err(|_| InferenceError::Timeout)??;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "inference endpoint rejected the request");
            return Err(InferenceError::Upstream {
                status,
                detail: upstream_detail(status, &body),
            });
        }

        let body = response.text().await?;
        parse_generated(&body)
    }
}

fn parse_generated(body: &str) -> Result<String, InferenceError> {
    let generations: Vec<Generated> =
        serde_json::from_str(body).map_err(|_| InferenceError::MalformedResponse)?;

    generations
        .into_iter()
        .next()
        .map(|generation| generation.generated_text)
        .ok_or(InferenceError::MalformedResponse)
}

fn upstream_detail(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(message) = value.get("error").and_then(Value::as_str) {
            return message.to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("upstream returned status {status}")
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_matches_inference_api_wire_format() {
        let request = GenerationRequest::new("write a function", 200, 0.2);
        let payload = serde_json::to_string(&request.payload()).unwrap();

        assert_eq!(
            payload,
            r#"{"inputs":"write a function","parameters":{"max_new_tokens":200,"temperature":0.2}}"#
        );
    }

    #[test]
    fn out_of_range_parameters_are_clamped() {
        let request = GenerationRequest::new("p", 9_999, 7.5);
        assert_eq!(request.max_tokens, 500);
        assert_eq!(request.temperature, 1.0);

        let request = GenerationRequest::new("p", -3, -0.4);
        assert_eq!(request.max_tokens, 50);
        assert_eq!(request.temperature, 0.0);
    }

    #[test]
    fn nan_temperature_falls_back_to_default() {
        let request = GenerationRequest::new("p", 200, f64::NAN);
        assert_eq!(request.temperature, DEFAULT_TEMPERATURE);
    }

    #[test]
    fn parses_first_generation_from_response_array() {
        let body = r#"[{"generated_text":"def foo(): pass"}]"#;
        assert_eq!(parse_generated(body).unwrap(), "def foo(): pass");
    }

    #[test]
    fn extra_response_fields_are_ignored() {
        let body = r#"[{"generated_text":"x","details":{"tokens":3}}]"#;
        assert_eq!(parse_generated(body).unwrap(), "x");
    }

    #[test]
    fn empty_array_is_malformed() {
        assert!(matches!(
            parse_generated("[]"),
            Err(InferenceError::MalformedResponse)
        ));
    }

    #[test]
    fn object_body_is_malformed() {
        assert!(matches!(
            parse_generated("{}"),
            Err(InferenceError::MalformedResponse)
        ));
    }

    #[test]
    fn upstream_detail_unwraps_json_error_field() {
        let status = StatusCode::FORBIDDEN;
        assert_eq!(
            upstream_detail(status, r#"{"error":"rate limited"}"#),
            "rate limited"
        );
    }

    #[test]
    fn upstream_detail_passes_raw_body_through() {
        let status = StatusCode::SERVICE_UNAVAILABLE;
        assert_eq!(
            upstream_detail(status, "model is overloaded"),
            "model is overloaded"
        );
    }

    #[test]
    fn upstream_detail_falls_back_on_empty_body() {
        let status = StatusCode::FORBIDDEN;
        assert_eq!(
            upstream_detail(status, ""),
            "upstream returned status 403 Forbidden"
        );
    }
}
