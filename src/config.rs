use std::env;
use std::fmt;

pub const DEFAULT_API_URL: &str = "https://api-inference.huggingface.co/models/bigcode/starcoder";

pub struct AppConfig {
    pub port: u16,
    pub api_url: String,
    pub api_token: String,
    pub timeout_ms: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3000);

        let api_url = env::var("HF_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let api_token = env::var("HF_API_TOKEN").unwrap_or_default();

        let timeout_ms = env::var("HF_TIMEOUT_MS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(20_000);

        Self {
            port,
            api_url,
            api_token,
            timeout_ms,
        }
    }
}

// Manual impl so the bearer token never reaches logs.
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("api_url", &self.api_url)
            .field("api_token", &"<redacted>")
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}
