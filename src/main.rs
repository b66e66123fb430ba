use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use prompt_forge::{build_app, config::AppConfig, run_server, AppState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env();
    let port = config.port;

    if config.api_token.is_empty() {
        tracing::warn!("HF_API_TOKEN is not set; generation requests will fail until it is");
    }
    tracing::info!(endpoint = %config.api_url, port, "starting code generator front-end");

    let app = build_app(Arc::new(AppState::new(&config)));
    run_server(app, port).await;
}
