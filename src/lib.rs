pub mod config;
pub mod inference;
pub mod web;

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

use config::AppConfig;
use inference::InferenceClient;

/// Shared, immutable application state. Built once at startup; the client
/// carries the endpoint and token for the lifetime of the process.
pub struct AppState {
    pub client: InferenceClient,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: InferenceClient::new(
                config.api_url.clone(),
                config.api_token.clone(),
                config.timeout_ms,
            ),
        }
    }
}

pub fn build_app(state: Arc<AppState>) -> Router {
    web::router(state).layer(TraceLayer::new_for_http())
}

pub async fn run_server(app: Router, port: u16) {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .expect("bind failed");

    axum::serve(listener, app).await.expect("server failed");
}
