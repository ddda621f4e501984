mod config;
mod error;
mod llm;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use crate::llm::LlmChat;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = config::ServerConfig::from_env();

    // Non-fatal: suggestions answer 503 until LLM env vars are set.
    let llm: Option<Arc<dyn LlmChat>> = match llm::LlmClient::from_env() {
        Ok(client) => {
            tracing::info!(model = client.model(), "LLM client initialized");
            Some(Arc::new(client))
        }
        Err(e) => {
            tracing::warn!(error = %e, "LLM client not configured, AI suggestions disabled");
            None
        }
    };

    let state = state::AppState::new(llm, config.suggest);
    let app = routes::app(state);

    let listener = match tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(port = config.port, error = %e, "failed to bind");
            std::process::exit(1);
        }
    };

    tracing::info!(port = config.port, "magnetflow listening");
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server failed");
        std::process::exit(1);
    }
}
