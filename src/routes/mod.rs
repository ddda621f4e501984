//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The board itself runs in the host; this service only answers the calls
//! the host cannot make on its own: AI connection suggestions (which need an
//! API key) and the seed board catalog.

pub mod boards;
pub mod suggest;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// All API routes with CORS and request tracing.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/api/suggest-connections", post(suggest::suggest_connections))
        .route("/api/boards", get(boards::list_boards))
        .route("/api/boards/{id}", get(boards::get_board))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
