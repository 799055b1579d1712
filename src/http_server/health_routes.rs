//! Health HTTP Route

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};

use super::response::HealthResponse;
use super::state::AppState;

/// Health check route at root /health
pub fn health_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(state)
}

/// 200 when the store answers a ping, 503 otherwise
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (status, label) = match state.store().ping().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(err) => {
            tracing::warn!(error = %err, "health probe failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    };

    let response = HealthResponse {
        status: label.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (status, Json(response))
}
