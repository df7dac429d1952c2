use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::{routing::get, Router};
use serde::Serialize;

use crate::response::json_response;
use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the pass store is configured and reachable.
    pub store_healthy: bool,
}

/// GET /health -- returns service and store health.
async fn health_check(State(state): State<AppState>) -> Response {
    let store_healthy = match &state.passes {
        Some(passes) => passes.store().health_check().await.is_ok(),
        None => false,
    };

    let status = if store_healthy { "ok" } else { "degraded" };

    json_response(
        StatusCode::OK,
        &HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            store_healthy,
        },
    )
}

/// Mount health check routes.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
