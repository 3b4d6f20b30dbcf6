//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use uuid::Uuid;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
    pub epoch_id: Uuid,
}

/// GET /health
///
/// Health check endpoint for monitoring. No identity required.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "svy-sr".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        epoch_id: state.ledger.epoch_id(),
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
