//! Health and infrastructure handlers
//!
//! Probes and the Prometheus metrics endpoint.

use axum::{extract::State, http::StatusCode, response::Json};

use super::state::SharedState;
use crate::metrics;

/// Health response for the main health endpoint
#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub entity_count: usize,
}

/// Main health check endpoint
pub async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let entity_count = state
        .store()
        .fetch_entities(None)
        .map(|e| e.len())
        .unwrap_or(0);

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        entity_count,
    })
}

/// Liveness probe - minimal check, succeeds whenever the process responds
pub async fn health_live() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "alive",
            "timestamp": chrono::Utc::now().to_rfc3339()
        })),
    )
}

/// Readiness probe - 200 once the store answers queries
pub async fn health_ready(State(state): State<SharedState>) -> (StatusCode, Json<serde_json::Value>) {
    match state.store().fetch_entities(None) {
        Ok(_) => (
            StatusCode::OK,
            Json(serde_json::json!({ "status": "ready" })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({
                "status": "not_ready",
                "reason": e.to_string()
            })),
        ),
    }
}

/// Prometheus metrics in text exposition format
pub async fn metrics_endpoint() -> String {
    metrics::gather()
}
