//! Router configuration - centralized route definitions
//!
//! Routes are split into public (health, metrics - always reachable for
//! probes and scraping) and API routes (rate limited by the caller).

use axum::{routing::get, Router};

use super::state::SharedState;
use super::{entities, graph, health};

/// Build the public routes (probes and metrics)
pub fn build_public_routes(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::health_live))
        .route("/health/ready", get(health::health_ready))
        .route("/metrics", get(health::metrics_endpoint))
        .with_state(state)
}

/// Build the API routes
///
/// Rate limiting and concurrency layers are applied by the caller so
/// tests can exercise the bare routes.
pub fn build_api_routes(state: SharedState) -> Router {
    Router::new()
        // =================================================================
        // ENTITIES
        // =================================================================
        .route("/api/entities", get(entities::list_entities))
        .route("/api/entities/trending", get(entities::trending))
        .route("/api/entities/{id}", get(entities::get_entity))
        .route(
            "/api/entities/{id}/connections",
            get(entities::get_entity_connections),
        )
        // =================================================================
        // IMPACT MAP GRAPH
        // =================================================================
        .route("/api/graph/impact-map", get(graph::impact_map))
        .with_state(state)
}

/// Combine public and API routes into the full application router
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .merge(build_public_routes(state.clone()))
        .merge(build_api_routes(state))
}
