//! impact-graph - Entity connection graph service
//!
//! Standalone HTTP server feeding the impact-map visualization and entity
//! profile pages.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tokio::signal;
use tower::limit::ConcurrencyLimitLayer;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tracing::info;

use impact_graph::config::ServerConfig;
use impact_graph::handlers::{build_api_routes, build_public_routes, AppState};
use impact_graph::source::{Dataset, InMemoryNewsStore};
use impact_graph::{metrics, middleware, tracing_setup};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_setup::init_tracing().map_err(|e| anyhow::anyhow!("tracing init failed: {e}"))?;

    let server_config = ServerConfig::from_env();
    metrics::register_metrics();

    // Data source: in-memory store, optionally seeded from a JSON dataset.
    // Demo data is injected here rather than hardcoded in the builder.
    let store = InMemoryNewsStore::new();
    if let Some(path) = &server_config.dataset_path {
        let dataset = Dataset::from_json_file(path)?;
        store.load_dataset(dataset);
    } else {
        info!("no IMPACT_DATASET_PATH configured, starting with an empty store");
    }

    let state = Arc::new(AppState::new(Arc::new(store), server_config.clone()));

    // Rate limiting applies to API routes only; probes and metrics must
    // always be reachable.
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(server_config.rate_limit_per_second)
        .burst_size(server_config.rate_limit_burst)
        .finish()
        .expect("Failed to build governor rate limiter configuration");
    let governor_layer = GovernorLayer::new(governor_conf);

    info!(
        "Rate limiting enabled: {} req/sec, burst of {}",
        server_config.rate_limit_per_second, server_config.rate_limit_burst
    );

    let cors = server_config.cors.to_layer();

    let api_routes = build_api_routes(state.clone()).layer(governor_layer);
    let public_routes = build_public_routes(state.clone());

    let app = axum::Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(axum::middleware::from_fn(middleware::track_metrics))
        .layer(ConcurrencyLimitLayer::new(
            server_config.max_concurrent_requests,
        ))
        .layer(cors);

    let addr: SocketAddr = format!("{}:{}", server_config.host, server_config.port)
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid listen address: {e}"))?;
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Handle graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown");
}
