//! Application state shared across handlers

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::graph::GraphBuilder;
use crate::source::NewsDataSource;

/// Shared, immutable service state
///
/// The store is the injected data-access collaborator; the builder is
/// stateless, so one instance serves all concurrent requests without
/// locking.
pub struct AppState {
    store: Arc<dyn NewsDataSource>,
    builder: GraphBuilder,
    config: ServerConfig,
}

/// Application state type alias used by handlers
pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(store: Arc<dyn NewsDataSource>, config: ServerConfig) -> Self {
        let builder = GraphBuilder::new(config.graph);
        Self {
            store,
            builder,
            config,
        }
    }

    pub fn store(&self) -> &dyn NewsDataSource {
        self.store.as_ref()
    }

    pub fn builder(&self) -> &GraphBuilder {
        &self.builder
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}
