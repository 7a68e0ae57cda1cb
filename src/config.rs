//! Configuration management for impact-graph
//!
//! All configurable parameters in one place with environment variable
//! overrides. Sensible defaults, configurable in production.

use std::env;
use std::path::PathBuf;

use crate::graph::{GraphLimits, MergePrecedence};

/// CORS configuration
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Allowed origins (empty = allow all)
    pub allowed_origins: Vec<String>,
    /// Allowed HTTP methods
    pub allowed_methods: Vec<String>,
    /// Allowed headers
    pub allowed_headers: Vec<String>,
    /// Max age for preflight cache (seconds)
    pub max_age_seconds: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            allowed_methods: vec!["GET".to_string(), "OPTIONS".to_string()],
            allowed_headers: vec!["Content-Type".to_string(), "X-Request-ID".to_string()],
            max_age_seconds: 86400,
        }
    }
}

impl CorsConfig {
    /// Load from environment variables with production safety checks
    ///
    /// In production mode (IMPACT_ENV=production), warns if CORS origins
    /// are not configured.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(origins) = env::var("IMPACT_CORS_ORIGINS") {
            config.allowed_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Ok(methods) = env::var("IMPACT_CORS_METHODS") {
            config.allowed_methods = methods
                .split(',')
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Ok(headers) = env::var("IMPACT_CORS_HEADERS") {
            config.allowed_headers = headers
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Ok(val) = env::var("IMPACT_CORS_MAX_AGE") {
            if let Ok(n) = val.parse() {
                config.max_age_seconds = n;
            }
        }

        let is_production = env::var("IMPACT_ENV")
            .map(|v| {
                let v = v.to_lowercase();
                v == "production" || v == "prod"
            })
            .unwrap_or(false);

        if is_production && config.allowed_origins.is_empty() {
            tracing::warn!(
                "PRODUCTION WARNING: CORS allows all origins. Set IMPACT_CORS_ORIGINS for security."
            );
        }

        config
    }

    /// Convert to tower-http CorsLayer
    pub fn to_layer(&self) -> tower_http::cors::CorsLayer {
        use tower_http::cors::{AllowOrigin, Any, CorsLayer};

        let mut layer = CorsLayer::new();

        if self.allowed_origins.is_empty() {
            layer = layer.allow_origin(Any);
        } else {
            let mut valid_origins = Vec::new();
            for origin_str in &self.allowed_origins {
                match origin_str.parse::<axum::http::HeaderValue>() {
                    Ok(origin) => valid_origins.push(origin),
                    Err(_) => tracing::warn!("CORS: invalid origin '{}' - skipping", origin_str),
                }
            }

            if valid_origins.is_empty() {
                // All configured origins failed to parse. Deny all rather
                // than falling back to permissive.
                tracing::error!(
                    "CORS: all {} configured origin(s) failed to parse. \
                     Rejecting cross-origin requests. Fix IMPACT_CORS_ORIGINS.",
                    self.allowed_origins.len()
                );
                layer =
                    layer.allow_origin(AllowOrigin::list(Vec::<axum::http::HeaderValue>::new()));
            } else {
                layer = layer.allow_origin(AllowOrigin::list(valid_origins));
            }
        }

        let methods: Vec<axum::http::Method> = self
            .allowed_methods
            .iter()
            .filter_map(|m| m.parse().ok())
            .collect();
        if methods.is_empty() {
            layer = layer.allow_methods(Any);
        } else {
            layer = layer.allow_methods(methods);
        }

        let headers: Vec<axum::http::HeaderName> = self
            .allowed_headers
            .iter()
            .filter_map(|h| h.parse().ok())
            .collect();
        if headers.is_empty() {
            layer = layer.allow_headers(Any);
        } else {
            layer = layer.allow_headers(headers);
        }

        layer.max_age(std::time::Duration::from_secs(self.max_age_seconds))
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server host address (default: 127.0.0.1)
    /// Set to 0.0.0.0 for Docker or network-accessible deployments
    pub host: String,

    /// Server port (default: 3050)
    pub port: u16,

    /// Optional JSON dataset loaded into the in-memory store at startup
    pub dataset_path: Option<PathBuf>,

    /// Rate limit: requests per second (default: 200)
    pub rate_limit_per_second: u64,

    /// Rate limit: burst size (default: 400)
    pub rate_limit_burst: u32,

    /// Maximum concurrent requests (default: 100)
    pub max_concurrent_requests: usize,

    /// Whether running in production mode
    pub is_production: bool,

    /// CORS configuration
    pub cors: CorsConfig,

    /// Graph builder caps and weighting
    pub graph: GraphLimits,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3050,
            dataset_path: None,
            rate_limit_per_second: 200,
            rate_limit_burst: 400,
            max_concurrent_requests: 100,
            is_production: false,
            cors: CorsConfig::default(),
            graph: GraphLimits::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults
    #[allow(clippy::field_reassign_with_default)] // Environment overrides require mutable config
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.is_production = env::var("IMPACT_ENV")
            .map(|v| {
                let v = v.to_lowercase();
                v == "production" || v == "prod"
            })
            .unwrap_or(false);

        if let Ok(val) = env::var("IMPACT_HOST") {
            config.host = val;
        }

        if let Ok(val) = env::var("IMPACT_PORT") {
            if let Ok(port) = val.parse() {
                config.port = port;
            }
        }

        if let Ok(val) = env::var("IMPACT_DATASET_PATH") {
            config.dataset_path = Some(PathBuf::from(val));
        }

        if let Ok(val) = env::var("IMPACT_RATE_LIMIT") {
            if let Ok(n) = val.parse() {
                config.rate_limit_per_second = n;
            }
        }

        if let Ok(val) = env::var("IMPACT_RATE_BURST") {
            if let Ok(n) = val.parse() {
                config.rate_limit_burst = n;
            }
        }

        if let Ok(val) = env::var("IMPACT_MAX_CONCURRENT") {
            if let Ok(n) = val.parse() {
                config.max_concurrent_requests = n;
            }
        }

        config.cors = CorsConfig::from_env();
        config.graph = graph_limits_from_env();

        config
    }
}

/// Load graph builder limits from environment variables
fn graph_limits_from_env() -> GraphLimits {
    let mut limits = GraphLimits::default();

    if let Ok(val) = env::var("IMPACT_GRAPH_SATURATION") {
        if let Ok(n) = val.parse::<u32>() {
            if n > 0 {
                limits.saturation = n;
            }
        }
    }

    if let Ok(val) = env::var("IMPACT_GRAPH_MAX_NODES") {
        if let Ok(n) = val.parse() {
            limits.max_nodes = n;
        }
    }

    if let Ok(val) = env::var("IMPACT_GRAPH_MAX_EDGES") {
        if let Ok(n) = val.parse() {
            limits.max_edges = n;
        }
    }

    if let Ok(val) = env::var("IMPACT_GRAPH_MAX_MENTIONS") {
        if let Ok(n) = val.parse() {
            limits.max_mentions = n;
        }
    }

    // Duplicate-resolution policy for explicit relationship merges. The
    // default reproduces the historical outgoing-first behavior.
    if let Ok(val) = env::var("IMPACT_MERGE_PRECEDENCE") {
        match val.parse::<MergePrecedence>() {
            Ok(p) => limits.merge_precedence = p,
            Err(e) => tracing::warn!("ignoring IMPACT_MERGE_PRECEDENCE: {e}"),
        }
    }

    limits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{
        COOCCURRENCE_SATURATION, MAX_GRAPH_EDGES, MAX_GRAPH_NODES, MAX_MENTIONS_PER_BUILD,
    };

    #[test]
    fn default_limits_match_documented_constants() {
        let config = ServerConfig::default();
        assert_eq!(config.graph.saturation, COOCCURRENCE_SATURATION);
        assert_eq!(config.graph.max_nodes, MAX_GRAPH_NODES);
        assert_eq!(config.graph.max_edges, MAX_GRAPH_EDGES);
        assert_eq!(config.graph.max_mentions, MAX_MENTIONS_PER_BUILD);
        assert_eq!(config.graph.merge_precedence, MergePrecedence::OutgoingFirst);
    }

    #[test]
    fn default_cors_is_read_only() {
        let cors = CorsConfig::default();
        assert!(cors.allowed_methods.contains(&"GET".to_string()));
        assert!(!cors.allowed_methods.contains(&"DELETE".to_string()));
    }
}
