//! Prometheus metrics for monitoring and alerting
//!
//! Exposes request rates/latencies and graph build characteristics.
//! Entity IDs never appear in labels to avoid cardinality explosion.

use lazy_static::lazy_static;
use prometheus::{
    Histogram, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};

lazy_static! {
    /// Global metrics registry
    pub static ref METRICS_REGISTRY: Registry = Registry::new();

    // ============================================================================
    // Request metrics
    // ============================================================================

    /// HTTP request duration in seconds
    pub static ref HTTP_REQUEST_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "impact_http_request_duration_seconds",
            "HTTP request duration in seconds"
        )
        .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]),
        &["method", "endpoint", "status"]
    ).unwrap();

    /// Total HTTP requests
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("impact_http_requests_total", "Total HTTP requests"),
        &["method", "endpoint", "status"]
    ).unwrap();

    // ============================================================================
    // Graph build metrics
    // ============================================================================

    /// Graph build operations by outcome
    pub static ref GRAPH_BUILD_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("impact_graph_build_total", "Total graph build operations"),
        &["kind", "result"]
    ).unwrap();

    /// Graph build duration
    pub static ref GRAPH_BUILD_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "impact_graph_build_duration_seconds",
            "Graph build operation duration"
        )
        .buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1])
    ).unwrap();

    /// Nodes per assembled graph
    pub static ref GRAPH_NODES: Histogram = Histogram::with_opts(
        HistogramOpts::new("impact_graph_nodes", "Nodes per assembled graph")
            .buckets(vec![0.0, 5.0, 10.0, 15.0, 20.0, 25.0, 30.0, 40.0])
    ).unwrap();

    /// Edges per assembled graph
    pub static ref GRAPH_EDGES: Histogram = Histogram::with_opts(
        HistogramOpts::new("impact_graph_edges", "Edges per assembled graph")
            .buckets(vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 75.0])
    ).unwrap();
}

/// Register all metrics with the global registry
///
/// Call once at startup. Registration failures are logged, not fatal:
/// the service works without metrics.
pub fn register_metrics() {
    let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(HTTP_REQUEST_DURATION.clone()),
        Box::new(HTTP_REQUESTS_TOTAL.clone()),
        Box::new(GRAPH_BUILD_TOTAL.clone()),
        Box::new(GRAPH_BUILD_DURATION.clone()),
        Box::new(GRAPH_NODES.clone()),
        Box::new(GRAPH_EDGES.clone()),
    ];

    for collector in collectors {
        if let Err(e) = METRICS_REGISTRY.register(collector) {
            tracing::warn!("failed to register metric: {e}");
        }
    }
}

/// Render all registered metrics in Prometheus text exposition format
pub fn gather() -> String {
    let encoder = TextEncoder::new();
    let families = METRICS_REGISTRY.gather();
    encoder.encode_to_string(&families).unwrap_or_default()
}

/// Record one graph build: outcome, duration and output size
pub fn observe_graph_build(kind: &str, node_count: usize, edge_count: usize, secs: f64) {
    GRAPH_BUILD_TOTAL.with_label_values(&[kind, "ok"]).inc();
    GRAPH_BUILD_DURATION.observe(secs);
    GRAPH_NODES.observe(node_count as f64);
    GRAPH_EDGES.observe(edge_count as f64);
}
