//! Impact map graph handler

use std::time::Instant;

use axum::{
    extract::{Query, State},
    response::Json,
};
use tracing::info;

use super::entities::parse_type_filter;
use super::state::SharedState;
use super::types::ImpactMapParams;
use crate::errors::{AppError, Result};
use crate::graph::{filter_graph_by_type, GraphBuilder, GraphLimits};
use crate::metrics;
use crate::model::ImpactGraph;

/// GET /api/graph/impact-map - Co-occurrence graph for the impact map
///
/// Optional `entity_type` restricts the result to one type; the filter is
/// applied to the assembled graph so edges survive only when both
/// endpoints do. `max_nodes`/`max_edges` may shrink (never grow) the
/// configured caps.
pub async fn impact_map(
    State(state): State<SharedState>,
    Query(params): Query<ImpactMapParams>,
) -> Result<Json<ImpactGraph>> {
    let type_filter = parse_type_filter(params.entity_type.as_deref())?;

    let limits = effective_limits(state.builder().limits(), &params);
    let builder = GraphBuilder::new(limits);

    let entities = state
        .store()
        .fetch_entities(None)
        .map_err(|e| AppError::UpstreamData(e.to_string()))?;
    let mentions = state
        .store()
        .fetch_mentions(limits.max_mentions)
        .map_err(|e| AppError::UpstreamData(e.to_string()))?;

    let start = Instant::now();
    let mut graph = builder.build_cooccurrence(&entities, &mentions);
    if let Some(entity_type) = type_filter {
        graph = filter_graph_by_type(&graph, entity_type);
    }
    let elapsed = start.elapsed().as_secs_f64();

    metrics::observe_graph_build("cooccurrence", graph.nodes.len(), graph.edges.len(), elapsed);
    info!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        mentions = mentions.len(),
        "built impact map graph"
    );

    Ok(Json(graph))
}

/// Apply caller overrides to the configured limits, clamped so a request
/// can narrow the graph but never exceed server caps
fn effective_limits(configured: &GraphLimits, params: &ImpactMapParams) -> GraphLimits {
    let mut limits = *configured;
    if let Some(n) = params.max_nodes {
        limits.max_nodes = n.min(configured.max_nodes);
    }
    if let Some(n) = params.max_edges {
        limits.max_edges = n.min(configured.max_edges);
    }
    limits
}
