//! Shared request/response types for the HTTP API

use serde::{Deserialize, Serialize};

use crate::model::{Entity, MergedConnection, TrendingEntity};

/// Query parameters for entity listing
#[derive(Debug, Default, Deserialize)]
pub struct ListEntitiesParams {
    /// Restrict to one entity type (e.g. "company").
    pub entity_type: Option<String>,
}

/// Query parameters for the trending endpoint
#[derive(Debug, Default, Deserialize)]
pub struct TrendingParams {
    pub limit: Option<usize>,
}

/// Query parameters for the impact map endpoint
#[derive(Debug, Default, Deserialize)]
pub struct ImpactMapParams {
    /// Restrict the built graph to one entity type.
    pub entity_type: Option<String>,
    /// Override the node cap (clamped to the configured maximum).
    pub max_nodes: Option<usize>,
    /// Override the edge cap (clamped to the configured maximum).
    pub max_edges: Option<usize>,
}

/// Entity list response
#[derive(Debug, Serialize, Deserialize)]
pub struct EntityListResponse {
    pub data: Vec<Entity>,
}

/// Trending entities response
#[derive(Debug, Serialize, Deserialize)]
pub struct TrendingResponse {
    pub data: Vec<TrendingEntity>,
}

/// Merged connection list for one entity's profile page
#[derive(Debug, Serialize, Deserialize)]
pub struct EntityConnectionsResponse {
    pub entity: Entity,
    pub connections: Vec<MergedConnection>,
}
