//! Entity listing, trending and per-entity connection handlers

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use tracing::info;
use uuid::Uuid;

use super::state::SharedState;
use super::types::{
    EntityConnectionsResponse, EntityListResponse, ListEntitiesParams, TrendingParams,
    TrendingResponse,
};
use crate::constants::{DEFAULT_TRENDING_LIMIT, MAX_TRENDING_LIMIT};
use crate::errors::{AppError, Result, ValidationErrorExt};
use crate::graph::trending_entities;
use crate::model::EntityType;
use crate::validation;

/// GET /api/entities - List entities, optionally filtered by type
pub async fn list_entities(
    State(state): State<SharedState>,
    Query(params): Query<ListEntitiesParams>,
) -> Result<Json<EntityListResponse>> {
    let entity_type = parse_type_filter(params.entity_type.as_deref())?;

    let data = state
        .store()
        .fetch_entities(entity_type)
        .map_err(|e| AppError::UpstreamData(e.to_string()))?;

    Ok(Json(EntityListResponse { data }))
}

/// GET /api/entities/trending - Entities ranked by article count
pub async fn trending(
    State(state): State<SharedState>,
    Query(params): Query<TrendingParams>,
) -> Result<Json<TrendingResponse>> {
    let limit = params.limit.unwrap_or(DEFAULT_TRENDING_LIMIT);
    let limit = validation::validate_limit(limit, MAX_TRENDING_LIMIT).map_validation_err("limit")?;

    let mut entities = state
        .store()
        .fetch_entities(None)
        .map_err(|e| AppError::UpstreamData(e.to_string()))?;

    // Counts from the listing may be stale or seeded; the counts query is
    // the ranking authority. Entities absent from the map keep what the
    // listing reported.
    let ids: Vec<Uuid> = entities.iter().map(|e| e.id).collect();
    let counts = state
        .store()
        .fetch_mention_counts(&ids)
        .map_err(|e| AppError::UpstreamData(e.to_string()))?;
    for entity in &mut entities {
        if let Some(&count) = counts.get(&entity.id) {
            entity.mention_count = count;
        }
    }

    Ok(Json(TrendingResponse {
        data: trending_entities(&entities, limit),
    }))
}

/// GET /api/entities/{id} - Single entity lookup
pub async fn get_entity(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<crate::model::Entity>> {
    let id = validation::validate_entity_id(&id)
        .map_err(|e| AppError::InvalidEntityId(e.to_string()))?;

    let entity = state
        .store()
        .fetch_entity(id)
        .map_err(|e| AppError::UpstreamData(e.to_string()))?
        .ok_or_else(|| AppError::EntityNotFound(id.to_string()))?;

    Ok(Json(entity))
}

/// GET /api/entities/{id}/connections - Merged, strength-sorted
/// connection list for one entity
pub async fn get_entity_connections(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<EntityConnectionsResponse>> {
    let id = validation::validate_entity_id(&id)
        .map_err(|e| AppError::InvalidEntityId(e.to_string()))?;

    let entity = state
        .store()
        .fetch_entity(id)
        .map_err(|e| AppError::UpstreamData(e.to_string()))?
        .ok_or_else(|| AppError::EntityNotFound(id.to_string()))?;

    let raw = state
        .store()
        .fetch_connections(id)
        .map_err(|e| AppError::UpstreamData(e.to_string()))?;

    let connections = state.builder().merge_entity_connections(&raw);

    info!(
        entity = %entity.name,
        outgoing = raw.outgoing.len(),
        incoming = raw.incoming.len(),
        merged = connections.len(),
        "merged entity connections"
    );

    Ok(Json(EntityConnectionsResponse {
        entity,
        connections,
    }))
}

/// Parse an optional entity_type query value
pub(super) fn parse_type_filter(value: Option<&str>) -> Result<Option<EntityType>> {
    match value {
        None | Some("") | Some("all") => Ok(None),
        Some(raw) => validation::validate_entity_type(raw)
            .map(Some)
            .map_err(|e| AppError::InvalidEntityType(e.to_string())),
    }
}
