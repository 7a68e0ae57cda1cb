//! Input validation at the API boundary
//!
//! Coerce/validate once at the edge, keep the builder's internals
//! strongly typed.

use anyhow::{anyhow, Result};
use uuid::Uuid;

use crate::model::EntityType;

/// Maximum length accepted for any free-text query parameter
pub const MAX_PARAM_LENGTH: usize = 64;

/// Validate an entity ID path segment (UUID format)
pub fn validate_entity_id(entity_id: &str) -> Result<Uuid> {
    Uuid::parse_str(entity_id).map_err(|e| anyhow!("invalid entity ID UUID format: {e}"))
}

/// Validate an entity type filter value
pub fn validate_entity_type(value: &str) -> Result<EntityType> {
    if value.len() > MAX_PARAM_LENGTH {
        return Err(anyhow!(
            "entity_type too long: {} chars (max: {})",
            value.len(),
            MAX_PARAM_LENGTH
        ));
    }
    value.parse::<EntityType>()
}

/// Validate a caller-supplied result limit against an upper bound
pub fn validate_limit(limit: usize, max: usize) -> Result<usize> {
    if limit == 0 {
        return Err(anyhow!("limit must be greater than 0"));
    }
    if limit > max {
        return Err(anyhow!("limit too large: {limit} (max: {max})"));
    }
    Ok(limit)
}
