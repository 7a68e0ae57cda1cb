//! Core domain types for the news entity graph
//!
//! Entities, mentions and explicit relationship records arrive from the
//! upstream ingestion/extraction pipeline (out of scope here); these types
//! are the validated, strongly typed boundary the builder works against.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{STRENGTH_MODERATE_THRESHOLD, STRENGTH_STRONG_THRESHOLD};

/// Kind of real-world referent an entity represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Person,
    Company,
    Organization,
    Location,
    Commodity,
    Sector,
    Policy,
    Event,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Company => "company",
            Self::Organization => "organization",
            Self::Location => "location",
            Self::Commodity => "commodity",
            Self::Sector => "sector",
            Self::Policy => "policy",
            Self::Event => "event",
        }
    }
}

impl std::str::FromStr for EntityType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "person" => Ok(Self::Person),
            "company" => Ok(Self::Company),
            "organization" => Ok(Self::Organization),
            "location" => Ok(Self::Location),
            "commodity" => Ok(Self::Commodity),
            "sector" => Ok(Self::Sector),
            "policy" => Ok(Self::Policy),
            "event" => Ok(Self::Event),
            other => Err(anyhow::anyhow!("unknown entity type: {other}")),
        }
    }
}

/// A named real-world referent extracted from news content
///
/// Read-only to this service: created and updated by the upstream
/// extraction pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: Uuid,

    pub name: String,

    #[serde(rename = "type")]
    pub entity_type: EntityType,

    /// Number of articles this entity appears in. Drives node sizing and
    /// the node cap during assembly.
    #[serde(default)]
    pub mention_count: usize,
}

/// Lightweight entity reference carried on connection records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
}

impl From<&Entity> for EntityRef {
    fn from(e: &Entity) -> Self {
        Self {
            id: e.id,
            name: e.name.clone(),
            entity_type: e.entity_type,
        }
    }
}

/// A fact that one article references one entity
///
/// Many-to-many between articles and entities. An entity mentioned twice
/// in the same article still counts once for co-occurrence purposes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mention {
    pub article_id: Uuid,
    pub entity_id: Uuid,

    /// Extraction confidence, if the pipeline recorded one. Not used for
    /// weighting — kept for display/debugging.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,

    /// Free-text snippet around the mention.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// An authoritative, directed, labeled relationship between two entities
///
/// Produced by the upstream analysis process. Preferred over inferred
/// co-occurrence whenever both exist for the same pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionRecord {
    pub related_entity: EntityRef,

    /// Machine tag, e.g. "supplier", "regulated_by".
    pub relationship_type: String,

    /// Human-readable label; falls back to `relationship_type` for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_label: Option<String>,

    /// Strength in [0, 1].
    pub strength: f32,

    /// Free-text evidence, if recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
}

impl ConnectionRecord {
    /// Display label: the explicit label when present, else the type tag.
    pub fn display_label(&self) -> &str {
        self.relationship_label
            .as_deref()
            .unwrap_or(&self.relationship_type)
    }
}

/// Both directions of one entity's explicit relationships
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityConnections {
    pub outgoing: Vec<ConnectionRecord>,
    pub incoming: Vec<ConnectionRecord>,
}

/// One entry of the merged, undirected per-entity connection view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergedConnection {
    pub entity: EntityRef,
    pub label: String,
    pub strength: f32,
    pub bucket: ConnectionStrength,
}

/// Qualitative strength bucket shown in the UI
///
/// Thresholds are an exact UI contract: ≥0.7 Strong, ≥0.4 Moderate,
/// else Weak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionStrength {
    Strong,
    Moderate,
    Weak,
}

impl ConnectionStrength {
    pub fn from_weight(weight: f32) -> Self {
        if weight >= STRENGTH_STRONG_THRESHOLD {
            Self::Strong
        } else if weight >= STRENGTH_MODERATE_THRESHOLD {
            Self::Moderate
        } else {
            Self::Weak
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strong => "Strong",
            Self::Moderate => "Moderate",
            Self::Weak => "Weak",
        }
    }
}

/// Graph node handed to the rendering collaborator
///
/// `id` must round-trip unchanged through the renderer's node-select
/// callback, so it is the raw entity UUID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: Uuid,
    pub label: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    /// Size hint: article mention count.
    pub size: usize,
}

/// Weighted undirected edge between two graph nodes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: Uuid,
    pub target: Uuid,
    /// Normalized weight in [0, 1].
    pub weight: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub strength: ConnectionStrength,
}

/// Assembled graph ready for layout/rendering
///
/// Invariants: no self-loops, at most one edge per unordered pair, every
/// edge's endpoints present in `nodes`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImpactGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl ImpactGraph {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

/// Entity ranked by article count for the trending sidebar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingEntity {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub article_count: usize,
}
