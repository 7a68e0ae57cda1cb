//! Data access layer
//!
//! The builder never talks to a database directly; it consumes rows from
//! a [`NewsDataSource`] injected at startup. The bundled implementation is
//! an in-memory store seedable from a JSON dataset file, which replaces
//! the hardcoded demo arrays the original UI shipped with.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::model::{ConnectionRecord, Entity, EntityConnections, EntityRef, EntityType, Mention};

/// Contract between the graph service and its backing store
///
/// Implementations own all I/O and its failure modes; the builder's
/// contract starts once these rows are in memory.
pub trait NewsDataSource: Send + Sync {
    /// All known entities, optionally restricted to one type, with
    /// mention counts populated.
    fn fetch_entities(&self, entity_type: Option<EntityType>) -> Result<Vec<Entity>>;

    /// Single entity lookup.
    fn fetch_entity(&self, id: Uuid) -> Result<Option<Entity>>;

    /// Mention rows, capped at `limit`.
    fn fetch_mentions(&self, limit: usize) -> Result<Vec<Mention>>;

    /// Both directions of one entity's explicit relationships.
    fn fetch_connections(&self, entity_id: Uuid) -> Result<EntityConnections>;

    /// Distinct-article mention counts for a set of entities. IDs with no
    /// mention rows are absent from the map.
    fn fetch_mention_counts(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, usize>>;
}

/// A directed relationship row as persisted upstream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionRow {
    pub source_entity_id: Uuid,
    pub target_entity_id: Uuid,
    pub relationship_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_label: Option<String>,
    pub strength: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
}

/// Seed dataset: the full input universe for one service instance
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub mentions: Vec<Mention>,
    #[serde(default)]
    pub connections: Vec<ConnectionRow>,
}

impl Dataset {
    /// Load a dataset from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading dataset file {}", path.display()))?;
        let dataset: Self = serde_json::from_str(&raw)
            .with_context(|| format!("parsing dataset file {}", path.display()))?;
        Ok(dataset)
    }
}

#[derive(Default)]
struct StoreInner {
    entities: HashMap<Uuid, Entity>,
    mentions: Vec<Mention>,
    connections: Vec<ConnectionRow>,
}

/// In-memory implementation of [`NewsDataSource`]
///
/// Read-mostly; writes happen at startup (dataset load) and in tests.
#[derive(Default)]
pub struct InMemoryNewsStore {
    inner: RwLock<StoreInner>,
}

impl InMemoryNewsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace store contents with a dataset
    pub fn load_dataset(&self, dataset: Dataset) {
        let mut inner = self.inner.write();
        inner.entities = dataset.entities.into_iter().map(|e| (e.id, e)).collect();
        inner.mentions = dataset.mentions;
        inner.connections = dataset.connections;
        info!(
            entities = inner.entities.len(),
            mentions = inner.mentions.len(),
            connections = inner.connections.len(),
            "dataset loaded"
        );
    }

    pub fn insert_entity(&self, entity: Entity) {
        self.inner.write().entities.insert(entity.id, entity);
    }

    pub fn insert_mention(&self, mention: Mention) {
        self.inner.write().mentions.push(mention);
    }

    pub fn insert_connection(&self, row: ConnectionRow) {
        self.inner.write().connections.push(row);
    }

    /// Distinct articles mentioning each entity
    fn computed_counts(inner: &StoreInner) -> HashMap<Uuid, usize> {
        let mut per_entity: HashMap<Uuid, HashSet<Uuid>> = HashMap::new();
        for mention in &inner.mentions {
            per_entity
                .entry(mention.entity_id)
                .or_default()
                .insert(mention.article_id);
        }
        per_entity
            .into_iter()
            .map(|(id, articles)| (id, articles.len()))
            .collect()
    }

    fn with_count(entity: &Entity, counts: &HashMap<Uuid, usize>) -> Entity {
        let mut entity = entity.clone();
        // Mention rows are authoritative when present; a seeded count
        // survives only for entities with no rows loaded.
        if let Some(&count) = counts.get(&entity.id) {
            entity.mention_count = count;
        }
        entity
    }
}

impl NewsDataSource for InMemoryNewsStore {
    fn fetch_entities(&self, entity_type: Option<EntityType>) -> Result<Vec<Entity>> {
        let inner = self.inner.read();
        let counts = Self::computed_counts(&inner);
        let mut entities: Vec<Entity> = inner
            .entities
            .values()
            .filter(|e| entity_type.map_or(true, |t| e.entity_type == t))
            .map(|e| Self::with_count(e, &counts))
            .collect();
        // Deterministic listing order.
        entities.sort_by(|x, y| x.name.cmp(&y.name).then_with(|| x.id.cmp(&y.id)));
        Ok(entities)
    }

    fn fetch_entity(&self, id: Uuid) -> Result<Option<Entity>> {
        let inner = self.inner.read();
        let counts = Self::computed_counts(&inner);
        Ok(inner.entities.get(&id).map(|e| Self::with_count(e, &counts)))
    }

    fn fetch_mentions(&self, limit: usize) -> Result<Vec<Mention>> {
        let inner = self.inner.read();
        Ok(inner.mentions.iter().take(limit).cloned().collect())
    }

    fn fetch_connections(&self, entity_id: Uuid) -> Result<EntityConnections> {
        let inner = self.inner.read();

        let resolve = |id: Uuid| -> Option<EntityRef> {
            inner.entities.get(&id).map(EntityRef::from)
        };

        let mut connections = EntityConnections::default();
        let mut dangling = 0usize;

        for row in &inner.connections {
            let (bucket, related_id) = if row.source_entity_id == entity_id {
                (&mut connections.outgoing, row.target_entity_id)
            } else if row.target_entity_id == entity_id {
                (&mut connections.incoming, row.source_entity_id)
            } else {
                continue;
            };

            // Rows pointing at unknown entities are dropped, not errors:
            // partial data degrades the view rather than breaking it.
            let Some(related_entity) = resolve(related_id) else {
                dangling += 1;
                continue;
            };

            bucket.push(ConnectionRecord {
                related_entity,
                relationship_type: row.relationship_type.clone(),
                relationship_label: row.relationship_label.clone(),
                strength: row.strength,
                evidence: row.evidence.clone(),
            });
        }

        if dangling > 0 {
            debug!(dangling, %entity_id, "dropped connection rows referencing unknown entities");
        }

        Ok(connections)
    }

    fn fetch_mention_counts(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, usize>> {
        let inner = self.inner.read();
        let counts = Self::computed_counts(&inner);
        Ok(ids
            .iter()
            .filter_map(|id| counts.get(id).map(|&count| (*id, count)))
            .collect())
    }
}
