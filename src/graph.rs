//! Entity connection graph builder
//!
//! Transforms flat mention rows (article → entity) and explicit
//! relationship records into a weighted undirected graph for the impact
//! map, and merges per-entity relationship lists for profile pages.
//!
//! The builder is pure and request-scoped: it owns only local aggregation
//! state for the duration of one call, performs no I/O, and never fails on
//! empty or partially dangling input — unknown entity references are
//! dropped, empty input yields an empty graph.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::constants::{
    COOCCURRENCE_SATURATION, MAX_GRAPH_EDGES, MAX_GRAPH_NODES, MAX_MENTIONS_PER_BUILD,
};
use crate::model::{
    ConnectionStrength, Entity, EntityConnections, EntityType, GraphEdge, GraphNode, ImpactGraph,
    MergedConnection, Mention, TrendingEntity,
};

/// Canonical unordered entity pair
///
/// The two IDs are stored in ascending order so (A,B) and (B,A) collide
/// into the same key. `Ord` on the key doubles as the deterministic
/// encounter order for edge assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PairKey {
    a: Uuid,
    b: Uuid,
}

impl PairKey {
    /// Build the canonical key for two distinct entity IDs.
    ///
    /// Returns `None` for a self-pair; the graph carries no self-loops.
    pub fn new(x: Uuid, y: Uuid) -> Option<Self> {
        match x.cmp(&y) {
            std::cmp::Ordering::Less => Some(Self { a: x, b: y }),
            std::cmp::Ordering::Greater => Some(Self { a: y, b: x }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn endpoints(&self) -> (Uuid, Uuid) {
        (self.a, self.b)
    }
}

/// Which direction wins when both an outgoing and an incoming explicit
/// relationship exist for the same related entity
///
/// The upstream source inserted outgoing records first and skipped
/// incoming duplicates, so `OutgoingFirst` reproduces its behavior and is
/// the default. The losing record's label and strength are discarded, so
/// the policy is named and configurable rather than baked in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePrecedence {
    #[default]
    OutgoingFirst,
    IncomingFirst,
}

impl std::str::FromStr for MergePrecedence {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "outgoing_first" | "outgoing" => Ok(Self::OutgoingFirst),
            "incoming_first" | "incoming" => Ok(Self::IncomingFirst),
            other => Err(anyhow::anyhow!("unknown merge precedence: {other}")),
        }
    }
}

/// Tunable caps and weighting for one builder instance
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GraphLimits {
    /// Co-occurrence count at which weight saturates at 1.0.
    pub saturation: u32,
    /// Maximum nodes in the assembled graph.
    pub max_nodes: usize,
    /// Maximum edges in the assembled graph.
    pub max_edges: usize,
    /// Maximum mention rows consumed per build.
    pub max_mentions: usize,
    /// Duplicate resolution for explicit relationship merges.
    pub merge_precedence: MergePrecedence,
}

impl Default for GraphLimits {
    fn default() -> Self {
        Self {
            saturation: COOCCURRENCE_SATURATION,
            max_nodes: MAX_GRAPH_NODES,
            max_edges: MAX_GRAPH_EDGES,
            max_mentions: MAX_MENTIONS_PER_BUILD,
            merge_precedence: MergePrecedence::default(),
        }
    }
}

/// Group mention rows by article, deduplicating entities per article
///
/// An entity mentioned twice in one article counts once for co-occurrence.
/// BTree containers keep iteration deterministic so repeated builds over
/// the same input produce identical output.
pub fn index_mentions(mentions: &[Mention]) -> BTreeMap<Uuid, BTreeSet<Uuid>> {
    let mut index: BTreeMap<Uuid, BTreeSet<Uuid>> = BTreeMap::new();
    for mention in mentions {
        index
            .entry(mention.article_id)
            .or_default()
            .insert(mention.entity_id);
    }
    index
}

/// Tally co-occurrence counts over all unordered entity pairs
///
/// Articles with fewer than two distinct entities contribute nothing.
pub fn count_pairs(index: &BTreeMap<Uuid, BTreeSet<Uuid>>) -> BTreeMap<PairKey, u32> {
    let mut counts: BTreeMap<PairKey, u32> = BTreeMap::new();
    for entities in index.values() {
        if entities.len() < 2 {
            continue;
        }
        let ids: Vec<Uuid> = entities.iter().copied().collect();
        for (i, &a) in ids.iter().enumerate() {
            for &b in &ids[i + 1..] {
                // Set iteration is ascending, so a < b and the key is
                // already canonical; new() only rejects self-pairs.
                if let Some(key) = PairKey::new(a, b) {
                    *counts.entry(key).or_insert(0) += 1;
                }
            }
        }
    }
    counts
}

/// Map a raw co-occurrence count to a bounded display weight
///
/// `weight = min(count / saturation, 1.0)` — a saturating-linear curve for
/// edge thickness, not a probability.
pub fn normalize_weight(count: u32, saturation: u32) -> f32 {
    if saturation == 0 {
        return 1.0;
    }
    (count as f32 / saturation as f32).min(1.0)
}

/// Merge outgoing and incoming explicit relationships into one undirected
/// view, one entry per related entity
///
/// The first record encountered for a related entity wins per the
/// precedence policy; the result is sorted by strength descending with
/// ties keeping insertion order.
pub fn merge_connections(
    connections: &EntityConnections,
    precedence: MergePrecedence,
) -> Vec<MergedConnection> {
    let ordered: [&[crate::model::ConnectionRecord]; 2] = match precedence {
        MergePrecedence::OutgoingFirst => [&connections.outgoing, &connections.incoming],
        MergePrecedence::IncomingFirst => [&connections.incoming, &connections.outgoing],
    };

    let mut seen: HashSet<Uuid> = HashSet::new();
    let mut merged: Vec<MergedConnection> = Vec::new();

    for records in ordered {
        for record in records {
            if !seen.insert(record.related_entity.id) {
                continue;
            }
            let strength = record.strength.clamp(0.0, 1.0);
            merged.push(MergedConnection {
                entity: record.related_entity.clone(),
                label: record.display_label().to_string(),
                strength,
                bucket: ConnectionStrength::from_weight(strength),
            });
        }
    }

    // Stable sort keeps insertion order on equal strengths.
    merged.sort_by(|x, y| {
        y.strength
            .partial_cmp(&x.strength)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    merged
}

/// Rank entities by article count descending and take the top `limit`
///
/// Ties break by name, then ID, so the ranking is stable across runs.
pub fn trending_entities(entities: &[Entity], limit: usize) -> Vec<TrendingEntity> {
    let mut ranked: Vec<&Entity> = entities.iter().collect();
    ranked.sort_by(|x, y| {
        y.mention_count
            .cmp(&x.mention_count)
            .then_with(|| x.name.cmp(&y.name))
            .then_with(|| x.id.cmp(&y.id))
    });
    ranked
        .into_iter()
        .take(limit)
        .map(|e| TrendingEntity {
            id: e.id,
            name: e.name.clone(),
            entity_type: e.entity_type,
            article_count: e.mention_count,
        })
        .collect()
}

/// Restrict a built graph to one entity type
///
/// Edges survive only when both endpoints survive the node filter.
pub fn filter_graph_by_type(graph: &ImpactGraph, entity_type: EntityType) -> ImpactGraph {
    let nodes: Vec<GraphNode> = graph
        .nodes
        .iter()
        .filter(|n| n.entity_type == entity_type)
        .cloned()
        .collect();
    let kept: HashSet<Uuid> = nodes.iter().map(|n| n.id).collect();
    let edges: Vec<GraphEdge> = graph
        .edges
        .iter()
        .filter(|e| kept.contains(&e.source) && kept.contains(&e.target))
        .cloned()
        .collect();
    ImpactGraph { nodes, edges }
}

/// Builds impact graphs from mention and relationship rows
///
/// Stateless beyond its limits; one instance serves any number of
/// concurrent build calls.
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    limits: GraphLimits,
}

impl GraphBuilder {
    pub fn new(limits: GraphLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &GraphLimits {
        &self.limits
    }

    /// Build the co-occurrence graph for a set of entities and their
    /// mention rows
    ///
    /// Mentions referencing entities absent from `entities` are dropped,
    /// not errors. Empty input returns an empty graph.
    pub fn build_cooccurrence(&self, entities: &[Entity], mentions: &[Mention]) -> ImpactGraph {
        if entities.is_empty() || mentions.is_empty() {
            return ImpactGraph::empty();
        }

        let mentions = if mentions.len() > self.limits.max_mentions {
            &mentions[..self.limits.max_mentions]
        } else {
            mentions
        };

        let known: HashMap<Uuid, &Entity> = entities.iter().map(|e| (e.id, e)).collect();

        let mut dangling = 0usize;
        let resolved: Vec<Mention> = mentions
            .iter()
            .filter(|m| {
                let ok = known.contains_key(&m.entity_id);
                if !ok {
                    dangling += 1;
                }
                ok
            })
            .cloned()
            .collect();
        if dangling > 0 {
            debug!(dangling, "dropped mentions referencing unknown entities");
        }

        let index = index_mentions(&resolved);
        let pair_counts = count_pairs(&index);

        let nodes = self.cap_nodes(entities);
        let kept: HashSet<Uuid> = nodes.iter().map(|n| n.id).collect();

        // BTreeMap iteration is ascending by canonical pair key, which is
        // the encounter order ties fall back to after the weight sort.
        let mut edges: Vec<GraphEdge> = pair_counts
            .iter()
            .filter_map(|(key, &count)| {
                let (source, target) = key.endpoints();
                if !kept.contains(&source) || !kept.contains(&target) {
                    return None;
                }
                let weight = normalize_weight(count, self.limits.saturation);
                Some(GraphEdge {
                    source,
                    target,
                    weight,
                    label: None,
                    strength: ConnectionStrength::from_weight(weight),
                })
            })
            .collect();

        edges.sort_by(|x, y| {
            y.weight
                .partial_cmp(&x.weight)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        edges.truncate(self.limits.max_edges);

        ImpactGraph { nodes, edges }
    }

    /// Merge one entity's explicit relationships using the configured
    /// precedence policy
    pub fn merge_entity_connections(
        &self,
        connections: &EntityConnections,
    ) -> Vec<MergedConnection> {
        merge_connections(connections, self.limits.merge_precedence)
    }

    /// Select the highest-mention-count entities up to the node cap
    fn cap_nodes(&self, entities: &[Entity]) -> Vec<GraphNode> {
        let mut ranked: Vec<&Entity> = entities.iter().collect();
        ranked.sort_by(|x, y| {
            y.mention_count
                .cmp(&x.mention_count)
                .then_with(|| x.name.cmp(&y.name))
                .then_with(|| x.id.cmp(&y.id))
        });
        ranked
            .into_iter()
            .take(self.limits.max_nodes)
            .map(|e| GraphNode {
                id: e.id,
                label: e.name.clone(),
                entity_type: e.entity_type,
                size: e.mention_count,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mention(article: Uuid, entity: Uuid) -> Mention {
        Mention {
            article_id: article,
            entity_id: entity,
            confidence: None,
            context: None,
        }
    }

    #[test]
    fn pair_key_is_symmetric_and_rejects_self_pairs() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(PairKey::new(a, b), PairKey::new(b, a));
        assert!(PairKey::new(a, a).is_none());
    }

    #[test]
    fn index_deduplicates_entities_per_article() {
        let article = Uuid::new_v4();
        let entity = Uuid::new_v4();
        let index = index_mentions(&[mention(article, entity), mention(article, entity)]);
        assert_eq!(index.len(), 1);
        assert_eq!(index[&article].len(), 1);
    }

    #[test]
    fn single_entity_articles_contribute_no_pairs() {
        let index = index_mentions(&[mention(Uuid::new_v4(), Uuid::new_v4())]);
        assert!(count_pairs(&index).is_empty());
    }

    #[test]
    fn weight_saturates_at_one() {
        assert_eq!(normalize_weight(5, 5), 1.0);
        assert_eq!(normalize_weight(10, 5), 1.0);
        assert!((normalize_weight(2, 5) - 0.4).abs() < f32::EPSILON);
    }

    #[test]
    fn empty_input_builds_empty_graph() {
        let builder = GraphBuilder::default();
        let graph = builder.build_cooccurrence(&[], &[]);
        assert!(graph.is_empty());
    }
}
