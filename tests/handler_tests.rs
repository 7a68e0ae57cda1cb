//! Smoke tests for the HTTP handlers
//!
//! Each endpoint gets at least one test against a seeded in-memory store:
//! - Valid requests return 2xx with the expected shape.
//! - Invalid IDs, types and limits return structured 4xx errors.
//!
//! Run with: `cargo test --test handler_tests`

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use impact_graph::config::ServerConfig;
use impact_graph::handlers::{build_router, AppState};
use impact_graph::model::{Entity, EntityConnections, EntityType, Mention};
use impact_graph::source::{ConnectionRow, InMemoryNewsStore, NewsDataSource};
use impact_graph::uuid::Uuid;

// ═══════════════════════════════════════════════════════════════════════
// Test infrastructure
// ═══════════════════════════════════════════════════════════════════════

/// Seeded harness: three connected entities plus one isolated location.
struct Harness {
    app: Router,
    acme: Uuid,
    globex: Uuid,
    wheat: Uuid,
}

impl Harness {
    fn new() -> Self {
        let store = InMemoryNewsStore::new();

        let acme = seed_entity(&store, "Acme Corp", EntityType::Company);
        let globex = seed_entity(&store, "Globex", EntityType::Company);
        let wheat = seed_entity(&store, "Wheat", EntityType::Commodity);
        seed_entity(&store, "Berlin", EntityType::Location);

        // Two articles co-mentioning acme+globex, one adding wheat.
        for extra in [None, None, Some(wheat)] {
            let article = Uuid::new_v4();
            for entity_id in [Some(acme), Some(globex), extra].into_iter().flatten() {
                store.insert_mention(Mention {
                    article_id: article,
                    entity_id,
                    confidence: None,
                    context: None,
                });
            }
        }

        // Explicit relationship in both directions between acme and globex.
        store.insert_connection(ConnectionRow {
            source_entity_id: acme,
            target_entity_id: globex,
            relationship_type: "supplier".to_string(),
            relationship_label: Some("supplies".to_string()),
            strength: 0.8,
            evidence: None,
        });
        store.insert_connection(ConnectionRow {
            source_entity_id: globex,
            target_entity_id: acme,
            relationship_type: "customer".to_string(),
            relationship_label: None,
            strength: 0.3,
            evidence: None,
        });

        let state = Arc::new(AppState::new(Arc::new(store), ServerConfig::default()));
        Self {
            app: build_router(state),
            acme,
            globex,
            wheat,
        }
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let response = self
            .app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .body(Body::empty())
                    .expect("build request"),
            )
            .await
            .expect("send request");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("read body")
            .to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::String(
                String::from_utf8_lossy(&bytes).into_owned(),
            ))
        };
        (status, json)
    }
}

fn seed_entity(store: &InMemoryNewsStore, name: &str, entity_type: EntityType) -> Uuid {
    let id = Uuid::new_v4();
    store.insert_entity(Entity {
        id,
        name: name.to_string(),
        entity_type,
        mention_count: 0,
    });
    id
}

// ═══════════════════════════════════════════════════════════════════════
// Health & metrics
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn health_reports_entity_count() {
    let h = Harness::new();
    let (status, body) = h.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["entity_count"], 4);
}

#[tokio::test]
async fn liveness_and_readiness_probes_respond() {
    let h = Harness::new();
    let (status, _) = h.get("/health/live").await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = h.get("/health/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn metrics_endpoint_serves_prometheus_text() {
    impact_graph::metrics::register_metrics();
    let h = Harness::new();
    // Exercise one API route so request metrics exist.
    let _ = h.get("/api/entities").await;
    let (status, _body) = h.get("/metrics").await;
    assert_eq!(status, StatusCode::OK);
}

// ═══════════════════════════════════════════════════════════════════════
// Entities
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn list_entities_returns_all_seeded() {
    let h = Harness::new();
    let (status, body) = h.get("/api/entities").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn list_entities_filters_by_type() {
    let h = Harness::new();
    let (status, body) = h.get("/api/entities?entity_type=company").await;
    assert_eq!(status, StatusCode::OK);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    for e in data {
        assert_eq!(e["type"], "company");
    }
}

#[tokio::test]
async fn list_entities_rejects_unknown_type() {
    let h = Harness::new();
    let (status, body) = h.get("/api/entities?entity_type=galaxy").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ENTITY_TYPE");
}

#[tokio::test]
async fn get_entity_returns_mention_count() {
    let h = Harness::new();
    let (status, body) = h.get(&format!("/api/entities/{}", h.acme)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Acme Corp");
    assert_eq!(body["mention_count"], 3);
}

#[tokio::test]
async fn get_entity_unknown_id_is_404() {
    let h = Harness::new();
    let (status, body) = h.get(&format!("/api/entities/{}", Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "ENTITY_NOT_FOUND");
}

#[tokio::test]
async fn get_entity_malformed_id_is_400() {
    let h = Harness::new();
    let (status, body) = h.get("/api/entities/not-a-uuid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ENTITY_ID");
}

#[tokio::test]
async fn trending_ranks_by_article_count() {
    let h = Harness::new();
    let (status, body) = h.get("/api/entities/trending?limit=2").await;
    assert_eq!(status, StatusCode::OK);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    // Acme and Globex share 3 articles each; ties break by name.
    assert_eq!(data[0]["name"], "Acme Corp");
    assert_eq!(data[0]["article_count"], 3);
    assert_eq!(data[1]["name"], "Globex");
}

/// Source whose listing carries stale zero counts; only the counts query
/// knows the real numbers.
struct StaleCountSource {
    entities: Vec<Entity>,
    counts: std::collections::HashMap<Uuid, usize>,
}

impl NewsDataSource for StaleCountSource {
    fn fetch_entities(&self, _entity_type: Option<EntityType>) -> anyhow::Result<Vec<Entity>> {
        Ok(self.entities.clone())
    }

    fn fetch_entity(&self, id: Uuid) -> anyhow::Result<Option<Entity>> {
        Ok(self.entities.iter().find(|e| e.id == id).cloned())
    }

    fn fetch_mentions(&self, _limit: usize) -> anyhow::Result<Vec<Mention>> {
        Ok(Vec::new())
    }

    fn fetch_connections(&self, _entity_id: Uuid) -> anyhow::Result<EntityConnections> {
        Ok(EntityConnections::default())
    }

    fn fetch_mention_counts(
        &self,
        ids: &[Uuid],
    ) -> anyhow::Result<std::collections::HashMap<Uuid, usize>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.counts.get(id).map(|&c| (*id, c)))
            .collect())
    }
}

#[tokio::test]
async fn trending_ranks_by_authoritative_counts() {
    let alpha = Entity {
        id: Uuid::new_v4(),
        name: "Alpha".to_string(),
        entity_type: EntityType::Company,
        mention_count: 0,
    };
    let beta = Entity {
        id: Uuid::new_v4(),
        name: "Beta".to_string(),
        entity_type: EntityType::Company,
        mention_count: 0,
    };
    let counts = [(alpha.id, 2), (beta.id, 5)].into_iter().collect();
    let store = StaleCountSource {
        entities: vec![alpha, beta],
        counts,
    };
    let state = Arc::new(AppState::new(Arc::new(store), ServerConfig::default()));
    let app = build_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/entities/trending")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    let data = body["data"].as_array().unwrap();
    // The zero counts from the listing must not drive the ranking.
    assert_eq!(data[0]["name"], "Beta");
    assert_eq!(data[0]["article_count"], 5);
    assert_eq!(data[1]["name"], "Alpha");
    assert_eq!(data[1]["article_count"], 2);
}

#[tokio::test]
async fn trending_rejects_zero_limit() {
    let h = Harness::new();
    let (status, body) = h.get("/api/entities/trending?limit=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");
}

// ═══════════════════════════════════════════════════════════════════════
// Connections & impact map
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn entity_connections_merge_both_directions() {
    let h = Harness::new();
    let (status, body) = h
        .get(&format!("/api/entities/{}/connections", h.acme))
        .await;
    assert_eq!(status, StatusCode::OK);

    let connections = body["connections"].as_array().unwrap();
    // One related entity (globex), outgoing record wins.
    assert_eq!(connections.len(), 1);
    assert_eq!(connections[0]["entity"]["id"], h.globex.to_string());
    assert_eq!(connections[0]["label"], "supplies");
    assert_eq!(connections[0]["bucket"], "Strong");
}

#[tokio::test]
async fn entity_connections_for_isolated_entity_are_empty() {
    let h = Harness::new();
    let (status, body) = h
        .get(&format!("/api/entities/{}/connections", h.wheat))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["connections"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn impact_map_builds_cooccurrence_graph() {
    let h = Harness::new();
    let (status, body) = h.get("/api/graph/impact-map").await;
    assert_eq!(status, StatusCode::OK);

    let nodes = body["nodes"].as_array().unwrap();
    let edges = body["edges"].as_array().unwrap();
    // Berlin has no mentions but survives the node cap; wheat co-occurs
    // once, acme+globex three times.
    assert_eq!(nodes.len(), 4);
    assert_eq!(edges.len(), 3);
    assert!((edges[0]["weight"].as_f64().unwrap() - 0.6).abs() < 1e-6);
}

#[tokio::test]
async fn impact_map_type_filter_drops_cross_type_edges() {
    let h = Harness::new();
    let (status, body) = h.get("/api/graph/impact-map?entity_type=company").await;
    assert_eq!(status, StatusCode::OK);

    let nodes = body["nodes"].as_array().unwrap();
    let edges = body["edges"].as_array().unwrap();
    assert_eq!(nodes.len(), 2);
    assert_eq!(edges.len(), 1);
}

#[tokio::test]
async fn impact_map_on_empty_store_returns_empty_graph() {
    let store = InMemoryNewsStore::new();
    let state = Arc::new(AppState::new(Arc::new(store), ServerConfig::default()));
    let app = build_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/graph/impact-map")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["nodes"].as_array().unwrap().is_empty());
    assert!(body["edges"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn impact_map_respects_node_override() {
    let h = Harness::new();
    let (status, body) = h.get("/api/graph/impact-map?max_nodes=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nodes"].as_array().unwrap().len(), 2);
}
