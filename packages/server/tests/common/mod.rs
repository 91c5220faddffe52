#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use skilltrace_algo::{Catalog, CatalogMeta, InMemoryArtifactStore, ItemStats, SkillStats};

/// Two skills, a handful of items spread across the difficulty scale
pub fn sample_catalog(problem_col_found: bool) -> Catalog {
    let mut skill_stats = HashMap::new();
    skill_stats.insert("Algebra".to_string(), SkillStats { p_correct: 0.62 });
    skill_stats.insert("Fractions".to_string(), SkillStats { p_correct: 0.71 });

    let mut item_stats = HashMap::new();
    let mut skill_to_items: HashMap<String, Vec<String>> = HashMap::new();
    let items = [
        ("Algebra", "alg-1", 120, -0.8),
        ("Algebra", "alg-2", 45, -0.3),
        ("Algebra", "alg-3", 80, 0.0),
        ("Algebra", "alg-rare", 5, -0.3),
        ("Fractions", "frac-1", 200, -0.6),
        ("Fractions", "frac-2", 60, 0.4),
        ("Fractions", "frac-3", 33, -1.5),
    ];
    for (skill, id, n, b) in items {
        item_stats.insert(
            id.to_string(),
            ItemStats {
                n,
                p_correct: 0.6,
                b,
            },
        );
        skill_to_items
            .entry(skill.to_string())
            .or_default()
            .push(id.to_string());
    }

    Catalog::new(
        skill_stats,
        item_stats,
        skill_to_items,
        CatalogMeta { problem_col_found },
    )
}

pub fn create_test_app() -> Router {
    let store = InMemoryArtifactStore::new(sample_catalog(true)).with_threshold(0.55);
    skilltrace_server::app_with_store(Arc::new(store))
}

pub fn create_skill_only_app() -> Router {
    let store = InMemoryArtifactStore::new(sample_catalog(false));
    skilltrace_server::app_with_store(Arc::new(store))
}

pub fn create_app_without_artifacts() -> Router {
    skilltrace_server::app_with_store(Arc::new(InMemoryArtifactStore::empty()))
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
