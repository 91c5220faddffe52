use std::time::SystemTime;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use skilltrace_algo::types::DEFAULT_THRESHOLD;

use crate::response::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/live", get(live))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ArtifactStatus {
    catalog_loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    catalog_error: Option<String>,
    skills: usize,
    items: usize,
    item_level: bool,
    threshold: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    timestamp: String,
    start_time: String,
    uptime: u64,
    artifacts: ArtifactStatus,
}

#[derive(Debug, Serialize)]
struct LivenessResponse {
    status: &'static str,
    timestamp: String,
    uptime: u64,
}

async fn root(State(state): State<AppState>) -> Result<Response, AppError> {
    let status_state = state.clone();
    let artifacts = tokio::task::spawn_blocking(move || artifact_status(&status_state)).await?;

    let ok = artifacts.catalog_loaded;
    let response = HealthResponse {
        status: if ok { "ok" } else { "degraded" },
        service: "skilltrace",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: now_iso(),
        start_time: system_time_iso(state.started_at_system()),
        uptime: state.uptime_seconds(),
        artifacts,
    };

    let status_code = if ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    Ok((status_code, Json(response)).into_response())
}

fn artifact_status(state: &AppState) -> ArtifactStatus {
    let store = state.artifacts();
    let threshold = store.load_threshold(DEFAULT_THRESHOLD);

    match store.load_catalog() {
        Ok(catalog) => ArtifactStatus {
            catalog_loaded: true,
            catalog_error: None,
            skills: catalog.skill_count(),
            items: catalog.item_count(),
            item_level: catalog.has_items(),
            threshold,
        },
        Err(err) => ArtifactStatus {
            catalog_loaded: false,
            catalog_error: Some(err.to_string()),
            skills: 0,
            items: 0,
            item_level: false,
            threshold,
        },
    }
}

async fn live(State(state): State<AppState>) -> Response {
    Json(LivenessResponse {
        status: "healthy",
        timestamp: now_iso(),
        uptime: state.uptime_seconds(),
    })
    .into_response()
}

fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

fn system_time_iso(time: SystemTime) -> String {
    chrono::DateTime::<chrono::Utc>::from(time)
        .to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
