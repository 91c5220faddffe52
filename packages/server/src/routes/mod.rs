mod health;
mod mastery;
mod recommend;

use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use crate::response::AppError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root).fallback(fallback_handler))
        .route(
            "/recommend",
            post(recommend::recommend).fallback(fallback_handler),
        )
        .route("/mastery", post(mastery::mastery).fallback(fallback_handler))
        .nest("/health", health::router())
        .fallback(fallback_handler)
        .with_state(state)
}

async fn root() -> Response {
    let example = json!([["Algebra", 1], ["Algebra", 0], ["Fractions", 1]]);
    Json(json!({
        "service": "skilltrace",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": ["GET /health", "POST /recommend", "POST /mastery"],
        "tryRecommend": {
            "history": example,
            "topK": 5,
            "targetLow": 0.60,
            "targetHigh": 0.75
        },
        "tryMastery": {
            "history": example,
            "decay": 0.3
        }
    }))
    .into_response()
}

async fn fallback_handler() -> Response {
    AppError::not_found("route not found").into_response()
}
