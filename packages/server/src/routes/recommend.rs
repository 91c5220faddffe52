use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use skilltrace_algo::types::{
    DEFAULT_MIN_ITEM_COUNT, DEFAULT_TARGET_HIGH, DEFAULT_TARGET_LOW, DEFAULT_TOP_K, MAX_TOP_K,
};
use skilltrace_algo::{normalize_history, RawHistoryEntry, RecommendOptions, Recommendation};

use crate::response::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    history: Vec<RawHistoryEntry>,
    #[serde(default = "default_top_k", alias = "top_k")]
    top_k: i64,
    #[serde(default = "default_target_low", alias = "target_low")]
    target_low: f64,
    #[serde(default = "default_target_high", alias = "target_high")]
    target_high: f64,
    #[serde(default = "default_min_item_count", alias = "min_item_count")]
    min_item_count: i64,
}

fn default_top_k() -> i64 {
    DEFAULT_TOP_K as i64
}

fn default_target_low() -> f64 {
    DEFAULT_TARGET_LOW
}

fn default_target_high() -> f64 {
    DEFAULT_TARGET_HIGH
}

fn default_min_item_count() -> i64 {
    DEFAULT_MIN_ITEM_COUNT as i64
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub recommendations: Vec<Recommendation>,
}

impl RecommendRequest {
    fn options(&self) -> Result<RecommendOptions, AppError> {
        if !(1..=MAX_TOP_K as i64).contains(&self.top_k) {
            return Err(AppError::validation(format!(
                "top_k must be between 1 and {MAX_TOP_K}, got {}",
                self.top_k
            )));
        }
        for (name, value) in [
            ("target_low", self.target_low),
            ("target_high", self.target_high),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(AppError::validation(format!(
                    "{name} must be between 0 and 1, got {value}"
                )));
            }
        }
        if self.min_item_count < 1 {
            return Err(AppError::validation(format!(
                "min_item_count must be at least 1, got {}",
                self.min_item_count
            )));
        }

        Ok(RecommendOptions {
            top_k: self.top_k as usize,
            target_low: self.target_low,
            target_high: self.target_high,
            min_item_count: self.min_item_count as u64,
        })
    }
}

pub async fn recommend(
    State(state): State<AppState>,
    payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> Result<Json<RecommendResponse>, AppError> {
    let Json(payload) = payload?;
    let options = payload.options()?;
    let history = normalize_history(&payload.history)?;

    // first use reads artifacts from disk
    let engine = state.engine().clone();
    let recommendations = tokio::task::spawn_blocking(move || engine.recommend(&history, &options))
        .await?
        .map_err(|err| {
            tracing::warn!(error = %err, "recommendation failed");
            AppError::from(err)
        })?;

    Ok(Json(RecommendResponse { recommendations }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_accepts_snake_and_camel_case() {
        let snake: RecommendRequest = serde_json::from_str(
            r#"{"history": [["A", 1]], "top_k": 3, "target_low": 0.5, "target_high": 0.7, "min_item_count": 10}"#,
        )
        .unwrap();
        let camel: RecommendRequest = serde_json::from_str(
            r#"{"history": [["A", 1]], "topK": 3, "targetLow": 0.5, "targetHigh": 0.7, "minItemCount": 10}"#,
        )
        .unwrap();
        assert_eq!(snake.options().unwrap(), camel.options().unwrap());
    }

    #[test]
    fn request_defaults() {
        let req: RecommendRequest = serde_json::from_str(r#"{"history": []}"#).unwrap();
        assert_eq!(req.options().unwrap(), RecommendOptions::default());
    }

    #[test]
    fn request_bounds_are_enforced() {
        for body in [
            r#"{"history": [], "top_k": 0}"#,
            r#"{"history": [], "top_k": 21}"#,
            r#"{"history": [], "target_low": -0.1}"#,
            r#"{"history": [], "target_high": 1.5}"#,
            r#"{"history": [], "min_item_count": 0}"#,
        ] {
            let req: RecommendRequest = serde_json::from_str(body).unwrap();
            assert!(req.options().is_err(), "{body} should be rejected");
        }
    }
}
