use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::{Deserialize, Serialize};

use skilltrace_algo::types::RECOMMEND_DECAY;
use skilltrace_algo::{normalize_history, MasteryTracker, RawHistoryEntry, SkillMastery};

use crate::response::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasteryRequest {
    history: Vec<RawHistoryEntry>,
    #[serde(default = "default_decay")]
    decay: f64,
    #[serde(default, alias = "require_evidence")]
    require_evidence: bool,
}

fn default_decay() -> f64 {
    RECOMMEND_DECAY
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MasteryResponse {
    pub mastery: Vec<SkillMastery>,
    pub p_student: f64,
    pub events: usize,
}

pub async fn mastery(
    payload: Result<Json<MasteryRequest>, JsonRejection>,
) -> Result<Json<MasteryResponse>, AppError> {
    let Json(payload) = payload?;
    let tracker = MasteryTracker::new(payload.decay)?;
    let history = normalize_history(&payload.history)?;

    let estimate = if payload.require_evidence {
        tracker.track_with_evidence(&history)?
    } else {
        tracker.track(&history)
    };

    Ok(Json(MasteryResponse {
        mastery: estimate.mastery.into_iter().collect(),
        p_student: estimate.p_student,
        events: estimate.events,
    }))
}
