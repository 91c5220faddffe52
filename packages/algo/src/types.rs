//! Common Types and Constants
//!
//! Shared data structures used across the mastery, scoring and recommendation modules.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

// ==================== Constants ====================

/// Neutral prior for a skill seen for the first time
pub const MASTERY_PRIOR: f64 = 0.5;

/// EMA step used by the recommender
pub const RECOMMEND_DECAY: f64 = 0.3;

/// Weight given to the learner's own mastery when blending with the population base rate
pub const MASTERY_BLEND_WEIGHT: f64 = 0.9;

/// Base rate used for skills the catalog does not know
pub const DEFAULT_BASE_RATE: f64 = 0.5;

/// Clamp margin before a logit transform
pub const LOGIT_EPSILON: f64 = 1e-6;

/// Band widening margin on each side
pub const WIDEN_MARGIN: f64 = 0.10;

/// Widened band never drops below this
pub const WIDEN_FLOOR: f64 = 0.50;

/// Widened band never rises above this
pub const WIDEN_CEILING: f64 = 0.85;

/// Mastery the skill-level fallback aims for
pub const FALLBACK_TARGET_MASTERY: f64 = 0.65;

/// Default decision threshold when the threshold artifact is unusable
pub const DEFAULT_THRESHOLD: f64 = 0.5;

pub const DEFAULT_TOP_K: usize = 5;
pub const MAX_TOP_K: usize = 20;
pub const DEFAULT_TARGET_LOW: f64 = 0.60;
pub const DEFAULT_TARGET_HIGH: f64 = 0.75;
pub const DEFAULT_MIN_ITEM_COUNT: u64 = 30;

// ==================== History ====================

/// A single right/wrong interaction with a skill
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionEvent {
    pub skill: String,
    pub correct: bool,
}

impl InteractionEvent {
    pub fn new(skill: impl Into<String>, correct: bool) -> Self {
        Self {
            skill: skill.into(),
            correct,
        }
    }

    /// Outcome as the 0/1 value used by the EMA update
    pub fn outcome(&self) -> f64 {
        if self.correct {
            1.0
        } else {
            0.0
        }
    }
}

// ==================== Catalog Records ====================

/// Population statistics for a skill
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkillStats {
    pub p_correct: f64,
}

/// Population statistics for a single practice item
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemStats {
    /// Times observed in training data
    pub n: u64,
    pub p_correct: f64,
    /// Difficulty on the logit scale
    pub b: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogMeta {
    #[serde(default)]
    pub problem_col_found: bool,
}

// ==================== Recommendation ====================

/// Target band of predicted success probability
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub low: f64,
    pub high: f64,
}

impl Band {
    /// Build a band, rejecting bounds outside `[0, 1]` or inverted bounds
    pub fn new(low: f64, high: f64) -> Result<Self> {
        if !low.is_finite() || !high.is_finite() {
            return Err(EngineError::NumericDomain(format!(
                "target band bounds must be finite, got [{low}, {high}]"
            )));
        }
        if !(0.0..=1.0).contains(&low) || !(0.0..=1.0).contains(&high) {
            return Err(EngineError::NumericDomain(format!(
                "target band bounds must lie in [0, 1], got [{low}, {high}]"
            )));
        }
        if low > high {
            return Err(EngineError::NumericDomain(format!(
                "target_low {low} exceeds target_high {high}"
            )));
        }
        Ok(Self { low, high })
    }

    pub fn midpoint(&self) -> f64 {
        (self.low + self.high) / 2.0
    }

    pub fn contains(&self, p: f64) -> bool {
        self.low <= p && p <= self.high
    }

    /// Relaxed band used when the primary band yields too few candidates
    pub fn widened(&self) -> Self {
        Self {
            low: WIDEN_FLOOR.max(self.low - WIDEN_MARGIN),
            high: WIDEN_CEILING.min(self.high + WIDEN_MARGIN),
        }
    }
}

/// Caller-facing knobs for a recommendation run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecommendOptions {
    pub top_k: usize,
    pub target_low: f64,
    pub target_high: f64,
    pub min_item_count: u64,
}

impl Default for RecommendOptions {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            target_low: DEFAULT_TARGET_LOW,
            target_high: DEFAULT_TARGET_HIGH,
            min_item_count: DEFAULT_MIN_ITEM_COUNT,
        }
    }
}

impl RecommendOptions {
    pub fn validate(&self) -> Result<Band> {
        if self.top_k == 0 {
            return Err(EngineError::InvalidParameter(
                "top_k must be at least 1".to_string(),
            ));
        }
        if self.min_item_count == 0 {
            return Err(EngineError::InvalidParameter(
                "min_item_count must be at least 1".to_string(),
            ));
        }
        Band::new(self.target_low, self.target_high)
    }
}

/// Practice item whose predicted success falls inside the band
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemRecommendation {
    pub problem_id: String,
    pub skill: String,
    pub pred_success: f64,
    pub seen: u64,
    pub p_item: f64,
    pub difficulty_b: f64,
    pub score: f64,
}

/// Skill suggestion used when the catalog has no item data
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkillRecommendation {
    pub skill: String,
    pub mastery: f64,
    pub score: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Recommendation {
    Item(ItemRecommendation),
    Skill(SkillRecommendation),
}

impl Recommendation {
    pub fn score(&self) -> f64 {
        match self {
            Recommendation::Item(item) => item.score,
            Recommendation::Skill(skill) => skill.score,
        }
    }

    pub fn skill(&self) -> &str {
        match self {
            Recommendation::Item(item) => &item.skill,
            Recommendation::Skill(skill) => &skill.skill,
        }
    }

    pub fn as_item(&self) -> Option<&ItemRecommendation> {
        match self {
            Recommendation::Item(item) => Some(item),
            Recommendation::Skill(_) => None,
        }
    }
}
