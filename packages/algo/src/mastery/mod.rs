//! Mastery Tracking
//!
//! Per-skill exponential moving average over an ordered interaction history.
//!
//! Core principles:
//! - Every skill starts at a neutral prior of 0.5 the first time it is seen
//! - Each event moves the skill toward its outcome: m = (1 - decay) * m + decay * c
//! - Older evidence decays geometrically per later observation of the same skill
//! - The overall success rate is Laplace-smoothed over all valid events

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::types::{InteractionEvent, MASTERY_PRIOR};

/// Mastery of a single skill
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkillMastery {
    pub skill: String,
    pub mastery: f64,
}

/// Skill -> mastery, iterated in first-seen order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MasteryMap {
    entries: Vec<SkillMastery>,
    index: HashMap<String, usize>,
}

impl MasteryMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, skill: &str) -> Option<f64> {
        self.index.get(skill).map(|&i| self.entries[i].mastery)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkillMastery> {
        self.entries.iter()
    }

    fn update(&mut self, skill: &str, outcome: f64, decay: f64) {
        let idx = match self.index.get(skill) {
            Some(&idx) => idx,
            None => {
                self.entries.push(SkillMastery {
                    skill: skill.to_string(),
                    mastery: MASTERY_PRIOR,
                });
                self.index.insert(skill.to_string(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        let entry = &mut self.entries[idx];
        entry.mastery = (1.0 - decay) * entry.mastery + decay * outcome;
    }
}

impl IntoIterator for MasteryMap {
    type Item = SkillMastery;
    type IntoIter = std::vec::IntoIter<SkillMastery>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Tracker output: per-skill mastery plus the global success estimate
#[derive(Clone, Debug, PartialEq)]
pub struct MasteryEstimate {
    pub mastery: MasteryMap,
    pub p_student: f64,
    /// Number of events that contributed (empty-skill events excluded)
    pub events: usize,
}

/// Exponential moving average tracker
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MasteryTracker {
    decay: f64,
}

impl MasteryTracker {
    /// `decay` must lie strictly inside (0, 1)
    pub fn new(decay: f64) -> Result<Self> {
        if !decay.is_finite() || decay <= 0.0 || decay >= 1.0 {
            return Err(EngineError::InvalidParameter(format!(
                "decay must lie in (0, 1), got {decay}"
            )));
        }
        Ok(Self { decay })
    }

    pub fn track(&self, history: &[InteractionEvent]) -> MasteryEstimate {
        let mut mastery = MasteryMap::new();
        let mut total = 0usize;
        let mut total_correct = 0usize;

        for event in history {
            if event.skill.is_empty() {
                continue;
            }
            mastery.update(&event.skill, event.outcome(), self.decay);
            total += 1;
            if event.correct {
                total_correct += 1;
            }
        }

        let p_student = if total > 0 {
            (total_correct as f64 + 1.0) / (total as f64 + 2.0)
        } else {
            MASTERY_PRIOR
        };

        MasteryEstimate {
            mastery,
            p_student,
            events: total,
        }
    }

    /// Like [`track`](Self::track), but fails when no event carried evidence
    pub fn track_with_evidence(&self, history: &[InteractionEvent]) -> Result<MasteryEstimate> {
        let estimate = self.track(history);
        if estimate.events == 0 {
            return Err(EngineError::EmptyHistory);
        }
        Ok(estimate)
    }
}
