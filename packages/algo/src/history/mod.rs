//! History Normalization
//!
//! Clients send each history entry either as an object `{"skill": .., "correct": ..}` or as a
//! two-element array `[skill, correct]`. Both shapes are resolved here into
//! [`InteractionEvent`] before anything reaches the tracker or the recommender.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{EngineError, Result};
use crate::types::InteractionEvent;

/// History entry as it arrives on the wire
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawHistoryEntry {
    Record {
        #[serde(default)]
        skill: Option<Value>,
        #[serde(default)]
        correct: Option<Value>,
    },
    Pair(Value, Value),
    Other(Value),
}

impl RawHistoryEntry {
    /// Resolve to the canonical event; `index` is only used for error reporting
    pub fn normalize(&self, index: usize) -> Result<InteractionEvent> {
        let (skill, correct) = match self {
            RawHistoryEntry::Record { skill, correct } => (skill.as_ref(), correct.as_ref()),
            RawHistoryEntry::Pair(skill, correct) => (Some(skill), Some(correct)),
            RawHistoryEntry::Other(value) => {
                return Err(EngineError::invalid_entry(
                    index,
                    format!("expected {{skill, correct}} or [skill, correct], got {value}"),
                ))
            }
        };

        let skill = skill
            .and_then(skill_text)
            .ok_or_else(|| EngineError::invalid_entry(index, "missing skill identifier"))?;
        let correct = correct
            .ok_or_else(|| EngineError::invalid_entry(index, "missing correctness value"))?;
        let correct = parse_correct(correct).ok_or_else(|| {
            EngineError::invalid_entry(index, format!("correct must be 0 or 1, got {correct}"))
        })?;

        Ok(InteractionEvent::new(skill, correct))
    }
}

fn skill_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_correct(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_f64() {
            Some(x) if x == 0.0 => Some(false),
            Some(x) if x == 1.0 => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim() {
            "0" => Some(false),
            "1" => Some(true),
            _ => None,
        },
        _ => None,
    }
}

/// Normalize a whole history, failing on the first malformed entry
pub fn normalize_history(entries: &[RawHistoryEntry]) -> Result<Vec<InteractionEvent>> {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| entry.normalize(i))
        .collect()
}
