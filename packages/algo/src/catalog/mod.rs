//! Statistics Catalog
//!
//! Read-only skill and item statistics produced by the training pipeline: skill base rates,
//! item difficulty parameters and the skill -> item index. A catalog has no mutation methods;
//! once built it is shared behind an `Arc`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::types::{CatalogMeta, ItemStats, SkillStats, DEFAULT_BASE_RATE};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    skill_stats: HashMap<String, SkillStats>,
    #[serde(default)]
    item_stats: HashMap<String, ItemStats>,
    #[serde(default)]
    skill_to_items: HashMap<String, Vec<String>>,
    #[serde(default)]
    meta: CatalogMeta,
}

impl Catalog {
    pub fn new(
        skill_stats: HashMap<String, SkillStats>,
        item_stats: HashMap<String, ItemStats>,
        skill_to_items: HashMap<String, Vec<String>>,
        meta: CatalogMeta,
    ) -> Self {
        Self {
            skill_stats,
            item_stats,
            skill_to_items,
            meta,
        }
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| EngineError::missing_artifact("catalog", e))
    }

    /// Population success rate for `skill`, 0.5 when the skill is unknown
    pub fn base_rate(&self, skill: &str) -> f64 {
        self.skill_stats
            .get(skill)
            .map(|s| s.p_correct)
            .unwrap_or(DEFAULT_BASE_RATE)
    }

    /// Item ids linked to `skill`, in catalog order
    pub fn items_for(&self, skill: &str) -> &[String] {
        self.skill_to_items
            .get(skill)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Statistics for an item the index references; absence means the catalog is inconsistent
    pub fn item(&self, item_id: &str) -> Result<&ItemStats> {
        self.item_stats.get(item_id).ok_or_else(|| {
            EngineError::CatalogInconsistency(format!(
                "item {item_id} is indexed but has no item_stats entry"
            ))
        })
    }

    /// Whether item-level recommendation is possible
    pub fn has_items(&self) -> bool {
        self.meta.problem_col_found && !self.item_stats.is_empty()
    }

    pub fn skill_count(&self) -> usize {
        self.skill_stats.len()
    }

    pub fn item_count(&self) -> usize {
        self.item_stats.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "skill_stats": {"Algebra": {"p_correct": 0.7}},
        "item_stats": {"p1": {"n": 40, "p_correct": 0.6, "b": -0.2}},
        "skill_to_items": {"Algebra": ["p1", "ghost"]},
        "meta": {"problem_col_found": true}
    }"#;

    #[test]
    fn test_parse_and_lookup() {
        let cat = Catalog::from_json_slice(SAMPLE.as_bytes()).unwrap();
        assert!(cat.has_items());
        assert_eq!(cat.base_rate("Algebra"), 0.7);
        assert_eq!(cat.base_rate("Unknown"), 0.5);
        assert_eq!(cat.items_for("Algebra"), &["p1".to_string(), "ghost".to_string()]);
        assert!(cat.items_for("Unknown").is_empty());
        assert_eq!(cat.item("p1").unwrap().n, 40);
    }

    #[test]
    fn test_missing_item_is_inconsistency() {
        let cat = Catalog::from_json_slice(SAMPLE.as_bytes()).unwrap();
        assert!(matches!(
            cat.item("ghost"),
            Err(EngineError::CatalogInconsistency(_))
        ));
    }

    #[test]
    fn test_missing_meta_means_no_items() {
        let cat = Catalog::from_json_slice(
            br#"{"skill_stats": {}, "item_stats": {"p1": {"n": 1, "p_correct": 0.5, "b": 0.0}}, "skill_to_items": {}}"#,
        )
        .unwrap();
        assert!(!cat.has_items());
    }

    #[test]
    fn test_malformed_json_is_missing_artifact() {
        let err = Catalog::from_json_slice(b"not json").unwrap_err();
        assert!(matches!(
            err,
            EngineError::MissingArtifact {
                artifact: "catalog",
                ..
            }
        ));
    }
}
