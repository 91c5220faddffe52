//! Recommendation Engine
//!
//! Picks the next practice items whose predicted success falls inside a target band.
//!
//! Item-level path (catalog has item data):
//! 1. Per-skill mastery via EMA (decay 0.3)
//! 2. Ability per skill from mastery blended with the skill base rate
//! 3. 1PL prediction for every linked item with enough observations
//! 4. Keep predictions inside the band, scored by distance to the band midpoint
//! 5. Too few candidates: scan again with a widened band and append the matches
//! 6. Rank by (score, seen) descending and truncate to top_k
//!
//! Skill-level path (no item data): rank skills by distance of mastery to 0.65.
//!
//! Widened candidates are appended without de-duplication against the primary set, and the
//! skill-level path ignores the caller's band. Both are kept as observable behavior.

use std::sync::Arc;

use crate::artifacts::ArtifactStore;
use crate::catalog::Catalog;
use crate::error::Result;
use crate::irt::{ability, predict};
use crate::mastery::{MasteryMap, MasteryTracker};
use crate::sanitize::ensure_probability;
use crate::types::{
    Band, InteractionEvent, ItemRecommendation, RecommendOptions, Recommendation,
    SkillRecommendation, FALLBACK_TARGET_MASTERY, RECOMMEND_DECAY,
};

/// Recommendation engine over an injected artifact store
pub struct RecommendationEngine<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for RecommendationEngine<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: ArtifactStore + ?Sized> RecommendationEngine<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Rank the next practice items (or skills) for `history`
    pub fn recommend(
        &self,
        history: &[InteractionEvent],
        options: &RecommendOptions,
    ) -> Result<Vec<Recommendation>> {
        let band = options.validate()?;
        self.store.load_preprocessor()?;
        let catalog = self.store.load_catalog()?;

        let tracker = MasteryTracker::new(RECOMMEND_DECAY)?;
        let estimate = tracker.track(history);

        let recs = if catalog.has_items() {
            rank_items(&catalog, &estimate.mastery, band, options)?
                .into_iter()
                .map(Recommendation::Item)
                .collect::<Vec<_>>()
        } else {
            rank_skills(&estimate.mastery, options.top_k)
                .into_iter()
                .map(Recommendation::Skill)
                .collect::<Vec<_>>()
        };

        tracing::debug!(
            events = estimate.events,
            skills = estimate.mastery.len(),
            item_level = catalog.has_items(),
            returned = recs.len(),
            "recommendation computed"
        );

        Ok(recs)
    }
}

/// Items linked to known skills whose prediction lies in `band`
fn collect_candidates(
    catalog: &Catalog,
    mastery: &MasteryMap,
    band: Band,
    midpoint: f64,
    min_item_count: u64,
    out: &mut Vec<ItemRecommendation>,
) -> Result<()> {
    for entry in mastery.iter() {
        let theta = ability(entry.mastery, catalog.base_rate(&entry.skill));
        for item_id in catalog.items_for(&entry.skill) {
            let stats = catalog.item(item_id)?;
            if stats.n < min_item_count {
                continue;
            }
            let p_hat = ensure_probability("predicted success", predict(theta, stats.b))?;
            if !band.contains(p_hat) {
                continue;
            }
            out.push(ItemRecommendation {
                problem_id: item_id.clone(),
                skill: entry.skill.clone(),
                pred_success: p_hat,
                seen: stats.n,
                p_item: stats.p_correct,
                difficulty_b: stats.b,
                score: -(midpoint - p_hat).abs(),
            });
        }
    }
    Ok(())
}

fn rank_items(
    catalog: &Catalog,
    mastery: &MasteryMap,
    band: Band,
    options: &RecommendOptions,
) -> Result<Vec<ItemRecommendation>> {
    let midpoint = band.midpoint();
    let mut recs = Vec::new();
    collect_candidates(catalog, mastery, band, midpoint, options.min_item_count, &mut recs)?;

    if recs.len() < options.top_k {
        let widened = band.widened();
        tracing::debug!(
            primary = recs.len(),
            low = widened.low,
            high = widened.high,
            "too few candidates, widening band"
        );
        collect_candidates(catalog, mastery, widened, midpoint, options.min_item_count, &mut recs)?;
    }

    recs.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| b.seen.cmp(&a.seen))
    });
    recs.truncate(options.top_k);
    Ok(recs)
}

fn rank_skills(mastery: &MasteryMap, top_k: usize) -> Vec<SkillRecommendation> {
    let mut recs: Vec<SkillRecommendation> = mastery
        .iter()
        .map(|entry| SkillRecommendation {
            skill: entry.skill.clone(),
            mastery: entry.mastery,
            score: -(FALLBACK_TARGET_MASTERY - entry.mastery).abs(),
        })
        .collect();
    recs.sort_by(|a, b| b.score.total_cmp(&a.score));
    recs.truncate(top_k);
    recs
}
