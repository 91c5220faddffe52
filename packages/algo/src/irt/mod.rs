//! One-Parameter Item Response Model
//!
//! - Ability: log-odds of the learner's mastery blended with the skill's population base rate
//! - Prediction: P(success) = sigmoid(theta - b) for an item of difficulty b

use crate::sanitize::{logit, sigmoid};
use crate::types::MASTERY_BLEND_WEIGHT;

/// Latent ability on the logit scale.
///
/// A handful of events gives a noisy mastery, so a tenth of the weight stays on the
/// population base rate. The blend is clamped once, inside `logit`.
pub fn ability(mastery: f64, base_rate: f64) -> f64 {
    let blended = MASTERY_BLEND_WEIGHT * mastery + (1.0 - MASTERY_BLEND_WEIGHT) * base_rate;
    logit(blended)
}

/// Predicted probability that a learner of ability `theta` solves an item of difficulty `b`
pub fn predict(theta: f64, difficulty_b: f64) -> f64 {
    sigmoid(theta - difficulty_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_ability_neutral() {
        assert!(ability(0.5, 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_ability_blends_base_rate() {
        let expected = logit(0.9 * 0.455 + 0.1 * 0.8);
        assert!((ability(0.455, 0.8) - expected).abs() < 1e-12);
        assert!(ability(0.455, 0.8) > ability(0.455, 0.2));
    }

    #[test]
    fn test_ability_finite_at_extremes() {
        assert!(ability(0.0, 0.0).is_finite());
        assert!(ability(1.0, 1.0).is_finite());
    }

    #[test]
    fn test_ability_clamps_blend_not_inputs() {
        let edge = ability(0.0, 1.0);
        assert_eq!(edge, logit((1.0 - MASTERY_BLEND_WEIGHT) * 1.0));
        assert_eq!(ability(1.0, 1.0), logit(1.0));
    }

    #[test]
    fn test_predict_equal_ability_and_difficulty() {
        assert!((predict(1.3, 1.3) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_predict_in_open_unit_interval() {
        let p = predict(0.2, -0.4);
        assert!(p > 0.5 && p < 1.0);
    }

    proptest! {
        #[test]
        fn prop_harder_items_are_less_likely(
            theta in -5.0f64..5.0,
            b in -5.0f64..5.0,
            delta in 0.01f64..3.0,
        ) {
            prop_assert!(predict(theta, b + delta) < predict(theta, b));
        }
    }
}
