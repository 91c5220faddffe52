//! Numerical Sanitization
//!
//! Probability clamping and the logit/sigmoid pair shared by the scoring model.
//!
//! Functions:
//! - Probability clamping before log-odds transforms
//! - Logit / sigmoid
//! - Probability range checks

use crate::error::{EngineError, Result};
use crate::types::LOGIT_EPSILON;

/// 检查数值是否无效 (NaN 或 Inf)
pub fn is_invalid(x: f64) -> bool {
    x.is_nan() || x.is_infinite()
}

/// 将概率限制在 [eps, 1 - eps]，保证 logit 有限
pub fn clamp_probability(p: f64, eps: f64) -> f64 {
    p.clamp(eps, 1.0 - eps)
}

/// Log-odds of `p`, clamped with [`LOGIT_EPSILON`]
pub fn logit(p: f64) -> f64 {
    let p = clamp_probability(p, LOGIT_EPSILON);
    (p / (1.0 - p)).ln()
}

pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Reject probabilities that are non-finite or fall outside `[0, 1]`
pub fn ensure_probability(what: &str, p: f64) -> Result<f64> {
    if is_invalid(p) || !(0.0..=1.0).contains(&p) {
        return Err(EngineError::NumericDomain(format!(
            "{what} must be a probability in [0, 1], got {p}"
        )));
    }
    Ok(p)
}
