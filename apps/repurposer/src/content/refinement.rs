use serde::{Deserialize, Serialize};

/// Scores strictly below this trigger one rewrite attempt.
pub const DEFAULT_REFINEMENT_THRESHOLD: f64 = 0.90;

/// True iff a score is present and strictly below `threshold`.
/// A missing score means "cannot evaluate", which leaves the content as-is.
pub fn needs_refinement(score: Option<f64>, threshold: f64) -> bool {
    score.is_some_and(|s| s < threshold)
}

/// Before/after scores of a rewrite attempt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RefinementRecord {
    pub old: Option<f64>,
    pub new: Option<f64>,
    pub delta: f64,
}

impl RefinementRecord {
    /// `delta` is `new - old` when both are present, otherwise 0.0.
    pub fn between(old: Option<f64>, new: Option<f64>) -> Self {
        let delta = match (old, new) {
            (Some(o), Some(n)) => n - o,
            _ => 0.0,
        };
        Self { old, new, delta }
    }

    pub fn was_refined(&self) -> bool {
        self.old.is_some() && self.new.is_some()
    }
}
