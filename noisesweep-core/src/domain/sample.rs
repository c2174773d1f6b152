//! Sample — one measured (strategy, noise level) cell of a sweep.

use serde::{Deserialize, Serialize};

use super::NoiseLevel;

/// Mean payoff of one strategy at one noise level, with optional spread.
///
/// `ci_lower <= mean <= ci_upper` is expected but not enforced; bounds are
/// reported exactly as the sweep wrote them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub strategy: String,
    pub epsilon: f64,
    pub mean: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub std_dev: Option<f64>,
    #[serde(default)]
    pub ci_lower: Option<f64>,
    #[serde(default)]
    pub ci_upper: Option<f64>,
}

impl Sample {
    pub fn new(strategy: impl Into<String>, epsilon: f64, mean: f64) -> Self {
        Self {
            strategy: strategy.into(),
            epsilon,
            mean,
            std_dev: None,
            ci_lower: None,
            ci_upper: None,
        }
    }

    /// Attach confidence-interval bounds.
    pub fn with_ci(mut self, lower: f64, upper: f64) -> Self {
        self.ci_lower = Some(lower);
        self.ci_upper = Some(upper);
        self
    }

    pub fn with_std_dev(mut self, std_dev: f64) -> Self {
        self.std_dev = Some(std_dev);
        self
    }

    pub fn noise_level(&self) -> NoiseLevel {
        NoiseLevel::new(self.epsilon)
    }

    /// Both CI bounds, or `None` if either one is missing.
    pub fn ci(&self) -> Option<(f64, f64)> {
        match (self.ci_lower, self.ci_upper) {
            (Some(lo), Some(hi)) => Some((lo, hi)),
            _ => None,
        }
    }

    pub fn has_ci(&self) -> bool {
        self.ci().is_some()
    }
}
