//! NoiseLevel — a totally ordered epsilon key.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Epsilon value usable as a `BTreeMap` key.
///
/// Ordering is IEEE total ordering with `-0.0` folded into `0.0`. Equality is
/// exact: the sweep writes epsilons with two decimals, so equal text parses to
/// equal keys.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoiseLevel(f64);

impl NoiseLevel {
    pub fn new(epsilon: f64) -> Self {
        // -0.0 == 0.0 but their bit patterns differ
        if epsilon == 0.0 {
            Self(0.0)
        } else {
            Self(epsilon)
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<f64> for NoiseLevel {
    fn from(epsilon: f64) -> Self {
        Self::new(epsilon)
    }
}

impl PartialEq for NoiseLevel {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for NoiseLevel {}

impl PartialOrd for NoiseLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NoiseLevel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for NoiseLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
