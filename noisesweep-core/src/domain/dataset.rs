//! Dataset — the ordered samples of one sweep file.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::{NoiseLevel, Sample};

/// Deterministic content hash of a dataset (BLAKE3, hex).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetHash(pub String);

impl DatasetHash {
    /// First 12 hex characters, for display.
    pub fn short(&self) -> &str {
        let end = self.0.len().min(12);
        &self.0[..end]
    }
}

impl fmt::Display for DatasetHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Samples in input order.
///
/// A (strategy, epsilon) pair should appear once. When it appears more than
/// once every row is kept, and `lookup` returns the last one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    samples: Vec<Sample>,
}

impl Dataset {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Distinct strategy names in first-appearance order.
    pub fn strategies(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.samples
            .iter()
            .filter(|s| seen.insert(s.strategy.as_str()))
            .map(|s| s.strategy.as_str())
            .collect()
    }

    /// Distinct epsilon values, ascending.
    pub fn epsilons(&self) -> Vec<f64> {
        self.samples
            .iter()
            .map(Sample::noise_level)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(NoiseLevel::value)
            .collect()
    }

    /// Global `(min, max)` epsilon, `None` when empty.
    pub fn epsilon_range(&self) -> Option<(f64, f64)> {
        let levels: BTreeSet<NoiseLevel> = self.samples.iter().map(Sample::noise_level).collect();
        match (levels.first(), levels.last()) {
            (Some(lo), Some(hi)) => Some((lo.value(), hi.value())),
            _ => None,
        }
    }

    /// The sample for `(strategy, epsilon)`. Last-seen-wins on duplicates.
    pub fn lookup(&self, strategy: &str, epsilon: f64) -> Option<&Sample> {
        let level = NoiseLevel::new(epsilon);
        self.samples
            .iter()
            .rev()
            .find(|s| s.strategy == strategy && s.noise_level() == level)
    }

    /// BLAKE3 over every sample field in input order.
    pub fn fingerprint(&self) -> DatasetHash {
        let mut hasher = blake3::Hasher::new();
        for sample in &self.samples {
            hasher.update(&(sample.strategy.len() as u64).to_le_bytes());
            hasher.update(sample.strategy.as_bytes());
            hasher.update(&sample.epsilon.to_le_bytes());
            hasher.update(&sample.mean.to_le_bytes());
            for field in [sample.std_dev, sample.ci_lower, sample.ci_upper] {
                match field {
                    Some(v) => {
                        hasher.update(&[1]);
                        hasher.update(&v.to_le_bytes());
                    }
                    None => {
                        hasher.update(&[0]);
                    }
                }
            }
        }
        DatasetHash(hasher.finalize().to_hex().to_string())
    }
}

impl FromIterator<Sample> for Dataset {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
