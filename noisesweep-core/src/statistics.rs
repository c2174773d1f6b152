//! Per-noise-level rankings and per-strategy series.
//!
//! Both views borrow from the [`Dataset`]; they are recomputed for every report
//! and never mutated.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::domain::{Dataset, NoiseLevel, Sample};

/// Samples at one epsilon, best mean first.
#[derive(Debug, Clone, PartialEq)]
pub struct EpsilonGroup<'a> {
    pub epsilon: f64,
    pub ranked: Vec<&'a Sample>,
}

/// Ranked groups in ascending epsilon order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatisticsTable<'a> {
    groups: Vec<EpsilonGroup<'a>>,
}

impl<'a> StatisticsTable<'a> {
    pub fn groups(&self) -> &[EpsilonGroup<'a>] {
        &self.groups
    }

    pub fn group(&self, epsilon: f64) -> Option<&EpsilonGroup<'a>> {
        let level = NoiseLevel::new(epsilon);
        self.groups
            .iter()
            .find(|g| NoiseLevel::new(g.epsilon) == level)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total samples across all groups.
    pub fn sample_count(&self) -> usize {
        self.groups.iter().map(|g| g.ranked.len()).sum()
    }
}

/// Group samples by epsilon and rank each group by mean, descending.
///
/// The sort is stable, so equal means keep input order. Duplicate
/// (strategy, epsilon) rows all stay in their group.
pub fn group_by_epsilon(dataset: &Dataset) -> StatisticsTable<'_> {
    let mut buckets: BTreeMap<NoiseLevel, Vec<&Sample>> = BTreeMap::new();
    for sample in dataset.samples() {
        buckets.entry(sample.noise_level()).or_default().push(sample);
    }

    let groups = buckets
        .into_iter()
        .map(|(level, mut ranked)| {
            ranked.sort_by(|a, b| b.mean.partial_cmp(&a.mean).unwrap_or(Ordering::Equal));
            EpsilonGroup {
                epsilon: level.value(),
                ranked,
            }
        })
        .collect();

    StatisticsTable { groups }
}

/// One strategy's samples, ascending epsilon, one point per epsilon.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategySeries<'a> {
    pub strategy: &'a str,
    pub points: Vec<&'a Sample>,
}

impl StrategySeries<'_> {
    /// True when every point carries both CI bounds.
    pub fn has_full_ci(&self) -> bool {
        !self.points.is_empty() && self.points.iter().all(|p| p.has_ci())
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Series for `strategy`. Duplicated epsilons resolve last-seen-wins.
pub fn series_for<'a>(dataset: &'a Dataset, strategy: &'a str) -> StrategySeries<'a> {
    let mut by_level: BTreeMap<NoiseLevel, &Sample> = BTreeMap::new();
    for sample in dataset.samples().iter().filter(|s| s.strategy == strategy) {
        by_level.insert(sample.noise_level(), sample);
    }
    StrategySeries {
        strategy,
        points: by_level.into_values().collect(),
    }
}
