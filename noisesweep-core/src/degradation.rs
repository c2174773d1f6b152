//! Degradation analysis — how much each strategy loses between the quietest and
//! noisiest levels of the sweep.
//!
//! The endpoints are one global pair: `epsilon_min` and `epsilon_max` over the
//! whole dataset, not per strategy. A strategy without a sample at either
//! endpoint cannot be ranked.
//!
//! Zero baseline policy:
//! - `initial_mean == 0` and no drop → `percentage_drop = 0`
//! - `initial_mean == 0` with a drop → [`DegradationError::DegenerateBaseline`]
//!
//! Failing strategies are skipped from the ranking and kept in
//! [`DegradationReport::skipped`]; the analysis as a whole never aborts.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error;

use crate::domain::Dataset;

/// Change in mean payoff between the global epsilon endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegradationRecord {
    pub strategy: String,
    /// Mean at `epsilon_min`.
    pub initial_mean: f64,
    /// Mean at `epsilon_max`.
    pub final_mean: f64,
    /// `initial_mean - final_mean`.
    pub absolute_drop: f64,
    /// `absolute_drop / initial_mean * 100`.
    pub percentage_drop: f64,
}

/// Why a strategy could not be ranked.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum DegradationError {
    #[error("{strategy}: no observation at ε={epsilon:.2}")]
    MissingObservation { strategy: String, epsilon: f64 },

    #[error("{strategy}: baseline mean is zero but drop is {absolute_drop:.2}")]
    DegenerateBaseline { strategy: String, absolute_drop: f64 },
}

impl DegradationError {
    pub fn strategy(&self) -> &str {
        match self {
            DegradationError::MissingObservation { strategy, .. }
            | DegradationError::DegenerateBaseline { strategy, .. } => strategy,
        }
    }
}

/// Ranked degradation records plus the strategies that were skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DegradationReport {
    /// Global `(epsilon_min, epsilon_max)`; `None` for an empty dataset.
    pub epsilon_range: Option<(f64, f64)>,
    /// Largest relative degradation first.
    pub records: Vec<DegradationRecord>,
    pub skipped: Vec<DegradationError>,
}

impl DegradationReport {
    pub fn epsilon_min(&self) -> Option<f64> {
        self.epsilon_range.map(|(lo, _)| lo)
    }

    pub fn epsilon_max(&self) -> Option<f64> {
        self.epsilon_range.map(|(_, hi)| hi)
    }

    pub fn record(&self, strategy: &str) -> Option<&DegradationRecord> {
        self.records.iter().find(|r| r.strategy == strategy)
    }
}

/// Degradation for one strategy between the given endpoints.
pub fn degradation_for(
    dataset: &Dataset,
    strategy: &str,
    epsilon_min: f64,
    epsilon_max: f64,
) -> Result<DegradationRecord, DegradationError> {
    let missing = |epsilon: f64| DegradationError::MissingObservation {
        strategy: strategy.to_string(),
        epsilon,
    };

    let initial = dataset
        .lookup(strategy, epsilon_min)
        .ok_or_else(|| missing(epsilon_min))?;
    let last = dataset
        .lookup(strategy, epsilon_max)
        .ok_or_else(|| missing(epsilon_max))?;

    let absolute_drop = initial.mean - last.mean;
    let percentage_drop = if initial.mean != 0.0 {
        absolute_drop / initial.mean * 100.0
    } else if absolute_drop == 0.0 {
        0.0
    } else {
        return Err(DegradationError::DegenerateBaseline {
            strategy: strategy.to_string(),
            absolute_drop,
        });
    };

    Ok(DegradationRecord {
        strategy: strategy.to_string(),
        initial_mean: initial.mean,
        final_mean: last.mean,
        absolute_drop,
        percentage_drop,
    })
}

/// Rank every strategy by percentage drop, descending.
///
/// Ties keep first-appearance order (stable sort).
pub fn analyze(dataset: &Dataset) -> DegradationReport {
    let Some((epsilon_min, epsilon_max)) = dataset.epsilon_range() else {
        return DegradationReport::default();
    };

    let mut records = Vec::new();
    let mut skipped = Vec::new();
    for strategy in dataset.strategies() {
        match degradation_for(dataset, strategy, epsilon_min, epsilon_max) {
            Ok(record) => records.push(record),
            Err(err) => {
                tracing::warn!(strategy, error = %err, "skipping strategy in degradation summary");
                skipped.push(err);
            }
        }
    }

    records.sort_by(|a, b| {
        b.percentage_drop
            .partial_cmp(&a.percentage_drop)
            .unwrap_or(Ordering::Equal)
    });

    DegradationReport {
        epsilon_range: Some((epsilon_min, epsilon_max)),
        records,
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Sample;

    fn sweep() -> Dataset {
        Dataset::new(vec![
            Sample::new("TitForTat", 0.0, 450.0).with_ci(440.0, 460.0),
            Sample::new("TitForTat", 0.2, 300.0).with_ci(290.0, 310.0),
            Sample::new("AllDefect", 0.0, 300.0),
            Sample::new("AllDefect", 0.2, 300.0),
        ])
    }

    #[test]
    fn ranks_by_percentage_drop() {
        let report = analyze(&sweep());
        assert_eq!(report.epsilon_range, Some((0.0, 0.2)));

        let names: Vec<&str> = report.records.iter().map(|r| r.strategy.as_str()).collect();
        assert_eq!(names, vec!["TitForTat", "AllDefect"]);

        let tft = report.record("TitForTat").unwrap();
        assert_eq!(tft.absolute_drop, 150.0);
        assert!((tft.percentage_drop - 33.333_333).abs() < 1e-4);
        assert_eq!(report.record("AllDefect").unwrap().percentage_drop, 0.0);
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn single_strategy_single_epsilon_is_flat() {
        let data = Dataset::new(vec![Sample::new("PAVLOV", 0.1, 2.5)]);
        let report = analyze(&data);
        let record = &report.records[0];
        assert_eq!(record.absolute_drop, 0.0);
        assert_eq!(record.percentage_drop, 0.0);
        assert_eq!(report.epsilon_range, Some((0.1, 0.1)));
    }

    #[test]
    fn missing_endpoint_is_skipped() {
        let mut samples = sweep().samples().to_vec();
        samples.push(Sample::new("PROBER", 0.0, 400.0));
        let report = analyze(&Dataset::new(samples));

        assert_eq!(report.records.len(), 2);
        assert_eq!(
            report.skipped,
            vec![DegradationError::MissingObservation {
                strategy: "PROBER".into(),
                epsilon: 0.2,
            }]
        );
    }

    #[test]
    fn zero_baseline_without_drop_is_zero_percent() {
        let data = Dataset::new(vec![
            Sample::new("AllCooperate", 0.0, 0.0),
            Sample::new("AllCooperate", 0.3, 0.0),
        ]);
        let record = degradation_for(&data, "AllCooperate", 0.0, 0.3).unwrap();
        assert_eq!(record.percentage_drop, 0.0);
    }

    #[test]
    fn zero_baseline_with_drop_is_degenerate() {
        let data = Dataset::new(vec![
            Sample::new("AllCooperate", 0.0, 0.0),
            Sample::new("AllCooperate", 0.3, -5.0),
        ]);
        let err = degradation_for(&data, "AllCooperate", 0.0, 0.3).unwrap_err();
        assert_eq!(
            err,
            DegradationError::DegenerateBaseline {
                strategy: "AllCooperate".into(),
                absolute_drop: 5.0,
            }
        );
        assert!(analyze(&data).records.is_empty());
        assert_eq!(analyze(&data).skipped.len(), 1);
    }

    #[test]
    fn duplicate_rows_use_last_seen() {
        let mut samples = sweep().samples().to_vec();
        samples.push(Sample::new("AllDefect", 0.2, 150.0));
        let report = analyze(&Dataset::new(samples));

        let ad = report.record("AllDefect").unwrap();
        assert_eq!(ad.final_mean, 150.0);
        assert_eq!(ad.percentage_drop, 50.0);
        assert_eq!(report.records[0].strategy, "AllDefect");
    }

    #[test]
    fn equal_drops_keep_input_order() {
        let data = Dataset::new(vec![
            Sample::new("GrimTrigger", 0.0, 10.0),
            Sample::new("PAVLOV", 0.0, 20.0),
            Sample::new("GrimTrigger", 0.5, 5.0),
            Sample::new("PAVLOV", 0.5, 10.0),
        ]);
        let names: Vec<String> = analyze(&data)
            .records
            .into_iter()
            .map(|r| r.strategy)
            .collect();
        assert_eq!(names, vec!["GrimTrigger", "PAVLOV"]);
    }

    #[test]
    fn empty_dataset_yields_empty_report() {
        let report = analyze(&Dataset::default());
        assert_eq!(report, DegradationReport::default());
        assert_eq!(report.epsilon_min(), None);
    }

    #[test]
    fn negative_drop_ranks_last() {
        let data = Dataset::new(vec![
            Sample::new("ContriteTitForTat", 0.0, 100.0),
            Sample::new("ContriteTitForTat", 0.2, 120.0),
            Sample::new("GrimTrigger", 0.0, 100.0),
            Sample::new("GrimTrigger", 0.2, 50.0),
        ]);
        let report = analyze(&data);
        assert_eq!(report.records[0].strategy, "GrimTrigger");
        assert_eq!(report.records[1].percentage_drop, -20.0);
    }
}
