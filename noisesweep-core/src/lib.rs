//! noisesweep core — domain types, sweep loading, rankings, degradation analysis.
//!
//! This crate turns the flat table produced by an iterated prisoner's dilemma
//! noise sweep into read-only analytical views:
//! - Domain types (samples, noise levels, datasets)
//! - CSV loading with column validation
//! - Per-epsilon rankings and per-strategy series
//! - Degradation between the quietest and noisiest sweep levels

pub mod degradation;
pub mod domain;
pub mod loader;
pub mod statistics;

pub use degradation::{
    analyze, degradation_for, DegradationError, DegradationRecord, DegradationReport,
};
pub use domain::{Dataset, DatasetHash, NoiseLevel, Sample};
pub use loader::{load, load_from_reader, DatasetOverview, LoadError};
pub use statistics::{group_by_epsilon, series_for, EpsilonGroup, StatisticsTable, StrategySeries};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: domain and analysis types are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<Sample>();
        require_sync::<Sample>();
        require_send::<Dataset>();
        require_sync::<Dataset>();
        require_send::<NoiseLevel>();
        require_sync::<NoiseLevel>();
        require_send::<StatisticsTable<'static>>();
        require_sync::<StatisticsTable<'static>>();
        require_send::<DegradationReport>();
        require_sync::<DegradationReport>();
        require_send::<LoadError>();
        require_sync::<LoadError>();
    }
}
