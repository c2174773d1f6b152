//! Sweep file loading.
//!
//! Reads the comma-separated table written by the upstream noise sweep
//! (`Epsilon,Strategy,Mean,StdDev,CI_Lower,CI_Upper`) into a [`Dataset`].
//! Column order is free; headers are matched by exact name.
//!
//! Required columns: `Strategy`, `Epsilon`, `Mean`. Optional: `StdDev`,
//! `CI_Lower`, `CI_Upper`. An empty or unparsable optional cell (`-`, `N/A`)
//! is read as absent rather than rejected.

use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::{Dataset, DatasetHash, Sample};

pub const STRATEGY_COLUMN: &str = "Strategy";
pub const EPSILON_COLUMN: &str = "Epsilon";
pub const MEAN_COLUMN: &str = "Mean";

const REQUIRED_COLUMNS: [&str; 3] = [STRATEGY_COLUMN, EPSILON_COLUMN, MEAN_COLUMN];

/// Errors from the loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("input file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("missing required column '{column}'")]
    MissingColumn { column: &'static str },

    #[error("row {row}: {reason}")]
    MalformedData { row: usize, reason: String },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl LoadError {
    /// True for errors caused by the table's content rather than the filesystem.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            LoadError::MissingColumn { .. } | LoadError::MalformedData { .. } | LoadError::Csv(_)
        )
    }
}

/// One raw CSV row, before validation.
#[derive(Debug, Deserialize)]
struct SweepRow {
    #[serde(rename = "Strategy")]
    strategy: String,
    #[serde(rename = "Epsilon")]
    epsilon: f64,
    #[serde(rename = "Mean")]
    mean: f64,
    #[serde(rename = "StdDev", default, deserialize_with = "csv::invalid_option")]
    std_dev: Option<f64>,
    #[serde(rename = "CI_Lower", default, deserialize_with = "csv::invalid_option")]
    ci_lower: Option<f64>,
    #[serde(rename = "CI_Upper", default, deserialize_with = "csv::invalid_option")]
    ci_upper: Option<f64>,
}

impl SweepRow {
    fn into_sample(self, row: usize) -> Result<Sample, LoadError> {
        let malformed = |reason: String| LoadError::MalformedData { row, reason };

        if self.strategy.is_empty() {
            return Err(malformed(format!("empty '{STRATEGY_COLUMN}'")));
        }
        if !self.epsilon.is_finite() || !(0.0..=1.0).contains(&self.epsilon) {
            return Err(malformed(format!(
                "'{EPSILON_COLUMN}' must be a probability in [0, 1], got {}",
                self.epsilon
            )));
        }
        if !self.mean.is_finite() {
            return Err(malformed(format!(
                "'{MEAN_COLUMN}' must be finite, got {}",
                self.mean
            )));
        }

        Ok(Sample {
            strategy: self.strategy,
            epsilon: self.epsilon,
            mean: self.mean,
            std_dev: self.std_dev.filter(|v| v.is_finite()),
            ci_lower: self.ci_lower.filter(|v| v.is_finite()),
            ci_upper: self.ci_upper.filter(|v| v.is_finite()),
        })
    }
}

/// Load a sweep file from disk.
pub fn load(path: &Path) -> Result<Dataset, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let file = std::fs::File::open(path)?;
    let dataset = load_from_reader(file)?;

    let overview = DatasetOverview::from_dataset(path.display().to_string(), &dataset);
    tracing::info!(
        source = %overview.source,
        rows = overview.rows,
        strategies = overview.strategies,
        epsilons = ?overview.epsilons,
        "loaded sweep dataset"
    );

    Ok(dataset)
}

/// Parse a sweep table from any reader.
pub fn load_from_reader<R: Read>(reader: R) -> Result<Dataset, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(LoadError::MissingColumn { column });
        }
    }

    let mut samples = Vec::new();
    for (i, result) in rdr.deserialize::<SweepRow>().enumerate() {
        let row = i + 1;
        let raw = result.map_err(|e| LoadError::MalformedData {
            row,
            reason: deserialize_reason(&e),
        })?;
        samples.push(raw.into_sample(row)?);
    }

    Ok(Dataset::new(samples))
}

fn deserialize_reason(err: &csv::Error) -> String {
    match err.kind() {
        csv::ErrorKind::Deserialize { err, .. } => err.to_string(),
        _ => err.to_string(),
    }
}

/// Load-time facts about a dataset, printed before the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetOverview {
    pub source: String,
    pub rows: usize,
    pub strategies: usize,
    pub epsilons: Vec<f64>,
    pub fingerprint: DatasetHash,
}

impl DatasetOverview {
    pub fn from_dataset(source: impl Into<String>, dataset: &Dataset) -> Self {
        Self {
            source: source.into(),
            rows: dataset.len(),
            strategies: dataset.strategies().len(),
            epsilons: dataset.epsilons(),
            fingerprint: dataset.fingerprint(),
        }
    }
}
