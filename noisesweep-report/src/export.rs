//! JSON export of a report run.
//!
//! The document carries a `schema_version`; documents from a newer schema are
//! rejected on import.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use noisesweep_core::{DatasetOverview, DegradationReport, Sample, StatisticsTable};

/// Current schema version for exported reports.
pub const SCHEMA_VERSION: u32 = 1;

/// Ranked samples at one noise level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedLevel {
    pub epsilon: f64,
    pub ranking: Vec<Sample>,
}

/// Everything the console report shows, in serializable form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    pub schema_version: u32,
    pub dataset: DatasetOverview,
    pub levels: Vec<RankedLevel>,
    pub degradation: DegradationReport,
}

impl ReportDocument {
    pub fn new(
        overview: &DatasetOverview,
        table: &StatisticsTable<'_>,
        degradation: &DegradationReport,
    ) -> Self {
        let levels = table
            .groups()
            .iter()
            .map(|g| RankedLevel {
                epsilon: g.epsilon,
                ranking: g.ranked.iter().map(|s| (*s).clone()).collect(),
            })
            .collect();
        Self {
            schema_version: SCHEMA_VERSION,
            dataset: overview.clone(),
            levels,
            degradation: degradation.clone(),
        }
    }
}

/// Serialize a report to pretty JSON.
pub fn export_json(document: &ReportDocument) -> Result<String> {
    serde_json::to_string_pretty(document).context("failed to serialize report to JSON")
}

/// Deserialize a report, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<ReportDocument> {
    let document: ReportDocument =
        serde_json::from_str(json).context("failed to deserialize report from JSON")?;
    if document.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            document.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(document)
}

/// Write the JSON report to `path`.
pub fn write_json(path: &Path, document: &ReportDocument) -> Result<()> {
    let json = export_json(document)?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write JSON report to {}", path.display()))
}
