//! noisesweep report — console tables, comparison charts, JSON export.
//!
//! This crate builds on `noisesweep-core` to provide:
//! - Ranked per-epsilon tables and the degradation summary as text
//! - Line and grouped-bar charts (PNG or SVG)
//! - TOML report configuration
//! - Versioned JSON export of a run
//! - The report pipeline that sequences all of the above

pub mod chart;
pub mod config;
pub mod export;
pub mod pipeline;
pub mod report;

pub use chart::{ChartError, ChartRenderer, ChartStyle, Marker, PaletteEntry, DEFAULT_KEY_EPSILONS};
pub use config::{ConfigError, ReportConfig};
pub use export::{export_json, import_json, write_json, ReportDocument, SCHEMA_VERSION};
pub use pipeline::{
    report_dataset, run, Artifact, ArtifactKind, ArtifactStatus, PipelineError, RunOutcome,
    UPSTREAM_COMMAND,
};
pub use report::{
    render_dataset_overview, render_degradation_summary, render_ranked_table, render_report,
    render_skipped,
};
