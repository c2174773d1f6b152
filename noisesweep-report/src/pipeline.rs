//! Report pipeline: load → rank → summarise → export → charts.
//!
//! Steps run strictly in sequence. A missing or malformed input aborts the run
//! before anything is written to the report stream. Artifact failures do not:
//! each chart (and the JSON export) is attempted independently, and its outcome
//! is recorded in [`RunOutcome::artifacts`].

use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

use noisesweep_core::{analyze, group_by_epsilon, load, Dataset, DatasetOverview, DegradationReport, LoadError};

use crate::chart::ChartRenderer;
use crate::config::ReportConfig;
use crate::export::{write_json, ReportDocument};
use crate::report::{render_dataset_overview, render_report};

/// Command that produces the sweep table this tool reads.
pub const UPSTREAM_COMMAND: &str =
    "./program --noise-sweep --strategies TitForTat GrimTrigger PAVLOV ContriteTitForTat";

const TITLE: &str = "Prisoner's Dilemma - Noise Analysis Report";

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(
        "input file '{}' not found\nrun the noise sweep first to generate it:\n  {UPSTREAM_COMMAND}",
        path.display()
    )]
    InputNotFound { path: PathBuf },

    #[error("cannot read '{}': {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: LoadError,
    },

    #[error("failed to write report: {0}")]
    Output(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    LineChart,
    BarChart,
    Json,
}

impl ArtifactKind {
    fn description(self) -> &'static str {
        match self {
            ArtifactKind::LineChart => "noise level vs average payoff",
            ArtifactKind::BarChart => "strategy comparison at key noise levels",
            ArtifactKind::Json => "machine-readable report",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArtifactStatus {
    Written,
    Failed(String),
    Skipped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub status: ArtifactStatus,
}

impl Artifact {
    fn from_result<E: std::fmt::Display>(
        kind: ArtifactKind,
        path: &Path,
        result: Result<(), E>,
    ) -> Self {
        let status = match result {
            Ok(()) => ArtifactStatus::Written,
            Err(err) => {
                tracing::warn!(artifact = ?kind, path = %path.display(), error = %err, "artifact not written");
                ArtifactStatus::Failed(format!("{err:#}"))
            }
        };
        Self {
            kind,
            path: path.to_path_buf(),
            status,
        }
    }

    fn skipped(kind: ArtifactKind, path: &Path) -> Self {
        Self {
            kind,
            path: path.to_path_buf(),
            status: ArtifactStatus::Skipped,
        }
    }
}

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub overview: DatasetOverview,
    pub degradation: DegradationReport,
    pub artifacts: Vec<Artifact>,
}

impl RunOutcome {
    pub fn artifact(&self, kind: ArtifactKind) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.kind == kind)
    }

    pub fn failures(&self) -> impl Iterator<Item = &Artifact> {
        self.artifacts
            .iter()
            .filter(|a| matches!(a.status, ArtifactStatus::Failed(_)))
    }
}

/// Load `config.input` and run the full report.
pub fn run<W: Write>(config: &ReportConfig, out: &mut W) -> Result<RunOutcome, PipelineError> {
    let dataset = load(&config.input).map_err(|source| match source {
        LoadError::NotFound { path } => PipelineError::InputNotFound { path },
        source => PipelineError::Load {
            path: config.input.clone(),
            source,
        },
    })?;
    report_dataset(config, &dataset, &config.input.display().to_string(), out)
}

/// Run the report for an already loaded dataset.
pub fn report_dataset<W: Write>(
    config: &ReportConfig,
    dataset: &Dataset,
    source: &str,
    out: &mut W,
) -> Result<RunOutcome, PipelineError> {
    let rule = "=".repeat(80);
    writeln!(out, "\n{rule}\n  {TITLE}\n{rule}\n")?;

    let overview = DatasetOverview::from_dataset(source, dataset);
    out.write_all(render_dataset_overview(&overview).as_bytes())?;

    let table = group_by_epsilon(dataset);
    let degradation = analyze(dataset);
    out.write_all(render_report(&table, &degradation).as_bytes())?;

    let mut artifacts = Vec::new();

    if let Some(path) = &config.json_export {
        let document = ReportDocument::new(&overview, &table, &degradation);
        let artifact = Artifact::from_result(ArtifactKind::Json, path, write_json(path, &document));
        print_artifact(out, &artifact)?;
        artifacts.push(artifact);
    }

    if config.charts {
        let renderer = ChartRenderer::new(config.style.clone());

        let line = Artifact::from_result(
            ArtifactKind::LineChart,
            &config.line_chart,
            renderer.render_line_chart(dataset, &config.line_chart),
        );
        print_artifact(out, &line)?;
        artifacts.push(line);

        let bar = Artifact::from_result(
            ArtifactKind::BarChart,
            &config.bar_chart,
            renderer.render_bar_chart(dataset, &config.key_epsilons, &config.bar_chart),
        );
        print_artifact(out, &bar)?;
        artifacts.push(bar);
    } else {
        artifacts.push(Artifact::skipped(ArtifactKind::LineChart, &config.line_chart));
        artifacts.push(Artifact::skipped(ArtifactKind::BarChart, &config.bar_chart));
    }

    print_summary(out, &artifacts)?;

    Ok(RunOutcome {
        overview,
        degradation,
        artifacts,
    })
}

fn print_artifact<W: Write>(out: &mut W, artifact: &Artifact) -> std::io::Result<()> {
    match &artifact.status {
        ArtifactStatus::Written => writeln!(out, "Saved: {}", artifact.path.display()),
        ArtifactStatus::Failed(reason) => writeln!(out, "Not saved: {reason}"),
        ArtifactStatus::Skipped => Ok(()),
    }
}

fn print_summary<W: Write>(out: &mut W, artifacts: &[Artifact]) -> std::io::Result<()> {
    let written: Vec<&Artifact> = artifacts
        .iter()
        .filter(|a| a.status == ArtifactStatus::Written)
        .collect();
    writeln!(out, "\nAnalysis complete.")?;
    if written.is_empty() {
        return Ok(());
    }
    writeln!(out, "\nGenerated files:")?;
    for (i, artifact) in written.iter().enumerate() {
        writeln!(
            out,
            "  {}. {} - {}",
            i + 1,
            artifact.path.display(),
            artifact.kind.description()
        )?;
    }
    Ok(())
}
