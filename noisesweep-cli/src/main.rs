//! noisesweep CLI — print the noise report and render comparison charts.
//!
//! Reads the sweep table written by the simulator's `--noise-sweep` mode,
//! prints ranked tables and the degradation summary to stdout, and writes a
//! line chart and a grouped bar chart. Diagnostics and logs go to stderr
//! (`RUST_LOG` controls verbosity, default `warn`).

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use noisesweep_report::{run, ArtifactStatus, ReportConfig};

#[derive(Parser, Debug)]
#[command(
    name = "noisesweep",
    about = "noisesweep — compare strategy payoffs across a noise sweep"
)]
struct Cli {
    /// Sweep CSV to read. Defaults to noise_analysis.csv.
    input: Option<PathBuf>,

    /// TOML report config. Flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output path for the payoff-vs-noise line chart (.png or .svg).
    #[arg(long)]
    line_chart: Option<PathBuf>,

    /// Output path for the grouped bar chart (.png or .svg).
    #[arg(long)]
    bar_chart: Option<PathBuf>,

    /// Noise levels compared in the bar chart, comma separated.
    #[arg(long, value_delimiter = ',')]
    key_epsilons: Option<Vec<f64>>,

    /// Also write the report as JSON.
    #[arg(long)]
    json: Option<PathBuf>,

    /// Print the text report only.
    #[arg(long, default_value_t = false)]
    no_charts: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let config = build_config(&cli)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let outcome = match run(&config, &mut out) {
        Ok(outcome) => outcome,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };
    out.flush()?;

    for artifact in &outcome.artifacts {
        if let ArtifactStatus::Failed(reason) = &artifact.status {
            eprintln!("Warning: {reason}");
        }
    }

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Defaults, then the config file, then flags.
fn build_config(cli: &Cli) -> Result<ReportConfig> {
    let mut config = match &cli.config {
        Some(path) => ReportConfig::from_file(path)
            .with_context(|| format!("cannot use config {}", path.display()))?,
        None => ReportConfig::default(),
    };

    if let Some(input) = &cli.input {
        config.input = input.clone();
    }
    if let Some(path) = &cli.line_chart {
        config.line_chart = path.clone();
    }
    if let Some(path) = &cli.bar_chart {
        config.bar_chart = path.clone();
    }
    if let Some(eps) = &cli.key_epsilons {
        config.key_epsilons = eps.clone();
    }
    if let Some(path) = &cli.json {
        config.json_export = Some(path.clone());
    }
    if cli.no_charts {
        config.charts = false;
    }

    config.validate()?;
    tracing::debug!(?config, "resolved report config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("noisesweep").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn no_arguments_use_defaults() {
        let config = build_config(&parse(&[])).unwrap();
        assert_eq!(config, ReportConfig::default());
    }

    #[test]
    fn flags_override_defaults() {
        let cli = parse(&[
            "sweep.csv",
            "--line-chart",
            "out/line.svg",
            "--key-epsilons",
            "0,0.3",
            "--json",
            "report.json",
            "--no-charts",
        ]);
        let config = build_config(&cli).unwrap();

        assert_eq!(config.input, PathBuf::from("sweep.csv"));
        assert_eq!(config.line_chart, PathBuf::from("out/line.svg"));
        assert_eq!(config.key_epsilons, vec![0.0, 0.3]);
        assert_eq!(config.json_export, Some(PathBuf::from("report.json")));
        assert!(!config.charts);
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noisesweep.toml");
        std::fs::write(&path, "input = \"from_file.csv\"\nbar_chart = \"bars.svg\"\n").unwrap();

        let cli = parse(&["cli.csv", "--config", path.to_str().unwrap()]);
        let config = build_config(&cli).unwrap();

        assert_eq!(config.input, PathBuf::from("cli.csv"));
        assert_eq!(config.bar_chart, PathBuf::from("bars.svg"));
    }

    #[test]
    fn invalid_key_epsilon_is_rejected() {
        let cli = parse(&["--key-epsilons", "0,2"]);
        assert!(build_config(&cli).is_err());
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let cli = parse(&["--config", "no/such/noisesweep.toml"]);
        let err = build_config(&cli).unwrap_err();
        assert!(err.to_string().contains("cannot use config"));
    }
}
