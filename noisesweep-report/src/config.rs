//! Report configuration, loadable from TOML.
//!
//! Every field has a default, so an empty file (or no file) reproduces the
//! conventional run: read `noise_analysis.csv`, write `noise_analysis.png` and
//! `strategy_comparison.png`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::chart::{ChartStyle, DEFAULT_KEY_EPSILONS};

pub const DEFAULT_INPUT: &str = "noise_analysis.csv";
pub const DEFAULT_LINE_CHART: &str = "noise_analysis.png";
pub const DEFAULT_BAR_CHART: &str = "strategy_comparison.png";

/// Errors from loading or validating a [`ReportConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Inputs, outputs and chart style for one report run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Sweep table to read.
    pub input: PathBuf,
    pub line_chart: PathBuf,
    pub bar_chart: PathBuf,
    /// Noise levels compared in the bar chart.
    pub key_epsilons: Vec<f64>,
    /// Also write the report as JSON here.
    pub json_export: Option<PathBuf>,
    /// Render the two charts (the text report is always printed).
    pub charts: bool,
    pub style: ChartStyle,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            line_chart: PathBuf::from(DEFAULT_LINE_CHART),
            bar_chart: PathBuf::from(DEFAULT_BAR_CHART),
            key_epsilons: DEFAULT_KEY_EPSILONS.to_vec(),
            json_export: None,
            charts: true,
            style: ChartStyle::default(),
        }
    }
}

impl ReportConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(bad) = self
            .key_epsilons
            .iter()
            .find(|e| !e.is_finite() || !(0.0..=1.0).contains(*e))
        {
            return Err(ConfigError::Invalid(format!(
                "key epsilon {bad} is outside [0, 1]"
            )));
        }
        if self.charts && self.key_epsilons.is_empty() {
            return Err(ConfigError::Invalid(
                "key_epsilons must not be empty when charts are enabled".into(),
            ));
        }
        if self.charts && self.line_chart == self.bar_chart {
            return Err(ConfigError::Invalid(format!(
                "line and bar charts both target {}",
                self.line_chart.display()
            )));
        }
        self.style.validate().map_err(ConfigError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{default_palette, Marker};
    use plotters::style::RGBColor;

    #[test]
    fn empty_toml_is_default() {
        let config = ReportConfig::from_toml("").unwrap();
        assert_eq!(config, ReportConfig::default());
        assert_eq!(config.key_epsilons, vec![0.0, 0.05, 0.1, 0.2]);
        assert_eq!(config.input, PathBuf::from("noise_analysis.csv"));
    }

    #[test]
    fn parses_overrides_and_palette() {
        let config = ReportConfig::from_toml(
            r##"
input = "sweeps/run1.csv"
line_chart = "out/line.svg"
key_epsilons = [0.0, 0.3]
json_export = "out/report.json"

[style]
width = 800
height = 600

[[style.palette]]
strategy = "Joss"
color = "#112233"
marker = "star"
"##,
        )
        .unwrap();

        assert_eq!(config.input, PathBuf::from("sweeps/run1.csv"));
        assert_eq!(config.bar_chart, PathBuf::from(DEFAULT_BAR_CHART));
        assert_eq!(config.key_epsilons, vec![0.0, 0.3]);
        assert_eq!(config.json_export, Some(PathBuf::from("out/report.json")));
        assert_eq!(config.style.width, 800);
        assert_eq!(config.style.band_opacity, 0.15);
        let joss = config.style.series_style("Joss", 0);
        assert_eq!(joss.color, RGBColor(0x11, 0x22, 0x33));
        assert_eq!(joss.marker, Marker::Star);
    }

    #[test]
    fn custom_palette_entry_keeps_builtin_strategies() {
        let config = ReportConfig::from_toml(
            "[[style.palette]]\nstrategy = \"Joss\"\ncolor = \"#112233\"\n",
        )
        .unwrap();

        let tft = config.style.series_style("TitForTat", 0);
        assert_eq!(tft.color, RGBColor(0x2E, 0x86, 0xAB));
        assert_eq!(tft.marker, Marker::Circle);
        assert_eq!(config.style.series_style("PROBER", 0).marker, Marker::Star);
        assert_eq!(config.style.palette.len(), default_palette().len() + 1);
    }

    #[test]
    fn custom_palette_entry_overrides_builtin_color() {
        let config = ReportConfig::from_toml(
            "[[style.palette]]\nstrategy = \"TitForTat\"\ncolor = \"#000000\"\nmarker = \"square\"\n",
        )
        .unwrap();

        let tft = config.style.series_style("TitForTat", 0);
        assert_eq!(tft.color, RGBColor(0, 0, 0));
        assert_eq!(tft.marker, Marker::Square);
        assert_eq!(config.style.palette.len(), default_palette().len());
    }

    #[test]
    fn rejects_out_of_range_key_epsilon() {
        let err = ReportConfig::from_toml("key_epsilons = [0.0, 1.5]").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_same_chart_path() {
        let err = ReportConfig::from_toml(
            "line_chart = \"chart.png\"\nbar_chart = \"chart.png\"",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_unknown_field() {
        assert!(matches!(
            ReportConfig::from_toml("colour = 1"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = ReportConfig::from_file(Path::new("no/such/noisesweep.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
