//! Chart rendering: payoff-vs-noise line chart and grouped bar comparison.
//!
//! Output format follows the path extension: `.svg` produces an SVG document,
//! anything else a bitmap (PNG by default). The containing directory must
//! already exist.

mod layout;
mod style;

pub use layout::{
    bar_layout, bar_y_range, line_layout, line_ranges, padded_range, BarLayout, BarSlot,
    LineSeriesLayout, GROUP_FILL,
};
pub use style::{
    default_palette, merge_palette, parse_hex_color, ChartStyle, Marker, PaletteEntry, SeriesStyle,
};

use plotters::coord::Shift;
use plotters::prelude::*;
use std::error::Error;
use std::path::{Path, PathBuf};
use thiserror::Error;

use noisesweep_core::Dataset;

/// Noise levels compared in the bar chart unless the caller picks others.
pub const DEFAULT_KEY_EPSILONS: [f64; 4] = [0.0, 0.05, 0.1, 0.2];

const LINE_CAPTION: &str = "Strategy Performance vs Noise Level (Iterated Prisoner's Dilemma)";
const BAR_CAPTION: &str = "Strategy Performance Comparison at Different Noise Levels";
const X_DESC: &str = "Noise Level (ε)";
const Y_DESC: &str = "Average Payoff";

/// Errors from chart rendering.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("cannot write {}: containing directory does not exist", path.display())]
    Write { path: PathBuf },

    #[error("failed to render {}: {message}", path.display())]
    Render { path: PathBuf, message: String },

    #[error("bar chart needs at least one key epsilon")]
    NoKeyEpsilons,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Svg,
    Bitmap,
}

impl OutputFormat {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => OutputFormat::Svg,
            _ => OutputFormat::Bitmap,
        }
    }
}

/// Renders both comparison charts with an explicit style.
#[derive(Debug, Clone, Default)]
pub struct ChartRenderer {
    style: ChartStyle,
}

impl ChartRenderer {
    pub fn new(style: ChartStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    /// One polyline per strategy, mean payoff against epsilon, with CI bands
    /// for strategies whose every point has both bounds.
    pub fn render_line_chart(&self, dataset: &Dataset, output_path: &Path) -> Result<(), ChartError> {
        ensure_parent_exists(output_path)?;
        let layout = line_layout(dataset);
        tracing::debug!(
            path = %output_path.display(),
            series = layout.len(),
            bands = layout.iter().filter(|s| s.band.is_some()).count(),
            "rendering line chart"
        );

        let size = (self.style.width, self.style.height);
        let result = match OutputFormat::from_path(output_path) {
            OutputFormat::Svg => draw_line_chart(
                SVGBackend::new(output_path, size).into_drawing_area(),
                &layout,
                &self.style,
            ),
            OutputFormat::Bitmap => draw_line_chart(
                BitMapBackend::new(output_path, size).into_drawing_area(),
                &layout,
                &self.style,
            ),
        };
        result.map_err(|e| render_error(output_path, e))?;
        tracing::info!(path = %output_path.display(), "line chart written");
        Ok(())
    }

    /// Grouped bars, one group per key epsilon and one bar per strategy.
    /// Unobserved combinations are drawn as zero-height bars.
    pub fn render_bar_chart(
        &self,
        dataset: &Dataset,
        key_epsilons: &[f64],
        output_path: &Path,
    ) -> Result<(), ChartError> {
        if key_epsilons.is_empty() {
            return Err(ChartError::NoKeyEpsilons);
        }
        ensure_parent_exists(output_path)?;
        let layout = bar_layout(dataset, key_epsilons);
        tracing::debug!(
            path = %output_path.display(),
            strategies = layout.strategies.len(),
            groups = layout.key_epsilons.len(),
            missing = layout.slots.iter().filter(|s| !s.observed).count(),
            "rendering bar chart"
        );

        let size = (self.style.width, self.style.height);
        let result = match OutputFormat::from_path(output_path) {
            OutputFormat::Svg => draw_bar_chart(
                SVGBackend::new(output_path, size).into_drawing_area(),
                dataset,
                &layout,
                &self.style,
            ),
            OutputFormat::Bitmap => draw_bar_chart(
                BitMapBackend::new(output_path, size).into_drawing_area(),
                dataset,
                &layout,
                &self.style,
            ),
        };
        result.map_err(|e| render_error(output_path, e))?;
        tracing::info!(path = %output_path.display(), "bar chart written");
        Ok(())
    }
}

fn ensure_parent_exists(path: &Path) -> Result<(), ChartError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.is_dir() => Err(ChartError::Write {
            path: path.to_path_buf(),
        }),
        _ => Ok(()),
    }
}

fn render_error(path: &Path, err: Box<dyn Error>) -> ChartError {
    ChartError::Render {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

fn draw_line_chart<DB>(
    root: DrawingArea<DB, Shift>,
    layout: &[LineSeriesLayout<'_>],
    style: &ChartStyle,
) -> Result<(), Box<dyn Error>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let ((x0, x1), (y0, y1)) = line_ranges(layout);

    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            LINE_CAPTION,
            (style.font_family.as_str(), style.caption_font_size as i32),
        )
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    chart
        .configure_mesh()
        .x_desc(X_DESC)
        .y_desc(Y_DESC)
        .axis_desc_style((style.font_family.as_str(), style.label_font_size as i32))
        .light_line_style(BLACK.mix(0.05))
        .bold_line_style(BLACK.mix(0.15))
        .x_label_formatter(&|x| format!("{x:.2}"))
        .draw()?;

    // Bands first so every polyline stays on top.
    for series in layout {
        let Some(band) = &series.band else { continue };
        let color = style.series_style(series.strategy, series.index).color;
        chart.draw_series(std::iter::once(Polygon::new(
            band.clone(),
            color.mix(style.band_opacity).filled(),
        )))?;
    }

    let marker_size = style.marker_size as i32;
    for series in layout {
        let SeriesStyle { color, marker } = style.series_style(series.strategy, series.index);
        let line_style = color.mix(style.line_opacity).stroke_width(style.line_width);

        chart
            .draw_series(LineSeries::new(series.points.iter().copied(), line_style))?
            .label(series.strategy)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 24, y)], line_style));

        let points = series.points.iter().copied();
        let fill = color.filled();
        if marker == Marker::Circle {
            chart.draw_series(
                points.map(|p| EmptyElement::at(p) + Circle::new((0, 0), marker_size, fill)),
            )?;
        } else {
            let outline = marker_outline(marker, marker_size);
            chart.draw_series(
                points.map(|p| EmptyElement::at(p) + Polygon::new(outline.clone(), fill)),
            )?;
        }
    }

    chart
        .configure_series_labels()
        .label_font((style.font_family.as_str(), style.label_font_size as i32))
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK.mix(0.4))
        .draw()?;

    root.present()?;
    Ok(())
}

fn draw_bar_chart<DB>(
    root: DrawingArea<DB, Shift>,
    dataset: &Dataset,
    layout: &BarLayout,
    style: &ChartStyle,
) -> Result<(), Box<dyn Error>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let groups = layout.key_epsilons.len();
    let (y0, y1) = bar_y_range(layout);
    let key_epsilons = layout.key_epsilons.clone();

    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            BAR_CAPTION,
            (style.font_family.as_str(), style.caption_font_size as i32),
        )
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(
            (-0.5..(groups as f64 - 0.5)).with_key_points(group_centres(groups)),
            y0..y1,
        )?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(X_DESC)
        .y_desc(Y_DESC)
        .axis_desc_style((style.font_family.as_str(), style.label_font_size as i32))
        .x_labels(groups)
        .x_label_formatter(&|x| group_label(&key_epsilons, *x))
        .light_line_style(BLACK.mix(0.05))
        .bold_line_style(BLACK.mix(0.15))
        .draw()?;

    // Fallback colors follow the dataset's strategy order, like the line chart.
    let order = dataset.strategies();
    for (i, strategy) in layout.strategies.iter().enumerate() {
        let index = order.iter().position(|s| s == strategy).unwrap_or(i);
        let color = style.series_style(strategy, index).color;
        let fill = color.mix(style.bar_opacity).filled();

        chart
            .draw_series(
                layout
                    .slots_for(i)
                    .map(|slot| Rectangle::new([(slot.x0, 0.0), (slot.x1, slot.height)], fill)),
            )?
            .label(strategy.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 16, y + 6)], fill));
    }

    chart
        .configure_series_labels()
        .label_font((style.font_family.as_str(), style.label_font_size as i32))
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK.mix(0.4))
        .draw()?;

    root.present()?;
    Ok(())
}

/// Tick label for the group centred nearest `x`; blank between groups.
fn group_label(key_epsilons: &[f64], x: f64) -> String {
    let nearest = x.round();
    if (x - nearest).abs() > 1e-6 || nearest < 0.0 {
        return String::new();
    }
    key_epsilons
        .get(nearest as usize)
        .map(|eps| format!("{eps:.2}"))
        .unwrap_or_default()
}

/// Tick positions for the bar chart: one per group, at its centre.
fn group_centres(groups: usize) -> Vec<f64> {
    (0..groups).map(|g| g as f64).collect()
}

/// Pixel outline of a non-circle marker, centred on the data point.
fn marker_outline(marker: Marker, size: i32) -> Vec<(i32, i32)> {
    match marker {
        Marker::Circle => star_points(16, size, None, false),
        Marker::Square => vec![(-size, -size), (size, -size), (size, size), (-size, size)],
        Marker::Triangle => star_points(3, size + 1, None, false),
        Marker::TriangleDown => star_points(3, size + 1, None, true),
        Marker::Diamond => star_points(4, size + 1, None, false),
        Marker::Pentagon => star_points(5, size, None, false),
        Marker::Star => star_points(5, size + 2, Some(0.45), false),
    }
}

/// Pixel offsets of a regular polygon (or star, with an inner radius ratio)
/// with its first vertex pointing up, or down when `flipped`.
fn star_points(vertices: usize, radius: i32, inner: Option<f64>, flipped: bool) -> Vec<(i32, i32)> {
    let r = radius as f64;
    let start = if flipped {
        std::f64::consts::FRAC_PI_2
    } else {
        -std::f64::consts::FRAC_PI_2
    };
    let steps = if inner.is_some() { vertices * 2 } else { vertices };
    (0..steps)
        .map(|k| {
            let angle = start + std::f64::consts::TAU * k as f64 / steps as f64;
            let len = match inner {
                Some(ratio) if k % 2 == 1 => r * ratio,
                _ => r,
            };
            (
                (len * angle.cos()).round() as i32,
                (len * angle.sin()).round() as i32,
            )
        })
        .collect()
}
