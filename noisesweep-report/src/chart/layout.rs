//! Chart geometry, computed without touching a drawing backend.

use noisesweep_core::{series_for, Dataset, NoiseLevel};

/// Fraction of each bar group occupied by bars.
pub const GROUP_FILL: f64 = 0.8;

/// One strategy's polyline and optional CI band.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSeriesLayout<'a> {
    pub strategy: &'a str,
    /// Position among the dataset's strategies, used for fallback colors.
    pub index: usize,
    /// `(epsilon, mean)`, ascending epsilon.
    pub points: Vec<(f64, f64)>,
    /// Closed polygon: upper bounds ascending, then lower bounds descending.
    /// Present only when every point carries both CI bounds.
    pub band: Option<Vec<(f64, f64)>>,
}

/// Polylines for every strategy, in first-appearance order.
pub fn line_layout(dataset: &Dataset) -> Vec<LineSeriesLayout<'_>> {
    dataset
        .strategies()
        .into_iter()
        .enumerate()
        .map(|(index, strategy)| {
            let series = series_for(dataset, strategy);
            let points = series.points.iter().map(|p| (p.epsilon, p.mean)).collect();
            let band = if series.has_full_ci() {
                let bounds: Vec<(f64, f64, f64)> = series
                    .points
                    .iter()
                    .filter_map(|p| p.ci().map(|(lo, hi)| (p.epsilon, lo, hi)))
                    .collect();
                let mut polygon: Vec<(f64, f64)> =
                    bounds.iter().map(|&(x, _, hi)| (x, hi)).collect();
                polygon.extend(bounds.iter().rev().map(|&(x, lo, _)| (x, lo)));
                Some(polygon)
            } else {
                None
            };
            LineSeriesLayout {
                strategy,
                index,
                points,
                band,
            }
        })
        .collect()
}

/// One bar: a strategy's mean at one key epsilon.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSlot {
    pub strategy: String,
    /// Position among the charted strategies.
    pub strategy_index: usize,
    /// Group index, i.e. position of the epsilon in the key list.
    pub group: usize,
    pub epsilon: f64,
    pub x0: f64,
    pub x1: f64,
    /// Mean payoff, or 0 when the combination was not observed.
    pub height: f64,
    pub observed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarLayout {
    pub key_epsilons: Vec<f64>,
    /// Strategies with at least one sample at a key epsilon.
    pub strategies: Vec<String>,
    pub bar_width: f64,
    /// Strategy-major: all groups of strategy 0, then strategy 1, ...
    pub slots: Vec<BarSlot>,
}

impl BarLayout {
    pub fn slots_for(&self, strategy_index: usize) -> impl Iterator<Item = &BarSlot> {
        self.slots
            .iter()
            .filter(move |s| s.strategy_index == strategy_index)
    }
}

/// Grouped bar geometry. Group `g` is centred on `x = g`.
///
/// Missing (strategy, epsilon) combinations become zero-height slots so every
/// group keeps the same width.
pub fn bar_layout(dataset: &Dataset, key_epsilons: &[f64]) -> BarLayout {
    let keys: Vec<NoiseLevel> = key_epsilons.iter().copied().map(NoiseLevel::new).collect();
    let strategies: Vec<String> = dataset
        .strategies()
        .into_iter()
        .filter(|strategy| {
            dataset
                .samples()
                .iter()
                .any(|s| s.strategy == *strategy && keys.contains(&s.noise_level()))
        })
        .map(str::to_string)
        .collect();

    let n = strategies.len();
    let bar_width = if n == 0 { GROUP_FILL } else { GROUP_FILL / n as f64 };

    let mut slots = Vec::with_capacity(n * key_epsilons.len());
    for (i, strategy) in strategies.iter().enumerate() {
        let offset = (i as f64 - n as f64 / 2.0) * bar_width + bar_width / 2.0;
        for (group, &epsilon) in key_epsilons.iter().enumerate() {
            let sample = dataset.lookup(strategy, epsilon);
            let center = group as f64 + offset;
            slots.push(BarSlot {
                strategy: strategy.clone(),
                strategy_index: i,
                group,
                epsilon,
                x0: center - bar_width / 2.0,
                x1: center + bar_width / 2.0,
                height: sample.map(|s| s.mean).unwrap_or(0.0),
                observed: sample.is_some(),
            });
        }
    }

    BarLayout {
        key_epsilons: key_epsilons.to_vec(),
        strategies,
        bar_width,
        slots,
    }
}

/// `[min, max]` of `values`, padded by `pad` of the span on each side.
///
/// A degenerate span is widened by `fallback` on each side; no values at all
/// yields `[0, 1]`.
pub fn padded_range(values: impl IntoIterator<Item = f64>, pad: f64, fallback: f64) -> (f64, f64) {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        return (0.0, 1.0);
    }
    let span = hi - lo;
    if span == 0.0 {
        return (lo - fallback, hi + fallback);
    }
    (lo - span * pad, hi + span * pad)
}

/// X and Y ranges for the line chart. Bands widen the Y range.
pub fn line_ranges(layout: &[LineSeriesLayout<'_>]) -> ((f64, f64), (f64, f64)) {
    let x = padded_range(
        layout.iter().flat_map(|s| s.points.iter().map(|p| p.0)),
        0.02,
        0.05,
    );
    let ys = layout.iter().flat_map(|s| {
        s.points
            .iter()
            .chain(s.band.iter().flatten())
            .map(|p| p.1)
    });
    let y = padded_range(ys, 0.05, 1.0);
    (x, y)
}

/// Y range for the bar chart; always includes the zero baseline.
pub fn bar_y_range(layout: &BarLayout) -> (f64, f64) {
    let lo = layout.slots.iter().map(|s| s.height).fold(0.0, f64::min);
    let hi = layout.slots.iter().map(|s| s.height).fold(0.0, f64::max);
    if lo == hi {
        return (0.0, 1.0);
    }
    let span = hi - lo;
    (
        if lo < 0.0 { lo - span * 0.1 } else { 0.0 },
        if hi > 0.0 { hi + span * 0.1 } else { 0.0 },
    )
}
