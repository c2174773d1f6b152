//! Chart styling: dimensions, opacities and the strategy palette.
//!
//! The palette is a fixed lookup table keyed by strategy name. Names it does
//! not know fall back to a cycling default color and the circle marker, so a
//! new strategy never breaks rendering.
//!
//! A [`ChartStyle`] is plain configuration handed to the renderer; nothing here
//! is process-wide.

use plotters::style::{Color, Palette, Palette99, RGBColor};
use serde::{Deserialize, Deserializer, Serialize};

/// Point marker shape for line series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    #[default]
    Circle,
    Square,
    Triangle,
    TriangleDown,
    Diamond,
    Pentagon,
    Star,
}

/// Palette row: strategy name → color (`#RRGGBB`) and marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub strategy: String,
    pub color: String,
    #[serde(default)]
    pub marker: Marker,
}

impl PaletteEntry {
    fn new(strategy: &str, color: &str, marker: Marker) -> Self {
        Self {
            strategy: strategy.to_string(),
            color: color.to_string(),
            marker,
        }
    }
}

/// Resolved color and marker for one series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStyle {
    pub color: RGBColor,
    pub marker: Marker,
}

/// Chart appearance, shared by the line and bar charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub line_width: u32,
    pub marker_size: u32,
    pub line_opacity: f64,
    /// Alpha of the CI band fill.
    pub band_opacity: f64,
    pub bar_opacity: f64,
    pub font_family: String,
    pub caption_font_size: u32,
    pub label_font_size: u32,
    /// Entries read from config are layered over [`default_palette`].
    #[serde(deserialize_with = "deserialize_palette")]
    pub palette: Vec<PaletteEntry>,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 1400,
            height: 800,
            line_width: 3,
            marker_size: 6,
            line_opacity: 0.8,
            band_opacity: 0.15,
            bar_opacity: 0.8,
            font_family: "sans-serif".to_string(),
            caption_font_size: 28,
            label_font_size: 18,
            palette: default_palette(),
        }
    }
}

/// Colors and markers for the strategies shipped with the sweep.
pub fn default_palette() -> Vec<PaletteEntry> {
    vec![
        PaletteEntry::new("TitForTat", "#2E86AB", Marker::Circle),
        PaletteEntry::new("GrimTrigger", "#A23B72", Marker::Square),
        PaletteEntry::new("PAVLOV", "#F18F01", Marker::Triangle),
        PaletteEntry::new("ContriteTitForTat", "#C73E1D", Marker::Diamond),
        PaletteEntry::new("AllCooperate", "#6A994E", Marker::TriangleDown),
        PaletteEntry::new("AllDefect", "#BC4749", Marker::Pentagon),
        PaletteEntry::new("PROBER", "#8338EC", Marker::Star),
    ]
}

/// Layer `overrides` onto `base`: an entry replaces the base entry for the
/// same strategy, otherwise it is appended.
pub fn merge_palette(mut base: Vec<PaletteEntry>, overrides: Vec<PaletteEntry>) -> Vec<PaletteEntry> {
    for entry in overrides {
        match base.iter_mut().find(|e| e.strategy == entry.strategy) {
            Some(slot) => *slot = entry,
            None => base.push(entry),
        }
    }
    base
}

fn deserialize_palette<'de, D>(deserializer: D) -> Result<Vec<PaletteEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = Vec::<PaletteEntry>::deserialize(deserializer)?;
    Ok(merge_palette(default_palette(), overrides))
}

/// Parse `#RRGGBB` (leading `#` optional).
pub fn parse_hex_color(text: &str) -> Option<RGBColor> {
    let hex = text.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}

impl ChartStyle {
    /// Style for `strategy`; `index` picks the fallback color for unknown names.
    pub fn series_style(&self, strategy: &str, index: usize) -> SeriesStyle {
        let entry = self.palette.iter().find(|e| e.strategy == strategy);
        match entry.and_then(|e| parse_hex_color(&e.color).map(|c| (c, e.marker))) {
            Some((color, marker)) => SeriesStyle { color, marker },
            None => SeriesStyle {
                color: fallback_color(index),
                marker: entry.map(|e| e.marker).unwrap_or_default(),
            },
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err(format!(
                "chart size must be non-zero, got {}x{}",
                self.width, self.height
            ));
        }
        for (name, value) in [
            ("line_opacity", self.line_opacity),
            ("band_opacity", self.band_opacity),
            ("bar_opacity", self.bar_opacity),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{name} must be in [0, 1], got {value}"));
            }
        }
        if let Some(bad) = self
            .palette
            .iter()
            .find(|e| parse_hex_color(&e.color).is_none())
        {
            return Err(format!(
                "palette color '{}' for {} is not #RRGGBB",
                bad.color, bad.strategy
            ));
        }
        Ok(())
    }
}

fn fallback_color(index: usize) -> RGBColor {
    let rgba = Palette99::pick(index).to_rgba();
    RGBColor(rgba.0, rgba.1, rgba.2)
}
