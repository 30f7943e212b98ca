//! Continuous-fill meters: the width (or marker position) follows the
//! fraction without discretization.

use serde::Serialize;

use super::{GaugeSpec, Zone, even_scale, needle::format_scale_value, normalize};

/// Strip chart background bands, as (zone, width %).
pub const STRIP_ZONES: [(Zone, f64); 3] = [
    (Zone::Green, 60.0),
    (Zone::Yellow, 20.0),
    (Zone::Red, 20.0),
];

/// Strip chart grid lines, as % of width.
pub const STRIP_GRID: [f64; 3] = [25.0, 50.0, 75.0];

/// Fill width in percent for a value within `[min, max]`.
pub fn fill_percent(value: f64, min: f64, max: f64) -> f64 {
    normalize(value, min, max) * 100.0
}

/// A colored band behind a strip chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneBand {
    pub zone: Zone,
    pub width_percent: f64,
}

/// Horizontal strip chart with a moving marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StripChartView {
    pub title: String,
    pub marker_percent: f64,
    pub bands: Vec<ZoneBand>,
    pub grid_percent: Vec<f64>,
    pub labels: Vec<String>,
    pub display: String,
}

/// LCD style bar with a zero-padded readout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LcdView {
    pub title: String,
    pub fill_percent: f64,
    pub labels: Vec<String>,
    pub display: String,
}

/// Linear gauge: a thin marker over a labelled scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearView {
    pub title: String,
    pub marker_percent: f64,
    pub scale: Vec<String>,
    pub display: String,
}

/// A plain horizontal bar (temperature, fan speed).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarView {
    pub title: String,
    pub fill_percent: f64,
    pub zone: Zone,
    pub color: &'static str,
    pub labels: Vec<String>,
    pub display: String,
}

/// Render a strip chart with `label_count` evenly spaced labels.
pub fn strip_chart(spec: &GaugeSpec, label_count: usize) -> StripChartView {
    StripChartView {
        title: spec.title.clone(),
        marker_percent: spec.fraction() * 100.0,
        bands: STRIP_ZONES
            .iter()
            .map(|&(zone, width_percent)| ZoneBand {
                zone,
                width_percent,
            })
            .collect(),
        grid_percent: STRIP_GRID.to_vec(),
        labels: scale_labels(spec.min(), spec.max(), label_count),
        display: spec.rounded_label(),
    }
}

/// Render an LCD meter; the readout is the rounded value padded to 4 digits.
pub fn lcd(spec: &GaugeSpec, label_count: usize) -> LcdView {
    let rounded = super::round_half_up(spec.value);
    let digits = if rounded < 0 {
        format!("-{:0>4}", rounded.unsigned_abs())
    } else {
        format!("{rounded:0>4}")
    };
    LcdView {
        title: spec.title.clone(),
        fill_percent: spec.fraction() * 100.0,
        labels: scale_labels(spec.min(), spec.max(), label_count),
        display: format!("{digits}{}", spec.unit),
    }
}

/// Render a linear gauge. Without explicit scale points, six evenly spaced
/// points are used. The readout shows `decimals` decimal places.
pub fn linear(spec: &GaugeSpec, decimals: usize) -> LinearView {
    let points = spec
        .scale_points
        .clone()
        .unwrap_or_else(|| even_scale(spec.min(), spec.max(), 6));
    LinearView {
        title: spec.title.clone(),
        marker_percent: spec.fraction() * 100.0,
        scale: points
            .iter()
            .map(|p| super::round_half_up(*p).to_string())
            .collect(),
        display: format!("{:.*}", decimals, spec.value),
    }
}

/// Render a plain bar whose color follows `zone`.
pub fn bar(spec: &GaugeSpec, zone: Zone, display: String, labels: Vec<String>) -> BarView {
    BarView {
        title: spec.title.clone(),
        fill_percent: spec.fraction() * 100.0,
        zone,
        color: zone.color(),
        labels,
        display,
    }
}

/// `count` evenly spaced labels as text.
pub fn scale_labels(min: f64, max: f64, count: usize) -> Vec<String> {
    even_scale(min, max, count)
        .into_iter()
        .map(format_scale_value)
        .collect()
}
