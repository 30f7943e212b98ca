//! Needle-style meters: a needle swept across an arc.
//!
//! A design fixes the pivot, needle length and arc; the value only picks the
//! angle inside that arc, so the needle can never leave the dial.

use serde::Serialize;

use super::{GaugeSpec, Point, even_scale};

/// Fixed geometry of one needle meter face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeedleDesign {
    pub name: &'static str,
    pub center: Point,
    pub radius: f64,
    /// Angle at fraction 0, in degrees.
    pub start_deg: f64,
    /// Angle covered from fraction 0 to 1, in degrees.
    pub sweep_deg: f64,
    pub major_ticks: usize,
    /// Minor ticks between two major ticks (0 = none).
    pub minor_per_major: usize,
    pub tick_outer: f64,
    pub major_inner: f64,
    pub minor_inner: f64,
    pub label_radius: f64,
}

/// The 180° forward power gauge.
pub const CIRCULAR: NeedleDesign = NeedleDesign {
    name: "circular",
    center: Point::new(140.0, 140.0),
    radius: 90.0,
    start_deg: -90.0,
    sweep_deg: 180.0,
    major_ticks: 5,
    minor_per_major: 2,
    tick_outer: 112.0,
    major_inner: 97.0,
    minor_inner: 105.0,
    label_radius: 125.0,
};

/// Classic VU meter: 180° arc, 11 majors, minors every 4.5°.
pub const CLASSIC_ANALOG: NeedleDesign = NeedleDesign {
    name: "classic-analog",
    center: Point::new(150.0, 150.0),
    radius: 80.0,
    start_deg: -90.0,
    sweep_deg: 180.0,
    major_ticks: 11,
    minor_per_major: 3,
    tick_outer: 85.0,
    major_inner: 75.0,
    minor_inner: 80.0,
    label_radius: 65.0,
};

/// Edgewise panel meter: a short 90° arc.
pub const EDGEWISE: NeedleDesign = NeedleDesign {
    name: "edgewise",
    center: Point::new(150.0, 120.0),
    radius: 60.0,
    start_deg: -45.0,
    sweep_deg: 90.0,
    major_ticks: 5,
    minor_per_major: 0,
    tick_outer: 65.0,
    major_inner: 55.0,
    minor_inner: 60.0,
    label_radius: 75.0,
};

/// One tick mark, drawn from `inner` to `outer`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tick {
    pub inner: Point,
    pub outer: Point,
    pub major: bool,
}

/// One scale label and where to draw it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaleLabel {
    pub at: Point,
    pub text: String,
}

/// Everything needed to draw a needle meter for one value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NeedleView {
    pub design: &'static str,
    pub title: String,
    pub fraction: f64,
    pub angle_deg: f64,
    pub center: Point,
    pub tip: Point,
    pub ticks: Vec<Tick>,
    pub labels: Vec<ScaleLabel>,
    pub display: String,
}

impl NeedleDesign {
    /// Needle angle for a clamped fraction.
    pub fn angle_for(&self, fraction: f64) -> f64 {
        self.start_deg + fraction.clamp(0.0, 1.0) * self.sweep_deg
    }

    /// Needle tip for a clamped fraction.
    pub fn tip_for(&self, fraction: f64) -> Point {
        self.center.polar(self.radius, self.angle_for(fraction))
    }

    /// Major and minor ticks evenly spread over the arc.
    pub fn ticks(&self) -> Vec<Tick> {
        if self.major_ticks < 2 {
            return Vec::new();
        }
        let steps = (self.major_ticks - 1) * (self.minor_per_major + 1);
        (0..=steps)
            .map(|i| {
                let major = i % (self.minor_per_major + 1) == 0;
                let angle = self.start_deg + self.sweep_deg * i as f64 / steps as f64;
                let inner = if major {
                    self.major_inner
                } else {
                    self.minor_inner
                };
                Tick {
                    inner: self.center.polar(inner, angle),
                    outer: self.center.polar(self.tick_outer, angle),
                    major,
                }
            })
            .collect()
    }

    /// One label per major tick, evenly spaced over the domain.
    pub fn labels(&self, min: f64, max: f64) -> Vec<ScaleLabel> {
        let values = even_scale(min, max, self.major_ticks);
        let count = values.len();
        values
            .into_iter()
            .enumerate()
            .map(|(i, value)| {
                let fraction = if count > 1 {
                    i as f64 / (count - 1) as f64
                } else {
                    0.0
                };
                ScaleLabel {
                    at: self.center.polar(self.label_radius, self.angle_for(fraction)),
                    text: format_scale_value(value),
                }
            })
            .collect()
    }

    /// Render the meter for `spec`.
    pub fn render(&self, spec: &GaugeSpec) -> NeedleView {
        let fraction = spec.fraction();
        NeedleView {
            design: self.name,
            title: spec.title.clone(),
            fraction,
            angle_deg: self.angle_for(fraction),
            center: self.center,
            tip: self.tip_for(fraction),
            ticks: self.ticks(),
            labels: self.labels(spec.min(), spec.max()),
            display: spec.rounded_label(),
        }
    }
}

/// Scale values print without a trailing `.0` when they are whole.
pub(crate) fn format_scale_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value:.1}")
    }
}
