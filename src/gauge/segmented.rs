//! Segmented bar meters.
//!
//! A design fixes the segment count and the zone boundaries (as fractions of
//! the count). The value decides how many segments are lit:
//! `floor(fraction × N)`.

use serde::Serialize;

use super::{GaugeSpec, Zone, normalize};

/// Color of an unlit segment.
pub const UNLIT_COLOR: &str = "#333";

/// Color of the peak-hold segment.
pub const PEAK_COLOR: &str = "#ff6600";

/// Fixed layout of a segmented meter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentDesign {
    pub name: &'static str,
    pub segments: usize,
    /// Segments below `segments × green_below` are green.
    pub green_below: f64,
    /// Segments below `segments × yellow_below` (and not green) are yellow.
    pub yellow_below: f64,
    /// Every `tall_every`-th segment is drawn taller as a scale cue.
    pub tall_every: usize,
}

/// Power meter on the main dashboard: 40 segments, 60% / 80%.
pub const DIGITAL_BAR: SegmentDesign = SegmentDesign {
    name: "digital-bar",
    segments: 40,
    green_below: 0.6,
    yellow_below: 0.8,
    tall_every: 5,
};

/// Audio level meter: 20 segments, 60% / 85%.
pub const AUDIO_LEVEL: SegmentDesign = SegmentDesign {
    name: "audio-level",
    segments: 20,
    green_below: 0.6,
    yellow_below: 0.85,
    tall_every: 4,
};

/// One drawn segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub index: usize,
    pub lit: bool,
    pub peak: bool,
    pub tall: bool,
    pub color: &'static str,
}

/// A rendered segmented meter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentedView {
    pub design: &'static str,
    pub title: String,
    pub fraction: f64,
    pub filled: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak_segment: Option<usize>,
    pub segments: Vec<Segment>,
    pub labels: Vec<String>,
    pub display: String,
}

impl SegmentDesign {
    /// Number of lit segments for a fraction.
    pub fn filled_for(&self, fraction: f64) -> usize {
        let n = self.segments;
        ((fraction.clamp(0.0, 1.0) * n as f64).floor() as usize).min(n)
    }

    /// Zone of a lit segment by its index.
    pub fn zone_of(&self, index: usize) -> Zone {
        let i = index as f64;
        let n = self.segments as f64;
        if i < n * self.green_below {
            Zone::Green
        } else if i < n * self.yellow_below {
            Zone::Yellow
        } else {
            Zone::Red
        }
    }

    /// Index the peak indicator lands on, if it is drawn at all.
    ///
    /// The peak never draws inside the lit region, and a peak at the very
    /// top of the domain has no segment of its own.
    pub fn peak_index(&self, filled: usize, peak_fraction: Option<f64>) -> Option<usize> {
        let index = self.filled_for(peak_fraction?);
        (index >= filled && index < self.segments).then_some(index)
    }

    /// Build every segment for a fill count and optional peak fraction.
    pub fn segments(&self, filled: usize, peak_fraction: Option<f64>) -> Vec<Segment> {
        let peak = self.peak_index(filled, peak_fraction);
        (0..self.segments)
            .map(|index| {
                let lit = index < filled;
                let is_peak = peak == Some(index);
                let color = if is_peak {
                    PEAK_COLOR
                } else if lit {
                    self.zone_of(index).color()
                } else {
                    UNLIT_COLOR
                };
                Segment {
                    index,
                    lit,
                    peak: is_peak,
                    tall: self.tall_every > 0 && index % self.tall_every == self.tall_every - 1,
                    color,
                }
            })
            .collect()
    }

    /// Render a meter for `spec`, with scale labels as given.
    pub fn render(&self, spec: &GaugeSpec, labels: Vec<String>) -> SegmentedView {
        self.render_with_peak(spec, None, labels)
    }

    /// Render a meter for `spec` with an optional peak-hold value in the
    /// same units as the spec's value.
    pub fn render_with_peak(
        &self,
        spec: &GaugeSpec,
        peak: Option<f64>,
        labels: Vec<String>,
    ) -> SegmentedView {
        let fraction = spec.fraction();
        let filled = self.filled_for(fraction);
        let peak_fraction = peak.map(|p| normalize(p, spec.min(), spec.max()));
        SegmentedView {
            design: self.name,
            title: spec.title.clone(),
            fraction,
            filled,
            peak_segment: self.peak_index(filled, peak_fraction),
            segments: self.segments(filled, peak_fraction),
            labels,
            display: spec.rounded_label(),
        }
    }
}
