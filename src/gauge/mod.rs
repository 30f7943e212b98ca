//! Gauge geometry for the transmitter dashboard.
//!
//! Every renderer in this module is a pure function of its inputs: a
//! [`GaugeSpec`] (value, domain, labels) goes in, a serializable view comes
//! out. The browser page only draws what these views describe.
//!
//! - [`needle`]: circular, classic analog and edgewise meters
//! - [`segmented`]: digital bar and audio level meters
//! - [`fill`]: strip chart, LCD, linear gauge and simple bars
//! - [`audio`]: the dB level meter and its label formatting

pub mod audio;
pub mod fill;
pub mod needle;
pub mod segmented;

use serde::Serialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Rejected gauge inputs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GaugeError {
    /// The domain is empty, inverted or not finite.
    #[error("invalid gauge range: min ({min}) must be less than max ({max})")]
    InvalidRange { min: f64, max: f64 },
}

// ---------------------------------------------------------------------------
// Range normalizer
// ---------------------------------------------------------------------------

/// Map `value` to its position within `[min, max]`, clamped to `[0, 1]`.
///
/// A degenerate or non-finite domain and a NaN value both map to `0.0`, so
/// callers never see a division by zero leak into geometry.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if !span.is_finite() || span <= 0.0 || value.is_nan() {
        return 0.0;
    }
    ((value - min) / span).clamp(0.0, 1.0)
}

// ---------------------------------------------------------------------------
// Gauge input
// ---------------------------------------------------------------------------

/// One gauge's input: a value, its domain and display labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GaugeSpec {
    pub value: f64,
    min: f64,
    max: f64,
    pub title: String,
    pub unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_points: Option<Vec<f64>>,
}

impl GaugeSpec {
    /// Build a spec, rejecting domains where `min >= max`.
    pub fn new(
        value: f64,
        min: f64,
        max: f64,
        title: impl Into<String>,
        unit: impl Into<String>,
    ) -> Result<Self, GaugeError> {
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(GaugeError::InvalidRange { min, max });
        }
        Ok(Self {
            value,
            min,
            max,
            title: title.into(),
            unit: unit.into(),
            scale_points: None,
        })
    }

    /// Attach explicit scale points (used by the linear gauge).
    pub fn with_scale_points(mut self, points: Vec<f64>) -> Self {
        self.scale_points = Some(points);
        self
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// The value's clamped position within the domain.
    pub fn fraction(&self) -> f64 {
        normalize(self.value, self.min, self.max)
    }

    /// The raw value rounded to an integer and suffixed with the unit
    /// (`"2700W"`). Display text is not clamped; only geometry is.
    pub fn rounded_label(&self) -> String {
        format!("{}{}", round_half_up(self.value), self.unit)
    }
}

/// Round half away from negative infinity, matching how the dashboard has
/// always displayed values (`-2.5` → `-2`, `2.5` → `3`).
pub(crate) fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

// ---------------------------------------------------------------------------
// Shared view primitives
// ---------------------------------------------------------------------------

/// A point in a design's SVG coordinate frame (x right, y down).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The point at `radius` from `self` in direction `angle_deg`.
    pub fn polar(self, radius: f64, angle_deg: f64) -> Self {
        let radians = angle_deg.to_radians();
        Self {
            x: self.x + radians.cos() * radius,
            y: self.y + radians.sin() * radius,
        }
    }
}

/// Traffic-light zone shared by bars, temperatures and signal-quality labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    Green,
    Yellow,
    Red,
}

impl Zone {
    /// CSS color used by the dashboard for this zone.
    pub fn color(self) -> &'static str {
        match self {
            Self::Green => "#00ff00",
            Self::Yellow => "#ffff00",
            Self::Red => "#ff0000",
        }
    }

    /// Zone for a value where lower is healthier: below `warn` is green,
    /// below `alarm` is yellow, anything else red.
    pub fn ascending(value: f64, warn: f64, alarm: f64) -> Self {
        if value < warn {
            Self::Green
        } else if value < alarm {
            Self::Yellow
        } else {
            Self::Red
        }
    }

    /// Zone for a value where higher is healthier: above `good` is green,
    /// above `fair` is yellow, anything else red.
    pub fn descending(value: f64, good: f64, fair: f64) -> Self {
        if value > good {
            Self::Green
        } else if value > fair {
            Self::Yellow
        } else {
            Self::Red
        }
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Green => write!(f, "green"),
            Self::Yellow => write!(f, "yellow"),
            Self::Red => write!(f, "red"),
        }
    }
}

/// Temperature zone relative to a channel's safe maximum (<70% green,
/// <85% yellow).
pub fn temperature_zone(temp: f64, max_safe: f64) -> Zone {
    Zone::ascending(temp, max_safe * 0.7, max_safe * 0.85)
}

/// Modulation depth: under-modulated below 50%, over-modulated from 85%.
pub fn modulation_zone(depth: f64) -> Zone {
    if depth < 50.0 {
        Zone::Yellow
    } else if depth < 85.0 {
        Zone::Green
    } else {
        Zone::Red
    }
}

/// Signal-to-noise ratio in dB.
pub fn snr_zone(snr_db: f64) -> Zone {
    Zone::descending(snr_db, 35.0, 25.0)
}

/// Total harmonic distortion in percent.
pub fn thd_zone(thd_pct: f64) -> Zone {
    Zone::ascending(thd_pct, 0.15, 0.3)
}

/// `count` evenly spaced labels from `min` to `max` inclusive.
pub fn even_scale(min: f64, max: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![min],
        _ => {
            let step = (max - min) / (count - 1) as f64;
            (0..count).map(|i| min + i as f64 * step).collect()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
