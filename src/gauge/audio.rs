//! Audio level meter over a fixed -60..+6 dB domain.

use serde::{Deserialize, Serialize};

use super::GaugeSpec;
use super::segmented::{AUDIO_LEVEL, SegmentedView};

/// Bottom of the meter; anything at or below reads as silence.
pub const FLOOR_DB: f64 = -60.0;

/// Top of the meter.
pub const CEILING_DB: f64 = 6.0;

/// Labels printed under the meter.
pub const SCALE_LABELS: [&str; 6] = ["-60", "-40", "-20", "-6", "0", "+6"];

/// One channel's level with an optional peak-hold value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioLevel {
    pub value_db: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub peak_db: Option<f64>,
}

impl AudioLevel {
    pub fn new(value_db: f64, peak_db: Option<f64>) -> Self {
        Self { value_db, peak_db }
    }
}

/// Format a level for display: `"-∞ dB"` at or below the floor, otherwise
/// one decimal with an explicit sign for non-negative values.
pub fn format_db(value_db: f64) -> String {
    if value_db > FLOOR_DB {
        // -0.0 would otherwise print as "+-0.0"
        let value_db = if value_db == 0.0 { 0.0 } else { value_db };
        let sign = if value_db >= 0.0 { "+" } else { "" };
        format!("{sign}{value_db:.1} dB")
    } else {
        "-∞ dB".to_string()
    }
}

/// Render one channel of the audio meter.
pub fn render(label: &str, level: AudioLevel) -> SegmentedView {
    let spec = GaugeSpec {
        value: level.value_db,
        min: FLOOR_DB,
        max: CEILING_DB,
        title: label.to_string(),
        unit: " dB".to_string(),
        scale_points: None,
    };
    let labels = SCALE_LABELS.iter().map(|s| s.to_string()).collect();
    let mut view = AUDIO_LEVEL.render_with_peak(&spec, level.peak_db, labels);
    view.display = format_db(level.value_db);
    view
}
