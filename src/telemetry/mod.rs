//! Transmitter telemetry records and the in-memory store that serves them.

pub mod store;

use serde::{Deserialize, Serialize};

pub use store::TelemetryStore;

/// One snapshot of transmitter telemetry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryReading {
    pub id: u64,
    /// Forward RF power (W).
    pub forward_power: f64,
    /// Reflected RF power (W).
    pub reflected_power: f64,
    /// Carrier frequency (MHz).
    pub frequency: f64,
    /// RF efficiency (%).
    pub rf_efficiency: f64,
    /// Power setpoint (W).
    pub target_power: f64,
    pub is_on_air: bool,
    /// Creation time, milliseconds since the Unix epoch.
    pub timestamp: i64,
}

/// A reading as submitted by a client: everything but the id.
///
/// `isOnAir` defaults to `false`; a missing `timestamp` is assigned by the
/// store at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReading {
    pub forward_power: f64,
    pub reflected_power: f64,
    pub frequency: f64,
    pub rf_efficiency: f64,
    pub target_power: f64,
    #[serde(default)]
    pub is_on_air: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl NewReading {
    /// The fixed reading every fresh store starts with.
    pub fn seed() -> Self {
        Self {
            forward_power: 2700.0,
            reflected_power: 12.0,
            frequency: 93.4,
            rf_efficiency: 87.0,
            target_power: 2700.0,
            is_on_air: true,
            timestamp: None,
        }
    }

    /// Reject values JSON can carry but a transmitter cannot report.
    pub fn validate(&self) -> Result<(), String> {
        let fields = [
            ("forwardPower", self.forward_power),
            ("reflectedPower", self.reflected_power),
            ("frequency", self.frequency),
            ("rfEfficiency", self.rf_efficiency),
            ("targetPower", self.target_power),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(format!("{name} must be a finite number"));
            }
        }
        Ok(())
    }
}

/// A partial update: only the fields present are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReadingPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forward_power: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reflected_power: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rf_efficiency: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_power: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_on_air: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl ReadingPatch {
    /// Apply every present field onto `reading`.
    pub fn apply(&self, reading: &mut TelemetryReading) {
        if let Some(v) = self.forward_power {
            reading.forward_power = v;
        }
        if let Some(v) = self.reflected_power {
            reading.reflected_power = v;
        }
        if let Some(v) = self.frequency {
            reading.frequency = v;
        }
        if let Some(v) = self.rf_efficiency {
            reading.rf_efficiency = v;
        }
        if let Some(v) = self.target_power {
            reading.target_power = v;
        }
        if let Some(v) = self.is_on_air {
            reading.is_on_air = v;
        }
        if let Some(v) = self.timestamp {
            reading.timestamp = v;
        }
    }
}
