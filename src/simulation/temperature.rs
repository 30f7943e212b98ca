//! Device temperatures and cooling fan.

use std::time::Duration;

use rand::Rng;
use rand::rngs::StdRng;
use serde::Serialize;

use super::{SignalGenerator, unit};

/// Clamp ranges per channel, as (min, max).
pub const RF_MAX_RANGE: (f64, f64) = (30.0, 50.0);
pub const PSU_MAX_RANGE: (f64, f64) = (35.0, 55.0);
pub const ENVIRONMENT_RANGE: (f64, f64) = (20.0, 30.0);
pub const FAN_SPEED_RANGE: (f64, f64) = (40.0, 100.0);
pub const FAN_RPM_RANGE: (u32, u32) = (2350, 2550);

/// Latest temperature readings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Temperatures {
    /// Hottest RF module (°C).
    pub rf_max: f64,
    /// Hottest power supply (°C).
    pub psu_max: f64,
    /// Cabinet intake (°C).
    pub environment: f64,
    /// Fan duty (%).
    pub fan_speed: f64,
    pub fan_rpm: u32,
}

impl Default for Temperatures {
    fn default() -> Self {
        Self {
            rf_max: 37.3,
            psu_max: 43.0,
            environment: 24.3,
            fan_speed: 67.0,
            fan_rpm: 2450,
        }
    }
}

/// Bounded random walk for each channel.
#[derive(Debug, Clone)]
pub struct TemperatureGenerator {
    period: Duration,
    state: Temperatures,
}

impl TemperatureGenerator {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            state: Temperatures::default(),
        }
    }
}

/// Step `value` by up to ±`amplitude / 2` and keep it inside `range`.
fn walk(value: f64, amplitude: f64, range: (f64, f64), rng: &mut StdRng) -> f64 {
    (value + (unit(rng) - 0.5) * amplitude).clamp(range.0, range.1)
}

impl SignalGenerator for TemperatureGenerator {
    type Output = Temperatures;

    fn name(&self) -> &'static str {
        "temperature"
    }

    fn period(&self) -> Duration {
        self.period
    }

    fn initial(&self) -> Temperatures {
        self.state
    }

    fn tick(&mut self, _elapsed: Duration, rng: &mut StdRng) -> Temperatures {
        let prev = self.state;
        self.state = Temperatures {
            rf_max: walk(prev.rf_max, 2.0, RF_MAX_RANGE, rng),
            psu_max: walk(prev.psu_max, 1.5, PSU_MAX_RANGE, rng),
            environment: walk(prev.environment, 0.5, ENVIRONMENT_RANGE, rng),
            fan_speed: walk(prev.fan_speed, 5.0, FAN_SPEED_RANGE, rng),
            fan_rpm: rng.gen_range(FAN_RPM_RANGE.0..FAN_RPM_RANGE.1),
        };
        self.state
    }
}
