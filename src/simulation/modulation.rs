//! FM demodulation monitor: audio waveform and signal-quality figures.

use std::time::Duration;

use rand::Rng;
use rand::rngs::StdRng;
use serde::Serialize;

use super::{SignalGenerator, round_to, unit};
use crate::gauge::Point;

/// Samples per waveform frame.
pub const WAVEFORM_SAMPLES: usize = 60;

/// Clamp ranges.
pub const DEPTH_RANGE: (f64, f64) = (35.0, 90.0);
pub const SNR_RANGE: (f64, f64) = (35.0, 48.0);
pub const THD_RANGE: (f64, f64) = (0.05, 0.18);

/// Stereo pilot tone state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PilotStatus {
    Ok,
    Weak,
}

impl PilotStatus {
    fn toggled(self) -> Self {
        match self {
            Self::Ok => Self::Weak,
            Self::Weak => Self::Ok,
        }
    }
}

impl std::fmt::Display for PilotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::Weak => write!(f, "WEAK"),
        }
    }
}

/// One frame of the demodulation monitor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModulationSnapshot {
    /// Demodulated audio, each sample within (-0.8, 0.8).
    pub waveform: Vec<f64>,
    /// Modulation depth (%).
    pub modulation_depth: u32,
    pub carrier_mhz: f64,
    pub snr_db: u32,
    pub thd_pct: f64,
    pub pilot: PilotStatus,
}

impl Default for ModulationSnapshot {
    fn default() -> Self {
        Self {
            waveform: Vec::new(),
            modulation_depth: 75,
            carrier_mhz: 98.5,
            snr_db: 42,
            thd_pct: 0.1,
            pilot: PilotStatus::Ok,
        }
    }
}

/// Program-like audio built from a few harmonics and formants under a
/// slow envelope, with sparse transients and a noise floor.
#[derive(Debug, Clone)]
pub struct ModulationGenerator {
    period: Duration,
    time_offset: f64,
    phase: f64,
    pilot: PilotStatus,
}

impl ModulationGenerator {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            time_offset: 0.0,
            phase: 0.0,
            pilot: PilotStatus::Ok,
        }
    }

    fn sample(&self, index: usize, rng: &mut StdRng) -> f64 {
        let t = self.time_offset + index as f64 * 0.02;
        let phase = self.phase;

        let fundamental = (t * 4.0 + phase).sin() * 0.7;
        let harmonic2 = (t * 8.0 + phase * 1.3).sin() * 0.3;
        let harmonic3 = (t * 12.0 + phase * 0.7).sin() * 0.2;
        let formant1 = (t * 15.0 + phase * 2.0).sin() * 0.15;
        let formant2 = (t * 25.0 + phase * 1.5).sin() * 0.1;

        let envelope = ((t * 0.8).sin() * 0.4 + 0.6) * ((t * 1.7).sin() * 0.2 + 0.8);

        let mut signal = (fundamental + harmonic2 + harmonic3 + formant1 + formant2) * envelope;
        if rng.gen_bool(0.02) {
            signal += (unit(rng) - 0.5) * 0.5;
        }
        signal += (unit(rng) - 0.5) * 0.05;

        // Soft limiter.
        (signal * 1.2).tanh() * 0.8
    }
}

impl SignalGenerator for ModulationGenerator {
    type Output = ModulationSnapshot;

    fn name(&self) -> &'static str {
        "modulation"
    }

    fn period(&self) -> Duration {
        self.period
    }

    fn initial(&self) -> ModulationSnapshot {
        ModulationSnapshot::default()
    }

    fn tick(&mut self, _elapsed: Duration, rng: &mut StdRng) -> ModulationSnapshot {
        self.time_offset += 0.1;
        let waveform = (0..WAVEFORM_SAMPLES)
            .map(|i| self.sample(i, rng))
            .collect();
        self.phase += 0.1;

        let t = self.time_offset;
        let depth =
            60.0 + (t * 0.4).sin() * 20.0 + (t * 1.1).sin() * 8.0 + unit(rng) * 6.0;
        let carrier = 98.5 + (t * 0.05).sin() * 0.01 + (unit(rng) - 0.5) * 0.005;
        let snr = 41.0 + (t * 0.3).sin() * 4.0 + unit(rng) * 2.0;
        let thd = 0.09 + (t * 0.25).sin() * 0.04 + unit(rng) * 0.02;

        if rng.gen_bool(0.005) {
            self.pilot = self.pilot.toggled();
        }

        ModulationSnapshot {
            waveform,
            modulation_depth: depth.clamp(DEPTH_RANGE.0, DEPTH_RANGE.1).round() as u32,
            carrier_mhz: round_to(carrier, 2),
            snr_db: snr.clamp(SNR_RANGE.0, SNR_RANGE.1).round() as u32,
            thd_pct: round_to(thd.clamp(THD_RANGE.0, THD_RANGE.1), 2),
            pilot: self.pilot,
        }
    }
}

/// Polyline points for a waveform drawn `width` wide around a centre line
/// at `mid_y`, with `amplitude` pixels per unit of signal.
pub fn waveform_points(samples: &[f64], width: f64, mid_y: f64, amplitude: f64) -> Vec<Point> {
    let last = samples.len().saturating_sub(1).max(1) as f64;
    samples
        .iter()
        .enumerate()
        .map(|(i, v)| Point::new(i as f64 / last * width, mid_y + v * amplitude))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::rng_from_seed;

    #[test]
    fn frames_stay_in_declared_ranges() {
        let mut generator = ModulationGenerator::new(Duration::from_millis(50));
        let mut rng = rng_from_seed(Some(9));
        for _ in 0..2_000 {
            let frame = generator.tick(Duration::ZERO, &mut rng);
            assert_eq!(frame.waveform.len(), WAVEFORM_SAMPLES);
            assert!(frame.waveform.iter().all(|v| v.abs() < 0.8));
            assert!((35..=90).contains(&frame.modulation_depth));
            assert!((35..=48).contains(&frame.snr_db));
            assert!(frame.thd_pct >= 0.05 && frame.thd_pct <= 0.18);
            assert!((frame.carrier_mhz - 98.5).abs() <= 0.02);
        }
    }

    #[test]
    fn initial_frame_has_no_waveform() {
        let generator = ModulationGenerator::new(Duration::from_millis(50));
        let frame = generator.initial();
        assert!(frame.waveform.is_empty());
        assert_eq!(frame.pilot, PilotStatus::Ok);
    }

    #[test]
    fn waveform_points_span_width() {
        let points = waveform_points(&[0.0, 0.5, -0.5], 300.0, 32.0, 26.0);
        assert_eq!(points[0], Point::new(0.0, 32.0));
        assert_eq!(points[1], Point::new(150.0, 45.0));
        assert_eq!(points[2], Point::new(300.0, 19.0));
        assert!(waveform_points(&[], 300.0, 32.0, 26.0).is_empty());
    }

    #[test]
    fn pilot_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&PilotStatus::Weak).unwrap(), "\"WEAK\"");
        assert_eq!(PilotStatus::Ok.to_string(), "OK");
    }
}
