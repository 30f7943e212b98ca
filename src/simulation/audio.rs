//! Program audio levels for the left, right and multiplex meters.

use std::time::Duration;

use rand::rngs::StdRng;
use serde::Serialize;

use super::{SignalGenerator, unit};
use crate::gauge::audio::{AudioLevel, CEILING_DB, FLOOR_DB};

/// Levels of the three audio meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AudioLevels {
    pub left: AudioLevel,
    pub right: AudioLevel,
    pub mpx: AudioLevel,
}

impl Default for AudioLevels {
    fn default() -> Self {
        Self {
            left: AudioLevel::new(-8.5, Some(-3.2)),
            right: AudioLevel::new(-9.1, Some(-2.8)),
            mpx: AudioLevel::new(-12.3, Some(-6.5)),
        }
    }
}

/// Broadcast-like program levels: a slow sinusoid plus jitter, with
/// peak-hold values that decay toward a floor each tick.
#[derive(Debug, Clone)]
pub struct AudioGenerator {
    period: Duration,
    state: AudioLevels,
}

impl AudioGenerator {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            state: AudioLevels::default(),
        }
    }
}

fn clamp_db(value: f64) -> f64 {
    value.clamp(FLOOR_DB, CEILING_DB)
}

/// Peak decays by `decay` per tick but never drops below a fresh ceiling.
fn decay_peak(previous: Option<f64>, decay: f64, fresh: f64) -> Option<f64> {
    let previous = previous.unwrap_or(FLOOR_DB);
    Some(clamp_db((previous - decay).max(fresh)))
}

impl SignalGenerator for AudioGenerator {
    type Output = AudioLevels;

    fn name(&self) -> &'static str {
        "audio"
    }

    fn period(&self) -> Duration {
        self.period
    }

    fn initial(&self) -> AudioLevels {
        self.state
    }

    fn tick(&mut self, elapsed: Duration, rng: &mut StdRng) -> AudioLevels {
        let t = elapsed.as_secs_f64();
        let prev = self.state;

        let left = -15.0 + unit(rng) * 10.0 + t.sin() * 3.0;
        let left_peak = decay_peak(prev.left.peak_db, 0.5, -3.0 + unit(rng) * 2.0);
        let right = -15.0 + unit(rng) * 10.0 + t.cos() * 3.0;
        let right_peak = decay_peak(prev.right.peak_db, 0.5, -3.0 + unit(rng) * 2.0);
        let mpx = -18.0 + unit(rng) * 8.0 + (t / 1.5).sin() * 2.0;
        let mpx_peak = decay_peak(prev.mpx.peak_db, 0.3, -8.0 + unit(rng) * 3.0);

        self.state = AudioLevels {
            left: AudioLevel::new(clamp_db(left), left_peak),
            right: AudioLevel::new(clamp_db(right), right_peak),
            mpx: AudioLevel::new(clamp_db(mpx), mpx_peak),
        };
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::rng_from_seed;

    #[test]
    fn levels_stay_in_meter_range() {
        let mut generator = AudioGenerator::new(Duration::from_millis(150));
        let mut rng = rng_from_seed(Some(7));
        for i in 0..2_000u64 {
            let levels = generator.tick(Duration::from_millis(i * 150), &mut rng);
            for level in [levels.left, levels.right, levels.mpx] {
                assert!((FLOOR_DB..=CEILING_DB).contains(&level.value_db));
                let peak = level.peak_db.unwrap();
                assert!((FLOOR_DB..=CEILING_DB).contains(&peak));
            }
            assert!((-18.0..=-2.0).contains(&levels.left.value_db));
        }
    }

    #[test]
    fn peak_decays_no_faster_than_its_rate() {
        let mut generator = AudioGenerator::new(Duration::from_millis(150));
        let mut rng = rng_from_seed(Some(3));
        let mut previous = generator.initial();
        for i in 0..200u64 {
            let next = generator.tick(Duration::from_millis(i * 150), &mut rng);
            let prev_peak = previous.left.peak_db.unwrap();
            assert!(next.left.peak_db.unwrap() >= prev_peak - 0.5 - 1e-9);
            previous = next;
        }
    }

    #[test]
    fn same_seed_same_levels() {
        let mut a = AudioGenerator::new(Duration::from_millis(150));
        let mut b = AudioGenerator::new(Duration::from_millis(150));
        let mut ra = rng_from_seed(Some(11));
        let mut rb = rng_from_seed(Some(11));
        for i in 0..10u64 {
            let at = Duration::from_millis(i * 150);
            assert_eq!(a.tick(at, &mut ra), b.tick(at, &mut rb));
        }
    }
}
