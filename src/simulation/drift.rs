//! Telemetry drift: periodically appends a reading that wanders slightly
//! from the latest one, so the power and frequency gauges move.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use tracing::{trace, warn};

use super::{SignalGenerator, round_to, unit};
use crate::telemetry::{NewReading, TelemetryReading, TelemetryStore};

/// Appends drifted readings to a shared store.
pub struct DriftGenerator {
    store: Arc<TelemetryStore>,
    period: Duration,
}

impl DriftGenerator {
    pub fn new(store: Arc<TelemetryStore>, period: Duration) -> Self {
        Self { store, period }
    }
}

/// A reading a small random step away from `from`. The timestamp is left
/// for the store to assign.
pub fn drift_from(from: &TelemetryReading, rng: &mut StdRng) -> NewReading {
    let mut step = |amplitude: f64| (unit(rng) - 0.5) * 2.0 * amplitude;
    NewReading {
        forward_power: round_to(from.forward_power + step(5.0), 1),
        reflected_power: round_to((from.reflected_power + step(1.0)).max(0.0), 1),
        frequency: round_to(from.frequency + step(0.05), 2),
        rf_efficiency: round_to((from.rf_efficiency + step(1.0)).clamp(0.0, 100.0), 1),
        target_power: from.target_power,
        is_on_air: from.is_on_air,
        timestamp: None,
    }
}

impl SignalGenerator for DriftGenerator {
    /// The last reading appended, if any.
    type Output = Option<TelemetryReading>;

    fn name(&self) -> &'static str {
        "drift"
    }

    fn period(&self) -> Duration {
        self.period
    }

    fn initial(&self) -> Option<TelemetryReading> {
        None
    }

    fn tick(&mut self, _elapsed: Duration, rng: &mut StdRng) -> Option<TelemetryReading> {
        let latest = match self.store.latest() {
            Ok(Some(latest)) => latest,
            // Nothing to drift from until a reading exists.
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "drift skipped");
                return None;
            }
        };
        match self.store.create(drift_from(&latest, rng)) {
            Ok(created) => {
                trace!(id = created.id, forward_power = created.forward_power, "drifted reading");
                Some(created)
            }
            Err(e) => {
                warn!(error = %e, "drift skipped");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::rng_from_seed;

    fn base() -> TelemetryReading {
        TelemetryReading {
            id: 1,
            forward_power: 2700.0,
            reflected_power: 0.2,
            frequency: 93.4,
            rf_efficiency: 99.6,
            target_power: 2700.0,
            is_on_air: true,
            timestamp: 1,
        }
    }

    #[test]
    fn drift_stays_near_source() {
        let mut rng = rng_from_seed(Some(1));
        let from = base();
        for _ in 0..1_000 {
            let next = drift_from(&from, &mut rng);
            assert!((next.forward_power - from.forward_power).abs() <= 5.05);
            assert!((next.frequency - from.frequency).abs() <= 0.055);
            assert!(next.reflected_power >= 0.0);
            assert!((0.0..=100.0).contains(&next.rf_efficiency));
            assert_eq!(next.target_power, from.target_power);
            assert!(next.timestamp.is_none());
        }
    }

    #[test]
    fn tick_appends_to_store() {
        let store = Arc::new(TelemetryStore::seeded(NewReading::seed()).unwrap());
        let mut generator = DriftGenerator::new(Arc::clone(&store), Duration::from_secs(2));
        let mut rng = rng_from_seed(Some(2));
        let created = generator.tick(Duration::ZERO, &mut rng).unwrap();
        assert_eq!(created.id, 2);
        assert_eq!(store.len(), 2);
        assert_eq!(store.latest().unwrap().unwrap().id, 2);
    }

    #[test]
    fn tick_on_empty_store_does_nothing() {
        let store = Arc::new(TelemetryStore::new());
        let mut generator = DriftGenerator::new(Arc::clone(&store), Duration::from_secs(2));
        let mut rng = rng_from_seed(Some(2));
        assert!(generator.tick(Duration::ZERO, &mut rng).is_none());
        assert!(store.is_empty());
    }
}
