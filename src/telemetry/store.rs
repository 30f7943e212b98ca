//! In-memory telemetry store.
//!
//! Holds every reading created since startup, keyed by a strictly increasing
//! id. The host process builds one store, seeds it, and shares it with the
//! HTTP handlers and generators through an `Arc`.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use thiserror::Error;
use tracing::debug;

use super::{NewReading, ReadingPatch, TelemetryReading};

/// Failures of the store itself (never of the caller's input).
#[derive(Debug, Error)]
pub enum StoreError {
    /// A writer panicked while holding the lock.
    #[error("telemetry store lock poisoned")]
    Poisoned,
}

#[derive(Debug, Default)]
struct Inner {
    readings: BTreeMap<u64, TelemetryReading>,
    next_id: u64,
    last_assigned_ts: i64,
}

/// Thread-safe map of telemetry readings.
#[derive(Debug)]
pub struct TelemetryStore {
    inner: Mutex<Inner>,
}

impl Default for TelemetryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryStore {
    /// An empty store. `latest` returns `None` until something is created.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_id: 1,
                ..Inner::default()
            }),
        }
    }

    /// A store holding exactly one reading built from `seed`.
    pub fn seeded(seed: NewReading) -> Result<Self, StoreError> {
        let store = Self::new();
        let reading = store.create(seed)?;
        debug!(id = reading.id, forward_power = reading.forward_power, "seeded telemetry store");
        Ok(store)
    }

    /// The reading with the greatest timestamp. Equal timestamps resolve to
    /// the reading created first.
    pub fn latest(&self) -> Result<Option<TelemetryReading>, StoreError> {
        let inner = self.lock()?;
        Ok(inner
            .readings
            .values()
            .rev()
            .max_by_key(|r| r.timestamp)
            .cloned())
    }

    /// Store a new reading under the next id and return it.
    pub fn create(&self, reading: NewReading) -> Result<TelemetryReading, StoreError> {
        let mut inner = self.lock()?;
        let id = inner.next_id;
        inner.next_id += 1;

        let timestamp = match reading.timestamp {
            Some(ts) => ts,
            None => {
                let ts = Utc::now()
                    .timestamp_millis()
                    .max(inner.last_assigned_ts + 1);
                inner.last_assigned_ts = ts;
                ts
            }
        };

        let record = TelemetryReading {
            id,
            forward_power: reading.forward_power,
            reflected_power: reading.reflected_power,
            frequency: reading.frequency,
            rf_efficiency: reading.rf_efficiency,
            target_power: reading.target_power,
            is_on_air: reading.is_on_air,
            timestamp,
        };
        inner.readings.insert(id, record.clone());
        Ok(record)
    }

    /// Merge `patch` into the reading with `id`. Unknown ids change nothing.
    pub fn update(
        &self,
        id: u64,
        patch: &ReadingPatch,
    ) -> Result<Option<TelemetryReading>, StoreError> {
        let mut inner = self.lock()?;
        let Some(existing) = inner.readings.get_mut(&id) else {
            return Ok(None);
        };
        patch.apply(existing);
        Ok(Some(existing.clone()))
    }

    /// Look up one reading by id.
    pub fn get(&self, id: u64) -> Result<Option<TelemetryReading>, StoreError> {
        Ok(self.lock()?.readings.get(&id).cloned())
    }

    pub fn len(&self) -> usize {
        self.lock().map(|inner| inner.readings.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner.lock().map_err(|_| StoreError::Poisoned)
    }
}
