//! Simulated signal generators.
//!
//! Each generator runs on its own thread with its own timer and publishes
//! its latest output into a shared snapshot. Generators are independent:
//! there is no ordering between them and no shared lock beyond each
//! snapshot's own.
//!
//! Cancellation is tied to ownership. [`GeneratorHandle::stop`] ends the
//! timer and joins the thread; dropping the handle does the same, so a
//! torn-down view can never leak periodic work.

pub mod audio;
pub mod drift;
pub mod modulation;
pub mod temperature;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, PoisonError, RwLock};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::schema::{DriftConfig, SimulationConfig};
use crate::telemetry::{TelemetryReading, TelemetryStore};

pub use audio::{AudioGenerator, AudioLevels};
pub use drift::DriftGenerator;
pub use modulation::{ModulationGenerator, ModulationSnapshot, PilotStatus};
pub use temperature::{TemperatureGenerator, Temperatures};

// ---------------------------------------------------------------------------
// Generator trait
// ---------------------------------------------------------------------------

/// A periodic source of simulated values.
pub trait SignalGenerator: Send + 'static {
    type Output: Clone + Send + Sync + 'static;

    /// Short name used for the thread and in logs.
    fn name(&self) -> &'static str;

    /// Time between ticks.
    fn period(&self) -> Duration;

    /// Value shown before the first tick.
    fn initial(&self) -> Self::Output;

    /// Advance one tick. `elapsed` is the time since the generator started.
    fn tick(&mut self, elapsed: Duration, rng: &mut StdRng) -> Self::Output;
}

/// Seeded RNG when a seed is given, OS entropy otherwise.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

// ---------------------------------------------------------------------------
// Running generators
// ---------------------------------------------------------------------------

/// Owner of one running generator.
pub struct GeneratorHandle<T> {
    name: &'static str,
    snapshot: Arc<RwLock<T>>,
    ticks: Arc<AtomicU64>,
    stop_tx: Option<mpsc::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl<T: Clone> GeneratorHandle<T> {
    /// The most recently published value.
    pub fn snapshot(&self) -> T {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl<T> GeneratorHandle<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of ticks published so far.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        self.thread.is_some()
    }

    /// Cancel the timer and wait for the thread to finish. Idempotent.
    pub fn stop(&mut self) {
        // Dropping the sender wakes the thread out of its wait.
        self.stop_tx.take();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
            debug!(generator = self.name, ticks = self.ticks(), "generator stopped");
        }
    }
}

impl<T> Drop for GeneratorHandle<T> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Start `generator` on its own thread.
///
/// The initial value is published immediately; each later value is
/// published one period after the previous one.
pub fn spawn_generator<G: SignalGenerator>(
    mut generator: G,
    mut rng: StdRng,
) -> Result<GeneratorHandle<G::Output>> {
    let name = generator.name();
    let period = generator.period();
    let snapshot = Arc::new(RwLock::new(generator.initial()));
    let ticks = Arc::new(AtomicU64::new(0));
    let (stop_tx, stop_rx) = mpsc::channel::<()>();

    let thread_snapshot = Arc::clone(&snapshot);
    let thread_ticks = Arc::clone(&ticks);
    let thread = std::thread::Builder::new()
        .name(format!("gen-{name}"))
        .spawn(move || {
            let started = Instant::now();
            loop {
                match stop_rx.recv_timeout(period) {
                    Err(RecvTimeoutError::Timeout) => {}
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
                let value = generator.tick(started.elapsed(), &mut rng);
                *thread_snapshot
                    .write()
                    .unwrap_or_else(PoisonError::into_inner) = value;
                thread_ticks.fetch_add(1, Ordering::SeqCst);
            }
        })
        .with_context(|| format!("failed to spawn generator thread '{name}'"))?;

    debug!(generator = name, period_ms = period.as_millis() as u64, "generator started");

    Ok(GeneratorHandle {
        name,
        snapshot,
        ticks,
        stop_tx: Some(stop_tx),
        thread: Some(thread),
    })
}

// ---------------------------------------------------------------------------
// The dashboard's generator set
// ---------------------------------------------------------------------------

/// Current values of every dashboard generator. The default is what the
/// dashboard shows when no generator is running.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshots {
    pub audio: AudioLevels,
    pub temperatures: Temperatures,
    pub modulation: ModulationSnapshot,
}

/// All generators started for one dashboard server.
pub struct Simulation {
    audio: GeneratorHandle<AudioLevels>,
    temperature: GeneratorHandle<Temperatures>,
    modulation: GeneratorHandle<ModulationSnapshot>,
    drift: Option<GeneratorHandle<Option<TelemetryReading>>>,
}

impl Simulation {
    /// Start the audio, temperature and modulation generators, plus the
    /// drift generator when enabled.
    pub fn start(
        config: &SimulationConfig,
        drift: &DriftConfig,
        store: Arc<TelemetryStore>,
    ) -> Result<Self> {
        // Offset the seed per generator so their streams differ.
        let seed = |offset: u64| config.seed.map(|s| s.wrapping_add(offset));

        let audio = spawn_generator(
            AudioGenerator::new(period_from_ms(config.audio_period_ms)),
            rng_from_seed(seed(0)),
        )?;
        let temperature = spawn_generator(
            TemperatureGenerator::new(period_from_ms(config.temperature_period_ms)),
            rng_from_seed(seed(1)),
        )?;
        let modulation = spawn_generator(
            ModulationGenerator::new(period_from_ms(config.modulation_period_ms)),
            rng_from_seed(seed(2)),
        )?;
        let drift = if drift.enabled {
            Some(spawn_generator(
                DriftGenerator::new(store, period_from_ms(drift.period_ms)),
                rng_from_seed(seed(3)),
            )?)
        } else {
            None
        };

        info!(drift = drift.is_some(), "signal generators running");

        Ok(Self {
            audio,
            temperature,
            modulation,
            drift,
        })
    }

    pub fn snapshots(&self) -> Snapshots {
        Snapshots {
            audio: self.audio.snapshot(),
            temperatures: self.temperature.snapshot(),
            modulation: self.modulation.snapshot(),
        }
    }

    /// Names of the generators that are currently running.
    pub fn running(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        for (name, running) in [
            (self.audio.name(), self.audio.is_running()),
            (self.temperature.name(), self.temperature.is_running()),
            (self.modulation.name(), self.modulation.is_running()),
        ] {
            if running {
                names.push(name);
            }
        }
        if let Some(drift) = self.drift.as_ref().filter(|d| d.is_running()) {
            names.push(drift.name());
        }
        names
    }

    /// Stop every generator and wait for their threads.
    pub fn stop(&mut self) {
        self.audio.stop();
        self.temperature.stop();
        self.modulation.stop();
        if let Some(drift) = self.drift.as_mut() {
            drift.stop();
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Shortest tick period; configured zeros are raised to this.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Configured period in milliseconds, never shorter than [`MIN_PERIOD`].
pub fn period_from_ms(ms: u64) -> Duration {
    Duration::from_millis(ms).max(MIN_PERIOD)
}

/// Uniform sample in `[0, 1)`.
pub(crate) fn unit(rng: &mut StdRng) -> f64 {
    use rand::Rng;
    rng.gen_range(0.0..1.0)
}

/// Round to `decimals` decimal places.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
