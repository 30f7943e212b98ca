/// Configuration schema and defaults for txdash.
///
/// Defines the TOML-serializable configuration structure with all sections:
/// `[server]`, `[logging]`, `[simulation]`, `[drift]`, `[seed]` and
/// `[device]`.
///
/// Every field has a built-in default. Users only need to set the values
/// they want to override.
use serde::{Deserialize, Serialize};

use crate::telemetry::NewReading;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level txdash configuration.
///
/// Maps directly to the `~/.txdash/config.toml` and `.txdash.toml` file
/// schemas. All sections and fields are optional; missing values fall back
/// to built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TxdashConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub simulation: SimulationConfig,
    pub drift: DriftConfig,
    pub seed: SeedConfig,
    pub device: DeviceConfig,
}

// ---------------------------------------------------------------------------
// [server]
// ---------------------------------------------------------------------------

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address, `host:port`.
    pub addr: String,
    /// Open the dashboard in the default browser after binding.
    pub open_browser: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:5000".to_string(),
            open_browser: false,
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

/// Diagnostic logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive: `"info"`, `"debug"`, `"txdash=trace"`, ...
    /// `RUST_LOG` wins when set.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// [simulation]
// ---------------------------------------------------------------------------

/// Simulated signal generators shown alongside the stored telemetry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub enabled: bool,
    pub audio_period_ms: u64,
    pub temperature_period_ms: u64,
    pub modulation_period_ms: u64,
    /// Fixed RNG seed for reproducible runs. Unset uses OS entropy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            audio_period_ms: 150,
            temperature_period_ms: 3000,
            modulation_period_ms: 50,
            seed: None,
        }
    }
}

// ---------------------------------------------------------------------------
// [drift]
// ---------------------------------------------------------------------------

/// Telemetry drift: periodically append a slightly varied reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftConfig {
    /// Off by default so the stored telemetry only changes through the API.
    pub enabled: bool,
    pub period_ms: u64,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            period_ms: 2000,
        }
    }
}

// ---------------------------------------------------------------------------
// [seed]
// ---------------------------------------------------------------------------

/// The reading a fresh store starts with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub forward_power: f64,
    pub reflected_power: f64,
    pub frequency: f64,
    pub rf_efficiency: f64,
    pub target_power: f64,
    pub is_on_air: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        let seed = NewReading::seed();
        Self {
            forward_power: seed.forward_power,
            reflected_power: seed.reflected_power,
            frequency: seed.frequency,
            rf_efficiency: seed.rf_efficiency,
            target_power: seed.target_power,
            is_on_air: seed.is_on_air,
        }
    }
}

impl SeedConfig {
    pub fn to_reading(&self) -> NewReading {
        NewReading {
            forward_power: self.forward_power,
            reflected_power: self.reflected_power,
            frequency: self.frequency,
            rf_efficiency: self.rf_efficiency,
            target_power: self.target_power,
            is_on_air: self.is_on_air,
            timestamp: None,
        }
    }
}

// ---------------------------------------------------------------------------
// [device]
// ---------------------------------------------------------------------------

/// Static device profile shown in the dashboard's status panels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub site_name: String,
    pub model: String,
    pub firmware: String,
    pub audio_software: String,
    /// `OPERATIONAL`, `WARNING` or `ERROR`.
    pub status: String,
    /// Active audio input: `AES`, `SATELLITE` or `STEREO`.
    pub audio_source: String,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            site_name: "Trial BASMA Radio".to_string(),
            model: "FM-2100TX".to_string(),
            firmware: "v3.12.4".to_string(),
            audio_software: "307".to_string(),
            status: "OPERATIONAL".to_string(),
            audio_source: "AES".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Annotated default file
// ---------------------------------------------------------------------------

impl TxdashConfig {
    /// Generate the annotated default TOML config file content.
    ///
    /// Used by `txdash config init` to create a starting config file with
    /// all settings documented.
    pub fn default_toml() -> String {
        r#"# txdash Configuration
# FM transmitter telemetry dashboard
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (TXDASH_*)
#   2. Project config (.txdash.toml in current directory)
#   3. User global config (~/.txdash/config.toml)
#   4. Built-in defaults

[server]
addr = "127.0.0.1:5000"     # TXDASH_ADDR
open_browser = false

[logging]
level = "info"              # TXDASH_LOG; RUST_LOG takes precedence

[simulation]
enabled = true              # TXDASH_SIMULATION
audio_period_ms = 150
temperature_period_ms = 3000
modulation_period_ms = 50
# seed = 42                 # TXDASH_SEED; fixed seed for reproducible runs

[drift]
enabled = false             # TXDASH_DRIFT; opt-in telemetry variation
period_ms = 2000

[seed]
forward_power = 2700.0
reflected_power = 12.0
frequency = 93.4
rf_efficiency = 87.0
target_power = 2700.0
is_on_air = true

[device]
site_name = "Trial BASMA Radio"   # TXDASH_SITE_NAME
model = "FM-2100TX"
firmware = "v3.12.4"
audio_software = "307"
status = "OPERATIONAL"
audio_source = "AES"              # AES, SATELLITE or STEREO
"#
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = TxdashConfig::default();
        assert_eq!(config.server.addr, "127.0.0.1:5000");
        assert!(!config.server.open_browser);
        assert_eq!(config.logging.level, "info");
        assert!(config.simulation.enabled);
        assert_eq!(config.simulation.audio_period_ms, 150);
        assert_eq!(config.simulation.temperature_period_ms, 3000);
        assert_eq!(config.simulation.modulation_period_ms, 50);
        assert_eq!(config.simulation.seed, None);
        assert!(!config.drift.enabled);
        assert_eq!(config.drift.period_ms, 2000);
        assert_eq!(config.seed.to_reading(), NewReading::seed());
    }

    #[test]
    fn deserialize_minimal_toml() {
        let toml_str = r#"
[server]
addr = "0.0.0.0:8080"
"#;
        let config: TxdashConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.addr, "0.0.0.0:8080");
        // All other sections fall back to defaults
        assert!(config.simulation.enabled);
        assert_eq!(config.seed.forward_power, 2700.0);
    }

    #[test]
    fn deserialize_partial_section() {
        let toml_str = r#"
[seed]
forward_power = 1500.0
is_on_air = false

[simulation]
seed = 7
"#;
        let config: TxdashConfig = toml::from_str(toml_str).unwrap();
        let reading = config.seed.to_reading();
        assert_eq!(reading.forward_power, 1500.0);
        assert!(!reading.is_on_air);
        assert_eq!(reading.frequency, 93.4);
        assert_eq!(config.simulation.seed, Some(7));
        assert_eq!(config.simulation.audio_period_ms, 150);
    }

    #[test]
    fn default_toml_parses_back_to_defaults() {
        let config: TxdashConfig = toml::from_str(&TxdashConfig::default_toml()).unwrap();
        assert_eq!(config, TxdashConfig::default());
    }

    #[test]
    fn serialize_roundtrip() {
        let original = TxdashConfig::default();
        let toml_str = toml::to_string_pretty(&original).unwrap();
        let parsed: TxdashConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, original);
    }
}
