/// Configuration system for txdash.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults**, from [`schema::TxdashConfig::default()`]
/// 2. **User global config**, `~/.txdash/config.toml`
/// 3. **Project local config**, `.txdash.toml` in the current working directory
/// 4. **Environment variables**, `TXDASH_*` overrides (highest precedence)
///
/// Keys a file leaves unset keep the value from the layer below.
///
/// # Usage
///
/// ```rust,ignore
/// use txdash::config;
///
/// let cfg = config::load();
/// if cfg.simulation.enabled {
///     // ...
/// }
/// ```
pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;

pub use schema::TxdashConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved txdash configuration.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env
/// vars.
pub fn load() -> TxdashConfig {
    // Layers 2 and 3: ~/.txdash/config.toml, then .txdash.toml
    let mut config = load_layers(&[global_config_path(), project_config_path()]);

    // Layer 4: environment variable overrides
    apply_env_overrides(&mut config);

    config
}

/// Merge each readable file onto the defaults, lowest priority first.
///
/// Files are merged key by key, so a layer only changes what it sets.
fn load_layers(paths: &[Option<PathBuf>]) -> TxdashConfig {
    let mut merged = match toml::Value::try_from(TxdashConfig::default()) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "failed to serialize default config");
            return TxdashConfig::default();
        }
    };

    for path in paths.iter().flatten() {
        if let Some(layer) = load_toml_file(path) {
            merge_toml(&mut merged, layer);
        }
    }

    merged.try_into::<TxdashConfig>().unwrap_or_else(|e| {
        warn!(error = %e, "merged config is invalid, using defaults");
        TxdashConfig::default()
    })
}

/// Load a TOML config file from the given path (if it exists).
///
/// Returns `None` if the file doesn't exist or is malformed. A malformed
/// file, including one with a wrongly typed value, is reported and skipped
/// so the dashboard still starts.
fn load_toml_file(path: &Path) -> Option<toml::Value> {
    let content = fs::read_to_string(path).ok()?;
    let checked = toml::from_str::<TxdashConfig>(&content)
        .map_err(|e| e.to_string())
        .and_then(|_| toml::from_str::<toml::Value>(&content).map_err(|e| e.to_string()));
    match checked {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring malformed config file");
            None
        }
    }
}

/// Deep-merge `overlay` into `base`. Tables merge per key; any other value
/// in `overlay` replaces the one in `base`.
fn merge_toml(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Path to the user global config: `~/.txdash/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".txdash").join("config.toml"))
}

/// Path to the project local config: `.txdash.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".txdash.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `TXDASH_ADDR`: listen address
/// - `TXDASH_LOG`: log filter directive
/// - `TXDASH_SIMULATION`: signal generators on/off (`1`/`true`/`yes`/`on`)
/// - `TXDASH_DRIFT`: telemetry drift on/off
/// - `TXDASH_SEED`: fixed RNG seed
/// - `TXDASH_SITE_NAME`: site name in the dashboard header
fn apply_env_overrides(config: &mut TxdashConfig) {
    apply_overrides(config, |key| std::env::var(key).ok());
}

/// Apply overrides from any `key -> value` source.
fn apply_overrides(config: &mut TxdashConfig, var: impl Fn(&str) -> Option<String>) {
    if let Some(val) = var("TXDASH_ADDR")
        && !val.is_empty()
    {
        config.server.addr = val;
    }
    if let Some(val) = var("TXDASH_LOG")
        && !val.is_empty()
    {
        config.logging.level = val;
    }
    if let Some(val) = var("TXDASH_SIMULATION") {
        config.simulation.enabled = is_truthy(&val);
    }
    if let Some(val) = var("TXDASH_DRIFT") {
        config.drift.enabled = is_truthy(&val);
    }
    if let Some(val) = var("TXDASH_SEED")
        && let Ok(seed) = val.parse::<u64>()
    {
        config.simulation.seed = Some(seed);
    }
    if let Some(val) = var("TXDASH_SITE_NAME")
        && !val.is_empty()
    {
        config.device.site_name = val;
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.txdash/config.toml`.
///
/// Creates the `~/.txdash/` directory if it doesn't exist. Returns an error
/// if the file already exists (use `force = true` to overwrite).
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.txdash/ directory")?;
    }

    fs::write(&path, TxdashConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// Set a single config key to a value in the global config file.
///
/// Reads the current global config (or defaults), updates the specified key,
/// and writes the result back. Supports dotted keys like `drift.enabled`.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;

    let content = if path.exists() {
        fs::read_to_string(&path).context("failed to read config file")?
    } else {
        toml::to_string_pretty(&TxdashConfig::default())
            .context("failed to serialize default config")?
    };

    let mut value_table: toml::Value =
        toml::from_str(&content).context("failed to parse config as TOML value")?;
    set_toml_value(&mut value_table, key, value)?;

    // Refuse edits that would make the file unloadable.
    let output =
        toml::to_string_pretty(&value_table).context("failed to serialize updated config")?;
    toml::from_str::<TxdashConfig>(&output)
        .with_context(|| format!("'{value}' is not a valid value for '{key}'"))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(&path, output).context("failed to write config file")?;

    Ok(())
}

/// Set a value in a TOML value tree using a dotted key path.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    if parts.iter().any(|p| p.is_empty()) {
        anyhow::bail!("empty config key segment in '{key}'");
    }

    // Navigate to the parent table
    let mut current = root;
    for &part in &parts[..parts.len() - 1] {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let leaf = parts[parts.len() - 1];

    // Determine the type of the existing value to parse correctly
    let table = current.as_table_mut().with_context(|| {
        format!(
            "expected table at '{}'",
            key.rsplit_once('.').map(|(s, _)| s).unwrap_or("")
        )
    })?;

    let existing = table.get(leaf);
    let new_value = match existing {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::Float(_)) => {
            let f: f64 = raw_value
                .parse()
                .with_context(|| format!("expected float for '{key}', got '{raw_value}'"))?;
            toml::Value::Float(f)
        }
        // Unset optional integers (e.g. `simulation.seed`) arrive here too.
        None => match raw_value.parse::<i64>() {
            Ok(n) => toml::Value::Integer(n),
            Err(_) => toml::Value::String(raw_value.to_string()),
        },
        _ => toml::Value::String(raw_value.to_string()),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Show the effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn overrides(pairs: &[(&str, &str)]) -> TxdashConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let mut config = TxdashConfig::default();
        apply_overrides(&mut config, |key| vars.get(key).cloned());
        config
    }

    #[test]
    fn load_produces_usable_config() {
        // Reflects any config files present in the environment running the
        // tests; only checks that loading never fails.
        let config = load();
        assert!(!config.server.addr.is_empty());
    }

    /// Write `content` to a fresh file under the system temp directory.
    fn write_layer(name: &str, content: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("txdash-config-{}-{name}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn project_layer_keeps_global_settings() {
        let global = write_layer(
            "keep-global",
            r#"
[drift]
enabled = true

[device]
site_name = "Hilltop"
"#,
        );
        let project = write_layer(
            "keep-project",
            r#"
[server]
addr = "127.0.0.1:9999"
"#,
        );

        let config = load_layers(&[Some(global), Some(project)]);
        assert_eq!(config.server.addr, "127.0.0.1:9999");
        assert!(config.drift.enabled);
        assert_eq!(config.device.site_name, "Hilltop");
        // Untouched keys keep their defaults.
        assert_eq!(config.device.model, "FM-2100TX");
        assert_eq!(config.drift.period_ms, 2000);
    }

    #[test]
    fn later_layer_wins_per_key() {
        let global = write_layer(
            "wins-global",
            r#"
[simulation]
audio_period_ms = 300
seed = 5
"#,
        );
        let project = write_layer(
            "wins-project",
            r#"
[simulation]
seed = 9
"#,
        );

        let config = load_layers(&[Some(global), Some(project)]);
        assert_eq!(config.simulation.audio_period_ms, 300);
        assert_eq!(config.simulation.seed, Some(9));
    }

    #[test]
    fn malformed_layer_is_skipped() {
        let global = write_layer(
            "skip-global",
            r#"
[device]
site_name = "Hilltop"
"#,
        );
        let project = write_layer(
            "skip-project",
            r#"
[drift]
enabled = "maybe"
"#,
        );
        let missing = std::env::temp_dir().join("txdash-config-does-not-exist.toml");

        let config = load_layers(&[Some(global), Some(project), Some(missing), None]);
        assert_eq!(config.device.site_name, "Hilltop");
        assert!(!config.drift.enabled);
    }

    #[test]
    fn no_layers_yield_defaults() {
        assert_eq!(load_layers(&[]), TxdashConfig::default());
    }

    #[test]
    fn merge_toml_replaces_leaves_and_merges_tables() {
        let mut base: toml::Value = toml::from_str("[a]\nx = 1\ny = 2\n").unwrap();
        let overlay: toml::Value = toml::from_str("[a]\ny = 3\nz = 4\n").unwrap();
        merge_toml(&mut base, overlay);
        assert_eq!(base["a"]["x"].as_integer(), Some(1));
        assert_eq!(base["a"]["y"].as_integer(), Some(3));
        assert_eq!(base["a"]["z"].as_integer(), Some(4));
    }

    #[test]
    fn is_truthy_accepts_variants() {
        assert!(is_truthy("1"));
        assert!(is_truthy("true"));
        assert!(is_truthy("TRUE"));
        assert!(is_truthy("yes"));
        assert!(is_truthy("on"));
        assert!(is_truthy("ON"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("false"));
        assert!(!is_truthy("off"));
        assert!(!is_truthy(""));
    }

    #[test]
    fn env_overrides_apply() {
        let config = overrides(&[
            ("TXDASH_ADDR", "0.0.0.0:9000"),
            ("TXDASH_LOG", "debug"),
            ("TXDASH_SIMULATION", "0"),
            ("TXDASH_DRIFT", "yes"),
            ("TXDASH_SEED", "42"),
            ("TXDASH_SITE_NAME", "Hilltop"),
        ]);
        assert_eq!(config.server.addr, "0.0.0.0:9000");
        assert_eq!(config.logging.level, "debug");
        assert!(!config.simulation.enabled);
        assert!(config.drift.enabled);
        assert_eq!(config.simulation.seed, Some(42));
        assert_eq!(config.device.site_name, "Hilltop");
    }

    #[test]
    fn env_overrides_ignore_empty_and_unparseable() {
        let config = overrides(&[("TXDASH_ADDR", ""), ("TXDASH_SEED", "soon")]);
        assert_eq!(config, TxdashConfig::default());
    }

    #[test]
    fn set_toml_value_updates_string() {
        let toml_str = r#"
[server]
addr = "127.0.0.1:5000"
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        set_toml_value(&mut root, "server.addr", "0.0.0.0:80").unwrap();

        let server = root["server"].as_table().unwrap();
        assert_eq!(server["addr"].as_str(), Some("0.0.0.0:80"));
    }

    #[test]
    fn set_toml_value_updates_bool() {
        let toml_str = r#"
[drift]
enabled = false
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        set_toml_value(&mut root, "drift.enabled", "true").unwrap();
        assert_eq!(root["drift"]["enabled"].as_bool(), Some(true));
    }

    #[test]
    fn set_toml_value_updates_integer() {
        let toml_str = r#"
[simulation]
audio_period_ms = 150
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        set_toml_value(&mut root, "simulation.audio_period_ms", "200").unwrap();
        assert_eq!(root["simulation"]["audio_period_ms"].as_integer(), Some(200));
    }

    #[test]
    fn set_toml_value_rejects_non_integer() {
        let toml_str = r#"
[simulation]
audio_period_ms = 150
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        assert!(set_toml_value(&mut root, "simulation.audio_period_ms", "fast").is_err());
    }

    #[test]
    fn set_toml_value_updates_float() {
        let toml_str = r#"
[seed]
frequency = 93.4
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        set_toml_value(&mut root, "seed.frequency", "101.7").unwrap();
        let f = root["seed"]["frequency"].as_float().unwrap();
        assert!((f - 101.7).abs() < f64::EPSILON);
    }

    #[test]
    fn set_toml_value_fills_unset_seed_as_integer() {
        let toml_str = r#"
[simulation]
enabled = true
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        set_toml_value(&mut root, "simulation.seed", "7").unwrap();
        assert_eq!(root["simulation"]["seed"].as_integer(), Some(7));
    }

    #[test]
    fn set_toml_value_rejects_invalid_key() {
        let toml_str = r#"
[server]
addr = "127.0.0.1:5000"
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        assert!(set_toml_value(&mut root, "nonexistent.key", "value").is_err());
        assert!(set_toml_value(&mut root, "server.", "value").is_err());
    }

    #[test]
    fn show_effective_config_returns_toml() {
        let toml_str = show_effective_config().unwrap();
        let _: TxdashConfig = toml::from_str(&toml_str).unwrap();
    }
}
