//! CLI command implementations.
//!
//! Provides subcommand handlers for:
//! - `txdash status`: fetch the latest reading from a running server
//! - `txdash designs`: print one value in every meter design
//! - `txdash config show|init|set|reset`: configuration management
//!
//! `txdash serve` lives in [`crate::web::run`].

use std::time::Duration;

use anyhow::{Context, Result};
use colored::{ColoredString, Colorize};

use crate::config;
use crate::dashboard;
use crate::gauge::fill::{LinearView, StripChartView};
use crate::gauge::needle::{CIRCULAR, NeedleView};
use crate::gauge::segmented::{DIGITAL_BAR, PEAK_COLOR, SegmentedView};
use crate::gauge::{GaugeSpec, Zone, fill, round_half_up};
use crate::telemetry::TelemetryReading;

/// Output format for `txdash status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            _ => Self::Table,
        }
    }
}

/// Width of a linear track drawn in the terminal.
const TRACK_WIDTH: usize = 40;

// ---------------------------------------------------------------------------
// txdash status
// ---------------------------------------------------------------------------

/// Fetch the latest reading from a running dashboard and print it.
pub fn run_status(base_url: &str, format: OutputFormat) -> Result<()> {
    let base = base_url.trim_end_matches('/');
    // "localhost" may resolve to IPv6 first while the server binds IPv4.
    let base = base.replace("://localhost", "://127.0.0.1");
    let url = format!("{base}/api/transmitter/data");

    let reading: TelemetryReading = match ureq::get(&url).timeout(Duration::from_secs(5)).call() {
        Ok(resp) => resp
            .into_json()
            .context("failed to parse transmitter data")?,
        Err(ureq::Error::Status(404, _)) => {
            println!("{}", "Loading transmitter data... (no reading stored yet)".yellow());
            return Ok(());
        }
        Err(e) => return Err(e).with_context(|| format!("failed to reach {url}")),
    };

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&reading)
                .context("failed to serialize transmitter data")?;
            println!("{json}");
        }
        OutputFormat::Table => print_reading(&reading)?,
    }
    Ok(())
}

fn print_reading(reading: &TelemetryReading) -> Result<()> {
    let banner = if reading.is_on_air {
        " ON AIR ".black().on_green().bold()
    } else {
        " OFF AIR ".black().on_white().bold()
    };
    println!("{banner}");
    println!();

    let forward = GaugeSpec::new(
        reading.forward_power,
        dashboard::FORWARD_POWER_RANGE.0,
        dashboard::FORWARD_POWER_RANGE.1,
        "Forward power",
        "W",
    )?;
    let reflected = GaugeSpec::new(
        reading.reflected_power,
        dashboard::REFLECTED_POWER_RANGE.0,
        dashboard::REFLECTED_POWER_RANGE.1,
        "Reflected power",
        "W",
    )?;
    let frequency = GaugeSpec::new(
        reading.frequency,
        dashboard::FREQUENCY_RANGE.0,
        dashboard::FREQUENCY_RANGE.1,
        "Frequency",
        " MHz",
    )?
    .with_scale_points(dashboard::FREQUENCY_POINTS.to_vec());
    let efficiency = GaugeSpec::new(reading.rf_efficiency, 0.0, 100.0, "RF efficiency", "%")?
        .with_scale_points(dashboard::EFFICIENCY_POINTS.to_vec());

    print_needle(&CIRCULAR.render(&forward));
    print_segmented(&DIGITAL_BAR.render(&forward, Vec::new()));
    print_segmented(&DIGITAL_BAR.render(&reflected, Vec::new()));
    print_linear(&fill::linear(&frequency, 2), "MHz");
    print_linear(&fill::linear(&efficiency, 1), "%");
    println!(
        "  {:<16} {}W",
        "Target power".yellow(),
        round_half_up(reading.target_power)
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// txdash designs
// ---------------------------------------------------------------------------

/// Print `value` over `[min, max]` in every meter design.
pub fn run_designs(value: f64, min: f64, max: f64) -> Result<()> {
    let gallery = dashboard::designs(value, min, max)?;

    println!(
        "{}",
        format!("Meter Designs ({min}..{max}, value {value})").bold().cyan()
    );
    println!("{}", "=".repeat(50));
    println!();

    println!("{}", "1. Classic analog".bold());
    print_needle(&gallery.classic_analog);
    println!("{}", "2. Digital bar".bold());
    print_segmented(&gallery.digital_bar);
    println!("{}", "3. Strip chart".bold());
    print_strip(&gallery.strip_chart);
    println!("{}", "4. Edgewise".bold());
    print_needle(&gallery.edgewise);
    println!("{}", "5. LCD".bold());
    println!("  {}", gallery.lcd.display.green().bold());
    println!();
    Ok(())
}

// ---------------------------------------------------------------------------
// txdash config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective txdash Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    // Show source info
    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    print_source("~/.txdash/config.toml", global_exists);
    print_source(".txdash.toml", project_exists);
    println!(
        "  {} {}",
        "·".dimmed(),
        "TXDASH_* environment variables".dimmed()
    );

    Ok(())
}

fn print_source(name: &str, exists: bool) {
    if exists {
        println!("  {} {}", "✓".green(), name.dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), format!("{name} (not found)").dimmed());
    }
}

/// Initialize a default config file at `~/.txdash/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    println!("  {}", "Edit the file to customize the dashboard.".dimmed());
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Terminal rendering
// ---------------------------------------------------------------------------

fn print_segmented(view: &SegmentedView) {
    println!(
        "  {:<16} {} {}",
        view.title.yellow(),
        segment_strip(view),
        view.display.bold()
    );
}

fn print_linear(view: &LinearView, unit: &str) {
    println!(
        "  {:<16} {} {} {}",
        view.title.yellow(),
        track(view.marker_percent, TRACK_WIDTH),
        view.display.bold(),
        unit
    );
}

fn print_strip(view: &StripChartView) {
    println!(
        "  {:<16} {} {}",
        view.title.yellow(),
        track(view.marker_percent, TRACK_WIDTH),
        view.display.bold()
    );
}

fn print_needle(view: &NeedleView) {
    println!(
        "  {:<16} needle {:>6.1}° tip ({:.1}, {:.1}) {}",
        view.title.yellow(),
        view.angle_deg,
        view.tip.x,
        view.tip.y,
        view.display.bold()
    );
}

/// One character per segment, colored like the dashboard draws it.
fn segment_strip(view: &SegmentedView) -> String {
    view.segments
        .iter()
        .map(|s| {
            if s.peak {
                paint("▮", PEAK_COLOR).to_string()
            } else if s.lit {
                paint("█", s.color).to_string()
            } else {
                "·".dimmed().to_string()
            }
        })
        .collect()
}

/// `width` cells with a marker at `percent`.
fn track(percent: f64, width: usize) -> String {
    let last = width.saturating_sub(1);
    let pos = ((percent.clamp(0.0, 100.0) / 100.0) * last as f64).round() as usize;
    (0..width)
        .map(|i| if i == pos { '|' } else { '─' })
        .collect::<String>()
}

fn paint(text: &str, color: &str) -> ColoredString {
    if color == Zone::Green.color() {
        text.green()
    } else if color == Zone::Yellow.color() {
        text.yellow()
    } else if color == Zone::Red.color() {
        text.red()
    } else if color == PEAK_COLOR {
        text.truecolor(0xff, 0x66, 0x00)
    } else {
        text.normal()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parsing() {
        assert_eq!(OutputFormat::from_str_opt(None), OutputFormat::Table);
        assert_eq!(OutputFormat::from_str_opt(Some("json")), OutputFormat::Json);
        assert_eq!(
            OutputFormat::from_str_opt(Some("unknown")),
            OutputFormat::Table
        );
    }

    #[test]
    fn track_places_marker() {
        assert_eq!(track(0.0, 5), "|────");
        assert_eq!(track(100.0, 5), "────|");
        assert_eq!(track(50.0, 5), "──|──");
        assert_eq!(track(250.0, 5), "────|");
        assert_eq!(track(50.0, 5).chars().count(), 5);
    }

    #[test]
    fn segment_strip_has_one_cell_per_segment() {
        colored::control::set_override(false);
        let spec = GaugeSpec::new(1000.0, 0.0, 2000.0, "Forward power", "W").unwrap();
        let strip = segment_strip(&DIGITAL_BAR.render(&spec, Vec::new()));
        assert_eq!(strip.chars().count(), 40);
        assert_eq!(strip.chars().filter(|&c| c == '█').count(), 20);
    }

    #[test]
    fn designs_reject_inverted_range() {
        assert!(run_designs(1.0, 5.0, 5.0).is_err());
    }
}
