//! Dashboard composition.
//!
//! Turns the latest telemetry reading and the generator snapshots into one
//! serializable view of every gauge on the page.

use serde::Serialize;

use crate::config::schema::DeviceConfig;
use crate::gauge::audio;
use crate::gauge::fill::{self, BarView, LcdView, LinearView, StripChartView};
use crate::gauge::needle::{self, NeedleView};
use crate::gauge::segmented::{DIGITAL_BAR, SegmentedView};
use crate::gauge::{
    GaugeError, GaugeSpec, Zone, modulation_zone, round_half_up, snr_zone, temperature_zone,
    thd_zone,
};
use crate::simulation::modulation::waveform_points;
use crate::simulation::{ModulationSnapshot, PilotStatus, Snapshots, Temperatures};
use crate::telemetry::TelemetryReading;

/// Forward power domain (W).
pub const FORWARD_POWER_RANGE: (f64, f64) = (0.0, 2000.0);
/// Reflected power domain (W).
pub const REFLECTED_POWER_RANGE: (f64, f64) = (0.0, 320.0);
/// FM broadcast band (MHz).
pub const FREQUENCY_RANGE: (f64, f64) = (88.0, 108.0);
pub const FREQUENCY_POINTS: [f64; 6] = [88.0, 92.0, 96.0, 100.0, 104.0, 108.0];
pub const EFFICIENCY_POINTS: [f64; 5] = [0.0, 25.0, 50.0, 75.0, 100.0];

/// Bar scales for the temperature monitor, as (title, max, unit, labels).
const TEMPERATURE_BARS: [(&str, f64, &str, &[&str]); 4] = [
    ("RF Max Temperature", 50.0, "°C", &["0°C", "25°C", "45°C", "50°C"]),
    ("PSU Max Temperature", 60.0, "°C", &["0°C", "30°C", "50°C", "60°C"]),
    ("Environment", 35.0, "°C", &["0°C", "15°C", "30°C", "35°C"]),
    ("Fan Speed", 100.0, "%", &["0%", "25%", "50%", "75%", "100%"]),
];

/// Full scale of the cooling fan RPM bar.
const FAN_RPM_MAX: f64 = 3000.0;

/// Audio sources the device can switch between, with their badge colors.
const AUDIO_SOURCES: [(&str, &str); 3] = [
    ("AES", "#2563eb"),
    ("SATELLITE", "#9333ea"),
    ("STEREO", "#16a34a"),
];
const UNKNOWN_SOURCE_COLOR: &str = "#4b5563";

/// Waveform display box.
const WAVEFORM_WIDTH: f64 = 300.0;
const WAVEFORM_MID_Y: f64 = 32.0;
const WAVEFORM_AMPLITUDE: f64 = 26.0;

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// One row of the "Main data" panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataRow {
    pub label: &'static str,
    pub value: String,
    pub unit: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    pub on_air: bool,
    pub text: &'static str,
}

impl Banner {
    fn for_reading(on_air: bool) -> Self {
        Self {
            on_air,
            text: if on_air { "ON AIR" } else { "OFF AIR" },
        }
    }
}

/// A labelled figure with its threshold zone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub display: String,
    pub zone: Zone,
    pub color: &'static str,
}

impl Figure {
    fn new(display: String, zone: Zone) -> Self {
        Self {
            display,
            zone,
            color: zone.color(),
        }
    }
}

/// The FM demodulation panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FmPanel {
    /// SVG polyline `points` attribute for the waveform.
    pub waveform_path: String,
    pub modulation_depth: Figure,
    pub carrier: String,
    pub snr: Figure,
    pub thd: Figure,
    pub pilot: Figure,
}

/// One lamp in the audio source indicator row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceLamp {
    pub name: &'static str,
    pub active: bool,
    pub color: &'static str,
}

/// Device status and info panels: the static profile plus the live fan
/// speed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DevicePanel {
    pub site_name: String,
    pub model: String,
    pub firmware: String,
    pub audio_software: String,
    pub status: String,
    pub audio_source: String,
    pub audio_source_color: &'static str,
    pub source_lamps: Vec<SourceLamp>,
    pub fan_rpm: u32,
    pub fan_rpm_percent: f64,
}

impl DevicePanel {
    fn new(device: &DeviceConfig, fan_rpm: u32) -> Self {
        let source = device.audio_source.as_str();
        let audio_source_color = AUDIO_SOURCES
            .iter()
            .find(|(name, _)| *name == source)
            .map_or(UNKNOWN_SOURCE_COLOR, |&(_, color)| color);
        let source_lamps = AUDIO_SOURCES
            .iter()
            .map(|&(name, color)| SourceLamp {
                name,
                active: name == source,
                color: if name == source { color } else { UNKNOWN_SOURCE_COLOR },
            })
            .collect();
        Self {
            site_name: device.site_name.clone(),
            model: device.model.clone(),
            firmware: device.firmware.clone(),
            audio_software: device.audio_software.clone(),
            status: device.status.clone(),
            audio_source: device.audio_source.clone(),
            audio_source_color,
            source_lamps,
            fan_rpm,
            fan_rpm_percent: fill::fill_percent(f64::from(fan_rpm), 0.0, FAN_RPM_MAX),
        }
    }
}

/// Everything derived from the stored reading. Absent while loading.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingView {
    pub reading: TelemetryReading,
    pub banner: Banner,
    pub forward_power: SegmentedView,
    pub reflected_power: SegmentedView,
    pub frequency: LinearView,
    pub rf_efficiency: LinearView,
    pub main_data: Vec<DataRow>,
}

/// The whole dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    /// True until the store holds a reading.
    pub loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telemetry: Option<ReadingView>,
    pub audio: Vec<SegmentedView>,
    pub temperatures: Vec<BarView>,
    pub fm: FmPanel,
    pub device: DevicePanel,
}

impl DashboardView {
    /// Compose the dashboard from the latest reading (if any) and the
    /// current generator snapshots.
    pub fn build(
        reading: Option<TelemetryReading>,
        snapshots: &Snapshots,
        device: &DeviceConfig,
    ) -> Result<Self, GaugeError> {
        let telemetry = reading.map(reading_view).transpose()?;
        Ok(Self {
            loading: telemetry.is_none(),
            telemetry,
            audio: vec![
                audio::render("L (Left)", snapshots.audio.left),
                audio::render("R (Right)", snapshots.audio.right),
                audio::render("Mpx (Multiplex)", snapshots.audio.mpx),
            ],
            temperatures: temperature_bars(&snapshots.temperatures)?,
            fm: fm_panel(&snapshots.modulation),
            device: DevicePanel::new(device, snapshots.temperatures.fan_rpm),
        })
    }
}

fn reading_view(reading: TelemetryReading) -> Result<ReadingView, GaugeError> {
    let forward = GaugeSpec::new(
        reading.forward_power,
        FORWARD_POWER_RANGE.0,
        FORWARD_POWER_RANGE.1,
        "Forward power",
        "W",
    )?;
    let reflected = GaugeSpec::new(
        reading.reflected_power,
        REFLECTED_POWER_RANGE.0,
        REFLECTED_POWER_RANGE.1,
        "Reflected power",
        "W",
    )?;
    let frequency = GaugeSpec::new(
        reading.frequency,
        FREQUENCY_RANGE.0,
        FREQUENCY_RANGE.1,
        "Frequency",
        "MHz",
    )?
    .with_scale_points(FREQUENCY_POINTS.to_vec());
    let efficiency = GaugeSpec::new(reading.rf_efficiency, 0.0, 100.0, "RF Efficiency", "%")?
        .with_scale_points(EFFICIENCY_POINTS.to_vec());

    let main_data = vec![
        DataRow {
            label: "Forward power",
            value: round_half_up(reading.forward_power).to_string(),
            unit: "W",
        },
        DataRow {
            label: "Reflected power",
            value: round_half_up(reading.reflected_power).to_string(),
            unit: "W",
        },
        DataRow {
            label: "Target power",
            value: round_half_up(reading.target_power).to_string(),
            unit: "W",
        },
        DataRow {
            label: "Frequency",
            value: format!("{:.2}", reading.frequency),
            unit: "MHz",
        },
        DataRow {
            label: "RF efficiency",
            value: format!("{:.1}", reading.rf_efficiency),
            unit: "%",
        },
    ];

    Ok(ReadingView {
        banner: Banner::for_reading(reading.is_on_air),
        forward_power: DIGITAL_BAR.render(&forward, fill::scale_labels(0.0, 2000.0, 5)),
        reflected_power: DIGITAL_BAR.render(&reflected, fill::scale_labels(0.0, 320.0, 5)),
        frequency: fill::linear(&frequency, 2),
        rf_efficiency: fill::linear(&efficiency, 1),
        main_data,
        reading,
    })
}

fn temperature_bars(t: &Temperatures) -> Result<Vec<BarView>, GaugeError> {
    let values = [t.rf_max, t.psu_max, t.environment, t.fan_speed];
    TEMPERATURE_BARS
        .iter()
        .zip(values)
        .map(|(&(title, max, unit, labels), value)| -> Result<BarView, GaugeError> {
            let spec = GaugeSpec::new(value, 0.0, max, title, unit)?;
            let display = if unit == "%" {
                format!("{}{unit}", round_half_up(value))
            } else {
                format!("{value:.1}{unit}")
            };
            let labels = labels.iter().map(|l| l.to_string()).collect();
            Ok(fill::bar(&spec, temperature_zone(value, max), display, labels))
        })
        .collect()
}

fn fm_panel(m: &ModulationSnapshot) -> FmPanel {
    let points = waveform_points(&m.waveform, WAVEFORM_WIDTH, WAVEFORM_MID_Y, WAVEFORM_AMPLITUDE);
    let waveform_path = points
        .iter()
        .map(|p| format!("{:.1},{:.1}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ");
    let pilot_zone = match m.pilot {
        PilotStatus::Ok => Zone::Green,
        PilotStatus::Weak => Zone::Yellow,
    };
    FmPanel {
        waveform_path,
        modulation_depth: Figure::new(
            format!("{}%", m.modulation_depth),
            modulation_zone(f64::from(m.modulation_depth)),
        ),
        carrier: format!("{:.2} MHz", m.carrier_mhz),
        snr: Figure::new(format!("{}dB", m.snr_db), snr_zone(f64::from(m.snr_db))),
        thd: Figure::new(format!("{}%", m.thd_pct), thd_zone(m.thd_pct)),
        pilot: Figure::new(m.pilot.to_string(), pilot_zone),
    }
}

// ---------------------------------------------------------------------------
// Meter design gallery
// ---------------------------------------------------------------------------

/// One value rendered in every meter design.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignGallery {
    pub value: f64,
    pub min: f64,
    pub max: f64,
    pub classic_analog: NeedleView,
    pub digital_bar: SegmentedView,
    pub strip_chart: StripChartView,
    pub edgewise: NeedleView,
    pub lcd: LcdView,
}

/// Render `value` in the five meter designs over `[min, max]`.
pub fn designs(value: f64, min: f64, max: f64) -> Result<DesignGallery, GaugeError> {
    let spec = GaugeSpec::new(value, min, max, "Forward Power", "W")?;
    Ok(DesignGallery {
        value,
        min,
        max,
        classic_analog: needle::CLASSIC_ANALOG.render(&spec),
        digital_bar: DIGITAL_BAR.render(&spec, fill::scale_labels(min, max, 5)),
        strip_chart: fill::strip_chart(&spec, 5),
        edgewise: needle::EDGEWISE.render(&spec),
        lcd: fill::lcd(&spec, 5),
    })
}
