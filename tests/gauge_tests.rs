/// Gauge renderer tests.
///
/// Exercises the public renderers the way the dashboard composes them:
/// needle meters, segmented bars, fills and the audio meter.
use txdash::gauge::audio::{self, AudioLevel};
use txdash::gauge::fill;
use txdash::gauge::needle::{CIRCULAR, CLASSIC_ANALOG, EDGEWISE};
use txdash::gauge::segmented::{DIGITAL_BAR, PEAK_COLOR, UNLIT_COLOR};
use txdash::gauge::{
    GaugeError, GaugeSpec, Zone, modulation_zone, normalize, snr_zone, temperature_zone, thd_zone,
};

fn power(value: f64) -> GaugeSpec {
    GaugeSpec::new(value, 0.0, 2000.0, "Forward Power", "W").unwrap()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

#[test]
fn normalize_clamps_and_handles_degenerate_domains() {
    assert_eq!(normalize(500.0, 0.0, 2000.0), 0.25);
    assert_eq!(normalize(-10.0, 0.0, 2000.0), 0.0);
    assert_eq!(normalize(2700.0, 0.0, 2000.0), 1.0);
    assert_eq!(normalize(5.0, 5.0, 5.0), 0.0);
    assert_eq!(normalize(f64::NAN, 0.0, 1.0), 0.0);
}

#[test]
fn normalize_is_monotonic_and_bounded() {
    let mut previous = f64::NEG_INFINITY;
    for step in -200..=1200 {
        let fraction = normalize(step as f64 * 2.5, 0.0, 2000.0);
        assert!((0.0..=1.0).contains(&fraction));
        assert!(fraction >= previous, "normalize decreased at step {step}");
        previous = fraction;
    }
}

#[test]
fn spec_rejects_empty_range() {
    assert_eq!(
        GaugeSpec::new(1.0, 10.0, 10.0, "x", "W").unwrap_err(),
        GaugeError::InvalidRange {
            min: 10.0,
            max: 10.0
        }
    );
    assert!(GaugeSpec::new(1.0, 0.0, f64::INFINITY, "x", "W").is_err());
}

// ---------------------------------------------------------------------------
// Needle meters
// ---------------------------------------------------------------------------

#[test]
fn circular_needle_points_up_at_midscale() {
    let view = CIRCULAR.render(&power(1000.0));
    assert_eq!(view.angle_deg, 0.0);
    assert!(close(view.tip.x, 230.0));
    assert!(close(view.tip.y, 140.0));
}

#[test]
fn needle_clamps_geometry_but_not_display() {
    let view = EDGEWISE.render(&power(2600.0));
    assert_eq!(view.angle_deg, 45.0);
    assert_eq!(view.display, "2600W");

    let view = EDGEWISE.render(&power(-100.0));
    assert_eq!(view.angle_deg, -45.0);
}

#[test]
fn needle_angles_sweep_monotonically() {
    for design in [CIRCULAR, CLASSIC_ANALOG, EDGEWISE] {
        let low = design.start_deg;
        let high = design.start_deg + design.sweep_deg;
        // Largest jump between neighbouring steps on a continuous sweep.
        let max_jump = design.sweep_deg * 2.5 / 2000.0 + 1e-9;
        let mut previous: Option<f64> = None;
        for step in -200..=1200 {
            let angle = design.render(&power(step as f64 * 2.5)).angle_deg;
            assert!(
                (low..=high).contains(&angle),
                "{} angle {angle} out of range",
                design.name
            );
            if let Some(prev) = previous {
                assert!(angle >= prev, "{} angle decreased at step {step}", design.name);
                assert!(angle - prev <= max_jump, "{} angle jumped at step {step}", design.name);
            }
            previous = Some(angle);
        }
        assert_eq!(previous, Some(high));
    }
}

#[test]
fn classic_analog_labels_every_major_tick() {
    let view = CLASSIC_ANALOG.render(&power(0.0));
    let labels: Vec<&str> = view.labels.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(
        labels,
        ["0", "200", "400", "600", "800", "1000", "1200", "1400", "1600", "1800", "2000"]
    );
    assert_eq!(view.ticks.iter().filter(|t| t.major).count(), 11);
}

// ---------------------------------------------------------------------------
// Segmented bars
// ---------------------------------------------------------------------------

#[test]
fn digital_bar_colors_by_segment_index() {
    let view = DIGITAL_BAR.render(&power(1500.0), Vec::new());
    assert_eq!(view.filled, 30);
    assert_eq!(view.segments.len(), 40);
    assert_eq!(view.segments[23].color, Zone::Green.color());
    assert_eq!(view.segments[24].color, Zone::Yellow.color());
    assert_eq!(view.segments[29].color, Zone::Yellow.color());
    assert_eq!(view.segments[30].color, UNLIT_COLOR);
    assert!(view.peak_segment.is_none());
}

#[test]
fn full_scale_lights_red_segments() {
    let view = DIGITAL_BAR.render(&power(2000.0), Vec::new());
    assert_eq!(view.filled, 40);
    assert_eq!(view.segments[39].color, Zone::Red.color());
}

// ---------------------------------------------------------------------------
// Audio meter
// ---------------------------------------------------------------------------

#[test]
fn audio_meter_draws_peak_above_level() {
    // -30 dB: floor(30/66 * 20) = 9 lit; peak -6 dB lands on segment 16.
    let view = audio::render("Left", AudioLevel::new(-30.0, Some(-6.0)));
    assert_eq!(view.filled, 9);
    assert_eq!(view.peak_segment, Some(16));
    assert_eq!(view.segments[16].color, PEAK_COLOR);
    assert_eq!(view.display, "-30.0 dB");
}

#[test]
fn audio_meter_hides_peak_inside_lit_region() {
    let view = audio::render("Right", AudioLevel::new(-6.0, Some(-30.0)));
    assert!(view.peak_segment.is_none());
    assert!(view.segments.iter().all(|s| !s.peak));
}

#[test]
fn audio_meter_without_peak_and_silence() {
    let view = audio::render("MPX", AudioLevel::new(-75.0, None));
    assert_eq!(view.filled, 0);
    assert_eq!(view.display, "-∞ dB");
    assert!(view.peak_segment.is_none());
}

// ---------------------------------------------------------------------------
// Fills
// ---------------------------------------------------------------------------

#[test]
fn strip_chart_has_fixed_bands() {
    let view = fill::strip_chart(&power(1500.0), 5);
    let widths: Vec<f64> = view.bands.iter().map(|b| b.width_percent).collect();
    assert_eq!(widths, [60.0, 20.0, 20.0]);
    assert_eq!(view.marker_percent, 75.0);
    assert_eq!(view.labels, ["0", "500", "1000", "1500", "2000"]);
}

#[test]
fn lcd_pads_to_four_digits() {
    assert_eq!(fill::lcd(&power(87.0), 5).display, "0087W");
    assert_eq!(fill::lcd(&power(1500.0), 5).display, "1500W");
}

#[test]
fn linear_gauge_defaults_to_six_points() {
    let spec = GaugeSpec::new(50.0, 0.0, 100.0, "Level", "%").unwrap();
    let view = fill::linear(&spec, 1);
    assert_eq!(view.scale, ["0", "20", "40", "60", "80", "100"]);
    assert_eq!(view.display, "50.0");
    assert_eq!(view.marker_percent, 50.0);
}

// ---------------------------------------------------------------------------
// Threshold colors
// ---------------------------------------------------------------------------

#[test]
fn threshold_zones() {
    assert_eq!(temperature_zone(30.0, 50.0), Zone::Green);
    assert_eq!(temperature_zone(40.0, 50.0), Zone::Yellow);
    assert_eq!(temperature_zone(45.0, 50.0), Zone::Red);

    assert_eq!(modulation_zone(40.0), Zone::Yellow);
    assert_eq!(modulation_zone(75.0), Zone::Green);
    assert_eq!(modulation_zone(90.0), Zone::Red);

    assert_eq!(snr_zone(42.0), Zone::Green);
    assert_eq!(snr_zone(30.0), Zone::Yellow);
    assert_eq!(snr_zone(20.0), Zone::Red);

    assert_eq!(thd_zone(0.1), Zone::Green);
    assert_eq!(thd_zone(0.2), Zone::Yellow);
    assert_eq!(thd_zone(0.5), Zone::Red);
}
