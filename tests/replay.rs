use csv::ReaderBuilder;
use geo_overlay::attitude::AttitudeSmoothing;
use geo_overlay::types::{GravityReading, MagneticReading};
use geo_overlay::{NormalizeDegrees, OverlayConfig, OverlayEngine};
use serde::Deserialize;
use std::error::Error;

/// A device held in landscape, facing north for four seconds, turning east over the
/// next four seconds and facing east for the remaining four; sampled at 50 Hz.
const TRACE: &str = "tests/data/landscape-turn-east.csv";

/// One row of a recorded sensor trace.
#[derive(Debug, Deserialize)]
struct TraceRow {
    /// The sample time, in seconds since the start of the recording.
    #[allow(dead_code)]
    time: f64,
    gravity_x: f32,
    gravity_y: f32,
    gravity_z: f32,
    magnetic_x: f32,
    magnetic_y: f32,
    magnetic_z: f32,
}

impl TraceRow {
    fn gravity(&self) -> GravityReading<f32> {
        GravityReading::new(self.gravity_x, self.gravity_y, self.gravity_z)
    }

    fn magnetic(&self) -> MagneticReading<f32> {
        MagneticReading::new(self.magnetic_x, self.magnetic_y, self.magnetic_z)
    }
}

fn read_trace(path: &str) -> Result<Vec<TraceRow>, Box<dyn Error>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Replays the trace and returns the azimuth after the north and after the east segment.
fn replay(config: OverlayConfig) -> (f32, f32) {
    init_logging();
    let rows = read_trace(TRACE).expect("failed to read trace");
    assert_eq!(rows.len(), 600);

    let engine = OverlayEngine::new(config, 800.0, 600.0).unwrap();
    let mut facing_north = None;
    for (index, row) in rows.iter().enumerate() {
        if engine.on_sensor_sample(&row.gravity(), &row.magnetic()).is_some() {
            engine.render_frame();
        }
        if index == 199 {
            facing_north = Some(engine.render_frame().attitude.azimuth);
        }
    }

    let facing_east = engine.render_frame().attitude.azimuth;
    (facing_north.unwrap(), facing_east)
}

#[test]
fn replay_without_prefilter_tracks_heading() {
    let (north, east) = replay(OverlayConfig {
        history_capacity: 10,
        low_pass_inputs: false,
        attitude_smoothing: AttitudeSmoothing::None,
        ..Default::default()
    });

    assert!(north.wrap_180().abs() < 2.0, "azimuth facing north was {north}");
    assert!((east - 90.0).abs() < 2.0, "azimuth facing east was {east}");
}

#[test]
fn replay_with_prefilter_lags_behind() {
    let (north, east) = replay(OverlayConfig {
        history_capacity: 10,
        ..Default::default()
    });

    assert!(north.wrap_180().abs() < 2.0, "azimuth facing north was {north}");
    // Slow turns stay within the steady band of the magnetometer pre-filter.
    assert!(east > 83.0 && east < 90.5, "azimuth facing east was {east}");
}

#[test]
fn replay_keeps_pitch_and_roll_level() {
    init_logging();
    let rows = read_trace(TRACE).unwrap();
    let engine = OverlayEngine::new(OverlayConfig::default(), 800.0, 600.0).unwrap();

    for row in &rows {
        engine.on_sensor_sample(&row.gravity(), &row.magnetic());
        let attitude = engine.render_frame().attitude;
        assert!((0.0..360.0).contains(&attitude.azimuth));
        assert!(attitude.pitch.abs() < 3.0, "pitch was {}", attitude.pitch);
        assert!(attitude.roll.abs() < 3.0, "roll was {}", attitude.roll);
    }

    assert_eq!(engine.latest_rotation().sequence, 60);
}
