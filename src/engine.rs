//! Wires sensor fusion, attitude, markers and the camera together for a producer thread
//! delivering sensor samples and a render thread consuming frames.

use crate::attitude::AttitudeCalculator;
use crate::camera::CameraModel;
use crate::config::OverlayConfig;
use crate::error::Result;
use crate::geo::{DeclinationCache, DeclinationSource, DipoleDeclination};
use crate::marker::{MarkerRegistry, MarkerSpec, RadarView, RenderItem, ScreenSize};
use crate::orientation::OrientationTracker;
use crate::types::{
    Attitude, GeographicPoint, GravityReading, MagneticReading, Matrix3, ScreenOrientation,
    Vector3,
};
use log::{debug, info, trace, warn};
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};

/// A smoothed rotation as published by the sensor side.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RotationSnapshot {
    /// The rotation from world into camera space.
    pub rotation: Matrix3<f32>,
    /// Incremented with every published rotation; `0` before the first one.
    pub sequence: u64,
}

impl Default for RotationSnapshot {
    fn default() -> Self {
        Self {
            rotation: Matrix3::identity(),
            sequence: 0,
        }
    }
}

/// The output of a single rendered frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// The sequence number of the rotation the frame was rendered with.
    pub sequence: u64,
    pub attitude: Attitude<f32>,
    /// The visible markers, farthest first.
    pub items: Vec<RenderItem>,
    pub radar: RadarView,
}

/// The overlay engine.
///
/// All methods take `&self`; the engine can be shared between the sensor thread, the
/// location and marker feeds and the render thread.
pub struct OverlayEngine {
    config: OverlayConfig,
    tracker: Mutex<OrientationTracker>,
    snapshot: RwLock<RotationSnapshot>,
    attitude: Mutex<AttitudeCalculator>,
    camera: Mutex<CameraModel>,
    screen_orientation: RwLock<ScreenOrientation>,
    observer: RwLock<Option<GeographicPoint>>,
    declination_source: Box<dyn DeclinationSource>,
    declination: Mutex<DeclinationCache>,
    markers: MarkerRegistry,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl OverlayEngine {
    /// Initializes a new engine using the [`DipoleDeclination`] model.
    ///
    /// ## Arguments
    /// * `config` - The engine configuration.
    /// * `width` - The view width, in pixels.
    /// * `height` - The view height, in pixels.
    ///
    /// ## Errors
    /// Returns [`OverlayError::InvalidConfig`](crate::OverlayError::InvalidConfig) if the
    /// configuration or the view size is invalid.
    pub fn new(config: OverlayConfig, width: f32, height: f32) -> Result<Self> {
        Self::with_declination_source(config, width, height, DipoleDeclination::default())
    }

    /// Initializes a new engine using the given declination source.
    pub fn with_declination_source<S>(
        config: OverlayConfig,
        width: f32,
        height: f32,
        declination_source: S,
    ) -> Result<Self>
    where
        S: DeclinationSource + 'static,
    {
        config.validate()?;

        let tracker = OrientationTracker::new(
            config.history_capacity,
            config.sample_accept_rate,
            config.low_pass_inputs,
        )?;
        let attitude = AttitudeCalculator::new(config.attitude_smoothing)?;
        let camera = CameraModel::new(width, height, config.view_angle_radians)?;

        info!(
            "Overlay engine created for {width}x{height} px, radar range {} m",
            config.radar_range_meters
        );

        Ok(Self {
            declination: Mutex::new(DeclinationCache::new(config.declination_refresh_meters)),
            tracker: Mutex::new(tracker),
            snapshot: RwLock::new(RotationSnapshot::default()),
            attitude: Mutex::new(attitude),
            camera: Mutex::new(camera),
            screen_orientation: RwLock::new(ScreenOrientation::default()),
            observer: RwLock::new(None),
            declination_source: Box::new(declination_source),
            markers: MarkerRegistry::new(),
            config,
        })
    }

    /// The engine configuration.
    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// The marker collection.
    pub fn markers(&self) -> &MarkerRegistry {
        &self.markers
    }

    /// Feeds a pair of sensor samples into the orientation tracker.
    ///
    /// Returns the newly published snapshot, or `None` if the sample was skipped by rate
    /// limiting or rejected. Rejected samples are logged and leave the last published
    /// rotation in place.
    pub fn on_sensor_sample(
        &self,
        gravity: &GravityReading<f32>,
        magnetic: &MagneticReading<f32>,
    ) -> Option<RotationSnapshot> {
        let rotation = match lock(&self.tracker).update(gravity, magnetic) {
            Ok(Some(rotation)) => rotation,
            Ok(None) => return None,
            Err(e) => {
                debug!("Rejected sensor sample: {e}");
                return None;
            }
        };

        let mut snapshot = self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        snapshot.rotation = rotation;
        snapshot.sequence = snapshot.sequence.wrapping_add(1);
        Some(*snapshot)
    }

    /// Feeds raw gravity and magnetic field vectors into the orientation tracker.
    pub fn on_raw_sample(&self, gravity: [f32; 3], magnetic: [f32; 3]) -> Option<RotationSnapshot> {
        self.on_sensor_sample(&gravity.into(), &magnetic.into())
    }

    /// Returns the most recently published rotation.
    pub fn latest_rotation(&self) -> RotationSnapshot {
        *self.snapshot.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sets the orientation in which the camera preview is presented.
    pub fn set_screen_orientation(&self, orientation: ScreenOrientation) {
        *self
            .screen_orientation
            .write()
            .unwrap_or_else(PoisonError::into_inner) = orientation;
    }

    /// The orientation in which the camera preview is presented.
    pub fn screen_orientation(&self) -> ScreenOrientation {
        *self
            .screen_orientation
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Updates the observer location.
    ///
    /// Refreshes the magnetic declination if the observer moved far enough and places all
    /// markers relative to the new location. Non-finite locations are ignored.
    pub fn update_location(&self, observer: GeographicPoint) {
        if !observer.is_finite() {
            warn!("Ignoring non-finite observer location {observer:?}");
            return;
        }

        let refreshed = lock(&self.declination).update(self.declination_source.as_ref(), &observer);
        if let Some(declination) = refreshed {
            lock(&self.tracker).set_declination(declination);
        }

        // Ingestion reads the observer under the same lock.
        let mut current = self.observer.write().unwrap_or_else(PoisonError::into_inner);
        *current = Some(observer);
        self.markers
            .update_location(&observer, self.config.radar_range_meters);
    }

    /// The last known observer location.
    pub fn observer(&self) -> Option<GeographicPoint> {
        *self.observer.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Overrides the magnetic declination, e.g. with a value from an external
    /// geomagnetic model. It stays in effect until the next refresh.
    pub fn set_declination(&self, declination: f32) {
        if !declination.is_finite() {
            warn!("Ignoring non-finite declination {declination}");
            return;
        }
        lock(&self.tracker).set_declination(declination);
    }

    /// The magnetic declination applied to sensor samples, in degrees.
    pub fn declination(&self) -> f32 {
        lock(&self.tracker).declination()
    }

    /// Adds or replaces markers; names are unique, the last ingested marker wins.
    ///
    /// Returns the number of ingested markers.
    pub fn ingest_markers(&self, specs: impl IntoIterator<Item = MarkerSpec>) -> usize {
        let observer = self.observer.read().unwrap_or_else(PoisonError::into_inner);
        self.markers
            .ingest(specs, observer.as_ref(), self.config.radar_range_meters)
    }

    /// Removes a marker by name.
    pub fn remove_marker(&self, name: &str) -> bool {
        self.markers.remove(name)
    }

    /// Sets the on-screen sizes of a marker's icon and label as measured by the renderer.
    pub fn set_marker_footprint(&self, name: &str, icon: ScreenSize, label: ScreenSize) -> bool {
        self.markers.set_footprint(name, icon, label)
    }

    /// Changes the view size.
    ///
    /// ## Errors
    /// Returns [`OverlayError::InvalidConfig`](crate::OverlayError::InvalidConfig) if a
    /// dimension is not positive; the previous size is kept.
    pub fn resize(&self, width: f32, height: f32) -> Result<()> {
        lock(&self.camera).resize(width, height)?;
        debug!("View resized to {width}x{height} px");
        Ok(())
    }

    /// Renders a frame from the latest published rotation.
    pub fn render_frame(&self) -> Frame {
        let snapshot = self.latest_rotation();
        let attitude = lock(&self.attitude).compute(&snapshot.rotation, self.screen_orientation());

        {
            let mut camera = lock(&self.camera);
            camera.set_frame(snapshot.rotation, Vector3::new(0.0, 0.0, 0.0));
            self.markers.update_frame(
                &camera,
                self.config.label_lift_meters,
                self.config.radar_range_meters,
                self.config.collision_detection,
            );
        }

        let items = self.markers.render_items();
        let radar = self
            .markers
            .radar_view(self.config.radar_range_meters, attitude.azimuth);

        trace!(
            "Frame {}: azimuth {:.1}, pitch {:.1}, roll {:.1}, {} visible markers",
            snapshot.sequence,
            attitude.azimuth,
            attitude.pitch,
            attitude.roll,
            items.len()
        );

        Frame {
            sequence: snapshot.sequence,
            attitude,
            items,
            radar,
        }
    }

    /// Returns the name of the nearest marker at the screen point, as of the last frame.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<String> {
        self.markers.hit_test(x, y)
    }

    /// Discards the orientation history and the attitude smoothing.
    pub fn reset_orientation(&self) {
        lock(&self.tracker).reset();
        lock(&self.attitude).reset();
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) =
            RotationSnapshot::default();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geo::FixedDeclination;
    use approx::assert_abs_diff_eq;
    use std::sync::Arc;

    fn engine(config: OverlayConfig) -> OverlayEngine {
        OverlayEngine::with_declination_source(config, 800.0, 600.0, FixedDeclination(0.0))
            .unwrap()
    }

    // Device held in landscape, facing east: x up, y north, z west.
    fn facing_east() -> (GravityReading<f32>, MagneticReading<f32>) {
        (
            GravityReading::new(9.81, 0.0, 0.0),
            MagneticReading::new(-40.0, 20.0, 0.0),
        )
    }

    #[test]
    fn test_invalid_config_fails_construction() {
        let config = OverlayConfig {
            history_capacity: 0,
            ..Default::default()
        };
        assert!(OverlayEngine::new(config, 800.0, 600.0).is_err());
        assert!(OverlayEngine::new(OverlayConfig::default(), 0.0, 600.0).is_err());
    }

    #[test]
    fn test_rate_limited_publishing() {
        let engine = engine(OverlayConfig {
            sample_accept_rate: 3,
            ..Default::default()
        });
        let (gravity, magnetic) = facing_east();

        let published: Vec<_> = (0..6)
            .map(|_| engine.on_sensor_sample(&gravity, &magnetic))
            .collect();
        assert!(published[0].is_some());
        assert!(published[1].is_none() && published[2].is_none());
        assert_eq!(published[3].map(|s| s.sequence), Some(2));
        assert_eq!(engine.latest_rotation().sequence, 2);
    }

    #[test]
    fn test_degenerate_sample_keeps_last_rotation() {
        for low_pass_inputs in [false, true] {
            let engine = engine(OverlayConfig {
                sample_accept_rate: 1,
                history_capacity: 1,
                low_pass_inputs,
                ..Default::default()
            });
            let (gravity, magnetic) = facing_east();
            let published = engine.on_sensor_sample(&gravity, &magnetic).unwrap();

            assert!(engine.on_raw_sample([0.0, 0.0, 0.0], magnetic.into()).is_none());
            assert!(engine.on_raw_sample(gravity.into(), [0.0, 0.0, 0.0]).is_none());
            assert_eq!(engine.latest_rotation(), published);

            let next = engine.on_sensor_sample(&gravity, &magnetic).unwrap();
            assert_eq!(next.sequence, 2);
            assert!(next.rotation.max_abs_diff(&published.rotation) < 1e-6);
        }
    }

    #[test]
    fn test_frame_reports_azimuth_and_markers() {
        let engine = engine(OverlayConfig {
            sample_accept_rate: 1,
            history_capacity: 1,
            attitude_smoothing: crate::attitude::AttitudeSmoothing::None,
            low_pass_inputs: false,
            ..Default::default()
        });

        let observer = GeographicPoint::new(0.0, 0.0, 100.0);
        engine.update_location(observer);
        engine.ingest_markers([
            MarkerSpec::new("east", GeographicPoint::new(0.0, 0.01, 0.0), 1),
            MarkerSpec::new("west", GeographicPoint::new(0.0, -0.01, 0.0), 2),
        ]);

        let (gravity, magnetic) = facing_east();
        engine.on_sensor_sample(&gravity, &magnetic).unwrap();

        let frame = engine.render_frame();
        assert_eq!(frame.sequence, 1);
        assert_abs_diff_eq!(frame.attitude.azimuth, 90.0, epsilon = 1e-2);

        let names: Vec<&str> = frame.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["east"]);
        assert_abs_diff_eq!(frame.items[0].icon.x, 400.0, epsilon = 0.5);
        assert_eq!(frame.radar.blips.len(), 1);

        assert_eq!(engine.hit_test(400.0, 300.0).as_deref(), Some("east"));
    }

    #[test]
    fn test_declination_refresh_on_move() {
        let engine = OverlayEngine::with_declination_source(
            OverlayConfig::default(),
            800.0,
            600.0,
            FixedDeclination(7.5),
        )
        .unwrap();
        assert_eq!(engine.declination(), 0.0);

        engine.update_location(GeographicPoint::new(48.0, 11.0, 500.0));
        assert_eq!(engine.declination(), 7.5);

        engine.set_declination(2.0);
        engine.update_location(GeographicPoint::new(48.001, 11.0, 500.0));
        // Moved less than the refresh distance.
        assert_eq!(engine.declination(), 2.0);

        engine.update_location(GeographicPoint::new(49.0, 11.0, 500.0));
        assert_eq!(engine.declination(), 7.5);
    }

    #[test]
    fn test_non_finite_location_is_ignored() {
        let engine = engine(OverlayConfig::default());
        engine.update_location(GeographicPoint::new(f64::NAN, 0.0, 0.0));
        assert_eq!(engine.observer(), None);
    }

    #[test]
    fn test_producer_and_consumer_threads() {
        let engine = Arc::new(engine(OverlayConfig {
            sample_accept_rate: 1,
            ..Default::default()
        }));

        let producer = {
            let engine = Arc::clone(&engine);
            std::thread::spawn(move || {
                let (gravity, magnetic) = facing_east();
                for _ in 0..200 {
                    engine.on_sensor_sample(&gravity, &magnetic);
                }
            })
        };

        let mut last_sequence = 0;
        for _ in 0..50 {
            let frame = engine.render_frame();
            assert!(frame.sequence >= last_sequence);
            assert!((0.0..360.0).contains(&frame.attitude.azimuth));
            last_sequence = frame.sequence;
        }

        producer.join().unwrap();
        assert_eq!(engine.latest_rotation().sequence, 200);
    }

    #[test]
    fn test_ingestion_during_location_updates() {
        let engine = Arc::new(engine(OverlayConfig::default()));
        let start = GeographicPoint::new(48.0, 11.0, 500.0);
        let end = GeographicPoint::new(start.latitude + 0.001 * 50.0, 11.0, 500.0);
        engine.update_location(start);

        let mover = {
            let engine = Arc::clone(&engine);
            std::thread::spawn(move || {
                for step in 1..=50 {
                    let latitude = start.latitude + 0.001 * f64::from(step);
                    engine.update_location(GeographicPoint::new(latitude, 11.0, 500.0));
                }
            })
        };

        for i in 0..50 {
            let location = GeographicPoint::new(48.2, 11.0 + 0.001 * f64::from(i), 0.0);
            engine.ingest_markers([MarkerSpec::new(format!("marker-{i}"), location, 0)]);
        }
        mover.join().unwrap();

        assert_eq!(engine.observer(), Some(end));
        for i in 0..50 {
            let marker = engine.markers().get(&format!("marker-{i}")).unwrap();
            let expected = crate::geo::distance_meters(&end, &marker.spec().location);
            assert_abs_diff_eq!(marker.distance(), expected, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_reset_orientation() {
        let engine = engine(OverlayConfig {
            sample_accept_rate: 1,
            ..Default::default()
        });
        let (gravity, magnetic) = facing_east();
        engine.on_sensor_sample(&gravity, &magnetic);
        engine.reset_orientation();
        assert_eq!(engine.latest_rotation(), RotationSnapshot::default());
    }

    #[test]
    fn test_screen_orientation() {
        let engine = engine(OverlayConfig::default());
        assert_eq!(engine.screen_orientation(), ScreenOrientation::Landscape);
        engine.set_screen_orientation(ScreenOrientation::Portrait);
        assert_eq!(engine.screen_orientation(), ScreenOrientation::Portrait);
        assert!(engine.resize(1024.0, 768.0).is_ok());
        assert!(engine.resize(-1.0, 768.0).is_err());
    }
}
