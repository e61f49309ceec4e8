use crate::geo::offset::{distance_meters, initial_bearing_degrees};
use crate::num_traits::NormalizeDegrees;
use crate::types::GeographicPoint;
use log::debug;

/// Provides the magnetic declination at a location.
///
/// The declination is the angle between true north and magnetic north, in degrees,
/// positive when magnetic north lies east of true north.
pub trait DeclinationSource: Send + Sync {
    /// Returns the declination at the given location, in degrees.
    fn declination(&self, location: &GeographicPoint) -> f32;
}

/// A constant declination, e.g. from a lookup performed elsewhere.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct FixedDeclination(pub f32);

impl DeclinationSource for FixedDeclination {
    fn declination(&self, _location: &GeographicPoint) -> f32 {
        self.0
    }
}

/// A tilted-dipole approximation of the geomagnetic field.
///
/// The horizontal field of a dipole points along the great circle towards the
/// geomagnetic north pole, so the declination is the initial bearing to the pole.
/// This is a coarse model: regional anomalies of the real field are not represented and
/// errors grow near the poles.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DipoleDeclination {
    /// The latitude of the geomagnetic north pole, in degrees.
    pub pole_latitude: f64,
    /// The longitude of the geomagnetic north pole, in degrees.
    pub pole_longitude: f64,
}

impl DipoleDeclination {
    /// Geomagnetic north pole latitude (IGRF, epoch 2025).
    pub const POLE_LATITUDE: f64 = 80.8;

    /// Geomagnetic north pole longitude (IGRF, epoch 2025).
    pub const POLE_LONGITUDE: f64 = -72.8;

    /// Initializes a new [`DipoleDeclination`] for the given pole position.
    pub const fn new(pole_latitude: f64, pole_longitude: f64) -> Self {
        Self {
            pole_latitude,
            pole_longitude,
        }
    }
}

impl Default for DipoleDeclination {
    fn default() -> Self {
        Self::new(Self::POLE_LATITUDE, Self::POLE_LONGITUDE)
    }
}

impl DeclinationSource for DipoleDeclination {
    fn declination(&self, location: &GeographicPoint) -> f32 {
        let pole = GeographicPoint::new(self.pole_latitude, self.pole_longitude, 0.0);
        (initial_bearing_degrees(location, &pole) as f32).wrap_180()
    }
}

/// Caches the declination and refreshes it once the observer moved far enough.
#[derive(Debug, Clone)]
pub struct DeclinationCache {
    refresh_meters: f64,
    anchor: Option<GeographicPoint>,
    value: f32,
}

impl DeclinationCache {
    /// Initializes a new, empty [`DeclinationCache`].
    ///
    /// ## Arguments
    /// * `refresh_meters` - The distance from the last lookup that triggers a new one.
    pub const fn new(refresh_meters: f64) -> Self {
        Self {
            refresh_meters,
            anchor: None,
            value: 0.0,
        }
    }

    /// Returns the cached declination, in degrees.
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Queries the source if no lookup happened yet or the observer moved beyond the
    /// refresh distance.
    ///
    /// Returns the new declination if it was refreshed.
    pub fn update(
        &mut self,
        source: &dyn DeclinationSource,
        location: &GeographicPoint,
    ) -> Option<f32> {
        if let Some(anchor) = &self.anchor {
            if distance_meters(anchor, location) < self.refresh_meters {
                return None;
            }
        }

        let declination = source.declination(location);
        if !declination.is_finite() {
            debug!("Ignoring non-finite declination at {location:?}");
            return None;
        }

        debug!(
            "Refreshed magnetic declination at ({:.5}, {:.5}): {declination:.2} degrees",
            location.latitude, location.longitude
        );
        self.anchor = Some(*location);
        self.value = declination;
        Some(declination)
    }
}
