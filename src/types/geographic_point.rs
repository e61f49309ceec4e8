/// A position on the Earth's surface.
///
/// An altitude of exactly [`GeographicPoint::UNKNOWN_ALTITUDE`] means the altitude is
/// not known; it is substituted by the observer's altitude before offsets are computed.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeographicPoint {
    /// The latitude, in degrees.
    pub latitude: f64,
    /// The longitude, in degrees.
    pub longitude: f64,
    /// The altitude above sea level, in meters.
    pub altitude: f64,
}

impl GeographicPoint {
    /// The altitude value that marks an unknown altitude.
    pub const UNKNOWN_ALTITUDE: f64 = 0.0;

    /// Initializes a new [`GeographicPoint`] instance.
    ///
    /// ## Arguments
    /// * `latitude` - The latitude, in degrees.
    /// * `longitude` - The longitude, in degrees.
    /// * `altitude` - The altitude, in meters; `0.0` if unknown.
    #[inline(always)]
    pub const fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
        }
    }

    /// Determines whether the altitude is known, i.e. not the sentinel value.
    #[inline]
    pub fn has_known_altitude(&self) -> bool {
        self.altitude != Self::UNKNOWN_ALTITUDE
    }

    /// Determines whether all coordinates are finite numbers.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite() && self.altitude.is_finite()
    }
}
