use crate::error::{OverlayError, Result};
use crate::types::{GeographicPoint, Vector3};

/// The mean Earth radius, in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Calculates the great-circle distance between two points using the haversine formula.
///
/// Altitudes are ignored.
pub fn distance_meters(from: &GeographicPoint, to: &GeographicPoint) -> f64 {
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + from.latitude.to_radians().cos()
            * to.latitude.to_radians().cos()
            * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).max(0.0).sqrt());
    EARTH_RADIUS_METERS * c
}

/// Calculates the initial great-circle bearing from one point to another.
///
/// Returns degrees clockwise from true north, in `[0, 360)`.
pub fn initial_bearing_degrees(from: &GeographicPoint, to: &GeographicPoint) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();

    let y = d_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();
    y.atan2(x).to_degrees().rem_euclid(360.0)
}

/// Replaces an unknown target altitude with the observer's altitude.
pub fn with_known_altitude(target: &GeographicPoint, observer: &GeographicPoint) -> GeographicPoint {
    if target.has_known_altitude() {
        *target
    } else {
        GeographicPoint {
            altitude: observer.altitude,
            ..*target
        }
    }
}

/// Converts a target position into an offset from the observer.
///
/// The offset is expressed in meters in the world frame: `x` east, `y` up, and `z`
/// pointing south, so points to the north have a negative `z`.
///
/// ## Arguments
/// * `observer` - The observer location.
/// * `target` - The target location; an unknown altitude is replaced by the observer's.
///
/// ## Errors
/// Returns [`OverlayError::MissingLocation`] if either location is absent.
pub fn relative_offset(
    observer: Option<&GeographicPoint>,
    target: Option<&GeographicPoint>,
) -> Result<Vector3<f32>> {
    let (Some(observer), Some(target)) = (observer, target) else {
        return Err(OverlayError::MissingLocation);
    };

    let target = with_known_altitude(target, observer);

    let along_meridian = GeographicPoint::new(target.latitude, observer.longitude, 0.0);
    let mut north_south = distance_meters(observer, &along_meridian);
    if observer.latitude < target.latitude {
        north_south = -north_south;
    }

    let along_parallel = GeographicPoint::new(observer.latitude, target.longitude, 0.0);
    let mut east_west = distance_meters(observer, &along_parallel);
    if observer.longitude > target.longitude {
        east_west = -east_west;
    }

    let altitude = target.altitude - observer.altitude;
    Ok(Vector3::new(
        east_west as f32,
        altitude as f32,
        north_south as f32,
    ))
}

/// Converts a world offset into east, north and up components.
#[cfg(feature = "coordinate-frame")]
#[cfg_attr(docsrs, doc(cfg(feature = "coordinate-frame")))]
pub fn to_east_north_up(offset: &Vector3<f32>) -> coordinate_frame::EastNorthUp<f32> {
    coordinate_frame::EastNorthUp::new(offset.x, -offset.z, offset.y)
}

/// Converts east, north and up components into a world offset.
#[cfg(feature = "coordinate-frame")]
#[cfg_attr(docsrs, doc(cfg(feature = "coordinate-frame")))]
pub fn from_east_north_up(enu: coordinate_frame::EastNorthUp<f32>) -> Vector3<f32> {
    Vector3::new(enu.x(), enu.z(), -enu.y())
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;

    const MUNICH: GeographicPoint = GeographicPoint::new(48.137, 11.575, 519.0);

    #[test]
    fn test_same_point() {
        let offset = relative_offset(Some(&MUNICH), Some(&MUNICH)).unwrap();
        assert_abs_diff_eq!(offset.norm(), 0.0, epsilon = 1e-3);
        assert_abs_diff_eq!(distance_meters(&MUNICH, &MUNICH), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_missing_location() {
        assert_eq!(
            relative_offset(None, Some(&MUNICH)),
            Err(OverlayError::MissingLocation)
        );
        assert_eq!(
            relative_offset(Some(&MUNICH), None),
            Err(OverlayError::MissingLocation)
        );
    }

    #[test]
    fn test_directions() {
        let north = GeographicPoint::new(MUNICH.latitude + 0.01, MUNICH.longitude, 519.0);
        let offset = relative_offset(Some(&MUNICH), Some(&north)).unwrap();
        assert!(offset.z < -1000.0 && offset.z > -1200.0, "{offset:?}");
        assert_abs_diff_eq!(offset.x, 0.0, epsilon = 1e-3);

        let west = GeographicPoint::new(MUNICH.latitude, MUNICH.longitude - 0.01, 519.0);
        let offset = relative_offset(Some(&MUNICH), Some(&west)).unwrap();
        assert!(offset.x < -700.0 && offset.x > -800.0, "{offset:?}");
        assert_abs_diff_eq!(offset.z, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_altitude_sentinel() {
        let target = GeographicPoint::new(MUNICH.latitude + 0.1, MUNICH.longitude, 0.0);
        let offset = relative_offset(Some(&MUNICH), Some(&target)).unwrap();
        assert_eq!(offset.y, 0.0);

        let tower = GeographicPoint::new(MUNICH.latitude, MUNICH.longitude, 810.0);
        let offset = relative_offset(Some(&MUNICH), Some(&tower)).unwrap();
        assert_abs_diff_eq!(offset.y, 291.0, epsilon = 1e-3);
    }

    #[test]
    fn test_haversine_distance() {
        // One degree of latitude along a meridian.
        let a = GeographicPoint::new(0.0, 0.0, 0.0);
        let b = GeographicPoint::new(1.0, 0.0, 0.0);
        assert_abs_diff_eq!(distance_meters(&a, &b), 111_194.9, epsilon = 1.0);
    }

    #[test]
    fn test_initial_bearing() {
        let origin = GeographicPoint::new(0.0, 0.0, 0.0);
        let east = GeographicPoint::new(0.0, 1.0, 0.0);
        let south = GeographicPoint::new(-1.0, 0.0, 0.0);
        assert_abs_diff_eq!(initial_bearing_degrees(&origin, &east), 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(initial_bearing_degrees(&origin, &south), 180.0, epsilon = 1e-9);
    }

    #[cfg(feature = "coordinate-frame")]
    #[test]
    fn test_east_north_up() {
        let offset = Vector3::new(1.0_f32, 2.0, -3.0);
        let enu = to_east_north_up(&offset);
        assert_eq!((enu.x(), enu.y(), enu.z()), (1.0, 3.0, 2.0));
        assert_eq!(from_east_north_up(enu), offset);
    }
}
