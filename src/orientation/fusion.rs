use crate::error::{OverlayError, Result};
use crate::types::{Axis, Matrix3, Vector3};
use core::f32::consts::FRAC_PI_2;

/// The standard acceleration due to gravity, in meters per second squared.
pub const STANDARD_GRAVITY: f32 = 9.806_65;

/// Squared gravity magnitudes below this value indicate free fall.
pub const FREE_FALL_GRAVITY_SQUARED: f32 = 0.01 * STANDARD_GRAVITY * STANDARD_GRAVITY;

/// The smallest accepted magnitude of `magnetic × gravity`.
///
/// Smaller values occur close to the magnetic poles, in free fall, or when the device
/// is next to a strong magnetic field.
pub const MIN_HORIZONTAL_NORM: f32 = 0.1;

/// Checks whether a gravity and a magnetic field vector can define a rotation.
///
/// ## Errors
/// Returns [`OverlayError::DegenerateSample`] if either vector is not finite, if the
/// device is in free fall or if both vectors are close to parallel.
pub fn check_sample(gravity: &Vector3<f32>, magnetic: &Vector3<f32>) -> Result<()> {
    east_axis(gravity, magnetic).map(drop)
}

/// Returns the normalized east axis `magnetic × gravity`.
fn east_axis(gravity: &Vector3<f32>, magnetic: &Vector3<f32>) -> Result<Vector3<f32>> {
    if !gravity.is_finite() || !magnetic.is_finite() {
        return Err(OverlayError::DegenerateSample("non-finite sensor value"));
    }

    if gravity.norm_sq() < FREE_FALL_GRAVITY_SQUARED {
        return Err(OverlayError::DegenerateSample("gravity vector too short"));
    }

    let east = magnetic.cross(gravity);
    let east_norm = east.norm();
    if east_norm < MIN_HORIZONTAL_NORM {
        return Err(OverlayError::DegenerateSample(
            "gravity and magnetic field are parallel",
        ));
    }

    Ok(east * east_norm.recip())
}

/// Computes the device rotation from a gravity and a magnetic field vector.
///
/// The rows of the returned matrix are the world east, north and up axes expressed in
/// device coordinates, i.e. the matrix transforms device vectors into the world frame.
///
/// ## Arguments
/// * `gravity` - The gravity vector, pointing away from the Earth's center.
/// * `magnetic` - The geomagnetic field vector.
///
/// ## Errors
/// Returns [`OverlayError::DegenerateSample`] under the conditions of [`check_sample`].
pub fn rotation_from_gravity_and_magnetic(
    gravity: &Vector3<f32>,
    magnetic: &Vector3<f32>,
) -> Result<Matrix3<f32>> {
    let east = east_axis(gravity, magnetic)?;
    let up = gravity.normalized();
    let north = up.cross(east);

    Ok(Matrix3::from_rows(east, north, up))
}

/// Converts a device rotation into the camera rotation used for projection.
///
/// The device axes are remapped for a camera looking along the device's negative z-axis,
/// aligned with the world frame (x east, y up, z south), corrected by the magnetic
/// declination and inverted. The result transforms world offsets into camera space.
///
/// ## Arguments
/// * `device` - The rotation as returned by [`rotation_from_gravity_and_magnetic`].
/// * `declination` - The magnetic declination, in degrees, positive east.
///
/// ## Errors
/// Returns [`OverlayError::SingularMatrix`] if the composite cannot be inverted.
pub fn align_to_camera(device: &Matrix3<f32>, declination: f32) -> Result<Matrix3<f32>> {
    let remapped = device
        .remap(Axis::X, Axis::MinusZ)
        .ok_or(OverlayError::DegenerateSample("invalid axis remapping"))?;

    let declination = Matrix3::rotation_y(-declination.to_radians());
    let quarter_x = Matrix3::rotation_x(-FRAC_PI_2);
    let quarter_y = Matrix3::rotation_y(-FRAC_PI_2);

    let composite = declination * quarter_x * remapped * quarter_y * quarter_x;
    composite
        .try_inverse()
        .ok_or_else(|| OverlayError::SingularMatrix(composite.determinant()))
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// Builds sensor readings for a device whose axes point into the given world
    /// directions (east, north, up).
    fn readings_for_axes(
        x: Vector3<f32>,
        y: Vector3<f32>,
        z: Vector3<f32>,
    ) -> (Vector3<f32>, Vector3<f32>) {
        let up = Vector3::new(0.0, 0.0, 1.0);
        // Field pointing north and down, as in the northern hemisphere.
        let field = Vector3::new(0.0, 20.0, -40.0);
        let gravity = Vector3::new(x.dot(up), y.dot(up), z.dot(up)) * STANDARD_GRAVITY;
        let magnetic = Vector3::new(x.dot(field), y.dot(field), z.dot(field));
        (gravity, magnetic)
    }

    #[test]
    fn test_flat_device_facing_north() {
        let gravity = Vector3::new(0.0, 0.0, STANDARD_GRAVITY);
        let magnetic = Vector3::new(0.0, 20.0, -40.0);
        let rotation = rotation_from_gravity_and_magnetic(&gravity, &magnetic).unwrap();
        assert!(rotation.max_abs_diff(&Matrix3::identity()) < 1e-5);
    }

    #[test]
    fn test_degenerate_samples() {
        let magnetic = Vector3::new(0.0, 20.0, -40.0);
        let zero = Vector3::new(0.0, 0.0, 0.0);
        assert!(matches!(
            rotation_from_gravity_and_magnetic(&zero, &magnetic),
            Err(OverlayError::DegenerateSample(_))
        ));

        let gravity = Vector3::new(0.0, 0.0, STANDARD_GRAVITY);
        let parallel = Vector3::new(0.0, 0.0, -40.0);
        assert!(matches!(
            rotation_from_gravity_and_magnetic(&gravity, &parallel),
            Err(OverlayError::DegenerateSample(_))
        ));

        let nan = Vector3::new(f32::NAN, 0.0, 1.0);
        assert!(rotation_from_gravity_and_magnetic(&gravity, &nan).is_err());
    }

    #[test]
    fn test_landscape_facing_north_is_identity() {
        // x up, y west, z south
        let (gravity, magnetic) = readings_for_axes(
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(-1.0, 0.0, 0.0),
            Vector3::new(0.0, -1.0, 0.0),
        );
        let device = rotation_from_gravity_and_magnetic(&gravity, &magnetic).unwrap();
        let camera = align_to_camera(&device, 0.0).unwrap();
        assert!(camera.max_abs_diff(&Matrix3::identity()) < 1e-5);
    }

    #[test]
    fn test_landscape_facing_east_sees_east_ahead() {
        // x up, y north, z west
        let (gravity, magnetic) = readings_for_axes(
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(-1.0, 0.0, 0.0),
        );
        let device = rotation_from_gravity_and_magnetic(&gravity, &magnetic).unwrap();
        let camera = align_to_camera(&device, 0.0).unwrap();

        let east = camera * Vector3::new(1.0, 0.0, 0.0);
        assert_abs_diff_eq!(east.x, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(east.z, -1.0, epsilon = 1e-5);

        let north = camera * Vector3::new(0.0, 0.0, -1.0);
        assert_abs_diff_eq!(north.x, -1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_declination_rotates_about_up() {
        let (gravity, magnetic) = readings_for_axes(
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(-1.0, 0.0, 0.0),
            Vector3::new(0.0, -1.0, 0.0),
        );
        let device = rotation_from_gravity_and_magnetic(&gravity, &magnetic).unwrap();
        let camera = align_to_camera(&device, 90.0).unwrap();

        // Magnetic north is true east; the camera faces east.
        let east = camera * Vector3::new(1.0, 0.0, 0.0);
        assert_abs_diff_eq!(east.z, -1.0, epsilon = 1e-5);
        let up = camera * Vector3::new(0.0, 1.0, 0.0);
        assert_abs_diff_eq!(up.y, 1.0, epsilon = 1e-5);
    }
}
