use crate::attitude::smoothing::{AttitudeSmoothing, Smoother};
use crate::error::Result;
use crate::num_traits::{angle_degrees, NormalizeDegrees};
use crate::types::{Attitude, Matrix3, ScreenOrientation, Vector3};

/// Derives azimuth, pitch and roll from the smoothed camera rotation.
pub struct AttitudeCalculator {
    smoother: Smoother,
    latest: Option<Attitude<f32>>,
}

impl AttitudeCalculator {
    /// Initializes a new instance of the [`AttitudeCalculator`] struct.
    ///
    /// ## Errors
    /// Returns [`OverlayError::InvalidConfig`](crate::OverlayError::InvalidConfig) if the
    /// smoothing parameters are invalid.
    pub fn new(smoothing: AttitudeSmoothing) -> Result<Self> {
        Ok(Self {
            smoother: Smoother::new(smoothing)?,
            latest: None,
        })
    }

    /// Computes the attitude for a rotation and feeds it through the smoothing.
    ///
    /// ## Arguments
    /// * `rotation` - The rotation from world into camera space.
    /// * `orientation` - The orientation in which the preview is presented.
    pub fn compute(
        &mut self,
        rotation: &Matrix3<f32>,
        orientation: ScreenOrientation,
    ) -> Attitude<f32> {
        let attitude = self.smoother.apply(raw_attitude(rotation, orientation));
        self.latest = Some(attitude);
        attitude
    }

    /// Returns the most recently computed attitude.
    pub fn latest(&self) -> Option<Attitude<f32>> {
        self.latest
    }

    /// Discards the smoothing state.
    pub fn reset(&mut self) {
        self.smoother.reset();
        self.latest = None;
    }
}

/// Computes the unsmoothed attitude for a rotation.
///
/// The azimuth is in `[0, 360)`; pitch and roll are in `[-90, 90]`.
///
/// ## Arguments
/// * `rotation` - The rotation from world into camera space.
/// * `orientation` - The orientation in which the preview is presented.
pub fn raw_attitude(rotation: &Matrix3<f32>, orientation: ScreenOrientation) -> Attitude<f32> {
    // The screen's reference axis, expressed in world coordinates.
    let looking = rotation.transpose() * orientation.looking_vector::<f32>();
    let azimuth = (angle_degrees(0.0, 0.0, looking.x, looking.z) + 360.0).wrap_360();

    // World up, expressed in camera coordinates.
    let vertical = *rotation * Vector3::new(0.0, 1.0, 0.0);
    let right = vertical.dot(orientation.right_axis::<f32>());
    let up = vertical.dot(orientation.up_axis::<f32>());

    // Clamped since the degree conversion may overshoot by an ulp.
    let roll = -(90.0 - angle_degrees(0.0, 0.0, right, up).abs());
    let roll = roll.clamp(-90.0, 90.0);
    let pitch = angle_degrees(0.0, 0.0, right.hypot(up), -vertical.z).clamp(-90.0, 90.0);

    Attitude::new(azimuth, pitch, roll)
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_identity_faces_north() {
        let attitude = raw_attitude(&Matrix3::identity(), ScreenOrientation::Landscape);
        assert_abs_diff_eq!(attitude.azimuth, 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(attitude.pitch, 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(attitude.roll, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_heading_follows_rotation_about_up() {
        // Turning the camera right by 90 degrees makes it face east.
        let rotation = Matrix3::rotation_y(core::f32::consts::FRAC_PI_2);
        let forward = rotation * Vector3::new(1.0, 0.0, 0.0);
        assert_abs_diff_eq!(forward.z, -1.0, epsilon = 1e-5);

        let attitude = raw_attitude(&rotation, ScreenOrientation::Landscape);
        assert_abs_diff_eq!(attitude.azimuth, 90.0, epsilon = 1e-3);
        assert_abs_diff_eq!(attitude.pitch, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_pitch_up() {
        // Looking 20 degrees above the horizon.
        let rotation = Matrix3::rotation_x(-20.0_f32.to_radians());
        let attitude = raw_attitude(&rotation, ScreenOrientation::Landscape);
        assert_abs_diff_eq!(attitude.pitch, 20.0, epsilon = 1e-3);
        assert_abs_diff_eq!(attitude.roll, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_roll() {
        let rotation = Matrix3::rotation_z(15.0_f32.to_radians());
        let attitude = raw_attitude(&rotation, ScreenOrientation::Landscape);
        assert_abs_diff_eq!(attitude.roll.abs(), 15.0, epsilon = 1e-3);
        assert_abs_diff_eq!(attitude.pitch, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_ranges_for_random_rotations() {
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..1000 {
            let rotation = Matrix3::rotation_z(rng.gen_range(-3.2_f32..3.2))
                * Matrix3::rotation_y(rng.gen_range(-3.2_f32..3.2))
                * Matrix3::rotation_x(rng.gen_range(-3.2_f32..3.2));

            for orientation in [ScreenOrientation::Landscape, ScreenOrientation::Portrait] {
                let attitude = raw_attitude(&rotation, orientation);
                assert!((0.0..360.0).contains(&attitude.azimuth), "{attitude:?}");
                assert!((-90.0..=90.0).contains(&attitude.pitch), "{attitude:?}");
                assert!((-90.0..=90.0).contains(&attitude.roll), "{attitude:?}");
            }
        }
    }

    #[test]
    fn test_calculator_smooths_and_remembers() {
        let mut calculator = AttitudeCalculator::new(AttitudeSmoothing::None).unwrap();
        assert!(calculator.latest().is_none());

        let attitude = calculator.compute(&Matrix3::identity(), ScreenOrientation::Landscape);
        assert_eq!(calculator.latest(), Some(attitude));

        calculator.reset();
        assert!(calculator.latest().is_none());
    }

    #[test]
    fn test_invalid_smoothing_is_rejected() {
        assert!(AttitudeCalculator::new(AttitudeSmoothing::MovingAverage { window: 0 }).is_err());
    }
}
