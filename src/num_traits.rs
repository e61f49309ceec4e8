use num_traits::Float;

/// Wraps angles given in degrees into a canonical range.
pub trait NormalizeDegrees {
    /// Wraps the angle into `[0, 360)`.
    fn wrap_360(self) -> Self;

    /// Wraps the angle into `(-180, 180]`.
    fn wrap_180(self) -> Self;
}

macro_rules! impl_normalize_degrees {
    ($t:ty) => {
        impl NormalizeDegrees for $t {
            #[inline]
            fn wrap_360(self) -> Self {
                let wrapped = self.rem_euclid(360.0);
                // rem_euclid may round up to exactly 360 for tiny negative inputs
                if wrapped >= 360.0 {
                    0.0
                } else {
                    wrapped
                }
            }

            #[inline]
            fn wrap_180(self) -> Self {
                let wrapped = self.wrap_360();
                if wrapped > 180.0 {
                    wrapped - 360.0
                } else {
                    wrapped
                }
            }
        }
    };
}

impl_normalize_degrees!(f32);
impl_normalize_degrees!(f64);

/// Returns the angle, in degrees, of the point `(x, y)` as seen from `(center_x, center_y)`.
///
/// The angle is measured from the positive x-axis through `acos(Δx / distance)` and is
/// negated when `Δy` is negative, giving a result in `(-180, 180]`. Coincident points
/// yield zero.
pub fn angle_degrees<T>(center_x: T, center_y: T, x: T, y: T) -> T
where
    T: Float,
{
    let dx = x - center_x;
    let dy = y - center_y;
    let distance = dx.hypot(dy);
    if distance <= T::epsilon() || !distance.is_finite() {
        return T::zero();
    }

    // Rounding may push the ratio slightly outside of the acos domain.
    let ratio = (dx / distance).max(-T::one()).min(T::one());
    let angle = ratio.acos().to_degrees();
    if dy < T::zero() {
        -angle
    } else {
        angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_wrap_360() {
        assert_eq!(370.0_f32.wrap_360(), 10.0);
        assert_eq!((-10.0_f32).wrap_360(), 350.0);
        assert_eq!(360.0_f64.wrap_360(), 0.0);
        assert!((-1e-9_f32).wrap_360() < 360.0);
    }

    #[test]
    fn test_wrap_180() {
        assert_eq!(190.0_f32.wrap_180(), -170.0);
        assert_eq!(180.0_f32.wrap_180(), 180.0);
        assert_eq!((-181.0_f64).wrap_180(), 179.0);
    }

    #[test]
    fn test_angle_quadrants() {
        assert_abs_diff_eq!(angle_degrees(0.0_f32, 0.0, 1.0, 0.0), 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(angle_degrees(0.0_f32, 0.0, 0.0, 1.0), 90.0, epsilon = 1e-5);
        assert_abs_diff_eq!(angle_degrees(0.0_f32, 0.0, -1.0, 0.0), 180.0, epsilon = 1e-5);
        assert_abs_diff_eq!(angle_degrees(0.0_f32, 0.0, 0.0, -1.0), -90.0, epsilon = 1e-5);
        assert_abs_diff_eq!(angle_degrees(1.0_f64, 1.0, 2.0, 2.0), 45.0, epsilon = 1e-9);
    }

    #[test]
    fn test_angle_of_coincident_points() {
        assert_eq!(angle_degrees(3.0_f32, 4.0, 3.0, 4.0), 0.0);
    }
}
