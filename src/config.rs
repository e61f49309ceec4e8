use crate::attitude::AttitudeSmoothing;
use crate::camera::DEFAULT_VIEW_ANGLE;
use crate::error::{OverlayError, Result};
use core::f32::consts::PI;

/// Tunables of the [`OverlayEngine`](crate::OverlayEngine).
///
/// With the `serde` feature enabled, missing fields are filled from [`Default`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct OverlayConfig {
    /// The distance covered by the radar, in meters. Markers beyond it are not drawn.
    pub radar_range_meters: f32,
    /// The horizontal field of view, in radians.
    pub view_angle_radians: f32,
    /// The number of rotations averaged into the smoothed rotation.
    pub history_capacity: usize,
    /// Only every n-th sensor sample is fused.
    pub sample_accept_rate: usize,
    /// How consecutive attitudes are smoothed.
    pub attitude_smoothing: AttitudeSmoothing,
    /// Whether sensor samples are low-pass filtered before fusion.
    pub low_pass_inputs: bool,
    /// The height of a label above its icon, in meters.
    pub label_lift_meters: f32,
    /// The distance the observer has to move before the declination is looked up again.
    pub declination_refresh_meters: f64,
    /// Whether overlapping markers are lifted apart.
    pub collision_detection: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            radar_range_meters: 20_000.0,
            view_angle_radians: DEFAULT_VIEW_ANGLE,
            history_capacity: 60,
            sample_accept_rate: 10,
            attitude_smoothing: AttitudeSmoothing::default(),
            low_pass_inputs: true,
            label_lift_meters: 1.0,
            declination_refresh_meters: 10_000.0,
            collision_detection: true,
        }
    }
}

impl OverlayConfig {
    /// Checks all values for consistency.
    ///
    /// ## Errors
    /// Returns [`OverlayError::InvalidConfig`] naming the first offending value.
    pub fn validate(&self) -> Result<()> {
        if !(self.radar_range_meters > 0.0 && self.radar_range_meters.is_finite()) {
            return Err(invalid("radar_range_meters", self.radar_range_meters));
        }
        if !(self.view_angle_radians > 0.0 && self.view_angle_radians < PI) {
            return Err(invalid("view_angle_radians", self.view_angle_radians));
        }
        if self.history_capacity == 0 {
            return Err(invalid("history_capacity", self.history_capacity));
        }
        if self.sample_accept_rate == 0 {
            return Err(invalid("sample_accept_rate", self.sample_accept_rate));
        }
        if !self.label_lift_meters.is_finite() {
            return Err(invalid("label_lift_meters", self.label_lift_meters));
        }
        if !(self.declination_refresh_meters >= 0.0 && self.declination_refresh_meters.is_finite())
        {
            return Err(invalid(
                "declination_refresh_meters",
                self.declination_refresh_meters,
            ));
        }
        self.attitude_smoothing.validate()
    }
}

fn invalid(name: &str, value: impl core::fmt::Display) -> OverlayError {
    OverlayError::InvalidConfig(format!("{name} is out of range: {value}"))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = OverlayConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.radar_range_meters, 20_000.0);
        assert_eq!(config.history_capacity, 60);
        assert_eq!(config.sample_accept_rate, 10);
        assert_eq!(config.view_angle_radians, 0.785);
    }

    #[test]
    fn test_invalid_values() {
        let config = OverlayConfig {
            radar_range_meters: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(OverlayError::InvalidConfig(message)) if message.contains("radar_range_meters")
        ));

        let config = OverlayConfig {
            view_angle_radians: 4.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = OverlayConfig {
            sample_accept_rate: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = OverlayConfig {
            attitude_smoothing: AttitudeSmoothing::MovingAverage { window: 0 },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
