//! Azimuth, pitch and roll of the camera.

mod calculator;
mod kalman;
mod smoothing;

pub use crate::attitude::calculator::{raw_attitude, AttitudeCalculator};
pub use crate::attitude::kalman::AngleEstimator;
pub use crate::attitude::smoothing::{AttitudeSmoothing, DEFAULT_WINDOW};
