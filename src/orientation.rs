//! Sensor fusion from gravity and magnetic field samples to a smoothed camera rotation.

mod fusion;
mod history;
mod tracker;

pub use crate::orientation::fusion::{
    align_to_camera, check_sample, rotation_from_gravity_and_magnetic,
    FREE_FALL_GRAVITY_SQUARED, MIN_HORIZONTAL_NORM, STANDARD_GRAVITY,
};
pub use crate::orientation::history::RotationHistory;
pub use crate::orientation::tracker::OrientationTracker;
