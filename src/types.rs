mod attitude;
mod geographic_point;
mod matrix3;
mod screen_orientation;
mod sensor_readings;
mod vector3;

pub use crate::types::attitude::Attitude;
pub use crate::types::geographic_point::GeographicPoint;
pub use crate::types::matrix3::{Axis, Matrix3};
pub use crate::types::screen_orientation::ScreenOrientation;
pub use crate::types::sensor_readings::{GravityReading, MagneticReading};
pub use crate::types::vector3::Vector3;
