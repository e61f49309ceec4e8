use crate::sensor_reading;

sensor_reading!(
    /// An accelerometer reading with gravity dominating, in device coordinates.
    ///
    /// At rest the vector points away from the Earth's center.
    GravityReading,
    "meters per second squared"
);

sensor_reading!(
    /// A magnetometer reading in device coordinates.
    MagneticReading,
    "microtesla"
);
