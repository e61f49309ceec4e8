use thiserror::Error;

/// Errors raised by the orientation and projection pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OverlayError {
    /// An observer or target location was not available.
    #[error("Geographic location is missing")]
    MissingLocation,

    /// Two sample buffers that must have the same length did not.
    #[error("Sample length mismatch: current has {current} components, previous has {previous}")]
    LengthMismatch { current: usize, previous: usize },

    /// Gravity or magnetic readings that cannot define a rotation.
    #[error("Degenerate sensor sample: {0}")]
    DegenerateSample(&'static str),

    /// A matrix could not be inverted.
    #[error("Matrix is singular (determinant {0})")]
    SingularMatrix(f32),

    /// A projection was requested for a point at or behind the camera plane.
    #[error("Point is not in front of the camera (z = {0})")]
    BehindCamera(f32),

    /// A configuration value was rejected during construction.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for overlay operations.
pub type Result<T> = core::result::Result<T, OverlayError>;
