//! Adaptive exponential smoothing of three-axis sensor samples.
//!
//! The smoothing constant depends on how far the new sample is from the accumulated
//! value: small deltas are treated as noise and barely move the output, large deltas
//! are followed almost immediately.

use crate::error::{OverlayError, Result};

/// Smoothing constant used when the sample is not three-dimensional.
pub const ALPHA_DEFAULT: f32 = 0.333;

/// Smoothing constant used when the sample is within the low threshold.
pub const ALPHA_STEADY: f32 = 0.001;

/// Smoothing constant used between the low and the high threshold.
pub const ALPHA_START_MOVING: f32 = 0.1;

/// Smoothing constant used beyond the high threshold.
pub const ALPHA_MOVING: f32 = 0.9;

/// Thresholds for accelerometer samples, in meters per second squared.
pub const ACCELEROMETER_THRESHOLDS: Thresholds = Thresholds::new(0.5, 1.0);

/// Thresholds for magnetometer samples, in microtesla.
pub const MAGNETOMETER_THRESHOLDS: Thresholds = Thresholds::new(2.0, 4.0);

/// The distance thresholds that select the smoothing constant.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Thresholds {
    /// Below this distance the sample is considered steady.
    pub low: f32,
    /// At or above this distance the sample is considered moving.
    pub high: f32,
}

impl Thresholds {
    /// Initializes a new [`Thresholds`] instance.
    pub const fn new(low: f32, high: f32) -> Self {
        Self { low, high }
    }
}

/// Blends `current` into `previous` in place.
///
/// ## Arguments
/// * `low` - The distance below which the steady constant is used.
/// * `high` - The distance at or above which the moving constant is used.
/// * `current` - The new sample.
/// * `previous` - The accumulated value; updated in place.
///
/// ## Errors
/// Returns [`OverlayError::LengthMismatch`] and leaves `previous` untouched if the slices
/// differ in length.
pub fn filter(low: f32, high: f32, current: &[f32], previous: &mut [f32]) -> Result<()> {
    if current.len() != previous.len() {
        return Err(OverlayError::LengthMismatch {
            current: current.len(),
            previous: previous.len(),
        });
    }

    let alpha = compute_alpha(low, high, current, previous);
    for (prev, &curr) in previous.iter_mut().zip(current) {
        *prev += alpha * (curr - *prev);
    }

    Ok(())
}

fn compute_alpha(low: f32, high: f32, current: &[f32], previous: &[f32]) -> f32 {
    if current.len() != 3 {
        return ALPHA_DEFAULT;
    }

    let distance = current
        .iter()
        .zip(previous)
        .map(|(c, p)| (c - p) * (c - p))
        .sum::<f32>()
        .sqrt();

    if distance < low {
        ALPHA_STEADY
    } else if distance < high {
        ALPHA_START_MOVING
    } else {
        ALPHA_MOVING
    }
}

/// A reusable accumulator for one three-axis sensor.
#[derive(Debug, Clone)]
pub struct LowPassFilter {
    thresholds: Thresholds,
    state: Option<[f32; 3]>,
}

impl LowPassFilter {
    /// Initializes a new [`LowPassFilter`] instance.
    pub const fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            state: None,
        }
    }

    /// Blends a sample into the accumulator and returns the filtered value.
    ///
    /// The first sample seeds the accumulator and is returned unchanged.
    pub fn apply(&mut self, sample: [f32; 3]) -> [f32; 3] {
        match self.state.as_mut() {
            None => {
                self.state = Some(sample);
                sample
            }
            Some(previous) => {
                let alpha =
                    compute_alpha(self.thresholds.low, self.thresholds.high, &sample, &*previous);
                for (prev, curr) in previous.iter_mut().zip(sample) {
                    *prev += alpha * (curr - *prev);
                }
                *previous
            }
        }
    }

    /// Returns the accumulated value, if any sample was seen.
    pub fn value(&self) -> Option<[f32; 3]> {
        self.state
    }

    /// Discards the accumulated value.
    pub fn reset(&mut self) {
        self.state = None;
    }
}
