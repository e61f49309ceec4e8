use crate::attitude::kalman::AngleEstimator;
use crate::error::{OverlayError, Result};
use crate::num_traits::NormalizeDegrees;
use crate::types::Attitude;
use std::collections::VecDeque;

/// The default moving average window.
pub const DEFAULT_WINDOW: usize = 5;

/// Selects how consecutive attitudes are smoothed.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttitudeSmoothing {
    /// Attitudes are reported as computed.
    None,
    /// The mean over the last `window` attitudes; the azimuth uses the circular mean.
    MovingAverage { window: usize },
    /// A one-state Kalman filter per angle.
    SinglePole {
        process_noise: f32,
        measurement_noise: f32,
    },
}

impl Default for AttitudeSmoothing {
    fn default() -> Self {
        AttitudeSmoothing::MovingAverage {
            window: DEFAULT_WINDOW,
        }
    }
}

impl AttitudeSmoothing {
    /// Validates the smoothing parameters.
    ///
    /// ## Errors
    /// Returns [`OverlayError::InvalidConfig`] for a zero window or non-positive noise values.
    pub fn validate(&self) -> Result<()> {
        match *self {
            AttitudeSmoothing::None => Ok(()),
            AttitudeSmoothing::MovingAverage { window } if window == 0 => Err(
                OverlayError::InvalidConfig("moving average window must be positive".into()),
            ),
            AttitudeSmoothing::MovingAverage { .. } => Ok(()),
            AttitudeSmoothing::SinglePole {
                process_noise,
                measurement_noise,
            } => {
                if !(process_noise > 0.0 && process_noise.is_finite()) {
                    return Err(OverlayError::InvalidConfig(format!(
                        "process noise must be positive, got {process_noise}"
                    )));
                }
                if !(measurement_noise > 0.0 && measurement_noise.is_finite()) {
                    return Err(OverlayError::InvalidConfig(format!(
                        "measurement noise must be positive, got {measurement_noise}"
                    )));
                }
                Ok(())
            }
        }
    }
}

/// The runtime state of the selected smoothing.
pub(crate) enum Smoother {
    None,
    MovingAverage(MovingAverage),
    SinglePole(SinglePole),
}

impl Smoother {
    pub fn new(smoothing: AttitudeSmoothing) -> Result<Self> {
        smoothing.validate()?;
        Ok(match smoothing {
            AttitudeSmoothing::None => Smoother::None,
            AttitudeSmoothing::MovingAverage { window } => {
                Smoother::MovingAverage(MovingAverage::new(window))
            }
            AttitudeSmoothing::SinglePole {
                process_noise,
                measurement_noise,
            } => Smoother::SinglePole(SinglePole::new(process_noise, measurement_noise)),
        })
    }

    pub fn apply(&mut self, attitude: Attitude<f32>) -> Attitude<f32> {
        match self {
            Smoother::None => attitude,
            Smoother::MovingAverage(average) => average.apply(attitude),
            Smoother::SinglePole(filter) => filter.apply(attitude),
        }
    }

    pub fn reset(&mut self) {
        match self {
            Smoother::None => {}
            Smoother::MovingAverage(average) => average.samples.clear(),
            Smoother::SinglePole(filter) => filter.estimators = None,
        }
    }
}

pub(crate) struct MovingAverage {
    window: usize,
    samples: VecDeque<Attitude<f32>>,
}

impl MovingAverage {
    fn new(window: usize) -> Self {
        Self {
            window,
            samples: VecDeque::with_capacity(window),
        }
    }

    fn apply(&mut self, attitude: Attitude<f32>) -> Attitude<f32> {
        if self.samples.len() == self.window {
            self.samples.pop_front();
        }
        self.samples.push_back(attitude);

        let count = self.samples.len() as f32;
        let (mut sin, mut cos, mut pitch, mut roll) = (0.0_f32, 0.0_f32, 0.0_f32, 0.0_f32);
        for sample in &self.samples {
            let (s, c) = sample.azimuth.to_radians().sin_cos();
            sin += s;
            cos += c;
            pitch += sample.pitch;
            roll += sample.roll;
        }

        // Opposing bearings cancel out; keep the latest one instead.
        let azimuth = if sin.hypot(cos) <= f32::EPSILON * count {
            attitude.azimuth
        } else {
            sin.atan2(cos).to_degrees().wrap_360()
        };

        Attitude::new(azimuth, pitch / count, roll / count)
    }
}

pub(crate) struct SinglePole {
    process_noise: f32,
    measurement_noise: f32,
    /// Azimuth, pitch and roll estimators; created from the first attitude.
    estimators: Option<[AngleEstimator<f32>; 3]>,
}

impl SinglePole {
    fn new(process_noise: f32, measurement_noise: f32) -> Self {
        Self {
            process_noise,
            measurement_noise,
            estimators: None,
        }
    }

    fn apply(&mut self, attitude: Attitude<f32>) -> Attitude<f32> {
        let (process_noise, measurement_noise) = (self.process_noise, self.measurement_noise);
        if self.estimators.is_none() {
            self.estimators = Some([
                AngleEstimator::new(attitude.azimuth, process_noise, measurement_noise),
                AngleEstimator::new(attitude.pitch, process_noise, measurement_noise),
                AngleEstimator::new(attitude.roll, process_noise, measurement_noise),
            ]);
            return attitude;
        }

        let Some([azimuth, pitch, roll]) = self.estimators.as_mut() else {
            return attitude;
        };

        // Unwrap the measured azimuth next to the prediction so that the innovation
        // never exceeds half a turn.
        azimuth.predict();
        let predicted = azimuth.angle();
        let measured = predicted + (attitude.azimuth - predicted).wrap_180();
        azimuth.correct(measured);
        let wrapped = azimuth.angle().wrap_360();
        azimuth.set_angle(wrapped);

        pitch.predict();
        pitch.correct(attitude.pitch);
        roll.predict();
        roll.correct(attitude.roll);

        Attitude::new(wrapped, pitch.angle(), roll.angle())
    }
}
