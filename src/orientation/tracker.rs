use crate::error::{OverlayError, Result};
use crate::low_pass::{LowPassFilter, ACCELEROMETER_THRESHOLDS, MAGNETOMETER_THRESHOLDS};
use crate::orientation::fusion::{align_to_camera, check_sample, rotation_from_gravity_and_magnetic};
use crate::orientation::history::RotationHistory;
use crate::types::{GravityReading, MagneticReading, Matrix3, Vector3};
use log::debug;

/// Turns raw gravity and magnetic field samples into a smoothed camera rotation.
#[derive(Debug, Clone)]
pub struct OrientationTracker {
    history: RotationHistory<f32>,
    /// Pre-filters for the gravity and magnetic samples, if enabled.
    input_filters: Option<(LowPassFilter, LowPassFilter)>,
    /// Only every n-th sample is fused.
    accept_rate: usize,
    counter: usize,
    /// The magnetic declination, in degrees.
    declination: f32,
}

impl OrientationTracker {
    /// Initializes a new instance of the [`OrientationTracker`] struct.
    ///
    /// ## Arguments
    /// * `history_capacity` - The number of rotations averaged into the smoothed output.
    /// * `accept_rate` - Only every `accept_rate`-th sample is fused; `1` fuses all.
    /// * `low_pass_inputs` - Whether to pre-filter the sensor samples.
    ///
    /// ## Errors
    /// Returns [`OverlayError::InvalidConfig`] if `history_capacity` or `accept_rate` is zero.
    pub fn new(history_capacity: usize, accept_rate: usize, low_pass_inputs: bool) -> Result<Self> {
        if accept_rate == 0 {
            return Err(OverlayError::InvalidConfig(
                "sample accept rate must be positive".into(),
            ));
        }

        let input_filters = low_pass_inputs.then(|| {
            (
                LowPassFilter::new(ACCELEROMETER_THRESHOLDS),
                LowPassFilter::new(MAGNETOMETER_THRESHOLDS),
            )
        });

        Ok(Self {
            history: RotationHistory::new(history_capacity)?,
            input_filters,
            accept_rate,
            counter: 0,
            declination: 0.0,
        })
    }

    /// Processes a pair of sensor samples.
    ///
    /// Returns the new smoothed rotation if the sample was fused, or `None` if it was
    /// skipped by rate limiting.
    ///
    /// ## Errors
    /// Returns an error if the raw samples cannot define a rotation. The history and the
    /// input filters are left unchanged in that case.
    pub fn update(
        &mut self,
        gravity: &GravityReading<f32>,
        magnetic: &MagneticReading<f32>,
    ) -> Result<Option<Matrix3<f32>>> {
        let gravity = Vector3::from(gravity);
        let magnetic = Vector3::from(magnetic);
        check_sample(&gravity, &magnetic)?;

        let (gravity, magnetic) = match self.input_filters.as_mut() {
            Some((gravity_filter, magnetic_filter)) => (
                Vector3::from(gravity_filter.apply(gravity.into())),
                Vector3::from(magnetic_filter.apply(magnetic.into())),
            ),
            None => (gravity, magnetic),
        };

        let accepted = self.counter % self.accept_rate == 0;
        self.counter = self.counter.wrapping_add(1);
        if !accepted {
            return Ok(None);
        }

        let device = rotation_from_gravity_and_magnetic(&gravity, &magnetic)?;
        let camera = align_to_camera(&device, self.declination)?;
        self.history.push(camera);
        Ok(Some(self.history.smoothed()))
    }

    /// Returns the current smoothed rotation.
    pub fn smoothed(&self) -> Matrix3<f32> {
        self.history.smoothed()
    }

    /// Returns the magnetic declination, in degrees.
    pub fn declination(&self) -> f32 {
        self.declination
    }

    /// Sets the magnetic declination applied to subsequent samples.
    ///
    /// ## Arguments
    /// * `declination` - The declination, in degrees, positive east.
    pub fn set_declination(&mut self, declination: f32) {
        if (declination - self.declination).abs() > f32::EPSILON {
            debug!("Magnetic declination set to {declination:.2} degrees");
        }
        self.declination = declination;
    }

    /// Restores the initial state: identity history, empty input filters.
    pub fn reset(&mut self) {
        self.history.reset();
        if let Some((gravity_filter, magnetic_filter)) = self.input_filters.as_mut() {
            gravity_filter.reset();
            magnetic_filter.reset();
        }
        self.counter = 0;
    }

    /// Returns the accumulated gravity and magnetic values of the input filters.
    pub fn filter_values(&self) -> Option<([f32; 3], [f32; 3])> {
        let (gravity_filter, magnetic_filter) = self.input_filters.as_ref()?;
        Some((gravity_filter.value()?, magnetic_filter.value()?))
    }

    /// Returns the number of rotations averaged into the smoothed output.
    pub fn history_capacity(&self) -> usize {
        self.history.capacity()
    }
}
