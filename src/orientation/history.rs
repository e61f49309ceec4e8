use crate::error::{OverlayError, Result};
use crate::types::Matrix3;
use num_traits::Float;

/// A fixed-capacity ring buffer of rotation matrices.
///
/// The buffer is always fully populated: it starts out with identity matrices and every
/// insertion overwrites the oldest slot. The element-wise mean of all slots is the
/// smoothed rotation.
#[derive(Debug, Clone)]
pub struct RotationHistory<T> {
    slots: Vec<Matrix3<T>>,
    next: usize,
}

impl<T> RotationHistory<T>
where
    T: Float,
{
    /// Initializes a new [`RotationHistory`] filled with identity matrices.
    ///
    /// ## Errors
    /// Returns [`OverlayError::InvalidConfig`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(OverlayError::InvalidConfig(
                "rotation history capacity must be positive".into(),
            ));
        }

        Ok(Self {
            slots: vec![Matrix3::identity(); capacity],
            next: 0,
        })
    }

    /// Stores a rotation in the next slot, overwriting the oldest entry.
    pub fn push(&mut self, rotation: Matrix3<T>) {
        self.slots[self.next] = rotation;
        self.next = (self.next + 1) % self.slots.len();
    }

    /// Calculates the element-wise mean of all slots.
    pub fn smoothed(&self) -> Matrix3<T> {
        let (sum, count) = self.slots.iter().fold(
            (Matrix3::zero(), T::zero()),
            |(sum, count), rotation| (sum + *rotation, count + T::one()),
        );
        sum * count.recip()
    }

    /// Returns the most recently stored rotation.
    pub fn latest(&self) -> Matrix3<T> {
        let index = (self.next + self.slots.len() - 1) % self.slots.len();
        self.slots[index]
    }

    /// Refills every slot with the identity matrix.
    pub fn reset(&mut self) {
        self.slots.fill(Matrix3::identity());
        self.next = 0;
    }

    /// Returns the number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}
