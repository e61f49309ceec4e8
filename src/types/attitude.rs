use core::fmt::{Debug, Formatter};
use uniform_array_derive::UniformArray;

/// Device attitude relative to the local horizon and true north.
#[derive(UniformArray, Copy)]
#[cfg_attr(test, ensure_uniform_type::ensure_uniform_type)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct Attitude<T> {
    /// The compass bearing of the camera, in degrees within `[0, 360)`.
    pub azimuth: T,
    /// The elevation of the camera axis above the horizon, in degrees within `[-90, 90]`.
    pub pitch: T,
    /// The rotation of the screen about the camera axis, in degrees within `[-90, 90]`.
    pub roll: T,
}

impl<T> Attitude<T> {
    /// Initializes a new [`Attitude`] instance.
    #[inline(always)]
    pub const fn new(azimuth: T, pitch: T, roll: T) -> Self {
        Self {
            azimuth,
            pitch,
            roll,
        }
    }
}

impl<T> Default for Attitude<T>
where
    T: Default,
{
    #[inline]
    fn default() -> Self {
        Self::new(Default::default(), Default::default(), Default::default())
    }
}

impl<T> Clone for Attitude<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            azimuth: self.azimuth.clone(),
            pitch: self.pitch.clone(),
            roll: self.roll.clone(),
        }
    }
}

impl<T> Debug for Attitude<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Attitude")
            .field(&self.azimuth)
            .field(&self.pitch)
            .field(&self.roll)
            .finish()
    }
}

impl<T> PartialEq for Attitude<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.azimuth == other.azimuth && self.pitch == other.pitch && self.roll == other.roll
    }
}
