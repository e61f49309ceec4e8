use crate::types::Vector3;
use core::ops::Neg;
use num_traits::{One, Zero};

/// The orientation in which the camera preview is presented.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScreenOrientation {
    /// The device is held upright; the long screen edge is vertical.
    Portrait,
    /// The device is held sideways; the long screen edge is horizontal.
    #[default]
    Landscape,
}

impl ScreenOrientation {
    /// The camera-space axis pointing to the right of the screen, used as the azimuth
    /// reference.
    pub fn looking_vector<T>(self) -> Vector3<T>
    where
        T: Zero + One,
    {
        match self {
            ScreenOrientation::Portrait => Vector3::new(T::zero(), T::one(), T::zero()),
            ScreenOrientation::Landscape => Vector3::new(T::one(), T::zero(), T::zero()),
        }
    }

    /// The camera-space axis pointing to the right of the screen.
    pub fn right_axis<T>(self) -> Vector3<T>
    where
        T: Zero + One,
    {
        self.looking_vector()
    }

    /// The camera-space axis pointing to the top of the screen.
    pub fn up_axis<T>(self) -> Vector3<T>
    where
        T: Zero + One + Neg<Output = T>,
    {
        match self {
            ScreenOrientation::Portrait => Vector3::new(-T::one(), T::zero(), T::zero()),
            ScreenOrientation::Landscape => Vector3::new(T::zero(), T::one(), T::zero()),
        }
    }
}
