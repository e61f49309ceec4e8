//! Geographic offsets, distances and magnetic declination.

mod declination;
mod offset;

pub use crate::geo::declination::{
    DeclinationCache, DeclinationSource, DipoleDeclination, FixedDeclination,
};
#[cfg(feature = "coordinate-frame")]
pub use crate::geo::offset::{from_east_north_up, to_east_north_up};
pub use crate::geo::offset::{
    distance_meters, initial_bearing_degrees, relative_offset, with_known_altitude,
    EARTH_RADIUS_METERS,
};
