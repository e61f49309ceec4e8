//! Markers for points of interest: placement relative to the observer, projection,
//! radar and view membership, hit testing and collision resolution.

mod collision;
mod geometry;
mod registry;
mod render;

pub use collision::{adjust_for_collisions, COLLISION_LIFT_METERS};
pub use geometry::{
    radar_contains, MarkerSpec, MarkerState, ScreenPoint, ScreenRect, ScreenSize,
    DEFAULT_ICON_SIZE, RADAR_DISPLAY_RADIUS,
};
pub use registry::MarkerRegistry;
pub use render::{RadarBlip, RadarView, RenderItem};
