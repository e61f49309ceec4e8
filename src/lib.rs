#![forbid(unsafe_code)]
// Only enables the `doc_cfg` feature when the `docsrs` configuration attribute is defined.
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Orientation tracking and projection of geo-located points for camera overlays.
//!
//! Gravity and magnetic field samples are fused into a smoothed camera rotation, from
//! which the [`AttitudeCalculator`] derives azimuth, pitch and roll. Points of interest
//! are placed relative to the observer, projected through a pinhole [`CameraModel`] and
//! returned as [`RenderItem`]s and a [`RadarView`] for an external renderer.
//! The [`OverlayEngine`] ties everything together.

pub mod attitude;
pub mod camera;
mod config;
pub mod engine;
mod error;
pub mod geo;
pub mod low_pass;
mod macros;
pub mod marker;
mod num_traits;
pub mod orientation;
pub mod types;

pub use crate::attitude::{AttitudeCalculator, AttitudeSmoothing};
pub use crate::camera::CameraModel;
pub use crate::config::OverlayConfig;
pub use crate::engine::{Frame, OverlayEngine, RotationSnapshot};
pub use crate::error::{OverlayError, Result};
pub use crate::low_pass::LowPassFilter;
pub use crate::marker::{MarkerRegistry, MarkerSpec, MarkerState, RadarView, RenderItem};
pub use crate::orientation::OrientationTracker;

pub use crate::num_traits::*;
