//! Pinhole projection from camera space into screen coordinates.

use crate::error::{OverlayError, Result};
use crate::types::{Matrix3, Vector3};
use core::f32::consts::PI;

/// The default horizontal field of view, in radians.
pub const DEFAULT_VIEW_ANGLE: f32 = 0.785;

/// A pinhole camera with a screen-sized image plane.
///
/// The camera looks along its negative z-axis; x points to the right of the screen and
/// y to the top. Screen coordinates start at the top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraModel {
    width: f32,
    height: f32,
    view_angle: f32,
    focal_distance: f32,
    /// Rotation from world into camera space for the current frame.
    rotation: Matrix3<f32>,
    /// Observer position in world space for the current frame.
    origin: Vector3<f32>,
}

impl CameraModel {
    /// Initializes a new instance of the [`CameraModel`] struct.
    ///
    /// ## Arguments
    /// * `width` - The view width, in pixels.
    /// * `height` - The view height, in pixels.
    /// * `view_angle` - The horizontal field of view, in radians.
    ///
    /// ## Errors
    /// Returns [`OverlayError::InvalidConfig`] if a dimension is not positive or the view
    /// angle is not within `(0, π)`.
    pub fn new(width: f32, height: f32, view_angle: f32) -> Result<Self> {
        validate_size(width, height)?;
        validate_view_angle(view_angle)?;

        Ok(Self {
            width,
            height,
            view_angle,
            focal_distance: focal_distance(width, view_angle),
            rotation: Matrix3::identity(),
            origin: Vector3::new(0.0, 0.0, 0.0),
        })
    }

    /// The view width, in pixels.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// The view height, in pixels.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// The horizontal field of view, in radians.
    pub fn view_angle(&self) -> f32 {
        self.view_angle
    }

    /// The distance of the image plane, in pixels.
    pub fn focal_distance(&self) -> f32 {
        self.focal_distance
    }

    /// Changes the field of view and recomputes the focal distance.
    pub fn set_view_angle(&mut self, view_angle: f32) -> Result<()> {
        validate_view_angle(view_angle)?;
        self.view_angle = view_angle;
        self.focal_distance = focal_distance(self.width, view_angle);
        Ok(())
    }

    /// Changes the view size and recomputes the focal distance.
    pub fn resize(&mut self, width: f32, height: f32) -> Result<()> {
        validate_size(width, height)?;
        self.width = width;
        self.height = height;
        self.focal_distance = focal_distance(width, self.view_angle);
        Ok(())
    }

    /// Sets the rotation and observer origin used by [`CameraModel::to_camera_space`].
    ///
    /// Call once per frame, before projecting.
    pub fn set_frame(&mut self, rotation: Matrix3<f32>, origin: Vector3<f32>) {
        self.rotation = rotation;
        self.origin = origin;
    }

    /// The rotation of the current frame.
    pub fn rotation(&self) -> &Matrix3<f32> {
        &self.rotation
    }

    /// The observer origin of the current frame.
    pub fn origin(&self) -> &Vector3<f32> {
        &self.origin
    }

    /// Transforms a world-space point into camera space.
    pub fn to_camera_space(&self, world: &Vector3<f32>) -> Vector3<f32> {
        self.rotation * (*world - self.origin)
    }

    /// Projects a camera-space point onto the screen.
    ///
    /// The point is expected in front of the camera, i.e. with negative `z`; see
    /// [`CameraModel::try_project`] for a checked variant.
    pub fn project(&self, point: &Vector3<f32>, offset_x: f32, offset_y: f32) -> (f32, f32) {
        let depth = -point.z;
        let x = self.focal_distance * point.x / depth + offset_x + self.width / 2.0;
        let y = -(self.focal_distance * point.y / depth) + offset_y + self.height / 2.0;
        (x, y)
    }

    /// Projects a camera-space point onto the screen if it lies in front of the camera.
    ///
    /// ## Errors
    /// Returns [`OverlayError::BehindCamera`] if `z` is not negative.
    pub fn try_project(
        &self,
        point: &Vector3<f32>,
        offset_x: f32,
        offset_y: f32,
    ) -> Result<(f32, f32)> {
        if point.z >= 0.0 || !point.z.is_finite() {
            return Err(OverlayError::BehindCamera(point.z));
        }

        Ok(self.project(point, offset_x, offset_y))
    }

    /// Determines whether a screen point lies within the view.
    pub fn point_in_view(&self, x: f32, y: f32) -> bool {
        (0.0..=self.width).contains(&x) && (0.0..=self.height).contains(&y)
    }
}

fn focal_distance(width: f32, view_angle: f32) -> f32 {
    (width / 2.0) / (view_angle / 2.0).tan()
}

fn validate_size(width: f32, height: f32) -> Result<()> {
    if !(width > 0.0 && width.is_finite() && height > 0.0 && height.is_finite()) {
        return Err(OverlayError::InvalidConfig(format!(
            "view size must be positive, got {width}x{height}"
        )));
    }
    Ok(())
}

fn validate_view_angle(view_angle: f32) -> Result<()> {
    if !(view_angle > 0.0 && view_angle < PI) {
        return Err(OverlayError::InvalidConfig(format!(
            "view angle must be within (0, π), got {view_angle}"
        )));
    }
    Ok(())
}
