use crate::camera::CameraModel;
use crate::error::Result;
use crate::geo::{distance_meters, relative_offset, with_known_altitude};
use crate::num_traits::angle_degrees;
use crate::types::{GeographicPoint, Vector3};

/// The radius of the radar display, in pixels.
pub const RADAR_DISPLAY_RADIUS: f32 = 48.0;

/// Objects closer than this (in camera space, along the view axis) are not on the radar.
const RADAR_MIN_DEPTH: f32 = 1.0;

/// Tolerance when testing the marker footprint against the viewport, in pixels.
const VIEW_TOLERANCE: f32 = 1.0;

/// The default size of a marker icon, in pixels.
pub const DEFAULT_ICON_SIZE: ScreenSize = ScreenSize::new(32.0, 32.0);

/// A point on the screen, in pixels from the top-left corner.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    /// Initializes a new [`ScreenPoint`] instance.
    #[inline(always)]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// The on-screen size of a marker element, in pixels.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScreenSize {
    pub width: f32,
    pub height: f32,
}

impl ScreenSize {
    /// Initializes a new [`ScreenSize`] instance.
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle given by its center and size.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScreenRect {
    pub center: ScreenPoint,
    pub size: ScreenSize,
}

impl ScreenRect {
    /// Determines whether the point lies within the rectangle, edges included.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        let half_width = self.size.width / 2.0;
        let half_height = self.size.height / 2.0;
        (x - self.center.x).abs() <= half_width && (y - self.center.y).abs() <= half_height
    }

    /// Returns the center followed by the four corners.
    pub fn probe_points(&self) -> [ScreenPoint; 5] {
        let half_width = self.size.width / 2.0;
        let half_height = self.size.height / 2.0;
        let ScreenPoint { x, y } = self.center;
        [
            self.center,
            ScreenPoint::new(x - half_width, y - half_height),
            ScreenPoint::new(x + half_width, y - half_height),
            ScreenPoint::new(x - half_width, y + half_height),
            ScreenPoint::new(x + half_width, y + half_height),
        ]
    }
}

/// A point of interest as delivered by a data source.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarkerSpec {
    /// The unique name of the marker.
    pub name: String,
    /// The marker position; an altitude of `0.0` means unknown.
    pub location: GeographicPoint,
    /// The ARGB color used to draw the marker.
    pub style: u32,
}

impl MarkerSpec {
    /// Initializes a new [`MarkerSpec`] instance.
    pub fn new(name: impl Into<String>, location: GeographicPoint, style: u32) -> Self {
        Self {
            name: name.into(),
            location,
            style,
        }
    }
}

/// The per-frame geometry of a single marker.
#[derive(Debug, Clone)]
pub struct MarkerState {
    spec: MarkerSpec,
    /// Offset from the observer in the world frame, in meters.
    offset: Vector3<f32>,
    /// Height added to the offset to resolve on-screen collisions, in meters.
    collision_lift: f32,
    /// Great-circle distance to the observer, in meters.
    distance: f64,
    has_offset: bool,
    icon_camera: Vector3<f32>,
    label_camera: Vector3<f32>,
    icon_screen: ScreenPoint,
    label_screen: ScreenPoint,
    icon_size: ScreenSize,
    label_size: ScreenSize,
    on_radar: bool,
    in_view: bool,
}

impl MarkerState {
    /// Initializes a new [`MarkerState`] without observer-relative geometry.
    pub fn new(spec: MarkerSpec) -> Self {
        let zero = Vector3::new(0.0, 0.0, 0.0);
        Self {
            spec,
            offset: zero,
            collision_lift: 0.0,
            distance: 0.0,
            has_offset: false,
            icon_camera: zero,
            label_camera: zero,
            icon_screen: ScreenPoint::default(),
            label_screen: ScreenPoint::default(),
            icon_size: DEFAULT_ICON_SIZE,
            label_size: ScreenSize::default(),
            on_radar: false,
            in_view: false,
        }
    }

    /// Replaces the marker data, keeping the on-screen sizes.
    pub fn replace_spec(&mut self, spec: MarkerSpec) {
        self.spec = spec;
        self.has_offset = false;
        self.on_radar = false;
        self.in_view = false;
    }

    /// Recomputes the distance, the offset and the radar membership for a new observer
    /// location. Resets the collision lift.
    ///
    /// ## Errors
    /// Returns [`OverlayError::MissingLocation`](crate::OverlayError::MissingLocation) if
    /// the observer is absent; the previous geometry is discarded in that case.
    pub fn update_location(
        &mut self,
        observer: Option<&GeographicPoint>,
        radar_range: f32,
    ) -> Result<()> {
        self.collision_lift = 0.0;
        let offset = match relative_offset(observer, Some(&self.spec.location)) {
            Ok(offset) => offset,
            Err(e) => {
                self.has_offset = false;
                self.on_radar = false;
                self.in_view = false;
                return Err(e);
            }
        };

        if let Some(observer) = observer {
            let target = with_known_altitude(&self.spec.location, observer);
            self.distance = distance_meters(observer, &target);
        }

        self.offset = offset;
        self.has_offset = true;
        self.update_radar(radar_range);
        Ok(())
    }

    /// Recomputes the camera-space and screen positions for the current frame, followed
    /// by the radar and view membership.
    ///
    /// ## Arguments
    /// * `camera` - The camera with the rotation of the current frame set.
    /// * `label_lift` - The height of the label anchor above the icon anchor, in meters.
    /// * `radar_range` - The distance covered by the radar, in meters.
    pub fn update_frame(&mut self, camera: &CameraModel, label_lift: f32, radar_range: f32) {
        if !self.has_offset {
            return;
        }

        let icon_world = self.offset + Vector3::new(0.0, self.collision_lift, 0.0);
        let label_world = icon_world + Vector3::new(0.0, label_lift, 0.0);
        self.icon_camera = camera.to_camera_space(&icon_world);
        self.label_camera = camera.to_camera_space(&label_world);

        let icon = camera.try_project(&self.icon_camera, 0.0, 0.0);
        let label = camera.try_project(&self.label_camera, 0.0, 0.0);
        if let (Ok((ix, iy)), Ok((lx, ly))) = (icon, label) {
            self.icon_screen = ScreenPoint::new(ix, iy);
            self.label_screen = ScreenPoint::new(lx, ly);
        }

        self.update_radar(radar_range);
        self.update_view(camera);
    }

    fn update_radar(&mut self, radar_range: f32) {
        self.on_radar = self.has_offset
            && radar_contains(&self.offset, radar_range)
            && self.icon_camera.z < -RADAR_MIN_DEPTH;
    }

    fn update_view(&mut self, camera: &CameraModel) {
        if self.icon_camera.z >= 0.0 || self.label_camera.z >= 0.0 {
            self.in_view = false;
            return;
        }

        let icon = ScreenRect {
            center: self.icon_screen,
            size: self.icon_size,
        };
        let label = ScreenRect {
            center: self.label_screen,
            size: self.label_size,
        };

        let left = (icon.center.x - icon.size.width / 2.0).min(label.center.x - label.size.width / 2.0);
        let right =
            (icon.center.x + icon.size.width / 2.0).max(label.center.x + label.size.width / 2.0);
        let top =
            (icon.center.y - icon.size.height / 2.0).min(label.center.y - label.size.height / 2.0);
        let bottom = (icon.center.y + icon.size.height / 2.0)
            .max(label.center.y + label.size.height / 2.0);

        self.in_view = right >= -VIEW_TOLERANCE
            && left <= camera.width() + VIEW_TOLERANCE
            && bottom >= -VIEW_TOLERANCE
            && top <= camera.height() + VIEW_TOLERANCE;
    }

    /// Returns the hit-test box of icon and label.
    ///
    /// The box is as wide as the wider element and as high as both combined, centered on
    /// the icon/label midpoint shifted down by half the label height.
    pub fn hit_box(&self) -> ScreenRect {
        let x = (self.icon_screen.x + self.label_screen.x) / 2.0;
        let y = (self.icon_screen.y + self.label_screen.y) / 2.0 + self.label_size.height / 2.0;
        ScreenRect {
            center: ScreenPoint::new(x, y),
            size: ScreenSize::new(
                self.icon_size.width.max(self.label_size.width),
                self.icon_size.height + self.label_size.height,
            ),
        }
    }

    /// Determines whether the screen point hits the marker.
    ///
    /// Only markers that are on the radar and in view can be hit.
    pub fn point_on_marker(&self, x: f32, y: f32) -> bool {
        self.is_visible() && self.hit_box().contains(x, y)
    }

    /// Determines whether another marker's center or one of its corners lies on this marker.
    pub fn marker_overlaps(&self, other: &MarkerState) -> bool {
        other
            .hit_box()
            .probe_points()
            .iter()
            .any(|point| self.point_on_marker(point.x, point.y))
    }

    /// The angle at which the label is drawn, in degrees.
    pub fn label_rotation_degrees(&self) -> f32 {
        angle_degrees(
            self.icon_screen.x,
            self.icon_screen.y,
            self.label_screen.x,
            self.label_screen.y,
        ) + 90.0
    }

    /// The label text: the name followed by the distance.
    pub fn label_text(&self) -> String {
        format_label(&self.spec.name, self.distance)
    }

    /// Sets the on-screen sizes of the icon and the label.
    pub fn set_footprint(&mut self, icon: ScreenSize, label: ScreenSize) {
        self.icon_size = icon;
        self.label_size = label;
    }

    pub(crate) fn set_collision_lift(&mut self, lift: f32) {
        self.collision_lift = lift;
    }

    /// Determines whether the marker is both on the radar and in view.
    pub fn is_visible(&self) -> bool {
        self.on_radar && self.in_view
    }

    /// The unique marker name.
    pub fn name(&self) -> &str {
        &self.spec.name
    }

    /// The marker data as ingested.
    pub fn spec(&self) -> &MarkerSpec {
        &self.spec
    }

    /// The offset from the observer, in meters.
    pub fn offset(&self) -> &Vector3<f32> {
        &self.offset
    }

    /// The height added to resolve collisions, in meters.
    pub fn collision_lift(&self) -> f32 {
        self.collision_lift
    }

    /// The great-circle distance to the observer, in meters.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// The icon anchor in camera space.
    pub fn icon_camera(&self) -> &Vector3<f32> {
        &self.icon_camera
    }

    /// The icon anchor on the screen.
    pub fn icon_screen(&self) -> ScreenPoint {
        self.icon_screen
    }

    /// The label anchor on the screen.
    pub fn label_screen(&self) -> ScreenPoint {
        self.label_screen
    }

    /// Whether the marker is within radar range and in front of the camera.
    pub fn on_radar(&self) -> bool {
        self.on_radar
    }

    /// Whether the marker footprint intersects the view.
    pub fn in_view(&self) -> bool {
        self.in_view
    }
}

/// Determines whether a world offset lies within the radar circle.
pub fn radar_contains(offset: &Vector3<f32>, radar_range: f32) -> bool {
    let scale = radar_range / RADAR_DISPLAY_RADIUS;
    let x = offset.x / scale;
    let z = offset.z / scale;
    x * x + z * z < RADAR_DISPLAY_RADIUS * RADAR_DISPLAY_RADIUS
}

fn format_label(name: &str, distance: f64) -> String {
    if distance < 1000.0 {
        format!("{name} ({distance:.0}m)")
    } else {
        format!("{name} ({:.2}km)", distance / 1000.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::camera::DEFAULT_VIEW_ANGLE;
    use crate::types::Matrix3;

    const OBSERVER: GeographicPoint = GeographicPoint::new(48.0, 11.0, 500.0);

    /// Returns a target roughly `meters` north of the observer.
    fn north_of_observer(meters: f64) -> GeographicPoint {
        let degrees = (meters / crate::geo::EARTH_RADIUS_METERS).to_degrees();
        GeographicPoint::new(OBSERVER.latitude + degrees, OBSERVER.longitude, 0.0)
    }

    fn camera() -> CameraModel {
        CameraModel::new(800.0, 600.0, DEFAULT_VIEW_ANGLE).unwrap()
    }

    fn marker_at(name: &str, location: GeographicPoint) -> MarkerState {
        let mut marker = MarkerState::new(MarkerSpec::new(name, location, 0xffff_0000));
        marker.set_footprint(ScreenSize::new(32.0, 32.0), ScreenSize::new(80.0, 20.0));
        marker
    }

    #[test]
    fn test_radar_range() {
        let range = 20_000.0;
        let camera = camera();

        let mut near = marker_at("near", north_of_observer(10_000.0));
        near.update_location(Some(&OBSERVER), range).unwrap();
        // The camera-space position is not known before the first frame.
        assert!(!near.on_radar());
        near.update_frame(&camera, 1.0, range);
        assert!(near.on_radar());

        let mut far = marker_at("far", north_of_observer(40_000.0));
        far.update_location(Some(&OBSERVER), range).unwrap();
        far.update_frame(&camera, 1.0, range);
        assert!(!far.on_radar());

        assert!(radar_contains(&Vector3::new(0.0, 0.0, -10_000.0), range));
        assert!(!radar_contains(&Vector3::new(0.0, 0.0, -40_000.0), range));
    }

    #[test]
    fn test_marker_behind_is_neither_visible_nor_on_radar() {
        let mut camera = camera();
        // Facing south.
        camera.set_frame(
            Matrix3::rotation_y(core::f32::consts::PI),
            Vector3::new(0.0, 0.0, 0.0),
        );

        let mut marker = marker_at("behind", north_of_observer(1000.0));
        marker.update_location(Some(&OBSERVER), 20_000.0).unwrap();
        marker.update_frame(&camera, 1.0, 20_000.0);
        assert!(!marker.on_radar());
        assert!(!marker.in_view());
        assert!(!marker.point_on_marker(400.0, 300.0));
    }

    #[test]
    fn test_projection_and_hit_test() {
        let camera = camera();
        let mut marker = marker_at("ahead", north_of_observer(1000.0));
        marker.update_location(Some(&OBSERVER), 20_000.0).unwrap();
        marker.update_frame(&camera, 1.0, 20_000.0);

        assert!(marker.is_visible());
        let icon = marker.icon_screen();
        assert!((icon.x - 400.0).abs() < 0.5 && (icon.y - 300.0).abs() < 0.5);
        // The label is drawn above the icon.
        assert!(marker.label_screen().y < icon.y);

        assert!(marker.point_on_marker(icon.x, icon.y));
        assert!(marker.point_on_marker(icon.x + 39.0, icon.y));
        assert!(!marker.point_on_marker(icon.x + 41.0, icon.y));
        assert!(!marker.point_on_marker(icon.x, icon.y + 100.0));
    }

    #[test]
    fn test_hit_box_geometry() {
        let mut marker = marker_at("box", OBSERVER);
        marker.icon_screen = ScreenPoint::new(100.0, 200.0);
        marker.label_screen = ScreenPoint::new(100.0, 180.0);

        let hit_box = marker.hit_box();
        assert_eq!(hit_box.center, ScreenPoint::new(100.0, 200.0));
        assert_eq!(hit_box.size, ScreenSize::new(80.0, 52.0));
        assert!(hit_box.contains(140.0, 226.0));
        assert!(!hit_box.contains(140.5, 200.0));
    }

    #[test]
    fn test_overlap() {
        let camera = camera();
        let mut a = marker_at("a", north_of_observer(1000.0));
        let mut b = marker_at("b", north_of_observer(1100.0));
        let mut c = marker_at("c", GeographicPoint::new(48.01, 11.01, 0.0));
        for marker in [&mut a, &mut b, &mut c] {
            marker.update_location(Some(&OBSERVER), 20_000.0).unwrap();
            marker.update_frame(&camera, 1.0, 20_000.0);
        }

        assert!(a.marker_overlaps(&b));
        assert!(b.marker_overlaps(&a));
        assert!(!a.marker_overlaps(&c));
    }

    #[test]
    fn test_missing_observer() {
        let mut marker = marker_at("lost", north_of_observer(100.0));
        assert!(marker.update_location(None, 20_000.0).is_err());
        marker.update_frame(&camera(), 1.0, 20_000.0);
        assert!(!marker.is_visible());
    }

    #[test]
    fn test_altitude_sentinel_gives_level_offset() {
        let mut marker = marker_at("level", north_of_observer(500.0));
        marker.update_location(Some(&OBSERVER), 20_000.0).unwrap();
        assert_eq!(marker.offset().y, 0.0);
    }

    #[test]
    fn test_collision_lift_is_reset_on_location_change() {
        let mut marker = marker_at("lifted", north_of_observer(500.0));
        marker.set_collision_lift(200.0);
        marker.update_location(Some(&OBSERVER), 20_000.0).unwrap();
        assert_eq!(marker.collision_lift(), 0.0);
    }

    #[test]
    fn test_label_text() {
        assert_eq!(format_label("Tower", 123.4), "Tower (123m)");
        assert_eq!(format_label("Tower", 1234.0), "Tower (1.23km)");
    }

    #[test]
    fn test_label_rotation() {
        let mut marker = marker_at("rotated", OBSERVER);
        marker.icon_screen = ScreenPoint::new(100.0, 200.0);
        marker.label_screen = ScreenPoint::new(100.0, 180.0);
        assert!(marker.label_rotation_degrees().abs() < 1e-4);
    }
}
