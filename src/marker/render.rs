use crate::marker::{MarkerState, ScreenPoint, RADAR_DISPLAY_RADIUS};

/// Everything a renderer needs to draw a single marker.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderItem {
    pub name: String,
    /// The icon anchor, in pixels.
    pub icon: ScreenPoint,
    /// The label anchor, in pixels.
    pub label: ScreenPoint,
    /// The angle at which the label is drawn, in degrees.
    pub label_rotation_degrees: f32,
    /// The label text including the distance.
    pub text: String,
    /// The ARGB color of the marker.
    pub style: u32,
    /// The distance to the observer, in meters.
    pub distance: f64,
}

impl From<&MarkerState> for RenderItem {
    fn from(marker: &MarkerState) -> Self {
        Self {
            name: marker.name().to_owned(),
            icon: marker.icon_screen(),
            label: marker.label_screen(),
            label_rotation_degrees: marker.label_rotation_degrees(),
            text: marker.label_text(),
            style: marker.spec().style,
            distance: marker.distance(),
        }
    }
}

/// A marker drawn on the radar.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RadarBlip {
    pub name: String,
    /// Position relative to the radar center, in pixels; `y` points down.
    pub position: ScreenPoint,
    pub style: u32,
}

/// The radar as seen in the current viewing direction.
///
/// Blips are rotated such that the viewing direction points to the top of the radar.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RadarView {
    /// The display radius, in pixels.
    pub radius: f32,
    /// The distance covered by the radius, in meters.
    pub range: f32,
    /// The viewing direction, in degrees clockwise from north.
    pub azimuth: f32,
    pub blips: Vec<RadarBlip>,
}

impl RadarView {
    /// Builds the radar from all markers currently on the radar.
    ///
    /// ## Arguments
    /// * `markers` - The markers to consider; only those on the radar are drawn.
    /// * `range` - The distance covered by the radar, in meters.
    /// * `azimuth` - The viewing direction, in degrees clockwise from north.
    pub fn build<'a>(
        markers: impl IntoIterator<Item = &'a MarkerState>,
        range: f32,
        azimuth: f32,
    ) -> Self {
        let scale = range / RADAR_DISPLAY_RADIUS;
        let (sin, cos) = azimuth.to_radians().sin_cos();

        let blips = markers
            .into_iter()
            .filter(|marker| marker.on_radar())
            .map(|marker| {
                let x = marker.offset().x / scale;
                let y = marker.offset().z / scale;
                RadarBlip {
                    name: marker.name().to_owned(),
                    position: ScreenPoint::new(x * cos + y * sin, y * cos - x * sin),
                    style: marker.spec().style,
                }
            })
            .collect();

        Self {
            radius: RADAR_DISPLAY_RADIUS,
            range,
            azimuth,
            blips,
        }
    }
}
