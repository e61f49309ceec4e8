use crate::camera::CameraModel;
use crate::marker::{
    adjust_for_collisions, MarkerSpec, MarkerState, RadarView, RenderItem, ScreenSize,
};
use crate::error::OverlayError;
use crate::types::GeographicPoint;
use log::{debug, log, trace, Level};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// The collection of markers, keyed by name.
///
/// Ingestion may happen from any thread while frames are rendered; a marker ingested
/// again under the same name replaces the previous one.
#[derive(Debug, Default)]
pub struct MarkerRegistry {
    markers: RwLock<HashMap<String, MarkerState>>,
}

impl MarkerRegistry {
    /// Initializes an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, MarkerState>> {
        self.markers.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, MarkerState>> {
        self.markers.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds or replaces markers and places them relative to the observer.
    ///
    /// ## Arguments
    /// * `specs` - The markers to ingest.
    /// * `observer` - The current observer location, if known.
    /// * `radar_range` - The distance covered by the radar, in meters.
    ///
    /// Returns the number of ingested markers.
    pub fn ingest(
        &self,
        specs: impl IntoIterator<Item = MarkerSpec>,
        observer: Option<&GeographicPoint>,
        radar_range: f32,
    ) -> usize {
        let mut markers = self.write();
        let mut count = 0;
        for spec in specs {
            let marker = match markers.entry(spec.name.clone()) {
                Entry::Occupied(entry) => {
                    let marker = entry.into_mut();
                    marker.replace_spec(spec);
                    marker
                }
                Entry::Vacant(entry) => entry.insert(MarkerState::new(spec)),
            };

            if let Err(e) = marker.update_location(observer, radar_range) {
                log!(
                    placement_failure_level(&e, observer),
                    "Marker {} not placed: {e}",
                    marker.name()
                );
            }
            count += 1;
        }

        debug!("Ingested {count} markers, {} in total", markers.len());
        count
    }

    /// Removes a marker by name.
    pub fn remove(&self, name: &str) -> bool {
        self.write().remove(name).is_some()
    }

    /// Removes all markers.
    pub fn clear(&self) {
        self.write().clear();
    }

    /// The number of markers.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Returns a copy of the named marker.
    pub fn get(&self, name: &str) -> Option<MarkerState> {
        self.read().get(name).cloned()
    }

    /// Sets the on-screen sizes of the named marker's icon and label.
    pub fn set_footprint(&self, name: &str, icon: ScreenSize, label: ScreenSize) -> bool {
        match self.write().get_mut(name) {
            Some(marker) => {
                marker.set_footprint(icon, label);
                true
            }
            None => false,
        }
    }

    /// Places all markers relative to a new observer location and resets collision lifts.
    pub fn update_location(&self, observer: &GeographicPoint, radar_range: f32) {
        let mut markers = self.write();
        for marker in markers.values_mut() {
            if let Err(e) = marker.update_location(Some(observer), radar_range) {
                log!(
                    placement_failure_level(&e, Some(observer)),
                    "Marker {} not placed: {e}",
                    marker.name()
                );
            }
        }
    }

    /// Projects all markers for the current frame.
    ///
    /// ## Arguments
    /// * `camera` - The camera with the rotation of the current frame set.
    /// * `label_lift` - The height of the label anchor above the icon anchor, in meters.
    /// * `radar_range` - The distance covered by the radar, in meters.
    /// * `resolve_collisions` - Whether overlapping markers are lifted for the next frame.
    pub fn update_frame(
        &self,
        camera: &CameraModel,
        label_lift: f32,
        radar_range: f32,
        resolve_collisions: bool,
    ) {
        let mut markers = self.write();
        for marker in markers.values_mut() {
            marker.update_frame(camera, label_lift, radar_range);
        }

        if resolve_collisions {
            let mut all: Vec<&mut MarkerState> = markers.values_mut().collect();
            let lifted = adjust_for_collisions(&mut all);
            if lifted > 0 {
                trace!("Lifted {lifted} overlapping markers");
            }
        }
    }

    /// Returns the visible markers, farthest first.
    pub fn render_items(&self) -> Vec<RenderItem> {
        let markers = self.read();
        let mut items: Vec<RenderItem> = markers
            .values()
            .filter(|marker| marker.is_visible())
            .map(RenderItem::from)
            .collect();
        items.sort_by(|a, b| b.distance.total_cmp(&a.distance));
        items
    }

    /// Builds the radar for the given viewing direction.
    pub fn radar_view(&self, radar_range: f32, azimuth: f32) -> RadarView {
        RadarView::build(self.read().values(), radar_range, azimuth)
    }

    /// Returns the name of the nearest marker hit by the screen point.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<String> {
        self.read()
            .values()
            .filter(|marker| marker.point_on_marker(x, y))
            .min_by(|a, b| a.distance().total_cmp(&b.distance()))
            .map(|marker| marker.name().to_owned())
    }
}

/// Markers ingested before the first location fix are expected to stay unplaced.
fn placement_failure_level(error: &OverlayError, observer: Option<&GeographicPoint>) -> Level {
    match (error, observer) {
        (OverlayError::MissingLocation, None) => Level::Trace,
        _ => Level::Warn,
    }
}
