use crate::marker::MarkerState;

/// The height by which an overlapping marker is lifted per collision, in meters.
pub const COLLISION_LIFT_METERS: f32 = 100.0;

/// Lifts markers that overlap a closer visible marker on the screen.
///
/// Markers are visited nearest first. Every visible marker lifts each in-view marker it
/// overlaps by [`COLLISION_LIFT_METERS`] times the running collision count of that
/// marker; a lifted marker is not visited again. Lifts take effect on the next frame and
/// stay in place until the observer location changes.
///
/// Returns the number of lifted markers.
pub fn adjust_for_collisions(markers: &mut [&mut MarkerState]) -> usize {
    markers.sort_by(|a, b| a.distance().total_cmp(&b.distance()));

    let mut updated = vec![false; markers.len()];
    let mut lifts = Vec::new();

    for i in 0..markers.len() {
        if updated[i] || !markers[i].is_visible() {
            continue;
        }

        let mut collisions = 1_u16;
        for j in 0..markers.len() {
            if i == j || updated[j] || !markers[j].in_view() {
                continue;
            }

            if markers[i].marker_overlaps(&markers[j]) {
                lifts.push((j, f32::from(collisions) * COLLISION_LIFT_METERS));
                collisions = collisions.saturating_add(1);
                updated[j] = true;
            }
        }

        updated[i] = true;
    }

    for &(index, lift) in &lifts {
        log::trace!("Lifting marker {} by {lift} m", markers[index].name());
        markers[index].set_collision_lift(lift);
    }

    lifts.len()
}
