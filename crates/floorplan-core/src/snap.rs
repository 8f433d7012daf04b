//! Snapping for dragged rooms and placed objects.
//!
//! Rooms use first-match: the first peer that offers a candidate on an axis
//! locks that axis. Objects use best-distance: every candidate is tested and
//! the nearest one wins per axis.

use crate::geometry::{inner_bounds, object_visual_bounds, outer_bounds, visual_size};
use crate::model::{AppState, PlacedObject, Room, RoomId};
use kurbo::Point;

/// Outer-edge alignment tolerance between rooms.
pub const SNAP_TOLERANCE_CM: f64 = 2.0;
/// Wall-overlap tolerance between a room's outer edge and a peer's inner edge.
pub const WALL_SNAP_TOLERANCE_CM: f64 = 15.0;
/// Object edge to containing room inner edge.
pub const OBJECT_SNAP_TOLERANCE_CM: f64 = 25.0;
/// Object edge to another object's edge in the same room.
pub const OBJECT_TO_OBJECT_SNAP_TOLERANCE_CM: f64 = 15.0;

/// Result of a snap operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// Snapped (or unchanged) x.
    pub x_cm: f64,
    /// Snapped (or unchanged) y.
    pub y_cm: f64,
    /// Whether the X coordinate was snapped.
    pub snapped_x: bool,
    /// Whether the Y coordinate was snapped.
    pub snapped_y: bool,
    /// Vertical guide line at the matched x edge, for display.
    pub x_guide_cm: Option<f64>,
    /// Horizontal guide line at the matched y edge, for display.
    pub y_guide_cm: Option<f64>,
}

impl SnapResult {
    /// Create a result with no snapping.
    pub fn none(point: Point) -> Self {
        Self {
            x_cm: point.x,
            y_cm: point.y,
            snapped_x: false,
            snapped_y: false,
            x_guide_cm: None,
            y_guide_cm: None,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x_cm, self.y_cm)
    }

    /// Check if any snapping occurred.
    pub fn is_snapped(&self) -> bool {
        self.snapped_x || self.snapped_y
    }
}

/// One room projected onto a single axis.
#[derive(Debug, Clone, Copy)]
struct AxisSpan {
    inner_lo: f64,
    inner_hi: f64,
    lo_wall: f64,
    hi_wall: f64,
}

impl AxisSpan {
    fn new(room: &Room, at: Option<Point>, global_thickness_cm: f64, horizontal: bool) -> Self {
        let inner = inner_bounds(room, at);
        let thickness = outer_bounds(room, global_thickness_cm, at).thickness;
        if horizontal {
            Self {
                inner_lo: inner.x0,
                inner_hi: inner.x1,
                lo_wall: thickness.west,
                hi_wall: thickness.east,
            }
        } else {
            Self {
                inner_lo: inner.y0,
                inner_hi: inner.y1,
                lo_wall: thickness.north,
                hi_wall: thickness.south,
            }
        }
    }

    fn outer_lo(&self) -> f64 {
        self.inner_lo - self.lo_wall
    }

    fn outer_hi(&self) -> f64 {
        self.inner_hi + self.hi_wall
    }

    fn size(&self) -> f64 {
        self.inner_hi - self.inner_lo
    }

    /// Inner start that puts the outer low edge at `edge`.
    fn start_for_outer_lo(&self, edge: f64) -> f64 {
        edge + self.lo_wall
    }

    /// Inner start that puts the outer high edge at `edge`.
    fn start_for_outer_hi(&self, edge: f64) -> f64 {
        edge - self.hi_wall - self.size()
    }
}

/// First candidate on one axis, as (inner start, guide coordinate).
fn snap_room_axis(moving: &AxisSpan, peer: &AxisSpan) -> Option<(f64, f64)> {
    // Walls overlap: our outer edge lands exactly on the peer's inner edge
    if (moving.outer_hi() - peer.inner_lo).abs() <= WALL_SNAP_TOLERANCE_CM {
        return Some((moving.start_for_outer_hi(peer.inner_lo), peer.inner_lo));
    }
    if (moving.outer_lo() - peer.inner_hi).abs() <= WALL_SNAP_TOLERANCE_CM {
        return Some((moving.start_for_outer_lo(peer.inner_hi), peer.inner_hi));
    }

    let alignments = [
        (moving.outer_lo(), peer.outer_lo(), true),
        (moving.outer_hi(), peer.outer_hi(), false),
        (moving.outer_lo(), peer.outer_hi(), true),
        (moving.outer_hi(), peer.outer_lo(), false),
    ];
    alignments
        .into_iter()
        .find(|(ours, theirs, _)| (ours - theirs).abs() <= SNAP_TOLERANCE_CM)
        .map(|(_, theirs, low_edge)| {
            let start = if low_edge {
                moving.start_for_outer_lo(theirs)
            } else {
                moving.start_for_outer_hi(theirs)
            };
            (start, theirs)
        })
}

/// Snap a room being dragged to `target` (its candidate inner top-left)
/// against `peers`. The room itself is skipped if it appears among them.
pub fn calculate_snap<'a>(
    room: &Room,
    target: Point,
    peers: impl IntoIterator<Item = &'a Room>,
    global_thickness_cm: f64,
) -> SnapResult {
    let mut result = SnapResult::none(target);

    let moving_x = AxisSpan::new(room, Some(target), global_thickness_cm, true);
    let moving_y = AxisSpan::new(room, Some(target), global_thickness_cm, false);

    for peer in peers {
        if peer.id == room.id {
            continue;
        }

        if !result.snapped_x {
            let span = AxisSpan::new(peer, None, global_thickness_cm, true);
            if let Some((x, guide)) = snap_room_axis(&moving_x, &span) {
                result.x_cm = x;
                result.snapped_x = true;
                result.x_guide_cm = Some(guide);
            }
        }
        if !result.snapped_y {
            let span = AxisSpan::new(peer, None, global_thickness_cm, false);
            if let Some((y, guide)) = snap_room_axis(&moving_y, &span) {
                result.y_cm = y;
                result.snapped_y = true;
                result.y_guide_cm = Some(guide);
            }
        }
        if result.snapped_x && result.snapped_y {
            break;
        }
    }

    result
}

/// Snap a room against every room in `state` except itself and `exclude`.
///
/// Rooms moving together in a multi-selection drag are passed as `exclude`.
pub fn calculate_room_snap(
    state: &AppState,
    room: &Room,
    target: Point,
    exclude: &[RoomId],
) -> SnapResult {
    let peers = state.rooms.iter().filter(|r| !exclude.contains(&r.id));
    calculate_snap(room, target, peers, state.global_wall_thickness_cm)
}

/// Nearest candidate seen so far on one axis.
#[derive(Debug, Clone, Copy)]
struct AxisCandidate {
    start: f64,
    guide: f64,
    distance: f64,
}

#[derive(Debug, Default)]
struct BestAxis(Option<AxisCandidate>);

impl BestAxis {
    /// Offer an edge pairing. `start` is the box start that would make the
    /// edges coincide.
    fn offer(&mut self, ours: f64, theirs: f64, start: f64, tolerance: f64) {
        let distance = (ours - theirs).abs();
        if distance > tolerance {
            return;
        }
        if self.0.is_none_or(|best| distance < best.distance) {
            self.0 = Some(AxisCandidate {
                start,
                guide: theirs,
                distance,
            });
        }
    }

    /// Offer every flush and align pairing between `lo..hi` and `other_lo..other_hi`.
    fn offer_edges(&mut self, lo: f64, size: f64, other_lo: f64, other_hi: f64, tolerance: f64) {
        let hi = lo + size;
        // Flush against the other box
        self.offer(lo, other_hi, other_hi, tolerance);
        self.offer(hi, other_lo, other_lo - size, tolerance);
        // Aligned with the other box
        self.offer(lo, other_lo, other_lo, tolerance);
        self.offer(hi, other_hi, other_hi - size, tolerance);
    }
}

/// Snap a placed object's visual top-left `target_visual` against its room's
/// inner edges and the other objects in the same room.
///
/// Input and output are in visual space; convert back with
/// [`crate::geometry::storage_from_visual`].
pub fn calculate_placed_object_snap(
    state: &AppState,
    object: &PlacedObject,
    target_visual: Point,
) -> SnapResult {
    let index = state.index();
    let Some(def) = index.def(object.object_def_id) else {
        log::debug!("No object def {} for snap", object.object_def_id);
        return SnapResult::none(target_visual);
    };
    let (width, height) = visual_size(def.width_cm, def.height_cm, object.rotation);

    let mut best_x = BestAxis::default();
    let mut best_y = BestAxis::default();

    if let Some(room) = index.room(object.room_id) {
        let inner = inner_bounds(room, None);
        best_x.offer(target_visual.x, inner.x0, inner.x0, OBJECT_SNAP_TOLERANCE_CM);
        best_x.offer(target_visual.x + width, inner.x1, inner.x1 - width, OBJECT_SNAP_TOLERANCE_CM);
        best_y.offer(target_visual.y, inner.y0, inner.y0, OBJECT_SNAP_TOLERANCE_CM);
        best_y.offer(
            target_visual.y + height,
            inner.y1,
            inner.y1 - height,
            OBJECT_SNAP_TOLERANCE_CM,
        );
    }

    for other in index.objects_in_room(object.room_id) {
        if other.id == object.id {
            continue;
        }
        let Some(other_def) = index.def(other.object_def_id) else {
            continue;
        };
        let bounds = object_visual_bounds(other, other_def);
        let tolerance = OBJECT_TO_OBJECT_SNAP_TOLERANCE_CM;
        best_x.offer_edges(target_visual.x, width, bounds.x0, bounds.x1, tolerance);
        best_y.offer_edges(target_visual.y, height, bounds.y0, bounds.y1, tolerance);
    }

    let mut result = SnapResult::none(target_visual);
    if let Some(candidate) = best_x.0 {
        result.x_cm = candidate.start;
        result.snapped_x = true;
        result.x_guide_cm = Some(candidate.guide);
    }
    if let Some(candidate) = best_y.0 {
        result.y_cm = candidate.start;
        result.snapped_y = true;
        result.y_guide_cm = Some(candidate.guide);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ObjectDef, WallSide, WallThickness};

    fn room_a() -> Room {
        Room::new("A", 0.0, 0.0, 300.0, 400.0)
    }

    #[test]
    fn test_snap_result_none() {
        let result = SnapResult::none(Point::new(3.0, 4.0));
        assert!(!result.is_snapped());
        assert_eq!(result.position(), Point::new(3.0, 4.0));
    }

    #[test]
    fn test_room_snaps_onto_neighbor_wall_from_east() {
        let a = room_a();
        let b = Room::new("B", 600.0, 100.0, 200.0, 200.0);

        // B's outer left at 302, within 15 of A's inner right
        let result = calculate_snap(&b, Point::new(312.0, 100.0), [&a], 10.0);
        assert!(result.snapped_x);
        assert!((result.x_cm - 310.0).abs() < f64::EPSILON);
        assert!((result.x_cm - 10.0 - 300.0).abs() < f64::EPSILON);
        assert_eq!(result.x_guide_cm, Some(300.0));
        assert!(!result.snapped_y);
        assert!((result.y_cm - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_wall_overlap_zero_residual() {
        let a = room_a();
        let mut thickness = WallThickness::default();
        thickness.set(WallSide::East, Some(17.5));
        let b = Room::new("B", 0.0, 0.0, 123.0, 80.0).with_wall_thickness(thickness);

        for offset in [-14.0, -3.25, 0.0, 7.5, 14.9] {
            // Approach A's west wall from the left
            let target_x = -123.0 - 17.5 + offset;
            let result = calculate_snap(&b, Point::new(target_x, 150.0), [&a], 10.0);
            assert!(result.snapped_x, "offset {}", offset);
            let outer = outer_bounds(&b, 10.0, Some(result.position())).rect;
            assert_eq!(outer.x1, inner_bounds(&a, None).x0);
        }
    }

    #[test]
    fn test_outer_alignment_snap() {
        let a = room_a();
        let b = Room::new("B", 0.0, 0.0, 200.0, 100.0);

        // Far to the east, top edges within 2 cm of each other
        let result = calculate_snap(&b, Point::new(900.0, 1.0), [&a], 10.0);
        assert!(!result.snapped_x);
        assert!(result.snapped_y);
        assert!((result.y_cm - 0.0).abs() < f64::EPSILON);
        assert_eq!(result.y_guide_cm, Some(-10.0));
    }

    #[test]
    fn test_axes_are_independent() {
        let a = room_a();
        let b = Room::new("B", 0.0, 0.0, 200.0, 200.0);

        let x_only = calculate_snap(&b, Point::new(312.0, 100.0), [&a], 10.0);
        let both = calculate_snap(&b, Point::new(312.0, 1.0), [&a], 10.0);
        assert!((x_only.x_cm - both.x_cm).abs() < f64::EPSILON);
        assert!(both.snapped_y);
        assert!((both.y_cm - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_first_peer_wins() {
        let b = Room::new("B", 0.0, 0.0, 100.0, 100.0);
        let first = Room::new("P1", 0.0, 0.0, 300.0, 300.0);
        let second = Room::new("P2", 0.0, 500.0, 305.0, 300.0);

        // Both peers offer an x candidate; the first one in order locks x
        let result = calculate_snap(&b, Point::new(312.0, 1000.0), [&first, &second], 10.0);
        assert!((result.x_cm - 310.0).abs() < f64::EPSILON);
        let result = calculate_snap(&b, Point::new(312.0, 1000.0), [&second, &first], 10.0);
        assert!((result.x_cm - 315.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_skips_self_and_excluded() {
        let mut state = AppState::new();
        let a = room_a();
        let b = Room::new("B", 500.0, 500.0, 200.0, 200.0);
        state.rooms = vec![a.clone(), b.clone()];

        let result = calculate_room_snap(&state, &b, Point::new(312.0, 500.0), &[]);
        assert!(result.snapped_x);
        let result = calculate_room_snap(&state, &b, Point::new(312.0, 500.0), &[a.id]);
        assert!(!result.is_snapped());
        let result = calculate_room_snap(&state, &b, b.position(), &[a.id]);
        assert!(!result.is_snapped());
    }

    fn object_state(order_reversed: bool) -> (AppState, PlacedObject) {
        let mut state = AppState::new();
        let room = Room::new("Kitchen", 0.0, 0.0, 400.0, 400.0);
        let def = ObjectDef::new("Chair", 50.0, 50.0);
        let narrow = ObjectDef::new("Lamp", 10.0, 10.0);
        let moving = PlacedObject::new(def.id, room.id, 200.0, 200.0);
        // Flush candidates 8 cm and 10 cm away from a box starting at x = 20
        let near = PlacedObject::new(narrow.id, room.id, 2.0, 300.0);
        let far = PlacedObject::new(narrow.id, room.id, 80.0, 300.0);
        state.rooms.push(room);
        state.object_defs = vec![def, narrow];
        state.placed_objects = if order_reversed {
            vec![moving.clone(), far, near]
        } else {
            vec![moving.clone(), near, far]
        };
        (state, moving)
    }

    #[test]
    fn test_object_snap_nearest_wins_regardless_of_order() {
        for reversed in [false, true] {
            let (state, moving) = object_state(reversed);
            let result = calculate_placed_object_snap(&state, &moving, Point::new(20.0, 150.0));
            assert!(result.snapped_x);
            assert!((result.x_cm - 12.0).abs() < f64::EPSILON, "reversed {}", reversed);
            assert_eq!(result.x_guide_cm, Some(12.0));
            assert!(!result.snapped_y);
        }
    }

    #[test]
    fn test_object_snaps_to_room_wall() {
        let (state, moving) = object_state(false);
        let result = calculate_placed_object_snap(&state, &moving, Point::new(200.0, 330.0));
        assert!(result.snapped_y);
        // Bottom edge 380 is 20 from the inner bottom at 400
        assert!((result.y_cm - 350.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_object_snap_uses_rotated_footprint() {
        let mut state = AppState::new();
        let room = Room::new("Hall", 0.0, 0.0, 400.0, 400.0);
        let def = ObjectDef::new("Bed", 100.0, 40.0);
        let mut bed = PlacedObject::new(def.id, room.id, 100.0, 100.0);
        bed.rotation = 90.0;
        state.rooms.push(room);
        state.object_defs.push(def);
        state.placed_objects.push(bed.clone());

        // Visual width is 40, so the right edge at 380 sits 20 from the wall
        let result = calculate_placed_object_snap(&state, &bed, Point::new(340.0, 150.0));
        assert!(result.snapped_x);
        assert!((result.x_cm - 360.0).abs() < f64::EPSILON);
    }
}
