//! Room resize handles.

use crate::geometry::inner_bounds;
use crate::model::Room;
use crate::mutations::MIN_ROOM_DIMENSION_CM;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Handle hit tolerance in screen pixels.
pub const HANDLE_HIT_TOLERANCE_PX: f64 = 8.0;

/// Which edges of the floor rectangle a handle drags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResizeHandle {
    #[serde(rename = "n")]
    North,
    #[serde(rename = "s")]
    South,
    #[serde(rename = "e")]
    East,
    #[serde(rename = "w")]
    West,
    #[serde(rename = "ne")]
    NorthEast,
    #[serde(rename = "nw")]
    NorthWest,
    #[serde(rename = "se")]
    SouthEast,
    #[serde(rename = "sw")]
    SouthWest,
}

impl ResizeHandle {
    /// Corners first so they win over edges when handles overlap on tiny rooms.
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::NorthWest,
        ResizeHandle::NorthEast,
        ResizeHandle::SouthEast,
        ResizeHandle::SouthWest,
        ResizeHandle::North,
        ResizeHandle::East,
        ResizeHandle::South,
        ResizeHandle::West,
    ];

    pub fn moves_north(self) -> bool {
        matches!(self, ResizeHandle::North | ResizeHandle::NorthEast | ResizeHandle::NorthWest)
    }

    pub fn moves_south(self) -> bool {
        matches!(self, ResizeHandle::South | ResizeHandle::SouthEast | ResizeHandle::SouthWest)
    }

    pub fn moves_east(self) -> bool {
        matches!(self, ResizeHandle::East | ResizeHandle::NorthEast | ResizeHandle::SouthEast)
    }

    pub fn moves_west(self) -> bool {
        matches!(self, ResizeHandle::West | ResizeHandle::NorthWest | ResizeHandle::SouthWest)
    }

    /// Handle location on a rectangle: corners, or edge midpoints.
    pub fn position(self, bounds: Rect) -> Point {
        let center = bounds.center();
        let x = if self.moves_west() {
            bounds.x0
        } else if self.moves_east() {
            bounds.x1
        } else {
            center.x
        };
        let y = if self.moves_north() {
            bounds.y0
        } else if self.moves_south() {
            bounds.y1
        } else {
            center.y
        };
        Point::new(x, y)
    }
}

/// A resize handle with its position.
#[derive(Debug, Clone, Copy)]
pub struct Handle {
    /// Position in world coordinates.
    pub position: Point,
    pub kind: ResizeHandle,
}

impl Handle {
    /// Check if a point (in world coordinates) hits this handle.
    /// `tolerance` should be adjusted for viewport zoom.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let dx = point.x - self.position.x;
        let dy = point.y - self.position.y;
        let dist_sq = dx * dx + dy * dy;
        dist_sq <= tolerance * tolerance
    }
}

/// Handles on a room's floor rectangle.
pub fn room_handles(room: &Room) -> Vec<Handle> {
    let bounds = inner_bounds(room, None);
    ResizeHandle::ALL
        .into_iter()
        .map(|kind| Handle {
            position: kind.position(bounds),
            kind,
        })
        .collect()
}

/// Find which handle (if any) is hit at the given point.
pub fn hit_test_handles(room: &Room, point: Point, tolerance: f64) -> Option<ResizeHandle> {
    room_handles(room)
        .into_iter()
        .find(|handle| handle.hit_test(point, tolerance))
        .map(|handle| handle.kind)
}

/// Drag the handle's edges of `start` by `delta`.
///
/// Moving edges stop at [`MIN_ROOM_DIMENSION_CM`] from the opposite edge, and
/// the north and west edges never cross zero.
pub fn apply_resize(start: Rect, handle: ResizeHandle, delta: Vec2) -> Rect {
    let mut bounds = start;

    if handle.moves_west() {
        bounds.x0 = (start.x0 + delta.x).min(start.x1 - MIN_ROOM_DIMENSION_CM).max(0.0);
    }
    if handle.moves_east() {
        bounds.x1 = (start.x1 + delta.x).max(start.x0 + MIN_ROOM_DIMENSION_CM);
    }
    if handle.moves_north() {
        bounds.y0 = (start.y0 + delta.y).min(start.y1 - MIN_ROOM_DIMENSION_CM).max(0.0);
    }
    if handle.moves_south() {
        bounds.y1 = (start.y1 + delta.y).max(start.y0 + MIN_ROOM_DIMENSION_CM);
    }

    bounds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_positions() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert_eq!(ResizeHandle::NorthWest.position(bounds), Point::new(0.0, 0.0));
        assert_eq!(ResizeHandle::East.position(bounds), Point::new(100.0, 25.0));
        assert_eq!(ResizeHandle::South.position(bounds), Point::new(50.0, 50.0));
    }

    #[test]
    fn test_hit_test_handles() {
        let room = Room::new("A", 100.0, 100.0, 200.0, 100.0);
        assert_eq!(
            hit_test_handles(&room, Point::new(302.0, 151.0), 4.0),
            Some(ResizeHandle::East)
        );
        assert_eq!(
            hit_test_handles(&room, Point::new(99.0, 99.0), 4.0),
            Some(ResizeHandle::NorthWest)
        );
        assert_eq!(hit_test_handles(&room, Point::new(200.0, 150.0), 4.0), None);
    }

    #[test]
    fn test_resize_edges() {
        let start = Rect::new(100.0, 100.0, 300.0, 200.0);
        let east = apply_resize(start, ResizeHandle::East, Vec2::new(50.0, 30.0));
        assert_eq!(east, Rect::new(100.0, 100.0, 350.0, 200.0));

        let nw = apply_resize(start, ResizeHandle::NorthWest, Vec2::new(-20.0, 10.0));
        assert_eq!(nw, Rect::new(80.0, 110.0, 300.0, 200.0));
    }

    #[test]
    fn test_resize_respects_minimum() {
        let start = Rect::new(100.0, 100.0, 300.0, 200.0);
        let west = apply_resize(start, ResizeHandle::West, Vec2::new(500.0, 0.0));
        assert!((west.width() - MIN_ROOM_DIMENSION_CM).abs() < f64::EPSILON);
        assert!((west.x1 - 300.0).abs() < f64::EPSILON);

        let south = apply_resize(start, ResizeHandle::South, Vec2::new(0.0, -500.0));
        assert!((south.height() - MIN_ROOM_DIMENSION_CM).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resize_clamps_at_origin() {
        let start = Rect::new(20.0, 20.0, 120.0, 120.0);
        let nw = apply_resize(start, ResizeHandle::NorthWest, Vec2::new(-50.0, -50.0));
        assert_eq!(nw, Rect::new(0.0, 0.0, 120.0, 120.0));
    }

    #[test]
    fn test_handle_serde_names() {
        let json = serde_json::to_string(&ResizeHandle::SouthEast).unwrap();
        assert_eq!(json, "\"se\"");
    }
}
