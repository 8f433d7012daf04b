//! Pure geometry over rooms, walls and placed objects.

use crate::model::{ObjectDef, PlacedObject, Room, WallOpening, WallSide};
use kurbo::{Point, Rect};

/// Effective wall thickness on each side of a room.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedThickness {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl ResolvedThickness {
    pub fn get(&self, side: WallSide) -> f64 {
        match side {
            WallSide::North => self.north,
            WallSide::South => self.south,
            WallSide::East => self.east,
            WallSide::West => self.west,
        }
    }
}

/// Outer bounds of a room together with the thickness used to compute them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OuterBounds {
    pub rect: Rect,
    pub thickness: ResolvedThickness,
}

/// Resolve every side's thickness against the global default.
pub fn resolve_thickness(room: &Room, global_thickness_cm: f64) -> ResolvedThickness {
    ResolvedThickness {
        north: room.thickness(WallSide::North, global_thickness_cm),
        south: room.thickness(WallSide::South, global_thickness_cm),
        east: room.thickness(WallSide::East, global_thickness_cm),
        west: room.thickness(WallSide::West, global_thickness_cm),
    }
}

/// Floor rectangle of a room, at its stored position or at `at`.
pub fn inner_bounds(room: &Room, at: Option<Point>) -> Rect {
    let origin = at.unwrap_or_else(|| room.position());
    Rect::new(
        origin.x,
        origin.y,
        origin.x + room.width_cm,
        origin.y + room.height_cm,
    )
}

/// Floor rectangle grown outward by each wall's thickness.
pub fn outer_bounds(room: &Room, global_thickness_cm: f64, at: Option<Point>) -> OuterBounds {
    let inner = inner_bounds(room, at);
    let thickness = resolve_thickness(room, global_thickness_cm);
    OuterBounds {
        rect: Rect::new(
            inner.x0 - thickness.west,
            inner.y0 - thickness.north,
            inner.x1 + thickness.east,
            inner.y1 + thickness.south,
        ),
        thickness,
    }
}

/// Whether a rotation swaps the visual width and height.
///
/// Angles that are not quarter turns are classified by the nearest one.
pub fn swaps_axes(rotation_deg: f64) -> bool {
    let quarters = (rotation_deg / 90.0).round() as i64;
    quarters.rem_euclid(2) == 1
}

/// Visual (width, height) of a footprint at a rotation.
pub fn visual_size(width_cm: f64, height_cm: f64, rotation_deg: f64) -> (f64, f64) {
    if swaps_axes(rotation_deg) {
        (height_cm, width_cm)
    } else {
        (width_cm, height_cm)
    }
}

/// Rotation-aware bounding box of a stored rectangle. The centre is preserved.
pub fn visual_bounds(position: Point, width_cm: f64, height_cm: f64, rotation_deg: f64) -> Rect {
    if !swaps_axes(rotation_deg) {
        return Rect::new(position.x, position.y, position.x + width_cm, position.y + height_cm);
    }
    let shift = (width_cm - height_cm) / 2.0;
    let x0 = position.x + shift;
    let y0 = position.y - shift;
    Rect::new(x0, y0, x0 + height_cm, y0 + width_cm)
}

/// Inverse of [`visual_bounds`]: the stored top-left for a desired visual top-left.
pub fn storage_from_visual(
    visual_top_left: Point,
    width_cm: f64,
    height_cm: f64,
    rotation_deg: f64,
) -> Point {
    if !swaps_axes(rotation_deg) {
        return visual_top_left;
    }
    let shift = (width_cm - height_cm) / 2.0;
    Point::new(visual_top_left.x - shift, visual_top_left.y + shift)
}

/// Visual bounds of a placed object using its definition's footprint.
pub fn object_visual_bounds(object: &PlacedObject, def: &ObjectDef) -> Rect {
    visual_bounds(object.position(), def.width_cm, def.height_cm, object.rotation)
}

/// Coordinate where a wall's local axis starts.
///
/// Horizontal walls start at the outer west edge, vertical walls at the outer
/// north edge, so corners belong to the wall's length.
pub fn wall_start_cm(room: &Room, side: WallSide, global_thickness_cm: f64) -> f64 {
    let outer = outer_bounds(room, global_thickness_cm, None).rect;
    if side.is_horizontal() { outer.x0 } else { outer.y0 }
}

/// Outer corner-to-corner length of a wall.
pub fn wall_length_cm(room: &Room, side: WallSide, global_thickness_cm: f64) -> f64 {
    let outer = outer_bounds(room, global_thickness_cm, None).rect;
    if side.is_horizontal() { outer.width() } else { outer.height() }
}

/// Global (start, end) of an opening along its wall's axis.
pub fn opening_global_span(
    opening: &WallOpening,
    room: &Room,
    global_thickness_cm: f64,
) -> (f64, f64) {
    let start = wall_start_cm(room, opening.wall, global_thickness_cm) + opening.position_cm;
    (start, start + opening.width_cm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OpeningKind, WallThickness};

    #[test]
    fn test_inner_bounds_override() {
        let room = Room::new("A", 10.0, 20.0, 300.0, 400.0);
        let stored = inner_bounds(&room, None);
        assert_eq!(stored, Rect::new(10.0, 20.0, 310.0, 420.0));
        let moved = inner_bounds(&room, Some(Point::new(0.0, 0.0)));
        assert_eq!(moved, Rect::new(0.0, 0.0, 300.0, 400.0));
    }

    #[test]
    fn test_outer_bounds_per_side() {
        let mut thickness = WallThickness::default();
        thickness.set(WallSide::East, Some(20.0));
        let room = Room::new("A", 0.0, 0.0, 300.0, 400.0).with_wall_thickness(thickness);
        let outer = outer_bounds(&room, 10.0, None);
        assert_eq!(outer.rect, Rect::new(-10.0, -10.0, 320.0, 410.0));
        assert!((outer.thickness.get(WallSide::East) - 20.0).abs() < f64::EPSILON);
        assert!((outer.thickness.west - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_visual_bounds_half_turn_unchanged() {
        let bounds = visual_bounds(Point::new(10.0, 10.0), 80.0, 40.0, 180.0);
        assert_eq!(bounds, Rect::new(10.0, 10.0, 90.0, 50.0));
    }

    #[test]
    fn test_visual_bounds_quarter_turn_preserves_center() {
        let position = Point::new(100.0, 50.0);
        let stored = Rect::new(100.0, 50.0, 180.0, 90.0);
        let visual = visual_bounds(position, 80.0, 40.0, 90.0);
        assert!((visual.width() - 40.0).abs() < f64::EPSILON);
        assert!((visual.height() - 80.0).abs() < f64::EPSILON);
        assert_eq!(visual.center(), stored.center());
    }

    #[test]
    fn test_rotation_roundtrip_exact() {
        for rotation in [90.0, 270.0, -90.0, 450.0] {
            for (w, h) in [(80.0, 40.0), (35.0, 120.0), (61.0, 17.0)] {
                let position = Point::new(123.0, 77.0);
                let visual = visual_bounds(position, w, h, rotation);
                let back = storage_from_visual(visual.origin(), w, h, rotation);
                assert_eq!(back, position, "rotation {} size {}x{}", rotation, w, h);
            }
        }
    }

    #[test]
    fn test_swaps_axes_nearest_quarter() {
        assert!(!swaps_axes(0.0));
        assert!(swaps_axes(90.0));
        assert!(!swaps_axes(180.0));
        assert!(swaps_axes(270.0));
        assert!(swaps_axes(-90.0));
        assert!(swaps_axes(100.0));
        assert!(!swaps_axes(30.0));
    }

    #[test]
    fn test_wall_axis_includes_corners() {
        let room = Room::new("A", 100.0, 200.0, 300.0, 400.0);
        assert!((wall_start_cm(&room, WallSide::North, 10.0) - 90.0).abs() < f64::EPSILON);
        assert!((wall_start_cm(&room, WallSide::East, 10.0) - 190.0).abs() < f64::EPSILON);
        assert!((wall_length_cm(&room, WallSide::South, 10.0) - 320.0).abs() < f64::EPSILON);
        assert!((wall_length_cm(&room, WallSide::West, 10.0) - 420.0).abs() < f64::EPSILON);

        let door = WallOpening::new(room.id, WallSide::North, 50.0, 90.0, OpeningKind::Door);
        assert_eq!(opening_global_span(&door, &room, 10.0), (140.0, 230.0));
    }
}
