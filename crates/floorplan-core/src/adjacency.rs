//! Shared-wall detection between neighbouring rooms.
//!
//! Two rooms share a wall when their facing walls coincide, either stacked
//! back to back or overlapping after a wall-overlap snap. Exactly one of the
//! two renders the shared wall.

use crate::geometry::{inner_bounds, opening_global_span, outer_bounds, wall_start_cm};
use crate::model::{AppState, Room, RoomId, WallOpening, WallSide};

/// How close two wall edges must be to count as the same line.
///
/// Tighter than every snap tolerance, so only snapped or hand-aligned walls
/// are treated as shared.
pub const ADJACENCY_EPSILON_CM: f64 = 0.5;

/// A neighbour sharing one wall of a room.
#[derive(Debug, Clone, Copy)]
pub struct Adjacency<'a> {
    pub neighbor: &'a Room,
    /// The neighbour's side that faces back.
    pub neighbor_side: WallSide,
    /// Shared stretch along the wall, in global coordinates.
    pub span_start_cm: f64,
    pub span_end_cm: f64,
}

/// Inner and outer coordinate of one wall, across the wall's axis.
fn wall_edges(room: &Room, side: WallSide, global_thickness_cm: f64) -> (f64, f64) {
    let inner = inner_bounds(room, None);
    let outer = outer_bounds(room, global_thickness_cm, None).rect;
    match side {
        WallSide::North => (inner.y0, outer.y0),
        WallSide::South => (inner.y1, outer.y1),
        WallSide::East => (inner.x1, outer.x1),
        WallSide::West => (inner.x0, outer.x0),
    }
}

/// Inner extent of a room along the axis of `side`.
fn along_wall(room: &Room, side: WallSide) -> (f64, f64) {
    let inner = inner_bounds(room, None);
    if side.is_horizontal() {
        (inner.x0, inner.x1)
    } else {
        (inner.y0, inner.y1)
    }
}

fn near(a: f64, b: f64) -> bool {
    (a - b).abs() <= ADJACENCY_EPSILON_CM
}

/// Every room adjacent to `room` on `side`, in list order.
pub fn adjacent_rooms<'a>(
    state: &'a AppState,
    room: &'a Room,
    side: WallSide,
) -> impl Iterator<Item = Adjacency<'a>> + 'a {
    let global = state.global_wall_thickness_cm;
    let (inner, outer) = wall_edges(room, side, global);
    let (lo, hi) = along_wall(room, side);
    let neighbor_side = side.opposite();

    state.rooms.iter().filter(move |n| n.id != room.id).filter_map(move |neighbor| {
        let (n_inner, n_outer) = wall_edges(neighbor, neighbor_side, global);
        let coincides = near(outer, n_outer) || near(outer, n_inner) || near(inner, n_outer);
        if !coincides {
            return None;
        }
        let (n_lo, n_hi) = along_wall(neighbor, neighbor_side);
        let span_start_cm = lo.max(n_lo);
        let span_end_cm = hi.min(n_hi);
        if span_end_cm - span_start_cm <= ADJACENCY_EPSILON_CM {
            return None;
        }
        Some(Adjacency {
            neighbor,
            neighbor_side,
            span_start_cm,
            span_end_cm,
        })
    })
}

/// First neighbour sharing `room`'s wall on `side`.
pub fn find_adjacent_room<'a>(
    state: &'a AppState,
    room: &'a Room,
    side: WallSide,
) -> Option<Adjacency<'a>> {
    adjacent_rooms(state, room, side).next()
}

/// Id tie-break for shared-wall ownership: the lower id renders.
///
/// Exactly one of `owns_shared_wall(a, b)` and `owns_shared_wall(b, a)` holds
/// for distinct ids.
pub fn owns_shared_wall(room_id: RoomId, neighbor_id: RoomId) -> bool {
    room_id < neighbor_id
}

/// Whether `room` has an opening on `side` within the shared stretch.
fn has_opening_in_span(
    state: &AppState,
    room: &Room,
    side: WallSide,
    adjacency: &Adjacency<'_>,
) -> bool {
    let global = state.global_wall_thickness_cm;
    state.openings_on(room.id, side).any(|opening| {
        let (start, end) = opening_global_span(opening, room, global);
        start < adjacency.span_end_cm && end > adjacency.span_start_cm
    })
}

/// Whether `room` draws its wall on `side` given a detected adjacency.
///
/// The room whose side of the shared stretch carries openings renders it.
/// When both or neither do, the id tie-break decides.
pub fn should_render_shared_wall(
    state: &AppState,
    room: &Room,
    side: WallSide,
    adjacency: &Adjacency<'_>,
) -> bool {
    let own = has_opening_in_span(state, room, side, adjacency);
    let theirs =
        has_opening_in_span(state, adjacency.neighbor, adjacency.neighbor_side, adjacency);
    if own != theirs {
        return own;
    }
    owns_shared_wall(room.id, adjacency.neighbor.id)
}

/// An opening drawn on a wall, positioned in that wall's local coordinate.
#[derive(Debug, Clone, Copy)]
pub struct CombinedOpening<'a> {
    pub opening: &'a WallOpening,
    pub local_position_cm: f64,
    /// True if the opening belongs to the neighbour's facing wall.
    pub from_neighbor: bool,
}

/// All openings to draw on `room`'s wall on `side`, sorted by position.
///
/// With an adjacency, the neighbour's openings on the facing wall are
/// translated into this wall's local axis and merged in.
pub fn get_combined_wall_openings<'a>(
    state: &'a AppState,
    room: &Room,
    side: WallSide,
    adjacency: Option<&Adjacency<'_>>,
) -> Vec<CombinedOpening<'a>> {
    let global = state.global_wall_thickness_cm;
    let mut combined: Vec<CombinedOpening<'a>> = state
        .openings_on(room.id, side)
        .map(|opening| CombinedOpening {
            opening,
            local_position_cm: opening.position_cm,
            from_neighbor: false,
        })
        .collect();

    if let Some(adjacency) = adjacency {
        let offset = wall_start_cm(adjacency.neighbor, adjacency.neighbor_side, global)
            - wall_start_cm(room, side, global);
        combined.extend(
            state
                .openings_on(adjacency.neighbor.id, adjacency.neighbor_side)
                .map(|opening| CombinedOpening {
                    opening,
                    local_position_cm: opening.position_cm + offset,
                    from_neighbor: true,
                }),
        );
    }

    combined.sort_by(|a, b| a.local_position_cm.total_cmp(&b.local_position_cm));
    combined
}

/// One shared wall between two rooms, reported once per pair.
#[derive(Debug, Clone, PartialEq)]
pub struct SharedWall {
    pub room_id: RoomId,
    pub side: WallSide,
    pub neighbor_id: RoomId,
    pub neighbor_side: WallSide,
    pub span_start_cm: f64,
    pub span_end_cm: f64,
    /// The room that renders the wall.
    pub owner: RoomId,
}

/// Every shared wall in the plan.
pub fn shared_walls(state: &AppState) -> Vec<SharedWall> {
    let mut walls = Vec::new();
    for room in &state.rooms {
        for side in WallSide::ALL {
            for adjacency in adjacent_rooms(state, room, side) {
                if !owns_shared_wall(room.id, adjacency.neighbor.id) {
                    continue;
                }
                let owner = if should_render_shared_wall(state, room, side, &adjacency) {
                    room.id
                } else {
                    adjacency.neighbor.id
                };
                walls.push(SharedWall {
                    room_id: room.id,
                    side,
                    neighbor_id: adjacency.neighbor.id,
                    neighbor_side: adjacency.neighbor_side,
                    span_start_cm: adjacency.span_start_cm,
                    span_end_cm: adjacency.span_end_cm,
                    owner,
                });
            }
        }
    }
    walls
}
