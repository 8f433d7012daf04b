//! Pure state mutators.
//!
//! Every function borrows the current [`AppState`] and returns a new one.
//! Missing ids leave the state unchanged. Geometry is clamped to
//! non-negative coordinates rather than rejected.

use crate::geometry::{storage_from_visual, visual_bounds};
use crate::model::{
    AppState, ObjectDef, ObjectDefId, OpeningId, OpeningKind, PlacedObject, PlacedObjectId, Room,
    RoomId, WallOpening, WallSide,
};
use crate::viewport::Viewport;
use kurbo::{Point, Rect, Vec2};
use std::collections::HashSet;
use uuid::Uuid;

/// Smallest allowed room width or height.
pub const MIN_ROOM_DIMENSION_CM: f64 = 10.0;
/// Offset applied to a duplicated object on both axes.
pub const DUPLICATE_OFFSET_CM: f64 = 20.0;

fn clamp_position(point: Point) -> Point {
    Point::new(point.x.max(0.0), point.y.max(0.0))
}

/// Clamp a stored object position so its visual box stays non-negative.
///
/// A quarter-turned object flush with x = 0 has a negative stored x.
fn clamp_object_position(position: Point, def: &ObjectDef, rotation_deg: f64) -> Point {
    let visual = visual_bounds(position, def.width_cm, def.height_cm, rotation_deg);
    storage_from_visual(
        clamp_position(visual.origin()),
        def.width_cm,
        def.height_cm,
        rotation_deg,
    )
}

/// Apply `f` to the room with `id`, or return the state unchanged.
fn update_room(state: &AppState, id: RoomId, f: impl FnOnce(&mut Room)) -> AppState {
    if state.index().room(id).is_none() {
        log::debug!("Room {} not found", id);
        return state.clone();
    }
    let mut next = state.clone();
    if let Some(room) = next.rooms.iter_mut().find(|r| r.id == id) {
        f(room);
    }
    next
}

/// Apply `f` to the placed object with `id`, or return the state unchanged.
fn update_object(
    state: &AppState,
    id: PlacedObjectId,
    f: impl FnOnce(&mut PlacedObject),
) -> AppState {
    if state.index().object(id).is_none() {
        log::debug!("Placed object {} not found", id);
        return state.clone();
    }
    let mut next = state.clone();
    if let Some(object) = next.placed_objects.iter_mut().find(|o| o.id == id) {
        f(object);
    }
    next
}

/// Remove rooms and everything that references them.
fn remove_rooms(state: &AppState, ids: &HashSet<RoomId>) -> AppState {
    if ids.is_empty() {
        return state.clone();
    }
    let mut next = state.clone();
    next.rooms.retain(|r| !ids.contains(&r.id));
    next.wall_openings.retain(|o| !ids.contains(&o.room_id));
    next.placed_objects.retain(|o| !ids.contains(&o.room_id));
    next.selected_room_ids.retain(|id| !ids.contains(id));
    prune_object_selection(&mut next);
    log::debug!("Removed {} room(s)", ids.len());
    next
}

fn prune_object_selection(state: &mut AppState) {
    let dangling = state
        .selected_object_id
        .is_some_and(|id| !state.placed_objects.iter().any(|o| o.id == id));
    if dangling {
        state.selected_object_id = None;
    }
}

// --- Rooms ---

/// Append a room and make it the only selection.
///
/// Size is raised to the minimum dimension and position clamped to the
/// non-negative quadrant.
pub fn add_room(state: &AppState, mut room: Room) -> AppState {
    room.width_cm = room.width_cm.max(MIN_ROOM_DIMENSION_CM);
    room.height_cm = room.height_cm.max(MIN_ROOM_DIMENSION_CM);
    let position = clamp_position(room.position());
    room.x_cm = position.x;
    room.y_cm = position.y;

    let mut next = state.clone();
    next.selected_room_ids = vec![room.id];
    next.selected_object_id = None;
    next.rooms.push(room);
    next
}

pub fn rename_room(state: &AppState, id: RoomId, name: &str) -> AppState {
    update_room(state, id, |room| room.name = name.to_string())
}

/// Set or clear one side's thickness override.
pub fn set_room_wall_thickness(
    state: &AppState,
    id: RoomId,
    side: WallSide,
    thickness_cm: Option<f64>,
) -> AppState {
    update_room(state, id, |room| {
        room.wall_thickness.set(side, thickness_cm.map(|t| t.max(0.0)));
    })
}

pub fn set_global_wall_thickness(state: &AppState, thickness_cm: f64) -> AppState {
    let mut next = state.clone();
    next.global_wall_thickness_cm = thickness_cm.max(0.0);
    next
}

/// Move rooms to absolute positions.
///
/// Each room's placed objects follow by the delta actually applied after
/// clamping. Unknown ids are skipped.
pub fn move_rooms(state: &AppState, moves: &[(RoomId, Point)]) -> AppState {
    let mut next = state.clone();
    for &(id, target) in moves {
        let Some(room) = next.rooms.iter_mut().find(|r| r.id == id) else {
            log::debug!("Room {} not found for move", id);
            continue;
        };
        let target = clamp_position(target);
        let delta = target - room.position();
        room.x_cm = target.x;
        room.y_cm = target.y;

        if delta == Vec2::ZERO {
            continue;
        }
        for object in next.placed_objects.iter_mut().filter(|o| o.room_id == id) {
            object.x_cm += delta.x;
            object.y_cm += delta.y;
        }
    }
    next
}

/// Set a room's floor rectangle, enforcing the minimum size and clamp.
pub fn resize_room(state: &AppState, id: RoomId, bounds: Rect) -> AppState {
    update_room(state, id, |room| {
        let bounds = bounds.abs();
        room.x_cm = bounds.x0.max(0.0);
        room.y_cm = bounds.y0.max(0.0);
        room.width_cm = bounds.width().max(MIN_ROOM_DIMENSION_CM);
        room.height_cm = bounds.height().max(MIN_ROOM_DIMENSION_CM);
    })
}

/// Shift every selected room by a delta.
pub fn nudge_selected_rooms(state: &AppState, delta: Vec2) -> AppState {
    let moves: Vec<(RoomId, Point)> = state
        .selected_rooms()
        .map(|room| (room.id, room.position() + delta))
        .collect();
    if moves.is_empty() {
        return state.clone();
    }
    move_rooms(state, &moves)
}

/// Delete a room with its openings and placed objects.
pub fn delete_room(state: &AppState, id: RoomId) -> AppState {
    if state.index().room(id).is_none() {
        log::debug!("Room {} not found for delete", id);
        return state.clone();
    }
    remove_rooms(state, &HashSet::from([id]))
}

pub fn delete_selected_rooms(state: &AppState) -> AppState {
    let ids: HashSet<RoomId> = state.selected_room_ids.iter().copied().collect();
    remove_rooms(state, &ids)
}

// --- Openings ---

/// Attach an opening to its room's wall. Callers validate fit beforehand.
pub fn add_wall_opening(state: &AppState, opening: WallOpening) -> AppState {
    if state.index().room(opening.room_id).is_none() {
        log::debug!("Room {} not found for opening", opening.room_id);
        return state.clone();
    }
    let mut next = state.clone();
    next.wall_openings.push(opening);
    next
}

/// Partial update for a wall opening. `None` keeps the current value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OpeningUpdate {
    pub wall: Option<WallSide>,
    pub position_cm: Option<f64>,
    pub width_cm: Option<f64>,
    pub kind: Option<OpeningKind>,
}

pub fn update_wall_opening(state: &AppState, id: OpeningId, update: OpeningUpdate) -> AppState {
    let mut next = state.clone();
    let Some(opening) = next.wall_openings.iter_mut().find(|o| o.id == id) else {
        log::debug!("Opening {} not found", id);
        return next;
    };
    if let Some(wall) = update.wall {
        opening.wall = wall;
    }
    if let Some(position) = update.position_cm {
        opening.position_cm = position;
    }
    if let Some(width) = update.width_cm {
        opening.width_cm = width;
    }
    if let Some(kind) = update.kind {
        opening.kind = kind;
    }
    next
}

pub fn delete_wall_opening(state: &AppState, id: OpeningId) -> AppState {
    let mut next = state.clone();
    next.wall_openings.retain(|o| o.id != id);
    next
}

// --- Object definitions ---

pub fn add_object_def(state: &AppState, def: ObjectDef) -> AppState {
    let mut next = state.clone();
    next.object_defs.push(def);
    next
}

/// Delete a definition and every placed instance of it.
pub fn delete_object_def(state: &AppState, id: ObjectDefId) -> AppState {
    if state.index().def(id).is_none() {
        log::debug!("Object def {} not found", id);
        return state.clone();
    }
    let mut next = state.clone();
    next.object_defs.retain(|d| d.id != id);
    next.placed_objects.retain(|o| o.object_def_id != id);
    prune_object_selection(&mut next);
    next
}

// --- Placed objects ---

/// Place an object and make it the selection.
///
/// Both its definition and its room must exist.
pub fn place_object(state: &AppState, mut object: PlacedObject) -> AppState {
    let index = state.index();
    let Some(def) = index.def(object.object_def_id) else {
        log::debug!("Cannot place object {}: missing def", object.id);
        return state.clone();
    };
    if index.room(object.room_id).is_none() {
        log::debug!("Cannot place object {}: missing room", object.id);
        return state.clone();
    }
    object.rotation = object.rotation.rem_euclid(360.0);
    let position = clamp_object_position(object.position(), def, object.rotation);
    object.x_cm = position.x;
    object.y_cm = position.y;

    let mut next = state.clone();
    next.selected_object_id = Some(object.id);
    next.selected_room_ids.clear();
    next.placed_objects.push(object);
    next
}

/// Move an object's stored (unrotated) top-left. Never changes its room.
///
/// The clamp applies to the visual box, not the stored corner.
pub fn update_placed_object_position(
    state: &AppState,
    id: PlacedObjectId,
    position: Point,
) -> AppState {
    let position = {
        let index = state.index();
        index
            .object(id)
            .and_then(|object| {
                let def = index.def(object.object_def_id)?;
                Some(clamp_object_position(position, def, object.rotation))
            })
            .unwrap_or(position)
    };
    update_object(state, id, |object| {
        object.x_cm = position.x;
        object.y_cm = position.y;
    })
}

/// Set rotation, normalised into `[0, 360)`.
pub fn update_placed_object_rotation(
    state: &AppState,
    id: PlacedObjectId,
    rotation_deg: f64,
) -> AppState {
    update_object(state, id, |object| object.rotation = rotation_deg.rem_euclid(360.0))
}

/// Rotate a quarter turn clockwise about the object's centre.
pub fn rotate_placed_object(state: &AppState, id: PlacedObjectId) -> AppState {
    match state.index().object(id) {
        Some(object) => update_placed_object_rotation(state, id, object.rotation + 90.0),
        None => {
            log::debug!("Placed object {} not found for rotate", id);
            state.clone()
        }
    }
}

pub fn delete_placed_object(state: &AppState, id: PlacedObjectId) -> AppState {
    let mut next = state.clone();
    next.placed_objects.retain(|o| o.id != id);
    prune_object_selection(&mut next);
    next
}

/// Copy an object under a fresh id, offset diagonally, and select the copy.
pub fn duplicate_placed_object(state: &AppState, id: PlacedObjectId) -> AppState {
    let Some(original) = state.index().object(id) else {
        log::debug!("Placed object {} not found for duplicate", id);
        return state.clone();
    };
    let mut copy = original.clone();
    copy.id = Uuid::new_v4();
    copy.x_cm += DUPLICATE_OFFSET_CM;
    copy.y_cm += DUPLICATE_OFFSET_CM;

    let mut next = state.clone();
    next.selected_object_id = Some(copy.id);
    next.selected_room_ids.clear();
    next.placed_objects.push(copy);
    next
}

/// Delete the selected object if there is one, otherwise the selected rooms.
pub fn delete_selection(state: &AppState) -> AppState {
    match state.selected_object_id {
        Some(id) => delete_placed_object(state, id),
        None => delete_selected_rooms(state),
    }
}

// --- Selection ---

/// Make `id` the only selected room.
pub fn select_room(state: &AppState, id: RoomId) -> AppState {
    if state.index().room(id).is_none() {
        log::debug!("Room {} not found for select", id);
        return state.clone();
    }
    let mut next = state.clone();
    next.selected_room_ids = vec![id];
    next.selected_object_id = None;
    next
}

/// Add `id` to the room selection, or remove it if already selected.
pub fn toggle_room_selection(state: &AppState, id: RoomId) -> AppState {
    if state.index().room(id).is_none() {
        log::debug!("Room {} not found for toggle", id);
        return state.clone();
    }
    let mut next = state.clone();
    if next.is_room_selected(id) {
        next.selected_room_ids.retain(|r| *r != id);
    } else {
        next.selected_room_ids.push(id);
    }
    next.selected_object_id = None;
    next
}

pub fn select_all_rooms(state: &AppState) -> AppState {
    let mut next = state.clone();
    next.selected_room_ids = state.rooms.iter().map(|r| r.id).collect();
    next.selected_object_id = None;
    next
}

pub fn clear_selection(state: &AppState) -> AppState {
    let mut next = state.clone();
    next.selected_room_ids.clear();
    next.selected_object_id = None;
    next
}

/// Select one placed object, or clear the object selection with `None`.
pub fn select_object(state: &AppState, id: Option<PlacedObjectId>) -> AppState {
    let mut next = state.clone();
    match id {
        Some(id) if state.index().object(id).is_none() => {
            log::debug!("Placed object {} not found for select", id);
        }
        Some(id) => {
            next.selected_object_id = Some(id);
            next.selected_room_ids.clear();
        }
        None => next.selected_object_id = None,
    }
    next
}

// --- View ---

pub fn set_viewport(state: &AppState, viewport: Viewport) -> AppState {
    let mut next = state.clone();
    next.viewport = viewport;
    next
}
