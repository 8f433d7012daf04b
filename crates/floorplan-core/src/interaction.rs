//! Pointer gesture state machine.
//!
//! The machine reads the current document, decides what a pointer sample
//! means, and hands back the next state for the caller to store with
//! [`History::set_present`](crate::history::History::set_present). When a
//! drag or resize ends it returns the pre-drag baseline so the caller can
//! record a single checkpoint.

use crate::geometry::{inner_bounds, object_visual_bounds, outer_bounds, storage_from_visual};
use crate::handles::{HANDLE_HIT_TOLERANCE_PX, ResizeHandle, apply_resize, hit_test_handles};
use crate::input::{Modifiers, MouseButton};
use crate::model::{AppState, PlacedObjectId, RoomId};
use crate::mutations::{
    clear_selection, move_rooms, resize_room, select_object, select_room, set_viewport,
    toggle_room_selection, update_placed_object_position,
};
use crate::snap::{SnapResult, calculate_placed_object_snap, calculate_room_snap};
use kurbo::{Point, Rect};

/// Active pointer tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Select,
    Measure,
}

/// What lies under the pointer, by priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    ResizeHandle { room_id: RoomId, handle: ResizeHandle },
    PlacedObject(PlacedObjectId),
    Room(RoomId),
    Empty,
}

/// Hit-test a world point.
///
/// Resize handles of selected rooms win over placed objects, which win over
/// room bodies (walls included). Later entities are on top.
pub fn hit_test(state: &AppState, point: Point, tolerance_cm: f64) -> HitTarget {
    for room in state.rooms.iter().rev().filter(|r| state.is_room_selected(r.id)) {
        if let Some(handle) = hit_test_handles(room, point, tolerance_cm) {
            return HitTarget::ResizeHandle {
                room_id: room.id,
                handle,
            };
        }
    }

    let index = state.index();
    for object in state.placed_objects.iter().rev() {
        let Some(def) = index.def(object.object_def_id) else {
            continue;
        };
        if object_visual_bounds(object, def).contains(point) {
            return HitTarget::PlacedObject(object.id);
        }
    }

    let global = state.global_wall_thickness_cm;
    state
        .rooms
        .iter()
        .rev()
        .find(|room| outer_bounds(room, global, None).rect.contains(point))
        .map_or(HitTarget::Empty, |room| HitTarget::Room(room.id))
}

/// One or more rooms moving by a shared delta.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomDragSession {
    /// The pressed room; its snap decides the delta for all.
    pub anchor: RoomId,
    pub start_world: Point,
    /// Position of every moving room at press time.
    pub origins: Vec<(RoomId, Point)>,
}

impl RoomDragSession {
    fn moving_ids(&self) -> Vec<RoomId> {
        self.origins.iter().map(|(id, _)| *id).collect()
    }

    fn apply(&self, doc: &AppState, world: Point) -> Option<(AppState, SnapResult)> {
        let anchor = doc.index().room(self.anchor)?;
        let (_, anchor_origin) = self.origins.iter().find(|(id, _)| *id == self.anchor)?;
        let candidate = *anchor_origin + (world - self.start_world);

        let snap = calculate_room_snap(doc, anchor, candidate, &self.moving_ids());
        let mut applied = snap.position() - *anchor_origin;
        // Stop the whole group at the origin so it stays rigid
        let min_x = self.origins.iter().map(|(_, o)| o.x).fold(f64::INFINITY, f64::min);
        let min_y = self.origins.iter().map(|(_, o)| o.y).fold(f64::INFINITY, f64::min);
        applied.x = applied.x.max(-min_x);
        applied.y = applied.y.max(-min_y);
        let moves: Vec<(RoomId, Point)> = self
            .origins
            .iter()
            .map(|(id, origin)| (*id, *origin + applied))
            .collect();
        Some((move_rooms(doc, &moves), snap))
    }
}

/// A room edge or corner being dragged.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeSession {
    pub room_id: RoomId,
    pub handle: ResizeHandle,
    pub start_world: Point,
    pub start_bounds: Rect,
}

impl ResizeSession {
    fn apply(&self, doc: &AppState, world: Point) -> AppState {
        let bounds = apply_resize(self.start_bounds, self.handle, world - self.start_world);
        resize_room(doc, self.room_id, bounds)
    }
}

/// A placed object being dragged. Positions are in visual space.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectDragSession {
    pub object_id: PlacedObjectId,
    pub start_world: Point,
    pub start_visual: Point,
}

impl ObjectDragSession {
    fn apply(&self, doc: &AppState, world: Point) -> Option<(AppState, SnapResult)> {
        let index = doc.index();
        let object = index.object(self.object_id)?;
        let def = index.def(object.object_def_id)?;
        let target = self.start_visual + (world - self.start_world);

        let snap = calculate_placed_object_snap(doc, object, target);
        let stored =
            storage_from_visual(snap.position(), def.width_cm, def.height_cm, object.rotation);
        Some((update_placed_object_position(doc, self.object_id, stored), snap))
    }
}

/// A distance measurement between two world points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub start: Point,
    pub end: Point,
}

impl Measurement {
    pub fn distance_cm(&self) -> f64 {
        self.start.distance(self.end)
    }
}

/// Current gesture.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Panning {
        last_screen: Point,
    },
    DraggingRooms(RoomDragSession),
    ResizingRoom(ResizeSession),
    DraggingObject(ObjectDragSession),
    Measuring,
}

/// Pointer interaction machine.
#[derive(Debug, Clone, Default)]
pub struct Interaction {
    state: InteractionState,
    tool: Tool,
    /// Document before the current drag or resize.
    baseline: Option<AppState>,
    measurement: Option<Measurement>,
    last_snap: Option<SnapResult>,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Switch tools. Leaving the measure tool discards its measurement.
    pub fn set_tool(&mut self, tool: Tool) {
        if tool != Tool::Measure {
            self.measurement = None;
        }
        self.tool = tool;
    }

    pub fn measurement(&self) -> Option<Measurement> {
        self.measurement
    }

    /// Snap guides from the latest drag frame, if any.
    pub fn last_snap(&self) -> Option<SnapResult> {
        self.last_snap
    }

    /// Whether a gesture is in progress.
    pub fn is_active(&self) -> bool {
        self.state != InteractionState::Idle
    }

    /// Start a gesture. Returns the next present state if the press changed it
    /// (selection), or `None`.
    pub fn pointer_down(
        &mut self,
        doc: &AppState,
        screen: Point,
        button: MouseButton,
        modifiers: Modifiers,
    ) -> Option<AppState> {
        if self.is_active() {
            log::debug!("Pointer down while {:?}, ignoring", self.state);
            return None;
        }
        let world = doc.viewport.screen_to_world(screen);

        // Middle button always pans.
        if button == MouseButton::Middle {
            self.state = InteractionState::Panning { last_screen: screen };
            return None;
        }
        if button != MouseButton::Left {
            return None;
        }

        if self.tool == Tool::Measure {
            self.measurement = Some(Measurement { start: world, end: world });
            self.state = InteractionState::Measuring;
            return None;
        }

        let tolerance = doc.viewport.screen_tolerance_to_cm(HANDLE_HIT_TOLERANCE_PX);
        match hit_test(doc, world, tolerance) {
            HitTarget::ResizeHandle { room_id, handle } => {
                let room = doc.index().room(room_id)?;
                self.baseline = Some(doc.clone());
                self.state = InteractionState::ResizingRoom(ResizeSession {
                    room_id,
                    handle,
                    start_world: world,
                    start_bounds: inner_bounds(room, None),
                });
                None
            }
            HitTarget::PlacedObject(object_id) => {
                let next = select_object(doc, Some(object_id));
                let start_visual = {
                    let index = next.index();
                    let object = index.object(object_id)?;
                    let def = index.def(object.object_def_id)?;
                    object_visual_bounds(object, def).origin()
                };
                self.state = InteractionState::DraggingObject(ObjectDragSession {
                    object_id,
                    start_world: world,
                    start_visual,
                });
                self.baseline = Some(next.clone());
                changed(doc, next)
            }
            HitTarget::Room(room_id) if modifiers.shift => {
                changed(doc, toggle_room_selection(doc, room_id))
            }
            HitTarget::Room(room_id) => {
                let next = if doc.is_room_selected(room_id) && doc.selected_object_id.is_none() {
                    doc.clone()
                } else {
                    select_room(doc, room_id)
                };
                let origins = next.selected_rooms().map(|r| (r.id, r.position())).collect();
                self.state = InteractionState::DraggingRooms(RoomDragSession {
                    anchor: room_id,
                    start_world: world,
                    origins,
                });
                self.baseline = Some(next.clone());
                changed(doc, next)
            }
            HitTarget::Empty => {
                self.state = InteractionState::Panning { last_screen: screen };
                changed(doc, clear_selection(doc))
            }
        }
    }

    /// Advance the gesture. Returns the next present state, or `None` if the
    /// document is unaffected.
    pub fn pointer_move(&mut self, doc: &AppState, screen: Point) -> Option<AppState> {
        let world = doc.viewport.screen_to_world(screen);
        match &mut self.state {
            InteractionState::Idle => None,
            InteractionState::Panning { last_screen } => {
                let delta = screen - *last_screen;
                *last_screen = screen;
                let mut viewport = doc.viewport;
                viewport.pan(delta);
                Some(set_viewport(doc, viewport))
            }
            InteractionState::DraggingRooms(session) => {
                let (next, snap) = session.apply(doc, world)?;
                self.last_snap = Some(snap);
                Some(next)
            }
            InteractionState::ResizingRoom(session) => Some(session.apply(doc, world)),
            InteractionState::DraggingObject(session) => {
                let (next, snap) = session.apply(doc, world)?;
                self.last_snap = Some(snap);
                Some(next)
            }
            InteractionState::Measuring => {
                if let Some(measurement) = self.measurement.as_mut() {
                    measurement.end = world;
                }
                None
            }
        }
    }

    /// End the gesture. Up, cancel and leave all land here.
    ///
    /// Returns the pre-drag baseline when a drag or resize was active; the
    /// caller records a checkpoint against it if the document changed.
    pub fn pointer_up(&mut self) -> Option<AppState> {
        let previous = std::mem::take(&mut self.state);
        self.last_snap = None;
        let baseline = self.baseline.take();
        match previous {
            InteractionState::DraggingRooms(_)
            | InteractionState::ResizingRoom(_)
            | InteractionState::DraggingObject(_) => baseline,
            InteractionState::Measuring => {
                if let Some(measurement) = self.measurement {
                    log::debug!("Measured {:.1} cm", measurement.distance_cm());
                }
                None
            }
            InteractionState::Idle | InteractionState::Panning { .. } => None,
        }
    }
}

fn changed(doc: &AppState, next: AppState) -> Option<AppState> {
    (next != *doc).then_some(next)
}
