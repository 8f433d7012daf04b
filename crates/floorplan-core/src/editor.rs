//! Editor facade: history, gestures and keyboard over one document.

use crate::document::{self, DocumentResult};
use crate::history::History;
use crate::input::{Modifiers, MouseButton, PointerCapture, PointerEvent, PointerId};
use crate::interaction::{Interaction, Tool};
use crate::model::{
    AppState, ObjectDef, ObjectDefId, OpeningId, OpeningKind, PlacedObject, PlacedObjectId, Room,
    RoomId, WallOpening, WallSide,
};
use crate::mutations::{self, OpeningUpdate};
use crate::shortcuts::EditorCommand;
use crate::validation::{ValidationError, validate_opening, validate_room_size};
use kurbo::{Point, Vec2};

/// Zoom factor per wheel notch.
const WHEEL_ZOOM_STEP: f64 = 1.1;

/// Editing session over one document.
#[derive(Debug, Default)]
pub struct Editor {
    history: History,
    interaction: Interaction,
    /// Pointer captured for the active gesture.
    captured: Option<PointerId>,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: AppState) -> Self {
        Self {
            history: History::new(state),
            ..Self::default()
        }
    }

    pub fn state(&self) -> &AppState {
        self.history.present()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn tool(&self) -> Tool {
        self.interaction.tool()
    }

    /// Record `next` as a checkpoint unless it equals the present.
    fn record(&mut self, next: AppState) -> bool {
        if next == *self.history.present() {
            return false;
        }
        self.history.record(next);
        true
    }

    // --- Pointer ---

    /// Dispatch a raw pointer event.
    pub fn handle_pointer_event(&mut self, event: PointerEvent, capture: &mut dyn PointerCapture) {
        match event {
            PointerEvent::Down {
                pointer,
                position,
                button,
                modifiers,
            } => self.pointer_down(pointer, position, button, modifiers, capture),
            PointerEvent::Move { position, .. } => self.pointer_move(position),
            PointerEvent::Up { .. } => self.pointer_up(capture),
            PointerEvent::Cancel { .. } | PointerEvent::Leave { .. } => {
                self.pointer_cancel(capture)
            }
            PointerEvent::Wheel { position, delta } => self.wheel_zoom(position, delta),
        }
    }

    pub fn pointer_down(
        &mut self,
        pointer: PointerId,
        screen: Point,
        button: MouseButton,
        modifiers: Modifiers,
        capture: &mut dyn PointerCapture,
    ) {
        let pressed = self
            .interaction
            .pointer_down(self.history.present(), screen, button, modifiers);
        if let Some(next) = pressed {
            self.history.set_present(next);
        }
        if self.interaction.is_active() && self.captured.is_none() {
            if let Err(e) = capture.set_capture(pointer) {
                log::warn!("Failed to capture pointer: {}", e);
            }
            self.captured = Some(pointer);
        }
    }

    pub fn pointer_move(&mut self, screen: Point) {
        if let Some(next) = self.interaction.pointer_move(self.history.present(), screen) {
            self.history.set_present(next);
        }
    }

    /// Finish the gesture, committing one checkpoint if it changed the plan.
    pub fn pointer_up(&mut self, capture: &mut dyn PointerCapture) {
        let committed = self
            .interaction
            .pointer_up()
            .is_some_and(|baseline| self.history.commit_from(baseline));
        if committed {
            log::debug!("Committed drag checkpoint");
        }
        if let Some(pointer) = self.captured.take() {
            // Release can fail if the host already dropped the pointer
            if let Err(e) = capture.release_capture(pointer) {
                log::warn!("Failed to release pointer capture: {}", e);
            }
        }
    }

    /// Pointer cancel and leave end a gesture exactly like pointer up.
    pub fn pointer_cancel(&mut self, capture: &mut dyn PointerCapture) {
        self.pointer_up(capture);
    }

    /// Zoom about the cursor. Not recorded in history.
    pub fn wheel_zoom(&mut self, screen: Point, delta: Vec2) {
        if delta.y == 0.0 {
            return;
        }
        let factor = if delta.y < 0.0 {
            WHEEL_ZOOM_STEP
        } else {
            1.0 / WHEEL_ZOOM_STEP
        };
        let mut viewport = self.state().viewport;
        viewport.zoom_at(screen, factor);
        let next = mutations::set_viewport(self.state(), viewport);
        self.history.set_present(next);
    }

    /// Back to the origin at 100%. Not recorded in history.
    pub fn reset_view(&mut self) {
        let mut viewport = self.state().viewport;
        viewport.reset();
        let next = mutations::set_viewport(self.state(), viewport);
        self.history.set_present(next);
    }

    // --- Keyboard ---

    /// Handle a key press. Returns true if it was consumed.
    ///
    /// Ignored while a text field has focus or a gesture is in progress.
    pub fn handle_key(
        &mut self,
        key: &str,
        modifiers: Modifiers,
        text_input_focused: bool,
    ) -> bool {
        if text_input_focused || self.interaction.is_active() {
            return false;
        }
        match EditorCommand::from_key(key, modifiers) {
            Some(command) => {
                self.execute(command);
                true
            }
            None => false,
        }
    }

    pub fn execute(&mut self, command: EditorCommand) {
        log::debug!("Executing {:?}", command);
        let next = match command {
            EditorCommand::Undo => {
                self.undo();
                return;
            }
            EditorCommand::Redo => {
                self.redo();
                return;
            }
            EditorCommand::ToggleMeasure => {
                let tool = match self.interaction.tool() {
                    Tool::Measure => Tool::Select,
                    Tool::Select => Tool::Measure,
                };
                self.interaction.set_tool(tool);
                return;
            }
            EditorCommand::Escape if self.interaction.tool() != Tool::Select => {
                self.interaction.set_tool(Tool::Select);
                return;
            }
            EditorCommand::Escape => mutations::clear_selection(self.state()),
            EditorCommand::SelectAllRooms => mutations::select_all_rooms(self.state()),
            EditorCommand::DeleteSelection => mutations::delete_selection(self.state()),
            EditorCommand::Nudge { dx_cm, dy_cm } => {
                mutations::nudge_selected_rooms(self.state(), Vec2::new(dx_cm, dy_cm))
            }
        };
        if command.is_recorded() {
            self.record(next);
        } else {
            self.history.set_present(next);
        }
    }

    /// Undo the last checkpoint, keeping the current viewport.
    pub fn undo(&mut self) -> bool {
        if self.interaction.is_active() {
            return false;
        }
        let viewport = self.state().viewport;
        if !self.history.undo() {
            return false;
        }
        let restored = mutations::set_viewport(self.state(), viewport);
        self.history.set_present(restored);
        true
    }

    /// Redo the last undone checkpoint, keeping the current viewport.
    pub fn redo(&mut self) -> bool {
        if self.interaction.is_active() {
            return false;
        }
        let viewport = self.state().viewport;
        if !self.history.redo() {
            return false;
        }
        let restored = mutations::set_viewport(self.state(), viewport);
        self.history.set_present(restored);
        true
    }

    // --- Form-driven edits ---

    /// Add a room after checking its size.
    pub fn add_room(
        &mut self,
        name: &str,
        position: Point,
        width_cm: f64,
        height_cm: f64,
    ) -> Result<RoomId, ValidationError> {
        validate_room_size(width_cm, height_cm)?;
        let room = Room::new(name, position.x, position.y, width_cm, height_cm);
        let id = room.id;
        let next = mutations::add_room(self.state(), room);
        self.record(next);
        Ok(id)
    }

    pub fn rename_room(&mut self, id: RoomId, name: &str) {
        let next = mutations::rename_room(self.state(), id, name);
        self.record(next);
    }

    pub fn set_room_wall_thickness(
        &mut self,
        id: RoomId,
        side: WallSide,
        thickness_cm: Option<f64>,
    ) {
        let next = mutations::set_room_wall_thickness(self.state(), id, side, thickness_cm);
        self.record(next);
    }

    pub fn set_global_wall_thickness(&mut self, thickness_cm: f64) {
        let next = mutations::set_global_wall_thickness(self.state(), thickness_cm);
        self.record(next);
    }

    /// Add a door or window after checking it fits on the wall.
    pub fn add_opening(
        &mut self,
        room_id: RoomId,
        side: WallSide,
        position_cm: f64,
        width_cm: f64,
        kind: OpeningKind,
    ) -> Result<OpeningId, ValidationError> {
        validate_opening(self.state(), room_id, side, position_cm, width_cm, None)?;
        let opening = WallOpening::new(room_id, side, position_cm, width_cm, kind);
        let id = opening.id;
        let next = mutations::add_wall_opening(self.state(), opening);
        self.record(next);
        Ok(id)
    }

    /// Edit an opening, re-checking the merged result.
    ///
    /// Unknown ids are ignored like every other missing-id edit.
    pub fn update_opening(
        &mut self,
        id: OpeningId,
        update: OpeningUpdate,
    ) -> Result<(), ValidationError> {
        let Some(current) = self.state().opening(id) else {
            log::debug!("Opening {} not found", id);
            return Ok(());
        };
        validate_opening(
            self.state(),
            current.room_id,
            update.wall.unwrap_or(current.wall),
            update.position_cm.unwrap_or(current.position_cm),
            update.width_cm.unwrap_or(current.width_cm),
            Some(id),
        )?;
        let next = mutations::update_wall_opening(self.state(), id, update);
        self.record(next);
        Ok(())
    }

    pub fn delete_opening(&mut self, id: OpeningId) {
        let next = mutations::delete_wall_opening(self.state(), id);
        self.record(next);
    }

    /// Register an object template after checking its footprint.
    pub fn add_object_def(
        &mut self,
        name: &str,
        width_cm: f64,
        height_cm: f64,
    ) -> Result<ObjectDefId, ValidationError> {
        validate_room_size(width_cm, height_cm)?;
        let def = ObjectDef::new(name, width_cm, height_cm);
        let id = def.id;
        let next = mutations::add_object_def(self.state(), def);
        self.record(next);
        Ok(id)
    }

    pub fn delete_object_def(&mut self, id: ObjectDefId) {
        let next = mutations::delete_object_def(self.state(), id);
        self.record(next);
    }

    /// Place an instance of `def_id` in `room_id`. Returns `None` if either is missing.
    pub fn place_object(
        &mut self,
        def_id: ObjectDefId,
        room_id: RoomId,
        position: Point,
    ) -> Option<PlacedObjectId> {
        let object = PlacedObject::new(def_id, room_id, position.x, position.y);
        let id = object.id;
        let next = mutations::place_object(self.state(), object);
        self.record(next).then_some(id)
    }

    /// Quarter-turn the selected object.
    pub fn rotate_selected_object(&mut self) {
        if let Some(id) = self.state().selected_object_id {
            let next = mutations::rotate_placed_object(self.state(), id);
            self.record(next);
        }
    }

    /// Duplicate the selected object. Returns the copy's id.
    pub fn duplicate_selected_object(&mut self) -> Option<PlacedObjectId> {
        let id = self.state().selected_object_id?;
        let next = mutations::duplicate_placed_object(self.state(), id);
        self.record(next);
        self.state().selected_object_id.filter(|copy| *copy != id)
    }

    // --- Documents ---

    /// Replace the document. On error nothing changes.
    pub fn import_json(&mut self, json: &str) -> DocumentResult<()> {
        let state = document::from_json(json)?;
        log::info!("Imported plan with {} room(s)", state.rooms.len());
        self.history = History::new(state);
        self.interaction = Interaction::new();
        self.captured = None;
        Ok(())
    }

    pub fn export_json(&self) -> DocumentResult<String> {
        document::to_json(self.state())
    }
}
