//! Keyboard command mapping.
//!
//! Keys use DOM `KeyboardEvent.key` names (`"z"`, `"ArrowLeft"`, `"Escape"`).

use crate::input::Modifiers;

/// Arrow-key nudge distance.
pub const NUDGE_STEP_CM: f64 = 5.0;
/// Arrow-key nudge distance with Shift held.
pub const NUDGE_STEP_LARGE_CM: f64 = 20.0;

/// A discrete editor command triggered from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditorCommand {
    Undo,
    Redo,
    SelectAllRooms,
    /// Selected object if any, otherwise the selected rooms.
    DeleteSelection,
    Nudge { dx_cm: f64, dy_cm: f64 },
    ToggleMeasure,
    /// Leave the active tool, or clear the selection.
    Escape,
}

impl EditorCommand {
    /// Map a key press to a command.
    pub fn from_key(key: &str, modifiers: Modifiers) -> Option<Self> {
        if modifiers.command() {
            return match key.to_ascii_lowercase().as_str() {
                "z" if modifiers.shift => Some(Self::Redo),
                "z" => Some(Self::Undo),
                "y" => Some(Self::Redo),
                "a" => Some(Self::SelectAllRooms),
                _ => None,
            };
        }

        let step = if modifiers.shift {
            NUDGE_STEP_LARGE_CM
        } else {
            NUDGE_STEP_CM
        };
        match key {
            "Delete" | "Backspace" => Some(Self::DeleteSelection),
            "ArrowUp" => Some(Self::Nudge { dx_cm: 0.0, dy_cm: -step }),
            "ArrowDown" => Some(Self::Nudge { dx_cm: 0.0, dy_cm: step }),
            "ArrowLeft" => Some(Self::Nudge { dx_cm: -step, dy_cm: 0.0 }),
            "ArrowRight" => Some(Self::Nudge { dx_cm: step, dy_cm: 0.0 }),
            "m" | "M" if !modifiers.alt => Some(Self::ToggleMeasure),
            "Escape" => Some(Self::Escape),
            _ => None,
        }
    }

    /// Whether executing the command records a history checkpoint.
    pub fn is_recorded(&self) -> bool {
        matches!(self, Self::DeleteSelection | Self::Nudge { .. })
    }
}
