//! Raw input events fed to the editor by the host.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Host-assigned pointer identifier (mouse, pen or one touch contact).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PointerId(pub u32);

/// Pointer event in screen pixels.
///
/// `Cancel` and `Leave` end a gesture exactly like `Up`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        pointer: PointerId,
        position: Point,
        button: MouseButton,
        modifiers: Modifiers,
    },
    Move {
        pointer: PointerId,
        position: Point,
    },
    Up {
        pointer: PointerId,
        position: Point,
    },
    Cancel {
        pointer: PointerId,
    },
    Leave {
        pointer: PointerId,
    },
    Wheel {
        position: Point,
        delta: Vec2,
    },
}

/// Failure reported by the host when capturing or releasing a pointer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("Pointer {0:?} is not active")]
    InactivePointer(PointerId),

    #[error("Pointer capture failed: {0}")]
    Host(String),
}

/// Host surface that can route all events of a pointer to the canvas.
pub trait PointerCapture {
    fn set_capture(&mut self, pointer: PointerId) -> Result<(), CaptureError>;
    fn release_capture(&mut self, pointer: PointerId) -> Result<(), CaptureError>;
}

/// Capture implementation for hosts without pointer capture.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCapture;

impl PointerCapture for NoCapture {
    fn set_capture(&mut self, _pointer: PointerId) -> Result<(), CaptureError> {
        Ok(())
    }

    fn release_capture(&mut self, _pointer: PointerId) -> Result<(), CaptureError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_modifier() {
        assert!(!Modifiers::NONE.command());
        assert!(Modifiers::ctrl().command());
        let meta = Modifiers {
            meta: true,
            ..Modifiers::NONE
        };
        assert!(meta.command());
        assert!(!Modifiers::shift().command());
    }

    #[test]
    fn test_no_capture_always_succeeds() {
        let mut capture = NoCapture;
        assert!(capture.set_capture(PointerId(1)).is_ok());
        assert!(capture.release_capture(PointerId(1)).is_ok());
    }
}
