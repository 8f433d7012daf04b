//! Checks callers run before invoking mutators.

use crate::geometry::wall_length_cm;
use crate::model::{AppState, OpeningId, RoomId, WallSide};
use thiserror::Error;

/// Why a proposed edit was rejected.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("{what} must be positive, got {value}")]
    NonPositiveDimension { what: &'static str, value: f64 },

    #[error("Position must not be negative, got {0}")]
    NegativePosition(f64),

    #[error("Room not found: {0}")]
    UnknownRoom(RoomId),

    #[error("Opening ends at {end} cm but the wall is {wall_length} cm long")]
    OpeningExceedsWall { end: f64, wall_length: f64 },

    #[error("Opening overlaps opening {0}")]
    OverlappingOpening(OpeningId),
}

/// Result type for validation helpers.
pub type ValidationResult = Result<(), ValidationError>;

fn positive(what: &'static str, value: f64) -> ValidationResult {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NonPositiveDimension { what, value })
    }
}

pub fn validate_room_size(width_cm: f64, height_cm: f64) -> ValidationResult {
    positive("Width", width_cm)?;
    positive("Height", height_cm)
}

/// Check that an opening fits on its wall without overlapping another.
///
/// `ignore` skips the opening being edited.
pub fn validate_opening(
    state: &AppState,
    room_id: RoomId,
    side: WallSide,
    position_cm: f64,
    width_cm: f64,
    ignore: Option<OpeningId>,
) -> ValidationResult {
    let room = state
        .index()
        .room(room_id)
        .ok_or(ValidationError::UnknownRoom(room_id))?;
    positive("Width", width_cm)?;
    if position_cm < 0.0 {
        return Err(ValidationError::NegativePosition(position_cm));
    }

    let wall_length = wall_length_cm(room, side, state.global_wall_thickness_cm);
    let end = position_cm + width_cm;
    if end > wall_length {
        return Err(ValidationError::OpeningExceedsWall { end, wall_length });
    }

    let clash = state
        .openings_on(room_id, side)
        .filter(|o| Some(o.id) != ignore)
        .find(|o| position_cm < o.position_cm + o.width_cm && o.position_cm < end);
    match clash {
        Some(other) => Err(ValidationError::OverlappingOpening(other.id)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OpeningKind, Room, WallOpening};
    use uuid::Uuid;

    fn state_with_door() -> (AppState, RoomId, OpeningId) {
        let mut state = AppState::new();
        let room = Room::new("Study", 0.0, 0.0, 300.0, 200.0);
        let room_id = room.id;
        let door = WallOpening::new(room_id, WallSide::North, 50.0, 90.0, OpeningKind::Door);
        let door_id = door.id;
        state.rooms.push(room);
        state.wall_openings.push(door);
        (state, room_id, door_id)
    }

    #[test]
    fn test_room_size() {
        assert!(validate_room_size(10.0, 10.0).is_ok());
        assert!(matches!(
            validate_room_size(10.0, 0.0),
            Err(ValidationError::NonPositiveDimension { what: "Height", .. })
        ));
        assert!(validate_room_size(f64::NAN, 10.0).is_err());
    }

    #[test]
    fn test_opening_must_fit_wall() {
        let (state, room_id, _) = state_with_door();
        // North wall is 300 + 2 * 10 long
        assert!(validate_opening(&state, room_id, WallSide::North, 200.0, 120.0, None).is_ok());
        assert_eq!(
            validate_opening(&state, room_id, WallSide::North, 200.0, 121.0, None),
            Err(ValidationError::OpeningExceedsWall {
                end: 321.0,
                wall_length: 320.0
            })
        );
        assert!(validate_opening(&state, room_id, WallSide::North, -1.0, 10.0, None).is_err());
    }

    #[test]
    fn test_opening_overlap() {
        let (state, room_id, door_id) = state_with_door();
        assert_eq!(
            validate_opening(&state, room_id, WallSide::North, 100.0, 50.0, None),
            Err(ValidationError::OverlappingOpening(door_id))
        );
        // Touching edges do not overlap
        assert!(validate_opening(&state, room_id, WallSide::North, 140.0, 50.0, None).is_ok());
        // Same stretch on another wall is fine
        assert!(validate_opening(&state, room_id, WallSide::South, 100.0, 50.0, None).is_ok());
        // Editing the door itself ignores it
        assert!(
            validate_opening(&state, room_id, WallSide::North, 60.0, 90.0, Some(door_id)).is_ok()
        );
    }

    #[test]
    fn test_unknown_room() {
        let (state, _, _) = state_with_door();
        let ghost = Uuid::new_v4();
        assert_eq!(
            validate_opening(&state, ghost, WallSide::East, 0.0, 10.0, None),
            Err(ValidationError::UnknownRoom(ghost))
        );
    }
}
