//! JSON document import and export.
//!
//! The document mirrors [`AppState`]. Older documents carry a single
//! `selectedRoomId`; it is migrated to `selectedRoomIds` on load. Imports are
//! checked for referential integrity before anything is handed back, so a
//! corrupt file never yields a partial state.

use crate::model::{
    AppState, DEFAULT_WALL_THICKNESS_CM, ObjectDef, PlacedObject, PlacedObjectId, Room, RoomId,
    WallOpening,
};
use crate::viewport::Viewport;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

/// Document errors.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Malformed document: {0}")]
    Parse(String),
    #[error("Invalid document: {0}")]
    Integrity(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("IO error: {0}")]
    Io(String),
}

/// Result type for document operations.
pub type DocumentResult<T> = Result<T, DocumentError>;

fn default_wall_thickness() -> f64 {
    DEFAULT_WALL_THICKNESS_CM
}

/// On-disk shape of a document, including legacy fields.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PersistedState {
    #[serde(default)]
    rooms: Vec<Room>,
    #[serde(default)]
    wall_openings: Vec<WallOpening>,
    #[serde(default)]
    object_defs: Vec<ObjectDef>,
    #[serde(default)]
    placed_objects: Vec<PlacedObject>,
    #[serde(default)]
    selected_room_ids: Option<Vec<RoomId>>,
    /// Legacy single selection.
    #[serde(default)]
    selected_room_id: Option<RoomId>,
    #[serde(default)]
    selected_object_id: Option<PlacedObjectId>,
    #[serde(default = "default_wall_thickness")]
    global_wall_thickness_cm: f64,
    #[serde(default)]
    viewport: Viewport,
}

impl From<PersistedState> for AppState {
    fn from(persisted: PersistedState) -> Self {
        let selected_room_ids = match (persisted.selected_room_ids, persisted.selected_room_id) {
            (Some(ids), _) => ids,
            (None, Some(legacy)) => {
                log::info!("Migrating legacy selectedRoomId {}", legacy);
                vec![legacy]
            }
            (None, None) => Vec::new(),
        };
        Self {
            rooms: persisted.rooms,
            wall_openings: persisted.wall_openings,
            object_defs: persisted.object_defs,
            placed_objects: persisted.placed_objects,
            selected_room_ids,
            selected_object_id: persisted.selected_object_id,
            global_wall_thickness_cm: persisted.global_wall_thickness_cm,
            viewport: persisted.viewport,
        }
    }
}

fn integrity(message: String) -> DocumentError {
    DocumentError::Integrity(message)
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn insert_unique(seen: &mut HashSet<Uuid>, id: Uuid, kind: &str) -> DocumentResult<()> {
    if seen.insert(id) {
        Ok(())
    } else {
        Err(integrity(format!("duplicate {} id {}", kind, id)))
    }
}

/// Check referential integrity and sizes, then drop stale selection.
fn check_integrity(mut state: AppState) -> DocumentResult<AppState> {
    if !state.global_wall_thickness_cm.is_finite() || state.global_wall_thickness_cm < 0.0 {
        return Err(integrity(format!(
            "global wall thickness {} is negative",
            state.global_wall_thickness_cm
        )));
    }
    if !positive(state.viewport.zoom) {
        return Err(integrity(format!("viewport zoom {} is not positive", state.viewport.zoom)));
    }

    let mut seen = HashSet::new();
    for room in &state.rooms {
        insert_unique(&mut seen, room.id, "room")?;
        if !positive(room.width_cm) || !positive(room.height_cm) {
            return Err(integrity(format!(
                "room {} has size {} x {}",
                room.id, room.width_cm, room.height_cm
            )));
        }
    }
    for def in &state.object_defs {
        insert_unique(&mut seen, def.id, "object def")?;
        if !positive(def.width_cm) || !positive(def.height_cm) {
            return Err(integrity(format!(
                "object def {} has size {} x {}",
                def.id, def.width_cm, def.height_cm
            )));
        }
    }

    let (stale_rooms, stale_object) = {
        let index = state.index();
        for opening in &state.wall_openings {
            insert_unique(&mut seen, opening.id, "opening")?;
            if index.room(opening.room_id).is_none() {
                return Err(integrity(format!(
                    "opening {} references missing room {}",
                    opening.id, opening.room_id
                )));
            }
        }
        for object in &state.placed_objects {
            insert_unique(&mut seen, object.id, "placed object")?;
            if index.room(object.room_id).is_none() {
                return Err(integrity(format!(
                    "placed object {} references missing room {}",
                    object.id, object.room_id
                )));
            }
            if index.def(object.object_def_id).is_none() {
                return Err(integrity(format!(
                    "placed object {} references missing def {}",
                    object.id, object.object_def_id
                )));
            }
        }

        let stale_rooms: Vec<RoomId> = state
            .selected_room_ids
            .iter()
            .copied()
            .filter(|id| index.room(*id).is_none())
            .collect();
        let stale_object = state.selected_object_id.filter(|id| index.object(*id).is_none());
        (stale_rooms, stale_object)
    };

    if !stale_rooms.is_empty() {
        log::warn!("Dropping {} stale room selection(s)", stale_rooms.len());
        state.selected_room_ids.retain(|id| !stale_rooms.contains(id));
    }
    if let Some(id) = stale_object {
        log::warn!("Dropping stale object selection {}", id);
        state.selected_object_id = None;
    }
    Ok(state)
}

/// Serialize to pretty JSON.
pub fn to_json(state: &AppState) -> DocumentResult<String> {
    serde_json::to_string_pretty(state).map_err(|e| DocumentError::Serialize(e.to_string()))
}

/// Parse and check a document.
pub fn from_json(json: &str) -> DocumentResult<AppState> {
    let state: AppState =
        serde_json::from_str(json).map_err(|e| DocumentError::Parse(e.to_string()))?;
    check_integrity(state)
}

/// Read a document from disk.
pub fn load_from_path(path: &Path) -> DocumentResult<AppState> {
    if !path.exists() {
        return Err(DocumentError::NotFound(path.display().to_string()));
    }
    let json = fs::read_to_string(path)
        .map_err(|e| DocumentError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    let state = from_json(&json)?;
    log::info!("Loaded {} room(s) from {}", state.rooms.len(), path.display());
    Ok(state)
}

/// Write a document to disk.
pub fn save_to_path(state: &AppState, path: &Path) -> DocumentResult<()> {
    let json = to_json(state)?;
    fs::write(path, json)
        .map_err(|e| DocumentError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
    log::info!("Saved {} room(s) to {}", state.rooms.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OpeningKind, WallSide};
    use crate::mutations::{add_object_def, add_room, add_wall_opening, place_object};

    fn sample() -> AppState {
        let room = Room::new("Living", 0.0, 0.0, 400.0, 300.0);
        let room_id = room.id;
        let def = ObjectDef::new("Sofa", 200.0, 90.0);
        let def_id = def.id;
        let state = add_room(&AppState::new(), room);
        let state = add_wall_opening(
            &state,
            WallOpening::new(room_id, WallSide::South, 40.0, 90.0, OpeningKind::Door),
        );
        let state = add_object_def(&state, def);
        place_object(&state, PlacedObject::new(def_id, room_id, 20.0, 20.0))
    }

    #[test]
    fn test_roundtrip_through_json() {
        let state = sample();
        let json = to_json(&state).unwrap();
        assert!(json.contains("\"selectedRoomIds\""));
        assert!(json.contains("\"type\": \"door\""));
        assert_eq!(from_json(&json).unwrap(), state);
    }

    #[test]
    fn test_legacy_selected_room_id() {
        let room_id = Uuid::new_v4();
        let json = format!(
            r#"{{
                "rooms": [{{
                    "id": "{room_id}", "name": "Old",
                    "xCm": 0, "yCm": 0, "widthCm": 100, "heightCm": 100
                }}],
                "selectedRoomId": "{room_id}"
            }}"#
        );
        let state = from_json(&json).unwrap();
        assert_eq!(state.selected_room_ids, vec![room_id]);
        assert!((state.global_wall_thickness_cm - DEFAULT_WALL_THICKNESS_CM).abs() < f64::EPSILON);
        assert_eq!(state.viewport, Viewport::default());
        assert!(state.rooms[0].wall_thickness.north.is_none());
    }

    #[test]
    fn test_list_wins_over_legacy_field() {
        let json = format!(
            r#"{{"selectedRoomIds": [], "selectedRoomId": "{}"}}"#,
            Uuid::new_v4()
        );
        let state = from_json(&json).unwrap();
        assert!(state.selected_room_ids.is_empty());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(from_json("{ rooms: "), Err(DocumentError::Parse(_))));
        assert!(matches!(from_json(r#"{"rooms": 3}"#), Err(DocumentError::Parse(_))));
    }

    #[test]
    fn test_dangling_reference_rejected() {
        let mut state = sample();
        state.rooms.clear();
        let json = serde_json::to_string(&state).unwrap();
        assert!(matches!(from_json(&json), Err(DocumentError::Integrity(_))));
    }

    #[test]
    fn test_non_positive_room_rejected() {
        let mut state = sample();
        state.rooms[0].width_cm = 0.0;
        let json = serde_json::to_string(&state).unwrap();
        assert!(matches!(from_json(&json), Err(DocumentError::Integrity(_))));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut state = sample();
        let copy = state.rooms[0].clone();
        state.rooms.push(copy);
        let json = serde_json::to_string(&state).unwrap();
        assert!(matches!(from_json(&json), Err(DocumentError::Integrity(_))));
    }

    #[test]
    fn test_stale_selection_pruned() {
        let mut state = sample();
        state.selected_room_ids = vec![Uuid::new_v4(), state.rooms[0].id];
        state.selected_object_id = Some(Uuid::new_v4());
        let json = serde_json::to_string(&state).unwrap();
        let loaded = from_json(&json).unwrap();
        assert_eq!(loaded.selected_room_ids, vec![state.rooms[0].id]);
        assert_eq!(loaded.selected_object_id, None);
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.json");
        let state = sample();
        save_to_path(&state, &path).unwrap();
        assert_eq!(load_from_path(&path).unwrap(), state);

        let missing = dir.path().join("missing.json");
        assert!(matches!(load_from_path(&missing), Err(DocumentError::NotFound(_))));
    }
}
