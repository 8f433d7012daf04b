//! Floor-plan entities and the aggregate application state.
//!
//! All coordinates are centimetres in one global space. A room's position and
//! size describe its floor (inner) rectangle; walls grow outward from it.

use crate::viewport::Viewport;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Unique identifier for a room.
pub type RoomId = Uuid;
/// Unique identifier for a door or window.
pub type OpeningId = Uuid;
/// Unique identifier for an object template.
pub type ObjectDefId = Uuid;
/// Unique identifier for a placed object instance.
pub type PlacedObjectId = Uuid;

/// Wall thickness applied to every side that has no override.
pub const DEFAULT_WALL_THICKNESS_CM: f64 = 10.0;

/// One of the four walls of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallSide {
    North,
    South,
    East,
    West,
}

impl WallSide {
    /// All sides, clockwise from north.
    pub const ALL: [WallSide; 4] = [
        WallSide::North,
        WallSide::East,
        WallSide::South,
        WallSide::West,
    ];

    /// The side facing this one across a shared wall.
    pub fn opposite(self) -> Self {
        match self {
            WallSide::North => WallSide::South,
            WallSide::South => WallSide::North,
            WallSide::East => WallSide::West,
            WallSide::West => WallSide::East,
        }
    }

    /// Whether the wall runs along the x axis.
    pub fn is_horizontal(self) -> bool {
        matches!(self, WallSide::North | WallSide::South)
    }

    /// Lowercase name as used in documents.
    pub fn as_str(self) -> &'static str {
        match self {
            WallSide::North => "north",
            WallSide::South => "south",
            WallSide::East => "east",
            WallSide::West => "west",
        }
    }
}

/// Per-side wall thickness overrides. `None` falls back to the global default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallThickness {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub north: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub south: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub east: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub west: Option<f64>,
}

impl WallThickness {
    /// Same override on all four sides.
    pub fn uniform(thickness_cm: f64) -> Self {
        Self {
            north: Some(thickness_cm),
            south: Some(thickness_cm),
            east: Some(thickness_cm),
            west: Some(thickness_cm),
        }
    }

    /// Override for one side, if any.
    pub fn get(&self, side: WallSide) -> Option<f64> {
        match side {
            WallSide::North => self.north,
            WallSide::South => self.south,
            WallSide::East => self.east,
            WallSide::West => self.west,
        }
    }

    /// Set or clear the override for one side.
    pub fn set(&mut self, side: WallSide, thickness_cm: Option<f64>) {
        let slot = match side {
            WallSide::North => &mut self.north,
            WallSide::South => &mut self.south,
            WallSide::East => &mut self.east,
            WallSide::West => &mut self.west,
        };
        *slot = thickness_cm;
    }

    /// Effective thickness for a side given the global default.
    pub fn resolve(&self, side: WallSide, global_cm: f64) -> f64 {
        self.get(side).unwrap_or(global_cm)
    }
}

/// A rectangular room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    /// Top-left inner corner.
    pub x_cm: f64,
    pub y_cm: f64,
    /// Floor size, excluding walls.
    pub width_cm: f64,
    pub height_cm: f64,
    #[serde(default)]
    pub wall_thickness: WallThickness,
}

impl Room {
    /// Create a room with a fresh id and no thickness overrides.
    pub fn new(
        name: impl Into<String>,
        x_cm: f64,
        y_cm: f64,
        width_cm: f64,
        height_cm: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            x_cm,
            y_cm,
            width_cm,
            height_cm,
            wall_thickness: WallThickness::default(),
        }
    }

    /// Builder-style thickness overrides.
    pub fn with_wall_thickness(mut self, wall_thickness: WallThickness) -> Self {
        self.wall_thickness = wall_thickness;
        self
    }

    /// Top-left inner corner as a point.
    pub fn position(&self) -> Point {
        Point::new(self.x_cm, self.y_cm)
    }

    /// Effective thickness of one wall.
    pub fn thickness(&self, side: WallSide, global_cm: f64) -> f64 {
        self.wall_thickness.resolve(side, global_cm)
    }
}

/// Door or window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpeningKind {
    Door,
    Window,
}

/// An opening cut into one wall of a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WallOpening {
    pub id: OpeningId,
    pub room_id: RoomId,
    pub wall: WallSide,
    /// Offset from the wall's outer start corner.
    pub position_cm: f64,
    pub width_cm: f64,
    #[serde(rename = "type")]
    pub kind: OpeningKind,
}

impl WallOpening {
    pub fn new(
        room_id: RoomId,
        wall: WallSide,
        position_cm: f64,
        width_cm: f64,
        kind: OpeningKind,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            room_id,
            wall,
            position_cm,
            width_cm,
            kind,
        }
    }
}

/// Reusable object template with a fixed footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectDef {
    pub id: ObjectDefId,
    pub name: String,
    pub width_cm: f64,
    pub height_cm: f64,
}

impl ObjectDef {
    pub fn new(name: impl Into<String>, width_cm: f64, height_cm: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            width_cm,
            height_cm,
        }
    }
}

/// An instance of an [`ObjectDef`] placed inside a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedObject {
    pub id: PlacedObjectId,
    pub object_def_id: ObjectDefId,
    /// Room the object was placed in. Used for grouping; never updated by moves.
    pub room_id: RoomId,
    /// Unrotated top-left corner.
    pub x_cm: f64,
    pub y_cm: f64,
    /// Rotation in degrees. Quarter turns have defined bounds math.
    #[serde(default)]
    pub rotation: f64,
}

impl PlacedObject {
    pub fn new(object_def_id: ObjectDefId, room_id: RoomId, x_cm: f64, y_cm: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            object_def_id,
            room_id,
            x_cm,
            y_cm,
            rotation: 0.0,
        }
    }

    /// Unrotated top-left corner as a point.
    pub fn position(&self) -> Point {
        Point::new(self.x_cm, self.y_cm)
    }
}

/// The aggregate document state read by renderers and produced by mutators.
///
/// Deserialization goes through the persisted representation so that legacy
/// documents are migrated on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "crate::document::PersistedState")]
pub struct AppState {
    pub rooms: Vec<Room>,
    pub wall_openings: Vec<WallOpening>,
    pub object_defs: Vec<ObjectDef>,
    pub placed_objects: Vec<PlacedObject>,
    pub selected_room_ids: Vec<RoomId>,
    pub selected_object_id: Option<PlacedObjectId>,
    pub global_wall_thickness_cm: f64,
    pub viewport: Viewport,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// An empty plan.
    pub fn new() -> Self {
        Self {
            rooms: Vec::new(),
            wall_openings: Vec::new(),
            object_defs: Vec::new(),
            placed_objects: Vec::new(),
            selected_room_ids: Vec::new(),
            selected_object_id: None,
            global_wall_thickness_cm: DEFAULT_WALL_THICKNESS_CM,
            viewport: Viewport::default(),
        }
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }

    pub fn opening(&self, id: OpeningId) -> Option<&WallOpening> {
        self.wall_openings.iter().find(|o| o.id == id)
    }

    pub fn object_def(&self, id: ObjectDefId) -> Option<&ObjectDef> {
        self.object_defs.iter().find(|d| d.id == id)
    }

    pub fn placed_object(&self, id: PlacedObjectId) -> Option<&PlacedObject> {
        self.placed_objects.iter().find(|o| o.id == id)
    }

    /// Openings on one wall of one room, in list order.
    pub fn openings_on(
        &self,
        room_id: RoomId,
        side: WallSide,
    ) -> impl Iterator<Item = &WallOpening> {
        self.wall_openings
            .iter()
            .filter(move |o| o.room_id == room_id && o.wall == side)
    }

    pub fn is_room_selected(&self, id: RoomId) -> bool {
        self.selected_room_ids.contains(&id)
    }

    /// Rooms in the current selection, in list order.
    pub fn selected_rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter().filter(|r| self.is_room_selected(r.id))
    }

    /// Build an id lookup table over the current entities.
    pub fn index(&self) -> EntityIndex<'_> {
        EntityIndex::new(self)
    }
}

/// Id-keyed view over an [`AppState`].
///
/// Built on demand; it borrows the state and never outlives a mutation.
#[derive(Debug)]
pub struct EntityIndex<'a> {
    rooms: HashMap<RoomId, &'a Room>,
    defs: HashMap<ObjectDefId, &'a ObjectDef>,
    objects: HashMap<PlacedObjectId, &'a PlacedObject>,
    objects_by_room: HashMap<RoomId, Vec<&'a PlacedObject>>,
}

impl<'a> EntityIndex<'a> {
    fn new(state: &'a AppState) -> Self {
        let mut objects_by_room: HashMap<RoomId, Vec<&'a PlacedObject>> = HashMap::new();
        for object in &state.placed_objects {
            objects_by_room.entry(object.room_id).or_default().push(object);
        }
        Self {
            rooms: state.rooms.iter().map(|r| (r.id, r)).collect(),
            defs: state.object_defs.iter().map(|d| (d.id, d)).collect(),
            objects: state.placed_objects.iter().map(|o| (o.id, o)).collect(),
            objects_by_room,
        }
    }

    pub fn room(&self, id: RoomId) -> Option<&'a Room> {
        self.rooms.get(&id).copied()
    }

    pub fn def(&self, id: ObjectDefId) -> Option<&'a ObjectDef> {
        self.defs.get(&id).copied()
    }

    pub fn object(&self, id: PlacedObjectId) -> Option<&'a PlacedObject> {
        self.objects.get(&id).copied()
    }

    /// Placed objects grouped under a room, in list order.
    pub fn objects_in_room(&self, room_id: RoomId) -> &[&'a PlacedObject] {
        self.objects_by_room
            .get(&room_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
