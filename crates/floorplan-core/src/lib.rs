//! Floor-plan editor core.
//!
//! Platform-agnostic model, geometry, snapping, history and pointer
//! interaction for a 2D floor-plan editor. Renderers read [`AppState`] and
//! drive an [`Editor`] with raw pointer and keyboard events.

pub mod adjacency;
pub mod document;
pub mod editor;
pub mod geometry;
pub mod handles;
pub mod history;
pub mod input;
pub mod interaction;
pub mod model;
pub mod mutations;
pub mod shortcuts;
pub mod snap;
pub mod validation;
pub mod viewport;

pub use adjacency::{Adjacency, CombinedOpening, SharedWall, find_adjacent_room, shared_walls};
pub use document::{DocumentError, DocumentResult};
pub use editor::Editor;
pub use history::History;
pub use input::{
    CaptureError, Modifiers, MouseButton, NoCapture, PointerCapture, PointerEvent, PointerId,
};
pub use interaction::{HitTarget, Interaction, InteractionState, Tool};
pub use model::{
    AppState, ObjectDef, ObjectDefId, OpeningId, OpeningKind, PlacedObject, PlacedObjectId, Room,
    RoomId, WallOpening, WallSide, WallThickness,
};
pub use shortcuts::EditorCommand;
pub use snap::SnapResult;
pub use validation::ValidationError;
pub use viewport::Viewport;
