//! Floor-plan editor shell.
//!
//! Headless front end over `floorplan-core`: inspects saved plans and
//! documents the keyboard surface.

mod inspect;
mod shortcuts;

pub use inspect::{InspectError, PlanReport, RoomSummary, inspect, inspect_file};
pub use shortcuts::{Shortcut, ShortcutRegistry};
