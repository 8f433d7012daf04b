//! Plan inspector: summarise a document's rooms and shared walls.

use floorplan_core::adjacency::{SharedWall, shared_walls};
use floorplan_core::document::{self, DocumentError};
use floorplan_core::geometry::inner_bounds;
use floorplan_core::{AppState, RoomId};
use kurbo::Rect;
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Inspector errors.
#[derive(Debug, Error)]
pub enum InspectError {
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error("Usage: {0}")]
    Usage(String),
}

/// One room line in a report.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomSummary {
    pub id: RoomId,
    pub name: String,
    pub bounds: Rect,
    pub openings: usize,
    pub objects: usize,
}

/// Summary of a plan.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanReport {
    pub rooms: Vec<RoomSummary>,
    pub shared_walls: Vec<SharedWall>,
    pub global_wall_thickness_cm: f64,
}

impl PlanReport {
    fn room_name(&self, id: RoomId) -> String {
        self.rooms
            .iter()
            .find(|r| r.id == id)
            .map_or_else(|| id.to_string(), |r| r.name.clone())
    }
}

impl fmt::Display for PlanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Plan: {} room(s), walls {} cm",
            self.rooms.len(),
            self.global_wall_thickness_cm
        )?;
        for room in &self.rooms {
            writeln!(
                f,
                "  {:16} {} x {} cm at ({}, {}), {} opening(s), {} object(s)",
                room.name,
                room.bounds.width(),
                room.bounds.height(),
                room.bounds.x0,
                room.bounds.y0,
                room.openings,
                room.objects
            )?;
        }
        if self.shared_walls.is_empty() {
            return Ok(());
        }
        writeln!(f, "Shared walls:")?;
        for wall in &self.shared_walls {
            writeln!(
                f,
                "  {} {} <-> {} {}, {}..{} cm, drawn by {}",
                self.room_name(wall.room_id),
                wall.side.as_str(),
                self.room_name(wall.neighbor_id),
                wall.neighbor_side.as_str(),
                wall.span_start_cm,
                wall.span_end_cm,
                self.room_name(wall.owner)
            )?;
        }
        Ok(())
    }
}

/// Build a report for a plan.
pub fn inspect(state: &AppState) -> PlanReport {
    let index = state.index();
    let rooms = state
        .rooms
        .iter()
        .map(|room| RoomSummary {
            id: room.id,
            name: room.name.clone(),
            bounds: inner_bounds(room, None),
            openings: state.wall_openings.iter().filter(|o| o.room_id == room.id).count(),
            objects: index.objects_in_room(room.id).len(),
        })
        .collect();

    PlanReport {
        rooms,
        shared_walls: shared_walls(state),
        global_wall_thickness_cm: state.global_wall_thickness_cm,
    }
}

/// Load a document and build its report.
pub fn inspect_file(path: &Path) -> Result<PlanReport, InspectError> {
    let state = document::load_from_path(path)?;
    let report = inspect(&state);
    log::info!(
        "Inspected {}: {} room(s), {} shared wall(s)",
        path.display(),
        report.rooms.len(),
        report.shared_walls.len()
    );
    Ok(report)
}
