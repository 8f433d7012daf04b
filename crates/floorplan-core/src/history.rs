//! Undo/redo over whole-state snapshots.

use crate::model::AppState;

/// Maximum number of undo states to keep.
pub const MAX_UNDO_HISTORY: usize = 100;

/// Linear undo history. `present` is the authoritative state.
#[derive(Debug, Clone, Default)]
pub struct History {
    /// Oldest first.
    past: Vec<AppState>,
    present: AppState,
    /// Most recently undone last.
    future: Vec<AppState>,
}

impl History {
    pub fn new(present: AppState) -> Self {
        Self {
            past: Vec::new(),
            present,
            future: Vec::new(),
        }
    }

    pub fn present(&self) -> &AppState {
        &self.present
    }

    /// Record a checkpoint: the current present becomes undoable.
    pub fn record(&mut self, next: AppState) {
        let previous = std::mem::replace(&mut self.present, next);
        self.push_past(previous);
    }

    /// Replace the present without touching history.
    ///
    /// Used for drag frames, selection and viewport changes.
    pub fn set_present(&mut self, next: AppState) {
        self.present = next;
    }

    /// Record the present as one checkpoint whose undo target is `baseline`.
    ///
    /// Returns false (and records nothing) if nothing changed since `baseline`.
    pub fn commit_from(&mut self, baseline: AppState) -> bool {
        if baseline == self.present {
            return false;
        }
        self.push_past(baseline);
        true
    }

    fn push_past(&mut self, state: AppState) {
        self.past.push(state);
        self.future.clear();

        if self.past.len() > MAX_UNDO_HISTORY {
            self.past.remove(0);
        }
    }

    /// Undo the last checkpoint.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.past.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, previous);
        self.future.push(current);
        log::debug!("Undo ({} left)", self.past.len());
        true
    }

    /// Redo the last undone checkpoint.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, next);
        self.past.push(current);
        log::debug!("Redo ({} left)", self.future.len());
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }
}
