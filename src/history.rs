use std::collections::VecDeque;

use crate::surface::{Snapshot, Surface};

/// Undo/redo stacks of drawing-surface snapshots.
///
/// Every mutating action calls [`SnapshotHistory::snapshot`] *before* touching the surface, so
/// the undo stack always holds the states to go back to. Undo and redo swap the live surface
/// with the top of the opposite stack, which makes them exact pixel-level inverses.
#[derive(Debug, Default)]
pub struct SnapshotHistory {
    /// Most recent last
    undo_stack: VecDeque<Snapshot>,
    /// Most recent last
    redo_stack: Vec<Snapshot>,
    /// Oldest undo entries are evicted beyond this depth. `None` never evicts.
    max_depth: Option<usize>,
}

impl SnapshotHistory {
    /// Creates a new empty, unbounded history
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a history keeping at most `max_depth` undo entries
    pub fn with_max_depth(max_depth: Option<usize>) -> Self {
        Self {
            max_depth,
            ..Self::default()
        }
    }

    /// Record the surface's current pixels as an undo point and drop the redo branch.
    ///
    /// Returns false if the surface could not be captured; the history is left untouched and
    /// the coming action simply won't be undoable.
    pub fn snapshot(&mut self, surface: &dyn Surface) -> bool {
        match surface.capture() {
            Ok(snapshot) => {
                self.push_undo(snapshot);
                self.redo_stack.clear();
                log::debug!("Snapshot taken (undo: {})", self.undo_stack.len());
                true
            }
            Err(err) => {
                log::warn!("Skipping undo snapshot: {}", err);
                false
            }
        }
    }

    /// Restore the most recent undo snapshot. Returns false if nothing changed.
    pub fn undo(&mut self, surface: &mut dyn Surface) -> bool {
        if self.undo_stack.is_empty() {
            return false;
        }
        let current = match surface.capture() {
            Ok(current) => current,
            Err(err) => {
                log::warn!("Undo skipped: {}", err);
                return false;
            }
        };
        let Some(previous) = self.undo_stack.pop_back() else {
            return false;
        };
        surface.restore(&previous);
        self.redo_stack.push(current);
        log::debug!(
            "Undo (undo: {}, redo: {})",
            self.undo_stack.len(),
            self.redo_stack.len()
        );
        true
    }

    /// Restore the most recently undone snapshot. Returns false if nothing changed.
    pub fn redo(&mut self, surface: &mut dyn Surface) -> bool {
        if self.redo_stack.is_empty() {
            return false;
        }
        let current = match surface.capture() {
            Ok(current) => current,
            Err(err) => {
                log::warn!("Redo skipped: {}", err);
                return false;
            }
        };
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        surface.restore(&next);
        self.push_undo(current);
        log::debug!(
            "Redo (undo: {}, redo: {})",
            self.undo_stack.len(),
            self.redo_stack.len()
        );
        true
    }

    fn push_undo(&mut self, snapshot: Snapshot) {
        self.undo_stack.push_back(snapshot);
        if let Some(max_depth) = self.max_depth {
            while self.undo_stack.len() > max_depth {
                self.undo_stack.pop_front();
            }
        }
    }

    /// Returns true if there are snapshots that can be undone
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns true if there are snapshots that can be redone
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Bytes held by all stored snapshots
    pub fn memory_bytes(&self) -> usize {
        self.undo_stack
            .iter()
            .chain(self.redo_stack.iter())
            .map(Snapshot::byte_len)
            .sum()
    }

    /// Drop both stacks
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
