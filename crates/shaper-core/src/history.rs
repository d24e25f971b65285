//! Snapshot-based undo/redo
//!
//! Each undoable edit records the store as it was before the edit. The
//! state after the newest edit is captured lazily, on the first undo, so
//! that a later redo can return to it.

use serde::{Deserialize, Serialize};
use shaper_cad::{CadKernel, Sketch};

use crate::constants::DEFAULT_HISTORY_LIMIT;
use crate::object::{ObjectRecord, RecordOptions};
use crate::store::{RestoreReport, SceneStore};

/// A full copy of the store's contents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    pub objects: Vec<ObjectRecord>,
    pub sketches: Vec<Sketch>,
}

impl HistorySnapshot {
    /// Capture the store
    pub fn capture(store: &SceneStore, options: RecordOptions) -> Self {
        Self {
            objects: store.records(options),
            sketches: store.list_sketches().to_vec(),
        }
    }
}

/// Undo/redo log of store snapshots
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistorySnapshot>,
    /// Entry matching the live store, or the newest pre-edit entry
    index: Option<usize>,
    /// Live store has changed since `entries[index]` was captured or restored
    dirty: bool,
    limit: usize,
    options: RecordOptions,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT, RecordOptions::default())
    }
}

impl History {
    /// Create an empty history keeping at most `limit` entries
    pub fn new(limit: usize, options: RecordOptions) -> Self {
        Self {
            entries: Vec::new(),
            index: None,
            dirty: true,
            limit: limit.max(2),
            options,
        }
    }

    /// Number of stored snapshots
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current position, `None` before the first snapshot
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Record the store before an undoable edit
    ///
    /// Any redo entries are discarded.
    pub fn snapshot(&mut self, store: &SceneStore) {
        self.truncate_forward();
        if self.dirty {
            self.push(HistorySnapshot::capture(store, self.options));
        }
        self.dirty = true;
    }

    /// Note a change to the store that is not itself undoable
    ///
    /// Redo entries become unreachable, and the next undo captures the
    /// changed state first.
    pub fn touch(&mut self) {
        self.dirty = true;
    }

    pub fn can_undo(&self) -> bool {
        match self.index {
            None => false,
            Some(index) => self.dirty || index > 0,
        }
    }

    pub fn can_redo(&self) -> bool {
        match self.index {
            Some(index) => !self.dirty && index + 1 < self.entries.len(),
            None => false,
        }
    }

    /// Step back one edit and restore the store
    ///
    /// Returns `None` when there is nothing to undo.
    pub fn undo(&mut self, store: &mut SceneStore, kernel: &dyn CadKernel) -> Option<RestoreReport> {
        if !self.can_undo() {
            return None;
        }

        if self.dirty {
            self.truncate_forward();
            self.push(HistorySnapshot::capture(store, self.options));
            self.dirty = false;
        }

        let index = self.index?.checked_sub(1)?;
        self.index = Some(index);
        Some(self.restore(index, store, kernel))
    }

    /// Step forward one edit and restore the store
    ///
    /// Returns `None` when there is nothing to redo.
    pub fn redo(&mut self, store: &mut SceneStore, kernel: &dyn CadKernel) -> Option<RestoreReport> {
        if !self.can_redo() {
            return None;
        }
        let index = self.index? + 1;
        self.index = Some(index);
        Some(self.restore(index, store, kernel))
    }

    /// Forget every snapshot
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index = None;
        self.dirty = true;
    }

    fn restore(&self, index: usize, store: &mut SceneStore, kernel: &dyn CadKernel) -> RestoreReport {
        let entry = &self.entries[index];
        tracing::debug!("Restoring history entry {} of {}", index + 1, self.entries.len());
        store.restore(&entry.objects, entry.sketches.clone(), kernel)
    }

    fn truncate_forward(&mut self) {
        let keep = self.index.map_or(0, |i| i + 1);
        self.entries.truncate(keep);
    }

    fn push(&mut self, snapshot: HistorySnapshot) {
        self.entries.push(snapshot);
        if self.entries.len() > self.limit {
            let excess = self.entries.len() - self.limit;
            self.entries.drain(..excess);
        }
        self.index = Some(self.entries.len() - 1);
    }
}
