//! Snapshot undo/redo.
//!
//! History is a bounded list of full element snapshots plus a cursor. The
//! entry at the cursor always mirrors the committed document; everything
//! after it is redo-able. Committing truncates the redo tail. When the list
//! outgrows its depth the oldest entry is evicted and the cursor shifts down,
//! so at most `depth - 1` undos are ever available.
//!
//! Snapshots are shared `Arc<[Element]>`: restoring hands out a deep copy,
//! so later edits to the working copy can never reach back into a snapshot.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::sync::Arc;

use tracing::trace;

use crate::element::Element;

/// Bounded snapshot history.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Arc<[Element]>>,
    index: usize,
    depth: usize,
}

impl History {
    /// A history whose only entry is `initial`. `depth` is floored at 1.
    #[must_use]
    pub fn new(initial: &[Element], depth: usize) -> Self {
        Self { entries: vec![Arc::from(initial)], index: 0, depth: depth.max(1) }
    }

    /// Discard everything and start over from `initial` (document load).
    pub fn reset(&mut self, initial: &[Element]) {
        self.entries.clear();
        self.entries.push(Arc::from(initial));
        self.index = 0;
    }

    /// Record `snapshot` as the new current entry, dropping any redo tail.
    pub fn commit(&mut self, snapshot: &[Element]) {
        self.entries.truncate(self.index + 1);
        self.entries.push(Arc::from(snapshot));
        self.index = self.entries.len() - 1;
        if self.entries.len() > self.depth {
            self.entries.remove(0);
            self.index -= 1;
        }
        trace!(index = self.index, len = self.entries.len(), "history commit");
    }

    /// Step back one entry and return a copy of it, or `None` at the start.
    pub fn undo(&mut self) -> Option<Vec<Element>> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        Some(self.entries[self.index].to_vec())
    }

    /// Step forward one entry and return a copy of it, or `None` at the end.
    pub fn redo(&mut self) -> Option<Vec<Element>> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        Some(self.entries[self.index].to_vec())
    }

    /// The snapshot at the cursor.
    #[must_use]
    pub fn current(&self) -> &[Element] {
        self.entries.get(self.index).map_or(&[][..], |s| &s[..])
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }
}
