//! Selection: an ordered set of element ids.
//!
//! Selection is transient UI state. It is never persisted and never recorded
//! in history; undo/redo only prunes ids that no longer exist.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use crate::element::ElementId;

/// Ordered set of selected ids, in the order they were selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<ElementId>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn ids(&self) -> &[ElementId] {
        &self.ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &ElementId) -> bool {
        self.ids.contains(id)
    }

    /// The single selected id, if exactly one is selected.
    #[must_use]
    pub fn primary(&self) -> Option<ElementId> {
        match self.ids.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// Replace the selection with exactly `id`.
    pub fn set_single(&mut self, id: ElementId) {
        self.ids.clear();
        self.ids.push(id);
    }

    /// Replace the selection with `ids`, dropping duplicates but keeping order.
    pub fn set_many(&mut self, ids: &[ElementId]) {
        self.ids.clear();
        for id in ids {
            self.add(*id);
        }
    }

    /// Append `id` unless already present. Returns whether it was added.
    pub fn add(&mut self, id: ElementId) -> bool {
        if self.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Remove `id`. Returns whether it was present.
    pub fn remove(&mut self, id: &ElementId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|s| s != id);
        self.ids.len() != before
    }

    /// Add `id` if absent, remove it if present.
    pub fn toggle(&mut self, id: ElementId) {
        if !self.remove(&id) {
            self.ids.push(id);
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Keep only ids for which `keep` returns true.
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&ElementId) -> bool,
    {
        self.ids.retain(keep);
    }
}
