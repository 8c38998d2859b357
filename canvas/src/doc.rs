//! Document store: the ordered element collection and the selection set.
//!
//! `DocStore` is the working copy of one whiteboard during an editing session.
//! Array order is z-order: later entries paint on top and win hit tests. Every
//! mutation bumps [`DocStore::revision`] and re-derives bound connector
//! endpoints, so observers (history, autosave, renderer) can tell when the
//! document changed and never see a stale connector.
//!
//! Unknown ids are silent no-ops throughout: UI callers frequently race with
//! deletions and there is nothing useful for them to do with an error.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashSet;

use tracing::debug;
use uuid::Uuid;

use crate::clock::now_ms;
use crate::connector::{self, Reroute};
use crate::consts::SELECTION_MARGIN;
use crate::element::{Element, ElementDraft, ElementId, ElementKind, ElementPatch, Shape};
use crate::geometry::{Bounds, Point, bounds_of, union_bounds};
use crate::hit;
use crate::selection::Selection;

/// In-memory store of elements plus the current selection.
#[derive(Debug, Clone, Default)]
pub struct DocStore {
    elements: Vec<Element>,
    selection: Selection,
    revision: u64,
    last_reroute: Reroute,
}

impl DocStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `elements` in the given z-order.
    #[must_use]
    pub fn from_elements(elements: Vec<Element>) -> Self {
        let mut store = Self::new();
        store.replace_all(elements);
        store.revision = 0;
        store
    }

    // --- Queries ---

    /// All elements, bottom to top.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Look up a top-level element by id.
    #[must_use]
    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == *id)
    }

    /// Z-order position of a top-level element.
    #[must_use]
    pub fn index_of(&self, id: &ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id == *id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Monotonic mutation counter.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Connectors rerouted or detached by the most recent mutation.
    #[must_use]
    pub fn last_reroute(&self) -> &Reroute {
        &self.last_reroute
    }

    /// Topmost element under `pt`.
    #[must_use]
    pub fn hit_test(&self, pt: Point) -> Option<&Element> {
        hit::hit_test(&self.elements, pt)
    }

    /// Union bounds of every element, for hosts that size a scroll area.
    #[must_use]
    pub fn content_bounds(&self) -> Option<Bounds> {
        union_bounds(&self.elements)
    }

    // --- Mutations ---

    fn touch(&mut self) {
        self.revision += 1;
        self.last_reroute = connector::reroute(&mut self.elements);
    }

    /// Create an element from `draft` with a fresh id and timestamps, on top.
    pub fn add_element(&mut self, draft: ElementDraft) -> Element {
        let element = draft.into_element(Uuid::new_v4(), now_ms());
        debug!(id = %element.id, kind = ?element.kind(), "element added");
        self.elements.push(element.clone());
        self.touch();
        // Reroute may have re-derived a freshly bound connector's endpoints.
        self.elements.last().cloned().unwrap_or(element)
    }

    /// Merge `patch` into the element. No-op (returns false) if absent.
    ///
    /// Z-order is untouched.
    pub fn update_element(&mut self, id: &ElementId, patch: &ElementPatch) -> bool {
        let Some(element) = self.elements.iter_mut().find(|e| e.id == *id) else {
            return false;
        };
        element.apply_patch(patch);
        element.updated_at = now_ms().max(element.created_at);
        self.touch();
        true
    }

    /// Remove one element. Returns whether it existed.
    pub fn remove_element(&mut self, id: &ElementId) -> bool {
        !self.remove_elements(&[*id]).is_empty()
    }

    /// Remove every listed element, pruning them from the selection.
    ///
    /// Connectors bound to a removed element become free at their last
    /// coordinates. Returns the ids actually removed.
    pub fn remove_elements(&mut self, ids: &[ElementId]) -> Vec<ElementId> {
        let doomed: HashSet<ElementId> = ids.iter().copied().collect();
        let removed: Vec<ElementId> = self
            .elements
            .iter()
            .filter(|e| doomed.contains(&e.id))
            .map(|e| e.id)
            .collect();
        if removed.is_empty() {
            return removed;
        }
        self.elements.retain(|e| !doomed.contains(&e.id));
        self.selection.retain(|id| !doomed.contains(id));
        debug!(count = removed.len(), "elements removed");
        self.touch();
        removed
    }

    /// Move the element to the top of the z-order.
    ///
    /// Returns true only if the order actually changed.
    pub fn bring_to_front(&mut self, id: &ElementId) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        if idx + 1 == self.elements.len() {
            return false;
        }
        let element = self.elements.remove(idx);
        self.elements.push(element);
        self.touch();
        true
    }

    /// Remove every element and clear the selection.
    pub fn clear(&mut self) {
        if self.elements.is_empty() {
            return;
        }
        self.elements.clear();
        self.selection.clear();
        self.touch();
    }

    /// Replace the whole collection (history restore, document load).
    ///
    /// Selection ids that no longer exist are dropped.
    pub fn replace_all(&mut self, elements: Vec<Element>) {
        self.elements = elements;
        let present: HashSet<ElementId> = self.elements.iter().map(|e| e.id).collect();
        self.selection.retain(|id| present.contains(id));
        self.touch();
    }

    /// Group two or more top-level elements into a new `group` element.
    ///
    /// The group is positioned at the union bounds' origin, its children are
    /// re-expressed relative to it, and it is placed on top and selected.
    /// Bound connectors are left out because their coordinates are derived.
    /// Returns `None` (no-op) if fewer than two ids resolve.
    pub fn group(&mut self, ids: &[ElementId]) -> Option<Element> {
        let wanted: HashSet<ElementId> = ids.iter().copied().collect();
        let members: Vec<Element> = self
            .elements
            .iter()
            .filter(|e| wanted.contains(&e.id) && connector::can_drag(e))
            .cloned()
            .collect();
        if members.len() < 2 {
            return None;
        }

        let bounds = union_bounds(&members)?;
        let children: Vec<Element> = members
            .into_iter()
            .map(|mut child| {
                child.shape.translate(-bounds.x, -bounds.y);
                child
            })
            .collect();
        let member_ids: HashSet<ElementId> = children.iter().map(|c| c.id).collect();

        let now = now_ms();
        let group = Element {
            id: Uuid::new_v4(),
            shape: Shape::Group { x: bounds.x, y: bounds.y, width: bounds.width, height: bounds.height, children },
            stroke: crate::element::DEFAULT_STROKE.to_owned(),
            stroke_width: 0.0,
            fill: None,
            rotation: 0.0,
            created_at: now,
            updated_at: now,
        };

        self.elements.retain(|e| !member_ids.contains(&e.id));
        self.elements.push(group.clone());
        self.selection.set_single(group.id);
        debug!(id = %group.id, members = member_ids.len(), "elements grouped");
        self.touch();
        Some(group)
    }

    /// Dissolve a group, reinserting its children at absolute coordinates in
    /// the z-order slot the group occupied. Returns the child ids.
    pub fn ungroup(&mut self, group_id: &ElementId) -> Vec<ElementId> {
        let Some(idx) = self.index_of(group_id) else {
            return Vec::new();
        };
        if self.elements[idx].kind() != ElementKind::Group {
            return Vec::new();
        }
        let group = self.elements.remove(idx);
        let Shape::Group { x, y, children, .. } = group.shape else {
            return Vec::new();
        };

        let ids: Vec<ElementId> = children.iter().map(|c| c.id).collect();
        for (offset, mut child) in children.into_iter().enumerate() {
            child.shape.translate(x, y);
            self.elements.insert(idx + offset, child);
        }
        self.selection.clear();
        debug!(id = %group_id, members = ids.len(), "group dissolved");
        self.touch();
        ids
    }

    // --- Selection ---

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The single selected element, if exactly one is selected.
    #[must_use]
    pub fn primary(&self) -> Option<&Element> {
        self.selection.primary().and_then(|id| self.get(&id))
    }

    /// Selected elements in selection order.
    #[must_use]
    pub fn selected_elements(&self) -> Vec<&Element> {
        self.selection.ids().iter().filter_map(|id| self.get(id)).collect()
    }

    /// Make `id` the sole selection and raise it to the top of the z-order.
    ///
    /// Returns false (no-op) if the id is unknown.
    pub fn select(&mut self, id: &ElementId) -> bool {
        if self.index_of(id).is_none() {
            return false;
        }
        self.selection.set_single(*id);
        self.bring_to_front(id);
        true
    }

    /// Add `id` to the selection (shift-click). If it becomes the only
    /// selected element it is raised like a plain select.
    pub fn add_to_selection(&mut self, id: &ElementId) -> bool {
        if self.index_of(id).is_none() {
            return false;
        }
        self.selection.add(*id);
        if self.selection.len() == 1 {
            self.bring_to_front(id);
        }
        true
    }

    /// Toggle `id` in the selection.
    pub fn toggle_selection(&mut self, id: &ElementId) {
        if self.selection.contains(id) {
            self.selection.remove(id);
        } else {
            self.add_to_selection(id);
        }
    }

    /// Select exactly `ids` (marquee). Unknown ids are skipped; a single
    /// result is raised like a plain select.
    pub fn select_many(&mut self, ids: &[ElementId]) {
        let known: Vec<ElementId> = ids.iter().copied().filter(|id| self.index_of(id).is_some()).collect();
        self.selection.set_many(&known);
        if let Some(only) = self.selection.primary() {
            self.bring_to_front(&only);
        }
    }

    /// Select every element without changing z-order.
    pub fn select_all(&mut self) {
        let ids: Vec<ElementId> = self.elements.iter().map(|e| e.id).collect();
        self.selection.set_many(&ids);
    }

    /// Empty the selection. Z-order is untouched.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Selection indicator: union of the selected bounds plus a fixed margin.
    #[must_use]
    pub fn selection_bounds(&self) -> Option<Bounds> {
        union_bounds(self.selected_elements()).map(|b| b.expand(SELECTION_MARGIN))
    }

    /// Bounds of the primary selection, if any.
    #[must_use]
    pub fn primary_bounds(&self) -> Option<Bounds> {
        self.primary().map(bounds_of)
    }
}
