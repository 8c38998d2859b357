//! Connector binding: anchor math and endpoint recomputation.
//!
//! A connector endpoint is either bound (element id + anchor) or free. Bound
//! endpoint coordinates are derived: after every store mutation [`reroute`]
//! rewrites them from the live bounds of the referenced elements, so a bound
//! connector never carries stale coordinates.
//!
//! A binding whose element no longer exists is converted to a free endpoint at
//! its last derived position. This is the deletion policy: removing a shape
//! leaves its connectors in place, floating where they last were.

#[cfg(test)]
#[path = "connector_test.rs"]
mod connector_test;

use tracing::debug;

use crate::element::{Anchor, Binding, Connector, Element, ElementId, Shape};
use crate::geometry::{Bounds, Point, bounds_of};

/// Coordinate of a named anchor on a bounding box.
#[must_use]
pub fn anchor_point(bounds: Bounds, anchor: Anchor) -> Point {
    match anchor {
        Anchor::Top => Point::new(bounds.x + bounds.width / 2.0, bounds.y),
        Anchor::Right => Point::new(bounds.right(), bounds.y + bounds.height / 2.0),
        Anchor::Bottom => Point::new(bounds.x + bounds.width / 2.0, bounds.bottom()),
        Anchor::Left => Point::new(bounds.x, bounds.y + bounds.height / 2.0),
    }
}

/// Coordinate of a named anchor on an element's bounds.
#[must_use]
pub fn element_anchor(element: &Element, anchor: Anchor) -> Point {
    anchor_point(bounds_of(element), anchor)
}

/// Absolute bounds of the element with `id`, searching into groups.
///
/// Group children are stored group-local, so a nested hit is offset by the
/// origin of every enclosing group.
#[must_use]
pub fn locate_bounds(elements: &[Element], id: &ElementId) -> Option<Bounds> {
    for element in elements {
        if element.id == *id {
            return Some(bounds_of(element));
        }
        if let Shape::Group { x, y, children, .. } = &element.shape {
            if let Some(inner) = locate_bounds(children, id) {
                return Some(Bounds { x: inner.x + x, y: inner.y + y, ..inner });
            }
        }
    }
    None
}

/// Ids of top-level connectors with at least one endpoint bound to `id`.
#[must_use]
pub fn dependents(elements: &[Element], id: &ElementId) -> Vec<ElementId> {
    elements
        .iter()
        .filter(|e| e.as_connector().is_some_and(|c| c.references(id)))
        .map(|e| e.id)
        .collect()
}

/// Whether an element may be dragged on its own.
///
/// Bound connectors are purely derived and only move with their endpoints.
#[must_use]
pub fn can_drag(element: &Element) -> bool {
    element.as_connector().is_none_or(Connector::is_free)
}

/// Outcome of a [`reroute`] pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reroute {
    /// Connectors whose derived endpoints changed.
    pub moved: Vec<ElementId>,
    /// Connectors that lost a binding because its element disappeared.
    pub detached: Vec<ElementId>,
}

impl Reroute {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moved.is_empty() && self.detached.is_empty()
    }
}

enum EndUpdate {
    Keep,
    Move(Point),
    Detach,
}

fn resolve_end(elements: &[Element], self_id: &ElementId, binding: Option<Binding>, current: Point) -> EndUpdate {
    let Some(binding) = binding else {
        return EndUpdate::Keep;
    };
    if binding.element == *self_id {
        return EndUpdate::Detach;
    }
    match locate_bounds(elements, &binding.element) {
        Some(bounds) => {
            let pt = anchor_point(bounds, binding.anchor);
            if pt == current { EndUpdate::Keep } else { EndUpdate::Move(pt) }
        }
        None => EndUpdate::Detach,
    }
}

/// Recompute every bound endpoint of every top-level connector.
///
/// Dangling bindings are dropped, leaving the endpoint free at its last
/// derived coordinates.
pub fn reroute(elements: &mut [Element]) -> Reroute {
    let mut updates = Vec::new();
    for (idx, element) in elements.iter().enumerate() {
        let Some(c) = element.as_connector() else {
            continue;
        };
        if c.is_free() {
            continue;
        }
        let source = resolve_end(elements, &element.id, c.source, c.start);
        let target = resolve_end(elements, &element.id, c.target, c.end);
        if matches!(source, EndUpdate::Keep) && matches!(target, EndUpdate::Keep) {
            continue;
        }
        updates.push((idx, source, target));
    }

    let mut outcome = Reroute::default();
    for (idx, source, target) in updates {
        let element = &mut elements[idx];
        let id = element.id;
        let Shape::Connector(c) = &mut element.shape else {
            continue;
        };
        let mut moved = false;
        let mut detached = false;
        match source {
            EndUpdate::Keep => {}
            EndUpdate::Move(pt) => {
                c.start = pt;
                moved = true;
            }
            EndUpdate::Detach => {
                c.source = None;
                detached = true;
            }
        }
        match target {
            EndUpdate::Keep => {}
            EndUpdate::Move(pt) => {
                c.end = pt;
                moved = true;
            }
            EndUpdate::Detach => {
                c.target = None;
                detached = true;
            }
        }
        if moved {
            outcome.moved.push(id);
        }
        if detached {
            debug!(connector = %id, "connector binding detached");
            outcome.detached.push(id);
        }
    }
    outcome
}

/// Build a connector between two optional bindings, deriving bound endpoint
/// coordinates from `elements` and falling back to the given points.
///
/// A binding whose element can't be found, or that doesn't accept connectors,
/// is dropped in favour of the fallback point.
#[must_use]
pub fn connect(
    elements: &[Element],
    source: Option<Binding>,
    target: Option<Binding>,
    start: Point,
    end: Point,
) -> Connector {
    let resolve = |binding: Option<Binding>, fallback: Point| -> (Option<Binding>, Point) {
        let Some(b) = binding else {
            return (None, fallback);
        };
        let accepts = elements
            .iter()
            .find(|e| e.id == b.element)
            .is_some_and(|e| e.kind().accepts_connectors());
        match locate_bounds(elements, &b.element) {
            Some(bounds) if accepts => (Some(b), anchor_point(bounds, b.anchor)),
            _ => (None, fallback),
        }
    };
    let (source, start) = resolve(source, start);
    let (target, end) = resolve(target, end);
    Connector { source, target, start, end }
}
