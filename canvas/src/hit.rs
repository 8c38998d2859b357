//! Hit-testing: which element, handle or anchor lies under a world point.
//!
//! Element bodies are tested against [`bounds_of`] from topmost (end of the
//! z-ordered slice) to bottommost, so the first match is always the one drawn
//! on top. Handle and anchor slop is specified in screen pixels and converted
//! through the camera so it feels the same at every zoom level.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::Camera;
use crate::consts::{HANDLE_RADIUS_PX, ROTATE_HANDLE_OFFSET_PX};
use crate::element::{Anchor, Element, ElementId, ElementKind};
use crate::geometry::{Bounds, Point, bounds_of};

/// Which part of an element was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle(ResizeAnchor),
    RotateHandle,
    Anchor(Anchor),
}

/// Anchor position for resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeAnchor {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeAnchor {
    pub const ALL: [ResizeAnchor; 8] = [
        ResizeAnchor::N,
        ResizeAnchor::Ne,
        ResizeAnchor::E,
        ResizeAnchor::Se,
        ResizeAnchor::S,
        ResizeAnchor::Sw,
        ResizeAnchor::W,
        ResizeAnchor::Nw,
    ];

    /// Whether dragging this handle moves the left edge.
    #[must_use]
    pub fn moves_left(self) -> bool {
        matches!(self, Self::W | Self::Nw | Self::Sw)
    }

    /// Whether dragging this handle moves the right edge.
    #[must_use]
    pub fn moves_right(self) -> bool {
        matches!(self, Self::E | Self::Ne | Self::Se)
    }

    /// Whether dragging this handle moves the top edge.
    #[must_use]
    pub fn moves_top(self) -> bool {
        matches!(self, Self::N | Self::Ne | Self::Nw)
    }

    /// Whether dragging this handle moves the bottom edge.
    #[must_use]
    pub fn moves_bottom(self) -> bool {
        matches!(self, Self::S | Self::Se | Self::Sw)
    }
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub element_id: ElementId,
    pub part: HitPart,
}

/// Topmost element whose bounds contain `pt`, or `None` over empty canvas.
#[must_use]
pub fn hit_test(elements: &[Element], pt: Point) -> Option<&Element> {
    elements.iter().rev().find(|e| bounds_of(e).contains(pt))
}

/// Ids of every element whose bounds intersect `rect`, in z-order.
#[must_use]
pub fn elements_in_rect(elements: &[Element], rect: &Bounds) -> Vec<ElementId> {
    elements
        .iter()
        .filter(|e| bounds_of(e).intersects(rect))
        .map(|e| e.id)
        .collect()
}

/// World position of a resize handle on `bounds`.
#[must_use]
pub fn resize_handle_point(bounds: &Bounds, anchor: ResizeAnchor) -> Point {
    let cx = bounds.x + bounds.width / 2.0;
    let cy = bounds.y + bounds.height / 2.0;
    match anchor {
        ResizeAnchor::N => Point::new(cx, bounds.y),
        ResizeAnchor::Ne => Point::new(bounds.right(), bounds.y),
        ResizeAnchor::E => Point::new(bounds.right(), cy),
        ResizeAnchor::Se => Point::new(bounds.right(), bounds.bottom()),
        ResizeAnchor::S => Point::new(cx, bounds.bottom()),
        ResizeAnchor::Sw => Point::new(bounds.x, bounds.bottom()),
        ResizeAnchor::W => Point::new(bounds.x, cy),
        ResizeAnchor::Nw => Point::new(bounds.x, bounds.y),
    }
}

/// World position of the rotate handle, a fixed screen distance above the top edge.
#[must_use]
pub fn rotate_handle_point(bounds: &Bounds, camera: &Camera) -> Point {
    Point::new(
        bounds.x + bounds.width / 2.0,
        bounds.y - camera.screen_dist_to_world(ROTATE_HANDLE_OFFSET_PX),
    )
}

/// Test the transform handles of the (single) selected element.
///
/// Connectors expose no handles; groups can be resized but not rotated.
#[must_use]
pub fn hit_handles(element: &Element, pt: Point, camera: &Camera) -> Option<HitPart> {
    if element.kind() == ElementKind::Connector {
        return None;
    }
    let bounds = bounds_of(element);
    let slop = camera.screen_dist_to_world(HANDLE_RADIUS_PX);

    if element.kind() != ElementKind::Group && rotate_handle_point(&bounds, camera).distance(pt) <= slop {
        return Some(HitPart::RotateHandle);
    }
    ResizeAnchor::ALL
        .into_iter()
        .find(|a| resize_handle_point(&bounds, *a).distance(pt) <= slop)
        .map(HitPart::ResizeHandle)
}

/// Topmost connector-accepting element with an anchor within slop of `pt`.
#[must_use]
pub fn hit_anchor(elements: &[Element], pt: Point, camera: &Camera) -> Option<(ElementId, Anchor)> {
    let slop = camera.screen_dist_to_world(HANDLE_RADIUS_PX);
    elements
        .iter()
        .rev()
        .filter(|e| e.kind().accepts_connectors())
        .find_map(|e| {
            let bounds = bounds_of(e);
            Anchor::ALL
                .into_iter()
                .find(|a| crate::connector::anchor_point(bounds, *a).distance(pt) <= slop)
                .map(|a| (e.id, a))
        })
}

/// Full pointer hit test: selected element's handles first, then bodies.
#[must_use]
pub fn hit_test_full(elements: &[Element], pt: Point, camera: &Camera, selected: Option<&Element>) -> Option<Hit> {
    if let Some(sel) = selected {
        if let Some(part) = hit_handles(sel, pt, camera) {
            return Some(Hit { element_id: sel.id, part });
        }
    }
    hit_test(elements, pt).map(|e| Hit { element_id: e.id, part: HitPart::Body })
}
