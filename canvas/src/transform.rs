//! Transform pipeline: move, resize and rotate expressed as element patches.
//!
//! DESIGN
//! ======
//! Every function here is pure and produces an [`ElementPatch`]; the engine
//! feeds the patch to `DocStore::update_element`. Moves are applied on every
//! pointer move. Resizes are accumulated in a [`Transformer`] while the handle
//! is dragged and applied once on release, after which the accumulator is
//! reset to identity so repeated resizes never compound.
//!
//! Scale factors are sanitized before use: non-finite factors become 1 and
//! negative factors 0, so every result is then pinned at the variant's floor
//! rather than rejected.

#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;

use crate::consts::{MIN_FONT_SIZE, MIN_SHAPE_SIZE};
use crate::element::{Element, ElementId, ElementPatch, Shape};
use crate::geometry::{Bounds, Point, bounds_of, shape_bounds};
use crate::hit::ResizeAnchor;

/// Patch that moves `element` by `(dx, dy)`.
///
/// Groups only move their own origin; children are group-local. Bound
/// connectors yield an empty patch since their endpoints are derived.
#[must_use]
pub fn translate_patch(element: &Element, dx: f64, dy: f64) -> ElementPatch {
    match &element.shape {
        Shape::Rectangle { x, y, .. }
        | Shape::Circle { x, y, .. }
        | Shape::Ellipse { x, y, .. }
        | Shape::Text { x, y, .. }
        | Shape::StickyNote { x, y, .. }
        | Shape::Diamond { x, y, .. }
        | Shape::Parallelogram { x, y, .. }
        | Shape::Hexagon { x, y, .. }
        | Shape::Group { x, y, .. } => ElementPatch::position(x + dx, y + dy),
        Shape::Line { points } | Shape::Path { points } => {
            let mut moved = points.clone();
            for pair in moved.chunks_exact_mut(2) {
                pair[0] += dx;
                pair[1] += dy;
            }
            ElementPatch { points: Some(moved), ..Default::default() }
        }
        Shape::Connector(c) if c.is_free() => ElementPatch {
            start: Some(c.start.offset(dx, dy)),
            end: Some(c.end.offset(dx, dy)),
            ..Default::default()
        },
        Shape::Connector(_) => ElementPatch::default(),
    }
}

/// Map a raw scale factor onto `[0, inf)`, treating non-finite input as identity.
#[must_use]
pub fn sanitize_scale(factor: f64) -> f64 {
    if factor.is_finite() { factor.max(0.0) } else { 1.0 }
}

fn scale_points(points: &[f64], origin: Point, sx: f64, sy: f64) -> Vec<f64> {
    let mut scaled = points.to_vec();
    for pair in scaled.chunks_exact_mut(2) {
        pair[0] = origin.x + (pair[0] - origin.x) * sx;
        pair[1] = origin.y + (pair[1] - origin.y) * sy;
    }
    scaled
}

/// Patch that scales `element`'s size by `(sx, sy)` with floors applied.
///
/// Position is left alone except for point-based variants, which scale about
/// their bounds' top-left corner. Circles scale by the average factor.
#[must_use]
pub fn scale_patch(element: &Element, sx: f64, sy: f64) -> ElementPatch {
    let sx = sanitize_scale(sx);
    let sy = sanitize_scale(sy);
    let (floor_w, floor_h) = element.kind().size_floor();

    match &element.shape {
        Shape::Rectangle { width, height, .. }
        | Shape::Diamond { width, height, .. }
        | Shape::Parallelogram { width, height, .. }
        | Shape::Hexagon { width, height, .. }
        | Shape::StickyNote { width, height, .. } => ElementPatch {
            width: Some((width * sx).max(floor_w)),
            height: Some((height * sy).max(floor_h)),
            ..Default::default()
        },
        Shape::Circle { radius, .. } => ElementPatch {
            radius: Some((radius * (sx + sy) / 2.0).max(MIN_SHAPE_SIZE)),
            ..Default::default()
        },
        Shape::Ellipse { radius_x, radius_y, .. } => ElementPatch {
            radius_x: Some((radius_x * sx).max(MIN_SHAPE_SIZE)),
            radius_y: Some((radius_y * sy).max(MIN_SHAPE_SIZE)),
            ..Default::default()
        },
        Shape::Text { font_size, .. } => ElementPatch {
            font_size: Some((font_size * sy).max(MIN_FONT_SIZE)),
            ..Default::default()
        },
        Shape::Line { points } | Shape::Path { points } => {
            let b = bounds_of(element);
            ElementPatch {
                points: Some(scale_points(points, Point::new(b.x, b.y), sx, sy)),
                ..Default::default()
            }
        }
        Shape::Connector(c) if c.is_free() => {
            let b = bounds_of(element);
            let origin = Point::new(b.x, b.y);
            let scale = |p: Point| Point::new(origin.x + (p.x - origin.x) * sx, origin.y + (p.y - origin.y) * sy);
            ElementPatch { start: Some(scale(c.start)), end: Some(scale(c.end)), ..Default::default() }
        }
        Shape::Connector(_) => ElementPatch::default(),
        Shape::Group { width, height, children, .. } => ElementPatch {
            width: Some((width * sx).max(floor_w)),
            height: Some((height * sy).max(floor_h)),
            children: Some(children.iter().map(|c| scale_group_child(c, sx, sy)).collect()),
            ..Default::default()
        },
    }
}

/// Scale one group child in group-local space.
///
/// Positions and widths follow `sx`, heights follow `sy`, font sizes follow
/// `sy` and radii follow `min(sx, sy)`.
fn scale_group_child(child: &Element, sx: f64, sy: f64) -> Element {
    let (floor_w, floor_h) = child.kind().size_floor();
    let rs = sx.min(sy);
    let mut scaled = child.clone();
    match &mut scaled.shape {
        Shape::Rectangle { x, y, width, height, .. }
        | Shape::Diamond { x, y, width, height }
        | Shape::Parallelogram { x, y, width, height }
        | Shape::Hexagon { x, y, width, height }
        | Shape::Group { x, y, width, height, .. } => {
            *x *= sx;
            *y *= sy;
            *width = (*width * sx).max(floor_w);
            *height = (*height * sy).max(floor_h);
        }
        Shape::StickyNote { x, y, width, height, font_size, .. } => {
            *x *= sx;
            *y *= sy;
            *width = (*width * sx).max(floor_w);
            *height = (*height * sy).max(floor_h);
            *font_size = (*font_size * sy).max(MIN_FONT_SIZE);
        }
        Shape::Circle { x, y, radius } => {
            *x *= sx;
            *y *= sy;
            *radius = (*radius * rs).max(MIN_SHAPE_SIZE);
        }
        Shape::Ellipse { x, y, radius_x, radius_y } => {
            *x *= sx;
            *y *= sy;
            *radius_x = (*radius_x * rs).max(MIN_SHAPE_SIZE);
            *radius_y = (*radius_y * rs).max(MIN_SHAPE_SIZE);
        }
        Shape::Text { x, y, font_size, .. } => {
            *x *= sx;
            *y *= sy;
            *font_size = (*font_size * sy).max(MIN_FONT_SIZE);
        }
        Shape::Line { points } | Shape::Path { points } => {
            *points = scale_points(points, Point::default(), sx, sy);
        }
        Shape::Connector(c) => {
            c.start = Point::new(c.start.x * sx, c.start.y * sy);
            c.end = Point::new(c.end.x * sx, c.end.y * sy);
        }
    }
    scaled
}

/// Full resize patch: scale by `(sx, sy)` and re-anchor so the edges opposite
/// the dragged `handle` stay where they were in `origin`.
#[must_use]
pub fn resize_patch(element: &Element, handle: ResizeAnchor, origin: Bounds, sx: f64, sy: f64) -> ElementPatch {
    let scale = scale_patch(element, sx, sy);
    let mut preview = element.clone();
    preview.apply_patch(&scale);
    let scaled = shape_bounds(&preview.shape);

    let x = if handle.moves_left() { origin.right() - scaled.width } else { origin.x };
    let y = if handle.moves_top() { origin.bottom() - scaled.height } else { origin.y };
    scale.merged(translate_patch(&preview, x - scaled.x, y - scaled.y))
}

/// Clockwise angle in degrees of `pt` around `center`, with 0 pointing up.
#[must_use]
pub fn rotation_from_pointer(center: Point, pt: Point) -> f64 {
    let deg = (pt.x - center.x).atan2(center.y - pt.y).to_degrees();
    deg.rem_euclid(360.0)
}

/// Resize accumulator for an in-progress handle drag.
///
/// Holds the element's bounds at drag start and the scale factors implied by
/// the latest pointer position. [`Transformer::finish`] hands the factors out
/// and resets them to identity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transformer {
    pub element_id: ElementId,
    pub handle: ResizeAnchor,
    pub origin: Bounds,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Transformer {
    #[must_use]
    pub fn begin(element_id: ElementId, handle: ResizeAnchor, origin: Bounds) -> Self {
        Self { element_id, handle, origin, scale_x: 1.0, scale_y: 1.0 }
    }

    /// Update the accumulated factors for the handle dragged to `pt`.
    pub fn drag_to(&mut self, pt: Point) {
        let b = self.origin;
        let (mut left, mut top, mut right, mut bottom) = (b.x, b.y, b.right(), b.bottom());
        if self.handle.moves_left() {
            left = pt.x;
        }
        if self.handle.moves_right() {
            right = pt.x;
        }
        if self.handle.moves_top() {
            top = pt.y;
        }
        if self.handle.moves_bottom() {
            bottom = pt.y;
        }
        self.scale_x = if b.width > 0.0 { sanitize_scale((right - left) / b.width) } else { 1.0 };
        self.scale_y = if b.height > 0.0 { sanitize_scale((bottom - top) / b.height) } else { 1.0 };
    }

    /// Preview box for the current factors, before floors.
    #[must_use]
    pub fn preview_bounds(&self) -> Bounds {
        let b = self.origin;
        let width = b.width * self.scale_x;
        let height = b.height * self.scale_y;
        let x = if self.handle.moves_left() { b.right() - width } else { b.x };
        let y = if self.handle.moves_top() { b.bottom() - height } else { b.y };
        Bounds::new(x, y, width, height)
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        (self.scale_x - 1.0).abs() < f64::EPSILON && (self.scale_y - 1.0).abs() < f64::EPSILON
    }

    /// Take the accumulated `(scale_x, scale_y)` and reset to identity.
    pub fn finish(&mut self) -> (f64, f64) {
        let factors = (self.scale_x, self.scale_y);
        self.scale_x = 1.0;
        self.scale_y = 1.0;
        factors
    }
}
