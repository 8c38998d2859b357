//! Geometry: points, axis-aligned bounds, and the per-variant bounds formula.
//!
//! Everything here is pure. Hit-testing, grouping, connector anchors and the
//! selection indicator all call [`bounds_of`] repeatedly, so it never touches
//! anything but its argument.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

use crate::consts::TEXT_WIDTH_FACTOR;
use crate::element::{Element, Shape};

/// A point in either screen or world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// This point shifted by `(dx, dy)`.
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }
}

/// Axis-aligned bounding box. `x`/`y` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// The box spanning two arbitrary corners.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self { x, y, width: (a.x - b.x).abs(), height: (a.y - b.y).abs() }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Edge-inclusive containment.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.x && pt.x <= self.right() && pt.y >= self.y && pt.y <= self.bottom()
    }

    /// True when the two boxes overlap or touch.
    #[must_use]
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.x <= other.right() && other.x <= self.right() && self.y <= other.bottom() && other.y <= self.bottom()
    }

    /// Smallest box covering both.
    #[must_use]
    pub fn union(&self, other: &Bounds) -> Bounds {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Bounds { x, y, width: right - x, height: bottom - y }
    }

    /// Grow by `margin` on every side.
    #[must_use]
    pub fn expand(&self, margin: f64) -> Bounds {
        Bounds {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + margin * 2.0,
            height: self.height + margin * 2.0,
        }
    }
}

/// Axis-aligned bounds of an element, one formula per variant.
///
/// Rotation is ignored; the result is used for hit-testing, grouping and
/// connector anchors, never for painting.
#[must_use]
pub fn bounds_of(element: &Element) -> Bounds {
    shape_bounds(&element.shape)
}

/// Same as [`bounds_of`], for a bare shape.
#[must_use]
pub fn shape_bounds(shape: &Shape) -> Bounds {
    match shape {
        Shape::Rectangle { x, y, width, height, .. }
        | Shape::Diamond { x, y, width, height }
        | Shape::Parallelogram { x, y, width, height }
        | Shape::Hexagon { x, y, width, height }
        | Shape::StickyNote { x, y, width, height, .. }
        | Shape::Group { x, y, width, height, .. } => Bounds::new(*x, *y, *width, *height),
        Shape::Circle { x, y, radius } => Bounds::new(x - radius, y - radius, radius * 2.0, radius * 2.0),
        Shape::Ellipse { x, y, radius_x, radius_y } => {
            Bounds::new(x - radius_x, y - radius_y, radius_x * 2.0, radius_y * 2.0)
        }
        Shape::Line { points } | Shape::Path { points } => points_bounds(points),
        Shape::Connector(c) => Bounds::from_corners(c.start, c.end),
        Shape::Text { x, y, text, font_size, .. } => {
            #[allow(clippy::cast_precision_loss)]
            let chars = text.chars().count() as f64;
            Bounds::new(*x, y - font_size, chars * font_size * TEXT_WIDTH_FACTOR, *font_size)
        }
    }
}

/// Min/max scan over a flat `[x0, y0, x1, y1, ...]` sequence.
///
/// An empty sequence yields a zero-size box at the origin; a trailing odd
/// coordinate is ignored.
#[must_use]
pub fn points_bounds(points: &[f64]) -> Bounds {
    let mut pairs = points.chunks_exact(2);
    let Some(first) = pairs.next() else {
        return Bounds::default();
    };
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first[0], first[1], first[0], first[1]);
    for pair in pairs {
        min_x = min_x.min(pair[0]);
        min_y = min_y.min(pair[1]);
        max_x = max_x.max(pair[0]);
        max_y = max_y.max(pair[1]);
    }
    Bounds::new(min_x, min_y, max_x - min_x, max_y - min_y)
}

/// Union of the bounds of every element yielded, or `None` if there are none.
pub fn union_bounds<'a, I>(elements: I) -> Option<Bounds>
where
    I: IntoIterator<Item = &'a Element>,
{
    elements
        .into_iter()
        .map(bounds_of)
        .reduce(|acc, b| acc.union(&b))
}
