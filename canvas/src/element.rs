//! Element model: the closed set of drawable variants and their sparse patches.
//!
//! An [`Element`] is the unit the store orders, the renderer paints, and the
//! history snapshots. Common style and bookkeeping live on the struct; all
//! geometry lives in the [`Shape`] sum type so that every consumer (bounds,
//! hit-testing, transforms) dispatches exhaustively over the same variants.
//!
//! On the wire an element is one flat JSON object tagged by `"type"`, e.g.
//! `{"id": ..., "type": "circle", "x": 50, "y": 50, "radius": 30, ...}`.

#[cfg(test)]
#[path = "element_test.rs"]
mod element_test;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::warn;
use uuid::Uuid;

use crate::consts::{MIN_FONT_SIZE, MIN_SHAPE_SIZE, MIN_STICKY_HEIGHT, MIN_STICKY_WIDTH};
use crate::geometry::Point;

/// Unique identifier for an element. Never reused after deletion.
pub type ElementId = Uuid;

pub const DEFAULT_STROKE: &str = "#000000";
pub const DEFAULT_STROKE_WIDTH: f64 = 3.0;
pub const DEFAULT_FONT_SIZE: f64 = 16.0;
pub const DEFAULT_FONT_FAMILY: &str = "Arial";
pub const DEFAULT_STICKY_FILL: &str = "#ffeb3b";
pub const DEFAULT_STICKY_TEXT_COLOR: &str = "#333333";

/// One of the four attachment points on an element's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    Top,
    Right,
    Bottom,
    Left,
}

impl Anchor {
    pub const ALL: [Anchor; 4] = [Anchor::Top, Anchor::Right, Anchor::Bottom, Anchor::Left];

    /// Parse an anchor name (`top|right|bottom|left`).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "top" => Some(Self::Top),
            "right" => Some(Self::Right),
            "bottom" => Some(Self::Bottom),
            "left" => Some(Self::Left),
            _ => None,
        }
    }
}

/// One bound connector endpoint: which element, and which of its anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub element: ElementId,
    pub anchor: Anchor,
}

/// A directed edge between two points, each optionally bound to an element.
///
/// `start`/`end` always hold the rendered endpoint coordinates. For a bound
/// endpoint they are rewritten by [`crate::connector::reroute`] after every
/// store mutation, so they are never stale; for a free endpoint they are the
/// authoritative position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    #[serde(default)]
    pub source: Option<Binding>,
    #[serde(default)]
    pub target: Option<Binding>,
    pub start: Point,
    pub end: Point,
}

impl Connector {
    /// A connector with both endpoints free.
    #[must_use]
    pub fn free(start: Point, end: Point) -> Self {
        Self { source: None, target: None, start, end }
    }

    /// Neither endpoint is bound.
    #[must_use]
    pub fn is_free(&self) -> bool {
        self.source.is_none() && self.target.is_none()
    }

    /// Whether either endpoint is bound to `id`.
    #[must_use]
    pub fn references(&self, id: &ElementId) -> bool {
        self.source.is_some_and(|b| b.element == *id) || self.target.is_some_and(|b| b.element == *id)
    }
}

/// Variant tag without payload, for dispatch that doesn't need geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Rectangle,
    Circle,
    Ellipse,
    Line,
    Path,
    Text,
    StickyNote,
    Diamond,
    Parallelogram,
    Hexagon,
    Connector,
    Group,
}

impl ElementKind {
    /// Whether connectors may bind to this kind's anchors.
    #[must_use]
    pub fn accepts_connectors(self) -> bool {
        matches!(
            self,
            Self::Rectangle
                | Self::Circle
                | Self::Ellipse
                | Self::StickyNote
                | Self::Diamond
                | Self::Parallelogram
                | Self::Hexagon
        )
    }

    /// Minimum `(width, height)` a resize may produce. Radii use the width floor.
    #[must_use]
    pub fn size_floor(self) -> (f64, f64) {
        match self {
            Self::StickyNote => (MIN_STICKY_WIDTH, MIN_STICKY_HEIGHT),
            _ => (MIN_SHAPE_SIZE, MIN_SHAPE_SIZE),
        }
    }
}

/// Geometry of an element, one case per drawable variant.
///
/// Circles and ellipses are positioned by their center; every other boxed
/// variant by its top-left corner. Lines and paths carry absolute flat point
/// sequences. Group children are stored relative to the group's `x`/`y`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum Shape {
    #[serde(alias = "rect")]
    Rectangle {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        #[serde(default)]
        corner_radius: f64,
    },
    Circle {
        x: f64,
        y: f64,
        #[serde(default = "default_radius")]
        radius: f64,
    },
    Ellipse {
        x: f64,
        y: f64,
        #[serde(default = "default_radius")]
        radius_x: f64,
        #[serde(default = "default_radius_y")]
        radius_y: f64,
    },
    Line {
        points: Vec<f64>,
    },
    Path {
        points: Vec<f64>,
    },
    Text {
        x: f64,
        y: f64,
        #[serde(default)]
        text: String,
        #[serde(default = "default_font_size")]
        font_size: f64,
        #[serde(default = "default_font_family")]
        font_family: String,
    },
    #[serde(alias = "sticky")]
    StickyNote {
        x: f64,
        y: f64,
        #[serde(default = "default_sticky_width")]
        width: f64,
        #[serde(default = "default_sticky_height")]
        height: f64,
        #[serde(default)]
        text: String,
        #[serde(default = "default_font_size")]
        font_size: f64,
        #[serde(default = "default_font_family")]
        font_family: String,
        #[serde(default = "default_sticky_text_color")]
        text_color: String,
    },
    Diamond {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Parallelogram {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Hexagon {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Connector(Connector),
    Group {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        #[serde(default)]
        children: Vec<Element>,
    },
}

fn default_radius() -> f64 {
    50.0
}

fn default_radius_y() -> f64 {
    25.0
}

fn default_font_size() -> f64 {
    DEFAULT_FONT_SIZE
}

fn default_font_family() -> String {
    DEFAULT_FONT_FAMILY.to_owned()
}

fn default_sticky_text_color() -> String {
    DEFAULT_STICKY_TEXT_COLOR.to_owned()
}

fn default_sticky_width() -> f64 {
    200.0
}

fn default_sticky_height() -> f64 {
    150.0
}

fn default_stroke() -> String {
    DEFAULT_STROKE.to_owned()
}

fn default_stroke_width() -> f64 {
    DEFAULT_STROKE_WIDTH
}

impl Shape {
    #[must_use]
    pub fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::Rectangle { x, y, width, height, corner_radius: 0.0 }
    }

    #[must_use]
    pub fn circle(x: f64, y: f64, radius: f64) -> Self {
        Self::Circle { x, y, radius }
    }

    #[must_use]
    pub fn ellipse(x: f64, y: f64, radius_x: f64, radius_y: f64) -> Self {
        Self::Ellipse { x, y, radius_x, radius_y }
    }

    #[must_use]
    pub fn line(from: Point, to: Point) -> Self {
        Self::Line { points: vec![from.x, from.y, to.x, to.y] }
    }

    #[must_use]
    pub fn text(x: f64, y: f64, text: &str, font_size: f64) -> Self {
        Self::Text { x, y, text: text.to_owned(), font_size, font_family: default_font_family() }
    }

    #[must_use]
    pub fn sticky_note(x: f64, y: f64, text: &str) -> Self {
        Self::StickyNote {
            x,
            y,
            width: default_sticky_width(),
            height: default_sticky_height(),
            text: text.to_owned(),
            font_size: DEFAULT_FONT_SIZE,
            font_family: default_font_family(),
            text_color: default_sticky_text_color(),
        }
    }

    /// The payload-free variant tag.
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Rectangle { .. } => ElementKind::Rectangle,
            Self::Circle { .. } => ElementKind::Circle,
            Self::Ellipse { .. } => ElementKind::Ellipse,
            Self::Line { .. } => ElementKind::Line,
            Self::Path { .. } => ElementKind::Path,
            Self::Text { .. } => ElementKind::Text,
            Self::StickyNote { .. } => ElementKind::StickyNote,
            Self::Diamond { .. } => ElementKind::Diamond,
            Self::Parallelogram { .. } => ElementKind::Parallelogram,
            Self::Hexagon { .. } => ElementKind::Hexagon,
            Self::Connector(_) => ElementKind::Connector,
            Self::Group { .. } => ElementKind::Group,
        }
    }

    /// Shift every coordinate of this shape by `(dx, dy)`.
    ///
    /// Group children are group-local and therefore untouched.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        match self {
            Self::Rectangle { x, y, .. }
            | Self::Circle { x, y, .. }
            | Self::Ellipse { x, y, .. }
            | Self::Text { x, y, .. }
            | Self::StickyNote { x, y, .. }
            | Self::Diamond { x, y, .. }
            | Self::Parallelogram { x, y, .. }
            | Self::Hexagon { x, y, .. }
            | Self::Group { x, y, .. } => {
                *x += dx;
                *y += dy;
            }
            Self::Line { points } | Self::Path { points } => {
                for pair in points.chunks_exact_mut(2) {
                    pair[0] += dx;
                    pair[1] += dy;
                }
            }
            Self::Connector(c) => {
                c.start = c.start.offset(dx, dy);
                c.end = c.end.offset(dx, dy);
            }
        }
    }
}

/// A drawable unit as stored in the document and in history snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Immutable identity. Legacy records without one get a fresh id on load.
    #[serde(default = "Uuid::new_v4")]
    pub id: ElementId,
    #[serde(flatten)]
    pub shape: Shape,
    #[serde(default = "default_stroke")]
    pub stroke: String,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    /// `None` means transparent. Older sticky notes store it as `color`.
    #[serde(default, alias = "color")]
    pub fill: Option<String>,
    /// Clockwise rotation in degrees. Not reflected in bounds.
    #[serde(default)]
    pub rotation: f64,
    /// Creation time, milliseconds since the Unix epoch. Also read from an
    /// RFC 3339 string.
    #[serde(default, deserialize_with = "timestamp_ms")]
    pub created_at: i64,
    /// Last modification time, milliseconds since the Unix epoch.
    #[serde(default, deserialize_with = "timestamp_ms")]
    pub updated_at: i64,
}

impl Element {
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        self.shape.kind()
    }

    #[must_use]
    pub fn as_connector(&self) -> Option<&Connector> {
        match &self.shape {
            Shape::Connector(c) => Some(c),
            _ => None,
        }
    }

    /// Group children (group-local coordinates); empty for non-groups.
    #[must_use]
    pub fn children(&self) -> &[Element] {
        match &self.shape {
            Shape::Group { children, .. } => children,
            _ => &[],
        }
    }

    /// Merge a sparse patch into this element.
    ///
    /// Fields that don't apply to the variant are ignored. Extents below the
    /// variant's floor are clamped up, non-finite numbers are dropped, and
    /// point sequences with an odd length are rejected. Bound connector
    /// endpoints ignore `start`/`end` because they are derived.
    pub(crate) fn apply_patch(&mut self, patch: &ElementPatch) {
        let (floor_w, floor_h) = self.kind().size_floor();

        match &mut self.shape {
            Shape::Rectangle { x, y, width, height, corner_radius } => {
                set_coord(x, patch.x);
                set_coord(y, patch.y);
                set_extent(width, patch.width, floor_w);
                set_extent(height, patch.height, floor_h);
                set_extent(corner_radius, patch.corner_radius, 0.0);
            }
            Shape::Diamond { x, y, width, height }
            | Shape::Parallelogram { x, y, width, height }
            | Shape::Hexagon { x, y, width, height } => {
                set_coord(x, patch.x);
                set_coord(y, patch.y);
                set_extent(width, patch.width, floor_w);
                set_extent(height, patch.height, floor_h);
            }
            Shape::Circle { x, y, radius } => {
                set_coord(x, patch.x);
                set_coord(y, patch.y);
                set_extent(radius, patch.radius, floor_w);
            }
            Shape::Ellipse { x, y, radius_x, radius_y } => {
                set_coord(x, patch.x);
                set_coord(y, patch.y);
                set_extent(radius_x, patch.radius_x, floor_w);
                set_extent(radius_y, patch.radius_y, floor_h);
            }
            Shape::Line { points } | Shape::Path { points } => {
                if let Some(next) = &patch.points {
                    if next.len() % 2 == 0 && next.iter().all(|v| v.is_finite()) {
                        points.clone_from(next);
                    } else {
                        warn!(id = %self.id, len = next.len(), "ignoring malformed point sequence");
                    }
                }
            }
            Shape::Text { x, y, text, font_size, font_family } => {
                set_coord(x, patch.x);
                set_coord(y, patch.y);
                set_extent(font_size, patch.font_size, MIN_FONT_SIZE);
                set_string(text, patch.text.as_ref());
                set_string(font_family, patch.font_family.as_ref());
            }
            Shape::StickyNote { x, y, width, height, text, font_size, font_family, text_color } => {
                set_coord(x, patch.x);
                set_coord(y, patch.y);
                set_extent(width, patch.width, floor_w);
                set_extent(height, patch.height, floor_h);
                set_extent(font_size, patch.font_size, MIN_FONT_SIZE);
                set_string(text, patch.text.as_ref());
                set_string(font_family, patch.font_family.as_ref());
                set_string(text_color, patch.text_color.as_ref());
            }
            Shape::Connector(c) => {
                if c.source.is_none() {
                    if let Some(start) = patch.start.filter(|p| p.x.is_finite() && p.y.is_finite()) {
                        c.start = start;
                    }
                }
                if c.target.is_none() {
                    if let Some(end) = patch.end.filter(|p| p.x.is_finite() && p.y.is_finite()) {
                        c.end = end;
                    }
                }
            }
            Shape::Group { x, y, width, height, children } => {
                set_coord(x, patch.x);
                set_coord(y, patch.y);
                set_extent(width, patch.width, floor_w);
                set_extent(height, patch.height, floor_h);
                if let Some(next) = &patch.children {
                    children.clone_from(next);
                }
            }
        }

        set_string(&mut self.stroke, patch.stroke.as_ref());
        set_extent(&mut self.stroke_width, patch.stroke_width, 0.0);
        set_coord(&mut self.rotation, patch.rotation);
        if let Some(fill) = &patch.fill {
            self.fill = normalize_fill(fill.as_deref());
        }
    }
}

fn set_coord(target: &mut f64, value: Option<f64>) {
    match value {
        Some(v) if v.is_finite() => *target = v,
        Some(v) => warn!(value = v, "ignoring non-finite coordinate"),
        None => {}
    }
}

fn set_extent(target: &mut f64, value: Option<f64>, floor: f64) {
    match value {
        Some(v) if v.is_finite() => *target = v.max(floor),
        Some(v) => warn!(value = v, "ignoring non-finite extent"),
        None => {}
    }
}

fn set_string(target: &mut String, value: Option<&String>) {
    if let Some(v) = value {
        target.clone_from(v);
    }
}

/// Map the empty string and `"transparent"` to no fill.
#[must_use]
pub fn normalize_fill(fill: Option<&str>) -> Option<String> {
    match fill {
        None | Some("" | "transparent") => None,
        Some(color) => Some(color.to_owned()),
    }
}

/// Everything needed to create an element except identity and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementDraft {
    pub shape: Shape,
    pub stroke: String,
    pub stroke_width: f64,
    pub fill: Option<String>,
    pub rotation: f64,
}

impl ElementDraft {
    /// A draft with default style: black 3-unit stroke, transparent fill.
    #[must_use]
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            stroke: default_stroke(),
            stroke_width: DEFAULT_STROKE_WIDTH,
            fill: None,
            rotation: 0.0,
        }
    }

    #[must_use]
    pub fn with_stroke(mut self, stroke: &str, width: f64) -> Self {
        stroke.clone_into(&mut self.stroke);
        self.stroke_width = width.max(0.0);
        self
    }

    #[must_use]
    pub fn with_fill(mut self, fill: &str) -> Self {
        self.fill = normalize_fill(Some(fill));
        self
    }

    /// Stamp identity and timestamps onto the draft.
    #[must_use]
    pub fn into_element(self, id: ElementId, now_ms: i64) -> Element {
        Element {
            id,
            shape: self.shape,
            stroke: self.stroke,
            stroke_width: self.stroke_width,
            fill: self.fill,
            rotation: self.rotation,
            created_at: now_ms,
            updated_at: now_ms,
        }
    }
}

/// Sparse update for an element. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    /// `Some(None)` clears the fill.
    #[serde(default, deserialize_with = "present_or_null", skip_serializing_if = "Option::is_none")]
    pub fill: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Element>>,
}

/// Distinguish an explicit `null` (`Some(None)`) from an absent key (`None`).
fn present_or_null<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

/// Read a timestamp as epoch milliseconds. Accepts an integer, a float, a
/// string of digits, or an RFC 3339 string such as
/// `"2024-01-01T00:00:00.000Z"`. `null` reads as 0.
#[allow(clippy::cast_possible_truncation)]
fn timestamp_ms<'de, D>(de: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error as _;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Stamp {
        Millis(i64),
        Fractional(f64),
        Text(String),
    }

    match Option::<Stamp>::deserialize(de)? {
        None => Ok(0),
        Some(Stamp::Millis(ms)) => Ok(ms),
        Some(Stamp::Fractional(ms)) => Ok(ms.round() as i64),
        Some(Stamp::Text(text)) => {
            if let Ok(ms) = text.trim().parse::<i64>() {
                return Ok(ms);
            }
            let at = OffsetDateTime::parse(text.trim(), &Rfc3339).map_err(D::Error::custom)?;
            i64::try_from(at.unix_timestamp_nanos() / 1_000_000).map_err(D::Error::custom)
        }
    }
}

impl ElementPatch {
    /// A patch that only moves the element's `x`/`y`.
    #[must_use]
    pub fn position(x: f64, y: f64) -> Self {
        Self { x: Some(x), y: Some(y), ..Default::default() }
    }

    /// True when no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overlay `other` on top of `self`; fields set in `other` win.
    #[must_use]
    pub fn merged(self, other: ElementPatch) -> Self {
        Self {
            x: other.x.or(self.x),
            y: other.y.or(self.y),
            width: other.width.or(self.width),
            height: other.height.or(self.height),
            radius: other.radius.or(self.radius),
            radius_x: other.radius_x.or(self.radius_x),
            radius_y: other.radius_y.or(self.radius_y),
            corner_radius: other.corner_radius.or(self.corner_radius),
            rotation: other.rotation.or(self.rotation),
            points: other.points.or(self.points),
            text: other.text.or(self.text),
            font_size: other.font_size.or(self.font_size),
            font_family: other.font_family.or(self.font_family),
            text_color: other.text_color.or(self.text_color),
            stroke: other.stroke.or(self.stroke),
            stroke_width: other.stroke_width.or(self.stroke_width),
            fill: other.fill.or(self.fill),
            start: other.start.or(self.start),
            end: other.end.or(self.end),
            children: other.children.or(self.children),
        }
    }
}
