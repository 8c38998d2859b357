//! Input model: tools, modifier keys, mouse buttons, and the gesture state machine.
//!
//! This module defines the types consumed by the input engine. `Tool` and
//! `Modifiers` capture the user's intent at the time of a pointer event.
//! `InputState` is the active gesture being tracked between pointer-down and
//! pointer-up, carrying all context needed to compute incremental deltas and
//! emit final document mutations on release.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::Serialize;

use crate::element::{Binding, DEFAULT_STROKE, DEFAULT_STROKE_WIDTH, ElementId};
use crate::geometry::Point;
use crate::transform::Transformer;

/// Preset shapes from the flowchart palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlowchartPreset {
    /// Rectangle, 120×60.
    Process,
    /// Diamond, 100×100.
    Decision,
    /// Rounded rectangle, 120×60, corner radius 30.
    Terminal,
    /// Parallelogram, 120×60.
    Data,
}

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tool {
    /// Pointer / selection tool (default).
    #[default]
    Select,
    /// Freehand stroke.
    Pen,
    Rectangle,
    Circle,
    Ellipse,
    Line,
    /// Create a text element on click.
    Text,
    /// Create a sticky note on click.
    StickyNote,
    Diamond,
    Parallelogram,
    Hexagon,
    /// Draw a connector, binding to anchors under the press and release points.
    Connector,
    /// Delete the element under the pointer.
    Eraser,
    /// Stamp a flowchart preset on click.
    Flowchart(FlowchartPreset),
}

impl Tool {
    /// Parse a host-side tool name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "select" => Self::Select,
            "pen" => Self::Pen,
            "rectangle" | "rect" => Self::Rectangle,
            "circle" => Self::Circle,
            "ellipse" => Self::Ellipse,
            "line" => Self::Line,
            "text" => Self::Text,
            "sticky" | "sticky-note" => Self::StickyNote,
            "diamond" => Self::Diamond,
            "parallelogram" => Self::Parallelogram,
            "hexagon" => Self::Hexagon,
            "connector" => Self::Connector,
            "eraser" => Self::Eraser,
            "process" => Self::Flowchart(FlowchartPreset::Process),
            "decision" => Self::Flowchart(FlowchartPreset::Decision),
            "start-end" | "terminal" => Self::Flowchart(FlowchartPreset::Terminal),
            "data" => Self::Flowchart(FlowchartPreset::Data),
            _ => return None,
        })
    }

    /// Whether this tool draws a shape by dragging out its extent.
    #[must_use]
    pub fn is_drag_shape(self) -> bool {
        matches!(
            self,
            Self::Rectangle
                | Self::Circle
                | Self::Ellipse
                | Self::Line
                | Self::Diamond
                | Self::Parallelogram
                | Self::Hexagon
        )
    }

    /// Whether this tool creates an element on a single click and then
    /// hands control back to [`Tool::Select`].
    #[must_use]
    pub fn creates_on_click(self) -> bool {
        matches!(self, Self::Text | Self::StickyNote | Self::Flowchart(_))
    }
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Cmd on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` index.
    #[must_use]
    pub fn from_index(index: i16) -> Self {
        match index {
            1 => Self::Middle,
            2 => Self::Secondary,
            _ => Self::Primary,
        }
    }
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the browser (e.g. `"Delete"`, `"Escape"`, `"z"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    /// Case-insensitive comparison against a single-character or named key.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.0.eq_ignore_ascii_case(name)
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// One active touch contact, in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Touch {
    pub id: i32,
    pub screen: Point,
}

/// How a multi-touch interaction is being interpreted. Fixed at touch start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchMode {
    /// One contact: routed through the pointer handlers.
    Single { id: i32 },
    /// Two or more contacts: pinch zoom and two-finger pan.
    Pinch,
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone)]
pub struct UiState {
    /// Currently active drawing tool.
    pub tool: Tool,
    /// Stroke color for new elements.
    pub stroke: String,
    /// Stroke width for new elements.
    pub stroke_width: f64,
    /// Fill for new elements; `None` is transparent.
    pub fill: Option<String>,
    /// Element whose text the host is currently editing.
    pub editing: Option<ElementId>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            tool: Tool::default(),
            stroke: DEFAULT_STROKE.to_owned(),
            stroke_width: DEFAULT_STROKE_WIDTH,
            fill: None,
            editing: None,
        }
    }
}

/// Internal state for the input state machine.
///
/// Each active variant carries gesture context needed to compute deltas and
/// emit final actions on pointer-up.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is panning the canvas.
    Panning {
        /// Screen-space position of the previous pointer event, used to compute pan delta.
        last_screen: Point,
    },
    /// Two-finger pinch; zoom follows the contact distance ratio.
    Pinching {
        /// Distance between the two contacts at the previous event.
        last_distance: f64,
        /// Midpoint of the two contacts at the previous event.
        last_center: Point,
    },
    /// The user is moving existing elements across the canvas: the pressed
    /// element, or the whole selection when it was pressed inside one.
    DraggingElements {
        /// Ids being dragged; bound connectors are never included.
        ids: Vec<ElementId>,
        /// World-space position of the pointer at the previous event.
        last_world: Point,
    },
    /// The user is resizing an element by dragging one of its eight handles.
    Resizing(Transformer),
    /// The user is rotating an element by dragging the rotate handle.
    Rotating {
        /// Id of the element being rotated.
        id: ElementId,
        /// World-space center of the element; the rotation pivot.
        center: Point,
    },
    /// Dragging out a new shape; nothing is created until release.
    DrawingShape {
        tool: Tool,
        /// World-space corner where the drag started.
        start: Point,
        /// World-space pointer position now.
        current: Point,
    },
    /// Freehand stroke; flat `[x0, y0, x1, y1, ...]` in world space.
    DrawingPath { points: Vec<f64> },
    /// Dragging out a connector from an optional source anchor.
    DrawingConnector {
        source: Option<Binding>,
        start: Point,
        current: Point,
    },
    /// Rubber-band selection rectangle.
    Marquee {
        start: Point,
        current: Point,
        /// Shift was held: add to the existing selection.
        additive: bool,
    },
}

impl InputState {
    /// Whether a gesture is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}
