//! Shared numeric constants for the canvas crate.

// ── Size floors ─────────────────────────────────────────────────

/// Smallest width, height or radius any generic shape may be resized to.
pub const MIN_SHAPE_SIZE: f64 = 5.0;

/// Smallest sticky-note width.
pub const MIN_STICKY_WIDTH: f64 = 100.0;

/// Smallest sticky-note height.
pub const MIN_STICKY_HEIGHT: f64 = 80.0;

/// Smallest font size a text element may be scaled to.
pub const MIN_FONT_SIZE: f64 = 8.0;

// ── Geometry ────────────────────────────────────────────────────

/// Average glyph advance as a fraction of the font size, used for text bounds.
pub const TEXT_WIDTH_FACTOR: f64 = 0.6;

/// Padding added on every side of the multi-selection indicator.
pub const SELECTION_MARGIN: f64 = 2.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit slop in pixels for handles and anchors.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

/// Distance from the bounding box edge to the rotate handle, in screen pixels.
pub const ROTATE_HANDLE_OFFSET_PX: f64 = 24.0;

// ── Drawing ─────────────────────────────────────────────────────

/// A drag-drawn shape must exceed this extent (world units) to be created.
pub const DRAW_THRESHOLD: f64 = 5.0;

/// Stroke width of stamped flowchart shapes.
pub const FLOWCHART_STROKE_WIDTH: f64 = 2.0;

/// Corner radius of the flowchart "process" box.
pub const PROCESS_CORNER_RADIUS: f64 = 5.0;

/// Corner radius of the flowchart start/end pill.
pub const TERMINAL_CORNER_RADIUS: f64 = 30.0;

/// Placeholder content for new text elements.
pub const DEFAULT_TEXT: &str = "New text";

/// Placeholder content for new sticky notes.
pub const DEFAULT_NOTE_TEXT: &str = "New note";

// ── Card layout ─────────────────────────────────────────────────

/// World position of the first card.
pub const CARD_ORIGIN: f64 = 100.0;

/// Cards per row.
pub const CARD_COLUMNS: f64 = 3.0;

pub const CARD_WIDTH: f64 = 200.0;

pub const CARD_HEIGHT: f64 = 150.0;

/// Horizontal distance between card origins.
pub const CARD_PITCH_X: f64 = 220.0;

/// Vertical distance between card rows.
pub const CARD_PITCH_Y: f64 = 170.0;

// ── Camera ──────────────────────────────────────────────────────

/// Lowest zoom factor.
pub const ZOOM_MIN: f64 = 0.1;

/// Highest zoom factor.
pub const ZOOM_MAX: f64 = 5.0;

/// Multiplicative zoom-in step per wheel notch.
pub const ZOOM_STEP: f64 = 1.1;

/// Multiplicative zoom-out step per wheel notch.
pub const ZOOM_OUT_STEP: f64 = 0.9;

// ── History / persistence ───────────────────────────────────────

/// Default number of retained history snapshots.
pub const DEFAULT_HISTORY_DEPTH: usize = 50;

/// Default autosave debounce window in milliseconds.
pub const DEFAULT_AUTOSAVE_DEBOUNCE_MS: i64 = 2000;
