//! Interaction engine: pointer, touch and keyboard input in, document
//! mutations and host actions out.
//!
//! DESIGN
//! ======
//! `EngineCore` owns the working document, the camera, the gesture state
//! and the snapshot history. Input handlers mutate the store immediately
//! (so the renderer always paints live state) and commit a history entry
//! when a gesture ends. A gesture that is aborted (pointer leaves the
//! canvas, `Escape`, tool switch) restores the working copy from the
//! current history entry instead, so nothing it did is ever observable.
//!
//! Every handler returns a list of [`Action`]s for the host to act on:
//! repaint, change cursor, open a text editor, persist.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use serde::Serialize;
use tracing::{debug, warn};

use crate::autosave::{Autosave, SaveTicket};
use crate::camera::Camera;
use crate::clock::now_ms;
use crate::connector;
use crate::consts::{
    CARD_COLUMNS, CARD_HEIGHT, CARD_ORIGIN, CARD_PITCH_X, CARD_PITCH_Y, CARD_WIDTH, DEFAULT_AUTOSAVE_DEBOUNCE_MS,
    DEFAULT_HISTORY_DEPTH, DEFAULT_NOTE_TEXT, DEFAULT_TEXT, DRAW_THRESHOLD, FLOWCHART_STROKE_WIDTH,
    PROCESS_CORNER_RADIUS, TERMINAL_CORNER_RADIUS,
};
use crate::doc::DocStore;
use crate::document::{Document, SavePayload, decode_elements};
use crate::element::{
    Anchor, Binding, Connector, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, DEFAULT_STICKY_FILL,
    DEFAULT_STICKY_TEXT_COLOR, Element, ElementDraft, ElementId, ElementPatch, Shape,
};
use crate::error::BoardError;
use crate::geometry::{Bounds, Point, bounds_of};
use crate::history::History;
use crate::hit::{self, Hit, HitPart, ResizeAnchor};
use crate::input::{
    Button, FlowchartPreset, InputState, Key, Modifiers, Tool, Touch, TouchMode, UiState, WheelDelta,
};
use crate::transform::{self, Transformer};

/// Tunables the host passes in; the core never reads the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Retained history snapshots, including the initial one.
    pub history_depth: usize,
    /// Quiet period after the last commit before an autosave is due.
    pub autosave_debounce_ms: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { history_depth: DEFAULT_HISTORY_DEPTH, autosave_debounce_ms: DEFAULT_AUTOSAVE_DEBOUNCE_MS }
    }
}

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", content = "payload", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum Action {
    ElementCreated(Element),
    ElementUpdated { id: ElementId },
    ElementsDeleted { ids: Vec<ElementId> },
    /// Bound connectors whose endpoints were re-derived or detached.
    ConnectorsRerouted { ids: Vec<ElementId> },
    SelectionChanged { ids: Vec<ElementId> },
    HistoryChanged { can_undo: bool, can_redo: bool },
    /// The host should open a text editor for the element.
    EditTextRequested { id: ElementId, text: String },
    ToolChanged(Tool),
    /// The user asked for an immediate save.
    SaveRequested,
    SetCursor(String),
    RenderNeeded,
}

/// Core engine state. Holds all logic that does not depend on a browser canvas.
#[derive(Debug, Clone)]
pub struct EngineCore {
    pub doc: DocStore,
    pub camera: Camera,
    pub ui: UiState,
    pub input: InputState,
    pub history: History,
    pub autosave: Autosave,
    pub config: EngineConfig,
    committed_revision: u64,
    touches: Vec<Touch>,
    touch_mode: Option<TouchMode>,
    cursor: &'static str,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::with_config(EngineConfig::default())
    }
}

fn reroute_action(doc: &DocStore, out: &mut Vec<Action>) {
    let r = doc.last_reroute();
    if r.is_empty() {
        return;
    }
    let ids = r.moved.iter().chain(&r.detached).copied().collect();
    out.push(Action::ConnectorsRerouted { ids });
}

fn selection_action(doc: &DocStore) -> Action {
    Action::SelectionChanged { ids: doc.selection().ids().to_vec() }
}

fn cursor_for(part: Option<HitPart>, tool: Tool) -> &'static str {
    match part {
        Some(HitPart::Body) => "move",
        Some(HitPart::RotateHandle) => "grab",
        Some(HitPart::ResizeHandle(ResizeAnchor::N | ResizeAnchor::S)) => "ns-resize",
        Some(HitPart::ResizeHandle(ResizeAnchor::E | ResizeAnchor::W)) => "ew-resize",
        Some(HitPart::ResizeHandle(ResizeAnchor::Ne | ResizeAnchor::Sw)) => "nesw-resize",
        Some(HitPart::ResizeHandle(ResizeAnchor::Nw | ResizeAnchor::Se)) => "nwse-resize",
        Some(HitPart::Anchor(_)) => "crosshair",
        None if tool == Tool::Select => "default",
        None => "crosshair",
    }
}

/// Shape produced by dragging `tool` from `start` to `end`, if the drag is
/// big enough to count.
#[must_use]
pub fn shape_from_drag(tool: Tool, start: Point, end: Point) -> Option<Shape> {
    let b = Bounds::from_corners(start, end);
    let boxed = b.width > DRAW_THRESHOLD && b.height > DRAW_THRESHOLD;
    match tool {
        Tool::Rectangle if boxed => Some(Shape::rectangle(b.x, b.y, b.width, b.height)),
        Tool::Diamond if boxed => Some(Shape::Diamond { x: b.x, y: b.y, width: b.width, height: b.height }),
        Tool::Parallelogram if boxed => {
            Some(Shape::Parallelogram { x: b.x, y: b.y, width: b.width, height: b.height })
        }
        Tool::Hexagon if boxed => Some(Shape::Hexagon { x: b.x, y: b.y, width: b.width, height: b.height }),
        Tool::Ellipse if boxed => {
            let c = b.center();
            Some(Shape::ellipse(c.x, c.y, b.width / 2.0, b.height / 2.0))
        }
        Tool::Circle => {
            let radius = start.distance(end);
            (radius > DRAW_THRESHOLD).then(|| Shape::circle(start.x, start.y, radius))
        }
        Tool::Line => (start.distance(end) > DRAW_THRESHOLD).then(|| Shape::line(start, end)),
        _ => None,
    }
}

fn flowchart_shape(preset: FlowchartPreset, at: Point) -> Shape {
    match preset {
        FlowchartPreset::Process => Shape::Rectangle {
            x: at.x,
            y: at.y,
            width: 120.0,
            height: 60.0,
            corner_radius: PROCESS_CORNER_RADIUS,
        },
        FlowchartPreset::Decision => Shape::Diamond { x: at.x, y: at.y, width: 100.0, height: 100.0 },
        FlowchartPreset::Terminal => Shape::Rectangle {
            x: at.x,
            y: at.y,
            width: 120.0,
            height: 60.0,
            corner_radius: TERMINAL_CORNER_RADIUS,
        },
        FlowchartPreset::Data => Shape::Parallelogram { x: at.x, y: at.y, width: 120.0, height: 60.0 },
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        let doc = DocStore::new();
        let history = History::new(doc.elements(), config.history_depth);
        Self {
            committed_revision: doc.revision(),
            doc,
            camera: Camera::default(),
            ui: UiState::default(),
            input: InputState::default(),
            history,
            autosave: Autosave::new(config.autosave_debounce_ms),
            config,
            touches: Vec::new(),
            touch_mode: None,
            cursor: "default",
        }
    }

    // --- History ---

    fn history_action(&self) -> Action {
        Action::HistoryChanged { can_undo: self.history.can_undo(), can_redo: self.history.can_redo() }
    }

    /// Snapshot the working copy if it changed since the last commit.
    fn commit(&mut self, out: &mut Vec<Action>) {
        if self.doc.revision() == self.committed_revision {
            return;
        }
        self.history.commit(self.doc.elements());
        self.committed_revision = self.doc.revision();
        self.autosave.touch(now_ms());
        debug!(index = self.history.index(), "history committed");
        out.push(self.history_action());
        out.push(Action::RenderNeeded);
    }

    /// Commit whatever the host changed through [`EngineCore::doc`] directly.
    pub fn commit_pending(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        self.commit(&mut actions);
        actions
    }

    fn restore(&mut self, snapshot: Vec<Element>) -> Vec<Action> {
        self.doc.replace_all(snapshot);
        self.committed_revision = self.doc.revision();
        self.autosave.touch(now_ms());
        vec![selection_action(&self.doc), self.history_action(), Action::RenderNeeded]
    }

    /// Step back one history entry. No-op at the oldest entry.
    pub fn undo(&mut self) -> Vec<Action> {
        self.abort_gesture();
        match self.history.undo() {
            Some(snapshot) => self.restore(snapshot),
            None => Vec::new(),
        }
    }

    /// Step forward one history entry. No-op at the newest entry.
    pub fn redo(&mut self) -> Vec<Action> {
        self.abort_gesture();
        match self.history.redo() {
            Some(snapshot) => self.restore(snapshot),
            None => Vec::new(),
        }
    }

    /// Drop the active gesture and roll the working copy back to the last
    /// committed state.
    fn abort_gesture(&mut self) -> bool {
        self.input = InputState::Idle;
        if self.doc.revision() == self.committed_revision {
            return false;
        }
        debug!("gesture aborted; restoring committed state");
        self.doc.replace_all(self.history.current().to_vec());
        self.committed_revision = self.doc.revision();
        true
    }

    // --- Document lifecycle ---

    /// Replace the board with `elements` and start a fresh history.
    pub fn load_elements(&mut self, elements: Vec<Element>) -> Vec<Action> {
        self.input = InputState::Idle;
        self.ui.editing = None;
        self.doc = DocStore::from_elements(elements);
        self.history.reset(self.doc.elements());
        self.committed_revision = self.doc.revision();
        self.autosave.reset();
        vec![selection_action(&self.doc), self.history_action(), Action::RenderNeeded]
    }

    /// Load a persisted document.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Parse`] or [`BoardError::Validation`] if the blob
    /// is corrupt; the current board is left untouched.
    pub fn load_document(&mut self, document: &Document) -> Result<Vec<Action>, BoardError> {
        let elements = document.elements()?;
        debug!(id = %document.id, count = elements.len(), "document loaded");
        Ok(self.load_elements(elements))
    }

    /// Load a raw element blob. Same failure contract as
    /// [`EngineCore::load_document`].
    ///
    /// # Errors
    ///
    /// Returns the decode error; the current board is left untouched.
    pub fn load_json(&mut self, blob: &str) -> Result<Vec<Action>, BoardError> {
        let elements = decode_elements(blob)?;
        Ok(self.load_elements(elements))
    }

    /// Claim the next save and snapshot the board under `name`.
    ///
    /// `Ok(None)` when the board is clean or a save is already in flight.
    /// The ticket must be settled with [`Autosave::finish`].
    ///
    /// # Errors
    ///
    /// Returns the encode error after settling the ticket as failed, so the
    /// debounce re-arms instead of waiting on a save that never went out.
    pub fn claim_save(&mut self, name: &str) -> Result<Option<(SaveTicket, SavePayload)>, BoardError> {
        if self.autosave.in_flight().is_some() {
            return Ok(None);
        }
        let Some(ticket) = self.autosave.begin() else {
            return Ok(None);
        };
        match SavePayload::new(name, self.doc.elements()) {
            Ok(payload) => Ok(Some((ticket, payload))),
            Err(e) => {
                warn!(error = %e, revision = ticket.revision, "board encode failed");
                self.autosave.finish(ticket, false, now_ms());
                Err(e)
            }
        }
    }

    /// Remove everything as one undoable step.
    pub fn clear_board(&mut self) -> Vec<Action> {
        self.abort_gesture();
        let ids: Vec<ElementId> = self.doc.elements().iter().map(|e| e.id).collect();
        if ids.is_empty() {
            return Vec::new();
        }
        self.doc.clear();
        let mut actions = vec![Action::ElementsDeleted { ids }, selection_action(&self.doc)];
        self.commit(&mut actions);
        actions
    }

    // --- Store mutations for the host ---

    fn styled(&self, shape: Shape) -> ElementDraft {
        let mut draft = ElementDraft::new(shape).with_stroke(&self.ui.stroke, self.ui.stroke_width);
        draft.fill.clone_from(&self.ui.fill);
        draft
    }

    /// Add an element and commit.
    pub fn add_element(&mut self, draft: ElementDraft) -> Vec<Action> {
        let element = self.doc.add_element(draft);
        let mut actions = vec![Action::ElementCreated(element)];
        reroute_action(&self.doc, &mut actions);
        self.commit(&mut actions);
        actions
    }

    /// Split `text` on `separator` and add one sticky note per non-blank
    /// piece, laid out row by row in a three-column grid. All cards land in
    /// a single history step. An empty separator keeps the text whole.
    pub fn create_cards(&mut self, text: &str, separator: &str, fill: &str, text_color: &str) -> Vec<Action> {
        let phrases: Vec<&str> = if separator.is_empty() {
            vec![text.trim()]
        } else {
            text.split(separator).map(str::trim).collect()
        };
        let text_color = if text_color.trim().is_empty() { DEFAULT_STICKY_TEXT_COLOR } else { text_color };

        let mut actions = Vec::new();
        let (mut col, mut row) = (0.0, 0.0);
        for phrase in phrases.into_iter().filter(|p| !p.is_empty()) {
            let shape = Shape::StickyNote {
                x: CARD_ORIGIN + col * CARD_PITCH_X,
                y: CARD_ORIGIN + row * CARD_PITCH_Y,
                width: CARD_WIDTH,
                height: CARD_HEIGHT,
                text: phrase.to_owned(),
                font_size: DEFAULT_FONT_SIZE,
                font_family: DEFAULT_FONT_FAMILY.to_owned(),
                text_color: text_color.to_owned(),
            };
            let element = self.doc.add_element(ElementDraft::new(shape).with_fill(fill));
            actions.push(Action::ElementCreated(element));

            col += 1.0;
            if col >= CARD_COLUMNS {
                col = 0.0;
                row += 1.0;
            }
        }
        if actions.is_empty() {
            return actions;
        }
        debug!(count = actions.len(), "cards created");
        self.commit(&mut actions);
        actions
    }

    /// Patch an element and commit. Unknown ids are a no-op.
    pub fn update_element(&mut self, id: &ElementId, patch: &ElementPatch) -> Vec<Action> {
        if !self.doc.update_element(id, patch) {
            return Vec::new();
        }
        let mut actions = vec![Action::ElementUpdated { id: *id }];
        reroute_action(&self.doc, &mut actions);
        self.commit(&mut actions);
        actions
    }

    /// Remove elements and commit.
    pub fn remove_elements(&mut self, ids: &[ElementId]) -> Vec<Action> {
        let removed = self.doc.remove_elements(ids);
        if removed.is_empty() {
            return Vec::new();
        }
        if self.ui.editing.is_some_and(|id| removed.contains(&id)) {
            self.ui.editing = None;
        }
        let mut actions = vec![Action::ElementsDeleted { ids: removed }, selection_action(&self.doc)];
        reroute_action(&self.doc, &mut actions);
        self.commit(&mut actions);
        actions
    }

    /// Delete every selected element.
    pub fn delete_selection(&mut self) -> Vec<Action> {
        let ids = self.doc.selection().ids().to_vec();
        self.remove_elements(&ids)
    }

    /// Group the current selection. Needs two or more groupable elements.
    pub fn group_selection(&mut self) -> Vec<Action> {
        let ids = self.doc.selection().ids().to_vec();
        let Some(group) = self.doc.group(&ids) else {
            return Vec::new();
        };
        let mut actions = vec![Action::ElementCreated(group), selection_action(&self.doc)];
        self.commit(&mut actions);
        actions
    }

    /// Dissolve the primary selection if it is a group.
    pub fn ungroup_selection(&mut self) -> Vec<Action> {
        let Some(id) = self.doc.primary().map(|e| e.id) else {
            return Vec::new();
        };
        if self.doc.ungroup(&id).is_empty() {
            return Vec::new();
        }
        let mut actions = vec![Action::ElementsDeleted { ids: vec![id] }, selection_action(&self.doc)];
        self.commit(&mut actions);
        actions
    }

    /// Commit edited text from the host editor.
    pub fn set_text(&mut self, id: &ElementId, text: &str) -> Vec<Action> {
        self.ui.editing = None;
        let patch = ElementPatch { text: Some(text.to_owned()), ..Default::default() };
        self.update_element(id, &patch)
    }

    /// Select exactly `id`, raising it to the top. Committed like any other
    /// z-order change.
    pub fn select(&mut self, id: &ElementId) -> Vec<Action> {
        if !self.doc.select(id) {
            return Vec::new();
        }
        let mut actions = vec![selection_action(&self.doc)];
        self.commit(&mut actions);
        actions.push(Action::RenderNeeded);
        actions
    }

    pub fn clear_selection(&mut self) -> Vec<Action> {
        if self.doc.selection().is_empty() {
            return Vec::new();
        }
        self.doc.clear_selection();
        vec![selection_action(&self.doc), Action::RenderNeeded]
    }

    // --- Tool ---

    /// Set the active tool, abandoning any gesture in progress.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.abort_gesture() {
            actions.push(Action::RenderNeeded);
        }
        self.ui.tool = tool;
        actions.push(Action::ToolChanged(tool));
        actions
    }

    // --- Pointer input ---

    fn anchor_binding_at(&self, world: Point) -> Option<Binding> {
        if let Some((element, anchor)) = hit::hit_anchor(self.doc.elements(), world, &self.camera) {
            return Some(Binding { element, anchor });
        }
        let target = self.doc.hit_test(world).filter(|e| e.kind().accepts_connectors())?;
        let b = bounds_of(target);
        Anchor::ALL
            .into_iter()
            .min_by(|a, c| {
                let da = connector::anchor_point(b, *a).distance(world);
                let dc = connector::anchor_point(b, *c).distance(world);
                da.total_cmp(&dc)
            })
            .map(|anchor| Binding { element: target.id, anchor })
    }

    fn create_on_click(&mut self, tool: Tool, world: Point) -> Vec<Action> {
        let over_element = self.doc.hit_test(world).is_some();
        let draft = match tool {
            Tool::Text if !over_element => {
                self.styled(Shape::text(world.x, world.y, DEFAULT_TEXT, DEFAULT_FONT_SIZE))
            }
            Tool::StickyNote => self
                .styled(Shape::sticky_note(world.x, world.y, DEFAULT_NOTE_TEXT))
                .with_fill(DEFAULT_STICKY_FILL),
            Tool::Flowchart(preset) if !over_element => {
                ElementDraft::new(flowchart_shape(preset, world)).with_stroke(&self.ui.stroke, FLOWCHART_STROKE_WIDTH)
            }
            _ => return Vec::new(),
        };
        let mut actions = self.add_element(draft);
        self.ui.tool = Tool::Select;
        actions.push(Action::ToolChanged(Tool::Select));
        actions
    }

    fn select_down(&mut self, world: Point, screen: Point, modifiers: Modifiers) -> Vec<Action> {
        let hit = hit::hit_test_full(self.doc.elements(), world, &self.camera, self.doc.primary());
        match hit {
            Some(Hit { element_id, part: HitPart::ResizeHandle(handle) }) => {
                if let Some(element) = self.doc.get(&element_id) {
                    self.input = InputState::Resizing(Transformer::begin(element_id, handle, bounds_of(element)));
                }
                Vec::new()
            }
            Some(Hit { element_id, part: HitPart::RotateHandle }) => {
                if let Some(element) = self.doc.get(&element_id) {
                    self.input = InputState::Rotating { id: element_id, center: bounds_of(element).center() };
                }
                Vec::new()
            }
            Some(Hit { element_id, part: HitPart::Body }) => {
                if modifiers.shift {
                    self.doc.toggle_selection(&element_id);
                    return vec![selection_action(&self.doc), Action::RenderNeeded];
                }
                let in_group = self.doc.selection().len() > 1 && self.doc.selection().contains(&element_id);
                if !in_group {
                    self.doc.select(&element_id);
                }
                let ids: Vec<ElementId> = self
                    .doc
                    .selection()
                    .ids()
                    .iter()
                    .filter(|id| self.doc.get(id).is_some_and(connector::can_drag))
                    .copied()
                    .collect();
                if !ids.is_empty() {
                    self.input = InputState::DraggingElements { ids, last_world: world };
                }
                vec![selection_action(&self.doc), Action::RenderNeeded]
            }
            Some(Hit { part: HitPart::Anchor(_), .. }) | None => {
                if modifiers.shift {
                    self.input = InputState::Marquee { start: world, current: world, additive: true };
                    return Vec::new();
                }
                let mut actions = self.clear_selection();
                self.input = InputState::Panning { last_screen: screen };
                actions.push(Action::SetCursor("grabbing".into()));
                actions
            }
        }
    }

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        if self.input.is_active() {
            return Vec::new();
        }
        let world = self.camera.screen_to_world(screen_pt);
        match button {
            Button::Middle => {
                self.input = InputState::Panning { last_screen: screen_pt };
                return vec![Action::SetCursor("grabbing".into())];
            }
            Button::Secondary => return Vec::new(),
            Button::Primary => {}
        }

        match self.ui.tool {
            Tool::Select => self.select_down(world, screen_pt, modifiers),
            Tool::Pen => {
                self.input = InputState::DrawingPath { points: vec![world.x, world.y] };
                Vec::new()
            }
            Tool::Connector => {
                let source = self.anchor_binding_at(world);
                let start = source.map_or(world, |b| {
                    connector::locate_bounds(self.doc.elements(), &b.element)
                        .map_or(world, |bounds| connector::anchor_point(bounds, b.anchor))
                });
                self.input = InputState::DrawingConnector { source, start, current: world };
                Vec::new()
            }
            Tool::Eraser => match self.doc.hit_test(world).map(|e| e.id) {
                Some(id) => self.remove_elements(&[id]),
                None => Vec::new(),
            },
            tool if tool.creates_on_click() => self.create_on_click(tool, world),
            tool => {
                self.input = InputState::DrawingShape { tool, start: world, current: world };
                Vec::new()
            }
        }
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        let world = self.camera.screen_to_world(screen_pt);
        match &mut self.input {
            InputState::Idle => {
                let part = if self.ui.tool == Tool::Select {
                    hit::hit_test_full(self.doc.elements(), world, &self.camera, self.doc.primary()).map(|h| h.part)
                } else {
                    None
                };
                let cursor = cursor_for(part, self.ui.tool);
                if cursor == self.cursor {
                    return Vec::new();
                }
                self.cursor = cursor;
                vec![Action::SetCursor(cursor.into())]
            }
            InputState::Panning { last_screen } => {
                self.camera.pan_by(screen_pt.x - last_screen.x, screen_pt.y - last_screen.y);
                *last_screen = screen_pt;
                vec![Action::RenderNeeded]
            }
            InputState::Pinching { .. } => Vec::new(),
            InputState::DraggingElements { ids, last_world } => {
                let (dx, dy) = (world.x - last_world.x, world.y - last_world.y);
                *last_world = world;
                let ids = ids.clone();
                let mut actions = Vec::with_capacity(ids.len() + 1);
                for id in ids {
                    let Some(patch) = self.doc.get(&id).map(|e| transform::translate_patch(e, dx, dy)) else {
                        continue;
                    };
                    self.doc.update_element(&id, &patch);
                    actions.push(Action::ElementUpdated { id });
                    reroute_action(&self.doc, &mut actions);
                }
                if actions.is_empty() {
                    return actions;
                }
                actions.push(Action::RenderNeeded);
                actions
            }
            InputState::Resizing(tf) => {
                tf.drag_to(world);
                vec![Action::RenderNeeded]
            }
            InputState::Rotating { id, center } => {
                let id = *id;
                let rotation = transform::rotation_from_pointer(*center, world);
                let patch = ElementPatch { rotation: Some(rotation), ..Default::default() };
                self.doc.update_element(&id, &patch);
                vec![Action::ElementUpdated { id }, Action::RenderNeeded]
            }
            InputState::DrawingShape { current, .. }
            | InputState::DrawingConnector { current, .. }
            | InputState::Marquee { current, .. } => {
                *current = world;
                vec![Action::RenderNeeded]
            }
            InputState::DrawingPath { points } => {
                points.extend([world.x, world.y]);
                vec![Action::RenderNeeded]
            }
        }
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, _button: Button, _modifiers: Modifiers) -> Vec<Action> {
        let world = self.camera.screen_to_world(screen_pt);
        let mut actions = Vec::new();

        match std::mem::take(&mut self.input) {
            InputState::Idle | InputState::Pinching { .. } | InputState::Rotating { .. } => {}
            InputState::Panning { .. } => {
                self.cursor = "default";
                actions.push(Action::SetCursor(self.cursor.into()));
            }
            InputState::DraggingElements { .. } => {}
            InputState::Resizing(mut tf) => {
                let (sx, sy) = tf.finish();
                let patch = self
                    .doc
                    .get(&tf.element_id)
                    .map(|e| transform::resize_patch(e, tf.handle, tf.origin, sx, sy));
                if let Some(patch) = patch {
                    self.doc.update_element(&tf.element_id, &patch);
                    actions.push(Action::ElementUpdated { id: tf.element_id });
                    reroute_action(&self.doc, &mut actions);
                }
            }
            InputState::DrawingShape { tool, start, .. } => {
                if let Some(shape) = shape_from_drag(tool, start, world) {
                    let draft = self.styled(shape);
                    let element = self.doc.add_element(draft);
                    actions.push(Action::ElementCreated(element));
                }
            }
            InputState::DrawingPath { points } => {
                if points.len() > 2 {
                    let draft = self.styled(Shape::Path { points });
                    let element = self.doc.add_element(draft);
                    actions.push(Action::ElementCreated(element));
                }
            }
            InputState::DrawingConnector { source, start, .. } => {
                let target = self.anchor_binding_at(world).filter(|t| source.is_none_or(|s| s.element != t.element));
                if source.is_some() || target.is_some() || start.distance(world) > DRAW_THRESHOLD {
                    let c = connector::connect(self.doc.elements(), source, target, start, world);
                    let mut draft = self.styled(Shape::Connector(c));
                    draft.fill = None;
                    let element = self.doc.add_element(draft);
                    actions.push(Action::ElementCreated(element));
                }
            }
            InputState::Marquee { start, additive, .. } => {
                let rect = Bounds::from_corners(start, world);
                let mut ids = if additive { self.doc.selection().ids().to_vec() } else { Vec::new() };
                ids.extend(hit::elements_in_rect(self.doc.elements(), &rect));
                self.doc.select_many(&ids);
                actions.push(selection_action(&self.doc));
                actions.push(Action::RenderNeeded);
            }
        }

        self.commit(&mut actions);
        actions
    }

    /// The pointer left the canvas: abandon the gesture without committing.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        let was_active = self.input.is_active();
        let restored = self.abort_gesture();
        let mut actions = Vec::new();
        if restored {
            actions.push(selection_action(&self.doc));
        }
        if was_active || restored {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    /// Open the host text editor for a text element or sticky note.
    pub fn on_double_click(&mut self, screen_pt: Point) -> Vec<Action> {
        let world = self.camera.screen_to_world(screen_pt);
        let Some(element) = self.doc.hit_test(world) else {
            return Vec::new();
        };
        let text = match &element.shape {
            Shape::Text { text, .. } | Shape::StickyNote { text, .. } => text.clone(),
            _ => return Vec::new(),
        };
        let id = element.id;
        self.ui.editing = Some(id);
        vec![Action::EditTextRequested { id, text }]
    }

    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, _modifiers: Modifiers) -> Vec<Action> {
        if delta.dy == 0.0 || !delta.dy.is_finite() {
            return Vec::new();
        }
        self.camera.wheel_zoom(screen_pt, delta.dy);
        vec![Action::RenderNeeded]
    }

    // --- Touch input ---

    /// Touch contacts changed to `touches`. The gesture mode is chosen by the
    /// contact count of the first touch and kept until every contact lifts.
    pub fn on_touch_start(&mut self, touches: &[Touch]) -> Vec<Action> {
        self.touches = touches.to_vec();
        if self.touch_mode.is_some() {
            return Vec::new();
        }
        match touches {
            [] => Vec::new(),
            [only] => {
                self.touch_mode = Some(TouchMode::Single { id: only.id });
                self.on_pointer_down(only.screen, Button::Primary, Modifiers::default())
            }
            [a, b, ..] => {
                let mut actions = Vec::new();
                if self.abort_gesture() {
                    actions.push(Action::RenderNeeded);
                }
                self.touch_mode = Some(TouchMode::Pinch);
                self.input = InputState::Pinching {
                    last_distance: a.screen.distance(b.screen),
                    last_center: Point::new((a.screen.x + b.screen.x) / 2.0, (a.screen.y + b.screen.y) / 2.0),
                };
                actions
            }
        }
    }

    pub fn on_touch_move(&mut self, touches: &[Touch]) -> Vec<Action> {
        self.touches = touches.to_vec();
        match self.touch_mode {
            Some(TouchMode::Single { id }) => match touches.iter().find(|t| t.id == id) {
                Some(t) => self.on_pointer_move(t.screen, Modifiers::default()),
                None => Vec::new(),
            },
            Some(TouchMode::Pinch) => {
                let [a, b, ..] = touches else {
                    return Vec::new();
                };
                let InputState::Pinching { last_distance, last_center } = &mut self.input else {
                    return Vec::new();
                };
                let distance = a.screen.distance(b.screen);
                let center = Point::new((a.screen.x + b.screen.x) / 2.0, (a.screen.y + b.screen.y) / 2.0);
                self.camera.pan_by(center.x - last_center.x, center.y - last_center.y);
                if *last_distance > 0.0 && distance > 0.0 {
                    self.camera.zoom_by(center, distance / *last_distance);
                }
                *last_distance = distance;
                *last_center = center;
                vec![Action::RenderNeeded]
            }
            None => Vec::new(),
        }
    }

    /// Contacts lifted; `remaining` are the ones still down.
    pub fn on_touch_end(&mut self, remaining: &[Touch]) -> Vec<Action> {
        let previous = std::mem::replace(&mut self.touches, remaining.to_vec());
        let mut actions = Vec::new();
        match self.touch_mode {
            Some(TouchMode::Single { id }) => {
                if !remaining.iter().any(|t| t.id == id) {
                    if let Some(lifted) = previous.iter().find(|t| t.id == id) {
                        actions = self.on_pointer_up(lifted.screen, Button::Primary, Modifiers::default());
                    }
                }
            }
            Some(TouchMode::Pinch) => {
                if remaining.len() < 2 && matches!(self.input, InputState::Pinching { .. }) {
                    self.input = InputState::Idle;
                }
            }
            None => {}
        }
        if remaining.is_empty() {
            self.touch_mode = None;
        }
        actions
    }

    // --- Keyboard ---

    pub fn on_key_down(&mut self, key: Key, modifiers: Modifiers) -> Vec<Action> {
        if self.ui.editing.is_some() {
            return Vec::new();
        }
        if modifiers.command() {
            return if (key.is("z") && modifiers.shift) || key.is("y") {
                self.redo()
            } else if key.is("z") {
                self.undo()
            } else if key.is("g") && modifiers.shift {
                self.ungroup_selection()
            } else if key.is("g") {
                self.group_selection()
            } else if key.is("a") {
                self.doc.select_all();
                vec![selection_action(&self.doc), Action::RenderNeeded]
            } else if key.is("s") {
                vec![Action::SaveRequested]
            } else {
                Vec::new()
            };
        }
        if key.is("Delete") || key.is("Backspace") {
            return self.delete_selection();
        }
        if key.is("Escape") {
            let restored = self.abort_gesture();
            let mut actions = self.clear_selection();
            if restored && actions.is_empty() {
                actions.push(Action::RenderNeeded);
            }
            return actions;
        }
        Vec::new()
    }

    // --- Queries ---

    /// Currently selected ids.
    #[must_use]
    pub fn selection(&self) -> &[ElementId] {
        self.doc.selection().ids()
    }

    /// The current camera state.
    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    /// Look up an element by id.
    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.doc.get(id)
    }

    /// Whether the working copy differs from the last committed state.
    #[must_use]
    pub fn has_uncommitted_changes(&self) -> bool {
        self.doc.revision() != self.committed_revision
    }

    /// Shape the renderer should draw for the gesture in progress.
    #[must_use]
    pub fn preview_shape(&self) -> Option<Shape> {
        match &self.input {
            InputState::DrawingShape { tool, start, current } => shape_from_drag(*tool, *start, *current),
            InputState::DrawingPath { points } => Some(Shape::Path { points: points.clone() }),
            InputState::DrawingConnector { source, start, current } => Some(Shape::Connector(Connector {
                source: *source,
                target: None,
                start: *start,
                end: *current,
            })),
            _ => None,
        }
    }

    /// Marquee or resize preview rectangle, in world space.
    #[must_use]
    pub fn preview_bounds(&self) -> Option<Bounds> {
        match &self.input {
            InputState::Marquee { start, current, .. } => Some(Bounds::from_corners(*start, *current)),
            InputState::Resizing(tf) => Some(tf.preview_bounds()),
            _ => None,
        }
    }
}
