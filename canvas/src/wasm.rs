//! Browser-facing shell around [`EngineCore`].
//!
//! Events arrive as plain numbers and strings; every handler returns its
//! [`Action`] list as a JSON array for the host to dispatch. Decoding errors
//! are surfaced as `Error` values on the JS side.

use wasm_bindgen::prelude::*;

use crate::autosave::SaveTicket;
use crate::clock::now_ms;
use crate::document::{decode_elements, encode_elements};
use crate::element::ElementPatch;
use crate::engine::{Action, EngineConfig, EngineCore};
use crate::error::BoardError;
use crate::geometry::Point;
use crate::input::{Button, Key, Modifiers, Tool, Touch, WheelDelta};

const MOD_SHIFT: u8 = 1;
const MOD_CTRL: u8 = 2;
const MOD_ALT: u8 = 4;
const MOD_META: u8 = 8;

fn modifiers(bits: u8) -> Modifiers {
    Modifiers {
        shift: bits & MOD_SHIFT != 0,
        ctrl: bits & MOD_CTRL != 0,
        alt: bits & MOD_ALT != 0,
        meta: bits & MOD_META != 0,
    }
}

/// Flat `[id, x, y, id, x, y, ...]` contact list.
#[allow(clippy::cast_possible_truncation)]
fn touches(flat: &[f64]) -> Vec<Touch> {
    flat.chunks_exact(3)
        .map(|t| Touch { id: t[0] as i32, screen: Point::new(t[1], t[2]) })
        .collect()
}

fn js_error(err: &BoardError) -> JsValue {
    JsValue::from_str(&format!("{}: {err}", err.error_code()))
}

fn emit(actions: &[Action]) -> Result<String, JsValue> {
    serde_json::to_string(actions).map_err(|e| js_error(&BoardError::from(e)))
}

fn parse_id(id: &str) -> Result<uuid::Uuid, JsValue> {
    uuid::Uuid::parse_str(id).map_err(|_| js_error(&BoardError::Validation(format!("bad element id {id}"))))
}

/// Whiteboard engine handle owned by the host page.
#[wasm_bindgen]
pub struct Engine {
    core: EngineCore,
    pending_save: Option<SaveTicket>,
}

#[wasm_bindgen]
impl Engine {
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new(history_depth: usize, autosave_debounce_ms: f64) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        let config = EngineConfig { history_depth, autosave_debounce_ms: autosave_debounce_ms as i64 };
        Self { core: EngineCore::with_config(config), pending_save: None }
    }

    // --- Document ---

    /// Replace the board with a serialized element blob.
    ///
    /// # Errors
    ///
    /// Rejects malformed blobs; the board is left untouched.
    pub fn load(&mut self, blob: &str) -> Result<String, JsValue> {
        let elements = decode_elements(blob).map_err(|e| js_error(&e))?;
        self.pending_save = None;
        emit(&self.core.load_elements(elements))
    }

    /// Serialize the working copy.
    ///
    /// # Errors
    ///
    /// Fails only if serialization fails.
    pub fn export(&self) -> Result<String, JsValue> {
        encode_elements(self.core.doc.elements()).map_err(|e| js_error(&e))
    }

    /// Whether an autosave should start now.
    #[must_use]
    pub fn save_due(&self) -> bool {
        self.pending_save.is_none() && self.core.autosave.due(now_ms())
    }

    /// Claim the next save. Returns the `{name, data}` body to send, or
    /// `undefined` when there is nothing to save or a save is in flight.
    ///
    /// # Errors
    ///
    /// Fails only if serialization fails.
    pub fn begin_save(&mut self, name: &str) -> Result<Option<String>, JsValue> {
        if self.pending_save.is_some() {
            return Ok(None);
        }
        let Some((ticket, payload)) = self.core.claim_save(name).map_err(|e| js_error(&e))? else {
            return Ok(None);
        };
        match serde_json::to_string(&payload) {
            Ok(body) => {
                self.pending_save = Some(ticket);
                Ok(Some(body))
            }
            Err(e) => {
                self.core.autosave.finish(ticket, false, now_ms());
                Err(js_error(&BoardError::from(e)))
            }
        }
    }

    /// Report the outcome of the save claimed by [`Engine::begin_save`].
    pub fn finish_save(&mut self, ok: bool) {
        if let Some(ticket) = self.pending_save.take() {
            self.core.autosave.finish(ticket, ok, now_ms());
        }
    }

    // --- Tools and style ---

    /// # Errors
    ///
    /// Rejects unknown tool names.
    pub fn set_tool(&mut self, name: &str) -> Result<String, JsValue> {
        let tool = Tool::from_name(name)
            .ok_or_else(|| js_error(&BoardError::Validation(format!("unknown tool {name}"))))?;
        emit(&self.core.set_tool(tool))
    }

    /// Style for newly drawn elements. An empty `fill` means transparent.
    pub fn set_style(&mut self, stroke: &str, stroke_width: f64, fill: &str) {
        stroke.clone_into(&mut self.core.ui.stroke);
        self.core.ui.stroke_width = stroke_width;
        self.core.ui.fill = crate::element::normalize_fill(Some(fill));
    }

    /// Restyle the selected elements as one undoable step.
    ///
    /// # Errors
    ///
    /// Fails only if serialization fails.
    pub fn restyle_selection(&mut self, stroke: &str, stroke_width: f64, fill: &str) -> Result<String, JsValue> {
        let patch = ElementPatch {
            stroke: Some(stroke.to_owned()),
            stroke_width: Some(stroke_width),
            fill: Some(crate::element::normalize_fill(Some(fill))),
            ..Default::default()
        };
        let ids = self.core.selection().to_vec();
        let mut actions = Vec::new();
        for id in &ids {
            if self.core.doc.update_element(id, &patch) {
                actions.push(Action::ElementUpdated { id: *id });
            }
        }
        actions.extend(self.core.commit_pending());
        emit(&actions)
    }

    /// Split `text` on `separator` into sticky-note cards, one undo step.
    ///
    /// # Errors
    ///
    /// Fails only if serialization fails.
    pub fn create_cards(&mut self, text: &str, separator: &str, fill: &str, text_color: &str) -> Result<String, JsValue> {
        emit(&self.core.create_cards(text, separator, fill, text_color))
    }

    // --- Pointer / wheel / touch ---

    /// # Errors
    ///
    /// Fails only if serialization fails.
    pub fn pointer_down(&mut self, x: f64, y: f64, button: i16, mods: u8) -> Result<String, JsValue> {
        emit(&self.core.on_pointer_down(Point::new(x, y), Button::from_index(button), modifiers(mods)))
    }

    /// # Errors
    ///
    /// Fails only if serialization fails.
    pub fn pointer_move(&mut self, x: f64, y: f64, mods: u8) -> Result<String, JsValue> {
        emit(&self.core.on_pointer_move(Point::new(x, y), modifiers(mods)))
    }

    /// # Errors
    ///
    /// Fails only if serialization fails.
    pub fn pointer_up(&mut self, x: f64, y: f64, button: i16, mods: u8) -> Result<String, JsValue> {
        emit(&self.core.on_pointer_up(Point::new(x, y), Button::from_index(button), modifiers(mods)))
    }

    /// # Errors
    ///
    /// Fails only if serialization fails.
    pub fn pointer_leave(&mut self) -> Result<String, JsValue> {
        emit(&self.core.on_pointer_leave())
    }

    /// # Errors
    ///
    /// Fails only if serialization fails.
    pub fn double_click(&mut self, x: f64, y: f64) -> Result<String, JsValue> {
        emit(&self.core.on_double_click(Point::new(x, y)))
    }

    /// # Errors
    ///
    /// Fails only if serialization fails.
    pub fn wheel(&mut self, x: f64, y: f64, dx: f64, dy: f64, mods: u8) -> Result<String, JsValue> {
        emit(&self.core.on_wheel(Point::new(x, y), WheelDelta { dx, dy }, modifiers(mods)))
    }

    /// # Errors
    ///
    /// Fails only if serialization fails.
    pub fn touch_start(&mut self, flat: &[f64]) -> Result<String, JsValue> {
        emit(&self.core.on_touch_start(&touches(flat)))
    }

    /// # Errors
    ///
    /// Fails only if serialization fails.
    pub fn touch_move(&mut self, flat: &[f64]) -> Result<String, JsValue> {
        emit(&self.core.on_touch_move(&touches(flat)))
    }

    /// # Errors
    ///
    /// Fails only if serialization fails.
    pub fn touch_end(&mut self, remaining: &[f64]) -> Result<String, JsValue> {
        emit(&self.core.on_touch_end(&touches(remaining)))
    }

    // --- Keyboard and commands ---

    /// # Errors
    ///
    /// Fails only if serialization fails.
    pub fn key_down(&mut self, key: &str, mods: u8) -> Result<String, JsValue> {
        emit(&self.core.on_key_down(Key(key.to_owned()), modifiers(mods)))
    }

    /// # Errors
    ///
    /// Rejects malformed ids.
    pub fn set_text(&mut self, id: &str, text: &str) -> Result<String, JsValue> {
        let id = parse_id(id)?;
        emit(&self.core.set_text(&id, text))
    }

    /// # Errors
    ///
    /// Fails only if serialization fails.
    pub fn undo(&mut self) -> Result<String, JsValue> {
        emit(&self.core.undo())
    }

    /// # Errors
    ///
    /// Fails only if serialization fails.
    pub fn redo(&mut self) -> Result<String, JsValue> {
        emit(&self.core.redo())
    }

    /// # Errors
    ///
    /// Fails only if serialization fails.
    pub fn clear(&mut self) -> Result<String, JsValue> {
        emit(&self.core.clear_board())
    }

    // --- Queries ---

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.core.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.core.history.can_redo()
    }

    #[must_use]
    pub fn pan_x(&self) -> f64 {
        self.core.camera.pan_x
    }

    #[must_use]
    pub fn pan_y(&self) -> f64 {
        self.core.camera.pan_y
    }

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.core.camera.zoom
    }

    /// Selected ids as a JSON array.
    ///
    /// # Errors
    ///
    /// Fails only if serialization fails.
    pub fn selection(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.core.selection()).map_err(|e| js_error(&BoardError::from(e)))
    }

    /// In-progress drawing preview as a JSON shape, if any.
    ///
    /// # Errors
    ///
    /// Fails only if serialization fails.
    pub fn preview(&self) -> Result<Option<String>, JsValue> {
        self.core
            .preview_shape()
            .map(|shape| serde_json::to_string(&shape).map_err(|e| js_error(&BoardError::from(e))))
            .transpose()
    }
}
