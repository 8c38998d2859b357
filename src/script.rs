//! JSONL edit scripts replayed against a session's engine.
//!
//! One operation per line, tagged by `op`:
//!
//! ```text
//! {"op":"tool","name":"rectangle"}
//! {"op":"down","x":10,"y":10}
//! {"op":"move","x":120,"y":90}
//! {"op":"up","x":120,"y":90}
//! {"op":"key","key":"z","ctrl":true}
//! {"op":"cards","text":"plan, build, ship","separator":","}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use canvas::element::{DEFAULT_STICKY_FILL, DEFAULT_STICKY_TEXT_COLOR, ElementId};
use canvas::engine::{Action, EngineCore};
use canvas::error::BoardError;
use canvas::geometry::Point;
use canvas::input::{Button, Key, Modifiers, Tool, WheelDelta};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case", deny_unknown_fields)]
pub enum EditOp {
    Tool {
        name: String,
    },
    Down {
        x: f64,
        y: f64,
        #[serde(default)]
        button: i16,
        #[serde(default)]
        shift: bool,
    },
    Move {
        x: f64,
        y: f64,
    },
    Up {
        x: f64,
        y: f64,
    },
    Leave,
    DoubleClick {
        x: f64,
        y: f64,
    },
    Wheel {
        x: f64,
        y: f64,
        #[serde(default)]
        dx: f64,
        dy: f64,
    },
    Key {
        key: String,
        #[serde(default)]
        ctrl: bool,
        #[serde(default)]
        shift: bool,
    },
    Text {
        id: ElementId,
        text: String,
    },
    /// One sticky note per piece of `text`.
    Cards {
        text: String,
        #[serde(default = "default_card_separator")]
        separator: String,
        #[serde(default = "default_card_fill")]
        fill: String,
        #[serde(default = "default_card_text_color", rename = "textColor")]
        text_color: String,
    },
    Undo,
    Redo,
    Clear,
    Save,
}

fn default_card_separator() -> String {
    ",".to_owned()
}

fn default_card_fill() -> String {
    DEFAULT_STICKY_FILL.to_owned()
}

fn default_card_text_color() -> String {
    DEFAULT_STICKY_TEXT_COLOR.to_owned()
}

/// Parse a whole script.
///
/// # Errors
///
/// Returns [`BoardError::Validation`] naming the first bad line.
pub fn parse_script(input: &str) -> Result<Vec<EditOp>, BoardError> {
    let mut ops = Vec::new();
    for (index, line) in input.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let op = serde_json::from_str(trimmed)
            .map_err(|e| BoardError::Validation(format!("line {}: {e}", index + 1)))?;
        ops.push(op);
    }
    Ok(ops)
}

/// Feed one operation to the engine.
///
/// # Errors
///
/// Returns [`BoardError::Validation`] for an unknown tool name.
pub fn apply(engine: &mut EngineCore, op: &EditOp) -> Result<Vec<Action>, BoardError> {
    let mods = Modifiers::default();
    let actions = match op {
        EditOp::Tool { name } => {
            let tool = Tool::from_name(name).ok_or_else(|| BoardError::Validation(format!("unknown tool {name}")))?;
            engine.set_tool(tool)
        }
        EditOp::Down { x, y, button, shift } => {
            engine.on_pointer_down(Point::new(*x, *y), Button::from_index(*button), Modifiers { shift: *shift, ..mods })
        }
        EditOp::Move { x, y } => engine.on_pointer_move(Point::new(*x, *y), mods),
        EditOp::Up { x, y } => engine.on_pointer_up(Point::new(*x, *y), Button::Primary, mods),
        EditOp::Leave => engine.on_pointer_leave(),
        EditOp::DoubleClick { x, y } => engine.on_double_click(Point::new(*x, *y)),
        EditOp::Wheel { x, y, dx, dy } => engine.on_wheel(Point::new(*x, *y), WheelDelta { dx: *dx, dy: *dy }, mods),
        EditOp::Key { key, ctrl, shift } => {
            engine.on_key_down(Key(key.clone()), Modifiers { ctrl: *ctrl, shift: *shift, ..mods })
        }
        EditOp::Text { id, text } => engine.set_text(id, text),
        EditOp::Cards { text, separator, fill, text_color } => engine.create_cards(text, separator, fill, text_color),
        EditOp::Undo => engine.undo(),
        EditOp::Redo => engine.redo(),
        EditOp::Clear => engine.clear_board(),
        EditOp::Save => vec![Action::SaveRequested],
    };
    Ok(actions)
}

#[cfg(test)]
#[path = "script_test.rs"]
mod script_test;
