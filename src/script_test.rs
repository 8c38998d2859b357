#![allow(clippy::float_cmp)]

use canvas::element::Shape;

use super::*;

fn run(engine: &mut EngineCore, script: &str) -> Vec<Action> {
    let mut out = Vec::new();
    for op in parse_script(script).unwrap() {
        out.extend(apply(engine, &op).unwrap());
    }
    out
}

// =============================================================================
// Parsing
// =============================================================================

#[test]
fn parses_ops_and_skips_comments() {
    let ops = parse_script(
        r#"
        # draw a box
        {"op":"tool","name":"rectangle"}
        {"op":"down","x":10,"y":20}

        {"op":"key","key":"z","ctrl":true}
        {"op":"undo"}
        "#,
    )
    .unwrap();

    assert_eq!(ops.len(), 4);
    assert_eq!(ops[0], EditOp::Tool { name: "rectangle".into() });
    assert_eq!(ops[1], EditOp::Down { x: 10.0, y: 20.0, button: 0, shift: false });
    assert_eq!(ops[2], EditOp::Key { key: "z".into(), ctrl: true, shift: false });
    assert_eq!(ops[3], EditOp::Undo);
}

#[test]
fn bad_line_is_reported_by_number() {
    let err = parse_script("{\"op\":\"undo\"}\n{\"op\":\"fly\"}\n").unwrap_err();
    assert_eq!(err.error_code(), "E_VALIDATION");
    assert!(err.to_string().contains("line 2"));
}

// =============================================================================
// Replay
// =============================================================================

#[test]
fn drag_draws_a_rectangle() {
    let mut engine = EngineCore::new();
    run(
        &mut engine,
        r#"
        {"op":"tool","name":"rectangle"}
        {"op":"down","x":10,"y":10}
        {"op":"move","x":110,"y":60}
        {"op":"up","x":110,"y":60}
        "#,
    );

    assert_eq!(engine.doc.len(), 1);
    assert!(matches!(engine.doc.elements()[0].shape, Shape::Rectangle { .. }));
    assert!(engine.history.can_undo());
}

#[test]
fn undo_and_redo_ops() {
    let mut engine = EngineCore::new();
    let draw = r#"
        {"op":"tool","name":"rectangle"}
        {"op":"down","x":0,"y":0}
        {"op":"move","x":50,"y":50}
        {"op":"up","x":50,"y":50}
    "#;
    run(&mut engine, draw);
    run(&mut engine, r#"{"op":"undo"}"#);
    assert!(engine.doc.is_empty());
    run(&mut engine, r#"{"op":"redo"}"#);
    assert_eq!(engine.doc.len(), 1);
}

#[test]
fn text_op_sets_content() {
    let mut engine = EngineCore::new();
    run(
        &mut engine,
        r#"
        {"op":"tool","name":"sticky"}
        {"op":"down","x":0,"y":0}
        {"op":"up","x":0,"y":0}
        "#,
    );
    let id = engine.doc.elements()[0].id;
    let op = EditOp::Text { id, text: "Ship it".into() };
    apply(&mut engine, &op).unwrap();

    match &engine.doc.elements()[0].shape {
        Shape::StickyNote { text, .. } => assert_eq!(text, "Ship it"),
        other => panic!("expected sticky note, got {other:?}"),
    }
}

#[test]
fn save_op_requests_save() {
    let mut engine = EngineCore::new();
    let actions = run(&mut engine, r#"{"op":"save"}"#);
    assert_eq!(actions, vec![Action::SaveRequested]);
}

#[test]
fn unknown_tool_is_validation_error() {
    let mut engine = EngineCore::new();
    let err = apply(&mut engine, &EditOp::Tool { name: "laser".into() }).unwrap_err();
    assert_eq!(err.error_code(), "E_VALIDATION");
}

#[test]
fn cards_op_lays_out_notes_in_one_step() {
    let mut engine = EngineCore::new();
    run(&mut engine, r##"{"op":"cards","text":"plan; build; ship","separator":";","fill":"#9c27b0","textColor":"#ffffff"}"##);

    assert_eq!(engine.doc.len(), 3);
    let first = &engine.doc.elements()[0];
    assert_eq!(first.fill.as_deref(), Some("#9c27b0"));
    match &first.shape {
        Shape::StickyNote { x, y, text, text_color, .. } => {
            assert_eq!((*x, *y), (100.0, 100.0));
            assert_eq!(text, "plan");
            assert_eq!(text_color, "#ffffff");
        }
        other => panic!("expected sticky note, got {other:?}"),
    }

    run(&mut engine, r#"{"op":"undo"}"#);
    assert!(engine.doc.is_empty());
}

#[test]
fn cards_op_defaults_to_comma_and_yellow() {
    let ops = parse_script(r#"{"op":"cards","text":"a, b"}"#).unwrap();
    assert_eq!(
        ops[0],
        EditOp::Cards {
            text: "a, b".into(),
            separator: ",".into(),
            fill: "#ffeb3b".into(),
            text_color: "#333333".into(),
        }
    );
}
