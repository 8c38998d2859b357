#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;

fn stamp(shape: Shape) -> Element {
    ElementDraft::new(shape).into_element(Uuid::new_v4(), 1_000)
}

// =============================================================
// Wire format
// =============================================================

#[test]
fn element_serializes_flat_with_type_tag() {
    let e = stamp(Shape::circle(50.0, 60.0, 30.0));
    let v = serde_json::to_value(&e).unwrap();
    assert_eq!(v["type"], "circle");
    assert_eq!(v["x"], 50.0);
    assert_eq!(v["radius"], 30.0);
    assert_eq!(v["strokeWidth"], 3.0);
    assert_eq!(v["createdAt"], 1_000);
}

#[test]
fn sticky_note_tag_is_kebab_case() {
    let v = serde_json::to_value(stamp(Shape::sticky_note(0.0, 0.0, "hi"))).unwrap();
    assert_eq!(v["type"], "sticky-note");
    assert_eq!(v["fontSize"], 16.0);
}

#[test]
fn legacy_aliases_are_accepted() {
    let e: Element = serde_json::from_value(json!({"type": "rect", "x": 1, "y": 2, "width": 3, "height": 4})).unwrap();
    assert_eq!(e.kind(), ElementKind::Rectangle);
    let s: Element = serde_json::from_value(json!({"type": "sticky", "x": 0, "y": 0})).unwrap();
    assert_eq!(s.kind(), ElementKind::StickyNote);
}

#[test]
fn missing_id_gets_fresh_one_and_style_defaults() {
    let e: Element = serde_json::from_value(json!({"type": "circle", "x": 0, "y": 0})).unwrap();
    assert!(!e.id.is_nil());
    assert_eq!(e.stroke, DEFAULT_STROKE);
    assert_eq!(e.stroke_width, DEFAULT_STROKE_WIDTH);
    assert!(e.fill.is_none());
    assert_eq!(e.shape, Shape::circle(0.0, 0.0, 50.0));
}

#[test]
fn unknown_type_is_rejected() {
    let res: Result<Element, _> = serde_json::from_value(json!({"type": "star", "x": 0, "y": 0}));
    assert!(res.is_err());
}

#[test]
fn connector_round_trips_bindings() {
    let target = Uuid::new_v4();
    let c = Connector {
        source: None,
        target: Some(Binding { element: target, anchor: Anchor::Left }),
        start: Point::new(0.0, 0.0),
        end: Point::new(10.0, 10.0),
    };
    let e = stamp(Shape::Connector(c.clone()));
    let v = serde_json::to_value(&e).unwrap();
    assert_eq!(v["type"], "connector");
    assert_eq!(v["target"]["anchor"], "left");
    let back: Element = serde_json::from_value(v).unwrap();
    assert_eq!(back.as_connector(), Some(&c));
}

#[test]
fn group_children_nest() {
    let child = stamp(Shape::rectangle(0.0, 0.0, 10.0, 10.0));
    let g = stamp(Shape::Group { x: 5.0, y: 5.0, width: 10.0, height: 10.0, children: vec![child.clone()] });
    let back: Element = serde_json::from_str(&serde_json::to_string(&g).unwrap()).unwrap();
    assert_eq!(back.children(), &[child]);
}

// =============================================================
// Kind helpers
// =============================================================

#[test]
fn only_closed_shapes_accept_connectors() {
    assert!(ElementKind::Rectangle.accepts_connectors());
    assert!(ElementKind::StickyNote.accepts_connectors());
    assert!(ElementKind::Hexagon.accepts_connectors());
    assert!(!ElementKind::Line.accepts_connectors());
    assert!(!ElementKind::Connector.accepts_connectors());
    assert!(!ElementKind::Group.accepts_connectors());
    assert!(!ElementKind::Text.accepts_connectors());
}

#[test]
fn anchor_names_parse() {
    assert_eq!(Anchor::from_name("bottom"), Some(Anchor::Bottom));
    assert_eq!(Anchor::from_name("middle"), None);
}

#[test]
fn translate_moves_points_and_connectors() {
    let mut line = Shape::line(Point::new(0.0, 0.0), Point::new(10.0, 5.0));
    line.translate(1.0, 2.0);
    assert_eq!(line, Shape::Line { points: vec![1.0, 2.0, 11.0, 7.0] });

    let mut conn = Shape::Connector(Connector::free(Point::new(0.0, 0.0), Point::new(1.0, 1.0)));
    conn.translate(5.0, 5.0);
    assert_eq!(conn, Shape::Connector(Connector::free(Point::new(5.0, 5.0), Point::new(6.0, 6.0))));
}

// =============================================================
// Patching
// =============================================================

#[test]
fn patch_applies_relevant_fields_only() {
    let mut e = stamp(Shape::rectangle(0.0, 0.0, 100.0, 100.0));
    e.apply_patch(&ElementPatch { x: Some(20.0), radius: Some(99.0), ..Default::default() });
    assert_eq!(e.shape, Shape::rectangle(20.0, 0.0, 100.0, 100.0));
}

#[test]
fn patch_clamps_extents_to_floors() {
    let mut r = stamp(Shape::rectangle(0.0, 0.0, 100.0, 100.0));
    r.apply_patch(&ElementPatch { width: Some(1.0), height: Some(-4.0), ..Default::default() });
    assert_eq!(r.shape, Shape::rectangle(0.0, 0.0, MIN_SHAPE_SIZE, MIN_SHAPE_SIZE));

    let mut s = stamp(Shape::sticky_note(0.0, 0.0, ""));
    s.apply_patch(&ElementPatch { width: Some(10.0), height: Some(10.0), ..Default::default() });
    let Shape::StickyNote { width, height, .. } = s.shape else { panic!("not a sticky") };
    assert_eq!((width, height), (MIN_STICKY_WIDTH, MIN_STICKY_HEIGHT));

    let mut t = stamp(Shape::text(0.0, 0.0, "x", 16.0));
    t.apply_patch(&ElementPatch { font_size: Some(2.0), ..Default::default() });
    let Shape::Text { font_size, .. } = t.shape else { panic!("not text") };
    assert_eq!(font_size, MIN_FONT_SIZE);
}

#[test]
fn patch_ignores_non_finite_numbers() {
    let mut e = stamp(Shape::circle(10.0, 10.0, 20.0));
    e.apply_patch(&ElementPatch { x: Some(f64::NAN), radius: Some(f64::INFINITY), ..Default::default() });
    assert_eq!(e.shape, Shape::circle(10.0, 10.0, 20.0));
}

#[test]
fn patch_rejects_odd_point_sequence() {
    let mut e = stamp(Shape::Path { points: vec![0.0, 0.0, 1.0, 1.0] });
    e.apply_patch(&ElementPatch { points: Some(vec![1.0, 2.0, 3.0]), ..Default::default() });
    assert_eq!(e.shape, Shape::Path { points: vec![0.0, 0.0, 1.0, 1.0] });
}

#[test]
fn patch_fill_null_clears_and_transparent_normalizes() {
    let mut e = stamp(Shape::rectangle(0.0, 0.0, 10.0, 10.0));
    e.apply_patch(&ElementPatch { fill: Some(Some("#ff0000".into())), ..Default::default() });
    assert_eq!(e.fill.as_deref(), Some("#ff0000"));
    e.apply_patch(&ElementPatch { fill: Some(Some("transparent".into())), ..Default::default() });
    assert!(e.fill.is_none());

    let patch: ElementPatch = serde_json::from_value(json!({"fill": null})).unwrap();
    assert_eq!(patch.fill, Some(None));
    let absent: ElementPatch = serde_json::from_value(json!({})).unwrap();
    assert_eq!(absent.fill, None);
}

#[test]
fn patch_moves_only_free_connector_ends() {
    let bound = Binding { element: Uuid::new_v4(), anchor: Anchor::Top };
    let mut e = stamp(Shape::Connector(Connector {
        source: Some(bound),
        target: None,
        start: Point::new(0.0, 0.0),
        end: Point::new(10.0, 10.0),
    }));
    e.apply_patch(&ElementPatch {
        start: Some(Point::new(99.0, 99.0)),
        end: Some(Point::new(50.0, 50.0)),
        ..Default::default()
    });
    let c = e.as_connector().unwrap();
    assert_eq!(c.start, Point::new(0.0, 0.0));
    assert_eq!(c.end, Point::new(50.0, 50.0));
}

#[test]
fn empty_patch_is_empty() {
    assert!(ElementPatch::default().is_empty());
    assert!(!ElementPatch::position(1.0, 2.0).is_empty());
}

#[test]
fn empty_patch_serializes_to_empty_object() {
    assert_eq!(serde_json::to_value(ElementPatch::default()).unwrap(), json!({}));
}

#[test]
fn draft_builder_sets_style() {
    let e = ElementDraft::new(Shape::rectangle(0.0, 0.0, 1.0, 1.0))
        .with_stroke("#123456", -2.0)
        .with_fill("")
        .into_element(Uuid::new_v4(), 7);
    assert_eq!(e.stroke, "#123456");
    assert_eq!(e.stroke_width, 0.0);
    assert!(e.fill.is_none());
    assert_eq!((e.created_at, e.updated_at), (7, 7));
}
