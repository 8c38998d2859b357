use uuid::Uuid;

use super::*;
use crate::element::ElementDraft;

fn stamp(shape: Shape) -> Element {
    ElementDraft::new(shape).into_element(Uuid::new_v4(), 0)
}

fn bound(source: &Element, sa: Anchor, target: &Element, ta: Anchor) -> Element {
    stamp(Shape::Connector(Connector {
        source: Some(Binding { element: source.id, anchor: sa }),
        target: Some(Binding { element: target.id, anchor: ta }),
        start: Point::default(),
        end: Point::default(),
    }))
}

// =============================================================
// Anchors
// =============================================================

#[test]
fn anchor_points_sit_on_box_edges() {
    let b = Bounds::new(100.0, 100.0, 100.0, 100.0);
    assert_eq!(anchor_point(b, Anchor::Top), Point::new(150.0, 100.0));
    assert_eq!(anchor_point(b, Anchor::Right), Point::new(200.0, 150.0));
    assert_eq!(anchor_point(b, Anchor::Bottom), Point::new(150.0, 200.0));
    assert_eq!(anchor_point(b, Anchor::Left), Point::new(100.0, 150.0));
}

#[test]
fn circle_anchor_uses_center_based_bounds() {
    let c = stamp(Shape::circle(50.0, 50.0, 30.0));
    assert_eq!(element_anchor(&c, Anchor::Right), Point::new(80.0, 50.0));
}

#[test]
fn locate_bounds_offsets_group_children() {
    let child = stamp(Shape::rectangle(10.0, 10.0, 20.0, 20.0));
    let child_id = child.id;
    let group = stamp(Shape::Group { x: 100.0, y: 200.0, width: 40.0, height: 40.0, children: vec![child] });
    assert_eq!(locate_bounds(&[group], &child_id), Some(Bounds::new(110.0, 210.0, 20.0, 20.0)));
}

// =============================================================
// Reroute
// =============================================================

#[test]
fn reroute_derives_bound_endpoints() {
    let a = stamp(Shape::rectangle(100.0, 100.0, 100.0, 100.0));
    let b = stamp(Shape::circle(400.0, 150.0, 50.0));
    let conn = bound(&a, Anchor::Right, &b, Anchor::Left);
    let conn_id = conn.id;
    let mut elements = vec![a, b, conn];

    let outcome = reroute(&mut elements);
    assert_eq!(outcome.moved, vec![conn_id]);
    let c = elements[2].as_connector().unwrap();
    assert_eq!(c.start, Point::new(200.0, 150.0));
    assert_eq!(c.end, Point::new(350.0, 150.0));

    assert!(reroute(&mut elements).is_empty());
}

#[test]
fn reroute_follows_moved_element() {
    let a = stamp(Shape::rectangle(0.0, 0.0, 100.0, 100.0));
    let b = stamp(Shape::rectangle(300.0, 0.0, 100.0, 100.0));
    let conn = bound(&a, Anchor::Right, &b, Anchor::Left);
    let mut elements = vec![a, b, conn];
    reroute(&mut elements);

    elements[0].shape.translate(50.0, 20.0);
    reroute(&mut elements);
    assert_eq!(elements[2].as_connector().unwrap().start, Point::new(150.0, 70.0));
}

#[test]
fn reroute_detaches_missing_target_at_last_position() {
    let a = stamp(Shape::rectangle(0.0, 0.0, 100.0, 100.0));
    let b = stamp(Shape::rectangle(300.0, 0.0, 100.0, 100.0));
    let conn = bound(&a, Anchor::Right, &b, Anchor::Left);
    let conn_id = conn.id;
    let mut elements = vec![a, b, conn];
    reroute(&mut elements);

    elements.remove(1);
    let outcome = reroute(&mut elements);
    assert_eq!(outcome.detached, vec![conn_id]);
    let c = elements[1].as_connector().unwrap();
    assert!(c.target.is_none());
    assert!(c.source.is_some());
    assert_eq!(c.end, Point::new(300.0, 50.0));
}

#[test]
fn self_binding_is_detached() {
    let mut conn = stamp(Shape::Connector(Connector::free(Point::default(), Point::new(5.0, 5.0))));
    let self_id = conn.id;
    if let Shape::Connector(c) = &mut conn.shape {
        c.source = Some(Binding { element: self_id, anchor: Anchor::Top });
    }
    let mut elements = vec![conn];
    let outcome = reroute(&mut elements);
    assert_eq!(outcome.detached, vec![self_id]);
    assert!(elements[0].as_connector().unwrap().is_free());
}

#[test]
fn dependents_and_can_drag() {
    let a = stamp(Shape::rectangle(0.0, 0.0, 10.0, 10.0));
    let b = stamp(Shape::rectangle(50.0, 0.0, 10.0, 10.0));
    let conn = bound(&a, Anchor::Right, &b, Anchor::Left);
    let free = stamp(Shape::Connector(Connector::free(Point::default(), Point::new(1.0, 1.0))));
    let elements = vec![a.clone(), b, conn.clone(), free.clone()];

    assert_eq!(dependents(&elements, &a.id), vec![conn.id]);
    assert!(can_drag(&a));
    assert!(!can_drag(&conn));
    assert!(can_drag(&free));
}

// =============================================================
// connect
// =============================================================

#[test]
fn connect_binds_accepting_elements_only() {
    let rect = stamp(Shape::rectangle(0.0, 0.0, 100.0, 100.0));
    let line = stamp(Shape::line(Point::new(200.0, 0.0), Point::new(300.0, 0.0)));
    let elements = vec![rect.clone(), line.clone()];

    let c = connect(
        &elements,
        Some(Binding { element: rect.id, anchor: Anchor::Bottom }),
        Some(Binding { element: line.id, anchor: Anchor::Top }),
        Point::new(1.0, 1.0),
        Point::new(250.0, 5.0),
    );
    assert_eq!(c.source, Some(Binding { element: rect.id, anchor: Anchor::Bottom }));
    assert_eq!(c.start, Point::new(50.0, 100.0));
    assert!(c.target.is_none());
    assert_eq!(c.end, Point::new(250.0, 5.0));
}

#[test]
fn connect_with_unknown_id_falls_back_to_free() {
    let c = connect(
        &[],
        Some(Binding { element: Uuid::new_v4(), anchor: Anchor::Top }),
        None,
        Point::new(1.0, 2.0),
        Point::new(3.0, 4.0),
    );
    assert!(c.is_free());
    assert_eq!(c.start, Point::new(1.0, 2.0));
}
