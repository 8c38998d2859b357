use uuid::Uuid;

use super::*;
use crate::element::{Connector, ElementDraft, Shape};

fn stamp(shape: Shape) -> Element {
    ElementDraft::new(shape).into_element(Uuid::new_v4(), 0)
}

// =============================================================
// ResizeAnchor
// =============================================================

#[test]
fn resize_anchor_edge_flags() {
    assert!(ResizeAnchor::Nw.moves_left() && ResizeAnchor::Nw.moves_top());
    assert!(ResizeAnchor::Se.moves_right() && ResizeAnchor::Se.moves_bottom());
    assert!(!ResizeAnchor::N.moves_left() && !ResizeAnchor::N.moves_right());
    assert!(!ResizeAnchor::E.moves_top() && !ResizeAnchor::E.moves_bottom());
}

#[test]
fn resize_handle_points_cover_corners_and_midpoints() {
    let b = Bounds::new(0.0, 0.0, 100.0, 50.0);
    assert_eq!(resize_handle_point(&b, ResizeAnchor::Nw), Point::new(0.0, 0.0));
    assert_eq!(resize_handle_point(&b, ResizeAnchor::E), Point::new(100.0, 25.0));
    assert_eq!(resize_handle_point(&b, ResizeAnchor::S), Point::new(50.0, 50.0));
}

// =============================================================
// Body hit testing
// =============================================================

#[test]
fn topmost_element_wins() {
    let below = stamp(Shape::rectangle(0.0, 0.0, 100.0, 100.0));
    let above = stamp(Shape::rectangle(50.0, 50.0, 100.0, 100.0));
    let elements = vec![below.clone(), above.clone()];
    assert_eq!(hit_test(&elements, Point::new(75.0, 75.0)).map(|e| e.id), Some(above.id));
    assert_eq!(hit_test(&elements, Point::new(10.0, 10.0)).map(|e| e.id), Some(below.id));
}

#[test]
fn empty_canvas_misses() {
    let elements = vec![stamp(Shape::circle(50.0, 50.0, 10.0))];
    assert!(hit_test(&elements, Point::new(500.0, 500.0)).is_none());
}

#[test]
fn elements_in_rect_uses_intersection() {
    let a = stamp(Shape::rectangle(0.0, 0.0, 10.0, 10.0));
    let b = stamp(Shape::rectangle(100.0, 100.0, 10.0, 10.0));
    let elements = vec![a.clone(), b];
    assert_eq!(elements_in_rect(&elements, &Bounds::new(5.0, 5.0, 20.0, 20.0)), vec![a.id]);
}

// =============================================================
// Handles
// =============================================================

#[test]
fn resize_handle_hit_within_slop() {
    let rect = stamp(Shape::rectangle(100.0, 100.0, 100.0, 100.0));
    let cam = Camera::default();
    assert_eq!(
        hit_handles(&rect, Point::new(203.0, 197.0), &cam),
        Some(HitPart::ResizeHandle(ResizeAnchor::Se))
    );
    assert_eq!(hit_handles(&rect, Point::new(150.0, 150.0), &cam), None);
}

#[test]
fn slop_scales_with_zoom() {
    let rect = stamp(Shape::rectangle(100.0, 100.0, 100.0, 100.0));
    let zoomed_out = Camera { zoom: 0.5, ..Camera::default() };
    // 12 world units away: outside 8px at zoom 1, inside at zoom 0.5 (16 world).
    let pt = Point::new(212.0, 200.0);
    assert_eq!(hit_handles(&rect, pt, &Camera::default()), None);
    assert_eq!(hit_handles(&rect, pt, &zoomed_out), Some(HitPart::ResizeHandle(ResizeAnchor::Se)));
}

#[test]
fn rotate_handle_above_top_edge() {
    let rect = stamp(Shape::rectangle(100.0, 100.0, 100.0, 100.0));
    let cam = Camera::default();
    let handle = rotate_handle_point(&bounds_of(&rect), &cam);
    assert_eq!(handle, Point::new(150.0, 76.0));
    assert_eq!(hit_handles(&rect, handle, &cam), Some(HitPart::RotateHandle));
}

#[test]
fn groups_have_no_rotate_handle_and_connectors_no_handles() {
    let group = stamp(Shape::Group { x: 100.0, y: 100.0, width: 100.0, height: 100.0, children: vec![] });
    let cam = Camera::default();
    assert_eq!(hit_handles(&group, Point::new(150.0, 76.0), &cam), None);

    let conn = stamp(Shape::Connector(Connector::free(Point::new(0.0, 0.0), Point::new(100.0, 100.0))));
    assert_eq!(hit_handles(&conn, Point::new(100.0, 100.0), &cam), None);
}

#[test]
fn hit_test_full_prefers_selected_handles() {
    let rect = stamp(Shape::rectangle(100.0, 100.0, 100.0, 100.0));
    let elements = vec![rect.clone()];
    let cam = Camera::default();

    let on_corner = hit_test_full(&elements, Point::new(200.0, 200.0), &cam, Some(&rect));
    assert_eq!(on_corner, Some(Hit { element_id: rect.id, part: HitPart::ResizeHandle(ResizeAnchor::Se) }));

    let unselected = hit_test_full(&elements, Point::new(200.0, 200.0), &cam, None);
    assert_eq!(unselected, Some(Hit { element_id: rect.id, part: HitPart::Body }));
}

// =============================================================
// Anchors
// =============================================================

#[test]
fn hit_anchor_finds_accepting_element() {
    let rect = stamp(Shape::rectangle(100.0, 100.0, 100.0, 100.0));
    let elements = vec![rect.clone()];
    let cam = Camera::default();
    assert_eq!(hit_anchor(&elements, Point::new(198.0, 151.0), &cam), Some((rect.id, Anchor::Right)));
    assert_eq!(hit_anchor(&elements, Point::new(150.0, 150.0), &cam), None);
}

#[test]
fn hit_anchor_skips_non_accepting_kinds() {
    let text = stamp(Shape::text(100.0, 100.0, "abc", 20.0));
    let b = bounds_of(&text);
    let pt = crate::connector::anchor_point(b, Anchor::Left);
    assert_eq!(hit_anchor(&[text], pt, &Camera::default()), None);
}
