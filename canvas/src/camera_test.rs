#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

// =============================================================
// Conversions
// =============================================================

#[test]
fn default_camera_is_identity() {
    let cam = Camera::default();
    assert_eq!(cam.zoom, 1.0);
    assert!(point_approx_eq(cam.screen_to_world(Point::new(50.0, 75.0)), Point::new(50.0, 75.0)));
}

#[test]
fn screen_to_world_with_pan_and_zoom() {
    let cam = Camera { pan_x: 50.0, pan_y: 30.0, zoom: 2.0 };
    let world = cam.screen_to_world(Point::new(0.0, 0.0));
    assert!(approx_eq(world.x, -25.0));
    assert!(approx_eq(world.y, -15.0));
}

#[test]
fn world_to_screen_inverts_screen_to_world() {
    let cam = Camera { pan_x: 13.7, pan_y: -42.3, zoom: 0.75 };
    let world = Point::new(333.3, -999.9);
    assert!(point_approx_eq(world, cam.screen_to_world(cam.world_to_screen(world))));
}

#[test]
fn screen_dist_to_world_ignores_pan() {
    let cam = Camera { pan_x: 999.0, pan_y: -999.0, zoom: 4.0 };
    assert!(approx_eq(cam.screen_dist_to_world(8.0), 2.0));
}

// =============================================================
// Pan / zoom
// =============================================================

#[test]
fn pan_by_accumulates() {
    let mut cam = Camera::default();
    cam.pan_by(10.0, -5.0);
    cam.pan_by(2.5, 1.0);
    assert_eq!(cam.pan_x, 12.5);
    assert_eq!(cam.pan_y, -4.0);
}

#[test]
fn zoom_at_keeps_world_point_under_cursor() {
    let mut cam = Camera { pan_x: 40.0, pan_y: -10.0, zoom: 1.0 };
    let cursor = Point::new(300.0, 200.0);
    let before = cam.screen_to_world(cursor);
    cam.zoom_at(cursor, 2.5);
    assert!(approx_eq(cam.zoom, 2.5));
    assert!(point_approx_eq(cam.screen_to_world(cursor), before));
}

#[test]
fn zoom_at_clamps_to_limits() {
    let mut cam = Camera::default();
    cam.zoom_at(Point::new(0.0, 0.0), 100.0);
    assert_eq!(cam.zoom, ZOOM_MAX);
    cam.zoom_at(Point::new(0.0, 0.0), 0.0001);
    assert_eq!(cam.zoom, ZOOM_MIN);
}

#[test]
fn zoom_by_multiplies_current_zoom() {
    let mut cam = Camera { pan_x: 0.0, pan_y: 0.0, zoom: 2.0 };
    cam.zoom_by(Point::new(0.0, 0.0), 1.5);
    assert!(approx_eq(cam.zoom, 3.0));
}

#[test]
fn zoom_at_ignores_non_finite() {
    let mut cam = Camera::default();
    cam.zoom_at(Point::new(10.0, 10.0), f64::NAN);
    assert_eq!(cam, Camera::default());
}

#[test]
fn wheel_down_zooms_out_and_up_zooms_in() {
    let mut cam = Camera::default();
    cam.wheel_zoom(Point::new(0.0, 0.0), 120.0);
    assert!(approx_eq(cam.zoom, ZOOM_OUT_STEP));

    let mut cam = Camera::default();
    cam.wheel_zoom(Point::new(0.0, 0.0), -120.0);
    assert!(approx_eq(cam.zoom, ZOOM_STEP));
}
