#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use crate::consts::{ZOOM_MAX, ZOOM_MIN, ZOOM_OUT_STEP, ZOOM_STEP};
use crate::geometry::Point;

/// Camera state for pan/zoom on the infinite canvas.
///
/// `pan_x` / `pan_y` are in CSS pixels.
/// `zoom` is a scale factor (1.0 = no zoom), kept within [`ZOOM_MIN`, `ZOOM_MAX`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    /// Convert a screen-space point (CSS pixels) to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.pan_x) / self.zoom,
            y: (screen.y - self.pan_y) / self.zoom,
        }
    }

    /// Convert a world-space point to screen coordinates (CSS pixels).
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point {
            x: world.x * self.zoom + self.pan_x,
            y: world.y * self.zoom + self.pan_y,
        }
    }

    /// Convert a screen-space distance (pixels) to world-space distance.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }

    /// Shift the view by a screen-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Set the zoom to `zoom` (clamped) keeping the world point under
    /// `screen_pt` fixed on screen.
    pub fn zoom_at(&mut self, screen_pt: Point, zoom: f64) {
        if !zoom.is_finite() {
            return;
        }
        let world = self.screen_to_world(screen_pt);
        self.zoom = zoom.clamp(ZOOM_MIN, ZOOM_MAX);
        self.pan_x = screen_pt.x - world.x * self.zoom;
        self.pan_y = screen_pt.y - world.y * self.zoom;
    }

    /// Scale the zoom by `factor` around `screen_pt` (pinch).
    pub fn zoom_by(&mut self, screen_pt: Point, factor: f64) {
        self.zoom_at(screen_pt, self.zoom * factor);
    }

    /// One wheel notch: zoom out for positive `dy`, in otherwise.
    pub fn wheel_zoom(&mut self, screen_pt: Point, dy: f64) {
        let next = if dy > 0.0 { self.zoom * ZOOM_OUT_STEP } else { self.zoom * ZOOM_STEP };
        self.zoom_at(screen_pt, next);
    }
}
