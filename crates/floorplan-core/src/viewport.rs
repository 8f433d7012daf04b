//! Viewport pan/zoom and the fixed centimetre-to-pixel scale.
//!
//! The core works in centimetres. Screen coordinates are pixels after the
//! viewport's pan and zoom have been applied on top of [`PIXELS_PER_CM`].

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Screen pixels per centimetre at zoom 1.0.
pub const PIXELS_PER_CM: f64 = 2.0;
/// Minimum allowed zoom level.
pub const MIN_ZOOM: f64 = 0.1;
/// Maximum allowed zoom level.
pub const MAX_ZOOM: f64 = 10.0;

/// Convert centimetres to unzoomed pixels.
pub fn cm_to_px(cm: f64) -> f64 {
    cm * PIXELS_PER_CM
}

/// Convert unzoomed pixels to centimetres.
pub fn px_to_cm(px: f64) -> f64 {
    px / PIXELS_PER_CM
}

/// View transform for the canvas.
///
/// `pan_x`/`pan_y` are screen pixels; `zoom` multiplies [`PIXELS_PER_CM`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Viewport {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan_x: 0.0,
            pan_y: 0.0,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    /// World-to-screen transform for renderers (centimetres in, pixels out).
    pub fn transform(&self) -> Affine {
        Affine::translate(Vec2::new(self.pan_x, self.pan_y))
            * Affine::scale(PIXELS_PER_CM * self.zoom)
    }

    /// Convert a screen point (pixels) to world coordinates (centimetres).
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        Point::new(
            px_to_cm((screen_point.x - self.pan_x) / self.zoom),
            px_to_cm((screen_point.y - self.pan_y) / self.zoom),
        )
    }

    /// Convert a world point (centimetres) to screen coordinates (pixels).
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        Point::new(
            cm_to_px(world_point.x) * self.zoom + self.pan_x,
            cm_to_px(world_point.y) * self.zoom + self.pan_y,
        )
    }

    /// Convert a screen-space distance to centimetres at the current zoom.
    pub fn screen_tolerance_to_cm(&self, pixels: f64) -> f64 {
        px_to_cm(pixels / self.zoom)
    }

    /// Pan by a delta in screen pixels.
    pub fn pan(&mut self, delta: Vec2) {
        self.pan_x += delta.x;
        self.pan_y += delta.y;
    }

    /// Zoom by `factor`, keeping the given screen point fixed.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        let new_zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }

        let world_point = self.screen_to_world(screen_point);
        self.zoom = new_zoom;

        // Shift the pan so world_point lands back under screen_point
        let new_screen = self.world_to_screen(world_point);
        self.pan(Vec2::new(
            screen_point.x - new_screen.x,
            screen_point.y - new_screen.y,
        ));
    }

    /// Reset to the origin at 100%.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_viewport() {
        let viewport = Viewport::default();
        let world = viewport.screen_to_world(Point::new(100.0, 200.0));
        assert!((world.x - 50.0).abs() < f64::EPSILON);
        assert!((world.y - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_roundtrip_is_exact() {
        let viewport = Viewport {
            pan_x: 30.0,
            pan_y: -20.0,
            zoom: 2.0,
        };
        let original = Point::new(123.0, 456.5);
        let back = viewport.screen_to_world(viewport.world_to_screen(original));
        assert_eq!(back, original);
    }

    #[test]
    fn test_transform_matches_world_to_screen() {
        let viewport = Viewport {
            pan_x: 15.0,
            pan_y: 40.0,
            zoom: 1.5,
        };
        let world = Point::new(100.0, 60.0);
        let a = viewport.transform() * world;
        let b = viewport.world_to_screen(world);
        assert!((a.x - b.x).abs() < 1e-9);
        assert!((a.y - b.y).abs() < 1e-9);
    }

    #[test]
    fn test_tolerance_scales_with_zoom() {
        let mut viewport = Viewport::default();
        assert!((viewport.screen_tolerance_to_cm(8.0) - 4.0).abs() < f64::EPSILON);
        viewport.zoom = 4.0;
        assert!((viewport.screen_tolerance_to_cm(8.0) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zoom_at_keeps_point_fixed() {
        let mut viewport = Viewport::default();
        let anchor = Point::new(200.0, 100.0);
        let before = viewport.screen_to_world(anchor);
        viewport.zoom_at(anchor, 2.0);
        let after = viewport.screen_to_world(anchor);
        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
        assert!((viewport.zoom - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zoom_clamp() {
        let mut viewport = Viewport::default();
        viewport.zoom_at(Point::ZERO, 0.001);
        assert!((viewport.zoom - MIN_ZOOM).abs() < f64::EPSILON);
        viewport.zoom_at(Point::ZERO, 1e6);
        assert!((viewport.zoom - MAX_ZOOM).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pan_and_reset() {
        let mut viewport = Viewport::default();
        viewport.pan(Vec2::new(10.0, 20.0));
        assert!((viewport.pan_x - 10.0).abs() < f64::EPSILON);
        viewport.reset();
        assert_eq!(viewport, Viewport::default());
    }
}
