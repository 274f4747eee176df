//! Read-only snapshot of the deep-zoom viewer's viewport transform.
//!
//! The external viewer owns pan/zoom/rotation state; the overlay reads a
//! fresh snapshot on every update and never mutates it.

use kurbo::{Affine, Point, Size, Vec2};

/// Floor for the zoom ratio, so inverse-zoom math stays finite.
const MIN_ZOOM_RATIO: f64 = 1e-6;

/// Viewer zoom, center, and rotation at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportTransform {
    /// Current zoom factor (world units to screen pixels).
    pub zoom: f64,
    /// The viewer's maximum zoom factor.
    pub max_zoom: f64,
    /// World point at the center of the container.
    pub center: Point,
    /// Rotation in degrees around the container center.
    pub rotation: f64,
    /// Container size in screen pixels.
    pub container: Size,
}

impl ViewportTransform {
    /// A 1:1 world-to-screen mapping for the given container.
    pub fn identity(container: Size) -> Self {
        Self {
            zoom: 1.0,
            max_zoom: 1.0,
            center: Point::new(container.width / 2.0, container.height / 2.0),
            rotation: 0.0,
            container,
        }
    }

    /// The world-to-screen affine transform.
    pub fn transform(&self) -> Affine {
        let screen_center = Vec2::new(self.container.width / 2.0, self.container.height / 2.0);
        Affine::translate(screen_center)
            * Affine::rotate(self.rotation.to_radians())
            * Affine::scale(self.zoom)
            * Affine::translate(-self.center.to_vec2())
    }

    /// The screen-to-world affine transform.
    pub fn inverse_transform(&self) -> Affine {
        self.transform().inverse()
    }

    /// Convert a screen point to world coordinates.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.transform() * world_point
    }

    /// Zoom as a fraction of the viewer's maximum zoom, clamped positive.
    pub fn zoom_ratio(&self) -> f64 {
        if self.max_zoom <= 0.0 {
            return 1.0;
        }
        (self.zoom / self.max_zoom).max(MIN_ZOOM_RATIO)
    }
}
