//! Drawing surface abstraction and the overlay canvas that owns it.

use folioscope_core::ViewportTransform;
use kurbo::{Affine, Rect, Size};

/// A 2D drawing surface layered atop the deep-zoom viewer.
///
/// Implementations wrap a concrete 2D context (an HTML canvas context on
/// the web, a recording surface in tests). Style setters affect subsequent
/// stroke/fill calls until the matching `restore`.
pub trait DrawSurface {
    /// Size the backing surface to the given screen pixel dimensions.
    fn resize(&mut self, size: Size);

    /// Wipe the surface.
    fn clear(&mut self, size: Size);

    /// Set the current world-to-screen transform for subsequent draws.
    fn set_transform(&mut self, transform: Affine);

    /// Push the current drawing state.
    fn save(&mut self);

    /// Pop the drawing state pushed by the matching `save`.
    fn restore(&mut self);

    /// Set the stroke color (CSS color string).
    fn set_stroke_color(&mut self, color: &str);

    /// Set the fill color (CSS color string).
    fn set_fill_color(&mut self, color: &str);

    /// Set the stroke line width.
    fn set_line_width(&mut self, width: f64);

    /// Stroke a rectangle outline with the current style.
    fn stroke_rect(&mut self, rect: Rect);

    /// Fill a rectangle with the current style.
    fn fill_rect(&mut self, rect: Rect);
}

/// Owns the drawing surface for one overlay instance and keeps it sized
/// and transformed to match the viewer's viewport.
#[derive(Debug)]
pub struct CanvasOverlay<S> {
    surface: S,
    size: Size,
    transform: Affine,
}

impl<S: DrawSurface> CanvasOverlay<S> {
    /// Take ownership of a surface.
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            size: Size::ZERO,
            transform: Affine::IDENTITY,
        }
    }

    /// Current surface size in screen pixels.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Resize the surface to the viewport's container pixels and record
    /// the world-to-screen transform for the next paint pass.
    pub fn resize(&mut self, viewport: &ViewportTransform) {
        self.size = viewport.container;
        self.transform = viewport.transform();
        self.surface.resize(self.size);
    }

    /// Wipe the surface.
    pub fn clear(&mut self) {
        self.surface.clear(self.size);
    }

    /// Run a paint pass: apply the recorded transform and invoke `f` with
    /// the surface, bracketed by `save`/`restore` so style mutations never
    /// leak out of the pass.
    pub fn canvas_update(&mut self, f: impl FnOnce(&mut S)) {
        self.surface.save();
        self.surface.set_transform(self.transform);
        f(&mut self.surface);
        self.surface.restore();
    }

    /// Release the surface.
    pub fn into_surface(self) -> S {
        self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Resize(Size),
        Clear(Size),
        SetTransform(Affine),
        Save,
        Restore,
        StrokeRect(Rect),
    }

    #[derive(Default)]
    struct RecordingSurface {
        ops: Vec<Op>,
    }

    impl DrawSurface for RecordingSurface {
        fn resize(&mut self, size: Size) {
            self.ops.push(Op::Resize(size));
        }
        fn clear(&mut self, size: Size) {
            self.ops.push(Op::Clear(size));
        }
        fn set_transform(&mut self, transform: Affine) {
            self.ops.push(Op::SetTransform(transform));
        }
        fn save(&mut self) {
            self.ops.push(Op::Save);
        }
        fn restore(&mut self) {
            self.ops.push(Op::Restore);
        }
        fn set_stroke_color(&mut self, _color: &str) {}
        fn set_fill_color(&mut self, _color: &str) {}
        fn set_line_width(&mut self, _width: f64) {}
        fn stroke_rect(&mut self, rect: Rect) {
            self.ops.push(Op::StrokeRect(rect));
        }
        fn fill_rect(&mut self, _rect: Rect) {}
    }

    #[test]
    fn test_resize_tracks_viewport_container() {
        let mut viewport = ViewportTransform::identity(Size::new(800.0, 600.0));
        viewport.zoom = 2.0;
        viewport.center = Point::new(0.0, 0.0);

        let mut overlay = CanvasOverlay::new(RecordingSurface::default());
        overlay.resize(&viewport);

        assert_eq!(overlay.size(), Size::new(800.0, 600.0));
        let surface = overlay.into_surface();
        assert_eq!(surface.ops, vec![Op::Resize(Size::new(800.0, 600.0))]);
    }

    #[test]
    fn test_canvas_update_brackets_paint_with_save_restore() {
        let viewport = ViewportTransform::identity(Size::new(100.0, 100.0));
        let mut overlay = CanvasOverlay::new(RecordingSurface::default());
        overlay.resize(&viewport);
        overlay.clear();
        overlay.canvas_update(|surface| {
            surface.stroke_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        });

        let ops = overlay.into_surface().ops;
        assert_eq!(
            ops,
            vec![
                Op::Resize(Size::new(100.0, 100.0)),
                Op::Clear(Size::new(100.0, 100.0)),
                Op::Save,
                Op::SetTransform(viewport.transform()),
                Op::StrokeRect(Rect::new(0.0, 0.0, 10.0, 10.0)),
                Op::Restore,
            ]
        );
    }
}
