//! IIIF canvas descriptor.

use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Minimum canvas dimension in pixels.
/// Degenerate canvases are clamped to this so placement scales stay finite.
pub const MIN_CANVAS_DIMENSION: f64 = 1.0;

/// A single IIIF canvas: one page or surface with intrinsic pixel
/// dimensions and a position within its sequence. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    id: String,
    width: f64,
    height: f64,
    index: usize,
}

impl Canvas {
    /// Create a new canvas. Zero, negative, or non-finite dimensions are
    /// clamped to [`MIN_CANVAS_DIMENSION`].
    pub fn new(id: impl Into<String>, width: f64, height: f64, index: usize) -> Self {
        Self {
            id: id.into(),
            width: clamp_dimension(width),
            height: clamp_dimension(height),
            index,
        }
    }

    /// The canvas identifier (a URI in IIIF manifests).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Intrinsic width in pixels.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Intrinsic height in pixels.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Position within the owning sequence.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Intrinsic pixel dimensions.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

fn clamp_dimension(value: f64) -> f64 {
    if value.is_finite() {
        value.max(MIN_CANVAS_DIMENSION)
    } else {
        MIN_CANVAS_DIMENSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_accessors() {
        let canvas = Canvas::new("https://example.org/iiif/canvas/1", 1200.0, 1800.0, 0);
        assert_eq!(canvas.id(), "https://example.org/iiif/canvas/1");
        assert_eq!(canvas.width(), 1200.0);
        assert_eq!(canvas.height(), 1800.0);
        assert_eq!(canvas.index(), 0);
        assert_eq!(canvas.size(), Size::new(1200.0, 1800.0));
    }

    #[test]
    fn test_degenerate_dimensions_clamped() {
        let canvas = Canvas::new("c", 0.0, -5.0, 0);
        assert_eq!(canvas.width(), MIN_CANVAS_DIMENSION);
        assert_eq!(canvas.height(), MIN_CANVAS_DIMENSION);

        let canvas = Canvas::new("c", f64::NAN, f64::INFINITY, 0);
        assert_eq!(canvas.width(), MIN_CANVAS_DIMENSION);
        assert_eq!(canvas.height(), MIN_CANVAS_DIMENSION);
    }
}
