//! Trait seam to the external deep-zoom viewer.

use folioscope_core::ViewportTransform;
use kurbo::Point;

/// The contract the overlay needs from the deep-zoom viewer.
///
/// The viewer owns all pan/zoom state; the overlay only reads viewport
/// snapshots and requests recomposites.
pub trait Viewer {
    /// Snapshot of the current viewport transform.
    fn viewport(&self) -> ViewportTransform;

    /// Ask the viewer to recomposite immediately rather than waiting for
    /// its own refresh cadence.
    fn force_redraw(&mut self);
}

/// Viewer events delivered by the host's event loop.
///
/// Positions are viewer-local pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerEvent {
    /// The viewport transform changed (pan, zoom, or rotation).
    UpdateViewport,
    /// A click landed on the viewer canvas.
    CanvasClick { position: Point },
    /// The pointer moved over the viewer canvas.
    MouseMove { position: Point },
    /// The viewer container was resized.
    Resize,
}
