//! Folioscope Overlay Library
//!
//! The canvas annotation overlay and hit-testing engine: a renderer that
//! keeps a 2D drawing surface in sync with a deep-zoom viewer's viewport,
//! and an interaction controller that hit-tests pointer events against
//! projected annotation regions. Both are written against trait seams
//! ([`Viewer`], [`DrawSurface`]) so no GUI framework is required.

pub mod debounce;
pub mod overlay;
pub mod surface;
pub mod viewer;

pub use debounce::{HoverDebouncer, HOVER_DEBOUNCE_DELAY};
pub use overlay::{AnnotationsOverlay, OverlayEvents, OverlayProps};
pub use surface::{CanvasOverlay, DrawSurface};
pub use viewer::{Viewer, ViewerEvent};
