//! Folioscope Core Library
//!
//! Platform-agnostic data structures and logic for the Folioscope IIIF
//! annotation overlay: canvases and their world placement, annotation
//! lists, viewport transforms, and style palettes.

pub mod annotation;
pub mod canvas;
pub mod style;
pub mod viewport;
pub mod world;

pub use annotation::{annotations_match, Annotation, AnnotationList, FragmentSelector};
pub use canvas::{Canvas, MIN_CANVAS_DIMENSION};
pub use style::{stroke_width, AnnotationStyle, Palette};
pub use viewport::ViewportTransform;
pub use world::{CanvasPlacement, CanvasWorld, LayoutMode, ReadingDirection, WorldError};
