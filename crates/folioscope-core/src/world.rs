//! Canvas-to-world coordinate mapping for single and multi-canvas layouts.
//!
//! A [`CanvasWorld`] places every canvas of a window into one shared
//! coordinate space. Placement is computed once at construction and never
//! changes; annotation regions expressed in canvas pixels are projected
//! through it before painting or hit-testing.

use crate::canvas::Canvas;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// World lookup errors.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("canvas not found: {0}")]
    CanvasNotFound(String),
}

/// Result type for world lookups.
pub type WorldResult<T> = Result<T, WorldError>;

/// How the canvases of a window are arranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayoutMode {
    /// One canvas shown at a time; canvases stack vertically in the world.
    #[default]
    Single,
    /// Facing pages: adjacent canvas pairs placed side by side.
    Book,
    /// Continuous scroll; canvases stack vertically in the world.
    Continuous,
}

/// Reading direction for facing-page layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReadingDirection {
    #[default]
    LeftToRight,
    RightToLeft,
}

/// Placement of one canvas in world space.
///
/// Canvas-local pixel coordinates map to world coordinates as
/// `world = offset + local * scale`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasPlacement {
    /// World position of the canvas origin.
    pub offset: Vec2,
    /// Uniform canvas-pixel to world-unit scale.
    pub scale: f64,
}

impl CanvasPlacement {
    /// Map a canvas-local point into world coordinates.
    pub fn canvas_to_world_point(&self, point: Point) -> Point {
        Point::new(
            self.offset.x + point.x * self.scale,
            self.offset.y + point.y * self.scale,
        )
    }

    /// Map a canvas-local rectangle into world coordinates.
    pub fn canvas_to_world_rect(&self, rect: Rect) -> Rect {
        Rect::new(
            self.offset.x + rect.x0 * self.scale,
            self.offset.y + rect.y0 * self.scale,
            self.offset.x + rect.x1 * self.scale,
            self.offset.y + rect.y1 * self.scale,
        )
    }

    /// Map a world point back into canvas-local coordinates.
    pub fn world_to_canvas_point(&self, point: Point) -> Point {
        Point::new(
            (point.x - self.offset.x) / self.scale,
            (point.y - self.offset.y) / self.scale,
        )
    }
}

/// An ordered set of canvases and their placements in a shared world.
///
/// Invariants: every canvas has exactly one placement, placements never
/// overlap, and [`CanvasWorld::bounds`] is the union of all placements.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasWorld {
    canvases: Vec<Canvas>,
    placements: Vec<CanvasPlacement>,
    layout: LayoutMode,
    direction: ReadingDirection,
    bounds: Rect,
}

impl CanvasWorld {
    /// Build a world from an ordered list of canvases.
    pub fn new(canvases: Vec<Canvas>, layout: LayoutMode, direction: ReadingDirection) -> Self {
        let placements = match layout {
            LayoutMode::Book => book_placements(&canvases, direction),
            LayoutMode::Single | LayoutMode::Continuous => stacked_placements(&canvases),
        };

        let bounds = canvases
            .iter()
            .zip(&placements)
            .map(|(canvas, placement)| {
                placement.canvas_to_world_rect(Rect::new(0.0, 0.0, canvas.width(), canvas.height()))
            })
            .reduce(|acc, rect| acc.union(rect))
            .unwrap_or(Rect::ZERO);

        Self {
            canvases,
            placements,
            layout,
            direction,
            bounds,
        }
    }

    /// The layout mode this world was built with.
    pub fn layout(&self) -> LayoutMode {
        self.layout
    }

    /// The reading direction this world was built with.
    pub fn direction(&self) -> ReadingDirection {
        self.direction
    }

    /// All canvases in sequence order.
    pub fn canvases(&self) -> &[Canvas] {
        &self.canvases
    }

    /// Look up a canvas by id.
    pub fn canvas(&self, canvas_id: &str) -> Option<&Canvas> {
        self.canvases.iter().find(|c| c.id() == canvas_id)
    }

    /// The world-to-canvas mapping for one canvas.
    pub fn placement(&self, canvas_id: &str) -> WorldResult<CanvasPlacement> {
        self.canvases
            .iter()
            .position(|c| c.id() == canvas_id)
            .map(|index| self.placements[index])
            .ok_or_else(|| WorldError::CanvasNotFound(canvas_id.to_string()))
    }

    /// Project a canvas-local rectangle into world coordinates.
    pub fn canvas_to_world_rect(&self, canvas_id: &str, rect: Rect) -> WorldResult<Rect> {
        Ok(self.placement(canvas_id)?.canvas_to_world_rect(rect))
    }

    /// The canvas whose placement contains the given world point, if any.
    pub fn canvas_at_point(&self, point: Point) -> Option<&Canvas> {
        self.canvases
            .iter()
            .zip(&self.placements)
            .find(|(canvas, placement)| {
                placement
                    .canvas_to_world_rect(Rect::new(0.0, 0.0, canvas.width(), canvas.height()))
                    .contains(point)
            })
            .map(|(canvas, _)| canvas)
    }

    /// Union of all canvas placements.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }
}

/// Stack canvases vertically, each scaled to the width of the first.
fn stacked_placements(canvases: &[Canvas]) -> Vec<CanvasPlacement> {
    let reference_width = match canvases.first() {
        Some(first) => first.width(),
        None => return Vec::new(),
    };

    let mut placements = Vec::with_capacity(canvases.len());
    let mut y = 0.0;
    for canvas in canvases {
        let scale = reference_width / canvas.width();
        placements.push(CanvasPlacement {
            offset: Vec2::new(0.0, y),
            scale,
        });
        y += canvas.height() * scale;
    }
    placements
}

/// Place adjacent canvas pairs side by side, the second member of each pair
/// scaled so heights match the first; pair rows stack vertically.
fn book_placements(canvases: &[Canvas], direction: ReadingDirection) -> Vec<CanvasPlacement> {
    let mut placements = vec![
        CanvasPlacement {
            offset: Vec2::ZERO,
            scale: 1.0,
        };
        canvases.len()
    ];

    let mut y = 0.0;
    for (pair_index, pair) in canvases.chunks(2).enumerate() {
        let row_height = pair[0].height();
        let base = pair_index * 2;

        // In-sequence order within the pair, flipped for right-to-left texts.
        let order: Vec<usize> = match direction {
            ReadingDirection::LeftToRight => (0..pair.len()).collect(),
            ReadingDirection::RightToLeft => (0..pair.len()).rev().collect(),
        };

        let mut x = 0.0;
        for member in order {
            let canvas = &pair[member];
            let scale = row_height / canvas.height();
            placements[base + member] = CanvasPlacement {
                offset: Vec2::new(x, y),
                scale,
            };
            x += canvas.width() * scale;
        }
        y += row_height;
    }
    placements
}
