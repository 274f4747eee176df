//! The annotations overlay: viewport-synchronized painting and spatial
//! hit-testing for IIIF annotation regions.
//!
//! The overlay is an explicit state machine with an `attach`/`detach`
//! contract, replacing a GUI framework's mount/update/unmount lifecycle.
//! While detached, paint and hit-test requests are silent no-ops; on every
//! exit path the pending hover timer is cancelled and the drawing surface
//! released, so no callback can fire against a destroyed instance.

use crate::debounce::HoverDebouncer;
use crate::surface::{CanvasOverlay, DrawSurface};
use crate::viewer::{Viewer, ViewerEvent};
use folioscope_core::style::SEARCH_STYLE_KEY;
use folioscope_core::{
    annotations_match, stroke_width, Annotation, AnnotationList, AnnotationStyle, CanvasWorld,
    Palette,
};
use kurbo::{Point, Rect};
use uuid::Uuid;

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

#[cfg(target_arch = "wasm32")]
use web_time::Instant;

/// Host-side sinks for selection and hover requests.
///
/// The overlay only requests state changes; the surrounding application
/// owns selection/hover state and passes it back in via [`OverlayProps`].
pub trait OverlayEvents {
    /// Request selection of an annotation.
    fn select_annotation(&mut self, window_id: &str, annotation_id: &str);

    /// Request deselection of an annotation.
    fn deselect_annotation(&mut self, window_id: &str, annotation_id: &str);

    /// Report the full set of annotations under the pointer.
    fn hover_annotation(&mut self, window_id: &str, annotation_ids: &[String]);
}

/// Inputs supplied by the surrounding application.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayProps {
    /// Annotation lists to paint and hit-test.
    pub annotations: Vec<AnnotationList>,
    /// Search-result annotation lists, painted with the `search` palette
    /// entry and hit-tested alongside the regular annotations.
    pub search_annotations: Vec<AnnotationList>,
    /// Ids currently selected (owned by the application).
    pub selected_ids: Vec<String>,
    /// Ids currently hovered (owned by the application).
    pub hovered_ids: Vec<String>,
    /// Style palette, read-only.
    pub palette: Palette,
    /// Whether regular annotation highlights are painted at all.
    /// Search highlights and hit-testing are unaffected.
    pub highlights_visible: bool,
}

impl Default for OverlayProps {
    fn default() -> Self {
        Self {
            annotations: Vec::new(),
            search_annotations: Vec::new(),
            selected_ids: Vec::new(),
            hovered_ids: Vec::new(),
            palette: Palette::default(),
            highlights_visible: true,
        }
    }
}

enum OverlayState<V, S> {
    Detached,
    Attached {
        viewer: V,
        overlay: CanvasOverlay<S>,
    },
}

/// The overlay controller for one window.
///
/// Owns the drawing surface while attached; reads viewport snapshots from
/// the viewer and emits selection/hover requests through `E`.
pub struct AnnotationsOverlay<V, S, E> {
    instance_id: Uuid,
    window_id: String,
    world: CanvasWorld,
    props: OverlayProps,
    state: OverlayState<V, S>,
    hover: HoverDebouncer,
    last_hover_emit: Option<Vec<String>>,
    events: E,
}

impl<V: Viewer, S: DrawSurface, E: OverlayEvents> AnnotationsOverlay<V, S, E> {
    /// Create a detached overlay for one window.
    pub fn new(window_id: impl Into<String>, world: CanvasWorld, events: E) -> Self {
        Self {
            instance_id: Uuid::new_v4(),
            window_id: window_id.into(),
            world,
            props: OverlayProps::default(),
            state: OverlayState::Detached,
            hover: HoverDebouncer::default(),
            last_hover_emit: None,
            events,
        }
    }

    /// The window this overlay belongs to.
    pub fn window_id(&self) -> &str {
        &self.window_id
    }

    /// The canvas world this overlay projects through.
    pub fn world(&self) -> &CanvasWorld {
        &self.world
    }

    /// Current props.
    pub fn props(&self) -> &OverlayProps {
        &self.props
    }

    /// Whether a viewer is attached.
    pub fn is_attached(&self) -> bool {
        matches!(self.state, OverlayState::Attached { .. })
    }

    /// Attach a viewer and take ownership of a drawing surface, then paint
    /// the current annotations. Attaching while already attached detaches
    /// first (viewer swap).
    pub fn attach(&mut self, viewer: V, surface: S) {
        if self.is_attached() {
            self.detach();
        }
        log::debug!("overlay {}: attach", self.instance_id);
        self.state = OverlayState::Attached {
            viewer,
            overlay: CanvasOverlay::new(surface),
        };
        self.repaint();
    }

    /// Tear down: cancel any pending hover computation and release the
    /// viewer and surface. Safe to call while detached.
    pub fn detach(&mut self) -> Option<(V, S)> {
        self.hover.cancel();
        self.last_hover_emit = None;
        match std::mem::replace(&mut self.state, OverlayState::Detached) {
            OverlayState::Attached { viewer, overlay } => {
                log::debug!("overlay {}: detach", self.instance_id);
                Some((viewer, overlay.into_surface()))
            }
            OverlayState::Detached => None,
        }
    }

    /// Apply a prop update, repainting only when something visible
    /// changed. Annotation arrays are compared by resource identifiers
    /// (see [`annotations_match`]); palette, selection, hover, and
    /// visibility changes always force a repaint.
    pub fn update(&mut self, props: OverlayProps) {
        let repaint = !annotations_match(&props.annotations, &self.props.annotations)
            || !annotations_match(&props.search_annotations, &self.props.search_annotations)
            || props.selected_ids != self.props.selected_ids
            || props.hovered_ids != self.props.hovered_ids
            || props.palette != self.props.palette
            || props.highlights_visible != self.props.highlights_visible;

        self.props = props;
        if repaint {
            self.repaint();
        }
    }

    /// Dispatch one viewer event. `now` is the host's clock reading, used
    /// to schedule the hover debounce.
    pub fn handle_event(&mut self, event: ViewerEvent, now: Instant) {
        if !self.is_attached() {
            return;
        }
        match event {
            ViewerEvent::UpdateViewport | ViewerEvent::Resize => self.repaint(),
            ViewerEvent::CanvasClick { position } => self.on_canvas_click(position),
            ViewerEvent::MouseMove { position } => self.hover.schedule(position, now),
        }
    }

    /// Fire the pending hover computation once its debounce delay has
    /// elapsed. The host calls this from its timer; equal consecutive id
    /// sequences are not re-emitted.
    pub fn poll_hover(&mut self, now: Instant) {
        let Some(position) = self.hover.poll(now) else {
            return;
        };
        let OverlayState::Attached { viewer, .. } = &self.state else {
            return;
        };
        let world_point = viewer.viewport().screen_to_world(position);

        let ids: Vec<String> = self
            .annotations_at_point(world_point)
            .into_iter()
            .map(|(annotation, _)| annotation.id().to_string())
            .collect();

        if self.last_hover_emit.as_deref() == Some(ids.as_slice()) {
            return;
        }
        self.events.hover_annotation(&self.window_id, &ids);
        self.last_hover_emit = Some(ids);
    }

    /// Clear, resize, and repaint every visible annotation, then ask the
    /// viewer to recomposite. A no-op while detached.
    pub fn repaint(&mut self) {
        let OverlayState::Attached { viewer, overlay } = &mut self.state else {
            return;
        };
        let viewport = viewer.viewport();
        let width = stroke_width(viewport.zoom_ratio());
        let props = &self.props;
        let world = &self.world;

        overlay.clear();
        overlay.resize(&viewport);
        overlay.canvas_update(|surface| {
            if props.highlights_visible {
                for list in &props.annotations {
                    for annotation in list.resources() {
                        let Some(rect) = world_rect(world, annotation) else {
                            continue;
                        };
                        let style = props.palette.resolve(
                            annotation.motivation(),
                            contains_id(&props.selected_ids, annotation.id()),
                            contains_id(&props.hovered_ids, annotation.id()),
                        );
                        paint_annotation(surface, rect, &style, width);
                    }
                }
            }
            for list in &props.search_annotations {
                for annotation in list.resources() {
                    let Some(rect) = world_rect(world, annotation) else {
                        continue;
                    };
                    let style = props.palette.resolve(
                        Some(SEARCH_STYLE_KEY),
                        contains_id(&props.selected_ids, annotation.id()),
                        contains_id(&props.hovered_ids, annotation.id()),
                    );
                    paint_annotation(surface, rect, &style, width);
                }
            }
        });
        viewer.force_redraw();
    }

    fn on_canvas_click(&mut self, position: Point) {
        let OverlayState::Attached { viewer, .. } = &self.state else {
            return;
        };
        let world_point = viewer.viewport().screen_to_world(position);

        // Smallest area wins: the most specific target among overlapping
        // boxes. `min_by` keeps the first on ties, so resolution is
        // deterministic in annotation order.
        let target = self
            .annotations_at_point(world_point)
            .into_iter()
            .min_by(|(_, a), (_, b)| a.area().total_cmp(&b.area()))
            .map(|(annotation, _)| annotation.id().to_string());

        let Some(id) = target else {
            return;
        };
        if contains_id(&self.props.selected_ids, &id) {
            self.events.deselect_annotation(&self.window_id, &id);
        } else {
            self.events.select_annotation(&self.window_id, &id);
        }
    }

    /// Every annotation whose projected world rectangle contains the
    /// point, with that rectangle, in annotation order.
    fn annotations_at_point(&self, world_point: Point) -> Vec<(&Annotation, Rect)> {
        self.props
            .annotations
            .iter()
            .chain(&self.props.search_annotations)
            .flat_map(|list| list.resources())
            .filter_map(|annotation| {
                world_rect(&self.world, annotation).map(|rect| (annotation, rect))
            })
            .filter(|(_, rect)| rect.contains(world_point))
            .collect()
    }
}

fn contains_id(ids: &[String], id: &str) -> bool {
    ids.iter().any(|candidate| candidate == id)
}

/// Project an annotation's region into world coordinates. Annotations
/// without a region, or targeting a canvas outside this world, resolve to
/// `None` and are skipped by callers.
fn world_rect(world: &CanvasWorld, annotation: &Annotation) -> Option<Rect> {
    let canvas_id = annotation.target_id()?;
    let Some(canvas) = world.canvas(canvas_id) else {
        log::debug!(
            "annotation {:?} targets a canvas outside this world: {canvas_id}",
            annotation.id()
        );
        return None;
    };
    let local = annotation.region_rect(canvas)?;
    match world.canvas_to_world_rect(canvas_id, local) {
        Ok(rect) => Some(rect),
        Err(err) => {
            log::warn!("skipping annotation {:?}: {err}", annotation.id());
            None
        }
    }
}

fn paint_annotation<S: DrawSurface>(
    surface: &mut S,
    rect: Rect,
    style: &AnnotationStyle,
    width: f64,
) {
    surface.save();
    surface.set_stroke_color(&style.stroke_color);
    surface.set_line_width(style.line_width.unwrap_or(width));
    if let Some(fill) = &style.fill_color {
        surface.set_fill_color(fill);
        surface.fill_rect(rect);
    }
    surface.stroke_rect(rect);
    surface.restore();
}
