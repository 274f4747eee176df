//! Style palette for painting annotation regions.
//!
//! The palette is supplied by the surrounding application and read-only
//! here. The key space is open-ended: any motivation value can carry its
//! own entry, with [`DEFAULT_STYLE_KEY`] as the guaranteed fallback and
//! the selection/hover keys layered on top.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fallback style key for unknown motivations.
pub const DEFAULT_STYLE_KEY: &str = "default";
/// Style key overriding the base entry for selected annotations.
pub const SELECTED_STYLE_KEY: &str = "selected";
/// Style key overriding the base entry for hovered annotations.
pub const HOVERED_STYLE_KEY: &str = "hovered";
/// Style key for search-result highlights.
pub const SEARCH_STYLE_KEY: &str = "search";

/// Minimum stroke width in world units.
pub const MIN_STROKE_WIDTH: f64 = 1.0;
/// Maximum stroke width in world units.
pub const MAX_STROKE_WIDTH: f64 = 100.0;

/// How one annotation rectangle is painted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationStyle {
    /// Stroke color (CSS color string).
    #[serde(rename = "strokeStyle")]
    pub stroke_color: String,
    /// Fill color; `None` leaves the interior unpainted.
    #[serde(rename = "fillStyle", default)]
    pub fill_color: Option<String>,
    /// Fixed line width in world units; `None` uses the inverse-zoom law.
    #[serde(rename = "lineWidth", default)]
    pub line_width: Option<f64>,
}

impl AnnotationStyle {
    /// A stroke-only style.
    pub fn stroke(color: impl Into<String>) -> Self {
        Self {
            stroke_color: color.into(),
            fill_color: None,
            line_width: None,
        }
    }
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self::stroke("yellow")
    }
}

/// Mapping from style key (motivation, selection state, search) to the
/// style descriptor to paint with.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Palette {
    entries: HashMap<String, AnnotationStyle>,
}

impl Palette {
    /// Build a palette from explicit entries.
    pub fn new(entries: HashMap<String, AnnotationStyle>) -> Self {
        Self { entries }
    }

    /// Insert or replace an entry.
    pub fn insert(&mut self, key: impl Into<String>, style: AnnotationStyle) {
        self.entries.insert(key.into(), style);
    }

    /// Look up a single entry.
    pub fn get(&self, key: &str) -> Option<&AnnotationStyle> {
        self.entries.get(key)
    }

    /// Resolve the style for one annotation: the motivation entry when
    /// present (else `default`), overridden by the hovered and selected
    /// entries in that order.
    pub fn resolve(&self, motivation: Option<&str>, selected: bool, hovered: bool) -> AnnotationStyle {
        let mut style = motivation
            .and_then(|key| self.entries.get(key))
            .or_else(|| self.entries.get(DEFAULT_STYLE_KEY))
            .cloned()
            .unwrap_or_default();

        if hovered {
            if let Some(hover) = self.entries.get(HOVERED_STYLE_KEY) {
                style = hover.clone();
            }
        }
        if selected {
            if let Some(select) = self.entries.get(SELECTED_STYLE_KEY) {
                style = select.clone();
            }
        }
        style
    }
}

/// Stroke width in world units for an on-screen stroke of roughly constant
/// apparent width: the inverse of the zoom ratio, clamped to
/// [`MIN_STROKE_WIDTH`]..[`MAX_STROKE_WIDTH`].
pub fn stroke_width(zoom_ratio: f64) -> f64 {
    if !zoom_ratio.is_finite() || zoom_ratio <= 0.0 {
        return MAX_STROKE_WIDTH;
    }
    (1.0 / zoom_ratio).clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette() -> Palette {
        let mut palette = Palette::default();
        palette.insert(DEFAULT_STYLE_KEY, AnnotationStyle::stroke("yellow"));
        palette.insert("sc:painting", AnnotationStyle::stroke("blue"));
        palette.insert(SELECTED_STYLE_KEY, AnnotationStyle::stroke("red"));
        palette.insert(HOVERED_STYLE_KEY, AnnotationStyle::stroke("orange"));
        palette
    }

    #[test]
    fn test_unknown_motivation_falls_back_to_default() {
        let style = palette().resolve(Some("oa:describing"), false, false);
        assert_eq!(style.stroke_color, "yellow");

        let style = palette().resolve(None, false, false);
        assert_eq!(style.stroke_color, "yellow");
    }

    #[test]
    fn test_motivation_entry_wins_over_default() {
        let style = palette().resolve(Some("sc:painting"), false, false);
        assert_eq!(style.stroke_color, "blue");
    }

    #[test]
    fn test_selected_overrides_hovered() {
        let style = palette().resolve(Some("sc:painting"), false, true);
        assert_eq!(style.stroke_color, "orange");

        let style = palette().resolve(Some("sc:painting"), true, true);
        assert_eq!(style.stroke_color, "red");
    }

    #[test]
    fn test_empty_palette_still_resolves() {
        let style = Palette::default().resolve(Some("sc:painting"), true, true);
        assert_eq!(style, AnnotationStyle::default());
    }

    #[test]
    fn test_stroke_width_inverse_zoom_law() {
        // At 5% of max zoom a 1px-on-screen stroke is 20 world units.
        assert_eq!(stroke_width(0.05), 20.0);
    }

    #[test]
    fn test_stroke_width_clamps() {
        assert_eq!(stroke_width(4.0), MIN_STROKE_WIDTH);
        assert_eq!(stroke_width(1e-9), MAX_STROKE_WIDTH);
        assert_eq!(stroke_width(0.0), MAX_STROKE_WIDTH);
        assert_eq!(stroke_width(f64::NAN), MAX_STROKE_WIDTH);
    }
}
