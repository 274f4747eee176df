//! Annotation lists and IIIF fragment selectors.
//!
//! An [`AnnotationList`] normalizes a raw annotation-list resource (already
//! fetched IIIF presentation-API JSON) into a uniform in-memory shape.
//! Resources whose target lacks a parseable `#xywh=` selector are retained
//! with no region; they are never hit-testable and are skipped when
//! painting.

use crate::canvas::Canvas;
use kurbo::Rect;
use serde_json::Value;

/// A rectangular region parsed from a `#xywh=` fragment selector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FragmentSelector {
    /// Region in canvas pixel coordinates.
    Pixel(Rect),
    /// Region as percentages of the canvas dimensions
    /// (`#xywh=percent:x,y,w,h`).
    Percent(Rect),
}

impl FragmentSelector {
    /// Parse the fragment selector off a target URI.
    ///
    /// Returns `None` for targets without a `#xywh=` fragment, or with a
    /// fragment that is not four finite comma-separated numbers with
    /// non-negative width and height.
    pub fn parse(target: &str) -> Option<Self> {
        let (_, fragment) = target.split_once("#xywh=")?;
        let (values, percent) = match fragment.strip_prefix("percent:") {
            Some(rest) => (rest, true),
            None => (fragment, false),
        };

        let parsed: Vec<f64> = values
            .split(',')
            .map(|part| part.trim().parse::<f64>().ok())
            .collect::<Option<Vec<f64>>>()?;
        let [x, y, w, h] = parsed.as_slice() else {
            return None;
        };
        if ![x, y, w, h].iter().all(|v| v.is_finite()) || *w < 0.0 || *h < 0.0 {
            return None;
        }

        let rect = Rect::new(*x, *y, x + w, y + h);
        Some(if percent {
            Self::Percent(rect)
        } else {
            Self::Pixel(rect)
        })
    }

    /// Resolve the selector against a canvas's pixel dimensions.
    pub fn resolve(&self, canvas: &Canvas) -> Rect {
        match self {
            Self::Pixel(rect) => *rect,
            Self::Percent(rect) => Rect::new(
                rect.x0 * canvas.width() / 100.0,
                rect.y0 * canvas.height() / 100.0,
                rect.x1 * canvas.width() / 100.0,
                rect.y1 * canvas.height() / 100.0,
            ),
        }
    }
}

/// One annotation resource: id, motivation tag, target canvas, and the
/// rectangular region of interest on that canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    id: String,
    motivation: Option<String>,
    target_id: Option<String>,
    region: Option<FragmentSelector>,
}

impl Annotation {
    /// Normalize a raw resource object.
    ///
    /// Accepts both presentation-API v2 (`@id`, `on`) and v3 (`id`,
    /// `target`) field names; targets may be a plain URI string, an array
    /// (first entry wins), or an object carrying `full`/`source` plus a
    /// `selector.value` fragment.
    pub fn from_resource(resource: &Value) -> Self {
        let id = string_field(resource, &["@id", "id"]).unwrap_or_default();
        let motivation = motivation_field(resource);
        let target = target_string(resource.get("on").or_else(|| resource.get("target")));
        let target_id = target
            .as_deref()
            .and_then(|t| t.split('#').next())
            .map(str::to_string);
        let region = target.as_deref().and_then(FragmentSelector::parse);
        if region.is_none() {
            log::debug!("annotation {id:?} has no parseable region selector");
        }

        Self {
            id,
            motivation,
            target_id,
            region,
        }
    }

    /// The annotation identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The motivation/type tag, when present.
    pub fn motivation(&self) -> Option<&str> {
        self.motivation.as_deref()
    }

    /// The target canvas id (the target URI with any fragment stripped).
    pub fn target_id(&self) -> Option<&str> {
        self.target_id.as_deref()
    }

    /// The parsed region selector, when present.
    pub fn region(&self) -> Option<&FragmentSelector> {
        self.region.as_ref()
    }

    /// The region in the target canvas's pixel space.
    pub fn region_rect(&self, canvas: &Canvas) -> Option<Rect> {
        self.region.map(|selector| selector.resolve(canvas))
    }
}

/// A set of annotations sharing a source identifier. Created once per
/// fetched resource, immutable after construction.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnnotationList {
    id: String,
    resources: Vec<Annotation>,
}

impl AnnotationList {
    /// Build a list from a raw annotation-list resource object.
    pub fn new(raw: &Value) -> Self {
        let id = string_field(raw, &["@id", "id"]).unwrap_or_default();
        let resources = raw
            .get("resources")
            .or_else(|| raw.get("items"))
            .and_then(Value::as_array)
            .map(|items| items.iter().map(Annotation::from_resource).collect())
            .unwrap_or_default();

        Self { id, resources }
    }

    /// The source identifier of the list.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The normalized annotations, in resource order.
    pub fn resources(&self) -> &[Annotation] {
        &self.resources
    }
}

/// List-level equality used for change detection: same number of lists,
/// and each pairwise list holds the same number of resources with
/// pairwise-equal ids in order. Fields other than the id are ignored, so
/// redundant repaints are skipped when only non-identifying content moved.
pub fn annotations_match(current: &[AnnotationList], previous: &[AnnotationList]) -> bool {
    if current.len() != previous.len() {
        return false;
    }
    current.iter().zip(previous).all(|(c, p)| {
        c.resources.len() == p.resources.len()
            && c.resources
                .iter()
                .zip(&p.resources)
                .all(|(a, b)| a.id == b.id)
    })
}

fn string_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| value.get(*key))
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn motivation_field(resource: &Value) -> Option<String> {
    match resource.get("motivation") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Array(items)) => items.first().and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

fn target_string(raw: Option<&Value>) -> Option<String> {
    match raw? {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => target_string(items.first()),
        Value::Object(map) => {
            let full = map
                .get("full")
                .or_else(|| map.get("source"))
                .and_then(Value::as_str)?;
            match map
                .get("selector")
                .and_then(|selector| selector.get("value"))
                .and_then(Value::as_str)
            {
                Some(value) => Some(format!("{full}#{value}")),
                None => Some(full.to_string()),
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn list(raw: Value) -> AnnotationList {
        AnnotationList::new(&raw)
    }

    #[test]
    fn test_parse_pixel_selector() {
        let selector =
            FragmentSelector::parse("https://example.org/iiif/canvas/1#xywh=10,10,100,200")
                .unwrap();
        assert_eq!(
            selector,
            FragmentSelector::Pixel(Rect::new(10.0, 10.0, 110.0, 210.0))
        );
    }

    #[test]
    fn test_parse_percent_selector_resolves_against_canvas() {
        let selector =
            FragmentSelector::parse("https://example.org/iiif/canvas/1#xywh=percent:10,20,50,25")
                .unwrap();
        let canvas = Canvas::new("c", 1000.0, 2000.0, 0);
        assert_eq!(selector.resolve(&canvas), Rect::new(100.0, 400.0, 600.0, 900.0));
    }

    #[test]
    fn test_malformed_selectors_are_none() {
        assert!(FragmentSelector::parse("https://example.org/canvas/1").is_none());
        assert!(FragmentSelector::parse("c#xywh=").is_none());
        assert!(FragmentSelector::parse("c#xywh=1,2,3").is_none());
        assert!(FragmentSelector::parse("c#xywh=a,b,c,d").is_none());
        assert!(FragmentSelector::parse("c#xywh=0,0,-5,10").is_none());
        assert!(FragmentSelector::parse("c#xywh=0,0,NaN,10").is_none());
    }

    #[test]
    fn test_resource_without_selector_is_retained_without_region() {
        let list = list(json!({
            "@id": "foo",
            "resources": [{ "@id": "rid1", "on": "https://example.org/canvas/1" }],
        }));

        let annotation = &list.resources()[0];
        assert_eq!(annotation.id(), "rid1");
        assert_eq!(annotation.target_id(), Some("https://example.org/canvas/1"));
        assert!(annotation.region().is_none());
    }

    #[test]
    fn test_object_target_with_selector_value() {
        let annotation = Annotation::from_resource(&json!({
            "@id": "rid1",
            "on": {
                "full": "https://example.org/canvas/1",
                "selector": { "@type": "oa:FragmentSelector", "value": "xywh=5,5,10,10" },
            },
        }));

        assert_eq!(annotation.target_id(), Some("https://example.org/canvas/1"));
        assert_eq!(
            annotation.region(),
            Some(&FragmentSelector::Pixel(Rect::new(5.0, 5.0, 15.0, 15.0)))
        );
    }

    #[test]
    fn test_motivation_accepts_string_or_array() {
        let single = Annotation::from_resource(&json!({ "@id": "a", "motivation": "sc:painting" }));
        assert_eq!(single.motivation(), Some("sc:painting"));

        let multi = Annotation::from_resource(&json!({
            "@id": "a",
            "motivation": ["oa:commenting", "oa:tagging"],
        }));
        assert_eq!(multi.motivation(), Some("oa:commenting"));
    }

    #[test]
    fn test_v3_target_field_names() {
        let annotation = Annotation::from_resource(&json!({
            "id": "rid1",
            "target": "https://example.org/canvas/1#xywh=1,2,3,4",
        }));
        assert_eq!(annotation.id(), "rid1");
        assert_eq!(annotation.target_id(), Some("https://example.org/canvas/1"));
        assert!(annotation.region().is_some());
    }

    #[test]
    fn test_match_is_false_for_different_lengths() {
        let current = vec![list(json!({ "@id": "1", "resources": [{ "@id": "rid1" }] }))];
        let previous = vec![
            list(json!({ "@id": "1", "resources": [{ "@id": "rid1" }] })),
            list(json!({ "@id": "2", "resources": [{ "@id": "rid2" }] })),
        ];

        assert!(!annotations_match(&current, &previous));
    }

    #[test]
    fn test_match_is_true_when_resource_ids_match() {
        let current = vec![list(json!({
            "@id": "1",
            "resources": [{ "@id": "rid1", "motivation": "sc:painting" }],
        }))];
        let previous = vec![list(json!({
            "@id": "1",
            "resources": [{ "@id": "rid1", "motivation": "oa:commenting" }],
        }))];

        assert!(annotations_match(&current, &previous));
    }

    #[test]
    fn test_match_is_true_for_empty_inputs() {
        assert!(annotations_match(&[], &[]));

        let current = vec![list(json!({ "@id": "1", "resources": [] }))];
        let previous = vec![list(json!({ "@id": "1", "resources": [] }))];
        assert!(annotations_match(&current, &previous));
    }

    #[test]
    fn test_match_is_false_when_resource_ids_differ() {
        let current = vec![list(json!({ "@id": "1", "resources": [{ "@id": "rid1" }] }))];
        let previous = vec![list(json!({ "@id": "1", "resources": [{ "@id": "rid2" }] }))];

        assert!(!annotations_match(&current, &previous));
    }
}
