use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_COLOR: &str = "#000000";
pub const DEFAULT_HIGHLIGHT_COLOR: &str = "#ffff00";
pub const DEFAULT_FONT_SIZE: f64 = 16.0;
pub const DEFAULT_LINE_WIDTH: f64 = 2.0;

/// A position in document space (100% zoom). Serialized as `[x, y]`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn scaled(self, scale: f64) -> Self {
        Self {
            x: self.x * scale,
            y: self.y * scale,
        }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f64; 2] {
    fn from(point: Point) -> Self {
        [point.x, point.y]
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn scaled(&self, scale: f64) -> Self {
        Self {
            x: self.x * scale,
            y: self.y * scale,
            width: self.width * scale,
            height: self.height * scale,
        }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    /// Flips negative extents so the rect always grows right and down.
    fn normalized(self) -> Self {
        let (x, width) = if self.width < 0.0 {
            (self.x + self.width, -self.width)
        } else {
            (self.x, self.width)
        };
        let (y, height) = if self.height < 0.0 {
            (self.y + self.height, -self.height)
        } else {
            (self.y, self.height)
        };
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct AnnotationId(u64);

impl AnnotationId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AnnotationBody {
    #[serde(rename_all = "camelCase")]
    Text {
        x: f64,
        y: f64,
        text: String,
        font_size: f64,
        color: String,
    },
    #[serde(rename_all = "camelCase")]
    Drawing {
        path: Vec<Point>,
        color: String,
        line_width: f64,
    },
    #[serde(rename_all = "camelCase")]
    Highlight { region: Rect, color: String },
}

impl AnnotationBody {
    /// The point a drag moves: text origin, first stroke point, or region corner.
    pub fn anchor(&self) -> Point {
        match self {
            AnnotationBody::Text { x, y, .. } => Point::new(*x, *y),
            AnnotationBody::Drawing { path, .. } => {
                path.first().copied().unwrap_or(Point::new(0.0, 0.0))
            }
            AnnotationBody::Highlight { region, .. } => region.origin(),
        }
    }

    pub fn moved_to(&self, target: Point) -> Self {
        let anchor = self.anchor();
        let dx = target.x - anchor.x;
        let dy = target.y - anchor.y;
        let mut body = self.clone();
        match &mut body {
            AnnotationBody::Text { x, y, .. } => {
                *x = target.x;
                *y = target.y;
            }
            AnnotationBody::Drawing { path, .. } => {
                for point in path.iter_mut() {
                    *point = point.offset(dx, dy);
                }
            }
            AnnotationBody::Highlight { region, .. } => {
                region.x = target.x;
                region.y = target.y;
            }
        }
        body
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AnnotationBody::Text { .. } => "text",
            AnnotationBody::Drawing { .. } => "drawing",
            AnnotationBody::Highlight { .. } => "highlight",
        }
    }
}

/// A stored annotation. On the wire it is one flat object with a `type` tag.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Annotation {
    pub id: AnnotationId,
    pub page: u32,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub body: AnnotationBody,
}

impl Annotation {
    pub fn anchor(&self) -> Point {
        self.body.anchor()
    }

    pub fn moved_to(&self, target: Point) -> Self {
        Self {
            body: self.body.moved_to(target),
            ..self.clone()
        }
    }
}

/// User input that has not been assigned an id yet.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotationDraft {
    pub page: u32,
    pub body: AnnotationBody,
}

impl AnnotationDraft {
    pub fn text(page: u32, at: Point, text: impl Into<String>, font_size: f64, color: String) -> Self {
        Self {
            page,
            body: AnnotationBody::Text {
                x: at.x,
                y: at.y,
                text: text.into(),
                font_size,
                color,
            },
        }
    }

    pub fn drawing(page: u32, path: Vec<Point>, color: String, line_width: f64) -> Self {
        Self {
            page,
            body: AnnotationBody::Drawing {
                path,
                color,
                line_width,
            },
        }
    }

    pub fn highlight(page: u32, region: Rect, color: String) -> Self {
        Self {
            page,
            body: AnnotationBody::Highlight { region, color },
        }
    }

    /// Normalizes raw input. Returns `None` for input that would not produce a
    /// visible mark: blank text, strokes with fewer than two points, empty
    /// regions, or non-finite coordinates.
    pub fn sanitize(self) -> Option<Self> {
        if self.page == 0 {
            return None;
        }
        let body = match self.body {
            AnnotationBody::Text {
                x,
                y,
                text,
                font_size,
                color,
            } => {
                if text.trim().is_empty() || !Point::new(x, y).is_finite() {
                    return None;
                }
                AnnotationBody::Text {
                    x,
                    y,
                    text,
                    font_size: sanitize_font_size(font_size),
                    color: sanitize_color(color, DEFAULT_COLOR),
                }
            }
            AnnotationBody::Drawing {
                path,
                color,
                line_width,
            } => {
                let path = path.into_iter().filter(|point| point.is_finite()).collect::<Vec<_>>();
                if path.len() < 2 {
                    return None;
                }
                AnnotationBody::Drawing {
                    path,
                    color: sanitize_color(color, DEFAULT_COLOR),
                    line_width: sanitize_line_width(line_width),
                }
            }
            AnnotationBody::Highlight { region, color } => {
                if !region.is_finite() {
                    return None;
                }
                let region = region.normalized();
                if region.width == 0.0 || region.height == 0.0 {
                    return None;
                }
                AnnotationBody::Highlight {
                    region,
                    color: sanitize_color(color, DEFAULT_HIGHLIGHT_COLOR),
                }
            }
        };
        Some(Self {
            page: self.page,
            body,
        })
    }
}

const MAX_COLOR_CHARS: usize = 32;

pub fn sanitize_color(mut color: String, fallback: &str) -> String {
    if color.is_empty() {
        return fallback.to_string();
    }
    if let Some((end, _)) = color.char_indices().nth(MAX_COLOR_CHARS) {
        color.truncate(end);
    }
    color
}

pub fn sanitize_font_size(size: f64) -> f64 {
    let size = if size.is_finite() { size } else { DEFAULT_FONT_SIZE };
    size.max(6.0).min(144.0)
}

pub fn sanitize_line_width(width: f64) -> f64 {
    let width = if width.is_finite() { width } else { DEFAULT_LINE_WIDTH };
    width.max(0.5).min(60.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(body: AnnotationBody) -> Annotation {
        Annotation {
            id: AnnotationId::new(7),
            page: 2,
            timestamp: "2024-05-01T12:00:00Z".parse().unwrap(),
            body,
        }
    }

    #[test]
    fn text_annotation_serializes_flat_with_type_tag() {
        let annotation = stored(AnnotationBody::Text {
            x: 100.0,
            y: 50.0,
            text: "Hello".into(),
            font_size: 14.0,
            color: "#ff0000".into(),
        });
        let value = serde_json::to_value(&annotation).unwrap();
        assert_eq!(value["type"], "text");
        assert_eq!(value["id"], 7);
        assert_eq!(value["page"], 2);
        assert_eq!(value["fontSize"], 14.0);
        assert_eq!(value["x"], 100.0);
        assert!(value["timestamp"].as_str().unwrap().starts_with("2024-05-01T12:00:00"));
    }

    #[test]
    fn drawing_path_uses_coordinate_pairs() {
        let raw = r##"{
            "id": 3,
            "page": 1,
            "timestamp": "2024-05-01T12:00:00Z",
            "type": "drawing",
            "path": [[1.0, 2.0], [3.5, 4.5]],
            "color": "#00ff00",
            "lineWidth": 2
        }"##;
        let annotation: Annotation = serde_json::from_str(raw).unwrap();
        match &annotation.body {
            AnnotationBody::Drawing { path, line_width, .. } => {
                assert_eq!(path, &vec![Point::new(1.0, 2.0), Point::new(3.5, 4.5)]);
                assert_eq!(*line_width, 2.0);
            }
            other => panic!("unexpected body {other:?}"),
        }
        let value = serde_json::to_value(&annotation).unwrap();
        assert_eq!(value["path"][1], serde_json::json!([3.5, 4.5]));
    }

    #[test]
    fn moving_a_drawing_translates_every_point() {
        let body = AnnotationBody::Drawing {
            path: vec![Point::new(10.0, 10.0), Point::new(20.0, 30.0)],
            color: "#000".into(),
            line_width: 2.0,
        };
        let moved = body.moved_to(Point::new(15.0, 5.0));
        match moved {
            AnnotationBody::Drawing { path, .. } => {
                assert_eq!(path, vec![Point::new(15.0, 5.0), Point::new(25.0, 25.0)]);
            }
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[test]
    fn moving_a_highlight_keeps_its_size() {
        let body = AnnotationBody::Highlight {
            region: Rect {
                x: 1.0,
                y: 2.0,
                width: 30.0,
                height: 10.0,
            },
            color: DEFAULT_HIGHLIGHT_COLOR.into(),
        };
        let moved = body.moved_to(Point::new(40.0, 50.0));
        assert_eq!(moved.anchor(), Point::new(40.0, 50.0));
        match moved {
            AnnotationBody::Highlight { region, .. } => {
                assert_eq!(region.width, 30.0);
                assert_eq!(region.height, 10.0);
            }
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[test]
    fn sanitize_rejects_blank_text_and_short_strokes() {
        let blank = AnnotationDraft::text(1, Point::new(0.0, 0.0), "   ", 12.0, "#000".into());
        assert!(blank.sanitize().is_none());

        let dot = AnnotationDraft::drawing(1, vec![Point::new(1.0, 1.0)], "#000".into(), 2.0);
        assert!(dot.sanitize().is_none());

        let nan = AnnotationDraft::drawing(
            1,
            vec![Point::new(1.0, 1.0), Point::new(f64::NAN, 2.0)],
            "#000".into(),
            2.0,
        );
        assert!(nan.sanitize().is_none());
    }

    #[test]
    fn sanitize_fills_defaults_and_normalizes_regions() {
        let draft = AnnotationDraft::highlight(
            3,
            Rect {
                x: 50.0,
                y: 40.0,
                width: -20.0,
                height: -10.0,
            },
            String::new(),
        );
        let draft = draft.sanitize().unwrap();
        match draft.body {
            AnnotationBody::Highlight { region, color } => {
                assert_eq!(color, DEFAULT_HIGHLIGHT_COLOR);
                assert_eq!(region.origin(), Point::new(30.0, 30.0));
                assert_eq!(region.width, 20.0);
            }
            other => panic!("unexpected body {other:?}"),
        }

        let text = AnnotationDraft::text(1, Point::new(5.0, 5.0), "hi", f64::NAN, String::new())
            .sanitize()
            .unwrap();
        match text.body {
            AnnotationBody::Text { font_size, color, .. } => {
                assert_eq!(font_size, DEFAULT_FONT_SIZE);
                assert_eq!(color, DEFAULT_COLOR);
            }
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[test]
    fn long_colors_are_cut_on_a_char_boundary() {
        let euro = sanitize_color("€".repeat(40), DEFAULT_COLOR);
        assert_eq!(euro.chars().count(), 32);
        assert!(euro.chars().all(|c| c == '€'));

        let mixed = sanitize_color(format!("{}é{}", "a".repeat(31), "b".repeat(5)), DEFAULT_COLOR);
        assert_eq!(mixed, format!("{}é", "a".repeat(31)));

        assert_eq!(sanitize_color("€".repeat(11), DEFAULT_COLOR), "€".repeat(11));
        assert_eq!(sanitize_color("#336699".into(), DEFAULT_COLOR), "#336699");
    }
}
