use crate::annotation::{Annotation, AnnotationBody, AnnotationId, Point, Rect};

/// A screen-space element of the annotation overlay.
#[derive(Clone, Debug, PartialEq)]
pub enum OverlayItem {
    Label {
        id: AnnotationId,
        at: Point,
        text: String,
        font_px: f64,
        color: String,
    },
    Stroke {
        id: AnnotationId,
        points: Vec<Point>,
        color: String,
        line_width: f64,
    },
    Fill {
        id: AnnotationId,
        rect: Rect,
        color: String,
    },
}

impl OverlayItem {
    pub fn id(&self) -> AnnotationId {
        match self {
            OverlayItem::Label { id, .. }
            | OverlayItem::Stroke { id, .. }
            | OverlayItem::Fill { id, .. } => *id,
        }
    }
}

pub fn overlay_item(annotation: &Annotation, scale: f64) -> OverlayItem {
    let id = annotation.id;
    match &annotation.body {
        AnnotationBody::Text {
            x,
            y,
            text,
            font_size,
            color,
        } => OverlayItem::Label {
            id,
            at: Point::new(*x, *y).scaled(scale),
            text: text.clone(),
            font_px: font_size * scale,
            color: color.clone(),
        },
        AnnotationBody::Drawing {
            path,
            color,
            line_width,
        } => OverlayItem::Stroke {
            id,
            points: path.iter().map(|point| point.scaled(scale)).collect(),
            color: color.clone(),
            line_width: line_width * scale,
        },
        AnnotationBody::Highlight { region, color } => OverlayItem::Fill {
            id,
            rect: region.scaled(scale),
            color: color.clone(),
        },
    }
}

/// Annotations of `page` in insertion order, converted to screen space.
pub fn overlay_for_page<'a>(
    annotations: impl IntoIterator<Item = &'a Annotation>,
    page: u32,
    scale: f64,
) -> Vec<OverlayItem> {
    annotations
        .into_iter()
        .filter(|annotation| annotation.page == page)
        .map(|annotation| overlay_item(annotation, scale))
        .collect()
}
