use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement};

use pdfedit_shared::viewport::THUMBNAIL_SCALE;
use pdfedit_shared::{OverlayItem, Point, Rect};

use crate::dom::{set_class, set_style, ANNOTATION_ID_ATTR};
use crate::pdfjs::PdfDocument;
use crate::state::{Gesture, State, Surface};

const LABEL_CLASS: &str = "text-annotation";
const HIGHLIGHT_ALPHA: f64 = 0.3;
const PREVIEW_HIGHLIGHT: &str = "#ffff00";

pub fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    let context = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("Missing canvas context"))?
        .dyn_into::<CanvasRenderingContext2d>()?;
    Ok(context)
}

/// Renders the current page. The page image is rasterized off screen and only
/// copied to the visible canvas if no newer render was started meanwhile.
pub async fn render_page(state: Rc<RefCell<State>>) {
    let (document, ticket) = {
        let mut state = state.borrow_mut();
        let Some(document) = state.document.clone() else {
            return;
        };
        let ticket = state.editor.begin_render();
        (document, ticket)
    };

    let rendered = match document.render(ticket.page, ticket.scale).await {
        Ok(canvas) => canvas,
        Err(err) => {
            log::error!("rendering page {} failed: {err:?}", ticket.page);
            return;
        }
    };

    let state = state.borrow();
    if !state.editor.is_current(&ticket) {
        return;
    }
    if let Err(err) = present(&state.surface, &rendered) {
        log::error!("presenting page {} failed: {err:?}", ticket.page);
        return;
    }
    paint_overlay(&state);
}

fn present(surface: &Surface, rendered: &HtmlCanvasElement) -> Result<(), JsValue> {
    let width = rendered.width();
    let height = rendered.height();
    surface.page_canvas.set_width(width);
    surface.page_canvas.set_height(height);
    context_2d(&surface.page_canvas)?.draw_image_with_html_canvas_element(rendered, 0.0, 0.0)?;

    surface.overlay.set_width(width);
    surface.overlay.set_height(height);
    set_style(&surface.layer, "width", &format!("{width}px"));
    set_style(&surface.layer, "height", &format!("{height}px"));
    Ok(())
}

/// Replays the overlay of the current page plus any gesture preview.
pub fn paint_overlay(state: &State) {
    let surface = &state.surface;
    let ctx = &surface.overlay_ctx;
    ctx.clear_rect(
        0.0,
        0.0,
        surface.overlay.width() as f64,
        surface.overlay.height() as f64,
    );
    clear_labels(&surface.layer);

    let Some(document) = surface.layer.owner_document() else {
        return;
    };
    for item in state.editor.overlay() {
        let selected = state.selected == Some(item.id());
        match item {
            OverlayItem::Stroke {
                points,
                color,
                line_width,
                ..
            } => draw_polyline(ctx, &points, &color, line_width),
            OverlayItem::Fill { rect, color, .. } => fill_region(ctx, &rect, &color),
            OverlayItem::Label {
                id,
                at,
                text,
                font_px,
                color,
            } => {
                let label = Label {
                    id: id.get(),
                    at,
                    text: &text,
                    font_px,
                    color: &color,
                    selected,
                };
                if let Err(err) = add_label(&document, &surface.layer, &label) {
                    log::warn!("could not place label {id}: {err:?}");
                }
            }
        }
    }

    match &state.gesture {
        Gesture::Drawing { points } => {
            let width = state.line_width * state.editor.scale();
            draw_polyline(ctx, points, &state.color, width)
        }
        Gesture::Highlighting { start, current } => {
            fill_region(ctx, &rect_between(*start, *current), PREVIEW_HIGHLIGHT)
        }
        Gesture::Idle | Gesture::Dragging { .. } => {}
    }
}

pub fn rect_between(a: Point, b: Point) -> Rect {
    Rect {
        x: a.x.min(b.x),
        y: a.y.min(b.y),
        width: (a.x - b.x).abs(),
        height: (a.y - b.y).abs(),
    }
}

fn draw_polyline(ctx: &CanvasRenderingContext2d, points: &[Point], color: &str, width: f64) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    ctx.save();
    ctx.set_stroke_style_str(color);
    ctx.set_line_width(width);
    ctx.set_line_cap("round");
    ctx.set_line_join("round");
    ctx.begin_path();
    ctx.move_to(first.x, first.y);
    for point in rest {
        ctx.line_to(point.x, point.y);
    }
    ctx.stroke();
    ctx.restore();
}

fn fill_region(ctx: &CanvasRenderingContext2d, rect: &Rect, color: &str) {
    ctx.save();
    ctx.set_global_alpha(HIGHLIGHT_ALPHA);
    ctx.set_fill_style_str(color);
    ctx.fill_rect(rect.x, rect.y, rect.width, rect.height);
    ctx.restore();
}

struct Label<'a> {
    id: u64,
    at: Point,
    text: &'a str,
    font_px: f64,
    color: &'a str,
    selected: bool,
}

fn add_label(document: &Document, layer: &HtmlElement, item: &Label<'_>) -> Result<(), JsValue> {
    let label: HtmlElement = document.create_element("div")?.dyn_into()?;
    label.set_class_name(LABEL_CLASS);
    set_class(&label, "selected", item.selected);
    label.set_attribute(ANNOTATION_ID_ATTR, &item.id.to_string())?;
    label.set_text_content(Some(item.text));
    set_style(&label, "position", "absolute");
    set_style(&label, "left", &format!("{}px", item.at.x));
    set_style(&label, "top", &format!("{}px", item.at.y));
    set_style(&label, "font-size", &format!("{}px", item.font_px));
    set_style(&label, "color", item.color);
    set_style(&label, "white-space", "pre");
    layer.append_child(&label)?;
    Ok(())
}

fn clear_labels(layer: &HtmlElement) {
    let Ok(nodes) = layer.query_selector_all(&format!(".{LABEL_CLASS}")) else {
        return;
    };
    for index in 0..nodes.length() {
        if let Some(node) = nodes.item(index) {
            let _ = layer.remove_child(&node);
        }
    }
}

/// Fills `container` with small renders of the leading pages. Each entry
/// carries `data-page` for click delegation.
pub async fn render_thumbnails(document: PdfDocument, container: HtmlElement, pages: Vec<u32>) {
    let Some(owner) = container.owner_document() else {
        return;
    };
    container.set_inner_html("");
    for page in pages {
        let canvas = match document.render(page, THUMBNAIL_SCALE).await {
            Ok(canvas) => canvas,
            Err(err) => {
                log::warn!("thumbnail for page {page} failed: {err:?}");
                continue;
            }
        };
        if let Err(err) = append_thumbnail(&owner, &container, page, &canvas) {
            log::warn!("thumbnail for page {page} not shown: {err:?}");
        }
    }
}

fn append_thumbnail(
    document: &Document,
    container: &HtmlElement,
    page: u32,
    canvas: &HtmlCanvasElement,
) -> Result<(), JsValue> {
    let item = document.create_element("div")?;
    item.set_class_name("thumbnail");
    item.set_attribute("data-page", &page.to_string())?;
    item.append_child(canvas)?;
    let label = document.create_element("span")?;
    label.set_text_content(Some(&format!("Page {page}")));
    item.append_child(&label)?;
    container.append_child(&item)?;
    Ok(())
}

pub fn mark_active_thumbnail(container: &HtmlElement, page: u32) {
    let Ok(nodes) = container.query_selector_all(".thumbnail") else {
        return;
    };
    for index in 0..nodes.length() {
        let Some(element) = nodes
            .item(index)
            .and_then(|node| node.dyn_into::<web_sys::Element>().ok())
        else {
            continue;
        };
        let active = element.get_attribute("data-page").as_deref() == Some(page.to_string().as_str());
        set_class(&element, "active", active);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_rect_is_normalized_whatever_the_drag_direction() {
        let rect = rect_between(Point::new(40.0, 10.0), Point::new(10.0, 30.0));
        assert_eq!(
            rect,
            Rect {
                x: 10.0,
                y: 10.0,
                width: 30.0,
                height: 20.0
            }
        );
    }
}
