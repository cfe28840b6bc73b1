use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, MouseEvent};

use pdfedit_shared::{AnnotationId, Point};

pub const ANNOTATION_ID_ATTR: &str = "data-annotation-id";

pub fn get_element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing element: {id}")))?;
    element
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Invalid element type: {id}")))
}

/// Like [`get_element`], for controls that only some pages carry.
pub fn find_element<T: JsCast>(document: &Document, id: &str) -> Option<T> {
    document
        .get_element_by_id(id)
        .and_then(|element| element.dyn_into::<T>().ok())
}

pub fn query<T: JsCast>(root: &Element, selector: &str) -> Option<T> {
    root.query_selector(selector)
        .ok()
        .flatten()
        .and_then(|element| element.dyn_into::<T>().ok())
}

pub fn query_all(document: &Document, selector: &str) -> Vec<HtmlElement> {
    let Ok(nodes) = document.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|index| nodes.item(index))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect()
}

pub fn set_class(element: &Element, class: &str, on: bool) {
    let list = element.class_list();
    let _ = if on {
        list.add_1(class)
    } else {
        list.remove_1(class)
    };
}

pub fn set_disabled(element: &Element, disabled: bool) {
    let _ = if disabled {
        element.set_attribute("disabled", "")
    } else {
        element.remove_attribute("disabled")
    };
}

pub fn set_text(document: &Document, id: &str, text: &str) {
    if let Some(element) = document.get_element_by_id(id) {
        element.set_text_content(Some(text));
    }
}

pub fn set_style(element: &HtmlElement, property: &str, value: &str) {
    let _ = element.style().set_property(property, value);
}

/// Pointer position relative to the top-left corner of `layer`.
pub fn event_to_point(layer: &Element, event: &MouseEvent) -> Option<Point> {
    let rect = layer.get_bounding_client_rect();
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return None;
    }
    let point = Point::new(
        event.client_x() as f64 - rect.left(),
        event.client_y() as f64 - rect.top(),
    );
    point.is_finite().then_some(point)
}

/// Id of the annotation element under `target`, if any.
pub fn annotation_at(target: Option<web_sys::EventTarget>) -> Option<AnnotationId> {
    let element = target?.dyn_into::<Element>().ok()?;
    let owner = element
        .closest(&format!("[{ANNOTATION_ID_ATTR}]"))
        .ok()
        .flatten()?;
    let raw = owner.get_attribute(ANNOTATION_ID_ATTR)?;
    raw.parse::<u64>().ok().map(AnnotationId::new)
}

pub fn navigate(href: &str) {
    if let Some(window) = web_sys::window() {
        if let Err(err) = window.location().set_href(href) {
            log::error!("navigation to {href} failed: {err:?}");
        }
    }
}
