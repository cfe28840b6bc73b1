use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, HtmlElement};

use pdfedit_shared::{AnnotationDraft, AnnotationId, Point, Redraw};

use crate::dom::{find_element, query, set_disabled, set_style, set_text, ANNOTATION_ID_ATTR};
use crate::render::{mark_active_thumbnail, paint_overlay, rect_between, render_page};
use crate::state::{Gesture, State, Tool};
use crate::toast::ToastView;

/// Editor page elements that reflect state outside the canvas.
#[derive(Clone)]
pub struct Ui {
    pub document: Document,
    pub toast: ToastView,
    pub undo: Option<Element>,
    pub redo: Option<Element>,
    pub thumbnails: Option<HtmlElement>,
}

impl Ui {
    pub fn new(document: &Document, toast: ToastView) -> Self {
        Self {
            document: document.clone(),
            toast,
            undo: find_element(document, "undoBtn"),
            redo: find_element(document, "redoBtn"),
            thumbnails: find_element(document, "pagesThumbnails"),
        }
    }
}

pub fn refresh(state: &Rc<RefCell<State>>, ui: &Ui, redraw: Redraw) {
    match redraw {
        Redraw::Nothing => {}
        Redraw::Overlay => paint_overlay(&state.borrow()),
        Redraw::Page => spawn_local(render_page(state.clone())),
    }
    sync_controls(&state.borrow(), ui);
}

pub fn sync_controls(state: &State, ui: &Ui) {
    let viewport = state.editor.viewport();
    let store = state.editor.store();
    if let Some(undo) = &ui.undo {
        set_disabled(undo, !store.can_undo());
    }
    if let Some(redo) = &ui.redo {
        set_disabled(redo, !store.can_redo());
    }
    set_text(&ui.document, "currentPage", &viewport.page().to_string());
    set_text(&ui.document, "totalPages", &viewport.total_pages().to_string());
    set_text(&ui.document, "zoomLevel", &viewport.zoom_label());
    if let Some(thumbnails) = &ui.thumbnails {
        mark_active_thumbnail(thumbnails, viewport.page());
    }
}

/// Pointer down on the annotation layer. `hit` is the label under the
/// pointer, if any.
pub fn begin_gesture(state: &mut State, at: Point, hit: Option<AnnotationId>) -> Redraw {
    match state.tool {
        Tool::Select => {
            let previous = state.selected.take();
            if let Some(id) = hit {
                if let Some(annotation) = state.editor.store().get(id) {
                    let anchor = state.editor.viewport().to_screen(annotation.anchor());
                    state.selected = Some(id);
                    state.gesture = Gesture::Dragging {
                        id,
                        grab: Point::new(at.x - anchor.x, at.y - anchor.y),
                    };
                }
            }
            if previous != state.selected {
                Redraw::Overlay
            } else {
                Redraw::Nothing
            }
        }
        Tool::Draw => {
            state.gesture = Gesture::Drawing { points: vec![at] };
            Redraw::Nothing
        }
        Tool::Highlight => {
            state.gesture = Gesture::Highlighting {
                start: at,
                current: at,
            };
            Redraw::Nothing
        }
        Tool::Text => Redraw::Nothing,
    }
}

pub fn extend_gesture(state: &mut State, at: Point) -> Redraw {
    match &mut state.gesture {
        Gesture::Drawing { points } => {
            if points.last() != Some(&at) {
                points.push(at);
            }
            Redraw::Overlay
        }
        Gesture::Highlighting { current, .. } => {
            *current = at;
            Redraw::Overlay
        }
        Gesture::Dragging { id, grab } => {
            let selector = format!("[{ANNOTATION_ID_ATTR}=\"{id}\"]");
            if let Some(label) = query::<HtmlElement>(&state.surface.layer, &selector) {
                set_style(&label, "left", &format!("{}px", at.x - grab.x));
                set_style(&label, "top", &format!("{}px", at.y - grab.y));
            }
            Redraw::Nothing
        }
        Gesture::Idle => Redraw::Nothing,
    }
}

/// Pointer up: turns the finished gesture into an edit.
pub fn finish_gesture(state: &mut State, at: Option<Point>) -> Redraw {
    let gesture = std::mem::replace(&mut state.gesture, Gesture::Idle);
    let page = state.editor.page();
    let scale = state.editor.scale();
    match gesture {
        Gesture::Idle => Redraw::Nothing,
        Gesture::Drawing { mut points } => {
            if let Some(at) = at {
                if points.last() != Some(&at) {
                    points.push(at);
                }
            }
            let path = points.into_iter().map(|point| point.scaled(1.0 / scale)).collect();
            let draft = AnnotationDraft::drawing(page, path, state.color.clone(), state.line_width);
            commit(state, draft)
        }
        Gesture::Highlighting { start, current } => {
            let end = at.unwrap_or(current);
            let region = rect_between(start, end).scaled(1.0 / scale);
            let draft = AnnotationDraft::highlight(
                page,
                region,
                pdfedit_shared::annotation::DEFAULT_HIGHLIGHT_COLOR.to_string(),
            );
            commit(state, draft)
        }
        Gesture::Dragging { id, grab } => {
            let Some(at) = at else {
                return Redraw::Overlay;
            };
            let target = state
                .editor
                .to_document(Point::new(at.x - grab.x, at.y - grab.y));
            match state.editor.move_annotation(id, target) {
                // Snap the label back to its stored position.
                Redraw::Nothing => Redraw::Overlay,
                redraw => redraw,
            }
        }
    }
}

/// Adds a text annotation at a layer position.
pub fn place_text(state: &mut State, at: Point, text: &str) -> Redraw {
    let page = state.editor.page();
    let origin = state.editor.to_document(at);
    let draft = AnnotationDraft::text(page, origin, text, state.font_size, state.color.clone());
    commit(state, draft)
}

fn commit(state: &mut State, draft: AnnotationDraft) -> Redraw {
    match draft.sanitize().and_then(|draft| state.editor.add(draft)) {
        Some((_, redraw)) => redraw,
        // The discarded preview still has to be wiped.
        None => Redraw::Overlay,
    }
}

pub fn delete_selected(state: &mut State) -> Redraw {
    match state.selected.take() {
        Some(id) => state.editor.delete(id),
        None => Redraw::Nothing,
    }
}

pub fn set_tool(state: &mut State, document: &Document, tool: Tool) {
    state.tool = tool;
    state.gesture = Gesture::Idle;
    for button in crate::dom::query_all(document, ".tool-btn[data-tool]") {
        let active = button.get_attribute("data-tool").as_deref() == Some(tool.name());
        crate::dom::set_class(&button, "active", active);
    }
    let panel_id = format!("{}Panel", tool.name());
    for panel in crate::dom::query_all(document, ".tool-panel") {
        crate::dom::set_class(&panel, "hidden", panel.id() != panel_id);
    }
    set_style(&state.surface.layer, "cursor", tool.cursor());
}

pub fn set_font_size(state: &mut State, raw: &str) {
    if let Ok(size) = raw.trim().parse::<f64>() {
        state.font_size = pdfedit_shared::annotation::sanitize_font_size(size);
    }
}

pub fn set_color(state: &mut State, raw: String) {
    state.color = pdfedit_shared::annotation::sanitize_color(raw, pdfedit_shared::annotation::DEFAULT_COLOR);
}
