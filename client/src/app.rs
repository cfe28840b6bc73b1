use std::cell::{Cell, RefCell};
use std::rc::Rc;

use js_sys::Reflect;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    Document, Element, Event, EventTarget, HtmlCanvasElement, HtmlElement, HtmlInputElement,
    HtmlTextAreaElement, KeyboardEvent, PointerEvent, Window,
};

use pdfedit_shared::api::{ConvertFormat, ConvertResult};
use pdfedit_shared::{ApiError, Point, Redraw};

use crate::actions::{
    begin_gesture, delete_selected, extend_gesture, finish_gesture, place_text, refresh,
    set_color, set_font_size, set_tool, sync_controls, Ui,
};
use crate::config::{query_param, search_of, ClientConfig};
use crate::dom::{
    annotation_at, event_to_point, find_element, get_element, navigate, query_all, set_class,
    set_style, set_text,
};
use crate::net::ApiClient;
use crate::pdfjs::PdfDocument;
use crate::persistence::{init_theme, save_blob};
use crate::render::{context_2d, render_thumbnails};
use crate::state::{Gesture, State, Surface, Tool};
use crate::toast::ToastView;
use crate::{logger, upload};

type Shared = Rc<RefCell<State>>;

fn document_ready_state(document: &Document) -> Option<String> {
    Reflect::get(document.as_ref(), &JsValue::from_str("readyState"))
        .ok()?
        .as_string()
}

fn js_error_message(err: &JsValue) -> String {
    if let Some(text) = err.as_string() {
        return text;
    }
    Reflect::get(err, &JsValue::from_str("message"))
        .ok()
        .and_then(|message| message.as_string())
        .unwrap_or_else(|| format!("{err:?}"))
}

/// Toast text for a failed backend call. Backend-reported errors keep the
/// action context, transport failures do not.
fn failure_message(context: &str, err: &ApiError) -> String {
    match err {
        ApiError::Application(message) => format!("{context}: {message}"),
        other => format!("Error: {other}"),
    }
}

fn listen(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Binds a click handler if the page has an element with `id`.
fn on_click(document: &Document, id: &str, mut handler: impl FnMut() + 'static) -> Result<(), JsValue> {
    match document.get_element_by_id(id) {
        Some(element) => listen(&element, "click", move |_| handler()),
        None => Ok(()),
    }
}

fn is_text_entry(target: Option<EventTarget>) -> bool {
    let Some(element) = target.and_then(|target| target.dyn_into::<Element>().ok()) else {
        return false;
    };
    matches!(element.tag_name().as_str(), "INPUT" | "TEXTAREA")
        || element.has_attribute("contenteditable")
}

#[wasm_bindgen(start)]
pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;

    if document_ready_state(&document).as_deref() != Some("loading") {
        return start_app();
    }

    let started = Rc::new(Cell::new(false));
    listen(&document, "DOMContentLoaded", move |_| {
        if started.replace(true) {
            return;
        }
        if let Err(err) = start_app() {
            web_sys::console::error_1(&err);
        }
    })
}

fn start_app() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;

    let config = ClientConfig::from_window(&window)?;
    logger::init(config.debug);
    log::debug!("starting with api base {}", config.api_base);

    init_theme(&window, &document)?;
    let toast = ToastView::attach(&document, config.toast_duration_ms)?;

    if document.get_element_by_id("pdfCanvas").is_some() {
        start_editor(&window, &document, &config, toast)
    } else if document.get_element_by_id("dropZone").is_some() {
        upload::start(&window, &document, config, toast)
    } else if document.get_element_by_id("chatForm").is_some() {
        start_chat(&window, &document, &config, toast)
    } else {
        Ok(())
    }
}

fn overlay_canvas(document: &Document, layer: &HtmlElement) -> Result<HtmlCanvasElement, JsValue> {
    let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    canvas.set_class_name("annotation-canvas");
    set_style(&canvas, "position", "absolute");
    set_style(&canvas, "left", "0");
    set_style(&canvas, "top", "0");
    set_style(&canvas, "pointer-events", "none");
    layer.append_child(&canvas)?;
    Ok(canvas)
}

fn start_editor(
    window: &Window,
    document: &Document,
    config: &ClientConfig,
    toast: ToastView,
) -> Result<(), JsValue> {
    let search = search_of(window);
    let Some(file_id) = query_param(&search, "fileId").filter(|id| !id.is_empty()) else {
        toast.error("No PDF file selected");
        navigate("index.html");
        return Ok(());
    };
    let file_name = query_param(&search, "name")
        .and_then(|raw| js_sys::decode_uri_component(&raw).ok())
        .map(String::from)
        .unwrap_or_default();

    let page_canvas: HtmlCanvasElement = get_element(document, "pdfCanvas")?;
    let layer: HtmlElement = get_element(document, "annotationLayer")?;
    let overlay = overlay_canvas(document, &layer)?;
    let overlay_ctx = context_2d(&overlay)?;
    let surface = Surface {
        page_canvas,
        layer: layer.clone(),
        overlay,
        overlay_ctx,
    };

    let api = ApiClient::new(config.api_base.clone());
    let state: Shared = Rc::new(RefCell::new(State::new(
        api,
        file_id,
        file_name,
        surface,
    )));
    let ui = Ui::new(document, toast);
    {
        let state = state.borrow();
        let shown = if state.file_name.is_empty() {
            "document.pdf"
        } else {
            state.file_name.as_str()
        };
        set_text(document, "fileName", shown);
        sync_controls(&state, &ui);
    }

    bind_navigation(document, &state, &ui)?;
    bind_tools(document, &state, &ui)?;
    bind_pointer(&layer, &state, &ui)?;
    bind_keyboard(window, &state, &ui)?;
    bind_history_and_files(document, &state, &ui)?;
    bind_backend_tools(window, document, &state, &ui)?;

    spawn_local(load_document(state, ui));
    Ok(())
}

async fn load_document(state: Shared, ui: Ui) {
    ui.toast.info("Loading PDF...");
    let url = {
        let state = state.borrow();
        state.api.page_source_url(&state.file_id, state.editor.page())
    };
    let document = match PdfDocument::open(&url).await {
        Ok(document) => document,
        Err(err) => {
            log::error!("loading {url} failed: {err:?}");
            ui.toast
                .error(&format!("Error loading PDF: {}", js_error_message(&err)));
            return;
        }
    };

    let total = document.page_count();
    let pages: Vec<u32> = {
        let mut state = state.borrow_mut();
        state.editor.set_total_pages(total);
        state.document = Some(document.clone());
        state.editor.viewport().thumbnail_pages().collect()
    };
    log::info!("document has {total} pages");
    set_text(&ui.document, "fileStats", &format!("{total} pages"));
    refresh(&state, &ui, Redraw::Page);
    ui.toast.success("PDF loaded successfully");

    if let Some(container) = ui.thumbnails.clone() {
        render_thumbnails(document, container, pages).await;
        sync_controls(&state.borrow(), &ui);
    }
}

fn bind_navigation(document: &Document, state: &Shared, ui: &Ui) -> Result<(), JsValue> {
    let steps: [(&str, fn(&mut pdfedit_shared::Editor) -> Redraw); 4] = [
        ("prevPage", |editor| editor.prev_page()),
        ("nextPage", |editor| editor.next_page()),
        ("zoomIn", |editor| editor.zoom_in()),
        ("zoomOut", |editor| editor.zoom_out()),
    ];
    for (id, step) in steps {
        let state = state.clone();
        let ui = ui.clone();
        on_click(document, id, move || {
            let redraw = {
                let mut state = state.borrow_mut();
                state.selected = None;
                step(&mut state.editor)
            };
            refresh(&state, &ui, redraw);
        })?;
    }

    if let Some(container) = ui.thumbnails.clone() {
        let state = state.clone();
        let ui = ui.clone();
        listen(&container, "click", move |event: Event| {
            let page = event
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok())
                .and_then(|element| element.closest("[data-page]").ok().flatten())
                .and_then(|element| element.get_attribute("data-page"))
                .and_then(|raw| raw.parse::<u32>().ok());
            let Some(page) = page else {
                return;
            };
            let redraw = state.borrow_mut().editor.go_to(page);
            refresh(&state, &ui, redraw);
        })?;
    }
    Ok(())
}

fn bind_tools(document: &Document, state: &Shared, ui: &Ui) -> Result<(), JsValue> {
    for button in query_all(document, ".tool-btn[data-tool]") {
        let Some(tool) = button
            .get_attribute("data-tool")
            .and_then(|name| Tool::from_name(&name))
        else {
            continue;
        };
        let state = state.clone();
        let ui = ui.clone();
        listen(&button, "click", move |_| {
            {
                let mut state = state.borrow_mut();
                set_tool(&mut state, &ui.document, tool);
            }
            refresh(&state, &ui, Redraw::Overlay);
        })?;
    }

    if let Some(input) = find_element::<HtmlInputElement>(document, "fontSize") {
        let state = state.clone();
        let source = input.clone();
        set_font_size(&mut state.borrow_mut(), &input.value());
        listen(&input, "input", move |_| {
            set_font_size(&mut state.borrow_mut(), &source.value());
        })?;
    }

    if let Some(input) = find_element::<HtmlInputElement>(document, "textColor") {
        let state = state.clone();
        let source = input.clone();
        set_color(&mut state.borrow_mut(), input.value());
        listen(&input, "input", move |_| {
            set_color(&mut state.borrow_mut(), source.value());
        })?;
    }

    {
        let state = state.clone();
        let ui = ui.clone();
        let editor_input: Option<HtmlTextAreaElement> = find_element(document, "textEditor");
        on_click(document, "addTextBtn", move || {
            let Some(input) = &editor_input else {
                return;
            };
            let text = input.value();
            if text.trim().is_empty() {
                return;
            }
            let redraw = {
                let mut state = state.borrow_mut();
                let at = state.editor.viewport().to_screen(Point::new(100.0, 100.0));
                place_text(&mut state, at, &text)
            };
            input.set_value("");
            refresh(&state, &ui, redraw);
        })?;
    }

    {
        let sidebar: Option<Element> = find_element(document, "editorSidebar");
        on_click(document, "sidebarToggle", move || {
            if let Some(sidebar) = &sidebar {
                let _ = sidebar.class_list().toggle("collapsed");
            }
        })?;
    }
    Ok(())
}

fn open_text_input(state: &Shared, ui: &Ui, at: Point) -> Result<(), JsValue> {
    let layer = state.borrow().surface.layer.clone();
    let input: HtmlTextAreaElement = ui.document.create_element("textarea")?.dyn_into()?;
    input.set_class_name("floating-text-input");
    input.set_placeholder("Enter text...");
    set_style(&input, "position", "absolute");
    set_style(&input, "left", &format!("{}px", at.x));
    set_style(&input, "top", &format!("{}px", at.y));
    layer.append_child(&input)?;
    input.focus()?;

    {
        let state = state.clone();
        let ui = ui.clone();
        let source = input.clone();
        let layer = layer.clone();
        listen(&input, "blur", move |_| {
            if source.parent_node().is_none() {
                return;
            }
            let text = source.value();
            let _ = layer.remove_child(&source);
            if text.trim().is_empty() {
                return;
            }
            let redraw = place_text(&mut state.borrow_mut(), at, &text);
            refresh(&state, &ui, redraw);
        })?;
    }

    let source = input.clone();
    listen(&input, "keydown", move |event: Event| {
        let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        match event.key().as_str() {
            "Enter" if !event.shift_key() => {
                event.prevent_default();
                let _ = source.blur();
            }
            "Escape" => {
                source.set_value("");
                let _ = source.blur();
            }
            _ => {}
        }
    })
}

fn bind_pointer(layer: &HtmlElement, state: &Shared, ui: &Ui) -> Result<(), JsValue> {
    {
        let state = state.clone();
        let ui = ui.clone();
        let layer_cb = layer.clone();
        listen(layer, "pointerdown", move |event: Event| {
            let Some(event) = event.dyn_ref::<PointerEvent>() else {
                return;
            };
            if event.button() != 0 || is_text_entry(event.target()) {
                return;
            }
            let Some(at) = event_to_point(&layer_cb, event) else {
                return;
            };
            if state.borrow().tool == Tool::Text {
                event.prevent_default();
                if let Err(err) = open_text_input(&state, &ui, at) {
                    log::error!("text input failed: {err:?}");
                }
                return;
            }
            let hit = annotation_at(event.target());
            let (redraw, capture) = {
                let mut state = state.borrow_mut();
                let redraw = begin_gesture(&mut state, at, hit);
                (redraw, !matches!(state.gesture, Gesture::Idle))
            };
            if capture {
                event.prevent_default();
                let _ = layer_cb.set_pointer_capture(event.pointer_id());
            }
            refresh(&state, &ui, redraw);
        })?;
    }

    {
        let state = state.clone();
        let ui = ui.clone();
        let layer_cb = layer.clone();
        listen(layer, "pointermove", move |event: Event| {
            let Some(event) = event.dyn_ref::<PointerEvent>() else {
                return;
            };
            if matches!(state.borrow().gesture, Gesture::Idle) {
                return;
            }
            let Some(at) = event_to_point(&layer_cb, event) else {
                return;
            };
            let redraw = extend_gesture(&mut state.borrow_mut(), at);
            refresh(&state, &ui, redraw);
        })?;
    }

    for (name, keep_point) in [("pointerup", true), ("pointercancel", false)] {
        let state = state.clone();
        let ui = ui.clone();
        let layer_cb = layer.clone();
        listen(layer, name, move |event: Event| {
            let Some(event) = event.dyn_ref::<PointerEvent>() else {
                return;
            };
            if matches!(state.borrow().gesture, Gesture::Idle) {
                return;
            }
            let _ = layer_cb.release_pointer_capture(event.pointer_id());
            let at = if keep_point {
                event_to_point(&layer_cb, event)
            } else {
                None
            };
            let redraw = finish_gesture(&mut state.borrow_mut(), at);
            refresh(&state, &ui, redraw);
        })?;
    }
    Ok(())
}

fn bind_keyboard(window: &Window, state: &Shared, ui: &Ui) -> Result<(), JsValue> {
    let state = state.clone();
    let ui = ui.clone();
    listen(window, "keydown", move |event: Event| {
        let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        if is_text_entry(event.target()) {
            return;
        }
        let key = event.key();
        let modifier = event.meta_key() || event.ctrl_key();
        let redraw = if !modifier {
            if key != "Delete" && key != "Backspace" {
                return;
            }
            let redraw = delete_selected(&mut state.borrow_mut());
            if redraw == Redraw::Nothing {
                return;
            }
            redraw
        } else if (event.shift_key() && key.eq_ignore_ascii_case("z")) || key.eq_ignore_ascii_case("y") {
            state.borrow_mut().editor.redo()
        } else if key.eq_ignore_ascii_case("z") {
            state.borrow_mut().editor.undo()
        } else {
            return;
        };
        event.prevent_default();
        refresh(&state, &ui, redraw);
    })
}

fn bind_history_and_files(document: &Document, state: &Shared, ui: &Ui) -> Result<(), JsValue> {
    {
        let state = state.clone();
        let ui = ui.clone();
        on_click(document, "undoBtn", move || {
            let redraw = state.borrow_mut().editor.undo();
            refresh(&state, &ui, redraw);
        })?;
    }
    {
        let state = state.clone();
        let ui = ui.clone();
        on_click(document, "redoBtn", move || {
            let redraw = state.borrow_mut().editor.redo();
            refresh(&state, &ui, redraw);
        })?;
    }
    {
        let state = state.clone();
        let ui = ui.clone();
        on_click(document, "saveBtn", move || {
            let state = state.clone();
            let ui = ui.clone();
            spawn_local(async move {
                save(&state, &ui).await;
            });
        })?;
    }
    {
        let state = state.clone();
        let ui = ui.clone();
        on_click(document, "downloadBtn", move || {
            spawn_local(download(state.clone(), ui.clone()));
        })?;
    }
    Ok(())
}

async fn save(state: &Shared, ui: &Ui) -> bool {
    ui.toast.info("Saving changes...");
    let (api, file_id, annotations, revision) = {
        let state = state.borrow();
        (
            state.api.clone(),
            state.file_id.clone(),
            state.editor.store().annotations().to_vec(),
            state.editor.revision(),
        )
    };
    match api.save(&file_id, &annotations).await {
        Ok(()) => {
            log::info!("saved {} annotations", annotations.len());
            if !state.borrow_mut().editor.mark_saved(revision) {
                log::info!("edits made during save stay undoable");
            }
            sync_controls(&state.borrow(), ui);
            ui.toast.success("Changes saved successfully!");
            true
        }
        Err(err) => {
            log::error!("save failed: {err}");
            ui.toast.error(&format!("Error saving changes: {err}"));
            false
        }
    }
}

async fn download(state: Shared, ui: Ui) {
    ui.toast.info("Preparing download...");
    if !save(&state, &ui).await {
        return;
    }
    let (api, file_id, name) = {
        let state = state.borrow();
        (state.api.clone(), state.file_id.clone(), state.download_name())
    };
    let result = api
        .download(&file_id)
        .await
        .map_err(|err| err.to_string())
        .and_then(|bytes| {
            save_blob(&ui.document, &bytes, &name, "application/pdf").map_err(|err| js_error_message(&err))
        });
    match result {
        Ok(()) => ui.toast.success("Download started!"),
        Err(message) => {
            log::error!("download failed: {message}");
            ui.toast.error(&format!("Error downloading: {message}"));
        }
    }
}

fn bind_backend_tools(window: &Window, document: &Document, state: &Shared, ui: &Ui) -> Result<(), JsValue> {
    for id in ["summarizeBtn", "generateSummaryBtn"] {
        let state = state.clone();
        let ui = ui.clone();
        on_click(document, id, move || {
            spawn_local(summarize(state.clone(), ui.clone()));
        })?;
    }
    {
        let state = state.clone();
        let ui = ui.clone();
        on_click(document, "extractBtn", move || {
            spawn_local(extract_key_points(state.clone(), ui.clone()));
        })?;
    }
    {
        let state = state.clone();
        let ui = ui.clone();
        let window = window.clone();
        on_click(document, "grammarBtn", move || {
            let selected = window
                .get_selection()
                .ok()
                .flatten()
                .map(|selection| String::from(selection.to_string()))
                .unwrap_or_default();
            if selected.trim().is_empty() {
                ui.toast.warning("Please select some text first");
                return;
            }
            spawn_local(check_grammar(state.clone(), ui.clone(), selected));
        })?;
    }
    {
        let state = state.clone();
        let ui = ui.clone();
        let window = window.clone();
        on_click(document, "compressBtn", move || {
            spawn_local(compress(state.clone(), ui.clone(), window.clone()));
        })?;
    }
    {
        let state = state.clone();
        on_click(document, "chatBtn", move || {
            let file_id = state.borrow().file_id.clone();
            navigate(&format!("chat-pdf.html?fileId={file_id}"));
        })?;
    }
    bind_convert(document, state, ui)
}

fn file_context(state: &Shared) -> (ApiClient, String) {
    let state = state.borrow();
    (state.api.clone(), state.file_id.clone())
}

async fn summarize(state: Shared, ui: Ui) {
    ui.toast.info("Generating summary...");
    let (api, file_id) = file_context(&state);
    match api.summarize(&file_id).await {
        Ok(summary) => {
            set_text(&ui.document, "summaryContent", &summary);
            ui.toast.success("Summary generated!");
        }
        Err(err) => ui.toast.error(&failure_message("Error generating summary", &err)),
    }
}

async fn extract_key_points(state: Shared, ui: Ui) {
    ui.toast.info("Extracting key points...");
    let (api, file_id) = file_context(&state);
    match api.extract_key_points(&file_id).await {
        Ok(points) => {
            if let Err(err) = show_list(&ui.document, "keyPointsContent", &points) {
                log::warn!("could not show key points: {err:?}");
            }
            ui.toast.success("Key points extracted!");
        }
        Err(err) => ui.toast.error(&failure_message("Error extracting key points", &err)),
    }
}

fn show_list(document: &Document, id: &str, items: &[String]) -> Result<(), JsValue> {
    let Some(container) = document.get_element_by_id(id) else {
        return Ok(());
    };
    container.set_inner_html("");
    let list = document.create_element("ul")?;
    for item in items {
        let entry = document.create_element("li")?;
        entry.set_text_content(Some(item));
        list.append_child(&entry)?;
    }
    container.append_child(&list)?;
    Ok(())
}

async fn check_grammar(state: Shared, ui: Ui, text: String) {
    ui.toast.info("Checking grammar...");
    let (api, file_id) = file_context(&state);
    match api.check_grammar(&file_id, &text).await {
        Ok(corrected) => {
            set_text(&ui.document, "grammarResult", &corrected);
            ui.toast.success("Grammar check complete!");
        }
        Err(err) => ui.toast.error(&failure_message("Error checking grammar", &err)),
    }
}

async fn compress(state: Shared, ui: Ui, window: Window) {
    ui.toast.info("Compressing PDF...");
    let (api, file_id) = file_context(&state);
    match api.compress(&file_id).await {
        Ok(report) => {
            let percent = report.reduction_percent;
            ui.toast
                .success(&format!("PDF compressed! Size reduced by {percent}%"));
            let prompt = format!("Compression reduced size by {percent}%. Download now?");
            if window.confirm_with_message(&prompt).unwrap_or(false) {
                navigate(&report.download_url);
            }
        }
        Err(err) => ui.toast.error(&failure_message("Error compressing PDF", &err)),
    }
}

fn bind_convert(document: &Document, state: &Shared, ui: &Ui) -> Result<(), JsValue> {
    let Some(modal) = find_element::<Element>(document, "convertModal") else {
        return Ok(());
    };
    {
        let modal = modal.clone();
        on_click(document, "convertBtn", move || set_class(&modal, "show", true))?;
    }
    if let Ok(closers) = modal.query_selector_all(".modal-close") {
        for index in 0..closers.length() {
            let Some(closer) = closers.item(index) else {
                continue;
            };
            let modal = modal.clone();
            listen(&closer, "click", move |_| set_class(&modal, "show", false))?;
        }
    }
    let Ok(buttons) = modal.query_selector_all("[data-format]") else {
        return Ok(());
    };
    for index in 0..buttons.length() {
        let Some(button) = buttons
            .item(index)
            .and_then(|node| node.dyn_into::<Element>().ok())
        else {
            continue;
        };
        let Some(format) = button
            .get_attribute("data-format")
            .and_then(|name| ConvertFormat::from_name(&name))
        else {
            continue;
        };
        let state = state.clone();
        let ui = ui.clone();
        let modal = modal.clone();
        listen(&button, "click", move |_| {
            set_class(&modal, "show", false);
            spawn_local(convert(state.clone(), ui.clone(), format));
        })?;
    }
    Ok(())
}

async fn convert(state: Shared, ui: Ui, format: ConvertFormat) {
    ui.toast.info(&format!("Converting to {}...", format.label()));
    let (api, file_id) = file_context(&state);
    match api.convert(&file_id, format).await {
        Ok(ConvertResult::Download(url)) => {
            ui.toast.success("Conversion complete!");
            navigate(&url);
        }
        Ok(ConvertResult::Files(files)) => {
            ui.toast
                .success(&format!("Converted into {} files", files.len()));
        }
        Err(err) => ui.toast.error(&failure_message("Error converting PDF", &err)),
    }
}

fn start_chat(
    window: &Window,
    document: &Document,
    config: &ClientConfig,
    toast: ToastView,
) -> Result<(), JsValue> {
    let Some(file_id) = query_param(&search_of(window), "fileId").filter(|id| !id.is_empty()) else {
        toast.error("No PDF file selected");
        navigate("index.html");
        return Ok(());
    };
    let form: Element = get_element(document, "chatForm")?;
    let input: HtmlInputElement = get_element(document, "chatInput")?;
    let messages: Element = get_element(document, "chatMessages")?;
    let api = ApiClient::new(config.api_base.clone());
    let document = document.clone();

    listen(&form, "submit", move |event: Event| {
        event.prevent_default();
        let question = input.value();
        if question.trim().is_empty() {
            return;
        }
        input.set_value("");
        append_message(&document, &messages, "user", &question);
        let api = api.clone();
        let file_id = file_id.clone();
        let document = document.clone();
        let messages = messages.clone();
        let toast = toast.clone();
        spawn_local(async move {
            match api.chat(&file_id, &question).await {
                Ok(answer) => append_message(&document, &messages, "assistant", &answer),
                Err(err) => toast.error(&failure_message("Error", &err)),
            }
        });
    })
}

fn append_message(document: &Document, messages: &Element, role: &str, text: &str) {
    let Ok(entry) = document.create_element("div") else {
        return;
    };
    entry.set_class_name(&format!("message {role}-message"));
    entry.set_text_content(Some(text));
    if messages.append_child(&entry).is_ok() {
        messages.set_scroll_top(messages.scroll_height());
    }
}
