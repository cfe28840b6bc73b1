//! Landing page: pick or drop a file, validate it, upload it, then hand over
//! to the editor.

use std::rc::Rc;

use js_sys::Uint8Array;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Document, DragEvent, Element, Event, File, HtmlElement, HtmlInputElement, Window};

use pdfedit_shared::{ApiError, FileInfo};

use crate::config::ClientConfig;
use crate::dom::{find_element, get_element, set_class, set_style};
use crate::net::ApiClient;
use crate::toast::ToastView;

struct UploadPage {
    window: Window,
    config: ClientConfig,
    api: ApiClient,
    toast: ToastView,
    modal: Option<Element>,
    progress: Option<HtmlElement>,
    progress_text: Option<Element>,
}

impl UploadPage {
    fn set_progress(&self, percent: u32) {
        if let Some(bar) = &self.progress {
            set_style(bar, "width", &format!("{percent}%"));
        }
        if let Some(text) = &self.progress_text {
            text.set_text_content(Some(&format!("{percent}% uploaded")));
        }
    }

    fn show_modal(&self, show: bool) {
        if let Some(modal) = &self.modal {
            set_class(modal, "show", show);
        }
    }

    fn after_delay(&self, callback: impl FnOnce() + 'static) {
        let callback = Closure::once_into_js(callback);
        if self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                self.config.redirect_delay_ms,
            )
            .is_err()
        {
            log::warn!("could not schedule timer");
        }
    }
}

fn file_info(file: &File) -> FileInfo {
    FileInfo {
        name: file.name(),
        mime: file.type_(),
        size: file.size() as u64,
    }
}

fn editor_href(file_id: &str, file_name: &str) -> String {
    let name = String::from(js_sys::encode_uri_component(file_name));
    format!("editor.html?fileId={file_id}&name={name}")
}

async fn read_bytes(file: &File) -> Result<Vec<u8>, JsValue> {
    let buffer = JsFuture::from(file.array_buffer()).await?;
    Ok(Uint8Array::new(&buffer).to_vec())
}

async fn handle_file(page: Rc<UploadPage>, file: File) {
    let info = file_info(&file);
    if let Err(err) = page.config.upload.validate(&info) {
        page.toast.error(&err.to_string());
        return;
    }

    page.set_progress(0);
    page.show_modal(true);

    let result = match read_bytes(&file).await {
        Ok(bytes) => page
            .api
            .upload(&info.name, &info.mime, bytes)
            .await
            .map_err(|err| match err {
                ApiError::Application(message) => message,
                other => format!("Upload failed: {other}"),
            }),
        Err(err) => Err(format!("Upload failed: {err:?}")),
    };
    match result {
        Ok(receipt) => {
            page.set_progress(100);
            log::info!("uploaded {} as {}", info.name, receipt.file_id);
            page.toast.success("File uploaded successfully!");
            let name = receipt.filename.unwrap_or(info.name);
            let href = editor_href(&receipt.file_id, &name);
            page.after_delay(move || crate::dom::navigate(&href));
        }
        Err(message) => page.toast.error(&message),
    }

    let hide = page.clone();
    page.after_delay(move || {
        hide.show_modal(false);
        hide.set_progress(0);
    });
}

fn first_file(files: Option<web_sys::FileList>) -> Option<File> {
    files.and_then(|files| files.get(0))
}

pub fn start(window: &Window, document: &Document, config: ClientConfig, toast: ToastView) -> Result<(), JsValue> {
    let drop_zone: HtmlElement = get_element(document, "dropZone")?;
    let file_input: HtmlInputElement = get_element(document, "fileInput")?;
    let page = Rc::new(UploadPage {
        window: window.clone(),
        api: ApiClient::new(config.api_base.clone()),
        config,
        toast,
        modal: find_element(document, "uploadModal"),
        progress: find_element(document, "uploadProgress"),
        progress_text: find_element(document, "progressText"),
    });

    let mut openers = vec![drop_zone.clone().unchecked_into::<Element>()];
    openers.extend(find_element::<Element>(document, "uploadTrigger"));
    for opener in openers {
        let input = file_input.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| input.click());
        opener.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let zone = drop_zone.clone();
        let ondragover = Closure::<dyn FnMut(DragEvent)>::new(move |event: DragEvent| {
            event.prevent_default();
            set_style(&zone, "border-color", "var(--primary-color)");
            set_style(&zone, "background-color", "var(--bg-tertiary)");
        });
        drop_zone.add_event_listener_with_callback("dragover", ondragover.as_ref().unchecked_ref())?;
        ondragover.forget();
    }

    {
        let zone = drop_zone.clone();
        let ondragleave = Closure::<dyn FnMut(Event)>::new(move |_| {
            set_style(&zone, "border-color", "var(--border-color)");
            set_style(&zone, "background-color", "var(--bg-secondary)");
        });
        drop_zone.add_event_listener_with_callback("dragleave", ondragleave.as_ref().unchecked_ref())?;
        ondragleave.forget();
    }

    {
        let zone = drop_zone.clone();
        let drop_page = page.clone();
        let ondrop = Closure::<dyn FnMut(DragEvent)>::new(move |event: DragEvent| {
            event.prevent_default();
            set_style(&zone, "border-color", "var(--border-color)");
            set_style(&zone, "background-color", "var(--bg-secondary)");
            let file = first_file(event.data_transfer().and_then(|transfer| transfer.files()));
            if let Some(file) = file {
                spawn_local(handle_file(drop_page.clone(), file));
            }
        });
        drop_zone.add_event_listener_with_callback("drop", ondrop.as_ref().unchecked_ref())?;
        ondrop.forget();
    }

    {
        let input = file_input.clone();
        let change_page = page.clone();
        let onchange = Closure::<dyn FnMut(Event)>::new(move |_| {
            if let Some(file) = first_file(input.files()) {
                spawn_local(handle_file(change_page.clone(), file));
            }
            input.set_value("");
        });
        file_input.add_event_listener_with_callback("change", onchange.as_ref().unchecked_ref())?;
        onchange.forget();
    }

    if let Some(close) = document.query_selector(".modal-close").ok().flatten() {
        let close_page = page.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| close_page.show_modal(false));
        close.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    Ok(())
}
