use js_sys::{Array, Uint8Array};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, Document, Element, Event, HtmlAnchorElement, Storage, Url, Window};

use pdfedit_shared::theme::THEME_STORAGE_KEY;
use pdfedit_shared::Theme;

use crate::dom::{find_element, query, set_class};

fn local_storage(window: &Window) -> Option<Storage> {
    window.local_storage().ok().flatten()
}

pub fn load_theme(window: &Window) -> Theme {
    let stored = local_storage(window).and_then(|storage| storage.get_item(THEME_STORAGE_KEY).ok().flatten());
    Theme::from_stored(stored.as_deref())
}

pub fn store_theme(window: &Window, theme: Theme) {
    if let Some(storage) = local_storage(window) {
        if storage.set_item(THEME_STORAGE_KEY, theme.as_str()).is_err() {
            log::warn!("could not persist theme");
        }
    }
}

pub fn apply_theme(document: &Document, theme: Theme) {
    if let Some(body) = document.body() {
        set_class(&body, Theme::Light.body_class(), theme == Theme::Light);
        set_class(&body, Theme::Dark.body_class(), theme == Theme::Dark);
    }
    if let Some(icon) = find_element::<Element>(document, "themeToggle")
        .and_then(|toggle| query::<Element>(&toggle, "i"))
    {
        icon.set_class_name(theme.icon_class());
    }
}

/// Applies the stored theme and wires `#themeToggle`, if the page has one.
pub fn init_theme(window: &Window, document: &Document) -> Result<(), JsValue> {
    apply_theme(document, load_theme(window));
    let Some(toggle) = find_element::<Element>(document, "themeToggle") else {
        return Ok(());
    };
    let window_cb = window.clone();
    let document_cb = document.clone();
    let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
        let theme = load_theme(&window_cb).toggled();
        store_theme(&window_cb, theme);
        apply_theme(&document_cb, theme);
    });
    toggle.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
    onclick.forget();
    Ok(())
}

/// Offers `bytes` to the user as a file download.
pub fn save_blob(document: &Document, bytes: &[u8], file_name: &str, mime: &str) -> Result<(), JsValue> {
    let array = Uint8Array::from(bytes);
    let parts = Array::of1(&array);
    let options = BlobPropertyBag::new();
    options.set_type(mime);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("Missing body"))?;
    body.append_child(&anchor)?;
    anchor.click();
    body.remove_child(&anchor)?;
    Url::revoke_object_url(&url)?;
    Ok(())
}
