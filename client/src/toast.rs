use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement};

use pdfedit_shared::{Severity, Toaster};

use crate::dom::{find_element, query, set_class, set_style};

/// Drives the `#toast` element from a [`Toaster`].
#[derive(Clone)]
pub struct ToastView {
    toaster: Rc<RefCell<Toaster>>,
    root: Option<HtmlElement>,
    duration_ms: i32,
}

impl ToastView {
    pub fn attach(document: &Document, duration_ms: i32) -> Result<Self, JsValue> {
        let view = Self {
            toaster: Rc::new(RefCell::new(Toaster::new())),
            root: find_element(document, "toast"),
            duration_ms,
        };
        if let Some(close) = view
            .root
            .as_ref()
            .and_then(|root| query::<Element>(root, ".toast-close"))
        {
            let close_view = view.clone();
            let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
                close_view.toaster.borrow_mut().close();
                close_view.sync();
            });
            close.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
            onclick.forget();
        }
        Ok(view)
    }

    pub fn show(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Error => log::warn!("toast: {message}"),
            _ => log::debug!("toast: {message}"),
        }
        let handle = self.toaster.borrow_mut().show(message, severity);
        self.sync();

        let Some(window) = web_sys::window() else {
            return;
        };
        let view = self.clone();
        let ontimeout = Closure::<dyn FnMut()>::new(move || {
            if view.toaster.borrow_mut().expire(handle) {
                view.sync();
            }
        });
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            ontimeout.as_ref().unchecked_ref(),
            self.duration_ms,
        );
        ontimeout.forget();
    }

    pub fn success(&self, message: &str) {
        self.show(message, Severity::Success);
    }

    pub fn error(&self, message: &str) {
        self.show(message, Severity::Error);
    }

    pub fn warning(&self, message: &str) {
        self.show(message, Severity::Warning);
    }

    pub fn info(&self, message: &str) {
        self.show(message, Severity::Info);
    }

    fn sync(&self) {
        let Some(root) = &self.root else {
            return;
        };
        let toaster = self.toaster.borrow();
        let Some(toast) = toaster.current() else {
            set_class(root, "show", false);
            return;
        };
        if let Some(icon) = query::<Element>(root, "i") {
            icon.set_class_name(toast.severity.icon_class());
        }
        if let Some(text) = query::<Element>(root, ".toast-message") {
            text.set_text_content(Some(&toast.message));
        }
        set_style(root, "border-left-color", toast.severity.color_var());
        set_class(root, "show", true);
    }
}
