//! Bindings to the PDF.js bridge module.
//!
//! Parsing and rasterization stay in PDF.js; Rust only asks for a document
//! handle, its page count, and rendered pages.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlCanvasElement;

#[wasm_bindgen(module = "/pdfjs_bridge.js")]
extern "C" {
    #[wasm_bindgen(catch, js_name = loadDocument)]
    async fn load_document_js(url: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_name = pageCount)]
    fn page_count_js(document: &JsValue) -> u32;

    /// Renders into a fresh canvas so concurrent renders never share one.
    #[wasm_bindgen(catch, js_name = renderPage)]
    async fn render_page_js(document: &JsValue, page: u32, scale: f64) -> Result<JsValue, JsValue>;
}

/// An opened PDF.js document proxy.
#[derive(Clone)]
pub struct PdfDocument {
    handle: JsValue,
}

impl PdfDocument {
    pub async fn open(url: &str) -> Result<Self, JsValue> {
        let handle = load_document_js(url).await?;
        Ok(Self { handle })
    }

    pub fn page_count(&self) -> u32 {
        page_count_js(&self.handle)
    }

    pub async fn render(&self, page: u32, scale: f64) -> Result<HtmlCanvasElement, JsValue> {
        let canvas = render_page_js(&self.handle, page, scale).await?;
        canvas
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| JsValue::from_str("renderPage did not return a canvas"))
    }
}
