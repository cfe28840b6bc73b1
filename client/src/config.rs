use wasm_bindgen::JsValue;
use web_sys::Window;

use pdfedit_shared::toast::TOAST_DURATION_MS;
use pdfedit_shared::UploadPolicy;

pub const REDIRECT_DELAY_MS: i32 = 2000;

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_base: String,
    pub upload: UploadPolicy,
    pub toast_duration_ms: i32,
    pub redirect_delay_ms: i32,
    pub debug: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:5000".to_string(),
            upload: UploadPolicy::default(),
            toast_duration_ms: TOAST_DURATION_MS as i32,
            redirect_delay_ms: REDIRECT_DELAY_MS,
            debug: false,
        }
    }
}

impl ClientConfig {
    /// The API lives on the same origin that served the page.
    pub fn from_window(window: &Window) -> Result<Self, JsValue> {
        let location = window.location();
        let search = location.search().unwrap_or_default();
        Ok(Self {
            api_base: location.origin()?,
            debug: debug_enabled(&search),
            ..Self::default()
        })
    }
}

fn debug_enabled(search: &str) -> bool {
    matches!(
        query_param(search, "debug").as_deref(),
        Some("1") | Some("true")
    ) || matches!(query_param(search, "log").as_deref(), Some("1") | Some("true"))
}

/// Raw (still percent-encoded) value of `key` in a `?a=1&b=2` query string.
pub fn query_param(search: &str, key: &str) -> Option<String> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('=').or(Some((pair, ""))))
        .find(|(name, _)| *name == key)
        .map(|(_, value)| value.to_string())
}

pub fn search_of(window: &Window) -> String {
    window.location().search().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_query_values() {
        let search = "?fileId=3f2a&name=report%20v2.pdf&debug";
        assert_eq!(query_param(search, "fileId").as_deref(), Some("3f2a"));
        assert_eq!(query_param(search, "name").as_deref(), Some("report%20v2.pdf"));
        assert_eq!(query_param(search, "debug").as_deref(), Some(""));
        assert_eq!(query_param(search, "page"), None);
        assert_eq!(query_param("", "fileId"), None);
    }

    #[test]
    fn debug_flag_accepts_one_or_true() {
        assert!(debug_enabled("?debug=1"));
        assert!(debug_enabled("?x=2&log=true"));
        assert!(!debug_enabled("?debug=0"));
        assert!(!debug_enabled(""));
    }
}
