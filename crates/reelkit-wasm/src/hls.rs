//! hls.js instance behind the core streaming seam

use js_sys::{Array, Function, Reflect};
use reelkit_core::{StreamError, StreamErrorKind, StreamingHandle};
use serde::Deserialize;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlVideoElement;

/// An hls.js `Hls` instance, owned by one player
pub struct HlsHandle {
    hls: JsValue,
}

impl HlsHandle {
    /// Wrap an instance and attach it to the video element
    pub fn attach(hls: JsValue, video: &HtmlVideoElement) -> Self {
        let handle = Self { hls };
        handle.call("attachMedia", &[video.clone().into()]);
        handle
    }

    fn call(&self, method: &str, args: &[JsValue]) {
        let result = Reflect::get(&self.hls, &JsValue::from_str(method))
            .and_then(|f| f.dyn_into::<Function>())
            .and_then(|f| f.apply(&self.hls, &args.iter().collect::<Array>()));
        if let Err(e) = result {
            web_sys::console::warn_2(&format!("[Reelkit] hls.{method}() failed:").into(), &e);
        }
    }
}

impl StreamingHandle for HlsHandle {
    fn load_source(&mut self, url: &str) {
        self.call("loadSource", &[JsValue::from_str(url)]);
    }

    fn set_current_level(&mut self, level: i32) {
        if let Err(e) = Reflect::set(&self.hls, &"currentLevel".into(), &level.into()) {
            web_sys::console::warn_2(&"[Reelkit] setting hls.currentLevel failed:".into(), &e);
        }
    }

    fn start_load(&mut self) {
        self.call("startLoad", &[]);
    }

    fn recover_media_error(&mut self) {
        self.call("recoverMediaError", &[]);
    }

    fn destroy(&mut self) {
        self.call("destroy", &[]);
    }
}

/// Subset of hls.js `ErrorData`
#[derive(Deserialize)]
pub struct HlsErrorData {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    details: String,
    #[serde(default)]
    fatal: bool,
}

impl From<HlsErrorData> for StreamError {
    fn from(data: HlsErrorData) -> Self {
        StreamError {
            kind: StreamErrorKind::from_library(&data.kind),
            fatal: data.fatal,
            details: data.details,
        }
    }
}
