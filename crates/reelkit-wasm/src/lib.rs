//! Reelkit WASM - Browser bindings for the Reelkit player
//!
//! Binds a [`reelkit_core::PlayerSession`] to a real `<video>` element, the
//! document fullscreen API and an hls.js instance.
//!
//! ## Integration with hls.js
//!
//! ```javascript
//! import init, { ReelkitPlayer } from '@reelkit/wasm';
//! import Hls from 'hls.js';
//!
//! await init();
//! const player = new ReelkitPlayer({ videoUrl, title, hasNext: true });
//! player.setNavigation(onPrevious, onNext);
//!
//! let hls = null;
//! if (player.needsStream() && Hls.isSupported()) {
//!   hls = new Hls(player.hlsConfig());
//!   hls.on(Hls.Events.MANIFEST_PARSED, (_, data) => player.onManifestParsed(data.levels));
//!   hls.on(Hls.Events.LEVEL_SWITCHED, (_, data) => player.onLevelSwitched(data.level));
//!   hls.on(Hls.Events.ERROR, (_, data) => player.onError(data));
//! }
//! player.mount(container, video, hls);
//! document.addEventListener('fullscreenchange', () => player.onFullscreenChange());
//! draw(player.render());
//! ```

use reelkit_core::VideoSource;
use wasm_bindgen::prelude::*;

mod dom;
mod hls;
mod player;

pub use player::ReelkitPlayer;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    web_sys::console::log_1(&"[Reelkit WASM] Initialized".into());
}

/// Library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Classify a video URL; returns `{ kind, id? }`
#[wasm_bindgen]
pub fn classify(url: &str) -> Result<JsValue, JsValue> {
    let source: VideoSource = reelkit_core::classify(url);
    serde_wasm_bindgen::to_value(&source).map_err(JsValue::from)
}

/// Quality-specific URL of a direct media file
#[wasm_bindgen(js_name = directFileUrl)]
pub fn direct_file_url(url: &str, quality: &str) -> Result<String, JsValue> {
    let quality = quality.parse().map_err(to_js_error)?;
    Ok(reelkit_core::direct_file_url(url, quality))
}

pub(crate) fn to_js_error(err: reelkit_core::Error) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}
