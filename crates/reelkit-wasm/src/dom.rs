//! DOM-backed media surface

use js_sys::{Function, Promise, Reflect};
use reelkit_core::{Error, MediaSurface, Result};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlElement, HtmlVideoElement};

/// The player's container (fullscreen target) and, for native sources, its video element
pub struct DomSurface {
    container: HtmlElement,
    video: Option<HtmlVideoElement>,
}

impl DomSurface {
    pub fn new(container: HtmlElement, video: Option<HtmlVideoElement>) -> Self {
        Self { container, video }
    }

    pub fn video(&self) -> Option<&HtmlVideoElement> {
        self.video.as_ref()
    }

    fn require_video(&self, command: &'static str) -> Result<&HtmlVideoElement> {
        self.video
            .as_ref()
            .ok_or_else(|| Error::media(command, "no video element mounted"))
    }

    /// Whether the browser plays HLS manifests without a library
    pub fn plays_hls_natively(&self) -> bool {
        self.video
            .as_ref()
            .map(|v| !v.can_play_type("application/vnd.apple.mpegurl").is_empty())
            .unwrap_or(false)
    }
}

/// True while any element of the document is fullscreen
pub fn document_is_fullscreen() -> bool {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.fullscreen_element())
        .is_some()
}

impl MediaSurface for DomSurface {
    fn play(&mut self) -> Result<()> {
        let promise = self
            .require_video("play")?
            .play()
            .map_err(|e| Error::media("play", format!("{e:?}")))?;
        // Autoplay policies reject asynchronously
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                web_sys::console::warn_2(&"[Reelkit] play() rejected:".into(), &e);
            }
        });
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.require_video("pause")?
            .pause()
            .map_err(|e| Error::media("pause", format!("{e:?}")))
    }

    fn set_muted(&mut self, muted: bool) {
        if let Some(video) = &self.video {
            video.set_muted(muted);
        }
    }

    fn current_time(&self) -> f64 {
        self.video.as_ref().map(|v| v.current_time()).unwrap_or(0.0)
    }

    fn seek(&mut self, position: f64) {
        if let Some(video) = &self.video {
            video.set_current_time(position);
        }
    }

    fn request_fullscreen(&mut self) -> Result<()> {
        let promise = call_promise(&self.container, "requestFullscreen")
            .map_err(|e| Error::FullscreenRequest(format!("{e:?}")))?;
        settle_logged(promise, "requestFullscreen() rejected:");
        Ok(())
    }

    fn exit_fullscreen(&mut self) -> Result<()> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| Error::FullscreenRequest("no document".to_string()))?;
        let promise = call_promise(&document, "exitFullscreen")
            .map_err(|e| Error::FullscreenRequest(format!("{e:?}")))?;
        settle_logged(promise, "exitFullscreen() rejected:");
        Ok(())
    }
}

/// Call a zero-argument method and keep the Promise the web-sys binding drops
pub(crate) fn call_promise(
    target: &JsValue,
    method: &str,
) -> std::result::Result<Option<Promise>, JsValue> {
    let function: Function = Reflect::get(target, &JsValue::from_str(method))?.dyn_into()?;
    let returned = function.call0(target)?;
    // Older engines return undefined instead of a Promise
    Ok(returned.dyn_into::<Promise>().ok())
}

/// Permission checks reject asynchronously; log instead of leaving them unhandled
fn settle_logged(promise: Option<Promise>, label: &'static str) {
    let Some(promise) = promise else {
        return;
    };
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = JsFuture::from(promise).await {
            web_sys::console::warn_2(&format!("[Reelkit] {label}").into(), &e);
        }
    });
}
