//! JavaScript-facing player

use crate::dom::{document_is_fullscreen, DomSurface};
use crate::hls::{HlsErrorData, HlsHandle};
use crate::to_js_error;
use js_sys::Function;
use reelkit_core::{
    MediaEvent, Navigation, PlayerConfig, PlayerSession, Quality, RecoveryAction, ReportedLevel,
    StreamError, VideoProps,
};
use wasm_bindgen::prelude::*;
use web_sys::{HtmlElement, HtmlVideoElement};

/// One video widget: a session plus the DOM it is mounted into
#[wasm_bindgen]
pub struct ReelkitPlayer {
    session: PlayerSession,
    surface: Option<DomSurface>,
}

#[wasm_bindgen]
impl ReelkitPlayer {
    /// Create a player from props (`{ videoUrl, title, ... }`) and an optional config
    #[wasm_bindgen(constructor)]
    pub fn new(props: JsValue, config: JsValue) -> Result<ReelkitPlayer, JsValue> {
        let props: VideoProps = serde_wasm_bindgen::from_value(props)?;
        let config = if config.is_undefined() || config.is_null() {
            PlayerConfig::default()
        } else {
            let config: PlayerConfig = serde_wasm_bindgen::from_value(config)?;
            config.validate().map_err(to_js_error)?;
            config
        };

        Ok(Self {
            session: PlayerSession::new(props, config),
            surface: None,
        })
    }

    /// Register previous/next callbacks
    #[wasm_bindgen(js_name = setNavigation)]
    pub fn set_navigation(&mut self, on_previous: Option<Function>, on_next: Option<Function>) {
        self.session.set_navigation(Navigation {
            on_next: on_next.map(js_callback),
            on_previous: on_previous.map(js_callback),
        });
    }

    /// True when the caller should create an hls.js instance before mounting
    #[wasm_bindgen(js_name = needsStream)]
    pub fn needs_stream(&self) -> bool {
        self.session.needs_stream()
    }

    /// Options for the hls.js constructor
    #[wasm_bindgen(js_name = hlsConfig)]
    pub fn hls_config(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.session.config().hls).map_err(JsValue::from)
    }

    /// Mount into the DOM; pass the hls.js instance when one was created
    pub fn mount(&mut self, container: HtmlElement, video: Option<HtmlVideoElement>, hls: JsValue) {
        let surface = DomSurface::new(container, video);

        if self.session.needs_stream() {
            match surface.video() {
                Some(video) if !hls.is_undefined() && !hls.is_null() => {
                    self.session.mount_stream(Box::new(HlsHandle::attach(hls, video)));
                }
                _ if surface.plays_hls_natively() => self.session.mount_native_stream(),
                _ => {
                    web_sys::console::warn_1(
                        &"[Reelkit] HLS source without hls.js or native support".into(),
                    );
                    self.session.mark_unplayable();
                }
            }
        }

        self.surface = Some(surface);
    }

    /// Release the hls.js instance and detach from the DOM
    pub fn unmount(&mut self) {
        self.session.unmount();
        self.surface = None;
    }

    #[wasm_bindgen(js_name = onManifestParsed)]
    pub fn on_manifest_parsed(&mut self, levels: JsValue) -> Result<(), JsValue> {
        let levels: Vec<ReportedLevel> = serde_wasm_bindgen::from_value(levels)?;
        self.session.on_manifest_parsed(&levels);
        Ok(())
    }

    #[wasm_bindgen(js_name = onLevelSwitched)]
    pub fn on_level_switched(&mut self, level: u32) {
        self.session.on_level_switched(level as usize);
    }

    /// Handle hls.js `ErrorData`; returns the recovery taken
    #[wasm_bindgen(js_name = onError)]
    pub fn on_error(&mut self, data: JsValue) -> Result<String, JsValue> {
        let data: HlsErrorData = serde_wasm_bindgen::from_value(data)?;
        let error = StreamError::from(data);
        if error.fatal {
            web_sys::console::error_1(
                &format!("[Reelkit] fatal {} error: {}", error.kind, error.details).into(),
            );
        }
        let action = match self.session.on_stream_error(&error) {
            RecoveryAction::Ignore => "ignore",
            RecoveryAction::Reload => "reload",
            RecoveryAction::RecoverMedia => "recoverMedia",
            RecoveryAction::Teardown => "teardown",
        };
        Ok(action.to_string())
    }

    /// Forward a `<video>` DOM event by name
    #[wasm_bindgen(js_name = onMediaEvent)]
    pub fn on_media_event(&mut self, name: &str) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let muted = surface.video().map(|v| v.muted()).unwrap_or(false);
        if let Some(event) = MediaEvent::from_dom(name, muted) {
            self.session.on_media_event(event, surface);
        }
    }

    #[wasm_bindgen(js_name = onEmbedLoaded)]
    pub fn on_embed_loaded(&mut self) {
        self.session.on_embed_loaded();
    }

    /// Call from the document `fullscreenchange` listener
    #[wasm_bindgen(js_name = onFullscreenChange)]
    pub fn on_fullscreen_change(&mut self) {
        self.session.on_fullscreen_change(document_is_fullscreen());
    }

    /// Switch quality by label ("auto", "720", ...); false when nothing changed
    #[wasm_bindgen(js_name = setQuality)]
    pub fn set_quality(&mut self, label: &str) -> Result<bool, JsValue> {
        let quality: Quality = label.parse().map_err(to_js_error)?;
        Ok(match self.surface.as_mut() {
            Some(surface) => self.session.set_quality(quality, surface),
            None => false,
        })
    }

    #[wasm_bindgen(js_name = togglePlay)]
    pub fn toggle_play(&mut self) {
        if let Some(surface) = self.surface.as_mut() {
            self.session.toggle_play(surface);
        }
    }

    #[wasm_bindgen(js_name = toggleMute)]
    pub fn toggle_mute(&mut self) {
        if let Some(surface) = self.surface.as_mut() {
            self.session.toggle_mute(surface);
        }
    }

    #[wasm_bindgen(js_name = toggleFullscreen)]
    pub fn toggle_fullscreen(&mut self) {
        if let Some(surface) = self.surface.as_mut() {
            self.session.toggle_fullscreen(surface);
        }
    }

    pub fn next(&self) -> bool {
        self.session.next()
    }

    pub fn previous(&self) -> bool {
        self.session.previous()
    }

    /// Swap in new props; the caller remounts afterwards
    pub fn reload(&mut self, props: JsValue) -> Result<(), JsValue> {
        let props: VideoProps = serde_wasm_bindgen::from_value(props)?;
        self.session.reload(props);
        Ok(())
    }

    /// Current view as a plain object
    pub fn render(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.session.render()).map_err(JsValue::from)
    }
}

fn js_callback(f: Function) -> Box<dyn Fn()> {
    Box::new(move || {
        if let Err(e) = f.call0(&JsValue::NULL) {
            web_sys::console::error_2(&"[Reelkit] navigation callback threw:".into(), &e);
        }
    })
}
