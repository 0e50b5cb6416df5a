//! Player Session - per-widget state machine
//!
//! Owns:
//! - The classified source and the caller's props
//! - Transient playback flags (playing, muted, fullscreen, quality, loading)
//! - The streaming-library handle, released exactly once on teardown
//!
//! Every host event maps to one handler method. Handlers run to completion
//! synchronously; nothing here blocks or waits on the host.

use crate::{
    config::PlayerConfig,
    quality::{self, LevelTarget},
    render::{format_duration, Controls, Header, Surface, View},
    source::{classify, VideoSource},
    streaming::{recovery_action, RecoveryAction, StreamError, StreamingHandle},
    surface::{MediaEvent, MediaSurface},
    Level, Navigation, PlayerState, Quality, ReportedLevel, VideoProps,
};
use tracing::{debug, info, instrument, warn};

/// How an HLS source is being played
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamMode {
    /// Nothing attached yet
    Detached,
    /// A streaming library instance feeds the element
    Library,
    /// The browser plays the manifest itself
    Native,
}

/// Position to restore once a replaced direct-file source has loaded
#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingResume {
    position: f64,
    play: bool,
}

/// Player session managing a single video widget
pub struct PlayerSession {
    props: VideoProps,
    navigation: Navigation,
    config: PlayerConfig,
    source: VideoSource,
    state: PlayerState,
    /// Stream levels, highest first
    levels: Vec<Level>,
    stream: Option<Box<dyn StreamingHandle>>,
    stream_mode: StreamMode,
    /// Set once a fatal error tore the stream down
    failed: bool,
    /// Active URL of a direct-file source
    current_src: String,
    /// Bumped to force an embed remount
    embed_key: u32,
    pending_resume: Option<PendingResume>,
}

impl PlayerSession {
    /// Create a new player session
    pub fn new(props: VideoProps, config: PlayerConfig) -> Self {
        let source = classify(&props.video_url);
        info!(url = %props.video_url, source = source.name(), "Video source classified");

        Self {
            current_src: props.video_url.trim().to_string(),
            props,
            navigation: Navigation::default(),
            config,
            source,
            state: PlayerState::default(),
            levels: Vec::new(),
            stream: None,
            stream_mode: StreamMode::Detached,
            failed: false,
            embed_key: 0,
            pending_resume: None,
        }
    }

    /// Attach next/previous callbacks
    pub fn with_navigation(mut self, navigation: Navigation) -> Self {
        self.set_navigation(navigation);
        self
    }

    pub fn set_navigation(&mut self, navigation: Navigation) {
        self.navigation = navigation;
    }

    pub fn props(&self) -> &VideoProps {
        &self.props
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn source(&self) -> &VideoSource {
        &self.source
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Stream levels reported by the library, highest first
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// True when the host should create a streaming-library instance
    pub fn needs_stream(&self) -> bool {
        self.source == VideoSource::Hls && self.stream_mode == StreamMode::Detached && !self.failed
    }

    pub fn has_stream(&self) -> bool {
        self.stream.is_some()
    }

    /// Hand a freshly created library instance to the session and start loading
    pub fn mount_stream(&mut self, mut handle: Box<dyn StreamingHandle>) {
        if !self.needs_stream() {
            warn!(source = self.source.name(), "Stream handle not needed, releasing it");
            handle.destroy();
            return;
        }
        handle.load_source(&self.current_src);
        self.stream = Some(handle);
        self.stream_mode = StreamMode::Library;
        info!(url = %self.current_src, "Streaming library attached");
    }

    /// Play the manifest through the browser's own HLS support
    pub fn mount_native_stream(&mut self) {
        if self.needs_stream() {
            self.stream_mode = StreamMode::Native;
            info!(url = %self.current_src, "Using native HLS playback");
        }
    }

    /// Manifest parsed: expose the level ladder highest first
    #[instrument(skip(self, reported), fields(count = reported.len()))]
    pub fn on_manifest_parsed(&mut self, reported: &[ReportedLevel]) {
        let mut levels = Level::from_reported(reported);
        quality::sort_levels(&mut levels);
        info!(
            top = levels.first().map(|l| l.height),
            bottom = levels.last().map(|l| l.height),
            "Manifest parsed"
        );
        self.levels = levels;
    }

    /// Library finished switching to a level
    pub fn on_level_switched(&mut self, index: usize) {
        debug!(level = index, "Level switched");
        self.state.loading = false;
    }

    /// Apply the recovery table to a library error
    #[instrument(skip(self), fields(kind = %error.kind, fatal = error.fatal))]
    pub fn on_stream_error(&mut self, error: &StreamError) -> RecoveryAction {
        self.state.loading = false;
        let action = recovery_action(error);

        match action {
            RecoveryAction::Ignore => {
                debug!(details = %error.details, "Non-fatal stream error");
            }
            RecoveryAction::Reload => {
                warn!(details = %error.details, "Fatal network error, reloading");
                if let Some(stream) = self.stream.as_mut() {
                    stream.start_load();
                }
            }
            RecoveryAction::RecoverMedia => {
                warn!(details = %error.details, "Fatal media error, recovering");
                if let Some(stream) = self.stream.as_mut() {
                    stream.recover_media_error();
                }
            }
            RecoveryAction::Teardown => {
                warn!(details = %error.details, "Unrecoverable stream error, tearing down");
                self.release_stream();
                self.failed = true;
            }
        }

        action
    }

    /// Change quality; returns false when the request changes nothing
    #[instrument(skip(self, surface), fields(source = self.source.name()))]
    pub fn set_quality(&mut self, quality: Quality, surface: &mut dyn MediaSurface) -> bool {
        let reselected = quality == self.state.quality;
        let changed = match self.source {
            VideoSource::Hls => self.switch_stream_level(quality),
            VideoSource::DirectFile => self.switch_direct_file(quality, surface),
            VideoSource::YouTube { .. } | VideoSource::Vimeo { .. } => {
                if quality == self.state.quality {
                    false
                } else {
                    self.embed_key = self.embed_key.wrapping_add(1);
                    true
                }
            }
            VideoSource::Embed | VideoSource::Unavailable => false,
        };

        if changed {
            self.state.quality = quality;
            // The library may not report a switch to the level it already plays
            if !reselected {
                self.state.loading = true;
            }
            info!(quality = %quality, "Quality switch started");
        } else {
            debug!(quality = %quality, "Quality switch had no effect");
        }
        changed
    }

    fn switch_stream_level(&mut self, quality: Quality) -> bool {
        let Some(stream) = self.stream.as_mut() else {
            // Native playback only supports automatic selection
            return false;
        };
        match quality::select_level(&self.levels, quality, self.config.level_tolerance) {
            Some(target) => {
                stream.set_current_level(target.selector());
                if let LevelTarget::Index(index) = target {
                    debug!(level = index, "Level selected");
                }
                true
            }
            None => false,
        }
    }

    fn switch_direct_file(&mut self, quality: Quality, surface: &mut dyn MediaSurface) -> bool {
        let next = quality::direct_file_url(self.props.video_url.trim(), quality);
        if next == self.current_src {
            return false;
        }
        self.pending_resume = Some(PendingResume {
            position: surface.current_time(),
            play: self.state.playing,
        });
        self.current_src = next;
        true
    }

    /// React to a media element notification
    pub fn on_media_event(&mut self, event: MediaEvent, surface: &mut dyn MediaSurface) {
        match event {
            MediaEvent::Playing => self.state.playing = true,
            MediaEvent::Pause | MediaEvent::Ended => self.state.playing = false,
            MediaEvent::VolumeChange { muted } => self.state.muted = muted,
            MediaEvent::LoadedData => {
                self.state.loading = false;
                if let Some(resume) = self.pending_resume.take() {
                    debug!(position = resume.position, play = resume.play, "Restoring playback");
                    if resume.position > 0.0 {
                        surface.seek(resume.position);
                    }
                    if resume.play {
                        if let Err(e) = surface.play() {
                            warn!(error = %e, "Resume after quality switch failed");
                        }
                    }
                }
            }
        }
    }

    /// The embed iframe finished loading
    pub fn on_embed_loaded(&mut self) {
        self.state.loading = false;
    }

    pub fn toggle_play(&mut self, surface: &mut dyn MediaSurface) {
        let result = if self.state.playing {
            surface.pause()
        } else {
            surface.play()
        };
        if let Err(e) = result {
            warn!(error = %e, "Play/pause command failed");
        }
    }

    pub fn toggle_mute(&mut self, surface: &mut dyn MediaSurface) {
        self.state.muted = !self.state.muted;
        surface.set_muted(self.state.muted);
    }

    /// Request or exit fullscreen
    ///
    /// The flag itself only changes in [`Self::on_fullscreen_change`].
    pub fn toggle_fullscreen(&mut self, surface: &mut dyn MediaSurface) {
        let result = if self.state.fullscreen {
            surface.exit_fullscreen()
        } else {
            surface.request_fullscreen()
        };
        if let Err(e) = result {
            warn!(error = %e, "Fullscreen toggle failed");
        }
    }

    /// Browser reported a fullscreen change
    pub fn on_fullscreen_change(&mut self, fullscreen: bool) {
        self.state.fullscreen = fullscreen;
    }

    /// Go to the next video; returns whether the callback ran
    pub fn next(&self) -> bool {
        match (&self.navigation.on_next, self.props.has_next) {
            (Some(on_next), true) => {
                on_next();
                true
            }
            _ => false,
        }
    }

    /// Go to the previous video; returns whether the callback ran
    pub fn previous(&self) -> bool {
        match (&self.navigation.on_previous, self.props.has_previous) {
            (Some(on_previous), true) => {
                on_previous();
                true
            }
            _ => false,
        }
    }

    /// Replace the props, e.g. when the caller moves to another lesson
    pub fn reload(&mut self, props: VideoProps) {
        self.release_stream();
        let source = classify(&props.video_url);
        info!(url = %props.video_url, source = source.name(), "Video source reloaded");

        self.current_src = props.video_url.trim().to_string();
        self.props = props;
        self.source = source;
        self.levels.clear();
        self.stream_mode = StreamMode::Detached;
        self.failed = false;
        self.pending_resume = None;
        self.embed_key = self.embed_key.wrapping_add(1);
        self.state = PlayerState {
            muted: self.state.muted,
            fullscreen: self.state.fullscreen,
            ..PlayerState::default()
        };
    }

    /// Release the streaming library; safe to call more than once
    ///
    /// The session can be mounted again afterwards with a fresh handle.
    pub fn unmount(&mut self) {
        self.release_stream();
        self.stream_mode = StreamMode::Detached;
        self.levels.clear();
        self.pending_resume = None;
        self.state.loading = false;
        if self.source == VideoSource::Hls {
            // A new library instance starts on automatic selection
            self.state.quality = Quality::Auto;
        }
    }

    /// The host has no way to play this source; fall back to the placeholder
    pub fn mark_unplayable(&mut self) {
        warn!(
            source = self.source.name(),
            url = %self.current_src,
            "Source cannot be played here"
        );
        self.release_stream();
        self.failed = true;
        self.state.loading = false;
    }

    /// True after a fatal error or when the host cannot play the source
    pub fn is_failed(&self) -> bool {
        self.failed
    }

    fn release_stream(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.destroy();
            info!("Streaming library destroyed");
        }
    }

    /// Entries for the quality menu
    pub fn quality_options(&self) -> Vec<Quality> {
        match &self.source {
            VideoSource::Hls if self.stream.is_some() && !self.levels.is_empty() => {
                quality::level_options(&self.levels)
            }
            VideoSource::Hls => vec![Quality::Auto],
            VideoSource::DirectFile | VideoSource::YouTube { .. } | VideoSource::Vimeo { .. } => {
                Quality::PRESETS.to_vec()
            }
            VideoSource::Embed | VideoSource::Unavailable => Vec::new(),
        }
    }

    /// Compute the view for the current state
    pub fn render(&self) -> View {
        let surface = self.render_surface();
        let media_controls = matches!(surface, Surface::Video { .. });

        View {
            header: Header {
                title: self.props.title.clone(),
                description: self.props.description.clone(),
                duration: self.props.duration.map(format_duration),
                free_preview: self.props.is_free,
            },
            controls: Controls {
                media_controls,
                playing: self.state.playing,
                muted: self.state.muted,
                fullscreen: self.state.fullscreen,
                loading: self.state.loading,
                quality: self.state.quality,
                quality_options: if surface.is_placeholder() {
                    Vec::new()
                } else {
                    self.quality_options()
                },
                has_next: self.props.has_next,
                has_previous: self.props.has_previous,
            },
            surface,
        }
    }

    fn render_surface(&self) -> Surface {
        let placeholder = || Surface::Placeholder {
            message: self.config.placeholder_message.clone(),
        };
        if self.failed {
            return placeholder();
        }

        match &self.source {
            VideoSource::Unavailable => placeholder(),
            VideoSource::Hls => match self.stream_mode {
                StreamMode::Library => Surface::Video { src: None, managed: true },
                StreamMode::Native | StreamMode::Detached => Surface::Video {
                    src: Some(self.current_src.clone()),
                    managed: false,
                },
            },
            VideoSource::DirectFile => Surface::Video {
                src: Some(self.current_src.clone()),
                managed: false,
            },
            source => match quality::embed_url(
                source,
                &self.current_src,
                self.state.quality,
                &self.config.embed,
            ) {
                Some(src) => Surface::Embed { src, key: self.embed_key },
                None => placeholder(),
            },
        }
    }
}

impl Drop for PlayerSession {
    fn drop(&mut self) {
        self.release_stream();
    }
}

impl std::fmt::Debug for PlayerSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerSession")
            .field("source", &self.source)
            .field("state", &self.state)
            .field("levels", &self.levels.len())
            .field("stream", &self.stream.is_some())
            .field("failed", &self.failed)
            .finish()
    }
}
