//! Media element and fullscreen host seam

use crate::Result;
use serde::{Deserialize, Serialize};

/// Commands the player sends to the host's media element and document
///
/// `play` and `seek` complete asynchronously on real hosts. Implementations
/// return as soon as the command is issued and log late failures themselves.
pub trait MediaSurface {
    fn play(&mut self) -> Result<()>;

    fn pause(&mut self) -> Result<()>;

    fn set_muted(&mut self, muted: bool);

    /// Playback position in seconds
    fn current_time(&self) -> f64;

    fn seek(&mut self, position: f64);

    fn request_fullscreen(&mut self) -> Result<()>;

    fn exit_fullscreen(&mut self) -> Result<()>;
}

/// Notifications raised by the media element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaEvent {
    Playing,
    Pause,
    Ended,
    /// A (new) source has loaded enough to render its first frame
    LoadedData,
    VolumeChange { muted: bool },
}

impl MediaEvent {
    /// Map a DOM event name; `volumechange` needs the element's muted flag
    pub fn from_dom(name: &str, muted: bool) -> Option<Self> {
        match name {
            "playing" | "play" => Some(MediaEvent::Playing),
            "pause" => Some(MediaEvent::Pause),
            "ended" => Some(MediaEvent::Ended),
            "loadeddata" => Some(MediaEvent::LoadedData),
            "volumechange" => Some(MediaEvent::VolumeChange { muted }),
            _ => None,
        }
    }
}
