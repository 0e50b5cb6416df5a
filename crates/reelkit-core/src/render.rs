//! Pull-based render model
//!
//! A [`View`] is computed from the session's props and state on demand. Hosts
//! diff it against the previous view however their UI layer prefers.

use crate::Quality;
use serde::{Deserialize, Serialize};

/// Everything the host needs to draw the player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    pub surface: Surface,
    pub header: Header,
    pub controls: Controls,
}

/// The playback element to mount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Surface {
    /// No playable source
    Placeholder { message: String },
    /// Native `<video>` element
    Video {
        /// Source to set on the element; `None` when a streaming library feeds it
        src: Option<String>,
        /// A streaming library is attached to the element
        managed: bool,
    },
    /// `<iframe>` embed; a changed `key` means the element must remount
    Embed { src: String, key: u32 },
}

impl Surface {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Surface::Placeholder { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Formatted duration, e.g. "12:05"
    pub duration: Option<String>,
    pub free_preview: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    /// Custom transport controls apply (false for iframe embeds)
    pub media_controls: bool,
    pub playing: bool,
    pub muted: bool,
    pub fullscreen: bool,
    pub loading: bool,
    pub quality: Quality,
    pub quality_options: Vec<Quality>,
    pub has_next: bool,
    pub has_previous: bool,
}

/// Format seconds as `m:ss`, or `h:mm:ss` from one hour up
pub fn format_duration(seconds: u32) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}
