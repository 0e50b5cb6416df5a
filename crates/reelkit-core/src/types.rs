//! Core types for Reelkit

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Caller-supplied description of the video to play
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoProps {
    /// Source URL (hosted-platform page, HLS manifest, file, or embed URL)
    #[serde(alias = "videoUrl")]
    pub video_url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Duration in seconds
    pub duration: Option<u32>,
    /// Free preview lesson
    #[serde(alias = "isFree")]
    pub is_free: bool,
    #[serde(alias = "hasNext")]
    pub has_next: bool,
    #[serde(alias = "hasPrevious")]
    pub has_previous: bool,
}

impl VideoProps {
    /// Props for a bare URL with no metadata
    pub fn new(video_url: impl Into<String>) -> Self {
        Self {
            video_url: video_url.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_duration(mut self, seconds: u32) -> Self {
        self.duration = Some(seconds);
        self
    }

    pub fn with_neighbours(mut self, has_previous: bool, has_next: bool) -> Self {
        self.has_previous = has_previous;
        self.has_next = has_next;
        self
    }
}

/// Navigation effects, delegated to the caller
#[derive(Default)]
pub struct Navigation {
    pub on_next: Option<Box<dyn Fn()>>,
    pub on_previous: Option<Box<dyn Fn()>>,
}

impl Navigation {
    pub fn new(on_previous: impl Fn() + 'static, on_next: impl Fn() + 'static) -> Self {
        Self {
            on_next: Some(Box::new(on_next)),
            on_previous: Some(Box::new(on_previous)),
        }
    }
}

impl std::fmt::Debug for Navigation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigation")
            .field("on_next", &self.on_next.is_some())
            .field("on_previous", &self.on_previous.is_some())
            .finish()
    }
}

/// Selectable playback quality
///
/// `Auto` hands the choice to the streaming library; `Height` asks for a
/// specific vertical resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Quality {
    #[default]
    Auto,
    Height(u32),
}

impl Quality {
    /// Fixed quality menu for sources without a level list
    pub const PRESETS: [Quality; 6] = [
        Quality::Auto,
        Quality::Height(1080),
        Quality::Height(720),
        Quality::Height(480),
        Quality::Height(360),
        Quality::Height(240),
    ];

    /// Vertical resolution, `None` for auto
    pub fn height(&self) -> Option<u32> {
        match self {
            Quality::Auto => None,
            Quality::Height(h) => Some(*h),
        }
    }

    /// Label used in menus and wire formats: "auto", "720"
    pub fn label(&self) -> String {
        match self {
            Quality::Auto => "auto".to_string(),
            Quality::Height(h) => h.to_string(),
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, Quality::Auto)
    }
}

impl FromStr for Quality {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        if normalized == "auto" {
            return Ok(Quality::Auto);
        }
        let digits = normalized.strip_suffix('p').unwrap_or(&normalized);
        match digits.parse::<u32>() {
            Ok(h) if h > 0 => Ok(Quality::Height(h)),
            _ => Err(Error::UnknownQuality(s.to_string())),
        }
    }
}

impl TryFrom<String> for Quality {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Quality> for String {
    fn from(quality: Quality) -> Self {
        quality.label()
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Quality::Auto => write!(f, "Auto"),
            Quality::Height(h) => write!(f, "{h}p"),
        }
    }
}

/// One variant as reported by the streaming library, in library order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportedLevel {
    pub height: u32,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub bitrate: Option<u64>,
}

/// One quality variant of an adaptive stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    /// Index understood by the streaming library
    pub index: usize,
    pub height: u32,
    pub width: u32,
    /// Bandwidth in bits per second
    pub bitrate: Option<u64>,
}

impl Level {
    pub fn new(index: usize, width: u32, height: u32) -> Self {
        Self {
            index,
            height,
            width,
            bitrate: None,
        }
    }

    /// Assign library indices to levels in the order they were reported
    pub fn from_reported(reported: &[ReportedLevel]) -> Vec<Level> {
        reported
            .iter()
            .enumerate()
            .map(|(index, r)| Level {
                index,
                height: r.height,
                width: r.width,
                bitrate: r.bitrate,
            })
            .collect()
    }

    /// Menu label, e.g. "720p"
    pub fn label(&self) -> String {
        format!("{}p", self.height)
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.bitrate {
            Some(bps) => write!(f, "#{} {}x{} @ {} kbps", self.index, self.width, self.height, bps / 1000),
            None => write!(f, "#{} {}x{}", self.index, self.width, self.height),
        }
    }
}

/// Transient per-session flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlayerState {
    pub playing: bool,
    pub muted: bool,
    pub fullscreen: bool,
    pub quality: Quality,
    /// A quality switch is in flight
    pub loading: bool,
}
