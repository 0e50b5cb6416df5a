//! Source classification
//!
//! Decides how a video URL is played. Checks run in a fixed order and the
//! first match wins:
//!
//! 1. YouTube video ID (11 characters)
//! 2. Vimeo video ID (numeric)
//! 3. HLS manifest (`.m3u8`)
//! 4. Direct media file (`.mp4`, `.webm`, ...)
//! 5. Anything else is embedded as-is
//!
//! Classification never fails. A blank URL yields [`VideoSource::Unavailable`],
//! which renders the placeholder.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static YOUTUBE_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:https?:)?(?://)?(?:[\w-]+\.)*(?:youtube(?:-nocookie)?\.com/(?:watch\?(?:[^#]*&)?v=|embed/|v/|e/|shorts/|live/)|youtu\.be/)([A-Za-z0-9_-]{11})(?:[^A-Za-z0-9_-]|$)",
    )
    .expect("valid YouTube pattern")
});

static VIMEO_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:https?:)?(?://)?(?:[\w-]+\.)*vimeo\.com/(?:[^?#]*/)?(\d+)(?:[/?#]|$)")
        .expect("valid Vimeo pattern")
});

/// File extensions played directly by the media element
pub const DIRECT_EXTENSIONS: [&str; 6] = ["mp4", "webm", "ogg", "ogv", "mov", "m4v"];

/// Playback strategy for a video URL
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VideoSource {
    YouTube { id: String },
    Vimeo { id: String },
    /// Adaptive HLS stream
    Hls,
    /// Single media file
    DirectFile,
    /// Unrecognized URL, rendered in an iframe
    Embed,
    /// No URL at all
    Unavailable,
}

impl VideoSource {
    pub fn name(&self) -> &'static str {
        match self {
            VideoSource::YouTube { .. } => "youtube",
            VideoSource::Vimeo { .. } => "vimeo",
            VideoSource::Hls => "hls",
            VideoSource::DirectFile => "direct_file",
            VideoSource::Embed => "embed",
            VideoSource::Unavailable => "unavailable",
        }
    }

    /// Rendered in an iframe rather than a media element
    pub fn is_embed(&self) -> bool {
        matches!(
            self,
            VideoSource::YouTube { .. } | VideoSource::Vimeo { .. } | VideoSource::Embed
        )
    }

    /// Hosted platform with an ID and a quality query parameter
    pub fn is_hosted(&self) -> bool {
        matches!(self, VideoSource::YouTube { .. } | VideoSource::Vimeo { .. })
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, VideoSource::Unavailable)
    }
}

impl std::fmt::Display for VideoSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VideoSource::YouTube { id } => write!(f, "YouTube ({id})"),
            VideoSource::Vimeo { id } => write!(f, "Vimeo ({id})"),
            VideoSource::Hls => write!(f, "HLS stream"),
            VideoSource::DirectFile => write!(f, "Direct file"),
            VideoSource::Embed => write!(f, "Embed"),
            VideoSource::Unavailable => write!(f, "Unavailable"),
        }
    }
}

/// Classify a video URL
pub fn classify(url: &str) -> VideoSource {
    let url = url.trim();
    if url.is_empty() {
        return VideoSource::Unavailable;
    }
    if let Some(id) = youtube_id(url) {
        return VideoSource::YouTube { id: id.to_string() };
    }
    if let Some(id) = vimeo_id(url) {
        return VideoSource::Vimeo { id: id.to_string() };
    }
    match extension(url).as_deref() {
        Some("m3u8") => VideoSource::Hls,
        Some(ext) if DIRECT_EXTENSIONS.contains(&ext) => VideoSource::DirectFile,
        _ => VideoSource::Embed,
    }
}

/// Extract an 11-character YouTube video ID
pub fn youtube_id(url: &str) -> Option<&str> {
    YOUTUBE_ID
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Extract a numeric Vimeo video ID
pub fn vimeo_id(url: &str) -> Option<&str> {
    VIMEO_ID.captures(url).and_then(|c| c.get(1)).map(|m| m.as_str())
}

/// Lowercased extension of the URL path, ignoring query and fragment
pub fn extension(url: &str) -> Option<String> {
    let (path, _) = split_suffix(url);
    let file = path.rsplit('/').next()?;
    let (stem, ext) = file.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Split a URL into its path part and the `?query#fragment` tail
pub(crate) fn split_suffix(url: &str) -> (&str, &str) {
    match url.find(['?', '#']) {
        Some(pos) => url.split_at(pos),
        None => (url, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yt(id: &str) -> VideoSource {
        VideoSource::YouTube { id: id.to_string() }
    }

    #[test]
    fn test_youtube_forms() {
        let id = "dQw4w9WgXcQ";
        for url in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtube.com/watch?feature=share&v=dQw4w9WgXcQ&t=42",
            "https://m.youtube.com/watch?v=dQw4w9WgXcQ#t=10",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ?si=abc",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ?rel=0",
            "https://www.youtube.com/shorts/dQw4w9WgXcQ",
            "https://www.youtube.com/live/dQw4w9WgXcQ",
            "https://www.youtube.com/v/dQw4w9WgXcQ",
        ] {
            assert_eq!(classify(url), yt(id), "{url}");
        }
    }

    #[test]
    fn test_youtube_id_must_be_eleven_chars() {
        assert_eq!(youtube_id("https://youtu.be/short"), None);
        assert_eq!(youtube_id("https://youtu.be/dQw4w9WgXcQx"), None);
        assert_eq!(classify("https://www.youtube.com/channel/UCabc"), VideoSource::Embed);
    }

    #[test]
    fn test_hosts_must_lead_the_url() {
        assert_eq!(
            classify("https://cdn.example.com/a.mp4?ref=youtu.be/abcdefghijk"),
            VideoSource::DirectFile
        );
        assert_eq!(
            classify("https://notyoutube.com/watch?v=dQw4w9WgXcQ"),
            VideoSource::Embed
        );
        assert_eq!(classify("https://example.com/?next=vimeo.com/12345"), VideoSource::Embed);
        assert_eq!(classify("youtube.com/watch?v=dQw4w9WgXcQ"), yt("dQw4w9WgXcQ"));
        assert_eq!(
            classify("//player.vimeo.com/video/76979871"),
            VideoSource::Vimeo { id: "76979871".to_string() }
        );
    }

    #[test]
    fn test_vimeo_forms() {
        for url in [
            "https://vimeo.com/76979871",
            "https://vimeo.com/channels/staffpicks/76979871",
            "https://player.vimeo.com/video/76979871?h=abc",
            "https://vimeo.com/76979871#t=5s",
        ] {
            assert_eq!(
                classify(url),
                VideoSource::Vimeo { id: "76979871".to_string() },
                "{url}"
            );
        }
        assert_eq!(vimeo_id("https://vimeo.com/user123abc"), None);
    }

    #[test]
    fn test_stream_and_file_extensions() {
        assert_eq!(classify("https://cdn.example.com/hls/master.m3u8"), VideoSource::Hls);
        assert_eq!(classify("https://cdn.example.com/live.M3U8?token=x"), VideoSource::Hls);
        assert_eq!(classify("/media/lesson.mp4"), VideoSource::DirectFile);
        assert_eq!(classify("https://cdn.example.com/a.webm#t=3"), VideoSource::DirectFile);
        assert_eq!(classify("clip.MOV"), VideoSource::DirectFile);
    }

    #[test]
    fn test_fallbacks() {
        assert_eq!(classify("https://player.example.com/watch/42"), VideoSource::Embed);
        assert_eq!(classify("https://example.com/file.mp4.html"), VideoSource::Embed);
        assert_eq!(classify(""), VideoSource::Unavailable);
        assert_eq!(classify("   "), VideoSource::Unavailable);
    }

    #[test]
    fn test_first_match_wins() {
        // A YouTube link wins over a trailing file extension
        assert_eq!(
            classify("https://youtu.be/dQw4w9WgXcQ?x=video.mp4"),
            yt("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_extension_ignores_query_and_dotted_dirs() {
        assert_eq!(extension("https://a.com/v1.2/file.mp4?x=1.m3u8").as_deref(), Some("mp4"));
        assert_eq!(extension("https://a.com/v1.2/file"), None);
        assert_eq!(extension("https://a.com/.hidden"), None);
    }

    #[test]
    fn test_source_flags() {
        assert!(yt("dQw4w9WgXcQ").is_embed());
        assert!(yt("dQw4w9WgXcQ").is_hosted());
        assert!(VideoSource::Embed.is_embed());
        assert!(!VideoSource::Embed.is_hosted());
        assert!(!VideoSource::Hls.is_embed());
        assert!(!VideoSource::Unavailable.is_available());
        assert_eq!(VideoSource::DirectFile.name(), "direct_file");
    }
}
