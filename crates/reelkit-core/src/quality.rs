//! Quality selection
//!
//! Three ways to change quality, one per source family:
//! - HLS: pick a level index on the streaming library (or the auto sentinel)
//! - Direct file: rewrite the URL to a `_{height}p` sibling file
//! - Hosted embeds: pass the quality as a query parameter the platform understands

use crate::{config::EmbedConfig, source::split_suffix, Level, Quality, VideoSource};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use url::Url;

/// Level selector value that re-enables automatic level selection
pub const AUTO_LEVEL: i32 = -1;

/// Level chosen for a quality request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelTarget {
    Auto,
    /// Library index of the chosen level
    Index(usize),
}

impl LevelTarget {
    /// Value for the library's current-level selector
    pub fn selector(&self) -> i32 {
        match self {
            LevelTarget::Auto => AUTO_LEVEL,
            LevelTarget::Index(i) => i32::try_from(*i).unwrap_or(AUTO_LEVEL),
        }
    }
}

/// Sort levels highest first: height, then width, then bitrate
pub fn sort_levels(levels: &mut [Level]) {
    levels.sort_by_key(|l| (Reverse(l.height), Reverse(l.width), Reverse(l.bitrate)));
}

/// Resolve a quality request against the available levels
///
/// An exact height match wins. Otherwise the nearest level strictly within
/// `tolerance` is used, preferring the higher one on a tie. `None` means the
/// request matches nothing and the current level should stay.
pub fn select_level(levels: &[Level], quality: Quality, tolerance: u32) -> Option<LevelTarget> {
    let Some(target) = quality.height() else {
        return Some(LevelTarget::Auto);
    };

    if let Some(exact) = levels.iter().find(|l| l.height == target) {
        return Some(LevelTarget::Index(exact.index));
    }

    levels
        .iter()
        .map(|l| (l.height.abs_diff(target), l))
        .filter(|(distance, _)| *distance < tolerance)
        .min_by_key(|(distance, l)| (*distance, Reverse(l.height)))
        .map(|(_, l)| LevelTarget::Index(l.index))
}

/// Menu entries for an adaptive stream: auto, then one per distinct height
pub fn level_options(sorted_levels: &[Level]) -> Vec<Quality> {
    let mut options = vec![Quality::Auto];
    for level in sorted_levels {
        let quality = Quality::Height(level.height);
        if !options.contains(&quality) {
            options.push(quality);
        }
    }
    options
}

/// Build the URL of a quality-specific sibling of a direct media file
///
/// `video.mp4` at 480 becomes `video_480p.mp4`. The file is a naming
/// convention only and may not exist on the server. Auto, and URLs
/// without an extension, return the original URL.
pub fn direct_file_url(url: &str, quality: Quality) -> String {
    let Some(height) = quality.height() else {
        return url.to_string();
    };
    let (path, tail) = split_suffix(url);
    let file_start = path.rfind('/').map(|i| i + 1).unwrap_or(0);
    match path[file_start..].rfind('.') {
        Some(dot) if dot > 0 => {
            let dot = file_start + dot;
            format!("{}_{}p{}{}", &path[..dot], height, &path[dot..], tail)
        }
        _ => url.to_string(),
    }
}

/// YouTube `vq` value for a height
fn youtube_quality(height: u32) -> &'static str {
    match height {
        1080.. => "hd1080",
        720.. => "hd720",
        480.. => "large",
        360.. => "medium",
        _ => "small",
    }
}

/// Append a video ID to a platform's embed base
fn platform_url(base: &str, id: &str) -> Option<Url> {
    let mut url = Url::parse(base).ok()?;
    url.path_segments_mut().ok()?.pop_if_empty().push(id);
    Some(url)
}

/// Build the iframe URL for an embedded source at a quality
///
/// Hosted platforms get their own player URL with the quality parameter.
/// The generic embed fallback is returned untouched since its query
/// vocabulary is unknown. Returns `None` for non-embed sources.
pub fn embed_url(
    source: &VideoSource,
    original: &str,
    quality: Quality,
    config: &EmbedConfig,
) -> Option<String> {
    let autoplay = if config.autoplay { "1" } else { "0" };
    match source {
        VideoSource::YouTube { id } => {
            let mut url = platform_url(&config.youtube_base, id)?;
            {
                let mut query = url.query_pairs_mut();
                query
                    .append_pair("rel", "0")
                    .append_pair("modestbranding", "1")
                    .append_pair("autoplay", autoplay);
                if let Some(height) = quality.height() {
                    query.append_pair("vq", youtube_quality(height));
                }
            }
            Some(url.to_string())
        }
        VideoSource::Vimeo { id } => {
            let mut url = platform_url(&config.vimeo_base, id)?;
            let value = match quality.height() {
                Some(height) => format!("{height}p"),
                None => "auto".to_string(),
            };
            url.query_pairs_mut()
                .append_pair("autoplay", autoplay)
                .append_pair("quality", &value);
            Some(url.to_string())
        }
        VideoSource::Embed => Some(original.to_string()),
        _ => None,
    }
}
