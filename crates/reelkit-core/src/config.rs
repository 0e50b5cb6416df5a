//! Player configuration

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default tolerance when matching a requested height to a stream level
pub const DEFAULT_LEVEL_TOLERANCE: u32 = 100;

/// Player configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Maximum height distance for a nearest-level match (exclusive)
    pub level_tolerance: u32,
    /// Message rendered when no playable source exists
    pub placeholder_message: String,
    /// Options handed to the adaptive-streaming library
    pub hls: HlsConfig,
    /// Hosted-platform embed settings
    pub embed: EmbedConfig,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            level_tolerance: DEFAULT_LEVEL_TOLERANCE,
            placeholder_message: "No video available".to_string(),
            hls: HlsConfig::default(),
            embed: EmbedConfig::default(),
        }
    }
}

impl PlayerConfig {
    /// Config tuned for live lessons
    pub fn low_latency() -> Self {
        Self {
            hls: HlsConfig {
                low_latency_mode: true,
                back_buffer_length: 30,
                max_buffer_length: 10,
                ..HlsConfig::default()
            },
            ..Self::default()
        }
    }

    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: PlayerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.level_tolerance == 0 {
            return Err(Error::InvalidConfig(
                "level_tolerance must be greater than zero".to_string(),
            ));
        }
        if self.embed.youtube_base.trim().is_empty() || self.embed.vimeo_base.trim().is_empty() {
            return Err(Error::InvalidConfig("embed base URLs must not be empty".to_string()));
        }
        url::Url::parse(&self.embed.youtube_base)?;
        url::Url::parse(&self.embed.vimeo_base)?;
        Ok(())
    }
}

/// hls.js constructor options; serialized camelCase so the host can pass it through untouched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HlsConfig {
    pub enable_worker: bool,
    pub low_latency_mode: bool,
    /// Seconds of played media kept behind the playhead
    pub back_buffer_length: u32,
    /// Seconds buffered ahead of the playhead
    pub max_buffer_length: u32,
}

impl Default for HlsConfig {
    fn default() -> Self {
        Self {
            enable_worker: true,
            low_latency_mode: false,
            back_buffer_length: 90,
            max_buffer_length: 30,
        }
    }
}

/// Hosted-platform embed settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedConfig {
    /// Base for YouTube embeds; the video ID is appended as a path segment
    pub youtube_base: String,
    /// Base for Vimeo embeds; the video ID is appended as a path segment
    pub vimeo_base: String,
    pub autoplay: bool,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            youtube_base: "https://www.youtube.com/embed/".to_string(),
            vimeo_base: "https://player.vimeo.com/video/".to_string(),
            autoplay: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlayerConfig::default();
        assert_eq!(config.level_tolerance, 100);
        assert!(config.hls.enable_worker);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config = PlayerConfig::from_json_str(r#"{"level_tolerance": 50}"#).unwrap();
        assert_eq!(config.level_tolerance, 50);
        assert_eq!(config.hls, HlsConfig::default());
        assert_eq!(config.placeholder_message, "No video available");
    }

    #[test]
    fn test_zero_tolerance_rejected() {
        let err = PlayerConfig::from_json_str(r#"{"level_tolerance": 0}"#).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_bad_embed_base_rejected() {
        let err = PlayerConfig::from_json_str(r#"{"embed": {"youtube_base": "not a url"}}"#)
            .unwrap_err();
        assert_eq!(err.error_code(), "URL");
    }

    #[test]
    fn test_hls_options_serialize_camel_case() {
        let json = serde_json::to_value(HlsConfig::default()).unwrap();
        assert_eq!(json["enableWorker"], true);
        assert_eq!(json["backBufferLength"], 90);
    }

    #[test]
    fn test_low_latency_preset() {
        let config = PlayerConfig::low_latency();
        assert!(config.hls.low_latency_mode);
        assert_eq!(config.level_tolerance, DEFAULT_LEVEL_TOLERANCE);
    }
}
