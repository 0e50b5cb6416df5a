//! Adaptive-streaming library seam
//!
//! The player never parses manifests or picks bitrates itself. It drives an
//! external library (hls.js in the browser) through [`StreamingHandle`] and
//! reacts to the events that library reports.

use serde::{Deserialize, Serialize};

/// Control surface of an attached adaptive-streaming library instance
pub trait StreamingHandle {
    /// Start loading a manifest into the attached media element
    fn load_source(&mut self, url: &str);

    /// Set the active level selector; `-1` means automatic
    fn set_current_level(&mut self, level: i32);

    /// Restart loading after a network failure
    fn start_load(&mut self);

    /// Ask the library to recover its media pipeline
    fn recover_media_error(&mut self);

    /// Release buffers and network connections; the handle is unusable afterwards
    fn destroy(&mut self);
}

/// Error family reported by the streaming library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StreamErrorKind {
    Network,
    Media,
    Other,
}

impl StreamErrorKind {
    /// Map the library's error type string
    pub fn from_library(kind: &str) -> Self {
        match kind {
            "networkError" => StreamErrorKind::Network,
            "mediaError" => StreamErrorKind::Media,
            _ => StreamErrorKind::Other,
        }
    }
}

impl std::fmt::Display for StreamErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreamErrorKind::Network => write!(f, "network"),
            StreamErrorKind::Media => write!(f, "media"),
            StreamErrorKind::Other => write!(f, "other"),
        }
    }
}

/// Error notification from the streaming library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamError {
    pub kind: StreamErrorKind,
    pub fatal: bool,
    /// Library-specific detail code, e.g. "manifestLoadError"
    #[serde(default)]
    pub details: String,
}

impl StreamError {
    pub fn fatal(kind: StreamErrorKind, details: impl Into<String>) -> Self {
        Self {
            kind,
            fatal: true,
            details: details.into(),
        }
    }

    pub fn non_fatal(kind: StreamErrorKind, details: impl Into<String>) -> Self {
        Self {
            kind,
            fatal: false,
            details: details.into(),
        }
    }
}

/// What the player does about a streaming error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecoveryAction {
    /// Log only
    Ignore,
    /// Restart loading
    Reload,
    /// Recover the media pipeline in place
    RecoverMedia,
    /// Destroy the library instance
    Teardown,
}

/// Fixed recovery table for streaming errors
pub fn recovery_action(error: &StreamError) -> RecoveryAction {
    if !error.fatal {
        return RecoveryAction::Ignore;
    }
    match error.kind {
        StreamErrorKind::Network => RecoveryAction::Reload,
        StreamErrorKind::Media => RecoveryAction::RecoverMedia,
        StreamErrorKind::Other => RecoveryAction::Teardown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recovery_table() {
        use StreamErrorKind::*;
        assert_eq!(recovery_action(&StreamError::fatal(Network, "")), RecoveryAction::Reload);
        assert_eq!(recovery_action(&StreamError::fatal(Media, "")), RecoveryAction::RecoverMedia);
        assert_eq!(recovery_action(&StreamError::fatal(Other, "")), RecoveryAction::Teardown);
        for kind in [Network, Media, Other] {
            assert_eq!(
                recovery_action(&StreamError::non_fatal(kind, "")),
                RecoveryAction::Ignore
            );
        }
    }

    #[test]
    fn test_library_kind_mapping() {
        assert_eq!(StreamErrorKind::from_library("networkError"), StreamErrorKind::Network);
        assert_eq!(StreamErrorKind::from_library("mediaError"), StreamErrorKind::Media);
        assert_eq!(StreamErrorKind::from_library("muxError"), StreamErrorKind::Other);
    }

    #[test]
    fn test_error_deserializes_with_default_details() {
        let err: StreamError =
            serde_json::from_str(r#"{"kind":"network","fatal":true}"#).unwrap();
        assert_eq!(err.kind, StreamErrorKind::Network);
        assert!(err.details.is_empty());
    }
}
