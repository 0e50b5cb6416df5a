//! Error types for Reelkit Core

use thiserror::Error;

/// Result type alias for player operations
pub type Result<T> = std::result::Result<T, Error>;

/// Player error types
#[derive(Error, Debug)]
pub enum Error {
    // Surface errors
    #[error("Fullscreen request failed: {0}")]
    FullscreenRequest(String),

    #[error("Media command failed: {command}: {reason}")]
    MediaCommand { command: &'static str, reason: String },

    // Quality errors
    #[error("Unknown quality label: {0}")]
    UnknownQuality(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a media command error
    pub fn media(command: &'static str, reason: impl Into<String>) -> Self {
        Error::MediaCommand {
            command,
            reason: reason.into(),
        }
    }

    /// Returns true if the session can keep going after this error
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::FullscreenRequest(_) | Error::MediaCommand { .. } | Error::UnknownQuality(_)
        )
    }

    /// Returns the error code for diagnostics
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::FullscreenRequest(_) => "FULLSCREEN_REQUEST",
            Error::MediaCommand { .. } => "MEDIA_COMMAND",
            Error::UnknownQuality(_) => "UNKNOWN_QUALITY",
            Error::InvalidConfig(_) => "INVALID_CONFIG",
            Error::Json(_) => "JSON",
            Error::Url(_) => "URL",
            Error::Io(_) => "IO",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_errors() {
        assert!(Error::FullscreenRequest("denied".into()).is_recoverable());
        assert!(Error::media("play", "NotAllowedError").is_recoverable());
        assert!(!Error::InvalidConfig("bad".into()).is_recoverable());
    }

    #[test]
    fn test_error_display() {
        let err = Error::media("play", "NotAllowedError");
        assert_eq!(err.to_string(), "Media command failed: play: NotAllowedError");
        assert_eq!(err.error_code(), "MEDIA_COMMAND");
    }
}
