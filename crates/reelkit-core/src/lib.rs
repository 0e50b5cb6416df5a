//! Reelkit Core - Multi-source video player logic
//!
//! This crate provides the host-agnostic core of an embeddable video player:
//! - Source classification (YouTube, Vimeo, HLS, direct file, generic embed)
//! - Quality switching per source family
//! - Streaming-library error recovery
//! - Session state driven by host events
//! - A pull-based render model
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Reelkit Core                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                             │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐       │
//! │  │    Source    │  │   Quality    │  │   Recovery   │       │
//! │  │  Classifier  │  │  Controller  │  │    Table     │       │
//! │  └──────┬───────┘  └──────┬───────┘  └──────┬───────┘       │
//! │         │                 │                 │               │
//! │         └─────────────────┼─────────────────┘               │
//! │                           │                                 │
//! │                    ┌──────┴──────┐                          │
//! │                    │   Player    │──────► View (render)     │
//! │                    │   Session   │                          │
//! │                    └──────┬──────┘                          │
//! │                           │                                 │
//! │           ┌───────────────┴───────────────┐                 │
//! │    ┌──────┴───────┐                ┌──────┴───────┐         │
//! │    │  Streaming   │                │    Media     │         │
//! │    │   Handle     │                │   Surface    │         │
//! │    └──────────────┘                └──────────────┘         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use reelkit_core::{classify, PlayerConfig, PlayerSession, Quality, VideoProps, VideoSource};
//! use reelkit_core::headless::RecordingSurface;
//!
//! assert_eq!(classify("https://cdn.example.com/master.m3u8"), VideoSource::Hls);
//!
//! let mut session = PlayerSession::new(VideoProps::new("lesson.mp4"), PlayerConfig::default());
//! let mut surface = RecordingSurface::default();
//! assert!(session.set_quality(Quality::Height(480), &mut surface));
//! ```

pub mod config;
pub mod error;
pub mod headless;
pub mod quality;
pub mod render;
pub mod session;
pub mod source;
pub mod streaming;
pub mod surface;
pub mod types;

pub use config::{EmbedConfig, HlsConfig, PlayerConfig};
pub use error::{Error, Result};
pub use quality::{direct_file_url, embed_url, select_level, LevelTarget, AUTO_LEVEL};
pub use render::{Controls, Header, Surface, View};
pub use session::PlayerSession;
pub use source::{classify, VideoSource};
pub use streaming::{recovery_action, RecoveryAction, StreamError, StreamErrorKind, StreamingHandle};
pub use surface::{MediaEvent, MediaSurface};
pub use types::*;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the player library
pub fn init() {
    tracing::info!(version = VERSION, "Reelkit Core initialized");
}
