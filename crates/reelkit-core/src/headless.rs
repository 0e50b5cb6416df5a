//! Headless host implementations
//!
//! [`RecordingStream`] and [`RecordingSurface`] stand in for hls.js and the
//! browser when there is no DOM: the CLI drives sessions with them, and tests
//! assert on the commands they record.

use crate::{streaming::StreamingHandle, surface::MediaSurface, Error, Result};
use std::cell::RefCell;
use std::rc::Rc;

/// Commands received by a [`RecordingStream`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamCalls {
    pub loaded: Vec<String>,
    pub levels_set: Vec<i32>,
    pub start_loads: u32,
    pub media_recoveries: u32,
    pub destroyed: u32,
}

/// Shared view of a stream's recorded calls, kept by the creator after the
/// handle moves into a session
pub type StreamLog = Rc<RefCell<StreamCalls>>;

/// Streaming handle that records every command
#[derive(Debug)]
pub struct RecordingStream {
    calls: StreamLog,
}

impl RecordingStream {
    pub fn new() -> (Self, StreamLog) {
        let calls = StreamLog::default();
        (
            Self {
                calls: Rc::clone(&calls),
            },
            calls,
        )
    }
}

impl StreamingHandle for RecordingStream {
    fn load_source(&mut self, url: &str) {
        self.calls.borrow_mut().loaded.push(url.to_string());
    }

    fn set_current_level(&mut self, level: i32) {
        self.calls.borrow_mut().levels_set.push(level);
    }

    fn start_load(&mut self) {
        self.calls.borrow_mut().start_loads += 1;
    }

    fn recover_media_error(&mut self) {
        self.calls.borrow_mut().media_recoveries += 1;
    }

    fn destroy(&mut self) {
        self.calls.borrow_mut().destroyed += 1;
    }
}

/// Media surface that records commands and reports a fixed position
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingSurface {
    /// Position reported by `current_time`
    pub time: f64,
    /// Fail fullscreen requests the way a browser without a user gesture does
    pub deny_fullscreen: bool,
    pub plays: u32,
    pub pauses: u32,
    pub seeks: Vec<f64>,
    pub muted: Option<bool>,
    pub fullscreen_requests: u32,
    pub fullscreen_exits: u32,
}

impl MediaSurface for RecordingSurface {
    fn play(&mut self) -> Result<()> {
        self.plays += 1;
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.pauses += 1;
        Ok(())
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = Some(muted);
    }

    fn current_time(&self) -> f64 {
        self.time
    }

    fn seek(&mut self, position: f64) {
        self.seeks.push(position);
        self.time = position;
    }

    fn request_fullscreen(&mut self) -> Result<()> {
        if self.deny_fullscreen {
            return Err(Error::FullscreenRequest(
                "request not triggered by user activation".to_string(),
            ));
        }
        self.fullscreen_requests += 1;
        Ok(())
    }

    fn exit_fullscreen(&mut self) -> Result<()> {
        self.fullscreen_exits += 1;
        Ok(())
    }
}
