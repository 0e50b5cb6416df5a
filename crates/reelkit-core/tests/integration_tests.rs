//! Integration tests for Reelkit Core

use proptest::prelude::*;
use reelkit_core::{
    classify, direct_file_url,
    headless::{RecordingStream, RecordingSurface, StreamLog},
    select_level, Level, MediaEvent, PlayerConfig, PlayerSession, Quality, RecoveryAction,
    ReportedLevel, StreamError, StreamErrorKind, Surface, VideoProps, VideoSource,
};

fn levels(heights: &[u32]) -> Vec<ReportedLevel> {
    heights
        .iter()
        .map(|h| ReportedLevel {
            height: *h,
            width: h * 16 / 9,
            bitrate: Some(u64::from(*h) * 2_500),
        })
        .collect()
}

fn mounted_stream_session(url: &str) -> (PlayerSession, StreamLog) {
    let mut session = PlayerSession::new(VideoProps::new(url), PlayerConfig::default());
    let (stream, log) = RecordingStream::new();
    session.mount_stream(Box::new(stream));
    (session, log)
}

// =============================================================================
// Classification Tests
// =============================================================================

#[test]
fn test_classification_order() {
    assert!(matches!(classify("https://youtu.be/abcdefghijk"), VideoSource::YouTube { .. }));
    assert!(matches!(classify("https://vimeo.com/12345"), VideoSource::Vimeo { .. }));
    assert_eq!(classify("https://cdn.example.com/a/master.m3u8"), VideoSource::Hls);
    assert_eq!(classify("https://cdn.example.com/a/video.mp4"), VideoSource::DirectFile);
    assert_eq!(classify("https://lms.example.com/embed/99"), VideoSource::Embed);
    assert_eq!(classify(""), VideoSource::Unavailable);
}

#[test]
fn test_unavailable_renders_placeholder() {
    let session = PlayerSession::new(VideoProps::new(""), PlayerConfig::default());
    let view = session.render();
    assert_eq!(
        view.surface,
        Surface::Placeholder { message: "No video available".to_string() }
    );
    assert!(view.controls.quality_options.is_empty());
    assert!(!view.controls.media_controls);
}

proptest! {
    #[test]
    fn prop_youtube_id_extracted(
        id in "[A-Za-z0-9_-]{11}",
        form in 0usize..5,
    ) {
        let url = match form {
            0 => format!("https://www.youtube.com/watch?v={id}"),
            1 => format!("https://youtu.be/{id}"),
            2 => format!("https://www.youtube.com/embed/{id}?rel=0"),
            3 => format!("https://www.youtube.com/shorts/{id}"),
            _ => format!("https://m.youtube.com/watch?list=PL1&v={id}&t=30s"),
        };
        prop_assert_eq!(classify(&url), VideoSource::YouTube { id });
    }

    #[test]
    fn prop_direct_file_suffix(
        stem in "[a-z][a-z0-9_-]{0,12}",
        ext in prop::sample::select(vec!["mp4", "webm", "mov"]),
        height in prop::sample::select(vec![1080u32, 720, 480, 360, 240]),
    ) {
        let url = format!("https://cdn.example.com/media/{stem}.{ext}");
        let switched = direct_file_url(&url, Quality::Height(height));
        prop_assert_eq!(
            switched,
            format!("https://cdn.example.com/media/{stem}_{height}p.{ext}")
        );
    }

    #[test]
    fn prop_selected_level_within_tolerance(
        heights in prop::collection::vec(100u32..2200, 1..8),
        target in 100u32..2200,
    ) {
        let ladder: Vec<Level> = heights
            .iter()
            .enumerate()
            .map(|(i, h)| Level::new(i, 0, *h))
            .collect();
        if let Some(target_level) = select_level(&ladder, Quality::Height(target), 100) {
            let selector = target_level.selector();
            prop_assert!(selector >= 0);
            let chosen = ladder[selector as usize];
            prop_assert!(chosen.height.abs_diff(target) < 100);
        } else {
            prop_assert!(ladder.iter().all(|l| l.height.abs_diff(target) >= 100));
        }
    }
}

// =============================================================================
// Quality Controller Tests
// =============================================================================

#[test]
fn test_manifest_levels_sorted_descending() {
    let (mut session, _log) = mounted_stream_session("https://cdn.example.com/master.m3u8");
    session.on_manifest_parsed(&levels(&[360, 720, 1080]));

    let heights: Vec<u32> = session.levels().iter().map(|l| l.height).collect();
    assert_eq!(heights, vec![1080, 720, 360]);
    assert!(heights.windows(2).all(|w| w[0] > w[1]));
    assert_eq!(
        session.quality_options(),
        vec![
            Quality::Auto,
            Quality::Height(1080),
            Quality::Height(720),
            Quality::Height(360)
        ]
    );
}

#[test]
fn test_missing_level_is_noop() {
    let (mut session, log) = mounted_stream_session("https://cdn.example.com/master.m3u8");
    let mut surface = RecordingSurface::default();
    session.on_manifest_parsed(&levels(&[360, 480, 1080]));

    assert!(!session.set_quality(Quality::Height(720), &mut surface));
    assert!(log.borrow().levels_set.is_empty());
    assert_eq!(session.state().quality, Quality::Auto);
}

#[test]
fn test_auto_sets_sentinel_exactly_once() {
    let (mut session, log) = mounted_stream_session("https://cdn.example.com/master.m3u8");
    let mut surface = RecordingSurface::default();
    session.on_manifest_parsed(&levels(&[360, 720, 1080]));

    assert!(session.set_quality(Quality::Auto, &mut surface));
    assert_eq!(log.borrow().levels_set, vec![-1]);
}

#[test]
fn test_switch_uses_library_index() {
    let (mut session, log) = mounted_stream_session("https://cdn.example.com/master.m3u8");
    let mut surface = RecordingSurface::default();
    // Library order differs from the sorted ladder
    session.on_manifest_parsed(&levels(&[720, 360, 1080]));

    session.set_quality(Quality::Height(1080), &mut surface);
    session.set_quality(Quality::Height(360), &mut surface);
    assert_eq!(log.borrow().levels_set, vec![2, 1]);
}

#[test]
fn test_direct_file_quality_url() {
    assert_eq!(direct_file_url("video.mp4", Quality::Height(480)), "video_480p.mp4");

    let mut session = PlayerSession::new(VideoProps::new("video.mp4"), PlayerConfig::default());
    let mut surface = RecordingSurface::default();
    session.set_quality(Quality::Height(480), &mut surface);
    assert_eq!(
        session.render().surface,
        Surface::Video { src: Some("video_480p.mp4".to_string()), managed: false }
    );

    // Back to auto restores the original file
    session.set_quality(Quality::Auto, &mut surface);
    session.on_media_event(MediaEvent::LoadedData, &mut surface);
    assert_eq!(
        session.render().surface,
        Surface::Video { src: Some("video.mp4".to_string()), managed: false }
    );
}

#[test]
fn test_custom_tolerance() {
    let config = PlayerConfig { level_tolerance: 250, ..PlayerConfig::default() };
    let mut session =
        PlayerSession::new(VideoProps::new("https://cdn.example.com/master.m3u8"), config);
    let (stream, log) = RecordingStream::new();
    session.mount_stream(Box::new(stream));
    session.on_manifest_parsed(&levels(&[360, 480, 1080]));

    let mut surface = RecordingSurface::default();
    assert!(session.set_quality(Quality::Height(720), &mut surface));
    // 480 is 240 away, 1080 is 360 away
    assert_eq!(log.borrow().levels_set, vec![1]);
}

// =============================================================================
// Lifecycle Tests
// =============================================================================

#[test]
fn test_unmount_destroys_once() {
    let (mut session, log) = mounted_stream_session("https://cdn.example.com/master.m3u8");
    session.unmount();
    session.unmount();
    drop(session);
    assert_eq!(log.borrow().destroyed, 1);
}

#[test]
fn test_drop_destroys_once() {
    let (session, log) = mounted_stream_session("https://cdn.example.com/master.m3u8");
    drop(session);
    assert_eq!(log.borrow().destroyed, 1);
}

#[test]
fn test_recovery_table_drives_stream() {
    let (mut session, log) = mounted_stream_session("https://cdn.example.com/master.m3u8");

    let network = StreamError::fatal(StreamErrorKind::Network, "manifestLoadError");
    assert_eq!(session.on_stream_error(&network), RecoveryAction::Reload);
    assert_eq!(log.borrow().start_loads, 1);

    let media = StreamError::fatal(StreamErrorKind::Media, "bufferStalledError");
    assert_eq!(session.on_stream_error(&media), RecoveryAction::RecoverMedia);
    assert_eq!(log.borrow().media_recoveries, 1);

    let ignored = StreamError::non_fatal(StreamErrorKind::Network, "fragLoadError");
    assert_eq!(session.on_stream_error(&ignored), RecoveryAction::Ignore);
    assert!(session.has_stream());

    let other = StreamError::fatal(StreamErrorKind::Other, "internalException");
    assert_eq!(session.on_stream_error(&other), RecoveryAction::Teardown);
    assert!(!session.has_stream());
    assert_eq!(log.borrow().destroyed, 1);
    assert!(session.render().surface.is_placeholder());

    // No second destroy on drop
    drop(session);
    assert_eq!(log.borrow().destroyed, 1);
}

// =============================================================================
// Render Tests
// =============================================================================

#[test]
fn test_render_header_and_controls() {
    let props = VideoProps {
        video_url: "https://vimeo.com/76979871".to_string(),
        title: Some("Lesson 3".to_string()),
        description: Some("Ownership".to_string()),
        duration: Some(754),
        is_free: true,
        has_next: true,
        has_previous: false,
    };
    let session = PlayerSession::new(props, PlayerConfig::default());
    let view = session.render();

    assert_eq!(view.header.title.as_deref(), Some("Lesson 3"));
    assert_eq!(view.header.duration.as_deref(), Some("12:34"));
    assert!(view.header.free_preview);
    assert!(view.controls.has_next);
    assert!(!view.controls.has_previous);
    assert!(!view.controls.media_controls);
    assert_eq!(view.controls.quality_options, Quality::PRESETS.to_vec());
    match view.surface {
        Surface::Embed { src, key } => {
            assert_eq!(key, 0);
            assert!(src.starts_with("https://player.vimeo.com/video/76979871?"));
            assert!(src.ends_with("quality=auto"));
        }
        other => panic!("expected embed, got {other:?}"),
    }
}

#[test]
fn test_stream_surface_managed_after_mount() {
    let (session, _log) = mounted_stream_session("https://cdn.example.com/master.m3u8");
    assert_eq!(session.render().surface, Surface::Video { src: None, managed: true });
}

#[test]
fn test_view_serializes_for_hosts() {
    let session = PlayerSession::new(VideoProps::new("video.mp4"), PlayerConfig::default());
    let json = serde_json::to_value(session.render()).unwrap();
    assert_eq!(json["surface"]["type"], "video");
    assert_eq!(json["controls"]["quality"], "auto");
    assert_eq!(json["controls"]["quality_options"][1], "1080");
}
