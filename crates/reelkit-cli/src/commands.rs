//! CLI command implementations

use crate::output::{print_json, print_table, OutputFormat};
use anyhow::{bail, Context};
use reelkit_core::{
    classify as classify_url, direct_file_url, embed_url,
    headless::{RecordingStream, RecordingSurface},
    quality::sort_levels,
    select_level, Level, LevelTarget, PlayerConfig, PlayerSession, Quality, ReportedLevel,
    Surface, VideoProps, VideoSource,
};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tabled::Tabled;
use tracing::{debug, info};

fn read_levels(path: &Path) -> anyhow::Result<Vec<ReportedLevel>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading levels from {}", path.display()))?;
    let levels: Vec<ReportedLevel> = serde_json::from_str(&content)
        .with_context(|| format!("parsing levels from {}", path.display()))?;
    Ok(levels)
}

fn describe_surface(surface: &Surface) -> String {
    match surface {
        Surface::Placeholder { message } => format!("placeholder ({message})"),
        Surface::Video { src: Some(src), .. } => format!("<video src=\"{src}\">"),
        Surface::Video { src: None, .. } => "<video> fed by streaming library".to_string(),
        Surface::Embed { src, key } => format!("<iframe src=\"{src}\"> (key {key})"),
    }
}

#[derive(Serialize)]
struct ClassifyReport<'a> {
    url: &'a str,
    source: VideoSource,
    playback_url: Option<String>,
}

/// Classify a URL and show how it would be played
pub fn classify(url: &str, config: &PlayerConfig, format: OutputFormat) -> anyhow::Result<()> {
    let source = classify_url(url);
    let playback_url = match &source {
        s if s.is_embed() => embed_url(s, url.trim(), Quality::Auto, &config.embed),
        VideoSource::Unavailable => None,
        _ => Some(url.trim().to_string()),
    };

    let report = ClassifyReport { url, source, playback_url };
    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text => {
            println!("URL:      {}", report.url);
            println!("Source:   {}", report.source);
            match &report.playback_url {
                Some(playback) => println!("Playback: {}", playback),
                None => println!("Playback: {}", config.placeholder_message),
            }
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct SwitchReport {
    source: VideoSource,
    quality: Quality,
    changed: bool,
    /// Value written to the streaming library's level selector
    level_selector: Option<i32>,
    surface: Surface,
}

/// Preview a quality switch for a URL
pub fn switch(
    url: &str,
    quality: &str,
    levels: Option<&Path>,
    config: &PlayerConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let quality: Quality = quality.parse()?;
    let mut session = PlayerSession::new(VideoProps::new(url), config.clone());
    let mut surface = RecordingSurface::default();

    let log = if session.needs_stream() {
        let Some(path) = levels else {
            bail!("HLS sources need --levels with the stream's level list");
        };
        let (stream, log) = RecordingStream::new();
        session.mount_stream(Box::new(stream));
        session.on_manifest_parsed(&read_levels(path)?);
        Some(log)
    } else {
        None
    };

    let changed = session.set_quality(quality, &mut surface);
    let level_selector = log.as_ref().and_then(|l| l.borrow().levels_set.last().copied());
    debug!(changed, ?level_selector, "Switch simulated");

    let report = SwitchReport {
        source: session.source().clone(),
        quality: session.state().quality,
        changed,
        level_selector,
        surface: session.render().surface,
    };

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text => {
            println!("Source:  {}", report.source);
            if report.changed {
                println!("Quality: {} (switched)", report.quality);
            } else {
                println!("Quality: {} (no matching variant, unchanged)", report.quality);
            }
            if let Some(selector) = report.level_selector {
                println!("Level:   {}", selector);
            }
            println!("Surface: {}", describe_surface(&report.surface));
        }
    }
    Ok(())
}

#[derive(Serialize, Tabled)]
struct LevelRow {
    #[tabled(rename = "Index")]
    index: usize,
    #[tabled(rename = "Resolution")]
    resolution: String,
    #[tabled(rename = "Bitrate")]
    bitrate: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Selected")]
    selected: String,
}

/// Show a level list the way the quality menu orders it
pub fn ladder(
    path: &Path,
    quality: Option<&str>,
    config: &PlayerConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let mut levels = Level::from_reported(&read_levels(path)?);
    sort_levels(&mut levels);

    let target = match quality {
        Some(q) => select_level(&levels, q.parse()?, config.level_tolerance),
        None => None,
    };
    if let (Some(q), None) = (quality, target) {
        info!(quality = q, "No level within tolerance");
    }

    let rows: Vec<LevelRow> = levels
        .iter()
        .map(|l| LevelRow {
            index: l.index,
            resolution: format!("{}x{}", l.width, l.height),
            bitrate: l
                .bitrate
                .map(|b| format!("{} kbps", b / 1000))
                .unwrap_or_else(|| "-".to_string()),
            label: l.label(),
            selected: (if target == Some(LevelTarget::Index(l.index)) { "*" } else { "" }).to_string(),
        })
        .collect();

    match format {
        OutputFormat::Json => print_json(&rows)?,
        OutputFormat::Text => {
            print_table(rows);
            match target {
                Some(LevelTarget::Auto) => println!("Selection: auto"),
                Some(LevelTarget::Index(i)) => println!("Selection: level {}", i),
                None if quality.is_some() => println!("Selection: none (current level kept)"),
                None => {}
            }
        }
    }
    Ok(())
}

/// Render the initial view for a props file
pub fn render(path: &Path, config: &PlayerConfig, format: OutputFormat) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading props from {}", path.display()))?;
    let props: VideoProps = serde_json::from_str(&content)?;
    let session = PlayerSession::new(props, config.clone());
    let view = session.render();

    match format {
        OutputFormat::Json => print_json(&view)?,
        OutputFormat::Text => {
            if let Some(title) = &view.header.title {
                println!("Title:    {}", title);
            }
            if let Some(duration) = &view.header.duration {
                println!("Duration: {}", duration);
            }
            if view.header.free_preview {
                println!("Free preview");
            }
            println!("Surface:  {}", describe_surface(&view.surface));
            let options: Vec<String> = view.controls.quality_options.iter().map(|q| q.to_string()).collect();
            if !options.is_empty() {
                println!("Quality:  {}", options.join(", "));
            }
            println!(
                "Nav:      previous={} next={}",
                view.controls.has_previous, view.controls.has_next
            );
        }
    }
    Ok(())
}

#[derive(Serialize, Tabled)]
struct ProbeRow {
    #[tabled(rename = "Quality")]
    quality: String,
    #[tabled(rename = "URL")]
    url: String,
    #[tabled(rename = "Status")]
    status: String,
}

/// Check which quality-specific siblings of a direct file exist on the server
pub async fn probe(url: &str, timeout_ms: u64, format: OutputFormat) -> anyhow::Result<()> {
    if classify_url(url) != VideoSource::DirectFile {
        bail!("probe only applies to direct media files, got {}", classify_url(url));
    }
    url::Url::parse(url).context("probe needs an absolute URL")?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .build()?;

    let mut rows = Vec::new();
    let mut available = 0;
    for quality in Quality::PRESETS {
        let candidate = direct_file_url(url, quality);
        let status = match client.head(&candidate).send().await {
            Ok(resp) if resp.status().is_success() => {
                available += 1;
                "OK".to_string()
            }
            Ok(resp) => resp.status().to_string(),
            Err(e) => {
                debug!(url = %candidate, error = %e, "Probe request failed");
                "UNREACHABLE".to_string()
            }
        };
        rows.push(ProbeRow {
            quality: quality.to_string(),
            url: candidate,
            status,
        });
    }

    match format {
        OutputFormat::Json => print_json(&rows)?,
        OutputFormat::Text => {
            print_table(rows);
            println!("\n{} of {} variants available", available, Quality::PRESETS.len());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_surface() {
        let video = Surface::Video { src: Some("a.mp4".into()), managed: false };
        assert_eq!(describe_surface(&video), "<video src=\"a.mp4\">");
        let managed = Surface::Video { src: None, managed: true };
        assert_eq!(describe_surface(&managed), "<video> fed by streaming library");
        let embed = Surface::Embed { src: "https://e.com/1".into(), key: 3 };
        assert_eq!(describe_surface(&embed), "<iframe src=\"https://e.com/1\"> (key 3)");
    }

    #[test]
    fn test_read_levels_missing_file() {
        let err = read_levels(Path::new("/nonexistent/levels.json")).unwrap_err();
        assert!(err.to_string().contains("reading levels"));
    }
}
