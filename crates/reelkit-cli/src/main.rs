//! Reelkit CLI - Headless inspector for video sources
//!
//! Features:
//! - Source classification
//! - Quality switch preview (HLS level, file variant, embed parameters)
//! - Level ladder display
//! - View rendering from a props file
//! - HTTP probing of direct-file quality variants

use clap::{Parser, Subcommand};
use reelkit_core::PlayerConfig;
use std::path::PathBuf;

mod commands;
mod output;

use output::OutputFormat;

/// Reelkit CLI - Video source inspector
#[derive(Parser)]
#[command(name = "reelkit-cli")]
#[command(version)]
#[command(about = "Inspect how Reelkit plays and switches video sources", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Player config file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a video URL
    Classify {
        /// Video URL
        url: String,
    },

    /// Preview a quality switch
    Switch {
        /// Video URL
        url: String,

        /// Quality label (auto, 1080, 720, 480, 360, 240)
        quality: String,

        /// JSON level list for HLS sources
        #[arg(short, long)]
        levels: Option<PathBuf>,
    },

    /// Show an HLS level list in menu order
    Ladder {
        /// JSON level list
        levels: PathBuf,

        /// Highlight the level a quality request resolves to
        #[arg(short, long)]
        quality: Option<String>,
    },

    /// Render the initial view for a props file
    Render {
        /// JSON props file
        props: PathBuf,
    },

    /// Check which quality variants of a direct file exist
    Probe {
        /// Direct media file URL
        url: String,

        /// Request timeout in milliseconds
        #[arg(short, long, default_value = "5000")]
        timeout_ms: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_writer(std::io::stderr)
        .init();

    reelkit_core::init();

    let config = match &cli.config {
        Some(path) => PlayerConfig::from_file(path)?,
        None => PlayerConfig::default(),
    };
    let format = OutputFormat::from(cli.format.as_str());

    match cli.command {
        Commands::Classify { url } => {
            commands::classify(&url, &config, format)?;
        }
        Commands::Switch { url, quality, levels } => {
            commands::switch(&url, &quality, levels.as_deref(), &config, format)?;
        }
        Commands::Ladder { levels, quality } => {
            commands::ladder(&levels, quality.as_deref(), &config, format)?;
        }
        Commands::Render { props } => {
            commands::render(&props, &config, format)?;
        }
        Commands::Probe { url, timeout_ms } => {
            commands::probe(&url, timeout_ms, format).await?;
        }
    }

    Ok(())
}
