//! Kino Presenter CLI - Headless presenter tooling
//!
//! Features:
//! - Proxy URL construction
//! - Setup configuration preview
//! - Full session simulation against the headless runtime

use clap::{Parser, Subcommand, ValueEnum};
use kino_presenter::SeekDirection;
use std::path::PathBuf;

mod commands;
mod output;

/// Kino Presenter CLI - Stream presenter toolkit
#[derive(Parser)]
#[command(name = "kino-presenter")]
#[command(author = "Purple Squirrel Media")]
#[command(version)]
#[command(about = "Preview and simulate proxied player setups", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the proxied URL for a stream
    ProxyUrl {
        /// Source stream URL
        stream_url: String,

        /// Proxy endpoint path
        #[arg(short, long, default_value = "/")]
        proxy_path: String,
    },

    /// Print the setup object handed to the player runtime
    SetupConfig {
        /// Source stream URL
        stream_url: String,

        /// JSON file with presenter options
        #[arg(short, long)]
        options: Option<PathBuf>,

        /// Media metadata as inline JSON
        #[arg(short, long)]
        metadata: Option<String>,
    },

    /// Run a session against the headless runtime
    Simulate {
        /// Source stream URL
        stream_url: String,

        /// JSON file with presenter options
        #[arg(short, long)]
        options: Option<PathBuf>,

        /// Playhead position before the first click, in seconds
        #[arg(short, long, default_value = "0")]
        position: f64,

        /// Buttons to click, in order
        #[arg(short, long, value_enum)]
        click: Vec<Click>,

        /// Number of ready events to fire
        #[arg(short, long, default_value = "1")]
        ready_count: usize,

        /// Make runtime setup fail with this message
        #[arg(long)]
        fail_setup: Option<String>,
    },
}

/// Custom control-bar buttons
#[derive(Clone, Copy, ValueEnum)]
enum Click {
    Rewind,
    Forward,
}

impl From<Click> for SeekDirection {
    fn from(click: Click) -> Self {
        match click {
            Click::Rewind => SeekDirection::Rewind,
            Click::Forward => SeekDirection::Forward,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_writer(std::io::stderr)
        .init();

    kino_presenter::init();

    match cli.command {
        Commands::ProxyUrl { stream_url, proxy_path } => {
            commands::proxy_url(&stream_url, &proxy_path, &cli.format)?;
        }
        Commands::SetupConfig { stream_url, options, metadata } => {
            commands::setup_config(&stream_url, options, metadata, &cli.format)?;
        }
        Commands::Simulate { stream_url, options, position, click, ready_count, fail_setup } => {
            let clicks = click.into_iter().map(SeekDirection::from).collect();
            let scenario = commands::Scenario { position, clicks, ready_count, fail_setup };
            commands::simulate(&stream_url, options, scenario, &cli.format).await?;
        }
    }

    Ok(())
}
