//! CLI command implementations

use crate::output::format_output;
use anyhow::Context;
use kino_presenter::{
    build_proxy_url,
    headless::HeadlessRuntime,
    PlaybackMetadata, PlaybackRequest, PresenterConfig, PresenterState, RuntimeErrorRecord,
    SeekDirection, SetupConfig, StreamPresenter,
};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Load presenter options from a JSON file, or use defaults
fn load_config(options: Option<PathBuf>) -> anyhow::Result<PresenterConfig> {
    let Some(path) = options else {
        return Ok(PresenterConfig::default());
    };
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("reading options from {}", path.display()))?;
    let config = PresenterConfig::from_json(&raw)
        .with_context(|| format!("parsing options from {}", path.display()))?;
    debug!(path = %path.display(), "Options loaded");
    Ok(config)
}

/// Print the proxied URL for a stream
pub fn proxy_url(stream_url: &str, proxy_path: &str, format: &str) -> anyhow::Result<()> {
    anyhow::ensure!(!stream_url.is_empty(), "stream URL must not be empty");

    let proxied = build_proxy_url(proxy_path, stream_url);
    let data = json!({ "streamUrl": stream_url, "proxyUrl": proxied });
    println!("{}", format_output(&data, format, |_| proxied.clone()));
    Ok(())
}

/// Print the setup object for a stream
pub fn setup_config(
    stream_url: &str,
    options: Option<PathBuf>,
    metadata: Option<String>,
    format: &str,
) -> anyhow::Result<()> {
    anyhow::ensure!(!stream_url.is_empty(), "stream URL must not be empty");

    let config = load_config(options)?;
    let metadata: Option<PlaybackMetadata> = metadata
        .map(|raw| serde_json::from_str(&raw))
        .transpose()
        .context("parsing --metadata")?;

    let proxied = build_proxy_url(&config.proxy_path, stream_url);
    let setup = SetupConfig::build(&config, &proxied, metadata.as_ref())?;

    // The setup object is JSON either way
    println!(
        "{}",
        format_output(&setup, format, |s| serde_json::to_string_pretty(s).unwrap_or_default())
    );
    Ok(())
}

/// Simulation inputs
pub struct Scenario {
    pub position: f64,
    pub clicks: Vec<SeekDirection>,
    pub ready_count: usize,
    pub fail_setup: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulationReport {
    container_id: String,
    proxy_url: String,
    state: PresenterState,
    volume: Option<u8>,
    muted: Option<bool>,
    control_bar: Vec<String>,
    seeks: Vec<f64>,
    last_error: Option<RuntimeErrorRecord>,
}

impl SimulationReport {
    fn to_text(&self) -> String {
        let mut lines = vec![
            "Simulation:".to_string(),
            format!("  Container: {}", self.container_id),
            format!("  Proxy URL: {}", self.proxy_url),
            format!("  State: {}", self.state),
        ];
        if let (Some(volume), Some(muted)) = (self.volume, self.muted) {
            lines.push(format!("  Volume: {} ({})", volume, if muted { "muted" } else { "unmuted" }));
        }
        if !self.control_bar.is_empty() {
            lines.push(format!("  Control bar: {}", self.control_bar.join(" | ")));
        }
        if !self.seeks.is_empty() {
            let seeks: Vec<String> = self.seeks.iter().map(|s| format!("{s}s")).collect();
            lines.push(format!("  Seeks: {}", seeks.join(" -> ")));
        }
        if let Some(record) = &self.last_error {
            lines.push(format!("  Last error: {}", record.error.message));
        }
        lines.join("\n")
    }
}

/// Run a session against the headless runtime
pub async fn simulate(
    stream_url: &str,
    options: Option<PathBuf>,
    scenario: Scenario,
    format: &str,
) -> anyhow::Result<()> {
    let config = load_config(options)?;
    let runtime = HeadlessRuntime::new();
    runtime.fail_setup(scenario.fail_setup);

    let mut presenter = StreamPresenter::new(config, runtime);
    let proxy_url = presenter.build_proxy_url(stream_url);
    presenter.initialize_stream(PlaybackRequest::new(stream_url)).await;

    let player = presenter.player().cloned();
    if let Some(player) = &player {
        for _ in 0..scenario.ready_count {
            player.fire_ready();
        }
        player.set_position(scenario.position);

        match player.bar() {
            Some(bar) => {
                for direction in &scenario.clicks {
                    if !bar.click(direction.marker_class()) {
                        warn!(%direction, "Button not present, click skipped");
                    }
                }
            }
            None => warn!("No control bar rendered"),
        }
    }

    let report = SimulationReport {
        container_id: presenter.config().container_id.clone(),
        proxy_url,
        state: presenter.state(),
        volume: player.as_ref().map(|p| p.volume()),
        muted: player.as_ref().map(|p| p.is_muted()),
        control_bar: player
            .as_ref()
            .and_then(|p| p.bar())
            .map(|bar| bar.labels())
            .unwrap_or_default(),
        seeks: player.as_ref().map(|p| p.seeks()).unwrap_or_default(),
        last_error: presenter.last_error(),
    };

    println!("{}", format_output(&report, format, SimulationReport::to_text));
    Ok(())
}
