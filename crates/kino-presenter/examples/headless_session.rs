//! Headless presenter session
//!
//! Drives a presenter against the in-memory runtime and prints what the
//! runtime would have received and rendered.
//!
//! Run with: cargo run -p kino-presenter --example headless_session

use kino_presenter::{headless::HeadlessRuntime, PlaybackRequest, PresenterConfig, StreamPresenter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("debug").init();

    let config = PresenterConfig::from_json(r##"{"theme": {"colors": {"active": "#9b30ff"}}}"##)?;
    let mut presenter = StreamPresenter::new(config, HeadlessRuntime::new());

    presenter
        .initialize_stream(PlaybackRequest::new("https://example.com/live/index.m3u8"))
        .await;

    let Some(player) = presenter.runtime().last_player() else {
        anyhow::bail!("no player was created");
    };
    println!("Setup config:\n{}", serde_json::to_string_pretty(player.setup_config())?);

    player.fire_ready();
    player.set_position(42.0);
    if let Some(bar) = player.bar() {
        println!("\nControl bar: {}", bar.labels().join(" | "));
        bar.click("custom-rewind-btn");
    }

    println!("State: {}", presenter.state());
    println!("Seeks: {:?}", player.seeks());
    Ok(())
}
