//! Integration tests for Kino Presenter

use kino_presenter::{
    build_proxy_url, decode_proxy_url,
    headless::{HeadlessRuntime, MemoryControlBar},
    EventKind, PlaybackMetadata, PlaybackRequest, PresenterConfig, PresenterState, StreamPresenter,
};
use serde_json::json;

const REWIND: &str = "custom-rewind-btn";
const FORWARD: &str = "custom-forward-btn";

fn presenter() -> StreamPresenter<HeadlessRuntime> {
    StreamPresenter::new(PresenterConfig::default(), HeadlessRuntime::new())
}

async fn ready_presenter(stream_url: &str) -> StreamPresenter<HeadlessRuntime> {
    let mut presenter = presenter();
    presenter.initialize_stream(PlaybackRequest::new(stream_url)).await;
    presenter.runtime().last_player().unwrap().fire_ready();
    presenter
}

// =============================================================================
// Proxy URL Tests
// =============================================================================

#[test]
fn test_proxy_url_encoding() {
    assert_eq!(
        build_proxy_url("/", "http://x/a b.m3u8"),
        "/?proxy=1&url=http%3A%2F%2Fx%2Fa%20b.m3u8"
    );
}

#[test]
fn test_proxy_url_reversible() {
    let source = "https://cdn.example.com/hls/master.m3u8?sig=a/b+c==&t=1";
    let proxied = build_proxy_url("/", source);
    assert_eq!(decode_proxy_url(&proxied).as_deref(), Some(source));
}

// =============================================================================
// Initialization Tests
// =============================================================================

#[tokio::test]
async fn test_empty_url_makes_no_setup_call() {
    let mut presenter = presenter();
    presenter.initialize_stream(PlaybackRequest::new("")).await;

    assert_eq!(presenter.runtime().setup_count(), 0);
    assert_eq!(presenter.state(), PresenterState::Uninitialized);
    assert!(presenter.player().is_none());
}

#[tokio::test]
async fn test_missing_url_makes_no_setup_call() {
    let mut presenter = presenter();
    presenter.initialize_stream(PlaybackRequest::default()).await;

    assert_eq!(presenter.runtime().setup_count(), 0);
    assert_eq!(presenter.state(), PresenterState::Uninitialized);
}

#[tokio::test]
async fn test_single_setup_call_with_proxied_file() {
    let mut presenter = presenter();
    presenter.initialize_stream(PlaybackRequest::new("http://x/s.m3u8")).await;

    let calls = presenter.runtime().setup_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].container_id, "player");
    assert_eq!(calls[0].config.file(), Some(build_proxy_url("/", "http://x/s.m3u8").as_str()));
    assert_eq!(calls[0].config.stream_type(), Some("hls"));
    assert_eq!(presenter.state(), PresenterState::Initializing);
    assert!(presenter.player().is_some());
}

#[tokio::test]
async fn test_three_handlers_registered() {
    let mut presenter = presenter();
    presenter.initialize_stream(PlaybackRequest::new("http://x/s.m3u8")).await;

    let player = presenter.runtime().last_player().unwrap();
    assert_eq!(player.handler_count(EventKind::Ready), 2);
    assert_eq!(player.handler_count(EventKind::Error), 1);
}

#[tokio::test]
async fn test_caller_theme_merged_into_setup() {
    let config = PresenterConfig::from_json(r##"{"theme": {"colors": {"active": "#00ff00"}}}"##).unwrap();
    let mut presenter = StreamPresenter::new(config, HeadlessRuntime::new());
    presenter.initialize_stream(PlaybackRequest::new("http://x/s.m3u8")).await;

    let setup = presenter.runtime().setup_calls()[0].config.clone();
    let colors = setup.get("colors").unwrap();
    assert_eq!(colors["active"], json!("#00ff00"));
    assert_eq!(colors["inactive"], json!("#ffffff"));
    assert_eq!(colors["background"], json!("transparent"));
}

#[tokio::test]
async fn test_custom_proxy_path_and_metadata() {
    let config = PresenterConfig::from_json(r#"{"containerId": "stage", "proxyPath": "/relay"}"#).unwrap();
    let mut presenter = StreamPresenter::new(config, HeadlessRuntime::new());
    let request = PlaybackRequest::new("http://x/s.m3u8").with_metadata(PlaybackMetadata::titled("Pilot"));
    presenter.initialize_stream(request).await;

    let call = &presenter.runtime().setup_calls()[0];
    assert_eq!(call.container_id, "stage");
    assert_eq!(call.config.file(), Some("/relay?proxy=1&url=http%3A%2F%2Fx%2Fs.m3u8"));
    assert_eq!(call.config.get("title"), Some(&json!("Pilot")));
}

#[tokio::test]
async fn test_setup_failure_is_swallowed() {
    let mut presenter = StreamPresenter::new(PresenterConfig::default(), HeadlessRuntime::failing("no container"));
    presenter.initialize_stream(PlaybackRequest::new("http://x/s.m3u8")).await;

    assert_eq!(presenter.runtime().setup_count(), 1);
    assert_eq!(presenter.state(), PresenterState::Error);
    assert!(presenter.player().is_none());
}

#[tokio::test]
async fn test_direct_setup_failure_moves_to_error() {
    let mut presenter = StreamPresenter::new(PresenterConfig::default(), HeadlessRuntime::failing("no container"));
    let proxy_url = presenter.build_proxy_url("http://x/s.m3u8");

    let result = presenter.setup_player(&proxy_url, None).await;

    assert!(result.is_err());
    assert_eq!(presenter.state(), PresenterState::Error);
    assert!(presenter.player().is_none());
}

// =============================================================================
// Ready Handler Tests
// =============================================================================

#[tokio::test]
async fn test_ready_forces_volume_and_unmute() {
    let mut presenter = presenter();
    presenter.initialize_stream(PlaybackRequest::new("http://x/s.m3u8")).await;
    let player = presenter.runtime().last_player().unwrap();

    use kino_presenter::PlayerHandle;
    player.set_mute(true);
    player.set_volume(20);
    player.fire_ready();

    assert!(!player.is_muted());
    assert_eq!(player.volume(), 100);
    assert_eq!(presenter.state(), PresenterState::Ready);
}

#[tokio::test]
async fn test_ready_replaces_default_seek_icons() {
    let presenter = ready_presenter("http://x/s.m3u8").await;
    let bar = presenter.runtime().last_player().unwrap().bar().unwrap();

    use kino_presenter::ControlBar;
    assert_eq!(bar.count("jw-icon-rewind"), 0);
    assert_eq!(bar.count("jw-icon-forward"), 0);
    assert_eq!(bar.count(REWIND), 1);
    assert_eq!(bar.count(FORWARD), 1);

    let play = bar.index_of("jw-icon-playback").unwrap();
    assert_eq!(bar.index_of(REWIND), Some(play + 1));
    assert_eq!(bar.index_of(FORWARD), Some(play + 2));
    assert_eq!(
        bar.labels(),
        vec!["play", "⏪10", "10⏩", "volume", "0:00", "fullscreen"]
    );
}

#[tokio::test]
async fn test_repeated_ready_is_idempotent() {
    let presenter = ready_presenter("http://x/s.m3u8").await;
    let player = presenter.runtime().last_player().unwrap();
    player.fire_ready();
    player.fire_ready();

    use kino_presenter::ControlBar;
    let bar = player.bar().unwrap();
    assert_eq!(bar.count(REWIND), 1);
    assert_eq!(bar.count(FORWARD), 1);
    assert_eq!(presenter.state(), PresenterState::Ready);
}

#[tokio::test]
async fn test_rerendered_bar_customized_again() {
    let presenter = ready_presenter("http://x/s.m3u8").await;
    let player = presenter.runtime().last_player().unwrap();

    player.rerender_controls();
    use kino_presenter::ControlBar;
    assert_eq!(player.bar().unwrap().count(REWIND), 0);

    player.fire_ready();
    let bar = player.bar().unwrap();
    assert_eq!(bar.count("jw-icon-rewind"), 0);
    assert_eq!(bar.count(REWIND), 1);
    assert_eq!(bar.count(FORWARD), 1);
}

#[tokio::test]
async fn test_ready_without_control_bar_does_not_panic() {
    let mut presenter = presenter();
    presenter.initialize_stream(PlaybackRequest::new("http://x/s.m3u8")).await;
    let player = presenter.runtime().last_player().unwrap();

    player.set_control_bar(None);
    player.fire_ready();

    assert_eq!(player.volume(), 100);
    assert_eq!(presenter.state(), PresenterState::Ready);
}

#[tokio::test]
async fn test_missing_play_control_appends_buttons() {
    let mut presenter = presenter();
    presenter.initialize_stream(PlaybackRequest::new("http://x/s.m3u8")).await;
    let player = presenter.runtime().last_player().unwrap();

    let bar = MemoryControlBar::new();
    bar.push("jw-icon jw-icon-rewind", "rewind");
    bar.push("jw-icon jw-icon-volume", "volume");
    player.set_control_bar(Some(bar.clone()));
    player.fire_ready();

    assert_eq!(bar.labels(), vec!["volume", "⏪10", "10⏩"]);
}

#[tokio::test]
async fn test_lone_custom_button_rebuilt_in_order() {
    let mut presenter = presenter();
    presenter.initialize_stream(PlaybackRequest::new("http://x/s.m3u8")).await;
    let player = presenter.runtime().last_player().unwrap();

    // Re-render kept a forward button but lost the rewind one
    let bar = MemoryControlBar::new();
    bar.push("jw-icon jw-icon-playback", "play");
    bar.push("jw-icon jw-icon-volume", "volume");
    bar.push("jw-icon custom-forward-btn", "10⏩");
    player.set_control_bar(Some(bar.clone()));
    player.fire_ready();

    assert_eq!(bar.labels(), vec!["play", "⏪10", "10⏩", "volume"]);
    assert!(bar.click(FORWARD));
}

// =============================================================================
// Seek Button Tests
// =============================================================================

#[tokio::test]
async fn test_rewind_clamps_at_zero() {
    let presenter = ready_presenter("http://x/s.m3u8").await;
    let player = presenter.runtime().last_player().unwrap();
    let bar = player.bar().unwrap();

    player.set_position(5.0);
    assert!(bar.click(REWIND));
    assert_eq!(player.seeks(), vec![0.0]);

    player.set_position(15.0);
    assert!(bar.click(REWIND));
    assert_eq!(player.seeks(), vec![0.0, 5.0]);
}

#[tokio::test]
async fn test_forward_adds_ten_seconds() {
    let presenter = ready_presenter("http://x/s.m3u8").await;
    let player = presenter.runtime().last_player().unwrap();
    let bar = player.bar().unwrap();

    player.set_position(5.0);
    assert!(bar.click(FORWARD));
    assert_eq!(player.seeks(), vec![15.0]);

    // Seeks build on the new position
    assert!(bar.click(FORWARD));
    assert_eq!(player.seeks(), vec![15.0, 25.0]);
}

// =============================================================================
// Error Handling Tests
// =============================================================================

#[tokio::test]
async fn test_runtime_error_logged_and_recorded() {
    let presenter = ready_presenter("http://x/s.m3u8").await;
    let player = presenter.runtime().last_player().unwrap();

    player.fire_error(Some(232011), "Cannot load M3U8");

    assert_eq!(presenter.state(), PresenterState::Error);
    let record = presenter.last_error().unwrap();
    assert_eq!(record.error.code, Some(232011));
    assert_eq!(Some(record.instance_id), presenter.instance_id());
    // No retry
    assert_eq!(presenter.runtime().setup_count(), 1);
}

#[tokio::test]
async fn test_reinitialize_after_error() {
    let mut presenter = ready_presenter("http://x/s.m3u8").await;
    presenter.runtime().last_player().unwrap().fire_error(None, "network");
    assert_eq!(presenter.state(), PresenterState::Error);

    presenter.initialize_stream(PlaybackRequest::new("http://x/t.m3u8")).await;
    assert_eq!(presenter.state(), PresenterState::Initializing);
    assert!(presenter.last_error().is_none());

    presenter.runtime().last_player().unwrap().fire_ready();
    assert_eq!(presenter.state(), PresenterState::Ready);
    assert_eq!(presenter.runtime().setup_count(), 2);
}

#[tokio::test]
async fn test_replaced_instance_events_ignored() {
    let mut presenter = ready_presenter("http://x/s.m3u8").await;
    let old = presenter.runtime().last_player().unwrap();

    presenter.initialize_stream(PlaybackRequest::new("http://x/t.m3u8")).await;
    old.fire_error(None, "stale");

    assert_eq!(presenter.state(), PresenterState::Initializing);
    assert!(presenter.last_error().is_none());
}

#[tokio::test]
async fn test_state_subscription() {
    let mut presenter = presenter();
    let mut rx = presenter.subscribe_state();

    presenter.initialize_stream(PlaybackRequest::new("http://x/s.m3u8")).await;
    assert!(rx.has_changed().unwrap());
    assert_eq!(*rx.borrow_and_update(), PresenterState::Initializing);

    presenter.runtime().last_player().unwrap().fire_ready();
    assert_eq!(*rx.borrow_and_update(), PresenterState::Ready);
}
