//! Kino Presenter - Stream presentation over an external player runtime
//!
//! This crate drives a third-party web player (JW Player) for proxied HLS
//! playback:
//! - Caller options merged onto built-in defaults
//! - Proxy URL construction for the media source
//! - Layered setup configuration handed to the runtime
//! - Lifecycle handlers: volume enforcement, error logging, control-bar
//!   customization with 10 second rewind/forward buttons
//! - A headless runtime for tests and CLI simulation
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       Stream Presenter                       │
//! ├──────────────────────────────────────────────────────────────┤
//! │                                                              │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐        │
//! │  │   Presenter  │  │    Proxy     │  │    Setup     │        │
//! │  │    Config    │  │     URL      │  │    Config    │        │
//! │  └──────┬───────┘  └──────┬───────┘  └──────┬───────┘        │
//! │         └─────────────────┼─────────────────┘                │
//! │                    ┌──────┴──────┐                           │
//! │                    │  Presenter  │──── state (watch)         │
//! │                    └──────┬──────┘                           │
//! │                           │ on(ready|error)                  │
//! │  ┌──────────────┐  ┌──────┴──────┐  ┌──────────────┐         │
//! │  │ PlayerRuntime│──│ PlayerHandle│──│  ControlBar  │         │
//! │  └──────────────┘  └─────────────┘  └──────────────┘         │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod controls;
pub mod error;
#[cfg(feature = "headless")]
pub mod headless;
pub mod presenter;
pub mod proxy;
pub mod request;
pub mod runtime;
pub mod setup;

pub use config::{LogoOptions, PresenterConfig, PresenterOptions, SkinChoice, ThemeColors, ThemeOptions};
pub use controls::{customize_control_bar, ButtonSpec, ClickHandler, ControlBar, SeekDirection};
pub use error::{Error, Result};
pub use presenter::{PresenterState, RuntimeErrorRecord, StreamPresenter};
pub use proxy::{build_proxy_url, decode_proxy_url};
pub use request::{PlaybackMetadata, PlaybackRequest};
pub use runtime::{EventHandler, EventKind, InstanceId, PlayerEvent, PlayerHandle, PlayerRuntime, RuntimeError};
pub use setup::SetupConfig;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log library initialization
pub fn init() {
    tracing::info!(version = VERSION, "Kino Presenter initialized");
}
