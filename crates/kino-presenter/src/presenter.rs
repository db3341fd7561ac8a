//! Stream Presenter - playback initiation and instance lifecycle
//!
//! Coordinates:
//! - Request validation and proxy URL construction
//! - Setup of a runtime instance with the merged configuration
//! - Lifecycle handlers (volume, errors, control bar)
//! - State machine transitions

use crate::{
    controls::customize_control_bar,
    runtime::{EventKind, InstanceId, PlayerEvent, PlayerHandle, PlayerRuntime, RuntimeError},
    PlaybackMetadata, PlaybackRequest, PresenterConfig, Error, Result, SetupConfig,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tokio::sync::watch;
use tracing::{debug, error, info, instrument, warn};

/// Volume enforced on every `ready`
pub const FORCED_VOLUME: u8 = 100;

/// Presenter lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresenterState {
    /// No stream requested yet
    Uninitialized,
    /// Awaiting runtime setup or its first `ready`
    Initializing,
    /// Runtime signalled `ready` (may repeat)
    Ready,
    /// Setup failed or the runtime reported an error
    Error,
}

impl PresenterState {
    /// Check if transition to new state is valid
    pub fn can_transition_to(&self, next: PresenterState) -> bool {
        matches!(
            (*self, next),
            (_, PresenterState::Initializing)
                | (PresenterState::Initializing | PresenterState::Ready, PresenterState::Ready)
                | (
                    PresenterState::Initializing | PresenterState::Ready | PresenterState::Error,
                    PresenterState::Error
                )
        )
    }
}

impl std::fmt::Display for PresenterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PresenterState::Uninitialized => write!(f, "uninitialized"),
            PresenterState::Initializing => write!(f, "initializing"),
            PresenterState::Ready => write!(f, "ready"),
            PresenterState::Error => write!(f, "error"),
        }
    }
}

/// Last runtime error seen by the presenter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeErrorRecord {
    pub instance_id: InstanceId,
    pub error: RuntimeError,
    pub occurred_at: DateTime<Utc>,
}

/// State shared between the presenter and its event handlers
struct Shared {
    state_tx: watch::Sender<PresenterState>,
    current: Cell<Option<InstanceId>>,
    last_error: RefCell<Option<RuntimeErrorRecord>>,
}

impl Shared {
    fn state(&self) -> PresenterState {
        *self.state_tx.borrow()
    }

    fn is_current(&self, instance_id: InstanceId) -> bool {
        self.current.get() == Some(instance_id)
    }

    fn set_state(&self, next: PresenterState) -> Result<()> {
        let current = self.state();
        if !current.can_transition_to(next) {
            return Err(Error::InvalidStateTransition {
                from: current.to_string(),
                to: next.to_string(),
            });
        }
        self.state_tx.send_replace(next);
        if current != next {
            info!(from = %current, to = %next, "State transition");
        }
        Ok(())
    }

    /// Transition driven by a runtime event; stale instances are ignored
    fn apply_event_state(&self, instance_id: InstanceId, next: PresenterState) {
        if !self.is_current(instance_id) {
            debug!(%instance_id, to = %next, "Event from replaced instance ignored");
            return;
        }
        if let Err(err) = self.set_state(next) {
            warn!(%instance_id, error = %err, "Ignoring event");
        }
    }
}

/// Presents one stream at a time through an external player runtime
pub struct StreamPresenter<R: PlayerRuntime> {
    config: PresenterConfig,
    runtime: R,
    player: Option<Rc<R::Handle>>,
    shared: Rc<Shared>,
}

impl<R: PlayerRuntime> StreamPresenter<R> {
    /// Create a presenter with a resolved configuration
    pub fn new(config: PresenterConfig, runtime: R) -> Self {
        let (state_tx, _) = watch::channel(PresenterState::Uninitialized);
        debug!(
            container_id = %config.container_id,
            error_container_id = %config.error_container_id,
            "Presenter created"
        );

        Self {
            config,
            runtime,
            player: None,
            shared: Rc::new(Shared {
                state_tx,
                current: Cell::new(None),
                last_error: RefCell::new(None),
            }),
        }
    }

    pub fn config(&self) -> &PresenterConfig {
        &self.config
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    /// Current player instance, if setup succeeded
    pub fn player(&self) -> Option<&Rc<R::Handle>> {
        self.player.as_ref()
    }

    /// Id of the most recently requested instance
    pub fn instance_id(&self) -> Option<InstanceId> {
        self.shared.current.get()
    }

    pub fn state(&self) -> PresenterState {
        self.shared.state()
    }

    /// Subscribe to state changes
    pub fn subscribe_state(&self) -> watch::Receiver<PresenterState> {
        self.shared.state_tx.subscribe()
    }

    /// Last error reported by the current instance's runtime
    pub fn last_error(&self) -> Option<RuntimeErrorRecord> {
        self.shared.last_error.borrow().clone()
    }

    /// Wrap a stream URL in the configured proxy endpoint
    pub fn build_proxy_url(&self, stream_url: &str) -> String {
        crate::proxy::build_proxy_url(&self.config.proxy_path, stream_url)
    }

    /// Start playback for a request
    ///
    /// Failures are logged and swallowed: a missing URL aborts before any
    /// setup call, a setup failure moves the presenter to `Error`.
    #[instrument(skip(self, request), fields(container_id = %self.config.container_id))]
    pub async fn initialize_stream(&mut self, request: PlaybackRequest) {
        let PlaybackRequest { stream_url, metadata } = request;

        let Some(stream_url) = stream_url.filter(|url| !url.is_empty()) else {
            let err = Error::MissingStreamUrl;
            error!(code = err.error_code(), error = %err, "Failed to initialize stream");
            return;
        };

        let proxy_url = self.build_proxy_url(&stream_url);
        debug!(stream_url = %stream_url, proxy_url = %proxy_url, "Proxy URL built");

        if let Err(err) = self.setup_player(&proxy_url, metadata).await {
            error!(code = err.error_code(), error = %err, "Failed to initialize stream");
        }
    }

    /// Create a runtime instance for a proxied URL and wire its handlers
    ///
    /// A failed setup leaves the presenter in `Error`.
    #[instrument(skip(self, metadata), fields(container_id = %self.config.container_id))]
    pub async fn setup_player(
        &mut self,
        proxy_url: &str,
        metadata: Option<PlaybackMetadata>,
    ) -> Result<Rc<R::Handle>> {
        self.shared.set_state(PresenterState::Initializing)?;

        // Replaced instances keep firing until re-rendered; mark them stale now
        let instance_id = InstanceId::new();
        self.shared.current.set(Some(instance_id));
        *self.shared.last_error.borrow_mut() = None;
        self.player = None;

        let player = match self.create_player(proxy_url, metadata.as_ref()).await {
            Ok(player) => player,
            Err(err) => {
                if let Err(state_err) = self.shared.set_state(PresenterState::Error) {
                    warn!(error = %state_err, "Could not record setup failure");
                }
                return Err(err);
            }
        };

        self.register_handlers(&player, instance_id);
        self.player = Some(Rc::clone(&player));

        info!(%instance_id, file = proxy_url, "Player set up");
        Ok(player)
    }

    async fn create_player(
        &self,
        proxy_url: &str,
        metadata: Option<&PlaybackMetadata>,
    ) -> Result<Rc<R::Handle>> {
        let setup = SetupConfig::build(&self.config, proxy_url, metadata)?;
        self.runtime.setup(&self.config.container_id, &setup).await
    }

    fn register_handlers(&self, player: &Rc<R::Handle>, instance_id: InstanceId) {
        // ready: volume enforcement
        let weak = Rc::downgrade(player);
        let shared = Rc::clone(&self.shared);
        player.on(EventKind::Ready, Box::new(move |_: &PlayerEvent| {
            if let Some(player) = weak.upgrade() {
                enforce_volume(&*player);
            }
            shared.apply_event_state(instance_id, PresenterState::Ready);
        }));

        // error: log only, no retry
        let shared = Rc::clone(&self.shared);
        player.on(EventKind::Error, Box::new(move |event: &PlayerEvent| {
            let PlayerEvent::Error(runtime_error) = event else {
                return;
            };
            error!(
                %instance_id,
                code = ?runtime_error.code,
                message = %runtime_error.message,
                "Player runtime error"
            );
            if shared.is_current(instance_id) {
                *shared.last_error.borrow_mut() = Some(RuntimeErrorRecord {
                    instance_id,
                    error: runtime_error.clone(),
                    occurred_at: Utc::now(),
                });
            }
            shared.apply_event_state(instance_id, PresenterState::Error);
        }));

        // ready: control-bar customization
        let weak = Rc::downgrade(player);
        player.on(EventKind::Ready, Box::new(move |_: &PlayerEvent| {
            if let Some(player) = weak.upgrade() {
                customize_control_bar(&player);
            }
        }));
    }
}

/// Force audible playback regardless of skin or saved preferences
pub fn enforce_volume<H: PlayerHandle + ?Sized>(player: &H) {
    player.set_mute(false);
    player.set_volume(FORCED_VOLUME);
    debug!(volume = FORCED_VOLUME, "Volume enforced");
}
