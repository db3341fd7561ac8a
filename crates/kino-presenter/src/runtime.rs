//! Player runtime abstraction
//!
//! The presenter never renders or decodes anything itself. It talks to an
//! external runtime through two traits:
//! - `PlayerRuntime` creates an instance from a setup object
//! - `PlayerHandle` is the instance: event subscription, state queries and
//!   mutators, plus access to its rendered control bar
//!
//! Everything runs on a single event loop, so neither trait is `Send`.

use crate::{controls::ControlBar, Error, Result, SetupConfig};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use uuid::Uuid;

/// Identifies one runtime instance created by a presenter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceId(pub Uuid);

impl InstanceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle events the presenter subscribes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Ready,
    Error,
}

impl EventKind {
    /// Event name as the runtime spells it
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Ready => "ready",
            EventKind::Error => "error",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error reported by the runtime through its `error` event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeError {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: String,
}

impl RuntimeError {
    pub fn new(code: Option<i64>, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }
}

impl From<RuntimeError> for Error {
    fn from(err: RuntimeError) -> Self {
        Error::Runtime { code: err.code, message: err.message }
    }
}

/// Event payload delivered to handlers
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    Ready,
    Error(RuntimeError),
}

impl PlayerEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            PlayerEvent::Ready => EventKind::Ready,
            PlayerEvent::Error(_) => EventKind::Error,
        }
    }
}

/// Handler invoked by the runtime; may run more than once
pub type EventHandler = Box<dyn FnMut(&PlayerEvent)>;

/// A live player instance owned by the runtime
pub trait PlayerHandle {
    /// Subscribe to an event. Handlers run in emission order, then in
    /// registration order.
    fn on(&self, kind: EventKind, handler: EventHandler);

    fn set_mute(&self, muted: bool);

    /// Volume in percent, 0-100
    fn set_volume(&self, volume: u8);

    /// Seek to an absolute position in seconds
    fn seek(&self, position: f64);

    /// Current position in seconds
    fn position(&self) -> f64;

    /// The rendered button container, if the runtime has drawn it
    fn control_bar(&self) -> Option<Box<dyn ControlBar>>;
}

/// Factory for player instances
#[async_trait(?Send)]
pub trait PlayerRuntime {
    type Handle: PlayerHandle + 'static;

    /// Create an instance inside `container_id`
    async fn setup(&self, container_id: &str, config: &SetupConfig) -> Result<Rc<Self::Handle>>;
}
