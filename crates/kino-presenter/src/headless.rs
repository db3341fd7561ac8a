//! Headless player runtime
//!
//! An in-memory stand-in for the web runtime. It records setup calls,
//! keeps registered handlers, renders a control bar made of plain records and
//! lets callers fire events, move the playhead and click buttons. Used by the
//! test suites and by `kino-presenter simulate`.

use crate::{
    controls::{ButtonSpec, ClickHandler, ControlBar, Placement},
    runtime::{EventHandler, EventKind, PlayerEvent, PlayerHandle, PlayerRuntime, RuntimeError},
    Error, Result, SetupConfig,
};
use async_trait::async_trait;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::debug;

const ICON_CLASSES: &str = "jw-icon jw-icon-inline jw-button-color jw-reset";

/// Control layout the runtime renders by default
const DEFAULT_CONTROLS: [(&str, &str); 6] = [
    ("jw-icon-playback", "play"),
    ("jw-icon-rewind", "rewind"),
    ("jw-icon-forward", "forward"),
    ("jw-icon-volume", "volume"),
    ("jw-text-elapsed", "0:00"),
    ("jw-icon-fullscreen", "fullscreen"),
];

/// One element in a memory control bar
#[derive(Clone)]
pub struct MemoryElement {
    pub class_name: String,
    pub label: String,
    on_click: Option<Rc<dyn Fn()>>,
}

impl MemoryElement {
    pub fn has_class(&self, class: &str) -> bool {
        self.class_name.split_whitespace().any(|c| c == class)
    }
}

impl std::fmt::Debug for MemoryElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryElement")
            .field("class_name", &self.class_name)
            .field("label", &self.label)
            .field("clickable", &self.on_click.is_some())
            .finish()
    }
}

/// Control bar backed by a shared element list
///
/// Clones share the same elements, like DOM node references.
#[derive(Debug, Clone, Default)]
pub struct MemoryControlBar {
    elements: Rc<RefCell<Vec<MemoryElement>>>,
}

impl MemoryControlBar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bar with the runtime's stock controls
    pub fn with_default_controls() -> Self {
        let bar = Self::new();
        for (class, label) in DEFAULT_CONTROLS {
            bar.push(&format!("{ICON_CLASSES} {class}"), label);
        }
        bar
    }

    /// Append a plain element
    pub fn push(&self, class_name: &str, label: &str) {
        self.elements.borrow_mut().push(MemoryElement {
            class_name: class_name.to_string(),
            label: label.to_string(),
            on_click: None,
        });
    }

    pub fn elements(&self) -> Vec<MemoryElement> {
        self.elements.borrow().clone()
    }

    /// Labels in visual order
    pub fn labels(&self) -> Vec<String> {
        self.elements.borrow().iter().map(|e| e.label.clone()).collect()
    }

    pub fn index_of(&self, class: &str) -> Option<usize> {
        self.elements.borrow().iter().position(|e| e.has_class(class))
    }

    /// Click the first element carrying `class`; false if none is clickable
    pub fn click(&self, class: &str) -> bool {
        let handler = self
            .elements
            .borrow()
            .iter()
            .find(|e| e.has_class(class))
            .and_then(|e| e.on_click.clone());

        match handler {
            Some(handler) => {
                handler();
                true
            }
            None => false,
        }
    }
}

impl ControlBar for MemoryControlBar {
    fn count(&self, class: &str) -> usize {
        self.elements.borrow().iter().filter(|e| e.has_class(class)).count()
    }

    fn remove_all(&mut self, class: &str) -> usize {
        let mut elements = self.elements.borrow_mut();
        let before = elements.len();
        elements.retain(|e| !e.has_class(class));
        before - elements.len()
    }

    fn insert_after(
        &mut self,
        anchor_class: &str,
        button: &ButtonSpec,
        on_click: ClickHandler,
    ) -> Result<Placement> {
        let element = MemoryElement {
            class_name: button.class_name.clone(),
            label: button.label.to_string(),
            on_click: Some(Rc::from(on_click)),
        };

        let mut elements = self.elements.borrow_mut();
        match elements.iter().position(|e| e.has_class(anchor_class)) {
            Some(index) => {
                elements.insert(index + 1, element);
                Ok(Placement::AfterAnchor)
            }
            None => {
                elements.push(element);
                Ok(Placement::Appended)
            }
        }
    }
}

/// In-memory player instance
pub struct HeadlessPlayer {
    container_id: String,
    config: SetupConfig,
    handlers: RefCell<Vec<(EventKind, EventHandler)>>,
    position: Cell<f64>,
    volume: Cell<u8>,
    muted: Cell<bool>,
    seeks: RefCell<Vec<f64>>,
    control_bar: RefCell<Option<MemoryControlBar>>,
}

impl HeadlessPlayer {
    pub fn new(container_id: &str, config: SetupConfig) -> Self {
        let volume = config
            .get("volume")
            .and_then(Value::as_u64)
            .map(|v| v.min(100) as u8)
            .unwrap_or(100);
        let muted = config.get("mute").and_then(Value::as_bool).unwrap_or(false);

        Self {
            container_id: container_id.to_string(),
            config,
            handlers: RefCell::new(Vec::new()),
            position: Cell::new(0.0),
            volume: Cell::new(volume),
            muted: Cell::new(muted),
            seeks: RefCell::new(Vec::new()),
            control_bar: RefCell::new(Some(MemoryControlBar::with_default_controls())),
        }
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    pub fn setup_config(&self) -> &SetupConfig {
        &self.config
    }

    /// Deliver an event to every handler subscribed to its kind
    pub fn emit(&self, event: PlayerEvent) {
        let kind = event.kind();
        // Handlers may subscribe while running; keep the list unborrowed
        let mut handlers = std::mem::take(&mut *self.handlers.borrow_mut());
        debug!(event = %kind, handlers = handlers.len(), "Emitting event");

        for (handler_kind, handler) in handlers.iter_mut() {
            if *handler_kind == kind {
                handler(&event);
            }
        }

        let mut slot = self.handlers.borrow_mut();
        handlers.append(&mut *slot);
        *slot = handlers;
    }

    pub fn fire_ready(&self) {
        self.emit(PlayerEvent::Ready);
    }

    pub fn fire_error(&self, code: Option<i64>, message: &str) {
        self.emit(PlayerEvent::Error(RuntimeError::new(code, message)));
    }

    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers.borrow().iter().filter(|(k, _)| *k == kind).count()
    }

    /// Move the playhead without recording a seek
    pub fn set_position(&self, position: f64) {
        self.position.set(position);
    }

    pub fn volume(&self) -> u8 {
        self.volume.get()
    }

    pub fn is_muted(&self) -> bool {
        self.muted.get()
    }

    /// Seek targets requested so far
    pub fn seeks(&self) -> Vec<f64> {
        self.seeks.borrow().clone()
    }

    /// Currently rendered bar
    pub fn bar(&self) -> Option<MemoryControlBar> {
        self.control_bar.borrow().clone()
    }

    /// Replace the bar with a freshly rendered stock one
    pub fn rerender_controls(&self) {
        *self.control_bar.borrow_mut() = Some(MemoryControlBar::with_default_controls());
    }

    /// Install a specific bar, or none
    pub fn set_control_bar(&self, bar: Option<MemoryControlBar>) {
        *self.control_bar.borrow_mut() = bar;
    }
}

impl PlayerHandle for HeadlessPlayer {
    fn on(&self, kind: EventKind, handler: EventHandler) {
        self.handlers.borrow_mut().push((kind, handler));
    }

    fn set_mute(&self, muted: bool) {
        self.muted.set(muted);
    }

    fn set_volume(&self, volume: u8) {
        self.volume.set(volume.min(100));
    }

    fn seek(&self, position: f64) {
        self.seeks.borrow_mut().push(position);
        self.position.set(position);
    }

    fn position(&self) -> f64 {
        self.position.get()
    }

    fn control_bar(&self) -> Option<Box<dyn ControlBar>> {
        self.control_bar
            .borrow()
            .clone()
            .map(|bar| Box::new(bar) as Box<dyn ControlBar>)
    }
}

/// A recorded `setup` call
#[derive(Debug, Clone)]
pub struct SetupCall {
    pub container_id: String,
    pub config: SetupConfig,
}

/// Runtime creating `HeadlessPlayer` instances
#[derive(Default)]
pub struct HeadlessRuntime {
    calls: RefCell<Vec<SetupCall>>,
    players: RefCell<Vec<Rc<HeadlessPlayer>>>,
    fail_with: RefCell<Option<String>>,
}

impl HeadlessRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runtime whose setup always fails
    pub fn failing(message: impl Into<String>) -> Self {
        let runtime = Self::new();
        runtime.fail_setup(Some(message.into()));
        runtime
    }

    pub fn fail_setup(&self, message: Option<String>) {
        *self.fail_with.borrow_mut() = message;
    }

    pub fn setup_calls(&self) -> Vec<SetupCall> {
        self.calls.borrow().clone()
    }

    pub fn setup_count(&self) -> usize {
        self.calls.borrow().len()
    }

    /// Most recently created instance
    pub fn last_player(&self) -> Option<Rc<HeadlessPlayer>> {
        self.players.borrow().last().cloned()
    }

    pub fn players(&self) -> Vec<Rc<HeadlessPlayer>> {
        self.players.borrow().clone()
    }
}

#[async_trait(?Send)]
impl PlayerRuntime for HeadlessRuntime {
    type Handle = HeadlessPlayer;

    async fn setup(&self, container_id: &str, config: &SetupConfig) -> Result<Rc<HeadlessPlayer>> {
        self.calls.borrow_mut().push(SetupCall {
            container_id: container_id.to_string(),
            config: config.clone(),
        });

        if let Some(message) = self.fail_with.borrow().clone() {
            return Err(Error::setup(message));
        }

        let player = Rc::new(HeadlessPlayer::new(container_id, config.clone()));
        self.players.borrow_mut().push(Rc::clone(&player));
        debug!(container_id, file = ?config.file(), "Headless player created");
        Ok(player)
    }
}
