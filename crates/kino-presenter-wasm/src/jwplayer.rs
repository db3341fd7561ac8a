//! JW Player runtime bindings
//!
//! The page loads the JW Player library, which installs a global
//! `jwplayer(containerId)` factory. Setup, event registration and playback
//! calls go straight through to that object.

use crate::dom::DomControlBar;
use async_trait::async_trait;
use kino_presenter::{
    controls::BUTTON_CONTAINER_CLASS, ControlBar, Error, EventHandler, EventKind, PlayerEvent,
    PlayerHandle, PlayerRuntime, Result, RuntimeError, SetupConfig,
};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[derive(Debug, Clone)]
    pub type JwPlayer;

    #[wasm_bindgen(js_name = jwplayer, catch)]
    fn jwplayer(container_id: &str) -> std::result::Result<JwPlayer, JsValue>;

    #[wasm_bindgen(method, catch)]
    fn setup(this: &JwPlayer, config: &JsValue) -> std::result::Result<JwPlayer, JsValue>;

    #[wasm_bindgen(method)]
    fn on(this: &JwPlayer, event: &str, callback: &Closure<dyn FnMut(JsValue)>);

    #[wasm_bindgen(method, js_name = setMute)]
    fn set_mute(this: &JwPlayer, state: bool);

    #[wasm_bindgen(method, js_name = setVolume)]
    fn set_volume(this: &JwPlayer, volume: u8);

    #[wasm_bindgen(method)]
    fn seek(this: &JwPlayer, position: f64);

    #[wasm_bindgen(method, js_name = getPosition)]
    fn get_position(this: &JwPlayer) -> f64;

    #[wasm_bindgen(method, js_name = getContainer)]
    fn get_container(this: &JwPlayer) -> Option<web_sys::Element>;
}

fn js_error(err: JsValue) -> Error {
    Error::setup(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

/// Read the `{code, message}` payload of an `error` event
fn runtime_error(payload: JsValue) -> RuntimeError {
    serde_wasm_bindgen::from_value(payload)
        .unwrap_or_else(|err| RuntimeError::new(None, format!("unreadable error payload: {err}")))
}

/// Runtime backed by the page's global `jwplayer` factory
#[derive(Debug, Default)]
pub struct JwPlayerRuntime;

#[async_trait(?Send)]
impl PlayerRuntime for JwPlayerRuntime {
    type Handle = JwPlayerHandle;

    async fn setup(&self, container_id: &str, config: &SetupConfig) -> Result<Rc<JwPlayerHandle>> {
        // Plain objects rather than JS Maps
        let serializer = serde_wasm_bindgen::Serializer::json_compatible();
        let js_config = config
            .serialize(&serializer)
            .map_err(|err| Error::setup(err.to_string()))?;

        let factory = jwplayer(container_id).map_err(js_error)?;
        let player = factory.setup(&js_config).map_err(js_error)?;
        Ok(Rc::new(JwPlayerHandle::new(player)))
    }
}

/// One JW Player instance and the callbacks registered on it
pub struct JwPlayerHandle {
    player: JwPlayer,
    callbacks: RefCell<Vec<Closure<dyn FnMut(JsValue)>>>,
}

impl JwPlayerHandle {
    pub fn new(player: JwPlayer) -> Self {
        Self {
            player,
            callbacks: RefCell::new(Vec::new()),
        }
    }
}

impl PlayerHandle for JwPlayerHandle {
    fn on(&self, kind: EventKind, mut handler: EventHandler) {
        let callback = Closure::<dyn FnMut(JsValue)>::new(move |payload: JsValue| {
            let event = match kind {
                EventKind::Ready => PlayerEvent::Ready,
                EventKind::Error => PlayerEvent::Error(runtime_error(payload)),
            };
            handler(&event);
        });
        self.player.on(kind.as_str(), &callback);
        // Dropping the closure would invalidate the JS callback
        self.callbacks.borrow_mut().push(callback);
    }

    fn set_mute(&self, muted: bool) {
        self.player.set_mute(muted);
    }

    fn set_volume(&self, volume: u8) {
        self.player.set_volume(volume);
    }

    fn seek(&self, position: f64) {
        self.player.seek(position);
    }

    fn position(&self) -> f64 {
        self.player.get_position()
    }

    fn control_bar(&self) -> Option<Box<dyn ControlBar>> {
        let container = self.player.get_container()?;
        let root = container
            .query_selector(&format!(".{BUTTON_CONTAINER_CLASS}"))
            .ok()
            .flatten()?;
        Some(Box::new(DomControlBar::new(root)))
    }
}
