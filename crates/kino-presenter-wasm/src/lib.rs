//! Kino Presenter WASM - Browser binding for the stream presenter
//!
//! Drives the page's JW Player library through the presenter in
//! `kino-presenter`: proxied HLS setup, forced full volume and the custom
//! rewind/forward buttons.
//!
//! ## Usage
//!
//! ```javascript
//! import init, { KinoStreamPresenter } from '@kino/presenter';
//!
//! await init();
//! const presenter = new KinoStreamPresenter({ containerId: 'player', proxyPath: '/proxy' });
//! await presenter.initializeStream({
//!   streamUrl: 'https://cdn.example.com/live.m3u8',
//!   metadata: { title: 'Live' },
//! });
//! ```

use kino_presenter::{PlaybackRequest, PresenterConfig, PresenterOptions, StreamPresenter};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

mod dom;
mod jwplayer;

pub use dom::DomControlBar;
pub use jwplayer::{JwPlayerHandle, JwPlayerRuntime};

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
    kino_presenter::init();
}

/// Library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Proxied form of `stream_url`
#[wasm_bindgen(js_name = buildProxyUrl)]
pub fn build_proxy_url(stream_url: &str, proxy_path: Option<String>) -> String {
    let proxy_path = proxy_path.unwrap_or_else(|| kino_presenter::proxy::DEFAULT_PROXY_PATH.to_string());
    kino_presenter::build_proxy_url(&proxy_path, stream_url)
}

/// Stream presenter exposed to JavaScript
#[wasm_bindgen]
pub struct KinoStreamPresenter {
    inner: Rc<RefCell<StreamPresenter<JwPlayerRuntime>>>,
}

#[wasm_bindgen]
impl KinoStreamPresenter {
    /// Create a presenter; `options` may be omitted
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<KinoStreamPresenter, JsError> {
        let options: PresenterOptions = if options.is_undefined() || options.is_null() {
            PresenterOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options)?
        };
        let config = PresenterConfig::from_options(options)?;
        Ok(Self {
            inner: Rc::new(RefCell::new(StreamPresenter::new(config, JwPlayerRuntime))),
        })
    }

    /// Set up the player for `{ streamUrl, metadata }`
    ///
    /// The promise always resolves; failures are logged and reflected in
    /// `state` and `lastError`.
    #[wasm_bindgen(js_name = initializeStream)]
    pub fn initialize_stream(&self, request: JsValue) -> js_sys::Promise {
        let inner = Rc::clone(&self.inner);
        future_to_promise(async move {
            let request: PlaybackRequest = serde_wasm_bindgen::from_value(request).unwrap_or_else(|err| {
                tracing::warn!(error = %err, "Unreadable playback request");
                PlaybackRequest::default()
            });
            let Ok(mut presenter) = inner.try_borrow_mut() else {
                tracing::warn!("Initialization already in progress, request dropped");
                return Ok(JsValue::UNDEFINED);
            };
            presenter.initialize_stream(request).await;
            Ok(JsValue::UNDEFINED)
        })
    }

    /// Current lifecycle state: uninitialized, initializing, ready or error
    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        self.inner
            .try_borrow()
            .map(|presenter| presenter.state().to_string())
            .unwrap_or_else(|_| "initializing".to_string())
    }

    /// Most recent runtime error of the current instance, or `undefined`
    #[wasm_bindgen(getter, js_name = lastError)]
    pub fn last_error(&self) -> JsValue {
        let record = self.inner.try_borrow().ok().and_then(|presenter| presenter.last_error());
        let serializer = serde_wasm_bindgen::Serializer::json_compatible();
        record
            .and_then(|record| serde::Serialize::serialize(&record, &serializer).ok())
            .unwrap_or(JsValue::UNDEFINED)
    }

    /// Container reserved for error display
    #[wasm_bindgen(getter, js_name = errorContainerId)]
    pub fn error_container_id(&self) -> Option<String> {
        self.inner
            .try_borrow()
            .ok()
            .map(|presenter| presenter.config().error_container_id.clone())
    }
}
