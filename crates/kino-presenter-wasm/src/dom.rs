//! DOM-backed control bar

use kino_presenter::{controls::Placement, ButtonSpec, ClickHandler, ControlBar, Error, Result};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Element;

fn dom_error(err: JsValue) -> Error {
    Error::ControlBar(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

fn selector(class: &str) -> String {
    format!(".{class}")
}

/// The runtime's rendered `.jw-button-container`
pub struct DomControlBar {
    root: Element,
}

impl DomControlBar {
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    fn first(&self, class: &str) -> Option<Element> {
        self.root.query_selector(&selector(class)).ok().flatten()
    }
}

impl ControlBar for DomControlBar {
    fn count(&self, class: &str) -> usize {
        self.root
            .query_selector_all(&selector(class))
            .map(|nodes| nodes.length() as usize)
            .unwrap_or(0)
    }

    fn remove_all(&mut self, class: &str) -> usize {
        let mut removed = 0;
        while let Some(element) = self.first(class) {
            element.remove();
            removed += 1;
        }
        removed
    }

    fn insert_after(
        &mut self,
        anchor_class: &str,
        button: &ButtonSpec,
        on_click: ClickHandler,
    ) -> Result<Placement> {
        let document = self
            .root
            .owner_document()
            .ok_or_else(|| Error::ControlBar("control bar is detached".to_string()))?;

        let element = document.create_element("div").map_err(dom_error)?;
        element.set_class_name(&button.class_name);
        element.set_text_content(Some(button.label));

        // The element owns the callback from here on
        let callback = Closure::<dyn Fn()>::new(move || on_click()).into_js_value();
        element
            .add_event_listener_with_callback("click", callback.unchecked_ref())
            .map_err(dom_error)?;

        match self.first(anchor_class) {
            Some(anchor) => {
                anchor
                    .insert_adjacent_element("afterend", &element)
                    .map_err(dom_error)?;
                Ok(Placement::AfterAnchor)
            }
            None => {
                self.root.append_child(&element).map_err(dom_error)?;
                Ok(Placement::Appended)
            }
        }
    }
}
