use std::cell::Cell;
use std::rc::Rc;

use js_sys::Reflect;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event};

use formpad_core::config::FormConfig;

use crate::dom::debug_enabled;
use crate::pad::wire_pad;
use crate::rows::wire_collection;

/// Id of the JSON block the host page embeds to describe its widgets.
const CONFIG_ID: &str = "formpad-config";

fn document_ready_state(document: &Document) -> Option<String> {
    Reflect::get(document.as_ref(), &JsValue::from_str("readyState"))
        .ok()?
        .as_string()
}

#[wasm_bindgen(start)]
pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;
    let started = Rc::new(Cell::new(false));

    if document_ready_state(&document).as_deref() == Some("complete") {
        started.set(true);
        return start_app();
    }

    let onload_started = started.clone();
    let onload = Closure::<dyn FnMut(Event)>::new(move |_| {
        if onload_started.replace(true) {
            return;
        }
        if let Err(err) = start_app() {
            web_sys::console::error_1(&err);
        }
    });
    window.add_event_listener_with_callback("load", onload.as_ref().unchecked_ref())?;
    onload.forget();

    Ok(())
}

fn start_app() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;
    let debug = debug_enabled(&window);

    let Some(config) = read_config(&document) else {
        web_sys::console::warn_1(
            &format!("formpad: no usable #{CONFIG_ID} block, widgets disabled").into(),
        );
        return Ok(());
    };

    if debug {
        web_sys::console::log_1(
            &format!(
                "formpad: wiring {} collection(s), signature={}",
                config.collections.len(),
                config.signature.is_some()
            )
            .into(),
        );
    }

    // A widget with missing anchors disables itself; nothing surfaces to the
    // host page and the remaining widgets still wire.
    for collection in config.collections {
        let prefix = collection.prefix.clone();
        if let Err(err) = wire_collection(&document, collection) {
            web_sys::console::warn_1(
                &format!("formpad: collection {prefix} disabled: {err:?}").into(),
            );
        }
    }
    if let Some(pad_config) = config.signature {
        if let Err(err) = wire_pad(&window, &document, pad_config) {
            web_sys::console::warn_1(&format!("formpad: signature pad disabled: {err:?}").into());
        }
    }

    Ok(())
}

fn read_config(document: &Document) -> Option<FormConfig> {
    let element = document.get_element_by_id(CONFIG_ID)?;
    let text = element.text_content()?;
    match serde_json::from_str(&text) {
        Ok(config) => Some(config),
        Err(error) => {
            web_sys::console::error_1(&format!("formpad: config parse error: {error}").into());
            None
        }
    }
}
