use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, PointerEvent, Window};

use formpad_core::signature::Point;

pub fn get_element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing element: {id}")))?;
    element
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Invalid element type: {id}")))
}

pub fn get_input_by_name(document: &Document, name: &str) -> Result<HtmlInputElement, JsValue> {
    let selector = format!("input[name=\"{name}\"]");
    document
        .query_selector(&selector)
        .ok()
        .flatten()
        .and_then(|element| element.dyn_into::<HtmlInputElement>().ok())
        .ok_or_else(|| JsValue::from_str(&format!("Missing input: {name}")))
}

pub fn debug_enabled(window: &Window) -> bool {
    let search = window.location().search().ok().unwrap_or_default();
    search.contains("debug=1") || search.contains("debug=true")
}

pub fn hide_element(element: &Element) {
    if let Some(html) = element.dyn_ref::<HtmlElement>() {
        let _ = html.style().set_property("display", "none");
    }
}

pub fn counter_value(input: &HtmlInputElement) -> usize {
    input.value().trim().parse().unwrap_or(0)
}

pub fn set_counter_value(input: &HtmlInputElement, value: usize) {
    input.set_value(&value.to_string());
}

/// Pointer position in CSS pixels relative to the element's box. The canvas
/// context carries the device-pixel-ratio transform, so CSS coordinates are
/// the drawing coordinates.
pub fn event_to_point(element: &Element, event: &PointerEvent) -> Point {
    let rect = element.get_bounding_client_rect();
    Point {
        x: event.client_x() as f64 - rect.left(),
        y: event.client_y() as f64 - rect.top(),
    }
}
