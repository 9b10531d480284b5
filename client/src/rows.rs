use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, HtmlButtonElement, HtmlInputElement, HtmlTemplateElement,
    HtmlTextAreaElement,
};

use formpad_core::collection::{
    counter_name, field_name, index_from_field_name, CollectionState, RemoveAction, DELETE_SUFFIX,
};
use formpad_core::config::{CollectionConfig, InputKind};
use formpad_core::template::bind_prefix;

use crate::dom::{counter_value, get_element, get_input_by_name, hide_element, set_counter_value};

const ROW_INDEX_ATTR: &str = "data-row-index";
const REMOVE_SELECTOR: &str = ".remove-row";

pub struct RowsWidget {
    config: CollectionConfig,
    template_html: String,
    document: Document,
    container: Element,
    counter_input: HtmlInputElement,
    state: CollectionState,
}

/// Wires one collection: discovery over rows already in the page, the add
/// button, and a single delegated remove listener on the container.
pub fn wire_collection(document: &Document, config: CollectionConfig) -> Result<(), JsValue> {
    let container: Element = get_element(document, &config.container)?;
    let add_button: HtmlButtonElement = get_element(document, &config.add_button)?;
    let template: HtmlTemplateElement = get_element(document, &config.template)?;
    let counter_input = get_input_by_name(document, &counter_name(&config.prefix))?;

    let mut state = CollectionState::new(counter_value(&counter_input));
    discover_rows(&config.prefix, &container, &mut state)?;
    // Discovery may outrun a stale counter value; the state is the truth.
    set_counter_value(&counter_input, state.counter());

    let widget = Rc::new(RefCell::new(RowsWidget {
        config,
        template_html: template.inner_html(),
        document: document.clone(),
        container: container.clone(),
        counter_input,
        state,
    }));

    {
        let add_widget = widget.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            let mut widget = add_widget.borrow_mut();
            if let Err(err) = add_row(&mut widget) {
                web_sys::console::error_1(&err);
            }
        });
        add_button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let remove_widget = widget.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(target) = event
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok())
            else {
                return;
            };
            let Ok(Some(button)) = target.closest(REMOVE_SELECTOR) else {
                return;
            };
            let selector = format!("[{ROW_INDEX_ATTR}]");
            let Ok(Some(row)) = button.closest(&selector) else {
                return;
            };
            let mut widget = remove_widget.borrow_mut();
            if !widget.container.contains(Some(row.as_ref())) {
                return;
            }
            event.prevent_default();
            remove_row(&mut widget, &row);
        });
        container.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    Ok(())
}

/// Binds rows rendered by the server at page load. A row is persisted when
/// its identifier field carries a value.
fn discover_rows(
    prefix: &str,
    container: &Element,
    state: &mut CollectionState,
) -> Result<(), JsValue> {
    let children = container.children();
    for position in 0..children.length() {
        let Some(row) = children.item(position) else {
            continue;
        };
        let Some(index) = discover_index(prefix, &row) else {
            continue;
        };
        row.set_attribute(ROW_INDEX_ATTR, &index.to_string())?;
        state.bind_existing(index, row_is_persisted(prefix, index, &row));
    }
    Ok(())
}

fn discover_index(prefix: &str, row: &Element) -> Option<usize> {
    let selector = format!("[name^=\"{prefix}-\"]");
    let field = row.query_selector(&selector).ok().flatten()?;
    let name = field.get_attribute("name")?;
    index_from_field_name(prefix, &name)
}

fn row_is_persisted(prefix: &str, index: usize, row: &Element) -> bool {
    let selector = format!("input[name=\"{}\"]", field_name(prefix, index, "id"));
    row.query_selector(&selector)
        .ok()
        .flatten()
        .and_then(|element| element.dyn_into::<HtmlInputElement>().ok())
        .map(|input| !input.value().trim().is_empty())
        .unwrap_or(false)
}

fn add_row(widget: &mut RowsWidget) -> Result<(), JsValue> {
    // Materialize against the next index but claim it only once the row is
    // really in the DOM, so a bad template leaves no phantom slot behind.
    let index = widget.state.counter();
    let row = materialize_row(
        &widget.document,
        &widget.template_html,
        &widget.config,
        index,
    )?;
    widget.container.append_child(&row)?;
    widget.state.add_row();
    set_counter_value(&widget.counter_input, widget.state.counter());
    Ok(())
}

/// Builds a detached row element from the template markup with the
/// placeholder token bound to `index`, then resets instance fields per the
/// declared schema. The result shares nothing with the source template.
pub fn materialize_row(
    document: &Document,
    template_html: &str,
    config: &CollectionConfig,
    index: usize,
) -> Result<Element, JsValue> {
    let host: HtmlTemplateElement = document
        .create_element("template")?
        .dyn_into()
        .map_err(|_| JsValue::from_str("template host not supported"))?;
    host.set_inner_html(bind_prefix(template_html, index).trim());
    let row = host
        .content()
        .first_element_child()
        .ok_or_else(|| JsValue::from_str("Row template produced no element"))?;
    row.set_attribute(ROW_INDEX_ATTR, &index.to_string())?;
    reset_row_fields(&row, config, index);
    Ok(row)
}

fn reset_row_fields(row: &Element, config: &CollectionConfig, index: usize) {
    for field in &config.fields {
        if !field.kind.resets_on_materialize() {
            continue;
        }
        let selector = format!(
            "[name=\"{}\"]",
            field_name(&config.prefix, index, &field.name)
        );
        let Ok(Some(element)) = row.query_selector(&selector) else {
            continue;
        };
        match field.kind {
            InputKind::Checkbox => {
                if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
                    input.set_checked(false);
                }
            }
            InputKind::Textarea => {
                if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
                    area.set_value("");
                }
            }
            _ => {
                if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
                    input.set_value("");
                }
            }
        }
    }
}

fn remove_row(widget: &mut RowsWidget, row: &Element) {
    let Some(index) = row
        .get_attribute(ROW_INDEX_ATTR)
        .and_then(|value| value.parse().ok())
    else {
        return;
    };
    match widget.state.remove_row(index) {
        RemoveAction::SoftDelete => {
            mark_delete_flag(&widget.config.prefix, index, row);
            hide_element(row);
        }
        RemoveAction::Detach => row.remove(),
        RemoveAction::Ignore => {}
    }
}

fn mark_delete_flag(prefix: &str, index: usize, row: &Element) {
    let exact = format!("input[name=\"{}\"]", field_name(prefix, index, "DELETE"));
    let fallback = format!("input[name$=\"{DELETE_SUFFIX}\"]");
    let flag = row
        .query_selector(&exact)
        .ok()
        .flatten()
        .or_else(|| row.query_selector(&fallback).ok().flatten());
    if let Some(input) = flag.and_then(|element| element.dyn_into::<HtmlInputElement>().ok()) {
        input.set_checked(true);
    }
}
