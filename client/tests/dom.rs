#![cfg(target_arch = "wasm32")]

use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement};

use formpad_client::rows::{materialize_row, wire_collection};
use formpad_core::config::{CollectionConfig, FieldSpec, InputKind};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

fn body() -> HtmlElement {
    document().body().unwrap()
}

fn field(name: &str, kind: InputKind) -> FieldSpec {
    FieldSpec {
        name: name.to_string(),
        kind,
    }
}

fn row_template_html(prefix: &str) -> String {
    format!(
        concat!(
            "<tr>",
            "<td><input type=\"text\" name=\"{p}-__prefix__-kind\" value=\"stale\"></td>",
            "<td><input type=\"checkbox\" name=\"{p}-__prefix__-flag\" checked></td>",
            "<td><input type=\"hidden\" name=\"{p}-__prefix__-id\" value=\"\"></td>",
            "<td><input type=\"checkbox\" name=\"{p}-__prefix__-DELETE\"></td>",
            "<td><button type=\"button\" class=\"remove-row\">x</button></td>",
            "</tr>"
        ),
        p = prefix
    )
}

fn config_for(prefix: &str) -> CollectionConfig {
    CollectionConfig {
        prefix: prefix.to_string(),
        container: format!("{prefix}-rows"),
        add_button: format!("{prefix}-add"),
        template: format!("{prefix}-template"),
        fields: vec![
            field("kind", InputKind::Text),
            field("flag", InputKind::Checkbox),
            field("DELETE", InputKind::Checkbox),
            field("id", InputKind::Hidden),
        ],
    }
}

/// Builds the DOM anchors one collection needs: container, add button,
/// counter input, template.
fn install_collection(prefix: &str, initial_count: usize, seeded_rows: &str) {
    let document = document();
    let body = body();

    let table = document.create_element("table").unwrap();
    let container = document.create_element("tbody").unwrap();
    container.set_id(&format!("{prefix}-rows"));
    container.set_inner_html(seeded_rows);
    table.append_child(&container).unwrap();
    body.append_child(&table).unwrap();

    let add: Element = document.create_element("button").unwrap();
    add.set_id(&format!("{prefix}-add"));
    add.set_attribute("type", "button").unwrap();
    body.append_child(&add).unwrap();

    let counter = document.create_element("input").unwrap();
    counter
        .set_attribute("name", &format!("{prefix}-TOTAL_FORMS"))
        .unwrap();
    counter
        .set_attribute("value", &initial_count.to_string())
        .unwrap();
    body.append_child(&counter).unwrap();

    let template = document.create_element("template").unwrap();
    template.set_id(&format!("{prefix}-template"));
    template.set_inner_html(&row_template_html(prefix));
    body.append_child(&template).unwrap();
}

fn counter_input(prefix: &str) -> HtmlInputElement {
    document()
        .query_selector(&format!("input[name=\"{prefix}-TOTAL_FORMS\"]"))
        .unwrap()
        .unwrap()
        .dyn_into()
        .unwrap()
}

fn click(element: &Element) {
    element.dyn_ref::<HtmlElement>().unwrap().click();
}

#[wasm_bindgen_test]
fn materialized_row_binds_index_and_resets_values() {
    let document = document();
    let config = config_for("mat");
    let row = materialize_row(&document, &row_template_html("mat"), &config, 3).unwrap();

    let kind: HtmlInputElement = row
        .query_selector("input[name=\"mat-3-kind\"]")
        .unwrap()
        .unwrap()
        .dyn_into()
        .unwrap();
    assert_eq!(kind.value(), "");

    let flag: HtmlInputElement = row
        .query_selector("input[name=\"mat-3-flag\"]")
        .unwrap()
        .unwrap()
        .dyn_into()
        .unwrap();
    assert!(!flag.checked());

    // Hidden identifier stays as authored.
    assert!(row.query_selector("input[name=\"mat-3-id\"]").unwrap().is_some());
    // No placeholder residue anywhere.
    assert!(!row.outer_html().contains("__prefix__"));
}

#[wasm_bindgen_test]
fn add_and_transient_remove_keep_counter_and_indices_consistent() {
    install_collection("eqa", 0, "");
    wire_collection(&document(), config_for("eqa")).unwrap();

    let add: Element = document()
        .get_element_by_id("eqa-add")
        .unwrap();
    let container = document().get_element_by_id("eqa-rows").unwrap();

    click(&add);
    click(&add);
    assert_eq!(counter_input("eqa").value(), "2");
    assert_eq!(container.children().length(), 2);

    // Detach the first (transient) row.
    let first = container.first_element_child().unwrap();
    let remove = first.query_selector(".remove-row").unwrap().unwrap();
    click(&remove);
    assert_eq!(container.children().length(), 1);
    // Counter policy: never decremented.
    assert_eq!(counter_input("eqa").value(), "2");

    // The freed index is never reissued.
    click(&add);
    let last = container.last_element_child().unwrap();
    assert_eq!(last.get_attribute("data-row-index").as_deref(), Some("2"));
    assert_eq!(counter_input("eqa").value(), "3");
}

#[wasm_bindgen_test]
fn bad_template_leaves_counter_and_state_untouched() {
    install_collection("eqc", 0, "");
    // A template with no element child makes materialization fail.
    document()
        .get_element_by_id("eqc-template")
        .unwrap()
        .set_inner_html("no row here");
    wire_collection(&document(), config_for("eqc")).unwrap();

    let add = document().get_element_by_id("eqc-add").unwrap();
    let container = document().get_element_by_id("eqc-rows").unwrap();
    click(&add);
    click(&add);

    // No phantom slots: nothing entered the DOM, nothing was counted.
    assert_eq!(container.children().length(), 0);
    assert_eq!(counter_input("eqc").value(), "0");
}

#[wasm_bindgen_test]
fn persisted_remove_soft_deletes_and_keeps_the_row() {
    let seeded = concat!(
        "<tr>",
        "<td><input type=\"text\" name=\"eqb-0-kind\" value=\"router\"></td>",
        "<td><input type=\"checkbox\" name=\"eqb-0-flag\"></td>",
        "<td><input type=\"hidden\" name=\"eqb-0-id\" value=\"42\"></td>",
        "<td><input type=\"checkbox\" name=\"eqb-0-DELETE\"></td>",
        "<td><button type=\"button\" class=\"remove-row\">x</button></td>",
        "</tr>"
    );
    install_collection("eqb", 1, seeded);
    wire_collection(&document(), config_for("eqb")).unwrap();

    let container = document().get_element_by_id("eqb-rows").unwrap();
    let row = container.first_element_child().unwrap();
    let remove = row.query_selector(".remove-row").unwrap().unwrap();
    click(&remove);

    // Still in the DOM with its values, hidden, delete flag set, counter untouched.
    assert_eq!(container.children().length(), 1);
    let row_el: HtmlElement = row.clone().dyn_into().unwrap();
    assert_eq!(row_el.style().get_property_value("display").unwrap(), "none");
    let delete: HtmlInputElement = row
        .query_selector("input[name=\"eqb-0-DELETE\"]")
        .unwrap()
        .unwrap()
        .dyn_into()
        .unwrap();
    assert!(delete.checked());
    let kind: HtmlInputElement = row
        .query_selector("input[name=\"eqb-0-kind\"]")
        .unwrap()
        .unwrap()
        .dyn_into()
        .unwrap();
    assert_eq!(kind.value(), "router");
    assert_eq!(counter_input("eqb").value(), "1");
}
