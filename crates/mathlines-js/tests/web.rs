//! WASM browser tests for mathlines-js.
//!
//! Run with: `wasm-pack test --headless --firefox` or `--chrome`

use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

use mathlines_core::EditorOptions;
use mathlines_js::{JsEditorOptions, JsMathLines};

fn container() -> web_sys::HtmlElement {
    let div = gloo_utils::document()
        .create_element("div")
        .unwrap()
        .dyn_into::<web_sys::HtmlElement>()
        .unwrap();
    gloo_utils::body().append_child(&div).unwrap();
    div
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn new_editor(options: Option<JsEditorOptions>) -> JsMathLines {
    match JsMathLines::new(options) {
        Ok(editor) => editor,
        Err(_) => panic!("editor construction failed"),
    }
}

fn roots(container: &web_sys::HtmlElement) -> u32 {
    container.query_selector_all(".mathlines").unwrap().length()
}

fn current_options(editor: &JsMathLines) -> EditorOptions {
    let value = editor.get_options().ok().unwrap();
    serde_wasm_bindgen::from_value(value).unwrap()
}

// === Lifecycle ===

#[wasm_bindgen_test]
fn test_mount_and_read_back() {
    let root = container();
    let mut editor = new_editor(None);
    assert!(!editor.is_mounted());

    assert!(editor.mount(&root, strings(&["x", "y"]), None).is_ok());
    assert!(editor.is_mounted());
    assert_eq!(editor.get_equations(), strings(&["x", "y"]));
    assert_eq!(roots(&root), 1);
}

#[wasm_bindgen_test]
fn test_mount_again_replaces_previous_mount() {
    let first = container();
    let second = container();
    let mut editor = new_editor(None);

    assert!(editor.mount(&first, strings(&["a"]), None).is_ok());
    assert!(editor.mount(&second, strings(&["b", "c"]), None).is_ok());

    assert_eq!(roots(&first), 0);
    assert_eq!(roots(&second), 1);
    assert_eq!(editor.get_equations(), strings(&["b", "c"]));
}

#[wasm_bindgen_test]
fn test_unmount_clears_dom() {
    let root = container();
    let mut editor = new_editor(None);
    assert!(editor.mount(&root, strings(&["a"]), None).is_ok());

    editor.unmount();
    editor.unmount();

    assert!(!editor.is_mounted());
    assert_eq!(roots(&root), 0);
    assert!(editor.get_equations().is_empty());
}

#[wasm_bindgen_test]
fn test_drop_unmounts() {
    let root = container();
    let mut editor = new_editor(None);
    assert!(editor.mount(&root, strings(&["a", "b"]), None).is_ok());

    drop(editor);

    assert_eq!(roots(&root), 0);
    assert_eq!(root.query_selector_all(".mathlines-line").unwrap().length(), 0);
}

// === Unmounted calls ===

#[wasm_bindgen_test]
fn test_calls_before_mount_fail() {
    let editor = new_editor(None);
    assert!(editor.set_equations(strings(&["a"])).is_err());
    assert!(editor.focus_line(0).is_err());
    assert!(editor.get_equations().is_empty());
}

#[wasm_bindgen_test]
fn test_focus_line_out_of_range_fails() {
    let root = container();
    let mut editor = new_editor(None);
    assert!(editor.mount(&root, strings(&["a"]), None).is_ok());

    assert!(editor.focus_line(0).is_ok());
    assert!(editor.focus_line(3).is_err());
}

// === Options ===

#[wasm_bindgen_test]
fn test_constructor_rejects_invalid_options() {
    let options = JsEditorOptions {
        font_size: Some(-1.0),
        ..Default::default()
    };
    assert!(JsMathLines::new(Some(options)).is_err());
}

#[wasm_bindgen_test]
fn test_set_options_merges_onto_current() {
    let mut editor = new_editor(Some(JsEditorOptions {
        min_lines: Some(2),
        ..Default::default()
    }));

    let update = JsEditorOptions {
        show_line_numbers: Some(false),
        ..Default::default()
    };
    assert!(editor.set_options(update).is_ok());

    let options = current_options(&editor);
    assert_eq!(options.min_lines, 2);
    assert!(!options.show_line_numbers);
    assert!(options.virtual_keyboard);
}

#[wasm_bindgen_test]
fn test_set_options_rejects_invalid_and_keeps_previous() {
    let root = container();
    let mut editor = new_editor(None);
    assert!(editor.mount(&root, strings(&["a"]), None).is_ok());

    let bad = JsEditorOptions {
        font_size: Some(0.0),
        ..Default::default()
    };
    assert!(editor.set_options(bad).is_err());
    assert_eq!(current_options(&editor).font_size, None);

    let labels_off = JsEditorOptions {
        show_line_numbers: Some(false),
        ..Default::default()
    };
    assert!(editor.set_options(labels_off).is_ok());
    let label = root
        .query_selector(".mathlines-label")
        .unwrap()
        .unwrap()
        .dyn_into::<web_sys::HtmlElement>()
        .unwrap();
    assert!(label.hidden());
}

// === External updates ===

#[wasm_bindgen_test]
fn test_set_equations_updates_lines() {
    let root = container();
    let mut editor = new_editor(None);
    assert!(editor.mount(&root, strings(&["a"]), None).is_ok());

    assert!(editor.set_equations(strings(&["p", "q", "r"])).is_ok());

    assert_eq!(editor.get_equations(), strings(&["p", "q", "r"]));
    assert_eq!(root.query_selector_all(".mathlines-line").unwrap().length(), 3);
}
