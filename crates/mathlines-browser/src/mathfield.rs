//! Bindings for the `<math-field>` custom element.
//!
//! web-sys has no knowledge of MathLive, so the element and the pieces of
//! its API we need are declared here. Every call goes through `catch` so a
//! page that has not loaded MathLive yet degrades to a plain element whose
//! text content stands in for the value.

use wasm_bindgen::prelude::*;

/// Tag name of the MathLive custom element.
pub const MATH_FIELD_TAG: &str = "math-field";

/// Value format read back from a line. Macros are expanded so the host sees
/// plain LaTeX.
pub const VALUE_FORMAT: &str = "latex-expanded";

#[wasm_bindgen]
extern "C" {
    /// A MathLive `<math-field>` element.
    #[wasm_bindgen(extends = web_sys::HtmlElement, extends = web_sys::Element, extends = web_sys::Node, extends = web_sys::EventTarget, extends = js_sys::Object)]
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub type MathfieldElement;

    #[wasm_bindgen(method, catch, js_name = getValue)]
    fn get_value(this: &MathfieldElement, format: &str) -> Result<String, JsValue>;

    #[wasm_bindgen(method, catch, js_name = setValue)]
    fn set_value(this: &MathfieldElement, value: &str, options: &JsValue) -> Result<(), JsValue>;
}

impl MathfieldElement {
    /// Current content in [`VALUE_FORMAT`].
    pub fn value(&self) -> String {
        match self.get_value(VALUE_FORMAT) {
            Ok(value) => value,
            Err(_) => self.text_content().unwrap_or_default(),
        }
    }

    /// Replace the content without raising an `input` event.
    pub fn write_value(&self, value: &str) {
        let options = js_sys::Object::new();
        let _ = js_sys::Reflect::set(
            &options,
            &JsValue::from_str("silenceNotifications"),
            &JsValue::TRUE,
        );
        if self.set_value(value, &options).is_err() {
            self.set_text_content(Some(value));
        }
    }

    /// Switch the on-screen keyboard between automatic and manual policy.
    pub fn set_keyboard_enabled(&self, enabled: bool) {
        let policy = if enabled { "auto" } else { "manual" };
        let _ = self.set_attribute("math-virtual-keyboard-policy", policy);
        let _ = js_sys::Reflect::set(
            self.as_ref(),
            &JsValue::from_str("mathVirtualKeyboardPolicy"),
            &JsValue::from_str(policy),
        );
    }
}

/// Whether the shared MathLive keyboard is currently on screen.
///
/// Reads `window.mathVirtualKeyboard.visible`; false when MathLive is absent.
pub fn virtual_keyboard_visible() -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    js_sys::Reflect::get(&window, &JsValue::from_str("mathVirtualKeyboard"))
        .ok()
        .filter(|keyboard| keyboard.is_object())
        .and_then(|keyboard| js_sys::Reflect::get(&keyboard, &JsValue::from_str("visible")).ok())
        .and_then(|visible| visible.as_bool())
        .unwrap_or(false)
}
