//! Browser event extraction.
//!
//! Converts DOM events into the core key model and recognises presses on the
//! MathLive keyboard toggle, which lives inside the field's shadow root.

use mathlines_core::{KeyCombo, Modifiers, parse_key};
use wasm_bindgen::JsCast;

/// `part` token MathLive puts on its keyboard toggle button.
pub const TOGGLE_PART: &str = "virtual-keyboard-toggle";

/// Class MathLive uses for the same control in older releases.
pub const TOGGLE_CLASS: &str = "ML__virtual-keyboard-toggle";

/// Read the modifier state of a keyboard event.
pub fn modifiers(event: &web_sys::KeyboardEvent) -> Modifiers {
    Modifiers {
        ctrl: event.ctrl_key(),
        alt: event.alt_key(),
        shift: event.shift_key(),
        meta: event.meta_key(),
    }
}

/// Convert a keydown event into a [`KeyCombo`].
///
/// Returns `None` while an IME composition is running; those keystrokes
/// belong to the composition, not to the editor.
pub fn key_combo(event: &web_sys::KeyboardEvent) -> Option<KeyCombo> {
    if event.is_composing() {
        return None;
    }
    Some(KeyCombo::with_modifiers(
        parse_key(&event.key()),
        modifiers(event),
    ))
}

/// Check whether an element is the on-screen keyboard toggle.
pub fn is_keyboard_toggle(element: &web_sys::Element) -> bool {
    let part_matches = element
        .get_attribute("part")
        .is_some_and(|part| part.split_ascii_whitespace().any(|token| token == TOGGLE_PART));
    part_matches || element.class_list().contains(TOGGLE_CLASS)
}

/// Check whether a pointer event started on the keyboard toggle.
///
/// Walks the composed path so hits inside the shadow root are seen.
pub fn pointer_hits_keyboard_toggle(event: &web_sys::Event) -> bool {
    event
        .composed_path()
        .iter()
        .filter_map(|target| target.dyn_into::<web_sys::Element>().ok())
        .any(|element| is_keyboard_toggle(&element))
}
