//! `LineHost` implementation over the browser DOM.

use std::rc::Weak;

use gloo_events::{EventListener, EventListenerOptions, EventListenerPhase};
use mathlines_core::{EditorOptions, LineEvent, LineHost, LineSlot, PlatformError};
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

use crate::events::{key_combo, pointer_hits_keyboard_toggle};
use crate::handle::Shared;
use crate::line::BrowserLine;
use crate::mathfield::virtual_keyboard_visible;

pub const ROOT_CLASS: &str = "mathlines";

/// Creates line widgets inside a root element owned by the editor.
pub struct BrowserHost {
    document: web_sys::Document,
    root: HtmlElement,
    shared: Weak<Shared>,
}

impl BrowserHost {
    /// Create the root element inside `container`.
    pub(crate) fn new(container: &HtmlElement, shared: Weak<Shared>) -> Result<Self, PlatformError> {
        let document = container
            .owner_document()
            .or_else(|| web_sys::window().and_then(|w| w.document()))
            .ok_or_else(|| PlatformError::from("no document"))?;
        let root = document
            .create_element("div")
            .map_err(|e| PlatformError(format!("create root failed: {e:?}")))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| PlatformError::from("root is not an HTML element"))?;
        root.set_class_name(ROOT_CLASS);
        container
            .append_child(&root)
            .map_err(|e| PlatformError(format!("attach root failed: {e:?}")))?;
        Ok(Self {
            document,
            root,
            shared,
        })
    }

    pub fn root(&self) -> &HtmlElement {
        &self.root
    }

    /// Take the root element out of the document.
    pub(crate) fn detach(&self) {
        self.root.remove();
    }

    fn listen(
        &self,
        target: &web_sys::EventTarget,
        event_type: &'static str,
        slot: &LineSlot,
        extract: fn(&web_sys::Event) -> Option<LineEvent>,
    ) -> EventListener {
        let shared = self.shared.clone();
        let slot = slot.clone();
        EventListener::new(target, event_type, move |event| {
            let Some(line_event) = extract(event) else {
                return;
            };
            if let Some(shared) = shared.upgrade() {
                shared.dispatch(&slot, line_event);
            }
        })
    }

    fn listen_keydown(&self, target: &web_sys::EventTarget, slot: &LineSlot) -> EventListener {
        let shared = self.shared.clone();
        let slot = slot.clone();
        // Capture phase, so Enter and Backspace are seen before the field's
        // own handler inside the shadow root acts on them.
        let options = EventListenerOptions {
            phase: EventListenerPhase::Capture,
            passive: false,
        };
        EventListener::new_with_options(target, "keydown", options, move |event| {
            let Some(combo) = event
                .dyn_ref::<web_sys::KeyboardEvent>()
                .and_then(key_combo)
            else {
                return;
            };
            let Some(shared) = shared.upgrade() else {
                return;
            };
            if shared.dispatch(&slot, LineEvent::KeyDown(combo)) {
                event.prevent_default();
                event.stop_propagation();
            }
        })
    }
}

impl LineHost for BrowserHost {
    type Line = BrowserLine;

    fn create_line(
        &mut self,
        slot: LineSlot,
        value: &str,
        options: &EditorOptions,
    ) -> Result<BrowserLine, PlatformError> {
        let mut line = BrowserLine::build(&self.document, &self.root, value, options)?;
        let field: &web_sys::EventTarget = line.field();
        let listeners = vec![
            self.listen(field, "input", &slot, |_| Some(LineEvent::Input)),
            self.listen_keydown(field, &slot),
            self.listen(field, "focusin", &slot, |_| Some(LineEvent::Focus)),
            self.listen(field, "focusout", &slot, |_| Some(LineEvent::Blur)),
            self.listen(field, "virtual-keyboard-toggle", &slot, |_| {
                Some(LineEvent::KeyboardToggle {
                    visible: virtual_keyboard_visible(),
                })
            }),
            self.listen(field, "pointerdown", &slot, |event| {
                pointer_hits_keyboard_toggle(event).then_some(LineEvent::TogglePointerDown)
            }),
        ];
        line.attach_listeners(listeners);
        tracing::trace!(line = ?slot.id(), index = slot.index(), "browser line created");
        Ok(line)
    }
}
