//! One rendered line: container, ordinal label and math field.

use gloo_events::EventListener;
use mathlines_core::{EditorOptions, LineWidget, PlatformError};
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use crate::mathfield::{MATH_FIELD_TAG, MathfieldElement};

pub const LINE_CLASS: &str = "mathlines-line";
pub const LABEL_CLASS: &str = "mathlines-label";
pub const FIELD_CLASS: &str = "mathlines-field";
pub const ACTIVE_CLASS: &str = "mathlines-line--active";
pub const LABEL_ACTIVE_CLASS: &str = "mathlines-label--active";

/// DOM-backed line widget.
///
/// Dropping the listeners detaches them from the field; `destroy` also takes
/// the container out of the document.
pub struct BrowserLine {
    container: HtmlElement,
    label: HtmlElement,
    field: MathfieldElement,
    extra_class: Option<String>,
    listeners: Vec<EventListener>,
}

fn create_html(document: &Document, tag: &str) -> Result<HtmlElement, PlatformError> {
    document
        .create_element(tag)
        .map_err(|e| PlatformError(format!("create <{tag}> failed: {e:?}")))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| PlatformError(format!("<{tag}> is not an HTML element")))
}

impl BrowserLine {
    /// Build the elements for a line and append them to `parent`.
    pub fn build(
        document: &Document,
        parent: &HtmlElement,
        value: &str,
        options: &EditorOptions,
    ) -> Result<Self, PlatformError> {
        let container = create_html(document, "div")?;
        container.set_class_name(LINE_CLASS);

        let label = create_html(document, "span")?;
        label.set_class_name(LABEL_CLASS);
        label.set_attribute("aria-hidden", "true").ok();

        let field = document
            .create_element(MATH_FIELD_TAG)
            .map_err(|e| PlatformError(format!("create <{MATH_FIELD_TAG}> failed: {e:?}")))?
            .unchecked_into::<MathfieldElement>();
        field.set_class_name(FIELD_CLASS);

        container
            .append_child(&label)
            .and_then(|_| container.append_child(&field))
            .and_then(|_| parent.append_child(&container))
            .map_err(|e| PlatformError(format!("attach line failed: {e:?}")))?;

        let mut line = Self {
            container,
            label,
            field,
            extra_class: None,
            listeners: Vec::new(),
        };
        line.field.write_value(value);
        line.apply_options(options);
        Ok(line)
    }

    pub fn container(&self) -> &HtmlElement {
        &self.container
    }

    pub fn label(&self) -> &HtmlElement {
        &self.label
    }

    pub fn field(&self) -> &MathfieldElement {
        &self.field
    }

    pub(crate) fn attach_listeners(&mut self, listeners: Vec<EventListener>) {
        self.listeners.extend(listeners);
    }

    /// Number of DOM listeners still attached to the field.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl LineWidget for BrowserLine {
    fn value(&self) -> String {
        self.field.value()
    }

    fn set_value(&mut self, value: &str) {
        self.field.write_value(value);
    }

    fn set_ordinal(&mut self, ordinal: usize) {
        self.label.set_text_content(Some(&ordinal.to_string()));
    }

    fn set_active(&mut self, active: bool) {
        let _ = self.container.class_list().toggle_with_force(ACTIVE_CLASS, active);
        let _ = self.label.class_list().toggle_with_force(LABEL_ACTIVE_CLASS, active);
    }

    fn set_label_visible(&mut self, visible: bool) {
        self.label.set_hidden(!visible);
    }

    fn apply_options(&mut self, options: &EditorOptions) {
        let classes = self.container.class_list();
        if let Some(old) = self.extra_class.take() {
            let _ = classes.remove_1(&old);
        }
        if let Some(class) = options.container_class.as_deref().filter(|c| !c.is_empty()) {
            let _ = classes.add_1(class);
            self.extra_class = Some(class.to_string());
        }

        let style = self.field.style();
        let _ = match options.font_size {
            Some(px) => style.set_property("font-size", &format!("{px}px")),
            None => style.remove_property("font-size").map(|_| ()),
        };

        self.field.set_keyboard_enabled(options.virtual_keyboard);
    }

    fn focus(&mut self) {
        if let Err(e) = self.field.focus() {
            tracing::debug!(?e, "math field refused focus");
        }
    }

    fn destroy(&mut self) {
        self.container.remove();
        let listeners = std::mem::take(&mut self.listeners);
        if listeners.is_empty() {
            return;
        }
        // Structural removal runs inside one of this line's own listeners, so
        // the closures are released on the next tick instead of here.
        gloo_timers::callback::Timeout::new(0, move || drop(listeners)).forget();
    }

    fn teardown(&mut self) {
        self.container.remove();
        self.listeners.clear();
    }
}
