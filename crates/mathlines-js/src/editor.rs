//! JsMathLines - the editor wrapper for JavaScript.

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use mathlines_browser::{ChangeCallback, MathLines};
use mathlines_core::{EditorError, EditorOptions};

use crate::types::JsEditorOptions;

fn js_error(err: EditorError) -> JsError {
    JsError::new(&err.to_string())
}

/// Wrap a JS function as the change callback.
///
/// The list is handed over as a plain array of strings. Exceptions thrown by
/// the host are logged and swallowed.
fn change_callback(on_change: js_sys::Function) -> ChangeCallback {
    Rc::new(move |equations: Vec<String>| {
        let list: js_sys::Array = equations.iter().map(|s| JsValue::from_str(s)).collect();
        if let Err(e) = on_change.call1(&JsValue::NULL, &list) {
            tracing::warn!(?e, "onChange threw");
        }
    })
}

/// A multi-line math editor exposed to JavaScript.
///
/// Construct with options, then `mount` into a container element.
#[wasm_bindgen]
pub struct JsMathLines {
    options: EditorOptions,
    mounted: Option<MathLines>,
}

#[wasm_bindgen]
impl JsMathLines {
    /// Create an unmounted editor.
    #[wasm_bindgen(constructor)]
    pub fn new(options: Option<JsEditorOptions>) -> Result<JsMathLines, JsError> {
        let options = EditorOptions::from(options.unwrap_or_default())
            .validate()
            .map_err(js_error)?;
        Ok(Self {
            options,
            mounted: None,
        })
    }

    /// Mount into a container element.
    ///
    /// `onChange` receives the full list of expressions after every edit made
    /// in the editor. Mounting again replaces the previous mount.
    #[wasm_bindgen]
    pub fn mount(
        &mut self,
        container: &HtmlElement,
        initial_equations: Vec<String>,
        on_change: Option<js_sys::Function>,
    ) -> Result<(), JsError> {
        self.unmount();
        let editor = MathLines::mount(
            container,
            initial_equations,
            self.options.clone(),
            on_change.map(change_callback),
        )
        .map_err(js_error)?;
        self.mounted = Some(editor);
        Ok(())
    }

    /// Check if the editor is mounted.
    #[wasm_bindgen(js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.mounted.as_ref().is_some_and(MathLines::is_mounted)
    }

    /// Push the host's list into the editor.
    ///
    /// Lists equal to the editor's state are ignored, as is any list that
    /// arrives while the editor's own last change is still in flight.
    #[wasm_bindgen(js_name = setEquations)]
    pub fn set_equations(&self, equations: Vec<String>) -> Result<(), JsError> {
        let editor = self.mounted()?;
        let outcome = editor.set_equations(equations).map_err(js_error)?;
        tracing::trace!(?outcome, "setEquations");
        Ok(())
    }

    /// Get the list as the editor currently sees it.
    #[wasm_bindgen(js_name = getEquations)]
    pub fn get_equations(&self) -> Vec<String> {
        self.mounted
            .as_ref()
            .map(MathLines::equations)
            .unwrap_or_default()
    }

    /// Update options. Fields left out keep their current value.
    #[wasm_bindgen(js_name = setOptions)]
    pub fn set_options(&mut self, options: JsEditorOptions) -> Result<(), JsError> {
        let options = options
            .merge_into(self.options.clone())
            .validate()
            .map_err(js_error)?;
        if let Some(editor) = &self.mounted {
            editor.set_options(options.clone()).map_err(js_error)?;
        }
        self.options = options;
        Ok(())
    }

    /// Get the current options.
    #[wasm_bindgen(js_name = getOptions)]
    pub fn get_options(&self) -> Result<JsValue, JsError> {
        serde_wasm_bindgen::to_value(&self.options)
            .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
    }

    /// Focus the line at `index`.
    #[wasm_bindgen(js_name = focusLine)]
    pub fn focus_line(&self, index: usize) -> Result<(), JsError> {
        self.mounted()?.focus_line(index).map_err(js_error)
    }

    /// Unmount the editor and clean up.
    #[wasm_bindgen]
    pub fn unmount(&mut self) {
        if let Some(editor) = self.mounted.take() {
            editor.unmount();
        }
    }
}

impl Drop for JsMathLines {
    /// A host that calls `free()` without `unmount()` still gets its DOM back.
    fn drop(&mut self) {
        self.unmount();
    }
}

impl JsMathLines {
    fn mounted(&self) -> Result<&MathLines, JsError> {
        self.mounted
            .as_ref()
            .ok_or_else(|| js_error(EditorError::NotMounted))
    }
}
