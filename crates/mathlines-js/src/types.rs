//! Types exposed to JavaScript via wasm-bindgen.

use mathlines_core::EditorOptions;
use serde::{Deserialize, Serialize};
use tsify_next::Tsify;
use wasm_bindgen::prelude::*;

/// Editor options as passed from JavaScript. Omitted fields take defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct JsEditorOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[tsify(optional)]
    pub min_lines: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[tsify(optional)]
    pub show_line_numbers: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[tsify(optional)]
    pub virtual_keyboard: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[tsify(optional)]
    pub font_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[tsify(optional)]
    pub container_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[tsify(optional)]
    pub keyboard_settle_ms: Option<u32>,
}

impl JsEditorOptions {
    /// Overlay the fields that were given onto `base`.
    pub fn merge_into(self, mut base: EditorOptions) -> EditorOptions {
        if let Some(min_lines) = self.min_lines {
            base.min_lines = min_lines;
        }
        if let Some(show) = self.show_line_numbers {
            base.show_line_numbers = show;
        }
        if let Some(enabled) = self.virtual_keyboard {
            base.virtual_keyboard = enabled;
        }
        if self.font_size.is_some() {
            base.font_size = self.font_size;
        }
        if self.container_class.is_some() {
            base.container_class = self.container_class;
        }
        if let Some(ms) = self.keyboard_settle_ms {
            base.keyboard_settle_ms = ms;
        }
        base
    }
}

impl From<JsEditorOptions> for EditorOptions {
    fn from(opts: JsEditorOptions) -> Self {
        opts.merge_into(EditorOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_options_are_defaults() {
        assert_eq!(
            EditorOptions::from(JsEditorOptions::default()),
            EditorOptions::default()
        );
    }

    #[test]
    fn test_merge_keeps_unset_fields() {
        let base = EditorOptions::default().with_min_lines(3).with_font_size(20.0);
        let merged = JsEditorOptions {
            show_line_numbers: Some(false),
            ..Default::default()
        }
        .merge_into(base);

        assert_eq!(merged.min_lines, 3);
        assert_eq!(merged.font_size, Some(20.0));
        assert!(!merged.show_line_numbers);
    }
}
