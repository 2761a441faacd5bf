//! Editor configuration.
//!
//! Field names serialise in camelCase so a JavaScript host can pass its
//! props object straight through.

use serde::{Deserialize, Serialize};

use crate::error::EditorError;

/// Default delay before a "keyboard opening" flag clears itself.
pub const DEFAULT_KEYBOARD_SETTLE_MS: u32 = 300;

/// How long a press on the keyboard toggle keeps blur suppressed when the
/// keyboard never reports itself as visible.
pub const KEYBOARD_CONFIRM_FALLBACK_MS: u32 = 1500;

/// Configuration for a multi-line math editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorOptions {
    /// Lines at positions below this floor cannot be removed with Backspace.
    pub min_lines: usize,
    /// Show the ordinal label next to each line. Indexing is unaffected.
    pub show_line_numbers: bool,
    /// Enable the on-screen math keyboard for every line.
    pub virtual_keyboard: bool,
    /// Font size in CSS pixels. `None` keeps the widget default.
    pub font_size: Option<f32>,
    /// Extra class added to every line container.
    pub container_class: Option<String>,
    /// How long blur stays suppressed after the on-screen keyboard opens.
    pub keyboard_settle_ms: u32,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            min_lines: 1,
            show_line_numbers: true,
            virtual_keyboard: true,
            font_size: None,
            container_class: None,
            keyboard_settle_ms: DEFAULT_KEYBOARD_SETTLE_MS,
        }
    }
}

impl EditorOptions {
    /// Check the options.
    ///
    /// `min_lines` is a plain floor; zero lets the first line be removed too.
    /// The last remaining line is never removed either way.
    pub fn validate(self) -> Result<Self, EditorError> {
        if let Some(size) = self.font_size {
            if !size.is_finite() || size <= 0.0 {
                return Err(EditorError::InvalidOptions(format!(
                    "font size must be a positive number, got {size}"
                )));
            }
        }
        Ok(self)
    }

    pub fn with_min_lines(mut self, min_lines: usize) -> Self {
        self.min_lines = min_lines;
        self
    }

    pub fn with_line_numbers(mut self, show: bool) -> Self {
        self.show_line_numbers = show;
        self
    }

    pub fn with_virtual_keyboard(mut self, enabled: bool) -> Self {
        self.virtual_keyboard = enabled;
        self
    }

    pub fn with_font_size(mut self, px: f32) -> Self {
        self.font_size = Some(px);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = EditorOptions::default();
        assert_eq!(opts.min_lines, 1);
        assert!(opts.show_line_numbers);
        assert!(opts.virtual_keyboard);
        assert_eq!(opts.keyboard_settle_ms, DEFAULT_KEYBOARD_SETTLE_MS);
    }

    #[test]
    fn test_validate_keeps_zero_min_lines() {
        let opts = EditorOptions::default().with_min_lines(0).validate().unwrap();
        assert_eq!(opts.min_lines, 0);
    }

    #[test]
    fn test_validate_rejects_bad_font_size() {
        assert!(EditorOptions::default().with_font_size(0.0).validate().is_err());
        assert!(EditorOptions::default().with_font_size(f32::NAN).validate().is_err());
        assert!(EditorOptions::default().with_font_size(18.0).validate().is_ok());
    }

    #[test]
    fn test_options_snapshot() {
        let opts = EditorOptions::default().with_min_lines(2).with_line_numbers(false);
        insta::assert_yaml_snapshot!(opts, @r###"
        minLines: 2
        showLineNumbers: false
        virtualKeyboard: true
        fontSize: ~
        containerClass: ~
        keyboardSettleMs: 300
        "###);
    }
}
