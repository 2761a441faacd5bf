//! Platform abstraction traits for the line widgets.
//!
//! These traits define the interface between the editor logic and the
//! platform that actually draws rich math-input widgets (browser DOM with a
//! `<math-field>` element, a native toolkit, or a recording fake in tests).

use crate::error::PlatformError;
use crate::options::EditorOptions;
use crate::pool::LineSlot;

/// One live rich math-input widget plus its container and ordinal label.
///
/// Owned exclusively by a single line record. Display operations are
/// infallible from the editor's point of view: implementations log and
/// swallow platform failures.
pub trait LineWidget {
    /// Current expanded value shown by the widget.
    fn value(&self) -> String;

    /// Replace the displayed value without emitting an input event.
    fn set_value(&mut self, value: &str);

    /// Update the ordinal label. `ordinal` is 1-based.
    fn set_ordinal(&mut self, ordinal: usize);

    /// Toggle the "active" visual style on container and label.
    fn set_active(&mut self, active: bool);

    /// Show or hide the ordinal label.
    fn set_label_visible(&mut self, visible: bool);

    /// Re-apply presentation options (font size, keyboard policy, classes).
    fn apply_options(&mut self, options: &EditorOptions);

    /// Move input focus into the widget.
    fn focus(&mut self);

    /// Detach listeners and remove the container from display.
    ///
    /// Called once, right before the widget is dropped, when its line is
    /// removed by a structural edit or a shorter external list. This may run
    /// inside one of the widget's own event handlers.
    fn destroy(&mut self);

    /// Release everything synchronously because the whole editor unmounts.
    ///
    /// Called instead of [`LineWidget::destroy`]. When it returns, no
    /// listener of this widget may still be attached.
    fn teardown(&mut self) {
        self.destroy();
    }
}

/// Factory for line widgets.
///
/// `create_line` must wire the widget's input, keydown, focus, blur and
/// keyboard-toggle events so that they reach the editor together with the
/// supplied [`LineSlot`]. Handlers resolve their line through the slot at
/// call time; the slot's index changes as sibling lines come and go.
pub trait LineHost {
    type Line: LineWidget;

    fn create_line(
        &mut self,
        slot: LineSlot,
        value: &str,
        options: &EditorOptions,
    ) -> Result<Self::Line, PlatformError>;
}
