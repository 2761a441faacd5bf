//! Event routing for line widgets.
//!
//! Platform layers forward every widget event here together with the
//! line's [`LineSlot`]. The slot is resolved against the pool at call time,
//! so an event from a line that moved since its handler was registered still
//! lands on the right position, and an event from a destroyed line is
//! dropped.

use crate::deferred::{Deferred, DeferredTask};
use crate::editor::MathLinesEditor;
use crate::keys::KeyCombo;
use crate::options::KEYBOARD_CONFIRM_FALLBACK_MS;
use crate::platform::{LineHost, LineWidget};
use crate::pool::LineSlot;

/// Events a line widget can raise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent {
    /// The widget's content changed. The value is read from the widget.
    Input,
    KeyDown(KeyCombo),
    Focus,
    Blur,
    /// The on-screen keyboard was shown or hidden for this line.
    KeyboardToggle { visible: bool },
    /// Pointer pressed on the on-screen keyboard's toggle control.
    TogglePointerDown,
}

/// What the platform should do after an event was routed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dispatch {
    /// Suppress the platform's default handling of the event.
    pub prevent_default: bool,
    /// Full updated list to hand to the host's change callback.
    pub change: Option<Vec<String>>,
    /// Tasks to schedule, each on a strictly later tick.
    pub deferred: Vec<Deferred>,
}

impl Dispatch {
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn is_ignored(&self) -> bool {
        !self.prevent_default && self.change.is_none() && self.deferred.is_empty()
    }
}

impl<H: LineHost> MathLinesEditor<H> {
    /// Route one widget event.
    pub fn handle_event(&mut self, slot: &LineSlot, event: LineEvent) -> Dispatch {
        if self.host.is_none() {
            return Dispatch::ignored();
        }
        let Some(index) = self.pool.resolve(slot) else {
            tracing::trace!(?event, line = ?slot.id(), "event from a detached line");
            return Dispatch::ignored();
        };

        match event {
            LineEvent::Input => self.on_input(index),
            LineEvent::KeyDown(combo) => self.on_keydown(index, &combo),
            LineEvent::Focus => self.on_focus(index),
            LineEvent::Blur => self.on_blur(index),
            LineEvent::KeyboardToggle { visible } => self.on_keyboard_toggle(index, visible),
            LineEvent::TogglePointerDown => self.on_toggle_pointer_down(index),
        }
    }

    fn on_input(&mut self, index: usize) -> Dispatch {
        let Some(value) = self.widget_value(index) else {
            return Dispatch::ignored();
        };
        if self.equations.get(index) == Some(&value) {
            return Dispatch::ignored();
        }

        let token = self.guard.raise();
        self.equations[index] = value;

        Dispatch {
            prevent_default: false,
            change: Some(self.equations.clone()),
            deferred: vec![self.defer(DeferredTask::ReleaseGuard { token })],
        }
    }

    fn on_keydown(&mut self, index: usize, combo: &KeyCombo) -> Dispatch {
        if combo.is_line_break() {
            return self.insert_line_after(index);
        }
        if combo.is_plain_backspace() {
            let empty = self.widget_value(index).is_some_and(|v| v.is_empty());
            if empty && index >= self.options.min_lines && self.equations.len() > 1 {
                return self.remove_line(index);
            }
        }
        Dispatch::ignored()
    }

    /// Insert a blank line after `index` and move focus to it on the next tick.
    pub fn insert_line_after(&mut self, index: usize) -> Dispatch {
        if self.host.is_none() {
            return Dispatch::ignored();
        }
        let at = (index + 1).min(self.equations.len());
        let token = self.guard.raise();
        self.equations.insert(at, String::new());
        tracing::debug!(at, lines = self.equations.len(), "line inserted");

        let mut deferred = vec![self.defer(DeferredTask::ReleaseGuard { token })];
        match self.reconcile() {
            Ok(_) => {
                self.sync_widgets();
                deferred.push(self.defer(DeferredTask::FocusLine { index: at }));
            }
            Err(err) => tracing::warn!(%err, "failed to grow line pool"),
        }

        Dispatch {
            prevent_default: true,
            change: Some(self.equations.clone()),
            deferred,
        }
    }

    /// Remove the line at `index` and move focus to the one above it.
    ///
    /// Lines below the `min_lines` floor are never removed, and neither is
    /// the only remaining line.
    pub fn remove_line(&mut self, index: usize) -> Dispatch {
        if self.host.is_none()
            || index < self.options.min_lines
            || index >= self.equations.len()
            || self.equations.len() <= 1
        {
            return Dispatch::ignored();
        }

        let token = self.guard.raise();
        self.equations.remove(index);
        tracing::debug!(index, lines = self.equations.len(), "line removed");

        let mut deferred = vec![self.defer(DeferredTask::ReleaseGuard { token })];
        match self.reconcile() {
            Ok(_) => {
                self.sync_widgets();
                let target = index.saturating_sub(1);
                deferred.push(self.defer(DeferredTask::FocusLine { index: target }));
            }
            Err(err) => tracing::warn!(%err, "failed to shrink line pool"),
        }

        Dispatch {
            prevent_default: true,
            change: Some(self.equations.clone()),
            deferred,
        }
    }

    fn on_focus(&mut self, index: usize) -> Dispatch {
        if let Some(record) = self.pool.get_mut(index) {
            if !record.active {
                record.active = true;
                record.widget.set_active(true);
            }
        }
        Dispatch::ignored()
    }

    fn on_blur(&mut self, index: usize) -> Dispatch {
        if let Some(record) = self.pool.get_mut(index) {
            if record.keyboard_opening.is_some() {
                tracing::trace!(index, "blur ignored while on-screen keyboard opens");
                return Dispatch::ignored();
            }
            if record.active {
                record.active = false;
                record.widget.set_active(false);
            }
        }
        Dispatch::ignored()
    }

    /// Visibility confirmed: the window closes `keyboard_settle_ms` from now.
    fn on_keyboard_toggle(&mut self, index: usize, visible: bool) -> Dispatch {
        if visible {
            let settle_ms = self.options.keyboard_settle_ms;
            self.open_keyboard_window(index, settle_ms)
        } else {
            Dispatch::ignored()
        }
    }

    /// Press on the toggle control. The keyboard is not on screen yet, so the
    /// window only gets a fallback deadline in case it never shows up.
    fn on_toggle_pointer_down(&mut self, index: usize) -> Dispatch {
        let fallback_ms = self
            .options
            .keyboard_settle_ms
            .max(KEYBOARD_CONFIRM_FALLBACK_MS);
        self.open_keyboard_window(index, fallback_ms)
    }

    /// Start (or restart) the window in which blur on this line is ignored.
    fn open_keyboard_window(&mut self, index: usize, settle_ms: u32) -> Dispatch {
        if !self.options.virtual_keyboard {
            return Dispatch::ignored();
        }
        self.keyboard_generation += 1;
        let generation = self.keyboard_generation;

        let Some(record) = self.pool.get_mut(index) else {
            return Dispatch::ignored();
        };
        record.keyboard_opening = Some(generation);
        let line = record.id();

        Dispatch {
            prevent_default: false,
            change: None,
            deferred: vec![self.defer_after(
                settle_ms,
                DeferredTask::SettleKeyboard { line, generation },
            )],
        }
    }
}
