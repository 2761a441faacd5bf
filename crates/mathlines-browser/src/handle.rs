//! The mounted browser editor.
//!
//! Widget calls can fire DOM events synchronously: focusing a field raises
//! `focusin` on it while the editor is still borrowed for the task that asked
//! for the focus. Such events are parked in a backlog and routed as soon as
//! the borrow ends. The change callback always runs with no borrow held, so
//! it may call back into the handle.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use mathlines_core::{
    Deferred, Dispatch, EditorError, EditorOptions, ExternalSync, LineEvent, LineSlot,
    MathLinesEditor,
};
use web_sys::HtmlElement;

use crate::host::BrowserHost;

/// Callback receiving the full list after every internal edit.
pub type ChangeCallback = Rc<dyn Fn(Vec<String>)>;

enum Pending {
    Event(LineSlot, LineEvent),
    Task(Deferred),
}

pub(crate) struct Shared {
    editor: RefCell<MathLinesEditor<BrowserHost>>,
    backlog: RefCell<VecDeque<Pending>>,
    on_change: RefCell<Option<ChangeCallback>>,
}

impl Shared {
    /// Route an event from a line. Returns whether the default action should
    /// be suppressed.
    ///
    /// Events arriving while the editor is busy are queued; they never ask
    /// for `preventDefault`.
    pub(crate) fn dispatch(self: &Rc<Self>, slot: &LineSlot, event: LineEvent) -> bool {
        let dispatch = match self.editor.try_borrow_mut() {
            Ok(mut editor) => editor.handle_event(slot, event),
            Err(_) => {
                self.backlog
                    .borrow_mut()
                    .push_back(Pending::Event(slot.clone(), event));
                return false;
            }
        };
        let prevent = dispatch.prevent_default;
        self.apply(dispatch);
        self.drain();
        prevent
    }

    fn run_task(self: &Rc<Self>, task: Deferred) {
        match self.editor.try_borrow_mut() {
            Ok(mut editor) => {
                editor.run_deferred(task);
            }
            Err(_) => {
                self.backlog.borrow_mut().push_back(Pending::Task(task));
                return;
            }
        }
        self.drain();
    }

    fn drain(self: &Rc<Self>) {
        loop {
            let Some(pending) = self.backlog.borrow_mut().pop_front() else {
                break;
            };
            let Ok(mut editor) = self.editor.try_borrow_mut() else {
                self.backlog.borrow_mut().push_front(pending);
                break;
            };
            let dispatch = match pending {
                Pending::Event(slot, event) => editor.handle_event(&slot, event),
                Pending::Task(task) => {
                    editor.run_deferred(task);
                    Dispatch::ignored()
                }
            };
            drop(editor);
            self.apply(dispatch);
        }
    }

    fn apply(self: &Rc<Self>, dispatch: Dispatch) {
        for task in dispatch.deferred {
            self.schedule(task);
        }
        if let Some(equations) = dispatch.change {
            self.emit(equations);
        }
    }

    /// Each timer holds only a weak reference; tasks from an unmounted or
    /// remounted editor are dropped by the epoch check when they fire.
    fn schedule(self: &Rc<Self>, task: Deferred) {
        let weak = Rc::downgrade(self);
        Timeout::new(task.delay_ms, move || {
            if let Some(shared) = weak.upgrade() {
                shared.run_task(task);
            }
        })
        .forget();
    }

    fn emit(&self, equations: Vec<String>) {
        let callback = self.on_change.borrow().clone();
        if let Some(callback) = callback {
            callback(equations);
        }
    }
}

/// A multi-line math editor mounted into a DOM element.
///
/// Cloning yields another handle to the same editor.
#[derive(Clone)]
pub struct MathLines {
    shared: Rc<Shared>,
}

impl MathLines {
    /// Mount an editor into `container`.
    pub fn mount(
        container: &HtmlElement,
        equations: Vec<String>,
        options: EditorOptions,
        on_change: Option<ChangeCallback>,
    ) -> Result<Self, EditorError> {
        let editor = MathLinesEditor::new(equations, options)?;
        let shared = Rc::new(Shared {
            editor: RefCell::new(editor),
            backlog: RefCell::new(VecDeque::new()),
            on_change: RefCell::new(on_change),
        });
        let host = BrowserHost::new(container, Rc::downgrade(&shared))?;
        let mounted = shared.editor.borrow_mut().mount(host);
        if let Err(err) = mounted {
            if let Some(host) = shared.editor.borrow_mut().unmount() {
                host.detach();
            }
            return Err(err);
        }
        shared.drain();
        tracing::debug!("mathlines mounted");
        Ok(Self { shared })
    }

    /// Replace the change callback.
    pub fn set_on_change(&self, on_change: Option<ChangeCallback>) {
        *self.shared.on_change.borrow_mut() = on_change;
    }

    /// Push an externally owned list into the editor.
    pub fn set_equations(&self, equations: Vec<String>) -> Result<ExternalSync, EditorError> {
        let result = self.borrow_editor()?.set_equations(equations);
        self.shared.drain();
        result
    }

    pub fn set_options(&self, options: EditorOptions) -> Result<(), EditorError> {
        let result = self.borrow_editor()?.set_options(options);
        self.shared.drain();
        result
    }

    /// The list as the editor currently sees it.
    pub fn equations(&self) -> Vec<String> {
        self.shared
            .editor
            .try_borrow()
            .map(|editor| editor.equations().to_vec())
            .unwrap_or_default()
    }

    pub fn focus_line(&self, index: usize) -> Result<(), EditorError> {
        let result = self.borrow_editor()?.focus_line(index);
        self.shared.drain();
        result
    }

    pub fn is_mounted(&self) -> bool {
        self.shared
            .editor
            .try_borrow()
            .is_ok_and(|editor| editor.is_mounted())
    }

    /// Tear the editor down and remove its elements.
    ///
    /// Pending timers become no-ops. Calling this twice is harmless.
    pub fn unmount(&self) {
        let host = match self.shared.editor.try_borrow_mut() {
            Ok(mut editor) => editor.unmount(),
            Err(_) => {
                tracing::warn!("unmount requested while editor busy");
                return;
            }
        };
        if let Some(host) = host {
            host.detach();
        }
        self.shared.backlog.borrow_mut().clear();
        self.shared.on_change.borrow_mut().take();
    }

    /// Host and listener closures still holding a reference to this editor.
    ///
    /// Drops to zero as soon as `unmount` returns, barring timers that have
    /// not fired yet.
    pub fn attached_handlers(&self) -> usize {
        Rc::weak_count(&self.shared)
    }

    /// Run a closure against the underlying editor.
    pub fn with_editor<R>(&self, f: impl FnOnce(&MathLinesEditor<BrowserHost>) -> R) -> Option<R> {
        self.shared.editor.try_borrow().ok().map(|editor| f(&editor))
    }

    fn borrow_editor(
        &self,
    ) -> Result<std::cell::RefMut<'_, MathLinesEditor<BrowserHost>>, EditorError> {
        self.shared
            .editor
            .try_borrow_mut()
            .map_err(|_| EditorError::Busy)
    }
}
