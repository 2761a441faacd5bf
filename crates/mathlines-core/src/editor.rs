//! MathLinesEditor - a controlled list of rich math-input lines.

use crate::deferred::{Deferred, DeferredTask};
use crate::error::EditorError;
use crate::guard::{GuardState, SyncGuard};
use crate::options::EditorOptions;
use crate::platform::{LineHost, LineWidget};
use crate::pool::{LinePool, PoolDelta};

/// Outcome of pushing an external list into the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalSync {
    /// The list equals the editor's state; nothing was touched.
    Unchanged,
    /// The editor's own emission is still in flight; the list was ignored.
    Suppressed,
    /// The list was adopted. Widgets were updated if mounted.
    Applied { delta: PoolDelta, written: usize },
}

/// Read-only view of one line, for hosts and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineState {
    pub index: usize,
    pub active: bool,
    pub keyboard_opening: bool,
}

/// The multi-line editor state machine.
///
/// Owns the expression list as last seen by the editor, the pool of live
/// widgets and the sync guard. Generic over the platform that draws the
/// widgets.
pub struct MathLinesEditor<H: LineHost> {
    pub(crate) equations: Vec<String>,
    pub(crate) options: EditorOptions,
    pub(crate) pool: LinePool<H::Line>,
    pub(crate) guard: SyncGuard,
    pub(crate) host: Option<H>,
    /// Bumped on mount and unmount; deferred tasks from another epoch are dropped.
    pub(crate) epoch: u64,
    pub(crate) keyboard_generation: u64,
}

impl<H: LineHost> std::fmt::Debug for MathLinesEditor<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MathLinesEditor")
            .field("equations", &self.equations)
            .field("options", &self.options)
            .field("lines", &self.pool.len())
            .field("guard", &self.guard.state())
            .field("mounted", &self.host.is_some())
            .field("epoch", &self.epoch)
            .finish()
    }
}

/// An empty list still shows one blank line.
fn normalize(mut equations: Vec<String>) -> Vec<String> {
    if equations.is_empty() {
        equations.push(String::new());
    }
    equations
}

impl<H: LineHost> MathLinesEditor<H> {
    /// Create an unmounted editor.
    pub fn new(equations: Vec<String>, options: EditorOptions) -> Result<Self, EditorError> {
        Ok(Self {
            equations: normalize(equations),
            options: options.validate()?,
            pool: LinePool::new(),
            guard: SyncGuard::new(),
            host: None,
            epoch: 0,
            keyboard_generation: 0,
        })
    }

    /// Build the initial pool on `host`.
    pub fn mount(&mut self, host: H) -> Result<(), EditorError> {
        if self.host.is_some() {
            return Err(EditorError::AlreadyMounted);
        }
        self.epoch += 1;
        self.guard.reset();
        self.host = Some(host);
        let delta = self.reconcile()?;
        tracing::debug!(lines = delta.created, epoch = self.epoch, "editor mounted");
        Ok(())
    }

    pub fn is_mounted(&self) -> bool {
        self.host.is_some()
    }

    /// Destroy every widget and hand the host back.
    ///
    /// Deferred tasks issued before this call become no-ops.
    pub fn unmount(&mut self) -> Option<H> {
        let host = self.host.take()?;
        let destroyed = self.pool.clear();
        self.guard.reset();
        self.epoch += 1;
        tracing::debug!(destroyed, "editor unmounted");
        Some(host)
    }

    /// The expression list as the editor currently sees it.
    pub fn equations(&self) -> &[String] {
        &self.equations
    }

    pub fn len(&self) -> usize {
        self.equations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.equations.is_empty()
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    pub fn guard_state(&self) -> GuardState {
        self.guard.state()
    }

    pub fn pool(&self) -> &LinePool<H::Line> {
        &self.pool
    }

    pub fn host(&self) -> Option<&H> {
        self.host.as_ref()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn line_states(&self) -> Vec<LineState> {
        self.pool
            .iter()
            .map(|record| LineState {
                index: record.index(),
                active: record.is_active(),
                keyboard_opening: record.is_keyboard_opening(),
            })
            .collect()
    }

    /// Push an externally owned list into the editor.
    ///
    /// Lists equal to the current state are ignored outright, so applying
    /// the same value twice never touches a widget. While the editor's own
    /// emission is in flight the list is treated as a stale echo and skipped.
    pub fn set_equations(&mut self, equations: Vec<String>) -> Result<ExternalSync, EditorError> {
        let equations = normalize(equations);
        if equations == self.equations {
            return Ok(ExternalSync::Unchanged);
        }
        if !self.guard.is_idle() {
            tracing::trace!(
                incoming = equations.len(),
                current = self.equations.len(),
                "external update suppressed while internal edit in flight"
            );
            return Ok(ExternalSync::Suppressed);
        }

        self.equations = equations;
        if self.host.is_none() {
            return Ok(ExternalSync::Applied {
                delta: PoolDelta::default(),
                written: 0,
            });
        }

        let delta = self.reconcile()?;
        let written = self.pool.refresh_values(&self.equations);
        tracing::debug!(
            lines = self.equations.len(),
            written,
            "external equations applied"
        );
        Ok(ExternalSync::Applied { delta, written })
    }

    /// Replace the options and re-apply presentation to every line.
    pub fn set_options(&mut self, options: EditorOptions) -> Result<(), EditorError> {
        let options = options.validate()?;
        for record in self.pool.iter_mut() {
            record.widget.set_label_visible(options.show_line_numbers);
            record.widget.apply_options(&options);
        }
        self.options = options;
        Ok(())
    }

    /// Focus a line right away.
    pub fn focus_line(&mut self, index: usize) -> Result<(), EditorError> {
        if self.host.is_none() {
            return Err(EditorError::NotMounted);
        }
        let len = self.pool.len();
        let record = self
            .pool
            .get_mut(index)
            .ok_or(EditorError::LineOutOfRange { index, len })?;
        record.widget.focus();
        Ok(())
    }

    /// Run a task the platform deferred. Returns whether it did anything.
    ///
    /// Tasks from an earlier mount, tasks fired after unmount and tasks whose
    /// target no longer exists are dropped silently.
    pub fn run_deferred(&mut self, deferred: Deferred) -> bool {
        if deferred.epoch != self.epoch || self.host.is_none() {
            tracing::trace!(task = ?deferred.task, "dropping deferred task from a stale epoch");
            return false;
        }

        match deferred.task {
            DeferredTask::FocusLine { index } => match self.pool.get_mut(index) {
                Some(record) => {
                    record.widget.focus();
                    true
                }
                None => {
                    tracing::trace!(index, "deferred focus target is gone");
                    false
                }
            },
            DeferredTask::ReleaseGuard { token } => self.guard.release(token),
            DeferredTask::SettleKeyboard { line, generation } => {
                match self.pool.find_mut(line) {
                    Some(record) if record.keyboard_opening == Some(generation) => {
                        record.keyboard_opening = None;
                        tracing::trace!(index = record.index(), "keyboard opening window closed");
                        true
                    }
                    _ => false,
                }
            }
        }
    }

    /// Match the pool to the current list length.
    pub(crate) fn reconcile(&mut self) -> Result<PoolDelta, EditorError> {
        let Some(host) = self.host.as_mut() else {
            return Err(EditorError::NotMounted);
        };
        Ok(self.pool.reconcile(host, &self.equations, &self.options)?)
    }

    pub(crate) fn defer(&self, task: DeferredTask) -> Deferred {
        Deferred::next_tick(self.epoch, task)
    }

    pub(crate) fn defer_after(&self, delay_ms: u32, task: DeferredTask) -> Deferred {
        Deferred::after(self.epoch, delay_ms, task)
    }

    /// Push the editor's own list into the widgets, bypassing the guard.
    pub(crate) fn sync_widgets(&mut self) -> usize {
        self.pool.refresh_values(&self.equations)
    }

    pub(crate) fn widget_value(&self, index: usize) -> Option<String> {
        self.pool.get(index).map(|record| record.widget.value())
    }
}
