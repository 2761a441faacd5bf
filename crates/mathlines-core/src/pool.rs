//! Widget pool and line registry.
//!
//! The pool is an arena keyed by position. Reconciliation only ever grows
//! or shrinks the tail: widget handles are recycled across positions and the
//! displayed values are refreshed afterwards, so a widget that did not change
//! keeps its cursor and any in-progress composition.
//!
//! Handlers never capture a line's position. They hold a [`LineSlot`], whose
//! index cell is rewritten whenever the pool renumbers.

use std::cell::Cell;
use std::rc::Rc;

use crate::error::PlatformError;
use crate::options::EditorOptions;
use crate::platform::{LineHost, LineWidget};

/// Stable identity of a line record for its whole lifetime.
///
/// Never reused within one pool, so deferred tasks can tell a destroyed
/// record from a newer one at the same position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineId(pub u64);

#[derive(Debug)]
struct SlotInner {
    id: LineId,
    index: Cell<usize>,
    live: Cell<bool>,
}

/// Shared handle to a line record's mutable position.
///
/// Platform event handlers keep a clone of the slot and hand it back to the
/// editor with every event.
#[derive(Debug, Clone)]
pub struct LineSlot(Rc<SlotInner>);

impl LineSlot {
    pub(crate) fn new(id: LineId, index: usize) -> Self {
        Self(Rc::new(SlotInner {
            id,
            index: Cell::new(index),
            live: Cell::new(true),
        }))
    }

    /// Current position of the line. Read this at call time, never cache it.
    pub fn index(&self) -> usize {
        self.0.index.get()
    }

    pub fn id(&self) -> LineId {
        self.0.id
    }

    /// False once the record has been destroyed.
    pub fn is_live(&self) -> bool {
        self.0.live.get()
    }

    fn set_index(&self, index: usize) {
        self.0.index.set(index);
    }

    fn detach(&self) {
        self.0.live.set(false);
    }
}

/// One line: a widget bound to a position.
#[derive(Debug)]
pub struct LineRecord<L> {
    pub(crate) slot: LineSlot,
    pub(crate) widget: L,
    pub(crate) active: bool,
    /// Generation of the pending "keyboard opening" window, if any.
    pub(crate) keyboard_opening: Option<u64>,
}

impl<L> LineRecord<L> {
    pub fn id(&self) -> LineId {
        self.slot.id()
    }

    pub fn index(&self) -> usize {
        self.slot.index()
    }

    pub fn slot(&self) -> &LineSlot {
        &self.slot
    }

    pub fn widget(&self) -> &L {
        &self.widget
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_keyboard_opening(&self) -> bool {
        self.keyboard_opening.is_some()
    }
}

/// What a reconciliation pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolDelta {
    pub created: usize,
    pub destroyed: usize,
    pub renumbered: usize,
}

impl PoolDelta {
    pub fn is_empty(&self) -> bool {
        self.created == 0 && self.destroyed == 0 && self.renumbered == 0
    }
}

/// Position-keyed pool of line records.
#[derive(Debug)]
pub struct LinePool<L> {
    records: Vec<LineRecord<L>>,
    next_id: u64,
}

impl<L> Default for LinePool<L> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            next_id: 0,
        }
    }
}

impl<L: LineWidget> LinePool<L> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LineRecord<L>> {
        self.records.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut LineRecord<L>> {
        self.records.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LineRecord<L>> {
        self.records.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut LineRecord<L>> {
        self.records.iter_mut()
    }

    pub(crate) fn find_mut(&mut self, id: LineId) -> Option<&mut LineRecord<L>> {
        self.records.iter_mut().find(|r| r.id() == id)
    }

    /// Resolve a slot to its current position.
    ///
    /// Returns `None` for a slot whose record has been destroyed, or whose
    /// position is now held by a different record.
    pub fn resolve(&self, slot: &LineSlot) -> Option<usize> {
        if !slot.is_live() {
            return None;
        }
        let index = slot.index();
        match self.records.get(index) {
            Some(record) if record.id() == slot.id() => Some(index),
            _ => None,
        }
    }

    /// Grow or shrink the pool to exactly `values.len()` records.
    ///
    /// New records are seeded from `values`. Surviving records are left
    /// untouched apart from renumbering; callers refresh displayed values
    /// separately with [`LinePool::refresh_values`].
    pub fn reconcile<H>(
        &mut self,
        host: &mut H,
        values: &[String],
        options: &EditorOptions,
    ) -> Result<PoolDelta, PlatformError>
    where
        H: LineHost<Line = L>,
    {
        let target = values.len();
        let mut delta = PoolDelta::default();

        while self.records.len() > target {
            if let Some(mut record) = self.records.pop() {
                record.slot.detach();
                record.widget.destroy();
                delta.destroyed += 1;
            }
        }

        for (position, record) in self.records.iter_mut().enumerate() {
            if record.slot.index() != position {
                record.slot.set_index(position);
                record.widget.set_ordinal(position + 1);
                delta.renumbered += 1;
            }
        }

        for (position, value) in values.iter().enumerate().skip(self.records.len()) {
            let id = LineId(self.next_id);
            self.next_id += 1;

            let slot = LineSlot::new(id, position);
            let mut widget = host.create_line(slot.clone(), value, options)?;
            widget.set_ordinal(position + 1);
            widget.set_label_visible(options.show_line_numbers);

            self.records.push(LineRecord {
                slot,
                widget,
                active: false,
                keyboard_opening: None,
            });
            delta.created += 1;
        }

        if !delta.is_empty() {
            tracing::debug!(
                target_len = target,
                created = delta.created,
                destroyed = delta.destroyed,
                renumbered = delta.renumbered,
                "line pool reconciled"
            );
        }

        Ok(delta)
    }

    /// Write `values` into the widgets, skipping any widget that already
    /// displays the right value. Returns the number of widgets written.
    pub fn refresh_values(&mut self, values: &[String]) -> usize {
        let mut written = 0;
        for (record, value) in self.records.iter_mut().zip(values) {
            if record.widget.value() != *value {
                record.widget.set_value(value);
                written += 1;
            }
        }
        if written > 0 {
            tracing::trace!(written, "refreshed line values");
        }
        written
    }

    /// Tear down every record.
    pub fn clear(&mut self) -> usize {
        let count = self.records.len();
        for mut record in self.records.drain(..).rev() {
            record.slot.detach();
            record.widget.teardown();
        }
        count
    }

    /// Check the reindexing invariant: every record sits at its own index.
    pub fn is_consistent(&self) -> bool {
        self.records
            .iter()
            .enumerate()
            .all(|(position, record)| record.slot.is_live() && record.slot.index() == position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct FakeLine {
        value: String,
        ordinal: usize,
        destroyed: bool,
        writes: usize,
    }

    impl LineWidget for FakeLine {
        fn value(&self) -> String {
            self.value.clone()
        }
        fn set_value(&mut self, value: &str) {
            self.value = value.to_string();
            self.writes += 1;
        }
        fn set_ordinal(&mut self, ordinal: usize) {
            self.ordinal = ordinal;
        }
        fn set_active(&mut self, _active: bool) {}
        fn set_label_visible(&mut self, _visible: bool) {}
        fn apply_options(&mut self, _options: &EditorOptions) {}
        fn focus(&mut self) {}
        fn destroy(&mut self) {
            self.destroyed = true;
        }
    }

    #[derive(Default)]
    struct FakeHost {
        created: usize,
        fail_after: Option<usize>,
    }

    impl LineHost for FakeHost {
        type Line = FakeLine;

        fn create_line(
            &mut self,
            _slot: LineSlot,
            value: &str,
            _options: &EditorOptions,
        ) -> Result<FakeLine, PlatformError> {
            if self.fail_after == Some(self.created) {
                return Err("widget construction failed".into());
            }
            self.created += 1;
            Ok(FakeLine {
                value: value.to_string(),
                ..Default::default()
            })
        }
    }

    fn lines(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_grow_seeds_new_records() {
        let mut host = FakeHost::default();
        let mut pool = LinePool::new();
        let opts = EditorOptions::default();

        let delta = pool.reconcile(&mut host, &lines(&["a", "b"]), &opts).unwrap();
        assert_eq!(delta.created, 2);
        assert_eq!(pool.len(), 2);
        assert!(pool.is_consistent());
        assert_eq!(pool.get(1).unwrap().widget().value, "b");
        assert_eq!(pool.get(1).unwrap().widget().ordinal, 2);
    }

    #[test]
    fn test_shrink_destroys_tail_and_detaches_slot() {
        let mut host = FakeHost::default();
        let mut pool = LinePool::new();
        let opts = EditorOptions::default();

        pool.reconcile(&mut host, &lines(&["a", "b", "c"]), &opts).unwrap();
        let tail_slot = pool.get(2).unwrap().slot.clone();
        let head_id = pool.get(0).unwrap().id();

        let delta = pool.reconcile(&mut host, &lines(&["a"]), &opts).unwrap();
        assert_eq!(delta.destroyed, 2);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.get(0).unwrap().id(), head_id);
        assert!(!tail_slot.is_live());
        assert_eq!(pool.resolve(&tail_slot), None);
    }

    #[test]
    fn test_same_length_is_noop() {
        let mut host = FakeHost::default();
        let mut pool = LinePool::new();
        let opts = EditorOptions::default();

        pool.reconcile(&mut host, &lines(&["a", "b"]), &opts).unwrap();
        let delta = pool.reconcile(&mut host, &lines(&["x", "y"]), &opts).unwrap();
        assert!(delta.is_empty());
        assert_eq!(host.created, 2);
    }

    #[test]
    fn test_refresh_skips_unchanged_widgets() {
        let mut host = FakeHost::default();
        let mut pool = LinePool::new();
        let opts = EditorOptions::default();

        pool.reconcile(&mut host, &lines(&["a", "b"]), &opts).unwrap();
        let written = pool.refresh_values(&lines(&["a", "c"]));
        assert_eq!(written, 1);
        assert_eq!(pool.get(0).unwrap().widget().writes, 0);
        assert_eq!(pool.get(1).unwrap().widget().value, "c");
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut host = FakeHost::default();
        let mut pool = LinePool::new();
        let opts = EditorOptions::default();

        pool.reconcile(&mut host, &lines(&["a", "b"]), &opts).unwrap();
        let old_id = pool.get(1).unwrap().id();
        pool.reconcile(&mut host, &lines(&["a"]), &opts).unwrap();
        pool.reconcile(&mut host, &lines(&["a", "b"]), &opts).unwrap();
        assert_ne!(pool.get(1).unwrap().id(), old_id);
    }

    #[test]
    fn test_create_failure_keeps_built_records() {
        let mut host = FakeHost {
            fail_after: Some(1),
            ..Default::default()
        };
        let mut pool = LinePool::new();
        let opts = EditorOptions::default();

        let err = pool
            .reconcile(&mut host, &lines(&["a", "b", "c"]), &opts)
            .unwrap_err();
        assert_eq!(err.0, "widget construction failed");
        assert_eq!(pool.len(), 1);
        assert!(pool.is_consistent());
    }

    #[test]
    fn test_clear_destroys_everything() {
        let mut host = FakeHost::default();
        let mut pool = LinePool::new();
        let opts = EditorOptions::default();

        pool.reconcile(&mut host, &lines(&["a", "b"]), &opts).unwrap();
        let slots: Vec<_> = pool.iter().map(|r| r.slot.clone()).collect();
        assert_eq!(pool.clear(), 2);
        assert!(pool.is_empty());
        assert!(slots.iter().all(|s| !s.is_live()));
    }
}
