//! Work the editor hands back to the platform to run later.
//!
//! Structural edits finish their pool reconciliation synchronously, then ask
//! for focus to move on a strictly later tick. Flag clearing is deferred the
//! same way. Every task is best-effort: it re-checks that its target is
//! still live when it fires and becomes a no-op otherwise.

use crate::guard::GuardToken;
use crate::pool::LineId;

/// What to do when a deferred task fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredTask {
    /// Focus the line at this position, if it still exists.
    FocusLine { index: usize },
    /// Drop the sync guard back to idle.
    ReleaseGuard { token: GuardToken },
    /// End the "keyboard opening" window on a line.
    SettleKeyboard { line: LineId, generation: u64 },
}

/// A task plus its scheduling metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deferred {
    /// Editor lifetime the task belongs to. Bumped on mount and unmount.
    pub epoch: u64,
    /// Delay before running. Zero means "next tick".
    pub delay_ms: u32,
    pub task: DeferredTask,
}

impl Deferred {
    pub fn next_tick(epoch: u64, task: DeferredTask) -> Self {
        Self {
            epoch,
            delay_ms: 0,
            task,
        }
    }

    pub fn after(epoch: u64, delay_ms: u32, task: DeferredTask) -> Self {
        Self {
            epoch,
            delay_ms,
            task,
        }
    }
}
