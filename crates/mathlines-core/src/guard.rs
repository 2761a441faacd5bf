//! Echo suppression between widget edits and the host's re-render.
//!
//! The editor is controlled: the host owns the list of expressions and
//! pushes it back after every `on_change`. That push arrives a tick later and
//! still carries the pre-edit value, so while the editor's own emission is in
//! flight, external values must not be written into the widgets.

/// Guard state for one editor instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuardState {
    #[default]
    Idle,
    /// The editor emitted an edit that has not yet round-tripped.
    ApplyingInternalEdit,
}

/// Ticket handed out by [`SyncGuard::raise`]; only the latest one releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GuardToken(u64);

/// Two-state guard with a single clearing point.
///
/// Every raise bumps a generation. A release scheduled by an older raise is
/// ignored, so back-to-back edits keep the guard up until the last one's
/// tick has passed.
#[derive(Debug, Default)]
pub struct SyncGuard {
    state: GuardState,
    generation: u64,
}

impl SyncGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == GuardState::Idle
    }

    /// Enter `ApplyingInternalEdit`. Schedule a release with the token.
    pub fn raise(&mut self) -> GuardToken {
        self.generation += 1;
        self.state = GuardState::ApplyingInternalEdit;
        tracing::trace!(generation = self.generation, "sync guard raised");
        GuardToken(self.generation)
    }

    /// Return to `Idle` if `token` is the most recent raise.
    pub fn release(&mut self, token: GuardToken) -> bool {
        if token.0 != self.generation || self.state == GuardState::Idle {
            return false;
        }
        self.state = GuardState::Idle;
        tracing::trace!(generation = self.generation, "sync guard released");
        true
    }

    /// Drop back to `Idle` unconditionally and invalidate pending tokens.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = GuardState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raise_release() {
        let mut guard = SyncGuard::new();
        assert!(guard.is_idle());

        let token = guard.raise();
        assert_eq!(guard.state(), GuardState::ApplyingInternalEdit);
        assert!(guard.release(token));
        assert!(guard.is_idle());
        assert!(!guard.release(token));
    }

    #[test]
    fn test_stale_token_does_not_release() {
        let mut guard = SyncGuard::new();
        let first = guard.raise();
        let second = guard.raise();

        assert!(!guard.release(first));
        assert!(!guard.is_idle());
        assert!(guard.release(second));
        assert!(guard.is_idle());
    }

    #[test]
    fn test_reset_invalidates_tokens() {
        let mut guard = SyncGuard::new();
        let token = guard.raise();
        guard.reset();
        assert!(guard.is_idle());

        guard.raise();
        assert!(!guard.release(token));
        assert!(!guard.is_idle());
    }
}
