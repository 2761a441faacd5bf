//! mathlines-core: framework-free logic for a multi-line rich math editor.
//!
//! This crate provides:
//! - `LinePool` - position-keyed pool of live line widgets, reconciled
//!   against a target list length without rebuilding surviving lines
//! - `LineSlot` - shared, mutable position handle given to event handlers
//! - `MathLinesEditor<H>` - the controlled editor, generic over a `LineHost`
//! - `SyncGuard` - echo suppression between the editor's own emissions and
//!   the host's re-render
//! - `Deferred` tasks for focus transfer and flag clearing on a later tick
//!
//! Nothing here parses or validates math; line contents are opaque strings.

pub mod deferred;
pub mod editor;
pub mod error;
pub mod guard;
pub mod keys;
pub mod options;
pub mod platform;
pub mod pool;
pub mod router;

pub use deferred::{Deferred, DeferredTask};
pub use editor::{ExternalSync, LineState, MathLinesEditor};
pub use error::{EditorError, PlatformError};
pub use guard::{GuardState, GuardToken, SyncGuard};
pub use keys::{Key, KeyCombo, Modifiers, parse_key};
pub use options::{DEFAULT_KEYBOARD_SETTLE_MS, EditorOptions, KEYBOARD_CONFIRM_FALLBACK_MS};
pub use platform::{LineHost, LineWidget};
pub use pool::{LineId, LinePool, LineRecord, LineSlot, PoolDelta};
pub use router::{Dispatch, LineEvent};
pub use smol_str::SmolStr;
