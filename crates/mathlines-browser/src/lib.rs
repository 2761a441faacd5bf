//! Browser DOM layer for the mathlines editor.
//!
//! Renders each line as a MathLive `<math-field>` with an ordinal label and
//! forwards its DOM events to the headless editor in `mathlines-core`. It
//! assumes a `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `mathfield`: bindings for the `<math-field>` custom element
//! - `events`: keyboard and pointer event extraction
//! - `line`: one line's elements, as a `LineWidget`
//! - `host`: `LineHost` that builds lines and wires their listeners
//! - `handle`: the mounted editor, deferred tasks and re-entrancy backlog
//!
//! # Re-exports
//!
//! This crate re-exports `mathlines-core` for convenience, so consumers
//! only need to depend on `mathlines-browser`.

// Re-export core crate
pub use mathlines_core;
pub use mathlines_core::*;

pub mod events;
pub mod handle;
pub mod host;
pub mod line;
pub mod mathfield;

pub use events::{is_keyboard_toggle, key_combo, pointer_hits_keyboard_toggle};
pub use handle::{ChangeCallback, MathLines};
pub use host::BrowserHost;
pub use line::BrowserLine;
pub use mathfield::{MathfieldElement, virtual_keyboard_visible};
