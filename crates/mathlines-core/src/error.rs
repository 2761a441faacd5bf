//! Error types for editor operations.

use thiserror::Error;

/// Error raised by a platform layer (DOM, native widget toolkit, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformError(pub String);

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for PlatformError {}

impl From<&str> for PlatformError {
    fn from(s: &str) -> Self {
        PlatformError(s.to_string())
    }
}

impl From<String> for PlatformError {
    fn from(s: String) -> Self {
        PlatformError(s)
    }
}

/// Errors returned by the public editor operations.
///
/// Event handlers and deferred tasks never return these; they log and
/// degrade to a no-op instead.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum EditorError {
    /// The platform failed to create or update a line widget.
    #[error("platform error: {0}")]
    Platform(#[from] PlatformError),

    /// Options failed validation.
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    /// Operation needs a mounted editor.
    #[error("editor is not mounted")]
    NotMounted,

    /// `mount` called twice without `unmount` in between.
    #[error("editor is already mounted")]
    AlreadyMounted,

    /// Line index past the end of the pool.
    #[error("line {index} out of range (editor has {len} lines)")]
    LineOutOfRange { index: usize, len: usize },

    /// Called re-entrantly while the editor was handling another call.
    #[error("editor is busy")]
    Busy,
}
