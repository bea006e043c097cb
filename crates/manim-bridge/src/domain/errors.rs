//! Bridge error taxonomy.

use thiserror::Error;

/// Failures a command handler reports to the user. Each aborts only the
/// current invocation.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("editor not found")]
    NoActiveEditor,
    #[error("check failed: file must end with .{expected}")]
    InvalidFileType { expected: String },
    #[error("no matching classes")]
    NoEnclosingClass,
    #[error("no text selected in the editor")]
    EmptySelection,
    #[error("please wait until the current command finishes executing")]
    AlreadyRunning,
    #[error(transparent)]
    Host(#[from] anyhow::Error),
}

impl BridgeError {
    /// `AlreadyRunning` is expected contention and renders as information
    /// rather than an error.
    pub fn is_informational(&self) -> bool {
        matches!(self, BridgeError::AlreadyRunning)
    }
}
