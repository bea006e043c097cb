//! Host collaborator surface consumed by the command handlers.
//!
//! The embedding editor owns these services; the bridge only consumes them.
//! Concrete implementations live in [`crate::infra`], in-memory ones in
//! [`memory`].

pub mod memory;

use anyhow::Result;

use crate::domain::model::DocumentState;

/// Access to the active editor and its document.
pub trait EditorHost {
    /// Snapshot of the focused document, or `None` when no editor is active.
    fn active_document(&self) -> Option<DocumentState>;

    /// Persist the active document so external tools see current content.
    fn save_active(&mut self) -> Result<()>;
}

/// System clipboard read/write.
pub trait ClipboardHost {
    fn read_text(&mut self) -> Result<String>;
    fn write_text(&mut self, text: &str) -> Result<()>;
}

/// Terminal session the external tool runs in. Implementations create the
/// session on first use.
pub trait TerminalHost {
    fn send_text(&mut self, text: &str) -> Result<()>;

    /// Bring the terminal into view.
    fn show(&mut self) -> Result<()>;
}

/// User-facing notifications.
pub trait Notifier {
    fn info(&mut self, message: &str);
    fn error(&mut self, message: &str);
}

/// Best-effort editor window refocus. Unsupported platforms no-op; failures
/// are never surfaced to the user.
pub trait WindowFocuser {
    fn focus_editor(&mut self) -> Result<()>;
}

/// Bundle of host services handed to the command handlers.
pub struct Host {
    pub editor: Box<dyn EditorHost>,
    pub clipboard: Box<dyn ClipboardHost>,
    pub terminal: Box<dyn TerminalHost>,
    pub focus: Box<dyn WindowFocuser>,
}
