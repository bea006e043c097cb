//! In-memory host services for tests and for embedding without a desktop.
//!
//! Every service hands out cloneable handles over shared state, so a caller
//! can keep a handle, box the service into a [`Host`], and inspect what the
//! handlers did afterwards.

use std::sync::Arc;

use anyhow::{Result, anyhow};
use parking_lot::Mutex;

use crate::domain::model::DocumentState;
use crate::host::{ClipboardHost, EditorHost, Host, Notifier, TerminalHost, WindowFocuser};

/// Editor backed by an optional in-memory document.
#[derive(Debug, Clone, Default)]
pub struct MemoryEditor {
    state: Arc<Mutex<MemoryEditorState>>,
}

#[derive(Debug, Default)]
struct MemoryEditorState {
    document: Option<DocumentState>,
    save_count: usize,
}

impl MemoryEditor {
    pub fn new(document: DocumentState) -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryEditorState {
                document: Some(document),
                save_count: 0,
            })),
        }
    }

    /// Editor with no focused document.
    pub fn unfocused() -> Self {
        Self::default()
    }

    /// How many times `save_active` ran.
    pub fn save_count(&self) -> usize {
        self.state.lock().save_count
    }
}

impl EditorHost for MemoryEditor {
    fn active_document(&self) -> Option<DocumentState> {
        self.state.lock().document.clone()
    }

    fn save_active(&mut self) -> Result<()> {
        self.state.lock().save_count += 1;
        Ok(())
    }
}

/// Clipboard holding a single string, recording every write.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    state: Arc<Mutex<MemoryClipboardState>>,
}

#[derive(Debug, Default)]
struct MemoryClipboardState {
    contents: String,
    writes: Vec<String>,
}

impl MemoryClipboard {
    pub fn with_contents(text: &str) -> Self {
        let clipboard = Self::default();
        clipboard.state.lock().contents = text.to_owned();
        clipboard
    }

    pub fn contents(&self) -> String {
        self.state.lock().contents.clone()
    }

    /// Every value written, in order.
    pub fn writes(&self) -> Vec<String> {
        self.state.lock().writes.clone()
    }
}

impl ClipboardHost for MemoryClipboard {
    fn read_text(&mut self) -> Result<String> {
        Ok(self.state.lock().contents.clone())
    }

    fn write_text(&mut self, text: &str) -> Result<()> {
        let mut state = self.state.lock();
        state.contents = text.to_owned();
        state.writes.push(text.to_owned());
        Ok(())
    }
}

/// Terminal recording every text sent to it.
#[derive(Debug, Clone, Default)]
pub struct MemoryTerminal {
    state: Arc<Mutex<MemoryTerminalState>>,
}

#[derive(Debug, Default)]
struct MemoryTerminalState {
    sent: Vec<String>,
    shown: bool,
    fail_sends: bool,
}

impl MemoryTerminal {
    /// Terminal whose sends error, for exercising failure paths.
    pub fn failing() -> Self {
        let terminal = Self::default();
        terminal.state.lock().fail_sends = true;
        terminal
    }

    pub fn sent(&self) -> Vec<String> {
        self.state.lock().sent.clone()
    }

    pub fn was_shown(&self) -> bool {
        self.state.lock().shown
    }
}

impl TerminalHost for MemoryTerminal {
    fn send_text(&mut self, text: &str) -> Result<()> {
        let mut state = self.state.lock();
        if state.fail_sends {
            return Err(anyhow!("terminal unavailable"));
        }
        state.sent.push(text.to_owned());
        Ok(())
    }

    fn show(&mut self) -> Result<()> {
        self.state.lock().shown = true;
        Ok(())
    }
}

/// Notifier collecting messages by severity.
#[derive(Debug, Clone, Default)]
pub struct MemoryNotifier {
    state: Arc<Mutex<MemoryNotifierState>>,
}

#[derive(Debug, Default)]
struct MemoryNotifierState {
    infos: Vec<String>,
    errors: Vec<String>,
}

impl MemoryNotifier {
    pub fn infos(&self) -> Vec<String> {
        self.state.lock().infos.clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.state.lock().errors.clone()
    }
}

impl Notifier for MemoryNotifier {
    fn info(&mut self, message: &str) {
        self.state.lock().infos.push(message.to_owned());
    }

    fn error(&mut self, message: &str) {
        self.state.lock().errors.push(message.to_owned());
    }
}

/// Focuser counting invocations; optionally failing to exercise the
/// best-effort path.
#[derive(Debug, Clone, Default)]
pub struct MemoryFocuser {
    state: Arc<Mutex<MemoryFocuserState>>,
}

#[derive(Debug, Default)]
struct MemoryFocuserState {
    calls: usize,
    fail: bool,
}

impl MemoryFocuser {
    pub fn failing() -> Self {
        let focuser = Self::default();
        focuser.state.lock().fail = true;
        focuser
    }

    pub fn calls(&self) -> usize {
        self.state.lock().calls
    }
}

impl WindowFocuser for MemoryFocuser {
    fn focus_editor(&mut self) -> Result<()> {
        let mut state = self.state.lock();
        state.calls += 1;
        if state.fail {
            return Err(anyhow!("window focus unsupported"));
        }
        Ok(())
    }
}

/// Full in-memory host. Keep the struct around to inspect service state
/// after a handler has consumed the [`Host`] built from it.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    pub editor: MemoryEditor,
    pub clipboard: MemoryClipboard,
    pub terminal: MemoryTerminal,
    pub focuser: MemoryFocuser,
}

impl MemoryHost {
    pub fn with_document(document: DocumentState) -> Self {
        Self {
            editor: MemoryEditor::new(document),
            ..Self::default()
        }
    }

    /// Host with no focused editor.
    pub fn unfocused() -> Self {
        Self::default()
    }

    /// Boxed [`Host`] sharing state with this struct's handles.
    pub fn host(&self) -> Host {
        Host {
            editor: Box::new(self.editor.clone()),
            clipboard: Box::new(self.clipboard.clone()),
            terminal: Box::new(self.terminal.clone()),
            focus: Box::new(self.focuser.clone()),
        }
    }
}
