//! Domain models for documents, scene targets, and run commands.

use std::path::PathBuf;

/// Zero-based cursor location within a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Span between two positions. An empty span stands for a bare cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionSpan {
    pub start: Position,
    pub end: Position,
}

impl SelectionSpan {
    /// Collapsed span at the given position.
    pub fn caret(position: Position) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Snapshot of the active document at invocation time. Discarded when the
/// handler returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentState {
    pub path: PathBuf,
    pub text: String,
    pub cursor: Position,
    pub selection: SelectionSpan,
}

impl DocumentState {
    /// Full text of a single line, without its trailing newline.
    pub fn line(&self, index: usize) -> Option<&str> {
        self.text.lines().nth(index)
    }
}

/// A line matching the class-header pattern, with its original index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassLine {
    pub text: String,
    pub index: usize,
}

/// The class definition enclosing the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneTarget {
    pub name: String,
    pub header_line: usize,
}

/// External-tool invocation derived from the document and cursor. Immutable
/// once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunCommand {
    pub program: String,
    pub file_path: PathBuf,
    pub scene_name: String,
    /// 1-based line carried as `-se <line>` when the cursor was not on the
    /// header line itself.
    pub selected_line: Option<usize>,
}

impl RunCommand {
    /// Token list joined into the base command sent to the terminal.
    pub fn tokens(&self) -> Vec<String> {
        let mut tokens = vec![
            self.program.clone(),
            self.file_path.display().to_string(),
            self.scene_name.clone(),
        ];
        if let Some(line) = self.selected_line {
            tokens.push(format!("-se {line}"));
        }
        tokens
    }

    /// Space-joined form dispatched to the terminal.
    pub fn base_command(&self) -> String {
        self.tokens().join(" ")
    }

    /// Extended form written to the clipboard for pasting elsewhere.
    pub fn clipboard_command(&self, extra_args: &[String]) -> String {
        let mut command = self.base_command();
        for arg in extra_args {
            command.push(' ');
            command.push_str(arg);
        }
        command
    }
}
