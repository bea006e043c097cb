//! Checkpoint Paste: replay the selection through the external REPL's
//! clipboard checkpoint.

use std::thread;
use std::time::Duration;

use parking_lot::{Mutex, MutexGuard};

use crate::domain::errors::BridgeError;
use crate::domain::model::DocumentState;
use crate::host::Host;
use crate::infra::config::Config;

// Ctrl-L, clears/centers the terminal ahead of the trigger.
const CLEAR_SEQUENCE: char = '\x0c';

/// Single-slot lock preventing overlapping clipboard handoffs. The held
/// slot releases when dropped, on every exit path.
#[derive(Debug, Default)]
pub struct PasteGuard {
    slot: Mutex<()>,
}

impl PasteGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the slot if free. Embedding hosts can hold the returned guard
    /// to block checkpoint pastes outright.
    pub fn try_acquire(&self) -> Option<MutexGuard<'_, ()>> {
        self.slot.try_lock()
    }
}

/// Resolve the text to hand to the REPL: the cursor's whole line for a bare
/// cursor, otherwise the selection snapped to whole lines.
pub fn resolve_paste_text(document: &DocumentState) -> String {
    let selection = document.selection;
    if selection.is_empty() {
        return document
            .line(selection.start.line)
            .unwrap_or_default()
            .to_owned();
    }

    let start = selection.start.line.min(selection.end.line);
    let end = selection.start.line.max(selection.end.line);
    document
        .text
        .lines()
        .skip(start)
        .take(end - start + 1)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Send the resolved text to the REPL trigger via the clipboard, restoring
/// the original clipboard content afterwards.
pub fn checkpoint_paste(
    host: &mut Host,
    config: &Config,
    guard: &PasteGuard,
) -> Result<(), BridgeError> {
    let _slot = guard.try_acquire().ok_or(BridgeError::AlreadyRunning)?;

    let document = host
        .editor
        .active_document()
        .ok_or(BridgeError::NoActiveEditor)?;

    let text = resolve_paste_text(&document);
    if text.is_empty() {
        return Err(BridgeError::EmptySelection);
    }

    // An unreadable clipboard restores to empty rather than aborting the
    // handoff.
    let saved = host.clipboard.read_text().unwrap_or_else(|err| {
        tracing::debug!(error = %err, "clipboard read failed, restoring empty content");
        String::new()
    });

    host.clipboard.write_text(&text)?;

    let sent = host
        .terminal
        .send_text(&format!("{CLEAR_SEQUENCE}{}", config.checkpoint.trigger()));
    if sent.is_ok() {
        // The REPL reads the clipboard on its own schedule; restoring too
        // early would hand it the original content instead.
        thread::sleep(Duration::from_millis(config.checkpoint.restore_delay_ms()));
    }
    let restored = host.clipboard.write_text(&saved);

    sent?;
    restored?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Position, SelectionSpan};
    use crate::host::memory::{MemoryClipboard, MemoryHost, MemoryTerminal};

    const LINES: &str = "zero\none\ntwo\nthree\nfour\nfive";

    fn config() -> Config {
        let mut config = Config::default();
        config.checkpoint.restore_delay_ms = Some(0);
        config
    }

    fn document(selection: SelectionSpan) -> DocumentState {
        DocumentState {
            path: "/work/scenes.py".into(),
            text: LINES.to_owned(),
            cursor: selection.start,
            selection,
        }
    }

    fn host_with(selection: SelectionSpan, clipboard: &str) -> MemoryHost {
        let mut memory = MemoryHost::with_document(document(selection));
        memory.clipboard = MemoryClipboard::with_contents(clipboard);
        memory
    }

    #[test]
    fn bare_cursor_sends_the_whole_line() {
        let memory = host_with(SelectionSpan::caret(Position::new(2, 3)), "original");
        let guard = PasteGuard::new();

        checkpoint_paste(&mut memory.host(), &config(), &guard).expect("paste runs");

        assert_eq!(
            memory.clipboard.writes(),
            vec!["two".to_owned(), "original".to_owned()]
        );
        assert_eq!(
            memory.terminal.sent(),
            vec!["\u{c}checkpoint_paste()".to_owned()]
        );
    }

    #[test]
    fn partial_selection_snaps_to_whole_lines() {
        let selection = SelectionSpan {
            start: Position::new(2, 3),
            end: Position::new(4, 2),
        };
        let memory = host_with(selection, "original");
        let guard = PasteGuard::new();

        checkpoint_paste(&mut memory.host(), &config(), &guard).expect("paste runs");

        assert_eq!(memory.clipboard.writes()[0], "two\nthree\nfour");
    }

    #[test]
    fn clipboard_ends_where_it_started() {
        let memory = host_with(SelectionSpan::caret(Position::new(1, 0)), "keep me");
        let guard = PasteGuard::new();

        checkpoint_paste(&mut memory.host(), &config(), &guard).expect("paste runs");

        assert_eq!(memory.clipboard.contents(), "keep me");
    }

    #[test]
    fn contended_invocation_is_rejected_without_touching_clipboard() {
        let memory = host_with(SelectionSpan::caret(Position::new(1, 0)), "original");
        let guard = PasteGuard::new();
        let _held = guard.try_acquire().expect("slot free");

        let err = checkpoint_paste(&mut memory.host(), &config(), &guard).unwrap_err();

        assert!(matches!(err, BridgeError::AlreadyRunning));
        assert!(err.is_informational());
        assert!(memory.clipboard.writes().is_empty());
        assert_eq!(memory.clipboard.contents(), "original");
    }

    #[test]
    fn guard_is_released_after_each_invocation() {
        let memory = host_with(SelectionSpan::caret(Position::new(1, 0)), "original");
        let guard = PasteGuard::new();

        checkpoint_paste(&mut memory.host(), &config(), &guard).expect("first paste");
        checkpoint_paste(&mut memory.host(), &config(), &guard).expect("second paste");
    }

    #[test]
    fn missing_editor_is_rejected() {
        let memory = MemoryHost::unfocused();
        let guard = PasteGuard::new();

        let err = checkpoint_paste(&mut memory.host(), &config(), &guard).unwrap_err();
        assert!(matches!(err, BridgeError::NoActiveEditor));
    }

    #[test]
    fn empty_cursor_line_is_rejected() {
        let mut memory = MemoryHost::with_document(DocumentState {
            path: "/work/scenes.py".into(),
            text: "first\n\nthird".to_owned(),
            cursor: Position::new(1, 0),
            selection: SelectionSpan::caret(Position::new(1, 0)),
        });
        memory.clipboard = MemoryClipboard::with_contents("untouched");
        let guard = PasteGuard::new();

        let err = checkpoint_paste(&mut memory.host(), &config(), &guard).unwrap_err();

        assert!(matches!(err, BridgeError::EmptySelection));
        assert!(memory.clipboard.writes().is_empty());
    }

    #[test]
    fn clipboard_restores_even_when_the_terminal_send_fails() {
        let mut memory = host_with(SelectionSpan::caret(Position::new(1, 0)), "original");
        memory.terminal = MemoryTerminal::failing();
        let guard = PasteGuard::new();

        let err = checkpoint_paste(&mut memory.host(), &config(), &guard).unwrap_err();

        assert!(matches!(err, BridgeError::Host(_)));
        assert_eq!(memory.clipboard.contents(), "original");
        assert_eq!(
            memory.clipboard.writes(),
            vec!["one".to_owned(), "original".to_owned()]
        );

        // The failure must not leave the guard held.
        assert!(guard.try_acquire().is_some());
    }
}
