//! Scene Runner: derive a `manimgl` invocation from the cursor and dispatch
//! it through the clipboard and the terminal.

use std::thread;
use std::time::Duration;

use crate::app::scene;
use crate::domain::errors::BridgeError;
use crate::domain::model::{DocumentState, RunCommand};
use crate::host::Host;
use crate::infra::config::Config;

/// Outcome of a successful run, for front ends and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneRun {
    pub command: RunCommand,
    pub clipboard_command: String,
}

/// Derive the invocation for the document without touching any host
/// service. Shared by the handler and the dry-run front end.
pub fn derive_command(document: &DocumentState, config: &Config) -> Result<RunCommand, BridgeError> {
    let expected = config.runner.file_extension();
    if document.path.extension().and_then(|ext| ext.to_str()) != Some(expected.as_str()) {
        return Err(BridgeError::InvalidFileType { expected });
    }

    let target = scene::locate_scene(&document.text, document.cursor.line)
        .ok_or(BridgeError::NoEnclosingClass)?;

    Ok(scene::build_command(
        &config.runner.program(),
        &document.path,
        &target,
        document.cursor.line,
    ))
}

/// Run the scene class enclosing the cursor in the active document.
///
/// The terminal receives the base command; the clipboard receives the
/// extended form with the configured extra args appended, so the user can
/// paste it elsewhere while the terminal runs.
pub fn run_scene(host: &mut Host, config: &Config) -> Result<SceneRun, BridgeError> {
    let document = host
        .editor
        .active_document()
        .ok_or(BridgeError::NoActiveEditor)?;

    // The external tool reads the file from disk; persist first.
    host.editor.save_active()?;

    let command = derive_command(&document, config)?;

    let clipboard_command = command.clipboard_command(&config.runner.clipboard_args());
    host.clipboard.write_text(&clipboard_command)?;
    host.terminal.send_text(&command.base_command())?;

    if command.selected_line.is_some() {
        // Give the externally spawned animation window time to open before
        // pulling focus back to the editor.
        thread::sleep(Duration::from_millis(config.runner.focus_delay_ms()));
        if let Err(err) = host.focus.focus_editor() {
            tracing::warn!(error = %err, "editor refocus failed");
        }
    } else {
        host.terminal.show()?;
    }

    Ok(SceneRun {
        command,
        clipboard_command,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Position, SelectionSpan};
    use crate::host::memory::{MemoryFocuser, MemoryHost};

    const SCENES: &str = "class A(Scene):\n  x=1\nclass B(Scene):\n  y=2";

    fn config() -> Config {
        let mut config = Config::default();
        config.runner.focus_delay_ms = Some(0);
        config
    }

    fn document(path: &str, line: usize) -> DocumentState {
        let cursor = Position::new(line, 0);
        DocumentState {
            path: path.into(),
            text: SCENES.to_owned(),
            cursor,
            selection: SelectionSpan::caret(cursor),
        }
    }

    #[test]
    fn sends_base_command_and_copies_extended_form() {
        let memory = MemoryHost::with_document(document("/work/scenes.py", 2));
        let run = run_scene(&mut memory.host(), &config()).expect("scene runs");

        assert_eq!(run.command.base_command(), "manimgl /work/scenes.py B");
        assert_eq!(
            memory.terminal.sent(),
            vec!["manimgl /work/scenes.py B".to_owned()]
        );
        assert_eq!(
            memory.clipboard.contents(),
            "manimgl /work/scenes.py B --prerun --finder -w"
        );
        assert_eq!(memory.editor.save_count(), 1);
    }

    #[test]
    fn shows_terminal_when_cursor_is_on_header_line() {
        let memory = MemoryHost::with_document(document("/work/scenes.py", 2));
        run_scene(&mut memory.host(), &config()).expect("scene runs");

        assert!(memory.terminal.was_shown());
        assert_eq!(memory.focuser.calls(), 0);
    }

    #[test]
    fn appends_selected_line_and_refocuses_editor() {
        let memory = MemoryHost::with_document(document("/work/scenes.py", 3));
        let run = run_scene(&mut memory.host(), &config()).expect("scene runs");

        assert_eq!(run.command.selected_line, Some(4));
        assert_eq!(
            memory.terminal.sent(),
            vec!["manimgl /work/scenes.py B -se 4".to_owned()]
        );
        assert!(!memory.terminal.was_shown());
        assert_eq!(memory.focuser.calls(), 1);
    }

    #[test]
    fn focuser_failure_is_not_surfaced() {
        let mut memory = MemoryHost::with_document(document("/work/scenes.py", 3));
        memory.focuser = MemoryFocuser::failing();

        run_scene(&mut memory.host(), &config()).expect("scene still runs");
        assert_eq!(memory.focuser.calls(), 1);
    }

    #[test]
    fn rejects_missing_editor() {
        let memory = MemoryHost::unfocused();
        let err = run_scene(&mut memory.host(), &config()).unwrap_err();
        assert!(matches!(err, BridgeError::NoActiveEditor));
    }

    #[test]
    fn rejects_wrong_file_extension() {
        let memory = MemoryHost::with_document(document("/work/notes.txt", 2));
        let err = run_scene(&mut memory.host(), &config()).unwrap_err();
        assert!(matches!(err, BridgeError::InvalidFileType { .. }));
        assert!(memory.terminal.sent().is_empty());
    }

    #[test]
    fn rejects_cursor_before_first_class() {
        let cursor = Position::new(0, 0);
        let memory = MemoryHost::with_document(DocumentState {
            path: "/work/scenes.py".into(),
            text: "import manimlib\nclass A(Scene):\n  pass".into(),
            cursor,
            selection: SelectionSpan::caret(cursor),
        });
        let err = run_scene(&mut memory.host(), &config()).unwrap_err();
        assert!(matches!(err, BridgeError::NoEnclosingClass));
        assert!(memory.clipboard.writes().is_empty());
    }
}
