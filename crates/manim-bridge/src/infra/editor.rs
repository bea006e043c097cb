//! Editor host fed from CLI invocation state.
//!
//! Editors integrate by invoking the bridge with the active file, cursor,
//! and selection. An unsaved buffer can be piped on stdin, in which case
//! `save_active` persists it before the external tool reads the file.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::domain::model::{DocumentState, Position, SelectionSpan};
use crate::host::EditorHost;

pub struct CliEditor {
    document: Option<DocumentState>,
    unsaved: bool,
}

impl CliEditor {
    /// Editor view over a file already on disk.
    pub fn open(
        path: PathBuf,
        cursor: Position,
        selection: Option<SelectionSpan>,
    ) -> Result<Self> {
        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(Self::from_parts(path, text, cursor, selection, false))
    }

    /// Editor view over an unsaved buffer provided by the invoking editor.
    pub fn with_buffer(
        path: PathBuf,
        text: String,
        cursor: Position,
        selection: Option<SelectionSpan>,
    ) -> Self {
        Self::from_parts(path, text, cursor, selection, true)
    }

    fn from_parts(
        path: PathBuf,
        text: String,
        cursor: Position,
        selection: Option<SelectionSpan>,
        unsaved: bool,
    ) -> Self {
        let selection = selection.unwrap_or_else(|| SelectionSpan::caret(cursor));
        Self {
            document: Some(DocumentState {
                path,
                text,
                cursor,
                selection,
            }),
            unsaved,
        }
    }
}

impl EditorHost for CliEditor {
    fn active_document(&self) -> Option<DocumentState> {
        self.document.clone()
    }

    fn save_active(&mut self) -> Result<()> {
        let Some(document) = self.document.as_ref() else {
            return Ok(());
        };

        if self.unsaved {
            fs::write(&document.path, &document.text)
                .with_context(|| format!("failed to write {}", document.path.display()))?;
            self.unsaved = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_reads_document_from_disk() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("scene.py");
        fs::write(&path, "class A(Scene):\n  pass\n")?;

        let editor = CliEditor::open(path.clone(), Position::new(1, 0), None)?;
        let document = editor.active_document().expect("document present");

        assert_eq!(document.path, path);
        assert_eq!(document.line(0), Some("class A(Scene):"));
        // A bare cursor becomes a caret selection.
        assert!(document.selection.is_empty());
        assert_eq!(document.selection.start, Position::new(1, 0));
        Ok(())
    }

    #[test]
    fn open_fails_on_missing_file() {
        let result = CliEditor::open("/nonexistent/scene.py".into(), Position::default(), None);
        assert!(result.is_err());
    }

    #[test]
    fn save_persists_a_piped_buffer() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("scene.py");
        fs::write(&path, "stale contents")?;

        let mut editor = CliEditor::with_buffer(
            path.clone(),
            "class A(Scene):\n  pass\n".to_owned(),
            Position::default(),
            None,
        );
        editor.save_active()?;

        assert_eq!(fs::read_to_string(&path)?, "class A(Scene):\n  pass\n");
        Ok(())
    }

    #[test]
    fn save_without_buffer_leaves_the_file_alone() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("scene.py");
        fs::write(&path, "on disk")?;

        let mut editor = CliEditor::open(path.clone(), Position::default(), None)?;
        editor.save_active()?;

        assert_eq!(fs::read_to_string(&path)?, "on disk");
        Ok(())
    }
}
