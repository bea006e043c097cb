//! Scene location: class-header scanning and run-command derivation.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::model::{ClassLine, RunCommand, SceneTarget};

// Single-line headers only; decorators, multi-line signatures, and nested
// scopes are matched purely by line position.
static CLASS_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^class (.+?)\((.+?)\):").expect("class header pattern"));

/// Every line defining a class, with its zero-based index, in document
/// order.
pub fn class_lines(text: &str) -> Vec<ClassLine> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| CLASS_HEADER.is_match(line))
        .map(|(index, line)| ClassLine {
            text: line.to_owned(),
            index,
        })
        .collect()
}

/// The nearest header at or above `cursor_line`, scanning from the end.
pub fn enclosing_class(lines: &[ClassLine], cursor_line: usize) -> Option<&ClassLine> {
    lines.iter().rev().find(|class| class.index <= cursor_line)
}

/// Class name from a header line: everything between `class ` and the first
/// `(`.
pub fn class_name(header: &str) -> Option<&str> {
    CLASS_HEADER
        .captures(header)
        .and_then(|captures| captures.get(1))
        .map(|name| name.as_str())
}

/// Locate the scene enclosing the cursor, if any.
pub fn locate_scene(text: &str, cursor_line: usize) -> Option<SceneTarget> {
    let lines = class_lines(text);
    let class = enclosing_class(&lines, cursor_line)?;
    let name = class_name(&class.text)?;
    Some(SceneTarget {
        name: name.to_owned(),
        header_line: class.index,
    })
}

/// Derive the run command for a located scene. The selected-line flag is
/// only carried when the cursor sits below the header itself.
pub fn build_command(
    program: &str,
    file_path: &Path,
    target: &SceneTarget,
    cursor_line: usize,
) -> RunCommand {
    let selected_line = (cursor_line != target.header_line).then_some(cursor_line + 1);
    RunCommand {
        program: program.to_owned(),
        file_path: file_path.to_path_buf(),
        scene_name: target.name.clone(),
        selected_line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENES: &str = "class A(Scene):\n  x=1\nclass B(Scene):\n  y=2";

    #[test]
    fn collects_class_lines_in_document_order() {
        let lines = class_lines(SCENES);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].index, 0);
        assert_eq!(lines[1].index, 2);
        assert_eq!(lines[1].text, "class B(Scene):");
    }

    #[test]
    fn ignores_lines_that_are_not_single_line_headers() {
        let text = "  class Indented(Scene):\nclass NoParens:\nclass Open(Scene)\nclass C(Scene):";
        let lines = class_lines(text);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].index, 3);
    }

    #[test]
    fn selects_nearest_header_at_or_above_cursor() {
        let lines = class_lines(SCENES);
        assert_eq!(enclosing_class(&lines, 3).unwrap().index, 2);
        assert_eq!(enclosing_class(&lines, 2).unwrap().index, 2);
        assert_eq!(enclosing_class(&lines, 1).unwrap().index, 0);
    }

    #[test]
    fn cursor_before_all_headers_finds_nothing() {
        let text = "import manimlib\n\nclass A(Scene):\n  pass";
        let lines = class_lines(text);
        assert!(enclosing_class(&lines, 1).is_none());
    }

    #[test]
    fn extracts_name_independent_of_base() {
        assert_eq!(class_name("class Foo(Bar):"), Some("Foo"));
        assert_eq!(class_name("class Foo(Bar, Baz):"), Some("Foo"));
        assert_eq!(class_name("x = 1"), None);
    }

    #[test]
    fn builds_bare_command_on_header_line() {
        let target = locate_scene(SCENES, 2).expect("scene found");
        let command = build_command("manimgl", Path::new("/work/scenes.py"), &target, 2);
        assert_eq!(command.selected_line, None);
        assert_eq!(command.base_command(), "manimgl /work/scenes.py B");
    }

    #[test]
    fn carries_one_based_cursor_line_below_header() {
        let target = locate_scene(SCENES, 3).expect("scene found");
        let command = build_command("manimgl", Path::new("/work/scenes.py"), &target, 3);
        assert_eq!(command.selected_line, Some(4));
        assert_eq!(command.base_command(), "manimgl /work/scenes.py B -se 4");
    }
}
