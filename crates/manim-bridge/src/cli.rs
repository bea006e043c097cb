//! Command-line front end.
//!
//! The invoking editor passes its active-editor state (file, cursor,
//! selection, optionally the unsaved buffer on stdin); this layer builds the
//! host services, dispatches the bridge commands, and renders handler errors
//! as user-facing messages on stderr.

use std::io::Read;
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use crate::app::checkpoint::{self, PasteGuard};
use crate::app::greet;
use crate::app::run_scene;
use crate::domain::errors::BridgeError;
use crate::domain::model::{Position, SelectionSpan};
use crate::host::{EditorHost, Host, Notifier};
use crate::infra::clipboard::SystemClipboard;
use crate::infra::config::Config;
use crate::infra::editor::CliEditor;
use crate::infra::focus::ShellFocuser;
use crate::infra::lock::InvocationLock;
use crate::infra::terminal::TmuxTerminal;

#[derive(Parser)]
#[command(
    name = "manim-bridge",
    version,
    about = "Bridge an editor to the manimgl REPL workflow",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the bridge greeting
    HelloData,
    /// Run the scene class enclosing the cursor
    RunScene {
        #[command(flatten)]
        state: EditorStateArgs,
        /// Print the derived commands instead of executing them
        #[arg(long)]
        dry_run: bool,
    },
    /// Send the selection to the REPL's checkpoint_paste() via the clipboard
    CheckpointPaste {
        #[command(flatten)]
        state: EditorStateArgs,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Active-editor state passed along by the invoking editor.
#[derive(Debug, clap::Args)]
struct EditorStateArgs {
    /// Path of the active file
    #[arg(long)]
    file: std::path::PathBuf,
    /// 1-based cursor line as reported by the editor
    #[arg(long, default_value_t = 1)]
    line: usize,
    /// 1-based cursor column
    #[arg(long, default_value_t = 1)]
    column: usize,
    /// Selection as `START[:COL]-END[:COL]`, 1-based lines and columns
    #[arg(long)]
    selection: Option<SelectionArg>,
    /// Read the unsaved buffer from stdin; saving writes it to --file
    #[arg(long)]
    stdin: bool,
}

/// Parsed `--selection` value, already zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SelectionArg {
    start: Position,
    end: Position,
}

impl FromStr for SelectionArg {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (start, end) = raw
            .split_once('-')
            .ok_or_else(|| format!("expected START-END, got '{raw}'"))?;
        Ok(Self {
            start: parse_point(start)?,
            end: parse_point(end)?,
        })
    }
}

fn parse_point(raw: &str) -> Result<Position, String> {
    let (line, column) = match raw.split_once(':') {
        Some((line, column)) => (line, Some(column)),
        None => (raw, None),
    };

    let line: usize = line
        .trim()
        .parse()
        .map_err(|_| format!("invalid line number '{line}'"))?;
    if line == 0 {
        return Err("line numbers are 1-based".to_owned());
    }

    let column = match column {
        Some(raw_column) => {
            let column: usize = raw_column
                .trim()
                .parse()
                .map_err(|_| format!("invalid column number '{raw_column}'"))?;
            if column == 0 {
                return Err("column numbers are 1-based".to_owned());
            }
            column
        }
        None => 1,
    };

    Ok(Position::new(line - 1, column - 1))
}

/// Notifier writing user-facing messages to stderr, where invoking editors
/// pick them up.
struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn info(&mut self, message: &str) {
        eprintln!("{message}");
    }

    fn error(&mut self, message: &str) {
        eprintln!("error: {message}");
    }
}

/// Parse the invocation and dispatch the selected command.
pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let mut notifier = StderrNotifier;

    match cli.command {
        Commands::HelloData => {
            greet::hello_data(&mut notifier);
            Ok(ExitCode::SUCCESS)
        }
        Commands::RunScene { state, dry_run } => {
            let config = Config::load()?;
            if dry_run {
                return dry_run_scene(state, &config, &mut notifier);
            }

            let mut host = build_host(state, &config)?;
            let outcome = run_scene::run_scene(&mut host, &config).map(|run| {
                tracing::debug!(command = %run.command.base_command(), "scene dispatched");
            });
            report(outcome, &mut notifier)
        }
        Commands::CheckpointPaste { state } => {
            let config = Config::load()?;

            // Cross-process stand-in for the in-process guard.
            let Some(_lock) = InvocationLock::try_acquire("checkpoint-paste")? else {
                notifier.info(&BridgeError::AlreadyRunning.to_string());
                return Ok(ExitCode::SUCCESS);
            };

            let guard = PasteGuard::new();
            let mut host = build_host(state, &config)?;
            report(
                checkpoint::checkpoint_paste(&mut host, &config, &guard),
                &mut notifier,
            )
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            let name = command.get_name().to_owned();
            clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn report(result: Result<(), BridgeError>, notifier: &mut dyn Notifier) -> Result<ExitCode> {
    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) if err.is_informational() => {
            notifier.info(&err.to_string());
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            notifier.error(&err.to_string());
            Ok(ExitCode::FAILURE)
        }
    }
}

fn dry_run_scene(
    state: EditorStateArgs,
    config: &Config,
    notifier: &mut dyn Notifier,
) -> Result<ExitCode> {
    let editor = build_editor(state)?;
    let document = editor.active_document().expect("editor opened a document");

    match run_scene::derive_command(&document, config) {
        Ok(command) => {
            println!("{}", command.base_command());
            println!("{}", command.clipboard_command(&config.runner.clipboard_args()));
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => report(Err(err), notifier),
    }
}

fn build_host(state: EditorStateArgs, config: &Config) -> Result<Host> {
    let editor = build_editor(state)?;
    Ok(Host {
        editor: Box::new(editor),
        clipboard: Box::new(SystemClipboard::new()),
        terminal: Box::new(TmuxTerminal::new(config.terminal.session())),
        focus: ShellFocuser::from_command(config.focus.command()),
    })
}

fn build_editor(state: EditorStateArgs) -> Result<CliEditor> {
    // The external tool needs an absolute path to the file.
    let path = std::path::absolute(&state.file)
        .with_context(|| format!("failed to resolve {}", state.file.display()))?;
    let cursor = Position::new(state.line.saturating_sub(1), state.column.saturating_sub(1));
    let selection = state.selection.map(|selection| SelectionSpan {
        start: selection.start,
        end: selection.end,
    });

    if state.stdin {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read buffer from stdin")?;
        Ok(CliEditor::with_buffer(path, text, cursor, selection))
    } else {
        CliEditor::open(path, cursor, selection)
    }
}
