//! Window focus capability.
//!
//! Refocusing the editor window is inherently platform specific, so it runs
//! behind a user-configured shell command (e.g. osascript on macOS, xdotool
//! under X11). No configured command means a silent no-op.

use std::process::Command;

use anyhow::{Context, Result, anyhow};

use crate::host::WindowFocuser;

/// Focuser driving a configured argv.
pub struct ShellFocuser {
    command: Vec<String>,
}

impl ShellFocuser {
    /// Build a focuser from the configured argv; empty argv yields the
    /// no-op focuser.
    pub fn from_command(command: Vec<String>) -> Box<dyn WindowFocuser> {
        if command.is_empty() {
            Box::new(NoopFocuser)
        } else {
            Box::new(ShellFocuser { command })
        }
    }
}

impl WindowFocuser for ShellFocuser {
    fn focus_editor(&mut self) -> Result<()> {
        let (program, args) = self
            .command
            .split_first()
            .context("focus command missing program")?;

        let status = Command::new(program)
            .args(args)
            .status()
            .with_context(|| format!("failed to spawn focus command: {program}"))?;
        if status.success() {
            Ok(())
        } else {
            Err(anyhow!("focus command exited with status {status}"))
        }
    }
}

/// Focuser for platforms without a configured focus command.
pub struct NoopFocuser;

impl WindowFocuser for NoopFocuser {
    fn focus_editor(&mut self) -> Result<()> {
        Ok(())
    }
}
