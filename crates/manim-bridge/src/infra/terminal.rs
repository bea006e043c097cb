//! tmux-backed terminal bridge.
//!
//! The external tool runs inside a named tmux session. Text is delivered
//! with `send-keys`; the session is created on first use.

use std::process::{Command, Stdio};

use anyhow::{Context, Result, anyhow};

use crate::host::TerminalHost;

pub struct TmuxTerminal {
    session: String,
    ensured: bool,
}

impl TmuxTerminal {
    pub fn new(session: impl Into<String>) -> Self {
        Self {
            session: session.into(),
            ensured: false,
        }
    }

    fn ensure_session(&mut self) -> Result<()> {
        if self.ensured {
            return Ok(());
        }

        let exists = Command::new("tmux")
            .args(["has-session", "-t", &self.session])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .context("failed to spawn tmux")?
            .success();

        if !exists {
            let status = Command::new("tmux")
                .args(["new-session", "-d", "-s", &self.session])
                .status()
                .context("failed to spawn tmux")?;
            if !status.success() {
                return Err(anyhow!("tmux new-session exited with status {status}"));
            }
        }

        self.ensured = true;
        Ok(())
    }

    fn send_keys(&self, args: &[&str]) -> Result<()> {
        let status = Command::new("tmux")
            .arg("send-keys")
            .arg("-t")
            .arg(&self.session)
            .args(args)
            .status()
            .context("failed to spawn tmux")?;
        if status.success() {
            Ok(())
        } else {
            Err(anyhow!("tmux send-keys exited with status {status}"))
        }
    }
}

impl TerminalHost for TmuxTerminal {
    fn send_text(&mut self, text: &str) -> Result<()> {
        self.ensure_session()?;
        // Literal text first, then a carriage return to submit it.
        self.send_keys(&["-l", text])?;
        self.send_keys(&["Enter"])
    }

    fn show(&mut self) -> Result<()> {
        self.ensure_session()?;

        // Switching clients only works from inside a tmux client; anywhere
        // else the session just stays in the background.
        if std::env::var_os("TMUX").is_some() {
            let status = Command::new("tmux")
                .args(["switch-client", "-t", &self.session])
                .status()
                .context("failed to spawn tmux")?;
            if !status.success() {
                tracing::debug!(session = %self.session, "tmux switch-client failed");
            }
        }
        Ok(())
    }
}
