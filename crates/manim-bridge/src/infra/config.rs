//! Configuration management utilities.
//!
//! Layers merge field by field: embedded defaults, then the global config
//! file, then the workspace file, then environment overrides.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));
static DEFAULT_WORKSPACE_CONFIG_PATH: &str = ".manim-bridge/config.toml";

/// Layered configuration loaded from defaults, user, workspace, and env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub runner: Runner,
    #[serde(default)]
    pub checkpoint: Checkpoint,
    #[serde(default)]
    pub terminal: Terminal,
    #[serde(default)]
    pub focus: Focus,
}

/// Scene Runner settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Runner {
    #[serde(default)]
    pub program: Option<String>,
    #[serde(default)]
    pub file_extension: Option<String>,
    #[serde(default)]
    pub clipboard_args: Option<Vec<String>>,
    #[serde(default)]
    pub focus_delay_ms: Option<u64>,
}

impl Runner {
    pub fn program(&self) -> String {
        self.program.clone().unwrap_or_else(|| "manimgl".to_owned())
    }

    pub fn file_extension(&self) -> String {
        self.file_extension.clone().unwrap_or_else(|| "py".to_owned())
    }

    pub fn clipboard_args(&self) -> Vec<String> {
        self.clipboard_args
            .clone()
            .unwrap_or_else(|| vec!["--prerun".into(), "--finder".into(), "-w".into()])
    }

    /// Delay before refocusing the editor, letting the animation window
    /// finish opening first.
    pub fn focus_delay_ms(&self) -> u64 {
        self.focus_delay_ms.unwrap_or(2500)
    }
}

/// Checkpoint Paste settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Checkpoint {
    #[serde(default)]
    pub trigger: Option<String>,
    #[serde(default)]
    pub restore_delay_ms: Option<u64>,
}

impl Checkpoint {
    /// Literal text the REPL exposes as its clipboard checkpoint.
    pub fn trigger(&self) -> String {
        self.trigger
            .clone()
            .unwrap_or_else(|| "checkpoint_paste()".to_owned())
    }

    /// Delay before restoring the clipboard, so the REPL reads the
    /// temporary content first.
    pub fn restore_delay_ms(&self) -> u64 {
        self.restore_delay_ms.unwrap_or(500)
    }
}

/// Terminal session settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Terminal {
    #[serde(default)]
    pub session: Option<String>,
}

impl Terminal {
    pub fn session(&self) -> String {
        self.session.clone().unwrap_or_else(|| "manim".to_owned())
    }
}

/// Window focuser settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Focus {
    #[serde(default)]
    pub command: Option<Vec<String>>,
}

impl Focus {
    /// Argv refocusing the editor window; empty means no-op.
    pub fn command(&self) -> Vec<String> {
        self.command.clone().unwrap_or_default()
    }
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    program: Option<String>,
    session: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            program: env::var("MANIM_BRIDGE_PROGRAM").ok(),
            session: env::var("MANIM_BRIDGE_SESSION").ok(),
        }
    }

    #[cfg(test)]
    fn for_tests(program: &str, session: &str) -> Self {
        Self {
            program: Some(program.to_owned()),
            session: Some(session.to_owned()),
        }
    }
}

impl Config {
    /// Load configuration from defaults, user/global config, workspace
    /// config, and env overrides.
    pub fn load() -> Result<Self> {
        let env = EnvOverrides::from_env();
        let global = global_config_path();
        let workspace = workspace_config_path()?;
        Self::load_with_layers(global, workspace, env)
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        workspace: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut layers: Vec<Config> = Vec::new();

        layers.push(Self::from_str(&DEFAULT_CONFIG)?);

        if let Some(global_path) = global.filter(|path| path.exists()) {
            layers.push(Self::from_file(&global_path)?);
        }

        if let Some(workspace_path) = workspace.filter(|path| path.exists()) {
            layers.push(Self::from_file(&workspace_path)?);
        }

        let merged = layers.into_iter().reduce(Config::merge).unwrap_or_default();
        Ok(apply_env_overrides(merged, env_overrides))
    }

    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&data)
    }

    fn from_str(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    fn merge(self, other: Self) -> Self {
        Self {
            runner: Runner {
                program: other.runner.program.or(self.runner.program),
                file_extension: other.runner.file_extension.or(self.runner.file_extension),
                clipboard_args: other.runner.clipboard_args.or(self.runner.clipboard_args),
                focus_delay_ms: other.runner.focus_delay_ms.or(self.runner.focus_delay_ms),
            },
            checkpoint: Checkpoint {
                trigger: other.checkpoint.trigger.or(self.checkpoint.trigger),
                restore_delay_ms: other
                    .checkpoint
                    .restore_delay_ms
                    .or(self.checkpoint.restore_delay_ms),
            },
            terminal: Terminal {
                session: other.terminal.session.or(self.terminal.session),
            },
            focus: Focus {
                command: other.focus.command.or(self.focus.command),
            },
        }
    }
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("manim-bridge/config.toml"))
}

fn workspace_config_path() -> Result<Option<PathBuf>> {
    let cwd = env::current_dir()?;
    let root = find_repo_root(&cwd).unwrap_or(cwd);
    Ok(Some(root.join(DEFAULT_WORKSPACE_CONFIG_PATH)))
}

fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let mut current = start;
    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Config {
    if let Some(program) = env.program {
        config.runner.program = Some(program);
    }
    if let Some(session) = env.session {
        config.terminal.session = Some(session);
    }
    config
}
