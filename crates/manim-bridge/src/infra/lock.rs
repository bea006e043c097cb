//! Cross-process invocation lock.
//!
//! Each CLI invocation is its own process, so the in-process paste guard
//! cannot see a concurrent one. A create-new lock file provides the same
//! single-slot contract across processes; it is removed when the lock
//! drops.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};

pub struct InvocationLock {
    path: PathBuf,
}

impl InvocationLock {
    /// Try to take the named lock. `Ok(None)` means another invocation
    /// holds it.
    pub fn try_acquire(name: &str) -> Result<Option<Self>> {
        let path = std::env::temp_dir().join(format!("manim-bridge-{name}.lock"));
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                let _ = write!(file, "{}", std::process::id());
                Ok(Some(Self { path }))
            }
            Err(err) if err.kind() == ErrorKind::AlreadyExists => Ok(None),
            Err(err) => Err(err)
                .with_context(|| format!("failed to create lock file {}", path.display())),
        }
    }
}

impl Drop for InvocationLock {
    fn drop(&mut self) {
        if let Err(err) = std::fs::remove_file(&self.path) {
            tracing::debug!(error = %err, path = %self.path.display(), "failed to remove lock file");
        }
    }
}
