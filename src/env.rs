use crate::jobs::JobRegistry;
use std::env as stdenv;
use std::io;
use std::path::{Path, PathBuf};

/// Shell state that lives as long as the interpreter.
///
/// The environment contains:
/// - `current_dir`: the working directory shown in the prompt and given to spawned commands.
/// - `jobs`: the background jobs that have not been reaped yet.
#[derive(Debug)]
pub struct Environment {
    /// Working directory after the last successful `cd`, or the startup directory.
    pub current_dir: PathBuf,
    /// Background jobs awaiting reaping.
    pub jobs: JobRegistry,
}

impl Environment {
    /// Capture the current process working directory with an empty job table.
    pub fn new() -> Self {
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            current_dir,
            jobs: JobRegistry::new(),
        }
    }

    /// Re-read the working directory from the OS.
    ///
    /// On error the previous value is kept.
    pub fn refresh_current_dir(&mut self) -> io::Result<&Path> {
        self.current_dir = stdenv::current_dir()?;
        Ok(&self.current_dir)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializes tests that read or change the process working directory.
#[cfg(test)]
pub(crate) fn lock_current_dir() -> std::sync::MutexGuard<'static, ()> {
    use std::sync::{Mutex, OnceLock};
    static MUTEX: OnceLock<Mutex<()>> = OnceLock::new();
    MUTEX
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
