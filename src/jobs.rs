//! Registry of background jobs.
//!
//! Jobs are kept in launch order. A job enters the registry right after its
//! process is spawned and leaves it exactly once, when the reaper observes that
//! the process has terminated.

use thiserror::Error;

/// A background process tracked until it is reaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pid: u32,
    command: String,
}

impl Job {
    /// OS process id of the job.
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// The command line the job was started from.
    pub fn command(&self) -> &str {
        &self.command
    }
}

/// Returned by a traversal visitor to continue or abandon the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Errors reported by [`JobRegistry`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum JobError {
    /// A live job with this pid is already registered.
    #[error("a job with pid {0} is already tracked")]
    DuplicatePid(u32),
}

/// Ordered collection of live background jobs, keyed by pid.
#[derive(Debug, Default)]
pub struct JobRegistry {
    jobs: Vec<Job>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a job at the tail.
    ///
    /// A pid can be registered only once while it is live; a second insert is
    /// rejected and leaves the registry untouched.
    pub fn insert(&mut self, pid: u32, command: impl Into<String>) -> Result<(), JobError> {
        if self.contains(pid) {
            return Err(JobError::DuplicatePid(pid));
        }
        self.jobs.push(Job {
            pid,
            command: command.into(),
        });
        Ok(())
    }

    /// Visit jobs head to tail until `visit` returns [`Flow::Stop`].
    ///
    /// The registry is borrowed immutably for the whole walk. Callers that need
    /// to drop entries collect their pids and call [`JobRegistry::remove`] after
    /// the traversal.
    pub fn traverse<F>(&self, mut visit: F)
    where
        F: FnMut(&Job) -> Flow,
    {
        for job in &self.jobs {
            if visit(job) == Flow::Stop {
                break;
            }
        }
    }

    /// Remove the job with `pid`, returning it. Absent pids are a no-op.
    pub fn remove(&mut self, pid: u32) -> Option<Job> {
        let index = self.jobs.iter().position(|job| job.pid == pid)?;
        Some(self.jobs.remove(index))
    }

    pub fn contains(&self, pid: u32) -> bool {
        self.jobs.iter().any(|job| job.pid == pid)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Iterate jobs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter()
    }
}
