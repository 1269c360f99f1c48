//! Poll-based reaping of background jobs.
//!
//! The shell never installs a `SIGCHLD` handler. Instead, [`Reaper::sweep`] runs
//! once per loop iteration and asks the OS, without blocking, whether each
//! tracked process has terminated.

use crate::command::{ExitCode, report_exit, signal_exit_code};
use crate::jobs::{Flow, Job, JobRegistry};
use nix::sys::wait::{WaitPidFlag, WaitStatus, waitpid};
use nix::unistd::Pid;
use std::io::{self, Write};
use tracing::{debug, warn};

/// Exit code reported for a job whose status can no longer be collected.
pub const UNKNOWN_EXIT: ExitCode = -1;

/// What a non-blocking status check found out about a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    Running,
    Exited(ExitCode),
}

/// Non-blocking liveness check for a child process.
pub trait ProcessProbe {
    /// Check `pid` without waiting. Collects the exit status if the process is done.
    fn probe(&mut self, pid: u32) -> io::Result<ProcessState>;
}

/// [`ProcessProbe`] backed by `waitpid(pid, WNOHANG)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct WaitPid;

impl ProcessProbe for WaitPid {
    fn probe(&mut self, pid: u32) -> io::Result<ProcessState> {
        let pid = Pid::from_raw(pid as i32);
        match waitpid(pid, Some(WaitPidFlag::WNOHANG))? {
            WaitStatus::Exited(_, code) => Ok(ProcessState::Exited(code)),
            WaitStatus::Signaled(_, signal, _) => {
                Ok(ProcessState::Exited(signal_exit_code(signal as i32)))
            }
            // StillAlive, or a stop/continue notification we did not ask for
            _ => Ok(ProcessState::Running),
        }
    }
}

/// Releases finished jobs from a [`JobRegistry`] and reports their exit status.
#[derive(Debug, Default)]
pub struct Reaper<P = WaitPid> {
    probe: P,
}

impl<P: ProcessProbe> Reaper<P> {
    pub fn new(probe: P) -> Self {
        Self { probe }
    }

    /// Probe every job once, report the finished ones on `diag` and remove them.
    ///
    /// Jobs are reported in registry order. Returns the reaped jobs with their
    /// exit codes.
    pub fn sweep(
        &mut self,
        jobs: &mut JobRegistry,
        diag: &mut dyn Write,
    ) -> io::Result<Vec<(Job, ExitCode)>> {
        let probe = &mut self.probe;
        let mut finished = Vec::new();
        jobs.traverse(|job| {
            match probe.probe(job.pid()) {
                Ok(ProcessState::Running) => {}
                Ok(ProcessState::Exited(code)) => finished.push((job.pid(), code)),
                Err(err) => {
                    // ECHILD and friends: the status is gone for good
                    warn!(pid = job.pid(), command = job.command(), error = %err, "lost track of background job");
                    finished.push((job.pid(), UNKNOWN_EXIT));
                }
            }
            Flow::Continue
        });

        let mut reaped = Vec::with_capacity(finished.len());
        for (pid, code) in finished {
            if let Some(job) = jobs.remove(pid) {
                debug!(pid, command = job.command(), code, "reaped background job");
                report_exit(diag, job.command(), code)?;
                reaped.push((job, code));
            }
        }
        Ok(reaped)
    }
}
