use crate::command::{ExitCode, SPAWN_FAILURE, report_exit, signal_exit_code};
use crate::env::Environment;
use crate::error::ShellError;
use nix::errno::Errno;
use std::ffi::OsString;
use std::io::{self, Write};
use std::process::{Child, Command, ExitStatus};
use tracing::{debug, warn};

/// Command that is not a builtin.
///
/// The program is resolved through `PATH` by the OS, the same way `execvp` does.
/// Standard streams are inherited from the shell.
pub struct ExternalCommand {
    argv: Vec<OsString>,
    background: bool,
    text: String,
}

impl ExternalCommand {
    /// `argv` must hold at least the program name.
    pub fn new(argv: Vec<OsString>, background: bool, text: String) -> Self {
        Self {
            argv,
            background,
            text,
        }
    }

    /// Spawn the command.
    ///
    /// A foreground command is waited for and its exit status reported on `diag`;
    /// the code is returned. A background command is registered in `env.jobs` and
    /// `None` is returned right away.
    ///
    /// A program that cannot be started is reported on `diag` and the shell goes
    /// on. Running out of processes is returned as [`ShellError::ProcessCreation`].
    pub fn execute(
        self,
        diag: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<Option<ExitCode>, ShellError> {
        let Some((program, args)) = self.argv.split_first() else {
            return Ok(None);
        };

        let spawned = Command::new(program)
            .args(args)
            .current_dir(&env.current_dir)
            .spawn();
        let child = match spawned {
            Ok(child) => child,
            Err(err) if is_process_creation_failure(&err) => {
                return Err(ShellError::ProcessCreation {
                    program: program.to_string_lossy().into_owned(),
                    source: err,
                });
            }
            Err(err) => {
                writeln!(diag, "ERROR: {}: {}", program.to_string_lossy(), err)?;
                if self.background {
                    return Ok(None);
                }
                report_exit(diag, &self.text, SPAWN_FAILURE)?;
                return Ok(Some(SPAWN_FAILURE));
            }
        };

        if self.background {
            return track(child, self.text, diag, env);
        }
        debug!(pid = child.id(), command = %self.text, "waiting for foreground command");
        finish(child, &self.text, diag).map(Some)
    }
}

/// Hand a background child to the job registry.
///
/// Dropping `Child` neither kills nor waits; the reaper collects it later. A
/// child the registry refuses is waited for here and reported like a
/// foreground command, so it never outlives its tracking.
fn track(
    child: Child,
    text: String,
    diag: &mut dyn Write,
    env: &mut Environment,
) -> Result<Option<ExitCode>, ShellError> {
    let pid = child.id();
    match env.jobs.insert(pid, text.as_str()) {
        Ok(()) => {
            debug!(pid, command = %text, "started background job");
            Ok(None)
        }
        Err(err) => {
            warn!(error = %err, "background job not tracked, waiting for it");
            finish(child, &text, diag).map(Some)
        }
    }
}

/// Block until `child` terminates and report its exit status.
fn finish(mut child: Child, text: &str, diag: &mut dyn Write) -> Result<ExitCode, ShellError> {
    let status = child.wait().map_err(|source| ShellError::Wait {
        command: text.to_string(),
        source,
    })?;
    let code = exit_code(status);
    report_exit(diag, text, code)?;
    Ok(code)
}

/// `fork` failed for lack of resources, as opposed to the program image failing to load.
fn is_process_creation_failure(err: &io::Error) -> bool {
    matches!(
        err.raw_os_error().map(Errno::from_raw),
        Some(Errno::EAGAIN | Errno::ENOMEM)
    ) || err.kind() == io::ErrorKind::OutOfMemory
}

fn exit_code(status: ExitStatus) -> ExitCode {
    match status.code() {
        Some(x) => x,
        None => terminated_by_signal(status),
    }
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> ExitCode {
    use std::os::unix::process::ExitStatusExt;
    match exit_status.signal() {
        Some(signal) => signal_exit_code(signal),
        None => -1,
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> ExitCode {
    -1
}
