use std::ffi::OsString;
use std::io::{self, Write};

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
/// This mirrors the convention used by POSIX shells and many command-line tools.
pub type ExitCode = i32;

/// Exit code reported for a command whose program image could not be started.
pub const SPAWN_FAILURE: ExitCode = 127;

/// A single input line, classified by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// The `jobs` built-in: list tracked background jobs.
    Jobs,
    /// The `cd` built-in, with every token after `cd`.
    Cd(Vec<OsString>),
    /// Anything else is a program to spawn.
    External {
        /// Program followed by its arguments, bytes as typed. Never empty.
        argv: Vec<OsString>,
        /// Set when the line ended with the background marker.
        background: bool,
        /// The line as typed, marker stripped, decoded lossily. Used for job
        /// listing and exit reports.
        text: String,
    },
}

/// Exit code for a child killed by `signal`, following the shell `128 + n` convention.
pub fn signal_exit_code(signal: i32) -> ExitCode {
    128 + signal
}

/// Writes the exit status line shared by foreground commands and reaped jobs.
pub fn report_exit(diag: &mut dyn Write, command: &str, code: ExitCode) -> io::Result<()> {
    writeln!(diag, "Exitstatus [{}] = {}", command, code)
}
