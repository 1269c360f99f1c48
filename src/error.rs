use rustyline::error::ReadlineError;
use std::io;
use thiserror::Error;

/// Errors that end the interactive loop.
///
/// Everything recoverable (unknown programs, bad `cd` targets, oversized lines)
/// is reported on the diagnostic stream where it happens and never becomes a
/// `ShellError`.
#[derive(Debug, Error)]
pub enum ShellError {
    /// The OS refused to create another process.
    #[error("cannot create a process for `{program}`: {source}")]
    ProcessCreation {
        program: String,
        #[source]
        source: io::Error,
    },

    /// Waiting for a foreground child failed.
    #[error("failed to wait for `{command}`: {source}")]
    Wait {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("line editor failed: {0}")]
    Editor(#[from] ReadlineError),

    #[error(transparent)]
    Io(#[from] io::Error),
}
