//! A minimal interactive shell with background job tracking.
//!
//! Each input line is either a built-in (`cd`, `jobs`), a program run in the
//! foreground, or, when it ends with `&`, a program run in the background. Background
//! processes are kept in a [`jobs::JobRegistry`] and reaped by polling at the top
//! of every loop iteration, see [`reaper`].
//!
//! The main entry point is [`Interpreter`], which owns the shell state and runs the
//! read-eval loop over any [`input::LineSource`].

mod builtin;
pub mod command;
pub mod config;
pub mod env;
pub mod error;
mod external;
pub mod input;
mod interpreter;
pub mod io_adapters;
pub mod jobs;
pub mod logging;
mod parser;
mod prompt;
pub mod reaper;

/// Just a convenient re-export of the interactive command runner.
///
/// See [`Interpreter`] for the high-level API and examples.
pub use interpreter::Interpreter;

pub use config::{Args, ShellConfig};
pub use error::ShellError;
