use crate::builtin::{self, Cd, Jobs};
use crate::command::{ExitCode, Invocation};
use crate::config::ShellConfig;
use crate::env::Environment;
use crate::error::ShellError;
use crate::external::ExternalCommand;
use crate::input::LineSource;
use crate::jobs::{Job, JobRegistry};
use crate::parser;
use crate::prompt::Prompt;
use crate::reaper::{Reaper, WaitPid};
use std::io::{self, Write};
use tracing::debug;

/// A minimal interactive shell that runs programs in the foreground or background.
///
/// The interpreter owns the [`Environment`] (working directory and job table)
/// for its whole lifetime. Each loop iteration first reaps finished background
/// jobs, then prompts, reads one line and runs it.
///
/// Example
/// ```no_run
/// use jobsh::{Interpreter, ShellConfig};
/// use jobsh::input::PlainReader;
///
/// let mut sh = Interpreter::new(ShellConfig::default());
/// let mut lines = PlainReader::new(std::io::stdin().lock(), std::io::stderr());
/// sh.repl(&mut lines).unwrap();
/// ```
pub struct Interpreter {
    env: Environment,
    reaper: Reaper<WaitPid>,
    prompt: Prompt,
    config: ShellConfig,
    stdout: Box<dyn Write>,
    diag: Box<dyn Write>,
}

impl Interpreter {
    /// Create an interpreter printing to the process stdout and stderr.
    pub fn new(config: ShellConfig) -> Self {
        Self::with_streams(config, Box::new(io::stdout()), Box::new(io::stderr()))
    }

    /// Create an interpreter with custom output streams.
    ///
    /// `stdout` receives built-in output (`jobs`); `diag` receives exit status
    /// lines and error reports. Spawned programs always inherit the process streams.
    pub fn with_streams(config: ShellConfig, stdout: Box<dyn Write>, diag: Box<dyn Write>) -> Self {
        Self {
            env: Environment::new(),
            reaper: Reaper::new(WaitPid),
            prompt: Prompt::new(config.color),
            config,
            stdout,
            diag,
        }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn jobs(&self) -> &JobRegistry {
        &self.env.jobs
    }

    /// Read-eval loop. Returns when `source` runs dry.
    pub fn repl(&mut self, source: &mut dyn LineSource) -> Result<(), ShellError> {
        loop {
            self.reap()?;
            let prompt = self.prompt.render(&self.env.current_dir);
            match source.read_line(&prompt)? {
                Some(line) => {
                    self.execute_line(&line)?;
                }
                None => {
                    writeln!(self.diag)?;
                    self.diag.flush()?;
                    return Ok(());
                }
            }
        }
    }

    /// Reap finished background jobs, reporting each on the diagnostic stream.
    pub fn reap(&mut self) -> Result<Vec<(Job, ExitCode)>, ShellError> {
        let reaped = self.reaper.sweep(&mut self.env.jobs, &mut *self.diag)?;
        self.diag.flush()?;
        Ok(reaped)
    }

    /// Run one input line.
    ///
    /// Returns the exit code of whatever ran in the foreground, or `None` when
    /// nothing did: blank and oversized lines, and background launches. The
    /// line is taken as raw bytes and need not be valid UTF-8.
    pub fn execute_line(&mut self, line: impl AsRef<[u8]>) -> Result<Option<ExitCode>, ShellError> {
        let line = line.as_ref();
        if !self.config.line_limit.accepts(line) {
            debug!(
                len = line.len(),
                max = self.config.line_limit.max(),
                "discarding oversized line"
            );
            return Ok(None);
        }
        let Some(invocation) = parser::parse_line(line) else {
            return Ok(None);
        };

        let code = self.dispatch(invocation)?;
        self.stdout.flush()?;
        self.diag.flush()?;
        Ok(code)
    }

    fn dispatch(&mut self, invocation: Invocation) -> Result<Option<ExitCode>, ShellError> {
        match invocation {
            Invocation::Jobs => {
                let code = builtin::run(Jobs, &mut *self.stdout, &mut *self.diag, &mut self.env)?;
                Ok(Some(code))
            }
            Invocation::Cd(operands) => {
                let code = builtin::run(Cd::new(operands), &mut *self.stdout, &mut *self.diag, &mut self.env)?;
                Ok(Some(code))
            }
            Invocation::External {
                argv,
                background,
                text,
            } => ExternalCommand::new(argv, background, text).execute(&mut *self.diag, &mut self.env),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(ShellConfig::default())
    }
}
