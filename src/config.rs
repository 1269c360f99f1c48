use crate::input::LineLimit;
use argh::FromArgs;
use nix::unistd::{SysconfVar, sysconf};
use tracing::debug;

/// `_POSIX2_LINE_MAX`, the smallest `LINE_MAX` a conforming host may report.
pub const DEFAULT_LINE_MAX: usize = 2048;

#[derive(FromArgs, Debug)]
/// A minimal interactive shell with background job tracking.
pub struct Args {
    #[argh(option)]
    /// longest accepted input line in bytes, counting the newline. Defaults to the host LINE_MAX.
    pub line_max: Option<usize>,

    #[argh(switch)]
    /// render the prompt without colors.
    pub no_color: bool,

    #[argh(switch)]
    /// do not keep an editing history of entered lines.
    pub no_history: bool,
}

/// Settings the interpreter runs with.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    /// Lines that do not fit are discarded unexecuted.
    pub line_limit: LineLimit,
    /// Color the prompt.
    pub color: bool,
    /// Record entered lines in the interactive editor history.
    pub history: bool,
}

impl ShellConfig {
    pub fn from_args(args: &Args) -> Self {
        let line_max = args.line_max.unwrap_or_else(host_line_max);
        Self {
            line_limit: LineLimit::new(line_max),
            color: !args.no_color,
            history: !args.no_history,
        }
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            line_limit: LineLimit::new(host_line_max()),
            color: true,
            history: true,
        }
    }
}

/// `sysconf(_SC_LINE_MAX)`, or [`DEFAULT_LINE_MAX`] when the host has no answer.
pub fn host_line_max() -> usize {
    match sysconf(SysconfVar::LINE_MAX) {
        Ok(Some(n)) => usize::try_from(n)
            .ok()
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_LINE_MAX),
        other => {
            debug!(?other, "LINE_MAX unavailable, using the POSIX minimum");
            DEFAULT_LINE_MAX
        }
    }
}
