use crate::command::ExitCode;
use crate::env::Environment;
use crate::jobs::Flow;
use crate::parser;
use anyhow::{Context, Result, anyhow};
use std::env;
use std::ffi::OsString;
use std::io::{self, Write};
use tracing::debug;

/// Built-in commands known to the shell at compile time.
///
/// Builtins are executed directly in-process without spawning a child process.
/// Their operands are taken as the dispatcher split them, with no option parsing.
pub(crate) trait BuiltinCommand {
    /// Canonical name of the command, e.g. "cd" or "jobs".
    fn name() -> &'static str;

    /// Executes the command against the shell state.
    ///
    /// Return value should follow shell conventions: 0 for success, non-zero for error.
    fn execute(
        self,
        stdout: &mut dyn Write,
        diag: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<ExitCode>;
}

/// Run the built-in `cmd`.
///
/// Execution errors are written to `diag` and turn into exit code 1; only a
/// failing `diag` itself is returned as an error.
pub(crate) fn run<T: BuiltinCommand>(
    cmd: T,
    stdout: &mut dyn Write,
    diag: &mut dyn Write,
    env: &mut Environment,
) -> io::Result<ExitCode> {
    debug!(builtin = T::name(), "running builtin");
    match cmd.execute(stdout, diag, env) {
        Ok(code) => Ok(code),
        Err(e) => {
            writeln!(diag, "{:#}", e)?;
            Ok(1)
        }
    }
}

/// Change the current working directory and echo the target.
#[derive(Debug)]
pub struct Cd {
    /// directory to switch to; absolute or relative to the current directory.
    pub target: Option<OsString>,
}

impl Cd {
    /// Only the first operand is used. It goes to the OS as typed, so names
    /// starting with `-` are directories like any other.
    pub fn new(operands: Vec<OsString>) -> Self {
        Self {
            target: operands.into_iter().next(),
        }
    }
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        parser::CD
    }

    fn execute(
        self,
        _stdout: &mut dyn Write,
        diag: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<ExitCode> {
        // a missing operand goes to the OS as an empty path and fails there
        let target = self.target.unwrap_or_default();

        env::set_current_dir(&target)
            .map_err(|err| anyhow!("cd: {}: {}", target.to_string_lossy(), err))?;
        env.refresh_current_dir()
            .context("cd: can't read the new working directory")?;
        writeln!(diag, "{}", target.to_string_lossy())?;
        Ok(0)
    }
}

/// List background jobs that have not been reaped yet.
pub struct Jobs;

impl BuiltinCommand for Jobs {
    fn name() -> &'static str {
        parser::JOBS
    }

    fn execute(
        self,
        stdout: &mut dyn Write,
        _diag: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<ExitCode> {
        let mut written = Ok(());
        env.jobs.traverse(|job| match writeln!(stdout, "[{}] {}", job.pid(), job.command()) {
            Ok(()) => Flow::Continue,
            Err(e) => {
                written = Err(e);
                Flow::Stop
            }
        });
        written?;
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::lock_current_dir;
    use std::env as stdenv;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn make_unique_temp_dir() -> io::Result<PathBuf> {
        let mut p = stdenv::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        p.push(format!("jobsh_test_cd_{}_{}", std::process::id(), nanos));
        fs::create_dir_all(&p)?;
        Ok(p)
    }

    fn cd(operands: &[&str]) -> Cd {
        Cd::new(operands.iter().map(OsString::from).collect())
    }

    #[test]
    fn test_cd_to_absolute_path() {
        let _lock = lock_current_dir();
        let temp = make_unique_temp_dir().expect("failed to create temp dir");
        let canonical_temp = fs::canonicalize(&temp).expect("canonicalize failed");
        let orig = stdenv::current_dir().unwrap();
        let mut env = Environment::new();

        let target = canonical_temp.to_string_lossy().to_string();
        let mut diag = Vec::new();
        let code = run(cd(&[&target]), &mut Vec::new(), &mut diag, &mut env);

        let new_cwd = stdenv::current_dir().unwrap();
        stdenv::set_current_dir(&orig).expect("failed to restore cwd");
        let _ = fs::remove_dir_all(&temp);

        assert_eq!(code.unwrap(), 0);
        assert_eq!(new_cwd, canonical_temp);
        assert_eq!(env.current_dir, canonical_temp);
        assert_eq!(String::from_utf8(diag).unwrap(), format!("{}\n", target));
    }

    #[test]
    fn test_cd_nonexistent_path_keeps_directory() {
        let _lock = lock_current_dir();
        let orig = stdenv::current_dir().unwrap();
        let mut env = Environment::new();

        let name = format!("/nonexistent_dir_for_jobsh_test_{}", std::process::id());
        let mut diag = Vec::new();
        let code = run(cd(&[&name]), &mut Vec::new(), &mut diag, &mut env).unwrap();

        assert_eq!(code, 1);
        assert_eq!(stdenv::current_dir().unwrap(), orig);
        assert_eq!(env.current_dir, orig);
        let message = String::from_utf8(diag).unwrap();
        assert!(message.starts_with(&format!("cd: {}: ", name)), "got {:?}", message);
    }

    #[test]
    fn test_cd_without_target_fails_in_the_os() {
        let _lock = lock_current_dir();
        let orig = stdenv::current_dir().unwrap();
        let mut env = Environment::new();

        let code = run(cd(&[]), &mut Vec::new(), &mut Vec::new(), &mut env).unwrap();

        assert_eq!(code, 1);
        assert_eq!(stdenv::current_dir().unwrap(), orig);
    }

    #[test]
    fn test_cd_uses_first_operand_and_ignores_the_rest() {
        let _lock = lock_current_dir();
        let temp = make_unique_temp_dir().expect("failed to create temp dir");
        let canonical_temp = fs::canonicalize(&temp).expect("canonicalize failed");
        let orig = stdenv::current_dir().unwrap();
        let mut env = Environment::new();

        let target = canonical_temp.to_string_lossy().to_string();
        let mut diag = Vec::new();
        let code = run(cd(&[&target, "extra"]), &mut Vec::new(), &mut diag, &mut env);

        let new_cwd = stdenv::current_dir().unwrap();
        stdenv::set_current_dir(&orig).expect("failed to restore cwd");
        let _ = fs::remove_dir_all(&temp);

        assert_eq!(code.unwrap(), 0);
        assert_eq!(new_cwd, canonical_temp);
        assert_eq!(env.current_dir, canonical_temp);
        assert_eq!(String::from_utf8(diag).unwrap(), format!("{}\n", target));
    }

    #[test]
    fn test_cd_into_directory_named_like_a_flag() {
        let _lock = lock_current_dir();
        let temp = make_unique_temp_dir().expect("failed to create temp dir");
        let dashed = temp.join("-dashed");
        fs::create_dir(&dashed).expect("failed to create dashed dir");
        let canonical_dashed = fs::canonicalize(&dashed).expect("canonicalize failed");
        let orig = stdenv::current_dir().unwrap();
        stdenv::set_current_dir(&temp).expect("failed to enter temp dir");
        let mut env = Environment::new();

        let mut diag = Vec::new();
        let code = run(cd(&["-dashed"]), &mut Vec::new(), &mut diag, &mut env);

        let new_cwd = stdenv::current_dir().unwrap();
        stdenv::set_current_dir(&orig).expect("failed to restore cwd");
        let _ = fs::remove_dir_all(&temp);

        assert_eq!(code.unwrap(), 0);
        assert_eq!(new_cwd, canonical_dashed);
        assert_eq!(env.current_dir, canonical_dashed);
        assert_eq!(String::from_utf8(diag).unwrap(), "-dashed\n");
    }

    #[test]
    fn test_cd_help_is_just_a_missing_directory() {
        let _lock = lock_current_dir();
        let orig = stdenv::current_dir().unwrap();
        let mut env = Environment::new();
        let mut out = Vec::new();
        let mut diag = Vec::new();

        let code = run(cd(&["--help"]), &mut out, &mut diag, &mut env).unwrap();

        assert_eq!(code, 1);
        assert!(out.is_empty());
        assert_eq!(stdenv::current_dir().unwrap(), orig);
        assert!(String::from_utf8(diag).unwrap().starts_with("cd: --help: "));
    }

    #[test]
    fn test_jobs_lists_in_launch_order() {
        let mut env = Environment::new();
        env.jobs.insert(200, "sleep 2").unwrap();
        env.jobs.insert(100, "sleep 1").unwrap();

        let mut out = Vec::new();
        let code = run(Jobs, &mut out, &mut Vec::new(), &mut env).unwrap();

        assert_eq!(code, 0);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "[200] sleep 2\n[100] sleep 1\n"
        );
    }

    #[test]
    fn test_jobs_with_empty_registry_prints_nothing() {
        let mut env = Environment::new();
        let mut out = Vec::new();
        let code = run(Jobs, &mut out, &mut Vec::new(), &mut env).unwrap();

        assert_eq!(code, 0);
        assert!(out.is_empty());
    }
}
