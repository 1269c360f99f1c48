//! Line acquisition for the interactive loop.

use crate::error::ShellError;
use rustyline::config::{Behavior, Config};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{BufRead, Write};

/// Something the shell can read command lines from.
pub trait LineSource {
    /// Show `prompt` and read one line without its terminator, as raw bytes.
    ///
    /// Returns `Ok(None)` once input is exhausted.
    fn read_line(&mut self, prompt: &str) -> Result<Option<Vec<u8>>, ShellError>;
}

/// Maximum accepted input line length, in bytes.
///
/// Like `LINE_MAX`, the limit counts the line terminator: with a limit of
/// `n`, a line of `n - 1` bytes of text is the longest one accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineLimit {
    max: usize,
}

impl LineLimit {
    pub fn new(max: usize) -> Self {
        Self { max }
    }

    pub fn max(&self) -> usize {
        self.max
    }

    /// Whether `line` (terminator already removed) fits. Counts bytes as read,
    /// before any decoding.
    pub fn accepts(&self, line: &[u8]) -> bool {
        line.len() < self.max
    }
}

/// Interactive editing with history, for terminals.
///
/// The editor talks to the terminal device rather than stdout, so the prompt
/// never ends up in the command output stream.
pub struct Editor {
    inner: DefaultEditor,
    history: bool,
}

impl Editor {
    pub fn new(history: bool) -> Result<Self, ShellError> {
        Ok(Self {
            inner: DefaultEditor::with_config(editor_config())?,
            history,
        })
    }
}

fn editor_config() -> Config {
    Config::builder()
        .behavior(Behavior::PreferTerm)
        .auto_add_history(false)
        .build()
}

impl LineSource for Editor {
    fn read_line(&mut self, prompt: &str) -> Result<Option<Vec<u8>>, ShellError> {
        match self.inner.readline(prompt) {
            Ok(line) => {
                if self.history && !line.trim().is_empty() {
                    self.inner.add_history_entry(line.as_str())?;
                }
                Ok(Some(line.into_bytes()))
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

/// Reads lines from any buffered reader, writing the prompt to `prompt_out`.
///
/// Used when stdin is not a terminal, and by tests. Lines are returned as
/// read; nothing is decoded.
pub struct PlainReader<R, W> {
    reader: R,
    prompt_out: W,
}

impl<R: BufRead, W: Write> PlainReader<R, W> {
    pub fn new(reader: R, prompt_out: W) -> Self {
        Self { reader, prompt_out }
    }
}

impl<R: BufRead, W: Write> LineSource for PlainReader<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<Vec<u8>>, ShellError> {
        write!(self.prompt_out, "{}", prompt)?;
        self.prompt_out.flush()?;

        let mut buf = Vec::new();
        if self.reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }
        Ok(Some(buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_line_limit_boundary() {
        let limit = LineLimit::new(8);
        assert!(limit.accepts(b""));
        assert!(limit.accepts(b"1234567"));
        assert!(!limit.accepts(b"12345678"));
        assert!(!limit.accepts(b"123456789"));
    }

    #[test]
    fn test_plain_reader_strips_terminators_and_prompts() {
        let mut prompts = Vec::new();
        let mut source = PlainReader::new(Cursor::new("ls -l\r\n\nlast"), &mut prompts);

        assert_eq!(source.read_line("a: ").unwrap(), Some(b"ls -l".to_vec()));
        assert_eq!(source.read_line("b: ").unwrap(), Some(Vec::new()));
        assert_eq!(source.read_line("c: ").unwrap(), Some(b"last".to_vec()));
        assert_eq!(source.read_line("d: ").unwrap(), None);

        drop(source);
        assert_eq!(String::from_utf8(prompts).unwrap(), "a: b: c: d: ");
    }

    #[test]
    fn test_plain_reader_keeps_invalid_utf8_bytes() {
        let mut source = PlainReader::new(Cursor::new(b"echo \xff\n".to_vec()), std::io::sink());
        assert_eq!(source.read_line("").unwrap(), Some(b"echo \xff".to_vec()));
    }

    #[test]
    fn test_invalid_utf8_line_is_measured_in_raw_bytes() {
        let limit = LineLimit::new(10);
        let mut source = PlainReader::new(
            Cursor::new(b"true \xff\xff\xff\xff\ntrue \xff\xff\xff\xff\xff\n".to_vec()),
            std::io::sink(),
        );

        let fits = source.read_line("").unwrap().unwrap();
        assert_eq!(fits.len(), 9);
        assert!(limit.accepts(&fits));

        let over = source.read_line("").unwrap().unwrap();
        assert_eq!(over.len(), 10);
        assert!(!limit.accepts(&over));
    }

    #[test]
    fn test_editor_prompts_on_the_terminal() {
        let config = editor_config();
        assert!(matches!(config.behavior(), Behavior::PreferTerm));
        assert!(!config.auto_add_history());
    }
}
