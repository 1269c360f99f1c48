use crate::command::Invocation;
use std::ffi::{OsStr, OsString};
use std::os::unix::ffi::OsStrExt;

/// Trailing sentinel that sends a command to the background.
pub const BACKGROUND_MARKER: u8 = b'&';

/// Name of the job listing built-in. Matched against the whole line.
pub const JOBS: &str = "jobs";

/// Name of the directory change built-in. Matched against the first token.
pub const CD: &str = "cd";

/// Classify a raw input line.
///
/// Returns `None` for lines with nothing to run: empty, blank, or a lone
/// background marker. The marker is only recognized as the last non-blank
/// byte; an `&` anywhere else is an ordinary character of its token.
///
/// Words keep their bytes untouched, so arguments that are not valid UTF-8
/// reach the program as typed.
pub fn parse_line(line: &[u8]) -> Option<Invocation> {
    let line = line.trim_ascii_end();

    let (text, background) = match line.strip_suffix(&[BACKGROUND_MARKER]) {
        Some(rest) => (rest.trim_ascii(), true),
        None => (line.trim_ascii(), false),
    };
    if text.is_empty() {
        return None;
    }

    if text == JOBS.as_bytes() {
        return Some(Invocation::Jobs);
    }

    let mut argv = split_into_words(text);
    if argv[0].as_bytes() == CD.as_bytes() {
        argv.remove(0);
        return Some(Invocation::Cd(argv));
    }

    Some(Invocation::External {
        argv,
        background,
        text: String::from_utf8_lossy(text).into_owned(),
    })
}

/// Split on runs of spaces and tabs. No quoting and no escapes.
fn split_into_words(text: &[u8]) -> Vec<OsString> {
    text.split(|b| matches!(b, b' ' | b'\t'))
        .filter(|word| !word.is_empty())
        .map(|word| OsStr::from_bytes(word).to_os_string())
        .collect()
}
