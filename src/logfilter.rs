//! Prints the lines of a log that mention a given level.
//!
//! The scan is a single buffered pass. Lines are compared as raw bytes so a
//! stray non-UTF-8 line is passed through instead of aborting the run.

use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub lines_read: usize,
    pub lines_matched: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFilter {
    level: String,
}

impl LogFilter {
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
        }
    }

    pub fn level(&self) -> &str {
        &self.level
    }

    pub fn matches(&self, line: &[u8]) -> bool {
        contains(line, self.level.as_bytes())
    }

    /// Copies every matching line, terminator included, from `reader` to `writer`.
    pub fn filter<R: BufRead, W: Write>(&self, mut reader: R, mut writer: W) -> io::Result<FilterStats> {
        let mut stats = FilterStats::default();
        let mut line = Vec::new();

        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                break;
            }
            stats.lines_read += 1;
            if self.matches(&line) {
                writer.write_all(&line)?;
                stats.lines_matched += 1;
            }
        }

        writer.flush()?;
        Ok(stats)
    }

    /// Opens `path` and filters it to `writer`.
    pub fn filter_file<W: Write>(&self, path: &Path, writer: W) -> io::Result<FilterStats> {
        let file = File::open(path)?;
        self.filter(BufReader::new(file), writer)
    }
}

/// Rewrites the single-dash long flag `-level` (and `-level=X`) to `--level`
/// so it parses as the long option instead of `-l evel`. Arguments after a
/// bare `--` are left alone.
pub fn normalize_level_flag<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut positional = false;
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if positional {
                return arg;
            }
            match arg.to_str() {
                Some("--") => {
                    positional = true;
                    arg
                }
                Some("-level") => OsString::from("--level"),
                Some(flag) if flag.starts_with("-level=") => OsString::from(format!("-{}", flag)),
                _ => arg,
            }
        })
        .collect()
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack.windows(needle.len()).any(|w| w == needle)
}
