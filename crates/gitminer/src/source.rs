// Copyright (c) 2026 - present Tim Ottinger
// SPDX-License-Identifier: MIT

//! Where numstat log lines come from
//!
//! A log can be read from a saved file, from stdin, or straight from a
//! `git log --numstat` subprocess. In every case the caller gets a plain
//! iterator of lines and checks [`LogReader::finish`] once it is drained.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::process::{Child, ChildStdout, Command, ExitStatus, Stdio};

use thiserror::Error;
use tracing::{debug, info};

/// Arguments always passed to `git log`, ahead of any user extras
///
/// They pin the output to the layout the parser expects regardless of the
/// user's git configuration.
pub const GIT_LOG_ARGS: &[&str] = &[
    "log",
    "--numstat",
    "--pretty=medium",
    "--date=default",
    "--no-color",
    "--no-decorate",
];

/// Errors opening or draining a log source
#[derive(Debug, Error)]
pub enum SourceError {
    /// The input file could not be opened
    #[error("Failed to open {path}: {source}")]
    Open {
        /// The file that could not be opened
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// `git` could not be started
    #[error("Failed to run git: {0}")]
    Spawn(#[source] io::Error),

    /// Reading the stream failed part way through
    #[error("Failed reading log: {0}")]
    Read(#[source] io::Error),

    /// `git log` exited unsuccessfully
    #[error("git log exited with {0}")]
    GitFailed(ExitStatus),
}

/// A source of `git log --numstat` text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSource {
    /// Standard input
    Stdin,
    /// A saved log file
    File(PathBuf),
    /// A `git log --numstat` subprocess
    Git {
        /// Repository to run in
        repo: PathBuf,
        /// Extra arguments appended to [`GIT_LOG_ARGS`]
        args: Vec<String>,
    },
}

impl LogSource {
    /// Build the `git` invocation for a `Git` source
    #[must_use]
    pub fn git_command(repo: &std::path::Path, args: &[String]) -> Command {
        let mut cmd = Command::new("git");
        cmd.arg("-C").arg(repo).args(GIT_LOG_ARGS).args(args);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());
        cmd
    }

    /// Open the source for reading
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Open` if a file cannot be opened and
    /// `SourceError::Spawn` if `git` cannot be started.
    pub fn open(&self) -> Result<LogReader, SourceError> {
        match self {
            Self::Stdin => {
                debug!("Reading log from stdin");
                Ok(LogReader::new(Box::new(BufReader::new(io::stdin())), None))
            }
            Self::File(path) => {
                debug!(path = %path.display(), "Reading log from file");
                let file = File::open(path).map_err(|source| SourceError::Open {
                    path: path.clone(),
                    source,
                })?;
                Ok(LogReader::new(Box::new(BufReader::new(file)), None))
            }
            Self::Git { repo, args } => {
                info!(repo = %repo.display(), "Running git log --numstat");
                let mut child = Self::git_command(repo, args)
                    .spawn()
                    .map_err(SourceError::Spawn)?;
                let stdout: ChildStdout = child.stdout.take().ok_or_else(|| {
                    SourceError::Spawn(io::Error::other("git stdout was not captured"))
                })?;
                Ok(LogReader::new(Box::new(BufReader::new(stdout)), Some(child)))
            }
        }
    }
}

/// Line iterator over an open log source
///
/// Invalid UTF-8 is replaced rather than treated as an error. A read error
/// ends iteration and is returned later by [`finish`](Self::finish).
pub struct LogReader {
    reader: Box<dyn BufRead>,
    child: Option<Child>,
    error: Option<io::Error>,
    buf: Vec<u8>,
}

impl LogReader {
    /// Wrap a reader, optionally owning the process that writes to it
    pub fn new(reader: Box<dyn BufRead>, child: Option<Child>) -> Self {
        Self {
            reader,
            child,
            error: None,
            buf: Vec::new(),
        }
    }

    /// Wait for the source to finish and surface any deferred error
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Read` if reading failed part way through and
    /// `SourceError::GitFailed` if the `git` subprocess exited non-zero.
    pub fn finish(mut self) -> Result<(), SourceError> {
        // Release the pipe before waiting on git
        drop(std::mem::replace(&mut self.reader, Box::new(io::empty())));
        if let Some(mut child) = self.child.take() {
            let status = child.wait().map_err(SourceError::Read)?;
            if !status.success() {
                return Err(SourceError::GitFailed(status));
            }
        }
        match self.error.take() {
            Some(err) => Err(SourceError::Read(err)),
            None => Ok(()),
        }
    }
}

impl Iterator for LogReader {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.error.is_some() {
            return None;
        }
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                let line = String::from_utf8_lossy(&self.buf);
                Some(line.trim_end_matches(['\n', '\r']).to_string())
            }
            Err(err) => {
                self.error = Some(err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;
    use std::io::Cursor;

    fn reader_over(bytes: &'static [u8]) -> LogReader {
        LogReader::new(Box::new(Cursor::new(bytes)), None)
    }

    #[test]
    fn test_reader_yields_lines_without_terminators() {
        let lines: Vec<String> = reader_over(b"commit abc\r\nAuthor: x <y>\n\nlast").collect();
        assert_eq!(lines, vec!["commit abc", "Author: x <y>", "", "last"]);
    }

    #[test]
    fn test_reader_replaces_invalid_utf8() {
        let lines: Vec<String> = reader_over(b"1\t0\tcaf\xe9.txt\n").collect();
        assert_eq!(lines, vec!["1\t0\tcaf\u{fffd}.txt"]);
    }

    #[test]
    fn test_finish_without_child_is_ok() {
        let mut reader = reader_over(b"a\nb\n");
        assert_eq!(reader.by_ref().count(), 2);
        assert!(reader.finish().is_ok());
    }

    #[test]
    fn test_open_missing_file() {
        let source = LogSource::File(PathBuf::from("/nonexistent/path/12345.log"));
        match source.open() {
            Err(SourceError::Open { path, .. }) => {
                assert!(path.to_string_lossy().contains("12345"));
            }
            Err(other) => panic!("Expected Open error, got {other}"),
            Ok(_) => panic!("Expected Open error"),
        }
    }

    #[test]
    fn test_git_command_arguments() {
        let cmd = LogSource::git_command(
            std::path::Path::new("/repo"),
            &["--since=2024-01-01".to_string()],
        );
        let args: Vec<String> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(cmd.get_program(), "git");
        assert_eq!(&args[..2], &["-C".to_string(), "/repo".to_string()]);
        assert_eq!(args[2], "log");
        assert!(args.contains(&"--numstat".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("--since=2024-01-01"));
    }
}
