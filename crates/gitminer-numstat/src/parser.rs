// Copyright (c) 2026 - present Tim Ottinger
// SPDX-License-Identifier: MIT

//! Commit state machine for `git log --numstat` blocks
//!
//! A [`NumstatParser`] is fed one line at a time. Each line is handed to the
//! current [`State`], which validates it, records what it carries into the
//! parser context and returns the next state.
//!
//! ```
//! use gitminer_numstat::NumstatParser;
//!
//! let mut parser = NumstatParser::new();
//! for line in [
//!     "commit 8e0d5ec0e23ca9684cff95e204e682cbe9386231",
//!     "Author: Tim Ottinger <tottinge@industriallogic.com>",
//!     "Date:   Mon Jun 12 16:09:43 2023 +0200",
//!     "",
//!     "    doc: improve the precommit.md",
//!     "",
//!     "9\t1\tprecommit.md",
//!     "",
//! ] {
//!     parser.feed(line).unwrap();
//! }
//! let (commit, files) = parser.emit().unwrap();
//! assert_eq!(commit.author, "tottinge@industriallogic.com");
//! assert_eq!(files[0].path, "precommit.md");
//! ```

use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset};
use regex::Regex;

use crate::commit::{CommitRecord, FileStat};
use crate::error::ParseError;

/// Format of git's default `Date:` line, after whitespace is collapsed
pub const GIT_DATE_FORMAT: &str = "%a %b %e %H:%M:%S %Y %z";

static AUTHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[Aa]uthor:\s+.*<([^<>]+)>\s*$").expect("invalid author regex")
});

static MERGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Merge:(?:\s+[0-9A-Fa-f]+){2,}\s*$").expect("invalid merge regex")
});

static STAT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+|-)\s+(\d+|-)\s+(.+)$").expect("invalid stat regex")
});

/// Blank lines the merge skip waits for before expecting a commit again
const MERGE_SKIP_BLANKS: u8 = 2;

/// States of the commit automaton
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    /// Between commits, waiting for a `commit` line
    #[default]
    Ready,
    /// Commit line read, author line next
    AuthorExpected,
    /// Skipping a merge commit until enough blank lines have passed
    Ignoring {
        /// Blank lines seen since the `Merge:` line
        blanks: u8,
    },
    /// Author read, date line next
    DateExpected,
    /// Gathering indented message lines
    CollectingComment,
    /// Gathering `added\tremoved\tpath` lines
    CollectingFileStats,
}

impl State {
    /// Short name used in logs and errors
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Ready => "Ready",
            Self::AuthorExpected => "AuthorExpected",
            Self::Ignoring { .. } => "Ignoring",
            Self::DateExpected => "DateExpected",
            Self::CollectingComment => "CollectingComment",
            Self::CollectingFileStats => "CollectingFileStats",
        }
    }

    /// Consume one line, updating `ctx`, and return the next state
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when the line does not fit this state.
    pub fn transition(self, ctx: &mut NumstatParser, line: &str) -> Result<State, ParseError> {
        let blank = line.trim().is_empty();
        match self {
            Self::Ready => {
                if blank || line.starts_with('#') {
                    return Ok(self);
                }
                let Some(rest) = line
                    .strip_prefix("commit")
                    .filter(|rest| rest.starts_with(char::is_whitespace))
                else {
                    return Err(ParseError::UnexpectedLine {
                        line: line.to_string(),
                    });
                };
                let hash = rest.split_whitespace().next().unwrap_or_default();
                if hash.is_empty() || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
                    return Err(ParseError::InvalidHash {
                        hash: hash.to_string(),
                    });
                }
                ctx.reset();
                ctx.hash = Some(hash.to_string());
                Ok(Self::AuthorExpected)
            }
            Self::AuthorExpected => {
                let trimmed = line.trim();
                if let Some(caps) = AUTHOR_RE.captures(trimmed) {
                    ctx.author = Some(caps[1].trim().to_string());
                    return Ok(Self::DateExpected);
                }
                if MERGE_RE.is_match(trimmed) {
                    ctx.hash = None;
                    ctx.merge = true;
                    return Ok(Self::Ignoring { blanks: 0 });
                }
                Err(ParseError::MissingAuthor {
                    line: line.to_string(),
                })
            }
            Self::Ignoring { blanks } => {
                if !blank {
                    return Ok(self);
                }
                let blanks = blanks + 1;
                if blanks >= MERGE_SKIP_BLANKS {
                    Ok(Self::Ready)
                } else {
                    Ok(Self::Ignoring { blanks })
                }
            }
            Self::DateExpected => {
                let Some(value) = line.strip_prefix("Date:") else {
                    return Err(ParseError::MissingDate {
                        line: line.to_string(),
                    });
                };
                ctx.timestamp = Some(parse_git_date(value)?);
                Ok(Self::CollectingComment)
            }
            Self::CollectingComment => {
                if !blank {
                    ctx.message_lines.push(line.trim().to_string());
                    return Ok(self);
                }
                if ctx.message_lines.is_empty() {
                    return Ok(self);
                }
                ctx.message = Some(ctx.message_lines.join("\n"));
                Ok(Self::CollectingFileStats)
            }
            Self::CollectingFileStats => {
                if blank {
                    ctx.can_emit = true;
                    return Ok(Self::Ready);
                }
                if ctx.files.is_empty() && line.starts_with(char::is_whitespace) {
                    // Another paragraph of the message, not a stat line
                    ctx.message = None;
                    ctx.message_lines.push(String::new());
                    ctx.message_lines.push(line.trim().to_string());
                    return Ok(Self::CollectingComment);
                }
                ctx.files.push(parse_stat_line(line)?);
                Ok(self)
            }
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parse the text after `Date:` using the git default date format
///
/// Runs of whitespace are collapsed first, so `Jun  5` and `Jun 5` both parse.
///
/// # Errors
///
/// Returns `ParseError::InvalidDate` if the text does not match.
pub fn parse_git_date(value: &str) -> Result<DateTime<FixedOffset>, ParseError> {
    let normalized = value.split_whitespace().collect::<Vec<_>>().join(" ");
    DateTime::parse_from_str(&normalized, GIT_DATE_FORMAT).map_err(|source| {
        ParseError::InvalidDate {
            value: normalized.clone(),
            source,
        }
    })
}

/// Parse one `added\tremoved\tpath` line
///
/// Everything after the two count fields is the path, so paths containing
/// spaces survive intact.
///
/// # Errors
///
/// Returns `ParseError::MalformedStat` if the two leading fields are missing.
pub fn parse_stat_line(line: &str) -> Result<FileStat, ParseError> {
    let malformed = || ParseError::MalformedStat {
        line: line.to_string(),
    };
    let caps = STAT_RE.captures(line).ok_or_else(malformed)?;
    let count = |field: &str| -> Result<Option<u64>, ParseError> {
        match field {
            "-" => Ok(None),
            digits => digits.parse().map(Some).map_err(|_| malformed()),
        }
    };
    Ok(FileStat {
        path: caps[3].to_string(),
        insertions: count(&caps[1])?,
        deletions: count(&caps[2])?,
    })
}

/// Parser context for one commit block
#[derive(Debug, Default)]
pub struct NumstatParser {
    state: State,
    hash: Option<String>,
    author: Option<String>,
    timestamp: Option<DateTime<FixedOffset>>,
    message_lines: Vec<String>,
    message: Option<String>,
    files: Vec<FileStat>,
    can_emit: bool,
    merge: bool,
}

impl NumstatParser {
    /// Create a parser in the `Ready` state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line
    ///
    /// On error the parser stays in its current state; callers that isolate
    /// failures per block should discard it.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when the line breaks the expected grammar.
    pub fn feed(&mut self, line: &str) -> Result<(), ParseError> {
        self.state = self.state.transition(self, line)?;
        Ok(())
    }

    /// Current automaton state
    #[must_use]
    pub fn state(&self) -> State {
        self.state
    }

    /// Whether a complete record is ready for [`emit`](Self::emit)
    #[must_use]
    pub fn can_emit(&self) -> bool {
        self.can_emit && self.has_record()
    }

    /// Whether all four record fields have been populated
    #[must_use]
    pub fn has_record(&self) -> bool {
        self.hash.is_some()
            && self.author.is_some()
            && self.timestamp.is_some()
            && self.message.is_some()
    }

    /// Whether the current block was recognized as a merge commit
    #[must_use]
    pub fn is_merge(&self) -> bool {
        self.merge
    }

    /// Hash captured from the commit line, if any
    #[must_use]
    pub fn hash(&self) -> Option<&str> {
        self.hash.as_deref()
    }

    /// Author email, if read
    #[must_use]
    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    /// Parsed date, if read
    #[must_use]
    pub fn timestamp(&self) -> Option<DateTime<FixedOffset>> {
        self.timestamp
    }

    /// Finalized message, if the message section is complete
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Whether any non-blank message line has been collected
    #[must_use]
    pub fn has_message_lines(&self) -> bool {
        !self.message_lines.is_empty()
    }

    /// Stat lines collected so far
    #[must_use]
    pub fn files(&self) -> &[FileStat] {
        &self.files
    }

    /// Take the finished record and reset the context
    ///
    /// Returns `None`, leaving the context untouched, unless the record is
    /// complete and its stat section has been closed.
    pub fn emit(&mut self) -> Option<(CommitRecord, Vec<FileStat>)> {
        if !self.can_emit() {
            return None;
        }
        let taken = std::mem::take(self);
        let record = CommitRecord {
            hash: taken.hash?,
            author: taken.author?,
            message: taken.message?,
            timestamp: taken.timestamp?,
        };
        Some((record, taken.files))
    }

    /// Clear everything from a previous commit
    fn reset(&mut self) {
        *self = Self {
            state: self.state,
            ..Self::default()
        };
    }
}
