// Copyright (c) 2026 - present Tim Ottinger
// SPDX-License-Identifier: MIT

//! gitminer-numstat: streaming parser for `git log --numstat` output
//!
//! The log text is split into one block per commit, each block runs through
//! a small state machine, and complete commits come out lazily together with
//! the files they touched. A malformed block is reported and skipped without
//! stopping the scan.

#![warn(missing_docs)]

//! # Example
//!
//! ```no_run
//! use std::io::{self, BufRead};
//! use gitminer_numstat::read_all_commits;
//!
//! let stdin = io::stdin();
//! let lines = stdin.lock().lines().map_while(Result::ok);
//! for (commit, files) in read_all_commits(lines) {
//!     println!("{} {} ({} files)", commit.short_hash(), commit.subject(), files.len());
//! }
//! ```

pub mod commit;
pub mod driver;
pub mod error;
pub mod parser;
pub mod splitter;

pub use commit::{CommitRecord, FileStat};
pub use driver::{
    CommitStream, ErrorSink, ScanStats, TracingSink, read_all_commits, read_all_commits_with,
};
pub use error::{BlockError, ParseError};
pub use parser::{NumstatParser, State};
pub use splitter::Blocks;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::commit::{CommitRecord, FileStat};
    pub use crate::driver::{CommitStream, ErrorSink, read_all_commits, read_all_commits_with};
    pub use crate::error::{BlockError, ParseError};
}
