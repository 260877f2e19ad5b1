// Copyright (c) 2026 - present Tim Ottinger
// SPDX-License-Identifier: MIT

//! Lazily turning a raw log into commit records
//!
//! Each block from the [`Blocks`] splitter gets a fresh [`NumstatParser`].
//! A block that fails to parse is reported to an [`ErrorSink`] and skipped;
//! the scan always carries on with the next block.

use tracing::{debug, warn};

use crate::commit::{CommitRecord, FileStat};
use crate::error::{BlockError, ParseError};
use crate::parser::{NumstatParser, State};
use crate::splitter::Blocks;

/// Receives blocks that were dropped during a scan
pub trait ErrorSink {
    /// Called once per dropped block
    fn block_dropped(&mut self, error: &BlockError);
}

impl<F> ErrorSink for F
where
    F: FnMut(&BlockError),
{
    fn block_dropped(&mut self, error: &BlockError) {
        self(error);
    }
}

/// Sink that logs each dropped block as a warning
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ErrorSink for TracingSink {
    fn block_dropped(&mut self, error: &BlockError) {
        warn!(
            hash = error.hash.as_deref().unwrap_or("<unknown>"),
            line = error.line,
            error = %error.error,
            "Dropping malformed commit block"
        );
    }
}

/// Running counts for a scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Blocks pulled from the splitter
    pub blocks: usize,
    /// Records yielded
    pub commits: usize,
    /// Merge commits skipped
    pub merges: usize,
    /// Blocks reported to the error sink
    pub dropped: usize,
}

/// Iterator over the commits of a `git log --numstat` stream
pub struct CommitStream<I, S> {
    blocks: Blocks<I>,
    sink: S,
    stats: ScanStats,
}

impl<I, S> CommitStream<I, S>
where
    I: Iterator,
    I::Item: AsRef<str>,
    S: ErrorSink,
{
    /// Create a stream over `lines`, reporting dropped blocks to `sink`
    pub fn new(lines: impl IntoIterator<IntoIter = I>, sink: S) -> Self {
        Self {
            blocks: Blocks::new(lines.into_iter()),
            sink,
            stats: ScanStats::default(),
        }
    }

    /// Counts so far
    #[must_use]
    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    /// Run one block through a fresh parser
    fn parse_block(&mut self, block: &[String]) -> Option<(CommitRecord, Vec<FileStat>)> {
        let mut parser = NumstatParser::new();
        for (idx, line) in block.iter().enumerate() {
            if let Err(error) = parser.feed(line) {
                // Later paragraphs of a merge message land after the resync
                if parser.is_merge() {
                    self.skip_merge(&block[0]);
                } else {
                    self.drop_block(&parser, idx + 1, error);
                }
                return None;
            }
        }

        // End of block closes an open message or stat section
        if parser.state() == State::CollectingComment
            && parser.has_message_lines()
            && let Err(error) = parser.feed("")
        {
            self.drop_block(&parser, block.len(), error);
            return None;
        }
        if parser.state() == State::CollectingFileStats
            && let Err(error) = parser.feed("")
        {
            self.drop_block(&parser, block.len(), error);
            return None;
        }

        if let Some(record) = parser.emit() {
            return Some(record);
        }
        if parser.is_merge() {
            self.skip_merge(&block[0]);
        } else {
            let state = parser.state().name();
            self.drop_block(&parser, block.len(), ParseError::Truncated { state });
        }
        None
    }

    fn skip_merge(&mut self, commit_line: &str) {
        debug!(line = %commit_line, "Skipping merge commit");
        self.stats.merges += 1;
    }

    fn drop_block(&mut self, parser: &NumstatParser, line: usize, error: ParseError) {
        self.stats.dropped += 1;
        self.sink.block_dropped(&BlockError {
            hash: parser.hash().map(str::to_string),
            line,
            error,
        });
    }
}

impl<I, S> Iterator for CommitStream<I, S>
where
    I: Iterator,
    I::Item: AsRef<str>,
    S: ErrorSink,
{
    type Item = (CommitRecord, Vec<FileStat>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(block) = self.blocks.next() {
            self.stats.blocks += 1;
            if let Some(record) = self.parse_block(&block) {
                self.stats.commits += 1;
                return Some(record);
            }
        }
        None
    }
}

/// Read every commit from a line source, logging dropped blocks
///
/// Yields each commit with the paths it touched, in log order.
///
/// # Example
///
/// ```
/// use gitminer_numstat::read_all_commits;
///
/// let log = "commit 8e0d5ec0e23ca9684cff95e204e682cbe9386231
/// Author: Tim Ottinger <tottinge@industriallogic.com>
/// Date:   Mon Jun 12 16:09:43 2023 +0200
///
///     doc: improve the precommit.md
///
/// 9\t1\tprecommit.md
/// ";
/// let commits: Vec<_> = read_all_commits(log.lines()).collect();
/// assert_eq!(commits.len(), 1);
/// assert_eq!(commits[0].1, vec!["precommit.md".to_string()]);
/// ```
pub fn read_all_commits<L>(lines: L) -> impl Iterator<Item = (CommitRecord, Vec<String>)>
where
    L: IntoIterator,
    L::Item: AsRef<str>,
{
    read_all_commits_with(lines, TracingSink)
}

/// Read every commit from a line source, reporting dropped blocks to `sink`
pub fn read_all_commits_with<L, S>(
    lines: L,
    sink: S,
) -> impl Iterator<Item = (CommitRecord, Vec<String>)>
where
    L: IntoIterator,
    L::Item: AsRef<str>,
    S: ErrorSink,
{
    CommitStream::new(lines, sink).map(|(commit, files)| {
        let paths = files.into_iter().map(|stat| stat.path).collect();
        (commit, paths)
    })
}
