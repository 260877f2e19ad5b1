// Copyright (c) 2026 - present Tim Ottinger
// SPDX-License-Identifier: MIT

//! JSON export of parsed commits
//!
//! Each commit becomes one object with its files and per-commit totals,
//! written either as a single JSON array or as JSON lines.

use std::io::Write;

use chrono::{DateTime, FixedOffset};
use gitminer_numstat::{CommitRecord, CommitStream, ErrorSink, FileStat, ScanStats};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::OutputFormat;

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    /// Writing output failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One file entry of an exported commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedFile {
    /// Path as printed by git
    pub filename: String,
    /// Lines added, `null` for binary files
    pub insertions: Option<u64>,
    /// Lines removed, `null` for binary files
    pub deletions: Option<u64>,
    /// Lines touched, `null` for binary files
    pub lines: Option<u64>,
}

impl From<FileStat> for ExportedFile {
    fn from(stat: FileStat) -> Self {
        let lines = stat
            .insertions
            .zip(stat.deletions)
            .map(|(i, d)| i.saturating_add(d));
        Self {
            filename: stat.path,
            insertions: stat.insertions,
            deletions: stat.deletions,
            lines,
        }
    }
}

/// Per-commit totals; binary files count towards `files` only
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    /// Lines added across all files
    pub insertions: u64,
    /// Lines removed across all files
    pub deletions: u64,
    /// Lines touched across all files
    pub lines: u64,
    /// Number of files changed
    pub files: usize,
}

/// A commit as written to JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedCommit {
    /// Commit hash
    pub hash: String,
    /// Author email
    pub author: String,
    /// Author date, RFC 3339 with the original offset
    pub date: DateTime<FixedOffset>,
    /// Full commit message
    pub message: String,
    /// Files touched, in log order
    pub files: Vec<ExportedFile>,
    /// Summed counts
    pub totals: Totals,
}

impl ExportedCommit {
    /// Build the export form of a parsed commit
    #[must_use]
    pub fn new(commit: CommitRecord, stats: Vec<FileStat>) -> Self {
        let files: Vec<ExportedFile> = stats.into_iter().map(ExportedFile::from).collect();
        let mut totals = Totals {
            files: files.len(),
            ..Totals::default()
        };
        for file in &files {
            totals.insertions = totals
                .insertions
                .saturating_add(file.insertions.unwrap_or(0));
            totals.deletions = totals
                .deletions
                .saturating_add(file.deletions.unwrap_or(0));
        }
        totals.lines = totals.insertions.saturating_add(totals.deletions);

        Self {
            hash: commit.hash,
            author: commit.author,
            date: commit.timestamp,
            message: commit.message,
            files,
            totals,
        }
    }
}

/// Write commits to `writer` in the given format, returning how many
///
/// # Errors
///
/// Returns `ExportError` if writing or serialization fails.
pub fn write_commits<W, I>(
    mut writer: W,
    commits: I,
    format: OutputFormat,
) -> Result<usize, ExportError>
where
    W: Write,
    I: IntoIterator<Item = ExportedCommit>,
{
    let mut count = 0;
    if format == OutputFormat::Json {
        writer.write_all(b"[")?;
    }
    for commit in commits {
        match format {
            OutputFormat::Json => {
                if count > 0 {
                    writer.write_all(b",")?;
                }
                writer.write_all(b"\n")?;
                serde_json::to_writer(&mut writer, &commit)?;
            }
            OutputFormat::Jsonl => {
                serde_json::to_writer(&mut writer, &commit)?;
                writer.write_all(b"\n")?;
            }
        }
        count += 1;
    }
    if format == OutputFormat::Json {
        if count > 0 {
            writer.write_all(b"\n")?;
        }
        writer.write_all(b"]\n")?;
    }
    writer.flush()?;
    debug!(count, "Wrote commits");
    Ok(count)
}

/// Parse a numstat log and export every commit it yields
///
/// Dropped blocks go to `sink`; the returned stats count them.
///
/// # Errors
///
/// Returns `ExportError` if writing fails. Parse failures never abort.
pub fn export_log<L, W, S>(
    lines: L,
    writer: W,
    format: OutputFormat,
    sink: S,
) -> Result<ScanStats, ExportError>
where
    L: IntoIterator,
    L::Item: AsRef<str>,
    W: Write,
    S: ErrorSink,
{
    let mut stream = CommitStream::new(lines, sink);
    write_commits(
        writer,
        stream
            .by_ref()
            .map(|(commit, files)| ExportedCommit::new(commit, files)),
        format,
    )?;
    Ok(stream.stats())
}
