// Copyright (c) 2026 - present Tim Ottinger
// SPDX-License-Identifier: MIT

//! Commit record and file stat types

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A commit parsed from `git log --numstat` output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// The commit hash
    pub hash: String,
    /// Author email, taken from between the angle brackets
    pub author: String,
    /// Commit message, one trimmed line per physical line
    pub message: String,
    /// Author date with its original UTC offset
    pub timestamp: DateTime<FixedOffset>,
}

impl CommitRecord {
    /// Create a new commit record
    #[must_use]
    pub fn new(
        hash: impl Into<String>,
        author: impl Into<String>,
        message: impl Into<String>,
        timestamp: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            hash: hash.into(),
            author: author.into(),
            message: message.into(),
            timestamp,
        }
    }

    /// Validate that a hash is a full 40-character hex string
    #[must_use]
    pub fn is_valid_hash(hash: &str) -> bool {
        hash.len() == 40 && hash.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// Get the short hash (first 7 characters)
    #[must_use]
    pub fn short_hash(&self) -> &str {
        &self.hash[..7.min(self.hash.len())]
    }

    /// Get the first line of the commit message (subject)
    #[must_use]
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    /// The commit timestamp converted to UTC
    #[must_use]
    pub fn utc_timestamp(&self) -> DateTime<Utc> {
        self.timestamp.with_timezone(&Utc)
    }

    /// Calendar day of the commit in the author's own offset
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

/// One line of a commit's stat section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStat {
    /// Path as printed by git, embedded whitespace included
    pub path: String,
    /// Lines added; `None` for binary files
    pub insertions: Option<u64>,
    /// Lines removed; `None` for binary files
    pub deletions: Option<u64>,
}

impl FileStat {
    /// Create a stat entry for a text file
    #[must_use]
    pub fn text(path: impl Into<String>, insertions: u64, deletions: u64) -> Self {
        Self {
            path: path.into(),
            insertions: Some(insertions),
            deletions: Some(deletions),
        }
    }

    /// Create a stat entry for a binary file (`-` counts)
    #[must_use]
    pub fn binary(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            insertions: None,
            deletions: None,
        }
    }

    /// Check if git reported this file as binary
    #[must_use]
    pub fn is_binary(&self) -> bool {
        self.insertions.is_none() && self.deletions.is_none()
    }
}
