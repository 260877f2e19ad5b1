// Copyright (c) 2026 - present Tim Ottinger
// SPDX-License-Identifier: MIT

//! Error types for gitminer-numstat

use thiserror::Error;

/// Structural errors raised when a line does not fit the grammar expected
/// by the current parser state
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// Non-blank content where a `commit <hash>` line was expected
    #[error("Expected a commit line, found: {line}")]
    UnexpectedLine {
        /// The offending line
        line: String,
    },

    /// The token after `commit` is not a hex object id
    #[error("Invalid commit hash: {hash}")]
    InvalidHash {
        /// The rejected token
        hash: String,
    },

    /// The line after the commit line is neither `Author:` nor `Merge:`
    #[error("Expected an Author line, found: {line}")]
    MissingAuthor {
        /// The offending line
        line: String,
    },

    /// The line after the author line does not start with `Date:`
    #[error("Expected a Date line, found: {line}")]
    MissingDate {
        /// The offending line
        line: String,
    },

    /// The `Date:` line does not follow the git default date format
    #[error("Invalid date '{value}': {source}")]
    InvalidDate {
        /// The text after `Date:`
        value: String,
        /// Underlying chrono error
        #[source]
        source: chrono::ParseError,
    },

    /// A line in the stat section without two leading count fields
    #[error("Malformed stat line: {line}")]
    MalformedStat {
        /// The offending line
        line: String,
    },

    /// The block ended before its stat section was complete
    #[error("Block ended in state {state}")]
    Truncated {
        /// Name of the state the parser was left in
        state: &'static str,
    },
}

/// A dropped block, as reported to an [`ErrorSink`](crate::driver::ErrorSink)
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Dropped commit {}: line {line}: {error}", .hash.as_deref().unwrap_or("<unknown>"))]
pub struct BlockError {
    /// Commit hash, if the commit line had been read
    pub hash: Option<String>,
    /// 1-based line number within the block
    pub line: usize,
    /// What went wrong
    #[source]
    pub error: ParseError,
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn test_malformed_stat_display() {
        let err = ParseError::MalformedStat {
            line: "This isn't right".to_string(),
        };
        assert_eq!(err.to_string(), "Malformed stat line: This isn't right");
    }

    #[test]
    fn test_block_error_display_with_hash() {
        let err = BlockError {
            hash: Some("8e0d5ec".to_string()),
            line: 3,
            error: ParseError::MissingDate {
                line: "oops".to_string(),
            },
        };
        assert_eq!(
            err.to_string(),
            "Dropped commit 8e0d5ec: line 3: Expected a Date line, found: oops"
        );
    }

    #[test]
    fn test_block_error_display_without_hash() {
        let err = BlockError {
            hash: None,
            line: 1,
            error: ParseError::Truncated { state: "Ready" },
        };
        assert_eq!(
            err.to_string(),
            "Dropped commit <unknown>: line 1: Block ended in state Ready"
        );
    }
}
