// Copyright (c) 2026 - present Tim Ottinger
// SPDX-License-Identifier: MIT

//! Splitting a raw log into one line group per commit

/// Check whether a line opens a new commit block (`commit` then whitespace)
#[must_use]
pub fn is_commit_marker(line: &str) -> bool {
    line.strip_prefix("commit")
        .is_some_and(|rest| rest.starts_with(char::is_whitespace))
}

/// Lazily groups raw lines into blocks, one per `commit` line
///
/// Lines before the first marker are discarded. The last block is yielded
/// whether or not it ends with a blank line.
pub struct Blocks<I> {
    lines: I,
    pending: Option<String>,
}

impl<I> Blocks<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    /// Wrap a line source
    pub fn new(lines: I) -> Self {
        Self {
            lines,
            pending: None,
        }
    }

    /// Find the next marker line, dropping anything before it
    fn next_marker(&mut self) -> Option<String> {
        if let Some(marker) = self.pending.take() {
            return Some(marker);
        }
        self.lines
            .by_ref()
            .map(|line| normalize(line.as_ref()))
            .find(|line| is_commit_marker(line))
    }
}

impl<I> Iterator for Blocks<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = Vec<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut block = vec![self.next_marker()?];
        for line in self.lines.by_ref() {
            let line = normalize(line.as_ref());
            if is_commit_marker(&line) {
                self.pending = Some(line);
                break;
            }
            block.push(line);
        }
        Some(block)
    }
}

/// Strip the line terminator left behind by CRLF logs
fn normalize(line: &str) -> String {
    line.trim_end_matches(['\r', '\n']).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    fn split(text: &str) -> Vec<Vec<String>> {
        Blocks::new(text.lines()).collect()
    }

    #[test]
    fn test_marker_requires_whitespace() {
        assert!(is_commit_marker("commit abc123"));
        assert!(is_commit_marker("commit\tabc123"));
        assert!(!is_commit_marker("commit"));
        assert!(!is_commit_marker("commitment issues"));
        assert!(!is_commit_marker("    commit abc123"));
    }

    #[test]
    fn test_leading_lines_are_discarded() {
        let blocks = split("garbage\n\ncommit a\nAuthor: x <x@y>\n");
        assert_eq!(blocks, vec![vec!["commit a", "Author: x <x@y>"]]);
    }

    #[test]
    fn test_splits_back_to_back_blocks() {
        let blocks = split("commit a\n\n1\t0\tx\n\ncommit b\n\ncommit c");
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0], vec!["commit a", "", "1\t0\tx", ""]);
        assert_eq!(blocks[1], vec!["commit b", ""]);
        assert_eq!(blocks[2], vec!["commit c"]);
    }

    #[test]
    fn test_empty_source_yields_nothing() {
        assert!(split("").is_empty());
        assert!(split("no markers\nhere\n").is_empty());
    }

    #[test]
    fn test_indented_commit_word_does_not_split() {
        let blocks = split("commit a\n    commit the fix\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0][1], "    commit the fix");
    }

    #[test]
    fn test_crlf_is_stripped() {
        let blocks = Blocks::new(["commit a\r", "Author: x <x@y>\r"].into_iter())
            .collect::<Vec<_>>();
        assert_eq!(blocks, vec![vec!["commit a", "Author: x <x@y>"]]);
    }
}
