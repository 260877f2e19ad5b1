#![no_main]

use gitminer_numstat::{BlockError, read_all_commits_with};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let commits = read_all_commits_with(text.lines(), |_: &BlockError| {});
        for (commit, _files) in commits {
            assert!(!commit.hash.is_empty());
            assert!(!commit.author.is_empty());
        }
    }
});
