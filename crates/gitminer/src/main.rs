// Copyright (c) 2026 - present Tim Ottinger
// SPDX-License-Identifier: MIT

//! gitminer: turn `git log --numstat` output into commit records
//!
//! Reads a numstat log from a file, stdin, or a `git log` subprocess and
//! writes each commit with the files it touched as JSON on stdout.

use anyhow::Context;
use clap::Parser;
use tracing::debug;

use gitminer::config::{Command, Config};
use gitminer::{extract, init_logging};

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_logging(config.log_level());
    debug!(?config, "Starting gitminer");

    match config.command_or_default() {
        Command::Extract(args) => {
            extract::run(&args).context("extract failed")?;
        }
    }
    Ok(())
}
