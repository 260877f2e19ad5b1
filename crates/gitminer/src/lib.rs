// Copyright (c) 2026 - present Tim Ottinger
// SPDX-License-Identifier: MIT

//! gitminer library
//!
//! This module exports the command line plumbing of gitminer for use in
//! integration tests: configuration, log sources and JSON export.

pub mod config;
pub mod export;
pub mod extract;
pub mod source;

/// Install the stderr tracing subscriber at the given level
///
/// `RUST_LOG` directives are honoured on top of the level.
pub fn init_logging(level: tracing::Level) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
