// Copyright (c) 2026 - present Tim Ottinger
// SPDX-License-Identifier: MIT

//! The `extract` command: log source in, JSON out

use std::fs::File;
use std::io::{self, BufWriter, Write};

use gitminer_numstat::{ScanStats, TracingSink};
use thiserror::Error;
use tracing::info;

use crate::config::{ConfigError, ExtractArgs};
use crate::export::{ExportError, export_log};
use crate::source::SourceError;

/// Extraction errors
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Invalid options
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The log source failed
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Writing JSON failed
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// The output file could not be created
    #[error("Failed to create output file: {0}")]
    Output(#[source] io::Error),
}

/// Run `extract` with the given options
///
/// # Errors
///
/// Returns `ExtractError` if the options are invalid, the source cannot be
/// read, or the output cannot be written.
pub fn run(args: &ExtractArgs) -> Result<ScanStats, ExtractError> {
    args.validate()?;

    let mut reader = args.source().open()?;

    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).map_err(ExtractError::Output)?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let stats = export_log(reader.by_ref(), writer, args.format, TracingSink)?;
    reader.finish()?;

    info!(
        blocks = stats.blocks,
        commits = stats.commits,
        merges = stats.merges,
        dropped = stats.dropped,
        "Extraction complete"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    fn fixture() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/numstat-sample.log")
    }

    #[test]
    fn test_run_rejects_missing_input() {
        let args = ExtractArgs {
            input: Some(PathBuf::from("/nonexistent/path/12345.log")),
            ..Default::default()
        };
        assert!(matches!(run(&args), Err(ExtractError::Config(_))));
    }

    #[test]
    fn test_rejected_source_creates_no_output_file() {
        let output = std::env::temp_dir()
            .join(format!("gitminer-extract-unused-{}.json", std::process::id()));
        let _ = std::fs::remove_file(&output);
        let args = ExtractArgs {
            repo: Some(std::env::temp_dir().join(format!(
                "gitminer-not-a-repo-{}",
                std::process::id()
            ))),
            output: Some(output.clone()),
            ..Default::default()
        };
        // Fails validation before anything is created
        assert!(run(&args).is_err());
        assert!(!output.exists());
    }

    #[test]
    fn test_run_writes_output_file() {
        let output = std::env::temp_dir()
            .join(format!("gitminer-extract-{}.json", std::process::id()));
        let args = ExtractArgs {
            input: Some(fixture()),
            output: Some(output.clone()),
            ..Default::default()
        };

        let stats = run(&args).expect("extract should succeed");
        let written = std::fs::read_to_string(&output).expect("output written");
        let _ = std::fs::remove_file(&output);

        assert_eq!(stats.commits, 4);
        assert_eq!(stats.dropped, 1);
        let json: serde_json::Value = serde_json::from_str(&written).expect("valid JSON");
        assert_eq!(json.as_array().map(Vec::len), Some(4));
    }
}
