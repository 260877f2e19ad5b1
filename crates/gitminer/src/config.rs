// Copyright (c) 2026 - present Tim Ottinger
// SPDX-License-Identifier: MIT

//! Configuration for the gitminer command line
//!
//! This module provides the clap-derived argument types, the resolution of
//! where log text comes from, and logging options.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::source::LogSource;

/// gitminer - mine `git log --numstat` output for commit records
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "gitminer")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Subcommand to run (defaults to `extract` with default options)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose logging (debug level)
    ///
    /// Logs every skipped merge commit in addition to dropped blocks.
    /// Logs are written to stderr so stdout stays valid JSON.
    #[arg(short, long, default_value = "false", global = true)]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    ///
    /// Only errors and warnings (such as dropped blocks) will be logged.
    #[arg(short, long, default_value = "false", global = true)]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Parse numstat log output and export commits as JSON
    ///
    /// Without --input, runs `git log --numstat` in the repository.
    ///
    /// Example:
    ///   git log --numstat | gitminer extract --input - --format jsonl
    Extract(ExtractArgs),
}

/// Options for the `extract` subcommand
#[derive(clap::Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractArgs {
    /// Read a saved log from this file, or `-` for stdin
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Repository to run `git log --numstat` in
    ///
    /// Ignored when --input is given. Defaults to the current directory.
    #[arg(short, long, env = "GITMINER_REPO")]
    pub repo: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Write JSON to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Extra arguments passed through to `git log` (after `--`)
    #[arg(last = true)]
    pub git_args: Vec<String>,
}

/// JSON layout for exported commits
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// A single JSON array
    #[default]
    Json,
    /// One JSON object per line
    Jsonl,
}

impl Config {
    /// The subcommand to run, falling back to a default `extract`
    #[must_use]
    pub fn command_or_default(&self) -> Command {
        self.command
            .clone()
            .unwrap_or_else(|| Command::Extract(ExtractArgs::default()))
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}

impl ExtractArgs {
    /// Get the repository path, using the current directory as default
    #[must_use]
    pub fn repo_path(&self) -> PathBuf {
        self.repo
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Work out where log lines come from
    #[must_use]
    pub fn source(&self) -> LogSource {
        match self.input.as_deref() {
            Some(path) if path.as_os_str() == "-" => LogSource::Stdin,
            Some(path) => LogSource::File(path.to_path_buf()),
            None => LogSource::Git {
                repo: self.repo_path(),
                args: self.git_args.clone(),
            },
        }
    }

    /// Validate the options
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input file is specified but doesn't exist
    /// - The repository path doesn't exist or is not a directory
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.source() {
            LogSource::Stdin => {}
            LogSource::File(path) => {
                if !path.is_file() {
                    return Err(ConfigError::InputNotFound(path));
                }
            }
            LogSource::Git { repo, .. } => {
                if !repo.exists() {
                    return Err(ConfigError::RepoNotFound(repo));
                }
                if !repo.is_dir() {
                    return Err(ConfigError::RepoNotDirectory(repo));
                }
            }
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Input log file not found
    #[error("Input log not found: {0}")]
    InputNotFound(PathBuf),

    /// Repository path not found
    #[error("Repository path not found: {0}")]
    RepoNotFound(PathBuf),

    /// Repository path is not a directory
    #[error("Repository path is not a directory: {0}")]
    RepoNotDirectory(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.command.is_none());
        assert!(!config.verbose);
        assert!(!config.quiet);
    }

    #[test]
    fn test_default_command_is_extract() {
        let Command::Extract(args) = Config::default().command_or_default();
        assert_eq!(args, ExtractArgs::default());
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn test_source_stdin() {
        let args = ExtractArgs {
            input: Some(PathBuf::from("-")),
            ..Default::default()
        };
        assert_eq!(args.source(), LogSource::Stdin);
    }

    #[test]
    fn test_source_file() {
        let args = ExtractArgs {
            input: Some(PathBuf::from("history.log")),
            ..Default::default()
        };
        assert_eq!(args.source(), LogSource::File(PathBuf::from("history.log")));
    }

    #[test]
    fn test_source_git_with_args() {
        let args = ExtractArgs {
            repo: Some(PathBuf::from("/tmp")),
            git_args: vec!["--since=2023-01-01".to_string()],
            ..Default::default()
        };
        assert_eq!(
            args.source(),
            LogSource::Git {
                repo: PathBuf::from("/tmp"),
                args: vec!["--since=2023-01-01".to_string()],
            }
        );
    }

    #[test]
    fn test_repo_path_default() {
        let args = ExtractArgs::default();
        // Should fallback to current directory
        assert_eq!(args.repo_path(), std::env::current_dir().expect("cwd"));
    }

    #[test]
    fn test_log_level_default() {
        assert_eq!(Config::default().log_level(), tracing::Level::INFO);
    }

    #[test]
    fn test_log_level_verbose() {
        let config = Config {
            verbose: true,
            ..Default::default()
        };
        assert_eq!(config.log_level(), tracing::Level::DEBUG);
    }

    #[test]
    fn test_log_level_quiet() {
        let config = Config {
            quiet: true,
            ..Default::default()
        };
        assert_eq!(config.log_level(), tracing::Level::WARN);
    }

    #[test]
    fn test_validate_missing_input() {
        let args = ExtractArgs {
            input: Some(PathBuf::from("/nonexistent/path/12345.log")),
            ..Default::default()
        };
        assert!(matches!(
            args.validate(),
            Err(ConfigError::InputNotFound(_))
        ));
    }

    #[test]
    fn test_validate_missing_repo() {
        let args = ExtractArgs {
            repo: Some(PathBuf::from("/nonexistent/path/12345")),
            ..Default::default()
        };
        assert!(matches!(args.validate(), Err(ConfigError::RepoNotFound(_))));
    }

    #[test]
    fn test_validate_valid_repo_dir() {
        let args = ExtractArgs {
            repo: Some(PathBuf::from("/tmp")),
            ..Default::default()
        };
        // This should succeed on most systems
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validate_stdin_always_ok() {
        let args = ExtractArgs {
            input: Some(PathBuf::from("-")),
            ..Default::default()
        };
        assert!(args.validate().is_ok());
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Config::command().debug_assert();
    }
}
