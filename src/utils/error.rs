//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.
//!
//! Malformed profiler output has no error type: the parser recovers from it
//! locally and yields an empty profile.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building a report from collected runs
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReportError {
    #[error("No corpus data: zero runs were timed")]
    NoCorpusData,
}

/// Errors that can occur while invoking the solver
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Failed to start solver {}", .path.display())]
    SpawnFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to wait for solver")]
    WaitFailed(#[source] std::io::Error),

    #[error("Failed to read corpus directory {}", .path.display())]
    CorpusUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur while invoking the profiler.
///
/// These never abort a benchmark: the collector degrades them to
/// "no profile text" and the report falls back to timing only.
#[derive(Error, Debug)]
pub enum ProfilerError {
    #[error("Profiler not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Profiler exited with {0}")]
    Failed(std::process::ExitStatus),

    #[error("Profile data file missing: {}", .0.display())]
    MissingData(PathBuf),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors that can occur while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFailed(#[from] std::io::Error),

    #[error("Failed to parse config TOML: {0}")]
    ParseFailed(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

/// Errors that can occur while summarizing saved reports
#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("Average solving time not found in {}", .0.display())]
    MissingAverage(PathBuf),

    #[error("Failed to read {}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No valid profiling data found")]
    NoData,
}
