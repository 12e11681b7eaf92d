//! Report text writer and report file naming.
//!
//! Reports land in `benchmarks_<suffix>/benchmark_<suffix>_<timestamp>.txt`,
//! where `<suffix>` is the last `_`-separated part of the corpus directory
//! name.

use crate::utils::config::REPORT_TIMESTAMP_FORMAT;
use crate::utils::error::OutputError;
use chrono::{DateTime, TimeZone};
use log::{debug, info};
use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Suffix identifying a corpus in report names
///
/// `cnf_hard` -> `hard`, `corpus` -> `corpus`.
pub fn report_suffix(corpus_dir: &Path) -> String {
    let name = corpus_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| corpus_dir.to_string_lossy().into_owned());

    name.rsplit('_').next().unwrap_or(&name).to_string()
}

/// Default directory for reports of a corpus
pub fn default_output_dir(corpus_dir: &Path) -> PathBuf {
    PathBuf::from(format!("benchmarks_{}", report_suffix(corpus_dir)))
}

/// Timestamped report file name
pub fn report_file_name<Tz>(suffix: &str, timestamp: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!(
        "benchmark_{}_{}.txt",
        suffix,
        timestamp.format(REPORT_TIMESTAMP_FORMAT)
    )
}

/// Write rendered report text to a file
///
/// **Public** - main entry point for report output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::InvalidPath` - Path is empty, a directory, or its parent cannot be created
pub fn write_report(text: &str, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing report to: {}", output_path.display());

    validate_output_path(output_path)?;
    create_parent_dirs(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);

    writer
        .write_all(text.as_bytes())
        .map_err(OutputError::WriteFailed)?;
    writer.flush().map_err(OutputError::WriteFailed)?;

    debug!("Report written ({} bytes)", text.len());

    Ok(())
}

/// Validate that output path is writable
///
/// **Private** - internal validation
pub(crate) fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Create the missing parent directories of an output file
pub(crate) fn create_parent_dirs(path: &Path) -> Result<(), OutputError> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() || parent.exists() {
        return Ok(());
    }

    debug!("Creating parent directories: {}", parent.display());
    std::fs::create_dir_all(parent).map_err(|e| {
        OutputError::InvalidPath(format!("Cannot create directory {}: {}", parent.display(), e))
    })
}
