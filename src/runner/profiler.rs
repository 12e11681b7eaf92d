//! Profiler invocation.
//!
//! Runs `<profiler> <binary> <gmon file>` and keeps the first lines of its
//! standard output, the way `gprof ... | head` would. Profiling is best
//! effort: `collect` turns every failure into empty text.

use crate::utils::config::{DEFAULT_HEAD_LINES, DEFAULT_PROFILER};
use crate::utils::error::ProfilerError;
use log::{debug, warn};
use std::cell::Cell;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Captures flat-profile text for a profiled binary
#[derive(Debug, Clone)]
pub struct ProfilerCollector {
    profiler: PathBuf,
    binary: PathBuf,
    head_lines: usize,
    warned_missing: Cell<bool>,
}

impl ProfilerCollector {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            profiler: PathBuf::from(DEFAULT_PROFILER),
            binary: binary.into(),
            head_lines: DEFAULT_HEAD_LINES,
            warned_missing: Cell::new(false),
        }
    }

    pub fn with_profiler(mut self, profiler: impl Into<PathBuf>) -> Self {
        self.profiler = profiler.into();
        self
    }

    /// Keep only this many output lines (0 keeps everything)
    pub fn with_head_lines(mut self, head_lines: usize) -> Self {
        self.head_lines = head_lines;
        self
    }

    /// Run the profiler on one data file
    ///
    /// # Errors
    /// * `ProfilerError::MissingData` - the data file does not exist
    /// * `ProfilerError::NotFound` - the profiler executable is missing
    /// * `ProfilerError::Failed` - the profiler exited unsuccessfully
    pub fn run_profiler(&self, data_file: &Path) -> Result<String, ProfilerError> {
        if !data_file.exists() {
            return Err(ProfilerError::MissingData(data_file.to_path_buf()));
        }

        let output = Command::new(&self.profiler)
            .arg(&self.binary)
            .arg(data_file)
            .stderr(Stdio::null())
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => ProfilerError::NotFound(self.profiler.clone()),
                _ => ProfilerError::IoError(e),
            })?;

        if !output.status.success() {
            return Err(ProfilerError::Failed(output.status));
        }

        let text = String::from_utf8_lossy(&output.stdout);
        debug!("Profiler produced {} bytes", text.len());

        Ok(truncate_lines(&text, self.head_lines))
    }

    /// Profiler text for one data file, empty when unavailable
    pub fn collect(&self, data_file: &Path) -> String {
        match self.run_profiler(data_file) {
            Ok(text) => text,
            Err(ProfilerError::NotFound(path)) => {
                if !self.warned_missing.replace(true) {
                    warn!("Profiler {} not found, reporting timing only", path.display());
                }
                String::new()
            }
            Err(e) => {
                warn!("Profiling unavailable for this run: {}", e);
                String::new()
            }
        }
    }
}

/// Keep the first `max_lines` lines of `text` (0 keeps all)
pub fn truncate_lines(text: &str, max_lines: usize) -> String {
    if max_lines == 0 {
        return text.to_string();
    }

    let mut out = String::new();
    for line in text.lines().take(max_lines) {
        out.push_str(line);
        out.push('\n');
    }
    out
}
