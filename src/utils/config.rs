//! Configuration and constants for the CLI.
//!
//! `BenchConfig` is the explicit configuration handed to the `bench`
//! command. It can be loaded from a TOML file and then overridden by
//! command-line flags.

use crate::report::{Column, ReportLayout, SortKey};
use crate::utils::error::ConfigError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Current JSON report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Number of functions shown in the report by default
pub const DEFAULT_TOP_K: usize = 5;
pub const MAX_TOP_K: usize = 1000;

/// Number of flat-profile rows kept from a single run by default
pub const DEFAULT_MAX_ENTRIES: usize = 5;

/// Profiler output is cut to this many lines, like `gprof ... | head`
pub const DEFAULT_HEAD_LINES: usize = 10;

pub const DEFAULT_PROFILER: &str = "gprof";
pub const DEFAULT_THREADS: usize = 4;
pub const DEFAULT_ITEM_LABEL: &str = "CNFs";

// gprof/glibc conventions
pub const DEFAULT_GMON_FILE: &str = "gmon.out";
pub const GMON_OUT_PREFIX_VAR: &str = "GMON_OUT_PREFIX";
pub const GMON_PREFIX_STEM: &str = "gmon";

/// Environment variable consulted for the profiler path
pub const PROFILER_ENV_VAR: &str = "SOLVER_BENCH_PROFILER";

/// Timestamp embedded in report file names
pub const REPORT_TIMESTAMP_FORMAT: &str = "%Y.%m.%d_%H:%M:%S";

/// Benchmark configuration
///
/// Every field has a default, so a TOML file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Run the profiler after each solver invocation
    pub capture_profile: bool,

    /// Number of functions in the ranked section
    pub top_k: usize,

    /// Give every run its own gmon file via GMON_OUT_PREFIX
    pub per_run_isolation: bool,

    /// Cap on rows parsed from one run's flat profile (0 = no cap)
    pub max_entries_per_run: usize,

    /// Profiler stdout is truncated to this many lines (0 = keep all)
    pub head_lines: usize,

    /// Profiler executable
    pub profiler: PathBuf,

    /// Profile data file written by the solver when runs are not isolated
    pub gmon_file: PathBuf,

    /// Value passed as `--nThreads=<n>` to the solver (0 = flag omitted)
    pub threads: usize,

    /// Only corpus files with this extension are run
    pub extension: Option<String>,

    /// Plural noun used for corpus items in the report ("CNFs")
    pub item_label: String,

    /// Report body layout
    pub layout: ReportLayout,

    /// Ranking metric
    pub sort_key: SortKey,

    /// Columns of the flat-profile layout
    pub columns: Vec<Column>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            capture_profile: true,
            top_k: DEFAULT_TOP_K,
            per_run_isolation: false,
            max_entries_per_run: DEFAULT_MAX_ENTRIES,
            head_lines: DEFAULT_HEAD_LINES,
            profiler: PathBuf::from(DEFAULT_PROFILER),
            gmon_file: PathBuf::from(DEFAULT_GMON_FILE),
            threads: DEFAULT_THREADS,
            extension: None,
            item_label: DEFAULT_ITEM_LABEL.to_string(),
            layout: ReportLayout::default(),
            sort_key: SortKey::default(),
            columns: Column::ALL.to_vec(),
        }
    }
}

impl BenchConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_k == 0 {
            return Err(ConfigError::Invalid("top_k must be greater than 0".to_string()));
        }
        if self.top_k > MAX_TOP_K {
            return Err(ConfigError::Invalid(format!(
                "top_k is too large (max {})",
                MAX_TOP_K
            )));
        }
        if self.columns.is_empty() {
            return Err(ConfigError::Invalid("columns cannot be empty".to_string()));
        }
        if self.item_label.trim().is_empty() {
            return Err(ConfigError::Invalid("item_label cannot be empty".to_string()));
        }
        Ok(())
    }
}

/// Load a configuration file
///
/// # Errors
/// * `ConfigError::ReadFailed` - file cannot be read
/// * `ConfigError::ParseFailed` - TOML is invalid or has unknown values
/// * `ConfigError::Invalid` - values out of range
pub fn load_config(path: impl AsRef<Path>) -> Result<BenchConfig, ConfigError> {
    let path = path.as_ref();
    debug!("Loading config from: {}", path.display());

    let contents = fs::read_to_string(path)?;
    let config: BenchConfig = toml::from_str(&contents)?;
    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_is_valid() {
        let config = BenchConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.capture_profile);
        assert_eq!(config.top_k, 5);
        assert!(!config.per_run_isolation);
    }

    #[test]
    fn test_load_partial_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "top_k = 3\nper_run_isolation = true\nsort_key = \"percent-time\"\ncolumns = [\"percent-time\", \"self-seconds\"]"
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.top_k, 3);
        assert!(config.per_run_isolation);
        assert_eq!(config.sort_key, SortKey::PercentTime);
        assert_eq!(config.columns, vec![Column::PercentTime, Column::SelfSeconds]);
        // untouched keys keep their defaults
        assert!(config.capture_profile);
        assert_eq!(config.head_lines, DEFAULT_HEAD_LINES);
    }

    #[test]
    fn test_load_config_rejects_zero_top_k() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "top_k = 0").unwrap();

        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_load_config_rejects_bad_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "layout = \"sideways\"").unwrap();

        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::ParseFailed(_))));
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("/nonexistent/bench.toml");
        assert!(matches!(result, Err(ConfigError::ReadFailed(_))));
    }
}
