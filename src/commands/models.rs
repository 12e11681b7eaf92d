use crate::report::{Column, ReportLayout, SortKey};
use crate::utils::config::BenchConfig;
use std::path::PathBuf;

/// Arguments for the bench command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct BenchArgs {
    /// Solver binary (built with `-pg` when profiling)
    pub solver: PathBuf,

    /// Directory holding the input problems
    pub corpus_dir: PathBuf,

    /// Effective configuration (file + CLI overrides)
    pub config: BenchConfig,

    /// Directory for the text report (defaults to `benchmarks_<suffix>`)
    pub output_dir: Option<PathBuf>,

    /// Optional JSON export of the report
    pub output_json: Option<PathBuf>,

    /// Print the rendered report to stdout
    pub print_report: bool,
}

impl Default for BenchArgs {
    fn default() -> Self {
        Self {
            solver: PathBuf::new(),
            corpus_dir: PathBuf::new(),
            config: BenchConfig::default(),
            output_dir: None,
            output_json: None,
            print_report: false,
        }
    }
}

/// Command-line values that take precedence over the config file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub capture_profile: Option<bool>,
    pub top_k: Option<usize>,
    pub per_run_isolation: Option<bool>,
    pub max_entries_per_run: Option<usize>,
    pub head_lines: Option<usize>,
    pub profiler: Option<PathBuf>,
    pub gmon_file: Option<PathBuf>,
    pub threads: Option<usize>,
    pub extension: Option<String>,
    pub item_label: Option<String>,
    pub layout: Option<ReportLayout>,
    pub sort_key: Option<SortKey>,
    pub columns: Option<Vec<Column>>,
}

impl ConfigOverrides {
    /// Apply every value that was given on the command line
    pub fn apply(self, config: &mut BenchConfig) {
        if let Some(v) = self.capture_profile {
            config.capture_profile = v;
        }
        if let Some(v) = self.top_k {
            config.top_k = v;
        }
        if let Some(v) = self.per_run_isolation {
            config.per_run_isolation = v;
        }
        if let Some(v) = self.max_entries_per_run {
            config.max_entries_per_run = v;
        }
        if let Some(v) = self.head_lines {
            config.head_lines = v;
        }
        if let Some(v) = self.profiler {
            config.profiler = v;
        }
        if let Some(v) = self.gmon_file {
            config.gmon_file = v;
        }
        if let Some(v) = self.threads {
            config.threads = v;
        }
        if self.extension.is_some() {
            config.extension = self.extension;
        }
        if let Some(v) = self.item_label {
            config.item_label = v;
        }
        if let Some(v) = self.layout {
            config.layout = v;
        }
        if let Some(v) = self.sort_key {
            config.sort_key = v;
        }
        if let Some(v) = self.columns {
            config.columns = v;
        }
    }
}
