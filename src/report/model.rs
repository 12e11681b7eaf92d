//! Report construction from collected runs.
//!
//! The builder is fed one run at a time: each profile is parsed and folded
//! into the aggregate right away, so only running sums are kept.

use super::ranker::{rank, SortKey};
use crate::aggregator::{summarize_timings, Aggregate, FunctionSummary};
use crate::parser::{FlatProfileParser, RunProfile};
use crate::utils::config::{
    BenchConfig, DEFAULT_ITEM_LABEL, DEFAULT_MAX_ENTRIES, DEFAULT_TOP_K, SCHEMA_VERSION,
};
use crate::utils::error::ReportError;
use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Final benchmark report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Schema version for the JSON export
    pub version: String,

    /// Plural noun for corpus items ("CNFs")
    pub item_label: String,

    /// Number of timed runs
    pub run_count: usize,

    /// Mean elapsed time over every timed run
    pub average_solve_time: f64,

    /// Runs whose profiler output produced at least one entry
    pub profiled_runs: usize,

    /// Mean sample unit over the runs that reported one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_unit: Option<f64>,

    /// Metric the functions are ranked by
    pub sort_key: SortKey,

    /// Ranked functions, best first
    pub top_functions: Vec<FunctionSummary>,

    /// Timestamp when the report was generated
    pub generated_at: String,
}

impl Report {
    pub fn has_profile_data(&self) -> bool {
        !self.top_functions.is_empty()
    }
}

/// Options controlling report construction
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    pub top_k: usize,
    pub sort_key: SortKey,
    pub max_entries_per_run: usize,
    pub item_label: String,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            sort_key: SortKey::default(),
            max_entries_per_run: DEFAULT_MAX_ENTRIES,
            item_label: DEFAULT_ITEM_LABEL.to_string(),
        }
    }
}

impl From<&BenchConfig> for ReportOptions {
    fn from(config: &BenchConfig) -> Self {
        Self {
            top_k: config.top_k,
            sort_key: config.sort_key,
            max_entries_per_run: config.max_entries_per_run,
            item_label: config.item_label.clone(),
        }
    }
}

/// Incremental report builder
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    options: ReportOptions,
    parser: FlatProfileParser,
    elapsed: Vec<f64>,
    aggregate: Aggregate,
    sample_units: Vec<f64>,
    profiled_runs: usize,
}

impl ReportBuilder {
    pub fn new(options: ReportOptions) -> Self {
        let parser = FlatProfileParser::new().with_max_entries(options.max_entries_per_run);
        Self {
            options,
            parser,
            elapsed: Vec::new(),
            aggregate: Aggregate::new(),
            sample_units: Vec::new(),
            profiled_runs: 0,
        }
    }

    /// Record one run from its elapsed time and raw profiler output
    ///
    /// Returns the number of profile entries the output yielded. Empty or
    /// malformed output still counts toward the timing average.
    pub fn add_run(&mut self, elapsed_seconds: f64, profiler_output: &str) -> usize {
        let profile = self.parser.parse(profiler_output);
        self.add_profile(elapsed_seconds, &profile);
        profile.len()
    }

    /// Record one run from an already parsed profile
    pub fn add_profile(&mut self, elapsed_seconds: f64, profile: &RunProfile) {
        self.elapsed.push(elapsed_seconds);

        if profile.is_empty() {
            debug!("Run {} has no profile data", self.elapsed.len());
            return;
        }

        self.profiled_runs += 1;
        if let Some(unit) = profile.sample_unit {
            self.sample_units.push(unit);
        }
        self.aggregate.accumulate(profile);
    }

    pub fn run_count(&self) -> usize {
        self.elapsed.len()
    }

    pub fn aggregate(&self) -> &Aggregate {
        &self.aggregate
    }

    /// Rank the aggregate and produce the report
    ///
    /// # Errors
    /// * `ReportError::NoCorpusData` - no run was recorded
    pub fn finish(self) -> Result<Report, ReportError> {
        let timing = summarize_timings(&self.elapsed).ok_or(ReportError::NoCorpusData)?;
        info!("Timing: {}", timing.summary());

        let top_functions = rank(&self.aggregate, self.options.sort_key, self.options.top_k);

        let sample_unit = if self.sample_units.is_empty() {
            None
        } else {
            Some(self.sample_units.iter().sum::<f64>() / self.sample_units.len() as f64)
        };

        Ok(Report {
            version: SCHEMA_VERSION.to_string(),
            item_label: self.options.item_label,
            run_count: timing.run_count,
            average_solve_time: timing.mean_seconds,
            profiled_runs: self.profiled_runs,
            sample_unit,
            sort_key: self.options.sort_key,
            top_functions,
            generated_at: Utc::now().to_rfc3339(),
        })
    }
}

/// Build a report from `(elapsed seconds, profiler output)` pairs
///
/// **Public** - pure entry point of the core: no I/O, no processes.
pub fn build_report<'a, I>(runs: I, options: &ReportOptions) -> Result<Report, ReportError>
where
    I: IntoIterator<Item = (f64, &'a str)>,
{
    let mut builder = ReportBuilder::new(options.clone());
    for (elapsed, output) in runs {
        builder.add_run(elapsed, output);
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE: &str = "\
Each sample counts as 0.01 seconds.
 time   seconds   seconds    calls  name
 60.00      0.60     0.60       10  propagate
 40.00      1.00     0.40        5  analyze
";

    #[test]
    fn test_no_runs_is_an_error() {
        let result = build_report(Vec::<(f64, &str)>::new(), &ReportOptions::default());
        assert_eq!(result.unwrap_err(), ReportError::NoCorpusData);
    }

    #[test]
    fn test_timing_includes_unprofiled_runs() {
        let report =
            build_report(vec![(1.0, PROFILE), (3.0, "")], &ReportOptions::default()).unwrap();

        assert_eq!(report.run_count, 2);
        assert_eq!(report.average_solve_time, 2.0);
        assert_eq!(report.profiled_runs, 1);
        assert_eq!(report.sample_unit, Some(0.01));
        assert_eq!(report.top_functions.len(), 2);
        assert_eq!(report.top_functions[0].name, "propagate");
    }

    #[test]
    fn test_builder_respects_entry_cap() {
        let options = ReportOptions {
            max_entries_per_run: 1,
            ..Default::default()
        };
        let mut builder = ReportBuilder::new(options);
        assert_eq!(builder.add_run(0.5, PROFILE), 1);
        assert_eq!(builder.aggregate().len(), 1);
        assert_eq!(builder.run_count(), 1);
    }

    #[test]
    fn test_top_k_truncates() {
        let options = ReportOptions {
            top_k: 1,
            ..Default::default()
        };
        let report = build_report(vec![(1.0, PROFILE)], &options).unwrap();
        assert_eq!(report.top_functions.len(), 1);
        assert!(report.has_profile_data());
    }
}
