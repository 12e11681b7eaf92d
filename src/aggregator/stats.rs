//! Cross-run accumulation of per-function statistics.
//!
//! Every run contributes only the functions it mentions. A function seen in
//! 2 of 10 runs is averaged over 2, not 10.

use crate::parser::{ProfileEntry, RunProfile};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Running sums for one function name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateStat {
    /// Runs in which this function appeared (the averaging denominator)
    pub occurrence_count: u64,

    pub sum_percent_time: f64,
    pub sum_self_seconds: f64,

    /// Only incremented by entries that carried `calls`
    pub sum_calls: f64,

    /// Sum of `total_seconds_per_call * calls` over entries carrying both
    pub sum_total_seconds: f64,

    pub has_calls: bool,
    pub has_total: bool,
}

impl AggregateStat {
    /// Fold one run's entry into the sums
    pub fn add_entry(&mut self, entry: &ProfileEntry) {
        self.occurrence_count += 1;
        self.sum_percent_time += entry.percent_time;
        self.sum_self_seconds += entry.self_seconds;

        if let Some(calls) = entry.calls {
            self.sum_calls += calls;
            self.has_calls = true;

            // Per-call rates are not additive across runs with different
            // call counts, so rebuild the total first
            if let Some(total_per_call) = entry.total_seconds_per_call {
                self.sum_total_seconds += total_per_call * calls;
                self.has_total = true;
            }
        }
    }

    /// Combine with statistics gathered from a disjoint set of runs
    pub fn merge(&mut self, other: &AggregateStat) {
        self.occurrence_count += other.occurrence_count;
        self.sum_percent_time += other.sum_percent_time;
        self.sum_self_seconds += other.sum_self_seconds;
        self.sum_calls += other.sum_calls;
        self.sum_total_seconds += other.sum_total_seconds;
        self.has_calls |= other.has_calls;
        self.has_total |= other.has_total;
    }

    /// Derive the averaged record shown in reports
    pub fn summarize(&self, name: &str) -> FunctionSummary {
        let runs = self.occurrence_count.max(1) as f64;

        let avg_self_seconds = self.sum_self_seconds / runs;
        let avg_calls = self.has_calls.then(|| self.sum_calls / runs);

        // Per-call figures need a usable call count
        let divisor = avg_calls.filter(|calls| *calls != 0.0);
        let avg_self_per_call = divisor.map(|calls| avg_self_seconds / calls);
        let avg_total_per_call = divisor
            .filter(|_| self.has_total)
            .map(|calls| (self.sum_total_seconds / runs) / calls);

        FunctionSummary {
            name: name.to_string(),
            occurrences: self.occurrence_count,
            avg_percent_time: self.sum_percent_time / runs,
            avg_self_seconds,
            avg_calls,
            avg_self_per_call,
            avg_total_per_call,
        }
    }
}

/// Averaged statistics for one function across the runs that mentioned it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSummary {
    pub name: String,

    /// Number of runs that mentioned the function
    pub occurrences: u64,

    pub avg_percent_time: f64,
    pub avg_self_seconds: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_calls: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_self_per_call: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_total_per_call: Option<f64>,
}

/// Function name -> accumulated statistics, across all runs seen so far
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregate {
    stats: HashMap<String, AggregateStat>,
}

impl Aggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold every entry of one run into the aggregate
    ///
    /// Order of runs does not matter for the resulting sums.
    pub fn accumulate(&mut self, run: &RunProfile) {
        for entry in run {
            self.stats
                .entry(entry.name.clone())
                .or_default()
                .add_entry(entry);
        }
        debug!(
            "Accumulated {} entries, {} distinct functions so far",
            run.len(),
            self.stats.len()
        );
    }

    /// Combine with an aggregate built from other runs
    pub fn merge(&mut self, other: &Aggregate) {
        for (name, stat) in &other.stats {
            self.stats.entry(name.clone()).or_default().merge(stat);
        }
    }

    pub fn get(&self, name: &str) -> Option<&AggregateStat> {
        self.stats.get(name)
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AggregateStat)> {
        self.stats.iter().map(|(name, stat)| (name.as_str(), stat))
    }

    /// Derived records for every function, in no particular order
    pub fn summaries(&self) -> Vec<FunctionSummary> {
        self.iter().map(|(name, stat)| stat.summarize(name)).collect()
    }
}

/// Functional form of [`Aggregate::accumulate`]
pub fn accumulate(mut current: Aggregate, run: &RunProfile) -> Aggregate {
    current.accumulate(run);
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, pct: f64, self_sec: f64) -> ProfileEntry {
        ProfileEntry::new(name, pct, self_sec)
    }

    #[test]
    fn test_add_entry_required_fields_only() {
        let mut stat = AggregateStat::default();
        stat.add_entry(&entry("solve", 40.0, 0.4));

        assert_eq!(stat.occurrence_count, 1);
        assert_eq!(stat.sum_percent_time, 40.0);
        assert_eq!(stat.sum_self_seconds, 0.4);
        assert!(!stat.has_calls);
        assert!(!stat.has_total);
    }

    #[test]
    fn test_total_rebuilt_from_rate_and_calls() {
        let mut stat = AggregateStat::default();
        stat.add_entry(&entry("f", 10.0, 1.0).with_calls(4.0).with_per_call(0.25, 0.5));
        stat.add_entry(&entry("f", 10.0, 1.0).with_calls(2.0).with_per_call(0.5, 1.0));

        assert_eq!(stat.sum_calls, 6.0);
        assert_eq!(stat.sum_total_seconds, 4.0);
        assert!(stat.has_total);
    }

    #[test]
    fn test_total_ignored_without_calls() {
        let mut stat = AggregateStat::default();
        let mut e = entry("f", 10.0, 1.0);
        e.total_seconds_per_call = Some(0.5);
        stat.add_entry(&e);

        assert!(!stat.has_total);
        assert_eq!(stat.sum_total_seconds, 0.0);
    }

    #[test]
    fn test_summarize_with_calls() {
        let mut stat = AggregateStat::default();
        stat.add_entry(&entry("f", 30.0, 2.0).with_calls(4.0).with_per_call(0.5, 1.0));
        stat.add_entry(&entry("f", 50.0, 4.0).with_calls(8.0).with_per_call(0.5, 1.0));

        let summary = stat.summarize("f");
        assert_eq!(summary.avg_percent_time, 40.0);
        assert_eq!(summary.avg_self_seconds, 3.0);
        assert_eq!(summary.avg_calls, Some(6.0));
        assert_eq!(summary.avg_self_per_call, Some(0.5));
        // (4 + 8) / 2 runs / 6 calls
        assert_eq!(summary.avg_total_per_call, Some(1.0));
    }

    #[test]
    fn test_summarize_zero_calls_has_no_per_call_values() {
        let mut stat = AggregateStat::default();
        stat.add_entry(&entry("f", 30.0, 2.0).with_calls(0.0).with_per_call(0.0, 0.0));

        let summary = stat.summarize("f");
        assert_eq!(summary.avg_calls, Some(0.0));
        assert!(summary.avg_self_per_call.is_none());
        assert!(summary.avg_total_per_call.is_none());
    }

    #[test]
    fn test_absent_function_not_zero_filled() {
        let mut aggregate = Aggregate::new();
        aggregate.accumulate(&RunProfile::new(vec![entry("a", 10.0, 1.0), entry("b", 20.0, 3.0)]));
        aggregate.accumulate(&RunProfile::new(vec![entry("a", 30.0, 2.0)]));
        aggregate.accumulate(&RunProfile::default());

        assert_eq!(aggregate.len(), 2);
        assert_eq!(aggregate.get("a").unwrap().occurrence_count, 2);
        assert_eq!(aggregate.get("b").unwrap().summarize("b").avg_self_seconds, 3.0);
    }

    #[test]
    fn test_merge_matches_sequential_accumulation() {
        let run_a = RunProfile::new(vec![entry("a", 10.0, 1.0).with_calls(3.0)]);
        let run_b = RunProfile::new(vec![entry("a", 30.0, 2.0), entry("b", 5.0, 0.5)]);

        let sequential = accumulate(accumulate(Aggregate::new(), &run_a), &run_b);

        let mut merged = accumulate(Aggregate::new(), &run_a);
        merged.merge(&accumulate(Aggregate::new(), &run_b));

        assert_eq!(sequential, merged);
    }
}
