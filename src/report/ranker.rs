//! Ranking of aggregated functions.

use crate::aggregator::{Aggregate, FunctionSummary};
use clap::ValueEnum;
use log::debug;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Metric used to order functions in the report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Average self seconds
    #[default]
    SelfSeconds,
    /// Average percentage of runtime
    PercentTime,
    /// Average number of calls
    Calls,
}

impl SortKey {
    /// Value of this metric for a function, if the data carried it
    pub fn metric(&self, summary: &FunctionSummary) -> Option<f64> {
        match self {
            SortKey::SelfSeconds => Some(summary.avg_self_seconds),
            SortKey::PercentTime => Some(summary.avg_percent_time),
            SortKey::Calls => summary.avg_calls,
        }
    }
}

/// Select the top `top_k` functions by `sort_key`, highest first
///
/// Ties are broken by name so the ranking is reproducible. Functions
/// without a value for the metric go last.
pub fn rank(aggregate: &Aggregate, sort_key: SortKey, top_k: usize) -> Vec<FunctionSummary> {
    debug!(
        "Ranking {} functions by {:?}, keeping {}",
        aggregate.len(),
        sort_key,
        top_k
    );

    let mut summaries = aggregate.summaries();
    summaries.sort_by(|a, b| compare(sort_key, a, b));
    summaries.truncate(top_k);
    summaries
}

fn compare(sort_key: SortKey, a: &FunctionSummary, b: &FunctionSummary) -> Ordering {
    let by_metric = match (sort_key.metric(a), sort_key.metric(b)) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_metric.then_with(|| a.name.cmp(&b.name))
}
