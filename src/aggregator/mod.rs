//! Aggregation of per-run data into corpus-wide statistics.
//!
//! This module transforms parsed run profiles and elapsed times into:
//! - Per-function running sums keyed by function name
//! - Averaged per-function records for reporting
//! - Solve-time statistics

pub mod stats;
pub mod timing;

// Re-export main types and functions
pub use stats::{accumulate, Aggregate, AggregateStat, FunctionSummary};
pub use timing::{summarize_timings, TimingSummary};
