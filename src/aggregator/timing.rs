//! Solve-time statistics across the corpus.
//!
//! Every timed run counts here, whether or not its profile was usable.

/// Summary of elapsed solver times
#[derive(Debug, Clone, PartialEq)]
pub struct TimingSummary {
    pub run_count: usize,
    pub total_seconds: f64,
    pub mean_seconds: f64,
    pub min_seconds: f64,
    pub max_seconds: f64,
}

impl TimingSummary {
    /// Get human-readable summary
    ///
    /// **Public** - for logging and debugging
    pub fn summary(&self) -> String {
        format!(
            "Runs: {} | Total: {:.3}s | Mean: {:.3}s | Min: {:.3}s | Max: {:.3}s",
            self.run_count, self.total_seconds, self.mean_seconds, self.min_seconds, self.max_seconds
        )
    }
}

/// Summarize elapsed times, `None` when nothing was timed
pub fn summarize_timings(elapsed: &[f64]) -> Option<TimingSummary> {
    if elapsed.is_empty() {
        return None;
    }

    let total_seconds: f64 = elapsed.iter().sum();
    let min_seconds = elapsed.iter().copied().fold(f64::INFINITY, f64::min);
    let max_seconds = elapsed.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Some(TimingSummary {
        run_count: elapsed.len(),
        total_seconds,
        mean_seconds: total_seconds / elapsed.len() as f64,
        min_seconds,
        max_seconds,
    })
}
