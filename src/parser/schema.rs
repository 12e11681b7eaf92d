//! Records produced by the flat-profile parser.
//!
//! These only live for the duration of one run: the aggregator consumes
//! them right after parsing.

/// One row of a flat profile for one run
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileEntry {
    /// Percentage of total runtime attributed to this function
    pub percent_time: f64,

    /// Cumulative seconds including this and all higher-ranked entries
    pub cumulative_seconds: f64,

    /// Seconds spent in this function alone
    pub self_seconds: f64,

    /// Number of invocations (absent when the profile has no calls column)
    pub calls: Option<f64>,

    /// Self seconds per call as reported by the profiler
    pub self_seconds_per_call: Option<f64>,

    /// Self plus descendants seconds per call as reported by the profiler
    pub total_seconds_per_call: Option<f64>,

    /// Unqualified symbol name, the aggregation key
    pub name: String,
}

impl ProfileEntry {
    /// Create an entry with only the required columns
    pub fn new(name: impl Into<String>, percent_time: f64, self_seconds: f64) -> Self {
        Self {
            percent_time,
            cumulative_seconds: 0.0,
            self_seconds,
            calls: None,
            self_seconds_per_call: None,
            total_seconds_per_call: None,
            name: name.into(),
        }
    }

    pub fn with_calls(mut self, calls: f64) -> Self {
        self.calls = Some(calls);
        self
    }

    pub fn with_per_call(mut self, self_per_call: f64, total_per_call: f64) -> Self {
        self.self_seconds_per_call = Some(self_per_call);
        self.total_seconds_per_call = Some(total_per_call);
        self
    }
}

/// Flat-profile rows parsed from one solver invocation
///
/// An empty profile is a valid "no data" run: the profiler was missing,
/// crashed, or printed nothing usable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunProfile {
    /// Rows in the profiler's own ranking order, names unique
    pub entries: Vec<ProfileEntry>,

    /// Seconds represented by one sample, if the profiler said so
    pub sample_unit: Option<f64>,
}

impl RunProfile {
    pub fn new(entries: Vec<ProfileEntry>) -> Self {
        Self {
            entries,
            sample_unit: None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProfileEntry> {
        self.entries.iter()
    }

    /// Check whether a function name was already recorded for this run
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }
}

impl<'a> IntoIterator for &'a RunProfile {
    type Item = &'a ProfileEntry;
    type IntoIter = std::slice::Iter<'a, ProfileEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
