//! Parser for gprof-style flat profiles.
//!
//! The input is whatever the profiler printed, possibly cut short by a
//! `head`-like filter. Typical input:
//!
//! ```text
//! Flat profile:
//!
//! Each sample counts as 0.01 seconds.
//!   %   cumulative   self              self     total
//!  time   seconds   seconds    calls   s/call   s/call  name
//!  45.50      2.73     2.73   120345     0.00     0.00  kissat_search_propagate
//!  20.10      3.94     1.21     5000     0.00     0.00  kissat_analyze
//! ```
//!
//! Parsing never fails. Rows that do not look like data are skipped and a
//! profile without a header yields no entries.

use super::schema::{ProfileEntry, RunProfile};
use crate::utils::config::DEFAULT_MAX_ENTRIES;
use log::{debug, trace};

const SAMPLE_UNIT_PREFIX: &str = "Each sample counts as";

/// Flat-profile parser with a per-run entry cap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatProfileParser {
    max_entries: usize,
}

impl Default for FlatProfileParser {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

impl FlatProfileParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the number of rows kept per run. Zero keeps every row.
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Parse one profiler output into a run profile
    ///
    /// # Algorithm
    /// 1. Skip metadata until the table header, picking up the sample unit
    ///    line wherever it appears
    /// 2. Turn each following non-blank line into an entry, skipping lines
    ///    whose first three fields are not numbers
    /// 3. Stop at the first blank line once a row was accepted, at the
    ///    entry cap, or at end of input
    pub fn parse(&self, text: &str) -> RunProfile {
        let mut profile = RunProfile::default();
        let mut in_table = false;

        for line in text.lines() {
            if line.contains(SAMPLE_UNIT_PREFIX) {
                if let Some(unit) = parse_sample_unit(line) {
                    profile.sample_unit = Some(unit);
                }
                continue;
            }

            if !in_table {
                in_table = is_header_line(line);
                continue;
            }

            if line.trim().is_empty() {
                if profile.is_empty() {
                    continue;
                }
                break;
            }

            let Some(entry) = parse_row(line) else {
                trace!("Skipping non-data row: {:?}", line);
                continue;
            };

            if profile.contains(&entry.name) {
                debug!("Duplicate function '{}' in one profile, keeping first row", entry.name);
                continue;
            }

            profile.entries.push(entry);

            if self.max_entries != 0 && profile.len() >= self.max_entries {
                break;
            }
        }

        if !in_table {
            debug!("No flat-profile header found in profiler output");
        }

        profile
    }
}

/// Parse profiler output with the default entry cap
pub fn parse_flat_profile(text: &str) -> RunProfile {
    FlatProfileParser::default().parse(text)
}

/// Detect the line introducing the data table
///
/// gprof prints a two-line header; either line is accepted. If the first one
/// matches, the second one is later skipped as a non-numeric row.
fn is_header_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    if trimmed.starts_with('%') && trimmed.contains("cumulative") {
        return true;
    }

    let mut has_time = false;
    let mut has_name = false;
    for token in trimmed.split_whitespace() {
        match token {
            "time" => has_time = true,
            "name" => has_name = true,
            _ => {}
        }
    }
    has_time && has_name
}

/// Extract `<float>` from `Each sample counts as <float> seconds`
fn parse_sample_unit(line: &str) -> Option<f64> {
    let (_, rest) = line.split_once(SAMPLE_UNIT_PREFIX)?;
    let mut tokens = rest.split_whitespace();
    let value = tokens.next()?.parse::<f64>().ok()?;
    tokens
        .next()
        .filter(|unit| unit.starts_with("second"))
        .map(|_| value)
}

/// Parse one table row
///
/// The last token is the name. Everything before it is positional:
/// percent, cumulative, self, then the optional calls, self/call and
/// total/call columns.
fn parse_row(line: &str) -> Option<ProfileEntry> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let (name, numbers) = tokens.split_last()?;

    if numbers.len() < 3 {
        return None;
    }

    let percent_time = parse_number(numbers[0])?;
    let cumulative_seconds = parse_number(numbers[1])?;
    let self_seconds = parse_number(numbers[2])?;

    // A bad optional field only drops that field
    let optional = |index: usize| numbers.get(index).copied().and_then(parse_number);

    Some(ProfileEntry {
        percent_time,
        cumulative_seconds,
        self_seconds,
        calls: optional(3),
        self_seconds_per_call: optional(4),
        total_seconds_per_call: optional(5),
        name: (*name).to_string(),
    })
}

fn parse_number(token: &str) -> Option<f64> {
    token.parse::<f64>().ok()
}
