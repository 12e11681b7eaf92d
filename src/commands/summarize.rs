//! Summarize command implementation.
//!
//! Reads a directory of previously written reports and combines them: the
//! mean of their average solving times, and the mean percent time of each
//! function found in a flat-profile table.
//!
//! Only the `% time` column of a table is read. Reports in the short
//! `Top K functions:` layout carry no percentages and contribute timing only.

use crate::utils::error::SummaryError;
use log::{debug, warn};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const AVERAGE_MARKER: &str = "Average solving time";

/// Header token of the percent-time column
const PERCENT_HEADER: &str = "time";

/// Header token closing the table header line
const NAME_HEADER: &str = "name";

/// Values extracted from one report file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportDigest {
    pub average_solve_time: f64,

    /// Function name -> `% time` cell of its table row
    pub functions: HashMap<String, f64>,
}

/// Combined view over several reports
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusSummary {
    pub report_count: usize,
    pub average_solve_time: f64,

    /// Per-function mean percent time, highest first
    pub function_averages: Vec<(String, f64)>,
}

impl CorpusSummary {
    /// Function with the highest mean percent time
    pub fn hottest(&self) -> Option<(&str, f64)> {
        self.function_averages
            .first()
            .map(|(name, value)| (name.as_str(), *value))
    }

    /// Lines printed by the summarize command
    pub fn render(&self) -> String {
        let mut lines = Vec::new();
        match self.hottest() {
            Some((name, value)) => lines.push(format!(
                "Function consuming most average % time: {} ({:.2}%)",
                name, value
            )),
            None => lines.push("No percent-time data in the reports".to_string()),
        }
        lines.push(format!(
            "Average solving time across all files: {:.3} seconds",
            self.average_solve_time
        ));
        lines.join("\n")
    }
}

/// Extract the timing line and the table's percent-time cells
///
/// Returns `None` when the text has no `Average solving time` line.
pub fn parse_report_text(text: &str) -> Option<ReportDigest> {
    let average_solve_time = text
        .lines()
        .filter(|line| line.contains(AVERAGE_MARKER))
        .find_map(parse_average_line)?;

    Some(ReportDigest {
        average_solve_time,
        functions: parse_percent_column(text),
    })
}

/// `Average solving time for 3 CNFs: 2.000 seconds` -> 2.0
fn parse_average_line(line: &str) -> Option<f64> {
    let (_, rest) = line.split_once(':')?;
    let mut tokens = rest.split_whitespace();
    let value = tokens.next()?.parse::<f64>().ok()?;
    (tokens.next()? == "seconds").then_some(value)
}

/// Read `% time` cells from the first flat-profile table in `text`
///
/// The column is located through the `time` token of the header line that
/// ends in `name`. A row's cell is the token overlapping that header token,
/// so blank cells in other columns do not shift it.
fn parse_percent_column(text: &str) -> HashMap<String, f64> {
    let mut functions = HashMap::new();
    let mut column: Option<(usize, usize)> = None;

    for line in text.lines() {
        let tokens = token_spans(line);

        let Some((start, end)) = column else {
            if tokens.last().map(|t| t.2) == Some(NAME_HEADER) {
                column = tokens
                    .iter()
                    .find(|t| t.2 == PERCENT_HEADER)
                    .map(|t| (t.0, t.1));
            }
            continue;
        };

        if tokens.is_empty() {
            if functions.is_empty() {
                continue;
            }
            break;
        }

        let Some((name, cells)) = tokens.split_last() else {
            continue;
        };
        let value = cells
            .iter()
            .find(|t| t.0 < end && t.1 > start)
            .and_then(|t| t.2.parse::<f64>().ok());

        match value {
            Some(value) => {
                functions.entry(name.2.to_string()).or_insert(value);
            }
            None => debug!("No percent time in row {:?}", line),
        }
    }

    functions
}

/// Whitespace-separated tokens with their byte ranges
fn token_spans(line: &str) -> Vec<(usize, usize, &str)> {
    let mut spans = Vec::new();
    let mut start = None;

    for (i, c) in line.char_indices() {
        match (c.is_whitespace(), start) {
            (false, None) => start = Some(i),
            (true, Some(s)) => {
                spans.push((s, i, &line[s..i]));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push((s, line.len(), &line[s..]));
    }

    spans
}

/// Combine digests into one summary
///
/// # Errors
/// * `SummaryError::NoData` - no report had a timing line
pub fn summarize_digests(digests: &[ReportDigest]) -> Result<CorpusSummary, SummaryError> {
    if digests.is_empty() {
        return Err(SummaryError::NoData);
    }

    let mut per_function: HashMap<&str, (f64, usize)> = HashMap::new();
    for digest in digests {
        for (name, value) in &digest.functions {
            let slot = per_function.entry(name.as_str()).or_insert((0.0, 0));
            slot.0 += value;
            slot.1 += 1;
        }
    }

    let mut function_averages: Vec<(String, f64)> = per_function
        .into_iter()
        .map(|(name, (sum, count))| (name.to_string(), sum / count as f64))
        .collect();
    function_averages.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let average_solve_time =
        digests.iter().map(|d| d.average_solve_time).sum::<f64>() / digests.len() as f64;

    Ok(CorpusSummary {
        report_count: digests.len(),
        average_solve_time,
        function_averages,
    })
}

/// Execute the summarize command over a directory of reports
///
/// Files that cannot be read or carry no timing line are skipped with a
/// warning.
pub fn execute_summarize(directory: &Path) -> Result<CorpusSummary, SummaryError> {
    let entries = fs::read_dir(directory).map_err(|source| SummaryError::ReadFailed {
        path: directory.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<_> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    let mut digests = Vec::new();
    for path in paths {
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                continue;
            }
        };

        match parse_report_text(&text) {
            Some(digest) => {
                debug!("{}: {} functions", path.display(), digest.functions.len());
                digests.push(digest);
            }
            None => warn!("{}", SummaryError::MissingAverage(path)),
        }
    }

    let summary = summarize_digests(&digests)?;
    if summary.function_averages.is_empty() {
        warn!("No flat-profile table found, summary has timing only");
    }
    Ok(summary)
}
