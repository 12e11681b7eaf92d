//! Text rendering of a report.
//!
//! Absent optional values are rendered as blank padded fields, never as
//! zero, so the table does not imply data the profiler did not provide.

use super::model::Report;
use crate::aggregator::FunctionSummary;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Layout of the section below the timing line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ReportLayout {
    /// Flat-profile table when call counts are available, short list otherwise
    #[default]
    Auto,
    /// `Top <K> functions:` followed by `<metric> <name>` lines
    TopFunctions,
    /// Fixed-width table mirroring a gprof flat profile
    FlatProfile,
}

/// Numeric column of the flat-profile layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Column {
    PercentTime,
    CumulativeSeconds,
    SelfSeconds,
    Calls,
    SelfPerCall,
    TotalPerCall,
}

impl Column {
    pub const ALL: [Column; 6] = [
        Column::PercentTime,
        Column::CumulativeSeconds,
        Column::SelfSeconds,
        Column::Calls,
        Column::SelfPerCall,
        Column::TotalPerCall,
    ];

    fn width(&self) -> usize {
        match self {
            Column::PercentTime => 6,
            Column::CumulativeSeconds => 10,
            Column::SelfSeconds => 9,
            Column::Calls => 9,
            Column::SelfPerCall | Column::TotalPerCall => 8,
        }
    }

    /// Two header lines, gprof style
    fn headers(&self) -> (&'static str, &'static str) {
        match self {
            Column::PercentTime => ("%", "time"),
            Column::CumulativeSeconds => ("cumulative", "seconds"),
            Column::SelfSeconds => ("self", "seconds"),
            Column::Calls => ("", "calls"),
            Column::SelfPerCall => ("self", "s/call"),
            Column::TotalPerCall => ("total", "s/call"),
        }
    }

    /// Cell text before padding, `None` for an absent value
    fn value(&self, summary: &FunctionSummary, cumulative: f64) -> Option<String> {
        match self {
            Column::PercentTime => Some(format!("{:.2}", summary.avg_percent_time)),
            Column::CumulativeSeconds => Some(format!("{:.2}", cumulative)),
            Column::SelfSeconds => Some(format!("{:.2}", summary.avg_self_seconds)),
            Column::Calls => summary.avg_calls.map(|calls| format!("{}", calls.trunc() as u64)),
            Column::SelfPerCall => summary.avg_self_per_call.map(|v| format!("{:.2}", v)),
            Column::TotalPerCall => summary.avg_total_per_call.map(|v| format!("{:.2}", v)),
        }
    }
}

/// Rendering options
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub layout: ReportLayout,
    pub columns: Vec<Column>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            layout: ReportLayout::default(),
            columns: Column::ALL.to_vec(),
        }
    }
}

/// Render the report as text
///
/// **Public** - main entry point for report text
///
/// The first line is always the timing summary. The function section is
/// omitted when no run produced profile data.
pub fn render_report(report: &Report, options: &RenderOptions) -> String {
    let mut lines = vec![format!(
        "Average solving time for {} {}: {:.3} seconds",
        report.run_count, report.item_label, report.average_solve_time
    )];

    if report.has_profile_data() {
        lines.push(String::new());
        match resolve_layout(report, options.layout) {
            ReportLayout::FlatProfile => render_flat_profile(report, &options.columns, &mut lines),
            _ => render_top_functions(report, &mut lines),
        }
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Pick a concrete layout for `Auto`
fn resolve_layout(report: &Report, layout: ReportLayout) -> ReportLayout {
    match layout {
        ReportLayout::Auto => {
            if report.top_functions.iter().any(|f| f.avg_calls.is_some()) {
                ReportLayout::FlatProfile
            } else {
                ReportLayout::TopFunctions
            }
        }
        other => other,
    }
}

fn render_top_functions(report: &Report, lines: &mut Vec<String>) {
    lines.push(format!("Top {} functions:", report.top_functions.len()));

    for function in &report.top_functions {
        let metric = report
            .sort_key
            .metric(function)
            .map(|v| format!("{:.6}", v))
            .unwrap_or_default();
        lines.push(format!("{} {}", metric, function.name));
    }
}

fn render_flat_profile(report: &Report, columns: &[Column], lines: &mut Vec<String>) {
    if let Some(unit) = report.sample_unit {
        lines.push(format!("Each sample counts as {:.2} seconds.", unit));
    }

    let header = |pick: fn((&'static str, &'static str)) -> &'static str| -> String {
        columns
            .iter()
            .map(|c| format!("{:>width$}", pick(c.headers()), width = c.width()))
            .collect::<Vec<_>>()
            .join(" ")
    };
    lines.push(header(|h| h.0).trim_end().to_string());
    lines.push(format!("{}  name", header(|h| h.1)));

    // Running total over the ranked subset only
    let mut cumulative = 0.0;
    for function in &report.top_functions {
        cumulative += function.avg_self_seconds;

        let cells: Vec<String> = columns
            .iter()
            .map(|c| {
                let value = c.value(function, cumulative).unwrap_or_default();
                format!("{:>width$}", value, width = c.width())
            })
            .collect();

        lines.push(format!("{}  {}", cells.join(" "), function.name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::SortKey;
    use pretty_assertions::assert_eq;

    fn summary(name: &str, self_sec: f64, calls: Option<f64>) -> FunctionSummary {
        FunctionSummary {
            name: name.to_string(),
            occurrences: 1,
            avg_percent_time: self_sec * 100.0,
            avg_self_seconds: self_sec,
            avg_calls: calls,
            avg_self_per_call: calls.filter(|c| *c != 0.0).map(|c| self_sec / c),
            avg_total_per_call: None,
        }
    }

    fn report(top_functions: Vec<FunctionSummary>) -> Report {
        Report {
            version: "1.0.0".to_string(),
            item_label: "CNFs".to_string(),
            run_count: 2,
            average_solve_time: 1.5,
            profiled_runs: 2,
            sample_unit: Some(0.01),
            sort_key: SortKey::SelfSeconds,
            top_functions,
            generated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_timing_only() {
        let text = render_report(&report(vec![]), &RenderOptions::default());
        assert_eq!(text, "Average solving time for 2 CNFs: 1.500 seconds\n");
    }

    #[test]
    fn test_auto_picks_top_functions_without_calls() {
        let text = render_report(
            &report(vec![summary("solve", 0.5, None), summary("parse", 0.25, None)]),
            &RenderOptions::default(),
        );
        assert_eq!(
            text,
            "Average solving time for 2 CNFs: 1.500 seconds\n\
             \n\
             Top 2 functions:\n\
             0.500000 solve\n\
             0.250000 parse\n"
        );
    }

    #[test]
    fn test_flat_profile_table() {
        let text = render_report(
            &report(vec![summary("propagate", 0.5, Some(5.0)), summary("analyze", 0.25, None)]),
            &RenderOptions::default(),
        );
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[2], "Each sample counts as 0.01 seconds.");
        assert_eq!(lines[3], "     % cumulative      self               self    total");
        assert_eq!(
            lines[4],
            "  time    seconds   seconds     calls   s/call   s/call  name"
        );
        assert_eq!(
            lines[5],
            " 50.00       0.50      0.50         5     0.10           propagate"
        );
        assert_eq!(
            lines[6],
            " 25.00       0.75      0.25                              analyze"
        );
    }

    #[test]
    fn test_custom_columns() {
        let options = RenderOptions {
            layout: ReportLayout::FlatProfile,
            columns: vec![Column::PercentTime, Column::SelfSeconds],
        };
        let text = render_report(&report(vec![summary("solve", 0.5, None)]), &options);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[3], "     %      self");
        assert_eq!(lines[4], "  time   seconds  name");
        assert_eq!(lines[5], " 50.00      0.50  solve");
    }

    #[test]
    fn test_forced_top_functions_layout() {
        let options = RenderOptions {
            layout: ReportLayout::TopFunctions,
            ..Default::default()
        };
        let text = render_report(&report(vec![summary("solve", 0.5, Some(2.0))]), &options);
        assert!(text.contains("Top 1 functions:\n0.500000 solve\n"));
        assert!(!text.contains("s/call"));
    }
}
