//! Bench command implementation.
//!
//! The bench command:
//! 1. Enumerates the corpus directory
//! 2. Runs and times the solver on every item, capturing the profiler's
//!    flat profile after each run
//! 3. Aggregates the runs, ranks functions and renders the report
//! 4. Writes output files

use super::models::BenchArgs;
use crate::output::{default_output_dir, report_file_name, report_suffix, write_report, write_report_json};
use crate::report::{render_report, RenderOptions, Report, ReportBuilder, ReportOptions};
use crate::runner::{discover_corpus, ProfilerCollector, SolverRunner};
use crate::utils::config::GMON_PREFIX_STEM;
use anyhow::{Context, Result};
use chrono::Local;
use log::{debug, info, warn};
use std::path::PathBuf;
use std::time::Instant;

/// What a finished benchmark produced
#[derive(Debug, Clone)]
pub struct BenchOutcome {
    pub report: Report,

    /// Rendered report text
    pub text: String,

    /// Where the text report was written
    pub report_path: PathBuf,
}

/// Execute the bench command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Unreadable corpus directory
/// * No completed run (empty corpus, or the solver never started)
/// * File write errors
///
/// A run the solver could not complete is skipped with a warning. Profiler
/// problems are never errors: the report falls back to timing only.
pub fn execute_bench(args: BenchArgs) -> Result<BenchOutcome> {
    let start_time = Instant::now();
    let config = &args.config;

    info!("Benchmarking {} on {}", args.solver.display(), args.corpus_dir.display());

    // Step 1: Enumerate corpus
    info!("Step 1/4: Searching for input files in {}...", args.corpus_dir.display());
    let items = discover_corpus(&args.corpus_dir, config.extension.as_deref())
        .context("Failed to enumerate corpus")?;
    info!("Found {} files", items.len());

    // Per-run profile files live in a scratch directory removed on drop
    let gmon_dir = if config.capture_profile && config.per_run_isolation {
        Some(
            tempfile::Builder::new()
                .prefix("solver-bench-gmon")
                .tempdir()
                .context("Failed to create directory for per-run profile data")?,
        )
    } else {
        None
    };

    let mut runner = SolverRunner::new(&args.solver)
        .with_threads(config.threads)
        .with_gmon_file(&config.gmon_file);
    if let Some(dir) = &gmon_dir {
        runner = runner.with_gmon_prefix(dir.path().join(GMON_PREFIX_STEM));
    }

    let collector = config.capture_profile.then(|| {
        ProfilerCollector::new(&args.solver)
            .with_profiler(&config.profiler)
            .with_head_lines(config.head_lines)
    });

    // Step 2: Run, time and profile every item
    info!("Step 2/4: Running solver...");
    let mut builder = ReportBuilder::new(ReportOptions::from(config));

    for (index, item) in items.iter().enumerate() {
        info!("[{}/{}] Solving {}", index + 1, items.len(), item.display());

        if collector.is_some() {
            if let Err(e) = runner.clear_shared_profile() {
                warn!("Could not remove stale profile data: {}", e);
            }
        }

        let run = match runner.run(item) {
            Ok(run) => run,
            Err(e) => {
                warn!("Skipping {}: {:#}", item.display(), anyhow::Error::from(e));
                continue;
            }
        };
        info!("    Time: {:.3}s", run.elapsed_seconds);

        let profiler_output = match &collector {
            Some(collector) => {
                let gmon_file = runner.gmon_file(&run);
                let text = collector.collect(&gmon_file);
                if let Err(e) = std::fs::remove_file(&gmon_file) {
                    debug!("Could not remove {}: {}", gmon_file.display(), e);
                }
                text
            }
            None => String::new(),
        };

        let parsed = builder.add_run(run.elapsed_seconds, &profiler_output);
        debug!("    Profile entries: {}", parsed);
    }

    // Step 3: Aggregate and rank
    info!("Step 3/4: Aggregating {} runs...", builder.run_count());
    let report = builder
        .finish()
        .with_context(|| format!("No completed runs for {}", args.corpus_dir.display()))?;

    info!("Average time: {:.3}s", report.average_solve_time);
    if config.capture_profile && !report.has_profile_data() {
        warn!("No profile data collected, report contains timing only");
    }

    let text = render_report(
        &report,
        &RenderOptions {
            layout: config.layout,
            columns: config.columns.clone(),
        },
    );

    // Step 4: Write outputs
    info!("Step 4/4: Writing output files...");
    let suffix = report_suffix(&args.corpus_dir);
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| default_output_dir(&args.corpus_dir));
    let report_path = output_dir.join(report_file_name(&suffix, &Local::now()));

    write_report(&text, &report_path).context("Failed to write report")?;
    info!("✓ Report written to: {}", report_path.display());

    if let Some(json_path) = &args.output_json {
        write_report_json(&report, json_path).context("Failed to write JSON report")?;
        info!("✓ JSON report written to: {}", json_path.display());
    }

    if args.print_report {
        println!("{}", text);
    }

    info!("Benchmark completed in {:.2}s", start_time.elapsed().as_secs_f64());

    Ok(BenchOutcome {
        report,
        text,
        report_path,
    })
}

/// Validate bench arguments
///
/// **Public** - can be called before execute_bench for early validation
pub fn validate_args(args: &BenchArgs) -> Result<()> {
    if args.solver.as_os_str().is_empty() {
        anyhow::bail!("Solver path cannot be empty");
    }

    // Bare names are resolved through PATH at spawn time
    if args.solver.components().count() > 1 && !args.solver.is_file() {
        anyhow::bail!("Solver binary not found: {}", args.solver.display());
    }

    if !args.corpus_dir.is_dir() {
        anyhow::bail!("Corpus directory not found: {}", args.corpus_dir.display());
    }

    args.config.validate().context("Invalid configuration")?;

    Ok(())
}
