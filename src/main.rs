//! Solver Bench CLI
//!
//! Runs a solver over a corpus of problem files, profiles each run with
//! gprof, and writes an aggregated timing and hot-function report.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use solver_bench::commands::{
    display_config, display_version, execute_bench, execute_summarize, validate_args, BenchArgs,
    ConfigOverrides,
};
use solver_bench::report::{Column, ReportLayout, SortKey};
use solver_bench::utils::config::{load_config, BenchConfig, PROFILER_ENV_VAR};

/// Solver Bench - timing and gprof aggregation for solver corpora
#[derive(Parser, Debug)]
#[command(name = "solver-bench")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the solver on every corpus file and write a report
    Bench {
        /// Solver binary (compiled with -pg for profiling)
        solver: PathBuf,

        /// Directory with input problem files
        corpus_dir: PathBuf,

        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Value passed to the solver as --nThreads (0 omits the flag)
        #[arg(short, long)]
        threads: Option<usize>,

        /// Number of functions in the report
        #[arg(long)]
        top_k: Option<usize>,

        /// Maximum flat-profile rows kept per run (0 = all)
        #[arg(long)]
        max_entries: Option<usize>,

        /// Skip profiling, report timing only
        #[arg(long)]
        no_profile: bool,

        /// Give every run its own gmon file (GMON_OUT_PREFIX)
        #[arg(long)]
        isolate: bool,

        /// Profiler executable
        #[arg(long, env = PROFILER_ENV_VAR)]
        profiler: Option<PathBuf>,

        /// Profile data file of non-isolated runs (default: gmon.out)
        #[arg(long)]
        gmon_file: Option<PathBuf>,

        /// Keep only the first N lines of profiler output (0 = all)
        #[arg(long)]
        head_lines: Option<usize>,

        /// Only run corpus files with this extension
        #[arg(short, long)]
        extension: Option<String>,

        /// Plural noun for corpus items in the report
        #[arg(long)]
        item_label: Option<String>,

        /// Report layout
        #[arg(long, value_enum)]
        layout: Option<ReportLayout>,

        /// Ranking metric
        #[arg(long, value_enum)]
        sort_by: Option<SortKey>,

        /// Columns of the flat-profile layout (comma separated)
        #[arg(long, value_enum, value_delimiter = ',')]
        columns: Option<Vec<Column>>,

        /// Directory for the text report (default: benchmarks_<suffix>)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Also write the report as JSON
        #[arg(long)]
        json: Option<PathBuf>,

        /// Print the report to stdout
        #[arg(long)]
        stdout: bool,

        /// Print the effective configuration and exit
        #[arg(long)]
        show_config: bool,
    },

    /// Combine previously written reports from a directory
    Summarize {
        /// Directory with report files
        directory: PathBuf,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Bench {
            solver,
            corpus_dir,
            config,
            threads,
            top_k,
            max_entries,
            no_profile,
            isolate,
            profiler,
            gmon_file,
            head_lines,
            extension,
            item_label,
            layout,
            sort_by,
            columns,
            output_dir,
            json,
            stdout,
            show_config,
        } => {
            let mut bench_config = match &config {
                Some(path) => load_config(path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?,
                None => BenchConfig::default(),
            };

            ConfigOverrides {
                capture_profile: no_profile.then_some(false),
                top_k,
                per_run_isolation: isolate.then_some(true),
                max_entries_per_run: max_entries,
                head_lines,
                profiler,
                gmon_file,
                threads,
                extension,
                item_label,
                layout,
                sort_key: sort_by,
                columns,
            }
            .apply(&mut bench_config);

            if show_config {
                return display_config(&bench_config);
            }

            let args = BenchArgs {
                solver,
                corpus_dir,
                config: bench_config,
                output_dir,
                output_json: json,
                print_report: stdout,
            };

            // Validate args first
            validate_args(&args)?;

            execute_bench(args)?;
        }

        Commands::Summarize { directory } => {
            let summary = execute_summarize(&directory)
                .with_context(|| format!("Failed to summarize {}", directory.display()))?;
            println!("{}", summary.render());
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
