//! Solver Bench
//!
//! Benchmarks a solver binary over a corpus of input problems, captures a
//! gprof flat profile per run, and aggregates timing and per-function
//! statistics into a single report.
//!
//! The core is pure: `(elapsed time, profiler text)` pairs go in through
//! [`report::build_report`] and a [`report::Report`] comes out. Process
//! handling lives in [`runner`] and [`commands`].
//!
//! ## Getting Started
//!
//! ```bash
//! cargo install --path .
//! solver-bench bench ./solver ./cnf_easy --threads 4
//! ```

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod report;
pub mod runner;
pub mod utils;
