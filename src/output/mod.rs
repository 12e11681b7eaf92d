//! Output writers for benchmark reports.
//!
//! This module handles writing data to disk in various formats:
//! - Text reports with timestamped file names
//! - JSON reports

pub mod json;
pub mod text;

// Re-export main functions
pub use json::{read_report_json, write_report_json};
pub use text::{default_output_dir, report_file_name, report_suffix, write_report};
