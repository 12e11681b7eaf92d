//! Flat-profile parsing.
//!
//! This module handles:
//! - Finding the data table in raw profiler output
//! - Turning table rows into `ProfileEntry` records
//! - Capturing the sample unit line

pub mod flat_profile;
pub mod schema;

// Re-export main types
pub use flat_profile::{parse_flat_profile, FlatProfileParser};
pub use schema::{ProfileEntry, RunProfile};
