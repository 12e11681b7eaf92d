//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod bench;
pub mod models;
pub mod summarize;
pub mod utils;

// Re-export main command functions
pub use bench::{execute_bench, validate_args, BenchOutcome};
pub use models::{BenchArgs, ConfigOverrides};
pub use summarize::{execute_summarize, CorpusSummary};
pub use utils::{display_config, display_version};
