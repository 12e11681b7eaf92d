//! External process orchestration: the solver, the profiler and the corpus.

pub mod corpus;
pub mod profiler;
pub mod solver;

pub use corpus::discover_corpus;
pub use profiler::{truncate_lines, ProfilerCollector};
pub use solver::{SolverRun, SolverRunner};
