//! Ranking and rendering of the final benchmark report.
//!
//! Flow: collected runs -> `ReportBuilder` -> `Report` -> `render_report`.

pub mod model;
pub mod ranker;
pub mod render;

// Re-export main types
pub use model::{build_report, Report, ReportBuilder, ReportOptions};
pub use ranker::{rank, SortKey};
pub use render::{render_report, Column, RenderOptions, ReportLayout};
