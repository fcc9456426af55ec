//! Output module for analysis results
//!
//! This module holds the result record produced by an analysis and the
//! human-readable report the CLI prints for it.

mod report;
mod types;

pub use report::{format_report, print_report};
pub use types::{AnalysisResult, HeadingCounts, LinkStats};
