//! # sqlgrade
//!
//! Grades SQL homework by running each submission and its reference answer
//! through the duckdb or sqlite3 command-line client and comparing what they
//! print.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Locating the reference answer for a submission
pub mod answer;
/// Running scripts through database clients
pub mod client;
/// Output normalization and comparison
pub mod compare;
/// Client and grading-run settings
pub mod config;
/// A module defining constant values used throughout
pub mod constants;
/// The database engines a file can target
pub mod engine;
/// The grading pass
pub mod grade;
/// Subprocess plumbing
pub mod process;
/// Console output
pub mod report;
/// Points per submission file
pub mod scores;
/// Finding and parsing submission files
pub mod submission;

use anyhow::Result;
use config::GraderConfig;
use grade::GradeReport;

/// Grades everything under `config.root_dir()` and prints the summary.
pub async fn run(config: &GraderConfig) -> Result<GradeReport> {
    let report = grade::grade(config).await?;
    report::summary(&report);
    Ok(report)
}
