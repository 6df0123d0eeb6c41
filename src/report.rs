#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Console output for graders.

use std::path::Path;

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use crate::grade::{FileResult, GradeReport, Outcome};

/// Divider printed around each file's block.
const RULE: &str = "*******************************";

/// One row of the summary table.
#[derive(Tabled)]
struct SummaryRow {
    /// Submission file name.
    #[tabled(rename = "File")]
    file:    String,
    /// Answer compared against.
    #[tabled(rename = "Answer")]
    answer:  String,
    /// Short outcome label.
    #[tabled(rename = "Result")]
    result:  &'static str,
    /// Points awarded.
    #[tabled(rename = "Points")]
    points:  u32,
    /// Seconds spent on the file.
    #[tabled(rename = "Seconds")]
    seconds: String,
}

impl From<&FileResult> for SummaryRow {
    fn from(result: &FileResult) -> Self {
        Self {
            file:    result.file.clone(),
            answer:  result.answer.display().to_string(),
            result:  outcome_label(&result.outcome),
            points:  result.points,
            seconds: format!("{:.4}", result.elapsed.as_secs_f64()),
        }
    }
}

/// Short label for an outcome.
fn outcome_label(outcome: &Outcome) -> &'static str {
    match outcome {
        Outcome::Passed => "passed",
        Outcome::Mismatch { .. } => "mismatch",
        Outcome::ExecutionFailed { .. } => "error",
    }
}

/// Colors diff lines by their `-`/`+` marker.
fn colorize_diff(diff: &str) -> String {
    diff.lines()
        .map(|line| {
            if line.starts_with('-') {
                line.red().to_string()
            } else if line.starts_with('+') {
                line.green().to_string()
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Announces that `file` is about to be graded against `answer`.
pub fn attempt(file: &str, answer: &Path) {
    println!("{RULE}");
    println!("testing {} with answer file {}", file.bold(), answer.display());
}

/// Prints how a file fared and how long it took.
pub fn file_result(result: &FileResult) {
    match &result.outcome {
        Outcome::Passed => println!("{} passed!", result.file.green()),
        Outcome::Mismatch { diff } => {
            println!("Differences found for: {}", result.file.red());
            eprintln!("{}", colorize_diff(diff));
        }
        Outcome::ExecutionFailed { reason } => {
            println!("Could not run {}", result.file.red());
            eprintln!("{reason}");
        }
    }
    println!("spent {:.4} seconds", result.elapsed.as_secs_f64());
    println!("{RULE}");
    println!();
}

/// Renders the per-file summary table.
pub fn summary_table(report: &GradeReport) -> String {
    Table::new(report.results.iter().map(SummaryRow::from))
        .with(Style::modern())
        .to_string()
}

/// Lines of the closing summary: the final score and, short of full marks,
/// every file that did not pass.
pub fn summary_lines(report: &GradeReport) -> Vec<String> {
    let mut lines = vec![format!("Final score: {}", report.total())];
    if !report.is_perfect() {
        lines.push("Files that did not pass:".to_owned());
        lines.extend(report.failed().into_iter().map(str::to_owned));
    }
    lines
}

/// Prints the summary table, final score and failed files.
pub fn summary(report: &GradeReport) {
    if !report.results.is_empty() {
        println!("{}", summary_table(report));
    }
    println!();
    for line in summary_lines(report) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use std::{path::PathBuf, time::Duration};

    use super::*;

    fn report(outcomes: Vec<(&str, Outcome, u32)>) -> GradeReport {
        GradeReport {
            results: outcomes
                .into_iter()
                .map(|(file, outcome, points)| FileResult {
                    file: file.to_owned(),
                    answer: PathBuf::from("ans").join(file),
                    outcome,
                    points,
                    elapsed: Duration::from_millis(250),
                })
                .collect(),
            skipped: vec![],
        }
    }

    #[test]
    fn lists_failures_when_short_of_full_marks() {
        let report = report(vec![
            ("q2_beatles_uk_releases.duckdb.sql", Outcome::Passed, 5),
            (
                "q5_elvis_best_month.duckdb.sql",
                Outcome::Mismatch {
                    diff: "- 1\n+ 2\n".into(),
                },
                0,
            ),
        ]);

        assert_eq!(
            summary_lines(&report),
            ["Final score: 5", "Files that did not pass:", "q5_elvis_best_month.duckdb.sql"]
        );
    }

    #[test]
    fn full_marks_print_only_the_score() {
        let report = report(vec![("q1_all.duckdb.sql", Outcome::Passed, 100)]);
        assert_eq!(summary_lines(&report), ["Final score: 100"]);
    }

    #[test]
    fn table_has_a_row_per_file() {
        let report = report(vec![
            ("q1_sample.duckdb.sql", Outcome::Passed, 0),
            (
                "q2_beatles_uk_releases.sqlite.sql",
                Outcome::ExecutionFailed {
                    reason: "exit 1".into(),
                },
                0,
            ),
        ]);

        let table = summary_table(&report);
        assert!(table.contains("q1_sample.duckdb.sql"));
        assert!(table.contains("error"));
        assert!(table.contains("0.2500"));
    }
}
