#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! The grading pass: discover, resolve, execute, compare, score.

use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use anyhow::Result;

use crate::{
    answer::{self, Answer},
    client::{self, ClientError},
    compare::{Comparison, compare, normalize},
    config::GraderConfig,
    constants::MAX_SCORE,
    engine::Engine,
    report,
    submission::{SqlFile, discover},
};

/// Errors that stop a grading pass before any file is graded.
#[derive(thiserror::Error, Debug)]
pub enum GradeError {
    /// The answer directory does not exist.
    #[error("cannot find answer folder {}", .0.display())]
    MissingAnswerDir(PathBuf),
}

/// What happened to a graded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Normalized outputs were identical.
    Passed,
    /// Outputs differed.
    Mismatch {
        /// Line diff of the answer's output against the submission's.
        diff: String,
    },
    /// A client could not run one of the scripts.
    ExecutionFailed {
        /// Why the client failed, including anything it printed.
        reason: String,
    },
}

impl Outcome {
    /// Whether the file passed.
    pub fn passed(&self) -> bool {
        matches!(self, Outcome::Passed)
    }
}

/// A file that was graded.
#[derive(Debug, Clone)]
pub struct FileResult {
    /// Submission file name.
    pub file:    String,
    /// Answer it was compared with, relative to the grading root.
    pub answer:  PathBuf,
    /// Pass, mismatch or execution failure.
    pub outcome: Outcome,
    /// Points awarded; zero unless passed.
    pub points:  u32,
    /// Time spent running both scripts.
    pub elapsed: Duration,
}

/// A file left out of grading and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    /// Submission file name.
    pub file:   String,
    /// Why it was not graded.
    pub reason: String,
}

/// Everything one grading pass produced.
#[derive(Debug, Clone, Default)]
pub struct GradeReport {
    /// Graded files, in grading order.
    pub results: Vec<FileResult>,
    /// Files that were not graded.
    pub skipped: Vec<Skipped>,
}

impl GradeReport {
    /// Sum of points awarded.
    pub fn total(&self) -> u64 {
        self.results.iter().map(|result| u64::from(result.points)).sum()
    }

    /// Names of files that mismatched or failed to run, in grading order.
    pub fn failed(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|result| !result.outcome.passed())
            .map(|result| result.file.as_str())
            .collect()
    }

    /// Whether the total is the full homework score.
    pub fn is_perfect(&self) -> bool {
        self.total() == u64::from(MAX_SCORE)
    }
}

/// What to do with one discovered file.
enum Step {
    /// The file was graded.
    Graded(FileResult),
    /// The file was skipped.
    Skipped(Skipped),
}

/// Runs a full grading pass over `config.root_dir()`.
///
/// Fails only when the answer directory is missing or the grading root
/// cannot be listed; every per-file problem is recorded in the report and
/// grading moves on.
pub async fn grade(config: &GraderConfig) -> Result<GradeReport> {
    let answer_dir = config.root_dir().join(config.answer_dir());
    if !answer_dir.is_dir() {
        return Err(GradeError::MissingAnswerDir(answer_dir).into());
    }

    tracing::debug!(
        "Score table worth {} points in total, full marks at {MAX_SCORE}",
        config.scores().max_total()
    );

    let mut graded = GradeReport::default();
    for file in discover(config.root_dir())? {
        match grade_file(config, &file).await {
            Step::Graded(result) => {
                report::file_result(&result);
                graded.results.push(result);
            }
            Step::Skipped(skipped) => {
                tracing::info!("Skipping {}: {}", skipped.file, skipped.reason);
                graded.skipped.push(skipped);
            }
        }
    }

    Ok(graded)
}

/// Builds a skip step for `file`.
fn skip(file: &SqlFile, reason: impl Into<String>) -> Step {
    Step::Skipped(Skipped {
        file:   file.name().to_owned(),
        reason: reason.into(),
    })
}

/// Picks the engines whose clients run the submission and the answer.
///
/// Normally each file runs under its own engine. A fallback answer with
/// `swap_clients_on_fallback` set trades the two.
pub fn client_engines(
    submission: Engine,
    answer: &Answer,
    answer_engine: Engine,
    swap_clients_on_fallback: bool,
) -> (Engine, Engine) {
    if answer.is_fallback() && swap_clients_on_fallback {
        (answer_engine, submission)
    } else {
        (submission, answer_engine)
    }
}

/// Resolves, runs and compares a single submission.
async fn grade_file(config: &GraderConfig, file: &SqlFile) -> Step {
    let Some(engine) = file.engine() else {
        tracing::warn!("Unknown file type for {}", file.name());
        return skip(file, "unknown file type");
    };

    let Some(answer) = answer::resolve(
        config.root_dir(),
        config.answer_dir(),
        file,
        config.cross_engine_fallback(),
    ) else {
        return skip(file, "no answer file");
    };

    let Some(answer_engine) = answer.engine() else {
        tracing::warn!("Unknown file type for {}", answer.path().display());
        return skip(file, "unknown answer file type");
    };

    let (submission_client, answer_client) =
        client_engines(engine, &answer, answer_engine, config.swap_clients_on_fallback());

    report::attempt(file.name(), answer.path());
    let start = Instant::now();

    let outcome = match run_pair(config, file, submission_client, &answer, answer_client).await {
        Ok(Comparison::Match) => Outcome::Passed,
        Ok(Comparison::Mismatch(diff)) => Outcome::Mismatch { diff },
        Err(err) => Outcome::ExecutionFailed {
            reason: failure_reason(&err),
        },
    };

    if outcome.passed() && !config.scores().contains(file.name()) {
        tracing::debug!("{} is not in the score table; it earns no points", file.name());
    }
    let points = if outcome.passed() {
        config.scores().points(file.name())
    } else {
        0
    };

    Step::Graded(FileResult {
        file: file.name().to_owned(),
        answer: answer.path().to_path_buf(),
        outcome,
        points,
        elapsed: start.elapsed(),
    })
}

/// Runs the answer, then the submission, and compares normalized outputs.
async fn run_pair(
    config: &GraderConfig,
    file: &SqlFile,
    submission_client: Engine,
    answer: &Answer,
    answer_client: Engine,
) -> Result<Comparison, ClientError> {
    let expected = run_script(config, answer.path(), answer_client).await?;
    let actual = run_script(config, Path::new(file.name()), submission_client).await?;

    Ok(compare(
        normalize(&expected, answer_client),
        normalize(&actual, submission_client),
    ))
}

/// Runs one script under `engine`'s client.
async fn run_script(
    config: &GraderConfig,
    script: &Path,
    engine: Engine,
) -> Result<String, ClientError> {
    client::execute(config.client(engine), script, config.root_dir(), config.deadline()).await
}

/// Human-readable failure text, client output included when there is any.
fn failure_reason(err: &ClientError) -> String {
    match err {
        ClientError::Failed { output, .. } if !output.trim().is_empty() => {
            format!("{err}\n{}", output.trim_end())
        }
        ClientError::Failed { .. } => err.to_string(),
        ClientError::Invocation(inner) => format!("{inner:#}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(file: &str, outcome: Outcome, points: u32) -> FileResult {
        FileResult {
            file: file.to_owned(),
            answer: PathBuf::from("ans").join(file),
            outcome,
            points,
            elapsed: Duration::ZERO,
        }
    }

    #[test]
    fn report_totals_and_failures() {
        let report = GradeReport {
            results: vec![
                result("q1_sample.duckdb.sql", Outcome::Passed, 0),
                result("q2_beatles_uk_releases.duckdb.sql", Outcome::Passed, 5),
                result(
                    "q3_new_wine_in_old_bottles.duckdb.sql",
                    Outcome::Mismatch {
                        diff: "- a\n+ b\n".into(),
                    },
                    0,
                ),
                result(
                    "q4_devil_in_the_details.duckdb.sql",
                    Outcome::ExecutionFailed {
                        reason: "boom".into(),
                    },
                    0,
                ),
            ],
            skipped: vec![],
        };

        assert_eq!(report.total(), 5);
        assert_eq!(
            report.failed(),
            ["q3_new_wine_in_old_bottles.duckdb.sql", "q4_devil_in_the_details.duckdb.sql"]
        );
        assert!(!report.is_perfect());
    }

    #[test]
    fn report_total_does_not_wrap() {
        let report = GradeReport {
            results: vec![
                result("q1_a.duckdb.sql", Outcome::Passed, u32::MAX),
                result("q2_b.duckdb.sql", Outcome::Passed, 1),
            ],
            skipped: vec![],
        };

        assert_eq!(report.total(), u64::from(u32::MAX) + 1);
        assert!(!report.is_perfect());
    }

    #[test]
    fn fallback_swaps_clients_only_when_asked() {
        let root = std::env::temp_dir().join(format!("sqlgrade-swap-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(root.join("ans")).expect("create answer dir");
        std::fs::write(root.join("ans/q3_foo.duckdb.sql"), "select 1;\n").expect("write answer");

        let submission = SqlFile::parse("q3_foo.sqlite.sql");
        let answer = answer::resolve(&root, Path::new("ans"), &submission, true).expect("answer");

        assert_eq!(
            client_engines(Engine::Sqlite, &answer, Engine::DuckDb, false),
            (Engine::Sqlite, Engine::DuckDb)
        );
        assert_eq!(
            client_engines(Engine::Sqlite, &answer, Engine::DuckDb, true),
            (Engine::DuckDb, Engine::Sqlite)
        );

        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn missing_answer_dir_message() {
        let err = GradeError::MissingAnswerDir(PathBuf::from("hw/ans"));
        assert_eq!(err.to_string(), "cannot find answer folder hw/ans");
    }
}
