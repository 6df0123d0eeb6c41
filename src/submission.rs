#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    path::Path,
    sync::LazyLock,
};

use anyhow::{Context, Result};
use glob::{Pattern, glob};
use regex::Regex;

use crate::{
    constants::{IMPORT_SCRIPT, SQL_SUFFIX},
    engine::Engine,
};

/// Matches the question prefix, e.g. `q10_` in `q10_latest_releases.duckdb.sql`.
static QUESTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"q(\d+)_").expect("question pattern is valid"));

/// A SQL file found in the grading root, parsed once from its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlFile {
    /// Bare file name, e.g. `q2_beatles_uk_releases.duckdb.sql`. Also the key
    /// into the score table.
    name:     String,
    /// Question number from the `q<digits>_` prefix, 0 when absent.
    question: u32,
    /// Engine from the filename tag; `None` for plain or unknown `.sql` files.
    engine:   Option<Engine>,
}

impl SqlFile {
    /// Parses a bare file name.
    pub fn parse(name: impl Into<String>) -> Self {
        let name = name.into();
        let question = question_number(&name);
        let engine = Engine::from_file_name(&name);
        Self {
            name,
            question,
            engine,
        }
    }

    /// Bare file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Question number, 0 when the name carries none.
    pub fn question(&self) -> u32 {
        self.question
    }

    /// Engine targeted by this file, if recognized.
    pub fn engine(&self) -> Option<Engine> {
        self.engine
    }
}

/// Extracts the question number from the first `q<digits>_` in `name`.
/// Names without one sort as question 0; numbers too large for `u32` sort
/// last as `u32::MAX`.
pub fn question_number(name: &str) -> u32 {
    QUESTION_RE
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().parse().unwrap_or(u32::MAX))
        .unwrap_or(0)
}

/// Orders files by question number. The sort is stable, so files sharing a
/// number keep their incoming order.
pub fn sort_by_question(files: &mut [SqlFile]) {
    files.sort_by_key(SqlFile::question);
}

/// Lists gradable `.sql` files directly inside `root_dir`, skipping the
/// import script, ordered by question number.
///
/// * `root_dir`: the grading root, usually the current directory.
pub fn discover(root_dir: &Path) -> Result<Vec<SqlFile>> {
    let pattern = format!(
        "{}/*{SQL_SUFFIX}",
        Pattern::escape(
            root_dir
                .to_str()
                .context("Could not convert grading root to string")?
        )
    );

    let mut files: Vec<SqlFile> = glob(&pattern)
        .context("Could not create glob")?
        .filter_map(Result::ok)
        .filter(|path| path.is_file())
        .filter_map(|path| file_name(&path))
        .filter(|name| name != IMPORT_SCRIPT)
        .map(SqlFile::parse)
        .collect();

    sort_by_question(&mut files);
    tracing::debug!("Discovered {} SQL files in {}", files.len(), root_dir.display());
    Ok(files)
}

/// Returns the UTF-8 file name of `path`.
fn file_name(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_question_and_engine() {
        let file = SqlFile::parse("q10_latest_releases.sqlite.sql");
        assert_eq!(file.question(), 10);
        assert_eq!(file.engine(), Some(Engine::Sqlite));
        assert_eq!(file.name(), "q10_latest_releases.sqlite.sql");
    }

    #[test]
    fn files_without_prefix_are_question_zero() {
        assert_eq!(question_number("scratch.duckdb.sql"), 0);
        assert_eq!(question_number("q_missing_digits.sql"), 0);
        assert_eq!(question_number("homework_q7_pso.sql"), 7);
    }

    #[test]
    fn oversized_question_numbers_sort_last() {
        assert_eq!(question_number("q99999999999_big.duckdb.sql"), u32::MAX);

        let mut files: Vec<SqlFile> = ["q99999999999_big.sql", "q10_x.sql", "notes.sql"]
            .into_iter()
            .map(SqlFile::parse)
            .collect();
        sort_by_question(&mut files);

        let names: Vec<&str> = files.iter().map(SqlFile::name).collect();
        assert_eq!(names, ["notes.sql", "q10_x.sql", "q99999999999_big.sql"]);
    }

    #[test]
    fn sorts_numerically_not_lexicographically() {
        let mut files: Vec<SqlFile> = ["q10_x.sql", "q2_y.sql", "q1_z.sql"]
            .into_iter()
            .map(SqlFile::parse)
            .collect();
        sort_by_question(&mut files);

        let names: Vec<&str> = files.iter().map(SqlFile::name).collect();
        assert_eq!(names, ["q1_z.sql", "q2_y.sql", "q10_x.sql"]);
    }

    #[test]
    fn sort_keeps_order_within_a_question() {
        let mut files: Vec<SqlFile> = [
            "q2_b.sqlite.sql",
            "notes.sql",
            "q2_a.duckdb.sql",
            "q1_z.sql",
        ]
        .into_iter()
        .map(SqlFile::parse)
        .collect();
        sort_by_question(&mut files);

        let names: Vec<&str> = files.iter().map(SqlFile::name).collect();
        assert_eq!(names, ["notes.sql", "q1_z.sql", "q2_b.sqlite.sql", "q2_a.duckdb.sql"]);
    }
}
