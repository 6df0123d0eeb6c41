#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::{Path, PathBuf};

use crate::{
    constants::SQL_SUFFIX,
    engine::Engine,
    submission::SqlFile,
};

/// The reference file a submission is graded against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    /// Path relative to the grading root, e.g. `ans/q3_foo.duckdb.sql`.
    path:     PathBuf,
    /// Engine tag carried by the answer's own file name, if recognized.
    engine:   Option<Engine>,
    /// Whether this answer was found through the cross-engine fallback.
    fallback: bool,
}

impl Answer {
    /// Path relative to the grading root.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Engine the answer file is written for.
    pub fn engine(&self) -> Option<Engine> {
        self.engine
    }

    /// Whether the answer was picked by the cross-engine fallback.
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }
}

/// Swaps the engine segment of `name` (everything between the first `.` and
/// the `.sql` extension) for `engine`'s tag.
///
/// `q3_foo.sqlite.sql` becomes `q3_foo.duckdb.sql`.
pub fn retag(name: &str, engine: Engine) -> String {
    let stem = name.split_once('.').map_or(name, |(stem, _)| stem);
    format!("{stem}.{}{SQL_SUFFIX}", engine.tag())
}

/// Finds the answer for `submission`.
///
/// Looks for `<answer_dir>/<name>` first. When that is missing, the
/// submission targets a secondary engine and `allow_fallback` is set, the
/// primary engine's answer for the same question is tried next. Returns
/// `None` when neither exists.
///
/// * `root_dir`: grading root the answer directory lives in
/// * `answer_dir`: answer directory relative to `root_dir`
/// * `submission`: the file being graded
/// * `allow_fallback`: whether the cross-engine fallback is enabled
pub fn resolve(
    root_dir: &Path,
    answer_dir: &Path,
    submission: &SqlFile,
    allow_fallback: bool,
) -> Option<Answer> {
    let direct = answer_dir.join(submission.name());
    if root_dir.join(&direct).is_file() {
        return Some(Answer {
            path:     direct,
            engine:   submission.engine(),
            fallback: false,
        });
    }
    tracing::info!(
        "Cannot find answer file {} for {}",
        direct.display(),
        submission.name()
    );

    let secondary = submission.engine().filter(|engine| !engine.is_primary());
    if !allow_fallback || secondary.is_none() {
        return None;
    }

    let alternate = answer_dir.join(retag(submission.name(), Engine::PRIMARY));
    if root_dir.join(&alternate).is_file() {
        tracing::info!(
            "Using {} answer {} for {}",
            Engine::PRIMARY,
            alternate.display(),
            submission.name()
        );
        Some(Answer {
            path:     alternate,
            engine:   Some(Engine::PRIMARY),
            fallback: true,
        })
    } else {
        tracing::info!(
            "Cannot find {} answer file {} for {} either",
            Engine::PRIMARY,
            alternate.display(),
            submission.name()
        );
        None
    }
}
