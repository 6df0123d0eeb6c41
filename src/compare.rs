#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Output normalization and comparison.

use similar::{ChangeTag, TextDiff};

use crate::engine::Engine;

/// Strips the lines `engine`'s client prints before any result rows.
///
/// Output with fewer lines than the banner normalizes to an empty string.
pub fn normalize(output: &str, engine: Engine) -> &str {
    (0..engine.banner_lines()).fold(output, |rest, _| {
        rest.split_once('\n').map_or("", |(_, tail)| tail)
    })
}

/// Outcome of comparing normalized outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    /// Outputs are identical.
    Match,
    /// Outputs differ; holds a line diff of expected against actual.
    Mismatch(String),
}

impl Comparison {
    /// Whether the outputs matched.
    pub fn is_match(&self) -> bool {
        matches!(self, Comparison::Match)
    }
}

/// Compares the answer's output (`expected`) with the submission's
/// (`actual`) character for character, whitespace and line endings included.
pub fn compare(expected: &str, actual: &str) -> Comparison {
    if expected == actual {
        Comparison::Match
    } else {
        Comparison::Mismatch(line_diff(expected, actual))
    }
}

/// Line diff marking lines only in `expected` with `-` and lines only in
/// `actual` with `+`.
pub fn line_diff(expected: &str, actual: &str) -> String {
    let diff = TextDiff::from_lines(expected, actual);
    let mut output = String::new();

    for change in diff.iter_all_changes() {
        let prefix = match change.tag() {
            ChangeTag::Delete => "-",
            ChangeTag::Insert => "+",
            ChangeTag::Equal => " ",
        };
        output.push_str(&format!("{prefix} {change}"));
        if change.missing_newline() {
            output.push('\n');
        }
    }

    output
}
