#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{collections::BTreeMap, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Points for each homework question, per engine variant.
const HOMEWORK_SCORES: &[(&str, u32)] = &[
    ("q1_sample.duckdb.sql", 0),
    ("q2_beatles_uk_releases.duckdb.sql", 5),
    ("q2_beatles_uk_releases.sqlite.sql", 5),
    ("q3_new_wine_in_old_bottles.duckdb.sql", 5),
    ("q3_new_wine_in_old_bottles.sqlite.sql", 5),
    ("q4_devil_in_the_details.duckdb.sql", 5),
    ("q4_devil_in_the_details.sqlite.sql", 5),
    ("q5_elvis_best_month.duckdb.sql", 10),
    ("q5_elvis_best_month.sqlite.sql", 10),
    ("q6_us_artist_groups_per_decade.duckdb.sql", 10),
    ("q6_us_artist_groups_per_decade.sqlite.sql", 10),
    ("q7_pso_friends.duckdb.sql", 10),
    ("q7_pso_friends.sqlite.sql", 10),
    ("q8_john_not_john.duckdb.sql", 10),
    ("q8_john_not_john.sqlite.sql", 10),
    ("q9_music_in_the_world.duckdb.sql", 15),
    ("q9_music_in_the_world.sqlite.sql", 15),
    ("q10_latest_releases.duckdb.sql", 15),
    ("q10_latest_releases.sqlite.sql", 15),
];

/// Maps exact submission file names to the points a passing file earns.
/// Names missing from the table are worth nothing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ScoreTable(BTreeMap<String, u32>);

impl Default for ScoreTable {
    fn default() -> Self {
        HOMEWORK_SCORES
            .iter()
            .map(|&(name, points)| (name.to_owned(), points))
            .collect()
    }
}

impl FromIterator<(String, u32)> for ScoreTable {
    fn from_iter<I: IntoIterator<Item = (String, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl ScoreTable {
    /// Parses a JSON object of `"file name": points`.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Score table must be a JSON object of name -> points")
    }

    /// Reads a JSON score table from `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read score table {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Could not parse {}", path.display()))
    }

    /// Points awarded when `file_name` passes.
    pub fn points(&self, file_name: &str) -> u32 {
        self.0.get(file_name).copied().unwrap_or(0)
    }

    /// Whether `file_name` has an entry.
    pub fn contains(&self, file_name: &str) -> bool {
        self.0.contains_key(file_name)
    }

    /// Sum of every entry; no run can score more.
    pub fn max_total(&self) -> u64 {
        self.0.values().map(|&points| u64::from(points)).sum()
    }
}
