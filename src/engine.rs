#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fmt::Display;

use crate::constants::SQL_SUFFIX;

/// The database engines a SQL file can target, picked by its filename tag
/// (`name.duckdb.sql` or `name.sqlite.sql`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Engine {
    /// DuckDB, the engine reference answers are written for.
    DuckDb,
    /// SQLite, accepted for students and graded against DuckDB answers when
    /// no SQLite answer exists.
    Sqlite,
}

impl Engine {
    /// Engine whose answers back up the other one.
    pub const PRIMARY: Engine = Engine::DuckDb;

    /// Every supported engine.
    pub const ALL: [Engine; 2] = [Engine::DuckDb, Engine::Sqlite];

    /// Tag used in filenames, e.g. `duckdb` in `q1_sample.duckdb.sql`.
    pub fn tag(self) -> &'static str {
        match self {
            Engine::DuckDb => "duckdb",
            Engine::Sqlite => "sqlite",
        }
    }

    /// Full filename suffix, e.g. `.duckdb.sql`.
    pub fn suffix(self) -> String {
        format!(".{}{SQL_SUFFIX}", self.tag())
    }

    /// Identifies the engine a file targets from its name.
    ///
    /// * `file_name`: bare file name or path; only the suffix is inspected.
    pub fn from_file_name(file_name: &str) -> Option<Engine> {
        Engine::ALL
            .into_iter()
            .find(|engine| file_name.ends_with(&engine.suffix()))
    }

    /// Whether this engine's answers are used as fallbacks for the other.
    pub fn is_primary(self) -> bool {
        self == Engine::PRIMARY
    }

    /// Number of leading output lines the client prints before any result
    /// rows and that must be dropped before comparing.
    ///
    /// In CSV mode the duckdb CLI always prints a column header line while
    /// sqlite3 has headers off unless asked.
    pub fn banner_lines(self) -> usize {
        match self {
            Engine::DuckDb => 1,
            Engine::Sqlite => 0,
        }
    }
}

impl Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}
