#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Directory, relative to the grading root, holding the reference answers.
pub const ANSWER_DIR: &str = "ans";

/// Setup script that loads the dataset; never graded.
pub const IMPORT_SCRIPT: &str = "import.sql";

/// Suffix shared by every submission and answer file.
pub const SQL_SUFFIX: &str = ".sql";

/// Score a fully correct homework adds up to.
pub const MAX_SCORE: u32 = 100;

/// Default duckdb client, shipped next to the homework.
pub const DUCKDB_PROGRAM: &str = "./duckdb";

/// Default duckdb database file.
pub const DUCKDB_DATABASE: &str = "musicbrainz-cmudb2023.duckdb";

/// Default sqlite client, looked up on `PATH`.
pub const SQLITE_PROGRAM: &str = "sqlite3";

/// Default sqlite database file.
pub const SQLITE_DATABASE: &str = "musicbrainz-cmudb2023.db";

/// Flag that switches both clients to comma separated output.
pub const CSV_MODE_FLAG: &str = "-csv";

/// Environment variable overriding the duckdb client program.
pub const ENV_DUCKDB_BIN: &str = "SQLGRADE_DUCKDB_BIN";

/// Environment variable overriding the duckdb database file.
pub const ENV_DUCKDB_DB: &str = "SQLGRADE_DUCKDB_DB";

/// Environment variable overriding the sqlite client program.
pub const ENV_SQLITE_BIN: &str = "SQLGRADE_SQLITE_BIN";

/// Environment variable overriding the sqlite database file.
pub const ENV_SQLITE_DB: &str = "SQLGRADE_SQLITE_DB";
