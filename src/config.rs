#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    time::Duration,
};

use bon::Builder;

use crate::{
    constants::{
        ANSWER_DIR, CSV_MODE_FLAG, DUCKDB_DATABASE, DUCKDB_PROGRAM, ENV_DUCKDB_BIN, ENV_DUCKDB_DB,
        ENV_SQLITE_BIN, ENV_SQLITE_DB, SQLITE_DATABASE, SQLITE_PROGRAM,
    },
    engine::Engine,
    scores::ScoreTable,
};

/// Reads a non-empty, trimmed environment variable.
fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

/// How to invoke one engine's command-line client.
#[derive(Debug, Clone, Builder)]
#[builder(on(String, into), on(PathBuf, into))]
pub struct ClientConfig {
    /// Client program. Bare names are looked up on `PATH`, anything with a
    /// path separator is taken relative to the grading root.
    program:  String,
    /// Database file opened by the client, relative to the grading root.
    database: PathBuf,
    /// Flags passed after the database file.
    #[builder(default = vec![CSV_MODE_FLAG.to_owned()])]
    flags:    Vec<String>,
}

impl ClientConfig {
    /// Built-in client settings for `engine`.
    pub fn default_for(engine: Engine) -> Self {
        match engine {
            Engine::DuckDb => Self::builder()
                .program(DUCKDB_PROGRAM)
                .database(DUCKDB_DATABASE)
                .build(),
            Engine::Sqlite => Self::builder()
                .program(SQLITE_PROGRAM)
                .database(SQLITE_DATABASE)
                .build(),
        }
    }

    /// Built-in settings for `engine`, overridden by `SQLGRADE_*` environment
    /// variables where set.
    pub fn from_env(engine: Engine) -> Self {
        let (bin_key, db_key) = match engine {
            Engine::DuckDb => (ENV_DUCKDB_BIN, ENV_DUCKDB_DB),
            Engine::Sqlite => (ENV_SQLITE_BIN, ENV_SQLITE_DB),
        };

        let mut config = Self::default_for(engine);
        if let Some(program) = env_value(bin_key) {
            config.program = program;
        }
        if let Some(database) = env_value(db_key) {
            config.database = PathBuf::from(database);
        }
        config
    }

    /// Returns a copy using a different client program.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Returns a copy opening a different database file.
    pub fn with_database(mut self, database: impl Into<PathBuf>) -> Self {
        self.database = database.into();
        self
    }

    /// Client program as configured.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Database file as configured.
    pub fn database(&self) -> &Path {
        &self.database
    }

    /// Command-line arguments: the database file, then the flags.
    pub fn args(&self) -> Vec<OsString> {
        std::iter::once(self.database.clone().into_os_string())
            .chain(self.flags.iter().map(OsString::from))
            .collect()
    }
}

/// Settings for one grading run.
#[derive(Debug, Clone, Builder)]
#[builder(on(PathBuf, into))]
pub struct GraderConfig {
    /// Directory holding the submissions, the databases and the answer
    /// directory.
    root_dir:                 PathBuf,
    /// Answer directory, relative to `root_dir`.
    #[builder(default = PathBuf::from(ANSWER_DIR))]
    answer_dir:               PathBuf,
    /// Client used for `.duckdb.sql` files.
    #[builder(default = ClientConfig::from_env(Engine::DuckDb))]
    duckdb:                   ClientConfig,
    /// Client used for `.sqlite.sql` files.
    #[builder(default = ClientConfig::from_env(Engine::Sqlite))]
    sqlite:                   ClientConfig,
    /// Points per submission file name.
    #[builder(default)]
    scores:                   ScoreTable,
    /// Grade sqlite submissions against duckdb answers when no sqlite answer
    /// exists.
    #[builder(default = true)]
    cross_engine_fallback:    bool,
    /// On a fallback match, run the answer with the submission's client and
    /// the submission with the answer's client, as the original grading
    /// script did.
    #[builder(default = false)]
    swap_clients_on_fallback: bool,
    /// Per-invocation time limit; clients may run forever when unset.
    deadline:                 Option<Duration>,
}

impl GraderConfig {
    /// Grading root.
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Answer directory relative to the grading root.
    pub fn answer_dir(&self) -> &Path {
        &self.answer_dir
    }

    /// Client settings for `engine`.
    pub fn client(&self, engine: Engine) -> &ClientConfig {
        match engine {
            Engine::DuckDb => &self.duckdb,
            Engine::Sqlite => &self.sqlite,
        }
    }

    /// Score table in use.
    pub fn scores(&self) -> &ScoreTable {
        &self.scores
    }

    /// Whether the cross-engine answer fallback is enabled.
    pub fn cross_engine_fallback(&self) -> bool {
        self.cross_engine_fallback
    }

    /// Whether fallback matches swap clients.
    pub fn swap_clients_on_fallback(&self) -> bool {
        self.swap_clients_on_fallback
    }

    /// Per-invocation time limit.
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }
}
