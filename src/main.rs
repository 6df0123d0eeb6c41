#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # sqlgrade
//!
//! Run it from a homework directory containing the submissions, an `ans/`
//! folder with reference answers, and the duckdb/sqlite databases:
//!
//! ```text
//! sqlgrade
//! sqlgrade --root hw1 --sqlite /opt/sqlite/bin/sqlite3 --timeout 60
//! ```

use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use bpaf::*;
use dotenvy::dotenv;
use sqlgrade::{
    config::{ClientConfig, GraderConfig},
    engine::Engine,
    scores::ScoreTable,
};
use tracing::{Level, metadata::LevelFilter};
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

/// Command-line options.
#[derive(Debug, Clone)]
struct Options {
    /// Homework directory to grade.
    root:          PathBuf,
    /// Answer directory relative to the root.
    answers:       Option<PathBuf>,
    /// JSON score table replacing the built-in one.
    scores:        Option<PathBuf>,
    /// duckdb client program.
    duckdb:        Option<String>,
    /// sqlite client program.
    sqlite:        Option<String>,
    /// duckdb database file.
    duckdb_db:     Option<PathBuf>,
    /// sqlite database file.
    sqlite_db:     Option<PathBuf>,
    /// Per-client time limit in seconds.
    timeout:       Option<u64>,
    /// Disable the sqlite → duckdb answer fallback.
    no_fallback:   bool,
    /// Swap clients on fallback matches.
    swap_fallback: bool,
    /// Log debug output.
    verbose:       bool,
}

/// Parse the command line arguments into `Options`
fn options() -> Options {
    let root = long("root")
        .short('r')
        .help("Homework directory to grade")
        .argument::<PathBuf>("DIR")
        .fallback(PathBuf::from("."));
    let answers = long("answers")
        .help("Answer directory, relative to the homework directory")
        .argument::<PathBuf>("DIR")
        .optional();
    let scores = long("scores")
        .help("JSON file mapping submission file names to points")
        .argument::<PathBuf>("FILE")
        .optional();
    let duckdb = long("duckdb")
        .help("duckdb client program")
        .argument::<String>("PROGRAM")
        .optional();
    let sqlite = long("sqlite")
        .help("sqlite client program")
        .argument::<String>("PROGRAM")
        .optional();
    let duckdb_db = long("duckdb-db")
        .help("duckdb database file")
        .argument::<PathBuf>("FILE")
        .optional();
    let sqlite_db = long("sqlite-db")
        .help("sqlite database file")
        .argument::<PathBuf>("FILE")
        .optional();
    let timeout = long("timeout")
        .help("Kill a client after this many seconds")
        .argument::<u64>("SECS")
        .optional();
    let no_fallback = long("no-fallback")
        .help("Do not grade sqlite submissions against duckdb answers")
        .switch();
    let swap_fallback = long("swap-fallback-clients")
        .help("On a duckdb fallback, run each file with the other file's client")
        .switch();
    let verbose = short('v')
        .long("verbose")
        .help("Print debug logs")
        .switch();

    construct!(Options {
        root,
        answers,
        scores,
        duckdb,
        sqlite,
        duckdb_db,
        sqlite_db,
        timeout,
        no_fallback,
        swap_fallback,
        verbose,
    })
    .to_options()
    .descr("Grade SQL homework against reference answers")
    .run()
}

/// Layers command-line overrides on top of environment/default client
/// settings.
fn client(engine: Engine, program: Option<String>, database: Option<PathBuf>) -> ClientConfig {
    let mut config = ClientConfig::from_env(engine);
    if let Some(program) = program {
        config = config.with_program(program);
    }
    if let Some(database) = database {
        config = config.with_database(database);
    }
    config
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let opts = options();

    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false);
    let level = if opts.verbose { Level::DEBUG } else { Level::INFO };
    let filter_layer = LevelFilter::from_level(level);
    tracing_subscriber::registry()
        .with(fmt)
        .with(filter_layer)
        .init();

    let scores = match &opts.scores {
        Some(path) => ScoreTable::load(path)?,
        None => ScoreTable::default(),
    };

    let config = GraderConfig::builder()
        .root_dir(opts.root)
        .maybe_answer_dir(opts.answers)
        .duckdb(client(Engine::DuckDb, opts.duckdb, opts.duckdb_db))
        .sqlite(client(Engine::Sqlite, opts.sqlite, opts.sqlite_db))
        .scores(scores)
        .cross_engine_fallback(!opts.no_fallback)
        .swap_clients_on_fallback(opts.swap_fallback)
        .maybe_deadline(opts.timeout.map(Duration::from_secs))
        .build();

    sqlgrade::run(&config).await?;
    Ok(())
}
