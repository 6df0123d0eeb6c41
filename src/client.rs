#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::ExitStatus,
    time::Duration,
};

use anyhow::{Context, Result};
use which::which;

use crate::{config::ClientConfig, process::run_collect};

/// Ways running a script through a database client can fail.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// The client ran but exited unsuccessfully.
    #[error("{program} exited with {status} while running {script}")]
    Failed {
        /// Client program that was run.
        program: String,
        /// Script the client was asked to read.
        script:  String,
        /// Exit status reported by the client.
        status:  ExitStatus,
        /// Everything the client printed.
        output:  String,
    },
    /// The client could not be found, spawned, read from, or timed out.
    #[error(transparent)]
    Invocation(#[from] anyhow::Error),
}

/// Locates the client program.
///
/// Bare names (`sqlite3`) are searched for on `PATH`; paths (`./duckdb`) are
/// resolved against the grading root and made absolute, since the client is
/// spawned with the grading root as its working directory.
///
/// * `program`: program as configured
/// * `root_dir`: grading root
pub fn resolve_program(program: &str, root_dir: &Path) -> Result<OsString> {
    let path = Path::new(program);
    if path.components().count() > 1 || path.is_absolute() {
        let resolved = std::path::absolute(root_dir.join(path))
            .with_context(|| format!("Could not make {program} absolute"))?;
        anyhow::ensure!(resolved.is_file(), "Cannot find database client {}", resolved.display());
        Ok(resolved.into_os_string())
    } else {
        which(program)
            .map(PathBuf::into_os_string)
            .with_context(|| format!("Cannot find database client on path ({program})"))
    }
}

/// Stdin that makes a client run `script` and exit.
pub fn read_directive(script: &Path) -> String {
    format!(".read {}\n", script.display())
}

/// Runs `script` through the client described by `client`, from inside
/// `root_dir`, and returns stdout followed by stderr.
///
/// * `client`: which program and database to use
/// * `script`: SQL file relative to `root_dir`
/// * `root_dir`: grading root, used as the client's working directory
/// * `deadline`: optional time limit for the client
pub async fn execute(
    client: &ClientConfig,
    script: &Path,
    root_dir: &Path,
    deadline: Option<Duration>,
) -> Result<String, ClientError> {
    let program = resolve_program(client.program(), root_dir)?;
    tracing::debug!(
        "Running {} with {} on {}",
        script.display(),
        program.to_string_lossy(),
        client.database().display()
    );

    let collected = run_collect(
        &program,
        &client.args(),
        read_directive(script).into_bytes(),
        root_dir,
        deadline,
    )
    .await
    .with_context(|| format!("Could not run {} through {}", script.display(), client.program()))?;

    let output = collected.combined();
    if collected.status.success() {
        Ok(output)
    } else {
        Err(ClientError::Failed {
            program: client.program().to_owned(),
            script: script.display().to_string(),
            status: collected.status,
            output,
        })
    }
}
