#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    ffi::{OsStr, OsString},
    path::Path,
    process::{ExitStatus, Stdio},
    time::Duration,
};

use anyhow::{Context, Result};
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWriteExt},
    process::{Child, Command},
    time::timeout,
};

/// Kills the wrapped database client unless it was waited on to completion.
struct ChildDropGuard(Option<Child>);

impl ChildDropGuard {
    /// Wraps a freshly spawned client.
    fn new(child: Child) -> Self {
        Self(Some(child))
    }

    /// Returns the client process still owned by the guard.
    fn child_mut(&mut self) -> Result<&mut Child> {
        self.0
            .as_mut()
            .context("client process already released from guard")
    }

    /// Releases the client once it has exited.
    fn disarm(mut self) {
        self.0 = None;
    }
}

impl Drop for ChildDropGuard {
    fn drop(&mut self) {
        if let Some(child) = self.0.as_mut() {
            let _ = child.start_kill();
        }
    }
}

/// Everything a finished client printed, plus how it exited.
#[derive(Debug)]
pub struct Collected {
    /// Exit status of the client.
    pub status: ExitStatus,
    /// Bytes written to stdout.
    pub stdout: Vec<u8>,
    /// Bytes written to stderr.
    pub stderr: Vec<u8>,
}

impl Collected {
    /// Stdout followed by stderr, decoded lossily.
    pub fn combined(&self) -> String {
        let mut text = String::from_utf8_lossy(&self.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&self.stderr));
        text
    }
}

/// Reads a pipe to its end.
async fn drain(mut pipe: impl AsyncRead + Unpin) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    pipe.read_to_end(&mut buf)
        .await
        .context("failed to read client output")?;
    Ok(buf)
}

/// Spawns `program` in `cwd`, writes `stdin` to it, closes stdin, and
/// collects stdout and stderr until the process exits.
///
/// Both pipes are drained concurrently with the wait so a chatty client
/// cannot fill a pipe and stall. If `deadline` elapses first the client is
/// killed and an error is returned.
pub async fn run_collect(
    program: impl AsRef<OsStr>,
    args: &[OsString],
    stdin: Vec<u8>,
    cwd: &Path,
    deadline: Option<Duration>,
) -> Result<Collected> {
    let mut cmd = Command::new(program.as_ref());
    cmd.args(args)
        .current_dir(cwd)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut guard = ChildDropGuard::new(
        cmd.spawn()
            .with_context(|| format!("failed to spawn {}", program.as_ref().to_string_lossy()))?,
    );

    let mut stdin_pipe = guard.child_mut()?.stdin.take().context("missing stdin pipe")?;
    let stdout = guard.child_mut()?.stdout.take().context("missing stdout pipe")?;
    let stderr = guard.child_mut()?.stderr.take().context("missing stderr pipe")?;

    let feed = async move {
        if !stdin.is_empty() {
            // A client that exits without reading everything closes the pipe
            // early; its exit status tells the real story.
            let _ = stdin_pipe.write_all(&stdin).await;
        }
        let _ = stdin_pipe.shutdown().await;
    };

    let collect = async move {
        let mut guard = guard;
        let ((), stdout, stderr) = tokio::join!(feed, drain(stdout), drain(stderr));
        let status = guard
            .child_mut()?
            .wait()
            .await
            .context("failed to wait on client process")?;
        guard.disarm();
        Ok::<Collected, anyhow::Error>(Collected {
            status,
            stdout: stdout?,
            stderr: stderr?,
        })
    };

    match deadline {
        Some(limit) => timeout(limit, collect)
            .await
            .with_context(|| format!("client timed out after {:.1}s", limit.as_secs_f64()))?,
        None => collect.await,
    }
}
