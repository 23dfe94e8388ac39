//! Shell execution of script artifacts under a deadline.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use serde::Deserialize;
use timebox_common::{ExecError, ExecResult};
use tokio::io::AsyncReadExt;
use tokio::process::{ChildStderr, ChildStdout, Command};
use tracing::{debug, warn};

use crate::artifact::ScriptArtifact;
use crate::deadline::Deadline;

/// Options for script execution.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptOptions {
    /// Shell interpreter used to execute the script artifact.
    #[serde(default = "default_shell")]
    pub shell: String,

    /// Permission bits applied to the script artifact.
    #[serde(default = "default_file_mode")]
    pub file_mode: u32,
}

fn default_shell() -> String {
    "sh".to_string()
}

fn default_file_mode() -> u32 {
    0o755
}

impl Default for ScriptOptions {
    fn default() -> Self {
        Self {
            shell: default_shell(),
            file_mode: default_file_mode(),
        }
    }
}

/// Run `body` as a shell script materialized at `path`, with a time
/// budget of `timeout_secs` seconds.
///
/// The script file is written immediately before execution and removed
/// on every exit path. The shell inherits the caller's environment
/// unmodified. Combined stdout/stderr is returned on success and
/// preserved inside [`ExecError::NonZeroExit`] on failure; a timed-out
/// execution discards captured output so callers can always tell "ran
/// and failed" from "never finished".
pub async fn run_script(
    body: &str,
    path: impl AsRef<Path>,
    timeout_secs: u32,
) -> ExecResult<Vec<u8>> {
    run_script_with_options(body, path, timeout_secs, &ScriptOptions::default()).await
}

/// [`run_script`] with an explicit interpreter and artifact mode.
pub async fn run_script_with_options(
    body: &str,
    path: impl AsRef<Path>,
    timeout_secs: u32,
    options: &ScriptOptions,
) -> ExecResult<Vec<u8>> {
    let artifact = ScriptArtifact::materialize(body, path, options.file_mode).await?;
    // Both guards hold until return: the artifact is removed and the
    // cancellation scope released on every path out of this function.
    let deadline = Deadline::after(Duration::from_secs(u64::from(timeout_secs)));

    let mut command = Command::new(&options.shell);
    command
        .arg("-c")
        .arg(artifact.path())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = command
        .spawn()
        .map_err(|e| ExecError::spawn_failed(options.shell.as_str(), e.to_string()))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| ExecError::spawn_failed(options.shell.as_str(), "stdout pipe missing"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| ExecError::spawn_failed(options.shell.as_str(), "stderr pipe missing"))?;

    // Capture concurrently with the wait so a chatty script cannot fill
    // a pipe and deadlock against its own supervisor.
    let capture = tokio::spawn(drain_combined(stdout, stderr));

    let status = match deadline.bound(child.wait()).await {
        None => {
            warn!(script = %artifact.path().display(), timeout_secs, "script execution timed out");
            // Dropping the handle kills the shell; the capture task runs
            // to EOF detached, off this call's return path.
            return Err(ExecError::timed_out(deadline.budget()));
        }
        Some(Ok(status)) => status,
        Some(Err(e)) => return Err(ExecError::wait_failed(e.to_string())),
    };

    let output = match deadline.bound(capture).await {
        // The shell exited but something it spawned kept the pipes open
        // past the deadline.
        None => return Err(ExecError::timed_out(deadline.budget())),
        Some(Ok(Ok(bytes))) => bytes,
        Some(Ok(Err(e))) => {
            return Err(ExecError::wait_failed(format!(
                "failed to capture combined output: {e}"
            )))
        }
        Some(Err(e)) => {
            return Err(ExecError::wait_failed(format!(
                "output capture task failed: {e}"
            )))
        }
    };

    // The deadline outranks every other classification: output produced
    // before the kill is not returned on the timeout path.
    if deadline.expired() {
        return Err(ExecError::timed_out(deadline.budget()));
    }

    if !status.success() {
        debug!(code = ?status.code(), "script exited non-zero");
        return Err(ExecError::non_zero_exit(status.code(), output));
    }

    debug!(bytes = output.len(), elapsed = ?deadline.elapsed(), "script completed");
    Ok(output)
}

/// Interleave both standard streams into a single byte buffer, chunk by
/// chunk, until each reaches EOF.
async fn drain_combined(
    mut stdout: ChildStdout,
    mut stderr: ChildStderr,
) -> std::io::Result<Vec<u8>> {
    let mut combined = Vec::new();
    let mut out_open = true;
    let mut err_open = true;
    let mut out_buf = [0u8; 4096];
    let mut err_buf = [0u8; 4096];

    while out_open || err_open {
        tokio::select! {
            read = stdout.read(&mut out_buf), if out_open => match read? {
                0 => out_open = false,
                n => combined.extend_from_slice(&out_buf[..n]),
            },
            read = stderr.read(&mut err_buf), if err_open => match read? {
                0 => err_open = false,
                n => combined.extend_from_slice(&err_buf[..n]),
            },
        }
    }

    Ok(combined)
}
