//! Plain command capture without a timeout.
//!
//! These helpers run a command to completion and hand back its standard
//! output. No deadline applies; a command that hangs, hangs. Use the
//! supervisor or the script runner when a budget matters.

use std::ffi::OsStr;
use std::process::Stdio;

use timebox_common::{ExecError, ExecResult};
use tokio::process::Command;

/// Run a command and capture its standard output as text.
///
/// Standard error is discarded. A non-zero exit surfaces as
/// [`ExecError::NonZeroExit`] carrying whatever stdout had been
/// produced.
pub async fn capture_stdout<I, S>(name: &str, args: I) -> ExecResult<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bytes = capture_stdout_bytes(name, args).await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Run a command and capture its standard output as raw bytes.
pub async fn capture_stdout_bytes<I, S>(name: &str, args: I) -> ExecResult<Vec<u8>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = Command::new(name)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
        .await
        .map_err(|e| ExecError::spawn_failed(name, e.to_string()))?;

    if !output.status.success() {
        return Err(ExecError::non_zero_exit(output.status.code(), output.stdout));
    }

    Ok(output.stdout)
}

/// Like [`capture_stdout`] with surrounding whitespace trimmed.
///
/// An error from the underlying capture propagates untouched.
pub async fn capture_stdout_trimmed<I, S>(name: &str, args: I) -> ExecResult<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let out = capture_stdout(name, args).await?;
    Ok(out.trim().to_string())
}
