//! Error types for supervised execution.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for execution operations.
pub type ExecResult<T> = std::result::Result<T, ExecError>;

/// Failure taxonomy for supervised execution.
///
/// The two classifications callers care most about are kept strictly
/// apart: [`ExecError::TimedOut`] means the supervisor terminated the
/// process because its budget elapsed, while [`ExecError::NonZeroExit`]
/// means the process finished on its own and reported failure. Only the
/// latter carries captured output; a timed-out execution discards it.
#[derive(Error, Debug, Clone)]
pub enum ExecError {
    #[error("Script write failed: {path} - {reason}")]
    ScriptWrite { path: String, reason: String },

    #[error("Spawn failed: {command} - {reason}")]
    SpawnFailed { command: String, reason: String },

    #[error("Execution timed out after {timeout:?}")]
    TimedOut { timeout: Duration },

    #[error("Non-zero exit code: {code:?}")]
    NonZeroExit {
        code: Option<i32>,
        /// Output captured before the process failed. Empty for
        /// executions that capture nothing (the supervisor path).
        output: Vec<u8>,
    },

    #[error("Kill failed for process group {pgid}: {reason}")]
    KillFailed { pgid: i32, reason: String },

    #[error("Process wait failed: {reason}")]
    WaitFailed { reason: String },

    #[error("Completion channel closed before a wait result was delivered")]
    CompletionChannelClosed,
}

impl ExecError {
    pub fn script_write(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ScriptWrite {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn spawn_failed(command: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SpawnFailed {
            command: command.into(),
            reason: reason.into(),
        }
    }

    pub fn timed_out(timeout: Duration) -> Self {
        Self::TimedOut { timeout }
    }

    pub fn non_zero_exit(code: Option<i32>, output: Vec<u8>) -> Self {
        Self::NonZeroExit { code, output }
    }

    pub fn kill_failed(pgid: i32, reason: impl Into<String>) -> Self {
        Self::KillFailed {
            pgid,
            reason: reason.into(),
        }
    }

    pub fn wait_failed(reason: impl Into<String>) -> Self {
        Self::WaitFailed {
            reason: reason.into(),
        }
    }

    /// Whether this error classifies the execution as deadline-exceeded.
    ///
    /// Deadline expiry is not automatically distinguishable from other
    /// failures; callers that need the distinction check it here.
    pub fn is_timed_out(&self) -> bool {
        matches!(self, Self::TimedOut { .. })
    }

    /// Output preserved alongside a failure, if this error carries any.
    ///
    /// Returns `Some` only for [`ExecError::NonZeroExit`]; partial output
    /// from a process that ran and failed is valuable for diagnosis,
    /// while output from a timed-out process is discarded by contract.
    pub fn partial_output(&self) -> Option<&[u8]> {
        match self {
            Self::NonZeroExit { output, .. } => Some(output),
            _ => None,
        }
    }

    /// Exit code, for failures that have one.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::NonZeroExit { code, .. } => *code,
            _ => None,
        }
    }
}
