//! Forced termination of whole process groups.

use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;
use timebox_common::{ExecError, ExecResult};

/// Send SIGKILL to the entire process group led by `pid`.
///
/// Equivalent to `kill(-pid, SIGKILL)`: the negative-PID convention
/// signals every member of the group, so descendants of a supervised
/// process cannot outlive it. The signal is unconditional; there is no
/// graceful phase.
///
/// Racing against natural exit is expected: if the group vanished
/// between the caller's timer firing and this call, the syscall fails
/// with ESRCH and that failure is surfaced as [`ExecError::KillFailed`].
pub fn kill_group(pid: u32) -> ExecResult<()> {
    let pgid = Pid::from_raw(pid as i32);
    killpg(pgid, Signal::SIGKILL).map_err(|e| ExecError::kill_failed(pgid.as_raw(), e.to_string()))
}
