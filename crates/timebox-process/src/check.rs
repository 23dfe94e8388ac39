//! Process existence checking.

use nix::errno::Errno;
use nix::sys::signal::kill;
use nix::unistd::Pid;
use timebox_common::{ExecError, ExecResult};

/// Check whether a process with the given PID currently exists.
///
/// Non-destructive: `kill(pid, 0)` delivers no signal, it only probes.
/// A process that has exited but not yet been reaped still counts as
/// existing.
///
/// # Returns
///
/// * `Ok(true)` - process exists
/// * `Ok(false)` - no such process
/// * `Err(_)` - the probe itself failed
pub fn process_exists(pid: u32) -> ExecResult<bool> {
    match kill(Pid::from_raw(pid as i32), None) {
        Ok(_) => Ok(true),
        Err(Errno::ESRCH) => Ok(false),
        // The process exists but belongs to someone else.
        Err(Errno::EPERM) => Ok(true),
        Err(e) => Err(ExecError::wait_failed(format!(
            "failed to probe PID {pid}: {e}"
        ))),
    }
}
