//! Spawning commands as process-group leaders.

use std::ffi::OsStr;
use std::path::Path;
use std::process::Stdio;

use timebox_common::{ExecError, ExecResult};
use tokio::process::{Child, Command};
use tracing::debug;

/// Builder for a command that will lead its own process group.
///
/// The group-kill contract only holds when the child is the leader of a
/// fresh process group (group ID equal to its own PID); killing a naked
/// PID risks leaking children that ignored the parent's death. This
/// builder is the only way to obtain a [`GroupChild`], so every process
/// handed to the supervisor satisfies that precondition by construction.
pub struct GroupCommand {
    program: String,
    inner: Command,
}

impl GroupCommand {
    pub fn new(program: impl AsRef<str>) -> Self {
        let program = program.as_ref().to_string();
        let mut inner = Command::new(&program);
        // Group leadership must be established before the exec.
        inner.process_group(0);
        Self { program, inner }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.inner.arg(arg);
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.inner.args(args);
        self
    }

    pub fn env(mut self, key: impl AsRef<OsStr>, value: impl AsRef<OsStr>) -> Self {
        self.inner.env(key, value);
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.inner.current_dir(dir);
        self
    }

    pub fn stdin(mut self, cfg: Stdio) -> Self {
        self.inner.stdin(cfg);
        self
    }

    pub fn stdout(mut self, cfg: Stdio) -> Self {
        self.inner.stdout(cfg);
        self
    }

    pub fn stderr(mut self, cfg: Stdio) -> Self {
        self.inner.stderr(cfg);
        self
    }

    /// Spawn the command as the leader of a new process group.
    pub fn spawn(mut self) -> ExecResult<GroupChild> {
        let child = self
            .inner
            .spawn()
            .map_err(|e| ExecError::spawn_failed(self.program.as_str(), e.to_string()))?;

        let pid = child.id().ok_or_else(|| {
            ExecError::spawn_failed(self.program.as_str(), "PID unavailable after spawn")
        })?;

        debug!(program = %self.program, pid, "spawned process-group leader");
        Ok(GroupChild { child, pid })
    }
}

/// A started child process that leads its own process group.
///
/// The PID is captured at spawn time because the underlying handle
/// forgets it once the process has been reaped, and the supervisor needs
/// it on the kill path after the wait has been handed off.
pub struct GroupChild {
    pub(crate) child: Child,
    pid: u32,
}

impl GroupChild {
    /// PID of the child, which is also its process-group ID.
    pub fn pid(&self) -> u32 {
        self.pid
    }
}
