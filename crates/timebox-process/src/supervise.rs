//! Racing a supervised process against its time budget.

use std::time::Duration;

use timebox_common::{ExecError, ExecResult};
use tokio::sync::oneshot;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::group::GroupChild;
use crate::terminate;

/// Outcome of [`run_with_timeout`].
///
/// Exactly one of two terminal states is reached per supervised process:
/// it completed naturally, or it overran its budget and the whole group
/// was signalled. There is no third outcome.
#[derive(Debug)]
pub struct SuperviseOutcome {
    /// Verdict of the winning side of the race: the child's natural exit
    /// result when it beat the timer, or the kill operation's own result
    /// when it did not.
    pub result: ExecResult<()>,
    /// True when the budget elapsed and the process group was signalled.
    /// A failed kill syscall does not clear this flag; the intent was to
    /// kill.
    pub was_killed: bool,
}

/// Wait for `child` to finish, killing its entire process group if it is
/// still running after `budget`.
///
/// The supervisor does not start the process; [`GroupChild`] guarantees
/// the started-as-group-leader precondition. On the timeout path the
/// natural-completion channel is drained by a detached task so the
/// background waiter is consumed without blocking this call's return,
/// and the waiter itself reaps the killed child.
pub async fn run_with_timeout(child: GroupChild, budget: Duration) -> SuperviseOutcome {
    let pid = child.pid();
    let mut inner = child.child;

    let (done_tx, mut done_rx) = oneshot::channel();
    tokio::spawn(async move {
        // Also reaps the child when the supervisor has already returned
        // on the timeout path.
        let _ = done_tx.send(inner.wait().await);
    });

    tokio::select! {
        waited = &mut done_rx => {
            let result = match waited {
                Ok(Ok(status)) if status.success() => Ok(()),
                Ok(Ok(status)) => Err(ExecError::non_zero_exit(status.code(), Vec::new())),
                Ok(Err(e)) => Err(ExecError::wait_failed(e.to_string())),
                Err(_) => Err(ExecError::CompletionChannelClosed),
            };
            debug!(pid, "process completed within its budget");
            SuperviseOutcome { result, was_killed: false }
        }
        _ = sleep(budget) => {
            warn!(pid, budget = ?budget, "time budget elapsed, killing process group");

            // Drain the loser without blocking the winner: the waiter
            // delivers its result to this detached task once the kill
            // lands.
            tokio::spawn(async move {
                let _ = done_rx.await;
            });

            let result = terminate::kill_group(pid);
            if let Err(e) = &result {
                warn!(pid, error = %e, "process group kill failed");
            }
            SuperviseOutcome { result, was_killed: true }
        }
    }
}
