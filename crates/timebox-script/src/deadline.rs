//! Deadline-bound cancellation scopes.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::{CancellationToken, DropGuard};

/// A wall-clock budget paired with its start instant.
///
/// The deadline owns a cancellation token that fires when the budget
/// elapses, and a drop guard that fires it unconditionally when the
/// deadline leaves scope, so subordinate operations cannot outlive the
/// call that created them.
pub struct Deadline {
    budget: Duration,
    started: Instant,
    token: CancellationToken,
    _guard: DropGuard,
}

impl Deadline {
    /// Start a deadline of `budget` measured from now.
    pub fn after(budget: Duration) -> Self {
        let token = CancellationToken::new();

        let timer = token.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(budget) => timer.cancel(),
                // Scope already released; nothing left to time.
                _ = timer.cancelled() => {}
            }
        });

        Self {
            budget,
            started: Instant::now(),
            _guard: token.clone().drop_guard(),
            token,
        }
    }

    /// Run `fut` until it completes or the deadline fires, whichever
    /// comes first.
    ///
    /// Returns `None` when the deadline won the race; `fut` is dropped
    /// at that point.
    pub async fn bound<F: Future>(&self, fut: F) -> Option<F::Output> {
        tokio::select! {
            // Expiry outranks a simultaneously-ready result.
            biased;
            _ = self.token.cancelled() => None,
            out = fut => Some(out),
        }
    }

    /// Whether the deadline has fired.
    ///
    /// Expiry is not automatically distinguishable from other failures
    /// of a bounded operation; callers check it explicitly after the
    /// wait returns.
    pub fn expired(&self) -> bool {
        self.token.is_cancelled()
    }

    /// The configured budget.
    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Time since the deadline was created.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl std::fmt::Debug for Deadline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deadline")
            .field("budget", &self.budget)
            .field("elapsed", &self.elapsed())
            .field("expired", &self.expired())
            .finish()
    }
}
