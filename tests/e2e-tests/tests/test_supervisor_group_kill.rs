//! Supervisor contract: a process that overruns its budget is killed
//! together with every descendant it spawned.

use std::time::Duration;

use e2e_tests::{assert_gone_within, init_tracing, wait_for_pid_file};
use timebox_process::{run_with_timeout, GroupCommand};
use tokio::time::Instant;

#[tokio::test]
async fn test_timeout_kills_whole_process_group() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let pid_file = dir.path().join("child.pid");

    // The shell spawns a long-running child and reports its PID, then
    // blocks on it. Killing only the shell would leak the child.
    let child = GroupCommand::new("sh")
        .arg("-c")
        .arg(format!(
            "sleep 30 & echo $! > {}; wait",
            pid_file.display()
        ))
        .spawn()
        .expect("spawn sh");
    let shell_pid = child.pid();

    let grandchild_pid = wait_for_pid_file(&pid_file, Duration::from_secs(2)).await;

    let started = Instant::now();
    let outcome = run_with_timeout(child, Duration::from_millis(300)).await;

    assert!(outcome.was_killed);
    assert!(
        outcome.result.is_ok(),
        "group kill reported: {:?}",
        outcome.result
    );
    assert!(
        started.elapsed() < Duration::from_secs(2),
        "return must not wait out the natural runtime"
    );

    assert_gone_within(shell_pid, Duration::from_secs(2)).await;
    assert_gone_within(grandchild_pid, Duration::from_secs(2)).await;
}

#[tokio::test]
async fn test_fast_process_is_not_killed() {
    init_tracing();

    let child = GroupCommand::new("sh")
        .arg("-c")
        .arg("echo done")
        .spawn()
        .expect("spawn sh");
    let pid = child.pid();

    let outcome = run_with_timeout(child, Duration::from_secs(5)).await;
    assert!(!outcome.was_killed);
    assert!(outcome.result.is_ok());

    assert_gone_within(pid, Duration::from_secs(2)).await;
}

#[tokio::test]
async fn test_overshoot_is_bounded() {
    init_tracing();

    let child = GroupCommand::new("sleep")
        .arg("10")
        .spawn()
        .expect("spawn sleep");

    let budget = Duration::from_secs(1);
    let started = Instant::now();
    let outcome = run_with_timeout(child, budget).await;
    let elapsed = started.elapsed();

    assert!(outcome.was_killed);
    assert!(elapsed >= budget, "timer must not fire early");
    assert!(
        elapsed < budget + Duration::from_millis(750),
        "kill must land within scheduling slack of the budget (took {elapsed:?})"
    );
}

#[tokio::test]
async fn test_natural_failure_is_distinguished_from_kill() {
    init_tracing();

    let child = GroupCommand::new("sh")
        .arg("-c")
        .arg("exit 3")
        .spawn()
        .expect("spawn sh");

    let outcome = run_with_timeout(child, Duration::from_secs(5)).await;
    assert!(!outcome.was_killed, "a natural failure is not a kill");
    let err = outcome.result.expect_err("exit 3 must be an error");
    assert_eq!(err.exit_code(), Some(3));
}
