//! Script runner contract: output on success, preserved output on
//! failure, discarded output on timeout, artifact cleanup on every path.

use std::time::Duration;

use e2e_tests::init_tracing;
use timebox_common::ExecError;
use timebox_script::run_script;
use tokio::time::Instant;

#[tokio::test]
async fn test_successful_script_returns_output() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scenario-a.sh");

    let out = run_script("echo hello; exit 0", &path, 5)
        .await
        .expect("script should succeed");

    assert_eq!(out, b"hello\n");
    assert!(!path.exists(), "artifact must be removed after success");
}

#[tokio::test]
async fn test_overrunning_script_times_out() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scenario-b.sh");

    let started = Instant::now();
    let err = run_script("sleep 10", &path, 1)
        .await
        .expect_err("script must time out");
    let elapsed = started.elapsed();

    assert!(err.is_timed_out(), "expected timeout, got {err}");
    assert!(err.partial_output().is_none());
    assert!(elapsed >= Duration::from_secs(1));
    assert!(
        elapsed < Duration::from_secs(3),
        "timeout must not wait out the script (took {elapsed:?})"
    );
    assert!(!path.exists(), "artifact must be removed after timeout");
}

#[tokio::test]
async fn test_timeout_discards_output_already_produced() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("early-output.sh");

    let err = run_script("echo early; sleep 10", &path, 1)
        .await
        .expect_err("script must time out");

    // The deadline outranks the captured bytes: "never finished" must
    // not look like "ran and failed".
    assert!(err.is_timed_out());
    assert!(err.partial_output().is_none());
    assert!(!path.exists());
}

#[tokio::test]
async fn test_failing_script_preserves_output() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scenario-c.sh");

    let err = run_script("echo partial; exit 3", &path, 5)
        .await
        .expect_err("exit 3 must be an error");

    match &err {
        ExecError::NonZeroExit { code, output } => {
            assert_eq!(*code, Some(3));
            assert_eq!(output, b"partial\n");
        }
        other => panic!("expected NonZeroExit, got {other}"),
    }
    assert!(!path.exists(), "artifact must be removed after failure");
}

#[tokio::test]
async fn test_script_captures_stderr_in_combined_output() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stderr.sh");

    let err = run_script("echo oops >&2; exit 1", &path, 5)
        .await
        .expect_err("exit 1 must be an error");

    assert_eq!(err.partial_output(), Some(&b"oops\n"[..]));
}

#[tokio::test]
async fn test_unwritable_path_fails_before_execution() {
    init_tracing();

    let err = run_script("echo hi", "/nonexistent-dir-5529/job.sh", 5)
        .await
        .expect_err("write must fail");

    assert!(matches!(err, ExecError::ScriptWrite { .. }));
}

#[tokio::test]
async fn test_script_inherits_caller_environment() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("env.sh");

    std::env::set_var("TIMEBOX_E2E_MARKER", "inherited");
    let out = run_script("printf '%s' \"$TIMEBOX_E2E_MARKER\"", &path, 5)
        .await
        .expect("script should succeed");

    assert_eq!(out, b"inherited");
}
