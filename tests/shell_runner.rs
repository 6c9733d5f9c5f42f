// tests/shell_runner.rs

#![cfg(unix)]

use std::error::Error;

use docdag::errors::DocdagError;
use docdag::exec::{CommandRunner, ShellRunner};
use docdag_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn successful_command_returns_ok() -> TestResult {
    init_tracing();

    let runner = ShellRunner;
    with_timeout(runner.run("noop", "true")).await?;
    Ok(())
}

#[tokio::test]
async fn exit_code_is_reported_for_failures() -> TestResult {
    init_tracing();

    let runner = ShellRunner;
    let err = with_timeout(runner.run("boom", "exit 3")).await.unwrap_err();

    match err {
        DocdagError::CommandFailed { name, code } => {
            assert_eq!(name, "boom");
            assert_eq!(code, 3);
        }
        other => panic!("expected CommandFailed, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn commands_run_through_a_shell() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let marker = dir.path().join("ran.txt");

    // Redirection only works if a real shell interprets the command.
    let runner = ShellRunner;
    with_timeout(runner.run("mark", &format!("echo done > {}", marker.display()))).await?;

    assert_eq!(std::fs::read_to_string(&marker)?.trim(), "done");
    Ok(())
}

#[tokio::test]
async fn command_output_is_consumed_without_blocking() -> TestResult {
    init_tracing();

    // Enough output to fill a pipe buffer if nobody drains it.
    let runner = ShellRunner;
    with_timeout(runner.run("chatty", "yes x | head -c 262144")).await?;
    Ok(())
}
