// src/exec/runner.rs

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

use crate::errors::{DocdagError, Result};

/// Trait abstracting how build steps invoke their external commands.
///
/// Production code uses [`ShellRunner`]; tests can provide their own
/// implementation that records invocations instead of spawning real
/// processes.
pub trait CommandRunner: Send + Sync {
    /// Run `cmd` on behalf of the step named `name` and wait for it.
    ///
    /// A non-zero exit status is an error.
    fn run(&self, name: &str, cmd: &str) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Runs commands through the platform shell, streaming output into the
/// log.
#[derive(Debug, Clone, Default)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&self, name: &str, cmd: &str) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let name = name.to_string();
        let cmd = cmd.to_string();
        Box::pin(async move { run_shell_command(&name, &cmd).await })
    }
}

async fn run_shell_command(name: &str, cmd: &str) -> Result<()> {
    info!(step = %name, cmd = %cmd, "running step command");

    // Build a shell command appropriate for the platform.
    let mut command = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(cmd);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(cmd);
        c
    };

    command
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = command
        .spawn()
        .with_context(|| format!("spawning command for step '{}'", name))?;

    // Consume both pipes so buffers don't fill; log at debug.
    if let Some(stdout) = child.stdout.take() {
        let step = name.to_string();
        tokio::spawn(async move {
            let reader = BufReader::new(stdout);
            let mut lines = reader.lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(step = %step, "stdout: {}", line);
            }
        });
    }
    if let Some(stderr) = child.stderr.take() {
        let step = name.to_string();
        tokio::spawn(async move {
            let reader = BufReader::new(stderr);
            let mut lines = reader.lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(step = %step, "stderr: {}", line);
            }
        });
    }

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for command of step '{}'", name))?;

    let code = status.code().unwrap_or(-1);
    debug!(step = %name, exit_code = code, success = status.success(), "step command exited");

    if status.success() {
        Ok(())
    } else {
        Err(DocdagError::CommandFailed {
            name: name.to_string(),
            code,
        })
    }
}
