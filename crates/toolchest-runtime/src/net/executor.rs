//! Shell-backed command executor.

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

use toolchest_core::CommandExecutor;

/// Bound on each individual network command.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs commands through the platform shell (`cmd /c` / `sh -c`).
///
/// Commands run with the privileges of this process; elevation (sudo,
/// UAC) is the operator's deployment decision, not baked in here.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellExecutor;

impl ShellExecutor {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandExecutor for ShellExecutor {
    async fn run(&self, command: &str, timeout: Duration) -> bool {
        let mut invocation = if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.args(["/c", command]);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.args(["-c", command]);
            cmd
        };
        invocation
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        let mut child = match invocation.spawn() {
            Ok(child) => child,
            Err(err) => {
                debug!(%command, %err, "failed to spawn shell command");
                return false;
            }
        };

        match tokio::time::timeout(timeout, child.wait()).await {
            Ok(Ok(status)) => status.success(),
            Ok(Err(err)) => {
                debug!(%command, %err, "failed waiting on shell command");
                false
            }
            Err(_) => {
                warn!(%command, "shell command timed out, killing it");
                let _ = child.kill().await;
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[cfg(unix)]
    async fn zero_exit_is_success() {
        assert!(ShellExecutor::new().run("true", DEFAULT_COMMAND_TIMEOUT).await);
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn non_zero_exit_is_failure() {
        assert!(!ShellExecutor::new().run("false", DEFAULT_COMMAND_TIMEOUT).await);
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn unknown_command_is_failure() {
        let executor = ShellExecutor::new();
        assert!(
            !executor
                .run("definitely-not-a-real-command-12345", DEFAULT_COMMAND_TIMEOUT)
                .await
        );
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn timeout_kills_and_reports_failure() {
        let executor = ShellExecutor::new();
        let started = std::time::Instant::now();
        let ok = executor.run("sleep 30", Duration::from_millis(200)).await;
        assert!(!ok);
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
