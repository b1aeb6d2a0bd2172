//! Shell command executor port.

use async_trait::async_trait;
use std::time::Duration;

/// Runs one shell command to completion, bounded by a timeout.
///
/// The boolean collapses every failure mode — non-zero exit, spawn
/// refusal, timeout — into `false`; network commands are fire-and-forget
/// and their detail is not surfaced. Tests substitute a recording fake so
/// sequencing logic can be checked without touching the OS.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// True iff the command spawned, exited before `timeout`, and exited zero.
    async fn run(&self, command: &str, timeout: Duration) -> bool;
}
