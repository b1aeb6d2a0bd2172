//! Pid-based process termination.
//!
//! The monitor owns each `Child` (it must wait on it), so stop requests
//! and teardown work through signals by pid instead of the handle. The
//! monitor's `wait` then observes the death and reaps the process.

use std::io;

#[cfg(unix)]
use std::time::Duration;
#[cfg(unix)]
use tokio::time::sleep;

#[cfg(unix)]
use nix::errno::Errno;
#[cfg(unix)]
use nix::sys::signal::{self, Signal};
#[cfg(unix)]
use nix::unistd::Pid;

/// How long a process gets to exit after SIGTERM before escalation.
#[cfg(unix)]
const GRACE_PERIOD: Duration = Duration::from_secs(5);
#[cfg(unix)]
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// True if a process with this pid currently exists.
///
/// On Windows there is no cheap liveness probe without extra API surface;
/// callers fall back to registry membership, which the monitor keeps
/// current.
#[must_use]
pub fn pid_alive(pid: u32) -> bool {
    #[cfg(unix)]
    {
        signal::kill(Pid::from_raw(pid as i32), None).is_ok()
    }

    #[cfg(not(unix))]
    {
        let _ = pid;
        true
    }
}

/// Request termination with SIGTERM, escalating to SIGKILL after the
/// grace period. Returns once the process is observed gone (or on
/// Windows, once taskkill has run).
pub async fn terminate_pid(pid: u32) -> io::Result<()> {
    #[cfg(unix)]
    {
        terminate_unix(pid).await
    }

    #[cfg(not(unix))]
    {
        terminate_windows(pid).await
    }
}

#[cfg(unix)]
async fn terminate_unix(pid: u32) -> io::Result<()> {
    let nix_pid = Pid::from_raw(pid as i32);

    // Phase 1: SIGTERM
    if let Err(err) = signal::kill(nix_pid, Signal::SIGTERM) {
        if err == Errno::ESRCH {
            // Already gone
            return Ok(());
        }
        return Err(io::Error::other(err));
    }

    if poll_until_gone(nix_pid, GRACE_PERIOD).await {
        return Ok(());
    }

    // Phase 2: SIGKILL
    if let Err(err) = signal::kill(nix_pid, Signal::SIGKILL) {
        if err == Errno::ESRCH {
            return Ok(());
        }
        return Err(io::Error::other(err));
    }

    if poll_until_gone(nix_pid, Duration::from_secs(2)).await {
        return Ok(());
    }

    Err(io::Error::new(
        io::ErrorKind::TimedOut,
        format!("process {pid} did not exit after SIGKILL"),
    ))
}

#[cfg(unix)]
async fn poll_until_gone(pid: Pid, budget: Duration) -> bool {
    let polls = (budget.as_millis() / POLL_INTERVAL.as_millis()).max(1);
    for _ in 0..polls {
        sleep(POLL_INTERVAL).await;
        match signal::kill(pid, None) {
            Ok(()) => {
                // Still alive, keep polling
            }
            Err(Errno::ESRCH) => return true,
            Err(_) => {
                // Permission or other error - assume still alive
            }
        }
    }
    false
}

#[cfg(not(unix))]
async fn terminate_windows(pid: u32) -> io::Result<()> {
    // No SIGTERM equivalent; taskkill the process tree
    let output = tokio::process::Command::new("taskkill")
        .args(["/PID", &pid.to_string(), "/T", "/F"])
        .output()
        .await?;
    let _ = output;
    Ok(())
}

/// Best-effort immediate kill, used at application teardown.
pub fn force_kill(pid: u32) {
    #[cfg(unix)]
    {
        let _ = signal::kill(Pid::from_raw(pid as i32), Signal::SIGKILL);
    }

    #[cfg(not(unix))]
    {
        let _ = std::process::Command::new("taskkill")
            .args(["/PID", &pid.to_string(), "/T", "/F"])
            .output();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::process::Command;

    #[tokio::test]
    #[cfg(unix)]
    async fn terminate_handles_already_gone_pid() {
        // A pid that's very unlikely to exist
        let result = terminate_pid(999_999).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn terminate_stops_a_sleeping_process() {
        let mut child = Command::new("sleep")
            .arg("60")
            .spawn()
            .expect("failed to spawn sleep");
        let pid = child.id().expect("no pid");

        terminate_pid(pid).await.expect("terminate failed");

        // Reap to avoid a zombie, then verify it is gone
        let _ = child.wait().await;
        assert!(!pid_alive(pid));
    }

    #[test]
    #[cfg(unix)]
    fn pid_alive_sees_our_own_process() {
        assert!(pid_alive(std::process::id()));
    }
}
