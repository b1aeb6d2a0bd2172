//! Network configuration orchestration.
//!
//! Validates, builds the platform command sequence, and executes it in
//! order, fail-fast. There is no rollback: network commands are not
//! transactional, and compensating actions risk leaving the host worse
//! off than the partial apply.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

use toolchest_core::{
    CommandExecutor, InterfaceState, LogSink, NetworkConfig, validate_config,
};

use super::commands::{
    apply_sequence, disable_sequence, enable_sequence, posix_interface_name, reset_sequence,
};
use super::executor::DEFAULT_COMMAND_TIMEOUT;
use crate::platform::Platform;

/// netsh address changes settle asynchronously; space out the follow-ups.
const WINDOWS_COMMAND_PAUSE: Duration = Duration::from_millis(500);

/// Applies, resets, enables/disables, and queries network interfaces.
///
/// Commands run unprivileged through the injected executor; on most hosts
/// the process needs `CAP_NET_ADMIN` (or an elevated shell on Windows)
/// for the sequences to succeed.
pub struct NetworkConfigurator {
    executor: Arc<dyn CommandExecutor>,
    log: Arc<dyn LogSink>,
    platform: Platform,
    command_timeout: Duration,
}

impl NetworkConfigurator {
    #[must_use]
    pub fn new(executor: Arc<dyn CommandExecutor>, log: Arc<dyn LogSink>) -> Self {
        Self::with_platform(executor, log, Platform::current())
    }

    /// Like [`Self::new`] with an explicit platform tag (test seam).
    #[must_use]
    pub fn with_platform(
        executor: Arc<dyn CommandExecutor>,
        log: Arc<dyn LogSink>,
        platform: Platform,
    ) -> Self {
        Self {
            executor,
            log,
            platform,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    /// Apply a static configuration.
    ///
    /// Validation failures execute nothing and return `false`. A failing
    /// command aborts the remainder and leaves the interface in whatever
    /// partially-applied state the earlier commands produced.
    pub async fn apply(&self, config: &NetworkConfig) -> bool {
        if let Err(err) = validate_config(config) {
            self.log
                .error(&format!("network configuration rejected: {err}"));
            return false;
        }
        let commands = apply_sequence(config, self.platform);
        if !self.run_sequence(&commands).await {
            return false;
        }
        self.log.success(&format!(
            "static configuration applied to {}",
            config.interface
        ));
        true
    }

    /// Hand the interface back to DHCP (release, then renew).
    pub async fn reset_to_dhcp(&self, interface: &str) -> bool {
        let commands = reset_sequence(interface, self.platform);
        if !self.run_sequence(&commands).await {
            return false;
        }
        self.log.success(&format!("{interface} reset to DHCP"));
        true
    }

    /// Bring the interface up.
    pub async fn enable(&self, interface: &str) -> bool {
        let commands = enable_sequence(interface, self.platform);
        if !self.run_sequence(&commands).await {
            return false;
        }
        self.log.success(&format!("{interface} enabled"));
        true
    }

    /// Take the interface down.
    pub async fn disable(&self, interface: &str) -> bool {
        let commands = disable_sequence(interface, self.platform);
        if !self.run_sequence(&commands).await {
            return false;
        }
        self.log.success(&format!("{interface} disabled"));
        true
    }

    /// Read the operational state of an interface.
    ///
    /// Never fails: anything that cannot be read or parsed is
    /// [`InterfaceState::Unknown`].
    pub async fn query_status(&self, interface: &str) -> InterfaceState {
        match self.platform {
            Platform::Windows => query_windows_state(interface).await,
            Platform::Posix => query_posix_state(posix_interface_name(interface)).await,
        }
    }

    async fn run_sequence(&self, commands: &[String]) -> bool {
        for (index, command) in commands.iter().enumerate() {
            if index > 0 && self.platform.is_windows() {
                sleep(WINDOWS_COMMAND_PAUSE).await;
            }
            debug!(%command, "executing network command");
            if !self.executor.run(command, self.command_timeout).await {
                self.log
                    .error(&format!("command failed, aborting sequence: {command}"));
                return false;
            }
        }
        true
    }
}

async fn query_windows_state(interface: &str) -> InterfaceState {
    let output = tokio::process::Command::new("netsh")
        .args(["interface", "show", "interface", interface])
        .output()
        .await;
    match output {
        Ok(output) => parse_netsh_state(&String::from_utf8_lossy(&output.stdout)),
        Err(_) => InterfaceState::Unknown,
    }
}

fn parse_netsh_state(output: &str) -> InterfaceState {
    for line in output.lines() {
        let lowered = line.to_lowercase();
        if lowered.contains("connect state") {
            if lowered.contains("disconnected") {
                return InterfaceState::Down;
            }
            if lowered.contains("connected") {
                return InterfaceState::Up;
            }
            return InterfaceState::Unknown;
        }
    }
    InterfaceState::Unknown
}

async fn query_posix_state(device: &str) -> InterfaceState {
    match tokio::fs::read_to_string(operstate_path(device)).await {
        Ok(contents) => parse_operstate(&contents),
        Err(_) => InterfaceState::Unknown,
    }
}

fn operstate_path(device: &str) -> PathBuf {
    PathBuf::from(format!("/sys/class/net/{device}/operstate"))
}

fn parse_operstate(contents: &str) -> InterfaceState {
    if contents.trim() == "up" {
        InterfaceState::Up
    } else {
        InterfaceState::Down
    }
}
