//! Process execution and network configuration engines for toolchest.
//!
//! Two engines live here. The process engine launches registered tools and
//! scripts as child processes, tracks them in a registry, and supervises
//! each one with a background monitor that streams output and classifies
//! the outcome. The network engine translates a validated
//! [`NetworkConfig`](toolchest_core::NetworkConfig) into an ordered,
//! platform-specific command sequence and executes it fail-fast through
//! the platform shell.
//!
//! Both engines are presentation-agnostic: outcomes surface through the
//! store and sink ports defined in `toolchest-core`.

#![deny(unsafe_code)]

pub mod launch;
pub mod net;
pub mod platform;
pub mod process;
pub mod terminal;

// Re-export the engine entry points
pub use launch::{LaunchError, LaunchSpec, build_launch_spec};
pub use net::{DEFAULT_COMMAND_TIMEOUT, NetworkConfigurator, ShellExecutor};
pub use platform::Platform;
pub use process::{ExecutionCoordinator, ProcessHandle, ProcessMonitor, ProcessRegistry};
pub use terminal::open_terminal_spec;
