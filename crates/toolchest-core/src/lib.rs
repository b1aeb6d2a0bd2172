//! Core domain types and port definitions for toolchest.
//!
//! This crate holds the entity and network-configuration domain model and
//! the trait abstractions (ports) the execution engines expect from
//! infrastructure. It contains no process or filesystem implementation
//! details — those live in `toolchest-runtime` and the adapters.

pub mod domain;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{
    ConfigError, ConfigField, EntityKind, EntityStatus, ExecutableEntity, InterfaceState,
    NetworkConfig, NetworkTemplate, is_valid_address, is_valid_netmask, validate_config,
};
pub use ports::{
    CommandExecutor, EntityStore, LogLevel, LogSink, NoopLogSink, StoreError,
};
