//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces the execution engines expect from
//! infrastructure: the persistence store, the user-visible log channel,
//! and the shell-command runner. They contain no implementation details
//! and use only domain types.

mod command_executor;
mod entity_store;
mod log_sink;

pub use command_executor::CommandExecutor;
pub use entity_store::{EntityStore, StoreError};
pub use log_sink::{LogLevel, LogSink, NoopLogSink};
