//! CLI adapter for the toolchest engines.
//!
//! Wires the JSON file-backed store and the terminal log sink to the
//! process and network engines. All composition happens in `main`; the
//! handlers only see ports and engine types.

pub mod cli;
pub mod handlers;
pub mod sink;
pub mod store;

pub use cli::{Cli, Commands, NetCommands};
pub use sink::TerminalSink;
pub use store::JsonFileStore;
