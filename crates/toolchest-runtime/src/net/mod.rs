//! Network interface configuration engine.

pub mod commands;
mod configurator;
mod executor;

pub use commands::{
    apply_sequence, disable_sequence, enable_sequence, posix_interface_name, reset_sequence,
};
pub use configurator::NetworkConfigurator;
pub use executor::{DEFAULT_COMMAND_TIMEOUT, ShellExecutor};
