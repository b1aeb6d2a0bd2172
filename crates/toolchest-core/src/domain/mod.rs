//! Domain types, independent of any infrastructure concerns.

mod entity;
mod network;

pub use entity::{EntityKind, EntityStatus, ExecutableEntity};
pub use network::{
    ConfigError, ConfigField, InterfaceState, NetworkConfig, NetworkTemplate, is_valid_address,
    is_valid_netmask, validate_config,
};
