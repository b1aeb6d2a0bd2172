//! Network configuration domain types and validation.
//!
//! A [`NetworkConfig`] describes a static IPv4 interface configuration the
//! way the UI forms collect it: dotted-quad strings, optional gateway and
//! DNS fields. Validation is pure and fails closed — nothing downstream
//! executes a command sequence built from an unvalidated config.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Static IPv4 configuration for one network interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Interface display name as the user sees it (e.g. "Ethernet", "WLAN").
    pub interface: String,
    /// Static IPv4 address, dotted quad.
    pub address: String,
    /// Subnet mask, dotted quad; must be one of the canonical CIDR masks.
    pub netmask: String,
    /// Default gateway.
    pub gateway: Option<String>,
    /// Primary DNS server.
    pub dns1: Option<String>,
    /// Secondary DNS server.
    pub dns2: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
}

impl NetworkConfig {
    /// Create a config with the required fields; optional fields unset.
    #[must_use]
    pub fn new(
        interface: impl Into<String>,
        address: impl Into<String>,
        netmask: impl Into<String>,
    ) -> Self {
        Self {
            interface: interface.into(),
            address: address.into(),
            netmask: netmask.into(),
            gateway: None,
            dns1: None,
            dns2: None,
            description: None,
        }
    }

    /// Set the default gateway.
    #[must_use]
    pub fn with_gateway(mut self, gateway: impl Into<String>) -> Self {
        self.gateway = Some(gateway.into());
        self
    }

    /// Set the primary DNS server.
    #[must_use]
    pub fn with_dns1(mut self, dns1: impl Into<String>) -> Self {
        self.dns1 = Some(dns1.into());
        self
    }

    /// Set the secondary DNS server.
    #[must_use]
    pub fn with_dns2(mut self, dns2: impl Into<String>) -> Self {
        self.dns2 = Some(dns2.into());
        self
    }

    fn present(value: &Option<String>) -> Option<&str> {
        value.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Gateway, with empty form submissions treated as unset.
    #[must_use]
    pub fn gateway(&self) -> Option<&str> {
        Self::present(&self.gateway)
    }

    /// Primary DNS, with empty form submissions treated as unset.
    #[must_use]
    pub fn dns1(&self) -> Option<&str> {
        Self::present(&self.dns1)
    }

    /// Secondary DNS, with empty form submissions treated as unset.
    #[must_use]
    pub fn dns2(&self) -> Option<&str> {
        Self::present(&self.dns2)
    }
}

/// A saved, named [`NetworkConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkTemplate {
    /// Template name, unique within the store.
    pub name: String,
    #[serde(flatten)]
    pub config: NetworkConfig,
}

/// Observed operational state of an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceState {
    Up,
    Down,
    /// The state could not be read or parsed.
    Unknown,
}

impl fmt::Display for InterfaceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Unknown => "UNKNOWN",
        })
    }
}

/// Which field of a [`NetworkConfig`] failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    Address,
    Gateway,
    Dns1,
    Dns2,
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Address => "address",
            Self::Gateway => "gateway",
            Self::Dns1 => "primary DNS",
            Self::Dns2 => "secondary DNS",
        })
    }
}

/// Field-level validation failure for a [`NetworkConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {value}")]
    InvalidAddress { field: ConfigField, value: String },
    #[error("invalid subnet mask: {value}")]
    InvalidNetmask { value: String },
}

/// The 33 canonical CIDR-aligned subnet masks, /32 down to /0.
///
/// Only contiguous runs of set bits from the most significant bit are
/// valid; per-octet-valid but non-contiguous strings like `255.0.255.0`
/// are deliberately rejected.
const VALID_NETMASKS: [&str; 33] = [
    "255.255.255.255",
    "255.255.255.254",
    "255.255.255.252",
    "255.255.255.248",
    "255.255.255.240",
    "255.255.255.224",
    "255.255.255.192",
    "255.255.255.128",
    "255.255.255.0",
    "255.255.254.0",
    "255.255.252.0",
    "255.255.248.0",
    "255.255.240.0",
    "255.255.224.0",
    "255.255.192.0",
    "255.255.128.0",
    "255.255.0.0",
    "255.254.0.0",
    "255.252.0.0",
    "255.248.0.0",
    "255.240.0.0",
    "255.224.0.0",
    "255.192.0.0",
    "255.128.0.0",
    "255.0.0.0",
    "254.0.0.0",
    "252.0.0.0",
    "248.0.0.0",
    "240.0.0.0",
    "224.0.0.0",
    "192.0.0.0",
    "128.0.0.0",
    "0.0.0.0",
];

/// True iff `s` is four dot-separated decimal octets, each in 0..=255.
#[must_use]
pub fn is_valid_address(s: &str) -> bool {
    let mut octets = 0u32;
    for part in s.split('.') {
        if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        match part.parse::<u16>() {
            Ok(value) if value <= 255 => octets += 1,
            _ => return false,
        }
        if octets > 4 {
            return false;
        }
    }
    octets == 4
}

/// True iff `s` is byte-for-byte one of the 33 canonical subnet masks.
#[must_use]
pub fn is_valid_netmask(s: &str) -> bool {
    VALID_NETMASKS.contains(&s)
}

/// Validate a full configuration, failing on the first bad field.
///
/// Address and netmask are mandatory; gateway and DNS fields are checked
/// only when present and non-empty.
pub fn validate_config(config: &NetworkConfig) -> Result<(), ConfigError> {
    if !is_valid_address(&config.address) {
        return Err(ConfigError::InvalidAddress {
            field: ConfigField::Address,
            value: config.address.clone(),
        });
    }
    if !is_valid_netmask(&config.netmask) {
        return Err(ConfigError::InvalidNetmask {
            value: config.netmask.clone(),
        });
    }
    let optional = [
        (ConfigField::Gateway, config.gateway()),
        (ConfigField::Dns1, config.dns1()),
        (ConfigField::Dns2, config.dns2()),
    ];
    for (field, value) in optional {
        if let Some(value) = value
            && !is_valid_address(value)
        {
            return Err(ConfigError::InvalidAddress {
                field,
                value: value.to_owned(),
            });
        }
    }
    Ok(())
}
