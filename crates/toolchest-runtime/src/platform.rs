//! Host platform tag.
//!
//! Command building differs between the netsh and ip worlds; everything
//! downstream takes the tag as a value so tests can exercise both paths
//! from any host.

/// The two command dialects the engines speak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// netsh / cmd.exe.
    Windows,
    /// ip / dhclient / sh.
    Posix,
}

impl Platform {
    /// The platform this binary was compiled for.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Posix
        }
    }

    #[must_use]
    pub const fn is_windows(self) -> bool {
        matches!(self, Self::Windows)
    }
}
