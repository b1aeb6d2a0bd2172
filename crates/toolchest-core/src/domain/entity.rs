//! Executable entity domain types.
//!
//! An entity is a registered tool or script record: a path on disk, a
//! declared kind that decides how it is launched, and a status that tracks
//! its execution lifecycle. Entities are owned by the persistence store;
//! the execution engine receives snapshots and writes status back through
//! the [`EntityStore`](crate::ports::EntityStore) port.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// How an entity is launched.
///
/// This is a closed set: anything the engine does not recognize must be
/// registered as [`EntityKind::Other`] with an explicit interpreter, and
/// fails launch otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// A native binary, executed directly.
    #[serde(rename = "native-executable")]
    NativeExecutable,
    /// A runnable archive, executed via `java -jar`.
    #[serde(rename = "archive-executable")]
    ArchiveExecutable,
    /// A Python script, executed via the configured interpreter.
    #[serde(rename = "interpreted-python")]
    Python,
    /// A POSIX shell script.
    #[serde(rename = "interpreted-shell")]
    Shell,
    /// A Windows batch file.
    #[serde(rename = "interpreted-batch")]
    Batch,
    /// A PowerShell script.
    #[serde(rename = "interpreted-powershell")]
    PowerShell,
    /// Anything else; requires an explicit interpreter to launch.
    #[serde(rename = "other")]
    Other,
}

impl EntityKind {
    /// Stable string form, identical to the serialized representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NativeExecutable => "native-executable",
            Self::ArchiveExecutable => "archive-executable",
            Self::Python => "interpreted-python",
            Self::Shell => "interpreted-shell",
            Self::Batch => "interpreted-batch",
            Self::PowerShell => "interpreted-powershell",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "native-executable" => Ok(Self::NativeExecutable),
            "archive-executable" => Ok(Self::ArchiveExecutable),
            "interpreted-python" => Ok(Self::Python),
            "interpreted-shell" => Ok(Self::Shell),
            "interpreted-batch" => Ok(Self::Batch),
            "interpreted-powershell" => Ok(Self::PowerShell),
            "other" => Ok(Self::Other),
            _ => Err(format!("unknown entity kind: {s}")),
        }
    }
}

/// Execution lifecycle status of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityStatus {
    /// Registered and launchable.
    Ready,
    /// A process for this entity is currently registered.
    Running,
    /// Excluded from launching until re-enabled.
    Disabled,
    /// The last launch failed before or outside normal process exit.
    Error,
}

impl EntityStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "Ready",
            Self::Running => "Running",
            Self::Disabled => "Disabled",
            Self::Error => "Error",
        }
    }
}

impl fmt::Display for EntityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered tool or script.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutableEntity {
    /// Stable identifier assigned by the store.
    pub id: i64,
    /// Display name, used to tag log lines produced by this entity.
    pub name: String,
    /// Path to the executable or script on disk.
    pub path: PathBuf,
    /// Launch dispatch kind.
    pub kind: EntityKind,
    /// Interpreter override (e.g. a specific `python3` path).
    pub interpreter: Option<String>,
    /// Default parameter string, split on whitespace at launch.
    pub parameters: Option<String>,
    /// Current lifecycle status.
    pub status: EntityStatus,
    /// When this entity was last launched.
    pub last_used: Option<DateTime<Utc>>,
    /// Free-text description.
    pub description: Option<String>,
    /// User-defined grouping category.
    pub category: Option<String>,
}

impl ExecutableEntity {
    /// Create an entity with the required fields; everything else defaults.
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>, path: impl Into<PathBuf>, kind: EntityKind) -> Self {
        Self {
            id,
            name: name.into(),
            path: path.into(),
            kind,
            interpreter: None,
            parameters: None,
            status: EntityStatus::Ready,
            last_used: None,
            description: None,
            category: None,
        }
    }

    /// Set the interpreter override.
    #[must_use]
    pub fn with_interpreter(mut self, interpreter: impl Into<String>) -> Self {
        self.interpreter = Some(interpreter.into());
        self
    }

    /// Set the default parameter string.
    #[must_use]
    pub fn with_parameters(mut self, parameters: impl Into<String>) -> Self {
        self.parameters = Some(parameters.into());
        self
    }

    /// Interpreter override, with empty/whitespace-only values treated as unset.
    #[must_use]
    pub fn interpreter(&self) -> Option<&str> {
        self.interpreter
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Default parameters, with empty/whitespace-only values treated as unset.
    #[must_use]
    pub fn parameters(&self) -> Option<&str> {
        self.parameters
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
