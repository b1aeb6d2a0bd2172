//! Launch spec construction.
//!
//! Maps an [`ExecutableEntity`] to a concrete argv and working directory.
//! Dispatch is a closed match on [`EntityKind`]; anything the engine does
//! not know how to run fails with [`LaunchError::UnsupportedType`] instead
//! of guessing.

use std::path::PathBuf;
use thiserror::Error;
use tokio::process::Command;

use toolchest_core::{EntityKind, ExecutableEntity, StoreError};

use crate::platform::Platform;
use crate::terminal::open_terminal_spec;

/// Fallback interpreter for Python entities without an override.
const DEFAULT_PYTHON: &str = "python";

/// Errors raised before or at process spawn.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The entity's executable path does not exist on disk.
    #[error("executable not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Kind `other` with no interpreter configured.
    #[error("no interpreter configured for entity kind `{kind}`")]
    UnsupportedType { kind: EntityKind },

    /// The entity is disabled and excluded from launching.
    #[error("entity {id} is disabled")]
    Disabled { id: i64 },

    /// A process for this entity is already registered.
    #[error("entity {id} is already running")]
    AlreadyRunning { id: i64 },

    /// The OS refused to spawn the process.
    #[error("failed to spawn process: {0}")]
    Spawn(#[source] std::io::Error),

    /// The persistence store failed while resolving the entity.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A fully resolved launch: program, argv tail, working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub program: String,
    pub args: Vec<String>,
    /// Parent directory of the entity's path, when it exists; otherwise
    /// the process inherits the caller's working directory.
    pub cwd: Option<PathBuf>,
}

impl LaunchSpec {
    /// Build a [`Command`] ready to spawn.
    #[must_use]
    pub fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if let Some(dir) = &self.cwd {
            command.current_dir(dir);
        }
        command
    }
}

/// Resolve an entity to a launchable spec.
///
/// `parameters` overrides the entity's stored parameter string when
/// present; either way the winning string is split on whitespace. The
/// path existence check runs first so nothing is ever spawned for a
/// missing file.
pub fn build_launch_spec(
    entity: &ExecutableEntity,
    parameters: Option<&str>,
    platform: Platform,
) -> Result<LaunchSpec, LaunchError> {
    if !entity.path.exists() {
        return Err(LaunchError::FileNotFound {
            path: entity.path.clone(),
        });
    }

    let path = entity.path.to_string_lossy().into_owned();
    let cwd = entity
        .path
        .parent()
        .filter(|dir| dir.is_dir())
        .map(PathBuf::from);
    let extra = split_parameters(parameters, entity);

    let spec = match entity.kind {
        EntityKind::NativeExecutable => LaunchSpec {
            program: path,
            args: extra,
            cwd,
        },
        EntityKind::ArchiveExecutable => LaunchSpec {
            program: "java".to_owned(),
            args: prepend(vec!["-jar".to_owned(), path], extra),
            cwd,
        },
        EntityKind::Python => LaunchSpec {
            program: entity.interpreter().unwrap_or(DEFAULT_PYTHON).to_owned(),
            args: prepend(vec![path], extra),
            cwd,
        },
        EntityKind::Shell if platform.is_windows() => {
            // A bare `sh` is frequently unavailable on Windows; open a
            // terminal in the script's directory instead.
            let dir = cwd.unwrap_or_else(|| PathBuf::from("."));
            open_terminal_spec(&entity.name, &dir, platform)
        }
        EntityKind::Shell => LaunchSpec {
            program: "sh".to_owned(),
            args: prepend(vec![path], extra),
            cwd,
        },
        EntityKind::Batch => LaunchSpec {
            program: "cmd".to_owned(),
            args: vec!["/c".to_owned(), path],
            cwd,
        },
        EntityKind::PowerShell => LaunchSpec {
            program: "powershell".to_owned(),
            args: vec!["-File".to_owned(), path],
            cwd,
        },
        EntityKind::Other => match entity.interpreter() {
            Some(interpreter) => LaunchSpec {
                program: interpreter.to_owned(),
                args: prepend(vec![path], extra),
                cwd,
            },
            None => return Err(LaunchError::UnsupportedType { kind: entity.kind }),
        },
    };

    Ok(spec)
}

fn split_parameters(parameters: Option<&str>, entity: &ExecutableEntity) -> Vec<String> {
    parameters
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| entity.parameters())
        .map(|p| p.split_whitespace().map(str::to_owned).collect())
        .unwrap_or_default()
}

fn prepend(mut head: Vec<String>, tail: Vec<String>) -> Vec<String> {
    head.extend(tail);
    head
}
