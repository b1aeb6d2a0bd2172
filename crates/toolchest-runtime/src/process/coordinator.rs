//! Top-level launch/stop entry point for the UI layer.
//!
//! The coordinator validates preconditions, builds the launch spec,
//! spawns, registers, and hands the child to a detached monitor. Every
//! status transition is persisted through the store and mirrored by one
//! classified log line before control returns.

use std::process::Stdio;
use std::sync::Arc;
use chrono::Utc;
use tracing::{debug, info};

use toolchest_core::{EntityStatus, EntityStore, LogSink};

use super::monitor::ProcessMonitor;
use super::persist_status;
use super::registry::{ProcessHandle, ProcessRegistry};
use crate::launch::{LaunchError, build_launch_spec};
use crate::platform::Platform;
use crate::terminal::open_terminal_spec;

/// Orchestrates entity launches against the registry, store, and sink.
pub struct ExecutionCoordinator {
    registry: Arc<ProcessRegistry>,
    store: Arc<dyn EntityStore>,
    log: Arc<dyn LogSink>,
    platform: Platform,
}

impl ExecutionCoordinator {
    #[must_use]
    pub fn new(
        registry: Arc<ProcessRegistry>,
        store: Arc<dyn EntityStore>,
        log: Arc<dyn LogSink>,
    ) -> Self {
        Self::with_platform(registry, store, log, Platform::current())
    }

    /// Like [`Self::new`] with an explicit platform tag (test seam).
    #[must_use]
    pub fn with_platform(
        registry: Arc<ProcessRegistry>,
        store: Arc<dyn EntityStore>,
        log: Arc<dyn LogSink>,
        platform: Platform,
    ) -> Self {
        Self {
            registry,
            store,
            log,
            platform,
        }
    }

    /// Launch an entity with its stored parameters.
    pub async fn launch(&self, entity_id: i64) -> Result<(), LaunchError> {
        self.launch_with_parameters(entity_id, None).await
    }

    /// Launch an entity, optionally overriding its parameter string.
    ///
    /// Precondition failures (unknown id, disabled, already running,
    /// missing file, unsupported kind) are returned to the caller;
    /// everything after a successful spawn is observed through the log
    /// sink and entity status.
    pub async fn launch_with_parameters(
        &self,
        entity_id: i64,
        parameters: Option<&str>,
    ) -> Result<(), LaunchError> {
        let entity = self.store.get_entity(entity_id).await?;

        if entity.status == EntityStatus::Disabled {
            self.log.warning(&format!("{} is disabled", entity.name));
            return Err(LaunchError::Disabled { id: entity_id });
        }
        if self.registry.is_running(entity_id).await {
            self.log
                .warning(&format!("{} is already running", entity.name));
            return Err(LaunchError::AlreadyRunning { id: entity_id });
        }

        let spec = match build_launch_spec(&entity, parameters, self.platform) {
            Ok(spec) => spec,
            Err(err) => {
                self.log
                    .error(&format!("cannot launch {}: {err}", entity.name));
                persist_status(&*self.store, &*self.log, entity_id, EntityStatus::Error).await;
                return Err(err);
            }
        };

        self.log.info(&format!("launching {}", entity.name));
        debug!(entity_id, program = %spec.program, args = ?spec.args, "spawning");

        let mut command = spec.command();
        command.stdout(Stdio::piped()).stderr(Stdio::piped());
        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(err) => {
                self.log
                    .error(&format!("failed to start {}: {err}", entity.name));
                persist_status(&*self.store, &*self.log, entity_id, EntityStatus::Error).await;
                return Err(LaunchError::Spawn(err));
            }
        };

        let handle = ProcessHandle::new(entity_id, entity.name.clone(), child.id());
        if let Err(err) = self.registry.register(handle).await {
            // Lost a race with a concurrent launch; don't leave the extra
            // process behind.
            let _ = child.kill().await;
            return Err(err);
        }

        persist_status(&*self.store, &*self.log, entity_id, EntityStatus::Running).await;
        if let Err(err) = self.store.set_last_used(entity_id, Utc::now()).await {
            self.log
                .error(&format!("failed to record last use of {}: {err}", entity.name));
        }

        let _monitor = ProcessMonitor::new(
            Arc::clone(&self.registry),
            Arc::clone(&self.store),
            Arc::clone(&self.log),
        )
        .spawn(entity_id, entity.name, child);

        Ok(())
    }

    /// Request termination of a running entity.
    ///
    /// A no-op for ids that are not running. The Running → Ready status
    /// transition is performed by the monitor when it observes the death,
    /// keeping a single status writer per entity.
    pub async fn stop(&self, entity_id: i64) {
        if self.registry.stop(entity_id).await {
            self.log
                .info(&format!("stop requested for entity {entity_id}"));
        } else {
            debug!(entity_id, "stop requested but nothing is running");
        }
    }

    /// True iff a process for this entity is currently alive.
    pub async fn is_running(&self, entity_id: i64) -> bool {
        self.registry.is_running(entity_id).await
    }

    /// Open an OS terminal window in the entity's directory.
    pub async fn open_terminal(&self, entity_id: i64) -> Result<(), LaunchError> {
        let entity = self.store.get_entity(entity_id).await?;
        let Some(dir) = entity.path.parent().filter(|dir| dir.is_dir()) else {
            self.log
                .error(&format!("no directory to open for {}", entity.name));
            return Err(LaunchError::FileNotFound {
                path: entity.path.clone(),
            });
        };
        let spec = open_terminal_spec(&entity.name, dir, self.platform);
        match spec.command().spawn() {
            Ok(_child) => {
                // The terminal outlives us; dropping the handle detaches it
                self.log
                    .success(&format!("opened a terminal in {}", dir.display()));
                Ok(())
            }
            Err(err) => {
                self.log
                    .error(&format!("failed to open a terminal: {err}"));
                Err(LaunchError::Spawn(err))
            }
        }
    }

    /// Forcefully terminate everything at application teardown.
    pub async fn shutdown(&self) {
        info!("shutting down execution coordinator");
        self.registry.shutdown_all().await;
    }
}
