//! Process registry: the single authority on what is currently running.
//!
//! A mutex-guarded id → handle table. Entries are inserted at launch and
//! removed by the monitor on exit, by `stop`, or lazily when a liveness
//! check observes a dead pid. Construct one registry at process start and
//! share it by `Arc`; nothing here is a global.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::terminate::{force_kill, pid_alive, terminate_pid};
use crate::launch::LaunchError;

/// Serializable view of one running process.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessHandle {
    /// Entity this process was launched for.
    pub entity_id: i64,
    /// Entity display name, carried for log tagging.
    pub name: String,
    /// OS process id, when the spawn reported one.
    pub pid: Option<u32>,
    /// When the process was started.
    pub started_at: DateTime<Utc>,
}

impl ProcessHandle {
    #[must_use]
    pub fn new(entity_id: i64, name: impl Into<String>, pid: Option<u32>) -> Self {
        Self {
            entity_id,
            name: name.into(),
            pid,
            started_at: Utc::now(),
        }
    }

    fn alive(&self) -> bool {
        self.pid.is_none_or(pid_alive)
    }
}

/// Process-wide table of running processes, keyed by entity id.
#[derive(Default)]
pub struct ProcessRegistry {
    entries: Mutex<HashMap<i64, ProcessHandle>>,
}

impl ProcessRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly spawned process.
    ///
    /// At most one handle per entity id: a second registration for a live
    /// entry is rejected with [`LaunchError::AlreadyRunning`]. A stale
    /// entry whose pid is dead is replaced silently.
    pub async fn register(&self, handle: ProcessHandle) -> Result<(), LaunchError> {
        let mut entries = self.entries.lock().await;
        if let Some(existing) = entries.get(&handle.entity_id)
            && existing.alive()
        {
            return Err(LaunchError::AlreadyRunning {
                id: handle.entity_id,
            });
        }
        debug!(entity_id = handle.entity_id, pid = ?handle.pid, "registered process");
        entries.insert(handle.entity_id, handle);
        Ok(())
    }

    /// Look up the handle for an entity, if one is registered.
    pub async fn handle(&self, entity_id: i64) -> Option<ProcessHandle> {
        self.entries.lock().await.get(&entity_id).cloned()
    }

    /// True iff a handle exists and the underlying process has not exited.
    ///
    /// A dead entry observed here is pruned so the table converges even if
    /// the monitor has not caught up yet.
    pub async fn is_running(&self, entity_id: i64) -> bool {
        let mut entries = self.entries.lock().await;
        match entries.get(&entity_id) {
            Some(handle) if handle.alive() => true,
            Some(_) => {
                entries.remove(&entity_id);
                false
            }
            None => false,
        }
    }

    /// Remove an entry without touching the process. Used by the monitor
    /// once the process has been reaped.
    pub async fn remove(&self, entity_id: i64) -> Option<ProcessHandle> {
        self.entries.lock().await.remove(&entity_id)
    }

    /// Stop a running process: graceful request first, forceful after the
    /// grace period, entry removed either way.
    ///
    /// Idempotent — stopping an unknown or already-stopped id is a no-op
    /// and returns `false`.
    pub async fn stop(&self, entity_id: i64) -> bool {
        let removed = self.entries.lock().await.remove(&entity_id);
        let Some(handle) = removed else {
            return false;
        };
        if let Some(pid) = handle.pid {
            if let Err(err) = terminate_pid(pid).await {
                warn!(entity_id, pid, %err, "failed to terminate process cleanly");
            }
        }
        true
    }

    /// Forcefully terminate every registered process. Application teardown
    /// only; no grace period.
    pub async fn shutdown_all(&self) {
        let drained: Vec<ProcessHandle> = {
            let mut entries = self.entries.lock().await;
            entries.drain().map(|(_, handle)| handle).collect()
        };
        for handle in drained {
            debug!(entity_id = handle.entity_id, pid = ?handle.pid, "force-killing at shutdown");
            if let Some(pid) = handle.pid {
                force_kill(pid);
            }
        }
    }

    /// Snapshot of all registered handles.
    pub async fn list(&self) -> Vec<ProcessHandle> {
        self.entries.lock().await.values().cloned().collect()
    }

    /// Number of registered processes.
    pub async fn count(&self) -> usize {
        self.entries.lock().await.len()
    }
}
