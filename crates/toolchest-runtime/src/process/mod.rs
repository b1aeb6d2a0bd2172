//! Process execution engine: registry, monitor, coordinator.

mod coordinator;
mod monitor;
mod registry;
pub mod terminate;

pub use coordinator::ExecutionCoordinator;
pub use monitor::ProcessMonitor;
pub use registry::{ProcessHandle, ProcessRegistry};

use toolchest_core::{EntityStatus, EntityStore, LogSink};

/// Persist a status transition, downgrading store failures to a log line.
///
/// Store errors are fatal to the operation that hit them, never to the
/// process (spec for the store boundary), so both the coordinator and the
/// monitor report and continue.
pub(crate) async fn persist_status(
    store: &dyn EntityStore,
    log: &dyn LogSink,
    entity_id: i64,
    status: EntityStatus,
) {
    if let Err(err) = store.set_status(entity_id, status).await {
        log.error(&format!(
            "failed to persist status {status} for entity {entity_id}: {err}"
        ));
    }
}
