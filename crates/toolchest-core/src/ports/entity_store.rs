//! Entity store trait definition.
//!
//! The store owns entity records and network templates; the engines only
//! read snapshots and write status back through this port. Store failures
//! are fatal to the operation that hit them, never to the process.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{EntityStatus, ExecutableEntity, NetworkConfig};

/// Storage-boundary error, with backend details flattened to strings.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Storage backend error (database, filesystem, etc.).
    #[error("storage error: {0}")]
    Storage(String),
}

/// Persistence port for entities and network templates.
///
/// # Design Rules
///
/// - No storage types in signatures; implementations handle
///   serialization internally
/// - Status writes come from at most one coordinator/monitor at a time
///   per entity, so implementations need no per-record locking
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Fetch an entity snapshot by id.
    async fn get_entity(&self, id: i64) -> Result<ExecutableEntity, StoreError>;

    /// Persist a status transition.
    async fn set_status(&self, id: i64, status: EntityStatus) -> Result<(), StoreError>;

    /// Persist the last-used timestamp.
    async fn set_last_used(&self, id: i64, when: DateTime<Utc>) -> Result<(), StoreError>;

    /// Look up a saved network template by name.
    async fn get_template(&self, name: &str) -> Result<Option<NetworkConfig>, StoreError>;
}
