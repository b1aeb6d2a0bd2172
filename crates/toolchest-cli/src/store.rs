//! JSON file-backed entity store.
//!
//! One document holds every entity and template. The whole document is
//! rewritten on each mutation — fine for a personal tool catalog, and it
//! keeps the file hand-editable.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::sync::Mutex;

use toolchest_core::{
    EntityKind, EntityStatus, EntityStore, ExecutableEntity, NetworkConfig, NetworkTemplate,
    StoreError,
};

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    entities: Vec<ExecutableEntity>,
    #[serde(default)]
    templates: Vec<NetworkTemplate>,
}

/// [`EntityStore`] implementation over a single JSON document on disk.
pub struct JsonFileStore {
    path: PathBuf,
    document: Mutex<StoreDocument>,
}

impl JsonFileStore {
    /// Open (or initialize) a store at `path`.
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let document = if path.exists() {
            serde_json::from_str(&std::fs::read_to_string(&path)?)?
        } else {
            StoreDocument::default()
        };
        Ok(Self {
            path,
            document: Mutex::new(document),
        })
    }

    /// Default store location under the user data directory.
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("toolchest")
            .join("store.json")
    }

    async fn persist(&self, document: &StoreDocument) -> Result<(), StoreError> {
        let body = serde_json::to_string_pretty(document)
            .map_err(|err| StoreError::Storage(err.to_string()))?;
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| StoreError::Storage(err.to_string()))?;
        }
        tokio::fs::write(&self.path, body)
            .await
            .map_err(|err| StoreError::Storage(err.to_string()))
    }

    /// Register a new entity, assigning the next free id.
    pub async fn add_entity(
        &self,
        name: String,
        path: PathBuf,
        kind: EntityKind,
        interpreter: Option<String>,
        parameters: Option<String>,
    ) -> Result<ExecutableEntity, StoreError> {
        let mut document = self.document.lock().await;
        let id = document
            .entities
            .iter()
            .map(|e| e.id)
            .max()
            .unwrap_or(0)
            + 1;
        let mut entity = ExecutableEntity::new(id, name, path, kind);
        entity.interpreter = interpreter;
        entity.parameters = parameters;
        document.entities.push(entity.clone());
        self.persist(&document).await?;
        Ok(entity)
    }

    /// Snapshot of every registered entity.
    pub async fn list_entities(&self) -> Vec<ExecutableEntity> {
        self.document.lock().await.entities.clone()
    }

    /// Save (or replace) a named template.
    pub async fn save_template(&self, template: NetworkTemplate) -> Result<(), StoreError> {
        let mut document = self.document.lock().await;
        document.templates.retain(|t| t.name != template.name);
        document.templates.push(template);
        self.persist(&document).await
    }
}

#[async_trait]
impl EntityStore for JsonFileStore {
    async fn get_entity(&self, id: i64) -> Result<ExecutableEntity, StoreError> {
        self.document
            .lock()
            .await
            .entities
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("entity {id}")))
    }

    async fn set_status(&self, id: i64, status: EntityStatus) -> Result<(), StoreError> {
        let mut document = self.document.lock().await;
        let entity = document
            .entities
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("entity {id}")))?;
        entity.status = status;
        self.persist(&document).await
    }

    async fn set_last_used(&self, id: i64, when: DateTime<Utc>) -> Result<(), StoreError> {
        let mut document = self.document.lock().await;
        let entity = document
            .entities
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("entity {id}")))?;
        entity.last_used = Some(when);
        self.persist(&document).await
    }

    async fn get_template(&self, name: &str) -> Result<Option<NetworkConfig>, StoreError> {
        Ok(self
            .document
            .lock()
            .await
            .templates
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.config.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> JsonFileStore {
        JsonFileStore::open(dir.path().join("store.json")).unwrap()
    }

    #[tokio::test]
    async fn entities_round_trip_through_the_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let entity = store
            .add_entity(
                "sqlmap".into(),
                "/opt/sqlmap/sqlmap.py".into(),
                EntityKind::Python,
                Some("python3".into()),
                None,
            )
            .await
            .unwrap();
        assert_eq!(entity.id, 1);
        store
            .set_status(entity.id, EntityStatus::Running)
            .await
            .unwrap();

        // A fresh handle sees the persisted state
        let reopened = store_in(&dir);
        let loaded = reopened.get_entity(1).await.unwrap();
        assert_eq!(loaded.name, "sqlmap");
        assert_eq!(loaded.status, EntityStatus::Running);
        assert_eq!(loaded.interpreter.as_deref(), Some("python3"));
    }

    #[tokio::test]
    async fn ids_keep_increasing() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        for name in ["a", "b", "c"] {
            store
                .add_entity(
                    name.into(),
                    "/bin/true".into(),
                    EntityKind::NativeExecutable,
                    None,
                    None,
                )
                .await
                .unwrap();
        }
        let ids: Vec<i64> = store.list_entities().await.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn templates_are_looked_up_by_name() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store
            .save_template(NetworkTemplate {
                name: "lab".into(),
                config: NetworkConfig::new("Ethernet", "192.168.56.10", "255.255.255.0")
                    .with_gateway("192.168.56.1"),
            })
            .await
            .unwrap();

        let config = store.get_template("lab").await.unwrap().unwrap();
        assert_eq!(config.address, "192.168.56.10");
        assert!(store.get_template("prod").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(matches!(
            store.get_entity(404).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.set_status(404, EntityStatus::Ready).await,
            Err(StoreError::NotFound(_))
        ));
    }
}
