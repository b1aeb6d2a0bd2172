//! End-to-end process engine tests against real spawned children.
//!
//! These use in-memory fakes for the store and log sink, and real `sh`
//! children for the processes, so they are gated to unix hosts.
#![cfg(unix)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fs;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::sleep;

use toolchest_core::{
    EntityKind, EntityStatus, EntityStore, ExecutableEntity, LogLevel, LogSink, NetworkConfig,
    StoreError,
};
use toolchest_runtime::{ExecutionCoordinator, LaunchError, ProcessRegistry};

struct InMemoryStore {
    entities: Mutex<HashMap<i64, ExecutableEntity>>,
    transitions: Mutex<Vec<EntityStatus>>,
}

impl InMemoryStore {
    fn with_entities(entities: Vec<ExecutableEntity>) -> Self {
        Self {
            entities: Mutex::new(entities.into_iter().map(|e| (e.id, e)).collect()),
            transitions: Mutex::new(Vec::new()),
        }
    }

    fn transitions(&self) -> Vec<EntityStatus> {
        self.transitions.lock().unwrap().clone()
    }
}

#[async_trait]
impl EntityStore for InMemoryStore {
    async fn get_entity(&self, id: i64) -> Result<ExecutableEntity, StoreError> {
        self.entities
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("entity {id}")))
    }

    async fn set_status(&self, id: i64, status: EntityStatus) -> Result<(), StoreError> {
        let mut entities = self.entities.lock().unwrap();
        let entity = entities
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("entity {id}")))?;
        entity.status = status;
        self.transitions.lock().unwrap().push(status);
        Ok(())
    }

    async fn set_last_used(&self, id: i64, when: DateTime<Utc>) -> Result<(), StoreError> {
        let mut entities = self.entities.lock().unwrap();
        let entity = entities
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("entity {id}")))?;
        entity.last_used = Some(when);
        Ok(())
    }

    async fn get_template(&self, _name: &str) -> Result<Option<NetworkConfig>, StoreError> {
        Ok(None)
    }
}

#[derive(Default)]
struct VecSink {
    lines: Mutex<Vec<(LogLevel, String)>>,
}

impl VecSink {
    fn lines(&self) -> Vec<(LogLevel, String)> {
        self.lines.lock().unwrap().clone()
    }

    fn has_level(&self, level: LogLevel) -> bool {
        self.lines().iter().any(|(l, _)| *l == level)
    }
}

impl LogSink for VecSink {
    fn log(&self, level: LogLevel, message: &str) {
        self.lines.lock().unwrap().push((level, message.to_owned()));
    }
}

struct Harness {
    coordinator: ExecutionCoordinator,
    registry: Arc<ProcessRegistry>,
    store: Arc<InMemoryStore>,
    sink: Arc<VecSink>,
    _dir: TempDir,
}

fn harness(entities: Vec<ExecutableEntity>, dir: TempDir) -> Harness {
    let registry = Arc::new(ProcessRegistry::new());
    let store = Arc::new(InMemoryStore::with_entities(entities));
    let sink = Arc::new(VecSink::default());
    let coordinator = ExecutionCoordinator::new(
        Arc::clone(&registry),
        store.clone() as Arc<dyn EntityStore>,
        sink.clone() as Arc<dyn LogSink>,
    );
    Harness {
        coordinator,
        registry,
        store,
        sink,
        _dir: dir,
    }
}

fn script_entity(id: i64, name: &str, body: &str) -> (ExecutableEntity, TempDir) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(format!("{name}.sh"));
    fs::write(&path, body).unwrap();
    (
        ExecutableEntity::new(id, name, path, EntityKind::Shell),
        dir,
    )
}

async fn wait_for_transitions(store: &InMemoryStore, expected: &[EntityStatus]) {
    tokio::time::timeout(Duration::from_secs(10), async {
        while store.transitions() != expected {
            sleep(Duration::from_millis(25)).await;
        }
    })
    .await
    .unwrap_or_else(|_| {
        panic!(
            "timed out waiting for {expected:?}, saw {:?}",
            store.transitions()
        )
    });
}

#[tokio::test]
async fn successful_run_goes_ready_running_ready() {
    let (entity, dir) = script_entity(1, "probe", "echo starting\nexit 0\n");
    let h = harness(vec![entity], dir);

    h.coordinator.launch(1).await.unwrap();
    wait_for_transitions(&h.store, &[EntityStatus::Running, EntityStatus::Ready]).await;

    assert!(h.sink.has_level(LogLevel::Success));
    assert!(!h.sink.has_level(LogLevel::Error));
    assert!(
        h.sink
            .lines()
            .iter()
            .any(|(_, m)| m == "[ probe ] starting")
    );
    assert!(!h.registry.is_running(1).await);
}

#[tokio::test]
async fn interpreted_entity_runs_through_its_interpreter() {
    let dir = TempDir::new().unwrap();
    let scripts = dir.path().join("scripts");
    fs::create_dir(&scripts).unwrap();
    let path = scripts.join("test.py");
    fs::write(&path, "echo ok\nexit 0\n").unwrap();
    // Interpreter override keeps the test hermetic on hosts without python
    let entity =
        ExecutableEntity::new(1, "test.py", path, EntityKind::Python).with_interpreter("sh");
    let h = harness(vec![entity], dir);

    h.coordinator.launch(1).await.unwrap();
    wait_for_transitions(&h.store, &[EntityStatus::Running, EntityStatus::Ready]).await;
    assert!(h.sink.has_level(LogLevel::Success));
    assert!(!h.sink.has_level(LogLevel::Error));
}

#[tokio::test]
async fn nonzero_exit_is_a_warning_not_an_error() {
    let (entity, dir) = script_entity(2, "flaky", "exit 3\n");
    let h = harness(vec![entity], dir);

    h.coordinator.launch(2).await.unwrap();
    wait_for_transitions(&h.store, &[EntityStatus::Running, EntityStatus::Ready]).await;

    let warning = h
        .sink
        .lines()
        .into_iter()
        .find(|(l, _)| *l == LogLevel::Warning)
        .expect("expected a warning line");
    assert!(warning.1.contains("exit code: 3"));
    assert!(!h.sink.has_level(LogLevel::Error));
}

#[tokio::test]
async fn missing_file_fails_before_spawn() {
    let dir = TempDir::new().unwrap();
    let entity = ExecutableEntity::new(
        3,
        "ghost",
        dir.path().join("does-not-exist.sh"),
        EntityKind::Shell,
    );
    let h = harness(vec![entity], dir);

    let err = h.coordinator.launch(3).await.unwrap_err();
    assert!(matches!(err, LaunchError::FileNotFound { .. }));
    // Straight to Error, never Running, nothing registered
    assert_eq!(h.store.transitions(), vec![EntityStatus::Error]);
    assert_eq!(h.registry.count().await, 0);
}

#[tokio::test]
async fn second_launch_is_rejected_while_running() {
    let (entity, dir) = script_entity(4, "daemon", "sleep 30\n");
    let h = harness(vec![entity], dir);

    h.coordinator.launch(4).await.unwrap();
    wait_for_transitions(&h.store, &[EntityStatus::Running]).await;

    let err = h.coordinator.launch(4).await.unwrap_err();
    assert!(matches!(err, LaunchError::AlreadyRunning { id: 4 }));

    h.coordinator.stop(4).await;
    wait_for_transitions(&h.store, &[EntityStatus::Running, EntityStatus::Ready]).await;
    assert!(!h.coordinator.is_running(4).await);
}

#[tokio::test]
async fn stop_is_observed_by_the_monitor() {
    let (entity, dir) = script_entity(5, "daemon", "sleep 30\n");
    let h = harness(vec![entity], dir);

    h.coordinator.launch(5).await.unwrap();
    wait_for_transitions(&h.store, &[EntityStatus::Running]).await;
    assert!(h.coordinator.is_running(5).await);

    h.coordinator.stop(5).await;
    wait_for_transitions(&h.store, &[EntityStatus::Running, EntityStatus::Ready]).await;
    assert!(h.sink.has_level(LogLevel::Warning));
    assert!(!h.sink.has_level(LogLevel::Error));
}

#[tokio::test]
async fn disabled_entity_is_not_launched() {
    let (mut entity, dir) = script_entity(6, "parked", "exit 0\n");
    entity.status = EntityStatus::Disabled;
    let h = harness(vec![entity], dir);

    let err = h.coordinator.launch(6).await.unwrap_err();
    assert!(matches!(err, LaunchError::Disabled { id: 6 }));
    assert!(h.store.transitions().is_empty());
}

#[tokio::test]
async fn unknown_entity_surfaces_the_store_error() {
    let dir = TempDir::new().unwrap();
    let h = harness(Vec::new(), dir);
    let err = h.coordinator.launch(99).await.unwrap_err();
    assert!(matches!(err, LaunchError::Store(StoreError::NotFound(_))));
}

#[tokio::test]
async fn shutdown_kills_running_processes() {
    let (entity, dir) = script_entity(7, "daemon", "sleep 60\n");
    let h = harness(vec![entity], dir);

    h.coordinator.launch(7).await.unwrap();
    wait_for_transitions(&h.store, &[EntityStatus::Running]).await;

    h.coordinator.shutdown().await;
    tokio::time::timeout(Duration::from_secs(10), async {
        while h.coordinator.is_running(7).await {
            sleep(Duration::from_millis(25)).await;
        }
    })
    .await
    .expect("process survived shutdown");
}
