//! Entity commands: list, add, run, stop, terminal.

use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use toolchest_core::EntityKind;
use toolchest_runtime::ExecutionCoordinator;

use crate::cli::{AddArgs, RunArgs};
use crate::store::JsonFileStore;

pub async fn handle_list(store: &JsonFileStore) -> anyhow::Result<()> {
    let entities = store.list_entities().await;
    if entities.is_empty() {
        println!("no entities registered; try `toolchest add`");
        return Ok(());
    }
    println!("{:<5} {:<24} {:<24} {:<9} path", "id", "name", "kind", "status");
    for entity in entities {
        println!(
            "{:<5} {:<24} {:<24} {:<9} {}",
            entity.id,
            entity.name,
            entity.kind,
            entity.status,
            entity.path.display()
        );
    }
    Ok(())
}

pub async fn handle_add(store: &JsonFileStore, args: AddArgs) -> anyhow::Result<()> {
    let kind: EntityKind = args
        .kind
        .parse()
        .map_err(|err: String| anyhow::anyhow!(err))?;
    let entity = store
        .add_entity(args.name, args.path, kind, args.interpreter, args.parameters)
        .await
        .context("failed to register entity")?;
    println!("registered {} as entity {}", entity.name, entity.id);
    Ok(())
}

pub async fn handle_run(
    coordinator: Arc<ExecutionCoordinator>,
    args: RunArgs,
) -> anyhow::Result<()> {
    let parameters = (!args.parameters.is_empty()).then(|| args.parameters.join(" "));
    coordinator
        .launch_with_parameters(args.id, parameters.as_deref())
        .await?;

    if let Some(secs) = args.kill_after {
        let coordinator = Arc::clone(&coordinator);
        let id = args.id;
        tokio::spawn(async move {
            sleep(Duration::from_secs(secs)).await;
            coordinator.stop(id).await;
        });
    }

    // Stay attached until the monitor reports completion
    while coordinator.is_running(args.id).await {
        sleep(Duration::from_millis(200)).await;
    }
    // Give the monitor a beat to flush its final classification line
    sleep(Duration::from_millis(100)).await;
    Ok(())
}

pub async fn handle_stop(coordinator: &ExecutionCoordinator, id: i64) -> anyhow::Result<()> {
    if coordinator.is_running(id).await {
        coordinator.stop(id).await;
    } else {
        println!("entity {id} is not running in this session");
    }
    Ok(())
}

pub async fn handle_terminal(coordinator: &ExecutionCoordinator, id: i64) -> anyhow::Result<()> {
    coordinator.open_terminal(id).await?;
    Ok(())
}
