//! CLI entry point - the composition root.
//!
//! This is the only place where infrastructure is wired together: the
//! JSON store, the terminal sink, the registry, and the engines. Command
//! dispatch routes to handlers which only see ports and engine types.

use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use toolchest_cli::handlers::{entities, network};
use toolchest_cli::{Cli, Commands, JsonFileStore, TerminalSink};
use toolchest_core::{EntityStore, LogSink};
use toolchest_runtime::{ExecutionCoordinator, ProcessRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let store_path = cli.store.unwrap_or_else(JsonFileStore::default_path);
    tracing::debug!(path = %store_path.display(), "opening store");
    let store = Arc::new(JsonFileStore::open(store_path)?);
    let sink: Arc<dyn LogSink> = Arc::new(TerminalSink);

    let registry = Arc::new(ProcessRegistry::new());
    let coordinator = Arc::new(ExecutionCoordinator::new(
        Arc::clone(&registry),
        Arc::clone(&store) as Arc<dyn EntityStore>,
        Arc::clone(&sink),
    ));

    let result = match cli.command {
        Commands::List => entities::handle_list(&store).await,
        Commands::Add(args) => entities::handle_add(&store, args).await,
        Commands::Run(args) => entities::handle_run(Arc::clone(&coordinator), args).await,
        Commands::Stop { id } => entities::handle_stop(&coordinator, id).await,
        Commands::Terminal { id } => entities::handle_terminal(&coordinator, id).await,
        Commands::Net(command) => network::handle_net(&store, Arc::clone(&sink), command).await,
    };

    // Nothing launched by this invocation survives it
    coordinator.shutdown().await;
    result
}
