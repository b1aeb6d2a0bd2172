//! Per-launch process supervision.
//!
//! One monitor task per spawned process. It forwards every output line to
//! the log sink tagged with the entity's display name, waits for exit,
//! classifies the outcome, and writes the resulting status through the
//! store. A non-zero exit is a normal tool outcome (warning, status
//! Ready); only launch-time and stream failures mark the entity Error.

use std::io;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::task::JoinHandle;
use tracing::debug;

use toolchest_core::{EntityStatus, EntityStore, LogSink};

use super::persist_status;
use super::registry::ProcessRegistry;

/// Supervises one spawned child until it exits.
pub struct ProcessMonitor {
    registry: Arc<ProcessRegistry>,
    store: Arc<dyn EntityStore>,
    log: Arc<dyn LogSink>,
}

impl ProcessMonitor {
    #[must_use]
    pub fn new(
        registry: Arc<ProcessRegistry>,
        store: Arc<dyn EntityStore>,
        log: Arc<dyn LogSink>,
    ) -> Self {
        Self {
            registry,
            store,
            log,
        }
    }

    /// Detach the monitor onto a background task.
    pub fn spawn(self, entity_id: i64, name: String, child: Child) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(entity_id, name, child).await })
    }

    async fn run(self, entity_id: i64, name: String, mut child: Child) {
        let stdout = child
            .stdout
            .take()
            .map(|stream| forward_lines(stream, name.clone(), Arc::clone(&self.log)));
        let stderr = child
            .stderr
            .take()
            .map(|stream| forward_lines(stream, name.clone(), Arc::clone(&self.log)));

        // Drain both streams before waiting; a task failure is a stream
        // error, not a process outcome.
        let mut stream_failure: Option<io::Error> = None;
        for reader in [stdout, stderr].into_iter().flatten() {
            match reader.await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => stream_failure = Some(err),
                Err(err) => stream_failure = Some(io::Error::other(err)),
            }
        }

        let exit = child.wait().await;
        debug!(entity_id, ?exit, "monitored process finished");

        if let Some(err) = stream_failure {
            self.log
                .error(&format!("output stream error for {name}: {err}"));
            persist_status(&*self.store, &*self.log, entity_id, EntityStatus::Error).await;
            self.registry.remove(entity_id).await;
            return;
        }

        match exit {
            Ok(status) if status.success() => {
                self.log.success(&format!("{name} finished (exit code: 0)"));
                persist_status(&*self.store, &*self.log, entity_id, EntityStatus::Ready).await;
            }
            Ok(status) => {
                match status.code() {
                    Some(code) => self
                        .log
                        .warning(&format!("{name} finished (exit code: {code})")),
                    None => self.log.warning(&format!("{name} was terminated")),
                }
                persist_status(&*self.store, &*self.log, entity_id, EntityStatus::Ready).await;
            }
            Err(err) => {
                self.log.error(&format!("failed waiting on {name}: {err}"));
                persist_status(&*self.store, &*self.log, entity_id, EntityStatus::Error).await;
            }
        }

        // Entry removal last: liveness checks self-correct in the window,
        // and the child (with its OS resources) drops with this task.
        self.registry.remove(entity_id).await;
    }
}

/// Forward one output stream to the sink, line by line, in order.
fn forward_lines<R>(stream: R, name: String, log: Arc<dyn LogSink>) -> JoinHandle<io::Result<()>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(stream).lines();
        while let Some(line) = lines.next_line().await? {
            log.info(&format!("[ {name} ] {line}"));
        }
        Ok(())
    })
}
