//! Log sink port for user-visible, severity-tagged log lines.
//!
//! This is the channel the UI renders; operator diagnostics go through
//! `tracing` instead. Implementations must be callable from any task —
//! if a consumer needs thread affinity (e.g. a UI thread), redispatching
//! is the sink's job, not the engine's.

use serde::{Deserialize, Serialize};

/// Severity of a user-visible log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
    Debug,
}

/// Fire-and-forget sink for user-visible log lines.
///
/// Implementations must not block the caller for long.
pub trait LogSink: Send + Sync {
    /// Append one log line at the given severity.
    fn log(&self, level: LogLevel, message: &str);

    fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    fn success(&self, message: &str) {
        self.log(LogLevel::Success, message);
    }

    fn warning(&self, message: &str) {
        self.log(LogLevel::Warning, message);
    }

    fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }
}

/// A log sink that discards everything.
///
/// Useful for tests and headless usage where only tracing output matters.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogSink;

impl LogSink for NoopLogSink {
    fn log(&self, _level: LogLevel, _message: &str) {}
}
