//! Module logging context
//!
//! The host hands every module callback a [`ModuleContext`]. Operator-facing
//! output goes through its five channels; nothing else is reported.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

/// Leveled logging handle passed to module callbacks
pub trait ModuleContext {
    /// Informational message
    fn info(&self, msg: &str);
    /// Diagnostic detail
    fn debug(&self, msg: &str);
    /// Positive confirmation
    fn success(&self, msg: &str);
    /// Failure message
    fn error(&self, msg: &str);
    /// Headline result of the module
    fn highlight(&self, msg: &str);
}

/// Forwards module output to `tracing`, tagged with the module name
#[derive(Debug, Clone)]
pub struct TracingContext {
    module: String,
}

impl TracingContext {
    pub fn new(module: impl Into<String>) -> Self {
        Self { module: module.into() }
    }
}

impl ModuleContext for TracingContext {
    fn info(&self, msg: &str) {
        info!(module = %self.module, "{}", msg);
    }

    fn debug(&self, msg: &str) {
        debug!(module = %self.module, "{}", msg);
    }

    fn success(&self, msg: &str) {
        info!(module = %self.module, status = "success", "{}", msg);
    }

    fn error(&self, msg: &str) {
        error!(module = %self.module, "{}", msg);
    }

    fn highlight(&self, msg: &str) {
        info!(module = %self.module, status = "highlight", "{}", msg);
    }
}

/// Output channel of a recorded message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Debug,
    Success,
    Error,
    Highlight,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
}

/// Captures module output in memory, in emission order
#[derive(Debug, Default)]
pub struct RecordingContext {
    records: Mutex<Vec<LogRecord>>,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, level: LogLevel, msg: &str) {
        // A poisoned lock only means another recorder call panicked; keep recording.
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        records.push(LogRecord {
            level,
            message: msg.to_string(),
        });
    }

    /// Snapshot of everything recorded so far
    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Messages recorded on one channel
    pub fn messages(&self, level: LogLevel) -> Vec<String> {
        self.records()
            .into_iter()
            .filter(|r| r.level == level)
            .map(|r| r.message)
            .collect()
    }
}

impl ModuleContext for RecordingContext {
    fn info(&self, msg: &str) {
        self.push(LogLevel::Info, msg);
    }

    fn debug(&self, msg: &str) {
        self.push(LogLevel::Debug, msg);
    }

    fn success(&self, msg: &str) {
        self.push(LogLevel::Success, msg);
    }

    fn error(&self, msg: &str) {
        self.push(LogLevel::Error, msg);
    }

    fn highlight(&self, msg: &str) {
        self.push(LogLevel::Highlight, msg);
    }
}

/// Install a console `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `default_directive`. Returns `false` when
/// a global subscriber was already installed.
pub fn init_logging(default_directive: &str) -> bool {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let console_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_ansi(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .try_init()
        .is_ok()
}
