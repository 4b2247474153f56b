//! Outcome of a single `store` dispatch

use crate::types::LogError;

/// A writer that failed to persist an event
#[derive(Debug)]
pub struct WriterFailure {
    /// Identifier of the failing store
    pub plugin: String,
    /// Name of the event being logged
    pub event_name: String,
    pub error: LogError,
}

/// Per-writer results of [`super::LogManager::store`]
#[derive(Debug, Default)]
pub struct StoreReport {
    /// Stores that accepted the event, in dispatch order
    pub delivered: Vec<String>,
    /// Stores that failed, in dispatch order
    pub failures: Vec<WriterFailure>,
}

impl StoreReport {
    /// True when no writer failed (including when there were no writers)
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of writers that were invoked
    pub fn attempted(&self) -> usize {
        self.delivered.len() + self.failures.len()
    }
}
