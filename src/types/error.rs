//! Error type shared by every layer of the crate

use thiserror::Error;

/// Errors raised by stores, record backends and event construction
#[derive(Debug, Error)]
pub enum LogError {
    /// I/O error from a file-backed record store
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The record store rejected an insert or query
    #[error("storage error: {0}")]
    Storage(String),

    /// Filter expression or its parameters could not be evaluated
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// Event could not be built or restored
    #[error("invalid event: {0}")]
    InvalidEvent(String),

    /// A store plugin failed for a reason of its own
    #[error("plugin error: {0}")]
    Plugin(String),
}
