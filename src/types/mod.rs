//! Data types for the log store dispatcher
//!
//! This module contains the event model, host context values and the shared
//! error type.

mod context;
mod error;
mod event;

pub use context::{AccessContext, RequestContext, CLI_ORIGIN};
pub use error::LogError;
pub use event::{
    Event, EventBuilder, Provenance, LEVEL_OTHER, LEVEL_PARTICIPATING, LEVEL_TEACHING,
    SYSTEM_CONTEXT_ID,
};

/// Result type for log store operations
pub type LogResult<T> = Result<T, LogError>;

/// A storage row: column name to JSON value
pub type Row = serde_json::Map<String, serde_json::Value>;
