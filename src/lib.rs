//! Logstore
//!
//! A pluggable event log dispatcher. Events are fanned out to every enabled
//! writer store, and callers query the reader stores their access context
//! allows.
//!
//! # Modules
//!
//! - `types`: Core data structures (Event, Provenance, contexts, errors)
//! - `config`: Sources for the ordered list of enabled stores
//! - `registry`: Identifier to constructor mapping for store plugins
//! - `stores`: Plugin traits, capability probe and the built-in stores
//! - `manager`: Lazy, request scoped dispatcher
//! - `ingest`: JSON lines in, per-store summary out
//! - `record`: Record store trait, filter grammar and reference backends
//! - `validation`: Event field validation
//! - `utils`: Utility functions (timestamps)
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use logstore::config::StaticConfig;
//! use logstore::record::{MemoryRecordStore, Params};
//! use logstore::stores::register_default_stores;
//! use logstore::{AccessContext, Event, LogManager, RequestContext, StoreRegistry};
//!
//! let mut registry = StoreRegistry::new();
//! register_default_stores(&mut registry, Arc::new(MemoryRecordStore::new()));
//!
//! let manager = LogManager::new(
//!     Arc::new(registry),
//!     Arc::new(StaticConfig::new("logstore_standard")),
//!     RequestContext::new("127.0.0.1"),
//! );
//!
//! let event = Event::builder("\\core\\event\\user_loggedin").user_id(2).build()?;
//! assert!(manager.store(&event).is_ok());
//!
//! let readers = manager.get_readers(&AccessContext::system());
//! let params = Params::positional([serde_json::json!(2)]);
//! let count = readers["logstore_standard"].get_events_count("userid = ?", &params)?;
//! assert_eq!(count, 1);
//! # Ok::<(), logstore::LogError>(())
//! ```

pub mod config;
pub mod ingest;
pub mod manager;
pub mod record;
pub mod registry;
pub mod stores;
pub mod types;
pub mod utils;
pub mod validation;

// Re-export commonly used items at crate root
pub use manager::{LogManager, ReaderMap, StoreReport, WriterFailure};
pub use registry::{PluginInfo, RegisteredStore, StoreDescriptor, StoreRegistry};
pub use stores::{capabilities_of, Capabilities, LogReader, LogStore, LogWriter};
pub use types::{
    AccessContext, Event, EventBuilder, LogError, LogResult, Provenance, RequestContext, Row,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
