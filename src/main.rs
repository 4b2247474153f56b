//! Logstore - Binary Entry Point
//!
//! Reads one JSON event per line from stdin, dispatches each through a log
//! manager configured from the environment, then prints one JSON summary line
//! per reader (event count and newest timestamp) followed by a totals line.
//! The work happens in [`logstore::ingest::run_ingest`].
//!
//! Environment:
//! - `LOGSTORE_DATA_DIR`: directory for JSONL tables (default `data`)
//! - `LOGSTORE_ENABLED_STORES`: comma-separated store ids (default `logstore_standard`)
//! - `LOGSTORE_ORIGIN`: origin stamped on stored events (default `cli`)
//! - `LOGSTORE_REAL_USER`: real user id when acting as another user
//! - `RUST_LOG`: log filter (logs go to stderr)

use std::env;
use std::io::{self, BufWriter};
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use logstore::config::{ConfigSource, EnvConfig, StaticConfig, ENABLED_STORES_ENV};
use logstore::ingest::run_ingest;
use logstore::record::JsonlRecordStore;
use logstore::stores::{register_default_stores, STANDARD_STORE_ID};
use logstore::types::CLI_ORIGIN;
use logstore::{AccessContext, LogManager, LogResult, RequestContext, StoreRegistry};

fn request_from_env() -> RequestContext {
    let origin = env::var("LOGSTORE_ORIGIN").unwrap_or_else(|_| CLI_ORIGIN.to_string());
    let request = RequestContext::new(origin);
    match env::var("LOGSTORE_REAL_USER").ok().and_then(|v| v.parse().ok()) {
        Some(real_user) => request.logged_in_as(real_user),
        None => request,
    }
}

fn config_from_env() -> Arc<dyn ConfigSource> {
    let config = EnvConfig::default();
    if config.enabled_stores().is_some() {
        Arc::new(config)
    } else {
        tracing::debug!(
            var = ENABLED_STORES_ENV,
            default = STANDARD_STORE_ID,
            "Enabled stores not configured, using default"
        );
        Arc::new(StaticConfig::new(STANDARD_STORE_ID))
    }
}

fn main() -> LogResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let data_dir = env::var("LOGSTORE_DATA_DIR").unwrap_or_else(|_| "data".to_string());
    let db = Arc::new(JsonlRecordStore::new(&data_dir));

    let mut registry = StoreRegistry::new();
    register_default_stores(&mut registry, db);

    let mut manager = LogManager::new(Arc::new(registry), config_from_env(), request_from_env());

    let stdin = io::stdin();
    let stdout = io::stdout();
    run_ingest(
        &manager,
        stdin.lock(),
        BufWriter::new(stdout.lock()),
        &AccessContext::system(),
    )?;

    manager.dispose();
    Ok(())
}
