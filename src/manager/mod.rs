//! Log manager
//!
//! The manager fans events out to every enabled writer and hands callers the
//! readers they are allowed to query. Store instances are built lazily on the
//! first `store` or `get_readers` call and kept until [`LogManager::dispose`].
//!
//! ```text
//! Uninitialized ──store/get_readers──► Initialized ──dispose──► Uninitialized
//! ```
//!
//! A manager is request scoped and not `Sync`; concurrent requests each build
//! their own from a shared registry and config source.

mod report;

use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::{enabled_store_ids, ConfigSource};
use crate::registry::{RegisteredStore, StoreRegistry};
use crate::stores::{capabilities_of, Capabilities, LogReader, LogStore};
use crate::types::{AccessContext, Event, RequestContext};

pub use report::{StoreReport, WriterFailure};

/// Readers visible to a caller, keyed by store identifier
pub type ReaderMap<'a> = BTreeMap<&'a str, &'a dyn LogReader>;

struct LoadedStore {
    id: String,
    store: Box<dyn LogStore>,
    capabilities: Capabilities,
}

/// Instantiated stores; `writers` and `readers` index into `stores`
#[derive(Default)]
struct ManagerState {
    stores: Vec<LoadedStore>,
    writers: Vec<usize>,
    readers: Vec<usize>,
}

/// Dispatches events to enabled log stores
pub struct LogManager {
    registry: Arc<StoreRegistry>,
    config: Arc<dyn ConfigSource>,
    request: RequestContext,
    state: OnceCell<ManagerState>,
}

impl LogManager {
    /// Create an uninitialized manager for one request
    pub fn new(
        registry: Arc<StoreRegistry>,
        config: Arc<dyn ConfigSource>,
        request: RequestContext,
    ) -> Self {
        Self {
            registry,
            config,
            request,
            state: OnceCell::new(),
        }
    }

    /// Context of the request this manager serves
    pub fn request(&self) -> &RequestContext {
        &self.request
    }

    /// Every store the registry knows about, enabled or not
    pub fn get_store_plugins(&self) -> &[RegisteredStore] {
        self.registry.list_available_stores()
    }

    /// Whether store instances have been built
    pub fn is_initialized(&self) -> bool {
        self.state.get().is_some()
    }

    /// Identifiers of the instantiated stores, in write order
    pub fn enabled_stores(&self) -> Vec<&str> {
        self.init().stores.iter().map(|s| s.id.as_str()).collect()
    }

    /// Capabilities of an instantiated store
    pub fn capabilities(&self, store_id: &str) -> Option<Capabilities> {
        self.init()
            .stores
            .iter()
            .find(|s| s.id == store_id)
            .map(|s| s.capabilities)
    }

    /// Send `event` to every writer
    ///
    /// Writers run in configured order. A failing writer is logged and
    /// recorded in the report; the remaining writers still run.
    pub fn store(&self, event: &Event) -> StoreReport {
        let state = self.init();
        let mut report = StoreReport::default();

        for &index in &state.writers {
            let loaded = &state.stores[index];
            let Some(writer) = loaded.store.as_writer() else {
                continue;
            };

            match writer.store(event, self) {
                Ok(()) => report.delivered.push(loaded.id.clone()),
                Err(error) => {
                    tracing::warn!(
                        plugin = %loaded.id,
                        event = %event.event_name(),
                        error = %error,
                        "Exception detected when logging event"
                    );
                    report.failures.push(WriterFailure {
                        plugin: loaded.id.clone(),
                        event_name: event.event_name().to_string(),
                        error,
                    });
                }
            }
        }

        report
    }

    /// Readers that grant access to `context`
    pub fn get_readers(&self, context: &AccessContext) -> ReaderMap<'_> {
        let state = self.init();
        let mut readers = ReaderMap::new();

        for &index in &state.readers {
            let loaded = &state.stores[index];
            if let Some(reader) = loaded.store.as_reader() {
                if reader.can_access(context) {
                    readers.insert(loaded.id.as_str(), reader);
                }
            }
        }

        readers
    }

    /// Dispose every store and return to the uninitialized state
    ///
    /// The next `store` or `get_readers` call re-reads the configuration.
    pub fn dispose(&mut self) {
        if let Some(mut state) = self.state.take() {
            for loaded in &mut state.stores {
                loaded.store.dispose();
            }
            tracing::info!(stores = state.stores.len(), "Log manager disposed");
        }
    }

    fn init(&self) -> &ManagerState {
        self.state.get_or_init(|| self.load_state())
    }

    fn load_state(&self) -> ManagerState {
        let mut state = ManagerState::default();

        let enabled = enabled_store_ids(self.config.as_ref());
        if enabled.is_empty() {
            tracing::debug!("No log stores enabled");
            return state;
        }

        for id in enabled {
            if state.stores.iter().any(|s| s.id == id) {
                tracing::debug!(plugin = %id, "Log store listed twice, ignoring repeat");
                continue;
            }
            let Some(entry) = self.registry.resolve(&id) else {
                tracing::debug!(plugin = %id, "Log store not installed, skipping");
                continue;
            };
            let store = match entry.construct() {
                Ok(store) => store,
                Err(e) => {
                    tracing::debug!(plugin = %id, error = %e, "Log store failed to load, skipping");
                    continue;
                }
            };

            let capabilities = capabilities_of(store.as_ref());
            let index = state.stores.len();
            if capabilities.writer {
                state.writers.push(index);
            }
            if capabilities.reader {
                state.readers.push(index);
            }
            tracing::debug!(plugin = %id, capabilities = %capabilities, "Log store loaded");
            state.stores.push(LoadedStore {
                id,
                store,
                capabilities,
            });
        }

        tracing::info!(
            stores = state.stores.len(),
            writers = state.writers.len(),
            readers = state.readers.len(),
            "Log manager initialized"
        );
        state
    }
}

impl Drop for LogManager {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for LogManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogManager")
            .field("request", &self.request)
            .field("initialized", &self.is_initialized())
            .finish_non_exhaustive()
    }
}
