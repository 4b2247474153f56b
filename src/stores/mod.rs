//! Log store plugins
//!
//! This module contains the plugin traits, the capability probe and the two
//! stores every installation ships with:
//! - `logstore_standard`: table-backed writer and reader
//! - `logstore_legacy`: reader with no data

mod capability;
mod legacy;
mod standard;
mod traits;

use std::sync::Arc;

use crate::record::RecordStore;
use crate::registry::{StoreDescriptor, StoreRegistry};

pub use capability::{capabilities_of, Capabilities};
pub use legacy::{LegacyStore, LEGACY_STORE_ID};
pub use standard::{StandardStore, DEFAULT_ORDER, STANDARD_LOG_TABLE, STANDARD_STORE_ID};
pub use traits::{LogReader, LogStore, LogWriter};

/// Register the built-in stores
pub fn register_default_stores(registry: &mut StoreRegistry, db: Arc<dyn RecordStore>) {
    registry.register(
        StoreDescriptor::new(
            STANDARD_STORE_ID,
            StandardStore::NAME,
            StandardStore::DESCRIPTION,
        ),
        move || Ok(Box::new(StandardStore::new(Arc::clone(&db))) as Box<dyn LogStore>),
    );
    registry.register(
        StoreDescriptor::new(LEGACY_STORE_ID, LegacyStore::NAME, LegacyStore::DESCRIPTION),
        || Ok(Box::new(LegacyStore::new()) as Box<dyn LogStore>),
    );
}
