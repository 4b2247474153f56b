//! Store plugin registry
//!
//! Maps store identifiers to constructors. The registry is filled once at
//! startup (see [`crate::stores::register_default_stores`]) and shared by
//! every manager; it never builds instances on its own.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::config::{is_enabled, settings_section_name, short_name, ConfigSource};
use crate::stores::LogStore;
use crate::types::LogResult;

/// Constructor for a store instance
pub type StoreFactory = Arc<dyn Fn() -> LogResult<Box<dyn LogStore>> + Send + Sync>;

/// Static metadata about a registered store
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct StoreDescriptor {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl StoreDescriptor {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
        }
    }
}

/// A descriptor paired with its constructor
#[derive(Clone)]
pub struct RegisteredStore {
    descriptor: StoreDescriptor,
    factory: StoreFactory,
}

impl RegisteredStore {
    pub fn id(&self) -> &str {
        &self.descriptor.id
    }

    pub fn descriptor(&self) -> &StoreDescriptor {
        &self.descriptor
    }

    /// Build a fresh instance
    pub fn construct(&self) -> LogResult<Box<dyn LogStore>> {
        (self.factory)()
    }
}

impl fmt::Debug for RegisteredStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredStore")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// Admin view of one store: metadata plus its enabled state
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PluginInfo {
    pub id: String,
    #[serde(rename = "shortName")]
    pub short_name: String,
    pub name: String,
    pub description: String,
    pub enabled: bool,
    #[serde(rename = "settingsSection")]
    pub settings_section: String,
    #[serde(rename = "uninstallAllowed")]
    pub uninstall_allowed: bool,
}

/// Ordered set of available stores, unique by identifier
#[derive(Clone, Default)]
pub struct StoreRegistry {
    stores: Vec<RegisteredStore>,
}

impl StoreRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a store
    ///
    /// Re-registering an identifier replaces its constructor in place.
    pub fn register<F>(&mut self, descriptor: StoreDescriptor, factory: F) -> &mut Self
    where
        F: Fn() -> LogResult<Box<dyn LogStore>> + Send + Sync + 'static,
    {
        let entry = RegisteredStore {
            descriptor,
            factory: Arc::new(factory),
        };
        match self.stores.iter_mut().find(|s| s.id() == entry.id()) {
            Some(existing) => *existing = entry,
            None => self.stores.push(entry),
        }
        self
    }

    /// Every registered store, in registration order
    pub fn list_available_stores(&self) -> &[RegisteredStore] {
        &self.stores
    }

    /// Look up a store by identifier
    pub fn resolve(&self, id: &str) -> Option<&RegisteredStore> {
        self.stores.iter().find(|s| s.id() == id)
    }

    /// Get the number of registered stores
    pub fn store_count(&self) -> usize {
        self.stores.len()
    }

    /// Describe every registered store against the current configuration
    pub fn plugin_infos(&self, config: &dyn ConfigSource) -> Vec<PluginInfo> {
        self.stores
            .iter()
            .map(|s| PluginInfo {
                id: s.descriptor.id.clone(),
                short_name: short_name(&s.descriptor.id).to_string(),
                name: s.descriptor.name.clone(),
                description: s.descriptor.description.clone(),
                enabled: is_enabled(config, &s.descriptor.id),
                settings_section: settings_section_name(&s.descriptor.id),
                uninstall_allowed: true,
            })
            .collect()
    }
}

impl fmt::Debug for StoreRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.stores.iter().map(|s| s.id()))
            .finish()
    }
}
