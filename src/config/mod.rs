//! Configuration for enabled log stores
//!
//! The only setting the dispatcher consumes is an ordered, comma-separated
//! list of store identifiers. A [`ConfigSource`] is asked for it each time a
//! manager initializes, so toggles made between requests are picked up by
//! the next manager (or by the same one after `dispose`).

use parking_lot::RwLock;

/// Environment variable read by [`EnvConfig`] by default
pub const ENABLED_STORES_ENV: &str = "LOGSTORE_ENABLED_STORES";

/// Prefix shared by all log store identifiers
pub const STORE_PREFIX: &str = "logstore_";

/// Source of the enabled store list
pub trait ConfigSource: Send + Sync {
    /// Raw comma-separated identifiers, `None` when unset
    fn enabled_stores(&self) -> Option<String>;
}

/// Split a raw list into identifiers, dropping blanks
pub fn parse_enabled_stores(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Ordered identifiers currently enabled by `source`
pub fn enabled_store_ids(source: &dyn ConfigSource) -> Vec<String> {
    source
        .enabled_stores()
        .map(|raw| parse_enabled_stores(&raw))
        .unwrap_or_default()
}

/// Whether `store_id` appears in the enabled list
pub fn is_enabled(source: &dyn ConfigSource, store_id: &str) -> bool {
    enabled_store_ids(source).iter().any(|id| id == store_id)
}

/// Identifier without the `logstore_` prefix
pub fn short_name(store_id: &str) -> &str {
    store_id.strip_prefix(STORE_PREFIX).unwrap_or(store_id)
}

/// Name of the settings section a store's options live under
pub fn settings_section_name(store_id: &str) -> String {
    format!("logsetting{}", short_name(store_id))
}

/// Fixed list, set once
#[derive(Debug, Clone, Default)]
pub struct StaticConfig {
    enabled: String,
}

impl StaticConfig {
    /// Create from a raw comma-separated list
    pub fn new(enabled: impl Into<String>) -> Self {
        Self {
            enabled: enabled.into(),
        }
    }

    /// Create from individual identifiers
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ids: Vec<String> = ids.into_iter().map(|s| s.as_ref().to_string()).collect();
        Self::new(ids.join(","))
    }
}

impl ConfigSource for StaticConfig {
    fn enabled_stores(&self) -> Option<String> {
        if self.enabled.trim().is_empty() {
            None
        } else {
            Some(self.enabled.clone())
        }
    }
}

/// Reads the list from an environment variable on every lookup
#[derive(Debug, Clone)]
pub struct EnvConfig {
    var: String,
}

impl EnvConfig {
    /// Read from a custom variable
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new(ENABLED_STORES_ENV)
    }
}

impl ConfigSource for EnvConfig {
    fn enabled_stores(&self) -> Option<String> {
        std::env::var(&self.var).ok().filter(|v| !v.trim().is_empty())
    }
}

/// Mutable list shared between an admin surface and managers
#[derive(Debug, Default)]
pub struct SharedConfig {
    enabled: RwLock<Vec<String>>,
}

impl SharedConfig {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            enabled: RwLock::new(ids.into_iter().map(Into::into).collect()),
        }
    }

    /// Append a store to the end of the list; returns false if already enabled
    pub fn enable_store(&self, store_id: &str) -> bool {
        let mut enabled = self.enabled.write();
        if enabled.iter().any(|id| id == store_id) {
            return false;
        }
        enabled.push(store_id.to_string());
        true
    }

    /// Remove a store from the list; returns false if it was not enabled
    pub fn disable_store(&self, store_id: &str) -> bool {
        let mut enabled = self.enabled.write();
        let before = enabled.len();
        enabled.retain(|id| id != store_id);
        enabled.len() != before
    }

    /// Replace the whole list, keeping the given order
    pub fn set_enabled_stores(&self, ids: Vec<String>) {
        *self.enabled.write() = ids;
    }
}

impl ConfigSource for SharedConfig {
    fn enabled_stores(&self) -> Option<String> {
        let enabled = self.enabled.read();
        if enabled.is_empty() {
            None
        } else {
            Some(enabled.join(","))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_enabled_stores() {
        assert_eq!(
            parse_enabled_stores("logstore_standard, logstore_legacy,,"),
            vec!["logstore_standard", "logstore_legacy"]
        );
        assert!(parse_enabled_stores("").is_empty());
        assert!(parse_enabled_stores(" , ").is_empty());
    }

    #[test]
    fn test_static_config() {
        let config = StaticConfig::from_ids(["logstore_standard", "logstore_legacy"]);
        assert_eq!(
            config.enabled_stores().as_deref(),
            Some("logstore_standard,logstore_legacy")
        );
        assert!(is_enabled(&config, "logstore_legacy"));
        assert!(!is_enabled(&config, "logstore_database"));

        assert!(StaticConfig::default().enabled_stores().is_none());
    }

    #[test]
    fn test_env_config_unset() {
        let config = EnvConfig::new("LOGSTORE_TEST_VARIABLE_THAT_IS_NEVER_SET");
        assert!(config.enabled_stores().is_none());
        assert!(enabled_store_ids(&config).is_empty());
    }

    #[test]
    fn test_shared_config_toggles() {
        let config = SharedConfig::new(["logstore_standard"]);
        assert!(config.enable_store("logstore_legacy"));
        assert!(!config.enable_store("logstore_legacy"));
        assert_eq!(
            enabled_store_ids(&config),
            vec!["logstore_standard", "logstore_legacy"]
        );

        assert!(config.disable_store("logstore_standard"));
        assert!(!config.disable_store("logstore_standard"));
        assert_eq!(enabled_store_ids(&config), vec!["logstore_legacy"]);

        config.set_enabled_stores(Vec::new());
        assert!(config.enabled_stores().is_none());
    }

    #[test]
    fn test_settings_section_name() {
        assert_eq!(short_name("logstore_standard"), "standard");
        assert_eq!(short_name("custom"), "custom");
        assert_eq!(settings_section_name("logstore_legacy"), "logsettinglegacy");
    }
}
