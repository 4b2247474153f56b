//! Capability probe for store plugins

use std::fmt;

use super::LogStore;

/// Which of the two plugin capabilities an instance supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Capabilities {
    pub writer: bool,
    pub reader: bool,
}

impl Capabilities {
    pub const NONE: Self = Self {
        writer: false,
        reader: false,
    };
    pub const WRITER: Self = Self {
        writer: true,
        reader: false,
    };
    pub const READER: Self = Self {
        writer: false,
        reader: true,
    };
    pub const BOTH: Self = Self {
        writer: true,
        reader: true,
    };

    pub fn is_empty(&self) -> bool {
        !self.writer && !self.reader
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.writer, self.reader) {
            (true, true) => write!(f, "writer+reader"),
            (true, false) => write!(f, "writer"),
            (false, true) => write!(f, "reader"),
            (false, false) => write!(f, "none"),
        }
    }
}

/// Inspect which capabilities `store` exposes
pub fn capabilities_of(store: &dyn LogStore) -> Capabilities {
    Capabilities {
        writer: store.as_writer().is_some(),
        reader: store.as_reader().is_some(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::{LegacyStore, StandardStore};
    use crate::record::MemoryRecordStore;
    use std::sync::Arc;

    struct Inert;

    impl LogStore for Inert {
        fn name(&self) -> String {
            "Inert".to_string()
        }

        fn description(&self) -> String {
            String::new()
        }
    }

    #[test]
    fn test_capabilities_of_reference_stores() {
        assert_eq!(capabilities_of(&LegacyStore::new()), Capabilities::READER);

        let standard = StandardStore::new(Arc::new(MemoryRecordStore::new()));
        assert_eq!(capabilities_of(&standard), Capabilities::BOTH);
    }

    #[test]
    fn test_store_without_capabilities() {
        let caps = capabilities_of(&Inert);
        assert_eq!(caps, Capabilities::NONE);
        assert!(caps.is_empty());
        assert_eq!(caps.to_string(), "none");
    }

    #[test]
    fn test_capabilities_display() {
        assert_eq!(Capabilities::BOTH.to_string(), "writer+reader");
        assert_eq!(Capabilities::WRITER.to_string(), "writer");
        assert_eq!(Capabilities::READER.to_string(), "reader");
    }
}
