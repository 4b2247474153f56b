//! Legacy log store
//!
//! A reader with no backing data. It stays enabled on sites that used to log
//! through the retired legacy table so report code keeps finding a reader,
//! but every query comes back empty.

use super::{LogReader, LogStore};
use crate::record::Params;
use crate::types::{AccessContext, Event, LogResult};

/// Identifier of the legacy store
pub const LEGACY_STORE_ID: &str = "logstore_legacy";

/// Reader-only store that never returns events
#[derive(Debug, Default)]
pub struct LegacyStore;

impl LegacyStore {
    pub const NAME: &'static str = "Legacy log";
    pub const DESCRIPTION: &'static str = "Reads the retired legacy log; no events are available";

    pub fn new() -> Self {
        Self
    }
}

impl LogStore for LegacyStore {
    fn name(&self) -> String {
        Self::NAME.to_string()
    }

    fn description(&self) -> String {
        Self::DESCRIPTION.to_string()
    }

    fn as_reader(&self) -> Option<&dyn LogReader> {
        Some(self)
    }
}

impl LogReader for LegacyStore {
    fn can_access(&self, _context: &AccessContext) -> bool {
        true
    }

    fn get_events(
        &self,
        _select: &str,
        _params: &Params,
        _order: Option<&str>,
        _offset: usize,
        _limit: usize,
    ) -> LogResult<Vec<Event>> {
        Ok(Vec::new())
    }

    fn get_events_count(&self, _select: &str, _params: &Params) -> LogResult<u64> {
        Ok(0)
    }
}
